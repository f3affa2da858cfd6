// Booklist
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST interface for the book catalog.

use crate::driver::Driver;
use crate::model::BookId;
use axum::Router;
use axum::extract::OriginalUri;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use booklist_core::env::get_optional_var;
use booklist_core::rest::{RestError, RestResult};
use std::any::Any;
use std::str::FromStr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

mod api_book_delete;
mod api_book_get;
mod api_book_put;
mod api_books_get;
mod api_books_post;
#[cfg(test)]
mod testutils;

/// Configuration options for the REST interface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestOptions {
    /// Path under which all APIs are served.  Either empty or a path that starts with a slash
    /// and does not end with one.
    api_prefix: String,
}

impl RestOptions {
    /// Creates a new set of options that serves all APIs under `api_prefix`.
    pub fn new<S: Into<String>>(api_prefix: S) -> Result<Self, String> {
        let api_prefix = api_prefix.into();
        if !api_prefix.is_empty() && !api_prefix.starts_with('/') {
            return Err(format!("API prefix '{}' must start with a slash", api_prefix));
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_owned();
        Ok(Self { api_prefix })
    }

    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use the `<prefix>_API_PREFIX` variable, which is empty by default.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Self::new(get_optional_var::<String>(prefix, "API_PREFIX")?.unwrap_or_default())
    }

    /// Returns the path under which all APIs are served.
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }
}

/// Parses a book identifier given in a request path.
fn parse_book_id(raw: &str) -> RestResult<BookId> {
    BookId::from_str(raw).map_err(|e| RestError::MalformedId(e.to_string()))
}

/// Answers requests that do not match any route.
async fn no_route(method: Method, uri: Uri) -> RestError {
    RestError::NotFound(format!("No route for {} {}", method, uri.path()))
}

/// Answers requests for a known path that use a method the path does not support.
async fn no_method(method: Method, OriginalUri(uri): OriginalUri) -> RestError {
    RestError::MethodNotAllowed(format!("Method {} not allowed for {}", method, uri.path()))
}

/// Converts a panic raised by a handler into an internal error response.
fn handle_panic(details: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = details.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = details.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "Unknown panic payload".to_owned()
    };
    RestError::InternalError(format!("Handler panicked: {}", details)).into_response()
}

/// Wraps the `router` with the behavior common to all APIs: JSON errors for unknown routes and
/// methods, recovery from panics, and permissive CORS.
///
/// Must be called after all routes have been added to `router`.
fn with_common_layers(router: Router) -> Router {
    router
        .method_not_allowed_fallback(no_method)
        .fallback(no_route)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver, opts: &RestOptions) -> Router {
    use axum::routing::get;

    let books_router = Router::new()
        .route("/books", get(api_books_get::handler).post(api_books_post::handler))
        .route(
            "/books/:id",
            get(api_book_get::handler)
                .put(api_book_put::handler)
                .delete(api_book_delete::handler),
        )
        .with_state(driver);

    if opts.api_prefix.is_empty() {
        with_common_layers(books_router)
    } else {
        with_common_layers(Router::new().nest(&opts.api_prefix, books_router))
    }
}

#[cfg(test)]
mod tests {
    use super::api_book_delete::DeleteResponse;
    use super::testutils::*;
    use super::*;
    use crate::model::Book;
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use booklist_core::rest::testutils::OneShotBuilder;
    use booklist_matchers::*;
    use serde_json::json;

    #[test]
    fn test_rest_options_new() {
        assert_eq!("", RestOptions::new("").unwrap().api_prefix());
        assert_eq!("", RestOptions::new("/").unwrap().api_prefix());
        assert_eq!("/api", RestOptions::new("/api").unwrap().api_prefix());
        assert_eq!("/api/v1", RestOptions::new("/api/v1//").unwrap().api_prefix());
        assert_eq!(
            "API prefix 'api' must start with a slash",
            RestOptions::new("api").unwrap_err()
        );
    }

    #[test]
    fn test_rest_options_from_env() {
        temp_env::with_var("BOOKLIST_TEST_API_PREFIX", Some("/api/"), || {
            assert_eq!(
                RestOptions::new("/api").unwrap(),
                RestOptions::from_env("BOOKLIST_TEST").unwrap()
            );
        });
        temp_env::with_var("BOOKLIST_TEST_API_PREFIX", None::<&str>, || {
            assert_eq!(RestOptions::default(), RestOptions::from_env("BOOKLIST_TEST").unwrap());
        });
    }

    #[test]
    fn test_parse_book_id() {
        let id = BookId::generate();
        assert_eq!(id, parse_book_id(&id.to_string()).unwrap());
        match parse_book_id("12345") {
            Err(RestError::MalformedId(msg)) => assert!(msg.contains("Invalid book id '12345'")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/authors"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .take_buffered_response()
            .await;
        assert_that(&response, has_status_code(404));
        assert_that(&response, has_content_type(equal_to(json())));
        assert_that(&response, has_body(contains_string("No route for GET /authors")));
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::PATCH, "/books"))
            .send_empty()
            .await
            .expect_status(StatusCode::METHOD_NOT_ALLOWED)
            .take_buffered_response()
            .await;
        assert_that(&response, has_content_type(equal_to(json())));
        assert_that(&response, has_body(contains_string("Method PATCH not allowed for /books")));

        let id = BookId::generate();
        OneShotBuilder::new(context.app(), (Method::POST, format!("/books/{}", id)))
            .send_empty()
            .await
            .expect_status(StatusCode::METHOD_NOT_ALLOWED)
            .expect_error(&format!("Method POST not allowed for /books/{}", id))
            .await;
    }

    #[tokio::test]
    async fn test_wrong_method_with_api_prefix() {
        let context = TestContext::setup_with_opts(RestOptions::new("/api").unwrap()).await;

        OneShotBuilder::new(context.app(), (Method::DELETE, "/api/books"))
            .send_empty()
            .await
            .expect_status(StatusCode::METHOD_NOT_ALLOWED)
            .expect_error("Method DELETE not allowed for /api/books")
            .await;
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        async fn explode() -> &'static str {
            panic!("Something went very wrong");
        }
        let app = with_common_layers(Router::new().route("/explode", get(explode)));

        let response = OneShotBuilder::new(app, (Method::GET, "/explode"))
            .send_empty()
            .await
            .expect_status(StatusCode::INTERNAL_SERVER_ERROR)
            .take_buffered_response()
            .await;
        assert_that(&response, has_status_code(500));
        assert_that(&response, has_content_type(equal_to(json())));
        assert_that(&response, has_body(contains_string("Internal server error")));
        assert!(!String::from_utf8_lossy(response.body()).contains("very wrong"));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/books"))
            .with_header(header::ORIGIN, "http://frontend.example.com")
            .send_empty()
            .await
            .take_buffered_response()
            .await;
        assert_that(&response, has_status_code(200));
        assert_that(&response, has_header_value("Access-Control-Allow-Origin", equal_to("*")));
    }

    #[tokio::test]
    async fn test_api_prefix() {
        let context = TestContext::setup_with_opts(RestOptions::new("/api").unwrap()).await;
        context.create_book("Dune", "Frank Herbert", None).await;

        let books = OneShotBuilder::new(context.app(), (Method::GET, "/api/books"))
            .send_empty()
            .await
            .expect_json::<Vec<Book>>()
            .await;
        assert_eq!(1, books.len());

        OneShotBuilder::new(context.app(), (Method::GET, "/books"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("No route for GET /books")
            .await;
    }

    #[tokio::test]
    async fn test_e2e_dune_lifecycle() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::POST, "/books"))
            .send_json(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965}))
            .await
            .expect_status(StatusCode::CREATED)
            .take_buffered_response()
            .await;
        assert_that(&response, has_status_code(201));
        assert_that(&response, has_content_type(equal_to(json())));
        assert_that(&response, has_body(contains_string("\"title\":\"Dune\"")));
        assert_that(&response, has_body(matches_regex("\"id\":\"[0-9a-f-]{36}\"")));
        let created: Book = serde_json::from_slice(response.body()).unwrap();
        let path = format!("/books/{}", created.id());

        let fetched = OneShotBuilder::new(context.app(), (Method::GET, &path))
            .send_empty()
            .await
            .expect_json::<Book>()
            .await;
        assert_eq!(created, fetched);

        let response = OneShotBuilder::new(context.app(), (Method::DELETE, &path))
            .send_empty()
            .await
            .expect_json::<DeleteResponse>()
            .await;
        assert_eq!("Book deleted successfully", response.message);

        let response = OneShotBuilder::new(context.app(), (Method::GET, &path))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .take_buffered_response()
            .await;
        assert_that(&response, has_status_code(404));
        assert_that(&response, has_body(contains_string("not found")));
    }

    #[tokio::test]
    async fn test_e2e_only_author_is_rejected() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (Method::POST, "/books"))
            .send_json(json!({"author": "OnlyAuthor"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("missing field `title`")
            .await;

        let books = OneShotBuilder::new(context.app(), (Method::GET, "/books"))
            .send_empty()
            .await
            .expect_json::<Vec<Book>>()
            .await;
        assert!(books.is_empty());
    }
}
