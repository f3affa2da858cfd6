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

//! API to get a single book.

use crate::driver::Driver;
use crate::model::Book;
use crate::rest::parse_book_id;
use axum::Json;
use axum::extract::State;
use booklist_core::rest::{EmptyBody, PathParam, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParam(id): PathParam<String>,
    _: EmptyBody,
) -> Result<Json<Book>, RestError> {
    let id = parse_book_id(&id)?;
    let book = driver.get_book(id).await?;
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use crate::model::{Book, BookId};
    use crate::rest::testutils::*;
    use axum::http;
    use booklist_core::rest::testutils::OneShotBuilder;
    use booklist_core::test_payload_must_be_empty;
    use booklist_matchers::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/books/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.create_book("Emma", "Jane Austen", None).await;
        let book = context.create_book("Dune", "Frank Herbert", Some(1965)).await;

        let response = OneShotBuilder::new(context.app(), route(&book.id().to_string()))
            .send_empty()
            .await
            .expect_json::<Book>()
            .await;
        assert_eq!(book, response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        context.create_book("Dune", "Frank Herbert", Some(1965)).await;
        let id = BookId::generate();

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error(&format!("Book {} not found", id))
            .await;
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let context = TestContext::setup().await;

        for id in ["123", "not-a-valid-id", "507f1f77bcf86cd799439011"] {
            OneShotBuilder::new(context.app(), route(id))
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error("Invalid book id")
                .await;
        }
    }

    #[tokio::test]
    async fn test_undecodable_id() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route("%FF"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_buffered_response()
            .await;
        assert_that(&response, has_content_type(equal_to(json())));
        assert_that(&response, has_body(contains_string("Invalid UTF-8 in `id`")));
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(&BookId::generate().to_string())
    );
}
