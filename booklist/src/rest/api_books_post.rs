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

//! API to add a book to the catalog.

use crate::driver::Driver;
use crate::model::{Book, NewBook};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use booklist_core::rest::{JsonBody, RestError};

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(book): JsonBody<NewBook>,
) -> Result<(StatusCode, Json<Book>), RestError> {
    let book = driver.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[cfg(test)]
mod tests {
    use crate::model::Book;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use booklist_core::rest::testutils::OneShotBuilder;
    use booklist_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/books".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let book = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965}))
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<Book>()
            .await;
        assert_eq!("Dune", book.title().as_str());
        assert_eq!("Frank Herbert", book.author().as_str());
        assert_eq!(&Some(1965), book.year());

        let id = *book.id();
        assert_eq!(Some(book), context.get_book(id).await);
    }

    #[tokio::test]
    async fn test_year_as_string_or_missing() {
        let context = TestContext::setup().await;

        for (input, exp_year) in [
            (json!({"title": "T", "author": "A", "year": "1965"}), Some(1965)),
            (json!({"title": "T", "author": "A", "year": ""}), None),
            (json!({"title": "T", "author": "A", "year": null}), None),
            (json!({"title": "T", "author": "A"}), None),
        ] {
            let book = OneShotBuilder::new(context.app(), route())
                .send_json(input)
                .await
                .expect_status(StatusCode::CREATED)
                .expect_json::<Book>()
                .await;
            assert_eq!(&exp_year, book.year());
        }
    }

    #[tokio::test]
    async fn test_unknown_fields_are_not_stored() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"title": "Dune", "author": "Frank Herbert", "isbn": "0441013597"}))
            .await
            .expect_status(StatusCode::CREATED)
            .take_body_as_text()
            .await;
        assert!(!response.contains("isbn"), "Unexpected field in {}", response);
    }

    #[tokio::test]
    async fn test_invalid_fields() {
        let context = TestContext::setup().await;

        for (input, error) in [
            (json!({"author": "OnlyAuthor"}), "missing field `title`"),
            (json!({"title": "OnlyTitle"}), "missing field `author`"),
            (json!({"title": "", "author": "A"}), "Title cannot be empty"),
            (json!({"title": "   ", "author": "A"}), "Title cannot be empty"),
            (json!({"title": "T", "author": ""}), "Author cannot be empty"),
            (json!({"title": "T", "author": "A", "year": "soon"}), "Invalid year 'soon'"),
            (json!({"title": "T", "author": "A", "year": true}), "invalid type: boolean"),
        ] {
            OneShotBuilder::new(context.app(), route())
                .send_json(input)
                .await
                .expect_status(StatusCode::BAD_REQUEST)
                .expect_error(error)
                .await;
        }

        assert_eq!(0, context.count_books().await);
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
