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

//! API to modify a single book.

use crate::driver::Driver;
use crate::model::{Book, BookUpdate};
use crate::rest::parse_book_id;
use axum::Json;
use axum::extract::State;
use booklist_core::rest::{JsonBody, PathParam, RestError};

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParam(id): PathParam<String>,
    JsonBody(update): JsonBody<BookUpdate>,
) -> Result<Json<Book>, RestError> {
    let id = parse_book_id(&id)?;
    let book = driver.update_book(id, update).await?;
    Ok(Json(book))
}
