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

//! API to delete a single book.

use crate::driver::Driver;
use crate::rest::parse_book_id;
use axum::Json;
use axum::extract::State;
use booklist_core::rest::{EmptyBody, PathParam, RestError};
use serde::Serialize;
#[cfg(test)]
use serde::Deserialize;

/// Message returned to the client after a successful deletion.
const DELETED_MESSAGE: &str = "Book deleted successfully";

/// Message sent back to the client after a successful deletion.
#[derive(Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct DeleteResponse {
    /// Human-readable confirmation of the deletion.
    pub(crate) message: String,
}

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParam(id): PathParam<String>,
    _: EmptyBody,
) -> Result<Json<DeleteResponse>, RestError> {
    let id = parse_book_id(&id)?;
    driver.delete_book(id).await?;
    Ok(Json(DeleteResponse { message: DELETED_MESSAGE.to_owned() }))
}
