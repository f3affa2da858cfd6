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

//! API to list the books in the catalog.

use crate::driver::Driver;
use crate::model::{Book, BookQuery, SortKey};
use axum::Json;
use axum::extract::State;
use booklist_core::rest::{EmptyBody, QueryParams, RestError};
use serde::Deserialize;

/// Query parameters accepted by this API.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListQuery {
    /// Only return books whose author matches this exactly.
    author: Option<String>,

    /// Field to sort the results by.
    sort: Option<SortKey>,

    /// 1-based page number to return.  Requires `limit`.
    page: Option<u32>,

    /// Maximum number of books to return.
    limit: Option<u32>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    QueryParams(query): QueryParams<ListQuery>,
    _: EmptyBody,
) -> Result<Json<Vec<Book>>, RestError> {
    let query = BookQuery::new(query.author, query.sort, query.page, query.limit)?;
    let books = driver.list_books(query).await?;
    Ok(Json(books))
}
