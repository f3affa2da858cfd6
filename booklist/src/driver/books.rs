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

//! Extends the driver with operations on the collection of books.

use crate::db;
use crate::driver::Driver;
use crate::model::{Book, BookQuery, NewBook};
use booklist_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Lists the books that match `query`.
    pub(crate) async fn list_books(self, query: BookQuery) -> DriverResult<Vec<Book>> {
        let mut ex = self.db.ex().await?;
        let books = db::get_books(&mut ex, &query).await?;
        Ok(books)
    }

    /// Adds `book` to the catalog and returns the stored record.
    pub(crate) async fn create_book(self, book: NewBook) -> DriverResult<Book> {
        let mut ex = self.db.ex().await?;
        let book = db::create_book(&mut ex, book).await?;
        info!("Created book {}", book.id());
        Ok(book)
    }
}
