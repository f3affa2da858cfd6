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

//! Extends the driver with operations on individual books.

use crate::db;
use crate::driver::{Driver, book_error};
use crate::model::{Book, BookId, BookUpdate};
use booklist_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Gets the book identified by `id`.
    pub(crate) async fn get_book(self, id: BookId) -> DriverResult<Book> {
        let mut ex = self.db.ex().await?;
        db::get_book(&mut ex, id).await.map_err(|e| book_error(e, id))
    }

    /// Applies the partial modification in `update` to the book identified by `id`.
    pub(crate) async fn update_book(self, id: BookId, update: BookUpdate) -> DriverResult<Book> {
        let mut ex = self.db.ex().await?;
        let book = db::update_book(&mut ex, id, &update).await.map_err(|e| book_error(e, id))?;
        info!("Updated book {}", id);
        Ok(book)
    }

    /// Deletes the book identified by `id`.
    pub(crate) async fn delete_book(self, id: BookId) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_book(&mut ex, id).await.map_err(|e| book_error(e, id))?;
        info!("Deleted book {}", id);
        Ok(())
    }
}
