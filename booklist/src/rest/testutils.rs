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

//! Test utilities for the REST layer.

use crate::db;
use crate::driver::Driver;
use crate::model::{Author, Book, BookId, BookQuery, NewBook, Title};
use crate::rest::{RestOptions, app};
use axum::Router;
use booklist_core::db::{Db, DbError};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The application router under test.
    app: Router,

    /// The database backing the application, for direct access.
    db: Arc<dyn Db + Send + Sync>,
}

impl TestContext {
    /// Initializes the application with default options and an in-memory database.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_opts(RestOptions::default()).await
    }

    /// Initializes the application with the given `opts` and an in-memory database.
    pub(crate) async fn setup_with_opts(opts: RestOptions) -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(booklist_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let app = app(Driver::new(db.clone()), &opts);
        Self { app, db }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a book by directly modifying the backing database.
    pub(crate) async fn create_book(
        &self,
        title: &'static str,
        author: &'static str,
        year: Option<i32>,
    ) -> Book {
        let book = NewBook::new(Title::from(title), Author::from(author), year);
        db::create_book(&mut self.db.ex().await.unwrap(), book).await.unwrap()
    }

    /// Gets the book identified by `id` by directly querying the backing database.
    pub(crate) async fn get_book(&self, id: BookId) -> Option<Book> {
        match db::get_book(&mut self.db.ex().await.unwrap(), id).await {
            Ok(book) => Some(book),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Counts all books by directly querying the backing database.
    pub(crate) async fn count_books(&self) -> usize {
        db::get_books(&mut self.db.ex().await.unwrap(), &BookQuery::default()).await.unwrap().len()
    }
}
