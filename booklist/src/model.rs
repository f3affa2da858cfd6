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

//! High-level data types.

use booklist_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
#[cfg(test)]
use derive_more::Constructor;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of books that can be returned in a single page.
pub(crate) const MAX_PAGE_LIMIT: u32 = 1000;

/// Identifier of a book, assigned by the service when the book is created.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct BookId(Uuid);

impl BookId {
    /// Generates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the identifier as a UUID.
    pub(crate) fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for BookId {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match Uuid::parse_str(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ModelError(format!("Invalid book id '{}': {}", s, e))),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Generates a newtype for a required text field of a book that cannot be blank.
macro_rules! non_blank_text [
    ( $name:ident, $visitor:ident, $doc:literal, $empty_error:literal ) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Eq, PartialEq, Serialize)]
        #[serde(transparent)]
        pub(crate) struct $name(String);

        impl $name {
            /// Creates a new value from an untrusted string `s`, making sure it is not blank.
            pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
                let s = s.into();
                if s.trim().is_empty() {
                    return Err(ModelError($empty_error.to_owned()));
                }
                Ok(Self(s))
            }

            /// Creates a new value from an untrusted string `s`, without validation.  Useful for
            /// testing purposes only.
            #[cfg(test)]
            pub(crate) fn new_invalid<S: Into<String>>(s: S) -> Self {
                Self(s.into())
            }

            /// Returns a string view of the value.
            pub(crate) fn as_str(&self) -> &str {
                &self.0
            }
        }

        #[cfg(test)]
        impl From<&'static str> for $name {
            /// Creates a new value from a hardcoded string, which must be valid.
            fn from(s: &'static str) -> Self {
                $name::new(s).expect("Hardcoded values must be valid")
            }
        }

        #[doc = concat!("A deserialization visitor for a `", stringify!($name), "`.")]
        struct $visitor;

        impl Visitor<'_> for $visitor {
            type Value = $name;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-empty string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                $name::new(v).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                $name::new(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_string($visitor)
            }
        }
    }
];

non_blank_text!(Title, TitleVisitor, "The title of a book.", "Title cannot be empty");
non_blank_text!(Author, AuthorVisitor, "The author of a book.", "Author cannot be empty");

/// A deserialization visitor for an optional publication year.
///
/// Years are integers, but clients that submit forms tend to send them as strings, so numeric
/// strings are accepted as well and the empty string means that there is no year.
struct YearVisitor;

impl<'de> Visitor<'de> for YearVisitor {
    type Value = Option<i32>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer year, a string with an integer year, or null")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i32::try_from(v).map(Some).map_err(|_| E::custom(format!("Year {} is out of range", v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i32::try_from(v).map(Some).map_err(|_| E::custom(format!("Year {} is out of range", v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse::<i32>().map(Some).map_err(|_| E::custom(format!("Invalid year '{}'", v)))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_year(deserializer)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }
}

/// Deserializes an optional publication year.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(YearVisitor)
}

/// Deserializes a publication year that is present in an update, where null clears the year.
fn deserialize_year_update<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_year(deserializer).map(Some)
}

/// A book as stored in the catalog.
#[derive(Clone, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Book {
    /// Identifier of the book.
    id: BookId,

    /// Title of the book.
    title: Title,

    /// Author of the book.
    author: Author,

    /// Publication year of the book, if known.
    year: Option<i32>,
}

/// Contents of a book to be added to the catalog.
///
/// Unknown fields in the input are ignored.
#[derive(Deserialize, Getters)]
#[cfg_attr(test, derive(Clone, Constructor, Debug, PartialEq))]
pub(crate) struct NewBook {
    /// Title of the book.
    title: Title,

    /// Author of the book.
    author: Author,

    /// Publication year of the book, if known.
    #[serde(default, deserialize_with = "deserialize_year")]
    year: Option<i32>,
}

impl Book {
    /// Creates a new book from its parts.
    pub(crate) fn new(id: BookId, title: Title, author: Author, year: Option<i32>) -> Self {
        Self { id, title, author, year }
    }
}

impl NewBook {
    /// Converts the new book into a stored book with the given `id`.
    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book::new(id, self.title, self.author, self.year)
    }
}

/// Partial modification of a book.  Fields that are `None` are left untouched.
///
/// Unknown fields in the input are ignored, and a `null` title or author is the same as not
/// specifying them at all.  For the year, `Some(None)` clears it.
#[derive(Default, Deserialize, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct BookUpdate {
    /// New title for the book.
    #[serde(default)]
    title: Option<Title>,

    /// New author for the book.
    #[serde(default)]
    author: Option<Author>,

    /// New publication year for the book.
    #[serde(default, deserialize_with = "deserialize_year_update")]
    year: Option<Option<i32>>,
}

#[cfg(test)]
impl BookUpdate {
    /// Sets the new title.
    pub(crate) fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the new author.
    pub(crate) fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Sets the new year, where `None` clears it.
    pub(crate) fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = Some(year);
        self
    }
}

/// Field by which to sort a list of books.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[cfg_attr(test, derive(Serialize))]
#[serde(rename_all = "lowercase")]
pub(crate) enum SortKey {
    /// Sort by title.
    Title,

    /// Sort by author.
    Author,

    /// Sort by publication year, with books without a year last.
    Year,
}

/// Criteria to select and order the books returned by a listing.
#[derive(Debug, Default, Getters)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct BookQuery {
    /// Only return books by this exact author.
    author: Option<String>,

    /// Order in which to return books.  If missing, books are returned in creation order.
    sort: Option<SortKey>,

    /// Maximum number of books to return.
    limit: Option<u32>,

    /// Number of books to skip before the first one returned.
    offset: u64,
}

impl BookQuery {
    /// Creates a new query with validation of the pagination parameters.
    ///
    /// `page` is 1-based and can only be specified along a `limit`.
    pub(crate) fn new(
        author: Option<String>,
        sort: Option<SortKey>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> ModelResult<Self> {
        if let Some(limit) = limit {
            if limit == 0 || limit > MAX_PAGE_LIMIT {
                return Err(ModelError(format!(
                    "Limit must be between 1 and {}",
                    MAX_PAGE_LIMIT
                )));
            }
        }

        let offset = match (page, limit) {
            (None, _) => 0,
            (Some(_), None) => {
                return Err(ModelError("Cannot request a page without a limit".to_owned()));
            }
            (Some(0), Some(_)) => return Err(ModelError("Pages start at 1".to_owned())),
            (Some(page), Some(limit)) => u64::from(page - 1) * u64::from(limit),
        };

        Ok(Self { author, sort, limit, offset })
    }
}
