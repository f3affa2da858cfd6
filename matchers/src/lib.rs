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

//! Composable matchers to express assertions on HTTP responses.
//!
//! A matcher is a predicate that can also explain itself: it knows how to describe what it
//! expects and how to describe why a specific value did not satisfy that expectation.  Matchers
//! nest, so that a response matcher such as `has_content_type` can delegate the check of the
//! header value to a value matcher such as `equal_to`:
//!
//! ```rust
//! use booklist_matchers::*;
//!
//! let response = http::Response::builder()
//!     .status(200)
//!     .header("content-type", "application/json; charset=UTF-8")
//!     .body("{}")
//!     .unwrap();
//! assert_that(&response, has_status_code(200));
//! assert_that(&response, has_content_type(equal_to(json())));
//! assert_that(&response, has_charset(equal_to("utf-8")));
//! ```
//!
//! This crate knows nothing about the services that use it.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use std::fmt;

mod response;
pub use response::*;
mod value;
pub use value::*;

/// Accumulates the textual description of an expectation or of a mismatch.
#[derive(Debug, Default)]
pub struct Description(String);

impl Description {
    /// Creates a new empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends free-form `text` to the description.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.0.push_str(text);
        self
    }

    /// Appends the debug representation of `value` to the description.
    pub fn append_value<V: fmt::Debug + ?Sized>(&mut self, value: &V) -> &mut Self {
        self.0.push_str(&format!("{:?}", value));
        self
    }

    /// Returns the accumulated description.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A predicate over values of type `T` that can describe itself.
pub trait Matcher<T: ?Sized> {
    /// Returns true if `actual` satisfies the expectation of this matcher.
    fn matches(&self, actual: &T) -> bool;

    /// Describes the expectation of this matcher into `description`.
    fn describe_to(&self, description: &mut Description);

    /// Describes why `actual` does not satisfy this matcher into `description`.
    ///
    /// Only called after `matches` returned false for the same `actual` value.
    fn describe_mismatch(&self, actual: &T, description: &mut Description);
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn matches(&self, actual: &T) -> bool {
        (**self).matches(actual)
    }

    fn describe_to(&self, description: &mut Description) {
        (**self).describe_to(description)
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        (**self).describe_mismatch(actual, description)
    }
}

/// Checks `actual` against `matcher` and returns the explanation of the failure, if any.
pub fn explain_mismatch<T: ?Sized, M: Matcher<T>>(actual: &T, matcher: &M) -> Option<String> {
    if matcher.matches(actual) {
        return None;
    }

    let mut expected = Description::new();
    matcher.describe_to(&mut expected);
    let mut but = Description::new();
    matcher.describe_mismatch(actual, &mut but);
    Some(format!("\nExpected: {}\n     but: {}", expected, but))
}

/// Asserts that `actual` satisfies `matcher`, panicking with a description of the expectation
/// and of the mismatch otherwise.
#[track_caller]
pub fn assert_that<T: ?Sized, M: Matcher<T>>(actual: &T, matcher: M) {
    if let Some(explanation) = explain_mismatch(actual, &matcher) {
        panic!("{}", explanation);
    }
}
