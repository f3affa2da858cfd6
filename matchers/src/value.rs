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

//! Matchers for plain values, typically nested inside response matchers.

use crate::{Description, Matcher};
use std::borrow::Borrow;
use std::fmt;

/// Matcher returned by `equal_to`.
pub struct EqualTo<U>(U);

/// Matches values equal to `expected`.
///
/// `expected` can be any type that borrows as the type under test, so `equal_to("foo")` can be
/// used to check both `str` and `String` values.
pub fn equal_to<U>(expected: U) -> EqualTo<U> {
    EqualTo(expected)
}

impl<T, U> Matcher<T> for EqualTo<U>
where
    T: PartialEq + fmt::Debug + ?Sized,
    U: Borrow<T>,
{
    fn matches(&self, actual: &T) -> bool {
        self.0.borrow() == actual
    }

    fn describe_to(&self, description: &mut Description) {
        description.append_value(self.0.borrow());
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        description.append("was ").append_value(actual);
    }
}

/// Matcher returned by `anything`.
pub struct Anything;

/// Matches any value.
pub fn anything() -> Anything {
    Anything
}

impl<T: ?Sized> Matcher<T> for Anything {
    fn matches(&self, _actual: &T) -> bool {
        true
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("anything");
    }

    fn describe_mismatch(&self, _actual: &T, _description: &mut Description) {
        unreachable!("anything never mismatches");
    }
}

/// Appends the textual representation of the possibly-binary `actual` value to `description`.
fn append_text(actual: &[u8], description: &mut Description) {
    description.append("was ").append_value(&String::from_utf8_lossy(actual));
}

/// Matcher returned by `contains_string`.
pub struct ContainsString(String);

/// Matches strings or byte buffers that contain `substring`.
pub fn contains_string<S: Into<String>>(substring: S) -> ContainsString {
    ContainsString(substring.into())
}

impl<T: AsRef<[u8]> + ?Sized> Matcher<T> for ContainsString {
    fn matches(&self, actual: &T) -> bool {
        let needle = self.0.as_bytes();
        needle.is_empty() || actual.as_ref().windows(needle.len()).any(|window| window == needle)
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("a string containing ").append_value(&self.0);
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        append_text(actual.as_ref(), description);
    }
}

/// Matcher returned by `matches_regex`.
pub struct MatchesRegex(regex::bytes::Regex);

/// Matches strings or byte buffers in which the regular expression `pattern` finds a match.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression, as that is a bug in the test itself.
pub fn matches_regex(pattern: &str) -> MatchesRegex {
    match regex::bytes::Regex::new(pattern) {
        Ok(re) => MatchesRegex(re),
        Err(e) => panic!("Invalid regular expression {}: {}", pattern, e),
    }
}

impl<T: AsRef<[u8]> + ?Sized> Matcher<T> for MatchesRegex {
    fn matches(&self, actual: &T) -> bool {
        self.0.is_match(actual.as_ref())
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("a string matching ").append_value(self.0.as_str());
    }

    fn describe_mismatch(&self, actual: &T, description: &mut Description) {
        append_text(actual.as_ref(), description);
    }
}
