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

//! Matchers for `http::Response` objects.

use crate::value::{Anything, EqualTo, equal_to};
use crate::{Description, Matcher};
use http::Response;

/// Name of the header that carries the media type of the body.
const CONTENT_TYPE: &str = "content-type";

/// Returns the `text/html` MIME type.
pub fn html() -> &'static str {
    "text/html"
}

/// Returns the `application/json` MIME type.
pub fn json() -> &'static str {
    "application/json"
}

/// Returns the `text/plain` MIME type.
pub fn text() -> &'static str {
    "text/plain"
}

/// Outcome of looking up a header that is expected to carry text.
enum HeaderLookup<'a> {
    /// The header is not in the response.
    Missing,

    /// The header is present but its value is not visible ASCII.
    NotText,

    /// The header is present with the given value.
    Value(&'a str),
}

impl<'a> HeaderLookup<'a> {
    /// Looks up the first value of the header `name` in `response`.
    fn find<B>(response: &'a Response<B>, name: &str) -> Self {
        match response.headers().get(name) {
            None => HeaderLookup::Missing,
            Some(value) => match value.to_str() {
                Ok(value) => HeaderLookup::Value(value),
                Err(_) => HeaderLookup::NotText,
            },
        }
    }

    /// Describes why this lookup did not yield a value for the header `name`.
    fn describe_absence(&self, name: &str, description: &mut Description) {
        match self {
            HeaderLookup::Missing => {
                description.append("header ").append_value(name).append(" was missing");
            }
            HeaderLookup::NotText => {
                description.append("header ").append_value(name).append(" was not valid text");
            }
            HeaderLookup::Value(_) => unreachable!("Header has a value"),
        }
    }
}

/// Matcher returned by `has_status_code`.
pub struct HasStatusCode(u16);

/// Matches responses whose status code is exactly `code`.
pub fn has_status_code(code: u16) -> HasStatusCode {
    HasStatusCode(code)
}

impl<B> Matcher<Response<B>> for HasStatusCode {
    fn matches(&self, actual: &Response<B>) -> bool {
        actual.status().as_u16() == self.0
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("A response that has status code ").append_value(&self.0);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        description.append("A response with status code ").append_value(&actual.status().as_u16());
    }
}

/// Matcher returned by `has_header` and `has_header_value`.
pub struct HasHeader<M> {
    /// Name of the header to look for, in lowercase.
    name: String,

    /// Optional matcher for the textual value of the header.
    matcher: Option<M>,
}

/// Matches responses that carry the header `name`, regardless of its value.
pub fn has_header<N: AsRef<str>>(name: N) -> HasHeader<Anything> {
    HasHeader { name: name.as_ref().to_ascii_lowercase(), matcher: None }
}

/// Matches responses that carry the header `name` with a value that satisfies `matcher`.
pub fn has_header_value<N: AsRef<str>, M: Matcher<str>>(name: N, matcher: M) -> HasHeader<M> {
    HasHeader { name: name.as_ref().to_ascii_lowercase(), matcher: Some(matcher) }
}

impl<B, M: Matcher<str>> Matcher<Response<B>> for HasHeader<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        match (HeaderLookup::find(actual, &self.name), &self.matcher) {
            (HeaderLookup::Missing, _) => false,
            (_, None) => true,
            (HeaderLookup::NotText, Some(_)) => false,
            (HeaderLookup::Value(value), Some(matcher)) => matcher.matches(value),
        }
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("A response that has header ").append_value(&self.name);
        if let Some(matcher) = &self.matcher {
            description.append(" with value ");
            matcher.describe_to(description);
        }
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        match (HeaderLookup::find(actual, &self.name), &self.matcher) {
            (HeaderLookup::Value(value), Some(matcher)) => {
                description.append("header ").append_value(&self.name).append(" ");
                matcher.describe_mismatch(value, description);
            }
            (lookup, _) => lookup.describe_absence(&self.name, description),
        }
    }
}

/// Matcher returned by `has_body`.
pub struct HasBody<M>(M);

/// Matches responses whose body satisfies `matcher`.
pub fn has_body<M>(matcher: M) -> HasBody<M> {
    HasBody(matcher)
}

impl<B, M: Matcher<B>> Matcher<Response<B>> for HasBody<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        self.0.matches(actual.body())
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("A response with body ");
        self.0.describe_to(description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        description.append("A response with body that ");
        self.0.describe_mismatch(actual.body(), description);
    }
}

/// Checks the value of a single header with a matcher.
///
/// This is the building block of the matchers that target a specific header.
struct HeaderMatcher<M> {
    /// Name of the header to look for.
    name: &'static str,

    /// Human-friendly name of the header for descriptions.
    friendly_name: &'static str,

    /// Matcher for the converted value of the header.
    matcher: M,
}

impl<M> HeaderMatcher<M> {
    /// Creates a matcher for the header `name` that delegates to `matcher`.
    fn new(name: &'static str, friendly_name: &'static str, matcher: M) -> Self {
        Self { name, friendly_name, matcher }
    }

    /// Describes the expectation of this matcher.
    fn describe_with<T: ?Sized>(&self, description: &mut Description)
    where
        M: Matcher<T>,
    {
        description.append("A response with ").append(self.friendly_name).append(" ");
        self.matcher.describe_to(description);
    }
}

impl<M: Matcher<str>> HeaderMatcher<M> {
    /// Checks the textual value of the header in `actual` after passing it through `convert`.
    fn matches_text<B>(&self, actual: &Response<B>, convert: fn(&str) -> &str) -> bool {
        match HeaderLookup::find(actual, self.name) {
            HeaderLookup::Value(value) => self.matcher.matches(convert(value)),
            _ => false,
        }
    }

    /// Explains why the textual value of the header in `actual`, after passing it through
    /// `convert`, does not match.
    fn describe_text_mismatch<B>(
        &self,
        actual: &Response<B>,
        convert: fn(&str) -> &str,
        description: &mut Description,
    ) {
        match HeaderLookup::find(actual, self.name) {
            HeaderLookup::Value(value) => {
                self.matcher.describe_mismatch(convert(value), description);
            }
            lookup => lookup.describe_absence(self.name, description),
        }
    }
}

/// Removes the parameters, if any, from a `content-type` value.
fn strip_parameters(value: &str) -> &str {
    match value.find(';') {
        Some(pos) => value[..pos].trim(),
        None => value.trim(),
    }
}

/// Matcher returned by `has_content_type`.
pub struct HasContentType<M>(HeaderMatcher<M>);

/// Matches responses whose `content-type` header, without any parameters, satisfies `matcher`.
pub fn has_content_type<M: Matcher<str>>(matcher: M) -> HasContentType<M> {
    HasContentType(HeaderMatcher::new(CONTENT_TYPE, "content type", matcher))
}

impl<B, M: Matcher<str>> Matcher<Response<B>> for HasContentType<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        self.0.matches_text(actual, strip_parameters)
    }

    fn describe_to(&self, description: &mut Description) {
        self.0.describe_with::<str>(description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        self.0.describe_text_mismatch(actual, strip_parameters, description);
    }
}

/// Matcher returned by `has_location`.
pub struct HasLocation<M>(HeaderMatcher<M>);

/// Matches responses whose `location` header satisfies `matcher`.
pub fn has_location<M: Matcher<str>>(matcher: M) -> HasLocation<M> {
    HasLocation(HeaderMatcher::new("location", "location", matcher))
}

impl<B, M: Matcher<str>> Matcher<Response<B>> for HasLocation<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        self.0.matches_text(actual, |value| value)
    }

    fn describe_to(&self, description: &mut Description) {
        self.0.describe_with::<str>(description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        self.0.describe_text_mismatch(actual, |value| value, description);
    }
}

/// Matcher returned by `has_content_length`.
pub struct HasContentLength<M>(HeaderMatcher<M>);

/// Matches responses whose `content-length` header, as a number, satisfies `matcher`.
pub fn has_content_length<M: Matcher<u64>>(matcher: M) -> HasContentLength<M> {
    HasContentLength(HeaderMatcher::new("content-length", "content length", matcher))
}

impl<B, M: Matcher<u64>> Matcher<Response<B>> for HasContentLength<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        match HeaderLookup::find(actual, self.0.name) {
            HeaderLookup::Value(value) => match value.trim().parse::<u64>() {
                Ok(length) => self.0.matcher.matches(&length),
                Err(_) => false,
            },
            _ => false,
        }
    }

    fn describe_to(&self, description: &mut Description) {
        self.0.describe_with::<u64>(description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        match HeaderLookup::find(actual, self.0.name) {
            HeaderLookup::Value(value) => match value.trim().parse::<u64>() {
                Ok(length) => self.0.matcher.describe_mismatch(&length, description),
                Err(_) => {
                    description.append("content length ").append_value(value);
                    description.append(" is not a number");
                }
            },
            lookup => lookup.describe_absence(self.0.name, description),
        }
    }
}

/// Matcher returned by `has_charset`.
pub struct HasCharset<M>(M);

/// Matches responses whose `content-type` header declares a charset that satisfies `matcher`.
///
/// The charset is lowercased before being checked and the `utf8` alias is reported as `utf-8`.
pub fn has_charset<M: Matcher<str>>(matcher: M) -> HasCharset<M> {
    HasCharset(matcher)
}

/// Extracts the normalized charset declared in the `content-type` header of `response`.
fn find_charset<B>(response: &Response<B>) -> Option<String> {
    let HeaderLookup::Value(value) = HeaderLookup::find(response, CONTENT_TYPE) else {
        return None;
    };
    let mime = value.parse::<mime::Mime>().ok()?;
    let charset = mime.get_param(mime::CHARSET)?.as_str().to_ascii_lowercase();
    if charset == "utf8" { Some("utf-8".to_owned()) } else { Some(charset) }
}

impl<B, M: Matcher<str>> Matcher<Response<B>> for HasCharset<M> {
    fn matches(&self, actual: &Response<B>) -> bool {
        match find_charset(actual) {
            Some(charset) => self.0.matches(&charset),
            None => false,
        }
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("A response with charset ");
        self.0.describe_to(description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        match find_charset(actual) {
            Some(charset) => self.0.describe_mismatch(&charset, description),
            None => {
                description.append("A response without a charset");
            }
        }
    }
}

/// Matcher returned by `is_redirected_to`.
pub struct IsRedirectedTo {
    /// Checks the status code of the redirection.
    status: HasStatusCode,

    /// Checks the target of the redirection.
    location: HasLocation<EqualTo<String>>,
}

/// Matches responses that redirect (with a 302 status code) to `location`.
pub fn is_redirected_to<L: Into<String>>(location: L) -> IsRedirectedTo {
    IsRedirectedTo { status: has_status_code(302), location: has_location(equal_to(location.into())) }
}

impl<B> Matcher<Response<B>> for IsRedirectedTo {
    fn matches(&self, actual: &Response<B>) -> bool {
        self.status.matches(actual) && self.location.matches(actual)
    }

    fn describe_to(&self, description: &mut Description) {
        description.append("A response that was redirected to ");
        Matcher::<str>::describe_to(&self.location.0.matcher, description);
    }

    fn describe_mismatch(&self, actual: &Response<B>, description: &mut Description) {
        if self.status.matches(actual) {
            self.location.describe_mismatch(actual, description);
        } else {
            self.status.describe_mismatch(actual, description);
        }
    }
}
