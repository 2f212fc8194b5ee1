// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use crate::PhoneNumber;

/// A phone number found in text by [`super::PhoneNumberMatcher`].
///
/// Offsets are byte offsets into the searched text, so
/// `&text[m.start()..m.end()] == m.raw_string()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumberMatch {
    start: usize,
    raw_string: String,
    number: PhoneNumber,
}

impl PhoneNumberMatch {
    pub(super) fn new(start: usize, raw_string: &str, number: PhoneNumber) -> Self {
        Self {
            start,
            raw_string: raw_string.to_owned(),
            number,
        }
    }

    /// The phone number matched by the receiver.
    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    /// The start index into the target text.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The exclusive end index into the target text.
    pub fn end(&self) -> usize {
        self.start + self.raw_string.len()
    }

    pub fn len(&self) -> usize {
        self.raw_string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_string.is_empty()
    }

    /// The raw string matched as a phone number in the searched text.
    pub fn raw_string(&self) -> &str {
        &self.raw_string
    }

    pub fn into_number(self) -> PhoneNumber {
        self.number
    }
}

impl fmt::Display for PhoneNumberMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhoneNumberMatch [{},{}) {}",
            self.start,
            self.end(),
            self.raw_string
        )
    }
}
