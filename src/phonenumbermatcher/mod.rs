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

mod leniency;
mod matcher_regexps;
mod phone_number_match;
mod phone_number_matcher;

use thiserror::Error;

pub use leniency::Leniency;
pub use phone_number_match::PhoneNumberMatch;
pub use phone_number_matcher::PhoneNumberMatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FindNumbersError {
    /// A matcher walks its text exactly once.
    #[error("Phone number matchers cannot be reset")]
    ResetUnsupported,
}
