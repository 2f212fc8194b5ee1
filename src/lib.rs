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

mod interfaces;
/// This module is automatically generated from /resources/*.proto
mod proto_gen;
mod phonenumberutil;
mod asyoutypeformatter;
mod phonenumbermatcher;
mod metadata;
mod regexp_cache;
mod regex_based_matcher;
pub mod i18n;
pub(crate) mod regex_util;

/// I decided to create this module because there are many
/// boilerplate places in the code that can be replaced with macros,
/// the name of which will describe what is happening more
/// clearly than a few lines of code.
mod macros;

pub use interfaces::MetadataSource;
pub use proto_gen::phonemetadata::{
    NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc,
};
pub use proto_gen::phonenumber::{PhoneNumber, phone_number::CountryCodeSource};
pub use regexp_cache::{InvalidRegexError, RegexCache};

pub use phonenumberutil::{
    MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType,
    errors::{
        ExtractNumberError, MetadataError, NotANumberError, ParseError, ValidationError,
    },
    phonenumberutil::PhoneNumberUtil,
};
pub use metadata::{
    MetadataCollection, LazyMetadataSource,
    filter::{MetadataFilter, MetadataFilterError},
};
pub use asyoutypeformatter::AsYouTypeFormatter;
pub use phonenumbermatcher::{
    FindNumbersError, Leniency, PhoneNumberMatch, PhoneNumberMatcher,
};

#[cfg(test)]
mod tests;
