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

use crate::CountryCodeSource;

/// Digits left after an international prefix (plus sign or IDD) was looked
/// for, together with how the number was written.
#[derive(Debug)]
pub struct PhoneNumberWithCountryCodeSource {
    pub phone_number: String,
    pub country_code_source: CountryCodeSource,
}

impl PhoneNumberWithCountryCodeSource {
    pub fn new(phone_number: String, country_code_source: CountryCodeSource) -> Self {
        Self { phone_number, country_code_source }
    }
}

/// Outcome of the country calling code extraction step of parsing.
#[derive(Debug, Default)]
pub struct ExtractedCountryCode {
    /// `0` when no calling code was found in the number.
    pub country_code: i32,
    /// Digits following the calling code. Empty when `country_code` is `0`
    /// and the number was not written in international form.
    pub national_number: String,
    /// Set only when the caller asked to keep raw input.
    pub country_code_source: Option<CountryCodeSource>,
}

/// A national number with its national prefix and carrier code removed.
#[derive(Debug, PartialEq)]
pub struct StrippedNationalNumber {
    pub national_number: String,
    pub carrier_code: Option<String>,
}
