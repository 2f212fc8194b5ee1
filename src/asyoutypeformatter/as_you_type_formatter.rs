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

use std::sync::LazyLock;

use dec_from_char::DecimalExtended;
use log::trace;

use crate::{
    phonenumberutil::{
        helper_constants::{PLUS_CHARS, PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY},
        helper_functions::normalize_digits,
        phonenumberutil::PhoneNumberUtil,
        PhoneNumberFormat,
    },
    proto_gen::phonemetadata::{NumberFormat, PhoneMetadata},
    regex_util::to_braced_group_refs,
};

/// Character used when appropriate to separate a prefix, such as a long NDD
/// or a country calling code, from the national number.
const SEPARATOR_BEFORE_NATIONAL_NUMBER: char = ' ';

/// The digits that have a formatting rule applied to them are replaced by
/// this placeholder in the formatting template.
const DIGIT_PLACEHOLDER: char = '\u{2008}';

/// A phone number of this many nines is long enough to be matched by the
/// pattern of any format, it is used to build formatting templates.
const LONGEST_PHONE_NUMBER: &str = "999999999999999";

/// This is the minimum length of national number accrued that is required to
/// trigger the formatter. The first element of the leading_digits_pattern of
/// each NumberFormat contains a regular expression that matches up to this
/// number of digits.
const MIN_LEADING_DIGITS_LENGTH: usize = 3;

/// Metadata used when the region is unknown: no formats and an
/// international prefix which never matches.
static EMPTY_METADATA: LazyLock<PhoneMetadata> = LazyLock::new(|| {
    let mut metadata = PhoneMetadata::new();
    metadata.set_international_prefix("NA".to_owned());
    metadata
});

/// Formats phone numbers on-the-fly as each digit is entered.
///
/// Obtained from [`PhoneNumberUtil::get_as_you_type_formatter`]. Digits are
/// fed one at a time with [`AsYouTypeFormatter::input_digit`], which returns
/// the partially formatted number. Call [`AsYouTypeFormatter::clear`] before
/// entering a new number.
///
/// Entering anything other than a digit, or a plus sign as the very first
/// character, stops formatting: the raw input is echoed from then on until
/// the formatter is cleared.
pub struct AsYouTypeFormatter<'a> {
    phone_util: &'a PhoneNumberUtil,

    current_output: String,
    formatting_template: String,
    /// The pattern from the metadata which was used to build the current
    /// formatting template.
    current_formatting_pattern: String,
    accrued_input: String,
    accrued_input_without_formatting: String,
    /// This indicates whether AsYouTypeFormatter is currently doing the
    /// formatting.
    able_to_format: bool,
    /// Set to true when users enter their own formatting. AsYouTypeFormatter
    /// will do no formatting at all when this is set to true.
    input_has_formatting: bool,
    /// This is set to true when we know the user is entering a full national
    /// significant number, since we have either detected a national prefix or
    /// an international dialing prefix. When this is true, we will no longer
    /// use local number formatting patterns.
    is_complete_number: bool,
    is_expecting_country_calling_code: bool,

    default_country: String,
    default_metadata: &'a PhoneMetadata,
    current_metadata: &'a PhoneMetadata,

    /// Byte offset into the formatting template of the last digit placed.
    last_match_position: usize,
    /// The position of a digit upon which input_digit_and_remember_position
    /// is most recently invoked, as found in the original sequence of
    /// characters the user entered.
    original_position: usize,
    /// The position of a digit upon which input_digit_and_remember_position
    /// is most recently invoked, as found in accrued_input_without_formatting.
    position_to_remember: usize,
    /// This contains anything that has been entered so far preceding the
    /// national significant number, and it is formatted (e.g. with space
    /// inserted). For example, this can contain IDD, country code, and/or
    /// NDD, etc.
    prefix_before_national_number: String,
    should_add_space_after_national_prefix: bool,
    /// This contains the national prefix that has been extracted. It
    /// contains only digits without formatting.
    extracted_national_prefix: String,
    national_number: String,
    possible_formats: Vec<&'a NumberFormat>,
}

impl<'a> AsYouTypeFormatter<'a> {
    pub(crate) fn new(phone_util: &'a PhoneNumberUtil, region_code: &str) -> Self {
        let default_metadata = Self::get_metadata_for_region(phone_util, region_code);
        Self {
            phone_util,
            current_output: String::new(),
            formatting_template: String::new(),
            current_formatting_pattern: String::new(),
            accrued_input: String::new(),
            accrued_input_without_formatting: String::new(),
            able_to_format: true,
            input_has_formatting: false,
            is_complete_number: false,
            is_expecting_country_calling_code: false,
            default_country: region_code.to_owned(),
            default_metadata,
            current_metadata: default_metadata,
            last_match_position: 0,
            original_position: 0,
            position_to_remember: 0,
            prefix_before_national_number: String::new(),
            should_add_space_after_national_prefix: false,
            extracted_national_prefix: String::new(),
            national_number: String::new(),
            possible_formats: Vec::new(),
        }
    }

    /// The metadata needed by this class is the same for all regions sharing
    /// the same country calling code. Therefore, we return the metadata for
    /// the "main" region for this country calling code.
    fn get_metadata_for_region(phone_util: &'a PhoneNumberUtil, region_code: &str) -> &'a PhoneMetadata {
        let country_calling_code = phone_util.get_country_code_for_region(region_code);
        let main_country = phone_util.get_region_code_for_country_code(country_calling_code);
        match phone_util.get_metadata_for_region(main_country) {
            Some(metadata) => metadata,
            // Set to a default instance of the metadata. This allows us to
            // function with an incorrect region code, even if formatting only
            // works for numbers specified with "+".
            None => &EMPTY_METADATA,
        }
    }

    /// Clears the internal state of the formatter, so it can be reused.
    pub fn clear(&mut self) {
        self.current_output.clear();
        self.accrued_input.clear();
        self.accrued_input_without_formatting.clear();
        self.formatting_template.clear();
        self.last_match_position = 0;
        self.current_formatting_pattern.clear();
        self.prefix_before_national_number.clear();
        self.extracted_national_prefix.clear();
        self.national_number.clear();
        self.able_to_format = true;
        self.input_has_formatting = false;
        self.position_to_remember = 0;
        self.original_position = 0;
        self.is_complete_number = false;
        self.is_expecting_country_calling_code = false;
        self.possible_formats.clear();
        self.should_add_space_after_national_prefix = false;
        self.current_metadata = self.default_metadata;
    }

    /// Formats a phone number on-the-fly as each digit is entered.
    ///
    /// `next_char` is the most recently entered digit of a phone number.
    /// Formatting characters are allowed, but as soon as they are
    /// encountered this method formats the number as entered and not "as you
    /// type" anymore. Full width digits and Arabic-indic digits are allowed,
    /// and will be shown as they are. Returns the partially formatted phone
    /// number.
    pub fn input_digit(&mut self, next_char: char) -> &str {
        self.current_output = self.input_digit_with_option_to_remember_position(next_char, false);
        &self.current_output
    }

    /// Same as [`AsYouTypeFormatter::input_digit`], but remembers the position
    /// where `next_char` is inserted, so that it can be retrieved later by
    /// using [`AsYouTypeFormatter::get_remembered_position`]. The remembered
    /// position will be automatically adjusted if additional formatting
    /// characters are later inserted/removed in front of `next_char`.
    pub fn input_digit_and_remember_position(&mut self, next_char: char) -> &str {
        self.current_output = self.input_digit_with_option_to_remember_position(next_char, true);
        &self.current_output
    }

    /// Returns the current position in the partially formatted phone number
    /// of the character which was previously passed in as the parameter of
    /// [`AsYouTypeFormatter::input_digit_and_remember_position`]. Positions
    /// are counted in characters.
    pub fn get_remembered_position(&self) -> usize {
        if !self.able_to_format {
            return self.original_position;
        }
        let accrued_input_without_formatting = self.accrued_input_without_formatting.as_bytes();
        let mut accrued_input_index = 0;
        let mut current_output_index = 0;
        for current_output_char in self.current_output.chars() {
            if accrued_input_index >= self.position_to_remember {
                break;
            }
            // accrued_input_without_formatting holds only ASCII digits and "+".
            if accrued_input_without_formatting
                .get(accrued_input_index)
                .is_some_and(|c| char::from(*c) == current_output_char)
            {
                accrued_input_index += 1;
            }
            current_output_index += 1;
        }
        current_output_index
    }

    fn input_digit_with_option_to_remember_position(
        &mut self,
        next_char: char,
        remember_position: bool,
    ) -> String {
        self.accrued_input.push(next_char);
        if remember_position {
            self.original_position = self.accrued_input.chars().count();
        }
        // We do formatting on-the-fly only when each character entered is
        // either a digit, or a plus sign (accepted at the start of the number
        // only).
        let mut next_char = next_char;
        if !self.is_digit_or_leading_plus_sign(next_char) {
            self.able_to_format = false;
            self.input_has_formatting = true;
        } else {
            next_char = self.normalize_and_accrue_digits_and_plus_sign(next_char, remember_position);
        }
        if !self.able_to_format {
            // When we are unable to format because of reasons other than that
            // formatting chars have been entered, it can be due to really long
            // IDDs or NDDs. If that is the case, we might be able to do
            // formatting again after extracting them.
            if self.input_has_formatting {
                return self.accrued_input.clone();
            } else if self.attempt_to_extract_idd() {
                if self.attempt_to_extract_country_calling_code() {
                    return self.attempt_to_choose_pattern_with_prefix_extracted();
                }
            } else if self.able_to_extract_longer_ndd() {
                // Add an additional space to separate long NDD and national
                // significant number for readability. We don't set
                // should_add_space_after_national_prefix to true, since we
                // don't want this to change later when we choose formatting
                // templates.
                self.prefix_before_national_number.push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
                return self.attempt_to_choose_pattern_with_prefix_extracted();
            }
            return self.accrued_input.clone();
        }

        // We start to attempt to format only when at least
        // MIN_LEADING_DIGITS_LENGTH digits (the plus sign is counted as a digit
        // as well for this purpose) have been entered.
        match self.accrued_input_without_formatting.len() {
            0..=2 => return self.accrued_input.clone(),
            3 => {
                if self.attempt_to_extract_idd() {
                    self.is_expecting_country_calling_code = true;
                } else {
                    // No IDD or plus sign is found, might be entering in
                    // national format.
                    self.extracted_national_prefix = self.remove_national_prefix_from_national_number();
                    return self.attempt_to_choose_formatting_pattern();
                }
            }
            _ => {}
        }
        if self.is_expecting_country_calling_code {
            if self.attempt_to_extract_country_calling_code() {
                self.is_expecting_country_calling_code = false;
            }
            return fast_cat::concat_str!(&self.prefix_before_national_number, &self.national_number);
        }
        if self.possible_formats.is_empty() {
            return self.attempt_to_choose_formatting_pattern();
        }
        // The formatting patterns are already chosen.
        let temp_national_number = self.input_digit_helper(next_char);
        // See if the accrued digits can be formatted properly already. If not,
        // use the results from input_digit_helper, which does formatting based
        // on the formatting pattern chosen.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits() {
            return formatted_number;
        }
        let national_number = self.national_number.clone();
        self.narrow_down_possible_formats(&national_number);
        if self.maybe_create_new_template() {
            return self.input_accrued_national_number();
        }
        if self.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.accrued_input.clone()
        }
    }

    fn attempt_to_choose_pattern_with_prefix_extracted(&mut self) -> String {
        self.able_to_format = true;
        self.is_expecting_country_calling_code = false;
        self.possible_formats.clear();
        self.last_match_position = 0;
        self.formatting_template.clear();
        self.current_formatting_pattern.clear();
        self.attempt_to_choose_formatting_pattern()
    }

    /// Some national prefixes are a substring of others. If extracting the
    /// shorter NDD doesn't result in a number we can format, we try to see if
    /// we can extract a longer version here.
    fn able_to_extract_longer_ndd(&mut self) -> bool {
        if !self.extracted_national_prefix.is_empty() {
            // Put the extracted NDD back to the national number before
            // attempting to extract a new NDD.
            self.national_number.insert_str(0, &self.extracted_national_prefix);
            // Remove the previously extracted NDD from
            // prefix_before_national_number. We cannot simply set it to empty
            // string because people sometimes incorrectly enter national prefix
            // after the country code, e.g. +44 (0)20-1234-5678.
            if let Some(index_of_previous_ndd) = self
                .prefix_before_national_number
                .rfind(&self.extracted_national_prefix)
            {
                self.prefix_before_national_number.truncate(index_of_previous_ndd);
            }
        }
        let national_prefix = self.remove_national_prefix_from_national_number();
        self.extracted_national_prefix != national_prefix
    }

    fn is_digit_or_leading_plus_sign(&self, next_char: char) -> bool {
        next_char.is_decimal_utf8()
            || (self.accrued_input.chars().count() == 1 && PLUS_CHARS.contains(next_char))
    }

    /// Checks to see if there is an exact pattern match for these digits. If
    /// so, we should use this instead of any other formatting template whose
    /// leading_digits_pattern also matches the input.
    fn attempt_to_format_accrued_digits(&mut self) -> Option<String> {
        for number_format in self.possible_formats.clone() {
            if !self
                .phone_util
                .regex_full_match(number_format.pattern(), &self.national_number)
            {
                continue;
            }
            self.should_add_space_after_national_prefix =
                Self::has_national_prefix_separator(number_format);
            let formatted_number = self.phone_util.format_nsn_using_pattern(
                &self.national_number,
                number_format,
                PhoneNumberFormat::International,
            );
            // Check that we did not remove nor add any extra digits when we
            // matched this formatting pattern. This usually happens after we
            // entered the last digit during AYTF. Eg: In case of MX, we swallow
            // mobile token (1) when formatted but AYTF should retain all the
            // number entered and not change in order to match a format (of same
            // leading digits and length) display in that way.
            let full_output = self.append_national_number(&formatted_number);
            let formatted_number_digits_only =
                self.phone_util.normalize_diallable_chars_only(&full_output);
            if formatted_number_digits_only == self.accrued_input_without_formatting {
                // If it's the same (i.e entered number and format is same), then
                // it's safe to return this in formatted number as nothing is lost
                // / added.
                return Some(full_output);
            }
        }
        None
    }

    /// Combines the national number with any prefix (IDD/+ and country code
    /// or national prefix) that was collected. A space will be inserted
    /// between them if the current formatting template indicates this to be
    /// suitable.
    fn append_national_number(&self, national_number: &str) -> String {
        if self.should_add_space_after_national_prefix
            && self
                .prefix_before_national_number
                .chars()
                .last()
                .is_some_and(|last| last != SEPARATOR_BEFORE_NATIONAL_NUMBER)
        {
            // We want to add a space after the national prefix if the national
            // prefix formatting rule indicates that this would normally be done,
            // with the exception of the case where we already appended a space
            // because the NDD was surprisingly long.
            fast_cat::concat_str!(&self.prefix_before_national_number, " ", national_number)
        } else {
            fast_cat::concat_str!(&self.prefix_before_national_number, national_number)
        }
    }

    /// Attempts to set the formatting template and returns a string which
    /// contains the formatted version of the digits entered so far.
    fn attempt_to_choose_formatting_pattern(&mut self) -> String {
        // We start to attempt to format only when at least
        // MIN_LEADING_DIGITS_LENGTH digits of national number (excluding
        // national prefix) have been entered.
        if self.national_number.len() < MIN_LEADING_DIGITS_LENGTH {
            return self.append_national_number(&self.national_number);
        }
        let leading_digits = self.national_number.clone();
        self.get_available_formats(&leading_digits);
        // See if the accrued digits can be formatted properly already.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits() {
            return formatted_number;
        }
        if self.maybe_create_new_template() {
            self.input_accrued_national_number()
        } else {
            self.accrued_input.clone()
        }
    }

    /// Invokes input_digit_helper on each digit of the national number
    /// accrued, and returns a formatted string in the end.
    fn input_accrued_national_number(&mut self) -> String {
        if self.national_number.is_empty() {
            return self.prefix_before_national_number.clone();
        }
        let mut temp_national_number = String::new();
        for digit in self.national_number.clone().chars() {
            temp_national_number = self.input_digit_helper(digit);
        }
        if self.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.accrued_input.clone()
        }
    }

    /// Returns true if the current country is a NANPA country and the
    /// national number begins with the national prefix.
    fn is_nanpa_number_with_national_prefix(&self) -> bool {
        // For NANPA numbers beginning with 1[2-9], treat the 1 as the national
        // prefix. The reason is that national significant numbers in NANPA
        // always start with [2-9] after the national prefix. Numbers beginning
        // with 1[01] can only be short/emergency numbers, which don't need the
        // national prefix.
        let digits = self.national_number.as_bytes();
        self.current_metadata.country_code() == 1
            && digits.len() > 1
            && digits[0] == b'1'
            && digits[1] != b'0'
            && digits[1] != b'1'
    }

    /// Returns the national prefix extracted, or an empty string if it is not
    /// present.
    fn remove_national_prefix_from_national_number(&mut self) -> String {
        let mut start_of_national_number = 0;
        if self.is_nanpa_number_with_national_prefix() {
            start_of_national_number = 1;
            self.prefix_before_national_number.push('1');
            self.prefix_before_national_number.push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
            self.is_complete_number = true;
        } else if self.current_metadata.has_national_prefix_for_parsing() {
            let prefix_end = self
                .phone_util
                .get_regex_at_start(self.current_metadata.national_prefix_for_parsing())
                .and_then(|regex| regex.find(&self.national_number).map(|m| m.end()));
            // Since some national prefix patterns are entirely optional, check
            // that a national prefix could actually be extracted.
            if let Some(prefix_end) = prefix_end.filter(|end| *end > 0) {
                // When the national prefix is detected, we use international
                // formatting rules instead of national ones, because national
                // formatting rules could contain local formatting rules for
                // numbers entered without area code.
                self.is_complete_number = true;
                start_of_national_number = prefix_end;
                self.prefix_before_national_number
                    .push_str(&self.national_number[..start_of_national_number]);
            }
        }
        let national_prefix: String = self.national_number.drain(..start_of_national_number).collect();
        trace!("Extracted national prefix '{}'", national_prefix);
        national_prefix
    }

    /// Extracts IDD and plus sign to prefix_before_national_number when they
    /// are available, and places the remaining input into national_number.
    ///
    /// Returns true when accrued_input_without_formatting begins with the
    /// plus sign or valid IDD for default_country.
    fn attempt_to_extract_idd(&mut self) -> bool {
        let international_prefix = fast_cat::concat_str!(
            "\\",
            PLUS_SIGN,
            "|",
            self.current_metadata.international_prefix()
        );
        let Some(start_of_country_calling_code) = self
            .phone_util
            .get_regex_at_start(&international_prefix)
            .and_then(|regex| regex.find(&self.accrued_input_without_formatting).map(|m| m.end()))
        else {
            return false;
        };
        self.is_complete_number = true;
        self.national_number.clear();
        self.national_number
            .push_str(&self.accrued_input_without_formatting[start_of_country_calling_code..]);
        self.prefix_before_national_number.clear();
        self.prefix_before_national_number
            .push_str(&self.accrued_input_without_formatting[..start_of_country_calling_code]);
        if !self.accrued_input_without_formatting.starts_with(PLUS_SIGN) {
            self.prefix_before_national_number.push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        }
        true
    }

    /// Extracts the country calling code from the beginning of
    /// national_number to prefix_before_national_number when they are
    /// available, and places the remaining input into national_number.
    ///
    /// Returns true when a valid country calling code can be found.
    fn attempt_to_extract_country_calling_code(&mut self) -> bool {
        if self.national_number.is_empty() {
            return false;
        }
        let (country_code, number_without_country_calling_code) =
            self.phone_util.extract_country_code(&self.national_number);
        if country_code == 0 {
            return false;
        }
        self.national_number = number_without_country_calling_code.to_owned();
        let new_region_code = self.phone_util.get_region_code_for_country_code(country_code);
        if REGION_CODE_FOR_NON_GEO_ENTITY == new_region_code {
            if let Some(metadata) = self
                .phone_util
                .get_metadata_for_non_geographical_region(country_code)
            {
                self.current_metadata = metadata;
            }
        } else if new_region_code != self.default_country {
            self.current_metadata = Self::get_metadata_for_region(self.phone_util, new_region_code);
        }
        let mut buf = itoa::Buffer::new();
        self.prefix_before_national_number.push_str(buf.format(country_code));
        self.prefix_before_national_number.push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        // When we have successfully extracted the IDD, the previously extracted
        // NDD should be cleared because it is no longer valid.
        self.extracted_national_prefix.clear();
        true
    }

    /// Accrues digits and the plus sign to accrued_input_without_formatting
    /// for later use. If next_char contains a digit in non-ASCII format (e.g.
    /// the full-width version of digits), it is first normalized to the ASCII
    /// version. The return value is next_char itself, or its normalized
    /// version, if next_char is a digit in non-ASCII format. This method
    /// assumes its input is either a digit or the plus sign.
    fn normalize_and_accrue_digits_and_plus_sign(
        &mut self,
        next_char: char,
        remember_position: bool,
    ) -> char {
        let normalized_char = if PLUS_CHARS.contains(next_char) {
            self.accrued_input_without_formatting.push_str(PLUS_SIGN);
            '+'
        } else {
            let normalized_char = normalize_digits(next_char.encode_utf8(&mut [0; 4]))
                .chars()
                .next()
                .unwrap_or(next_char);
            self.accrued_input_without_formatting.push(normalized_char);
            self.national_number.push(normalized_char);
            normalized_char
        };
        if remember_position {
            self.position_to_remember = self.accrued_input_without_formatting.len();
        }
        normalized_char
    }

    fn input_digit_helper(&mut self, next_char: char) -> String {
        // Note that formatting_template is not guaranteed to have a value, it
        // could be empty, e.g. when the next digit is entered after extracting
        // an IDD or NDD.
        let placeholder_position = self
            .formatting_template
            .get(self.last_match_position..)
            .and_then(|rest| rest.find(DIGIT_PLACEHOLDER))
            .map(|offset| offset + self.last_match_position);
        match placeholder_position {
            Some(position) => {
                let mut buf = [0; 4];
                self.formatting_template.replace_range(
                    position..position + DIGIT_PLACEHOLDER.len_utf8(),
                    next_char.encode_utf8(&mut buf),
                );
                self.last_match_position = position;
                self.formatting_template[..position + next_char.len_utf8()].to_owned()
            }
            None => {
                if self.possible_formats.len() == 1 {
                    // More digits are entered than we could handle, and there
                    // are no other valid patterns to try.
                    self.able_to_format = false;
                } // else, we just reset the formatting pattern.
                self.current_formatting_pattern.clear();
                self.accrued_input.clone()
            }
        }
    }

    fn get_available_formats(&mut self, leading_digits: &str) {
        // First decide whether we should use international or national number
        // rules.
        let is_international_number =
            self.is_complete_number && self.extracted_national_prefix.is_empty();
        let metadata = self.current_metadata;
        let format_list = if is_international_number && !metadata.intl_number_format.is_empty() {
            &metadata.intl_number_format
        } else {
            &metadata.number_format
        };
        for format in format_list {
            let first_group_only = self
                .phone_util
                .formatting_rule_has_first_group_only(format.national_prefix_formatting_rule());
            // Discard a few formats that we know are not relevant based on the
            // presence of the national prefix.
            if !self.extracted_national_prefix.is_empty()
                && first_group_only
                && !format.national_prefix_optional_when_formatting()
                && !format.has_domestic_carrier_code_formatting_rule()
            {
                // If it is a national number that had a national prefix, any
                // rules that aren't valid with a national prefix should be
                // excluded. A rule that has a carrier-code formatting rule is
                // kept since the national prefix might actually be an extracted
                // carrier code - we don't distinguish between these when
                // extracting it in the AYTF.
                continue;
            } else if self.extracted_national_prefix.is_empty()
                && !self.is_complete_number
                && !first_group_only
                && !format.national_prefix_optional_when_formatting()
            {
                // This number was entered without a national prefix, and this
                // formatting rule requires one, so we discard it.
                continue;
            }
            if self
                .phone_util
                .is_format_eligible_for_as_you_type_formatter(format.format())
            {
                self.possible_formats.push(format);
            }
        }
        self.narrow_down_possible_formats(leading_digits);
    }

    fn narrow_down_possible_formats(&mut self, leading_digits: &str) {
        let index_of_leading_digits_pattern =
            leading_digits.len().saturating_sub(MIN_LEADING_DIGITS_LENGTH);
        let phone_util = self.phone_util;
        self.possible_formats.retain(|format| {
            let Some(last_leading_digits_pattern) = format.leading_digits_pattern.len().checked_sub(1)
            else {
                // Keep everything that isn't restricted by leading digits.
                return true;
            };
            let pattern_index = index_of_leading_digits_pattern.min(last_leading_digits_pattern);
            phone_util.regex_matches_start(&format.leading_digits_pattern[pattern_index], leading_digits)
        });
    }

    fn maybe_create_new_template(&mut self) -> bool {
        // When there are multiple available formats, the formatter uses the
        // first format where a formatting template could be created.
        while let Some(number_format) = self.possible_formats.first().copied() {
            let pattern = number_format.pattern();
            if self.current_formatting_pattern == pattern {
                return false;
            }
            if self.create_formatting_template(number_format) {
                self.current_formatting_pattern = pattern.to_owned();
                self.should_add_space_after_national_prefix =
                    Self::has_national_prefix_separator(number_format);
                // With a new formatting template, the matched position using
                // the old template needs to be reset.
                self.last_match_position = 0;
                return true;
            }
            // Remove the current number format from possible_formats.
            self.possible_formats.remove(0);
        }
        self.able_to_format = false;
        false
    }

    fn has_national_prefix_separator(number_format: &NumberFormat) -> bool {
        number_format
            .national_prefix_formatting_rule()
            .contains(['-', ' '])
    }

    fn create_formatting_template(&mut self, format: &NumberFormat) -> bool {
        self.formatting_template.clear();
        match self.get_formatting_template(format.pattern(), format.format()) {
            Some(template) => {
                self.formatting_template = template;
                true
            }
            None => false,
        }
    }

    /// Gets a formatting template which can be used to efficiently format a
    /// partial number where digits are added one by one.
    fn get_formatting_template(&self, number_pattern: &str, number_format: &str) -> Option<String> {
        // Creates a phone number consisting only of the digit 9 that matches the
        // number_pattern by applying the pattern to the longest_phone_number
        // string.
        let regex = self.phone_util.get_regex(number_pattern)?;
        let a_phone_number = regex.find(LONGEST_PHONE_NUMBER)?.as_str();
        // No formatting template can be created if the number of digits entered
        // so far is longer than the maximum the current formatting rule can
        // accommodate.
        if a_phone_number.len() < self.national_number.len() {
            return None;
        }
        // Formats the number according to number_format.
        let template = regex.replace_all(
            a_phone_number,
            &*to_braced_group_refs(number_format),
        );
        // Replaces each digit with character DIGIT_PLACEHOLDER.
        let template = template.replace('9', &DIGIT_PLACEHOLDER.to_string());
        (!template.is_empty()).then_some(template)
    }
}

impl std::fmt::Debug for AsYouTypeFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsYouTypeFormatter")
            .field("default_country", &self.default_country)
            .field("accrued_input", &self.accrued_input)
            .field("current_output", &self.current_output)
            .field("able_to_format", &self.able_to_format)
            .finish()
    }
}

