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

use strum::EnumIter;

use crate::{
    PhoneNumber,
    phonenumberutil::{
        MatchType, PhoneNumberFormat, phonenumberutil::PhoneNumberUtil,
    },
    proto_gen::{phonemetadata::NumberFormat, phonenumber::phone_number::CountryCodeSource},
};

use super::matcher_regexps::MATCHER_REGEXPS;

/// Leniency when finding potential phone numbers in text segments. The
/// levels here are ordered in increasing strictness, and each level accepts
/// only a subset of what the previous one accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Leniency {
    /// Phone numbers accepted are possible, but not necessarily valid.
    Possible,
    /// Phone numbers accepted are possible and valid. Numbers written in
    /// national format must have their national-prefix present if it is
    /// usually written for a number of this type.
    Valid,
    /// Phone numbers accepted are valid and are grouped in a possible way for
    /// this locale. For example, a US number written as "65 02 53 00 00" and
    /// "650253 0000" are not accepted at this leniency level, whereas
    /// "650 253 0000", "650 2530000" or "6502530000" are. Numbers with more
    /// than one '/' symbol in the national significant number are also
    /// dropped at this level.
    StrictGrouping,
    /// Phone numbers accepted are valid and are grouped in the same way that
    /// we would have formatted it, or as a single block. For example, a US
    /// number written as "650 2530000" is not accepted at this leniency
    /// level, whereas "650 253 0000" or "6502530000" are.
    ExactGrouping,
}

impl Leniency {
    /// Returns true if `number` is a verified number according to this
    /// leniency. `candidate` is the text the number was parsed from.
    pub(super) fn verify(
        self,
        number: &PhoneNumber,
        candidate: &str,
        phone_util: &PhoneNumberUtil,
    ) -> bool {
        match self {
            Leniency::Possible => phone_util.is_possible_number(number),
            Leniency::Valid => {
                phone_util.is_valid_number(number)
                    && contains_only_valid_x_chars(number, candidate, phone_util)
                    && is_national_prefix_present_if_required(number, phone_util)
            }
            Leniency::StrictGrouping | Leniency::ExactGrouping => {
                if !phone_util.is_valid_number(number)
                    || !contains_only_valid_x_chars(number, candidate, phone_util)
                    || contains_more_than_one_slash_in_national_number(number, candidate)
                    || !is_national_prefix_present_if_required(number, phone_util)
                {
                    return false;
                }
                let check_groups = if self == Leniency::StrictGrouping {
                    all_number_groups_remain_grouped
                } else {
                    all_number_groups_are_exactly_present
                };
                check_number_grouping_is_valid(number, candidate, phone_util, check_groups)
            }
        }
    }
}

type NumberGroupingChecker = fn(&PhoneNumberUtil, &PhoneNumber, &str, &[String]) -> bool;

fn contains_only_valid_x_chars(
    number: &PhoneNumber,
    candidate: &str,
    phone_util: &PhoneNumberUtil,
) -> bool {
    // The characters 'x' and 'X' can be (1) a carrier code, in which case
    // they always precede the national significant number or (2) an
    // extension sign, in which case they always precede the extension
    // number. We assume a carrier code is more than 1 digit, so the first
    // case has to have more than 1 consecutive 'x' or 'X', whereas the
    // second case can only have exactly 1 'x' or 'X'. We ignore the
    // character if it appears as the last character of the string.
    let bytes = candidate.as_bytes();
    let mut index = 0;
    while index + 1 < bytes.len() {
        if matches!(bytes[index], b'x' | b'X') {
            if matches!(bytes[index + 1], b'x' | b'X') {
                // This is the carrier code case, in which the 'X's always
                // precede the national significant number.
                index += 1;
                if phone_util.is_number_match_with_one_string(number, &candidate[index..])
                    != MatchType::NsnMatch
                {
                    return false;
                }
            // This is the extension sign case, in which the 'x' or 'X' should
            // always precede the extension number.
            } else if PhoneNumberUtil::normalize_digits_only(&candidate[index..]) != number.extension() {
                return false;
            }
        }
        index += 1;
    }
    true
}

fn is_national_prefix_present_if_required(number: &PhoneNumber, phone_util: &PhoneNumberUtil) -> bool {
    // First, check how we deduced the country code. If it was written in
    // international format, then the national prefix is not required.
    if number.country_code_source() != CountryCodeSource::FROM_DEFAULT_COUNTRY {
        return true;
    }
    let phone_number_region = phone_util.get_region_code_for_country_code(number.country_code());
    let Some(metadata) = phone_util.get_metadata_for_region(phone_number_region) else {
        return true;
    };
    // Check if a national prefix should be present when formatting this
    // number.
    let national_number = PhoneNumberUtil::get_national_significant_number(number);
    let Some(format_rule) =
        phone_util.choose_formatting_pattern_for_number(&metadata.number_format, &national_number)
    else {
        return true;
    };
    // To do this, we check that a national prefix formatting rule was
    // present and that it wasn't just the first-group symbol ($1) with
    // punctuation.
    let national_prefix_formatting_rule = format_rule.national_prefix_formatting_rule();
    if national_prefix_formatting_rule.is_empty()
        || format_rule.national_prefix_optional_when_formatting()
        || phone_util.formatting_rule_has_first_group_only(national_prefix_formatting_rule)
    {
        // National Prefix not needed for this number.
        return true;
    }
    // Normalize the remainder.
    let raw_input = PhoneNumberUtil::normalize_digits_only(number.raw_input());
    // Check if we found a national prefix and/or carrier code at the start of
    // the raw input, and return the result.
    phone_util
        .maybe_strip_national_prefix_and_carrier_code(&raw_input, metadata)
        .is_some()
}

fn contains_more_than_one_slash_in_national_number(number: &PhoneNumber, candidate: &str) -> bool {
    let Some(first_slash_in_body_index) = candidate.find('/') else {
        // No slashes, this is okay.
        return false;
    };
    // Now look for a second one.
    let after_first_slash = first_slash_in_body_index + 1;
    let Some(second_slash_in_body_index) = candidate[after_first_slash..]
        .find('/')
        .map(|i| i + after_first_slash)
    else {
        // Only one slash, this is okay.
        return false;
    };
    // If the first slash is after the country calling code, this is
    // permitted.
    let candidate_has_country_code = matches!(
        number.country_code_source(),
        CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN
            | CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN
    );
    let mut buf = itoa::Buffer::new();
    if candidate_has_country_code
        && PhoneNumberUtil::normalize_digits_only(&candidate[..first_slash_in_body_index])
            == buf.format(number.country_code())
    {
        // Any more slashes and this is illegal.
        return candidate[second_slash_in_body_index + 1..].contains('/');
    }
    true
}

fn check_number_grouping_is_valid(
    number: &PhoneNumber,
    candidate: &str,
    phone_util: &PhoneNumberUtil,
    checker: NumberGroupingChecker,
) -> bool {
    let normalized_candidate = dec_from_char::normalize_decimals(candidate).to_string();
    let formatted_number_groups = get_national_number_groups(phone_util, number);
    if checker(phone_util, number, &normalized_candidate, &formatted_number_groups) {
        return true;
    }
    // If this didn't pass, see if there are any alternate formats that match,
    // and try them instead.
    let Some(alternate_formats) = phone_util
        .metadata_source()
        .alternate_formats_for_country(number.country_code())
    else {
        return false;
    };
    let national_significant_number = PhoneNumberUtil::get_national_significant_number(number);
    for alternate_format in &alternate_formats.number_format {
        if let Some(leading_digits_pattern) = alternate_format.leading_digits_pattern.first() {
            // There is only one leading digits pattern for alternate formats.
            if !phone_util.regex_matches_start(leading_digits_pattern, &national_significant_number) {
                // Leading digits don't match; try another one.
                continue;
            }
        }
        let formatted_number_groups = get_national_number_groups_for_pattern(
            phone_util,
            &national_significant_number,
            alternate_format,
        );
        if checker(phone_util, number, &normalized_candidate, &formatted_number_groups) {
            return true;
        }
    }
    false
}

/// Helper method to get the national-number part of a number, formatted
/// without any national prefix, and return it as a set of digit blocks that
/// would be formatted together following standard formatting rules.
fn get_national_number_groups(phone_util: &PhoneNumberUtil, number: &PhoneNumber) -> Vec<String> {
    // This will be in the format +CC-DG1-DG2-DGX;ext=EXT where DG1..DGX
    // represents groups of digits.
    let rfc3966_format = phone_util.format(number, PhoneNumberFormat::RFC3966);
    // We remove the extension part from the formatted string before splitting
    // it into different groups.
    let end_index = rfc3966_format.find(';').unwrap_or(rfc3966_format.len());
    // The country-code will have a '-' following it.
    let start_index = rfc3966_format.find('-').map_or(0, |i| i + 1);
    rfc3966_format
        .get(start_index..end_index)
        .unwrap_or_default()
        .split('-')
        .map(ToOwned::to_owned)
        .collect()
}

/// Helper method to get the national-number part of a number, formatted
/// without any national prefix, and return it as a set of digit blocks that
/// should be formatted together according to the formatting pattern passed
/// in.
fn get_national_number_groups_for_pattern(
    phone_util: &PhoneNumberUtil,
    national_significant_number: &str,
    formatting_pattern: &NumberFormat,
) -> Vec<String> {
    // If a format is provided, we format the NSN only, and split that
    // according to the separator.
    phone_util
        .format_nsn_using_pattern(
            national_significant_number,
            formatting_pattern,
            PhoneNumberFormat::RFC3966,
        )
        .split('-')
        .map(ToOwned::to_owned)
        .collect()
}

fn all_number_groups_remain_grouped(
    phone_util: &PhoneNumberUtil,
    number: &PhoneNumber,
    normalized_candidate: &str,
    formatted_number_groups: &[String],
) -> bool {
    let mut from_index = 0;
    if number.country_code_source() != CountryCodeSource::FROM_DEFAULT_COUNTRY {
        // First skip the country code if the normalized candidate contained
        // it.
        let mut buf = itoa::Buffer::new();
        let country_code = buf.format(number.country_code());
        from_index = normalized_candidate
            .find(country_code)
            .map_or(0, |i| i + country_code.len());
    }
    // Check each group of consecutive digits are not broken into separate
    // groupings in the candidate string.
    for (i, group) in formatted_number_groups.iter().enumerate() {
        // Fails if the substring of normalized_candidate starting from
        // from_index doesn't contain the consecutive digits in group.
        let Some(found) = normalized_candidate[from_index..].find(group.as_str()) else {
            return false;
        };
        // Moves from_index forward.
        from_index += found + group.len();
        if i == 0 && from_index < normalized_candidate.len() {
            // We are at the position right after the NDC. We get the region
            // used for formatting information based on the country code in
            // the phone number, rather than the number itself, as we do not
            // need to distinguish between different countries with the same
            // country calling code and this is faster.
            let region = phone_util.get_region_code_for_country_code(number.country_code());
            let next_is_digit = normalized_candidate.as_bytes()[from_index].is_ascii_digit();
            if phone_util.get_ndd_prefix_for_region(region, true).is_some() && next_is_digit {
                // This means there is no formatting symbol after the NDC. In
                // this case, we only accept the number if there is no
                // formatting symbol at all in the number, except for
                // extensions. This is only important for countries with
                // national prefixes.
                let national_significant_number =
                    PhoneNumberUtil::get_national_significant_number(number);
                return normalized_candidate[from_index - group.len()..]
                    .starts_with(national_significant_number.as_str());
            }
        }
    }
    // The check here makes sure that we haven't mistakenly already used the
    // extension to match the last group of the subscriber number. Note the
    // extension cannot have formatting in-between digits.
    normalized_candidate[from_index..].contains(number.extension())
}

fn all_number_groups_are_exactly_present(
    _phone_util: &PhoneNumberUtil,
    number: &PhoneNumber,
    normalized_candidate: &str,
    formatted_number_groups: &[String],
) -> bool {
    let mut candidate_groups: Vec<&str> = MATCHER_REGEXPS.non_digits.split(normalized_candidate).collect();
    // Trailing empty groups carry no digits.
    while candidate_groups.len() > 1 && candidate_groups.last().is_some_and(|g| g.is_empty()) {
        candidate_groups.pop();
    }
    // Set this to the last group, skipping it if the number has an
    // extension.
    let mut candidate_number_group_index =
        candidate_groups.len() as isize - if number.has_extension() { 2 } else { 1 };
    // First we check if the national significant number is formatted as a
    // block. We use contains and not equals, since the national significant
    // number may be present with a prefix such as a national number prefix,
    // or the country code itself.
    let national_significant_number = PhoneNumberUtil::get_national_significant_number(number);
    if candidate_groups.len() == 1
        || group_at(&candidate_groups, candidate_number_group_index)
            .is_some_and(|group| group.contains(&national_significant_number))
    {
        return true;
    }
    // Starting from the end, go through in reverse, excluding the first
    // group, and check the candidate and number groups are the same.
    let mut formatted_number_group_index = formatted_number_groups.len() as isize - 1;
    while formatted_number_group_index > 0 && candidate_number_group_index >= 0 {
        let formatted_group = &formatted_number_groups[formatted_number_group_index as usize];
        if group_at(&candidate_groups, candidate_number_group_index) != Some(formatted_group.as_str()) {
            return false;
        }
        formatted_number_group_index -= 1;
        candidate_number_group_index -= 1;
    }
    // Now check the first group. There may be a national prefix at the start,
    // so we only check that the candidate group ends with the formatted
    // number group.
    match (
        group_at(&candidate_groups, candidate_number_group_index),
        formatted_number_groups.first(),
    ) {
        (Some(candidate_group), Some(first_group)) => candidate_group.ends_with(first_group.as_str()),
        _ => false,
    }
}

fn group_at<'a>(groups: &[&'a str], index: isize) -> Option<&'a str> {
    usize::try_from(index).ok().and_then(|i| groups.get(i).copied())
}
