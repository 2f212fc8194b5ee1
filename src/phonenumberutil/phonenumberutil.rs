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

use std::{borrow::Cow, collections::HashSet, sync::Arc};

use log::{error, trace, warn};
use regex::{NoExpand, Regex};

use super::phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings;
use crate::{
    i18n,
    asyoutypeformatter::AsYouTypeFormatter,
    interfaces::{MatcherApi, MetadataSource},
    macros::owned_from_cow_or,
    metadata::MetadataCollection,
    phonenumbermatcher::{Leniency, PhoneNumberMatcher},
    phonenumberutil::{
        MatchType, NumberLengthType, PhoneNumberFormat, PhoneNumberType,
        errors::{ExtractNumberError, NotANumberError, ParseError, ValidationError},
        helper_constants::{
            DEFAULT_EXTN_PREFIX, FG_STRING, MAX_INPUT_STRING_LENGTH,
            MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, MIN_LENGTH_FOR_NSN, NANPA_COUNTRY_CODE,
            NP_STRING, PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY, RFC3966_EXTN_PREFIX,
            RFC3966_ISDN_SUBADDRESS, RFC3966_PHONE_CONTEXT, RFC3966_PREFIX,
        },
        helper_functions::{
            self, copy_core_fields_only, get_supported_types_for_metadata,
            is_national_number_suffix_of_the_other, normalize_digits, normalize_helper,
            prefix_number_with_country_calling_code, test_number_length_with_unknown_type,
        },
        helper_types::{
            ExtractedCountryCode, PhoneNumberWithCountryCodeSource, StrippedNationalNumber,
        },
    },
    proto_gen::{
        phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
        phonenumber::{PhoneNumber, phone_number::CountryCodeSource},
    },
    regex_based_matcher::RegexBasedMatcher,
    regex_util::{RegexConsume, to_braced_group_refs},
    regexp_cache::{DEFAULT_CACHE_CAPACITY, RegexCache},
};

/// Entry point for parsing, validating and formatting phone numbers against
/// the metadata of a [`MetadataSource`].
pub struct PhoneNumberUtil {
    /// An API for validation checking.
    matcher_api: Box<dyn MatcherApi>,

    /// Helper class holding useful regular expressions and character mappings.
    reg_exps: PhoneNumberRegExpsAndMappings,

    metadata_source: Arc<dyn MetadataSource>,
}

impl PhoneNumberUtil {
    pub fn new(metadata_source: Arc<dyn MetadataSource>) -> Self {
        Self::with_cache_capacity(metadata_source, DEFAULT_CACHE_CAPACITY)
    }

    /// Same as [`PhoneNumberUtil::new`] with a bounded pattern cache of
    /// `capacity` compiled metadata regexes.
    pub fn with_cache_capacity(metadata_source: Arc<dyn MetadataSource>, capacity: usize) -> Self {
        let regexp_cache = Arc::new(RegexCache::with_capacity(capacity));
        Self {
            matcher_api: Box::new(RegexBasedMatcher::new(regexp_cache.clone())),
            reg_exps: PhoneNumberRegExpsAndMappings::new(regexp_cache),
            metadata_source,
        }
    }

    pub fn new_for_metadata(metadata_collection: PhoneMetadataCollection) -> Self {
        Self::new(Arc::new(MetadataCollection::new(metadata_collection)))
    }

    pub(crate) fn metadata_source(&self) -> &dyn MetadataSource {
        self.metadata_source.as_ref()
    }

    // Metadata patterns are data: a pattern which does not compile is logged
    // and treated as not matching.

    pub(crate) fn get_regex(&self, pattern: &str) -> Option<Arc<Regex>> {
        self.reg_exps
            .regexp_cache
            .get_regex(pattern)
            .inspect_err(|err| error!("Invalid metadata regex '{}': {}", pattern, err))
            .ok()
    }

    pub(crate) fn get_regex_at_start(&self, pattern: &str) -> Option<Arc<Regex>> {
        self.reg_exps
            .regexp_cache
            .get_regex_at_start(pattern)
            .inspect_err(|err| error!("Invalid metadata regex '{}': {}", pattern, err))
            .ok()
    }

    pub(crate) fn regex_full_match(&self, pattern: &str, s: &str) -> bool {
        self.reg_exps
            .regexp_cache
            .full_match(pattern, s)
            .unwrap_or_else(|err| {
                error!("Invalid metadata regex '{}': {}", pattern, err);
                false
            })
    }

    pub(crate) fn regex_matches_start(&self, pattern: &str, s: &str) -> bool {
        self.reg_exps
            .regexp_cache
            .matches_start(pattern, s)
            .unwrap_or_else(|err| {
                error!("Invalid metadata regex '{}': {}", pattern, err);
                false
            })
    }

    pub fn get_supported_regions(&self) -> impl Iterator<Item = &str> {
        self.metadata_source
            .country_calling_code_to_region_codes()
            .iter()
            .flat_map(|(_, regions)| regions.iter().map(String::as_str))
            .filter(|region| *region != REGION_CODE_FOR_NON_GEO_ENTITY)
    }

    pub fn get_supported_global_network_calling_codes(&self) -> impl Iterator<Item = i32> {
        self.metadata_source
            .country_calling_code_to_region_codes()
            .iter()
            .filter(|(_, regions)| regions.iter().any(|r| r == REGION_CODE_FOR_NON_GEO_ENTITY))
            .map(|(code, _)| *code)
    }

    pub fn get_supported_calling_codes(&self) -> impl Iterator<Item = i32> {
        self.metadata_source
            .country_calling_code_to_region_codes()
            .iter()
            .map(|(code, _)| *code)
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.get_metadata_for_region(region_code)
            .map(get_supported_types_for_metadata)
            .or_else(|| {
                warn!("Invalid or unknown region code provided: {}", region_code);
                None
            })
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        self.get_metadata_for_non_geographical_region(country_calling_code)
            .map(get_supported_types_for_metadata)
            .or_else(|| {
                warn!(
                    "Unknown country calling code for a non-geographical entity provided: {}",
                    country_calling_code
                );
                None
            })
    }

    pub(crate) fn is_format_eligible_for_as_you_type_formatter(&self, format: &str) -> bool {
        // We require that the first group is present in the output pattern to
        // ensure no data is lost while formatting; when we format as you type,
        // this should always be the case.
        self.reg_exps
            .is_format_eligible_as_you_type_formatting_regex
            .is_match(format)
    }

    pub(crate) fn formatting_rule_has_first_group_only(
        &self,
        national_prefix_formatting_rule: &str,
    ) -> bool {
        national_prefix_formatting_rule.is_empty()
            || self
                .reg_exps
                .formatting_rule_has_first_group_only_regex
                .is_match(national_prefix_formatting_rule)
    }

    /// Returns the national dialling prefix for a specific region. For
    /// example, this would be 1 for the United States, and 0 for New Zealand.
    /// Set `strip_non_digits` to true to strip symbols like "~" (which
    /// indicates a wait for a dialling tone) from the prefix returned.
    /// Returns `None` if no national prefix is present.
    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: &str,
        strip_non_digits: bool,
    ) -> Option<String> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return None;
        };
        let national_prefix = metadata.national_prefix();
        if national_prefix.is_empty() {
            return None;
        }
        if strip_non_digits {
            // Note: if any other non-numeric symbols are ever used in national
            // prefixes, these would have to be removed here as well.
            return Some(national_prefix.replace('~', ""));
        }
        Some(national_prefix.to_owned())
    }

    pub(crate) fn is_valid_region_code(&self, region_code: &str) -> bool {
        self.get_metadata_for_region(region_code).is_some()
    }

    /// Checks if this is a region under the North American Numbering Plan
    /// Administration (NANPA).
    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.get_region_codes_for_country_calling_code(NANPA_COUNTRY_CODE)
            .contains(&region_code)
    }

    pub(crate) fn get_metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.metadata_source.metadata_for_region(region_code)
    }

    pub(crate) fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.metadata_source
            .metadata_for_non_geographical_region(country_calling_code)
    }

    pub(crate) fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<&PhoneMetadata> {
        if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    /// Formats a phone number in the specified format using default rules.
    /// Note that this does not promise to produce a phone number that the user
    /// can dial from where they are, only one that is human readable.
    pub fn format<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        if phone_number.national_number() == 0 {
            let raw_input = phone_number.raw_input();
            if !raw_input.is_empty() {
                // Unparseable numbers that kept their raw input just use that.
                return Cow::Borrowed(raw_input);
            }
        }
        let country_calling_code = phone_number.country_code();
        let mut formatted_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Cow::Owned(formatted_number);
        }

        if number_format == PhoneNumberFormat::E164 {
            // Early exit for E164 case since no formatting of the national number
            // needs to be applied. Extensions are not formatted.
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted_number,
            );
            return Cow::Owned(formatted_number);
        }
        // Note here that all NANPA formatting rules are contained by US, so we use
        // that to format NANPA numbers. The same applies to Russian Fed regions -
        // rules are contained by Russia.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Cow::Owned(formatted_number);
        };
        formatted_number = owned_from_cow_or!(
            self.format_nsn(&formatted_number, metadata, number_format),
            formatted_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, metadata, number_format)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        Cow::Owned(formatted_number)
    }

    /// Gets the national significant number of a phone number. Note a national
    /// significant number doesn't contain a national prefix or any formatting.
    pub fn get_national_significant_number(phone_number: &PhoneNumber) -> String {
        let mut buf = itoa::Buffer::new();
        let national_number = buf.format(phone_number.national_number());
        if !phone_number.italian_leading_zero() {
            return national_number.to_owned();
        }
        // If leading zero(s) have been set, we prefix this now. Note this is not a
        // national prefix. Ensure the number of leading zeros is at least 0 so we
        // don't crash in the case of malicious input.
        let zeros = "0".repeat(phone_number.number_of_leading_zeros().max(0) as usize);
        fast_cat::concat_str!(&zeros, national_number)
    }

    /// Returns the region code that matches the specific country calling code.
    /// In the case of no region code being found, the unknown region code will
    /// be returned.
    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &str {
        self.get_region_codes_for_country_calling_code(country_calling_code)
            .first()
            .copied()
            .unwrap_or(i18n::RegionCode::get_unknown())
    }

    /// Returns the region codes that match the specific country calling code,
    /// main region first. Empty when the calling code is unknown.
    pub fn get_region_codes_for_country_calling_code(
        &self,
        country_calling_code: i32,
    ) -> Vec<&str> {
        let country_calling_code_to_region_codes =
            self.metadata_source.country_calling_code_to_region_codes();
        country_calling_code_to_region_codes
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .map(|index| {
                country_calling_code_to_region_codes[index]
                    .1
                    .iter()
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the country calling code for a specific region. For example,
    /// this would be 1 for the United States, and 64 for New Zealand. Returns
    /// 0 for an unknown or invalid region.
    pub fn get_country_code_for_region(&self, region_code: &str) -> i32 {
        match self.get_metadata_for_region(region_code) {
            Some(metadata) => metadata.country_code(),
            None => {
                warn!("Invalid or unknown region code ({}) provided.", region_code);
                0
            }
        }
    }

    fn format_nsn<'b>(
        &self,
        phone_number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        self.format_nsn_with_carrier(phone_number, metadata, number_format, "")
    }

    fn format_nsn_with_carrier<'b>(
        &self,
        number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        // When the intl_number_formats exists, we use that to format national number
        // for the INTERNATIONAL format instead of using the number_formats.
        let available_formats = if metadata.intl_number_format.is_empty()
            || number_format == PhoneNumberFormat::National
        {
            &metadata.number_format
        } else {
            &metadata.intl_number_format
        };
        match self.choose_formatting_pattern_for_number(available_formats, number) {
            Some(formatting_pattern) => self.format_nsn_using_pattern_with_carrier(
                number,
                formatting_pattern,
                number_format,
                carrier_code,
            ),
            None => Cow::Borrowed(number),
        }
    }

    /// Returns the first format whose last leading digits pattern matches the
    /// beginning of `national_number` and whose pattern matches it entirely.
    pub(crate) fn choose_formatting_pattern_for_number<'b>(
        &self,
        available_formats: &'b [NumberFormat],
        national_number: &str,
    ) -> Option<&'b NumberFormat> {
        available_formats.iter().find(|format| {
            // We always use the last leading_digits_pattern, as it is the most
            // detailed.
            format
                .leading_digits_pattern
                .last()
                .map_or(true, |last| self.regex_matches_start(last, national_number))
                && self.regex_full_match(format.pattern(), national_number)
        })
    }

    // Note that carrier_code is optional - if an empty string, no carrier code
    // replacement will take place.
    fn format_nsn_using_pattern_with_carrier<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        let mut number_format_rule = Cow::Borrowed(formatting_pattern.format());
        let carrier_code_formatting_rule = formatting_pattern.domestic_carrier_code_formatting_rule();
        let national_prefix_formatting_rule = formatting_pattern.national_prefix_formatting_rule();
        if number_format == PhoneNumberFormat::National
            && !carrier_code.is_empty()
            && !carrier_code_formatting_rule.is_empty()
        {
            // Replace the $CC in the formatting rule with the desired carrier code.
            let carrier_code_formatting_rule = self
                .reg_exps
                .carrier_code_pattern
                .replace(carrier_code_formatting_rule, NoExpand(carrier_code));
            number_format_rule = Cow::Owned(
                self.reg_exps
                    .first_group_capturing_pattern
                    .replacen(
                        &number_format_rule,
                        1,
                        &*to_braced_group_refs(&carrier_code_formatting_rule),
                    )
                    .into_owned(),
            );
        } else if number_format == PhoneNumberFormat::National
            && !national_prefix_formatting_rule.is_empty()
        {
            // Apply the national_prefix_formatting_rule as the formatting_pattern
            // contains only information on how the national significant number
            // should be formatted at this point.
            number_format_rule = Cow::Owned(
                self.reg_exps
                    .first_group_capturing_pattern
                    .replacen(
                        &number_format_rule,
                        1,
                        &*to_braced_group_refs(national_prefix_formatting_rule),
                    )
                    .into_owned(),
            );
        }

        let Ok(pattern_to_match) = self
            .reg_exps
            .regexp_cache
            .get_regex_full(formatting_pattern.pattern())
            .inspect_err(|err| error!("Invalid format pattern {}: {}", formatting_pattern.pattern(), err))
        else {
            return Cow::Borrowed(national_number);
        };
        let mut formatted_number = Cow::Owned(
            pattern_to_match
                .replace(national_number, &*to_braced_group_refs(&number_format_rule))
                .into_owned(),
        );

        if number_format == PhoneNumberFormat::RFC3966 {
            // First consume any leading punctuation, if any was present.
            if let Some(rest) = self.reg_exps.separator_pattern.consume_start(&formatted_number) {
                formatted_number = Cow::Owned(rest.to_owned());
            }
            // Then replace all separators with a "-".
            formatted_number = Cow::Owned(
                self.reg_exps
                    .separator_pattern
                    .replace_all(&formatted_number, "-")
                    .into_owned(),
            );
        }
        formatted_number
    }

    /// Simple wrapper of FormatNsnUsingPatternWithCarrier for the common case of
    /// no carrier code.
    pub(crate) fn format_nsn_using_pattern<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        self.format_nsn_using_pattern_with_carrier(
            national_number,
            formatting_pattern,
            number_format,
            "",
        )
    }

    // Returns the formatted extension of a phone number, if the phone number had an
    // extension specified else None.
    fn get_formatted_extension(
        phone_number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Option<String> {
        if !phone_number.has_extension() || phone_number.extension().is_empty() {
            return None;
        }

        let prefix = if number_format == PhoneNumberFormat::RFC3966 {
            RFC3966_EXTN_PREFIX
        } else if metadata.has_preferred_extn_prefix() {
            metadata.preferred_extn_prefix()
        } else {
            DEFAULT_EXTN_PREFIX
        };
        Some(fast_cat::concat_str!(prefix, phone_number.extension()))
    }

    /// Formats a phone number using client-defined formatting rules. Note that
    /// if the phone number has a country calling code of zero or an otherwise
    /// invalid country calling code, we cannot work out things like whether
    /// there should be a national prefix applied, or how to format extensions,
    /// so we return the national significant number with no formatting applied.
    pub fn format_by_pattern(
        &self,
        phone_number: &PhoneNumber,
        number_format: PhoneNumberFormat,
        user_defined_formats: &[NumberFormat],
    ) -> String {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return national_significant_number;
        }
        // Note get_region_code_for_country_code() is used because formatting
        // information for regions which share a country calling code is contained
        // by only one region for performance reasons. For example, for NANPA
        // regions it will be contained in the metadata for US.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };

        let formatting_pattern = self
            .choose_formatting_pattern_for_number(user_defined_formats, &national_significant_number);

        let mut formatted_number = if let Some(formatting_pattern) = formatting_pattern {
            // Before we do a replacement of the national prefix pattern $NP with the
            // national prefix, we need to copy the rule so that subsequent replacements
            // for different numbers have the appropriate national prefix.
            let mut num_format_copy = formatting_pattern.clone();
            let national_prefix_formatting_rule =
                formatting_pattern.national_prefix_formatting_rule();
            if !national_prefix_formatting_rule.is_empty() {
                let national_prefix = metadata.national_prefix();
                if !national_prefix.is_empty() {
                    // Replace $NP with national prefix and $FG with the first group ($1).
                    let rule = national_prefix_formatting_rule
                        .replace(NP_STRING, national_prefix)
                        .replace(FG_STRING, "$1");
                    num_format_copy.set_national_prefix_formatting_rule(rule);
                } else {
                    // We don't want to have a rule for how to format the national prefix if
                    // there isn't one.
                    num_format_copy.clear_national_prefix_formatting_rule();
                }
            }
            self.format_nsn_using_pattern(&national_significant_number, &num_format_copy, number_format)
                .into_owned()
        } else {
            national_significant_number
        };
        if let Some(extension) = Self::get_formatted_extension(phone_number, metadata, number_format) {
            formatted_number.push_str(&extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        formatted_number
    }

    /// Formats a phone number in national format for dialing using the carrier
    /// as specified in the `carrier_code`. The `carrier_code` will always be
    /// used regardless of whether the phone number already has a preferred
    /// domestic carrier code stored. If `carrier_code` contains an empty
    /// string, return the number in national format without any carrier code.
    pub fn format_national_number_with_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        carrier_code: &str,
    ) -> String {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return national_significant_number;
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };

        let mut formatted_number = owned_from_cow_or!(
            self.format_nsn_with_carrier(
                &national_significant_number,
                metadata,
                PhoneNumberFormat::National,
                carrier_code,
            ),
            national_significant_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, metadata, PhoneNumberFormat::National)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            PhoneNumberFormat::National,
            &mut formatted_number,
        );
        formatted_number
    }

    /// Formats a phone number in national format for dialing using the carrier
    /// as specified in the preferred_domestic_carrier_code field of the
    /// PhoneNumber object passed in. If that is missing, use the
    /// `fallback_carrier_code` passed in instead.
    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        fallback_carrier_code: &str,
    ) -> String {
        // Historically, we set this to an empty string when parsing with raw
        // input if none was found in the input string. However, this doesn't
        // result in a number we can dial. For this reason, we treat the empty
        // string the same as if it isn't set at all.
        let carrier_code = if !phone_number.preferred_domestic_carrier_code().is_empty() {
            phone_number.preferred_domestic_carrier_code()
        } else {
            fallback_carrier_code
        };
        self.format_national_number_with_carrier_code(phone_number, carrier_code)
    }

    pub(crate) fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.metadata_source
            .country_calling_code_to_region_codes()
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .is_ok()
    }

    /// Gets the type of a valid phone number.
    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> PhoneNumberType {
        let region_code = self.get_region_code_for_number(phone_number);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
        else {
            return PhoneNumberType::Unknown;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, metadata)
    }

    /// Returns the region where a phone number is from. This could be used for
    /// geocoding at the region level. Only guarantees correct results for valid,
    /// full numbers (not short-codes, or invalid numbers).
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> &str {
        let country_calling_code = phone_number.country_code();
        let region_codes = self.get_region_codes_for_country_calling_code(country_calling_code);
        match region_codes.as_slice() {
            [] => {
                trace!("Missing/invalid country calling code ({})", country_calling_code);
                i18n::RegionCode::get_unknown()
            }
            [region_code] => *region_code,
            _ => self.get_region_code_for_number_from_region_list(phone_number, &region_codes),
        }
    }

    fn get_region_code_for_number_from_region_list<'b>(
        &self,
        phone_number: &PhoneNumber,
        region_codes: &[&'b str],
    ) -> &'b str {
        let national_number = Self::get_national_significant_number(phone_number);
        for code in region_codes {
            // Metadata cannot be missing because the region codes come from the
            // country calling code map.
            let Some(metadata) = self.get_metadata_for_region(code) else {
                continue;
            };
            if metadata.has_leading_digits() {
                if self.regex_matches_start(metadata.leading_digits(), &national_number) {
                    return *code;
                }
            } else if self.get_number_type_helper(&national_number, metadata)
                != PhoneNumberType::Unknown
            {
                return *code;
            }
        }
        i18n::RegionCode::get_unknown()
    }

    fn get_number_type_helper(&self, national_number: &str, metadata: &PhoneMetadata) -> PhoneNumberType {
        if !self.is_number_matching_desc(national_number, &metadata.general_desc) {
            trace!("Number '{national_number}' type unknown - doesn't match general national number pattern");
            return PhoneNumberType::Unknown;
        }
        if self.is_number_matching_desc(national_number, &metadata.premium_rate) {
            trace!("Number '{national_number}' is a premium number.");
            return PhoneNumberType::PremiumRate;
        }
        if self.is_number_matching_desc(national_number, &metadata.toll_free) {
            trace!("Number '{national_number}' is a toll-free number.");
            return PhoneNumberType::TollFree;
        }
        if self.is_number_matching_desc(national_number, &metadata.shared_cost) {
            trace!("Number '{national_number}' is a shared cost number.");
            return PhoneNumberType::SharedCost;
        }
        if self.is_number_matching_desc(national_number, &metadata.voip) {
            trace!("Number '{national_number}' is a VOIP (Voice over IP) number.");
            return PhoneNumberType::VoIP;
        }
        if self.is_number_matching_desc(national_number, &metadata.personal_number) {
            trace!("Number '{national_number}' is a personal number.");
            return PhoneNumberType::PersonalNumber;
        }
        if self.is_number_matching_desc(national_number, &metadata.pager) {
            trace!("Number '{national_number}' is a pager number.");
            return PhoneNumberType::Pager;
        }
        if self.is_number_matching_desc(national_number, &metadata.uan) {
            trace!("Number '{national_number}' is a UAN.");
            return PhoneNumberType::UAN;
        }
        if self.is_number_matching_desc(national_number, &metadata.voicemail) {
            trace!("Number '{national_number}' is a voicemail number.");
            return PhoneNumberType::VoiceMail;
        }

        if self.is_number_matching_desc(national_number, &metadata.fixed_line) {
            if metadata.same_mobile_and_fixed_line_pattern() {
                trace!("Number '{national_number}': fixed-line and mobile patterns equal, number is fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            } else if self.is_number_matching_desc(national_number, &metadata.mobile) {
                trace!("Number '{national_number}': Fixed-line and mobile patterns differ, but number is still fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            }
            trace!("Number '{national_number}' is a fixed line number.");
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if certain
        // that the patterns for mobile and fixed line aren't the same.
        if !metadata.same_mobile_and_fixed_line_pattern()
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            trace!("Number '{national_number}' is a mobile number.");
            return PhoneNumberType::Mobile;
        }
        trace!("Number '{national_number}' type unknown - doesn't match any specific number type pattern.");
        PhoneNumberType::Unknown
    }

    fn is_number_matching_desc(&self, national_number: &str, number_desc: &PhoneNumberDesc) -> bool {
        // Check if any possible number lengths are present; if so, we use them to
        // avoid checking the validation pattern if they don't match. If they are
        // absent, this means they match the general description, which we have
        // already checked before checking a specific number type.
        let actual_length = national_number.len() as i32;
        if !number_desc.possible_length.is_empty()
            && !number_desc.possible_length.contains(&actual_length)
        {
            return false;
        }
        helper_functions::is_match(self.matcher_api.as_ref(), national_number, number_desc)
    }

    /// Tests whether a phone number matches a valid pattern. Note this doesn't
    /// verify the number is actually in use, which is impossible to tell by
    /// just looking at a number itself.
    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> bool {
        let region_code = self.get_region_code_for_number(phone_number);
        self.is_valid_number_for_region(phone_number, region_code)
    }

    /// Tests whether a phone number is valid for a certain region. Note this
    /// doesn't verify the number is actually in use. If the country calling
    /// code is not the same as the country calling code for the region, this
    /// immediately exits with false.
    pub fn is_valid_number_for_region(&self, phone_number: &PhoneNumber, region_code: &str) -> bool {
        let country_code = phone_number.country_code();
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_code, region_code)
        else {
            return false;
        };
        if REGION_CODE_FOR_NON_GEO_ENTITY != region_code
            && country_code != metadata.country_code()
        {
            // Either the region code was invalid, or the country calling code for
            // this number does not match that of the region code.
            return false;
        }
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, metadata) != PhoneNumberType::Unknown
    }

    /// Convenience wrapper around [`PhoneNumberUtil::is_possible_number_with_reason`].
    /// Instead of returning the reason for failure, this method returns true if
    /// the number is either a possible fully-qualified number (containing the
    /// area code and country code), or if the number could be a possible local
    /// number (with a country code, but missing an area code).
    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(phone_number).is_ok()
    }

    /// Checks whether a phone number is a possible number. It provides a more
    /// lenient check than [`PhoneNumberUtil::is_valid_number`]: only the length
    /// of the national significant number is tested against the lengths
    /// known for the region, no pattern is matched.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<NumberLengthType, ValidationError> {
        let national_number = Self::get_national_significant_number(phone_number);
        let country_code = phone_number.country_code();
        // Note: For regions that share a country calling code, like NANPA
        // numbers, we just use the rules from the default region (US in this
        // case) since the get_region_code_for_number will not work if the
        // number is possible but not valid. There is in fact one country calling
        // code (290) where the possible number pattern differs between various
        // regions (Saint Helena and Tristan da Cunha), but this is handled by
        // putting all possible lengths for any country with this country calling
        // code in the metadata for the default region in this case.
        if !self.has_valid_country_calling_code(country_code) {
            return Err(ValidationError::InvalidCountryCode);
        }
        let region_code = self.get_region_code_for_country_code(country_code);
        let metadata = self
            .get_metadata_for_region_or_calling_code(country_code, region_code)
            .ok_or(ValidationError::InvalidCountryCode)?;
        test_number_length_with_unknown_type(&national_number, metadata)
    }

    /// Normalizes a string of characters representing a phone number. This
    /// converts wide-ascii and arabic-indic numerals to European numerals, and
    /// strips punctuation and alpha characters.
    pub fn normalize_digits_only(phone_number: &str) -> String {
        normalize_digits(phone_number)
    }

    /// Normalizes a string of characters representing a phone number. This
    /// strips all characters which are not diallable on a mobile phone keypad
    /// (including all non-ASCII digits).
    pub fn normalize_diallable_chars_only(&self, phone_number: &str) -> String {
        normalize_helper(&self.reg_exps.diallable_char_mappings, true, phone_number)
    }

    /// Converts all alpha characters in a number to their respective digits on
    /// a keypad, but retains existing formatting.
    pub fn convert_alpha_characters_in_number(&self, phone_number: &str) -> String {
        normalize_helper(&self.reg_exps.alpha_phone_mappings, false, phone_number)
    }

    /// Normalizes a string of characters representing a phone number. This
    /// performs the following conversions:
    /// - Punctuation is stripped.
    /// - For ALPHA/VANITY numbers: letters are converted to their numeric
    ///   representation on a telephone keypad. Wide-ascii digits are lost.
    /// - For other numbers: wide-ascii digits are converted to normal ASCII
    ///   (European) digits, Arabic-Indic numerals are converted to European
    ///   numerals, and spurious alpha characters are stripped.
    pub(crate) fn normalize(&self, phone_number: &str) -> String {
        if self.reg_exps.valid_alpha_phone_pattern.is_match(phone_number) {
            normalize_helper(&self.reg_exps.alpha_phone_mappings, true, phone_number)
        } else {
            Self::normalize_digits_only(phone_number)
        }
    }

    /// Checks to see if the string of characters could possibly be a phone
    /// number at all. At the moment, checks to see that the string begins with
    /// at least 2 digits, ignoring any punctuation commonly found in phone
    /// numbers. This method does not require the number to be normalized in
    /// advance - but does assume that leading non-number symbols have been
    /// removed, such as by [`PhoneNumberUtil::extract_possible_number`].
    pub fn is_viable_phone_number(&self, phone_number: &str) -> bool {
        if phone_number.chars().count() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.is_match(phone_number)
    }

    /// Attempts to extract a possible number from the string passed in. This
    /// currently strips all leading characters that cannot be used to start a
    /// phone number. Characters that can be used to start a phone number are
    /// defined in the valid_start_char_pattern. If none of these characters
    /// are found in the number passed in, an error is returned. This function
    /// also attempts to strip off any alternative extensions or endings if two
    /// or more are present, such as in the case of: (530) 583-6985 x302/x2303.
    /// The second extension here makes this actually two phone numbers,
    /// (530) 583-6985 x302 and (530) 583-6985 x2303. We remove the second
    /// extension so that the first number is parsed correctly.
    pub fn extract_possible_number<'b>(
        &self,
        phone_number: &'b str,
    ) -> Result<&'b str, ExtractNumberError> {
        let start = self
            .reg_exps
            .valid_start_char_pattern
            .find(phone_number)
            .ok_or(ExtractNumberError::NoValidStartCharacter)?;
        let mut number = &phone_number[start.start()..];
        // Remove trailing non-alpha non-numerical characters.
        if let Some(trailing) = self.reg_exps.unwanted_end_char_pattern.find(number) {
            number = &number[..trailing.start()];
        }
        // Check for extra numbers at the end.
        if let Some(second_number) = self.reg_exps.second_number_start_pattern.find(number) {
            number = &number[..second_number.start()];
        }
        Ok(number)
    }

    /// Parses a string and returns it as a phone number. This method will
    /// throw out any leading characters which cannot start a phone number, and
    /// any trailing characters that are not alphanumerical or `#`.
    ///
    /// The number is parsed in international format when it starts with a
    /// plus sign or with the international dialling prefix of
    /// `default_region`; otherwise the conventions of `default_region` apply
    /// and it must be a known region.
    pub fn parse(&self, number_to_parse: &str, default_region: &str) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, false, true)
    }

    /// Parses a string like [`PhoneNumberUtil::parse`] and additionally keeps
    /// the raw input, the country code source and the preferred domestic
    /// carrier code.
    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, true, true)
    }

    fn parse_helper(
        &self,
        number_to_parse: &str,
        default_region: &str,
        keep_raw_input: bool,
        check_region: bool,
    ) -> Result<PhoneNumber, ParseError> {
        if number_to_parse.len() > MAX_INPUT_STRING_LENGTH {
            trace!("The string supplied is too long to be a phone number.");
            return Err(ParseError::TooLong);
        }
        let mut national_number = self.build_national_number_for_parsing(number_to_parse)?;

        if !self.is_viable_phone_number(&national_number) {
            trace!("The string supplied did not seem to be a phone number '{}'.", national_number);
            return Err(NotANumberError::NotMatchedValidNumberPattern.into());
        }

        // Check the region supplied is valid, or that the extracted number starts
        // with some sort of + sign so the number's region can be determined.
        if check_region && !self.check_region_for_parsing(&national_number, default_region) {
            trace!("Missing or invalid default country.");
            return Err(ParseError::InvalidCountryCode);
        }
        let mut phone_number = PhoneNumber::new();
        if keep_raw_input {
            phone_number.set_raw_input(number_to_parse.to_owned());
        }
        // Attempt to parse extension first, since it doesn't require
        // region-specific data and we want to have the non-normalised number
        // here.
        if let Some(extension) = self.maybe_strip_extension(&mut national_number) {
            phone_number.set_extension(extension);
        }

        let mut region_metadata = self.get_metadata_for_region(default_region);
        // Check to see if the number is given in international format so we know
        // whether this number is from the default region or not.
        let extracted = match self.maybe_extract_country_code(
            &national_number,
            region_metadata,
            keep_raw_input,
        ) {
            Ok(extracted) => extracted,
            Err(ParseError::InvalidCountryCode) => {
                // Strip the plus-char, and try again.
                let Some(without_plus) =
                    self.reg_exps.plus_chars_pattern.consume_start(&national_number)
                else {
                    return Err(ParseError::InvalidCountryCode);
                };
                let extracted =
                    self.maybe_extract_country_code(without_plus, region_metadata, keep_raw_input)?;
                if extracted.country_code == 0 {
                    return Err(ParseError::InvalidCountryCode);
                }
                extracted
            }
            Err(err) => return Err(err),
        };

        if let Some(country_code_source) = extracted.country_code_source {
            phone_number.set_country_code_source(country_code_source);
        }
        let mut country_code = extracted.country_code;
        let mut normalized_national_number = extracted.national_number;
        if country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(country_code);
            if phone_number_region != default_region {
                // Metadata cannot be missing because the country calling code is
                // valid.
                region_metadata =
                    self.get_metadata_for_region_or_calling_code(country_code, phone_number_region);
            }
        } else {
            // If no extracted country calling code, use the region supplied instead.
            // Note that the national number was already normalized by
            // maybe_extract_country_code.
            normalized_national_number = self.normalize(&national_number);
            if let Some(metadata) = region_metadata {
                country_code = metadata.country_code();
            } else if check_region {
                return Err(ParseError::InvalidCountryCode);
            } else if keep_raw_input {
                phone_number.clear_country_code_source();
            }
        }
        phone_number.set_country_code(country_code);

        if normalized_national_number.len() < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn);
        }

        if let Some(metadata) = region_metadata {
            if let Some(stripped) =
                self.maybe_strip_national_prefix_and_carrier_code(&normalized_national_number, metadata)
            {
                // We require that the NSN remaining after stripping the national
                // prefix and carrier code be long enough to be a possible length
                // for the region. Otherwise, we don't do the stripping, since the
                // original number could be a valid short number.
                let validation_result =
                    test_number_length_with_unknown_type(&stripped.national_number, metadata);
                if !matches!(
                    validation_result,
                    Ok(NumberLengthType::IsPossibleLocalOnly)
                        | Err(ValidationError::TooShort)
                        | Err(ValidationError::InvalidLength)
                ) {
                    normalized_national_number = stripped.national_number;
                    if keep_raw_input {
                        if let Some(carrier_code) = stripped.carrier_code.filter(|c| !c.is_empty()) {
                            phone_number.set_preferred_domestic_carrier_code(carrier_code);
                        }
                    }
                }
            }
        }

        let length_of_national_number = normalized_national_number.len();
        if length_of_national_number < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn);
        }
        if length_of_national_number > MAX_LENGTH_FOR_NSN {
            trace!("The string supplied is too long to be a phone number.");
            return Err(ParseError::TooLong);
        }
        Self::set_italian_leading_zeros(&normalized_national_number, &mut phone_number);
        phone_number.set_national_number(normalized_national_number.parse::<u64>()?);
        Ok(phone_number)
    }

    /// Converts the input into the part that is going to be parsed, handling
    /// the RFC3966 `tel:` syntax and cutting off anything that cannot belong
    /// to the number.
    fn build_national_number_for_parsing(&self, number_to_parse: &str) -> Result<String, ParseError> {
        let mut national_number = if let Some(index_of_phone_context) =
            number_to_parse.find(RFC3966_PHONE_CONTEXT)
        {
            let phone_context = Self::extract_phone_context(number_to_parse, index_of_phone_context);
            if !self.is_phone_context_valid(phone_context) {
                trace!("The phone-context value '{}' is invalid.", phone_context);
                return Err(NotANumberError::InvalidPhoneContext.into());
            }
            let mut national_number = String::with_capacity(number_to_parse.len());
            // If the phone context contains a phone number prefix, we need to
            // capture it, whereas domains will be ignored.
            if phone_context.starts_with(PLUS_SIGN) {
                // Additional parameters might follow the phone context. If so, we
                // will remove them here because the parameters after phone context
                // are not important for parsing the phone number.
                national_number.push_str(phone_context);
            }
            // Now append everything between the "tel:" prefix and the
            // phone-context. This should include the national number, an
            // optional extension or isdn-subaddress component. Note we also
            // handle the case when "tel:" is missing, as we have seen in some
            // of the phone number inputs. In that case, we append everything
            // from the beginning.
            let index_of_national_number = number_to_parse
                .find(RFC3966_PREFIX)
                .map(|index| index + RFC3966_PREFIX.len())
                .filter(|index| *index <= index_of_phone_context)
                .unwrap_or(0);
            national_number.push_str(&number_to_parse[index_of_national_number..index_of_phone_context]);
            national_number
        } else {
            // Extract a possible number from the string passed in (this strips
            // leading characters that could not be the start of a phone number.)
            self.extract_possible_number(number_to_parse)?.to_owned()
        };

        // Delete the isdn-subaddress and everything after it if it is present.
        // Note extension won't appear at the same time with isdn-subaddress
        // according to paragraph 5.3 of the RFC3966 spec.
        if let Some(index_of_isdn) = national_number.find(RFC3966_ISDN_SUBADDRESS) {
            national_number.truncate(index_of_isdn);
        }
        // If both phone context and isdn-subaddress are absent but other
        // parameters are present, the parameters are left in national_number.
        // This is because we are concerned about deleting content from a
        // potential number string when there is no strong evidence that the
        // number is actually written in RFC3966.
        Ok(national_number)
    }

    /// Extracts the value of the phone-context parameter of `number_to_parse`
    /// where `index_of_phone_context` is the index of the parameter name.
    fn extract_phone_context(number_to_parse: &str, index_of_phone_context: usize) -> &str {
        let phone_context_start = index_of_phone_context + RFC3966_PHONE_CONTEXT.len();
        // If phone-context parameter is empty
        if phone_context_start >= number_to_parse.len() {
            return "";
        }
        let phone_context = &number_to_parse[phone_context_start..];
        // If there is no ";" after phone-context parameter, the whole rest is
        // the value.
        match phone_context.find(';') {
            Some(phone_context_end) => &phone_context[..phone_context_end],
            None => phone_context,
        }
    }

    /// Returns whether the value of phone-context is valid: either a
    /// global-number-digits or a domainname, as defined by RFC3966.
    fn is_phone_context_valid(&self, phone_context: &str) -> bool {
        if phone_context.is_empty() {
            return false;
        }
        self.reg_exps.rfc3966_global_number_digits_pattern.is_match(phone_context)
            || self.reg_exps.rfc3966_domainname_pattern.is_match(phone_context)
    }

    /// Checks to see that the region code used is valid, or if it is not
    /// valid, that the number to parse starts with a + symbol so that we can
    /// attempt to infer the region from the number.
    fn check_region_for_parsing(&self, number_to_parse: &str, default_region: &str) -> bool {
        self.is_valid_region_code(default_region)
            || self.reg_exps.plus_chars_pattern.is_match(number_to_parse)
    }

    /// Strips any extension (as in, the part of the number dialled after the
    /// call is connected, usually indicated with extn, ext, x or similar) from
    /// the end of the number, and returns it.
    fn maybe_strip_extension(&self, phone_number: &mut String) -> Option<String> {
        let captures = self.reg_exps.extn_pattern.captures(phone_number)?;
        let extension_start = captures.get(0)?.start();
        // If we find a potential extension, and the number preceding this is a
        // viable number, we assume it is an extension.
        if !self.is_viable_phone_number(&phone_number[..extension_start]) {
            return None;
        }
        // The numbers are captured into groups in the regular expression.
        let extension = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| group.as_str().to_owned())
            .next()?;
        phone_number.truncate(extension_start);
        Some(extension)
    }

    /// Tries to extract a country calling code from a number. Country calling
    /// codes are extracted in the following ways:
    /// - by stripping the international dialing prefix of the region the
    ///   person is dialing from, if this is present in the number, and looking
    ///   at the next digits
    /// - by stripping the '+' sign if present and then looking at the next
    ///   digits
    /// - by comparing the start of the number and the country calling code of
    ///   the default region. If the number is not considered possible for the
    ///   numbering plan of the default region initially, but starts with the
    ///   country calling code of this region, validation will be reattempted
    ///   after stripping this country calling code. If this number is
    ///   considered a possible number, then the first digits will be
    ///   considered the country calling code and removed as such.
    ///
    /// A country calling code of `0` is returned when none was found.
    pub(crate) fn maybe_extract_country_code(
        &self,
        number: &str,
        default_region_metadata: Option<&PhoneMetadata>,
        keep_raw_input: bool,
    ) -> Result<ExtractedCountryCode, ParseError> {
        if number.is_empty() {
            return Ok(ExtractedCountryCode::default());
        }
        // Set the default prefix to be something that will never match if there
        // is no default region.
        let possible_country_idd_prefix = default_region_metadata
            .map(|metadata| metadata.international_prefix())
            .unwrap_or("NonMatch");

        let PhoneNumberWithCountryCodeSource {
            phone_number: full_number,
            country_code_source,
        } = self.maybe_strip_international_prefix_and_normalize(number, possible_country_idd_prefix);
        let kept_country_code_source = keep_raw_input.then_some(country_code_source);

        if country_code_source != CountryCodeSource::FROM_DEFAULT_COUNTRY {
            if full_number.len() <= MIN_LENGTH_FOR_NSN {
                trace!("Phone number had an IDD, but after this was not long enough to be a viable phone number.");
                return Err(ParseError::TooShortAfterIdd);
            }
            let (country_code, national_number) = self.extract_country_code(&full_number);
            if country_code != 0 {
                return Ok(ExtractedCountryCode {
                    country_code,
                    national_number: national_number.to_owned(),
                    country_code_source: kept_country_code_source,
                });
            }
            // If this fails, they must be using a strange country calling code
            // that we don't recognize, or that doesn't exist.
            return Err(ParseError::InvalidCountryCode);
        }

        if let Some(metadata) = default_region_metadata {
            // Check to see if the number starts with the country calling code for
            // the default region. If so, we remove the country calling code, and
            // do some checks on the validity of the number before and after.
            let default_country_code = metadata.country_code();
            let mut buf = itoa::Buffer::new();
            let default_country_code_str = buf.format(default_country_code);
            if let Some(potential_national_number) = full_number.strip_prefix(default_country_code_str) {
                let general_desc = &metadata.general_desc;
                let potential_national_number = self
                    .maybe_strip_national_prefix_and_carrier_code(potential_national_number, metadata)
                    .map(|stripped| stripped.national_number)
                    .unwrap_or_else(|| potential_national_number.to_owned());
                // If the number was not valid before but is valid now, or if it
                // was too long before, we consider the number with the country
                // calling code stripped to be a better result and keep that
                // instead.
                if (!self.matcher_api.match_national_number(&full_number, general_desc, false)
                    && self.matcher_api.match_national_number(
                        &potential_national_number,
                        general_desc,
                        false,
                    ))
                    || test_number_length_with_unknown_type(&full_number, metadata)
                        == Err(ValidationError::TooLong)
                {
                    return Ok(ExtractedCountryCode {
                        country_code: default_country_code,
                        national_number: potential_national_number,
                        country_code_source: keep_raw_input
                            .then_some(CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN),
                    });
                }
            }
        }
        // No country calling code present.
        Ok(ExtractedCountryCode {
            country_code: 0,
            national_number: String::new(),
            country_code_source: kept_country_code_source,
        })
    }

    /// Strips any international prefix (such as +, 00, 011) present in the
    /// number provided, normalizes the resulting number, and indicates if an
    /// international prefix was present.
    ///
    /// `possible_idd_prefix` represents the international direct dialing
    /// prefix from the region we think this number may be dialed in.
    fn maybe_strip_international_prefix_and_normalize(
        &self,
        phone_number: &str,
        possible_idd_prefix: &str,
    ) -> PhoneNumberWithCountryCodeSource {
        if phone_number.is_empty() {
            return PhoneNumberWithCountryCodeSource::new(
                String::new(),
                CountryCodeSource::FROM_DEFAULT_COUNTRY,
            );
        }
        // Check to see if the number begins with one or more plus signs.
        if let Some(rest) = self.reg_exps.plus_chars_pattern.consume_start(phone_number) {
            // Can now normalize the rest of the number since we've consumed the
            // "+" sign at the start.
            return PhoneNumberWithCountryCodeSource::new(
                self.normalize(rest),
                CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN,
            );
        }
        // Attempt to parse the first digits as an international prefix.
        let normalized_number = self.normalize(phone_number);
        if let Some(rest) = self.parse_prefix_as_idd(possible_idd_prefix, &normalized_number) {
            return PhoneNumberWithCountryCodeSource::new(
                rest.to_owned(),
                CountryCodeSource::FROM_NUMBER_WITH_IDD,
            );
        }
        PhoneNumberWithCountryCodeSource::new(normalized_number, CountryCodeSource::FROM_DEFAULT_COUNTRY)
    }

    /// Strips the IDD from the start of the number if present and returns
    /// the rest. Helper function used by
    /// maybe_strip_international_prefix_and_normalize.
    fn parse_prefix_as_idd<'b>(&self, idd_pattern: &str, phone_number: &'b str) -> Option<&'b str> {
        let idd_regex = self.get_regex_at_start(idd_pattern)?;
        let idd_match = idd_regex.find(phone_number)?;
        let rest = &phone_number[idd_match.end()..];
        // Only strip this if the first digit after the match is not a 0, since
        // country calling codes cannot begin with 0.
        if let Some(digit) = self
            .reg_exps
            .capturing_digit_pattern
            .captures(rest)
            .and_then(|captures| captures.get(1))
        {
            if Self::normalize_digits_only(digit.as_str()) == "0" {
                return None;
            }
        }
        Some(rest)
    }

    /// Extracts country calling code from `full_number`, returning it along
    /// with the remaining digits. Leading plus signs are skipped. It assumes
    /// that the leading plus sign or IDD has already been removed. Returns
    /// `(0, full_number)` if `full_number` doesn't start with a valid
    /// country calling code.
    pub fn extract_country_code<'b>(&self, full_number: &'b str) -> (i32, &'b str) {
        let digits = self
            .reg_exps
            .plus_chars_pattern
            .consume_start(full_number)
            .unwrap_or(full_number);
        if digits.is_empty() || digits.starts_with('0') {
            // Country codes do not begin with a '0'.
            return (0, full_number);
        }
        for i in 1..=MAX_LENGTH_COUNTRY_CODE.min(digits.len()) {
            if !digits.is_char_boundary(i) {
                break;
            }
            let Ok(potential_country_code) = digits[..i].parse::<i32>() else {
                break;
            };
            if self.has_valid_country_calling_code(potential_country_code) {
                return (potential_country_code, &digits[i..]);
            }
        }
        (0, full_number)
    }

    /// Strips any national prefix (such as 0, 1) present in the number
    /// provided. Returns `None` when nothing was stripped, because the region
    /// has no national prefix for parsing, the prefix is absent or stripping
    /// it would turn a matching number into a non-matching one.
    pub(crate) fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        phone_number: &str,
        metadata: &PhoneMetadata,
    ) -> Option<StrippedNationalNumber> {
        let possible_national_prefix = metadata.national_prefix_for_parsing();
        if phone_number.is_empty() || possible_national_prefix.is_empty() {
            // Early return for numbers of zero length.
            return None;
        }
        // Attempt to parse the first digits as a national prefix.
        let prefix_regex = self.get_regex_at_start(possible_national_prefix)?;
        let prefix_captures = prefix_regex.captures(phone_number)?;
        let prefix_end = prefix_captures.get(0)?.end();

        let general_desc = &metadata.general_desc;
        // Check if the original number is viable.
        let is_viable_original_number =
            self.matcher_api.match_national_number(phone_number, general_desc, false);
        // prefix_captures.len() includes the whole match, so it is one more
        // than the number of groups in the pattern.
        let num_of_groups = prefix_captures.len() - 1;
        let transform_rule = metadata.national_prefix_transform_rule();
        let last_group = prefix_captures.get(num_of_groups);

        if transform_rule.is_empty() || last_group.is_none() {
            // If the original number was viable, and the resultant number is
            // not, we return.
            let national_number = &phone_number[prefix_end..];
            if is_viable_original_number
                && !self.matcher_api.match_national_number(national_number, general_desc, false)
            {
                return None;
            }
            let carrier_code = (num_of_groups > 0 && last_group.is_some())
                .then(|| prefix_captures.get(1).map(|group| group.as_str().to_owned()))
                .flatten();
            return Some(StrippedNationalNumber {
                national_number: national_number.to_owned(),
                carrier_code,
            });
        }

        // Check that the resultant number is still viable. If not, return.
        // Check this by copying the number and making the transformation on
        // the copy first.
        let transformed_number = prefix_regex
            .replacen(phone_number, 1, &*to_braced_group_refs(transform_rule))
            .into_owned();
        if is_viable_original_number
            && !self.matcher_api.match_national_number(&transformed_number, general_desc, false)
        {
            return None;
        }
        let carrier_code = (num_of_groups > 1)
            .then(|| prefix_captures.get(1).map(|group| group.as_str().to_owned()))
            .flatten();
        Some(StrippedNationalNumber {
            national_number: transformed_number,
            carrier_code,
        })
    }

    /// A helper function to set the values related to leading zeros in a
    /// PhoneNumber.
    fn set_italian_leading_zeros(national_number: &str, phone_number: &mut PhoneNumber) {
        if national_number.len() > 1 && national_number.starts_with('0') {
            phone_number.set_italian_leading_zero(true);
            // Note that if the national number is all "0"s, the last "0" is
            // not counted as a leading zero.
            let number_of_leading_zeros = national_number
                .bytes()
                .take(national_number.len() - 1)
                .take_while(|digit| *digit == b'0')
                .count();
            if number_of_leading_zeros != 1 {
                phone_number.set_number_of_leading_zeros(number_of_leading_zeros as i32);
            }
        }
    }

    /// Takes two phone numbers and compares them for equality. Only the core
    /// fields (calling code, national number, leading zeros and extension)
    /// are compared.
    ///
    /// Returns [`MatchType::ExactMatch`] if the calling codes, NSN, presence of
    /// a leading zero for Italian numbers and any extension present are the
    /// same; [`MatchType::NsnMatch`] if either or both has no calling code
    /// specified, and the NSNs and extensions are the same;
    /// [`MatchType::ShortNsnMatch`] if either or both has no calling code
    /// specified, or the calling code specified is the same, and one NSN could
    /// be a shorter version of the other number. This includes the case where
    /// one has an extension specified, and the other does not.
    pub fn is_number_match(&self, first_number_in: &PhoneNumber, second_number_in: &PhoneNumber) -> MatchType {
        // We only care about the fields that uniquely define a number, so we
        // copy these across explicitly.
        let mut first_number = copy_core_fields_only(first_number_in);
        let second_number = copy_core_fields_only(second_number_in);
        // Early exit if both had extensions and these are different.
        if first_number.has_extension()
            && second_number.has_extension()
            && first_number.extension() != second_number.extension()
        {
            return MatchType::NoMatch;
        }

        let first_number_country_code = first_number.country_code();
        let second_number_country_code = second_number.country_code();
        // Both had country calling code specified.
        if first_number_country_code != 0 && second_number_country_code != 0 {
            if first_number == second_number {
                return MatchType::ExactMatch;
            } else if first_number_country_code == second_number_country_code
                && is_national_number_suffix_of_the_other(&first_number, &second_number)
            {
                // A SHORT_NSN_MATCH occurs if there is a difference because of
                // the presence or absence of an 'Italian leading zero', the
                // presence or absence of an extension, or one NSN being a
                // shorter variant of the other.
                return MatchType::ShortNsnMatch;
            }
            // This is not a match.
            return MatchType::NoMatch;
        }
        // Checks cases where one or both country calling codes were not
        // specified. To make equality checks easier, we first set the
        // country_code fields to be equal.
        first_number.set_country_code(second_number_country_code);
        // If all else was the same, then this is an NSN_MATCH.
        if first_number == second_number {
            return MatchType::NsnMatch;
        }
        if is_national_number_suffix_of_the_other(&first_number, &second_number) {
            return MatchType::ShortNsnMatch;
        }
        MatchType::NoMatch
    }

    /// Takes a phone number and a string and compares them for equality. The
    /// string is parsed without a default region unless that is needed to
    /// make sense of it, in which case the region of `first_number` is used.
    /// [`MatchType::NotANumber`] is returned when the string cannot be parsed.
    pub fn is_number_match_with_one_string(
        &self,
        first_number: &PhoneNumber,
        second_number: &str,
    ) -> MatchType {
        // First see if the second number has an implicit country calling code,
        // by attempting to parse it.
        let second_number_as_proto = match self.parse(second_number, i18n::RegionCode::get_unknown()) {
            Ok(second_number_as_proto) => return self.is_number_match(first_number, &second_number_as_proto),
            Err(ParseError::InvalidCountryCode) => {
                // The second number has no country calling code. EXACT_MATCH is
                // no longer possible. We parse it as if the region was the same
                // as that for the first number, and if EXACT_MATCH is returned,
                // we replace this with NSN_MATCH.
                let first_number_region =
                    self.get_region_code_for_country_code(first_number.country_code());
                if first_number_region != i18n::RegionCode::get_unknown() {
                    let Ok(second_number_with_first_number_region) =
                        self.parse(second_number, first_number_region)
                    else {
                        return MatchType::NotANumber;
                    };
                    let match_type =
                        self.is_number_match(first_number, &second_number_with_first_number_region);
                    if match_type == MatchType::ExactMatch {
                        return MatchType::NsnMatch;
                    }
                    return match_type;
                }
                // If the first number didn't have a valid country calling code,
                // then we parse the second number without one as well.
                self.parse_helper(second_number, i18n::RegionCode::get_unknown(), false, false)
            }
            Err(_) => return MatchType::NotANumber,
        };
        match second_number_as_proto {
            Ok(second_number_as_proto) => self.is_number_match(first_number, &second_number_as_proto),
            Err(_) => MatchType::NotANumber,
        }
    }

    /// Finds phone numbers in `text` which are valid for `default_region` (or
    /// carry their own calling code) at the given `leniency`. At most
    /// `max_tries` candidates are examined.
    pub fn find_numbers<'a>(
        &'a self,
        text: &'a str,
        default_region: &'a str,
        leniency: Leniency,
        max_tries: u64,
    ) -> PhoneNumberMatcher<'a> {
        PhoneNumberMatcher::new(self, text, default_region, leniency, max_tries)
    }

    /// Gets an [`AsYouTypeFormatter`] for the specific region.
    pub fn get_as_you_type_formatter(&self, region_code: &str) -> AsYouTypeFormatter<'_> {
        AsYouTypeFormatter::new(self, region_code)
    }
}
