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

use std::collections::HashSet;

use super::{get_phone_util, region_code::RegionCode};
use crate::{
    CountryCodeSource, ExtractNumberError, MatchType, NotANumberError, NumberFormat,
    NumberLengthType, ParseError, PhoneNumber, PhoneNumberFormat, PhoneNumberType,
    PhoneNumberUtil, ValidationError,
};

fn number(country_code: i32, national_number: u64) -> PhoneNumber {
    let mut phone_number = PhoneNumber::new();
    phone_number.set_country_code(country_code);
    phone_number.set_national_number(national_number);
    phone_number
}

fn us_number() -> PhoneNumber {
    number(1, 6502530000)
}

fn gb_number() -> PhoneNumber {
    number(44, 2070313000)
}

fn it_number() -> PhoneNumber {
    let mut phone_number = number(39, 236618300);
    phone_number.set_italian_leading_zero(true);
    phone_number
}

#[test]
fn get_supported_regions() {
    let phone_util = get_phone_util();
    let regions: HashSet<&str> = phone_util.get_supported_regions().collect();
    let expected: HashSet<&str> = [
        RegionCode::us(),
        RegionCode::bs(),
        RegionCode::gb(),
        RegionCode::it(),
        RegionCode::au(),
        RegionCode::de(),
    ]
    .into_iter()
    .collect();
    assert_eq!(regions, expected);
}

#[test]
fn get_supported_calling_codes() {
    let phone_util = get_phone_util();
    let calling_codes: Vec<i32> = phone_util.get_supported_calling_codes().collect();
    assert_eq!(calling_codes, vec![1, 39, 44, 49, 61, 800]);
    let global_network: Vec<i32> = phone_util
        .get_supported_global_network_calling_codes()
        .collect();
    assert_eq!(global_network, vec![800]);
}

#[test]
fn get_supported_types() {
    let phone_util = get_phone_util();
    let us_types = phone_util
        .get_supported_types_for_region(RegionCode::us())
        .unwrap();
    assert!(us_types.contains(&PhoneNumberType::TollFree));
    assert!(us_types.contains(&PhoneNumberType::PremiumRate));
    // Convenience and non-types are never reported.
    assert!(!us_types.contains(&PhoneNumberType::FixedLineOrMobile));
    assert!(!us_types.contains(&PhoneNumberType::Unknown));
    assert!(phone_util.get_supported_types_for_region(RegionCode::fr()).is_none());

    let toll_free_types = phone_util.get_supported_types_for_non_geo_entity(800).unwrap();
    assert!(toll_free_types.contains(&PhoneNumberType::TollFree));
    assert!(phone_util.get_supported_types_for_non_geo_entity(979).is_none());
}

#[test]
fn region_and_calling_code_lookups() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.get_region_code_for_country_code(1), RegionCode::us());
    assert_eq!(phone_util.get_region_code_for_country_code(44), RegionCode::gb());
    assert_eq!(phone_util.get_region_code_for_country_code(800), RegionCode::un001());
    assert_eq!(phone_util.get_region_code_for_country_code(2), RegionCode::zz());

    assert_eq!(
        phone_util.get_region_codes_for_country_calling_code(1),
        vec![RegionCode::us(), RegionCode::bs()]
    );
    assert!(phone_util.get_region_codes_for_country_calling_code(2).is_empty());

    assert_eq!(phone_util.get_country_code_for_region(RegionCode::gb()), 44);
    assert_eq!(phone_util.get_country_code_for_region(RegionCode::fr()), 0);
    assert_eq!(phone_util.get_country_code_for_region(RegionCode::un001()), 0);

    assert!(phone_util.is_nanpa_country(RegionCode::us()));
    assert!(phone_util.is_nanpa_country(RegionCode::bs()));
    assert!(!phone_util.is_nanpa_country(RegionCode::gb()));
    assert!(!phone_util.is_nanpa_country(RegionCode::zz()));
}

#[test]
fn get_ndd_prefix_for_region() {
    let phone_util = get_phone_util();
    assert_eq!(
        phone_util.get_ndd_prefix_for_region(RegionCode::us(), false),
        Some("1".to_owned())
    );
    assert_eq!(
        phone_util.get_ndd_prefix_for_region(RegionCode::gb(), true),
        Some("0".to_owned())
    );
    // Italy has no national prefix.
    assert_eq!(phone_util.get_ndd_prefix_for_region(RegionCode::it(), false), None);
    assert_eq!(phone_util.get_ndd_prefix_for_region(RegionCode::fr(), false), None);
}

#[test]
fn get_national_significant_number() {
    assert_eq!(
        PhoneNumberUtil::get_national_significant_number(&us_number()),
        "6502530000"
    );
    assert_eq!(
        PhoneNumberUtil::get_national_significant_number(&it_number()),
        "0236618300"
    );
    let mut many_zeros = number(39, 12);
    many_zeros.set_italian_leading_zero(true);
    many_zeros.set_number_of_leading_zeros(3);
    assert_eq!(
        PhoneNumberUtil::get_national_significant_number(&many_zeros),
        "00012"
    );
}

#[test]
fn format_us_number() {
    let phone_util = get_phone_util();
    let us_number = us_number();
    assert_eq!(phone_util.format(&us_number, PhoneNumberFormat::National), "650 253 0000");
    assert_eq!(
        phone_util.format(&us_number, PhoneNumberFormat::International),
        "+1 650 253 0000"
    );
    assert_eq!(phone_util.format(&us_number, PhoneNumberFormat::E164), "+16502530000");
    assert_eq!(
        phone_util.format(&us_number, PhoneNumberFormat::RFC3966),
        "tel:+1-650-253-0000"
    );

    let toll_free = number(1, 8002530000);
    assert_eq!(phone_util.format(&toll_free, PhoneNumberFormat::National), "800 253 0000");
}

#[test]
fn format_gb_number() {
    let phone_util = get_phone_util();
    let gb_number = gb_number();
    assert_eq!(phone_util.format(&gb_number, PhoneNumberFormat::National), "(020) 7031 3000");
    assert_eq!(
        phone_util.format(&gb_number, PhoneNumberFormat::International),
        "+44 20 7031 3000"
    );
    assert_eq!(phone_util.format(&gb_number, PhoneNumberFormat::E164), "+442070313000");

    let gb_mobile = number(44, 7912345678);
    assert_eq!(phone_util.format(&gb_mobile, PhoneNumberFormat::National), "(07912) 345 678");
    assert_eq!(
        phone_util.format(&gb_mobile, PhoneNumberFormat::International),
        "+44 7912 345 678"
    );
}

#[test]
fn format_numbers_with_leading_zero_and_national_prefix() {
    let phone_util = get_phone_util();
    let it_number = it_number();
    assert_eq!(phone_util.format(&it_number, PhoneNumberFormat::National), "02 3661 8300");
    assert_eq!(
        phone_util.format(&it_number, PhoneNumberFormat::International),
        "+39 02 3661 8300"
    );
    assert_eq!(phone_util.format(&it_number, PhoneNumberFormat::E164), "+390236618300");

    let de_number = number(49, 3012345678);
    assert_eq!(phone_util.format(&de_number, PhoneNumberFormat::National), "030 1234 5678");
    assert_eq!(
        phone_util.format(&de_number, PhoneNumberFormat::International),
        "+49 30 1234 5678"
    );

    let au_number = number(61, 236618300);
    assert_eq!(phone_util.format(&au_number, PhoneNumberFormat::National), "(02) 3661 8300");
    let au_mobile = number(61, 412345678);
    assert_eq!(phone_util.format(&au_mobile, PhoneNumberFormat::National), "0412 345 678");
    // The rule of the freephone range carries the first group only.
    let au_toll_free = number(61, 1800123456);
    assert_eq!(phone_util.format(&au_toll_free, PhoneNumberFormat::National), "1800 123 456");
}

#[test]
fn format_non_geographical_number() {
    let phone_util = get_phone_util();
    let toll_free = number(800, 12345678);
    assert_eq!(
        phone_util.format(&toll_free, PhoneNumberFormat::International),
        "+800 1234 5678"
    );
    assert_eq!(phone_util.format(&toll_free, PhoneNumberFormat::E164), "+80012345678");
}

#[test]
fn format_with_extension() {
    let phone_util = get_phone_util();
    let mut gb_number = gb_number();
    gb_number.set_extension("1234".to_owned());
    assert_eq!(
        phone_util.format(&gb_number, PhoneNumberFormat::National),
        "(020) 7031 3000 ext. 1234"
    );
    assert_eq!(
        phone_util.format(&gb_number, PhoneNumberFormat::RFC3966),
        "tel:+44-20-7031-3000;ext=1234"
    );
    // E164 never carries the extension.
    assert_eq!(phone_util.format(&gb_number, PhoneNumberFormat::E164), "+442070313000");

    let mut us_number = us_number();
    us_number.set_extension("4567".to_owned());
    assert_eq!(
        phone_util.format(&us_number, PhoneNumberFormat::International),
        "+1 650 253 0000 extn. 4567"
    );
}

#[test]
fn format_unknown_calling_code_and_raw_input() {
    let phone_util = get_phone_util();
    let unknown = number(2, 12345);
    assert_eq!(phone_util.format(&unknown, PhoneNumberFormat::International), "12345");
    assert_eq!(phone_util.format(&unknown, PhoneNumberFormat::E164), "12345");

    let mut unparsed = PhoneNumber::new();
    unparsed.set_country_code(1);
    unparsed.set_raw_input("an unparseable number".to_owned());
    assert_eq!(
        phone_util.format(&unparsed, PhoneNumberFormat::National),
        "an unparseable number"
    );
}

#[test]
fn format_by_pattern() {
    let phone_util = get_phone_util();
    let mut number_format = NumberFormat::new();
    number_format.set_pattern("(\\d{3})(\\d{3})(\\d{4})".to_owned());
    number_format.set_format("($1) $2-$3".to_owned());
    let formats = vec![number_format];

    assert_eq!(
        phone_util.format_by_pattern(&us_number(), PhoneNumberFormat::National, &formats),
        "(650) 253-0000"
    );
    assert_eq!(
        phone_util.format_by_pattern(&us_number(), PhoneNumberFormat::International, &formats),
        "+1 (650) 253-0000"
    );

    let mut with_prefix_rule = formats[0].clone();
    with_prefix_rule.set_format("$1 $2-$3".to_owned());
    with_prefix_rule.set_national_prefix_formatting_rule("$NP ($FG)".to_owned());
    assert_eq!(
        phone_util.format_by_pattern(&us_number(), PhoneNumberFormat::National, &[with_prefix_rule]),
        "1 (650) 253-0000"
    );

    // Nothing matches, so the digits come back unformatted.
    assert_eq!(
        phone_util.format_by_pattern(&gb_number(), PhoneNumberFormat::National, &formats),
        "2070313000"
    );
}

#[test]
fn format_with_carrier_code() {
    let phone_util = get_phone_util();
    let gb_number = gb_number();
    // No domestic carrier rule exists, so the carrier code is dropped.
    assert_eq!(
        phone_util.format_national_number_with_carrier_code(&gb_number, "15"),
        "(020) 7031 3000"
    );
    assert_eq!(
        phone_util.format_national_number_with_preferred_carrier_code(&gb_number, "15"),
        "(020) 7031 3000"
    );
    assert_eq!(
        phone_util.format_national_number_with_carrier_code(&number(2, 12345), "15"),
        "12345"
    );
}

#[test]
fn is_valid_number() {
    let phone_util = get_phone_util();
    assert!(phone_util.is_valid_number(&us_number()));
    assert!(phone_util.is_valid_number(&gb_number()));
    assert!(phone_util.is_valid_number(&it_number()));
    assert!(phone_util.is_valid_number(&number(800, 12345678)));
    assert!(phone_util.is_valid_number(&number(1, 2423570000)));

    assert!(!phone_util.is_valid_number(&number(1, 2530000)));
    assert!(!phone_util.is_valid_number(&number(44, 791234567)));
    assert!(!phone_util.is_valid_number(&number(2, 2530000)));
    // Without the leading zero this is not an Italian number.
    assert!(!phone_util.is_valid_number(&number(39, 236618300)));
}

#[test]
fn is_valid_number_for_region() {
    let phone_util = get_phone_util();
    let bs_number = number(1, 2423570000);
    assert!(phone_util.is_valid_number_for_region(&bs_number, RegionCode::bs()));
    assert!(!phone_util.is_valid_number_for_region(&bs_number, RegionCode::us()));
    assert!(!phone_util.is_valid_number_for_region(&us_number(), RegionCode::gb()));
    assert!(!phone_util.is_valid_number_for_region(&us_number(), RegionCode::fr()));
    assert!(phone_util.is_valid_number_for_region(&number(800, 12345678), RegionCode::un001()));
}

#[test]
fn get_region_code_for_number() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.get_region_code_for_number(&us_number()), RegionCode::us());
    assert_eq!(
        phone_util.get_region_code_for_number(&number(1, 2423570000)),
        RegionCode::bs()
    );
    assert_eq!(phone_util.get_region_code_for_number(&gb_number()), RegionCode::gb());
    assert_eq!(
        phone_util.get_region_code_for_number(&number(800, 12345678)),
        RegionCode::un001()
    );
    assert_eq!(phone_util.get_region_code_for_number(&number(2, 12345)), RegionCode::zz());
}

#[test]
fn get_number_type() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.get_number_type(&us_number()), PhoneNumberType::FixedLineOrMobile);
    assert_eq!(phone_util.get_number_type(&number(1, 8002530000)), PhoneNumberType::TollFree);
    assert_eq!(phone_util.get_number_type(&number(1, 9002530000)), PhoneNumberType::PremiumRate);
    assert_eq!(phone_util.get_number_type(&gb_number()), PhoneNumberType::FixedLine);
    assert_eq!(phone_util.get_number_type(&number(44, 7912345678)), PhoneNumberType::Mobile);
    assert_eq!(phone_util.get_number_type(&number(44, 9012345678)), PhoneNumberType::PremiumRate);
    assert_eq!(phone_util.get_number_type(&number(39, 312345678)), PhoneNumberType::Mobile);
    assert_eq!(phone_util.get_number_type(&number(800, 12345678)), PhoneNumberType::TollFree);
    assert_eq!(phone_util.get_number_type(&number(49, 3012345678)), PhoneNumberType::FixedLine);
    assert_eq!(phone_util.get_number_type(&number(1, 2530000)), PhoneNumberType::Unknown);
    assert_eq!(phone_util.get_number_type(&number(2, 2530000)), PhoneNumberType::Unknown);
}

#[test]
fn is_possible_number_with_reason() {
    let phone_util = get_phone_util();
    assert_eq!(
        phone_util.is_possible_number_with_reason(&us_number()),
        Ok(NumberLengthType::IsPossible)
    );
    assert_eq!(
        phone_util.is_possible_number_with_reason(&number(1, 2530000)),
        Ok(NumberLengthType::IsPossibleLocalOnly)
    );
    assert_eq!(
        phone_util.is_possible_number_with_reason(&number(1, 253000)),
        Err(ValidationError::TooShort)
    );
    assert_eq!(
        phone_util.is_possible_number_with_reason(&number(1, 65025300001)),
        Err(ValidationError::TooLong)
    );
    assert_eq!(
        phone_util.is_possible_number_with_reason(&number(39, 1234567)),
        Err(ValidationError::InvalidLength)
    );
    assert_eq!(
        phone_util.is_possible_number_with_reason(&number(2, 6502530000)),
        Err(ValidationError::InvalidCountryCode)
    );

    assert!(phone_util.is_possible_number(&number(1, 2530000)));
    assert!(!phone_util.is_possible_number(&number(49, 12345)));
}

#[test]
fn normalization_helpers() {
    let phone_util = get_phone_util();
    assert_eq!(PhoneNumberUtil::normalize_digits_only("034-56&+a#234"), "03456234");
    assert_eq!(PhoneNumberUtil::normalize_digits_only("\u{FF11}\u{FF12}3"), "123");
    assert_eq!(
        phone_util.normalize_diallable_chars_only("03*4-56&+1a#234"),
        "03*456+1#234"
    );
    assert_eq!(
        phone_util.convert_alpha_characters_in_number("1800-ABC-DEF"),
        "1800-222-333"
    );
    assert_eq!(phone_util.normalize("034-I-am-HUNGRY"), "034426486479");
    assert_eq!(phone_util.normalize("1\u{FF12}3-4"), "1234");
}

#[test]
fn is_viable_phone_number() {
    let phone_util = get_phone_util();
    assert!(!phone_util.is_viable_phone_number("1"));
    assert!(phone_util.is_viable_phone_number("12"));
    assert!(!phone_util.is_viable_phone_number("1+1+1"));
    assert!(phone_util.is_viable_phone_number("0800-4-PIZZA"));
    assert!(phone_util.is_viable_phone_number("+1 650 253 0000"));
}

#[test]
fn extract_possible_number() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.extract_possible_number("Tel:0800-345-600"), Ok("0800-345-600"));
    assert_eq!(phone_util.extract_possible_number("Num-\u{FF11}\u{FF12}3"), Ok("\u{FF11}\u{FF12}3"));
    assert_eq!(phone_util.extract_possible_number("Tel:+800-345-600!!"), Ok("+800-345-600"));
    assert_eq!(
        phone_util.extract_possible_number("(530) 583-6985 x302/x2303"),
        Ok("530) 583-6985 x302")
    );
    assert_eq!(
        phone_util.extract_possible_number("Num-...."),
        Err(ExtractNumberError::NoValidStartCharacter)
    );
}

#[test]
fn extract_country_code() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.extract_country_code("16502530000"), (1, "6502530000"));
    assert_eq!(phone_util.extract_country_code("+442070313000"), (44, "2070313000"));
    assert_eq!(phone_util.extract_country_code("80012345678"), (800, "12345678"));
    assert_eq!(phone_util.extract_country_code("0123"), (0, "0123"));
    assert_eq!(phone_util.extract_country_code("2123"), (0, "2123"));
}

#[test]
fn parse_national_numbers() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.parse("650 253 0000", RegionCode::us()), Ok(us_number()));
    assert_eq!(phone_util.parse("(650) 253-0000", RegionCode::us()), Ok(us_number()));
    // The national prefix is stripped.
    assert_eq!(phone_util.parse("1 650 253 0000", RegionCode::us()), Ok(us_number()));
    assert_eq!(phone_util.parse("020 7031 3000", RegionCode::gb()), Ok(gb_number()));
    assert_eq!(phone_util.parse("030 123 45678", RegionCode::de()), Ok(number(49, 3012345678)));
    assert_eq!(phone_util.parse("02 3661 8300", RegionCode::it()), Ok(it_number()));
}

#[test]
fn parse_international_numbers() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.parse("+1 650 253 0000", RegionCode::gb()), Ok(us_number()));
    assert_eq!(phone_util.parse("011 1 650 253 0000", RegionCode::us()), Ok(us_number()));
    assert_eq!(phone_util.parse("0011 1 650 253 0000", RegionCode::au()), Ok(us_number()));
    assert_eq!(phone_util.parse("00 44 20 7031 3000", RegionCode::de()), Ok(gb_number()));
    // A plus sign makes the default region irrelevant.
    assert_eq!(phone_util.parse("+44 20 7031 3000", RegionCode::zz()), Ok(gb_number()));
    assert_eq!(phone_util.parse("+39 02 3661 8300", RegionCode::zz()), Ok(it_number()));
    assert_eq!(phone_util.parse("+800 1234 5678", RegionCode::zz()), Ok(number(800, 12345678)));
}

#[test]
fn parse_extensions() {
    let phone_util = get_phone_util();
    let mut gb_with_extension = gb_number();
    gb_with_extension.set_extension("1234".to_owned());
    assert_eq!(
        phone_util.parse("+44 20 7031 3000 ext. 1234", RegionCode::zz()),
        Ok(gb_with_extension.clone())
    );
    assert_eq!(
        phone_util.parse("020 7031 3000 x1234", RegionCode::gb()),
        Ok(gb_with_extension.clone())
    );
    assert_eq!(
        phone_util.parse("tel:+44-20-7031-3000;ext=1234", RegionCode::zz()),
        Ok(gb_with_extension)
    );
}

#[test]
fn parse_rfc3966_phone_context() {
    let phone_util = get_phone_util();
    assert_eq!(
        phone_util.parse("tel:253-0000;phone-context=+1-650", RegionCode::zz()),
        Ok(us_number())
    );
    assert_eq!(
        phone_util.parse("tel:650-253-0000;phone-context=www.example.com", RegionCode::us()),
        Ok(us_number())
    );
    assert_eq!(
        phone_util.parse("tel:+1-650-253-0000;isub=12345", RegionCode::zz()),
        Ok(us_number())
    );
    assert_eq!(
        phone_util.parse("tel:253-0000;phone-context=", RegionCode::us()),
        Err(ParseError::NotANumber(NotANumberError::InvalidPhoneContext))
    );
    assert_eq!(
        phone_util.parse("tel:253-0000;phone-context=+", RegionCode::us()),
        Err(ParseError::NotANumber(NotANumberError::InvalidPhoneContext))
    );
}

#[test]
fn parse_and_keep_raw_input() {
    let phone_util = get_phone_util();
    let parsed = phone_util
        .parse_and_keep_raw_input("+1 650 253 0000", RegionCode::us())
        .unwrap();
    assert_eq!(parsed.raw_input(), "+1 650 253 0000");
    assert_eq!(
        parsed.country_code_source(),
        CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN
    );

    let parsed = phone_util
        .parse_and_keep_raw_input("011 44 20 7031 3000", RegionCode::us())
        .unwrap();
    assert_eq!(parsed.country_code_source(), CountryCodeSource::FROM_NUMBER_WITH_IDD);

    let parsed = phone_util
        .parse_and_keep_raw_input("1 650 253 0000", RegionCode::us())
        .unwrap();
    assert_eq!(
        parsed.country_code_source(),
        CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN
    );

    let parsed = phone_util
        .parse_and_keep_raw_input("650 253 0000", RegionCode::us())
        .unwrap();
    assert_eq!(parsed.country_code_source(), CountryCodeSource::FROM_DEFAULT_COUNTRY);
    assert_eq!(parsed.national_number(), 6502530000);

    // Plain parsing leaves these fields unset.
    let parsed = phone_util.parse("+1 650 253 0000", RegionCode::us()).unwrap();
    assert!(!parsed.has_raw_input());
    assert!(!parsed.has_country_code_source());
}

#[test]
fn failed_parsing() {
    let phone_util = get_phone_util();
    assert_eq!(
        phone_util.parse("This is not a phone number", RegionCode::us()),
        Err(ParseError::NotANumber(NotANumberError::FailedToExtractNumber(
            ExtractNumberError::NoValidStartCharacter
        )))
    );
    assert_eq!(
        phone_util.parse("1", RegionCode::us()),
        Err(ParseError::NotANumber(NotANumberError::NotMatchedValidNumberPattern))
    );
    assert_eq!(
        phone_util.parse("123 456 7890", RegionCode::fr()),
        Err(ParseError::InvalidCountryCode)
    );
    assert_eq!(
        phone_util.parse("123 456 7890", RegionCode::zz()),
        Err(ParseError::InvalidCountryCode)
    );
    assert_eq!(
        phone_util.parse("+210 3456 56789", RegionCode::zz()),
        Err(ParseError::InvalidCountryCode)
    );
    assert_eq!(phone_util.parse("+49 0", RegionCode::de()), Err(ParseError::TooShortNsn));
    assert_eq!(phone_util.parse("011 12", RegionCode::us()), Err(ParseError::TooShortAfterIdd));
    assert_eq!(phone_util.parse(&"1".repeat(251), RegionCode::us()), Err(ParseError::TooLong));
    assert_eq!(
        phone_util.parse("+44 1234567890123456789", RegionCode::zz()),
        Err(ParseError::TooLong)
    );
}

#[test]
fn is_number_match() {
    let phone_util = get_phone_util();
    assert_eq!(phone_util.is_number_match(&us_number(), &us_number()), MatchType::ExactMatch);

    let mut without_country_code = us_number();
    without_country_code.set_country_code(0);
    assert_eq!(
        phone_util.is_number_match(&without_country_code, &us_number()),
        MatchType::NsnMatch
    );

    let mut with_extension = us_number();
    with_extension.set_extension("1234".to_owned());
    assert_eq!(
        phone_util.is_number_match(&with_extension, &us_number()),
        MatchType::ShortNsnMatch
    );
    let mut other_extension = us_number();
    other_extension.set_extension("4321".to_owned());
    assert_eq!(
        phone_util.is_number_match(&with_extension, &other_extension),
        MatchType::NoMatch
    );

    assert_eq!(
        phone_util.is_number_match(&number(1, 2530000), &us_number()),
        MatchType::ShortNsnMatch
    );
    assert_eq!(phone_util.is_number_match(&us_number(), &gb_number()), MatchType::NoMatch);
    // Context fields are ignored.
    let mut with_raw_input = us_number();
    with_raw_input.set_raw_input("+1 650 253 0000".to_owned());
    assert_eq!(
        phone_util.is_number_match(&with_raw_input, &us_number()),
        MatchType::ExactMatch
    );
}

#[test]
fn is_number_match_with_one_string() {
    let phone_util = get_phone_util();
    assert_eq!(
        phone_util.is_number_match_with_one_string(&us_number(), "+1 650 253 0000"),
        MatchType::ExactMatch
    );
    assert_eq!(
        phone_util.is_number_match_with_one_string(&us_number(), "650 253 0000"),
        MatchType::NsnMatch
    );
    assert_eq!(
        phone_util.is_number_match_with_one_string(&us_number(), "253 0000"),
        MatchType::ShortNsnMatch
    );
    assert_eq!(
        phone_util.is_number_match_with_one_string(&us_number(), "+44 20 7031 3000"),
        MatchType::NoMatch
    );
    assert_eq!(
        phone_util.is_number_match_with_one_string(&us_number(), "not a number"),
        MatchType::NotANumber
    );
}

/// One valid number per type and region of the test plans, with the region
/// it belongs to.
fn example_numbers() -> Vec<(PhoneNumber, &'static str)> {
    vec![
        (us_number(), RegionCode::us()),
        (number(1, 8002530000), RegionCode::us()),
        (number(1, 2423570000), RegionCode::bs()),
        (gb_number(), RegionCode::gb()),
        (number(44, 7912345678), RegionCode::gb()),
        (it_number(), RegionCode::it()),
        (number(39, 312345678), RegionCode::it()),
        (number(61, 236618300), RegionCode::au()),
        (number(61, 412345678), RegionCode::au()),
        (number(61, 1800123456), RegionCode::au()),
        (number(49, 3012345678), RegionCode::de()),
    ]
}

#[test]
fn formatted_numbers_parse_back() {
    let phone_util = get_phone_util();
    for (phone_number, region) in example_numbers() {
        assert!(phone_util.is_valid_number(&phone_number), "{phone_number:?}");
        let national = phone_util.format(&phone_number, PhoneNumberFormat::National);
        assert_eq!(phone_util.parse(&national, region), Ok(phone_number.clone()), "{national}");
        let international = phone_util.format(&phone_number, PhoneNumberFormat::International);
        assert_eq!(
            phone_util.parse(&international, RegionCode::zz()),
            Ok(phone_number.clone()),
            "{international}"
        );
    }
    // Non-geographical numbers only round-trip in international form.
    let toll_free = number(800, 12345678);
    let international = phone_util.format(&toll_free, PhoneNumberFormat::International);
    assert_eq!(international, "+800 1234 5678");
    assert_eq!(phone_util.parse(&international, RegionCode::zz()), Ok(toll_free));
}

#[test]
fn e164_is_plus_and_digits() {
    let phone_util = get_phone_util();
    let mut numbers: Vec<PhoneNumber> = example_numbers().into_iter().map(|(n, _)| n).collect();
    numbers.push(number(800, 12345678));
    for phone_number in numbers {
        let e164 = phone_util.format(&phone_number, PhoneNumberFormat::E164);
        let digits = e164.strip_prefix('+').unwrap();
        assert!(!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()), "{e164}");
        assert_eq!(phone_util.parse(&e164, RegionCode::zz()), Ok(phone_number.clone()), "{e164}");
    }
    // The leading zero of Italian numbers survives.
    assert_eq!(phone_util.format(&it_number(), PhoneNumberFormat::E164), "+390236618300");
}
