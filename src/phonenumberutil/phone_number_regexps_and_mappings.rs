// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 The Kashin Vladislav (Rust adaptation author)
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

use std::{collections::HashMap, sync::Arc};

use regex::Regex;

use crate::{
    phonenumberutil::{
        helper_constants::{
            DIGITS, MIN_LENGTH_FOR_NSN, PLUS_CHARS, PLUS_SIGN, RFC3966_VISUAL_SEPARATOR,
            SECOND_NUMBER_START, STAR_SIGN, VALID_ALPHA, VALID_ALPHA_INCL_UPPERCASE,
            VALID_PUNCTUATION,
        },
        helper_functions::create_extn_pattern,
    },
    regexp_cache::RegexCache,
};

// All patterns below are built from constants, so failing to compile one of
// them is a programming error caught by `check_regexps_are_compiling`.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid constant pattern!")
}

pub(crate) struct PhoneNumberRegExpsAndMappings {
    pub regexp_cache: Arc<RegexCache>,

    /// A map that contains characters that are essential when dialling. That means
    /// any of the characters in this map must not be removed from a number when
    /// dialing, otherwise the call will not reach the intended destination.
    pub diallable_char_mappings: HashMap<char, char>,
    /// These mappings map a character (key) to a specific digit that should
    /// replace it for normalization purposes.
    pub alpha_mappings: HashMap<char, char>,
    /// For performance reasons, store a map of combining alpha_mappings with ASCII
    /// digits.
    pub alpha_phone_mappings: HashMap<char, char>,

    /// Captures the first decimal digit of a string.
    pub capturing_digit_pattern: Regex,

    /// Regular expression of acceptable characters that may start a phone number
    /// for the purposes of parsing. This allows us to strip away meaningless
    /// prefixes to phone numbers that may be mistakenly given to us. This consists
    /// of digits, the plus symbol and arabic-indic digits. This does not contain
    /// alpha characters, although they may be used later in the number. It also
    /// does not include other punctuation, as this will be stripped later during
    /// parsing and is of no information value when parsing a number.
    pub valid_start_char_pattern: Regex,

    /// Marker of a second number (or a second extension) in the same string.
    pub second_number_start_pattern: Regex,

    /// Regular expression of trailing characters that we want to remove. We remove
    /// all characters that are not alpha or numerical characters. The hash
    /// character is retained here, as it may signify the previous block was an
    /// extension.
    pub unwanted_end_char_pattern: Regex,

    /// Regular expression of groups of valid punctuation characters.
    pub separator_pattern: Regex,

    /// Regexp of all known extension prefixes used by different regions followed
    /// by 1 or more valid digits, for use when parsing.
    /// For parsing, we are slightly more lenient in our interpretation than for
    /// matching. Here we allow "comma" and "semicolon" as possible extension
    /// indicators. When matching, these are hardly ever used to indicate this.
    pub extn_pattern: Regex,

    /// Regular expression of viable phone numbers. This is location independent.
    /// Checks we have at least three leading digits, and only valid punctuation,
    /// alpha characters and digits in the phone number. Does not include extension
    /// data. The symbol 'x' is allowed here as valid punctuation since it is often
    /// used as a placeholder for carrier codes, for example in Brazilian phone
    /// numbers. We also allow multiple plus-signs at the start.
    ///
    /// The short alternative allows numbers of two digits to be parsed if they
    /// are entered as "15" etc, but only if there is no punctuation in them. We
    /// append optionally the extension pattern to the end here, as a valid
    /// phone number may have an extension prefix appended, followed by 1 or more
    /// digits.
    pub valid_phone_number_pattern: Regex,

    /// We use this pattern to check if the phone number has at least three letters
    /// in it - if so, then we treat it as a number where some phone-number digits
    /// are represented by letters.
    pub valid_alpha_phone_pattern: Regex,

    /// The first_group_capturing_pattern was originally set to $1 but there
    /// are some countries for which the first group is not used in the
    /// national pattern (e.g. Argentina) so the $1 group does not match
    /// correctly. Therefore, we use \d, so that the first group actually
    /// used in the pattern will be matched.
    pub first_group_capturing_pattern: Regex,

    pub carrier_code_pattern: Regex,

    /// Leading plus signs, anchored at the start.
    pub plus_chars_pattern: Regex,

    /// Regular expression of valid global-number-digits for the phone-context
    /// parameter, following the syntax defined in RFC3966.
    pub rfc3966_global_number_digits_pattern: Regex,

    /// Regular expression of valid domainname for the phone-context parameter,
    /// following the syntax defined in RFC3966.
    pub rfc3966_domainname_pattern: Regex,

    /// A pattern that is used to determine if a numberFormat under
    /// availableFormats is eligible to be used by the AYTF. It is eligible when
    /// the format element under numberFormat contains groups of the dollar sign
    /// followed by a single digit, separated by valid phone number punctuation.
    /// This prevents invalid punctuation (such as the star sign in Israeli star
    /// numbers) getting into the output of the AYTF.
    pub is_format_eligible_as_you_type_formatting_regex: Regex,

    /// A pattern that is used to determine if the national prefix formatting rule
    /// has the first group only, i.e., does not start with the national prefix.
    /// Note that the pattern explicitly allows for unbalanced parentheses.
    pub formatting_rule_has_first_group_only_regex: Regex,
}

impl PhoneNumberRegExpsAndMappings {
    fn initialize_regexp_mappings(&mut self) {
        // Simple ASCII digits map used to populate ALPHA_PHONE_MAPPINGS and
        // DIALLABLE_CHAR_MAPPINGS.
        let ascii_digit_mappings = ('0'..='9').map(|d| (d, d)).collect::<HashMap<_, _>>();

        // IMPORTANT: only uppercase letters, lookups upper-case the input first.
        self.alpha_mappings = [
            ("ABC", '2'),
            ("DEF", '3'),
            ("GHI", '4'),
            ("JKL", '5'),
            ("MNO", '6'),
            ("PQRS", '7'),
            ("TUV", '8'),
            ("WXYZ", '9'),
        ]
        .into_iter()
        .flat_map(|(letters, digit)| letters.chars().map(move |letter| (letter, digit)))
        .collect();

        let mut combined_map = HashMap::with_capacity(40);
        combined_map.extend(self.alpha_mappings.iter());
        combined_map.extend(ascii_digit_mappings.iter());
        self.alpha_phone_mappings = combined_map;

        let mut diallable_char_map = HashMap::with_capacity(13);
        diallable_char_map.extend(ascii_digit_mappings.iter());
        diallable_char_map.insert('+', '+');
        diallable_char_map.insert('*', '*');
        diallable_char_map.insert('#', '#');
        self.diallable_char_mappings = diallable_char_map;
    }

    pub fn new(regexp_cache: Arc<RegexCache>) -> Self {
        let alphanum = fast_cat::concat_str!(VALID_ALPHA_INCL_UPPERCASE, DIGITS);
        let extn_patterns_for_parsing = create_extn_pattern(true);
        // it'll be initialized only once, so we can use slow format!
        let valid_phone_number = format!(
            // moved 2-digits pattern to an end for match full number first
            "[{}]*(?:[{}{}]*{}){{3,}}[{}{}{}{}]*|{}{{{}}}",
            PLUS_CHARS,
            VALID_PUNCTUATION, STAR_SIGN, DIGITS,
            VALID_PUNCTUATION, STAR_SIGN, VALID_ALPHA, DIGITS,
            DIGITS, MIN_LENGTH_FOR_NSN,
        );

        let rfc3966_phone_digit = format!("(?:{}|{})", DIGITS, RFC3966_VISUAL_SEPARATOR);
        let rfc3966_domainlabel = format!("[{}]+(?:-*[{}])*", alphanum, alphanum);
        let rfc3966_toplabel = format!("[{}]+(?:-*[{}])*", VALID_ALPHA_INCL_UPPERCASE, alphanum);
        let punctuation_class = format!("[{}]", VALID_PUNCTUATION);

        let mut instance = Self {
            regexp_cache,
            diallable_char_mappings: Default::default(),
            alpha_mappings: Default::default(),
            alpha_phone_mappings: Default::default(),
            capturing_digit_pattern: compile(&format!("({})", DIGITS)),
            valid_start_char_pattern: compile(&format!("[{}{}]", PLUS_CHARS, DIGITS)),
            second_number_start_pattern: compile(SECOND_NUMBER_START),
            unwanted_end_char_pattern: compile("[^\\p{N}\\p{L}#]+$"),
            separator_pattern: compile(&format!("{}+", punctuation_class)),
            extn_pattern: compile(&format!("(?i)(?:{})$", &extn_patterns_for_parsing)),
            valid_phone_number_pattern: compile(&format!(
                "(?i)^(?:{})(?:{})?$",
                &valid_phone_number, &extn_patterns_for_parsing
            )),
            valid_alpha_phone_pattern: compile("(?:.*?[A-Za-z]){3}"),
            first_group_capturing_pattern: compile("(\\$\\d)"),
            carrier_code_pattern: compile("\\$CC"),
            plus_chars_pattern: compile(&format!("^[{}]+", PLUS_CHARS)),
            rfc3966_global_number_digits_pattern: compile(&format!(
                "^\\{}{}*{}{}*$",
                PLUS_SIGN, &rfc3966_phone_digit, DIGITS, &rfc3966_phone_digit
            )),
            rfc3966_domainname_pattern: compile(&format!(
                "^(?:{}\\.)*{}\\.?$",
                rfc3966_domainlabel, rfc3966_toplabel
            )),
            is_format_eligible_as_you_type_formatting_regex: compile(&format!(
                "^{p}*\\$1{p}*(?:\\$\\d{p}*)*$",
                p = punctuation_class
            )),
            formatting_rule_has_first_group_only_regex: compile("^\\(?\\$1\\)?$"),
        };
        instance.initialize_regexp_mappings();
        instance
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PhoneNumberRegExpsAndMappings;
    use crate::regexp_cache::RegexCache;

    #[test]
    fn check_regexps_are_compiling() {
        PhoneNumberRegExpsAndMappings::new(Arc::new(RegexCache::new()));
    }

    #[test]
    fn extension_and_viability_patterns() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new(Arc::new(RegexCache::new()));
        assert!(reg_exps.valid_phone_number_pattern.is_match("+1 (650) 253-0000"));
        assert!(reg_exps.valid_phone_number_pattern.is_match("0800 FLOWERS"));
        assert!(reg_exps.valid_phone_number_pattern.is_match("12"));
        assert!(!reg_exps.valid_phone_number_pattern.is_match("1-2"));

        let captures = reg_exps.extn_pattern.captures("650 253 0000 ext. 1234").unwrap();
        let extension = captures.iter().skip(1).flatten().next().unwrap();
        assert_eq!(extension.as_str(), "1234");

        assert!(reg_exps.is_format_eligible_as_you_type_formatting_regex.is_match("$1 $2-$3"));
        assert!(!reg_exps.is_format_eligible_as_you_type_formatting_regex.is_match("*$1"));
        assert!(reg_exps.formatting_rule_has_first_group_only_regex.is_match("($1)"));
        assert!(!reg_exps.formatting_rule_has_first_group_only_regex.is_match("0$1"));
    }
}
