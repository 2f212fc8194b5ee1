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

use regex::{Regex, RegexBuilder};

use crate::phonenumberutil::{
    helper_constants::{
        MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, PLUS_CHARS, SECOND_NUMBER_START,
        VALID_PUNCTUATION,
    },
    helper_functions::create_extn_pattern,
};

pub(super) static MATCHER_REGEXPS: LazyLock<PhoneNumberMatcherRegExps> =
    LazyLock::new(PhoneNumberMatcherRegExps::new);

// Patterns below are built from constants only; `check_regexps_are_compiling`
// keeps them honest.
fn compile(pattern: &str) -> Regex {
    // The candidate pattern unrolls a few bounded repetitions of Unicode
    // classes, which needs more room than the default limit.
    RegexBuilder::new(pattern)
        .size_limit(1 << 26)
        .build()
        .expect("Invalid constant pattern!")
}

/// Returns a regular expression quantifier with an upper and lower limit.
fn limit(lower: usize, upper: usize) -> String {
    format!("{{{},{}}}", lower, upper)
}

pub(super) struct PhoneNumberMatcherRegExps {
    /// The phone number pattern used by the matcher to find candidates, a
    /// permissive version of the valid phone number pattern used for parsing.
    ///
    /// Candidates may start with a leading plus or an opening bracket
    /// (capped at two) and consist of digit blocks separated by runs of at
    /// most four punctuation characters. The number of digit blocks is
    /// capped by the longest possible number including its country calling
    /// code. An extension may follow.
    pub pattern: Regex,
    /// Matches strings that look like publication pages. Example:
    /// `Computing Complete Answers to Queries in the Presence of Limited
    /// Access Patterns. Chen Li. VLDB J. 12(3): 211-227 (2003).`
    /// The string "211-227 (2003)" is not a telephone number.
    pub pub_pages: Regex,
    /// Matches strings that look like dates using "/" as a separator.
    /// Examples: 3/10/2011, 31/10/96 or 08/31/95.
    pub slash_separated_dates: Regex,
    /// Matches timestamps. Examples: "2012-01-02 08:00". The trailing ":\d\d"
    /// lives outside the candidate and is checked with `time_stamps_suffix`.
    pub time_stamps: Regex,
    pub time_stamps_suffix: Regex,
    /// Matches a candidate whose brackets are balanced, allowing an unpaired
    /// opening bracket only at the start and at most three further pairs.
    pub matching_brackets: Regex,
    /// Patterns used to extract phone numbers from a larger phone-number-like
    /// pattern, in the order they are tried. Group 1 captures what follows
    /// the separator.
    pub inner_matches: Vec<Regex>,
    /// Punctuation or bracket that can open a phone number.
    pub lead_class: Regex,
    pub second_number_start: Regex,
    pub unwanted_end_char: Regex,
    pub currency_symbol: Regex,
    /// Runs of anything but ASCII digits, used to split a normalized
    /// candidate into its digit groups.
    pub non_digits: Regex,
}

impl PhoneNumberMatcherRegExps {
    fn new() -> Self {
        // Builds the MATCHING_BRACKETS and PATTERN regular expressions. The
        // building blocks exist to make the pattern more easily understood.
        let opening_parens = "(\\[\u{FF08}\u{FF3B}";
        let closing_parens = ")\\]\u{FF09}\u{FF3D}";
        let non_parens = format!("[^{}{}]", opening_parens, closing_parens);

        // Limit on the number of pairs of brackets in a phone number.
        let bracket_pair_limit = limit(0, 3);
        // An opening bracket at the beginning may not be closed, but
        // subsequent ones should be. It's also possible that the leading
        // bracket was dropped, so we shouldn't be surprised if we see a
        // closing bracket first. We limit the sets of brackets in a phone
        // number to four.
        let matching_brackets = format!(
            "^(?:[{open}])?(?:{np}+[{close}])?{np}+(?:[{open}]{np}+[{close}]){limit}{np}*$",
            open = opening_parens,
            close = closing_parens,
            np = non_parens,
            limit = bracket_pair_limit,
        );

        // Limit on the number of leading (plus) characters.
        let lead_limit = limit(0, 2);
        // Limit on the number of consecutive punctuation characters.
        let punctuation_limit = limit(0, 4);
        // The maximum number of digits allowed in a digit-separated block. As
        // we allow all digits in a single block, set high enough to
        // accommodate the entire national number and the international
        // country code.
        let digit_block_limit = MAX_LENGTH_FOR_NSN + MAX_LENGTH_COUNTRY_CODE;
        // Limit on the number of blocks separated by punctuation. Uses
        // digit_block_limit since some formats use spaces to separate each
        // digit.
        let block_limit = limit(0, digit_block_limit);
        // A punctuation sequence allowing white space.
        let punctuation = format!("[{}]{}", VALID_PUNCTUATION, punctuation_limit);
        // A digits block without punctuation.
        let digit_sequence = format!("\\p{{Nd}}{}", limit(1, digit_block_limit));
        let lead_class = format!("[{}{}]", opening_parens, PLUS_CHARS);

        // Phone number pattern allowing optional punctuation.
        let pattern = format!(
            "(?i)(?:{lead}{punct}){lead_limit}{digits}(?:{punct}{digits}){block_limit}(?:{extn})?",
            lead = lead_class,
            punct = punctuation,
            lead_limit = lead_limit,
            digits = digit_sequence,
            block_limit = block_limit,
            extn = create_extn_pattern(false),
        );

        Self {
            pattern: compile(&pattern),
            pub_pages: compile("\\d{1,5}-+\\d{1,5}\\s{0,4}\\(\\d{1,4}"),
            slash_separated_dates: compile(
                "(?:(?:[0-3]?\\d/[01]?\\d)|(?:[01]?\\d/[0-3]?\\d))/(?:[12]\\d)?\\d{2}",
            ),
            time_stamps: compile("[12]\\d{3}[-/]?[01]\\d[-/]?[0-3]\\d +[0-2]\\d$"),
            time_stamps_suffix: compile("^:[0-5]\\d"),
            matching_brackets: compile(&matching_brackets),
            inner_matches: [
                // Breaks on the slash - e.g. "651-234-2345/332-445-1234"
                "/+(.*)",
                // Note that the bracket here is inside the capturing group,
                // since we consider it part of the phone number. Will match a
                // pattern like "(650) 223 3345 (754) 223 3321".
                "(\\([^(]*)",
                // Breaks on a hyphen - e.g. "12345 - 332-445-1234 is my
                // number." We require a space on either side of the hyphen
                // for it to be considered a separator.
                "(?:\\p{Z}-|-\\p{Z})\\p{Z}*(.+)",
                // Various types of wide hyphens. Note we have decided not to
                // enforce a space here, since it's possible that it's
                // supposed to be used to break two numbers without spaces,
                // and we haven't seen many instances of it used within a
                // number.
                "[\u{2012}-\u{2015}\u{FF0D}]\\p{Z}*(.+)",
                // Breaks on a full stop - e.g. "12345. 332-445-1234 is my
                // number."
                "\\.+\\p{Z}*([^.]+)",
                // Breaks on space - e.g. "3324451234 8002341234"
                "\\p{Z}+(\\P{Z}+)",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            lead_class: compile(&format!("^{}", lead_class)),
            second_number_start: compile(SECOND_NUMBER_START),
            unwanted_end_char: compile("[^\\p{N}\\p{L}#]+$"),
            currency_symbol: compile("^\\p{Sc}$"),
            non_digits: compile("[^0-9]+"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MATCHER_REGEXPS;

    #[test]
    fn check_regexps_are_compiling() {
        assert!(MATCHER_REGEXPS.pattern.is_match("+1 650-253-0000"));
    }

    #[test]
    fn candidate_pattern_stops_at_text() {
        let found = MATCHER_REGEXPS.pattern.find("Call +1 650-253-0000 today").unwrap();
        assert_eq!(found.as_str(), "+1 650-253-0000");
        assert_eq!(found.start(), 5);
    }

    #[test]
    fn bracket_grammar() {
        let brackets = &MATCHER_REGEXPS.matching_brackets;
        assert!(brackets.is_match("(650) 253-0000"));
        assert!(brackets.is_match("650) 253-0000"));
        assert!(brackets.is_match("(650 253-0000"));
        assert!(!brackets.is_match("650 (253-0000"));
        assert!(!brackets.is_match("(650)) 253-0000"));
    }

    #[test]
    fn false_positive_shapes() {
        assert!(MATCHER_REGEXPS.pub_pages.is_match("211-227 (2003"));
        assert!(MATCHER_REGEXPS.slash_separated_dates.is_match("08/31/95"));
        assert!(MATCHER_REGEXPS.time_stamps.is_match("2012-01-02 08"));
        assert!(MATCHER_REGEXPS.time_stamps_suffix.is_match(":00 UTC"));
        assert!(MATCHER_REGEXPS.currency_symbol.is_match("$"));
        assert!(!MATCHER_REGEXPS.currency_symbol.is_match("%"));
    }
}
