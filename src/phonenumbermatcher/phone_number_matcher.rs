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

use log::trace;
use regex::Regex;

use crate::phonenumberutil::phonenumberutil::PhoneNumberUtil;

use super::{
    FindNumbersError, Leniency, PhoneNumberMatch, matcher_regexps::MATCHER_REGEXPS,
};

/// The potential states of a PhoneNumberMatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotReady,
    Ready,
    Done,
}

/// A stateful class that finds and extracts telephone numbers from text.
///
/// Obtained from [`PhoneNumberUtil::find_numbers`]. Matches are produced
/// lazily and in order; vanity numbers (phone numbers using alphabetic
/// digits such as "1-800-SIX-FLAGS") are not found.
///
/// This type is not thread-safe and walks its text only once.
pub struct PhoneNumberMatcher<'a> {
    phone_util: &'a PhoneNumberUtil,
    /// The text searched for phone numbers.
    text: &'a str,
    /// The region (country) to assume for phone numbers without an
    /// international prefix.
    preferred_region: &'a str,
    /// The degree of validation requested.
    leniency: Leniency,
    /// The maximum number of retries after matching an invalid number.
    max_tries: u64,
    state: State,
    /// The last successful match, `None` unless in `State::Ready`.
    last_match: Option<PhoneNumberMatch>,
    /// The next index to start searching at. Undefined in `State::Done`.
    search_index: usize,
}

impl<'a> PhoneNumberMatcher<'a> {
    pub(crate) fn new(
        phone_util: &'a PhoneNumberUtil,
        text: &'a str,
        country: &'a str,
        leniency: Leniency,
        max_tries: u64,
    ) -> Self {
        Self {
            phone_util,
            text,
            preferred_region: country,
            leniency,
            max_tries,
            state: State::NotReady,
            last_match: None,
            search_index: 0,
        }
    }

    /// Returns true if there is another match. Finds it lazily on the first
    /// call after the previous match was consumed.
    pub fn has_next(&mut self) -> bool {
        if self.state == State::NotReady {
            self.last_match = self.find(self.search_index);
            match &self.last_match {
                None => self.state = State::Done,
                Some(last_match) => {
                    self.search_index = last_match.end();
                    self.state = State::Ready;
                }
            }
        }
        self.state == State::Ready
    }

    /// Always fails: a matcher cannot go back to the start of its text.
    pub fn reset(&mut self) -> Result<(), FindNumbersError> {
        Err(FindNumbersError::ResetUnsupported)
    }

    /// Attempts to find the next subsequence in the searched sequence on or
    /// after `index` that represents a phone number.
    fn find(&mut self, mut index: usize) -> Option<PhoneNumberMatch> {
        let regexps = &*MATCHER_REGEXPS;
        while self.max_tries > 0 {
            let found = regexps.pattern.find_at(self.text, index)?;
            let start = found.start();
            // Check for extra numbers at the end.
            let candidate = trim_after_first_match(&regexps.second_number_start, found.as_str());
            if let Some(phone_number_match) = self.extract_match(candidate, start) {
                return Some(phone_number_match);
            }
            index = start + candidate.len();
            // Inner-match retries may already have spent the budget.
            self.max_tries = self.max_tries.saturating_sub(1);
        }
        None
    }

    /// Attempts to extract a match from a `candidate` found at byte
    /// `offset` of the text.
    fn extract_match(&mut self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        let regexps = &*MATCHER_REGEXPS;
        // Skip a match that is more likely to be a date.
        if regexps.slash_separated_dates.is_match(candidate) {
            trace!("Candidate '{}' looks like a date", candidate);
            return None;
        }
        // Skip potential time-stamps.
        if regexps.time_stamps.is_match(candidate) {
            let following_text = &self.text[offset + candidate.len()..];
            if regexps.time_stamps_suffix.is_match(following_text) {
                trace!("Candidate '{}' looks like a time stamp", candidate);
                return None;
            }
        }
        // Try to come up with a valid match given the entire candidate.
        if let Some(phone_number_match) = self.parse_and_verify(candidate, offset) {
            return Some(phone_number_match);
        }
        // If that failed, try to find an "inner match" - there might be a
        // phone number within this candidate.
        self.extract_inner_match(candidate, offset)
    }

    /// Attempts to extract a match from `candidate` if the whole candidate
    /// does not qualify as a match.
    fn extract_inner_match(&mut self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        let regexps = &*MATCHER_REGEXPS;
        for possible_inner_match in &regexps.inner_matches {
            let mut first_separator_start = None;
            let mut last_separator_start = None;
            for group_match in possible_inner_match.captures_iter(candidate) {
                if self.max_tries == 0 {
                    break;
                }
                let (Some(separator), Some(group)) = (group_match.get(0), group_match.get(1)) else {
                    continue;
                };
                if first_separator_start.is_none() {
                    // We should handle any group before this one too.
                    first_separator_start = Some(separator.start());
                    let first_group = trim_after_first_match(
                        &regexps.unwanted_end_char,
                        &candidate[..separator.start()],
                    );
                    if let Some(phone_number_match) = self.parse_and_verify(first_group, offset) {
                        return Some(phone_number_match);
                    }
                    self.max_tries = self.max_tries.saturating_sub(1);
                }
                let group_str = trim_after_first_match(&regexps.unwanted_end_char, group.as_str());
                if let Some(phone_number_match) = self.parse_and_verify(group_str, offset + group.start()) {
                    return Some(phone_number_match);
                }
                self.max_tries = self.max_tries.saturating_sub(1);
                last_separator_start = Some(separator.start());
            }
            // Everything before the last separator, unless that is the first
            // group which was already tried.
            if let Some(last_separator_start) = last_separator_start
                .filter(|last| Some(*last) != first_separator_start && self.max_tries > 0)
            {
                let all_but_last_group = trim_after_first_match(
                    &regexps.unwanted_end_char,
                    &candidate[..last_separator_start],
                );
                if let Some(phone_number_match) = self.parse_and_verify(all_but_last_group, offset) {
                    return Some(phone_number_match);
                }
                self.max_tries = self.max_tries.saturating_sub(1);
            }
        }
        None
    }

    /// Parses a phone number from the `candidate` using the util and
    /// verifies it matches the requested leniency. If parsing and
    /// verification succeed, a corresponding PhoneNumberMatch is returned,
    /// otherwise this method returns `None`.
    fn parse_and_verify(&self, candidate: &str, offset: usize) -> Option<PhoneNumberMatch> {
        let regexps = &*MATCHER_REGEXPS;
        // Check the candidate doesn't contain any formatting which would
        // indicate that it really isn't a phone number.
        if !regexps.matching_brackets.is_match(candidate) || regexps.pub_pages.is_match(candidate) {
            return None;
        }

        // If leniency is set to VALID or stricter, we also want to skip
        // numbers that are surrounded by Latin alphabetic characters, to skip
        // cases like abc8005001234 or 8005001234def.
        if self.leniency >= Leniency::Valid {
            // If the candidate is not at the start of the text, and does not
            // start with phone-number punctuation, check the previous
            // character.
            if offset > 0 && !regexps.lead_class.is_match(candidate) {
                let previous_char = self.text[..offset].chars().next_back();
                // We return None if it is a latin letter or an invalid
                // punctuation symbol.
                if previous_char.is_some_and(|c| is_invalid_punctuation_symbol(c) || is_latin_letter(c)) {
                    return None;
                }
            }
            let last_char_index = offset + candidate.len();
            let next_char = self.text[last_char_index..].chars().next();
            if next_char.is_some_and(|c| is_invalid_punctuation_symbol(c) || is_latin_letter(c)) {
                return None;
            }
        }

        let mut number = match self
            .phone_util
            .parse_and_keep_raw_input(candidate, self.preferred_region)
        {
            Ok(number) => number,
            Err(err) => {
                trace!("Candidate '{}' failed to parse: {}", candidate, err);
                return None;
            }
        };

        if !self.leniency.verify(&number, candidate, self.phone_util) {
            trace!("Candidate '{}' rejected at leniency {:?}", candidate, self.leniency);
            return None;
        }
        // We used parse_and_keep_raw_input to create this number, but for now
        // we don't return the extra values parsed.
        number.clear_country_code_source();
        number.clear_raw_input();
        number.clear_preferred_domestic_carrier_code();
        Some(PhoneNumberMatch::new(offset, candidate, number))
    }
}

impl Iterator for PhoneNumberMatcher<'_> {
    type Item = PhoneNumberMatch;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        // Remove from memory after use.
        self.state = State::NotReady;
        self.last_match.take()
    }
}

/// Trims away any characters after the first match of `pattern` in
/// `candidate`, returning the trimmed version.
fn trim_after_first_match<'b>(pattern: &Regex, candidate: &'b str) -> &'b str {
    match pattern.find(candidate) {
        Some(trailing_chars) => &candidate[..trailing_chars.start()],
        None => candidate,
    }
}

/// Helper method to determine if a character is a Latin-script letter or
/// not. For our purposes, combining marks should also return true since we
/// assume they have been added to a preceding Latin character.
fn is_latin_letter(letter: char) -> bool {
    let is_combining_mark = matches!(letter, '\u{0300}'..='\u{036F}');
    if !letter.is_alphabetic() && !is_combining_mark {
        return false;
    }
    // Basic Latin, Latin-1 Supplement, Latin Extended-A and -B, Combining
    // Diacritical Marks and Latin Extended Additional.
    matches!(letter, '\u{0000}'..='\u{024F}' | '\u{0300}'..='\u{036F}' | '\u{1E00}'..='\u{1EFF}')
}

fn is_invalid_punctuation_symbol(character: char) -> bool {
    character == '%'
        || MATCHER_REGEXPS
            .currency_symbol
            .is_match(character.encode_utf8(&mut [0; 4]))
}

#[cfg(test)]
mod tests {
    use super::{is_invalid_punctuation_symbol, is_latin_letter, trim_after_first_match};
    use crate::phonenumbermatcher::matcher_regexps::MATCHER_REGEXPS;

    #[test]
    fn latin_letters() {
        assert!(is_latin_letter('c'));
        assert!(is_latin_letter('C'));
        assert!(is_latin_letter('\u{00C9}'));
        // Combining acute accent.
        assert!(is_latin_letter('\u{0301}'));
        assert!(!is_latin_letter(':'));
        assert!(!is_latin_letter('5'));
        assert!(!is_latin_letter('-'));
        assert!(!is_latin_letter('.'));
        assert!(!is_latin_letter(' '));
        // Chinese character.
        assert!(!is_latin_letter('\u{6211}'));
        // Hiragana letter no.
        assert!(!is_latin_letter('\u{306E}'));
    }

    #[test]
    fn invalid_punctuation() {
        assert!(is_invalid_punctuation_symbol('%'));
        assert!(is_invalid_punctuation_symbol('$'));
        assert!(is_invalid_punctuation_symbol('\u{20AC}'));
        assert!(!is_invalid_punctuation_symbol('-'));
        assert!(!is_invalid_punctuation_symbol('('));
    }

    #[test]
    fn second_number_is_trimmed() {
        assert_eq!(
            trim_after_first_match(&MATCHER_REGEXPS.second_number_start, "(530) 583-6985 x302/x2303"),
            "(530) 583-6985 x302"
        );
        assert_eq!(
            trim_after_first_match(&MATCHER_REGEXPS.unwanted_end_char, "650-253-0000 - "),
            "650-253-0000"
        );
    }
}
