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

use std::borrow::Cow;

use regex::Regex;

/// Start-anchored consumption for regexes that were compiled without a `^`.
///
/// A match counts only if the leftmost match starts at position 0, so this
/// is exact for patterns whose alternatives cannot match shorter there. Use
/// [`crate::RegexCache`] anchored variants for metadata patterns.
pub trait RegexConsume {
    /// Returns the remainder of `s` after a match found at its very start.
    fn consume_start<'a>(&self, s: &'a str) -> Option<&'a str>;
}

impl RegexConsume for Regex {
    fn consume_start<'a>(&self, s: &'a str) -> Option<&'a str> {
        let found = self.find(s)?;
        if found.start() != 0 {
            return None;
        }
        Some(&s[found.end()..])
    }
}

/// Metadata templates refer to groups as `$1`, which the regex crate reads as
/// a group named `1x` when a letter or digit follows. Braces make the group
/// reference explicit: `$1$2` becomes `${1}${2}`.
pub fn to_braced_group_refs(template: &str) -> Cow<'_, str> {
    if !template.contains('$') {
        return Cow::Borrowed(template);
    }
    let mut result = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(d) if d.is_ascii_digit() => {
                result.push_str("${");
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    result.push(d);
                    chars.next();
                }
                result.push('}');
            }
            // A literal dollar that is not a group reference.
            _ => result.push_str("$$"),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::{RegexConsume, to_braced_group_refs};

    #[test]
    fn consume_only_at_start() {
        let regex = Regex::new(r"\d+").unwrap();
        assert_eq!(regex.consume_start("123abc"), Some("abc"));
        assert_eq!(regex.consume_start("abc123"), None);
        assert_eq!(regex.consume_start("9"), Some(""));
    }

    #[test]
    fn group_references_get_braces() {
        assert_eq!(to_braced_group_refs("$1 $2"), "${1} ${2}");
        assert_eq!(to_braced_group_refs("$1x$2"), "${1}x${2}");
        assert_eq!(to_braced_group_refs("no groups"), "no groups");
        assert_eq!(to_braced_group_refs("$CC"), "$$CC");

        let regex = Regex::new(r"(\d{3})(\d{4})").unwrap();
        let template = to_braced_group_refs("$1x$2");
        assert_eq!(regex.replace("5551234", &*template), "555x1234");
    }
}
