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

use std::hash::{Hash, Hasher};

use crate::proto_gen::phonenumber::PhoneNumber;

impl Eq for PhoneNumber {}

// Hashes the same fields the generated `PartialEq` compares, so equal numbers
// land in the same bucket. Unknown fields are ignored.
impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.country_code.hash(state);
        self.national_number.hash(state);
        self.extension.hash(state);
        self.italian_leading_zero.hash(state);
        self.number_of_leading_zeros.hash(state);
        self.raw_input.hash(state);
        self.country_code_source
            .map(|source| source.value())
            .hash(state);
        self.preferred_domestic_carrier_code.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{CountryCodeSource, PhoneNumber};

    fn number(country_code: i32, national_number: u64) -> PhoneNumber {
        let mut phone_number = PhoneNumber::new();
        phone_number.set_country_code(country_code);
        phone_number.set_national_number(national_number);
        phone_number
    }

    #[test]
    fn equal_numbers_collapse_in_a_set() {
        let mut numbers = HashSet::new();
        numbers.insert(number(1, 6502530000));
        numbers.insert(number(1, 6502530000));
        numbers.insert(number(44, 2070313000));
        assert_eq!(numbers.len(), 2);
    }

    #[test]
    fn every_field_takes_part() {
        let plain = number(1, 6502530000);
        let mut with_source = plain.clone();
        with_source.set_country_code_source(CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN);
        let mut with_extension = plain.clone();
        with_extension.set_extension("12".to_owned());

        let numbers: HashSet<_> = [plain, with_source, with_extension].into_iter().collect();
        assert_eq!(numbers.len(), 3);
    }
}
