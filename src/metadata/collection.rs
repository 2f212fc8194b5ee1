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

use std::collections::{HashMap, VecDeque};

use log::{trace, warn};
use protobuf::Message;

use crate::{
    i18n,
    interfaces::MetadataSource,
    phonenumberutil::{
        errors::MetadataError,
        helper_constants::{FG_STRING, NP_STRING, REGION_CODE_FOR_NON_GEO_ENTITY},
    },
    proto_gen::phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection},
};

use super::filter::MetadataFilter;

/// In-memory metadata tables, immutable once built.
#[derive(Debug, Default)]
pub struct MetadataCollection {
    /// A mapping from a region code to a PhoneMetadata for that region.
    region_to_metadata_map: HashMap<String, PhoneMetadata>,

    /// A mapping from a country calling code for a non-geographical entity to the
    /// PhoneMetadata for that country calling code. Examples of the country
    /// calling codes include 800 (International Toll Free Service) and 808
    /// (International Shared Cost Service).
    country_code_to_non_geographical_metadata_map: HashMap<i32, PhoneMetadata>,

    /// A mapping from a country calling code to the region codes which denote
    /// the region represented by that country calling code. Note regions under
    /// NANPA share the country calling code 1 and Russia and Kazakhstan share the
    /// country calling code 7. The main region of a code is stored first. This
    /// is implemented as a sorted vector to achieve better performance.
    country_calling_code_to_region_code_map: Vec<(i32, Vec<String>)>,

    /// Alternate formats keyed by country calling code.
    alternate_formats_map: HashMap<i32, PhoneMetadata>,
}

impl MetadataCollection {
    pub fn new(metadata_collection: PhoneMetadataCollection) -> Self {
        Self::with_filter(metadata_collection, &MetadataFilter::empty())
    }

    /// Decodes a serialized `PhoneMetadataCollection`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
        Ok(Self::new(PhoneMetadataCollection::parse_from_bytes(bytes)?))
    }

    /// Builds the tables after stripping the fields `filter` excludes.
    pub fn with_filter(metadata_collection: PhoneMetadataCollection, filter: &MetadataFilter) -> Self {
        let mut instance = Self::default();
        // Storing data in a temporary map to make it easier to find other regions
        // that share a country calling code when inserting data.
        let mut country_calling_code_to_region_map = HashMap::<i32, VecDeque<String>>::new();
        for mut metadata in metadata_collection.metadata {
            let region_code = metadata.id().to_owned();
            if i18n::RegionCode::get_unknown() == region_code {
                continue;
            }
            filter.filter_metadata(&mut metadata);
            finalize_metadata(&mut metadata);

            let main_country_code = metadata.main_country_for_code();
            let country_calling_code = metadata.country_code();
            if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
                instance
                    .country_code_to_non_geographical_metadata_map
                    .insert(country_calling_code, metadata);
            } else {
                instance
                    .region_to_metadata_map
                    .insert(region_code.clone(), metadata);
            }

            let regions = country_calling_code_to_region_map
                .entry(country_calling_code)
                .or_default();
            if main_country_code {
                regions.push_front(region_code);
            } else {
                regions.push_back(region_code);
            }
        }

        instance.country_calling_code_to_region_code_map.extend(
            country_calling_code_to_region_map
                .into_iter()
                .map(|(k, v)| (k, Vec::from(v))),
        );
        // Sort all the pairs in ascending order according to country calling code.
        instance
            .country_calling_code_to_region_code_map
            .sort_by_key(|(code, _)| *code);
        trace!(
            "Loaded metadata for {} regions and {} non-geographical entities",
            instance.region_to_metadata_map.len(),
            instance.country_code_to_non_geographical_metadata_map.len()
        );
        instance
    }

    /// Adds alternate formatting rules, keyed by the country calling code of
    /// each entry.
    pub fn with_alternate_formats(mut self, alternate_formats: PhoneMetadataCollection) -> Self {
        for mut metadata in alternate_formats.metadata {
            if !metadata.has_country_code() {
                warn!("Alternate formats without a country calling code are ignored");
                continue;
            }
            finalize_metadata(&mut metadata);
            self.alternate_formats_map.insert(metadata.country_code(), metadata);
        }
        self
    }
}

impl MetadataSource for MetadataCollection {
    fn metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.region_to_metadata_map.get(region_code)
    }

    fn metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.country_code_to_non_geographical_metadata_map
            .get(&country_calling_code)
    }

    fn alternate_formats_for_country(&self, country_calling_code: i32) -> Option<&PhoneMetadata> {
        self.alternate_formats_map.get(&country_calling_code)
    }

    fn country_calling_code_to_region_codes(&self) -> &[(i32, Vec<String>)] {
        &self.country_calling_code_to_region_code_map
    }
}

/// Expands the placeholders of formatting rules and derives flags which
/// depend on several fields, so lookups never have to do it again.
fn finalize_metadata(metadata: &mut PhoneMetadata) {
    let national_prefix = metadata.national_prefix().to_owned();
    for format in metadata
        .number_format
        .iter_mut()
        .chain(metadata.intl_number_format.iter_mut())
    {
        expand_formatting_rules(format, &national_prefix);
    }

    if !metadata.has_same_mobile_and_fixed_line_pattern() {
        let fixed_line_pattern = metadata.fixed_line.national_number_pattern();
        let same_pattern = !fixed_line_pattern.is_empty()
            && fixed_line_pattern == metadata.mobile.national_number_pattern();
        metadata.set_same_mobile_and_fixed_line_pattern(same_pattern);
    }
}

fn expand_formatting_rules(format: &mut NumberFormat, national_prefix: &str) {
    let np_rule = format.national_prefix_formatting_rule();
    if np_rule.contains(NP_STRING) || np_rule.contains(FG_STRING) {
        let expanded = np_rule
            .replace(NP_STRING, national_prefix)
            .replace(FG_STRING, "$1");
        format.set_national_prefix_formatting_rule(expanded);
    }
    let carrier_rule = format.domestic_carrier_code_formatting_rule();
    if carrier_rule.contains(NP_STRING) || carrier_rule.contains(FG_STRING) {
        let expanded = carrier_rule
            .replace(FG_STRING, "$1")
            .replace(NP_STRING, national_prefix);
        format.set_domestic_carrier_code_formatting_rule(expanded);
    }
}

#[cfg(test)]
mod tests {
    use protobuf::Message;

    use super::MetadataCollection;
    use crate::{
        interfaces::MetadataSource,
        proto_gen::phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection},
    };

    fn region(id: &str, country_code: i32, main: bool) -> PhoneMetadata {
        let mut metadata = PhoneMetadata::new();
        metadata.set_id(id.to_owned());
        metadata.set_country_code(country_code);
        if main {
            metadata.set_main_country_for_code(true);
        }
        metadata
    }

    #[test]
    fn main_region_comes_first() {
        let mut collection = PhoneMetadataCollection::new();
        collection.metadata.push(region("BS", 1, false));
        collection.metadata.push(region("US", 1, true));
        collection.metadata.push(region("001", 800, false));
        collection.metadata.push(region("ZZ", 0, false));
        let metadata = MetadataCollection::new(collection);

        let codes = metadata.country_calling_code_to_region_codes();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0], (1, vec!["US".to_owned(), "BS".to_owned()]));
        assert_eq!(codes[1], (800, vec!["001".to_owned()]));
        assert!(metadata.metadata_for_region("US").is_some());
        assert!(metadata.metadata_for_region("ZZ").is_none());
        assert!(metadata.metadata_for_region("001").is_none());
        assert!(metadata.metadata_for_non_geographical_region(800).is_some());
    }

    #[test]
    fn placeholders_are_expanded_once() {
        let mut gb = region("GB", 44, true);
        gb.set_national_prefix("0".to_owned());
        let mut format = NumberFormat::new();
        format.set_pattern("(\\d{2})(\\d{4})(\\d{4})".to_owned());
        format.set_format("$1 $2 $3".to_owned());
        format.set_national_prefix_formatting_rule("($NP$FG)".to_owned());
        format.set_domestic_carrier_code_formatting_rule("$NP $CC $FG".to_owned());
        gb.number_format.push(format);
        gb.fixed_line.mut_or_insert_default().set_national_number_pattern("\\d{10}".to_owned());
        gb.mobile.mut_or_insert_default().set_national_number_pattern("\\d{10}".to_owned());

        let mut collection = PhoneMetadataCollection::new();
        collection.metadata.push(gb);
        let bytes = collection.write_to_bytes().unwrap();
        let metadata = MetadataCollection::from_bytes(&bytes).unwrap();

        let gb = metadata.metadata_for_region("GB").unwrap();
        assert_eq!(gb.number_format[0].national_prefix_formatting_rule(), "(0$1)");
        assert_eq!(gb.number_format[0].domestic_carrier_code_formatting_rule(), "0 $CC $1");
        assert!(gb.same_mobile_and_fixed_line_pattern());
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(MetadataCollection::from_bytes(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn alternate_formats_are_keyed_by_calling_code() {
        let mut alternate = PhoneMetadataCollection::new();
        alternate.metadata.push(region("", 49, false));
        let metadata = MetadataCollection::new(PhoneMetadataCollection::new())
            .with_alternate_formats(alternate);
        assert!(metadata.alternate_formats_for_country(49).is_some());
        assert!(metadata.alternate_formats_for_country(44).is_none());
    }
}
