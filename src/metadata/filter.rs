// Copyright (C) 2016 The Libphonenumber Authors
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

use std::collections::{BTreeMap, BTreeSet};

use protobuf::MessageField;
use thiserror::Error;

use crate::proto_gen::phonemetadata::{PhoneMetadata, PhoneNumberDesc};

/// Descs of `PhoneMetadata` which may be filtered, by their metadata names.
const EXCLUDABLE_PARENT_FIELDS: [&str; 16] = [
    "fixedLine",
    "mobile",
    "tollFree",
    "premiumRate",
    "sharedCost",
    "personalNumber",
    "voip",
    "pager",
    "uan",
    "emergency",
    "voicemail",
    "shortCode",
    "standardRate",
    "carrierSpecific",
    "smsServices",
    "noInternationalDialling",
];

/// Fields of `PhoneNumberDesc` which may be filtered.
const EXCLUDABLE_CHILD_FIELDS: [&str; 4] = [
    "nationalNumberPattern",
    "possibleLength",
    "possibleLengthLocalOnly",
    "exampleNumber",
];

/// Scalar fields of `PhoneMetadata` which may be filtered.
const EXCLUDABLE_CHILDLESS_FIELDS: [&str; 7] = [
    "preferredInternationalPrefix",
    "nationalPrefix",
    "preferredExtnPrefix",
    "nationalPrefixTransformRule",
    "sameMobileAndFixedLinePattern",
    "mainCountryForCode",
    "mobileNumberPortableRegion",
];

#[derive(Debug, PartialEq, Error)]
pub enum MetadataFilterError {
    #[error("Empty string should not be passed to the metadata filter")]
    EmptyInput,
    #[error("Leading, trailing, or duplicate colons in {0}")]
    EmptyGroup(String),
    #[error("{field} given more than once in {context}")]
    Duplicate { field: String, context: String },
    #[error("Unexpected entry {0}")]
    UnexpectedEntry(String),
    #[error("Unexpected parent {0}")]
    UnexpectedParent(String),
    #[error("Unexpected child {0}")]
    UnexpectedChild(String),
    #[error("Incorrect location of parentheses in {0}")]
    MisplacedParentheses(String),
    #[error("{child} is present by itself so remove it from {parent}'s group")]
    RedundantChild { child: String, parent: String },
}

type FieldMap = BTreeMap<&'static str, BTreeSet<&'static str>>;

/// Strips fields from metadata before it is used, to shrink the memory held
/// by builds that never need them.
///
/// The blacklist maps a parent (a number desc) to the child fields dropped
/// from it, and a childless field to an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFilter {
    blacklist: FieldMap,
}

impl MetadataFilter {
    /// A filter which keeps everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drops example numbers from every desc.
    pub fn for_lite_build() -> Self {
        Self {
            blacklist: FieldMap::from_iter(
                EXCLUDABLE_PARENT_FIELDS
                    .iter()
                    .map(|parent| (*parent, BTreeSet::from(["exampleNumber"]))),
            ),
        }
    }

    /// Keeps only the mobile desc (and the fields no filter may touch).
    pub fn for_special_build() -> Self {
        let mut blacklist = FieldMap::new();
        for parent in EXCLUDABLE_PARENT_FIELDS.iter().filter(|p| **p != "mobile") {
            blacklist.insert(*parent, BTreeSet::from(EXCLUDABLE_CHILD_FIELDS));
        }
        for field in EXCLUDABLE_CHILDLESS_FIELDS {
            blacklist.insert(field, BTreeSet::new());
        }
        Self { blacklist }
    }

    /// Builds a filter from a colon separated list of groups. A group is a
    /// parent (`fixedLine`), a parent with children (`mobile(exampleNumber)`),
    /// a child applied to every parent (`possibleLength`) or a childless field
    /// (`nationalPrefix`). Whitespace is ignored.
    pub fn for_excludable_fields(fields: &str) -> Result<Self, MetadataFilterError> {
        Ok(Self {
            blacklist: parse_field_map_from_string(fields)?,
        })
    }

    /// Clears every field this filter excludes.
    pub fn filter_metadata(&self, metadata: &mut PhoneMetadata) {
        if self.blacklist.is_empty() {
            return;
        }
        for parent in EXCLUDABLE_PARENT_FIELDS {
            let desc = desc_field_mut(metadata, parent);
            if let Some(desc) = desc.as_mut() {
                self.filter_desc(parent, desc);
            }
        }
        if self.should_drop_field("preferredInternationalPrefix") {
            metadata.clear_preferred_international_prefix();
        }
        if self.should_drop_field("nationalPrefix") {
            metadata.clear_national_prefix();
        }
        if self.should_drop_field("preferredExtnPrefix") {
            metadata.clear_preferred_extn_prefix();
        }
        if self.should_drop_field("nationalPrefixTransformRule") {
            metadata.clear_national_prefix_transform_rule();
        }
        if self.should_drop_field("sameMobileAndFixedLinePattern") {
            metadata.clear_same_mobile_and_fixed_line_pattern();
        }
        if self.should_drop_field("mainCountryForCode") {
            metadata.clear_main_country_for_code();
        }
        if self.should_drop_field("mobileNumberPortableRegion") {
            metadata.clear_mobile_number_portable_region();
        }
    }

    fn filter_desc(&self, parent: &str, desc: &mut PhoneNumberDesc) {
        if self.should_drop(parent, "nationalNumberPattern") {
            desc.clear_national_number_pattern();
        }
        if self.should_drop(parent, "possibleLength") {
            desc.possible_length.clear();
        }
        if self.should_drop(parent, "possibleLengthLocalOnly") {
            desc.possible_length_local_only.clear();
        }
        if self.should_drop(parent, "exampleNumber") {
            desc.clear_example_number();
        }
    }

    fn should_drop(&self, parent: &str, child: &str) -> bool {
        self.blacklist
            .get(parent)
            .is_some_and(|children| children.contains(child))
    }

    fn should_drop_field(&self, field: &str) -> bool {
        self.blacklist.contains_key(field)
    }
}

fn desc_field_mut<'a>(
    metadata: &'a mut PhoneMetadata,
    parent: &str,
) -> &'a mut MessageField<PhoneNumberDesc> {
    match parent {
        "fixedLine" => &mut metadata.fixed_line,
        "mobile" => &mut metadata.mobile,
        "tollFree" => &mut metadata.toll_free,
        "premiumRate" => &mut metadata.premium_rate,
        "sharedCost" => &mut metadata.shared_cost,
        "personalNumber" => &mut metadata.personal_number,
        "voip" => &mut metadata.voip,
        "pager" => &mut metadata.pager,
        "uan" => &mut metadata.uan,
        "emergency" => &mut metadata.emergency,
        "voicemail" => &mut metadata.voicemail,
        "shortCode" => &mut metadata.short_code,
        "standardRate" => &mut metadata.standard_rate,
        "carrierSpecific" => &mut metadata.carrier_specific,
        "smsServices" => &mut metadata.sms_services,
        _ => &mut metadata.no_international_dialling,
    }
}

fn known(fields: &[&'static str], name: &str) -> Option<&'static str> {
    fields.iter().copied().find(|field| *field == name)
}

fn parse_field_map_from_string(fields: &str) -> Result<FieldMap, MetadataFilterError> {
    let fields = fields
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    if fields.is_empty() {
        return Err(MetadataFilterError::EmptyInput);
    }

    let mut field_map = FieldMap::new();
    let mut wildcard_children = BTreeSet::new();
    for group in fields.split(':') {
        if group.is_empty() {
            return Err(MetadataFilterError::EmptyGroup(fields.clone()));
        }
        let duplicate = |field: &str| MetadataFilterError::Duplicate {
            field: field.to_owned(),
            context: fields.clone(),
        };
        match (group.find('('), group.find(')')) {
            (None, None) => {
                if let Some(parent) = known(&EXCLUDABLE_PARENT_FIELDS, group) {
                    if field_map.contains_key(parent) {
                        return Err(duplicate(parent));
                    }
                    field_map.insert(parent, BTreeSet::from(EXCLUDABLE_CHILD_FIELDS));
                } else if let Some(field) = known(&EXCLUDABLE_CHILDLESS_FIELDS, group) {
                    if field_map.contains_key(field) {
                        return Err(duplicate(field));
                    }
                    field_map.insert(field, BTreeSet::new());
                } else if let Some(child) = known(&EXCLUDABLE_CHILD_FIELDS, group) {
                    if !wildcard_children.insert(child) {
                        return Err(duplicate(child));
                    }
                } else {
                    return Err(MetadataFilterError::UnexpectedEntry(group.to_owned()));
                }
            }
            (Some(left), Some(right)) if left > 0 && right == group.len() - 1 => {
                let parent = known(&EXCLUDABLE_PARENT_FIELDS, &group[..left])
                    .ok_or_else(|| MetadataFilterError::UnexpectedParent(group[..left].to_owned()))?;
                if field_map.contains_key(parent) {
                    return Err(duplicate(parent));
                }
                let mut children = BTreeSet::new();
                for child in group[left + 1..right].split(',') {
                    let child = known(&EXCLUDABLE_CHILD_FIELDS, child)
                        .ok_or_else(|| MetadataFilterError::UnexpectedChild(child.to_owned()))?;
                    if !children.insert(child) {
                        return Err(MetadataFilterError::Duplicate {
                            field: child.to_owned(),
                            context: group.to_owned(),
                        });
                    }
                }
                field_map.insert(parent, children);
            }
            _ => return Err(MetadataFilterError::MisplacedParentheses(group.to_owned())),
        }
    }

    for wildcard_child in wildcard_children {
        for parent in EXCLUDABLE_PARENT_FIELDS {
            let children = field_map.entry(parent).or_default();
            if !children.insert(wildcard_child) && children.len() != EXCLUDABLE_CHILD_FIELDS.len() {
                return Err(MetadataFilterError::RedundantChild {
                    child: wildcard_child.to_owned(),
                    parent: parent.to_owned(),
                });
            }
        }
    }
    Ok(field_map)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{EXCLUDABLE_CHILD_FIELDS, MetadataFilter, MetadataFilterError};
    use crate::proto_gen::phonemetadata::PhoneMetadata;

    fn sample_metadata() -> PhoneMetadata {
        let mut metadata = PhoneMetadata::new();
        metadata.set_national_prefix("0".to_owned());
        metadata.set_preferred_extn_prefix(" ext. ".to_owned());
        for desc in [&mut metadata.fixed_line, &mut metadata.mobile] {
            let desc = desc.mut_or_insert_default();
            desc.set_national_number_pattern("\\d{7}".to_owned());
            desc.set_example_number("1234567".to_owned());
            desc.possible_length = vec![7];
            desc.possible_length_local_only = vec![5];
        }
        metadata
    }

    #[test]
    fn parent_group_drops_all_children() {
        let filter = MetadataFilter::for_excludable_fields("fixedLine").unwrap();
        let expected = BTreeSet::from(EXCLUDABLE_CHILD_FIELDS);
        assert_eq!(filter.blacklist.get("fixedLine"), Some(&expected));
        assert_eq!(filter.blacklist.len(), 1);
    }

    #[test]
    fn parent_with_children_and_wildcards() {
        let filter = MetadataFilter::for_excludable_fields(
            " mobile(nationalNumberPattern, possibleLength) : exampleNumber : nationalPrefix",
        )
        .unwrap();
        assert_eq!(
            filter.blacklist.get("mobile"),
            Some(&BTreeSet::from(["nationalNumberPattern", "possibleLength", "exampleNumber"]))
        );
        assert_eq!(filter.blacklist.get("voip"), Some(&BTreeSet::from(["exampleNumber"])));
        assert_eq!(filter.blacklist.get("nationalPrefix"), Some(&BTreeSet::new()));
    }

    #[test]
    fn malformed_strings_fail_fast() {
        let parse = MetadataFilter::for_excludable_fields;
        assert_eq!(parse("  "), Err(MetadataFilterError::EmptyInput));
        assert!(matches!(parse("mobile::voip"), Err(MetadataFilterError::EmptyGroup(_))));
        assert!(matches!(parse(":mobile"), Err(MetadataFilterError::EmptyGroup(_))));
        assert!(matches!(parse("mobile:mobile"), Err(MetadataFilterError::Duplicate { .. })));
        assert!(matches!(parse("mobile(exampleNumber):mobile"), Err(MetadataFilterError::Duplicate { .. })));
        assert!(matches!(
            parse("mobile(exampleNumber,exampleNumber)"),
            Err(MetadataFilterError::Duplicate { .. })
        ));
        assert_eq!(parse("landline"), Err(MetadataFilterError::UnexpectedEntry("landline".to_owned())));
        assert_eq!(
            parse("landline(exampleNumber)"),
            Err(MetadataFilterError::UnexpectedParent("landline".to_owned()))
        );
        assert_eq!(
            parse("mobile(nationalPrefix)"),
            Err(MetadataFilterError::UnexpectedChild("nationalPrefix".to_owned()))
        );
        assert!(matches!(parse("mobile(exampleNumber"), Err(MetadataFilterError::MisplacedParentheses(_))));
        assert!(matches!(parse("(exampleNumber)"), Err(MetadataFilterError::MisplacedParentheses(_))));
        assert!(matches!(
            parse("mobile(exampleNumber):exampleNumber"),
            Err(MetadataFilterError::RedundantChild { .. })
        ));
    }

    #[test]
    fn filtering_clears_selected_fields() {
        let mut metadata = sample_metadata();
        let filter =
            MetadataFilter::for_excludable_fields("fixedLine(exampleNumber,possibleLength):nationalPrefix")
                .unwrap();
        filter.filter_metadata(&mut metadata);
        assert!(!metadata.fixed_line.has_example_number());
        assert!(metadata.fixed_line.possible_length.is_empty());
        assert!(metadata.fixed_line.has_national_number_pattern());
        assert_eq!(metadata.fixed_line.possible_length_local_only, vec![5]);
        assert!(metadata.mobile.has_example_number());
        assert!(!metadata.has_national_prefix());
        assert!(metadata.has_preferred_extn_prefix());
    }

    #[test]
    fn lite_and_special_builds() {
        let mut metadata = sample_metadata();
        MetadataFilter::for_lite_build().filter_metadata(&mut metadata);
        assert!(!metadata.fixed_line.has_example_number());
        assert!(!metadata.mobile.has_example_number());
        assert!(metadata.mobile.has_national_number_pattern());

        let mut metadata = sample_metadata();
        MetadataFilter::for_special_build().filter_metadata(&mut metadata);
        assert!(!metadata.fixed_line.has_national_number_pattern());
        assert!(metadata.mobile.has_national_number_pattern());
        assert!(!metadata.has_preferred_extn_prefix());

        let mut metadata = sample_metadata();
        MetadataFilter::empty().filter_metadata(&mut metadata);
        assert_eq!(metadata, sample_metadata());
    }
}
