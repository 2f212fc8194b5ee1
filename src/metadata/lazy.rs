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

use std::sync::OnceLock;

use log::{error, trace};

use crate::{interfaces::MetadataSource, proto_gen::phonemetadata::PhoneMetadata};

use super::MetadataCollection;

type Loader = Box<dyn Fn() -> MetadataCollection + Send + Sync>;

/// Metadata source which loads its tables on first use.
///
/// However many threads ask for metadata concurrently, the loader runs at
/// most once and every caller observes the same tables afterwards.
pub struct LazyMetadataSource {
    loader: Loader,
    collection: OnceLock<MetadataCollection>,
}

impl LazyMetadataSource {
    pub fn new(loader: impl Fn() -> MetadataCollection + Send + Sync + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            collection: OnceLock::new(),
        }
    }

    /// Decodes `bytes` on first use. Undecodable metadata leaves the source
    /// empty, so every lookup answers `None`.
    pub fn from_bytes(bytes: &'static [u8]) -> Self {
        Self::new(move || {
            MetadataCollection::from_bytes(bytes).unwrap_or_else(|err| {
                error!("Could not parse metadata: {}", err);
                MetadataCollection::default()
            })
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.collection.get().is_some()
    }

    fn collection(&self) -> &MetadataCollection {
        self.collection.get_or_init(|| {
            trace!("Loading metadata on first use");
            (self.loader)()
        })
    }
}

impl MetadataSource for LazyMetadataSource {
    fn metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.collection().metadata_for_region(region_code)
    }

    fn metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.collection()
            .metadata_for_non_geographical_region(country_calling_code)
    }

    fn alternate_formats_for_country(&self, country_calling_code: i32) -> Option<&PhoneMetadata> {
        self.collection()
            .alternate_formats_for_country(country_calling_code)
    }

    fn country_calling_code_to_region_codes(&self) -> &[(i32, Vec<String>)] {
        self.collection().country_calling_code_to_region_codes()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use super::LazyMetadataSource;
    use crate::{
        interfaces::MetadataSource,
        metadata::MetadataCollection,
        proto_gen::phonemetadata::{PhoneMetadata, PhoneMetadataCollection},
    };

    #[test]
    fn loads_exactly_once_across_threads() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let source = Arc::new(LazyMetadataSource::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut metadata = PhoneMetadata::new();
            metadata.set_id("GB".to_owned());
            metadata.set_country_code(44);
            let mut collection = PhoneMetadataCollection::new();
            collection.metadata.push(metadata);
            MetadataCollection::new(collection)
        }));
        assert!(!source.is_loaded());

        let handles = (0..8)
            .map(|_| {
                let source = source.clone();
                thread::spawn(move || source.metadata_for_region("GB").map(|m| m.country_code()))
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(44));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(source.is_loaded());
    }

    #[test]
    fn undecodable_bytes_leave_source_empty() {
        static GARBAGE: [u8; 3] = [0xff, 0xff, 0xff];
        let source = LazyMetadataSource::from_bytes(&GARBAGE);
        assert!(source.metadata_for_region("GB").is_none());
        assert!(source.country_calling_code_to_region_codes().is_empty());
    }
}
