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

use std::sync::{Arc, Once};

use crate::{MetadataCollection, PhoneNumberUtil};

mod phonenumberutil_tests;

static ONCE: Once = Once::new();

fn init_logger() {
    ONCE.call_once(|| {
        // Another test binary may already own the global logger.
        let _ = colog::default_builder()
            .filter_level(log::LevelFilter::Trace)
            .try_init();
    });
}

pub(crate) fn get_phone_util() -> PhoneNumberUtil {
    init_logger();
    let metadata = MetadataCollection::new(test_metadata::test_metadata())
        .with_alternate_formats(test_metadata::alternate_formats());
    PhoneNumberUtil::new(Arc::new(metadata))
}

/// Same plans without any alternate formats.
pub(crate) fn get_phone_util_without_alternate_formats() -> PhoneNumberUtil {
    init_logger();
    PhoneNumberUtil::new_for_metadata(test_metadata::test_metadata())
}
