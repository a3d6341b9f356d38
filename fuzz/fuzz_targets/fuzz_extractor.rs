// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![no_main]

use gitcomm::services::extractor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let extraction = extractor::extract_detailed(raw);
        assert!(!extraction.message.is_empty());
        assert_eq!(extraction.message, extractor::extract(raw));
        if !extraction.is_sentinel() {
            assert_eq!(extraction.message, extraction.message.trim());
        }
    }
});
