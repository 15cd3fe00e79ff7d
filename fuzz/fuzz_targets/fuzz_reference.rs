#![no_main]

use libfuzzer_sys::fuzz_target;
use pkgbridge::PackageReference;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(reference) = PackageReference::parse(raw) {
            assert!(!reference.address().is_empty());
            assert!(reference.key().starts_with(reference.address()));
            if reference.is_source() {
                assert!(reference.address().split('/').all(|s| !s.is_empty()));
                assert!(reference.address().ends_with(reference.short_name()));
            } else {
                assert!(!reference.has_pin());
            }
        }
    }
});
