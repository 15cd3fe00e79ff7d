#![no_main]

use libfuzzer_sys::fuzz_target;
use pkgbridge::domain::services::manifest;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let deps = manifest::read_dependencies(content);
        let _ = manifest::read_scalar(content, "pkgname");
        let _ = manifest::dependency_groups(content);
        let _ = manifest::rewrite_sources(content, &deps);
    }
});
