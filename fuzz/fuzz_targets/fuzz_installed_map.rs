#![no_main]

use libfuzzer_sys::fuzz_target;
use pkgbridge::domain::entities::InstalledSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let set = InstalledSet::parse(content);
        assert_eq!(InstalledSet::parse(&set.render()), set);
    }
});
