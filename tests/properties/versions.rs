//! Property tests for version ordering.

use std::cmp::Ordering;

use proptest::prelude::*;

use pkgbridge::domain::value_objects::PackageVersion;

fn version() -> impl Strategy<Value = String> {
    proptest::string::string_regex("([0-9]{1,2}:)?[0-9a-z]{1,4}([._+][0-9a-z]{1,4}){0,3}(-[0-9]{1,2})?").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: comparison is antisymmetric.
    #[test]
    fn property_ordering_is_antisymmetric(a in version(), b in version()) {
        let (va, vb) = (PackageVersion::parse(&a), PackageVersion::parse(&b));
        prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
    }

    /// PROPERTY: every version equals itself.
    #[test]
    fn property_ordering_is_reflexive(a in version()) {
        let v = PackageVersion::parse(&a);
        prop_assert_eq!(v.cmp(&v), Ordering::Equal);
    }

    /// PROPERTY: plain numeric versions order numerically.
    #[test]
    fn property_numeric_versions_order_numerically(
        a in 0u32..10_000,
        b in 0u32..10_000,
        minor in 0u32..100,
    ) {
        let va = PackageVersion::parse(&format!("{a}.{minor}-1"));
        let vb = PackageVersion::parse(&format!("{b}.{minor}-1"));
        prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
    }

    /// PROPERTY: a higher epoch wins over any pkgver.
    #[test]
    fn property_epoch_dominates(a in version(), b in version(), epoch in 1u32..50) {
        let plain = PackageVersion::parse(a.split_once(':').map(|(_, v)| v).unwrap_or(&a));
        let bumped_b = b.split_once(':').map(|(_, v)| v).unwrap_or(&b);
        let bumped = PackageVersion::parse(&format!("{epoch}:{bumped_b}"));
        prop_assert_eq!(bumped.cmp(&plain), Ordering::Greater);
    }

    /// PROPERTY: a bumped pkgrel is newer for the same pkgver.
    #[test]
    fn property_pkgrel_breaks_ties(rel in 1u32..100) {
        let older = PackageVersion::parse(&format!("1.0-{rel}"));
        let newer = PackageVersion::parse(&format!("1.0-{}", rel + 1));
        prop_assert!(newer > older);
    }
}
