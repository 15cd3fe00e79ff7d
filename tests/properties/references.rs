//! Property tests for reference classification.

use proptest::prelude::*;

use pkgbridge::domain::entities::{Namespace, PackageGroups, PackageReference};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9][a-z0-9._-]{0,12}")
        .unwrap()
        .prop_filter("not a .git suffix", |s| !s.ends_with(".git"))
}

fn native_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9][a-z0-9+._@-]{0,20}").unwrap()
}

fn pin() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._/-]{0,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: classification never panics.
    #[test]
    fn property_parse_never_panics(raw in ".*") {
        let _ = PackageReference::parse(&raw);
    }

    /// PROPERTY: a token without `/` is Native, carries no pin, and is its
    /// own address and short name.
    #[test]
    fn property_tokens_without_slash_are_native(name in native_name()) {
        let r = PackageReference::parse(&name).unwrap();
        prop_assert_eq!(r.namespace(), Namespace::Native);
        prop_assert_eq!(r.address(), name.as_str());
        prop_assert_eq!(r.short_name(), name.as_str());
        prop_assert!(!r.has_pin());
    }

    /// PROPERTY: `address@pin` splits at the first `@`; the short name is
    /// the last address segment and the key restores the token.
    #[test]
    fn property_source_tokens_split_on_first_at(
        segments in proptest::collection::vec(segment(), 2..5),
        pin in pin(),
    ) {
        let address = segments.join("/");
        let token = if pin.is_empty() { address.clone() } else { format!("{address}@{pin}") };

        let r = PackageReference::parse(&token).unwrap();
        prop_assert_eq!(r.namespace(), Namespace::Source);
        prop_assert_eq!(r.address(), address.as_str());
        prop_assert_eq!(r.short_name(), segments.last().unwrap().as_str());
        prop_assert_eq!(r.pin(), pin.as_str());
        prop_assert_eq!(r.key(), token);
    }

    /// PROPERTY: scheme prefixes and a trailing `.git` or `/` do not change
    /// the address.
    #[test]
    fn property_decorations_are_stripped(
        segments in proptest::collection::vec(segment(), 2..5),
        scheme in prop_oneof![Just(""), Just("https://"), Just("git://"), Just("ssh://")],
        suffix in prop_oneof![Just(""), Just(".git"), Just("/")],
    ) {
        let address = segments.join("/");
        let r = PackageReference::parse(&format!("{scheme}{address}{suffix}")).unwrap();
        prop_assert_eq!(r.address(), address.as_str());
        prop_assert_eq!(r.clone_url("https"), format!("https://{address}"));
    }

    /// PROPERTY: splitting keeps every reference and the input order within
    /// each namespace.
    #[test]
    fn property_split_preserves_order(
        tokens in proptest::collection::vec(
            prop_oneof![
                native_name(),
                proptest::collection::vec(segment(), 2..4).prop_map(|s| s.join("/")),
            ],
            0..12,
        )
    ) {
        let groups = PackageGroups::classify(&tokens).unwrap();
        prop_assert_eq!(groups.native.len() + groups.source.len(), tokens.len());

        let native: Vec<&str> = tokens.iter().filter(|t| !t.contains('/')).map(String::as_str).collect();
        let classified: Vec<&str> = groups.native.iter().map(|r| r.address()).collect();
        prop_assert_eq!(classified, native);

        let source: Vec<String> = tokens.iter().filter(|t| t.contains('/')).cloned().collect();
        let classified: Vec<String> = groups.source.iter().map(|r| r.key()).collect();
        prop_assert_eq!(classified, source);
    }
}
