//! Property tests for artifact file names.

use proptest::prelude::*;

use pkgbridge::domain::entities::{is_artifact_name, package_name_from_filename, RegistryArtifact};

fn package_name() -> impl Strategy<Value = String> {
    // Dashes inside the name are the interesting case.
    proptest::string::string_regex("[a-z0-9][a-z0-9+_.]{0,8}(-[a-z0-9+_.]{1,8}){0,3}").unwrap()
}

fn pkgver() -> impl Strategy<Value = String> {
    proptest::string::string_regex("([0-9]{1,3}:)?[0-9][0-9a-z.+_]{0,8}").unwrap()
}

fn arch() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x86_64".to_string()),
        Just("aarch64".to_string()),
        Just("any".to_string())
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the package name is everything before the last three
    /// dash-delimited tokens, whatever dashes it contains.
    #[test]
    fn property_name_is_recovered(
        name in package_name(),
        ver in pkgver(),
        rel in 1u32..20,
        arch in arch(),
    ) {
        let filename = format!("{name}-{ver}-{rel}-{arch}.pkg.tar.zst");
        prop_assert!(is_artifact_name(&filename));
        prop_assert_eq!(package_name_from_filename(&filename).unwrap(), name.clone());

        let artifact = RegistryArtifact::from_filename(&filename).unwrap();
        prop_assert_eq!(artifact.name(), name.as_str());
        prop_assert_eq!(artifact.arch(), arch.as_str());
        prop_assert_eq!(artifact.version().as_str(), format!("{ver}-{rel}"));
        prop_assert_eq!(artifact.signature_filename(), format!("{filename}.sig"));
    }

    /// PROPERTY: file name parsing never panics.
    #[test]
    fn property_from_filename_never_panics(raw in ".*") {
        let _ = RegistryArtifact::from_filename(&raw);
        let _ = package_name_from_filename(&raw);
    }

    /// PROPERTY: signatures are never mistaken for artifacts.
    #[test]
    fn property_signatures_are_not_artifacts(name in package_name()) {
        let filename = format!("{name}-1.0-1-any.pkg.tar.zst.sig");
        prop_assert!(!is_artifact_name(&filename));
    }
}
