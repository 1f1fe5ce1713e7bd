//! Property tests for reverse import resolution.

use proptest::prelude::*;
use std::path::Path;

use lesskit::imports::imports_target;

fn import_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_-]{0,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Scanning never panics on arbitrary file content.
    #[test]
    fn property_scan_never_panics(
        content in "(?s).{0,512}"
    ) {
        let _ = imports_target(
            Path::new("/p/app.less"),
            &content,
            Path::new("/p/target.less"),
        );
    }

    /// PROPERTY: Repeated invocations with identical input always agree.
    #[test]
    fn property_resolution_is_stable(
        name in import_name()
    ) {
        let importer = Path::new("/p/styles/app.less");
        let content = format!("@import \"./{name}\";");
        let target_path = format!("/p/styles/{name}.less");
        let target = Path::new(&target_path);

        let first = imports_target(importer, &content, target);
        for _ in 0..5 {
            prop_assert_eq!(imports_target(importer, &content, target), first);
        }
        prop_assert!(first);
    }

    /// PROPERTY: An extensionless import of `name` always matches both the
    /// `.less` sibling and the directory index form.
    #[test]
    fn property_extensionless_import_matches_both_forms(
        name in import_name()
    ) {
        let importer = Path::new("/p/app.less");
        let content = format!("@import \"{name}\";");

        let sibling = format!("/p/{name}.less");
        let index = format!("/p/{name}/index.less");
        prop_assert!(imports_target(importer, &content, Path::new(&sibling)));
        prop_assert!(imports_target(importer, &content, Path::new(&index)));
    }
}
