//! Property tests for path normalization and boundary enforcement.

use proptest::prelude::*;
use std::path::{Path, PathBuf};

use lesskit::resolve::{assert_within_root, normalize, resolve_absolute};

fn path_segments() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap(),
        Just("..".to_string()),
        Just(".".to_string()),
    ];
    proptest::collection::vec(segment, 0..=8).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Normalization never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(
        s in "(?s).{0,256}"
    ) {
        let _ = normalize(Path::new(&s));
    }

    /// PROPERTY: Normalization is idempotent.
    #[test]
    fn property_normalize_is_idempotent(
        suffix in path_segments()
    ) {
        let path = PathBuf::from(format!("/root/{suffix}"));
        let once = normalize(&path);
        prop_assert_eq!(normalize(&once), once);
    }

    /// PROPERTY: A normalized absolute path contains no `.` or `..`
    /// components.
    #[test]
    fn property_normalized_absolute_paths_are_clean(
        suffix in path_segments()
    ) {
        let path = PathBuf::from(format!("/root/{suffix}"));
        let normalized = normalize(&path);
        for component in normalized.components() {
            prop_assert!(!matches!(
                component,
                std::path::Component::CurDir | std::path::Component::ParentDir
            ));
        }
    }

    /// PROPERTY: Boundary checking either errors or returns a path that is
    /// the root itself or nested under it. Never both, never neither.
    #[test]
    fn property_boundary_check_is_sound(
        suffix in path_segments()
    ) {
        let root = Path::new("/workspace/project");
        let candidate = resolve_absolute(root, Path::new(&suffix));

        match assert_within_root(&candidate, root, "out") {
            Ok(path) => prop_assert!(path.starts_with(root)),
            Err(_) => prop_assert!(!candidate.starts_with(root)),
        }
    }
}
