//! Property tests for the first-line directive parser.

use proptest::prelude::*;

use lesskit::directive;
use lesskit::options::CompileOptions;

fn non_comment_content() -> impl Strategy<Value = String> {
    "(?s).{0,256}".prop_filter("first line must not be a line comment", |s| {
        !s.lines().next().unwrap_or("").trim_start().starts_with("//")
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The parser never panics, whatever the file starts with.
    #[test]
    fn property_parse_never_panics(
        content in "(?s).{0,512}"
    ) {
        let defaults = CompileOptions::default();
        let _ = directive::parse(&content, &defaults);
    }

    /// PROPERTY: A file whose first line is not a `//` comment inherits the
    /// defaults unchanged.
    #[test]
    fn property_non_comment_first_line_is_identity(
        content in non_comment_content()
    ) {
        let defaults = CompileOptions::default();
        prop_assert_eq!(directive::parse(&content, &defaults), defaults);
    }

    /// PROPERTY: Unknown keys in a directive line never alter the options.
    #[test]
    fn property_unknown_keys_are_ignored(
        key in "[a-zA-Z][a-zA-Z0-9]{0,24}",
        value in "[^,:\\n]{0,32}"
    ) {
        prop_assume!(!lesskit::directive::SUPPORTED_KEYS.contains(&key.as_str()));
        let defaults = CompileOptions::default();
        let content = format!("// {key}: {value}\n.a {{}}");
        prop_assert_eq!(directive::parse(&content, &defaults), defaults);
    }
}
