//! Output-path resolution
//!
//! Computes where compiled CSS lands: template substitution (`$1`/`$2`),
//! project-root variable interpolation, folder and extension inference, and
//! `sourceDir`→`outputDir` directory mirroring. Every computed path is
//! validated against the project boundary before anything is written; a
//! path that escapes the boundary is a hard error, never silently clamped.

use std::path::{Component, Path, PathBuf};

use crate::error::{LessError, LessResult};
use crate::options::{CompileOptions, OutSetting};

/// Extension appended when no `outExt` override is present
pub const DEFAULT_EXT: &str = ".css";

/// Interpolation tokens accepted inside `out`/`main`/`sourceDir`/`outputDir`
/// values. Both substitute the resolved project boundary.
const ROOT_TOKENS: [&str; 2] = ["${workspaceFolder}", "${workspaceRoot}"];

/// Substitute project-root tokens in a configured path
pub fn interpolate(path: &str, boundary: &Path) -> String {
    let root = boundary.to_string_lossy();
    let mut result = path.to_string();
    for token in ROOT_TOKENS {
        if result.contains(token) {
            result = result.replace(token, &root);
        }
    }
    result
}

/// Lexically normalize a path: drop `.` components and resolve `..`
/// against preceding components. Purely textual: the path does not need
/// to exist (outputs usually don't yet).
pub fn normalize(path: &Path) -> PathBuf {
    let mut stack: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match stack.last() {
                Some(Component::Normal(_)) => {
                    stack.pop();
                }
                // "/.." stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                // Leading ".." on a relative path is preserved
                _ => stack.push(component),
            },
            other => stack.push(other),
        }
    }

    stack.iter().map(|c| c.as_os_str()).collect()
}

/// Resolve `path` against `base` unless it is already absolute, then
/// normalize
pub fn resolve_absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Express `target` relative to `base` (both absolute), introducing `..`
/// components as needed
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base_normalized = normalize(base);
    let base: Vec<Component> = base_normalized.components().collect();
    let target_normalized = normalize(target);
    let target: Vec<Component> = target_normalized.components().collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &target[common..] {
        result.push(component.as_os_str());
    }
    result
}

/// Validate that `target` is the boundary itself or nested under it.
/// Returns the normalized path, or a boundary-violation error naming the
/// offending option.
pub fn assert_within_root(
    target: &Path,
    root: &Path,
    option: &'static str,
) -> LessResult<PathBuf> {
    let target = normalize(target);
    let root = normalize(root);

    if target.starts_with(&root) {
        Ok(target)
    } else {
        Err(LessError::BoundaryViolation {
            option,
            path: target,
            root,
        })
    }
}

/// Select the output extension: `outExt` override (dot-prefixed), the empty
/// string when explicitly cleared, or the `.css` default
pub fn choose_extension(options: &CompileOptions) -> String {
    match options.out_ext.as_deref() {
        Some("") => String::new(),
        Some(ext) => ensure_dot_prefixed(ext),
        None => DEFAULT_EXT.to_string(),
    }
}

fn ensure_dot_prefixed(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// A trailing separator marks the value as a directory
fn is_folder(value: &str) -> bool {
    value.ends_with('/') || value.ends_with('\\')
}

/// Compute the final absolute output path for `source_file`, or `None` when
/// output is suppressed (`out: false` / `out: null`).
///
/// Resolution order for the `out` template: `$1`/`$2` substitution, then
/// root-token interpolation, then folder/extension inference, then
/// resolution against the source file's directory. The result must stay
/// within `boundary`.
pub fn choose_output_path(
    options: &CompileOptions,
    source_file: &Path,
    boundary: &Path,
) -> LessResult<Option<PathBuf>> {
    let extension = choose_extension(options);
    let filename = source_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let source_dir = source_file.parent().unwrap_or(Path::new(""));

    let relative_output = match &options.out {
        OutSetting::Suppressed => return Ok(None),
        OutSetting::Path(template) => {
            let substituted = template.replace("$1", filename).replace("$2", &extension);
            let mut interpolated = interpolate(&substituted, boundary);
            if is_folder(&interpolated) {
                interpolated.push_str(filename);
                interpolated.push_str(&extension);
            } else if Path::new(&interpolated).extension().is_none() {
                interpolated.push_str(&extension);
            }
            interpolated
        }
        OutSetting::Default => {
            if let Some(mapped) =
                mapped_output_path(options, source_file, filename, &extension, boundary)
            {
                return assert_within_root(&mapped, boundary, "out").map(Some);
            }
            format!("{filename}{extension}")
        }
    };

    let resolved = resolve_absolute(source_dir, Path::new(&relative_output));
    assert_within_root(&resolved, boundary, "out").map(Some)
}

/// Mirror the source file's position under `sourceDir` into `outputDir`.
/// Returns `None` (falling back to output-alongside-source) when the
/// mapping is not configured or the file lives outside `sourceDir`.
fn mapped_output_path(
    options: &CompileOptions,
    source_file: &Path,
    filename: &str,
    extension: &str,
    boundary: &Path,
) -> Option<PathBuf> {
    let (source_dir, output_dir) = match (&options.source_dir, &options.output_dir) {
        (Some(source), Some(output)) => (source, output),
        _ => return None,
    };

    let source_root = resolve_configured_dir(source_dir, boundary);
    let output_root = resolve_configured_dir(output_dir, boundary);

    let relative = normalize(source_file)
        .strip_prefix(&source_root)
        .ok()?
        .to_path_buf();
    let relative_dir = relative.parent().unwrap_or(Path::new("")).to_path_buf();

    Some(
        output_root
            .join(relative_dir)
            .join(format!("{filename}{extension}")),
    )
}

/// Resolve a configured `sourceDir`/`outputDir` value to an absolute
/// directory: interpolate root tokens, then resolve against the boundary
pub fn resolve_configured_dir(configured: &str, boundary: &Path) -> PathBuf {
    let interpolated = interpolate(configured, boundary);
    resolve_absolute(boundary, Path::new(&interpolated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CompileOptions {
        CompileOptions::default()
    }

    fn out(template: &str) -> CompileOptions {
        CompileOptions {
            out: OutSetting::Path(template.to_string()),
            ..options()
        }
    }

    #[test]
    fn normalize_resolves_dot_and_dotdot() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("a/../../x")), PathBuf::from("../x"));
    }

    #[test]
    fn resolve_absolute_respects_absolute_input() {
        assert_eq!(
            resolve_absolute(Path::new("/base"), Path::new("/other/file.css")),
            PathBuf::from("/other/file.css")
        );
        assert_eq!(
            resolve_absolute(Path::new("/base"), Path::new("sub/file.css")),
            PathBuf::from("/base/sub/file.css")
        );
    }

    #[test]
    fn relative_to_walks_up_and_down() {
        assert_eq!(
            relative_to(Path::new("/p/css"), Path::new("/p/less")),
            PathBuf::from("../less")
        );
        // Unnormalized arguments are normalized before comparison
        assert_eq!(
            relative_to(Path::new("/p/css/./sub/.."), Path::new("/p/x/../less")),
            PathBuf::from("../less")
        );
        assert_eq!(
            relative_to(Path::new("/p/a"), Path::new("/p/a")),
            PathBuf::new()
        );
        assert_eq!(
            relative_to(Path::new("/p"), Path::new("/p/a/b")),
            PathBuf::from("a/b")
        );
    }

    #[test]
    fn within_root_accepts_root_itself_and_descendants() {
        assert!(assert_within_root(Path::new("/p"), Path::new("/p"), "out").is_ok());
        assert!(assert_within_root(Path::new("/p/dist/a.css"), Path::new("/p"), "out").is_ok());
    }

    #[test]
    fn within_root_rejects_escapes_with_option_name() {
        let err = assert_within_root(Path::new("/tmp/evil.css"), Path::new("/p"), "main")
            .unwrap_err();
        match err {
            LessError::BoundaryViolation { option, path, root } => {
                assert_eq!(option, "main");
                assert_eq!(path, PathBuf::from("/tmp/evil.css"));
                assert_eq!(root, PathBuf::from("/p"));
            }
            other => panic!("expected boundary violation, got {other:?}"),
        }
    }

    #[test]
    fn sibling_prefix_is_not_a_descendant() {
        // "/project-evil" shares a string prefix with "/project" but is outside
        assert!(
            assert_within_root(Path::new("/project-evil/a.css"), Path::new("/project"), "out")
                .is_err()
        );
    }

    #[test]
    fn default_output_lands_next_to_source() {
        let path = choose_output_path(&options(), Path::new("/d/test.less"), Path::new("/d"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/d/test.css"));
    }

    #[test]
    fn suppressed_out_produces_no_path() {
        let opts = CompileOptions {
            out: OutSetting::Suppressed,
            ..options()
        };
        let path = choose_output_path(&opts, Path::new("/d/test.less"), Path::new("/d")).unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn template_tokens_substitute_name_and_extension() {
        let path = choose_output_path(&out("$1$2"), Path::new("/d/test.less"), Path::new("/d"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/d/test.css"));
    }

    #[test]
    fn folder_form_appends_name_and_extension() {
        let path = choose_output_path(&out("dist/"), Path::new("/p/styles.less"), Path::new("/p"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/styles.css"));
    }

    #[test]
    fn extensionless_out_gets_extension_appended() {
        let path = choose_output_path(
            &out("/p/dist/styles"),
            Path::new("/p/styles.less"),
            Path::new("/p"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/styles.css"));
    }

    #[test]
    fn out_with_extension_is_used_verbatim() {
        let path = choose_output_path(
            &out("/p/dist/styles.min.css"),
            Path::new("/p/styles.less"),
            Path::new("/p"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/styles.min.css"));
    }

    #[test]
    fn relative_out_resolves_against_source_dir() {
        let path = choose_output_path(
            &out("../out/"),
            Path::new("/var/dev/test.less"),
            Path::new("/var"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path, PathBuf::from("/var/out/test.css"));
    }

    #[test]
    fn workspace_folder_token_is_interpolated() {
        let path = choose_output_path(
            &out("${workspaceFolder}/test.css"),
            Path::new("/home/abc/dev/project/css/test.less"),
            Path::new("/home/abc/dev/project"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path, PathBuf::from("/home/abc/dev/project/test.css"));
    }

    #[test]
    fn workspace_root_token_is_interpolated() {
        let path = choose_output_path(
            &out("${workspaceRoot}/dist/"),
            Path::new("/p/src/a.less"),
            Path::new("/p"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/a.css"));
    }

    #[test]
    fn out_escaping_boundary_fails() {
        let err = choose_output_path(
            &out("../../../tmp/evil.css"),
            Path::new("/workspace/project/styles/app.less"),
            Path::new("/workspace/project"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LessError::BoundaryViolation { option: "out", .. }
        ));
    }

    #[test]
    fn custom_extension_variants() {
        let dotted = CompileOptions {
            out: OutSetting::Path("dist/".to_string()),
            out_ext: Some(".wxss".to_string()),
            ..options()
        };
        let path = choose_output_path(&dotted, Path::new("/p/styles.less"), Path::new("/p"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/styles.wxss"));

        let bare = CompileOptions {
            out_ext: Some("wxss".to_string()),
            ..options()
        };
        let path = choose_output_path(&bare, Path::new("/p/styles.less"), Path::new("/p"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/p/styles.wxss"));
    }

    #[test]
    fn empty_extension_appends_nothing() {
        let opts = CompileOptions {
            out: OutSetting::Path("dist/".to_string()),
            out_ext: Some(String::new()),
            ..options()
        };
        let path = choose_output_path(&opts, Path::new("/p/styles.less"), Path::new("/p"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/p/dist/styles"));
    }

    #[test]
    fn source_dir_mapping_mirrors_subdirectories() {
        let opts = CompileOptions {
            source_dir: Some("${workspaceFolder}/less".to_string()),
            output_dir: Some("${workspaceFolder}/css".to_string()),
            ..options()
        };
        let root = Path::new("/root");

        let path = choose_output_path(&opts, Path::new("/root/less/a/b.less"), root)
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/root/css/a/b.css"));

        let path = choose_output_path(&opts, Path::new("/root/less/views/calls/view.less"), root)
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/root/css/views/calls/view.css"));
    }

    #[test]
    fn source_outside_source_dir_falls_back_to_sibling_output() {
        let opts = CompileOptions {
            source_dir: Some("/root/less".to_string()),
            output_dir: Some("/root/css".to_string()),
            ..options()
        };
        let path = choose_output_path(&opts, Path::new("/root/other/c.less"), Path::new("/root"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/root/other/c.css"));
    }

    #[test]
    fn mapping_with_relative_dirs_resolves_against_boundary() {
        let opts = CompileOptions {
            source_dir: Some("less".to_string()),
            output_dir: Some("css".to_string()),
            ..options()
        };
        let path = choose_output_path(&opts, Path::new("/p/less/style/a.less"), Path::new("/p"))
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("/p/css/style/a.css"));
    }
}
