//! Compile option schema
//!
//! A closed set of per-file compilation options. Inherited project defaults
//! come from the config file; per-file overrides come from the directive
//! parser. Unknown keys never reach this struct: the directive parser drops
//! them and serde rejects them in config files at the `[compile]` table.

use serde::{Deserialize, Deserializer};

/// Where compiled CSS should go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutSetting {
    /// No override: output lands next to the source file, or follows the
    /// `sourceDir`/`outputDir` mapping when both are configured
    #[default]
    Default,
    /// `out: false` / `out: null`: this file produces no output
    Suppressed,
    /// Path or template string (`$1` = extensionless name, `$2` = extension;
    /// a trailing separator means "directory")
    Path(String),
}

impl<'de> Deserialize<'de> for OutSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Path(String),
        }

        // A missing key never reaches this impl (serde uses the field
        // default); an explicit null means "no output", like `out: false`.
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Flag(true)) => OutSetting::Default,
            None | Some(Raw::Flag(false)) => OutSetting::Suppressed,
            Some(Raw::Path(path)) => OutSetting::Path(path),
        })
    }
}

/// Merged compilation options for one file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompileOptions {
    /// Compile these files instead of the edited one (ordered; may repeat
    /// in a directive line to accumulate)
    #[serde(deserialize_with = "one_or_many")]
    pub main: Vec<String>,
    pub out: OutSetting,
    /// Output extension override. `Some("")` suppresses the extension
    /// entirely; `None` means the default `.css`.
    pub out_ext: Option<String>,
    /// Source root for directory mirroring (used together with `outputDir`)
    pub source_dir: Option<String>,
    /// Output root for directory mirroring (used together with `sourceDir`)
    pub output_dir: Option<String>,
    pub source_map: bool,
    pub source_map_file_inline: bool,
    pub compress: bool,
    pub relative_urls: bool,
    pub ie_compat: bool,
    /// Browserslist spec for the autoprefixer hook; entries separated by
    /// `,` or `;`
    #[serde(deserialize_with = "string_or_list")]
    pub autoprefixer: Option<String>,
    pub javascript_enabled: bool,
    pub math: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            main: Vec::new(),
            out: OutSetting::Default,
            out_ext: None,
            source_dir: None,
            output_dir: None,
            source_map: false,
            source_map_file_inline: false,
            compress: false,
            relative_urls: false,
            // Less renders with IE compatibility on unless disabled
            ie_compat: true,
            autoprefixer: None,
            javascript_enabled: false,
            math: None,
        }
    }
}

impl CompileOptions {
    /// Browser list for the autoprefixer hook: split on `,`/`;`, trimmed,
    /// empty entries dropped
    pub fn browsers(&self) -> Vec<String> {
        match &self.autoprefixer {
            Some(spec) => spec
                .split([',', ';'])
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::One(value)) => vec![value],
        Some(Raw::Many(values)) => values,
    })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::One(value)) => Some(value),
        Some(Raw::Many(values)) => Some(values.join("; ")),
    })
}
