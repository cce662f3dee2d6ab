use serde::Deserialize;

use crate::error::StyleError;
use crate::resolver::ModuleLayout;

use super::{ImportStyle, ParseRule, StyleSet};

/// `#include "dir/header.h"`. Angle-bracket includes name system headers and are left out.
const C_INCLUDE_PATTERN: &str = r#"\s*#\s*include\s+"(?P<module>[^"]+)""#;

const C_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "hpp"];

/// The built-in `c` rule-set: quoted includes resolved relative to the including file.
pub fn c_style_set() -> StyleSet {
    let include = ImportStyle::new(
        "c-include",
        C_EXTENSIONS,
        C_INCLUDE_PATTERN,
        ParseRule::Capture(ModuleLayout::path_include()),
    )
    .expect("invalid c include pattern");

    StyleSet::new("c", vec![include])
}

fn default_separator() -> String {
    "/".to_owned()
}

/// A user-defined import style, as written in `codeweb.toml`:
///
/// ```toml
/// [[styles]]
/// set = "lua"
/// extensions = ["lua"]
/// pattern = 'require\s*\(?\s*"(?P<module>[^"]+)"'
/// separator = "."
/// extension = "lua"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StyleSpec {
    /// Rule-set this style belongs to. Styles sharing a set name are grouped.
    pub set: String,
    /// Style name for diagnostics; defaults to the set name.
    pub name: Option<String>,
    pub extensions: Vec<String>,
    /// Regex with a named `module` group, matched at line start.
    pub pattern: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    pub relative_marker: Option<char>,
    #[serde(default)]
    pub extension: String,
    pub package_index: Option<String>,
}

impl StyleSpec {
    pub fn build(&self) -> Result<ImportStyle, StyleError> {
        let name = self.name.as_deref().unwrap_or(&self.set);
        if self.separator.is_empty() {
            return Err(StyleError::EmptySeparator { style: name.to_owned() });
        }
        let layout = ModuleLayout {
            separator: self.separator.clone(),
            relative_marker: self.relative_marker,
            extension: self.extension.trim_start_matches('.').to_owned(),
            package_index: self.package_index.clone(),
        };
        ImportStyle::new(name, &self.extensions, &self.pattern, ParseRule::Capture(layout))
    }
}

/// Build rule-sets from specs, grouping styles by set name in first-seen order.
pub fn sets_from_specs(specs: &[StyleSpec]) -> Result<Vec<StyleSet>, StyleError> {
    let mut sets: Vec<StyleSet> = Vec::new();
    for spec in specs {
        let style = spec.build()?;
        match sets.iter_mut().find(|s| s.name == spec.set) {
            Some(set) => set.styles.push(style),
            None => sets.push(StyleSet::new(spec.set.clone(), vec![style])),
        }
    }
    Ok(sets)
}
