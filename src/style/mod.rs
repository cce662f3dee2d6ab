//! Import rule-sets: what an import statement looks like in each language and
//! how to turn a matching line into resolved file references.

pub mod declarative;
pub mod python;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::StyleError;
use crate::resolver::{self, ModuleLayout};

/// A resolved reference produced by one import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportFile {
    /// Resolved to a file that exists on disk. Holds the absolute path.
    Internal(PathBuf),
    /// Unresolved (third-party or standard library). Holds the raw module token.
    External(String),
}

/// How a matching line is turned into module tokens.
///
/// A plain enum rather than boxed closures: the set of parsers is closed and
/// user-defined styles are expressed through [`ParseRule::Capture`].
#[derive(Debug, Clone)]
pub enum ParseRule {
    /// `import a, b.c as d`
    PythonImport,
    /// `from x.y import z`
    PythonFromImport,
    /// Take the named `module` capture group and resolve it with the layout.
    Capture(ModuleLayout),
}

/// One import grammar rule: the extensions it applies to, an anchored line
/// pattern, and the parser that extracts module references.
#[derive(Debug, Clone)]
pub struct ImportStyle {
    name: String,
    extensions: BTreeSet<String>,
    source: String,
    pattern: Regex,
    rule: ParseRule,
}

impl ImportStyle {
    /// Build a style, compiling `pattern` anchored at line start.
    ///
    /// Extensions may be given with or without a leading dot.
    pub fn new<I, S>(name: &str, extensions: I, pattern: &str, rule: ParseRule) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_owned())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(StyleError::NoExtensions { style: name.to_owned() });
        }

        let anchored = format!("^(?:{pattern})");
        let compiled = Regex::new(&anchored).map_err(|source| StyleError::InvalidPattern {
            style: name.to_owned(),
            source,
        })?;

        if matches!(rule, ParseRule::Capture(_))
            && !compiled.capture_names().any(|n| n == Some("module"))
        {
            return Err(StyleError::MissingModuleGroup { style: name.to_owned() });
        }

        Ok(Self {
            name: name.to_owned(),
            extensions,
            source: pattern.to_owned(),
            pattern: compiled,
            rule,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// The pattern as written, before anchoring.
    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn applies_to(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// True iff `line` matches this style's pattern at line start.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Extract resolved imports from a line that [`matches`](Self::matches).
    ///
    /// Must only be called on matching lines.
    pub fn extract(&self, source_file: &Path, line: &str) -> Vec<ImportFile> {
        match &self.rule {
            ParseRule::PythonImport => python::parse_import(source_file, line),
            ParseRule::PythonFromImport => python::parse_from_import(source_file, line),
            ParseRule::Capture(layout) => self
                .pattern
                .captures(line)
                .and_then(|caps| caps.name("module"))
                .map(|m| m.as_str().trim())
                .filter(|token| !token.is_empty())
                .map(|token| vec![resolver::resolve(source_file, token, layout)])
                .unwrap_or_default(),
        }
    }
}

/// A named group of styles for one language.
#[derive(Debug, Clone)]
pub struct StyleSet {
    pub name: String,
    pub styles: Vec<ImportStyle>,
}

impl StyleSet {
    pub fn new(name: impl Into<String>, styles: Vec<ImportStyle>) -> Self {
        Self {
            name: name.into(),
            styles,
        }
    }
}

/// Registry of named rule-sets, selected per file by extension.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    sets: Vec<StyleSet>,
}

impl StyleRegistry {
    /// All rule-sets shipped with codeweb.
    pub fn builtin() -> Self {
        Self {
            sets: vec![python::style_set(), declarative::c_style_set()],
        }
    }

    /// Add a rule-set, replacing any existing set with the same name.
    pub fn register(&mut self, set: StyleSet) {
        match self.sets.iter_mut().find(|s| s.name == set.name) {
            Some(existing) => *existing = set,
            None => self.sets.push(set),
        }
    }

    /// Keep only the named rule-sets, in the order given.
    pub fn select<S: AsRef<str>>(self, names: &[S]) -> Result<Self, StyleError> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            let set = self
                .sets
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| StyleError::UnknownSet {
                    name: name.to_owned(),
                    available: self.names().join(", "),
                })?;
            if !selected.iter().any(|s: &StyleSet| s.name == set.name) {
                selected.push(set.clone());
            }
        }
        Ok(Self { sets: selected })
    }

    pub fn sets(&self) -> &[StyleSet] {
        &self.sets
    }

    pub fn names(&self) -> Vec<&str> {
        self.sets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Union of every extension any registered style applies to.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.styles()
            .flat_map(|style| style.extensions.iter().cloned())
            .collect()
    }

    pub fn styles(&self) -> impl Iterator<Item = &ImportStyle> {
        self.sets.iter().flat_map(|set| set.styles.iter())
    }

    /// Styles that apply to files with the given extension.
    pub fn styles_for<'a>(&'a self, extension: &'a str) -> impl Iterator<Item = &'a ImportStyle> + 'a {
        self.styles().filter(move |style| style.applies_to(extension))
    }
}
