use std::ffi::OsString;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::style::ImportFile;

/// How a language spells a module reference on disk.
///
/// Python writes `pkg.sub.mod` with leading dots for relative imports and stores
/// modules as `mod.py`; a C include writes `dir/header.h` verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    /// Separator between path segments inside a module token.
    pub separator: String,
    /// Leading character that walks one directory up per occurrence.
    pub relative_marker: Option<char>,
    /// Extension appended to the final segment, without the dot. Empty means none.
    pub extension: String,
    /// File stem used when the token names a package rather than a module
    /// (e.g. `__init__` for `from . import x`).
    pub package_index: Option<String>,
}

impl ModuleLayout {
    pub fn python() -> Self {
        Self {
            separator: ".".to_owned(),
            relative_marker: Some('.'),
            extension: "py".to_owned(),
            package_index: Some("__init__".to_owned()),
        }
    }

    pub fn path_include() -> Self {
        Self {
            separator: "/".to_owned(),
            relative_marker: None,
            extension: String::new(),
            package_index: None,
        }
    }
}

/// Compute the absolute candidate path a module token refers to.
///
/// Resolution starts from the importing file itself: every leading relative
/// marker walks one level up, and a token without markers walks exactly one
/// level (to the file's directory). The remaining segments are joined below
/// that directory and the layout's extension is appended.
///
/// Returns `None` when the token walks above the filesystem root or names a
/// package in a layout that has no package index.
pub fn candidate_path(source_file: &Path, token: &str, layout: &ModuleLayout) -> Option<PathBuf> {
    let token = token.trim();

    let (levels, remainder) = match layout.relative_marker {
        Some(marker) => {
            let remainder = token.trim_start_matches(marker);
            let markers = token[..token.len() - remainder.len()].chars().count();
            (markers.max(1), remainder)
        }
        None => (1, token),
    };

    let mut base = source_file;
    for _ in 0..levels {
        base = base.parent()?;
    }
    let mut candidate = base.to_path_buf();

    let segments: Vec<&str> = remainder
        .split(layout.separator.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        candidate.push(layout.package_index.as_deref()?);
    } else {
        candidate.extend(segments);
    }

    if !layout.extension.is_empty() {
        let mut name: OsString = candidate.into_os_string();
        name.push(".");
        name.push(&layout.extension);
        candidate = PathBuf::from(name);
    }

    Some(candidate.clean())
}

/// Resolve a raw module token imported by `source_file`.
///
/// The import is internal when the candidate path exists as a file; otherwise
/// it is external and keeps the raw token rather than the failed candidate.
pub fn resolve(source_file: &Path, token: &str, layout: &ModuleLayout) -> ImportFile {
    match candidate_path(source_file, token, layout) {
        Some(path) if path.is_file() => ImportFile::Internal(path),
        _ => ImportFile::External(token.trim().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[test]
    fn test_plain_module_resolves_next_to_importer() {
        let layout = ModuleLayout::python();
        let got = candidate_path(Path::new("/proj/pkg/a.py"), "b", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/pkg/b.py"));
    }

    #[test]
    fn test_dotted_module_becomes_nested_path() {
        let layout = ModuleLayout::python();
        let got = candidate_path(Path::new("/proj/a.py"), "pkg.sub.mod", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/pkg/sub/mod.py"));
    }

    #[test]
    fn test_single_marker_is_importer_directory() {
        let layout = ModuleLayout::python();
        let got = candidate_path(Path::new("/proj/pkg/a.py"), ".sibling", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/pkg/sibling.py"));
    }

    #[test]
    fn test_each_extra_marker_walks_up() {
        let layout = ModuleLayout::python();
        let got = candidate_path(Path::new("/proj/pkg/sub/a.py"), "...top.util", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/top/util.py"));
    }

    #[test]
    fn test_bare_markers_name_the_package_index() {
        let layout = ModuleLayout::python();
        let got = candidate_path(Path::new("/proj/pkg/sub/a.py"), "..", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/pkg/__init__.py"));
    }

    #[test]
    fn test_walking_above_root_yields_none() {
        let layout = ModuleLayout::python();
        assert!(candidate_path(Path::new("/a.py"), "....x", &layout).is_none());
    }

    #[test]
    fn test_include_layout_cleans_parent_segments() {
        let layout = ModuleLayout::path_include();
        let got = candidate_path(Path::new("/proj/src/main.c"), "../include/util.h", &layout).unwrap();
        assert_eq!(got, PathBuf::from("/proj/include/util.h"));
    }

    #[test]
    fn test_resolve_existing_file_is_internal() {
        let dir = tmp();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("a.py"), "from .sibling import X\n").unwrap();
        fs::write(pkg.join("sibling.py"), "X = 1\n").unwrap();

        let got = resolve(&pkg.join("a.py"), ".sibling", &ModuleLayout::python());
        assert_eq!(got, ImportFile::Internal(pkg.join("sibling.py")));
    }

    #[test]
    fn test_resolve_missing_file_keeps_raw_token() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import os\n").unwrap();

        let got = resolve(&dir.path().join("a.py"), " os.path ", &ModuleLayout::python());
        assert_eq!(got, ImportFile::External("os.path".to_owned()));
    }

    #[test]
    fn test_resolve_directory_is_not_internal() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("thing.py")).unwrap();

        let got = resolve(&dir.path().join("a.py"), "thing", &ModuleLayout::python());
        assert!(matches!(got, ImportFile::External(_)));
    }
}
