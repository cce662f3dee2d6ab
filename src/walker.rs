use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ScanError;

/// A scanned source file with its text split into lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path.
    pub path: PathBuf,
    /// File stem, e.g. `util` for `util.py`.
    pub name: String,
    /// Extension without the dot.
    pub extension: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn from_text(path: PathBuf, text: &str) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            extension,
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(path.to_path_buf(), &text))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Result of scanning a project tree.
#[derive(Debug)]
pub struct ScanReport {
    /// Canonical scan root. Every file path is below it.
    pub root: PathBuf,
    /// Loaded files, sorted by path.
    pub files: Vec<SourceFile>,
    /// Files that matched an extension but could not be read as text.
    pub skipped: Vec<PathBuf>,
}

/// Walk `root` and load every file whose extension is in `extensions`.
///
/// Respects `.gitignore` (even outside a git repository) and skips anything
/// matching an `exclude` glob. Hidden files and directories are scanned. Files that cannot be read as
/// UTF-8 text are skipped with a warning and reported in [`ScanReport::skipped`].
pub fn scan_project(
    root: &Path,
    extensions: &BTreeSet<String>,
    exclude: &[String],
) -> Result<ScanReport, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let root = std::fs::canonicalize(root).map_err(|source| ScanError::Canonicalize {
        path: root.to_path_buf(),
        source,
    })?;

    let mut paths = collect_paths(&root, extensions, exclude);
    paths.sort();

    let loaded: Vec<(PathBuf, std::io::Result<SourceFile>)> = paths
        .into_par_iter()
        .map(|path| {
            let result = SourceFile::load(&path);
            (path, result)
        })
        .collect();

    let mut files = Vec::with_capacity(loaded.len());
    let mut skipped = Vec::new();
    for (path, result) in loaded {
        match result {
            Ok(file) => {
                debug!(path = %path.display(), name = %file.name, lines = file.line_count(), "loaded source file");
                files.push(file);
            }
            Err(err) => {
                warn!(path = %path.display(), "skipping unreadable file: {err}");
                skipped.push(path);
            }
        }
    }

    Ok(ScanReport {
        root,
        files,
        skipped,
    })
}

/// Collect candidate file paths using the `ignore` crate.
fn collect_paths(root: &Path, extensions: &BTreeSet<String>, exclude: &[String]) -> Vec<PathBuf> {
    let patterns: Vec<glob::Pattern> = exclude
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                warn!("ignoring invalid exclude pattern `{p}`: {err}");
                None
            }
        })
        .collect();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        .hidden(false)
        .require_git(false)
        .build();

    let mut out = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.contains(ext) {
            continue;
        }

        if is_excluded(path, root, &patterns) {
            debug!(path = %path.display(), "excluded by config");
            continue;
        }

        out.push(path.to_path_buf());
    }
    out
}

/// Returns true if the root-relative path, or any single component of it,
/// matches one of the exclusion patterns.
fn is_excluded(path: &Path, root: &Path, patterns: &[glob::Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel_str = rel.to_string_lossy().replace('\\', "/");

    patterns.iter().any(|pattern| {
        pattern.matches(&rel_str)
            || rel
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .any(|s| pattern.matches(s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn exts(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn names(report: &ScanReport) -> Vec<String> {
        report
            .files
            .iter()
            .map(|f| f.path.strip_prefix(&report.root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_collects_matching_extensions_only() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import b\n").unwrap();
        fs::write(dir.path().join("README.md"), "# hi").unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg").join("c.py"), "").unwrap();

        let report = scan_project(dir.path(), &exts(&["py"]), &[]).unwrap();
        assert_eq!(names(&report), vec!["a.py", "pkg/c.py"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_scan_preserves_line_order() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import os\r\nimport sys\n\nx = 1").unwrap();

        let report = scan_project(dir.path(), &exts(&["py"]), &[]).unwrap();
        let file = &report.files[0];
        assert_eq!(file.lines, vec!["import os", "import sys", "", "x = 1"]);
        assert_eq!(file.name, "a");
        assert_eq!(file.extension, "py");
        assert!(file.path.is_absolute());
    }

    #[test]
    fn test_scan_skips_non_utf8_files() {
        let dir = tmp();
        fs::write(dir.path().join("good.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("bad.py"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let report = scan_project(dir.path(), &exts(&["py"]), &[]).unwrap();
        assert_eq!(names(&report), vec!["good.py"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].ends_with("bad.py"));
    }

    #[test]
    fn test_scan_respects_exclude_patterns() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build").join("gen.py"), "").unwrap();
        fs::write(dir.path().join("msg_pb2.py"), "").unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();

        let exclude = vec!["build".to_string(), "*_pb2.py".to_string()];
        let report = scan_project(dir.path(), &exts(&["py"]), &exclude).unwrap();
        assert_eq!(names(&report), vec!["main.py"]);
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = tmp();
        fs::write(dir.path().join(".gitignore"), "venv/\n").unwrap();
        fs::create_dir_all(dir.path().join("venv")).unwrap();
        fs::write(dir.path().join("venv").join("site.py"), "").unwrap();
        fs::write(dir.path().join("app.py"), "").unwrap();

        let report = scan_project(dir.path(), &exts(&["py"]), &[]).unwrap();
        assert_eq!(names(&report), vec!["app.py"]);
    }

    #[test]
    fn test_scan_includes_hidden_entries() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join(".tools")).unwrap();
        fs::write(dir.path().join(".tools").join("lint.py"), "").unwrap();
        fs::write(dir.path().join(".setup.py"), "").unwrap();
        fs::write(dir.path().join("app.py"), "").unwrap();

        let report = scan_project(dir.path(), &exts(&["py"]), &[]).unwrap();
        assert_eq!(names(&report), vec![".setup.py", ".tools/lint.py", "app.py"]);
    }

    #[test]
    fn test_scan_missing_root_errors() {
        let dir = tmp();
        let err = scan_project(&dir.path().join("nope"), &exts(&["py"]), &[]).unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot(_)));
    }

    #[test]
    fn test_scan_file_root_errors() {
        let dir = tmp();
        let file = dir.path().join("a.py");
        fs::write(&file, "").unwrap();
        let err = scan_project(&file, &exts(&["py"]), &[]).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }
}
