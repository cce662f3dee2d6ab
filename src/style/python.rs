use std::path::Path;

use crate::resolver::{self, ModuleLayout};

use super::{ImportFile, ImportStyle, ParseRule, StyleSet};

/// `import a, b.c`
const IMPORT_PATTERN: &str = r"import .+";

/// `from x.y import z`
const FROM_IMPORT_PATTERN: &str = r"from .+ import .+";

/// The built-in `python` rule-set.
pub fn style_set() -> StyleSet {
    let import = ImportStyle::new("python-import", ["py"], IMPORT_PATTERN, ParseRule::PythonImport)
        .expect("invalid python import pattern");
    let from_import = ImportStyle::new(
        "python-from-import",
        ["py"],
        FROM_IMPORT_PATTERN,
        ParseRule::PythonFromImport,
    )
    .expect("invalid python from-import pattern");

    StyleSet::new("python", vec![import, from_import])
}

/// Drop a trailing `# comment`.
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

/// Parse `import a, b.c as d`. Every comma-separated module resolves on its own;
/// `as` aliases are ignored.
pub(super) fn parse_import(source_file: &Path, line: &str) -> Vec<ImportFile> {
    let body = strip_comment(line);
    let body = body.trim_start().strip_prefix("import").unwrap_or(body);

    body.split(',')
        .filter_map(|item| item.split_whitespace().next())
        .map(|module| resolver::resolve(source_file, module, &ModuleLayout::python()))
        .collect()
}

/// Parse `from x import y`. Only the module `x` is resolved.
pub(super) fn parse_from_import(source_file: &Path, line: &str) -> Vec<ImportFile> {
    strip_comment(line)
        .split_whitespace()
        .nth(1)
        .map(|module| vec![resolver::resolve(source_file, module, &ModuleLayout::python())])
        .unwrap_or_default()
}
