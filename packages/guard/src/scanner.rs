//! Regex scan for module references.
//!
//! This is deliberately shallow: it sees static `import`/`export ... from`
//! statements but not `require()`, dynamic `import()` or names assembled from
//! string concatenation.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Statement form a module reference was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import x from "m"`, `import { a, b } from "m"`, `import * as x from "m"`
    Binding,
    /// `import "m"`
    SideEffect,
    /// `export * from "m"`, `export { a } from "m"`
    ReExport,
}

/// A module named by a dependency declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReference {
    pub module: String,
    pub kind: ImportKind,
    /// Byte offsets of the whole statement
    pub start: usize,
    pub end: usize,
}

impl ImportReference {
    /// Relative and absolute paths never resolve to a package
    pub fn is_local(&self) -> bool {
        self.module.starts_with('.') || self.module.starts_with('/')
    }
}

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            // import <bindings> from "m"   (bindings may span lines)
            r#"\bimport\s*(?:[\w$*{}\s,]+?)\s*\bfrom\s*['"](?P<binding>[^'"\n]+)['"]"#,
            // import "m"
            r#"|\bimport\s*['"](?P<side>[^'"\n]+)['"]"#,
            // export * from "m" / export { a } from "m"
            r#"|\bexport\s*(?:\*(?:\s*as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<reexport>[^'"\n]+)['"]"#,
        ))
        .expect("import pattern is valid")
    })
}

/// Every module reference in `source`, in source order
pub fn scan_imports(source: &str) -> Vec<ImportReference> {
    import_pattern()
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (module, kind) = if let Some(m) = caps.name("binding") {
                (m, ImportKind::Binding)
            } else if let Some(m) = caps.name("side") {
                (m, ImportKind::SideEffect)
            } else {
                (caps.name("reexport")?, ImportKind::ReExport)
            };

            Some(ImportReference {
                module: module.as_str().to_string(),
                kind,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules(source: &str) -> Vec<String> {
        scan_imports(source).into_iter().map(|r| r.module).collect()
    }

    #[test]
    fn test_default_and_named_bindings() {
        let source = r#"
import React from 'react';
import { useState, useEffect } from "react";
import * as Dom from 'react-dom';
"#;
        assert_eq!(modules(source), vec!["react", "react", "react-dom"]);
    }

    #[test]
    fn test_multiline_bindings() {
        let source = "import {\n  a,\n  b as c,\n} from 'lodash';";
        let refs = scan_imports(source);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].module, "lodash");
        assert_eq!(refs[0].kind, ImportKind::Binding);
        assert_eq!(refs[0].start, 0);
        assert_eq!(&source[refs[0].end..], ";");
    }

    #[test]
    fn test_side_effect_import() {
        let refs = scan_imports("import './styles.css';");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ImportKind::SideEffect);
        assert!(refs[0].is_local());
    }

    #[test]
    fn test_reexports() {
        let source = "export * from 'a';\nexport { b, c as d } from \"e\";";
        let refs = scan_imports(source);
        assert_eq!(modules(source), vec!["a", "e"]);
        assert!(refs.iter().all(|r| r.kind == ImportKind::ReExport));
    }

    #[test]
    fn test_plain_exports_are_not_references() {
        let source = "export default App;\nexport { App };\nconst from = 1;";
        assert!(scan_imports(source).is_empty());
    }

    #[test]
    fn test_minified_statements() {
        assert_eq!(modules("import{a}from'x';import b from\"y\""), vec!["x", "y"]);
    }
}
