//! Module-to-script rewriting: React imports and `export` statements have no
//! meaning inside a classic `<script>`. Imports become bindings to the
//! `React`/`ReactDOM` globals, exports are removed, and the default export is
//! made reachable by name.

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// Harness binding for anonymous default exports
pub(crate) const DEFAULT_BINDING: &str = "__previewDefault";

/// What the module designates as its default export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DefaultExport {
    /// `export default function Name`, `export default Name`, `export { Name as default }`
    Named(String),
    /// `export default () => ...`, `export default function () {}`
    Anonymous,
    Missing,
}

impl DefaultExport {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// Transpiled code ready to be inlined into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedModule {
    pub code: String,
    pub default_export: DefaultExport,
}

const RESERVED: &[&str] = &[
    "async", "await", "class", "const", "delete", "extends", "false", "function", "let", "new",
    "null", "super", "this", "true", "typeof", "undefined", "var", "void", "yield",
];

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            PATTERN.get_or_init(|| Regex::new($re).expect(concat!(stringify!($name), " is valid")))
        }
    };
}

pattern!(
    default_declaration,
    r"\bexport\s+default\s+((?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(|class\s+([A-Za-z_$][\w$]*))"
);
pattern!(
    default_identifier,
    r"(?m)\bexport\s+default\s+([A-Za-z_$][\w$]*)[ \t]*;?[ \t]*$"
);
pattern!(
    default_in_list,
    r"\bexport\s*\{[^}]*?\b([A-Za-z_$][\w$]*)\s+as\s+default\b[^}]*\}\s*;?"
);
pattern!(default_expression, r"\bexport\s+default\b");
pattern!(
    runtime_import,
    r#"\bimport\s*(?:(?P<clause>[\w$*{}\s,]+?)\s*\bfrom\s*)?['"](?P<module>(?i:react|react-dom))['"][ \t]*;?[ \t]*(?P<eol>\r?\n)?"#
);
pattern!(
    export_list,
    r#"\bexport\s*(?:\*(?:\s*as\s+[\w$]+)?\s*from\s*['"][^'"]*['"]|\{[^}]*\}(?:\s*from\s*['"][^'"]*['"])?)[ \t]*;?[ \t]*(?:\r?\n)?"#
);
pattern!(
    export_declaration,
    r"\bexport\s+((?:async\s+)?function\b|const\b|let\b|var\b|class\b)"
);

/// Rewrite transpiled code so it can run as a plain script
pub fn process_module(code: &str) -> ProcessedModule {
    let (code, default_export) = rewrite_default_export(code);

    let code = runtime_import().replace_all(&code, |caps: &Captures| import_bindings(caps));
    let code = export_list().replace_all(&code, "");
    let code = export_declaration().replace_all(&code, "$1");

    ProcessedModule {
        code: code.into_owned(),
        default_export,
    }
}

fn rewrite_default_export(code: &str) -> (String, DefaultExport) {
    // export default function Name(...) / export default class Name
    if let Some(caps) = default_declaration().captures(code) {
        let name = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str().to_string());
        let name = name.filter(|name| !RESERVED.contains(&name.as_str()));
        if let (Some(whole), Some(declaration), Some(name)) = (caps.get(0), caps.get(1), name) {
            let rewritten = format!(
                "{}{}{}",
                &code[..whole.start()],
                declaration.as_str(),
                &code[whole.end()..]
            );
            return (rewritten, DefaultExport::Named(name));
        }
    }

    // export default Name;
    if let Some(caps) = default_identifier().captures(code) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            if !RESERVED.contains(&name.as_str()) {
                let rewritten = format!("{}{}", &code[..whole.start()], &code[whole.end()..]);
                return (rewritten, DefaultExport::Named(name.as_str().to_string()));
            }
        }
    }

    // export { Name as default }
    if let Some(caps) = default_in_list().captures(code) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            let rewritten = format!("{}{}", &code[..whole.start()], &code[whole.end()..]);
            return (rewritten, DefaultExport::Named(name.as_str().to_string()));
        }
    }

    // export default <expression>
    if default_expression().is_match(code) {
        let rewritten = default_expression()
            .replacen(code, 1, |_: &Captures| format!("var {} =", DEFAULT_BINDING))
            .into_owned();
        return (rewritten, DefaultExport::Anonymous);
    }

    (code.to_string(), DefaultExport::Missing)
}

/// `var` statement binding what a React import names to the matching global.
/// Empty when the import binds nothing the global does not already provide.
fn import_bindings(caps: &Captures) -> String {
    let global = match caps.name("module") {
        Some(module) if module.as_str().eq_ignore_ascii_case("react-dom") => "ReactDOM",
        _ => "React",
    };
    let clause = caps.name("clause").map_or("", |clause| clause.as_str());

    let bindings = clause_bindings(clause, global);
    if bindings.is_empty() {
        return String::new();
    }

    let eol = caps.name("eol").map_or("", |eol| eol.as_str());
    format!("var {};{}", bindings.join(", "), eol)
}

fn clause_bindings(clause: &str, global: &str) -> Vec<String> {
    let (outside, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{} {}", &clause[..open], &clause[close + 1..]),
            &clause[open + 1..close],
        ),
        _ => (clause.to_string(), ""),
    };

    let mut bindings = Vec::new();
    let mut bind_whole = |local: &str| {
        if !local.is_empty() && local != global {
            bindings.push(format!("{} = {}", local, global));
        }
    };

    // `Name` and `* as Name`
    for part in outside.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.strip_prefix('*') {
            Some(rest) => {
                let rest = rest.trim();
                bind_whole(rest.strip_prefix("as").map_or(rest, str::trim));
            }
            None => bind_whole(part),
        }
    }

    // `{ a, b as c, default as D }`
    let mut destructured = Vec::new();
    for specifier in named.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let words: Vec<&str> = specifier.split_whitespace().collect();
        match words.as_slice() {
            ["default", "as", local] => bind_whole(local),
            [imported, "as", local] if imported != local => {
                destructured.push(format!("{}: {}", imported, local));
            }
            [imported, ..] => destructured.push(imported.to_string()),
            [] => {}
        }
    }

    if !destructured.is_empty() {
        bindings.push(format!("{{ {} }} = {}", destructured.join(", "), global));
    }
    bindings
}
