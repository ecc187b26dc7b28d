use crate::error::{TransformError, TransformResult};
use crate::jsx::JsxRewriter;
use crate::syntax::{early_error, first_issue, parse, too_deep, SyntaxIssue};
use crate::RUNTIME_IMPORT;
use regex::Regex;
use std::sync::OnceLock;

fn runtime_import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^\s*import\s+(?:\*\s*as\s+)?React\b").expect("runtime import pattern is valid")
    })
}

/// Whether the source already brings `React` into scope (default or namespace import)
pub fn has_runtime_import(source: &str) -> bool {
    runtime_import_pattern().is_match(source)
}

/// User source with the runtime import prepended when missing
struct PreparedSource<'a> {
    original: &'a str,
    text: String,
    prefix_len: usize,
}

impl<'a> PreparedSource<'a> {
    fn new(original: &'a str) -> Self {
        if has_runtime_import(original) {
            return Self {
                original,
                text: original.to_string(),
                prefix_len: 0,
            };
        }

        let prefix = format!("{}\n", RUNTIME_IMPORT);
        Self {
            original,
            prefix_len: prefix.len(),
            text: prefix + original,
        }
    }

    /// Map an issue in the prepared text back onto the user's source
    fn locate(&self, issue: SyntaxIssue) -> TransformError {
        let start = issue.start.saturating_sub(self.prefix_len).min(self.original.len());
        let end = issue
            .end
            .saturating_sub(self.prefix_len)
            .clamp(start, self.original.len());

        let before = self.original.get(..start).unwrap_or_default();
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0)
            + 1;

        TransformError::at(&issue.reason, line, column, (start, end))
    }
}

/// Transform JSX source into plain JavaScript.
///
/// Never panics on user input; every failure comes back as a
/// [`TransformError`] with a `Line N:C:` message.
pub fn transform(source: &str) -> TransformResult {
    let prepared = PreparedSource::new(source);
    if prepared.prefix_len > 0 {
        tracing::debug!("injected runtime import");
    }

    let tree = parse(&prepared.text).map_err(TransformError::internal)?;
    let root = tree.root_node();

    let issue = too_deep(root)
        .or_else(|| first_issue(root, &prepared.text))
        .or_else(|| early_error(root, &prepared.text));
    if let Some(issue) = issue {
        let err = prepared.locate(issue);
        tracing::debug!(error = %err, "transform rejected source");
        return Err(err);
    }

    let rewriter = JsxRewriter::new(&prepared.text);
    let body = rewriter.rewrite(root).map_err(|issue| prepared.locate(issue))?;

    let text = &prepared.text;
    let mut output = String::with_capacity(text.len() + body.len() / 4);
    output.push_str(&text[..root.start_byte()]);
    output.push_str(&body);
    output.push_str(&text[root.end_byte()..]);

    Ok(output)
}
