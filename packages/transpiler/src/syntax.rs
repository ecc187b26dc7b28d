//! tree-sitter front end: building the parser and locating syntax errors.

use tree_sitter::{Node, Parser, Tree};

/// A problem found in the prepared source, located by byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxIssue {
    pub reason: String,
    pub start: usize,
    pub end: usize,
}

impl SyntaxIssue {
    pub fn new(reason: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            reason: reason.into(),
            start,
            end,
        }
    }

    pub fn at_node(reason: impl Into<String>, node: Node) -> Self {
        Self::new(reason, node.start_byte(), node.end_byte())
    }
}

/// Parse `source` with the JavaScript grammar (JSX included)
pub(crate) fn parse(source: &str) -> Result<Tree, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| format!("Failed to load JavaScript grammar: {}", e))?;

    parser
        .parse(source, None)
        .ok_or_else(|| "Parser produced no syntax tree".to_string())
}

/// Deepest syntax tree nesting the rewriter accepts
pub(crate) const MAX_NESTING_DEPTH: usize = 512;

/// Preorder walk over `root` without recursion; `visit` sees each node with
/// its depth below `root`
fn walk<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>, usize)) {
    let mut cursor = root.walk();
    let mut depth = 0usize;

    loop {
        visit(cursor.node(), depth);

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            depth -= 1;
        }
    }
}

/// First node nested deeper than [`MAX_NESTING_DEPTH`]
pub(crate) fn too_deep(root: Node) -> Option<SyntaxIssue> {
    let mut found = None;
    walk(root, |node, depth| {
        if found.is_none() && depth > MAX_NESTING_DEPTH {
            found = Some(SyntaxIssue::at_node("Nesting too deep", node));
        }
    });
    found
}

/// First error or missing node in document order
pub(crate) fn first_issue(root: Node, source: &str) -> Option<SyntaxIssue> {
    if !root.has_error() {
        return None;
    }

    let mut found = None;
    walk(root, |node, _| {
        if found.is_some() {
            return;
        }
        if node.is_missing() {
            found = Some(SyntaxIssue::at_node(
                format!("Expected \"{}\"", node.kind()),
                node,
            ));
        } else if node.is_error() {
            found = Some(unexpected(node, source));
        }
    });

    found.or_else(|| {
        Some(SyntaxIssue::new(
            "Invalid syntax",
            root.start_byte(),
            root.end_byte(),
        ))
    })
}

/// Errors the grammar accepts but a JavaScript engine rejects before running:
/// `const` without an initializer, and a `let`/`const`/`class` name declared
/// twice in one block. Returns the earliest in the source.
pub(crate) fn early_error(root: Node, source: &str) -> Option<SyntaxIssue> {
    let mut issues = Vec::new();

    walk(root, |node, _| match node.kind() {
        "lexical_declaration" if is_const(node) => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() == "variable_declarator"
                    && declarator.child_by_field_name("value").is_none()
                {
                    issues.push(SyntaxIssue::at_node(
                        "Missing initializer in const declaration",
                        declarator,
                    ));
                }
            }
        }
        "program" | "statement_block" => {
            issues.extend(duplicate_declaration(node, source));
        }
        _ => {}
    });

    issues.into_iter().min_by_key(|issue| issue.start)
}

fn is_const(declaration: Node) -> bool {
    declaration
        .child_by_field_name("kind")
        .map_or(false, |keyword| keyword.kind() == "const")
}

/// Second lexical declaration of a name among the direct statements of `block`
fn duplicate_declaration(block: Node, source: &str) -> Option<SyntaxIssue> {
    let mut seen = std::collections::HashSet::new();
    let mut cursor = block.walk();

    for statement in block.named_children(&mut cursor) {
        let declaration = match statement.kind() {
            "export_statement" => match statement.child_by_field_name("declaration") {
                Some(declaration) => declaration,
                None => continue,
            },
            _ => statement,
        };

        for name in lexical_names(declaration) {
            let text = source.get(name.start_byte()..name.end_byte()).unwrap_or_default();
            if !seen.insert(text) {
                return Some(SyntaxIssue::at_node(
                    format!("Identifier \"{}\" has already been declared", text),
                    name,
                ));
            }
        }
    }

    None
}

/// Identifier nodes bound by a `let`/`const` or `class` declaration
fn lexical_names(declaration: Node) -> Vec<Node> {
    match declaration.kind() {
        "lexical_declaration" => {
            let mut cursor = declaration.walk();
            declaration
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "variable_declarator")
                .filter_map(|declarator| declarator.child_by_field_name("name"))
                .filter(|name| name.kind() == "identifier")
                .collect()
        }
        "class_declaration" => declaration
            .child_by_field_name("name")
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

fn unexpected(node: Node, source: &str) -> SyntaxIssue {
    let text = source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default();
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());

    match first_line {
        None if node.start_byte() >= source.trim_end().len() => {
            SyntaxIssue::at_node("Unexpected end of input", node)
        }
        None => SyntaxIssue::at_node("Unexpected token", node),
        Some(line) => {
            let snippet: String = line.chars().take(24).collect();
            let ellipsis = if line.chars().count() > 24 { "..." } else { "" };
            SyntaxIssue::at_node(
                format!("Unexpected token \"{}{}\"", snippet, ellipsis),
                node,
            )
        }
    }
}
