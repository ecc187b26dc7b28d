//! JSX → `React.createElement` rewriting.
//!
//! Everything that is not JSX is copied through byte-for-byte; JSX nodes are
//! replaced with the equivalent classic-runtime calls.

use crate::syntax::SyntaxIssue;
use crate::text::{clean_jsx_text, decode_entities};
use tree_sitter::Node;

const CREATE_ELEMENT: &str = "React.createElement";
const FRAGMENT: &str = "React.Fragment";

type RewriteResult = Result<String, SyntaxIssue>;

pub(crate) struct JsxRewriter<'src> {
    source: &'src str,
}

impl<'src> JsxRewriter<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Rewrite `node`, replacing any JSX inside it
    pub fn rewrite(&self, node: Node) -> RewriteResult {
        match node.kind() {
            "jsx_element" | "jsx_self_closing_element" => self.element(node),
            _ if node.child_count() == 0 => Ok(self.text(node).to_string()),
            _ => {
                let mut out = String::new();
                let mut pos = node.start_byte();
                let mut cursor = node.walk();

                for child in node.children(&mut cursor) {
                    out.push_str(self.slice(pos, child.start_byte()));
                    out.push_str(&self.rewrite(child)?);
                    pos = child.end_byte();
                }
                out.push_str(self.slice(pos, node.end_byte()));

                Ok(out)
            }
        }
    }

    fn element(&self, node: Node) -> RewriteResult {
        let (opening, closing) = match node.kind() {
            "jsx_element" => {
                let opening = node
                    .child_by_field_name("open_tag")
                    .ok_or_else(|| SyntaxIssue::at_node("Malformed JSX element", node))?;
                (opening, node.child_by_field_name("close_tag"))
            }
            _ => (node, None),
        };

        let name = opening.child_by_field_name("name");
        self.check_closing_tag(name, closing)?;

        let mut cursor = opening.walk();
        let attributes: Vec<Node> = opening
            .children_by_field_name("attribute", &mut cursor)
            .collect();

        let mut args = vec![self.element_type(name)?, self.props(&attributes)?];
        if node.kind() == "jsx_element" {
            args.extend(self.children(node, opening, closing)?);
        }

        Ok(format!("{}({})", CREATE_ELEMENT, args.join(", ")))
    }

    fn check_closing_tag(&self, name: Option<Node>, closing: Option<Node>) -> Result<(), SyntaxIssue> {
        let Some(closing) = closing else {
            return Ok(());
        };

        let open_name = name.map(|n| self.text(n)).unwrap_or_default();
        let close_name = closing
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();

        if strip_whitespace(open_name) != strip_whitespace(close_name) {
            let expected = if open_name.is_empty() {
                "<>".to_string()
            } else {
                format!("<{}>", open_name)
            };
            return Err(SyntaxIssue::at_node(
                format!("Expected corresponding JSX closing tag for {}", expected),
                closing,
            ));
        }

        Ok(())
    }

    fn element_type(&self, name: Option<Node>) -> RewriteResult {
        let Some(name) = name else {
            return Ok(FRAGMENT.to_string());
        };

        match name.kind() {
            "jsx_namespace_name" => Err(unsupported_namespace(name)),
            "member_expression" | "nested_identifier" => Ok(strip_whitespace(self.text(name))),
            _ => {
                let tag = self.text(name);
                if is_intrinsic(tag) {
                    Ok(quote(tag))
                } else {
                    Ok(tag.to_string())
                }
            }
        }
    }

    fn props(&self, attributes: &[Node]) -> RewriteResult {
        if attributes.is_empty() {
            return Ok("null".to_string());
        }

        let mut entries = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            match attribute.kind() {
                "jsx_attribute" => entries.push(self.attribute(*attribute)?),
                // `{...props}`
                "jsx_expression" => {
                    let inner = self
                        .expression_content(*attribute)
                        .ok_or_else(|| SyntaxIssue::at_node("Expected spread attribute", *attribute))?;
                    entries.push(self.rewrite(inner)?);
                }
                _ => {
                    return Err(SyntaxIssue::at_node(
                        format!("Unsupported JSX attribute \"{}\"", self.text(*attribute)),
                        *attribute,
                    ))
                }
            }
        }

        Ok(format!("{{{}}}", entries.join(", ")))
    }

    fn attribute(&self, attribute: Node) -> RewriteResult {
        let mut cursor = attribute.walk();
        let parts: Vec<Node> = attribute
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();

        let name = parts
            .first()
            .ok_or_else(|| SyntaxIssue::at_node("Expected attribute name", attribute))?;
        if name.kind() == "jsx_namespace_name" {
            return Err(unsupported_namespace(*name));
        }

        let key = self.text(*name);
        let key = if is_identifier(key) {
            key.to_string()
        } else {
            quote(key)
        };

        let value = match parts.get(1) {
            None => "true".to_string(),
            Some(value) => match value.kind() {
                "string" => {
                    let raw = self.text(*value);
                    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
                    quote(&decode_entities(inner))
                }
                "jsx_expression" => {
                    let inner = self.expression_content(*value).ok_or_else(|| {
                        SyntaxIssue::at_node(
                            "JSX attributes must only be assigned a non-empty expression",
                            *value,
                        )
                    })?;
                    self.rewrite(inner)?
                }
                _ => self.rewrite(*value)?,
            },
        };

        Ok(format!("{}: {}", key, value))
    }

    fn children(&self, element: Node, opening: Node, closing: Option<Node>) -> Result<Vec<String>, SyntaxIssue> {
        let mut out = Vec::new();
        let mut text_start = opening.end_byte();
        let text_end = closing.map(|c| c.start_byte()).unwrap_or(element.end_byte());

        let mut cursor = element.walk();
        for child in element.named_children(&mut cursor) {
            if child.id() == opening.id() || Some(child.id()) == closing.map(|c| c.id()) {
                continue;
            }

            match child.kind() {
                "jsx_element" | "jsx_self_closing_element" => {
                    self.push_text(&mut out, text_start, child.start_byte());
                    out.push(self.element(child)?);
                    text_start = child.end_byte();
                }
                "jsx_expression" => {
                    self.push_text(&mut out, text_start, child.start_byte());
                    if let Some(inner) = self.expression_content(child) {
                        out.push(self.rewrite(inner)?);
                    }
                    text_start = child.end_byte();
                }
                // text and character references are read from the gaps
                _ => {}
            }
        }

        self.push_text(&mut out, text_start, text_end);
        Ok(out)
    }

    fn push_text(&self, out: &mut Vec<String>, start: usize, end: usize) {
        if start >= end {
            return;
        }
        if let Some(text) = clean_jsx_text(self.slice(start, end)) {
            out.push(quote(&text));
        }
    }

    /// The expression inside `{ ... }`, ignoring comments
    fn expression_content<'tree>(&self, container: Node<'tree>) -> Option<Node<'tree>> {
        let mut cursor = container.walk();
        let content = container
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment");
        content
    }

    fn text(&self, node: Node) -> &'src str {
        self.slice(node.start_byte(), node.end_byte())
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or_default()
    }
}

fn unsupported_namespace(node: Node) -> SyntaxIssue {
    SyntaxIssue::at_node("Namespace tags are not supported", node)
}

/// Lowercase and dashed tags are host elements, rendered by name
fn is_intrinsic(tag: &str) -> bool {
    tag.contains('-')
        || tag
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase())
            .unwrap_or(false)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// JavaScript string literal for `value`
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
