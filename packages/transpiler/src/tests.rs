use crate::{transform, VIRTUAL_FILENAME};

#[test]
fn test_simple_element() {
    let source = "import React from 'react';\nconst el = <div className=\"a\">Hello</div>;";
    let result = transform(source).expect("Failed to transform");

    println!("Generated code:\n{}", result);

    assert_eq!(
        result,
        "import React from 'react';\nconst el = React.createElement(\"div\", {className: \"a\"}, \"Hello\");"
    );
}

#[test]
fn test_runtime_import_is_injected() {
    let result = transform("const el = <br />;").expect("Failed to transform");
    assert_eq!(
        result,
        "import React from 'react';\nconst el = React.createElement(\"br\", null);"
    );
}

#[test]
fn test_namespace_import_is_respected() {
    let source = "import * as React from 'react';\nconst el = <p />;";
    let result = transform(source).expect("Failed to transform");
    assert_eq!(result.matches("import").count(), 1);
}

#[test]
fn test_component_reference_and_member_tags() {
    let source = "const a = <Button />;\nconst b = <Menu.Item label=\"x\" />;";
    let result = transform(source).expect("Failed to transform");

    assert!(result.contains("React.createElement(Button, null)"));
    assert!(result.contains("React.createElement(Menu.Item, {label: \"x\"})"));
}

#[test]
fn test_fragment() {
    let result = transform("const f = <><a /></>;").expect("Failed to transform");
    assert!(result.contains(
        "React.createElement(React.Fragment, null, React.createElement(\"a\", null))"
    ));
}

#[test]
fn test_attributes() {
    let source = r#"const el = <input disabled aria-label="Name" value={name} {...rest} />;"#;
    let result = transform(source).expect("Failed to transform");

    println!("Generated code:\n{}", result);

    assert!(result.contains(
        r#"React.createElement("input", {disabled: true, "aria-label": "Name", value: name, ...rest})"#
    ));
}

#[test]
fn test_expression_children_and_nested_jsx() {
    let source = r#"
function List({ items }) {
  return (
    <ul>
      {items.map((item) => <li key={item}>{item}</li>)}
    </ul>
  );
}
"#;
    let result = transform(source).expect("Failed to transform");

    println!("Generated code:\n{}", result);

    assert!(result.contains("React.createElement(\"ul\", null, items.map((item) => React.createElement(\"li\", {key: item}, item)))"));
    assert!(!result.contains("<li"));
}

#[test]
fn test_multiline_text_children() {
    let source = r#"
const el = (
  <p>
    Hello
    World &amp; friends
    {/* comment only */}
  </p>
);
"#;
    let result = transform(source).expect("Failed to transform");
    assert!(result.contains("React.createElement(\"p\", null, \"Hello World & friends\")"));
}

#[test]
fn test_text_around_expressions() {
    let result = transform("const el = <span>Count: {count}!</span>;").expect("Failed to transform");
    assert!(result.contains("React.createElement(\"span\", null, \"Count: \", count, \"!\")"));
}

#[test]
fn test_plain_javascript_is_untouched() {
    let source = "export default function X(){ return 1; }";
    let result = transform(source).expect("Failed to transform");
    assert_eq!(result, format!("import React from 'react';\n{}", source));
}

#[test]
fn test_comparison_is_not_jsx() {
    let source = "import React from 'react';\nconst ok = a < b && c > d;";
    assert_eq!(transform(source).unwrap(), source);
}

#[test]
fn test_unbalanced_source_fails() {
    let err = transform("function( {").unwrap_err();

    println!("Diagnostic: {}", err);

    assert!(err.message.starts_with("Line 1:"));
    assert!(!err.message.contains(VIRTUAL_FILENAME));
    assert_eq!(err.line, Some(1));
}

#[test]
fn test_error_line_accounts_for_injected_import() {
    let source = "const a = 1;\nconst b = ;\n";
    let err = transform(source).unwrap_err();
    assert_eq!(err.line, Some(2));
    assert!(err.message.starts_with("Line 2:"));

    let (start, _) = err.span.unwrap();
    assert!(start >= "const a = 1;\n".len());
}

#[test]
fn test_mismatched_closing_tag_fails() {
    let err = transform("const el = <div></span>;").unwrap_err();
    assert!(err.message.starts_with("Line 1:"));
}

#[test]
fn test_namespace_tags_are_unsupported() {
    let err = transform("const el = <svg:rect />;").unwrap_err();
    assert!(err.message.starts_with("Line 1:"));
    assert!(!err.message.contains(VIRTUAL_FILENAME));
}

#[test]
fn test_deep_array_nesting_is_rejected() {
    let depth = 20_000;
    let source = format!("const a = {}1{};", "[".repeat(depth), "]".repeat(depth));
    let err = transform(&source).unwrap_err();

    println!("Diagnostic: {}", err);

    assert!(err.message.starts_with("Line 1:"));
    assert!(err.message.contains("Nesting too deep"));
    assert!(!err.message.contains(VIRTUAL_FILENAME));
}

#[test]
fn test_deep_jsx_nesting_is_rejected() {
    let depth = 20_000;
    let source = format!("const el = {}{};", "<a>".repeat(depth), "</a>".repeat(depth));
    let err = transform(&source).unwrap_err();
    assert!(err.message.contains("Nesting too deep"));
}

#[test]
fn test_moderate_jsx_nesting_transforms() {
    let depth = 100;
    let source = format!("const el = {}x{};", "<b>".repeat(depth), "</b>".repeat(depth));
    let result = transform(&source).expect("Failed to transform");
    assert_eq!(result.matches("React.createElement(\"b\"").count(), depth);
}

#[test]
fn test_const_without_initializer_fails() {
    let err = transform("const a;").unwrap_err();
    assert_eq!(err.line, Some(1));
    assert!(err.message.starts_with("Line 1:"));
    assert!(err.message.contains("Missing initializer in const declaration"));
}

#[test]
fn test_duplicate_declaration_fails() {
    let err = transform("let x = 1;\nlet x = 2;").unwrap_err();
    assert_eq!(err.line, Some(2));
    assert!(err.message.contains("has already been declared"));
}

#[test]
fn test_named_entities_in_text() {
    let result = transform("const el = <p>caf&eacute; &euro;5 &hearts;</p>;").expect("Failed to transform");
    assert!(result.contains("\"caf\u{e9} \u{20ac}5 \u{2665}\""));
}
