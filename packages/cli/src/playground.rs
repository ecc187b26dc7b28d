//! The playground page served at `/`

use livepad_sandbox::SandboxPolicy;

/// Component loaded when nothing else is configured
pub const INITIAL_SOURCE: &str = r#"import React from 'react';

function App() {
  return (
    <div>
      <h1>Hello World</h1>
    </div>
  );
}

export default App;
"#;

const PAGE_TEMPLATE: &str = include_str!("playground.html");

/// Render the editor / preview page with the iframe locked down by `policy`
pub fn render_page(policy: &SandboxPolicy) -> String {
    PAGE_TEMPLATE.replace("{{SANDBOX}}", &policy.iframe_attribute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_applies_policy() {
        let page = render_page(&SandboxPolicy::default());
        assert!(page.contains("<iframe id=\"preview\" sandbox=\"allow-scripts\""));
        assert!(!page.contains("{{SANDBOX}}"));
        assert!(!page.contains("allow-same-origin"));
    }

    #[test]
    fn test_initial_source_is_valid() {
        livepad_guard::check(INITIAL_SOURCE).unwrap();
        let transpiled = livepad_transpiler::transform(INITIAL_SOURCE).unwrap();
        assert!(transpiled.contains("React.createElement(\"h1\", null, \"Hello World\")"));
    }
}
