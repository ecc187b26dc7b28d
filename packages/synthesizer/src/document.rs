use crate::context::DocumentContext;
use crate::exports::{process_module, DefaultExport, DEFAULT_BINDING};
use crate::{MOUNT_ID, NO_DEFAULT_EXPORT_MESSAGE, REACT_DOM_RUNTIME_URL, REACT_RUNTIME_URL};
use serde::Serialize;
use std::fmt;

/// Runtime entry points made available to user code without the `React.` prefix
const RUNTIME_ALIASES: &[&str] = &[
    "useState",
    "useEffect",
    "useLayoutEffect",
    "useRef",
    "useMemo",
    "useCallback",
    "useContext",
    "useReducer",
    "useId",
    "useTransition",
    "useDeferredValue",
    "useImperativeHandle",
    "useSyncExternalStore",
    "createElement",
    "createContext",
    "forwardRef",
    "memo",
    "Fragment",
];

const STYLESHEET: &str = r#"body {
  margin: 0;
  padding: 16px;
  background: #1e1e1e;
  color: #d4d4d4;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
}
#root { width: 100%; height: 100%; }
.livepad-runtime-error {
  color: #f48771;
  padding: 16px;
  border-left: 4px solid #f48771;
  background: #2d1f1f;
  font-family: monospace;
}
.livepad-runtime-error pre { white-space: pre-wrap; margin: 8px 0 0; }"#;

/// Installed before the runtime loads, so even a failed script load or a
/// syntax error in the user block ends up in the mount target
const ERROR_TRAP: &str = r#"(function () {
  function showRuntimeError(error) {
    var message = error && error.message ? error.message : String(error);
    console.error('Preview error:', error);
    var block = document.createElement('div');
    block.className = 'livepad-runtime-error';
    var title = document.createElement('strong');
    title.textContent = 'Runtime Error:';
    var detail = document.createElement('pre');
    detail.textContent = message;
    block.appendChild(title);
    block.appendChild(detail);
    var mount = document.getElementById('__MOUNT_ID__');
    while (mount.firstChild) {
      mount.removeChild(mount.firstChild);
    }
    mount.appendChild(block);
  }
  window.__livepadShowError = showRuntimeError;
  window.addEventListener('error', function (event) {
    showRuntimeError(event.error || event.message);
  });
  window.addEventListener('unhandledrejection', function (event) {
    showRuntimeError(event.reason);
  });
})();"#;

/// Error boundary so render-time exceptions stay inside the preview
const ERROR_BOUNDARY: &str = r#"function __PreviewBoundary(props) {
  React.Component.call(this, props);
  this.state = { error: null };
}
__PreviewBoundary.prototype = Object.create(React.Component.prototype);
__PreviewBoundary.prototype.constructor = __PreviewBoundary;
__PreviewBoundary.getDerivedStateFromError = function (error) {
  return { error: error };
};
__PreviewBoundary.prototype.componentDidCatch = function (error) {
  console.error('Preview error:', error);
};
__PreviewBoundary.prototype.render = function () {
  var error = this.state.error;
  if (error) {
    return React.createElement('div', { className: 'livepad-runtime-error' },
      React.createElement('strong', null, 'Runtime Error:'),
      React.createElement('pre', null, error && error.message ? error.message : String(error)));
  }
  return this.props.children;
};"#;

/// A complete, self-contained preview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    html: String,
    default_export: DefaultExport,
}

impl PreviewDocument {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn default_export(&self) -> &DefaultExport {
        &self.default_export
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl fmt::Display for PreviewDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Build the preview document for transpiled code
pub fn synthesize(transpiled: &str) -> PreviewDocument {
    let module = process_module(transpiled);
    tracing::debug!(default_export = ?module.default_export, "synthesizing preview document");

    let mut ctx = DocumentContext::new();
    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<style>");
    ctx.indent();
    ctx.add_line(STYLESHEET);
    ctx.dedent();
    ctx.add_line("</style>");
    ctx.dedent();
    ctx.add_line("</head>");
    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line(&format!("<div id=\"{}\"></div>", MOUNT_ID));
    ctx.add_line("");

    ctx.add_line("<script>");
    ctx.indent();
    ctx.add_line(&ERROR_TRAP.replace("__MOUNT_ID__", MOUNT_ID));
    ctx.dedent();
    ctx.add_line("</script>");

    ctx.add_line(&format!("<script crossorigin src=\"{}\"></script>", REACT_RUNTIME_URL));
    ctx.add_line(&format!("<script crossorigin src=\"{}\"></script>", REACT_DOM_RUNTIME_URL));
    ctx.add_line("");

    ctx.add_line("<script>");
    ctx.indent();
    compile_execution_block(&mut ctx, &module.code, &module.default_export);
    ctx.dedent();
    ctx.add_line("</script>");
    ctx.dedent();
    ctx.add_line("</body>");
    ctx.add_line("</html>");

    PreviewDocument {
        html: ctx.into_output(),
        default_export: module.default_export,
    }
}

fn compile_execution_block(ctx: &mut DocumentContext, code: &str, default_export: &DefaultExport) {
    ctx.add_line("(function () {");
    ctx.indent();
    ctx.add_line("try {");
    ctx.indent();

    for alias in RUNTIME_ALIASES {
        ctx.add_line(&format!("var {} = React.{};", alias, alias));
    }
    ctx.add_line(ERROR_BOUNDARY);
    ctx.add_line("");

    // user code gets its own scope so it may redeclare the aliases above
    ctx.add_line("(function () {");
    ctx.add_verbatim(&escape_script(code));
    ctx.add_line("");
    ctx.indent();
    ctx.add_line(&format!(
        "var __previewRoot = ReactDOM.createRoot(document.getElementById('{}'));",
        MOUNT_ID
    ));
    compile_render(ctx, default_export);
    ctx.dedent();
    ctx.add_line("})();");

    ctx.dedent();
    ctx.add_line("} catch (error) {");
    ctx.indent();
    ctx.add_line("window.__livepadShowError(error);");
    ctx.dedent();
    ctx.add_line("}");
    ctx.dedent();
    ctx.add_line("})();");
}

fn compile_render(ctx: &mut DocumentContext, default_export: &DefaultExport) {
    let render = |target: &str| {
        format!(
            "__previewRoot.render(React.createElement(__PreviewBoundary, null, React.createElement({})));",
            target
        )
    };
    let placeholder = |message: &str| {
        format!(
            "__previewRoot.render(React.createElement('div', null, '{}'));",
            message.replace('\\', "\\\\").replace('\'', "\\'")
        )
    };

    match default_export {
        DefaultExport::Named(name) => {
            ctx.add_line(&format!("if (typeof {} !== 'undefined') {{", name));
            ctx.indent();
            ctx.add_line(&render(name));
            ctx.dedent();
            ctx.add_line("} else {");
            ctx.indent();
            ctx.add_line(&placeholder(&format!("Component \"{}\" not found", name)));
            ctx.dedent();
            ctx.add_line("}");
        }
        DefaultExport::Anonymous => {
            ctx.add_line(&format!("if (typeof {} !== 'undefined') {{", DEFAULT_BINDING));
            ctx.indent();
            ctx.add_line(&render(DEFAULT_BINDING));
            ctx.dedent();
            ctx.add_line("} else {");
            ctx.indent();
            ctx.add_line(&placeholder(NO_DEFAULT_EXPORT_MESSAGE));
            ctx.dedent();
            ctx.add_line("}");
        }
        DefaultExport::Missing => {
            ctx.add_line(&placeholder(NO_DEFAULT_EXPORT_MESSAGE));
        }
    }
}

/// Keep inlined code from closing the surrounding `<script>` element
fn escape_script(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let closes_script = tail
            .get(..8)
            .map(|t| t.eq_ignore_ascii_case("</script"))
            .unwrap_or(false);

        if closes_script {
            out.push_str("<\\/");
            rest = &tail[2..];
        } else if tail.starts_with("<!--") {
            out.push_str("<\\!--");
            rest = &tail[4..];
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}
