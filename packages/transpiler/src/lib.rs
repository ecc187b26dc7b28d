//! # Livepad Transpiler
//!
//! Turns JSX component source into plain JavaScript the preview runtime can
//! execute.
//!
//! ```text
//! source ──► inject `import React` ──► tree-sitter (javascript + JSX)
//!                                           │
//!                          syntax error? ───┼──► TransformError ("Line 3:7: ...")
//!                                           ▼
//!                              JsxRewriter: <div a="1">hi</div>
//!                                  ──► React.createElement("div", {a: "1"}, "hi")
//! ```
//!
//! Failures are values: [`transform`] never panics on user input, it returns
//! a [`TransformError`] whose message is relative to the user's own lines.

mod error;
mod jsx;
mod syntax;
mod text;
mod transform;

pub use error::{clean_message, TransformError, TransformResult};
pub use transform::{has_runtime_import, transform};

/// Virtual filename the user's buffer is parsed under
pub const VIRTUAL_FILENAME: &str = "usercode.jsx";

/// Import prepended when the source does not bring React into scope itself
pub const RUNTIME_IMPORT: &str = "import React from 'react';";

#[cfg(test)]
mod tests;
