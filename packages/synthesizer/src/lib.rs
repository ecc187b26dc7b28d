//! # Livepad Synthesizer
//!
//! Builds the self-contained HTML document that runs a transpiled component
//! inside the preview sandbox.
//!
//! The document only ever references the two React runtime scripts below.
//! User code is inlined, React imports and `export` statements are removed
//! (React is a global inside the document), and the default export is
//! rendered into `#root` behind three layers of error trapping: a
//! `try/catch` around execution, an error boundary around rendering, and a
//! global `error` listener for whatever escapes both.

mod context;
mod document;
mod exports;

pub use document::{synthesize, PreviewDocument};
pub use exports::{process_module, DefaultExport, ProcessedModule};

/// React runtime, UMD build
pub const REACT_RUNTIME_URL: &str = "https://unpkg.com/react@18/umd/react.production.min.js";

/// ReactDOM runtime, UMD build
pub const REACT_DOM_RUNTIME_URL: &str =
    "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js";

/// The only external resources a preview document may load
pub const RUNTIME_URLS: [&str; 2] = [REACT_RUNTIME_URL, REACT_DOM_RUNTIME_URL];

/// Id of the element the component is rendered into
pub const MOUNT_ID: &str = "root";

/// Placeholder rendered when the module has no default export
pub const NO_DEFAULT_EXPORT_MESSAGE: &str =
    "No default export found. Add: export default YourComponent";
