use crate::error::{GuardError, GuardResult};
use crate::scanner::scan_imports;

/// Packages user code may import; compared case-insensitively
pub const ALLOWED_MODULES: [&str; 2] = ["react", "react-dom"];

/// Whether a module name passes the allow-list
pub fn is_allowed(module: &str) -> bool {
    module.starts_with('.')
        || module.starts_with('/')
        || ALLOWED_MODULES
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(module))
}

/// Reject source that depends on anything but the React runtime.
///
/// The first disallowed module in source order is reported; later ones are
/// not looked at.
pub fn check(source: &str) -> GuardResult {
    for reference in scan_imports(source) {
        if !is_allowed(&reference.module) {
            tracing::debug!(module = %reference.module, "guard rejected import");
            return Err(GuardError::disallowed_import(
                reference.module,
                (reference.start, reference.end),
            ));
        }
    }

    Ok(())
}
