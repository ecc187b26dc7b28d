//! # Livepad Guard
//!
//! Static dependency check that runs before any transformation. User source may
//! only pull in the React runtime (and relative modules, which are left alone);
//! anything else is rejected with the name of the first offending module.

mod error;
mod guard;
mod scanner;

pub use error::{GuardError, GuardResult};
pub use guard::{check, is_allowed, ALLOWED_MODULES};
pub use scanner::{scan_imports, ImportKind, ImportReference};
