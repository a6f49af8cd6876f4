//! The deduction registry and the workspace that holds it.

mod deductions;
mod sessions;
mod workspace;

pub use deductions::DeductionRegistry;
pub use sessions::SessionMap;
pub use workspace::{MAX_OPEN_SESSIONS, Workspace};
