//! TOTP engine: sub-modules.

pub mod types;
pub mod core;
pub mod clock;
pub mod session;
pub mod link;

// Re-export top-level items for convenience.
pub use types::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use session::{CodeSession, DisplayState, Tick};
