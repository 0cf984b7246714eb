//! The ChatMirror widget runtime.
//!
//! One cycle of the widget works like this:
//!
//! 1. The scheduler's one-shot timer fires
//! 2. The poller assembles a prompt (random variant, templates resolved)
//! 3. The completion client issues the request — the sole suspension point
//! 4. The outcome is classified and the display state updated
//! 5. The next timer is armed: success interval after a good response, retry
//!    delay after a transient failure, nothing after a 401
//!
//! The loop is sequential by construction — the next timer is only armed
//! after the previous cycle resolves, so no two requests ever overlap.

pub mod display;
pub mod poller;
pub mod prompt;
pub mod scheduler;
pub mod template;

pub use display::{DisplayState, DisplayView, MISSING_API_KEY_TEXT};
pub use poller::{Poller, UNAUTHORIZED_TEXT};
pub use scheduler::Scheduler;
