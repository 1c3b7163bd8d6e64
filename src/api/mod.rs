//! Session-level entry points: configuration and the undoable extraction
//! workflow built on top of `core`, `text` and `extract`.

mod config;
mod session;

pub use config::SessionConfig;
pub use session::ExtractionSession;
