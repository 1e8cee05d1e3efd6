// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. session::SessionKey)
    clippy::module_name_repetitions
)]

//! # recedit
//!
//! An interactive record editor for CSV tables.
//!
//! A table is loaded, the user picks which columns may be edited, and then
//! steps through the records one at a time:
//! - Title and Abstract are shown read-only for context
//! - Editable fields are written back to the current record on submit
//! - Next/previous navigation with a boundary notice at the end
//! - The edited table is exported as CSV
//!
//! ## Architecture
//!
//! The editing core ([`session`], [`table`]) is a plain in-memory library.
//! The terminal front end uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`session`]: Loaded table, editable set, cursor and record operations
//! - [`table`]: CSV table storage
//! - [`form`]: Edit buffers for the displayed record
//! - [`input`]: Triggers and key bindings
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persisted command-line defaults
//! - [`error`]: Error types

pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod input;
pub mod session;
pub mod table;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::error::SessionError;
    pub use crate::input::{Keymap, Trigger};
    pub use crate::session::{Notice, Session, SessionKey, SessionRegistry};
    pub use crate::table::Table;
}
