//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Screen regions shared by rendering and mouse hit testing
//! - record view, field inputs and the action bar
//! - status/toast bars and the help and field-selector overlays

pub mod layout;

mod overlays;
mod render;
mod status;
mod style;

pub use layout::{
    ActionButton, ScreenLayout, action_buttons, screen_layout, selector_content_top,
    selector_rect, selector_scroll_start,
};
pub use render::render;

/// Upper bound on the width of the field-name column in the form.
pub const FIELD_LABEL_MAX_WIDTH: u16 = 24;

#[cfg(test)]
mod tests;
