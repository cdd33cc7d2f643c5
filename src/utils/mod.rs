//! Shared helpers

pub mod text;

pub use text::render_message;
