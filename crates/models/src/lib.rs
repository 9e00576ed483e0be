//! ghprofile Data Models
//!
//! Typed records shared by the collectors, the analyzer and the narrator.
//! Optional fields from upstream APIs are resolved to their defaults before
//! they reach these types.

mod events;
mod models;
mod text;

pub use events::*;
pub use models::*;
pub use text::truncate_text;
