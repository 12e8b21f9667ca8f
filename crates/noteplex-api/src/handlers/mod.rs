//! Request handlers, grouped by route family.

pub mod files;
pub mod join;
pub mod note_settings;
pub mod notes;
pub mod uploads;
