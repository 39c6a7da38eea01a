//! Filesystem safety helpers.

pub mod path;

pub use path::resolve_in_dir;
