//! Utility functions for common pack operations.

pub mod path;

pub use path::{is_safe_path, is_valid_pack_name, pack_dir};
