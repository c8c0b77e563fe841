//! Filesystem primitives shared across features.

pub mod sandbox;
pub mod walk;

pub use sandbox::{normalize_path, resolve_inside};
pub use walk::{WalkedFile, walk_files};
