//! Foundation types for last-handled state tracking.
//!
//! This crate provides the document model shared by every other `lastseen`
//! crate: an owned value tree with path-based access, dotted field paths,
//! read-only views of observed objects, and the patch accumulator that
//! collects pending writes.
//!
//! # Key Types
//!
//! - [`Value`] — Tagged tree: null, bool, number, string, sequence, mapping
//! - [`FieldPath`] — Dotted path such as `status.phase`
//! - [`Body`] — Read-only view of a full observed object
//! - [`Essence`] — Filtered, comparison-ready snapshot of a body
//! - [`Patch`] — Caller-owned accumulator of pending mutations

pub mod body;
pub mod error;
pub mod essence;
pub mod patch;
pub mod path;
pub mod value;

pub use body::Body;
pub use error::{TypeError, TypeResult};
pub use essence::Essence;
pub use patch::Patch;
pub use path::FieldPath;
pub use value::{Mapping, Value};
