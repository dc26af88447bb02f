//! Structural diff engine for last-handled state tracking.
//!
//! Compares two value trees and produces an ordered list of field-level
//! operations, and renders two trees as a line-level text diff for humans.
//!
//! # Key Types
//!
//! - [`Diff`] / [`DiffItem`] / [`DiffOperation`] -- Field-level change list
//! - [`UnifiedDiff`] / [`text_diff`] -- Unified line diff of two rendered documents

pub mod structural;
pub mod text_diff;

pub use structural::{diff, Diff, DiffItem, DiffOperation};
pub use text_diff::{text_diff, UnifiedDiff};
