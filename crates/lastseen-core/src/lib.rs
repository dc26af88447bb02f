//! Essence extraction and change detection for declarative resource
//! reconciliation.
//!
//! Given the observed state of a managed object, this crate decides whether
//! anything a controller cares about changed since the last reconciliation,
//! and stages a compact fingerprint of the handled state back onto the
//! object through a caller-owned patch.
//!
//! Data flows one way: the body is reduced to an [`Essence`](lastseen_types::Essence)
//! by [`compute_essence`], compared with the essence retrieved from the
//! tracking annotation, and the structural diff decides whether a new
//! essence has to be staged.
//!
//! # Key Types
//!
//! - [`ChangeDetector`] -- Tracking configuration plus watched extra fields
//! - [`EssentialDiff`] -- Stored essence, fresh essence, and their diff
//! - [`ChangeReason`] -- Create / update / delete / no-op classification

pub mod detector;
pub mod error;
pub mod essence;
pub mod reason;

pub use detector::{compute_essential_diff, refresh_stored_essence, ChangeDetector, EssentialDiff};
pub use error::{CoreError, CoreResult};
pub use essence::compute_essence;
pub use reason::ChangeReason;
