//! Annotation-backed persistence of last-handled essences.
//!
//! The last handled essence of an object is stored on the object itself, as
//! a JSON string under a well-known annotation key. No external database is
//! involved: the state travels with the object, survives restarts, and is
//! shared by every replica that reads the object.
//!
//! # Key Types
//!
//! - [`TrackingConfig`] -- Annotation key derivation and ignored foreign annotations
//! - [`encode_essence`] / [`decode_essence`] -- Exact JSON round-trip of an essence
//! - [`EssenceStore`] -- Storage trait; [`AnnotationStore`] is the annotation-backed implementation
//! - [`has_stored_essence`] / [`retrieve_stored_essence`] / [`stage_essence`] -- Store operations
//!
//! # Design Rules
//!
//! 1. Every operation receives its [`TrackingConfig`] explicitly; there is no global key.
//! 2. A stored value that cannot be decoded is an error, never "no prior state".
//! 3. Staging only writes the single tracking annotation slot of a patch.

pub mod annotations;
pub mod codec;
pub mod config;
pub mod error;
pub mod traits;

pub use annotations::{
    has_stored_essence, retrieve_stored_essence, stage_essence, AnnotationStore,
};
pub use codec::{decode_essence, encode_essence};
pub use config::{TrackingConfig, BASE_ANNOTATION, LAST_APPLIED_ANNOTATION};
pub use error::{StoreError, StoreResult};
pub use traits::EssenceStore;
