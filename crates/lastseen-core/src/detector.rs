use serde::Serialize;
use tracing::debug;

use lastseen_diff::{diff, Diff};
use lastseen_store::{AnnotationStore, EssenceStore, TrackingConfig};
use lastseen_types::{Body, Essence, FieldPath, Patch};

use crate::error::CoreResult;
use crate::essence::compute_essence;
use crate::reason::ChangeReason;

/// The stored essence, the fresh essence, and the changes between them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EssentialDiff {
    /// The essence stored on the object, if any.
    pub old: Option<Essence>,
    /// The essence computed from the current body.
    pub new: Essence,
    /// Field-level changes from `old` to `new`.
    pub diff: Diff,
}

impl EssentialDiff {
    /// Returns `true` if nothing essential changed.
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }
}

/// Compare the stored essence of a body with its current essence.
///
/// With no stored essence the diff is a single root-level addition of the
/// whole fresh essence. A corrupted tracking annotation is an error.
pub fn compute_essential_diff(
    body: &Body,
    config: &TrackingConfig,
    extra_fields: &[FieldPath],
) -> CoreResult<EssentialDiff> {
    let store = AnnotationStore::new(config.clone());
    essential_diff_in(&store, body, config, extra_fields)
}

/// Stage the current essence into `patch` if it differs from the stored one.
///
/// Returns `true` if the patch was modified. Calling this again on an
/// unchanged body (with the patch applied) never touches the patch.
pub fn refresh_stored_essence(
    body: &Body,
    patch: &mut Patch,
    extra_fields: &[FieldPath],
    config: &TrackingConfig,
) -> CoreResult<bool> {
    let store = AnnotationStore::new(config.clone());
    refresh_in(&store, body, patch, config, extra_fields)
}

fn essential_diff_in<S: EssenceStore + ?Sized>(
    store: &S,
    body: &Body,
    config: &TrackingConfig,
    extra_fields: &[FieldPath],
) -> CoreResult<EssentialDiff> {
    let old = store.retrieve_essence(body)?;
    let new = compute_essence(body, config, extra_fields);
    let diff = diff(old.as_ref().map(Essence::as_value), Some(new.as_value()));
    Ok(EssentialDiff { old, new, diff })
}

fn refresh_in<S: EssenceStore + ?Sized>(
    store: &S,
    body: &Body,
    patch: &mut Patch,
    config: &TrackingConfig,
    extra_fields: &[FieldPath],
) -> CoreResult<bool> {
    let old = store.retrieve_essence(body)?;
    let new = compute_essence(body, config, extra_fields);
    let changed = old.as_ref() != Some(&new);
    if changed {
        store.stage_essence(patch, &new)?;
    }
    debug!(key = %config.annotation_key(), changed, "refreshed essence");
    Ok(changed)
}

/// Change detection for one tracking slot: an annotation store plus the
/// extra fields its handlers watch.
///
/// Refreshing and diffing must use the same extra fields, otherwise watched
/// fields show up as additions on every pass.
#[derive(Clone, Debug, Default)]
pub struct ChangeDetector {
    store: AnnotationStore,
    extra_fields: Vec<FieldPath>,
}

impl ChangeDetector {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            store: AnnotationStore::new(config),
            extra_fields: Vec::new(),
        }
    }

    /// Watch additional fields, ignoring duplicates and the root path.
    pub fn with_extra_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldPath>,
    {
        for field in fields {
            if !field.is_root() && !self.extra_fields.contains(&field) {
                self.extra_fields.push(field);
            }
        }
        self
    }

    pub fn config(&self) -> &TrackingConfig {
        self.store.config()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn extra_fields(&self) -> &[FieldPath] {
        &self.extra_fields
    }

    pub fn essence(&self, body: &Body) -> Essence {
        compute_essence(body, self.config(), &self.extra_fields)
    }

    pub fn essential_diff(&self, body: &Body) -> CoreResult<EssentialDiff> {
        essential_diff_in(&self.store, body, self.config(), &self.extra_fields)
    }

    pub fn refresh(&self, body: &Body, patch: &mut Patch) -> CoreResult<bool> {
        refresh_in(&self.store, body, patch, self.config(), &self.extra_fields)
    }

    /// The essential diff narrowed to one field.
    ///
    /// The field is watched for this computation even if it is not among
    /// the detector's extra fields. An empty result means a handler of that
    /// field has nothing to react to.
    pub fn field_diff(&self, body: &Body, field: &FieldPath) -> CoreResult<Diff> {
        let mut fields = self.extra_fields.clone();
        if !field.is_root() && !fields.contains(field) {
            fields.push(field.clone());
        }
        let essential = essential_diff_in(&self.store, body, self.config(), &fields)?;
        Ok(essential.diff.reduce(field))
    }

    /// Classify what happened to the object since it was last handled.
    pub fn reason(&self, body: &Body) -> CoreResult<ChangeReason> {
        let essential = self.essential_diff(body)?;
        Ok(ChangeReason::classify(body, &essential))
    }
}
