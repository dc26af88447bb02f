//! Reading and staging the tracking annotation.

use tracing::{debug, warn};

use lastseen_types::{Body, Essence, Patch, Value};

use crate::codec::{decode_essence, encode_essence};
use crate::config::TrackingConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::EssenceStore;

/// [`EssenceStore`] backed by the tracking annotation of the object itself.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    config: TrackingConfig,
}

impl AnnotationStore {
    pub fn new(config: TrackingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }
}

impl EssenceStore for AnnotationStore {
    fn has_essence(&self, body: &Body) -> bool {
        has_stored_essence(body, &self.config)
    }

    fn retrieve_essence(&self, body: &Body) -> StoreResult<Option<Essence>> {
        retrieve_stored_essence(body, &self.config)
    }

    fn stage_essence(&self, patch: &mut Patch, essence: &Essence) -> StoreResult<()> {
        stage_essence(patch, &self.config, essence)
    }
}

/// Returns `true` if the body carries a tracking annotation for `config`.
pub fn has_stored_essence(body: &Body, config: &TrackingConfig) -> bool {
    body.annotation(&config.annotation_key()).is_some()
}

/// Retrieve the essence stored on the body.
///
/// Returns `Ok(None)` when no tracking annotation is present. A present but
/// undecodable annotation is an error: treating it as "no prior state"
/// would hide corruption or tampering and could suppress expected handling.
pub fn retrieve_stored_essence(
    body: &Body,
    config: &TrackingConfig,
) -> StoreResult<Option<Essence>> {
    let key = config.annotation_key();
    let Some(stored) = body.annotation(&key) else {
        return Ok(None);
    };

    let result = match stored {
        Value::String(text) => decode_essence(&key, text),
        other => Err(StoreError::Parse {
            key: key.clone(),
            reason: format!("annotation value is not a string: {other}"),
        }),
    };

    match result {
        Ok(essence) => {
            debug!(key = %key, "retrieved stored essence");
            Ok(Some(essence))
        }
        Err(e) => {
            warn!(key = %key, error = %e, "stored essence is unreadable");
            Err(e)
        }
    }
}

/// Stage `essence` into the patch under the tracking annotation.
///
/// Intermediate `metadata` and `annotations` mappings are created in the
/// patch as needed. Nothing else in the patch is touched.
pub fn stage_essence(
    patch: &mut Patch,
    config: &TrackingConfig,
    essence: &Essence,
) -> StoreResult<()> {
    let key = config.annotation_key();
    let text = encode_essence(essence)?;
    debug!(key = %key, len = text.len(), "staged essence into patch");
    patch.annotations_mut().insert(key, Value::String(text));
    Ok(())
}
