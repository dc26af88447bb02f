use lastseen_types::{Body, Essence, Patch};

use crate::error::StoreResult;

/// Where the last handled essence of an object is kept.
///
/// All implementations must satisfy these invariants:
/// - Reads come from the observed body and writes go into a caller-owned
///   patch. The store never submits anything itself.
/// - A stored value that cannot be decoded is an error, never "nothing stored".
/// - Staging an essence and then retrieving it from the patched body yields
///   an equal essence.
pub trait EssenceStore: Send + Sync {
    /// Check whether the body carries a stored essence.
    fn has_essence(&self, body: &Body) -> bool;

    /// Read the stored essence of a body.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    /// Returns `Err` if the stored value is unreadable.
    fn retrieve_essence(&self, body: &Body) -> StoreResult<Option<Essence>>;

    /// Stage `essence` into the patch so that it is stored once the patch
    /// is applied. Only the store's own slot of the patch is written.
    fn stage_essence(&self, patch: &mut Patch, essence: &Essence) -> StoreResult<()>;
}
