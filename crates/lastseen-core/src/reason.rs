use std::fmt;

use serde::Serialize;

use lastseen_types::Body;

use crate::detector::EssentialDiff;

/// What happened to an object since it was last handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeReason {
    /// Never handled before: no essence is stored on the object.
    Create,
    /// The essence differs from the stored one.
    Update,
    /// The object is marked for deletion.
    Delete,
    /// Nothing essential changed.
    Noop,
}

impl ChangeReason {
    /// Deletion wins over everything else; then a missing stored essence
    /// means creation, and a non-empty diff means an update.
    pub fn classify(body: &Body, essential: &EssentialDiff) -> Self {
        if body.is_being_deleted() {
            ChangeReason::Delete
        } else if essential.old.is_none() {
            ChangeReason::Create
        } else if !essential.is_empty() {
            ChangeReason::Update
        } else {
            ChangeReason::Noop
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeReason::Create => write!(f, "create"),
            ChangeReason::Update => write!(f, "update"),
            ChangeReason::Delete => write!(f, "delete"),
            ChangeReason::Noop => write!(f, "noop"),
        }
    }
}
