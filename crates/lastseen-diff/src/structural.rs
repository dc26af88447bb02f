//! Field-level diff: compare two value trees.
//!
//! Mappings are compared key by key, recursively. Anything else is compared
//! as a whole: sequences and scalars either match or produce one change.
//! A missing or null side turns the other side into a single addition or
//! removal at that path.

use std::fmt;

use serde::Serialize;

use lastseen_types::{FieldPath, Value};

/// Kind of a single field-level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOperation {
    Add,
    Change,
    Remove,
}

impl fmt::Display for DiffOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffOperation::Add => write!(f, "add"),
            DiffOperation::Change => write!(f, "change"),
            DiffOperation::Remove => write!(f, "remove"),
        }
    }
}

/// A single change at one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffItem {
    pub operation: DiffOperation,
    pub field: FieldPath,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl fmt::Display for DiffItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_root() {
            "<root>".to_string()
        } else {
            self.field.to_string()
        };
        write!(f, "{} {}", self.operation, field)?;
        match (&self.old, &self.new) {
            (Some(old), Some(new)) => write!(f, ": {old} -> {new}"),
            (None, Some(new)) => write!(f, ": {new}"),
            (Some(old), None) => write!(f, ": {old}"),
            (None, None) => Ok(()),
        }
    }
}

/// The ordered result of comparing two value trees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diff {
    pub items: Vec<DiffItem>,
}

impl Diff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffItem> {
        self.items.iter()
    }

    /// Number of added fields.
    pub fn additions(&self) -> usize {
        self.count(DiffOperation::Add)
    }

    /// Number of removed fields.
    pub fn removals(&self) -> usize {
        self.count(DiffOperation::Remove)
    }

    /// Number of changed fields.
    pub fn changes(&self) -> usize {
        self.count(DiffOperation::Change)
    }

    fn count(&self, operation: DiffOperation) -> usize {
        self.items
            .iter()
            .filter(|item| item.operation == operation)
            .count()
    }

    /// Narrow the diff to the changes of a single field.
    ///
    /// Items inside `field` are kept with `field` stripped from their path.
    /// Items on an ancestor of `field` (e.g. the whole `spec` was added
    /// while `spec.replicas` is watched) are re-diffed on the resolved
    /// sub-values. Unrelated items are dropped.
    pub fn reduce(&self, field: &FieldPath) -> Diff {
        let mut items = Vec::new();
        for item in &self.items {
            if let Some(tail) = item.field.strip_prefix(field) {
                items.push(DiffItem {
                    field: tail,
                    ..item.clone()
                });
            } else if let Some(tail) = field.strip_prefix(&item.field) {
                let old = item.old.as_ref().and_then(|v| v.get_path(&tail));
                let new = item.new.as_ref().and_then(|v| v.get_path(&tail));
                diff_into(old, new, FieldPath::root(), &mut items);
            }
        }
        Diff { items }
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a DiffItem;
    type IntoIter = std::slice::Iter<'a, DiffItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Compute the diff between two value trees.
///
/// `None` and `Value::Null` are treated alike, so `diff(None, Some(new))`
/// yields one root-level `Add` carrying the whole of `new`.
pub fn diff(old: Option<&Value>, new: Option<&Value>) -> Diff {
    let mut items = Vec::new();
    diff_into(old, new, FieldPath::root(), &mut items);
    Diff { items }
}

fn diff_into(old: Option<&Value>, new: Option<&Value>, path: FieldPath, out: &mut Vec<DiffItem>) {
    let old = old.filter(|v| !v.is_null());
    let new = new.filter(|v| !v.is_null());

    match (old, new) {
        (None, None) => {}
        (Some(a), Some(b)) if a == b => {}
        (Some(Value::Mapping(a)), Some(Value::Mapping(b))) => {
            // Keys are iterated in sorted order: additions, removals, then recursion.
            for (key, value) in b.iter().filter(|(k, _)| !a.contains_key(*k)) {
                diff_into(None, Some(value), path.join(key), out);
            }
            for (key, value) in a.iter().filter(|(k, _)| !b.contains_key(*k)) {
                diff_into(Some(value), None, path.join(key), out);
            }
            for (key, value) in a.iter() {
                if let Some(other) = b.get(key) {
                    diff_into(Some(value), Some(other), path.join(key), out);
                }
            }
        }
        (None, Some(b)) => out.push(DiffItem {
            operation: DiffOperation::Add,
            field: path,
            old: None,
            new: Some(b.clone()),
        }),
        (Some(a), None) => out.push(DiffItem {
            operation: DiffOperation::Remove,
            field: path,
            old: Some(a.clone()),
            new: None,
        }),
        (Some(a), Some(b)) => out.push(DiffItem {
            operation: DiffOperation::Change,
            field: path,
            old: Some(a.clone()),
            new: Some(b.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn path(text: &str) -> FieldPath {
        FieldPath::parse(text).unwrap()
    }

    #[test]
    fn identical_trees_no_diff() {
        let doc = value(json!({"spec": {"replicas": 3}}));
        assert!(diff(Some(&doc), Some(&doc)).is_empty());
        assert!(diff(None, None).is_empty());
    }

    #[test]
    fn absent_old_is_one_root_addition() {
        let new = value(json!({"spec": {"replicas": 3}, "metadata": {"labels": {"a": "b"}}}));
        let d = diff(None, Some(&new));
        assert_eq!(d.len(), 1);
        assert_eq!(d.additions(), 1);
        assert_eq!(d.items[0].field, FieldPath::root());
        assert_eq!(d.items[0].new.as_ref(), Some(&new));
        assert_eq!(d.items[0].old, None);
    }

    #[test]
    fn absent_new_is_one_root_removal() {
        let old = value(json!({"spec": 1}));
        let d = diff(Some(&old), None);
        assert_eq!(d.removals(), 1);
        assert_eq!(d.items[0].old.as_ref(), Some(&old));
    }

    #[test]
    fn nested_scalar_change() {
        let old = value(json!({"spec": {"replicas": 3, "image": "a"}}));
        let new = value(json!({"spec": {"replicas": 5, "image": "a"}}));
        let d = diff(Some(&old), Some(&new));
        assert_eq!(
            d.items,
            vec![DiffItem {
                operation: DiffOperation::Change,
                field: path("spec.replicas"),
                old: Some(value(json!(3))),
                new: Some(value(json!(5))),
            }]
        );
    }

    #[test]
    fn ordering_is_additions_removals_then_nested() {
        let old = value(json!({"keep": {"x": 1}, "gone": true, "b": 1}));
        let new = value(json!({"keep": {"x": 2}, "added": [1], "b": 1}));
        let d = diff(Some(&old), Some(&new));
        let summary: Vec<(DiffOperation, String)> = d
            .iter()
            .map(|item| (item.operation, item.field.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DiffOperation::Add, "added".to_string()),
                (DiffOperation::Remove, "gone".to_string()),
                (DiffOperation::Change, "keep.x".to_string()),
            ]
        );
    }

    #[test]
    fn sequences_compare_as_a_whole() {
        let old = value(json!({"args": [1, 2, 3]}));
        let new = value(json!({"args": [1, 2]}));
        let d = diff(Some(&old), Some(&new));
        assert_eq!(d.changes(), 1);
        assert_eq!(d.items[0].field, path("args"));
    }

    #[test]
    fn null_values_behave_like_absence() {
        let old = value(json!({"field": null}));
        let new = value(json!({"field": "set"}));
        let d = diff(Some(&old), Some(&new));
        assert_eq!(d.additions(), 1);
        assert_eq!(d.items[0].field, path("field"));
    }

    #[test]
    fn type_change_is_a_change() {
        let old = value(json!({"value": {"nested": 1}}));
        let new = value(json!({"value": "flat"}));
        let d = diff(Some(&old), Some(&new));
        assert_eq!(d.changes(), 1);
    }

    #[test]
    fn reduce_strips_prefix_of_nested_items() {
        let old = value(json!({"spec": {"a": {"x": 1}, "b": 1}}));
        let new = value(json!({"spec": {"a": {"x": 2}, "b": 2}}));
        let reduced = diff(Some(&old), Some(&new)).reduce(&path("spec.a"));
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.items[0].field, path("x"));
    }

    #[test]
    fn reduce_rediffs_ancestor_items() {
        let new = value(json!({"spec": {"replicas": 3, "image": "a"}}));
        let reduced = diff(None, Some(&new)).reduce(&path("spec.replicas"));
        assert_eq!(
            reduced.items,
            vec![DiffItem {
                operation: DiffOperation::Add,
                field: FieldPath::root(),
                old: None,
                new: Some(value(json!(3))),
            }]
        );
    }

    #[test]
    fn reduce_drops_unrelated_items() {
        let old = value(json!({"spec": {"a": 1}, "other": 1}));
        let new = value(json!({"spec": {"a": 1}, "other": 2}));
        assert!(diff(Some(&old), Some(&new)).reduce(&path("spec")).is_empty());
    }

    #[test]
    fn reduce_to_root_is_identity() {
        let old = value(json!({"a": 1}));
        let new = value(json!({"a": 2, "b": 1}));
        let d = diff(Some(&old), Some(&new));
        assert_eq!(d.reduce(&FieldPath::root()), d);
    }

    #[test]
    fn display_and_serialize() {
        let d = diff(
            Some(&value(json!({"spec": {"replicas": 1}}))),
            Some(&value(json!({"spec": {"replicas": 2}}))),
        );
        assert_eq!(d.items[0].to_string(), "change spec.replicas: 1 -> 2");
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!([{"operation": "change", "field": "spec.replicas", "old": 1, "new": 2}])
        );
    }
}
