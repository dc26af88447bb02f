//! Essence extraction: reduce a full body to the fields that carry intent.
//!
//! Identity fields (`apiVersion`, `kind`) and the system-managed `metadata`
//! and `status` sections are dropped. Labels and annotations are brought
//! back, minus the tracking bookkeeping annotations. Explicitly requested
//! extra fields are restored from the original body even when their parent
//! section was dropped. Containers left empty by the filtering are pruned,
//! so "no labels" and "empty labels" produce the same essence.

use tracing::trace;

use lastseen_store::TrackingConfig;
use lastseen_types::body::{ANNOTATIONS, API_VERSION, KIND, LABELS, METADATA, STATUS};
use lastseen_types::{Body, Essence, FieldPath, Mapping, Value};

/// Extract the essence of a body.
///
/// The result is a deep copy and shares nothing with `body`. Extra fields
/// that do not resolve in the body contribute nothing.
pub fn compute_essence(
    body: &Body,
    config: &TrackingConfig,
    extra_fields: &[FieldPath],
) -> Essence {
    let source = body.as_value();
    let mut essence = source.clone();

    for key in [API_VERSION, KIND, METADATA, STATUS] {
        essence.remove(key);
    }

    let labels = FieldPath::new([METADATA, LABELS]);
    let annotations = FieldPath::new([METADATA, ANNOTATIONS]);
    essence.cherrypick(source, [&labels, &annotations]);
    // The root path would swap in the whole body.
    essence.cherrypick(source, extra_fields.iter().filter(|field| !field.is_root()));

    // Applied after the extra fields, so no field selection can bring the
    // identity fields or the tracking annotation back into the essence.
    for key in [API_VERSION, KIND] {
        essence.remove(key);
    }
    if let Some(Value::Mapping(kept)) = essence.get_path_mut(&annotations) {
        kept.retain(|key, _| !config.is_bookkeeping_annotation(key));
    }

    essence.remove_if_empty(&labels);
    essence.remove_if_empty(&annotations);
    essence.remove_if_empty(&FieldPath::new([METADATA]));
    essence.remove_if_empty(&FieldPath::new([STATUS]));

    trace!(
        extra_fields = extra_fields.len(),
        sections = essence.as_mapping().map_or(0, Mapping::len),
        "computed essence"
    );

    match essence {
        Value::Mapping(mapping) => Essence::new(mapping),
        // A body is always a mapping, and so is its filtered copy.
        _ => Essence::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastseen_store::{BASE_ANNOTATION, LAST_APPLIED_ANNOTATION};
    use serde_json::json;

    fn body(json: serde_json::Value) -> Body {
        Body::try_from(json).unwrap()
    }

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn path(text: &str) -> FieldPath {
        FieldPath::parse(text).unwrap()
    }

    fn essence_of(json: serde_json::Value) -> Value {
        compute_essence(&body(json), &TrackingConfig::default(), &[]).into_value()
    }

    #[test]
    fn drops_identity_and_system_sections() {
        let essence = essence_of(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web", "uid": "123", "resourceVersion": "7"},
            "spec": {"replicas": 3},
            "status": {"readyReplicas": 3},
        }));
        assert_eq!(essence, value(json!({"spec": {"replicas": 3}})));
    }

    #[test]
    fn keeps_other_top_level_sections() {
        let essence = essence_of(json!({
            "kind": "ConfigMap",
            "data": {"key": "value"},
            "immutable": true,
        }));
        assert_eq!(essence, value(json!({"data": {"key": "value"}, "immutable": true})));
    }

    #[test]
    fn readmits_labels_and_annotations() {
        let essence = essence_of(json!({
            "metadata": {
                "name": "web",
                "labels": {"app": "web"},
                "annotations": {"example.com/owner": "team-a"},
            },
        }));
        assert_eq!(
            essence,
            value(json!({"metadata": {
                "labels": {"app": "web"},
                "annotations": {"example.com/owner": "team-a"},
            }}))
        );
    }

    #[test]
    fn strips_bookkeeping_annotations() {
        let essence = essence_of(json!({
            "metadata": {"annotations": {
                BASE_ANNOTATION: "{}",
                LAST_APPLIED_ANNOTATION: "{}",
                "example.com/keep": "yes",
            }},
        }));
        assert_eq!(
            essence,
            value(json!({"metadata": {"annotations": {"example.com/keep": "yes"}}}))
        );
    }

    #[test]
    fn strips_only_own_prefixed_tracking_key() {
        let other = format!("other.{BASE_ANNOTATION}");
        let own = format!("mine.{BASE_ANNOTATION}");
        let b = body(json!({
            "metadata": {"annotations": {own.clone(): "{}", other.clone(): "{}"}},
        }));
        let essence = compute_essence(&b, &TrackingConfig::with_prefix("mine"), &[]);
        let annotations = essence
            .get_path(&path("metadata.annotations"))
            .and_then(Value::as_mapping)
            .unwrap();
        assert!(!annotations.contains_key(&own));
        assert!(annotations.contains_key(&other));
    }

    #[test]
    fn bookkeeping_only_annotations_prune_to_nothing() {
        let essence = essence_of(json!({
            "metadata": {"annotations": {LAST_APPLIED_ANNOTATION: "{}"}},
            "spec": {},
        }));
        assert_eq!(essence, value(json!({"spec": {}})));
    }

    #[test]
    fn empty_labels_prune_metadata_entirely() {
        let with_empty = essence_of(json!({"metadata": {"labels": {}}, "spec": {"a": 1}}));
        let without = essence_of(json!({"spec": {"a": 1}}));
        assert_eq!(with_empty, without);
        assert!(with_empty.get("metadata").is_none());
    }

    #[test]
    fn extra_field_overrides_status_removal() {
        let b = body(json!({
            "spec": {"a": 1},
            "status": {"phase": "Running", "podIP": "10.0.0.1"},
        }));
        let essence = compute_essence(&b, &TrackingConfig::default(), &[path("status.phase")]);
        assert_eq!(
            essence.into_value(),
            value(json!({"spec": {"a": 1}, "status": {"phase": "Running"}}))
        );
    }

    #[test]
    fn extra_field_from_metadata() {
        let b = body(json!({"metadata": {"name": "web", "uid": "1"}}));
        let essence = compute_essence(&b, &TrackingConfig::default(), &[path("metadata.name")]);
        assert_eq!(essence.into_value(), value(json!({"metadata": {"name": "web"}})));
    }

    #[test]
    fn extra_fields_cannot_readmit_tracking_annotation() {
        let b = body(json!({
            "metadata": {"annotations": {BASE_ANNOTATION: "{}"}},
        }));
        let essence = compute_essence(
            &b,
            &TrackingConfig::default(),
            &[path("metadata.annotations"), path("metadata")],
        );
        assert_eq!(essence, Essence::default());
    }

    fn pod() -> Body {
        body(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"uid": "u1"},
            "spec": {"a": 1},
        }))
    }

    #[test]
    fn extra_fields_cannot_readmit_identity() {
        let essence = compute_essence(
            &pod(),
            &TrackingConfig::default(),
            &[path("kind"), path("apiVersion")],
        );
        assert!(!essence.contains_key(API_VERSION));
        assert!(!essence.contains_key(KIND));
        assert_eq!(essence.into_value(), value(json!({"spec": {"a": 1}})));
    }

    #[test]
    fn root_extra_field_is_ignored() {
        let essence = compute_essence(&pod(), &TrackingConfig::default(), &[FieldPath::root()]);
        assert_eq!(essence.into_value(), value(json!({"spec": {"a": 1}})));
    }

    #[test]
    fn missing_extra_field_contributes_nothing() {
        let b = body(json!({"spec": {"a": 1}, "status": {}}));
        let essence = compute_essence(
            &b,
            &TrackingConfig::default(),
            &[path("status.phase"), path("spec.a.deeper"), path("nowhere")],
        );
        assert_eq!(essence.into_value(), value(json!({"spec": {"a": 1}})));
    }

    #[test]
    fn empty_status_from_extra_field_is_pruned() {
        let b = body(json!({"status": {}}));
        let essence = compute_essence(&b, &TrackingConfig::default(), &[path("status")]);
        assert_eq!(essence, Essence::default());
    }

    #[test]
    fn body_without_metadata_is_fine() {
        assert_eq!(essence_of(json!({})), value(json!({})));
        assert_eq!(essence_of(json!({"metadata": "odd"})), value(json!({})));
    }

    #[test]
    fn essence_is_independent_of_body() {
        let original = json!({"spec": {"list": [1, 2]}, "metadata": {"labels": {"a": "b"}}});
        let b = body(original.clone());
        let essence = compute_essence(&b, &TrackingConfig::default(), &[]);
        drop(b);
        assert_eq!(
            essence.into_value(),
            value(json!({"spec": {"list": [1, 2]}, "metadata": {"labels": {"a": "b"}}}))
        );
    }
}
