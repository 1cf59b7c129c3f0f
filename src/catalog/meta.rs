use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

/// Release this catalog mirrors.
pub const SERVING_VERSION: &str = "1.15.0";
/// Release of the bundled net-kourier ingress.
pub const KOURIER_VERSION: &str = "1.15.0";

pub const SERVING_NAMESPACE: &str = "knative-serving";
pub const KOURIER_NAMESPACE: &str = "kourier-system";

pub fn string_map<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Labels carried by every serving-core record, plus the component when there is one.
pub fn serving_labels(component: Option<&str>) -> BTreeMap<String, String> {
    let mut labels = string_map([
        ("app.kubernetes.io/name", "knative-serving"),
        ("app.kubernetes.io/version", SERVING_VERSION),
    ]);
    if let Some(component) = component {
        labels.insert("app.kubernetes.io/component".into(), component.into());
    }
    labels
}

pub fn kourier_labels() -> BTreeMap<String, String> {
    string_map([
        ("networking.knative.dev/ingress-provider", "kourier"),
        ("app.kubernetes.io/component", "net-kourier"),
        ("app.kubernetes.io/version", KOURIER_VERSION),
        ("app.kubernetes.io/name", "knative-serving"),
    ])
}

pub fn with_labels<const N: usize>(
    mut labels: BTreeMap<String, String>,
    extra: [(&str, &str); N],
) -> BTreeMap<String, String> {
    labels.extend(string_map(extra));
    labels
}

pub fn cluster_meta(name: &str, labels: BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.into()),
        labels: Some(labels),
        ..Default::default()
    }
}

pub fn namespaced_meta(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.into()),
        namespace: Some(namespace.into()),
        labels: Some(labels),
        ..Default::default()
    }
}

pub fn with_annotations<const N: usize>(
    mut metadata: ObjectMeta,
    annotations: [(&str, &str); N],
) -> ObjectMeta {
    metadata
        .annotations
        .get_or_insert_with(BTreeMap::new)
        .extend(string_map(annotations));
    metadata
}

pub fn match_labels<const N: usize>(pairs: [(&str, &str); N]) -> LabelSelector {
    LabelSelector {
        match_labels: Some(string_map(pairs)),
        match_expressions: None,
    }
}

pub fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serving_labels_include_component_when_given() {
        let labels = serving_labels(Some("activator"));
        assert_eq!(labels["app.kubernetes.io/component"], "activator");
        assert_eq!(labels["app.kubernetes.io/version"], "1.15.0");
        assert!(!serving_labels(None).contains_key("app.kubernetes.io/component"));
    }

    #[test]
    fn with_annotations_merges_into_existing() {
        let meta = with_annotations(
            with_annotations(cluster_meta("x", BTreeMap::new()), [("a", "1")]),
            [("b", "2")],
        );
        let annotations = meta.annotations.unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations["a"], "1");
    }
}
