use std::sync::LazyLock;

use k8s_openapi::api::core::v1::Namespace;

use super::meta::{cluster_meta, serving_labels, SERVING_NAMESPACE};

pub static NAMESPACE_KNATIVE_SERVING: LazyLock<Namespace> = LazyLock::new(|| Namespace {
    metadata: cluster_meta(SERVING_NAMESPACE, serving_labels(None)),
    ..Default::default()
});
