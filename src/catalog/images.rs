//! Container images referenced by the catalog, and the queue-proxy `Image` record.
//!
//! Knative images use the release tag; bump them together with `SERVING_VERSION`
//! and `KOURIER_VERSION`.

use std::sync::LazyLock;

use crate::resources::{Image, ImageSpec};

use super::meta::{namespaced_meta, serving_labels, SERVING_NAMESPACE};

pub const QUEUE_PROXY_IMAGE: &str = "gcr.io/knative-releases/knative.dev/serving/cmd/queue:v1.15.0";
pub const ACTIVATOR_IMAGE: &str =
    "gcr.io/knative-releases/knative.dev/serving/cmd/activator:v1.15.0";
pub const AUTOSCALER_IMAGE: &str =
    "gcr.io/knative-releases/knative.dev/serving/cmd/autoscaler:v1.15.0";
pub const CONTROLLER_IMAGE: &str =
    "gcr.io/knative-releases/knative.dev/serving/cmd/controller:v1.15.0";
pub const WEBHOOK_IMAGE: &str = "gcr.io/knative-releases/knative.dev/serving/cmd/webhook:v1.15.0";
pub const KOURIER_CONTROLLER_IMAGE: &str =
    "gcr.io/knative-releases/knative.dev/net-kourier/cmd/kourier:v1.15.0";
pub const ENVOY_IMAGE: &str = "docker.io/envoyproxy/envoy:v1.31-latest";

pub static IMAGE_QUEUE_PROXY: LazyLock<Image> = LazyLock::new(|| Image {
    metadata: namespaced_meta(
        "queue-proxy",
        SERVING_NAMESPACE,
        serving_labels(Some("queue-proxy")),
    ),
    spec: ImageSpec {
        image: QUEUE_PROXY_IMAGE.into(),
        service_account_name: None,
        image_pull_secrets: None,
    },
    status: None,
});
