use k8s_openapi::api::core::v1::LocalObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Image is a Knative abstraction that encapsulates the interface by which Knative
/// components express a desire to have a particular image cached.
/// API: caching.internal.knative.dev/v1alpha1
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    group = "caching.internal.knative.dev",
    version = "v1alpha1",
    kind = "Image",
    namespaced,
    derive = "PartialEq"
)]
#[kube(status = "ImageStatus")]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Image is the name of the container image url to cache across the cluster.
    pub image: String,

    /// ServiceAccountName is the name of the Kubernetes ServiceAccount as which the Pods
    /// will run this container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    /// ImagePullSecrets contains the names of the Kubernetes Secrets containing login
    /// information used by the Pods which will run this container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pull_secrets: Option<Vec<LocalObjectReference>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatus {
    /// Annotations is additional Status fields for the Resource to save some
    /// additional State as well as convey more information to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    /// Conditions the latest available observations of a resource's current state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<KnativeCondition>>,

    /// ObservedGeneration is the 'Generation' of the Service that
    /// was last processed by the controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// Condition defines a readiness condition for a Knative resource.
/// Unlike metav1.Condition it carries a severity and has optional reason and message.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnativeCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
