//! Autoscaling and disruption budgets for the data-path workloads.
//!
//! These ship with the release but are kept out of [`super::resources`]; clusters
//! that run a single replica of everything apply only the core list.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use k8s_openapi::api::autoscaling::v2::{
    CrossVersionObjectReference, HorizontalPodAutoscaler, HorizontalPodAutoscalerSpec,
    MetricSpec, MetricTarget, ResourceMetricSource,
};
use k8s_openapi::api::policy::v1::{PodDisruptionBudget, PodDisruptionBudgetSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::meta::{
    kourier_labels, match_labels, namespaced_meta, serving_labels, KOURIER_NAMESPACE,
    SERVING_NAMESPACE,
};

/// Scales `deployment` on CPU, targeting full utilisation of the request.
fn cpu_autoscaler(
    deployment: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    max_replicas: i32,
) -> HorizontalPodAutoscaler {
    HorizontalPodAutoscaler {
        metadata: namespaced_meta(deployment, namespace, labels),
        spec: Some(HorizontalPodAutoscalerSpec {
            min_replicas: Some(1),
            max_replicas,
            scale_target_ref: CrossVersionObjectReference {
                api_version: Some("apps/v1".into()),
                kind: "Deployment".into(),
                name: deployment.into(),
            },
            metrics: Some(vec![MetricSpec {
                type_: "Resource".into(),
                resource: Some(ResourceMetricSource {
                    name: "cpu".into(),
                    target: MetricTarget {
                        type_: "Utilization".into(),
                        average_utilization: Some(100),
                        ..Default::default()
                    },
                }),
                ..Default::default()
            }]),
            behavior: None,
        }),
        status: None,
    }
}

/// Keeps 80% of the pods labelled `app` through voluntary disruptions.
fn disruption_budget(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    app: &str,
) -> PodDisruptionBudget {
    PodDisruptionBudget {
        metadata: namespaced_meta(name, namespace, labels),
        spec: Some(PodDisruptionBudgetSpec {
            min_available: Some(IntOrString::String("80%".into())),
            selector: Some(match_labels([("app", app)])),
            ..Default::default()
        }),
        status: None,
    }
}

pub static HORIZONTAL_POD_AUTOSCALER_ACTIVATOR: LazyLock<HorizontalPodAutoscaler> =
    LazyLock::new(|| {
        cpu_autoscaler(
            "activator",
            SERVING_NAMESPACE,
            serving_labels(Some("activator")),
            20,
        )
    });

pub static POD_DISRUPTION_BUDGET_ACTIVATOR_PDB: LazyLock<PodDisruptionBudget> =
    LazyLock::new(|| {
        disruption_budget(
            "activator-pdb",
            SERVING_NAMESPACE,
            serving_labels(Some("activator")),
            "activator",
        )
    });

pub static HORIZONTAL_POD_AUTOSCALER_WEBHOOK: LazyLock<HorizontalPodAutoscaler> =
    LazyLock::new(|| {
        cpu_autoscaler(
            "webhook",
            SERVING_NAMESPACE,
            serving_labels(Some("webhook")),
            5,
        )
    });

pub static POD_DISRUPTION_BUDGET_WEBHOOK_PDB: LazyLock<PodDisruptionBudget> =
    LazyLock::new(|| {
        disruption_budget(
            "webhook-pdb",
            SERVING_NAMESPACE,
            serving_labels(Some("webhook")),
            "webhook",
        )
    });

pub static HORIZONTAL_POD_AUTOSCALER_3SCALE_KOURIER_GATEWAY: LazyLock<HorizontalPodAutoscaler> =
    LazyLock::new(|| {
        cpu_autoscaler(
            "3scale-kourier-gateway",
            KOURIER_NAMESPACE,
            kourier_labels(),
            10,
        )
    });

pub static POD_DISRUPTION_BUDGET_3SCALE_KOURIER_GATEWAY_PDB: LazyLock<PodDisruptionBudget> =
    LazyLock::new(|| {
        disruption_budget(
            "3scale-kourier-gateway-pdb",
            KOURIER_NAMESPACE,
            kourier_labels(),
            "3scale-kourier-gateway",
        )
    });
