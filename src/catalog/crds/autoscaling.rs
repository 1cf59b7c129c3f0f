use std::sync::LazyLock;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

use super::schema::*;
use super::{column, crd, ready_columns, storage_version, Names, Scope};

const GROUP: &str = "autoscaling.internal.knative.dev";

pub static CUSTOM_RESOURCE_DEFINITION_METRICS_AUTOSCALING_INTERNAL_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "panicWindow",
            int64().description(
                "PanicWindow is the aggregation window for metrics where quick reactions are needed.",
            ),
        ),
        (
            "scrapeTarget",
            string().description(
                "ScrapeTarget is the K8s service that publishes the metric endpoint.",
            ),
        ),
        (
            "stableWindow",
            int64().description(
                "StableWindow is the aggregation window for metrics in a stable state.",
            ),
        ),
    ])
    .description("Spec holds the desired state of the Metric (from the client).")
    .required(["panicWindow", "stableWindow"]);

    let status = knative_status(
        "Status communicates the observed state of the Metric (from the controller).",
        [],
    );

    crd(
        GROUP,
        Names {
            kind: "Metric",
            plural: "metrics",
            singular: "metric",
            categories: &["knative-internal", "autoscaling"],
            short_names: &[],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "Metric represents a resource to configure the metric collector with.",
                spec,
                status,
            ),
            ready_columns().into(),
        ),
        [],
        false,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_PODAUTOSCALERS_AUTOSCALING_INTERNAL_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "containerConcurrency",
            int64().description(
                "ContainerConcurrency specifies the maximum allowed in-flight (concurrent) requests per container of the Revision. Defaults to `0` which means unlimited concurrency.",
            ),
        ),
        (
            "protocolType",
            string().description(
                "The application-layer protocol. Matches `ProtocolType` inferred from the revision spec.",
            ),
        ),
        (
            "reachability",
            string().description(
                "Reachability specifies whether or not the `ScaleTargetRef` can be reached (ie. has a route). Defaults to `ReachabilityUnknown`",
            ),
        ),
        (
            "scaleTargetRef",
            object_reference().description(
                "ScaleTargetRef defines the /scale-able resource that this PodAutoscaler is responsible for quickly right-sizing.",
            ),
        ),
    ])
    .description("Spec holds the desired state of the PodAutoscaler (from the client).")
    .required(["protocolType", "scaleTargetRef"]);

    let status = knative_status(
        "Status communicates the observed state of the PodAutoscaler (from the controller).",
        [
            (
                "actualScale",
                int32().description(
                    "ActualScale shows the actual number of replicas for the revision.",
                ),
            ),
            (
                "desiredScale",
                int32().description(
                    "DesiredScale shows the current desired number of replicas for the revision.",
                ),
            ),
            (
                "metricsServiceName",
                string().description(
                    "MetricsServiceName is the K8s Service name that provides revision metrics. The service is managed by the PA object.",
                ),
            ),
            (
                "serviceName",
                string().description(
                    "ServiceName is the K8s Service name that serves the revision, scaled by this PA. The service is created and owned by the ServerlessService object owned by this PA.",
                ),
            ),
        ],
    );

    let mut columns = vec![
        column("DesiredScale", "integer", ".status.desiredScale"),
        column("ActualScale", "integer", ".status.actualScale"),
    ];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "PodAutoscaler",
            plural: "podautoscalers",
            singular: "podautoscaler",
            categories: &["knative-internal", "autoscaling"],
            short_names: &["kpa", "pa"],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "PodAutoscaler is a Knative abstraction that encapsulates the interface by which Knative components instantiate autoscalers.  This definition is an abstraction that may be backed by multiple definitions.  For more information, see the Knative Pluggability presentation: https://docs.google.com/presentation/d/19vW9HFZ6Puxt31biNZF3uLRejDmu82rxJIk1cWmxF7w/edit",
                spec,
                status,
            ),
            columns,
        ),
        [],
        false,
    )
});
