use std::sync::LazyLock;

use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{
    AggregationRule, ClusterRole, ClusterRoleBinding, PolicyRule, Role, RoleBinding, RoleRef,
    Subject,
};

use super::meta::{
    cluster_meta, match_labels, namespaced_meta, serving_labels, strings, with_labels,
    SERVING_NAMESPACE,
};

const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

const READ: [&str; 3] = ["get", "list", "watch"];
const MANAGE: [&str; 7] = ["get", "list", "create", "update", "delete", "patch", "watch"];

pub(crate) fn rule<const G: usize, const R: usize, const V: usize>(
    api_groups: [&str; G],
    resources: [&str; R],
    verbs: [&str; V],
) -> PolicyRule {
    PolicyRule {
        api_groups: Some(strings(api_groups)),
        resources: Some(strings(resources)),
        verbs: strings(verbs),
        ..Default::default()
    }
}

pub(crate) fn service_account_subject(name: &str, namespace: &str) -> Subject {
    Subject {
        api_group: None,
        kind: "ServiceAccount".into(),
        name: name.into(),
        namespace: Some(namespace.into()),
    }
}

pub(crate) fn cluster_role_ref(name: &str) -> RoleRef {
    RoleRef {
        api_group: RBAC_API_GROUP.into(),
        kind: "ClusterRole".into(),
        name: name.into(),
    }
}

fn role_ref(name: &str) -> RoleRef {
    RoleRef {
        api_group: RBAC_API_GROUP.into(),
        kind: "Role".into(),
        name: name.into(),
    }
}

/// A ClusterRole whose rules the controller manager fills in from the selected roles.
fn aggregated_cluster_role<const N: usize>(name: &str, selector: [(&str, &str); N]) -> ClusterRole {
    ClusterRole {
        metadata: cluster_meta(name, serving_labels(None)),
        aggregation_rule: Some(AggregationRule {
            cluster_role_selectors: Some(vec![match_labels(selector)]),
        }),
        rules: Some(Vec::new()),
    }
}

pub static CLUSTER_ROLE_KNATIVE_SERVING_AGGREGATED_ADDRESSABLE_RESOLVER: LazyLock<ClusterRole> =
    LazyLock::new(|| {
        aggregated_cluster_role(
            "knative-serving-aggregated-addressable-resolver",
            [("duck.knative.dev/addressable", "true")],
        )
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_ADDRESSABLE_RESOLVER: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-addressable-resolver",
            with_labels(
                serving_labels(None),
                [("duck.knative.dev/addressable", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![rule(
            ["serving.knative.dev"],
            ["routes", "routes/status", "services", "services/status"],
            READ,
        )]),
    });

const INTERNAL_GROUPS: [&str; 3] = [
    "networking.internal.knative.dev",
    "autoscaling.internal.knative.dev",
    "caching.internal.knative.dev",
];

pub static CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_ADMIN: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-namespaced-admin",
            with_labels(
                serving_labels(None),
                [("rbac.authorization.k8s.io/aggregate-to-admin", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![
            rule(["serving.knative.dev"], ["*"], ["*"]),
            rule(INTERNAL_GROUPS, ["*"], READ),
        ]),
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_EDIT: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-namespaced-edit",
            with_labels(
                serving_labels(None),
                [("rbac.authorization.k8s.io/aggregate-to-edit", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![
            rule(
                ["serving.knative.dev"],
                ["*"],
                ["create", "update", "patch", "delete"],
            ),
            rule(INTERNAL_GROUPS, ["*"], READ),
        ]),
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_VIEW: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-namespaced-view",
            with_labels(
                serving_labels(None),
                [("rbac.authorization.k8s.io/aggregate-to-view", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![rule(
            [
                "serving.knative.dev",
                "networking.internal.knative.dev",
                "autoscaling.internal.knative.dev",
                "caching.internal.knative.dev",
            ],
            ["*"],
            READ,
        )]),
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_CORE: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-core",
            with_labels(
                serving_labels(None),
                [("serving.knative.dev/controller", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![
            rule(
                [""],
                [
                    "pods",
                    "namespaces",
                    "secrets",
                    "configmaps",
                    "endpoints",
                    "services",
                    "events",
                    "serviceaccounts",
                ],
                MANAGE,
            ),
            rule([""], ["endpoints/restricted"], ["create"]),
            rule([""], ["namespaces/finalizers"], ["update"]),
            rule(["apps"], ["deployments", "deployments/finalizers"], MANAGE),
            rule(
                ["admissionregistration.k8s.io"],
                [
                    "mutatingwebhookconfigurations",
                    "validatingwebhookconfigurations",
                ],
                MANAGE,
            ),
            rule(
                ["apiextensions.k8s.io"],
                [
                    "customresourcedefinitions",
                    "customresourcedefinitions/status",
                ],
                MANAGE,
            ),
            rule(["autoscaling"], ["horizontalpodautoscalers"], MANAGE),
            rule(["coordination.k8s.io"], ["leases"], MANAGE),
            rule(
                [
                    "serving.knative.dev",
                    "autoscaling.internal.knative.dev",
                    "networking.internal.knative.dev",
                ],
                ["*", "*/status", "*/finalizers"],
                [
                    "get",
                    "list",
                    "create",
                    "update",
                    "delete",
                    "deletecollection",
                    "patch",
                    "watch",
                ],
            ),
            rule(["caching.internal.knative.dev"], ["images"], MANAGE),
        ]),
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_PODSPECABLE_BINDING: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-podspecable-binding",
            with_labels(
                serving_labels(None),
                [("duck.knative.dev/podspecable", "true")],
            ),
        ),
        aggregation_rule: None,
        rules: Some(vec![rule(
            ["serving.knative.dev"],
            ["configurations", "services"],
            ["list", "watch", "patch"],
        )]),
    });

pub static SERVICE_ACCOUNT_CONTROLLER: LazyLock<ServiceAccount> =
    LazyLock::new(|| ServiceAccount {
        metadata: namespaced_meta(
            "controller",
            SERVING_NAMESPACE,
            serving_labels(Some("controller")),
        ),
        ..Default::default()
    });

pub static CLUSTER_ROLE_KNATIVE_SERVING_ADMIN: LazyLock<ClusterRole> = LazyLock::new(|| {
    aggregated_cluster_role(
        "knative-serving-admin",
        [("serving.knative.dev/controller", "true")],
    )
});

pub static CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADMIN: LazyLock<ClusterRoleBinding> =
    LazyLock::new(|| ClusterRoleBinding {
        metadata: cluster_meta(
            "knative-serving-controller-admin",
            serving_labels(Some("controller")),
        ),
        subjects: Some(vec![service_account_subject(
            "controller",
            SERVING_NAMESPACE,
        )]),
        role_ref: cluster_role_ref("knative-serving-admin"),
    });

pub static CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADDRESSABLE_RESOLVER: LazyLock<
    ClusterRoleBinding,
> = LazyLock::new(|| ClusterRoleBinding {
    metadata: cluster_meta(
        "knative-serving-controller-addressable-resolver",
        serving_labels(Some("controller")),
    ),
    subjects: Some(vec![service_account_subject(
        "controller",
        SERVING_NAMESPACE,
    )]),
    role_ref: cluster_role_ref("knative-serving-aggregated-addressable-resolver"),
});

pub static SERVICE_ACCOUNT_ACTIVATOR: LazyLock<ServiceAccount> =
    LazyLock::new(|| ServiceAccount {
        metadata: namespaced_meta(
            "activator",
            SERVING_NAMESPACE,
            serving_labels(Some("activator")),
        ),
        ..Default::default()
    });

pub static ROLE_KNATIVE_SERVING_ACTIVATOR: LazyLock<Role> = LazyLock::new(|| Role {
    metadata: namespaced_meta(
        "knative-serving-activator",
        SERVING_NAMESPACE,
        serving_labels(Some("activator")),
    ),
    rules: Some(vec![
        rule([""], ["configmaps", "secrets"], READ),
        rule(["coordination.k8s.io"], ["leases"], MANAGE),
    ]),
});

pub static CLUSTER_ROLE_KNATIVE_SERVING_ACTIVATOR_CLUSTER: LazyLock<ClusterRole> =
    LazyLock::new(|| ClusterRole {
        metadata: cluster_meta(
            "knative-serving-activator-cluster",
            serving_labels(Some("activator")),
        ),
        aggregation_rule: None,
        rules: Some(vec![
            rule([""], ["services", "endpoints"], READ),
            rule(["serving.knative.dev"], ["revisions"], READ),
        ]),
    });

pub static ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR: LazyLock<RoleBinding> =
    LazyLock::new(|| RoleBinding {
        metadata: namespaced_meta(
            "knative-serving-activator",
            SERVING_NAMESPACE,
            serving_labels(Some("activator")),
        ),
        subjects: Some(vec![service_account_subject(
            "activator",
            SERVING_NAMESPACE,
        )]),
        role_ref: role_ref("knative-serving-activator"),
    });

pub static CLUSTER_ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR_CLUSTER: LazyLock<ClusterRoleBinding> =
    LazyLock::new(|| ClusterRoleBinding {
        metadata: cluster_meta(
            "knative-serving-activator-cluster",
            serving_labels(Some("activator")),
        ),
        subjects: Some(vec![service_account_subject(
            "activator",
            SERVING_NAMESPACE,
        )]),
        role_ref: cluster_role_ref("knative-serving-activator-cluster"),
    });
