//! Knative Serving 1.15 and its Kourier gateway as typed Kubernetes records.
//!
//! Every record is a `LazyLock` static built on first access and never mutated.
//! [`resources`] lists the core records in the order a cluster operator applies
//! them; [`high_availability_resources`] adds autoscalers and disruption budgets.
//! Both hand out references to the same statics, so identity is preserved.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret, Service, ServiceAccount};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::Serialize;

use crate::resources::Image;
use crate::Result;

mod config;
mod crds;
mod high_availability;
mod images;
mod kourier;
pub mod meta;
mod namespaces;
mod rbac;
mod webhooks;
mod workloads;

pub use config::*;
pub use crds::*;
pub use high_availability::*;
pub use images::*;
pub use kourier::*;
pub use namespaces::*;
pub use rbac::*;
pub use webhooks::*;
pub use workloads::*;

macro_rules! resource_kinds {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// A reference to one catalog record. Serializes as the record itself.
        #[derive(Clone, Copy, Debug, Serialize)]
        #[serde(untagged)]
        pub enum KubernetesResource {
            $($variant(&'static $ty),)+
        }

        impl KubernetesResource {
            pub fn kind(&self) -> Cow<'static, str> {
                match self {
                    $(Self::$variant(_) => <$ty as Resource>::kind(&()),)+
                }
            }

            pub fn api_version(&self) -> Cow<'static, str> {
                match self {
                    $(Self::$variant(_) => <$ty as Resource>::api_version(&()),)+
                }
            }

            pub fn metadata(&self) -> &'static ObjectMeta {
                match *self {
                    $(Self::$variant(record) => record.meta(),)+
                }
            }
        }

        $(
            impl From<&'static $ty> for KubernetesResource {
                fn from(record: &'static $ty) -> Self {
                    Self::$variant(record)
                }
            }
        )+
    };
}

resource_kinds! {
    Namespace(Namespace),
    ServiceAccount(ServiceAccount),
    ClusterRole(ClusterRole),
    Role(Role),
    ClusterRoleBinding(ClusterRoleBinding),
    RoleBinding(RoleBinding),
    CustomResourceDefinition(CustomResourceDefinition),
    Image(Image),
    ConfigMap(ConfigMap),
    Secret(Secret),
    Deployment(Deployment),
    Service(Service),
    ValidatingWebhookConfiguration(ValidatingWebhookConfiguration),
    MutatingWebhookConfiguration(MutatingWebhookConfiguration),
    HorizontalPodAutoscaler(HorizontalPodAutoscaler),
    PodDisruptionBudget(PodDisruptionBudget),
}

impl KubernetesResource {
    pub fn name(&self) -> &'static str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&'static str> {
        self.metadata().namespace.as_deref()
    }

    pub fn is_cluster_scoped(&self) -> bool {
        matches!(
            self,
            Self::Namespace(_)
                | Self::ClusterRole(_)
                | Self::ClusterRoleBinding(_)
                | Self::CustomResourceDefinition(_)
                | Self::ValidatingWebhookConfiguration(_)
                | Self::MutatingWebhookConfiguration(_)
        )
    }

    /// The record as JSON, `apiVersion` and `kind` included.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// `Kind namespace/name`, or `Kind name` for cluster scoped records.
impl fmt::Display for KubernetesResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(namespace) => write!(f, "{} {namespace}/{}", self.kind(), self.name()),
            None => write!(f, "{} {}", self.kind(), self.name()),
        }
    }
}

static RESOURCES: LazyLock<Vec<KubernetesResource>> = LazyLock::new(|| {
    use KubernetesResource as R;
    vec![
        R::Namespace(&NAMESPACE_KNATIVE_SERVING),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_AGGREGATED_ADDRESSABLE_RESOLVER),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_ADDRESSABLE_RESOLVER),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_ADMIN),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_EDIT),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_VIEW),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_CORE),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_PODSPECABLE_BINDING),
        R::ServiceAccount(&SERVICE_ACCOUNT_CONTROLLER),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_ADMIN),
        R::ClusterRoleBinding(&CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADMIN),
        R::ClusterRoleBinding(
            &CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADDRESSABLE_RESOLVER,
        ),
        R::ServiceAccount(&SERVICE_ACCOUNT_ACTIVATOR),
        R::Role(&ROLE_KNATIVE_SERVING_ACTIVATOR),
        R::ClusterRole(&CLUSTER_ROLE_KNATIVE_SERVING_ACTIVATOR_CLUSTER),
        R::RoleBinding(&ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR),
        R::ClusterRoleBinding(&CLUSTER_ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR_CLUSTER),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_IMAGES_CACHING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_CERTIFICATES_NETWORKING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(&CUSTOM_RESOURCE_DEFINITION_CONFIGURATIONS_SERVING_KNATIVE_DEV),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_CLUSTERDOMAINCLAIMS_NETWORKING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(&CUSTOM_RESOURCE_DEFINITION_DOMAINMAPPINGS_SERVING_KNATIVE_DEV),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_INGRESSES_NETWORKING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_METRICS_AUTOSCALING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_PODAUTOSCALERS_AUTOSCALING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(&CUSTOM_RESOURCE_DEFINITION_REVISIONS_SERVING_KNATIVE_DEV),
        R::CustomResourceDefinition(&CUSTOM_RESOURCE_DEFINITION_ROUTES_SERVING_KNATIVE_DEV),
        R::CustomResourceDefinition(
            &CUSTOM_RESOURCE_DEFINITION_SERVERLESSSERVICES_NETWORKING_INTERNAL_KNATIVE_DEV,
        ),
        R::CustomResourceDefinition(&CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV),
        R::Image(&IMAGE_QUEUE_PROXY),
        R::ConfigMap(&CONFIG_MAP_CONFIG_AUTOSCALER),
        R::ConfigMap(&CONFIG_MAP_CONFIG_DEFAULTS),
        R::ConfigMap(&CONFIG_MAP_CONFIG_DEPLOYMENT),
        R::ConfigMap(&CONFIG_MAP_CONFIG_DOMAIN),
        R::ConfigMap(&CONFIG_MAP_CONFIG_FEATURES),
        R::ConfigMap(&CONFIG_MAP_CONFIG_GC),
        R::ConfigMap(&CONFIG_MAP_CONFIG_LEADER_ELECTION),
        R::ConfigMap(&CONFIG_MAP_CONFIG_LOGGING),
        R::ConfigMap(&CONFIG_MAP_CONFIG_NETWORK),
        R::ConfigMap(&CONFIG_MAP_CONFIG_OBSERVABILITY),
        R::ConfigMap(&CONFIG_MAP_CONFIG_TRACING),
        R::Deployment(&DEPLOYMENT_ACTIVATOR),
        R::Service(&SERVICE_ACTIVATOR_SERVICE),
        R::Deployment(&DEPLOYMENT_AUTOSCALER),
        R::Service(&SERVICE_AUTOSCALER),
        R::Deployment(&DEPLOYMENT_CONTROLLER),
        R::Service(&SERVICE_CONTROLLER),
        R::Deployment(&DEPLOYMENT_WEBHOOK),
        R::Service(&SERVICE_WEBHOOK),
        R::ValidatingWebhookConfiguration(
            &VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV,
        ),
        R::MutatingWebhookConfiguration(
            &MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
        ),
        R::ValidatingWebhookConfiguration(
            &VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
        ),
        R::MutatingWebhookConfiguration(
            &MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_SERVING_KNATIVE_DEV,
        ),
        R::ValidatingWebhookConfiguration(
            &VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_SERVING_KNATIVE_DEV,
        ),
        R::Secret(&SECRET_WEBHOOK_CERTS),
        R::Namespace(&NAMESPACE_KOURIER_SYSTEM),
        R::ConfigMap(&CONFIG_MAP_KOURIER_BOOTSTRAP),
        R::ConfigMap(&CONFIG_MAP_CONFIG_KOURIER),
        R::ServiceAccount(&SERVICE_ACCOUNT_NET_KOURIER),
        R::ClusterRole(&CLUSTER_ROLE_NET_KOURIER),
        R::ClusterRoleBinding(&CLUSTER_ROLE_BINDING_NET_KOURIER),
        R::Deployment(&DEPLOYMENT_NET_KOURIER_CONTROLLER),
        R::Service(&SERVICE_NET_KOURIER_CONTROLLER),
        R::Deployment(&DEPLOYMENT_3SCALE_KOURIER_GATEWAY),
        R::Service(&SERVICE_KOURIER),
        R::Service(&SERVICE_KOURIER_INTERNAL),
    ]
});

static HIGH_AVAILABILITY_RESOURCES: LazyLock<Vec<KubernetesResource>> = LazyLock::new(|| {
    use KubernetesResource as R;
    vec![
        R::HorizontalPodAutoscaler(&HORIZONTAL_POD_AUTOSCALER_ACTIVATOR),
        R::PodDisruptionBudget(&POD_DISRUPTION_BUDGET_ACTIVATOR_PDB),
        R::HorizontalPodAutoscaler(&HORIZONTAL_POD_AUTOSCALER_WEBHOOK),
        R::PodDisruptionBudget(&POD_DISRUPTION_BUDGET_WEBHOOK_PDB),
        R::HorizontalPodAutoscaler(&HORIZONTAL_POD_AUTOSCALER_3SCALE_KOURIER_GATEWAY),
        R::PodDisruptionBudget(&POD_DISRUPTION_BUDGET_3SCALE_KOURIER_GATEWAY_PDB),
    ]
});

/// Every core record, in application order.
pub fn resources() -> &'static [KubernetesResource] {
    &RESOURCES
}

/// Autoscalers and disruption budgets for the activator, webhook and gateway.
pub fn high_availability_resources() -> &'static [KubernetesResource] {
    &HIGH_AVAILABILITY_RESOURCES
}

/// Looks a record up by kind, namespace and name across the core and HA lists.
pub fn find(kind: &str, namespace: Option<&str>, name: &str) -> Option<KubernetesResource> {
    resources()
        .iter()
        .chain(high_availability_resources())
        .find(|r| r.kind() == kind && r.namespace() == namespace && r.name() == name)
        .copied()
}

/// Core records of one kind, in application order.
pub fn of_kind(kind: &str) -> impl Iterator<Item = KubernetesResource> + '_ {
    resources().iter().copied().filter(move |r| r.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde::de::DeserializeOwned;

    #[test]
    fn core_catalog_has_sixty_six_records() {
        assert_eq!(resources().len(), 66);
        assert_eq!(high_availability_resources().len(), 6);
    }

    fn same_record(a: KubernetesResource, b: KubernetesResource) -> bool {
        a.kind() == b.kind() && std::ptr::eq(a.metadata(), b.metadata())
    }

    macro_rules! records {
        ($($record:ident),+ $(,)?) => {
            vec![$(KubernetesResource::from(&*$record)),+]
        };
    }

    #[test]
    fn aggregate_holds_the_named_statics_in_order() {
        let expected = records![
            NAMESPACE_KNATIVE_SERVING,
            CLUSTER_ROLE_KNATIVE_SERVING_AGGREGATED_ADDRESSABLE_RESOLVER,
            CLUSTER_ROLE_KNATIVE_SERVING_ADDRESSABLE_RESOLVER,
            CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_ADMIN,
            CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_EDIT,
            CLUSTER_ROLE_KNATIVE_SERVING_NAMESPACED_VIEW,
            CLUSTER_ROLE_KNATIVE_SERVING_CORE,
            CLUSTER_ROLE_KNATIVE_SERVING_PODSPECABLE_BINDING,
            SERVICE_ACCOUNT_CONTROLLER,
            CLUSTER_ROLE_KNATIVE_SERVING_ADMIN,
            CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADMIN,
            CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADDRESSABLE_RESOLVER,
            SERVICE_ACCOUNT_ACTIVATOR,
            ROLE_KNATIVE_SERVING_ACTIVATOR,
            CLUSTER_ROLE_KNATIVE_SERVING_ACTIVATOR_CLUSTER,
            ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR,
            CLUSTER_ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR_CLUSTER,
            CUSTOM_RESOURCE_DEFINITION_IMAGES_CACHING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_CERTIFICATES_NETWORKING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_CONFIGURATIONS_SERVING_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_CLUSTERDOMAINCLAIMS_NETWORKING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_DOMAINMAPPINGS_SERVING_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_INGRESSES_NETWORKING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_METRICS_AUTOSCALING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_PODAUTOSCALERS_AUTOSCALING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_REVISIONS_SERVING_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_ROUTES_SERVING_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_SERVERLESSSERVICES_NETWORKING_INTERNAL_KNATIVE_DEV,
            CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV,
            IMAGE_QUEUE_PROXY,
            CONFIG_MAP_CONFIG_AUTOSCALER,
            CONFIG_MAP_CONFIG_DEFAULTS,
            CONFIG_MAP_CONFIG_DEPLOYMENT,
            CONFIG_MAP_CONFIG_DOMAIN,
            CONFIG_MAP_CONFIG_FEATURES,
            CONFIG_MAP_CONFIG_GC,
            CONFIG_MAP_CONFIG_LEADER_ELECTION,
            CONFIG_MAP_CONFIG_LOGGING,
            CONFIG_MAP_CONFIG_NETWORK,
            CONFIG_MAP_CONFIG_OBSERVABILITY,
            CONFIG_MAP_CONFIG_TRACING,
            DEPLOYMENT_ACTIVATOR,
            SERVICE_ACTIVATOR_SERVICE,
            DEPLOYMENT_AUTOSCALER,
            SERVICE_AUTOSCALER,
            DEPLOYMENT_CONTROLLER,
            SERVICE_CONTROLLER,
            DEPLOYMENT_WEBHOOK,
            SERVICE_WEBHOOK,
            VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV,
            MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
            VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
            MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_SERVING_KNATIVE_DEV,
            VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_SERVING_KNATIVE_DEV,
            SECRET_WEBHOOK_CERTS,
            NAMESPACE_KOURIER_SYSTEM,
            CONFIG_MAP_KOURIER_BOOTSTRAP,
            CONFIG_MAP_CONFIG_KOURIER,
            SERVICE_ACCOUNT_NET_KOURIER,
            CLUSTER_ROLE_NET_KOURIER,
            CLUSTER_ROLE_BINDING_NET_KOURIER,
            DEPLOYMENT_NET_KOURIER_CONTROLLER,
            SERVICE_NET_KOURIER_CONTROLLER,
            DEPLOYMENT_3SCALE_KOURIER_GATEWAY,
            SERVICE_KOURIER,
            SERVICE_KOURIER_INTERNAL,
        ];
        assert_eq!(expected.len(), resources().len());
        for (i, (&actual, &expected)) in resources().iter().zip(&expected).enumerate() {
            assert!(
                same_record(actual, expected),
                "position {i}: found {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn high_availability_aggregate_holds_the_named_statics_in_order() {
        let expected = records![
            HORIZONTAL_POD_AUTOSCALER_ACTIVATOR,
            POD_DISRUPTION_BUDGET_ACTIVATOR_PDB,
            HORIZONTAL_POD_AUTOSCALER_WEBHOOK,
            POD_DISRUPTION_BUDGET_WEBHOOK_PDB,
            HORIZONTAL_POD_AUTOSCALER_3SCALE_KOURIER_GATEWAY,
            POD_DISRUPTION_BUDGET_3SCALE_KOURIER_GATEWAY_PDB,
        ];
        assert_eq!(expected.len(), high_availability_resources().len());
        for (&actual, &expected) in high_availability_resources().iter().zip(&expected) {
            assert!(same_record(actual, expected), "found {actual}, expected {expected}");
        }
    }

    #[test]
    fn every_record_appears_once() {
        let all = resources();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(
                    !std::ptr::eq(a.metadata(), b.metadata()),
                    "{a} is listed twice"
                );
            }
        }
    }

    #[test]
    fn kinds_follow_application_order() {
        let kinds: Vec<_> = resources().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds[0], "Namespace");
        assert!(kinds[1..17]
            .iter()
            .all(|k| k.starts_with("Cluster") || k.starts_with("Role") || k == "ServiceAccount"));
        assert!(kinds[17..29].iter().all(|k| k == "CustomResourceDefinition"));
        assert!(kinds[30..41].iter().all(|k| k == "ConfigMap"));
        assert_eq!(kinds[55], "Namespace");
    }

    #[test]
    fn api_versions_come_from_the_types() {
        let version = |kind: &str| of_kind(kind).next().unwrap().api_version();
        assert_eq!(version("Namespace"), "v1");
        assert_eq!(version("ClusterRole"), "rbac.authorization.k8s.io/v1");
        assert_eq!(version("Deployment"), "apps/v1");
        assert_eq!(version("Image"), "caching.internal.knative.dev/v1alpha1");
        assert_eq!(
            version("ValidatingWebhookConfiguration"),
            "admissionregistration.k8s.io/v1"
        );
        assert_eq!(
            high_availability_resources()[0].api_version(),
            "autoscaling/v2"
        );
        assert_eq!(high_availability_resources()[1].api_version(), "policy/v1");
    }

    #[test]
    fn scope_matches_namespace_presence() {
        for record in resources().iter().chain(high_availability_resources()) {
            assert_eq!(
                record.is_cluster_scoped(),
                record.namespace().is_none(),
                "{record}"
            );
        }
    }

    #[test]
    fn autoscaler_config_is_found_by_identity() {
        let Some(KubernetesResource::ConfigMap(config)) =
            find("ConfigMap", Some("knative-serving"), "config-autoscaler")
        else {
            panic!("config-autoscaler missing");
        };
        let example = &config.data.as_ref().unwrap()["_example"];
        assert!(example.contains("container-concurrency-target-percentage: \"70\""));
    }

    #[test]
    fn find_misses_on_wrong_namespace() {
        assert!(find("ConfigMap", Some("kourier-system"), "config-autoscaler").is_none());
        assert!(find("Namespace", None, "kourier-system").is_some());
        assert!(find("PodDisruptionBudget", Some("knative-serving"), "webhook-pdb").is_some());
    }

    #[test]
    fn of_kind_keeps_order() {
        let names: Vec<_> = of_kind("Deployment").map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "activator",
                "autoscaler",
                "controller",
                "webhook",
                "net-kourier-controller",
                "3scale-kourier-gateway"
            ]
        );
    }

    #[test]
    fn values_carry_type_meta() {
        let record = KubernetesResource::from(&*SERVICE_ACCOUNT_ACTIVATOR);
        let value = record.to_value().unwrap();
        assert_eq!(value["apiVersion"], "v1");
        assert_eq!(value["kind"], "ServiceAccount");
        assert_eq!(value["metadata"]["name"], "activator");
    }

    fn assert_round_trip<T>(record: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + fmt::Debug,
    {
        let value = serde_json::to_value(record).unwrap();
        let parsed: T = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(&parsed, record);
        assert_json_eq!(serde_json::to_value(&parsed).unwrap(), value);
    }

    #[test]
    fn records_survive_a_json_round_trip() {
        for record in resources().iter().chain(high_availability_resources()) {
            match *record {
                KubernetesResource::Namespace(r) => assert_round_trip(r),
                KubernetesResource::ServiceAccount(r) => assert_round_trip(r),
                KubernetesResource::ClusterRole(r) => assert_round_trip(r),
                KubernetesResource::Role(r) => assert_round_trip(r),
                KubernetesResource::ClusterRoleBinding(r) => assert_round_trip(r),
                KubernetesResource::RoleBinding(r) => assert_round_trip(r),
                KubernetesResource::CustomResourceDefinition(r) => assert_round_trip(r),
                KubernetesResource::Image(r) => assert_round_trip(r),
                KubernetesResource::ConfigMap(r) => assert_round_trip(r),
                KubernetesResource::Secret(r) => assert_round_trip(r),
                KubernetesResource::Deployment(r) => assert_round_trip(r),
                KubernetesResource::Service(r) => assert_round_trip(r),
                KubernetesResource::ValidatingWebhookConfiguration(r) => assert_round_trip(r),
                KubernetesResource::MutatingWebhookConfiguration(r) => assert_round_trip(r),
                KubernetesResource::HorizontalPodAutoscaler(r) => assert_round_trip(r),
                KubernetesResource::PodDisruptionBudget(r) => assert_round_trip(r),
            }
        }
    }

    #[test]
    fn webhook_operations_keep_order_through_json() {
        let record = find(
            "ValidatingWebhookConfiguration",
            None,
            "validation.webhook.serving.knative.dev",
        )
        .unwrap();
        let value = record.to_value().unwrap();
        assert_json_eq!(
            value["webhooks"][0]["rules"][0]["operations"].clone(),
            serde_json::json!(["CREATE", "UPDATE", "DELETE"])
        );
    }
}
