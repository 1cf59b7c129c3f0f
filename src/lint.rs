//! Consistency checks across catalog records.
//!
//! Linting only reports; it never changes what the catalog holds or emits.

use std::collections::HashSet;
use std::sync::LazyLock;

use k8s_openapi::api::admissionregistration::v1::ServiceReference as WebhookService;
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::api::rbac::v1::{RoleRef, Subject};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::catalog::KubernetesResource;

static DNS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

static DNS_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid regex")
});

const DNS_LABEL_MAX: usize = 63;
const DNS_SUBDOMAIN_MAX: usize = 253;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    #[error("{record}: {name:?} is not a valid DNS-1123 {rule}")]
    InvalidName {
        record: String,
        name: String,
        rule: &'static str,
    },

    #[error("{record} is declared more than once")]
    Duplicate { record: String },

    #[error("{record}: expected exactly one storage version, found {found}")]
    StorageVersions { record: String, found: usize },

    #[error("{record}: CRD name must be {expected}")]
    CrdName { record: String, expected: String },

    #[error("{record}: references {kind} {target} which is not in the bundle")]
    Dangling {
        record: String,
        kind: &'static str,
        target: String,
    },

    #[error("{record}: namespace {namespace} is not declared in the bundle")]
    UndeclaredNamespace { record: String, namespace: String },
}

type Key = (String, Option<String>, String);

fn key(kind: &str, namespace: Option<&str>, name: &str) -> Key {
    (kind.to_string(), namespace.map(str::to_string), name.to_string())
}

/// Kind, namespace and name of every record, for reference lookups.
struct Index {
    entries: HashSet<Key>,
}

impl Index {
    fn new(records: &[KubernetesResource]) -> Self {
        Self {
            entries: records
                .iter()
                .map(|r| key(&r.kind(), r.namespace(), r.name()))
                .collect(),
        }
    }

    fn contains(&self, kind: &str, namespace: Option<&str>, name: &str) -> bool {
        self.entries.contains(&key(kind, namespace, name))
    }
}

/// Collects reference checks for one record.
struct Checker<'a> {
    index: &'a Index,
    record: KubernetesResource,
    issues: &'a mut Vec<LintIssue>,
}

impl Checker<'_> {
    fn require(&mut self, kind: &'static str, namespace: Option<&str>, name: &str) {
        if !self.index.contains(kind, namespace, name) {
            let target = match namespace {
                Some(namespace) => format!("{namespace}/{name}"),
                None => name.to_string(),
            };
            self.issues.push(LintIssue::Dangling {
                record: self.record.to_string(),
                kind,
                target,
            });
        }
    }

    fn subjects(&mut self, subjects: Option<&Vec<Subject>>) {
        for subject in subjects.into_iter().flatten() {
            if subject.kind == "ServiceAccount" {
                let namespace = subject.namespace.as_deref().or(self.record.namespace());
                self.require("ServiceAccount", namespace, &subject.name);
            }
        }
    }

    fn role_ref(&mut self, role_ref: &RoleRef) {
        match role_ref.kind.as_str() {
            "ClusterRole" => self.require("ClusterRole", None, &role_ref.name),
            "Role" => self.require("Role", self.record.namespace(), &role_ref.name),
            _ => {}
        }
    }

    fn webhook_service(&mut self, service: Option<&WebhookService>) {
        if let Some(service) = service {
            self.require("Service", Some(&service.namespace), &service.name);
        }
    }

    fn pod_spec(&mut self, pod: &PodSpec) {
        let namespace = self.record.namespace();
        if let Some(account) = &pod.service_account_name {
            self.require("ServiceAccount", namespace, account);
        }
        for volume in pod.volumes.iter().flatten() {
            if let Some(config_map) = &volume.config_map {
                if config_map.optional != Some(true) {
                    self.require("ConfigMap", namespace, &config_map.name);
                }
            }
            if let Some(secret) = &volume.secret {
                if let (Some(name), false) = (&secret.secret_name, secret.optional == Some(true)) {
                    self.require("Secret", namespace, name);
                }
            }
        }
        for container in pod.init_containers.iter().flatten().chain(&pod.containers) {
            for source in container.env.iter().flatten().filter_map(|e| e.value_from.as_ref()) {
                if let Some(key) = &source.config_map_key_ref {
                    if key.optional != Some(true) {
                        self.require("ConfigMap", namespace, &key.name);
                    }
                }
                if let Some(key) = &source.secret_key_ref {
                    if key.optional != Some(true) {
                        self.require("Secret", namespace, &key.name);
                    }
                }
            }
            for source in container.env_from.iter().flatten() {
                if let Some(config_map) = &source.config_map_ref {
                    if config_map.optional != Some(true) {
                        self.require("ConfigMap", namespace, &config_map.name);
                    }
                }
                if let Some(secret) = &source.secret_ref {
                    if secret.optional != Some(true) {
                        self.require("Secret", namespace, &secret.name);
                    }
                }
            }
        }
    }
}

fn check_name(record: KubernetesResource, issues: &mut Vec<LintIssue>) {
    let name = record.name();
    let (rule, pattern, max) = match record {
        KubernetesResource::Namespace(_)
        | KubernetesResource::Service(_)
        | KubernetesResource::ServiceAccount(_) => ("label", &*DNS_LABEL, DNS_LABEL_MAX),
        _ => ("subdomain", &*DNS_SUBDOMAIN, DNS_SUBDOMAIN_MAX),
    };
    if name.is_empty() || name.len() > max || !pattern.is_match(name) {
        issues.push(LintIssue::InvalidName {
            record: record.to_string(),
            name: name.to_string(),
            rule,
        });
    }
}

/// Runs every check over `records` and returns what it found, in record order.
pub fn lint(records: &[KubernetesResource]) -> Vec<LintIssue> {
    let index = Index::new(records);
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for &record in records {
        check_name(record, &mut issues);

        let identity = (record.api_version(), record.kind(), record.namespace(), record.name());
        if !seen.insert(identity) {
            issues.push(LintIssue::Duplicate {
                record: record.to_string(),
            });
        }

        if let Some(namespace) = record.namespace() {
            if !index.contains("Namespace", None, namespace) {
                issues.push(LintIssue::UndeclaredNamespace {
                    record: record.to_string(),
                    namespace: namespace.to_string(),
                });
            }
        }

        let mut checker = Checker {
            index: &index,
            record,
            issues: &mut issues,
        };
        match record {
            KubernetesResource::RoleBinding(binding) => {
                checker.subjects(binding.subjects.as_ref());
                checker.role_ref(&binding.role_ref);
            }
            KubernetesResource::ClusterRoleBinding(binding) => {
                checker.subjects(binding.subjects.as_ref());
                checker.role_ref(&binding.role_ref);
            }
            KubernetesResource::Deployment(deployment) => {
                if let Some(pod) = deployment.spec.as_ref().and_then(|s| s.template.spec.as_ref()) {
                    checker.pod_spec(pod);
                }
            }
            KubernetesResource::ValidatingWebhookConfiguration(config) => {
                for webhook in config.webhooks.iter().flatten() {
                    checker.webhook_service(webhook.client_config.service.as_ref());
                }
            }
            KubernetesResource::MutatingWebhookConfiguration(config) => {
                for webhook in config.webhooks.iter().flatten() {
                    checker.webhook_service(webhook.client_config.service.as_ref());
                }
            }
            KubernetesResource::HorizontalPodAutoscaler(hpa) => {
                if let Some(spec) = &hpa.spec {
                    if spec.scale_target_ref.kind == "Deployment" {
                        checker.require(
                            "Deployment",
                            record.namespace(),
                            &spec.scale_target_ref.name,
                        );
                    }
                }
            }
            KubernetesResource::CustomResourceDefinition(crd) => {
                let service = crd
                    .spec
                    .conversion
                    .as_ref()
                    .and_then(|c| c.webhook.as_ref())
                    .and_then(|w| w.client_config.as_ref())
                    .and_then(|c| c.service.as_ref());
                if let Some(service) = service {
                    checker.require("Service", Some(&service.namespace), &service.name);
                }

                let found = crd.spec.versions.iter().filter(|v| v.storage).count();
                if found != 1 {
                    issues.push(LintIssue::StorageVersions {
                        record: record.to_string(),
                        found,
                    });
                }
                let expected = format!("{}.{}", crd.spec.names.plural, crd.spec.group);
                if record.name() != expected {
                    issues.push(LintIssue::CrdName {
                        record: record.to_string(),
                        expected,
                    });
                }
            }
            _ => {}
        }
    }

    debug!(records = records.len(), issues = issues.len(), "Linted catalog");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        high_availability_resources, resources,
        CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADMIN, CONFIG_MAP_CONFIG_GC,
        CUSTOM_RESOURCE_DEFINITION_ROUTES_SERVING_KNATIVE_DEV, DEPLOYMENT_3SCALE_KOURIER_GATEWAY,
        DEPLOYMENT_ACTIVATOR, ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR, SERVICE_ACCOUNT_ACTIVATOR,
        VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV,
    };
    use k8s_openapi::api::admissionregistration::v1::ValidatingWebhookConfiguration;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::{ConfigMap, ServiceAccount};
    use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleBinding};
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

    fn with_record(record: KubernetesResource) -> Vec<KubernetesResource> {
        let mut records = resources().to_vec();
        records.push(record);
        records
    }

    #[test]
    fn core_catalog_is_clean() {
        let issues = lint(resources());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn catalog_with_high_availability_is_clean() {
        let records: Vec<_> = resources()
            .iter()
            .chain(high_availability_resources())
            .copied()
            .collect();
        let issues = lint(&records);
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn high_availability_alone_misses_its_targets() {
        let issues = lint(high_availability_resources());
        assert!(issues.iter().any(|i| matches!(
            i,
            LintIssue::Dangling { kind: "Deployment", target, .. }
                if target == "knative-serving/activator"
        )));
    }

    #[test]
    fn reports_binding_to_missing_service_account() {
        let mut binding = ROLE_BINDING_KNATIVE_SERVING_ACTIVATOR.clone();
        binding.metadata.name = Some("broken".into());
        if let Some(subjects) = binding.subjects.as_mut() {
            subjects[0].name = "ghost".into();
        }
        let binding: &'static RoleBinding = Box::leak(Box::new(binding));

        let issues = lint(&with_record(binding.into()));
        assert_eq!(
            issues,
            vec![LintIssue::Dangling {
                record: "RoleBinding knative-serving/broken".into(),
                kind: "ServiceAccount",
                target: "knative-serving/ghost".into(),
            }]
        );
    }

    fn pod_spec_mut(deployment: &mut Deployment) -> &mut PodSpec {
        deployment
            .spec
            .as_mut()
            .and_then(|s| s.template.spec.as_mut())
            .unwrap()
    }

    #[test]
    fn reports_deployment_with_missing_service_account() {
        let mut deployment = DEPLOYMENT_ACTIVATOR.clone();
        deployment.metadata.name = Some("broken".into());
        pod_spec_mut(&mut deployment).service_account_name = Some("ghost".into());
        let deployment: &'static Deployment = Box::leak(Box::new(deployment));

        let issues = lint(&with_record(deployment.into()));
        assert_eq!(
            issues,
            vec![LintIssue::Dangling {
                record: "Deployment knative-serving/broken".into(),
                kind: "ServiceAccount",
                target: "knative-serving/ghost".into(),
            }]
        );
    }

    #[test]
    fn reports_deployment_with_missing_config_map_volume() {
        let mut deployment = DEPLOYMENT_3SCALE_KOURIER_GATEWAY.clone();
        deployment.metadata.name = Some("broken".into());
        let volume = pod_spec_mut(&mut deployment)
            .volumes
            .iter_mut()
            .flatten()
            .find_map(|v| v.config_map.as_mut())
            .unwrap();
        volume.name = "ghost-bootstrap".into();
        let deployment: &'static Deployment = Box::leak(Box::new(deployment));

        let issues = lint(&with_record(deployment.into()));
        assert_eq!(
            issues,
            vec![LintIssue::Dangling {
                record: "Deployment kourier-system/broken".into(),
                kind: "ConfigMap",
                target: "kourier-system/ghost-bootstrap".into(),
            }]
        );
    }

    #[test]
    fn reports_binding_to_missing_cluster_role() {
        let mut binding = CLUSTER_ROLE_BINDING_KNATIVE_SERVING_CONTROLLER_ADMIN.clone();
        binding.metadata.name = Some("broken".into());
        binding.role_ref.name = "ghost-role".into();
        let binding: &'static ClusterRoleBinding = Box::leak(Box::new(binding));

        let issues = lint(&with_record(binding.into()));
        assert_eq!(
            issues,
            vec![LintIssue::Dangling {
                record: "ClusterRoleBinding broken".into(),
                kind: "ClusterRole",
                target: "ghost-role".into(),
            }]
        );
    }

    #[test]
    fn reports_webhook_with_missing_service() {
        let mut config =
            VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV.clone();
        config.metadata.name = Some("broken.webhook.serving.knative.dev".into());
        let service = config
            .webhooks
            .iter_mut()
            .flatten()
            .find_map(|w| w.client_config.service.as_mut())
            .unwrap();
        service.name = "ghost-svc".into();
        let config: &'static ValidatingWebhookConfiguration = Box::leak(Box::new(config));

        let issues = lint(&with_record(config.into()));
        assert_eq!(
            issues,
            vec![LintIssue::Dangling {
                record: "ValidatingWebhookConfiguration broken.webhook.serving.knative.dev".into(),
                kind: "Service",
                target: "knative-serving/ghost-svc".into(),
            }]
        );
    }

    #[test]
    fn reports_record_in_undeclared_namespace() {
        let mut config_map = CONFIG_MAP_CONFIG_GC.clone();
        config_map.metadata.namespace = Some("elsewhere".into());
        let config_map: &'static ConfigMap = Box::leak(Box::new(config_map));

        let issues = lint(&with_record(config_map.into()));
        assert_eq!(
            issues,
            vec![LintIssue::UndeclaredNamespace {
                record: "ConfigMap elsewhere/config-gc".into(),
                namespace: "elsewhere".into(),
            }]
        );
    }

    #[test]
    fn reports_crd_without_storage_version_or_canonical_name() {
        let mut crd = CUSTOM_RESOURCE_DEFINITION_ROUTES_SERVING_KNATIVE_DEV.clone();
        crd.metadata.name = Some("broken.serving.knative.dev".into());
        for version in &mut crd.spec.versions {
            version.storage = false;
        }
        let crd: &'static CustomResourceDefinition = Box::leak(Box::new(crd));

        let issues = lint(&with_record(crd.into()));
        assert_eq!(
            issues,
            vec![
                LintIssue::StorageVersions {
                    record: "CustomResourceDefinition broken.serving.knative.dev".into(),
                    found: 0,
                },
                LintIssue::CrdName {
                    record: "CustomResourceDefinition broken.serving.knative.dev".into(),
                    expected: "routes.serving.knative.dev".into(),
                },
            ]
        );
    }

    #[test]
    fn reports_duplicates() {
        let issues = lint(&with_record((&*SERVICE_ACCOUNT_ACTIVATOR).into()));
        assert_eq!(
            issues,
            vec![LintIssue::Duplicate {
                record: "ServiceAccount knative-serving/activator".into()
            }]
        );
    }

    #[test]
    fn rejects_names_that_are_not_dns() {
        let mut account = SERVICE_ACCOUNT_ACTIVATOR.clone();
        account.metadata.name = Some("Not.A.Label".into());
        let account: &'static ServiceAccount = Box::leak(Box::new(account));

        let issues = lint(&with_record(account.into()));
        assert!(matches!(
            &issues[..],
            [LintIssue::InvalidName { rule: "label", .. }]
        ));
    }

    #[test]
    fn issues_render_readably() {
        let issue = LintIssue::UndeclaredNamespace {
            record: "ConfigMap elsewhere/x".into(),
            namespace: "elsewhere".into(),
        };
        assert_eq!(
            issue.to_string(),
            "ConfigMap elsewhere/x: namespace elsewhere is not declared in the bundle"
        );
    }
}
