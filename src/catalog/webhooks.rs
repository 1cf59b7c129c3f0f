//! Admission webhook registrations served by the `webhook` Deployment, and the
//! Secret it keeps its serving certificate in.
//!
//! The webhook rewrites `caBundle` and its rules on startup; the registrations
//! here are the install-time shape.

use std::sync::LazyLock;

use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhook, MutatingWebhookConfiguration, RuleWithOperations, ServiceReference,
    ValidatingWebhook, ValidatingWebhookConfiguration, WebhookClientConfig,
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};

use super::meta::{cluster_meta, namespaced_meta, serving_labels, strings, SERVING_NAMESPACE};

const REVIEW_VERSIONS: [&str; 2] = ["v1", "v1beta1"];
const TIMEOUT_SECONDS: i32 = 10;

const DEFAULTING: [&str; 2] = ["CREATE", "UPDATE"];
const VALIDATING: [&str; 3] = ["CREATE", "UPDATE", "DELETE"];

fn webhook_service() -> WebhookClientConfig {
    WebhookClientConfig {
        service: Some(ServiceReference {
            name: "webhook".into(),
            namespace: SERVING_NAMESPACE.into(),
            path: None,
            port: None,
        }),
        ..Default::default()
    }
}

/// Admission rule for one resource and its status subresource.
fn resource_rule<const N: usize>(
    group: &str,
    version: &str,
    plural: &str,
    operations: [&str; N],
) -> RuleWithOperations {
    RuleWithOperations {
        api_groups: Some(vec![group.into()]),
        api_versions: Some(vec![version.into()]),
        operations: Some(strings(operations)),
        resources: Some(vec![plural.into(), format!("{plural}/status")]),
        scope: Some("*".into()),
    }
}

/// The serving API surface the main webhook admits.
fn serving_rules<const N: usize>(operations: [&str; N]) -> Vec<RuleWithOperations> {
    [
        ("autoscaling.internal.knative.dev", "v1alpha1", "metrics"),
        ("autoscaling.internal.knative.dev", "v1alpha1", "podautoscalers"),
        ("serving.knative.dev", "v1", "configurations"),
        ("serving.knative.dev", "v1", "revisions"),
        ("serving.knative.dev", "v1", "routes"),
        ("serving.knative.dev", "v1", "services"),
    ]
    .into_iter()
    .map(|(group, version, plural)| resource_rule(group, version, plural, operations))
    .collect()
}

fn validating_webhook(name: &str, rules: Vec<RuleWithOperations>) -> ValidatingWebhook {
    ValidatingWebhook {
        name: name.into(),
        admission_review_versions: strings(REVIEW_VERSIONS),
        client_config: webhook_service(),
        failure_policy: Some("Fail".into()),
        side_effects: "None".into(),
        timeout_seconds: Some(TIMEOUT_SECONDS),
        rules: Some(rules),
        ..Default::default()
    }
}

fn mutating_webhook(name: &str, rules: Vec<RuleWithOperations>) -> MutatingWebhook {
    MutatingWebhook {
        name: name.into(),
        admission_review_versions: strings(REVIEW_VERSIONS),
        client_config: webhook_service(),
        failure_policy: Some("Fail".into()),
        side_effects: "None".into(),
        timeout_seconds: Some(TIMEOUT_SECONDS),
        rules: Some(rules),
        ..Default::default()
    }
}

fn in_values<const N: usize>(key: &str, values: [&str; N]) -> LabelSelectorRequirement {
    LabelSelectorRequirement {
        key: key.into(),
        operator: "In".into(),
        values: Some(strings(values)),
    }
}

/// Validates edits to the serving `config-*` ConfigMaps.
pub static VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV: LazyLock<
    ValidatingWebhookConfiguration,
> = LazyLock::new(|| {
    let name = "config.webhook.serving.knative.dev";
    let mut webhook = validating_webhook(
        name,
        vec![RuleWithOperations {
            api_groups: Some(strings([""])),
            api_versions: Some(strings(["v1"])),
            operations: Some(strings(DEFAULTING)),
            resources: Some(strings(["configmaps/*"])),
            scope: Some("Namespaced".into()),
        }],
    );
    webhook.object_selector = Some(LabelSelector {
        match_labels: None,
        match_expressions: Some(vec![
            in_values("app.kubernetes.io/name", ["knative-serving"]),
            in_values(
                "app.kubernetes.io/component",
                [
                    "autoscaler",
                    "controller",
                    "logging",
                    "networking",
                    "net-certmanager",
                    "observability",
                    "tracing",
                ],
            ),
        ]),
    });

    ValidatingWebhookConfiguration {
        metadata: cluster_meta(name, serving_labels(Some("webhook"))),
        webhooks: Some(vec![webhook]),
    }
});

pub static MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV: LazyLock<
    MutatingWebhookConfiguration,
> = LazyLock::new(|| {
    let name = "webhook.domainmapping.serving.knative.dev";
    MutatingWebhookConfiguration {
        metadata: cluster_meta(name, serving_labels(Some("domain-mapping"))),
        webhooks: Some(vec![mutating_webhook(
            name,
            vec![resource_rule(
                "serving.knative.dev",
                "v1beta1",
                "domainmappings",
                DEFAULTING,
            )],
        )]),
    }
});

pub static VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV:
    LazyLock<ValidatingWebhookConfiguration> = LazyLock::new(|| {
    let name = "validation.webhook.domainmapping.serving.knative.dev";
    ValidatingWebhookConfiguration {
        metadata: cluster_meta(name, serving_labels(Some("domain-mapping"))),
        webhooks: Some(vec![validating_webhook(
            name,
            vec![resource_rule(
                "serving.knative.dev",
                "v1beta1",
                "domainmappings",
                VALIDATING,
            )],
        )]),
    }
});

pub static MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_SERVING_KNATIVE_DEV: LazyLock<
    MutatingWebhookConfiguration,
> = LazyLock::new(|| {
    let name = "webhook.serving.knative.dev";
    MutatingWebhookConfiguration {
        metadata: cluster_meta(name, serving_labels(Some("webhook"))),
        webhooks: Some(vec![mutating_webhook(name, serving_rules(DEFAULTING))]),
    }
});

pub static VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_SERVING_KNATIVE_DEV: LazyLock<
    ValidatingWebhookConfiguration,
> = LazyLock::new(|| {
    let name = "validation.webhook.serving.knative.dev";
    ValidatingWebhookConfiguration {
        metadata: cluster_meta(name, serving_labels(Some("webhook"))),
        webhooks: Some(vec![validating_webhook(name, serving_rules(VALIDATING))]),
    }
});

/// Populated by the webhook at startup.
pub static SECRET_WEBHOOK_CERTS: LazyLock<Secret> = LazyLock::new(|| Secret {
    metadata: namespaced_meta(
        "webhook-certs",
        SERVING_NAMESPACE,
        serving_labels(Some("webhook")),
    ),
    ..Default::default()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_names_match_their_configurations() {
        for config in [
            &*VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV,
            &*VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
            &*VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_SERVING_KNATIVE_DEV,
        ] {
            let webhooks = config.webhooks.as_ref().unwrap();
            assert_eq!(webhooks.len(), 1);
            assert_eq!(Some(&webhooks[0].name), config.metadata.name.as_ref());
        }
        for config in [
            &*MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_DOMAINMAPPING_SERVING_KNATIVE_DEV,
            &*MUTATING_WEBHOOK_CONFIGURATION_WEBHOOK_SERVING_KNATIVE_DEV,
        ] {
            let webhooks = config.webhooks.as_ref().unwrap();
            assert_eq!(webhooks.len(), 1);
            assert_eq!(Some(&webhooks[0].name), config.metadata.name.as_ref());
        }
    }

    #[test]
    fn operations_keep_declared_order() {
        let webhooks = VALIDATING_WEBHOOK_CONFIGURATION_VALIDATION_WEBHOOK_SERVING_KNATIVE_DEV
            .webhooks
            .as_ref()
            .unwrap();
        let rule = &webhooks[0].rules.as_ref().unwrap()[0];
        assert_eq!(
            rule.operations.as_deref(),
            Some(&strings(["CREATE", "UPDATE", "DELETE"])[..])
        );
    }

    #[test]
    fn config_webhook_only_sees_serving_config_maps() {
        let webhooks = VALIDATING_WEBHOOK_CONFIGURATION_CONFIG_WEBHOOK_SERVING_KNATIVE_DEV
            .webhooks
            .as_ref()
            .unwrap();
        let expressions = webhooks[0]
            .object_selector
            .as_ref()
            .and_then(|s| s.match_expressions.as_ref())
            .unwrap();
        assert_eq!(expressions[0].values.as_deref(), Some(&strings(["knative-serving"])[..]));
    }

    #[test]
    fn certs_secret_starts_empty() {
        assert!(SECRET_WEBHOOK_CERTS.data.is_none());
        assert_eq!(
            SECRET_WEBHOOK_CERTS.metadata.namespace.as_deref(),
            Some(SERVING_NAMESPACE)
        );
    }
}
