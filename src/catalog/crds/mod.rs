//! CustomResourceDefinitions installed by Knative Serving.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceColumnDefinition, CustomResourceConversion, CustomResourceDefinition,
    CustomResourceDefinitionNames, CustomResourceDefinitionSpec, CustomResourceDefinitionVersion,
    CustomResourceSubresourceStatus, CustomResourceSubresources, CustomResourceValidation,
    JSONSchemaProps, ServiceReference, WebhookClientConfig, WebhookConversion,
};

use super::meta::{cluster_meta, serving_labels, strings, with_labels, SERVING_NAMESPACE};

mod autoscaling;
mod caching;
mod networking;
mod podspec;
pub(crate) mod schema;
mod serving;

pub use autoscaling::*;
pub use caching::*;
pub use networking::*;
pub use serving::*;

struct Names<'a> {
    kind: &'a str,
    plural: &'a str,
    singular: &'a str,
    categories: &'a [&'a str],
    short_names: &'a [&'a str],
}

fn to_strings(values: &[&str]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|v| v.to_string()).collect())
    }
}

enum Scope {
    Namespaced,
    Cluster,
}

/// Builds a single-version CRD. `duck_labels` are the `duck.knative.dev/*` markers.
fn crd<const N: usize>(
    group: &str,
    names: Names<'_>,
    scope: Scope,
    version: CustomResourceDefinitionVersion,
    duck_labels: [(&str, &str); N],
    webhook_conversion: bool,
) -> CustomResourceDefinition {
    let labels = with_labels(
        with_labels(serving_labels(None), [("knative.dev/crd-install", "true")]),
        duck_labels,
    );

    CustomResourceDefinition {
        metadata: cluster_meta(&format!("{}.{group}", names.plural), labels),
        spec: CustomResourceDefinitionSpec {
            group: group.into(),
            names: CustomResourceDefinitionNames {
                kind: names.kind.into(),
                plural: names.plural.into(),
                singular: Some(names.singular.into()),
                categories: to_strings(names.categories),
                short_names: to_strings(names.short_names),
                list_kind: None,
            },
            scope: match scope {
                Scope::Namespaced => "Namespaced".into(),
                Scope::Cluster => "Cluster".into(),
            },
            versions: vec![version],
            conversion: webhook_conversion.then(|| CustomResourceConversion {
                strategy: "Webhook".into(),
                webhook: Some(WebhookConversion {
                    conversion_review_versions: strings(["v1", "v1beta1"]),
                    client_config: Some(WebhookClientConfig {
                        service: Some(ServiceReference {
                            name: "webhook".into(),
                            namespace: SERVING_NAMESPACE.into(),
                            path: None,
                            port: None,
                        }),
                        ..Default::default()
                    }),
                }),
            }),
            preserve_unknown_fields: None,
        },
        status: None,
    }
}

/// A served storage version with the status subresource enabled.
fn storage_version(
    name: &str,
    schema: JSONSchemaProps,
    columns: Vec<CustomResourceColumnDefinition>,
) -> CustomResourceDefinitionVersion {
    CustomResourceDefinitionVersion {
        name: name.into(),
        served: true,
        storage: true,
        subresources: Some(CustomResourceSubresources {
            status: Some(CustomResourceSubresourceStatus(serde_json::json!({}))),
            scale: None,
        }),
        schema: Some(CustomResourceValidation {
            open_api_v3_schema: Some(schema),
        }),
        additional_printer_columns: (!columns.is_empty()).then_some(columns),
        ..Default::default()
    }
}

fn column(name: &str, type_: &str, json_path: &str) -> CustomResourceColumnDefinition {
    CustomResourceColumnDefinition {
        name: name.into(),
        type_: type_.into(),
        json_path: json_path.into(),
        ..Default::default()
    }
}

fn ready_columns() -> [CustomResourceColumnDefinition; 2] {
    [
        column(
            "Ready",
            "string",
            ".status.conditions[?(@.type=='Ready')].status",
        ),
        column(
            "Reason",
            "string",
            ".status.conditions[?(@.type=='Ready')].reason",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{resources, KubernetesResource};

    fn all_crds() -> Vec<&'static CustomResourceDefinition> {
        resources()
            .iter()
            .filter_map(|r| match r {
                KubernetesResource::CustomResourceDefinition(crd) => Some(*crd),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn twelve_crds_are_installed() {
        assert_eq!(all_crds().len(), 12);
    }

    #[test]
    fn every_crd_has_exactly_one_storage_version() {
        for crd in all_crds() {
            let storage = crd.spec.versions.iter().filter(|v| v.storage).count();
            assert_eq!(storage, 1, "{:?}", crd.metadata.name);
        }
    }

    #[test]
    fn crd_names_are_plural_dot_group() {
        for crd in all_crds() {
            assert_eq!(
                crd.metadata.name.as_deref(),
                Some(format!("{}.{}", crd.spec.names.plural, crd.spec.group).as_str())
            );
        }
    }

    #[test]
    fn every_crd_is_marked_for_install() {
        for crd in all_crds() {
            let labels = crd.metadata.labels.as_ref().unwrap();
            assert_eq!(labels["knative.dev/crd-install"], "true");
        }
    }

    #[test]
    fn serving_group_crds_convert_through_the_webhook() {
        for crd in all_crds() {
            let converts = crd.spec.conversion.is_some();
            assert_eq!(
                converts,
                crd.spec.group == "serving.knative.dev",
                "{:?}",
                crd.metadata.name
            );
        }
    }

    #[test]
    fn every_version_has_a_schema_with_spec_and_status() {
        for crd in all_crds() {
            let schema = crd.spec.versions[0]
                .schema
                .as_ref()
                .and_then(|s| s.open_api_v3_schema.as_ref())
                .unwrap();
            let properties = schema.properties.as_ref().unwrap();
            assert!(properties.contains_key("spec"), "{:?}", crd.metadata.name);
            assert!(properties.contains_key("status"), "{:?}", crd.metadata.name);
        }
    }

    #[test]
    fn cluster_domain_claims_are_cluster_scoped() {
        assert_eq!(
            CUSTOM_RESOURCE_DEFINITION_CLUSTERDOMAINCLAIMS_NETWORKING_INTERNAL_KNATIVE_DEV
                .spec
                .scope,
            "Cluster"
        );
        assert_eq!(
            CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV.spec.scope,
            "Namespaced"
        );
    }
}
