//! Small builders for the OpenAPI v3 schemas embedded in the CRD records.

use std::collections::BTreeMap;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    JSONSchemaProps, JSONSchemaPropsOrArray, JSONSchemaPropsOrBool,
};

pub trait SchemaExt: Sized {
    fn description(self, description: &str) -> Self;
    fn required<const N: usize>(self, fields: [&str; N]) -> Self;
    fn format(self, format: &str) -> Self;
    fn preserve_unknown_fields(self) -> Self;
    fn list_type(self, list_type: &str) -> Self;
    fn map_type(self, map_type: &str) -> Self;
    fn pattern(self, pattern: &str) -> Self;
}

impl SchemaExt for JSONSchemaProps {
    fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    fn required<const N: usize>(mut self, fields: [&str; N]) -> Self {
        self.required = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    fn format(mut self, format: &str) -> Self {
        self.format = Some(format.into());
        self
    }

    fn preserve_unknown_fields(mut self) -> Self {
        self.x_kubernetes_preserve_unknown_fields = Some(true);
        self
    }

    fn list_type(mut self, list_type: &str) -> Self {
        self.x_kubernetes_list_type = Some(list_type.into());
        self
    }

    fn map_type(mut self, map_type: &str) -> Self {
        self.x_kubernetes_map_type = Some(map_type.into());
        self
    }

    fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

fn typed(type_: &str) -> JSONSchemaProps {
    JSONSchemaProps {
        type_: Some(type_.into()),
        ..Default::default()
    }
}

pub fn string() -> JSONSchemaProps {
    typed("string")
}

pub fn boolean() -> JSONSchemaProps {
    typed("boolean")
}

pub fn int32() -> JSONSchemaProps {
    typed("integer").format("int32")
}

pub fn int64() -> JSONSchemaProps {
    typed("integer").format("int64")
}

pub fn int_or_string() -> JSONSchemaProps {
    JSONSchemaProps {
        x_kubernetes_int_or_string: Some(true),
        any_of: Some(vec![typed("integer"), typed("string")]),
        ..Default::default()
    }
}

pub fn object<const N: usize>(properties: [(&str, JSONSchemaProps); N]) -> JSONSchemaProps {
    JSONSchemaProps {
        type_: Some("object".into()),
        properties: Some(
            properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    }
}

/// An object the API server stores verbatim.
pub fn open_object() -> JSONSchemaProps {
    typed("object").preserve_unknown_fields()
}

/// A field that only exists when the named Knative feature flag is enabled.
pub fn feature_flagged(flag: &str) -> JSONSchemaProps {
    open_object().description(&format!(
        "This is accessible behind a feature flag - {flag}"
    ))
}

pub fn array(items: JSONSchemaProps) -> JSONSchemaProps {
    JSONSchemaProps {
        type_: Some("array".into()),
        items: Some(JSONSchemaPropsOrArray::Schema(Box::new(items))),
        ..Default::default()
    }
}

/// An object whose values all share one schema.
pub fn map_of(values: JSONSchemaProps) -> JSONSchemaProps {
    JSONSchemaProps {
        type_: Some("object".into()),
        additional_properties: Some(JSONSchemaPropsOrBool::Schema(Box::new(values))),
        ..Default::default()
    }
}

pub fn string_map() -> JSONSchemaProps {
    map_of(string())
}

pub fn quantity_map() -> JSONSchemaProps {
    map_of(int_or_string().pattern(QUANTITY_PATTERN))
}

const QUANTITY_PATTERN: &str =
    r"^(\+|-)?(([0-9]+(\.[0-9]*)?)|(\.[0-9]+))(([KMGTPE]i)|[numkMGTPE]|([eE](\+|-)?(([0-9]+(\.[0-9]*)?)|(\.[0-9]+))))?$";

/// The `Condition` shape shared by every Knative status.
pub fn conditions() -> JSONSchemaProps {
    array(
        object([
            (
                "lastTransitionTime",
                string().description(
                    "LastTransitionTime is the last time the condition transitioned from one status to another. We use VolatileTime in place of metav1.Time to exclude this from creating equality.Semantic differences (all other things held constant).",
                ),
            ),
            (
                "message",
                string().description(
                    "A human readable message indicating details about the transition.",
                ),
            ),
            (
                "reason",
                string().description("The reason for the condition's last transition."),
            ),
            (
                "severity",
                string().description(
                    "Severity with which to treat failures of this type of condition. When this is not specified, it defaults to Error.",
                ),
            ),
            (
                "status",
                string().description("Status of the condition, one of True, False, Unknown."),
            ),
            (
                "type",
                string().description("Type of condition."),
            ),
        ])
        .description(
            "Condition defines a readiness condition for a Knative resource. See: https://github.com/kubernetes/community/blob/master/contributors/devel/sig-architecture/api-conventions.md#typical-status-properties",
        )
        .required(["status", "type"]),
    )
    .description("Conditions the latest available observations of a resource's current state.")
}

/// Status fields every Knative resource carries, merged with the kind specific ones.
pub fn knative_status<const N: usize>(
    description: &str,
    extra: [(&str, JSONSchemaProps); N],
) -> JSONSchemaProps {
    let mut status = object([
        (
            "annotations",
            string_map().description(
                "Annotations is additional Status fields for the Resource to save some additional State as well as convey more information to the user. This is roughly akin to Annotations on any k8s resource, just the reconciler conveying richer information outwards.",
            ),
        ),
        ("conditions", conditions()),
        (
            "observedGeneration",
            int64().description(
                "ObservedGeneration is the 'Generation' of the Service that was last processed by the controller.",
            ),
        ),
    ])
    .description(description);
    if let Some(properties) = status.properties.as_mut() {
        properties.extend(extra.into_iter().map(|(k, v)| (k.to_string(), v)));
    }
    status
}

/// Root schema of a CRD version: apiVersion, kind, metadata, spec and status.
pub fn root(description: &str, spec: JSONSchemaProps, status: JSONSchemaProps) -> JSONSchemaProps {
    object([
        (
            "apiVersion",
            string().description(
                "APIVersion defines the versioned schema of this representation of an object. Servers should convert recognized schemas to the latest internal value, and may reject unrecognized values. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#resources",
            ),
        ),
        (
            "kind",
            string().description(
                "Kind is a string value representing the REST resource this object represents. Servers may infer this from the endpoint the client submits requests to. Cannot be updated. In CamelCase. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds",
            ),
        ),
        ("metadata", typed("object")),
        ("spec", spec),
        ("status", status),
    ])
    .description(description)
}

/// Addressable status block (`status.address`).
pub fn address() -> JSONSchemaProps {
    object([
        (
            "CACerts",
            string().description(
                "CACerts is the Certification Authority (CA) certificates in PEM format that the source trusts when sending events to the sink.",
            ),
        ),
        (
            "audience",
            string().description(
                "Audience is the OIDC audience for this address.",
            ),
        ),
        (
            "name",
            string().description("Name is the name of the address."),
        ),
        ("url", string()),
    ])
    .description("Address holds the information needed for a Route to be the target of an event.")
}

/// Reference to another object by `apiVersion`, `kind` and `name`.
pub fn object_reference() -> JSONSchemaProps {
    object([
        ("apiVersion", string().description("API version of the referent.")),
        (
            "kind",
            string().description(
                "Kind of the referent. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds",
            ),
        ),
        (
            "name",
            string().description(
                "Name of the referent. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
            ),
        ),
    ])
    .required(["kind", "name"])
    .map_type("atomic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knative_status_merges_extra_fields() {
        let status = knative_status("status", [("url", string())]);
        let properties = status.properties.unwrap();
        assert!(properties.contains_key("url"));
        assert!(properties.contains_key("conditions"));
        assert!(properties.contains_key("observedGeneration"));
    }

    #[test]
    fn int_or_string_serializes_kubernetes_extension() {
        let value = serde_json::to_value(int_or_string()).unwrap();
        assert_eq!(value["x-kubernetes-int-or-string"], true);
    }

    #[test]
    fn conditions_require_type_and_status() {
        let schema = conditions();
        let Some(JSONSchemaPropsOrArray::Schema(item)) = schema.items else {
            panic!("conditions must be a single-schema array");
        };
        assert_eq!(
            item.required,
            Some(vec!["status".to_string(), "type".to_string()])
        );
    }
}
