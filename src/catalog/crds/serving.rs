use std::sync::LazyLock;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};

use super::podspec::{revision_spec, revision_template, traffic};
use super::schema::*;
use super::{column, crd, ready_columns, storage_version, Names, Scope};

const GROUP: &str = "serving.knative.dev";
const CATEGORIES: &[&str] = &["all", "knative", "serving"];

fn latest_revision_status() -> [(&'static str, JSONSchemaProps); 2] {
    [
        (
            "latestCreatedRevisionName",
            string().description(
                "LatestCreatedRevisionName is the last revision that was created from this Configuration. It might not be ready yet, for that use LatestReadyRevisionName.",
            ),
        ),
        (
            "latestReadyRevisionName",
            string().description(
                "LatestReadyRevisionName holds the name of the latest Revision stamped out from this Configuration that has had its \"Ready\" condition become \"True\".",
            ),
        ),
    ]
}

fn url_status() -> JSONSchemaProps {
    string().description(
        "URL holds the url that will distribute traffic over the provided traffic targets. It generally has the form http[s]://{route-name}.{route-namespace}.{cluster-level-suffix}",
    )
}

pub static CUSTOM_RESOURCE_DEFINITION_CONFIGURATIONS_SERVING_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([("template", revision_template())])
        .description(
            "ConfigurationSpec holds the desired state of the Configuration (from the client).",
        );

    let [created, ready] = latest_revision_status();
    let status = knative_status(
        "ConfigurationStatus communicates the observed state of the Configuration (from the controller).",
        [created, ready],
    );

    let mut columns = vec![
        column("LatestCreated", "string", ".status.latestCreatedRevisionName"),
        column("LatestReady", "string", ".status.latestReadyRevisionName"),
    ];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "Configuration",
            plural: "configurations",
            singular: "configuration",
            categories: CATEGORIES,
            short_names: &["config", "cfg"],
        },
        Scope::Namespaced,
        storage_version(
            "v1",
            root(
                "Configuration represents the \"floating HEAD\" of a linear history of Revisions. Users create new Revisions by updating the Configuration's spec. The \"latest created\" revision's name is available under status, as is the \"latest ready\" revision's name. See also: https://github.com/knative/serving/blob/main/docs/spec/overview.md#configuration",
                spec,
                status,
            ),
            columns,
        ),
        [("duck.knative.dev/podspecable", "true")],
        true,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_DOMAINMAPPINGS_SERVING_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "ref",
            object([
                (
                    "address",
                    string().description(
                        "Address points to a specific Address Name.",
                    ),
                ),
                ("apiVersion", string().description("API version of the referent.")),
                (
                    "group",
                    string().description(
                        "Group of the API, without the version of the group. This can be used as an alternative to the APIVersion, and then resolved using ResolveGroup. Note: This API is EXPERIMENTAL and might break anytime. For more details: https://github.com/knative/eventing/issues/5086",
                    ),
                ),
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
                (
                    "namespace",
                    string().description(
                        "Namespace of the referent. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/namespaces/ This is optional field, it gets defaulted to the object holding it if left out.",
                    ),
                ),
            ])
            .description(
                "Ref specifies which Kubernetes object should be used to serve requests for this domain.",
            )
            .required(["kind", "name"]),
        ),
        (
            "tls",
            object([(
                "secretName",
                string().description(
                    "SecretName is the name of the existing secret used to terminate TLS traffic.",
                ),
            )])
            .description(
                "TLS allows the DomainMapping to terminate TLS traffic with an existing secret.",
            )
            .required(["secretName"]),
        ),
    ])
    .description(
        "Spec is the desired state of the DomainMapping. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
    )
    .required(["ref"]);

    let status = knative_status(
        "Status is the current state of the DomainMapping. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
        [
            ("address", address()),
            (
                "url",
                string().description(
                    "URL is the URL of this DomainMapping.",
                ),
            ),
        ],
    );

    let mut columns = vec![column("URL", "string", ".status.url")];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "DomainMapping",
            plural: "domainmappings",
            singular: "domainmapping",
            categories: CATEGORIES,
            short_names: &["dm"],
        },
        Scope::Namespaced,
        storage_version(
            "v1beta1",
            root(
                "DomainMapping is a mapping from a custom hostname to an Addressable.",
                spec,
                status,
            ),
            columns,
        ),
        [],
        true,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_REVISIONS_SERVING_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let container_statuses = |description: &str| {
        array(
            object([
                ("imageDigest", string()),
                ("name", string()),
            ])
            .description(
                "ContainerStatus holds the information of container name and image digest value",
            ),
        )
        .description(description)
    };

    let status = knative_status(
        "RevisionStatus communicates the observed state of the Revision (from the controller).",
        [
            (
                "actualReplicas",
                int32().description(
                    "ActualReplicas reflects the amount of ready pods running this revision.",
                ),
            ),
            (
                "containerStatuses",
                container_statuses(
                    "ContainerStatuses is a slice of images present in .Spec.Container[*].Image to their respective digests and their container name. The digests are resolved during the creation of Revision. ContainerStatuses holds the container name and image digests for both serving and non serving containers. ref: http://bit.ly/image-digests",
                ),
            ),
            (
                "desiredReplicas",
                int32().description(
                    "DesiredReplicas reflects the desired amount of pods running this revision.",
                ),
            ),
            (
                "initContainerStatuses",
                container_statuses(
                    "InitContainerStatuses is a slice of images present in .Spec.InitContainer[*].Image to their respective digests and their container name. The digests are resolved during the creation of Revision. ContainerStatuses holds the container name and image digests for both serving and non serving containers. ref: http://bit.ly/image-digests",
                ),
            ),
            (
                "logUrl",
                string().description(
                    "LogURL specifies the generated logging url for this particular revision based on the revision url template specified in the controller's config.",
                ),
            ),
        ],
    );

    let mut columns = vec![
        column(
            "Config Name",
            "string",
            ".metadata.labels['serving\\.knative\\.dev/configuration']",
        ),
        column(
            "Generation",
            "string",
            ".metadata.labels['serving\\.knative\\.dev/configurationGeneration']",
        ),
    ];
    columns.extend(ready_columns());
    columns.push(column("Actual Replicas", "integer", ".status.actualReplicas"));
    columns.push(column("Desired Replicas", "integer", ".status.desiredReplicas"));

    crd(
        GROUP,
        Names {
            kind: "Revision",
            plural: "revisions",
            singular: "revision",
            categories: CATEGORIES,
            short_names: &["rev"],
        },
        Scope::Namespaced,
        storage_version(
            "v1",
            root(
                "Revision is an immutable snapshot of code and configuration.  A revision references a container image. Revisions are created by updates to a Configuration. \n See also: https://github.com/knative/serving/blob/main/docs/spec/overview.md#revision",
                revision_spec(
                    "RevisionSpec holds the desired state of the Revision (from the client).",
                ),
                status,
            ),
            columns,
        ),
        [],
        true,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_ROUTES_SERVING_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([(
        "traffic",
        traffic().description(
            "Traffic specifies how to distribute traffic over a collection of revisions and configurations.",
        ),
    )])
    .description("Spec holds the desired state of the Route (from the client).");

    let status = knative_status(
        "Status communicates the observed state of the Route (from the controller).",
        [
            ("address", address()),
            (
                "traffic",
                traffic().description(
                    "Traffic holds the configured traffic distribution. These entries will always contain RevisionName references. When ConfigurationName appears in the spec, this will hold the LatestReadyRevisionName that we last observed.",
                ),
            ),
            ("url", url_status()),
        ],
    );

    let mut columns = vec![column("URL", "string", ".status.url")];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "Route",
            plural: "routes",
            singular: "route",
            categories: CATEGORIES,
            short_names: &["rt"],
        },
        Scope::Namespaced,
        storage_version(
            "v1",
            root(
                "Route is responsible for configuring ingress over a collection of Revisions. Some of the Revisions a Route distributes traffic over may be specified by referencing the Configuration responsible for creating them; in these cases the Route is additionally responsible for monitoring the Configuration for \"latest ready revision\" changes, and smoothly rolling out latest revisions. See also: https://github.com/knative/serving/blob/main/docs/spec/overview.md#route",
                spec,
                status,
            ),
            columns,
        ),
        [("duck.knative.dev/addressable", "true")],
        true,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        ("template", revision_template()),
        (
            "traffic",
            traffic().description(
                "Traffic specifies how to distribute traffic over a collection of revisions and configurations.",
            ),
        ),
    ])
    .description(
        "ServiceSpec represents the configuration for the Service object. A Service's specification is the union of the specifications for a Route and Configuration.  The Service restricts what can be expressed in these fields, e.g. the Route must reference the provided Configuration; however, these limitations also enable friendlier defaulting, e.g. Route never needs a Configuration name, and may be defaulted to the appropriate \"run latest\" spec.",
    );

    let [created, ready] = latest_revision_status();
    let status = knative_status(
        "ServiceStatus represents the Status stanza of the Service resource.",
        [
            ("address", address()),
            created,
            ready,
            (
                "traffic",
                traffic().description(
                    "Traffic holds the configured traffic distribution. These entries will always contain RevisionName references. When ConfigurationName appears in the spec, this will hold the LatestReadyRevisionName that we last observed.",
                ),
            ),
            ("url", url_status()),
        ],
    );

    let mut columns = vec![
        column("URL", "string", ".status.url"),
        column("LatestCreated", "string", ".status.latestCreatedRevisionName"),
        column("LatestReady", "string", ".status.latestReadyRevisionName"),
    ];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "Service",
            plural: "services",
            singular: "service",
            categories: CATEGORIES,
            short_names: &["kservice", "ksvc"],
        },
        Scope::Namespaced,
        storage_version(
            "v1",
            root(
                "Service acts as a top-level container that manages a Route and Configuration which implement a network service. Service exists to provide a singular abstraction which can be access controlled, reasoned about, and which encapsulates software lifecycle decisions such as rollout policy and team resource ownership. Service acts only as an orchestrator of the underlying Routes and Configurations (much as a kubernetes Deployment orchestrates ReplicaSets), and its usage is optional but recommended. \n The Service's controller will track the statuses of its owned Configuration and Route, reflecting their statuses and conditions as its own. \n See also: https://github.com/knative/serving/blob/main/docs/spec/overview.md#service",
                spec,
                status,
            ),
            columns,
        ),
        [
            ("duck.knative.dev/addressable", "true"),
            ("duck.knative.dev/podspecable", "true"),
        ],
        true,
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSONSchemaPropsOrArray;

    fn schema_of(crd: &CustomResourceDefinition) -> &JSONSchemaProps {
        crd.spec.versions[0]
            .schema
            .as_ref()
            .and_then(|s| s.open_api_v3_schema.as_ref())
            .unwrap()
    }

    #[test]
    fn revision_spec_requires_containers() {
        let schema = schema_of(&CUSTOM_RESOURCE_DEFINITION_REVISIONS_SERVING_KNATIVE_DEV);
        let spec = &schema.properties.as_ref().unwrap()["spec"];
        assert_eq!(spec.required, Some(vec!["containers".to_string()]));
    }

    #[test]
    fn service_template_carries_the_revision_spec() {
        let schema = schema_of(&CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV);
        let template = &schema.properties.as_ref().unwrap()["spec"]
            .properties
            .as_ref()
            .unwrap()["template"];
        let containers = &template.properties.as_ref().unwrap()["spec"]
            .properties
            .as_ref()
            .unwrap()["containers"];
        let Some(JSONSchemaPropsOrArray::Schema(container)) = &containers.items else {
            panic!("containers must be an array of a single schema");
        };
        assert!(container
            .properties
            .as_ref()
            .unwrap()
            .contains_key("readinessProbe"));
    }

    #[test]
    fn service_is_addressable_and_podspecable() {
        let labels = CUSTOM_RESOURCE_DEFINITION_SERVICES_SERVING_KNATIVE_DEV
            .metadata
            .labels
            .as_ref()
            .unwrap();
        assert_eq!(labels["duck.knative.dev/addressable"], "true");
        assert_eq!(labels["duck.knative.dev/podspecable"], "true");
    }

    #[test]
    fn domain_mapping_is_served_at_v1beta1() {
        let version = &CUSTOM_RESOURCE_DEFINITION_DOMAINMAPPINGS_SERVING_KNATIVE_DEV
            .spec
            .versions[0];
        assert_eq!(version.name, "v1beta1");
        assert!(version.served && version.storage);
    }
}
