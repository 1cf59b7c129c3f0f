use std::sync::LazyLock;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

use super::schema::*;
use super::{column, crd, storage_version, Names, Scope};

pub static CUSTOM_RESOURCE_DEFINITION_IMAGES_CACHING_INTERNAL_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "image",
            string().description(
                "Image is the name of the container image url to cache across the cluster.",
            ),
        ),
        (
            "imagePullSecrets",
            array(
                object([(
                    "name",
                    string().description(
                        "Name of the referent. This field is effectively required, but due to backwards compatibility is allowed to be empty. Instances of this type with an empty value here are almost certainly wrong. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
                    ),
                )])
                .description(
                    "LocalObjectReference contains enough information to let you locate the referenced object inside the same namespace.",
                )
                .map_type("atomic"),
            )
            .description(
                "ImagePullSecrets contains the names of the Kubernetes Secrets containing login information used by the Pods which will run this container.",
            ),
        ),
        (
            "serviceAccountName",
            string().description(
                "ServiceAccountName is the name of the Kubernetes ServiceAccount as which the Pods will run this container.  This is potentially used to authenticate the image pull if the service account has attached pull secrets.  For more information: https://kubernetes.io/docs/tasks/configure-pod-container/configure-service-account/#add-imagepullsecrets-to-a-service-account",
            ),
        ),
    ])
    .description("Spec holds the desired state of the Image (from the client).")
    .required(["image"]);

    let status = knative_status(
        "Status communicates the observed state of the Image (from the controller).",
        [],
    );

    crd(
        "caching.internal.knative.dev",
        Names {
            kind: "Image",
            plural: "images",
            singular: "image",
            categories: &["knative-internal", "caching"],
            short_names: &["img"],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "Image is a Knative abstraction that encapsulates the interface by which Knative components express a desire to have a particular image cached.",
                spec,
                status,
            ),
            vec![column("Image", "string", ".spec.image")],
        ),
        [],
        false,
    )
});
