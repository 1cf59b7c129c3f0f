use std::sync::LazyLock;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};

use super::schema::*;
use super::{column, crd, ready_columns, storage_version, Names, Scope};

const GROUP: &str = "networking.internal.knative.dev";

pub static CUSTOM_RESOURCE_DEFINITION_CERTIFICATES_NETWORKING_INTERNAL_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "dnsNames",
            array(string()).description(
                "DNSNames is a list of DNS names the Certificate could support. The wildcard format of DNSNames (e.g. *.default.example.com) is supported.",
            ),
        ),
        (
            "domain",
            string().description(
                "Domain is the top level domain of the values for DNSNames.",
            ),
        ),
        (
            "secretName",
            string().description(
                "SecretName is the name of the secret resource to store the SSL certificate in.",
            ),
        ),
    ])
    .description(
        "Spec is the desired state of the Certificate. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
    )
    .required(["dnsNames", "secretName"]);

    let status = knative_status(
        "Status is the current state of the Certificate. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
        [
            (
                "http01Challenges",
                array(
                    object([
                        (
                            "serviceName",
                            string().description(
                                "ServiceName is the name of the service to serve HTTP01 challenge requests.",
                            ),
                        ),
                        (
                            "serviceNamespace",
                            string().description(
                                "ServiceNamespace is the namespace of the service to serve HTTP01 challenge requests.",
                            ),
                        ),
                        (
                            "servicePort",
                            int_or_string().description(
                                "ServicePort is the port of the service to serve HTTP01 challenge requests.",
                            ),
                        ),
                        (
                            "url",
                            string().description(
                                "URL is the URL that the HTTP01 challenge is expected to serve on.",
                            ),
                        ),
                    ])
                    .description(
                        "HTTP01Challenge defines the status of a HTTP01 challenge that a certificate needs to fulfill.",
                    ),
                )
                .description(
                    "HTTP01Challenges is a list of HTTP01 challenges that need to be fulfilled in order to get the TLS certificate..",
                ),
            ),
            (
                "notAfter",
                string()
                    .format("date-time")
                    .description(
                        "The expiration time of the TLS certificate stored in the secret named by this resource in spec.secretName.",
                    ),
            ),
        ],
    );

    crd(
        GROUP,
        Names {
            kind: "Certificate",
            plural: "certificates",
            singular: "certificate",
            categories: &["knative-internal", "networking"],
            short_names: &["kcert"],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "Certificate is responsible for provisioning a SSL certificate for the given hosts. It is a Knative abstraction for various SSL certificate provisioning solutions (such as cert-manager or self-signed SSL certificate).",
                spec,
                status,
            ),
            ready_columns().into(),
        ),
        [],
        false,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_CLUSTERDOMAINCLAIMS_NETWORKING_INTERNAL_KNATIVE_DEV:
    LazyLock<CustomResourceDefinition> = LazyLock::new(|| {
    let spec = object([(
        "namespace",
        string().description(
            "Namespace is the namespace which is allowed to create a DomainMapping using this ClusterDomainClaim's name.",
        ),
    )])
    .description(
        "Spec is the desired state of the ClusterDomainClaim. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
    )
    .required(["namespace"]);

    crd(
        GROUP,
        Names {
            kind: "ClusterDomainClaim",
            plural: "clusterdomainclaims",
            singular: "clusterdomainclaim",
            categories: &["knative-internal", "networking"],
            short_names: &["cdc"],
        },
        Scope::Cluster,
        storage_version(
            "v1alpha1",
            root(
                "ClusterDomainClaim is a cluster-wide reservation for a particular domain name.",
                spec,
                open_object(),
            ),
            Vec::new(),
        ),
        [],
        false,
    )
});

fn header_map(description: &str) -> JSONSchemaProps {
    string_map().description(description)
}

fn ingress_splits() -> JSONSchemaProps {
    array(
        object([
            (
                "appendHeaders",
                header_map(
                    "AppendHeaders allow specifying additional HTTP headers to add before forwarding a request to the destination service. \n NOTE: This differs from K8s Ingress which doesn't allow header appending.",
                ),
            ),
            (
                "percent",
                int32().description(
                    "Specifies the split percentage, a number between 0 and 100.  If only one split is specified, we default to 100. \n NOTE: This differs from K8s Ingress to allow percentage split.",
                ),
            ),
            (
                "serviceName",
                string().description("ServiceName is the name of the referenced service."),
            ),
            (
                "serviceNamespace",
                string().description(
                    "ServiceNamespace is the namespace of the referenced service. \n NOTE: This differs from K8s Ingress to allow routing to different namespaces.",
                ),
            ),
            (
                "servicePort",
                int_or_string().description("ServicePort is the port of the referenced service."),
            ),
        ])
        .description(
            "IngressBackendSplit describes all endpoints for a given service and port.",
        )
        .required(["serviceName", "serviceNamespace", "servicePort"]),
    )
    .description(
        "Splits defines the referenced service endpoints to which the traffic will be forwarded to.",
    )
}

fn ingress_rules() -> JSONSchemaProps {
    let path = object([
        (
            "appendHeaders",
            header_map(
                "AppendHeaders allow specifying additional HTTP headers to add before forwarding a request to the destination service. \n NOTE: This differs from K8s Ingress which doesn't allow header appending.",
            ),
        ),
        (
            "headers",
            map_of(
                object([(
                    "exact",
                    string().description("Exact matches the header exactly"),
                )])
                .description(
                    "HeaderMatch represents a matching value of Headers in HTTPIngressPath. Currently, only the exact matching is supported.",
                )
                .required(["exact"]),
            )
            .description(
                "Headers defines header matching rules which is a map from a header name to HeaderMatch which specify a matching condition. When a request matched with all the header matching rules, the request is routed by the corresponding ingress rule. If it is empty, the headers are not used for matching",
            ),
        ),
        (
            "path",
            string().description(
                "Path represents a literal prefix to which this rule should apply. Currently it can contain characters disallowed from the conventional \"path\" part of a URL as defined by RFC 3986. Paths must begin with a '/'. If unspecified, the path defaults to a catch all sending traffic to the backend.",
            ),
        ),
        (
            "rewriteHost",
            string().description(
                "RewriteHost rewrites the incoming request's host header. \n This field is currently experimental and not supported by all Ingress implementations.",
            ),
        ),
        ("splits", ingress_splits()),
    ])
    .description(
        "HTTPIngressPath associates a path regex with a backend. Incoming URLs matching the path are forwarded to the backend.",
    )
    .required(["splits"]);

    array(
        object([
            (
                "hosts",
                array(string()).description(
                    "Host is the fully qualified domain name of a network host, as defined by RFC 3986. Note the following deviations from the \"host\" part of the URI as defined in the RFC: 1. IPs are not allowed. Currently a rule value can only apply to the IP in the Spec of the parent . 2. The `:` delimiter is not respected because ports are not allowed. Currently the port of an Ingress is implicitly :80 for http and :443 for https. Both these may change in the future. If the host is unspecified, the Ingress routes all traffic based on the specified IngressRuleValue. If multiple matching Hosts were provided, the first rule will take precedent.",
                ),
            ),
            (
                "http",
                object([(
                    "paths",
                    array(path).description(
                        "A collection of paths that map requests to backends. \n If they are multiple matching paths, the first match takes precedence.",
                    ),
                )])
                .description(
                    "HTTP represents a rule to apply against incoming requests. If the rule is satisfied, the request is routed to the specified backend.",
                )
                .required(["paths"]),
            ),
            (
                "visibility",
                string().description(
                    "Visibility signifies whether this rule should `ClusterLocal`. If it's not specified then it defaults to `ExternalIP`.",
                ),
            ),
        ])
        .description(
            "IngressRule represents the rules mapping the paths under a specified host to the related backend services. Incoming requests are first evaluated for a host match, then routed to the backend associated with the matching IngressRuleValue.",
        ),
    )
    .description("A list of host rules used to configure the Ingress.")
}

fn load_balancer_status(description: &str) -> JSONSchemaProps {
    object([(
        "ingress",
        array(
            object([
                (
                    "domain",
                    string().description(
                        "Domain is set for load-balancer ingress points that are DNS based.",
                    ),
                ),
                (
                    "domainInternal",
                    string().description(
                        "DomainInternal is set if there is a cluster-local DNS name to access the Ingress. \n NOTE: This differs from K8s Ingress, since we also desire to have a cluster-local DNS name to allow routing in case of not having a mesh.",
                    ),
                ),
                (
                    "ip",
                    string().description(
                        "IP is set for load-balancer ingress points that are IP based.",
                    ),
                ),
                (
                    "meshOnly",
                    boolean().description(
                        "MeshOnly is set if the Ingress is only load-balanced through a Service mesh.",
                    ),
                ),
            ])
            .description(
                "LoadBalancerIngressStatus represents the status of a load-balancer ingress point: traffic intended for the service should be sent to an ingress point.",
            ),
        )
        .description(
            "Ingress is a list containing ingress points for the load-balancer. Traffic intended for the service should be sent to these ingress points.",
        ),
    )])
    .description(description)
}

pub static CUSTOM_RESOURCE_DEFINITION_INGRESSES_NETWORKING_INTERNAL_KNATIVE_DEV: LazyLock<
    CustomResourceDefinition,
> = LazyLock::new(|| {
    let spec = object([
        (
            "httpOption",
            string().description(
                "HTTPOption is the option of HTTP. It has the following two values: `HTTPOptionEnabled`, `HTTPOptionRedirected`",
            ),
        ),
        ("rules", ingress_rules()),
        (
            "tls",
            array(
                object([
                    (
                        "hosts",
                        array(string()).description(
                            "Hosts is a list of hosts included in the TLS certificate. The values in this list must match the name/s used in the TLS Secret. Defaults to the wildcard host setting for the loadbalancer controller fulfilling this Ingress, if left unspecified.",
                        ),
                    ),
                    (
                        "secretName",
                        string().description(
                            "SecretName is the name of the secret used to terminate SSL traffic.",
                        ),
                    ),
                    (
                        "secretNamespace",
                        string().description(
                            "SecretNamespace is the namespace of the secret used to terminate SSL traffic. If not set the namespace should be assumed to be the same as the Ingress. If set the secret should have the same namespace as the Ingress otherwise the behaviour is undefined and not supported.",
                        ),
                    ),
                ])
                .description(
                    "IngressTLS describes the transport layer security associated with an Ingress.",
                ),
            )
            .description(
                "TLS configuration. Currently Ingress only supports a single TLS port: 443. If multiple members of this list specify different hosts, they will be multiplexed on the same port according to the hostname specified through the SNI TLS extension, if the ingress controller fulfilling the ingress supports SNI.",
            ),
        ),
    ])
    .description(
        "Spec is the desired state of the Ingress. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
    );

    let status = knative_status(
        "Status is the current state of the Ingress. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
        [
            (
                "privateLoadBalancer",
                load_balancer_status(
                    "PrivateLoadBalancer contains the current status of the load-balancer.",
                ),
            ),
            (
                "publicLoadBalancer",
                load_balancer_status(
                    "PublicLoadBalancer contains the current status of the load-balancer.",
                ),
            ),
        ],
    );

    crd(
        GROUP,
        Names {
            kind: "Ingress",
            plural: "ingresses",
            singular: "ingress",
            categories: &["knative-internal", "networking"],
            short_names: &["kingress", "king"],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "Ingress is a collection of rules that allow inbound connections to reach the endpoints defined by a backend. An Ingress can be configured to give services externally-reachable URLs, load balance traffic, offer name based virtual hosting, etc. \n This is heavily based on K8s Ingress https://godoc.org/k8s.io/api/networking/v1beta1#Ingress which some highlighted modifications.",
                spec,
                status,
            ),
            ready_columns().into(),
        ),
        [],
        false,
    )
});

pub static CUSTOM_RESOURCE_DEFINITION_SERVERLESSSERVICES_NETWORKING_INTERNAL_KNATIVE_DEV:
    LazyLock<CustomResourceDefinition> = LazyLock::new(|| {
    let spec = object([
        (
            "mode",
            string().description(
                "Mode describes the mode of operation of the ServerlessService.",
            ),
        ),
        (
            "numActivators",
            int32().description(
                "NumActivators contains number of Activators that this revision should be assigned. 0 means assign all.",
            ),
        ),
        (
            "objectRef",
            object_reference().description(
                "ObjectRef defines the resource that this ServerlessService is responsible for making \"serverless\".",
            ),
        ),
        (
            "protocolType",
            string().description(
                "The application-layer protocol. Matches `RevisionProtocolType` set on the owning pa/revision. serving imports networking, so just use string.",
            ),
        ),
    ])
    .description(
        "Spec is the desired state of the ServerlessService. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
    )
    .required(["objectRef", "protocolType"]);

    let status = knative_status(
        "Status is the current state of the ServerlessService. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#spec-and-status",
        [
            (
                "privateServiceName",
                string().description(
                    "PrivateServiceName holds the name of a core K8s Service resource that load balances over the user service pods backing this Revision.",
                ),
            ),
            (
                "serviceName",
                string().description(
                    "ServiceName holds the name of a core K8s Service resource that load balances over the pods backing this Revision (activator or revision).",
                ),
            ),
        ],
    );

    let mut columns = vec![
        column("Mode", "string", ".spec.mode"),
        column("Activators", "integer", ".spec.numActivators"),
        column("ServiceName", "string", ".status.serviceName"),
        column("PrivateServiceName", "string", ".status.privateServiceName"),
    ];
    columns.extend(ready_columns());

    crd(
        GROUP,
        Names {
            kind: "ServerlessService",
            plural: "serverlessservices",
            singular: "serverlessservice",
            categories: &["knative-internal", "networking"],
            short_names: &["sks"],
        },
        Scope::Namespaced,
        storage_version(
            "v1alpha1",
            root(
                "ServerlessService is a proxy for the K8s service objects containing the endpoints for the revision, whether those are endpoints of the activator or revision pods. See: https://knative.page.link/naxz for details.",
                spec,
                status,
            ),
            columns,
        ),
        [],
        false,
    )
});
