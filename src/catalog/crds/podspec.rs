//! The Knative subset of the Kubernetes PodSpec, shared by Configuration, Revision and Service.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSONSchemaProps;

use super::schema::*;

fn key_selector(kind: &str) -> JSONSchemaProps {
    object([
        (
            "key",
            string().description(&format!(
                "The key of the {kind} to select from.  Must be a valid secret key."
            )),
        ),
        (
            "name",
            string().description(
                "Name of the referent. This field is effectively required, but due to backwards compatibility is allowed to be empty. Instances of this type with an empty value here are almost certainly wrong. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
            ),
        ),
        (
            "optional",
            boolean().description(&format!(
                "Specify whether the {kind} or its key must be defined"
            )),
        ),
    ])
    .required(["key"])
    .map_type("atomic")
}

fn env() -> JSONSchemaProps {
    array(
        object([
            (
                "name",
                string().description("Name of the environment variable. Must be a C_IDENTIFIER."),
            ),
            (
                "value",
                string().description(
                    "Variable references $(VAR_NAME) are expanded using the previously defined environment variables in the container and any service environment variables. If a variable cannot be resolved, the reference in the input string will be unchanged. Double $$ are reduced to a single $, which allows for escaping the $(VAR_NAME) syntax: i.e. \"$$(VAR_NAME)\" will produce the string literal \"$(VAR_NAME)\". Escaped references will never be expanded, regardless of whether the variable exists or not. Defaults to \"\".",
                ),
            ),
            (
                "valueFrom",
                object([
                    (
                        "configMapKeyRef",
                        key_selector("ConfigMap").description("Selects a key of a ConfigMap."),
                    ),
                    (
                        "fieldRef",
                        feature_flagged("kubernetes.podspec-fieldref"),
                    ),
                    (
                        "resourceFieldRef",
                        feature_flagged("kubernetes.podspec-fieldref"),
                    ),
                    (
                        "secretKeyRef",
                        key_selector("secret").description(
                            "Selects a key of a secret in the pod's namespace",
                        ),
                    ),
                ])
                .description(
                    "Source for the environment variable's value. Cannot be used if value is not empty.",
                ),
            ),
        ])
        .description("EnvVar represents an environment variable present in a Container.")
        .required(["name"]),
    )
    .description("List of environment variables to set in the container. Cannot be updated.")
}

fn env_from() -> JSONSchemaProps {
    let source = |kind: &str| {
        object([
            (
                "name",
                string().description(
                    "Name of the referent. This field is effectively required, but due to backwards compatibility is allowed to be empty. Instances of this type with an empty value here are almost certainly wrong. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
                ),
            ),
            (
                "optional",
                boolean().description(&format!("Specify whether the {kind} must be defined")),
            ),
        ])
        .description(&format!("The {kind} to select from"))
        .map_type("atomic")
    };

    array(
        object([
            ("configMapRef", source("ConfigMap")),
            (
                "prefix",
                string().description(
                    "An optional identifier to prepend to each key in the ConfigMap. Must be a C_IDENTIFIER.",
                ),
            ),
            ("secretRef", source("Secret")),
        ])
        .description("EnvFromSource represents the source of a set of ConfigMaps"),
    )
    .description(
        "List of sources to populate environment variables in the container. The keys defined within a source must be a C_IDENTIFIER. All invalid keys will be reported as an event when the container is starting. When a key exists in multiple sources, the value associated with the last source will take precedence. Values defined by an Env with a duplicate key will take precedence. Cannot be updated.",
    )
}

fn probe(description: &str) -> JSONSchemaProps {
    object([
        (
            "exec",
            object([(
                "command",
                array(string()).description(
                    "Command is the command line to execute inside the container, the working directory for the command  is root ('/') in the container's filesystem. The command is simply exec'd, it is not run inside a shell, so traditional shell instructions ('|', etc) won't work. To use a shell, you need to explicitly call out to that shell. Exit status of 0 is treated as live/healthy and non-zero is unhealthy.",
                ),
            )])
            .description("Exec specifies the action to take."),
        ),
        (
            "failureThreshold",
            int32().description(
                "Minimum consecutive failures for the probe to be considered failed after having succeeded. Defaults to 3. Minimum value is 1.",
            ),
        ),
        (
            "grpc",
            object([
                (
                    "port",
                    int32().description(
                        "Port number of the gRPC service. Number must be in the range 1 to 65535.",
                    ),
                ),
                (
                    "service",
                    string().description(
                        "Service is the name of the service to place in the gRPC HealthCheckRequest (see https://github.com/grpc/grpc/blob/master/doc/health-checking.md). \n If this is not specified, the default behavior is defined by gRPC.",
                    ),
                ),
            ])
            .description("GRPC specifies an action involving a GRPC port."),
        ),
        (
            "httpGet",
            object([
                (
                    "host",
                    string().description(
                        "Host name to connect to, defaults to the pod IP. You probably want to set \"Host\" in httpHeaders instead.",
                    ),
                ),
                (
                    "httpHeaders",
                    array(
                        object([
                            (
                                "name",
                                string().description(
                                    "The header field name. This will be canonicalized upon output, so case-variant names will be understood as the same header.",
                                ),
                            ),
                            ("value", string().description("The header field value")),
                        ])
                        .description(
                            "HTTPHeader describes a custom header to be used in HTTP probes",
                        )
                        .required(["name", "value"]),
                    )
                    .description(
                        "Custom headers to set in the request. HTTP allows repeated headers.",
                    ),
                ),
                ("path", string().description("Path to access on the HTTP server.")),
                (
                    "port",
                    int_or_string().description(
                        "Name or number of the port to access on the container. Number must be in the range 1 to 65535. Name must be an IANA_SVC_NAME.",
                    ),
                ),
                (
                    "scheme",
                    string().description(
                        "Scheme to use for connecting to the host. Defaults to HTTP.",
                    ),
                ),
            ])
            .description("HTTPGet specifies the http request to perform."),
        ),
        (
            "initialDelaySeconds",
            int32().description(
                "Number of seconds after the container has started before liveness probes are initiated. More info: https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle#container-probes",
            ),
        ),
        (
            "periodSeconds",
            int32().description(
                "How often (in seconds) to perform the probe.",
            ),
        ),
        (
            "successThreshold",
            int32().description(
                "Minimum consecutive successes for the probe to be considered successful after having failed. Defaults to 1. Must be 1 for liveness and startup. Minimum value is 1.",
            ),
        ),
        (
            "tcpSocket",
            object([
                (
                    "host",
                    string().description(
                        "Optional: Host name to connect to, defaults to the pod IP.",
                    ),
                ),
                (
                    "port",
                    int_or_string().description(
                        "Number or name of the port to access on the container. Number must be in the range 1 to 65535. Name must be an IANA_SVC_NAME.",
                    ),
                ),
            ])
            .description("TCPSocket specifies an action involving a TCP port."),
        ),
        (
            "timeoutSeconds",
            int32().description(
                "Number of seconds after which the probe times out. Defaults to 1 second. Minimum value is 1. More info: https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle#container-probes",
            ),
        ),
    ])
    .description(description)
}

fn security_context() -> JSONSchemaProps {
    object([
        (
            "allowPrivilegeEscalation",
            boolean().description(
                "AllowPrivilegeEscalation controls whether a process can gain more privileges than its parent process. This bool directly controls if the no_new_privs flag will be set on the container process. AllowPrivilegeEscalation is true always when the container is: 1) run as Privileged 2) has CAP_SYS_ADMIN Note that this field cannot be set when spec.os.name is windows.",
            ),
        ),
        (
            "capabilities",
            object([
                (
                    "add",
                    array(string()).description(
                        "This is accessible behind a feature flag - kubernetes.containerspec-addcapabilities",
                    ),
                ),
                ("drop", array(string()).description("Removed capabilities")),
            ])
            .description(
                "The capabilities to add/drop when running containers. Defaults to the default set of capabilities granted by the container runtime. Note that this field cannot be set when spec.os.name is windows.",
            ),
        ),
        (
            "readOnlyRootFilesystem",
            boolean().description(
                "Whether this container has a read-only root filesystem. Default is false. Note that this field cannot be set when spec.os.name is windows.",
            ),
        ),
        (
            "runAsGroup",
            int64().description(
                "The GID to run the entrypoint of the container process. Uses runtime default if unset. May also be set in PodSecurityContext.  If set in both SecurityContext and PodSecurityContext, the value specified in SecurityContext takes precedence. Note that this field cannot be set when spec.os.name is windows.",
            ),
        ),
        (
            "runAsNonRoot",
            boolean().description(
                "Indicates that the container must run as a non-root user. If true, the Kubelet will validate the image at runtime to ensure that it does not run as UID 0 (root) and fail to start the container if it does. If unset or false, no such validation will be performed. May also be set in PodSecurityContext.  If set in both SecurityContext and PodSecurityContext, the value specified in SecurityContext takes precedence.",
            ),
        ),
        (
            "runAsUser",
            int64().description(
                "The UID to run the entrypoint of the container process. Defaults to user specified in image metadata if unspecified. May also be set in PodSecurityContext.  If set in both SecurityContext and PodSecurityContext, the value specified in SecurityContext takes precedence. Note that this field cannot be set when spec.os.name is windows.",
            ),
        ),
        (
            "seccompProfile",
            object([
                (
                    "localhostProfile",
                    string().description(
                        "localhostProfile indicates a profile defined in a file on the node should be used. The profile must be preconfigured on the node to work. Must be a descending path, relative to the kubelet's configured seccomp profile location. Must be set if type is \"Localhost\". Must NOT be set for any other type.",
                    ),
                ),
                (
                    "type",
                    string().description(
                        "type indicates which kind of seccomp profile will be applied. Valid options are: \n Localhost - a profile defined in a file on the node should be used. RuntimeDefault - the container runtime default profile should be used. Unconfined - no profile should be applied.",
                    ),
                ),
            ])
            .description(
                "The seccomp options to use by this container. If seccomp options are provided at both the pod & container level, the container options override the pod options. Note that this field cannot be set when spec.os.name is windows.",
            )
            .required(["type"]),
        ),
    ])
    .description(
        "SecurityContext defines the security options the container should be run with. If set, the fields of SecurityContext override the equivalent fields of PodSecurityContext. More info: https://kubernetes.io/docs/tasks/configure-pod-container/security-context/",
    )
}

fn container(description: &str) -> JSONSchemaProps {
    object([
        (
            "args",
            array(string()).description(
                "Arguments to the entrypoint. The container image's CMD is used if this is not provided. Variable references $(VAR_NAME) are expanded using the container's environment. If a variable cannot be resolved, the reference in the input string will be unchanged. Cannot be updated. More info: https://kubernetes.io/docs/tasks/inject-data-application/define-command-argument-container/#running-a-command-in-a-shell",
            ),
        ),
        (
            "command",
            array(string()).description(
                "Entrypoint array. Not executed within a shell. The container image's ENTRYPOINT is used if this is not provided. Variable references $(VAR_NAME) are expanded using the container's environment. Cannot be updated. More info: https://kubernetes.io/docs/tasks/inject-data-application/define-command-argument-container/#running-a-command-in-a-shell",
            ),
        ),
        ("env", env()),
        ("envFrom", env_from()),
        (
            "image",
            string().description(
                "Container image name. More info: https://kubernetes.io/docs/concepts/containers/images This field is optional to allow higher level config management to default or override container images in workload controllers like Deployments and StatefulSets.",
            ),
        ),
        (
            "imagePullPolicy",
            string().description(
                "Image pull policy. One of Always, Never, IfNotPresent. Defaults to Always if :latest tag is specified, or IfNotPresent otherwise. Cannot be updated. More info: https://kubernetes.io/docs/concepts/containers/images#updating-images",
            ),
        ),
        (
            "livenessProbe",
            probe(
                "Periodic probe of container liveness. Container will be restarted if the probe fails. Cannot be updated. More info: https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle#container-probes",
            ),
        ),
        (
            "name",
            string().description(
                "Name of the container specified as a DNS_LABEL. Each container in a pod must have a unique name (DNS_LABEL). Cannot be updated.",
            ),
        ),
        (
            "ports",
            array(
                object([
                    (
                        "containerPort",
                        int32().description(
                            "Number of port to expose on the pod's IP address. This must be a valid port number, 0 < x < 65536.",
                        ),
                    ),
                    (
                        "name",
                        string().description(
                            "If specified, this must be an IANA_SVC_NAME and unique within the pod. Each named port in a pod must have a unique name. Name for the port that can be referred to by services.",
                        ),
                    ),
                    (
                        "protocol",
                        string().description(
                            "Protocol for port. Must be UDP, TCP, or SCTP. Defaults to \"TCP\".",
                        ),
                    ),
                ])
                .description(
                    "ContainerPort represents a network port in a single container.",
                ),
            )
            .description(
                "List of ports to expose from the container. Not specifying a port here DOES NOT prevent that port from being exposed. Any port which is listening on the default \"0.0.0.0\" address inside a container will be accessible from the network. Modifying this array with strategic merge patch may corrupt the data. For more information See https://github.com/kubernetes/kubernetes/issues/108255. Cannot be updated.",
            )
            .list_type("atomic"),
        ),
        (
            "readinessProbe",
            probe(
                "Periodic probe of container service readiness. Container will be removed from service endpoints if the probe fails. Cannot be updated. More info: https://kubernetes.io/docs/concepts/workloads/pods/pod-lifecycle#container-probes",
            ),
        ),
        (
            "resources",
            object([
                (
                    "claims",
                    feature_flagged("kubernetes.podspec-dynamicresourceallocation"),
                ),
                (
                    "limits",
                    quantity_map().description(
                        "Limits describes the maximum amount of compute resources allowed. More info: https://kubernetes.io/docs/concepts/configuration/manage-resources-containers/",
                    ),
                ),
                (
                    "requests",
                    quantity_map().description(
                        "Requests describes the minimum amount of compute resources required. If Requests is omitted for a container, it defaults to Limits if that is explicitly specified, otherwise to an implementation-defined value. Requests cannot exceed Limits. More info: https://kubernetes.io/docs/concepts/configuration/manage-resources-containers/",
                    ),
                ),
            ])
            .description(
                "Compute Resources required by this container. Cannot be updated. More info: https://kubernetes.io/docs/concepts/configuration/manage-resources-containers/",
            ),
        ),
        ("securityContext", security_context()),
        (
            "startupProbe",
            feature_flagged("kubernetes.containerspec-startupprobe"),
        ),
        (
            "terminationMessagePath",
            string().description(
                "Optional: Path at which the file to which the container's termination message will be written is mounted into the container's filesystem. Message written is intended to be brief final status, such as an assertion failure message. Will be truncated by the node if greater than 4096 bytes. The total message length across all containers will be limited to 12kb. Defaults to /dev/termination-log. Cannot be updated.",
            ),
        ),
        (
            "terminationMessagePolicy",
            string().description(
                "Indicate how the termination message should be populated. File will use the contents of terminationMessagePath to populate the container status message on both success and failure. FallbackToLogsOnError will use the last chunk of container log output if the termination message file is empty and the container exited with an error. The log output is limited to 2048 bytes or 80 lines, whichever is smaller. Defaults to File. Cannot be updated.",
            ),
        ),
        (
            "volumeMounts",
            array(
                object([
                    (
                        "mountPath",
                        string().description(
                            "Path within the container at which the volume should be mounted.  Must not contain ':'.",
                        ),
                    ),
                    (
                        "name",
                        string().description("This must match the Name of a Volume."),
                    ),
                    (
                        "readOnly",
                        boolean().description(
                            "Mounted read-only if true, read-write otherwise (false or unspecified). Defaults to false.",
                        ),
                    ),
                    (
                        "subPath",
                        string().description(
                            "Path within the volume from which the container's volume should be mounted. Defaults to \"\" (volume's root).",
                        ),
                    ),
                ])
                .description(
                    "VolumeMount describes a mounting of a Volume within a container.",
                )
                .required(["mountPath", "name"]),
            )
            .description(
                "Pod volumes to mount into the container's filesystem. Cannot be updated.",
            ),
        ),
        (
            "workingDir",
            string().description(
                "Container's working directory. If not specified, the container runtime's default will be used, which might be configured in the container image. Cannot be updated.",
            ),
        ),
    ])
    .description(description)
}

fn key_to_path_items() -> JSONSchemaProps {
    array(
        object([
            ("key", string().description("key is the key to project.")),
            (
                "mode",
                int32().description(
                    "mode is Optional: mode bits used to set permissions on this file. Must be an octal value between 0000 and 0777 or a decimal value between 0 and 511.",
                ),
            ),
            (
                "path",
                string().description(
                    "path is the relative path of the file to map the key to. May not be an absolute path. May not contain the path element '..'. May not start with the string '..'.",
                ),
            ),
        ])
        .description("Maps a string key to a path within a volume.")
        .required(["key", "path"]),
    )
    .description(
        "items if unspecified, each key-value pair in the Data field of the referenced ConfigMap will be projected into the volume as a file whose name is the key and content is the value.",
    )
}

fn volumes() -> JSONSchemaProps {
    let default_mode = || {
        int32().description(
            "defaultMode is optional: mode bits used to set permissions on created files by default. Must be an octal value between 0000 and 0777 or a decimal value between 0 and 511. Defaults to 0644.",
        )
    };

    array(
        object([
            (
                "configMap",
                object([
                    ("defaultMode", default_mode()),
                    ("items", key_to_path_items()),
                    (
                        "name",
                        string().description(
                            "Name of the referent. This field is effectively required, but due to backwards compatibility is allowed to be empty. Instances of this type with an empty value here are almost certainly wrong. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
                        ),
                    ),
                    (
                        "optional",
                        boolean().description(
                            "optional specify whether the ConfigMap or its keys must be defined",
                        ),
                    ),
                ])
                .description(
                    "configMap represents a configMap that should populate this volume",
                )
                .map_type("atomic"),
            ),
            ("csi", feature_flagged("kubernetes.podspec-csi")),
            ("emptyDir", feature_flagged("kubernetes.podspec-emptydir")),
            ("hostPath", feature_flagged("kubernetes.podspec-hostpath")),
            (
                "name",
                string().description(
                    "name of the volume. Must be a DNS_LABEL and unique within the pod. More info: https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names",
                ),
            ),
            (
                "persistentVolumeClaim",
                feature_flagged("kubernetes.podspec-persistent-volume-claim"),
            ),
            (
                "projected",
                open_object().description(
                    "projected items for all in one resources secrets, configmaps, and downward API",
                ),
            ),
            (
                "secret",
                object([
                    ("defaultMode", default_mode()),
                    ("items", key_to_path_items()),
                    (
                        "optional",
                        boolean().description(
                            "optional field specify whether the Secret or its keys must be defined",
                        ),
                    ),
                    (
                        "secretName",
                        string().description(
                            "secretName is the name of the secret in the pod's namespace to use. More info: https://kubernetes.io/docs/concepts/storage/volumes#secret",
                        ),
                    ),
                ])
                .description(
                    "secret represents a secret that should populate this volume. More info: https://kubernetes.io/docs/concepts/storage/volumes#secret",
                ),
            ),
        ])
        .description(
            "Volume represents a named volume in a pod that may be accessed by any container in the pod.",
        )
        .required(["name"]),
    )
    .description(
        "List of volumes that can be mounted by containers belonging to the pod. More info: https://kubernetes.io/docs/concepts/storage/volumes",
    )
}

/// `spec` of a Revision, and `spec.template.spec` of Configurations and Services.
pub(super) fn revision_spec(description: &str) -> JSONSchemaProps {
    object([
        ("affinity", feature_flagged("kubernetes.podspec-affinity")),
        (
            "automountServiceAccountToken",
            boolean().description(
                "AutomountServiceAccountToken indicates whether a service account token should be automatically mounted.",
            ),
        ),
        (
            "containerConcurrency",
            int64().description(
                "ContainerConcurrency specifies the maximum allowed in-flight (concurrent) requests per container of the Revision.  Defaults to `0` which means concurrency to the application is not limited, and the system decides the target concurrency for the autoscaler.",
            ),
        ),
        (
            "containers",
            array(container(
                "A single application container that you want to run within a pod.",
            ))
            .description(
                "List of containers belonging to the pod. Containers cannot currently be added or removed. There must be at least one container in a Pod. Cannot be updated.",
            ),
        ),
        ("dnsConfig", feature_flagged("kubernetes.podspec-dnsconfig")),
        (
            "dnsPolicy",
            string().description(
                "This is accessible behind a feature flag - kubernetes.podspec-dnspolicy",
            ),
        ),
        (
            "enableServiceLinks",
            boolean().description(
                "EnableServiceLinks indicates whether information about services should be injected into pod's environment variables, matching the syntax of Docker links. Optional: Knative defaults this to false.",
            ),
        ),
        ("hostAliases", feature_flagged("kubernetes.podspec-hostaliases")),
        (
            "hostIPC",
            boolean().description(
                "This is accessible behind a feature flag - kubernetes.podspec-hostipc",
            ),
        ),
        (
            "hostNetwork",
            boolean().description(
                "This is accessible behind a feature flag - kubernetes.podspec-hostnetwork",
            ),
        ),
        (
            "hostPID",
            boolean().description(
                "This is accessible behind a feature flag - kubernetes.podspec-hostpid",
            ),
        ),
        (
            "idleTimeoutSeconds",
            int64().description(
                "IdleTimeoutSeconds is the maximum duration in seconds a request will be allowed to stay open while not receiving any bytes from the user's application. If unspecified, a system default will be provided.",
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
                "ImagePullSecrets is an optional list of references to secrets in the same namespace to use for pulling any of the images used by this PodSpec. If specified, these secrets will be passed to individual puller implementations for them to use. More info: https://kubernetes.io/docs/concepts/containers/images#specifying-imagepullsecrets-on-a-pod",
            ),
        ),
        (
            "initContainers",
            array(container(
                "A single application container that you want to run within a pod.",
            ))
            .description(
                "List of initialization containers belonging to the pod. Init containers are executed in order prior to containers being started. More info: https://kubernetes.io/docs/concepts/workloads/pods/init-containers/",
            ),
        ),
        (
            "nodeSelector",
            string_map().description(
                "This is accessible behind a feature flag - kubernetes.podspec-nodeselector",
            ),
        ),
        (
            "priorityClassName",
            string().description(
                "This is accessible behind a feature flag - kubernetes.podspec-priorityclassname",
            ),
        ),
        (
            "responseStartTimeoutSeconds",
            int64().description(
                "ResponseStartTimeoutSeconds is the maximum duration in seconds that the request routing layer will wait for a request delivered to a container to begin sending any network traffic.",
            ),
        ),
        (
            "runtimeClassName",
            string().description(
                "This is accessible behind a feature flag - kubernetes.podspec-runtimeclassname",
            ),
        ),
        (
            "schedulerName",
            string().description(
                "This is accessible behind a feature flag - kubernetes.podspec-schedulername",
            ),
        ),
        (
            "securityContext",
            feature_flagged("kubernetes.podspec-securitycontext"),
        ),
        (
            "serviceAccountName",
            string().description(
                "ServiceAccountName is the name of the ServiceAccount to use to run this pod. More info: https://kubernetes.io/docs/tasks/configure-pod-container/configure-service-account/",
            ),
        ),
        (
            "shareProcessNamespace",
            boolean().description(
                "This is accessible behind a feature flag - kubernetes.podspec-shareproccessnamespace",
            ),
        ),
        (
            "timeoutSeconds",
            int64().description(
                "TimeoutSeconds is the maximum duration in seconds that the request instance is allowed to respond to a request. If unspecified, a system default will be provided.",
            ),
        ),
        ("tolerations", feature_flagged("kubernetes.podspec-tolerations")),
        (
            "topologySpreadConstraints",
            feature_flagged("kubernetes.podspec-topologyspreadconstraints"),
        ),
        ("volumes", volumes()),
    ])
    .description(description)
    .required(["containers"])
}

/// `spec.template` of Configurations and Services.
pub(super) fn revision_template() -> JSONSchemaProps {
    object([
        (
            "metadata",
            object([
                ("annotations", string_map()),
                ("finalizers", array(string())),
                ("labels", string_map()),
                ("name", string()),
                ("namespace", string()),
            ])
            .preserve_unknown_fields(),
        ),
        (
            "spec",
            revision_spec(
                "RevisionSpec holds the desired state of the Revision (from the client).",
            ),
        ),
    ])
    .description(
        "Template holds the latest specification for the Revision to be stamped out.",
    )
}

/// A single entry of `spec.traffic` / `status.traffic`.
pub(super) fn traffic() -> JSONSchemaProps {
    array(
        object([
            (
                "configurationName",
                string().description(
                    "ConfigurationName of a configuration to whose latest revision we will send this portion of traffic. When the \"status.latestReadyRevisionName\" of the referenced configuration changes, we will automatically migrate traffic from the prior \"latest ready\" revision to the new one.  This field is never set in Route's status, only its spec.  This is mutually exclusive with RevisionName.",
                ),
            ),
            (
                "latestRevision",
                boolean().description(
                    "LatestRevision may be optionally provided to indicate that the latest ready Revision of the Configuration should be used for this traffic target.  When provided LatestRevision must be true if RevisionName is empty; it must be false when RevisionName is non-empty.",
                ),
            ),
            (
                "percent",
                int64().description(
                    "Percent indicates that percentage based routing should be used and the value indicates the percent of traffic that is be routed to this Revision or Configuration. `0` (zero) mean no traffic, `100` means all traffic. When percentage based routing is being used the follow rules apply: - the sum of all percent values must equal 100 - when not specified, the implied value for `percent` is zero for that particular Revision or Configuration",
                ),
            ),
            (
                "revisionName",
                string().description(
                    "RevisionName of a specific revision to which to send this portion of traffic.  This is mutually exclusive with ConfigurationName.",
                ),
            ),
            (
                "tag",
                string().description(
                    "Tag is optionally used to expose a dedicated url for referencing this target exclusively.",
                ),
            ),
            (
                "url",
                string().description(
                    "URL displays the URL for accessing named traffic targets. URL is displayed in status, and is disallowed on spec. URL must contain a scheme (e.g. http://) and a hostname, but may not contain anything else (e.g. basic auth, url path, etc.)",
                ),
            ),
        ])
        .description(
            "TrafficTarget holds a single entry of the routing table for a Route.",
        ),
    )
}
