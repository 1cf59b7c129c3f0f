//! The bundled net-kourier ingress: its controller in `knative-serving` and the
//! Envoy gateway in `kourier-system`.

use std::sync::LazyLock;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, ExecAction, GRPCAction, HTTPGetAction,
    HTTPHeader, Lifecycle, LifecycleHandler, Namespace, PodSpec, PodTemplateSpec, Probe, Service,
    ServiceAccount, ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::config::example_config_map;
use super::images::{ENVOY_IMAGE, KOURIER_CONTROLLER_IMAGE};
use super::meta::{
    cluster_meta, kourier_labels, match_labels, namespaced_meta, string_map, strings,
    with_labels, KOURIER_NAMESPACE, SERVING_NAMESPACE,
};
use super::rbac::{cluster_role_ref, rule, service_account_subject};
use super::workloads::{
    compute_resources, container_port, env, field_env, restricted_security_context, service_port,
};

/// Port the controller serves the Envoy xDS API on.
pub(crate) const XDS_PORT: i32 = 18000;

const BOOTSTRAP_CONFIG_MAP: &str = "kourier-bootstrap";
const BOOTSTRAP_KEY: &str = "envoy-bootstrap.yaml";
const BOOTSTRAP_MOUNT: &str = "/tmp/config";

pub static NAMESPACE_KOURIER_SYSTEM: LazyLock<Namespace> = LazyLock::new(|| Namespace {
    metadata: cluster_meta(KOURIER_NAMESPACE, kourier_labels()),
    ..Default::default()
});

/// Envoy bootstrap: ADS from the controller plus a stats listener on the admin pipe.
pub static CONFIG_MAP_KOURIER_BOOTSTRAP: LazyLock<ConfigMap> = LazyLock::new(|| ConfigMap {
    metadata: namespaced_meta(BOOTSTRAP_CONFIG_MAP, KOURIER_NAMESPACE, kourier_labels()),
    data: Some(string_map([(
        BOOTSTRAP_KEY,
        include_str!("config/envoy-bootstrap.yaml"),
    )])),
    ..Default::default()
});

pub static CONFIG_MAP_CONFIG_KOURIER: LazyLock<ConfigMap> = LazyLock::new(|| {
    example_config_map(
        "config-kourier",
        SERVING_NAMESPACE,
        kourier_labels(),
        "4a03c2f5",
        include_str!("config/kourier.yaml"),
        [],
    )
});

pub static SERVICE_ACCOUNT_NET_KOURIER: LazyLock<ServiceAccount> =
    LazyLock::new(|| ServiceAccount {
        metadata: namespaced_meta("net-kourier", SERVING_NAMESPACE, kourier_labels()),
        ..Default::default()
    });

pub static CLUSTER_ROLE_NET_KOURIER: LazyLock<ClusterRole> = LazyLock::new(|| ClusterRole {
    metadata: cluster_meta("net-kourier", kourier_labels()),
    aggregation_rule: None,
    rules: Some(vec![
        rule([""], ["events"], ["create", "update", "patch"]),
        rule(
            [""],
            ["pods", "endpoints", "services", "secrets"],
            ["get", "list", "watch"],
        ),
        rule([""], ["configmaps"], ["get", "list", "watch"]),
        rule(
            ["coordination.k8s.io"],
            ["leases"],
            ["get", "list", "create", "update", "delete", "patch", "watch"],
        ),
        rule(
            ["networking.internal.knative.dev"],
            ["ingresses"],
            ["get", "list", "watch", "patch"],
        ),
        rule(
            ["networking.internal.knative.dev"],
            ["ingresses/status"],
            ["update"],
        ),
        rule(
            ["apiextensions.k8s.io"],
            ["customresourcedefinitions"],
            ["get", "list", "watch"],
        ),
    ]),
});

pub static CLUSTER_ROLE_BINDING_NET_KOURIER: LazyLock<ClusterRoleBinding> =
    LazyLock::new(|| ClusterRoleBinding {
        metadata: cluster_meta("net-kourier", kourier_labels()),
        subjects: Some(vec![service_account_subject(
            "net-kourier",
            SERVING_NAMESPACE,
        )]),
        role_ref: cluster_role_ref("net-kourier"),
    });

fn grpc_probe(failure_threshold: i32) -> Probe {
    Probe {
        grpc: Some(GRPCAction {
            port: XDS_PORT,
            service: None,
        }),
        period_seconds: Some(10),
        failure_threshold: Some(failure_threshold),
        ..Default::default()
    }
}

fn single_app_template(app: &str, spec: PodSpec) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(with_labels(kourier_labels(), [("app", app)])),
            ..Default::default()
        }),
        spec: Some(spec),
    }
}

pub static DEPLOYMENT_NET_KOURIER_CONTROLLER: LazyLock<Deployment> = LazyLock::new(|| {
    let app = "net-kourier-controller";
    Deployment {
        metadata: namespaced_meta(app, SERVING_NAMESPACE, kourier_labels()),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: match_labels([("app", app)]),
            template: single_app_template(
                app,
                PodSpec {
                    service_account_name: Some("net-kourier".into()),
                    restart_policy: Some("Always".into()),
                    containers: vec![Container {
                        name: "controller".into(),
                        image: Some(KOURIER_CONTROLLER_IMAGE.into()),
                        env: Some(vec![
                            env("CERTS_SECRET_NAMESPACE", ""),
                            env("CERTS_SECRET_NAME", ""),
                            field_env("SYSTEM_NAMESPACE", "metadata.namespace"),
                            env("METRICS_DOMAIN", "knative.dev/samples"),
                            env("KOURIER_GATEWAY_NAMESPACE", KOURIER_NAMESPACE),
                            env("ENABLE_SECRET_INFORMER_FILTERING_BY_CERT_UID", "false"),
                            env("KUBE_API_BURST", "200"),
                            env("KUBE_API_QPS", "200"),
                        ]),
                        ports: Some(vec![container_port("http2-xds", XDS_PORT)]),
                        readiness_probe: Some(grpc_probe(3)),
                        liveness_probe: Some(grpc_probe(6)),
                        security_context: Some(restricted_security_context()),
                        resources: Some(compute_resources("20m", "40Mi", "500m", "500Mi")),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ),
            ..Default::default()
        }),
        status: None,
    }
});

pub static SERVICE_NET_KOURIER_CONTROLLER: LazyLock<Service> = LazyLock::new(|| Service {
    metadata: namespaced_meta("net-kourier-controller", SERVING_NAMESPACE, kourier_labels()),
    spec: Some(ServiceSpec {
        ports: Some(vec![service_port("grpc-xds", XDS_PORT, XDS_PORT)]),
        selector: Some(string_map([("app", "net-kourier-controller")])),
        type_: Some("ClusterIP".into()),
        ..Default::default()
    }),
    status: None,
});

fn gateway_probe(failure_threshold: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some("/ready".into()),
            port: IntOrString::Int(8081),
            scheme: Some("HTTP".into()),
            http_headers: Some(vec![HTTPHeader {
                name: "k-network-probe".into(),
                value: "queue".into(),
            }]),
            ..Default::default()
        }),
        initial_delay_seconds: Some(10),
        period_seconds: Some(5),
        failure_threshold: Some(failure_threshold),
        ..Default::default()
    }
}

pub static DEPLOYMENT_3SCALE_KOURIER_GATEWAY: LazyLock<Deployment> = LazyLock::new(|| {
    let app = "3scale-kourier-gateway";

    // Envoy writes its admin socket under /tmp.
    let mut security_context = restricted_security_context();
    security_context.read_only_root_filesystem = Some(false);

    let gateway = Container {
        name: "kourier-gateway".into(),
        image: Some(ENVOY_IMAGE.into()),
        command: Some(strings(["/usr/local/bin/envoy"])),
        args: Some(strings([
            "--base-id",
            "1",
            "--config-path",
            "/tmp/config/envoy-bootstrap.yaml",
            "--log-level",
            "info",
            "--drain-time-s",
            "15",
            "--drain-strategy",
            "immediate",
        ])),
        ports: Some(vec![
            container_port("http2-external", 8080),
            container_port("http2-internal", 8081),
            container_port("https-external", 8443),
            container_port("https-internal", 8444),
            container_port("http-probe", 8090),
            container_port("https-probe", 9443),
        ]),
        security_context: Some(security_context),
        volume_mounts: Some(vec![VolumeMount {
            name: "config-volume".into(),
            mount_path: BOOTSTRAP_MOUNT.into(),
            ..Default::default()
        }]),
        lifecycle: Some(Lifecycle {
            pre_stop: Some(LifecycleHandler {
                exec: Some(ExecAction {
                    command: Some(strings([
                        "/bin/sh",
                        "-c",
                        "curl -X POST --unix /tmp/envoy.admin http://localhost/drain_listeners?inboundonly; sleep 15",
                    ])),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        readiness_probe: Some(gateway_probe(3)),
        liveness_probe: Some(gateway_probe(6)),
        resources: Some(compute_resources("200m", "200Mi", "500m", "500Mi")),
        ..Default::default()
    };

    Deployment {
        metadata: namespaced_meta(app, KOURIER_NAMESPACE, kourier_labels()),
        spec: Some(DeploymentSpec {
            selector: match_labels([("app", app)]),
            template: single_app_template(
                app,
                PodSpec {
                    containers: vec![gateway],
                    volumes: Some(vec![Volume {
                        name: "config-volume".into(),
                        config_map: Some(ConfigMapVolumeSource {
                            name: BOOTSTRAP_CONFIG_MAP.into(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }]),
                    restart_policy: Some("Always".into()),
                    ..Default::default()
                },
            ),
            ..Default::default()
        }),
        status: None,
    }
});

fn gateway_service(name: &str, type_: &str, ports: Vec<ServicePort>) -> Service {
    Service {
        metadata: namespaced_meta(name, KOURIER_NAMESPACE, kourier_labels()),
        spec: Some(ServiceSpec {
            ports: Some(ports),
            selector: Some(string_map([("app", "3scale-kourier-gateway")])),
            type_: Some(type_.into()),
            ..Default::default()
        }),
        status: None,
    }
}

pub static SERVICE_KOURIER: LazyLock<Service> = LazyLock::new(|| {
    gateway_service(
        "kourier",
        "LoadBalancer",
        vec![
            service_port("http2", 80, 8080),
            service_port("https", 443, 8443),
        ],
    )
});

pub static SERVICE_KOURIER_INTERNAL: LazyLock<Service> = LazyLock::new(|| {
    gateway_service(
        "kourier-internal",
        "ClusterIP",
        vec![
            service_port("http2", 80, 8081),
            service_port("https", 443, 8444),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::config::tests::assert_example_checksum;

    fn bootstrap() -> serde_yaml::Value {
        let data = CONFIG_MAP_KOURIER_BOOTSTRAP.data.as_ref().unwrap();
        serde_yaml::from_str(&data[BOOTSTRAP_KEY]).unwrap()
    }

    #[test]
    fn bootstrap_points_envoy_at_the_controller_service() {
        let bootstrap = bootstrap();
        let clusters = bootstrap["static_resources"]["clusters"]
            .as_sequence()
            .unwrap();
        let xds = clusters
            .iter()
            .find(|c| c["name"] == "xds_cluster")
            .unwrap();
        let address = &xds["load_assignment"]["endpoints"]["lb_endpoints"]["endpoint"]["address"]
            ["socket_address"];

        let service = &*SERVICE_NET_KOURIER_CONTROLLER;
        let host = format!(
            "{}.{}",
            service.metadata.name.as_deref().unwrap(),
            service.metadata.namespace.as_deref().unwrap()
        );
        assert_eq!(address["address"].as_str(), Some(host.as_str()));
        assert_eq!(address["port_value"].as_i64(), Some(i64::from(XDS_PORT)));
    }

    #[test]
    fn gateway_mounts_the_bootstrap_it_is_started_with() {
        let pod = DEPLOYMENT_3SCALE_KOURIER_GATEWAY
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref())
            .unwrap();
        let args = pod.containers[0].args.as_ref().unwrap();
        let config_path = args
            .iter()
            .skip_while(|a| *a != "--config-path")
            .nth(1)
            .unwrap();
        assert_eq!(*config_path, format!("{BOOTSTRAP_MOUNT}/{BOOTSTRAP_KEY}"));

        let volume = &pod.volumes.as_ref().unwrap()[0];
        assert_eq!(
            volume.config_map.as_ref().map(|c| c.name.as_str()),
            CONFIG_MAP_KOURIER_BOOTSTRAP.metadata.name.as_deref()
        );
    }

    #[test]
    fn config_kourier_checksum_matches_example() {
        assert_example_checksum(&CONFIG_MAP_CONFIG_KOURIER);
    }

    #[test]
    fn external_service_is_a_load_balancer() {
        assert_eq!(
            SERVICE_KOURIER.spec.as_ref().and_then(|s| s.type_.as_deref()),
            Some("LoadBalancer")
        );
        assert_eq!(
            SERVICE_KOURIER_INTERNAL
                .spec
                .as_ref()
                .and_then(|s| s.type_.as_deref()),
            Some("ClusterIP")
        );
    }

    #[test]
    fn records_carry_the_ingress_provider_label() {
        for meta in [
            &NAMESPACE_KOURIER_SYSTEM.metadata,
            &CLUSTER_ROLE_NET_KOURIER.metadata,
            &DEPLOYMENT_NET_KOURIER_CONTROLLER.metadata,
            &SERVICE_KOURIER.metadata,
        ] {
            let labels = meta.labels.as_ref().unwrap();
            assert_eq!(labels["networking.knative.dev/ingress-provider"], "kourier");
        }
    }
}
