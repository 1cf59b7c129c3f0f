//! Control-plane Deployments and the Services in front of them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment,
};
use k8s_openapi::api::core::v1::{
    Affinity, Capabilities, Container, ContainerPort, EnvVar, EnvVarSource, HTTPGetAction,
    HTTPHeader, ObjectFieldSelector, PodAffinityTerm, PodAntiAffinity, PodSpec, PodTemplateSpec,
    Probe, ResourceRequirements, SeccompProfile, SecurityContext, Service, ServicePort,
    ServiceSpec, WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::images::{ACTIVATOR_IMAGE, AUTOSCALER_IMAGE, CONTROLLER_IMAGE, WEBHOOK_IMAGE};
use super::meta::{
    match_labels, namespaced_meta, serving_labels, string_map, strings, with_labels,
    SERVING_NAMESPACE,
};

const METRICS_PORT: i32 = 9090;
const PROFILING_PORT: i32 = 8008;

pub(crate) fn env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: Some(value.into()),
        value_from: None,
    }
}

pub(crate) fn field_env(name: &str, field_path: &str) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                api_version: None,
                field_path: field_path.into(),
            }),
            ..Default::default()
        }),
    }
}

pub(crate) fn container_port(name: &str, port: i32) -> ContainerPort {
    ContainerPort {
        name: Some(name.into()),
        container_port: port,
        ..Default::default()
    }
}

pub(crate) fn service_port(name: &str, port: i32, target_port: i32) -> ServicePort {
    ServicePort {
        name: Some(name.into()),
        port,
        target_port: Some(IntOrString::Int(target_port)),
        ..Default::default()
    }
}

pub(crate) fn compute_resources(
    request_cpu: &str,
    request_memory: &str,
    limit_cpu: &str,
    limit_memory: &str,
) -> ResourceRequirements {
    let quantities = |cpu: &str, memory: &str| {
        BTreeMap::from([
            ("cpu".to_string(), Quantity(cpu.into())),
            ("memory".to_string(), Quantity(memory.into())),
        ])
    };
    ResourceRequirements {
        requests: Some(quantities(request_cpu, request_memory)),
        limits: Some(quantities(limit_cpu, limit_memory)),
        claims: None,
    }
}

/// Non-root, read-only root filesystem, no capabilities, runtime default seccomp.
pub(crate) fn restricted_security_context() -> SecurityContext {
    SecurityContext {
        allow_privilege_escalation: Some(false),
        read_only_root_filesystem: Some(true),
        run_as_non_root: Some(true),
        capabilities: Some(Capabilities {
            add: None,
            drop: Some(strings(["ALL"])),
        }),
        seccomp_profile: Some(SeccompProfile {
            type_: "RuntimeDefault".into(),
            localhost_profile: None,
        }),
        ..Default::default()
    }
}

/// HTTP probe carrying the `k-kubelet-probe` header the knative binaries answer on.
fn kubelet_probe(component: &str, port: i32, scheme: Option<&str>) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            port: IntOrString::Int(port),
            scheme: scheme.map(Into::into),
            http_headers: Some(vec![HTTPHeader {
                name: "k-kubelet-probe".into(),
                value: component.into(),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn path_probe(path: &str, port: &str) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.into()),
            port: IntOrString::String(port.into()),
            scheme: Some("HTTP".into()),
            ..Default::default()
        }),
        period_seconds: Some(5),
        ..Default::default()
    }
}

/// Spread replicas of `app` across nodes where possible.
fn spread_across_nodes(app: &str) -> Affinity {
    Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![
                WeightedPodAffinityTerm {
                    weight: 100,
                    pod_affinity_term: PodAffinityTerm {
                        topology_key: "kubernetes.io/hostname".into(),
                        label_selector: Some(match_labels([("app", app)])),
                        ..Default::default()
                    },
                },
            ]),
            required_during_scheduling_ignored_during_execution: None,
        }),
        ..Default::default()
    }
}

/// Env shared by every control-plane binary.
fn system_env() -> Vec<EnvVar> {
    vec![
        field_env("POD_NAME", "metadata.name"),
        field_env("SYSTEM_NAMESPACE", "metadata.namespace"),
        env("CONFIG_LOGGING_NAME", "config-logging"),
        env("CONFIG_OBSERVABILITY_NAME", "config-observability"),
    ]
}

/// Pod template labelled with `app` (and any extra selector labels) on top of the component labels.
fn pod_template<const N: usize>(
    component: &str,
    selector: [(&str, &str); N],
    safe_to_evict: bool,
    spec: PodSpec,
) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(with_labels(serving_labels(Some(component)), selector)),
            annotations: (!safe_to_evict).then(|| {
                string_map([("cluster-autoscaler.kubernetes.io/safe-to-evict", "false")])
            }),
            ..Default::default()
        }),
        spec: Some(spec),
    }
}

fn serving_deployment<const N: usize>(
    name: &str,
    selector: [(&str, &str); N],
    strategy: Option<DeploymentStrategy>,
    template: PodTemplateSpec,
) -> Deployment {
    Deployment {
        metadata: namespaced_meta(name, SERVING_NAMESPACE, serving_labels(Some(name))),
        spec: Some(DeploymentSpec {
            selector: match_labels(selector),
            strategy,
            template,
            ..Default::default()
        }),
        status: None,
    }
}

fn serving_service<const N: usize>(
    name: &str,
    component: &str,
    labels: [(&str, &str); N],
    selector: BTreeMap<String, String>,
    ports: Vec<ServicePort>,
) -> Service {
    Service {
        metadata: namespaced_meta(
            name,
            SERVING_NAMESPACE,
            with_labels(serving_labels(Some(component)), labels),
        ),
        spec: Some(ServiceSpec {
            selector: Some(selector),
            ports: Some(ports),
            type_: Some("ClusterIP".into()),
            ..Default::default()
        }),
        status: None,
    }
}

pub static DEPLOYMENT_ACTIVATOR: LazyLock<Deployment> = LazyLock::new(|| {
    let selector = [("app", "activator"), ("role", "activator")];
    let mut env = vec![env("GOGC", "500")];
    env.extend(system_env());
    env.insert(2, field_env("POD_IP", "status.podIP"));
    env.push(self::env("METRICS_DOMAIN", "knative.dev/internal/serving"));

    let mut liveness = kubelet_probe("activator", 8012, None);
    liveness.initial_delay_seconds = Some(15);
    liveness.failure_threshold = Some(12);
    let mut readiness = kubelet_probe("activator", 8012, None);
    readiness.failure_threshold = Some(5);

    serving_deployment(
        "activator",
        selector,
        None,
        pod_template(
            "activator",
            selector,
            false,
            PodSpec {
                service_account_name: Some("activator".into()),
                affinity: Some(spread_across_nodes("activator")),
                termination_grace_period_seconds: Some(600),
                containers: vec![Container {
                    name: "activator".into(),
                    image: Some(ACTIVATOR_IMAGE.into()),
                    resources: Some(compute_resources("300m", "60Mi", "1000m", "600Mi")),
                    env: Some(env),
                    security_context: Some(restricted_security_context()),
                    ports: Some(vec![
                        container_port("metrics", METRICS_PORT),
                        container_port("profiling", PROFILING_PORT),
                        container_port("http1", 8012),
                        container_port("h2c", 8013),
                        container_port("https", 8112),
                    ]),
                    readiness_probe: Some(readiness),
                    liveness_probe: Some(liveness),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ),
    )
});

pub static SERVICE_ACTIVATOR_SERVICE: LazyLock<Service> = LazyLock::new(|| {
    serving_service(
        "activator-service",
        "activator",
        [("app", "activator")],
        string_map([("app", "activator")]),
        vec![
            service_port("http-metrics", METRICS_PORT, METRICS_PORT),
            service_port("http-profiling", PROFILING_PORT, PROFILING_PORT),
            service_port("http", 80, 8012),
            service_port("http2", 81, 8013),
            service_port("https", 443, 8112),
        ],
    )
});

pub static DEPLOYMENT_AUTOSCALER: LazyLock<Deployment> = LazyLock::new(|| {
    let mut env = system_env();
    env.insert(1, field_env("POD_IP", "status.podIP"));
    env.push(self::env("METRICS_DOMAIN", "knative.dev/serving"));

    let readiness = kubelet_probe("autoscaler", 8080, None);
    let mut liveness = kubelet_probe("autoscaler", 8080, None);
    liveness.failure_threshold = Some(6);

    // One replica holds the metric state; a new pod must be up before the old one goes.
    let strategy = DeploymentStrategy {
        type_: None,
        rolling_update: Some(RollingUpdateDeployment {
            max_unavailable: Some(IntOrString::Int(0)),
            max_surge: Some(IntOrString::String("100%".into())),
        }),
    };

    let mut deployment = serving_deployment(
        "autoscaler",
        [("app", "autoscaler")],
        Some(strategy),
        pod_template(
            "autoscaler",
            [("app", "autoscaler")],
            false,
            PodSpec {
                service_account_name: Some("controller".into()),
                affinity: Some(spread_across_nodes("autoscaler")),
                containers: vec![Container {
                    name: "autoscaler".into(),
                    image: Some(AUTOSCALER_IMAGE.into()),
                    resources: Some(compute_resources("100m", "100Mi", "1000m", "1000Mi")),
                    env: Some(env),
                    security_context: Some(restricted_security_context()),
                    ports: Some(vec![
                        container_port("websocket", 8080),
                        container_port("metrics", METRICS_PORT),
                        container_port("profiling", PROFILING_PORT),
                    ]),
                    readiness_probe: Some(readiness),
                    liveness_probe: Some(liveness),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ),
    );
    if let Some(spec) = deployment.spec.as_mut() {
        spec.replicas = Some(1);
    }
    deployment
});

pub static SERVICE_AUTOSCALER: LazyLock<Service> = LazyLock::new(|| {
    serving_service(
        "autoscaler",
        "autoscaler",
        [("app", "autoscaler")],
        string_map([("app", "autoscaler")]),
        vec![
            service_port("http-metrics", METRICS_PORT, METRICS_PORT),
            service_port("http-profiling", PROFILING_PORT, PROFILING_PORT),
            service_port("http", 8080, 8080),
        ],
    )
});

pub static DEPLOYMENT_CONTROLLER: LazyLock<Deployment> = LazyLock::new(|| {
    let mut env = system_env();
    env.push(self::env("METRICS_DOMAIN", "knative.dev/internal/serving"));

    let readiness = Probe {
        failure_threshold: Some(3),
        ..path_probe("/readiness", "probes")
    };
    let liveness = Probe {
        failure_threshold: Some(6),
        ..path_probe("/health", "probes")
    };

    serving_deployment(
        "controller",
        [("app", "controller")],
        None,
        pod_template(
            "controller",
            [("app", "controller")],
            true,
            PodSpec {
                service_account_name: Some("controller".into()),
                affinity: Some(spread_across_nodes("controller")),
                containers: vec![Container {
                    name: "controller".into(),
                    image: Some(CONTROLLER_IMAGE.into()),
                    resources: Some(compute_resources("100m", "100Mi", "1000m", "1000Mi")),
                    env: Some(env),
                    security_context: Some(restricted_security_context()),
                    ports: Some(vec![
                        container_port("metrics", METRICS_PORT),
                        container_port("profiling", PROFILING_PORT),
                        container_port("probes", 8080),
                    ]),
                    readiness_probe: Some(readiness),
                    liveness_probe: Some(liveness),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ),
    )
});

pub static SERVICE_CONTROLLER: LazyLock<Service> = LazyLock::new(|| {
    serving_service(
        "controller",
        "controller",
        [("app", "controller")],
        string_map([("app", "controller")]),
        vec![
            service_port("http-metrics", METRICS_PORT, METRICS_PORT),
            service_port("http-profiling", PROFILING_PORT, PROFILING_PORT),
        ],
    )
});

/// Port the admission webhook serves TLS on.
pub(crate) const WEBHOOK_PORT: i32 = 8443;

pub static DEPLOYMENT_WEBHOOK: LazyLock<Deployment> = LazyLock::new(|| {
    let selector = [("app", "webhook"), ("role", "webhook")];
    let mut env = system_env();
    env.extend([
        self::env("WEBHOOK_NAME", "webhook"),
        self::env("WEBHOOK_PORT", "8443"),
        self::env("METRICS_DOMAIN", "knative.dev/internal/serving"),
    ]);

    let mut readiness = kubelet_probe("webhook", WEBHOOK_PORT, Some("HTTPS"));
    readiness.period_seconds = Some(1);
    let mut liveness = kubelet_probe("webhook", WEBHOOK_PORT, Some("HTTPS"));
    liveness.failure_threshold = Some(6);
    liveness.initial_delay_seconds = Some(20);

    serving_deployment(
        "webhook",
        selector,
        None,
        pod_template(
            "webhook",
            selector,
            false,
            PodSpec {
                service_account_name: Some("controller".into()),
                affinity: Some(spread_across_nodes("webhook")),
                termination_grace_period_seconds: Some(300),
                containers: vec![Container {
                    name: "webhook".into(),
                    image: Some(WEBHOOK_IMAGE.into()),
                    resources: Some(compute_resources("100m", "100Mi", "500m", "500Mi")),
                    env: Some(env),
                    security_context: Some(restricted_security_context()),
                    ports: Some(vec![
                        container_port("metrics", METRICS_PORT),
                        container_port("profiling", PROFILING_PORT),
                        container_port("https-webhook", WEBHOOK_PORT),
                    ]),
                    readiness_probe: Some(readiness),
                    liveness_probe: Some(liveness),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ),
    )
});

pub static SERVICE_WEBHOOK: LazyLock<Service> = LazyLock::new(|| {
    serving_service(
        "webhook",
        "webhook",
        [("app", "webhook"), ("role", "webhook")],
        string_map([("role", "webhook")]),
        vec![
            service_port("http-metrics", METRICS_PORT, METRICS_PORT),
            service_port("http-profiling", PROFILING_PORT, PROFILING_PORT),
            service_port("https-webhook", 443, WEBHOOK_PORT),
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    fn pod_spec(deployment: &Deployment) -> &PodSpec {
        deployment
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref())
            .unwrap()
    }

    fn template_labels(deployment: &Deployment) -> &BTreeMap<String, String> {
        deployment
            .spec
            .as_ref()
            .and_then(|s| s.template.metadata.as_ref())
            .and_then(|m| m.labels.as_ref())
            .unwrap()
    }

    fn selects(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
        selector.iter().all(|(k, v)| labels.get(k) == Some(v))
    }

    #[test]
    fn deployment_selectors_match_their_templates() {
        for deployment in [
            &*DEPLOYMENT_ACTIVATOR,
            &*DEPLOYMENT_AUTOSCALER,
            &*DEPLOYMENT_CONTROLLER,
            &*DEPLOYMENT_WEBHOOK,
        ] {
            let selector = deployment
                .spec
                .as_ref()
                .and_then(|s| s.selector.match_labels.as_ref())
                .unwrap();
            assert!(
                selects(selector, template_labels(deployment)),
                "{:?}",
                deployment.metadata.name
            );
        }
    }

    #[test]
    fn services_select_their_deployments() {
        for (service, deployment) in [
            (&*SERVICE_ACTIVATOR_SERVICE, &*DEPLOYMENT_ACTIVATOR),
            (&*SERVICE_AUTOSCALER, &*DEPLOYMENT_AUTOSCALER),
            (&*SERVICE_CONTROLLER, &*DEPLOYMENT_CONTROLLER),
            (&*SERVICE_WEBHOOK, &*DEPLOYMENT_WEBHOOK),
        ] {
            let selector = service
                .spec
                .as_ref()
                .and_then(|s| s.selector.as_ref())
                .unwrap();
            assert!(
                selects(selector, template_labels(deployment)),
                "{:?}",
                service.metadata.name
            );
        }
    }

    #[test]
    fn activator_runs_as_activator_and_others_as_controller() {
        assert_eq!(
            pod_spec(&DEPLOYMENT_ACTIVATOR).service_account_name.as_deref(),
            Some("activator")
        );
        for deployment in [
            &*DEPLOYMENT_AUTOSCALER,
            &*DEPLOYMENT_CONTROLLER,
            &*DEPLOYMENT_WEBHOOK,
        ] {
            assert_eq!(
                pod_spec(deployment).service_account_name.as_deref(),
                Some("controller")
            );
        }
    }

    #[test]
    fn webhook_service_targets_the_tls_port() {
        let ports = SERVICE_WEBHOOK.spec.as_ref().unwrap().ports.as_ref().unwrap();
        let https = ports
            .iter()
            .find(|p| p.name.as_deref() == Some("https-webhook"))
            .unwrap();
        assert_eq!(https.port, 443);
        assert_eq!(https.target_port, Some(IntOrString::Int(WEBHOOK_PORT)));
    }

    #[test]
    fn activator_env_keeps_declared_order() {
        let names: Vec<_> = pod_spec(&DEPLOYMENT_ACTIVATOR).containers[0]
            .env
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "GOGC",
                "POD_NAME",
                "POD_IP",
                "SYSTEM_NAMESPACE",
                "CONFIG_LOGGING_NAME",
                "CONFIG_OBSERVABILITY_NAME",
                "METRICS_DOMAIN"
            ]
        );
    }

    #[test]
    fn containers_drop_all_capabilities() {
        for deployment in [
            &*DEPLOYMENT_ACTIVATOR,
            &*DEPLOYMENT_AUTOSCALER,
            &*DEPLOYMENT_CONTROLLER,
            &*DEPLOYMENT_WEBHOOK,
        ] {
            let context = pod_spec(deployment).containers[0]
                .security_context
                .as_ref()
                .unwrap();
            assert_eq!(
                context.capabilities.as_ref().and_then(|c| c.drop.as_deref()),
                Some(&["ALL".to_string()][..])
            );
        }
    }
}
