//! The `config-*` ConfigMaps read by the serving control plane.
//!
//! Each map ships with an `_example` block documenting every key, plus the
//! `knative.dev/example-checksum` annotation the webhook uses to reject edits to
//! that block. The checksum is the IEEE CRC-32 of the example, as eight hex digits.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use k8s_openapi::api::core::v1::ConfigMap;

use super::images::QUEUE_PROXY_IMAGE;
use super::meta::{
    namespaced_meta, serving_labels, string_map, with_annotations, SERVING_NAMESPACE,
};

pub(crate) const EXAMPLE_KEY: &str = "_example";
pub(crate) const EXAMPLE_CHECKSUM_ANNOTATION: &str = "knative.dev/example-checksum";

pub(crate) fn example_config_map<const N: usize>(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    checksum: &str,
    example: &str,
    data: [(&str, &str); N],
) -> ConfigMap {
    let mut entries = string_map(data);
    entries.insert(EXAMPLE_KEY.into(), example.into());
    ConfigMap {
        metadata: with_annotations(
            namespaced_meta(name, namespace, labels),
            [(EXAMPLE_CHECKSUM_ANNOTATION, checksum)],
        ),
        data: Some(entries),
        ..Default::default()
    }
}

fn serving_config(name: &str, component: &str, checksum: &str, example: &str) -> ConfigMap {
    example_config_map(
        name,
        SERVING_NAMESPACE,
        serving_labels(Some(component)),
        checksum,
        example,
        [],
    )
}

pub static CONFIG_MAP_CONFIG_AUTOSCALER: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-autoscaler",
        "autoscaler",
        "64805685",
        include_str!("config/autoscaler.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_DEFAULTS: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-defaults",
        "controller",
        "9451cbe6",
        include_str!("config/defaults.yaml"),
    )
});

/// Also carries the live `queue-sidecar-image` key; the controller injects it into every revision.
pub static CONFIG_MAP_CONFIG_DEPLOYMENT: LazyLock<ConfigMap> = LazyLock::new(|| {
    example_config_map(
        "config-deployment",
        SERVING_NAMESPACE,
        serving_labels(Some("controller")),
        "f109cd2a",
        include_str!("config/deployment.yaml"),
        [("queue-sidecar-image", QUEUE_PROXY_IMAGE)],
    )
});

pub static CONFIG_MAP_CONFIG_DOMAIN: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-domain",
        "controller",
        "5660be31",
        include_str!("config/domain.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_FEATURES: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-features",
        "controller",
        "f3ae52fb",
        include_str!("config/features.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_GC: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-gc",
        "controller",
        "44f152f5",
        include_str!("config/gc.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_LEADER_ELECTION: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-leader-election",
        "controller",
        "35ae2a34",
        include_str!("config/leader_election.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_LOGGING: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-logging",
        "logging",
        "a861a87f",
        include_str!("config/logging.yaml"),
    )
});

/// Routes ingress through the bundled Kourier gateway.
pub static CONFIG_MAP_CONFIG_NETWORK: LazyLock<ConfigMap> = LazyLock::new(|| {
    example_config_map(
        "config-network",
        SERVING_NAMESPACE,
        serving_labels(Some("networking")),
        "f03fd99f",
        include_str!("config/network.yaml"),
        [("ingress-class", "kourier.ingress.networking.knative.dev")],
    )
});

pub static CONFIG_MAP_CONFIG_OBSERVABILITY: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-observability",
        "observability",
        "2b35193c",
        include_str!("config/observability.yaml"),
    )
});

pub static CONFIG_MAP_CONFIG_TRACING: LazyLock<ConfigMap> = LazyLock::new(|| {
    serving_config(
        "config-tracing",
        "tracing",
        "32bb535f",
        include_str!("config/tracing.yaml"),
    )
});

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = !0u32;
        for byte in bytes {
            crc ^= u32::from(*byte);
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
            }
        }
        !crc
    }

    pub(crate) fn assert_example_checksum(config_map: &ConfigMap) {
        let name = config_map.metadata.name.as_deref().unwrap();
        let example = &config_map.data.as_ref().unwrap()[EXAMPLE_KEY];
        let annotations = config_map.metadata.annotations.as_ref().unwrap();
        let checksum = &annotations[EXAMPLE_CHECKSUM_ANNOTATION];
        assert_eq!(
            *checksum,
            format!("{:08x}", crc32(example.as_bytes())),
            "{name}"
        );
    }

    fn all() -> [&'static ConfigMap; 11] {
        [
            &*CONFIG_MAP_CONFIG_AUTOSCALER,
            &*CONFIG_MAP_CONFIG_DEFAULTS,
            &*CONFIG_MAP_CONFIG_DEPLOYMENT,
            &*CONFIG_MAP_CONFIG_DOMAIN,
            &*CONFIG_MAP_CONFIG_FEATURES,
            &*CONFIG_MAP_CONFIG_GC,
            &*CONFIG_MAP_CONFIG_LEADER_ELECTION,
            &*CONFIG_MAP_CONFIG_LOGGING,
            &*CONFIG_MAP_CONFIG_NETWORK,
            &*CONFIG_MAP_CONFIG_OBSERVABILITY,
            &*CONFIG_MAP_CONFIG_TRACING,
        ]
    }

    #[test]
    fn crc32_matches_known_vector() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn example_checksums_match_their_blocks() {
        for config_map in all() {
            assert_example_checksum(config_map);
        }
    }

    #[test]
    fn examples_are_valid_yaml_mappings() {
        for config_map in all() {
            let example = &config_map.data.as_ref().unwrap()[EXAMPLE_KEY];
            let parsed: serde_yaml::Value = serde_yaml::from_str(example).unwrap();
            assert!(parsed.is_mapping(), "{:?}", config_map.metadata.name);
        }
    }

    #[test]
    fn autoscaler_example_targets_seventy_percent() {
        let example = &CONFIG_MAP_CONFIG_AUTOSCALER.data.as_ref().unwrap()[EXAMPLE_KEY];
        assert!(example.contains("container-concurrency-target-percentage: \"70\""));
    }

    #[test]
    fn deployment_config_pins_queue_proxy() {
        let data = CONFIG_MAP_CONFIG_DEPLOYMENT.data.as_ref().unwrap();
        assert_eq!(data["queue-sidecar-image"], QUEUE_PROXY_IMAGE);
    }

    #[test]
    fn all_config_maps_live_in_serving_namespace() {
        for config_map in all() {
            assert_eq!(
                config_map.metadata.namespace.as_deref(),
                Some(SERVING_NAMESPACE)
            );
        }
    }
}
