//! Knative custom resources that appear as records in the catalog.
//!
//! Core Kubernetes kinds come from `k8s-openapi`; only kinds defined by Knative's own
//! CRDs are modelled here.

pub mod images;

pub use images::{Image, ImageSpec, ImageStatus, KnativeCondition};
