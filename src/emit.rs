use std::io::Write;

use serde_json::json;
use tracing::debug;

use crate::catalog::KubernetesResource;
use crate::{Error, Result};

/// Output encoding for [`emit`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Multi-document YAML, one `---` separated document per record
    #[default]
    Yaml,
    /// A single `v1 List` holding every record
    Json,
}

/// Keeps the records whose kind is in `kinds`, preserving order. An empty filter keeps everything.
///
/// Kinds match case-insensitively; a kind none of the records has is an error.
pub fn select(records: &[KubernetesResource], kinds: &[String]) -> Result<Vec<KubernetesResource>> {
    if let Some(unknown) = kinds
        .iter()
        .find(|k| !records.iter().any(|r| r.kind().eq_ignore_ascii_case(k)))
    {
        return Err(Error::UnknownKind(unknown.clone()));
    }
    Ok(records
        .iter()
        .filter(|r| kinds.is_empty() || kinds.iter().any(|k| r.kind().eq_ignore_ascii_case(k)))
        .copied()
        .collect())
}

pub fn write_yaml<W: Write>(records: &[KubernetesResource], mut out: W) -> Result<()> {
    for record in records {
        out.write_all(b"---\n")?;
        out.write_all(serde_yaml::to_string(record)?.as_bytes())?;
    }
    Ok(())
}

pub fn write_json<W: Write>(records: &[KubernetesResource], mut out: W) -> Result<()> {
    let list = json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": records,
    });
    serde_json::to_writer_pretty(&mut out, &list)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Writes `records` to `out` in the given format.
pub fn emit<W: Write>(records: &[KubernetesResource], format: Format, out: W) -> Result<()> {
    debug!(count = records.len(), ?format, "Emitting records");
    match format {
        Format::Yaml => write_yaml(records, out),
        Format::Json => write_json(records, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{resources, CONFIG_MAP_CONFIG_AUTOSCALER};
    use assert_json_diff::assert_json_include;
    use serde::Deserialize;

    fn yaml_documents(text: &str) -> Vec<serde_yaml::Value> {
        serde_yaml::Deserializer::from_str(text)
            .map(|doc| serde_yaml::Value::deserialize(doc).unwrap())
            .collect()
    }

    #[test]
    fn yaml_has_one_document_per_record() {
        let mut out = Vec::new();
        emit(resources(), Format::Yaml, &mut out).unwrap();
        let docs = yaml_documents(&String::from_utf8(out).unwrap());

        assert_eq!(docs.len(), 66);
        assert_eq!(docs[0]["kind"].as_str(), Some("Namespace"));
        assert_eq!(docs[65]["metadata"]["name"].as_str(), Some("kourier-internal"));
    }

    #[test]
    fn yaml_keeps_multiline_config_intact() {
        let records = select(resources(), &["ConfigMap".into()]).unwrap();
        let mut out = Vec::new();
        write_yaml(&records[..1], &mut out).unwrap();
        let docs = yaml_documents(&String::from_utf8(out).unwrap());

        let example = docs[0]["data"]["_example"].as_str().unwrap();
        assert_eq!(
            example,
            CONFIG_MAP_CONFIG_AUTOSCALER.data.as_ref().unwrap()["_example"]
        );
    }

    #[test]
    fn json_is_a_list() {
        let records = select(resources(), &["namespace".into()]).unwrap();
        let mut out = Vec::new();
        emit(&records, Format::Json, &mut out).unwrap();
        let list: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_json_include!(
            actual: list,
            expected: json!({
                "apiVersion": "v1",
                "kind": "List",
                "items": [
                    { "kind": "Namespace", "metadata": { "name": "knative-serving" } },
                    { "kind": "Namespace", "metadata": { "name": "kourier-system" } },
                ]
            })
        );
    }

    #[test]
    fn select_keeps_catalog_order_across_kinds() {
        let records = select(resources(), &["Service".into(), "Deployment".into()]).unwrap();
        assert_eq!(records.len(), 13);
        assert_eq!(records[0].kind(), "Deployment");
        assert_eq!(records[1].name(), "activator-service");
    }

    #[test]
    fn select_rejects_unknown_kinds() {
        let err = select(resources(), &["Ingress".into()]).unwrap_err();
        assert!(matches!(err, Error::UnknownKind(kind) if kind == "Ingress"));
    }

    #[test]
    fn empty_filter_selects_everything() {
        assert_eq!(select(resources(), &[]).unwrap().len(), resources().len());
    }
}
