use std::io::{BufWriter, Write};

use clap::Parser;
use tracing::{error, info};

use knative_serving_manifests::catalog::{self, meta::SERVING_VERSION, KubernetesResource};
use knative_serving_manifests::emit::{self, Format};
use knative_serving_manifests::telemetry::{self, LogFormat};
use knative_serving_manifests::{lint, Error};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Arguments {
    #[arg(
        long = "log-format",
        env = "KNATIVE_MANIFESTS_LOG_FORMAT",
        value_name = "FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct Selection {
    /// Include the autoscalers and disruption budgets for the data-path workloads
    #[arg(long = "high-availability", env = "KNATIVE_MANIFESTS_HA")]
    high_availability: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Write the manifests to stdout
    Emit {
        #[arg(
            long = "format",
            env = "KNATIVE_MANIFESTS_FORMAT",
            value_name = "FORMAT",
            value_enum,
            default_value_t = Format::Yaml
        )]
        format: Format,

        /// Only emit records of this kind; repeat or comma-separate for several
        #[arg(
            long = "kind",
            env = "KNATIVE_MANIFESTS_KINDS",
            value_name = "KIND",
            value_delimiter = ','
        )]
        kinds: Vec<String>,

        #[command(flatten)]
        selection: Selection,
    },
    /// Print one line per record
    List {
        #[command(flatten)]
        selection: Selection,
    },
    /// Check cross references between records
    Lint {
        #[command(flatten)]
        selection: Selection,
    },
}

impl Selection {
    fn records(&self) -> Vec<KubernetesResource> {
        let mut records = catalog::resources().to_vec();
        if self.high_availability {
            records.extend_from_slice(catalog::high_availability_resources());
        }
        records
    }
}

fn main() -> anyhow::Result<()> {
    let args: Arguments = Arguments::parse();
    telemetry::init(args.log_format)?;

    match args.command {
        Command::Emit {
            format,
            kinds,
            selection,
        } => {
            let records = emit::select(&selection.records(), &kinds)?;
            let mut out = BufWriter::new(std::io::stdout().lock());
            emit::emit(&records, format, &mut out)?;
            out.flush()?;
            info!(
                count = records.len(),
                version = SERVING_VERSION,
                ?format,
                "Emitted manifests"
            );
        }
        Command::List { selection } => {
            let mut out = BufWriter::new(std::io::stdout().lock());
            for record in selection.records() {
                writeln!(out, "{record}")?;
            }
            out.flush()?;
        }
        Command::Lint { selection } => {
            let records = selection.records();
            let issues = lint::lint(&records);
            for issue in &issues {
                error!(%issue, "Lint issue");
            }
            if !issues.is_empty() {
                return Err(Error::LintFailed(issues.len()).into());
            }
            info!(count = records.len(), "Catalog is consistent");
        }
    }
    Ok(())
}
