use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use ward_core::rules::{self, BedRow, UnscoredOccupantPolicy};
use ward_core::{BedTopology, Census, CoreConfig, InMemoryWardStore, SapsScore, WardService};

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "ICU bed monitor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bed status for a SAPS score
    Classify {
        /// SAPS score; omit for a patient not yet scored
        score: Option<u32>,
    },
    /// Print the bed roster for a topology and an optional census
    Roster {
        /// Bed topology YAML file
        #[arg(long)]
        topology: PathBuf,
        /// Census YAML file of admitted patients
        #[arg(long)]
        census: Option<PathBuf>,
        /// Status for occupied beds without a SAPS score (stable or available)
        #[arg(long, default_value = "stable")]
        unscored_status: UnscoredOccupantPolicy,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print whole days hospitalized
    Days {
        /// Admission instant (RFC 3339 or YYYY-MM-DD)
        admission: String,
        /// Discharge instant (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        discharge: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Classify { score }) => {
            println!("{}", rules::classify(score.map(SapsScore::new)));
        }
        Some(Commands::Roster {
            topology,
            census,
            unscored_status,
            json,
        }) => {
            let rows = roster(&topology, census.as_deref(), unscored_status)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_roster(&rows);
            }
        }
        Some(Commands::Days {
            admission,
            discharge,
        }) => {
            let admission = parse_instant(&admission).context("invalid admission")?;
            let discharge = discharge
                .as_deref()
                .map(parse_instant)
                .transpose()
                .context("invalid discharge")?;
            println!("{}", rules::days_hospitalized(admission, discharge));
        }
        None => {
            println!("Use 'ward --help' for commands");
        }
    }

    Ok(())
}

fn roster(
    topology: &std::path::Path,
    census: Option<&std::path::Path>,
    policy: UnscoredOccupantPolicy,
) -> anyhow::Result<Vec<BedRow>> {
    let beds = BedTopology::load(topology)
        .with_context(|| format!("loading topology {}", topology.display()))?;
    let store = InMemoryWardStore::from_topology(&beds)?;
    let cfg = Arc::new(CoreConfig::new(policy, Some(topology.to_path_buf())));
    let service = WardService::new(cfg, Arc::new(store));

    if let Some(path) = census {
        let census =
            Census::load(path).with_context(|| format!("loading census {}", path.display()))?;
        service.admit_census(&census)?;
    }

    Ok(service.dashboard()?)
}

fn print_roster(rows: &[BedRow]) {
    if rows.is_empty() {
        println!("No beds found.");
        return;
    }
    for row in rows {
        match &row.patient {
            Some(p) => println!(
                "{:<6} {:<10} {:<9} {} ({}), {} days, SAPS {}",
                row.bed_number.as_str(),
                row.wing.as_str(),
                row.status.as_str(),
                p.name,
                p.main_diagnosis,
                p.days_hospitalized,
                p.saps_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            None => println!(
                "{:<6} {:<10} {:<9}",
                row.bed_number.as_str(),
                row.wing.as_str(),
                row.status.as_str()
            ),
        }
    }
}

fn parse_instant(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("expected RFC 3339 or YYYY-MM-DD, got {value:?}"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
