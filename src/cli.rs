use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use prstats::contributors::{CoreContributors, DEFAULT_CORE_DEVS};
use prstats::monthly::{monthly_data, MonthRange};
use prstats::pulls::{load_pulls, normalize_pulls, PullRequestRecord};
use prstats::report::{ActivityReport, ReportInputs};

#[derive(Parser)]
#[command(name = "prstats")]
#[command(author, version, about = "Pull Request Activity Summary Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize merged and rejected pull requests per month
    Monthly {
        /// JSON array of closed pull requests ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// First year of the summary
        #[arg(long)]
        year_start: i32,

        /// First month of the summary
        #[arg(long, default_value_t = 1)]
        month_start: u32,

        /// Last year of the summary (defaults to the current year)
        #[arg(long)]
        year_end: Option<i32>,

        /// Last month of the summary (defaults to the current month)
        #[arg(long)]
        month_end: Option<u32>,

        /// Logins counted as core contributors
        #[arg(
            short,
            long = "core",
            env = "PRSTATS_CORE_DEVS",
            value_delimiter = ',',
            default_values_t = DEFAULT_CORE_DEVS.map(String::from)
        )]
        core: Vec<String>,
    },
}

fn read_records(input: &str) -> Result<Vec<PullRequestRecord>> {
    if input == "-" {
        info!("Reading pull requests from stdin");
        return load_pulls(io::stdin().lock()).context("Failed to parse pull requests from stdin");
    }

    info!("Reading pull requests from: {input}");
    let file = File::open(input).with_context(|| format!("Failed to open {input}"))?;
    load_pulls(BufReader::new(file)).with_context(|| format!("Failed to parse {input}"))
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Monthly {
                input,
                year_start,
                month_start,
                year_end,
                month_end,
                core,
            } => {
                let range =
                    MonthRange::resolve_now(*year_start, *month_start, *year_end, *month_end)?;
                let core = CoreContributors::new(core.iter().cloned());
                info!(
                    "Summarizing {} to {} with {} core contributors",
                    range.start,
                    range.end,
                    core.len()
                );

                let records = read_records(input)?;
                let rows = normalize_pulls(&records)?;
                if rows.is_empty() {
                    warn!("No closed pull requests with an author found in {input}");
                }

                let activity = monthly_data(&rows, &core, range);
                let report = ActivityReport::new(
                    &ReportInputs {
                        source: input,
                        generated_at: Utc::now(),
                        range,
                        pulls_loaded: records.len(),
                        pulls_analyzed: rows.len(),
                        core_contributors: core.len(),
                    },
                    activity,
                );

                self.write(&report)
            }
        }
    }

    fn write(&self, report: &ActivityReport) -> Result<()> {
        let rendered = match self.format {
            Format::Json if self.pretty => serde_json::to_string_pretty(report)?,
            Format::Json => serde_json::to_string(report)?,
            Format::Text => report.to_string(),
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)?;
            info!("Report written to: {}", output_path.display());
        } else {
            println!("{rendered}");
        }

        Ok(())
    }
}
