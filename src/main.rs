use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use casedash::{
    filter::{FilterOptions, FilterSelection},
    load::{cache::load_cases, DEFAULT_SHEET},
    report::{summary_table, write_summary, DashboardReport},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Case records dashboard: counts, filters and case list")]
struct Args {
    /// Workbook (.xlsx) or CSV export of the case list
    #[arg(long, global = true, default_value = "Datacor_processos.xlsx")]
    input: PathBuf,
    #[arg(long, global = true, default_value = DEFAULT_SHEET)]
    sheet: String,
    /// YAML file with a filter selection
    #[arg(long, global = true)]
    filters: Option<PathBuf>,

    #[arg(long = "year", global = true)]
    years: Vec<String>,
    /// Month label, e.g. "Março/2022"
    #[arg(long = "month", global = true)]
    months: Vec<String>,
    #[arg(long = "priority", global = true)]
    priorities: Vec<String>,
    #[arg(long = "municipality", global = true)]
    municipalities: Vec<String>,
    #[arg(long = "neighborhood", global = true)]
    neighborhoods: Vec<String>,
    #[arg(long = "zone", global = true)]
    zones: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dashboard payload as JSON
    Report {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Choices for each filter as JSON
    Options,
    /// Print the filtered case list
    Table {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Write the filtered case list as .csv or .parquet
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Args {
    fn selection(&self) -> Result<FilterSelection> {
        let mut selection = match &self.filters {
            Some(path) => FilterSelection::from_yaml_file(path)?,
            None => FilterSelection::default(),
        };
        selection.merge(FilterSelection {
            case_year: self.years.clone(),
            month_label: self.months.clone(),
            priorities: self.priorities.clone(),
            municipality: self.municipalities.clone(),
            neighborhood: self.neighborhoods.clone(),
            zone: self.zones.clone(),
        });
        Ok(selection)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let selection = args.selection()?;
    let table = load_cases(&args.input, &args.sheet)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(rows = table.num_rows(), filtered = !selection.is_empty(), "case table ready");

    match args.command {
        Command::Report { output } => {
            let report = DashboardReport::build(&table, &selection)?;
            match output {
                Some(path) => {
                    report.write_json(&path)?;
                    info!(path = %path.display(), "report written");
                }
                None => println!("{}", report.to_json()?),
            }
        }
        Command::Options => {
            let options = FilterOptions::compute(&table, &selection);
            println!(
                "{}",
                serde_json::to_string_pretty(&options).context("serializing filter options")?
            );
        }
        Command::Table { limit } => {
            let batch = summary_table(&table, &selection)?;
            let shown = batch.slice(0, limit.min(batch.num_rows()));
            println!("{}", pretty_format_batches(&[shown])?);
            println!("{} of {} cases", limit.min(batch.num_rows()), batch.num_rows());
        }
        Command::Export { output } => {
            let batch = summary_table(&table, &selection)?;
            write_summary(&batch, &output)?;
        }
    }
    Ok(())
}
