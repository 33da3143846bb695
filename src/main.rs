use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod coords;
mod dms;
mod html;
mod net;
mod pipeline;
mod resolve;
mod table;
mod types;
mod writer;

use net::PageClient;
use pipeline::{Pipeline, Sources};
use resolve::NameResolver;
use table::TableLocator;
use writer::{stdout_sink, FileSink, RowSink, TeeWriter};

pub const STATION_TABLE_URL: &str = "https://namu.wiki/w/한국철도공사/역명코드";
pub const STATION_TABLE_SELECTOR: &str = "table.Agu2vgbF";
pub const WIKI_BASE_URL: &str = "https://ko.wikipedia.org/wiki";
pub const OUTPUT_FILE: &str = "stations.csv";

#[derive(Parser)]
#[command(name = "korail-stations")]
#[command(about = "Build a CSV of Korail station codes with coordinates")]
struct Cli {
    /// CSV file to write (a copy also goes to stdout)
    #[arg(short, long, default_value = OUTPUT_FILE)]
    output: PathBuf,

    /// Page holding the station-code table
    #[arg(long, default_value = STATION_TABLE_URL)]
    source_url: String,

    /// CSS selector for the station-code table
    #[arg(long, default_value = STATION_TABLE_SELECTOR)]
    table_selector: String,

    /// Which matching table to read (0-based)
    #[arg(long, default_value_t = 1)]
    table_index: usize,

    /// Base URL for station detail pages
    #[arg(long, default_value = WIKI_BASE_URL)]
    wiki_base_url: String,

    /// CONL file replacing the built-in name overrides
    #[arg(long, value_name = "PATH")]
    overrides: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let resolver = match &cli.overrides {
        Some(path) => NameResolver::from_conl_path(path)?,
        None => NameResolver::builtin(),
    };
    info!("Loaded {} name overrides", resolver.override_count());

    let sources = Sources {
        table_url: cli.source_url,
        table: TableLocator {
            selector: cli.table_selector,
            index: cli.table_index,
        },
        wiki_base_url: cli.wiki_base_url,
    };

    let client = PageClient::new()?;
    let pipeline = Pipeline::new(&client, &resolver, &sources);

    // Nothing is written until the table has been read
    let table = pipeline.extract()?;

    let mut stdout = stdout_sink();
    let mut file = FileSink::create(&cli.output)?;
    let mut writer = TeeWriter::new(vec![&mut stdout as &mut dyn RowSink, &mut file]);
    let summary = pipeline.enrich(&table, &mut writer)?;

    info!(
        "Wrote {} rows to {} ({} of {} stations without coordinates)",
        writer.rows_written(),
        cli.output.display(),
        summary.unresolved,
        summary.stations
    );
    Ok(())
}
