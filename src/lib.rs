pub mod cli;
pub mod data;
pub mod error;
pub mod ingest;
pub mod io_utils;
pub mod kind;
pub mod mapping;
pub mod recommend;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, OutputFormat, RecommendArgs},
    ingest::IngestOptions,
    recommend::RecommendOptions,
};

pub use crate::{
    data::{Cell, Column, Dataset},
    kind::ValueKind,
    mapping::SqlType,
    recommend::{Recommendation, analyze, analyze_with},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sql_type_advisor", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Recommend(args) => handle_recommend(&args),
    }
}

fn handle_recommend(args: &RecommendArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Analyzing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let ingest_options = IngestOptions {
        delimiter,
        encoding,
        has_headers: !args.no_header,
        limit: args.limit,
    };
    let dataset = ingest::read_dataset(&args.input, &ingest_options)
        .with_context(|| format!("Reading dataset from {:?}", args.input))?;
    debug!("Dataset holds {} row(s)", dataset.row_count());

    let options = RecommendOptions {
        float_strategy: args.float_precision.into(),
    };
    let recommendations = analyze_with(&dataset, &options);

    match args.format {
        OutputFormat::Table => report::print_table(&recommendations),
        OutputFormat::Csv => report::write_csv(std::io::stdout().lock(), &recommendations)?,
        OutputFormat::Json => report::write_json(std::io::stdout().lock(), &recommendations)?,
    }

    if let Some(path) = &args.output {
        let writer =
            io_utils::open_output(path).with_context(|| format!("Creating output file {path:?}"))?;
        report::write_csv(writer, &recommendations)
            .with_context(|| format!("Writing recommendations to {path:?}"))?;
        info!(
            "Recommendations for {} column(s) written to {:?}",
            recommendations.len(),
            path
        );
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
