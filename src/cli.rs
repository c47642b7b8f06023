use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::mapping::FloatStrategy;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Recommend SQL column types from the values in a CSV file",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze every column of a CSV file and recommend a relational type for each
    Recommend(RecommendArgs),
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Input CSV file to analyze ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Also export the recommendations as CSV to this path ('-' for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// How to print recommendations to stdout
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Treat the first row as data and name columns column_1, column_2, ...
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Maximum number of data rows to analyze (0 means all rows)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
    /// Type declared for fractional numeric columns
    #[arg(long = "float-precision", value_enum, default_value = "double")]
    pub float_precision: FloatPrecision,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum FloatPrecision {
    /// Always DOUBLE
    #[default]
    Double,
    /// DECIMAL(p,s) sized to the observed digits, DOUBLE when they do not fit
    Decimal,
}

impl From<FloatPrecision> for FloatStrategy {
    fn from(value: FloatPrecision) -> Self {
        match value {
            FloatPrecision::Double => FloatStrategy::Double,
            FloatPrecision::Decimal => FloatStrategy::Decimal,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
