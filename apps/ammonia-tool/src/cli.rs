use std::path::PathBuf;

use ammonia_core::config::DEFAULT_DATA_FILE;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data file to operate on
    #[arg(long, global = true, env = "AMMONIA_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Reject controlled-text values outside their vocabulary
    #[arg(long, global = true)]
    pub strict_vocabulary: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the column schema
    Schema,

    /// Print the allowed values of a controlled-text column
    Vocab { field: String },

    /// Print every record
    List,

    /// Print the record at a position
    Get { position: usize },

    /// Add a record
    Add {
        /// Column assignment, e.g. --set country_name=India
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Replace the record at a position, starting from its stored values
    Update {
        position: usize,

        /// Column assignment overriding the stored value
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete the record at a position
    Delete { position: usize },

    /// Find records whose column contains a substring
    Search {
        field: String,
        substring: String,

        #[arg(long)]
        case_sensitive: bool,
    },

    /// Print records whose columns take one of the listed values
    Filter {
        /// Column criterion, e.g. --where frequency=Monthly,Annual
        #[arg(short, long = "where", value_parser = parse_criterion)]
        criteria: Vec<(String, Vec<String>)>,
    },

    /// Print the distinct values present in a column
    Values { field: String },

    /// Check a candidate record without saving it
    Validate {
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

/// Parses `name=value`; the value may be empty or contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parses `name=v1,v2,...`.
pub fn parse_criterion(s: &str) -> Result<(String, Vec<String>), String> {
    let (name, values) = parse_assignment(s)?;
    Ok((name, values.split(',').map(str::to_string).collect()))
}
