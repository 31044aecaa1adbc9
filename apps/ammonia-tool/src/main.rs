//! Command-line shell over the ammonia asset record repository.
//!
//! Builds candidate records from `FIELD=VALUE` arguments, prints data as
//! JSON on stdout, and prints validation messages verbatim on stderr.

mod cli;

use std::collections::BTreeSet;
use std::process::ExitCode;

use ammonia_core::{schema, FilterCriteria, Record, RepoError, Repository, StoreConfig};
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Exit status when a candidate record is rejected.
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig {
        data_path: cli.data_file.clone(),
        enforce_vocabulary: cli.strict_vocabulary,
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<RepoError>() {
            Some(RepoError::Validation(errors)) => {
                for error in errors {
                    eprintln!("{}", error);
                }
                ExitCode::from(EXIT_REJECTED)
            }
            _ => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(command: Commands, config: &StoreConfig) -> Result<()> {
    let repo = Repository::open(config);

    match command {
        Commands::Schema => {
            let fields: Vec<_> = schema::fields()
                .iter()
                .map(|f| {
                    json!({
                        "name": f.name,
                        "kind": f.kind.label(),
                        "allowed_values": f.kind.vocabulary(),
                    })
                })
                .collect();
            print_json(&fields)?;
        }
        Commands::Vocab { field } => match schema::allowed_values(&field) {
            Some(values) => print_json(&values)?,
            None => bail!("'{}' is not a controlled-text field", field),
        },
        Commands::List => print_json(&repo.list()?)?,
        Commands::Get { position } => print_json(&repo.get(position)?)?,
        Commands::Add { set } => {
            let record = build_record(Record::new(), &set)?;
            let record_ref = repo.add(record)?;
            print_json(&record_ref)?;
        }
        Commands::Update { position, set } => {
            let stored = repo.get(position)?.record;
            let record = build_record(stored, &set)?;
            repo.update(position, record)?;
            print_json(&repo.get(position)?)?;
        }
        Commands::Delete { position } => {
            let row = repo.delete(position)?;
            print_json(&row)?;
        }
        Commands::Search {
            field,
            substring,
            case_sensitive,
        } => {
            if schema::field(&field).is_none() {
                tracing::warn!("'{}' is not a schema field; nothing will match", field);
            }
            let dataset = repo.list()?;
            let hits: Vec<_> = repo
                .search(&field, &substring, !case_sensitive)?
                .into_iter()
                .filter_map(|r| {
                    dataset.get(r.position).map(|row| {
                        json!({ "position": r.position, "id": r.id, "record": row.record })
                    })
                })
                .collect();
            print_json(&hits)?;
        }
        Commands::Filter { criteria } => {
            let mut filter = FilterCriteria::new();
            for (field, values) in criteria {
                if schema::field(&field).is_none() {
                    bail!("Unknown field '{}'", field);
                }
                filter
                    .entry(field)
                    .or_insert_with(BTreeSet::new)
                    .extend(values);
            }
            print_json(&repo.filter(&filter)?)?;
        }
        Commands::Values { field } => print_json(&repo.distinct_values(&field)?)?,
        Commands::Validate { set } => {
            let record = build_record(Record::new(), &set)?;
            let errors = repo.validate(&record);
            if !errors.is_empty() {
                return Err(RepoError::Validation(errors).into());
            }
            println!("ok");
        }
    }

    Ok(())
}

/// Applies `FIELD=VALUE` assignments on top of `base`.
fn build_record(mut base: Record, assignments: &[(String, String)]) -> Result<Record> {
    for (name, value) in assignments {
        if !base.set_raw(name, value) {
            bail!("Unknown field '{}'", name);
        }
    }
    Ok(base)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", text);
    Ok(())
}
