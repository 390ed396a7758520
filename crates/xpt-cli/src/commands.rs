//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use xpt_reader::{XptTable, read_xpt};

use crate::cli::{OutputFormatArg, RowsArgs, SchemaArgs};
use crate::summary::{footer, rows_json, rows_table, schema_table};

/// Print the variables of a file.
pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let table = load(&args.file)?;
    println!("{}", schema_table(&table));
    println!("{}", footer(&table, None));
    Ok(())
}

/// Print the rows of a file.
pub fn run_rows(args: &RowsArgs) -> Result<()> {
    let table = load(&args.file)?;
    match args.format {
        OutputFormatArg::Table => {
            println!("{}", rows_table(&table, args.limit));
            println!("{}", footer(&table, args.limit));
        }
        OutputFormatArg::Json => {
            let json = rows_json(table, args.limit).context("failed to serialize rows")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Read and decode one file.
pub fn load(path: &Path) -> Result<XptTable> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();

    let table = read_xpt(path).with_context(|| format!("failed to decode {}", path.display()))?;
    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        trailing_bytes = table.trailing_bytes,
        "decoded transport file"
    );
    Ok(table)
}
