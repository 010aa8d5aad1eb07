use anyhow::{Context, Result};
use outgassing::process::classify::value_counts;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{env, fs::File, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to a written parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PARQUET_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_output(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Read the whole file back and print schema, row count and the
/// classification breakdown.
fn inspect_output(path: &Path) -> Result<()> {
    // 1) open and read every batch
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("reading record batches")?;
    let table = arrow::compute::concat_batches(&schema, &batches)?;

    println!("=== Output File: {} ===", path.display());
    println!("Total rows:           {}", table.num_rows());
    println!("File-size on disk:    {} bytes", std::fs::metadata(path)?.len());
    println!();

    // 2) schema
    println!("=== Columns ===");
    for field in schema.fields() {
        println!(
            "- {:<24} | {:<16} | nullable: {}",
            field.name(),
            field.data_type().to_string(),
            field.is_nullable()
        );
    }
    println!();

    // 3) classification breakdown
    println!("=== SpaceX_Classification ===");
    for (label, count) in value_counts(&table)? {
        println!("- {:<40} {}", label, count);
    }
    Ok(())
}
