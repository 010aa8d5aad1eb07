// src/export/mod.rs

use anyhow::{Context, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

pub mod xlsx;

pub use xlsx::write_xlsx;

type Writer = fn(&RecordBatch, &Path) -> Result<()>;

/// Write `<stem>.csv`, `<stem>.parquet` and `<stem>.xlsx` under `output_dir`,
/// creating it if needed. Returns the final paths in that order.
#[instrument(level = "info", skip(batch), fields(rows = batch.num_rows()))]
pub fn write_all(batch: &RecordBatch, output_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;

    let artifacts: [(PathBuf, Writer); 3] = [
        (output_dir.join(format!("{}.csv", stem)), write_csv),
        (output_dir.join(format!("{}.parquet", stem)), write_parquet),
        (output_dir.join(format!("{}.xlsx", stem)), write_xlsx),
    ];
    write_together(batch, &artifacts)?;
    Ok(artifacts.into_iter().map(|(path, _)| path).collect())
}

/// Write every artifact to `<path>.tmp` first and rename only once all of
/// them succeeded. On failure every temporary is removed and the existing
/// files are left as they were.
fn write_together(batch: &RecordBatch, artifacts: &[(PathBuf, Writer)]) -> Result<()> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(artifacts.len());

    // 1) stage
    for (path, write) in artifacts {
        let tmp = tmp_path(path);
        if let Err(e) = write(batch, &tmp) {
            staged.push(tmp);
            for tmp in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(e.context(format!("writing {}", path.display())));
        }
        staged.push(tmp);
    }

    // 2) commit
    for (tmp, (path, _)) in staged.iter().zip(artifacts) {
        fs::rename(tmp, path)
            .with_context(|| format!("renaming {} → {}", tmp.display(), path.display()))?;
        debug!(path = %path.display(), "committed");
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Header row then one line per row; nulls become empty fields.
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(batch).context("writing CSV rows")?;
    writer.into_inner().flush()?;
    Ok(())
}

/// Single-file parquet, Snappy-compressed, schema embedded.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
        .context("creating ArrowWriter")?;
    writer.write(batch).context("writing parquet rows")?;
    writer.close().context("closing ArrowWriter")?;
    Ok(())
}
