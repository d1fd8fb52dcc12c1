use anyhow::{bail, Context, Result};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path};
use tracing::info;

/// Write `batch` to `path` as CSV or Parquet, picked by the file extension.
pub fn write_summary<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("csv") => write_csv(batch, path)?,
        Some("parquet") => write_parquet(batch, path)?,
        _ => bail!("unsupported export format for {}; use .csv or .parquet", path.display()),
    }
    info!(path = %path.display(), rows = batch.num_rows(), "exported case table");
    Ok(())
}

fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch).context("writing CSV batch")?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for export")?;
    writer.write(batch).context("writing export batch")?;
    writer.close().context("closing export writer")?;
    Ok(())
}
