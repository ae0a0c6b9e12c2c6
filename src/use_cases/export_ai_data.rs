//! Export use case.
//! Generates businesses and writes their AI training records as JSON.

use rand::Rng;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::domain::AiExportRecord;
use crate::error::AppResult;
use crate::services::{BusinessBuilder, RandomValues};

pub struct ExportAiData {
    builder: BusinessBuilder,
}

impl ExportAiData {
    pub fn new(builder: BusinessBuilder) -> Self {
        Self { builder }
    }

    /// Generates `count` businesses without touching any store.
    pub fn records<R: Rng>(
        &self,
        count: usize,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<AiExportRecord>> {
        Ok(self
            .builder
            .build_population(count, rv)?
            .iter()
            .map(AiExportRecord::from)
            .collect())
    }

    pub fn execute<R: Rng>(
        &self,
        count: usize,
        output: &Path,
        rv: &mut RandomValues<R>,
    ) -> AppResult<Vec<AiExportRecord>> {
        let records = self.records(count, rv)?;
        write_records(output, &records)?;
        info!(
            records = records.len(),
            path = %output.display(),
            "AI training data exported"
        );
        Ok(records)
    }
}

pub fn write_records(path: &Path, records: &[AiExportRecord]) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> AppResult<Vec<AiExportRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
