//! Batch driver: every configured source in order, every row in file order, one output table.

use anyhow::{Context, Result};
use cardledger_core::{ExportFormat, IssuerId, NormalizedRecord, SourceConfig, OUTPUT_HEADER};
use cardledger_ingest::{parse_fidelity_csv, parse_venmo_csv, VenmoSignPolicy};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::normalizer::Normalizer;

/// Row counts for one source of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub label: String,
    pub issuer: IssuerId,
    pub rows_read: usize,
    pub kept: usize,
    pub payments_dropped: usize,
}

/// All records of a run, source-major, plus per-source counts.
#[derive(Debug, Clone, Default)]
pub struct CompiledLedger {
    pub records: Vec<NormalizedRecord>,
    pub sources: Vec<SourceReport>,
}

/// Where and how the ledger table is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub path: PathBuf,
    /// Write the column header when the file is empty
    pub write_header: bool,
    /// Truncate instead of appending
    pub overwrite: bool,
}

impl OutputOptions {
    pub fn append_to(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_header: false,
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    normalizer: Normalizer,
    venmo: VenmoSignPolicy,
}

impl Pipeline {
    pub fn new(normalizer: Normalizer, venmo: VenmoSignPolicy) -> Self {
        Self { normalizer, venmo }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalize one source's export. The first row of positional exports is the header.
    pub fn compile_reader<R: Read>(
        &self,
        source: &SourceConfig,
        reader: R,
    ) -> Result<(Vec<NormalizedRecord>, SourceReport)> {
        let payer = self.normalizer.default_payer();

        let (records, rows_read, payments_dropped) = match source.issuer.export_format() {
            ExportFormat::Venmo => {
                let recs = parse_venmo_csv(reader, &source.label, payer, self.venmo)
                    .with_context(|| format!("{}: parsing Venmo statement", source.label))?;
                let n = recs.len();
                (recs, n, 0)
            }
            ExportFormat::Fidelity => {
                let recs = parse_fidelity_csv(reader, &source.label, payer)
                    .with_context(|| format!("{}: parsing Fidelity activity", source.label))?;
                let n = recs.len();
                (recs, n, 0)
            }
            ExportFormat::Positional => self.compile_positional(source, reader)?,
        };

        let report = SourceReport {
            label: source.label.clone(),
            issuer: source.issuer,
            rows_read,
            kept: records.len(),
            payments_dropped,
        };
        info!(
            source = %report.label,
            issuer = %report.issuer,
            rows = report.rows_read,
            kept = report.kept,
            payments = report.payments_dropped,
            "normalized source"
        );
        Ok((records, report))
    }

    fn compile_positional<R: Read>(
        &self,
        source: &SourceConfig,
        reader: R,
    ) -> Result<(Vec<NormalizedRecord>, usize, usize)> {
        // fail on a misconfigured issuer before touching any rows
        self.normalizer.registry().lookup(source.issuer)?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut out = Vec::new();
        let mut rows_read = 0;
        let mut payments_dropped = 0;

        for (i, result) in rdr.records().enumerate() {
            let data_row = i + 1;
            let record =
                result.with_context(|| format!("{}: reading data row {}", source.label, data_row))?;
            rows_read += 1;

            match self
                .normalizer
                .normalize(&record, source.issuer, &source.label)
                .with_context(|| format!("{}: data row {}", source.label, data_row))?
            {
                Some(rec) => out.push(rec),
                None => {
                    payments_dropped += 1;
                    debug!(source = %source.label, row = data_row, "dropped payment row");
                }
            }
        }

        Ok((out, rows_read, payments_dropped))
    }

    /// Normalize every source in configured order. Any error aborts the whole run.
    pub fn compile(&self, sources: &[SourceConfig]) -> Result<CompiledLedger> {
        let mut ledger = CompiledLedger::default();
        for source in sources {
            let file = File::open(&source.file)
                .with_context(|| format!("opening {} ({})", source.file.display(), source.label))?;
            let (records, report) = self.compile_reader(source, file)?;
            ledger.records.extend(records);
            ledger.sources.push(report);
        }
        Ok(ledger)
    }

    /// Compile all sources, then append the records to the output table.
    ///
    /// Nothing is written unless every source normalized cleanly.
    pub fn run(&self, sources: &[SourceConfig], output: &OutputOptions) -> Result<CompiledLedger> {
        let ledger = self.compile(sources)?;
        write_ledger(&ledger.records, output)?;
        info!(
            records = ledger.records.len(),
            sources = ledger.sources.len(),
            output = %output.path.display(),
            "ledger written"
        );
        Ok(ledger)
    }
}

/// Write records to the output table, appending unless `overwrite` is set.
pub fn write_ledger(records: &[NormalizedRecord], output: &OutputOptions) -> Result<()> {
    if let Some(parent) = output.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(!output.overwrite)
        .truncate(output.overwrite)
        .open(&output.path)
        .with_context(|| format!("open {}", output.path.display()))?;
    let empty = file
        .metadata()
        .with_context(|| format!("stat {}", output.path.display()))?
        .len()
        == 0;

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if output.write_header && empty {
        wtr.write_record(OUTPUT_HEADER)?;
    }
    for rec in records {
        wtr.serialize(rec)
            .with_context(|| format!("write {}", output.path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", output.path.display()))?;
    Ok(())
}
