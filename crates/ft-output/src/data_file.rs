//! Whitespace-delimited `.data` report files.
//!
//! One table per layer plus the overall file, all in one directory and
//! named by [`report_file_name`].  Layer tables are rewritten on every run;
//! the overall file is appended to so repeated instances accumulate.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use tracing::{debug, info};

use ft_core::{ExperimentConfig, FatTreeDims};

use crate::naming::{ReportFile, report_file_name};
use crate::writer::ReportWriter;
use crate::{LayerReport, OutputResult, OverallRecord};

/// Writes the five `.data` files of a run.
pub struct DataFileWriter {
    dir:      PathBuf,
    config:   ExperimentConfig,
    dims:     FatTreeDims,
    written:  Vec<PathBuf>,
}

impl DataFileWriter {
    /// Files land in `dir`, which must exist.
    pub fn new(dir: &Path, config: &ExperimentConfig, dims: FatTreeDims) -> Self {
        Self { dir: dir.to_path_buf(), config: config.clone(), dims, written: Vec::new() }
    }

    pub fn path_of(&self, file: ReportFile) -> PathBuf {
        self.dir.join(report_file_name(&self.config, &self.dims, file))
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn table_writer(path: &Path) -> OutputResult<Writer<File>> {
        Ok(WriterBuilder::new().delimiter(b' ').flexible(true).has_headers(false).from_path(path)?)
    }
}

impl ReportWriter for DataFileWriter {
    fn write_layer(&mut self, report: &LayerReport) -> OutputResult<()> {
        let path = self.path_of(ReportFile::Layer(report.layer));
        let mut out = Self::table_writer(&path)?;

        let mut header = Vec::with_capacity(report.header.len() + 1);
        header.push("0".to_owned());
        header.extend(report.header.iter().cloned());
        out.write_record(&header)?;

        for row in &report.rows {
            let mut record = Vec::with_capacity(row.utilization.len() + row.loss.len() + 1);
            record.push(row.bucket.to_string());
            record.extend(row.utilization.iter().chain(&row.loss).map(f64::to_string));
            out.write_record(&record)?;
        }
        out.flush()?;

        debug!(layer = report.layer.name(), rows = report.rows.len(), path = %path.display(), "layer table written");
        self.written.push(path);
        Ok(())
    }

    fn write_overall(&mut self, record: &OverallRecord<'_>) -> OutputResult<()> {
        let path = self.path_of(ReportFile::Overall);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{}", record.header_line())?;
        for line in record.mean_lines() {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{}", record.footer_line())?;
        out.flush()?;

        info!(path = %path.display(), "overall report written");
        self.written.push(path);
        Ok(())
    }

    /// Every file is flushed as it is written.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
