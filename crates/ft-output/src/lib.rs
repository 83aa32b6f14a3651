//! `ft-output`: telemetry aggregation and report writers.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`aggregate`] | `ReportAggregator`, `LayerAccumulator`, `RunReport`       |
//! | [`record`]    | `OverallRecord`: header, bracket-tagged means and footer|
//! | [`naming`]    | `ReportFile`, `report_file_name`                          |
//! | [`writer`]    | `ReportWriter` trait                                      |
//! | [`data_file`] | `DataFileWriter`, the five `.data` files                  |
//! | [`sqlite`]    | `SqliteWriter` (feature `sqlite`), `output.db`            |
//! | [`observer`]  | `ReportObserver`, implements `ft_sim::ExperimentObserver` |
//! | [`error`]     | `OutputError`, `OutputResult<T>`                          |
//!
//! With feature `parallel` the four layer reductions run on Rayon.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ft_output::{DataFileWriter, ReportObserver};
//!
//! let writer = DataFileWriter::new(Path::new("./out"), exp.config(), *exp.dims());
//! let mut obs = ReportObserver::new(writer);
//! exp.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod aggregate;
pub mod data_file;
pub mod error;
pub mod naming;
pub mod observer;
pub mod record;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use aggregate::{LayerAccumulator, LayerReport, LayerSummary, ReportAggregator, RunReport, TableRow};
pub use data_file::DataFileWriter;
pub use error::{OutputError, OutputResult};
pub use naming::{ReportFile, report_file_name};
pub use observer::ReportObserver;
pub use record::{OverallRecord, link_rate_label};
pub use writer::ReportWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
