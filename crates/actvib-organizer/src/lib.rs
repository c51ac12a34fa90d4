//! ActVib Organizer - labelled samples and batch analysis
//!
//! This crate turns directories of recordings into analysis results:
//!
//! - [`naming`] - Reading wear level and actuator from sample paths
//! - [`handler`] - [`SampleHandler`], the memoized per-sample pipeline
//! - [`organize`] - Sample discovery and grouping by wear level
//! - [`batch`] - [`BatchRunner`], parallel runs on a bounded thread pool
//! - [`table`] - [`ResultTable`] and its CSV export
//!
//! ## Example
//!
//! ```rust,no_run
//! use actvib_config::AnalysisConfig;
//! use actvib_organizer::{ActVibNaming, BatchMode, BatchRunner, discover_samples, organize_by_wear};
//! use std::path::Path;
//!
//! # fn main() -> actvib_organizer::Result<()> {
//! let config = AnalysisConfig::default();
//! let naming = ActVibNaming::from(&config.naming);
//!
//! let paths = discover_samples(Path::new("Dados"), &naming)?;
//! let groups = organize_by_wear(&paths, &naming);
//! for (level, names) in groups.iter() {
//!     println!("wear {level}: {} samples", names.len());
//! }
//!
//! let report = BatchRunner::new(config).run(&paths, BatchMode::Resonances)?;
//! report.table.export_resonances(Path::new("resonances.csv"))?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod handler;
pub mod naming;
pub mod organize;
pub mod table;

pub use batch::{BatchMode, BatchReport, BatchRunner, SampleFailure};
pub use error::{Error, Result};
pub use handler::{SampleHandler, impulse_response};
pub use naming::{ActVibNaming, NamingConvention, PathFormatError};
pub use organize::{SampleLabel, WearGroups, discover_samples, organize_by_wear};
pub use table::{ChannelResult, ResultKey, ResultTable};
