//! Parallel pipeline runs over many sample files.

use crate::error::{Error, Result};
use crate::handler::SampleHandler;
use crate::naming::{ActVibNaming, NamingConvention};
use crate::organize::SampleLabel;
use crate::table::{ChannelResult, ResultKey, ResultTable};
use actvib_config::AnalysisConfig;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// How far the pipeline runs for each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Impulse response and spectrum only.
    Spectra,
    /// Spectrum plus resonance extraction.
    Resonances,
}

/// A sample that could not be processed.
#[derive(Debug)]
pub struct SampleFailure {
    /// Sample file path.
    pub path: PathBuf,
    /// Why it failed.
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Results of every sample that succeeded.
    pub table: ResultTable,
    /// Samples that failed, in input order.
    pub failures: Vec<SampleFailure>,
}

/// Runs the analysis pipeline over sample files on a bounded thread pool.
///
/// Each sample is labelled, loaded and analysed for every configured
/// response channel. A failing sample is reported in
/// [`BatchReport::failures`] and never stops the batch. Results are merged by
/// key, so the table does not depend on the number of workers. A sample
/// whose key is already taken by an earlier path fails with
/// [`Error::DuplicateSample`].
#[derive(Debug, Clone)]
pub struct BatchRunner<N = ActVibNaming> {
    config: AnalysisConfig,
    naming: N,
    workers: usize,
}

impl BatchRunner<ActVibNaming> {
    /// Create a runner with the naming rules and worker count of `config`.
    pub fn new(config: AnalysisConfig) -> Self {
        let naming = ActVibNaming::from(&config.naming);
        let workers = clamp_workers(config.worker_count());
        Self {
            config,
            naming,
            workers,
        }
    }
}

impl<N: NamingConvention> BatchRunner<N> {
    /// Replace the naming convention.
    pub fn with_naming<M: NamingConvention>(self, naming: M) -> BatchRunner<M> {
        BatchRunner {
            config: self.config,
            naming,
            workers: self.workers,
        }
    }

    /// Set the number of worker threads. `0` uses every available core;
    /// larger values are capped at the core count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = match workers {
            0 => available_cores(),
            n => clamp_workers(n),
        };
        self
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analysis settings.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Naming convention.
    pub fn naming(&self) -> &N {
        &self.naming
    }

    /// Run the pipeline on one sample file.
    pub fn analyze(&self, path: &Path, mode: BatchMode) -> Result<Vec<(ResultKey, ChannelResult)>> {
        let label = SampleLabel::from_path(path, &self.naming)?;
        let sample = actvib_io::read_sample(path, self.config.sample_rate)?;

        let mut handler = SampleHandler::new(sample)
            .with_params(self.config.filter);
        handler.set_excitation(self.config.excitation_channel(label.actuator));

        let mut rows = Vec::with_capacity(self.config.responses.len());
        for response in &self.config.responses {
            handler.set_response(response.as_str());
            let spectrum = handler.spectrum()?.clone();
            let resonances = match mode {
                BatchMode::Spectra => None,
                BatchMode::Resonances => Some(handler.resonances(&self.config.peaks)?),
            };
            rows.push((
                ResultKey::new(label.wear_level, label.name.clone(), response.clone()),
                ChannelResult {
                    actuator: label.actuator,
                    spectrum,
                    resonances,
                },
            ));
        }

        tracing::debug!(
            path = %path.display(),
            wear_level = label.wear_level,
            actuator = label.actuator,
            channels = rows.len(),
            "sample analysed"
        );
        Ok(rows)
    }

    /// Run the pipeline on every path.
    pub fn run(&self, paths: &[PathBuf], mode: BatchMode) -> Result<BatchReport> {
        self.run_with_progress(paths, mode, |_| {})
    }

    /// Run the pipeline on every path, calling `progress` as each sample
    /// finishes. `progress` is called from the worker threads.
    pub fn run_with_progress<F>(&self, paths: &[PathBuf], mode: BatchMode, progress: F) -> Result<BatchReport>
    where
        F: Fn(&Path) + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("actvib-worker-{i}"))
            .build()?;

        let outcomes: Vec<(&PathBuf, Result<Vec<(ResultKey, ChannelResult)>>)> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let outcome = self.analyze(path, mode);
                    progress(path);
                    (path, outcome)
                })
                .collect()
        });

        let mut report = BatchReport::default();
        for (path, outcome) in outcomes {
            // Paths arrive in input order, so the first of two samples
            // sharing a key is kept and the later one is reported.
            let outcome = outcome.and_then(|rows| {
                match rows.iter().find(|(key, _)| report.table.contains_key(key)) {
                    Some((key, _)) => Err(Error::DuplicateSample { key: key.clone() }),
                    None => Ok(rows),
                }
            });
            match outcome {
                Ok(rows) => {
                    for (key, result) in rows {
                        report.table.insert(key, result);
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "sample failed");
                    report.failures.push(SampleFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            samples = paths.len(),
            rows = report.table.len(),
            failures = report.failures.len(),
            workers = self.workers,
            "batch finished"
        );
        Ok(report)
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

fn clamp_workers(requested: usize) -> usize {
    requested.clamp(1, available_cores())
}
