//! Batch spectra and resonance extraction over a sample tree.

use super::common::{CommonArgs, load_config};
use actvib_config::AnalysisConfig;
use actvib_organizer::{BatchMode, BatchReport, BatchRunner, discover_samples};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct SpectraArgs {
    /// Root folder of the recordings
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Output CSV file, one magnitude row per sample and channel
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args)]
pub struct ResonancesArgs {
    /// Root folder of the recordings
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Output CSV file, one row per resonance (default: print a table)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run_spectra(args: SpectraArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let report = run_batch(&args.root, config, BatchMode::Spectra)?;

    report.table.export_spectra(&args.output)?;
    println!(
        "Wrote {} spectra to {}",
        report.table.len(),
        args.output.display()
    );
    print_failures(&report);
    Ok(())
}

pub fn run_resonances(args: ResonancesArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let report = run_batch(&args.root, config, BatchMode::Resonances)?;

    match &args.output {
        Some(output) => {
            report.table.export_resonances(output)?;
            println!(
                "Wrote {} resonances from {} channel(s) to {}",
                report.table.resonance_count(),
                report.table.len(),
                output.display()
            );
        }
        None => {
            println!(
                "{:>5}  {:<24} {:<10} {:>10} {:>12} {:>12}",
                "wear", "sample", "channel", "freq (Hz)", "amplitude", "prominence"
            );
            for (key, result) in report.table.iter() {
                for peak in result.resonances.iter().flatten() {
                    println!(
                        "{:>5}  {:<24} {:<10} {:>10.2} {:>12.3} {:>12.3}",
                        key.wear_level,
                        key.sample,
                        key.channel,
                        peak.frequency,
                        peak.amplitude,
                        peak.prominence
                    );
                }
            }
        }
    }
    print_failures(&report);
    Ok(())
}

fn run_batch(root: &Path, config: AnalysisConfig, mode: BatchMode) -> anyhow::Result<BatchReport> {
    let runner = BatchRunner::new(config);
    let paths = discover_samples(root, runner.naming())?;
    if paths.is_empty() {
        anyhow::bail!("no sample files found under '{}'", root.display());
    }

    println!(
        "Analysing {} sample(s) with {} worker(s)...",
        paths.len(),
        runner.workers()
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let report = runner.run_with_progress(&paths, mode, |_| pb.inc(1))?;
    pb.finish_and_clear();
    Ok(report)
}

fn print_failures(report: &BatchReport) {
    if report.failures.is_empty() {
        return;
    }
    eprintln!("{} sample(s) failed:", report.failures.len());
    for failure in &report.failures {
        eprintln!("  {}: {}", failure.path.display(), failure.error);
    }
}
