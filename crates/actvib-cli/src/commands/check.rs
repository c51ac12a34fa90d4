//! Inspection of individual samples.

use super::common::{CommonArgs, load_config, sample_paths};
use actvib_analysis::{Resonance, Spectrum};
use actvib_organizer::{ActVibNaming, NamingConvention, SampleHandler};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct CheckArgs {
    /// Sample file, or a folder to check every sample in it
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Actuator index (default: read from the sample file name)
    #[arg(long, value_name = "N")]
    dac: Option<u8>,

    /// Print the acquisition log
    #[arg(long)]
    log: bool,

    /// Write impulse responses, spectra and resonances to a JSON file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ChannelReport {
    sample: String,
    path: PathBuf,
    excitation: String,
    response: String,
    impulse_response: Vec<f64>,
    spectrum: Spectrum,
    resonances: Vec<Resonance>,
}

pub fn run(args: CheckArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let naming = ActVibNaming::from(&config.naming);
    let paths = sample_paths(&args.path, &naming)?;

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for path in &paths {
        let actuator = match args.dac {
            Some(n) => Ok(n),
            None => naming
                .actuator(path)
                .map_err(|e| anyhow::anyhow!("{e}; pass --dac to choose the actuator")),
        };
        match actuator.and_then(|actuator| check_sample(path, actuator, args.log, &config)) {
            Ok(channels) => reports.extend(channels),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "check failed");
                failures.push((path, e));
            }
        }
    }

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(output, json)?;
        println!("Wrote {} channel report(s) to {}", reports.len(), output.display());
    }

    if !failures.is_empty() {
        eprintln!("{} sample(s) failed:", failures.len());
        for (path, e) in &failures {
            eprintln!("  {}: {e:#}", path.display());
        }
        anyhow::bail!("{} of {} sample(s) could not be checked", failures.len(), paths.len());
    }

    Ok(())
}

fn check_sample(
    path: &Path,
    actuator: u8,
    show_log: bool,
    config: &actvib_config::AnalysisConfig,
) -> anyhow::Result<Vec<ChannelReport>> {
    let sample = actvib_io::read_sample(path, config.sample_rate)?;
    let excitation = config.excitation_channel(actuator);

    println!("Sample: {}", sample.name());
    println!("  File:        {}", path.display());
    println!("  Rows:        {}", sample.len());
    println!("  Duration:    {:.2} s", sample.duration_secs());
    println!("  Sample rate: {} Hz", sample.sample_rate());
    println!("  Columns:     {}", sample.column_names().join(", "));
    println!("  Excitation:  {excitation}");

    let mut handler = SampleHandler::new(sample)
        .with_params(config.filter);
    handler.set_excitation(excitation.clone());

    if show_log {
        println!();
        print!("{}", handler.log_table());
    }

    let mut reports = Vec::with_capacity(config.responses.len());
    for response in &config.responses {
        handler.set_response(response.as_str());
        let resonances = handler.resonances(&config.peaks)?;
        let impulse_response = handler.impulse_response()?.to_vec();
        let spectrum = handler.spectrum()?.clone();

        println!();
        println!("  Resonances ({excitation} -> {response}):");
        if resonances.is_empty() {
            println!("    (none)");
        }
        for peak in &resonances {
            println!(
                "    {:>8.2} Hz  amplitude {:>10.3}  prominence {:>10.3}",
                peak.frequency, peak.amplitude, peak.prominence
            );
        }

        reports.push(ChannelReport {
            sample: handler.sample().name().to_string(),
            path: path.to_path_buf(),
            excitation: excitation.clone(),
            response: response.clone(),
            impulse_response,
            spectrum,
            resonances,
        });
    }
    println!();

    Ok(reports)
}
