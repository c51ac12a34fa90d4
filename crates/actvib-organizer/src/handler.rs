//! Per-sample analysis with memoized intermediate results.

use crate::error::{Error, Result};
use actvib_analysis::{NlmsParams, PeakConfig, Resonance, Spectrum, nlms, remove_mean};
use actvib_io::Sample;

/// Estimate the impulse response between two channels of a sample.
///
/// Both channels are mean-centered before filtering.
pub fn impulse_response(
    sample: &Sample,
    excitation: &str,
    response: &str,
    params: &NlmsParams,
) -> Result<Vec<f64>> {
    let x = remove_mean(sample.channel(excitation)?);
    let d = remove_mean(sample.channel(response)?);
    Ok(nlms::run(&x, &d, params)?)
}

/// Wraps one sample and lazily runs the pipeline on a channel pair.
///
/// The impulse response and spectrum are computed on first request and
/// reused afterwards. Changing the channels or the filter parameters drops
/// both.
///
/// ```rust
/// use actvib_io::Sample;
/// use actvib_organizer::SampleHandler;
/// use actvib_analysis::NlmsParams;
///
/// # fn main() -> actvib_organizer::Result<()> {
/// let drive: Vec<f64> = (0..512).map(|i| ((i * 37) % 11) as f64).collect();
/// let accel: Vec<f64> = drive.iter().map(|x| 2.0 * x).collect();
/// let sample = Sample::from_columns(
///     "run_d1_a",
///     416.0,
///     vec![("dac1".into(), drive), ("imu2accz".into(), accel)],
/// )?;
///
/// let mut handler = SampleHandler::new(sample)
///     .with_channels("dac1", "imu2accz")
///     .with_params(NlmsParams::new(16));
/// assert_eq!(handler.impulse_response()?.len(), 16);
/// assert_eq!(handler.spectrum()?.len(), 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SampleHandler {
    sample: Sample,
    excitation: Option<String>,
    response: Option<String>,
    params: NlmsParams,
    fir: Option<Vec<f64>>,
    spectrum: Option<Spectrum>,
}

impl SampleHandler {
    /// Wrap a sample with no channels selected and default filter settings.
    pub fn new(sample: Sample) -> Self {
        Self {
            sample,
            excitation: None,
            response: None,
            params: NlmsParams::default(),
            fir: None,
            spectrum: None,
        }
    }

    /// Select the excitation and response channels.
    pub fn with_channels(mut self, excitation: impl Into<String>, response: impl Into<String>) -> Self {
        self.set_excitation(excitation);
        self.set_response(response);
        self
    }

    /// Set the filter parameters.
    pub fn with_params(mut self, params: NlmsParams) -> Self {
        self.set_params(params);
        self
    }

    /// Change the excitation channel.
    pub fn set_excitation(&mut self, excitation: impl Into<String>) {
        self.excitation = Some(excitation.into());
        self.invalidate();
    }

    /// Change the response channel.
    pub fn set_response(&mut self, response: impl Into<String>) {
        self.response = Some(response.into());
        self.invalidate();
    }

    /// Change the filter parameters.
    pub fn set_params(&mut self, params: NlmsParams) {
        if params != self.params {
            self.params = params;
            self.invalidate();
        }
    }

    /// Drop the memoized impulse response and spectrum.
    pub fn invalidate(&mut self) {
        self.fir = None;
        self.spectrum = None;
    }

    /// The wrapped sample.
    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    /// Selected excitation channel.
    pub fn excitation(&self) -> Option<&str> {
        self.excitation.as_deref()
    }

    /// Selected response channel.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Filter parameters.
    pub fn params(&self) -> &NlmsParams {
        &self.params
    }

    /// Returns `true` if the impulse response has already been computed.
    pub fn is_cached(&self) -> bool {
        self.fir.is_some()
    }

    fn channels(&self) -> Result<(&str, &str)> {
        let excitation = self
            .excitation
            .as_deref()
            .ok_or(Error::Configuration("excitation"))?;
        let response = self
            .response
            .as_deref()
            .ok_or(Error::Configuration("response"))?;
        Ok((excitation, response))
    }

    /// Estimated impulse response of the selected channel pair.
    pub fn impulse_response(&mut self) -> Result<&[f64]> {
        let fir = match self.fir.take() {
            Some(fir) => fir,
            None => {
                let (excitation, response) = self.channels()?;
                tracing::debug!(
                    sample = self.sample.name(),
                    excitation,
                    response,
                    memory_size = self.params.memory_size,
                    "estimating impulse response"
                );
                impulse_response(&self.sample, excitation, response, &self.params)?
            }
        };
        Ok(self.fir.insert(fir).as_slice())
    }

    /// Magnitude spectrum of the impulse response.
    pub fn spectrum(&mut self) -> Result<&Spectrum> {
        let spectrum = match self.spectrum.take() {
            Some(spectrum) => spectrum,
            None => {
                let sample_rate = self.sample.sample_rate();
                Spectrum::from_coefficients(self.impulse_response()?, sample_rate)?
            }
        };
        Ok(&*self.spectrum.insert(spectrum))
    }

    /// Resonances of the spectrum. Not memoized, since the peak settings
    /// are cheap to vary.
    pub fn resonances(&mut self, config: &PeakConfig) -> Result<Vec<Resonance>> {
        let spectrum = self.spectrum()?;
        Ok(actvib_analysis::spectrum_resonances(spectrum, config)?)
    }

    /// Acquisition log rendered as a two-column text table.
    pub fn log_table(&self) -> String {
        const TIME_HEADER: &str = "Time";

        let width = self
            .sample
            .log()
            .iter()
            .map(|entry| entry.timestamp.len())
            .max()
            .unwrap_or(0)
            .max(TIME_HEADER.len());

        let mut table = format!("{TIME_HEADER:<width$} | Log\n");
        table.push_str(&format!("{}-+-{}\n", "-".repeat(width), "-".repeat(3)));
        for entry in self.sample.log() {
            table.push_str(&format!("{:<width$} | {}\n", entry.timestamp, entry.message));
        }
        table
    }
}
