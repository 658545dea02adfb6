// Prediction domain model

/// Label the backend uses for a healthy machine. Anything else is a fault.
pub const NORMAL_LABEL: &str = "Normal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Normal,
    Fault,
}

impl Condition {
    pub fn from_label(label: &str) -> Self {
        if label == NORMAL_LABEL {
            Condition::Normal
        } else {
            Condition::Fault
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Normal => "Normal",
            Condition::Fault => "Fault",
        }
    }
}

/// Frequency-domain samples as computed by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub freq_samples: Vec<f64>,
    pub amp_samples: Vec<f64>,
}

/// Outcome of one successful diagnostic run. Built only through
/// [`PredictionResult::new`], so `confidence` is always within `[0,1]` and the
/// paired sample vectors always have matching lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    condition: Condition,
    label: String,
    confidence: f64,
    time_samples: Vec<f64>,
    signal_samples: Vec<f64>,
    spectrum: Option<Spectrum>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidPrediction {
    #[error("empty condition label")]
    EmptyLabel,
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
    #[error("time has {time} samples but signal has {signal}")]
    SignalLengthMismatch { time: usize, signal: usize },
    #[error("fft_freqs has {freqs} samples but fft_amps has {amps}")]
    SpectrumLengthMismatch { freqs: usize, amps: usize },
}

impl PredictionResult {
    pub fn new(
        label: String,
        confidence: f64,
        time_samples: Vec<f64>,
        signal_samples: Vec<f64>,
        spectrum: Option<Spectrum>,
    ) -> Result<Self, InvalidPrediction> {
        if label.trim().is_empty() {
            return Err(InvalidPrediction::EmptyLabel);
        }
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&confidence) {
            return Err(InvalidPrediction::ConfidenceOutOfRange(confidence));
        }
        if time_samples.len() != signal_samples.len() {
            return Err(InvalidPrediction::SignalLengthMismatch {
                time: time_samples.len(),
                signal: signal_samples.len(),
            });
        }
        if let Some(spectrum) = &spectrum {
            if spectrum.freq_samples.len() != spectrum.amp_samples.len() {
                return Err(InvalidPrediction::SpectrumLengthMismatch {
                    freqs: spectrum.freq_samples.len(),
                    amps: spectrum.amp_samples.len(),
                });
            }
        }

        Ok(Self {
            condition: Condition::from_label(&label),
            label,
            confidence,
            time_samples,
            signal_samples,
            spectrum,
        })
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Raw classification label, e.g. "Normal" or "Inner Race Fault".
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn time_samples(&self) -> &[f64] {
        &self.time_samples
    }

    pub fn signal_samples(&self) -> &[f64] {
        &self.signal_samples
    }

    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }
}
