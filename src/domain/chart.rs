// Chart series domain model and the transforms that build it
use super::prediction::PredictionResult;

/// Default number of spectrum points handed to the chart.
pub const DEFAULT_FREQUENCY_POINT_CAP: usize = 1000;

const TIME_LABEL_DIGITS: usize = 3;
const FREQUENCY_LABEL_DIGITS: usize = 1;

/// Chart-ready series. `labels` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartSeries {
    fn from_pairs(axis: &[f64], values: &[f64], digits: usize) -> Self {
        let len = axis.len().min(values.len());
        Self {
            labels: axis[..len]
                .iter()
                .map(|x| format!("{:.*}", digits, x))
                .collect(),
            values: values[..len].to_vec(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Time-domain series: every sample, labels are seconds with 3 decimals.
pub fn to_time_series(result: &PredictionResult) -> ChartSeries {
    ChartSeries::from_pairs(
        result.time_samples(),
        result.signal_samples(),
        TIME_LABEL_DIGITS,
    )
}

/// Frequency-domain series: the first `cap` points in backend order, labels
/// are Hz with 1 decimal. `None` when the backend sent no spectrum.
pub fn to_frequency_series(result: &PredictionResult, cap: usize) -> Option<ChartSeries> {
    let spectrum = result.spectrum()?;
    let len = spectrum.freq_samples.len().min(cap);
    Some(ChartSeries::from_pairs(
        &spectrum.freq_samples[..len],
        &spectrum.amp_samples[..len.min(spectrum.amp_samples.len())],
        FREQUENCY_LABEL_DIGITS,
    ))
}
