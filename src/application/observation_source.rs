// Source trait for benchmark observations
use crate::domain::error::ChartError;
use crate::domain::observation::Observation;

/// Observations read from one source plus everything worth reporting about the read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub observations: Vec<Observation>,
    pub diagnostics: Vec<ChartError>,
}

impl LoadReport {
    pub fn new(observations: Vec<Observation>, diagnostics: Vec<ChartError>) -> Self {
        Self {
            observations,
            diagnostics,
        }
    }

    /// A source whose structure is invalid: nothing loaded, one diagnostic.
    pub fn aborted(diagnostic: ChartError) -> Self {
        Self {
            observations: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }
}

pub trait ObservationSource: Send + Sync {
    /// Name used in log lines and diagnostics
    fn describe(&self) -> String;

    /// Load every observation.
    ///
    /// `Err` means the source could not be read at all. A readable source with a
    /// missing column returns an empty report carrying a `MissingColumn` diagnostic;
    /// malformed rows are skipped and reported as `MalformedValue`.
    fn load(&self) -> anyhow::Result<LoadReport>;
}
