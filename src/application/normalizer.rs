// Data normalizer - Groups raw observations into per-processor series
use crate::domain::error::ChartError;
use crate::domain::observation::Observation;
use crate::domain::series::{Series, SeriesMap};
use indexmap::IndexMap;

/// Group observations by processor and order each group by thread count.
///
/// Processors keep their first-appearance order. Observations sharing a processor and
/// thread count collapse to the one that appears last in the input. A series takes the
/// manufacturer of its processor's first observation.
pub fn normalize(observations: &[Observation]) -> Result<SeriesMap, ChartError> {
    if observations.is_empty() {
        tracing::warn!("No observations to normalize");
        return Err(ChartError::EmptyInput);
    }

    let mut groups: IndexMap<&str, Vec<&Observation>> = IndexMap::new();
    for observation in observations {
        groups
            .entry(observation.processor.as_str())
            .or_default()
            .push(observation);
    }

    let mut series_map = SeriesMap::with_capacity(groups.len());
    for (processor, mut group) in groups {
        let manufacturer = group[0].manufacturer;
        if let Some(other) = group.iter().find(|o| o.manufacturer != manufacturer) {
            tracing::warn!(
                "Processor '{}' is listed as both {} and {}; using {}",
                processor,
                manufacturer.label(),
                other.manufacturer.label(),
                manufacturer.label()
            );
        }

        // Stable, so equal thread counts stay in input order and the last one wins.
        group.sort_by_key(|o| o.threads);

        let mut series = Series::new(processor.to_string(), manufacturer);
        for observation in group {
            series.push(observation.threads, observation.om_time, observation.sa_time);
        }

        tracing::debug!("Normalized {} points for '{}'", series.threads.len(), processor);
        series_map.insert(processor.to_string(), series);
    }

    Ok(series_map)
}
