// Benchmark observation domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two benchmarked algorithms. OM is metric A, SA is metric B.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Om,
    Sa,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Om, Metric::Sa];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Om => "OM",
            Metric::Sa => "SA",
        }
    }

    pub fn default_column(&self) -> &'static str {
        match self {
            Metric::Om => "OM_Time",
            Metric::Sa => "SA_Time",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Manufacturer {
    Intel,
    Amd,
    Other,
}

impl Manufacturer {
    /// Infer the manufacturer from a processor name.
    ///
    /// "Intel" is checked before "AMD"/"Ryzen"; a name matching both is reported
    /// as ambiguous and resolved as Intel.
    pub fn infer(processor: &str) -> Self {
        let intel = processor.contains("Intel");
        let amd = processor.contains("AMD") || processor.contains("Ryzen");

        if intel && amd {
            tracing::warn!(
                "Processor name '{}' matches both Intel and AMD; treating it as Intel",
                processor
            );
        }

        if intel {
            Manufacturer::Intel
        } else if amd {
            Manufacturer::Amd
        } else {
            Manufacturer::Other
        }
    }

    /// Label written to and read from the `Manufacturer` column.
    pub fn label(&self) -> &'static str {
        match self {
            Manufacturer::Intel => "Intel",
            Manufacturer::Amd => "AMD",
            Manufacturer::Other => "Other",
        }
    }

    /// Parse an explicit manufacturer label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "intel" => Some(Manufacturer::Intel),
            "amd" => Some(Manufacturer::Amd),
            "other" => Some(Manufacturer::Other),
            _ => None,
        }
    }
}

/// One benchmark measurement: both algorithms timed on one processor at one thread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub processor: String,
    pub manufacturer: Manufacturer,
    pub threads: u32,
    pub om_time: f64,
    pub sa_time: f64,
}

impl Observation {
    pub fn new(processor: impl Into<String>, threads: u32, om_time: f64, sa_time: f64) -> Self {
        let processor = processor.into();
        let manufacturer = Manufacturer::infer(&processor);
        Self {
            processor,
            manufacturer,
            threads,
            om_time,
            sa_time,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: Manufacturer) -> Self {
        self.manufacturer = manufacturer;
        self
    }
}
