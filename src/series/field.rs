use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SeriesError;
use super::window::AggregatedSample;

/// One averaged sensor channel of the series window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorField {
    Temperature,
    Humidity,
    Smoke,
    Flame,
    Light,
}

impl SensorField {
    pub const ALL: [Self; 5] = [
        Self::Temperature,
        Self::Humidity,
        Self::Smoke,
        Self::Flame,
        Self::Light,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Smoke => "smoke",
            Self::Flame => "flame",
            Self::Light => "light",
        }
    }

    /// Read this field's average out of a sample.
    #[must_use]
    pub const fn value_of(self, sample: &AggregatedSample) -> f64 {
        match self {
            Self::Temperature => sample.avg_temperature_c,
            Self::Humidity => sample.avg_humidity_pct,
            Self::Smoke => sample.avg_smoke,
            Self::Flame => sample.avg_flame_raw,
            Self::Light => sample.avg_light,
        }
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorField {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" => Ok(Self::Temperature),
            "humidity" => Ok(Self::Humidity),
            "smoke" => Ok(Self::Smoke),
            "flame" => Ok(Self::Flame),
            "light" => Ok(Self::Light),
            _ => Err(SeriesError::UnknownField(s.to_string())),
        }
    }
}
