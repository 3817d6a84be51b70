use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SeriesError;
use super::field::SensorField;
use super::risk::CombinedRisk;

/// Chart mode chosen by the viewer.
///
/// `Combined` shows normalized risk scores; every other mode shows one
/// channel in its raw unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    #[default]
    Combined,
    Temperature,
    Smoke,
    Flame,
    Humidity,
    Light,
}

/// Axis metadata a render layer needs to draw a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: &'static str,
    pub unit_label: &'static str,
    pub max: f64,
}

impl ChartView {
    pub const ALL: [Self; 6] = [
        Self::Combined,
        Self::Temperature,
        Self::Smoke,
        Self::Flame,
        Self::Humidity,
        Self::Light,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Temperature => "temperature",
            Self::Smoke => "smoke",
            Self::Flame => "flame",
            Self::Humidity => "humidity",
            Self::Light => "light",
        }
    }

    /// Raw channel shown by this view, `None` for the combined view.
    #[must_use]
    pub const fn raw_field(self) -> Option<SensorField> {
        match self {
            Self::Combined => None,
            Self::Temperature => Some(SensorField::Temperature),
            Self::Smoke => Some(SensorField::Smoke),
            Self::Flame => Some(SensorField::Flame),
            Self::Humidity => Some(SensorField::Humidity),
            Self::Light => Some(SensorField::Light),
        }
    }

    #[must_use]
    pub const fn axis(self) -> AxisSpec {
        match self {
            Self::Combined => AxisSpec {
                title: "Fire risk - combined view",
                unit_label: "Risk (%)",
                max: 100.0,
            },
            Self::Temperature => AxisSpec {
                title: "Temperature - raw",
                unit_label: "Temperature (°C)",
                max: 60.0,
            },
            Self::Smoke => AxisSpec {
                title: "Smoke level - raw",
                unit_label: "Smoke level",
                max: 2000.0,
            },
            Self::Flame => AxisSpec {
                title: "Flame reading - raw",
                unit_label: "Flame value",
                max: 2000.0,
            },
            Self::Humidity => AxisSpec {
                title: "Humidity - raw",
                unit_label: "Humidity (%)",
                max: 100.0,
            },
            Self::Light => AxisSpec {
                title: "Light level - raw",
                unit_label: "Light level",
                max: 5000.0,
            },
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartView {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SeriesError::UnknownView(s.to_string()))
    }
}

/// Current view of one viewing session.
///
/// Every view is reachable from every other in a single `select`, and there
/// is no terminal state. Meant for a render layer that embeds the series
/// module and keeps per-session state; the HTTP API is stateless and takes
/// the view per request through `?view=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSelector {
    current: ChartView,
}

impl ViewSelector {
    #[must_use]
    pub const fn current(&self) -> ChartView {
        self.current
    }

    /// Switch view, returning the previous one.
    pub fn select(&mut self, view: ChartView) -> ChartView {
        let previous = self.current;
        if previous != view {
            tracing::debug!(from = %previous, to = %view, "chart_view_changed");
        }
        self.current = view;
        previous
    }
}

/// Data for one chart view. Each variant has its own rendering path; no
/// series is ever reused under a different label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartProjection {
    Combined {
        labels: Vec<String>,
        risk: CombinedRisk,
    },
    Raw {
        field: SensorField,
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

impl ChartProjection {
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Combined { labels, .. } | Self::Raw { labels, .. } => labels,
        }
    }
}
