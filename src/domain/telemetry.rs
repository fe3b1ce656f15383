// Telemetry domain models
use super::metrics::{
    CIRCULATION_TIME, FLOW_RATE, INLET_PRESSURE, MetricRange, OUTLET_PRESSURE, PH, SOAKING_TIME,
    TOTAL_WEIGHT,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Placeholder shown for an override the operator has not filled in
pub const UNSET_PLACEHOLDER: &str = "-";

/// Operator-entered fields broadcast to every unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverrideField {
    #[serde(rename = "ActualCIPHours")]
    ActualCipHours,
    #[serde(rename = "CirculationSetTime")]
    CirculationSetTime,
    #[serde(rename = "SoakingSetTime")]
    SoakingSetTime,
}

impl OverrideField {
    pub const ALL: [OverrideField; 3] = [
        OverrideField::ActualCipHours,
        OverrideField::CirculationSetTime,
        OverrideField::SoakingSetTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideField::ActualCipHours => "ActualCIPHours",
            OverrideField::CirculationSetTime => "CirculationSetTime",
            OverrideField::SoakingSetTime => "SoakingSetTime",
        }
    }
}

impl fmt::Display for OverrideField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown override field: {0}")]
pub struct UnknownOverrideField(pub String);

impl FromStr for OverrideField {
    type Err = UnknownOverrideField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OverrideField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownOverrideField(s.to_string()))
    }
}

/// Raw override text as typed. Empty means unset; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideInputs {
    #[serde(rename = "ActualCIPHours")]
    pub actual_cip_hours: String,
    #[serde(rename = "CirculationSetTime")]
    pub circulation_set_time: String,
    #[serde(rename = "SoakingSetTime")]
    pub soaking_set_time: String,
}

impl OverrideInputs {
    pub fn get(&self, field: OverrideField) -> &str {
        match field {
            OverrideField::ActualCipHours => &self.actual_cip_hours,
            OverrideField::CirculationSetTime => &self.circulation_set_time,
            OverrideField::SoakingSetTime => &self.soaking_set_time,
        }
    }

    pub fn set(&mut self, field: OverrideField, value: impl Into<String>) {
        let slot = match field {
            OverrideField::ActualCipHours => &mut self.actual_cip_hours,
            OverrideField::CirculationSetTime => &mut self.circulation_set_time,
            OverrideField::SoakingSetTime => &mut self.soaking_set_time,
        };
        *slot = value.into();
    }

    /// Value as displayed in a frame
    pub fn rendered(&self, field: OverrideField) -> String {
        match self.get(field) {
            "" => UNSET_PLACEHOLDER.to_string(),
            value => value.to_string(),
        }
    }
}

/// One synthetic reading for a single membrane unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub flow_rate: f64,
    pub ph: f64,
    pub inlet_pressure: f64,
    pub outlet_pressure: f64,
    pub total_weight: f64,
    pub circulation_time: f64,
    pub soaking_time: f64,
    pub actual_cip_hours: String,
    pub circulation_set_time: String,
    pub soaking_set_time: String,
}

impl UnitSnapshot {
    /// Draws every measurement through `draw` and copies the overrides in.
    pub fn sample<F>(mut draw: F, overrides: &OverrideInputs) -> Self
    where
        F: FnMut(MetricRange) -> f64,
    {
        Self {
            flow_rate: draw(FLOW_RATE),
            ph: draw(PH),
            inlet_pressure: draw(INLET_PRESSURE),
            outlet_pressure: draw(OUTLET_PRESSURE),
            total_weight: draw(TOTAL_WEIGHT),
            circulation_time: draw(CIRCULATION_TIME),
            soaking_time: draw(SOAKING_TIME),
            actual_cip_hours: overrides.rendered(OverrideField::ActualCipHours),
            circulation_set_time: overrides.rendered(OverrideField::CirculationSetTime),
            soaking_set_time: overrides.rendered(OverrideField::SoakingSetTime),
        }
    }

    /// Measurements paired with the range they were drawn from
    #[cfg(test)]
    pub fn readings(&self) -> [(f64, MetricRange); 7] {
        [
            (self.flow_rate, FLOW_RATE),
            (self.ph, PH),
            (self.inlet_pressure, INLET_PRESSURE),
            (self.outlet_pressure, OUTLET_PRESSURE),
            (self.total_weight, TOTAL_WEIGHT),
            (self.circulation_time, CIRCULATION_TIME),
            (self.soaking_time, SOAKING_TIME),
        ]
    }

    #[cfg(test)]
    pub fn override_value(&self, field: OverrideField) -> &str {
        match field {
            OverrideField::ActualCipHours => &self.actual_cip_hours,
            OverrideField::CirculationSetTime => &self.circulation_set_time,
            OverrideField::SoakingSetTime => &self.soaking_set_time,
        }
    }
}

/// All unit snapshots produced by one tick
#[derive(Debug, Clone)]
pub struct TelemetryFrame {
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,
    pub units: Vec<UnitSnapshot>,
}

impl TelemetryFrame {
    /// Frame shown before the first tick
    pub fn empty() -> Self {
        Self {
            sequence: 0,
            generated_at: Utc::now(),
            units: Vec::new(),
        }
    }

    pub fn new(sequence: u64, units: Vec<UnitSnapshot>) -> Self {
        Self {
            sequence,
            generated_at: Utc::now(),
            units,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.units.len()
    }
}
