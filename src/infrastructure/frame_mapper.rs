// Mapper to convert telemetry frames to the dashboard's JSON rows
use crate::domain::telemetry::{TelemetryFrame, UnitSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FrameDto {
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<UnitRowDto>,
}

/// One dashboard table row, keyed by the console's column names
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UnitRowDto {
    pub membrane: usize,
    #[serde(rename = "NTFlowLive")]
    pub nt_flow_live: String,
    #[serde(rename = "NTPHLive")]
    pub nt_ph_live: String,
    pub pre_inlet_pressure: String,
    pub pre_outlet_pressure: String,
    pub total_membrane_weight: String,
    pub circulation_live_time: String,
    pub soaking_live_time: String,
    #[serde(rename = "ActualCIPHours")]
    pub actual_cip_hours: String,
    pub circulation_set_time: String,
    pub soaking_set_time: String,
}

pub fn frame_to_dto(frame: &TelemetryFrame) -> FrameDto {
    let rows = frame
        .units
        .iter()
        .enumerate()
        .map(|(index, unit)| unit_to_row(index, unit))
        .collect();

    FrameDto {
        sequence: frame.sequence,
        generated_at: frame.generated_at,
        rows,
    }
}

fn unit_to_row(index: usize, unit: &UnitSnapshot) -> UnitRowDto {
    UnitRowDto {
        membrane: index + 1,
        nt_flow_live: format_reading(unit.flow_rate),
        nt_ph_live: format_reading(unit.ph),
        pre_inlet_pressure: format_reading(unit.inlet_pressure),
        pre_outlet_pressure: format_reading(unit.outlet_pressure),
        total_membrane_weight: format_reading(unit.total_weight),
        circulation_live_time: format_reading(unit.circulation_time),
        soaking_live_time: format_reading(unit.soaking_time),
        actual_cip_hours: unit.actual_cip_hours.clone(),
        circulation_set_time: unit.circulation_set_time.clone(),
        soaking_set_time: unit.soaking_set_time.clone(),
    }
}

/// One decimal place for display only
fn format_reading(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::OverrideInputs;

    fn snapshot(value: f64) -> UnitSnapshot {
        UnitSnapshot::sample(|_| value, &OverrideInputs::default())
    }

    #[test]
    fn test_rows_are_numbered_from_one() {
        let frame = TelemetryFrame::new(4, vec![snapshot(1.0), snapshot(2.0), snapshot(3.0)]);
        let dto = frame_to_dto(&frame);

        assert_eq!(dto.sequence, 4);
        let membranes: Vec<usize> = dto.rows.iter().map(|r| r.membrane).collect();
        assert_eq!(membranes, vec![1, 2, 3]);
    }

    #[test]
    fn test_readings_rounded_to_one_decimal() {
        let frame = TelemetryFrame::new(1, vec![snapshot(54.349)]);
        let dto = frame_to_dto(&frame);
        let row = &dto.rows[0];
        assert_eq!(row.nt_flow_live, "54.3");
        assert_eq!(row.soaking_live_time, "54.3");

        let frame = TelemetryFrame::new(1, vec![snapshot(7.0)]);
        assert_eq!(frame_to_dto(&frame).rows[0].nt_ph_live, "7.0");
    }

    #[test]
    fn test_serializes_console_column_names() {
        let mut overrides = OverrideInputs::default();
        overrides.actual_cip_hours = "12".to_string();
        let unit = UnitSnapshot::sample(|range| range.lo, &overrides);
        let frame = TelemetryFrame::new(1, vec![unit]);

        let json = serde_json::to_value(frame_to_dto(&frame)).unwrap();
        let row = &json["rows"][0];
        assert_eq!(row["Membrane"], 1);
        assert_eq!(row["NTFlowLive"], "10.0");
        assert_eq!(row["NTPHLive"], "6.0");
        assert_eq!(row["PreInletPressure"], "20.0");
        assert_eq!(row["TotalMembraneWeight"], "50.0");
        assert_eq!(row["ActualCIPHours"], "12");
        assert_eq!(row["CirculationSetTime"], "-");
        assert_eq!(row["SoakingSetTime"], "-");
    }
}
