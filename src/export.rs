//! One-shot JSON export of a roster.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use wardwatch_types::Roster;

/// Build the `{summary, patients, alerts}` document for a roster.
pub fn export_document(roster: &Roster) -> Value {
    let patients: Vec<Value> = roster
        .triage_ordered("")
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name(),
                "age": p.profile.age,
                "condition": p.condition.to_string(),
                "triage": p.triage.to_string(),
                "vitals": p.vitals,
                "blood_pressure": p.vitals.blood_pressure.to_string(),
                "offline_buffer": p.offline_buffer,
                "device_serial": p.profile.device_serial,
                "alert": p.alert.label(),
                "acknowledged_by": p.acknowledgement().map(|a| a.acknowledged_by.clone()),
                "history_points": p.history.len(),
                "last_updated": p.last_updated,
                "notes": p.notes,
            })
        })
        .collect();

    let alerts: Vec<Value> = roster
        .active_alerts()
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name(),
                "raised_at": p.alert.raised_at(),
                "heart_rate": p.vitals.heart_rate,
                "oxygen_saturation": p.vitals.oxygen_saturation,
            })
        })
        .collect();

    json!({
        "version": roster.version,
        "tick": roster.tick,
        "published_at": roster.published_at,
        "summary": roster.summary(),
        "patients": patients,
        "alerts": alerts,
    })
}

/// Write the export document for `roster` to `path` as pretty JSON.
pub fn export_to_file(roster: &Roster, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&export_document(roster))?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    Ok(())
}
