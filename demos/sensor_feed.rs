//! Example: Feeding a ward from bedside devices
//!
//! This example replaces the simulated reading generator with a
//! `SensorFeed`. A device thread pushes readings through the feed handle
//! while the ward ticks on its own schedule.
//!
//! One patient's device goes quiet halfway through; once its last reading
//! is older than the stale timeout the ward treats each tick as missed and
//! the offline buffer starts to climb.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example sensor_feed
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use wardwatch_engine::{
    NewPatientFields, SensorFeed, SystemClock, Timestamp, VitalsSnapshot, Ward, WardConfig,
};
use wardwatch_types::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Sensor feed example");
    println!("Two bedside devices, one of which drops out...\n");

    let config = WardConfig {
        miss_probability: 0.0,
        sensor_stale_after_ms: 2_000,
        ..Default::default()
    };
    let clock = Arc::new(SystemClock::new());
    let (feed_handle, feed) = SensorFeed::from_config("bay-2 gateway", &config, clock.clone());

    let ward = Ward::builder()
        .config(config)
        .clock(clock)
        .source(feed)
        .build()?;

    let steady = ward.add_patient(NewPatientFields::new("Emily Davis", 58).device_serial("SN-WARD-2001"))?;
    let flaky = ward.add_patient(NewPatientFields::new("Chris Garcia", 72).device_serial("SN-WARD-2002"))?;

    // Device gateway: pushes a reading for each bed every 500ms
    let devices = feed_handle.clone();
    thread::spawn(move || {
        for step in 0u16..40 {
            devices.push(steady, VitalsSnapshot::baseline().with_heart_rate(70 + step % 5));
            if step < 10 {
                // Deteriorating until the device drops off
                devices.push(
                    flaky,
                    VitalsSnapshot::baseline()
                        .with_heart_rate(110 + step * 2)
                        .with_oxygen_saturation(95 - (step / 3) as u8),
                );
            }
            thread::sleep(Duration::from_millis(500));
        }
    });

    ward.start_ticking(Duration::from_secs(1))?;
    let mut updates = ward.subscribe();

    for _ in 0..12 {
        updates.changed().await?;
        let roster = updates.borrow_and_update().clone();
        for patient in roster.iter() {
            println!(
                "tick {:>2}  {:<14} HR {:>3}  SpO2 {:>3}  {:<8}  buffer {:>3}%  alert: {}",
                roster.tick,
                patient.name(),
                patient.vitals.heart_rate,
                patient.vitals.oxygen_saturation,
                patient.triage,
                patient.offline_buffer,
                patient.alert.label(),
            );
        }

        if roster.get(flaky).is_some_and(|p| p.alert.needs_attention()) {
            let actor = Role::Admin.acknowledger_label();
            ward.acknowledge(flaky, actor)?;
            println!("          {} acknowledged the alert for {}", actor, flaky);
        }
    }

    ward.stop_ticking();

    let history = ward.query_history(steady, Timestamp::EPOCH)?;
    println!("\n{} points recorded for {}", history.len(), steady);
    Ok(())
}
