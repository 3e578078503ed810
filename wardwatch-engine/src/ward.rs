//! The ward orchestrator.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};
use wardwatch_types::{
    Condition, HistoryPoint, HistoryWindow, NewPatientFields, PatientId, PatientMonitoringState,
    Roster, Timestamp,
};

use crate::alert::{self, AlertEvent};
use crate::classifier::TriageThresholds;
use crate::clock::{Clock, SystemClock};
use crate::config::WardConfig;
use crate::demo::demo_roster;
use crate::error::WardError;
use crate::generator::ReadingGenerator;
use crate::output::Output;
use crate::pipeline::Pipeline;
use crate::random::{RandomSource, SeededRandom};
use crate::source::{ReadingSource, SimulatedSource};

/// Owner of a ward's monitoring state.
///
/// A `Ward` is a cheap, cloneable handle. Every mutation (ticks and
/// commands alike) is applied under one lock and finished by publishing a
/// new immutable [`Roster`]; readers only ever see whole rosters.
///
/// # Example
///
/// ```rust
/// use wardwatch_engine::{ManualClock, Ward, WardConfig};
/// use wardwatch_types::{NewPatientFields, Timestamp};
/// use std::sync::Arc;
///
/// let ward = Ward::builder()
///     .config(WardConfig { seed: Some(7), ..Default::default() })
///     .clock(Arc::new(ManualClock::new(Timestamp::from_secs(1))))
///     .build()
///     .unwrap();
///
/// let id = ward.add_patient(NewPatientFields::new("Jane Doe", 54)).unwrap();
/// ward.tick();
///
/// let roster = ward.roster();
/// assert_eq!(roster.tick, 1);
/// assert!(roster.get(id).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Ward {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    core: Mutex<WardCore>,
    published: RwLock<Arc<Roster>>,
    clock: Arc<dyn Clock>,
    config: WardConfig,
    outputs: Vec<Output>,
    #[cfg(feature = "tokio")]
    updates: tokio::sync::watch::Sender<Arc<Roster>>,
    #[cfg(feature = "tokio")]
    driver: Mutex<Option<TickHandle>>,
}

/// State touched only while the mutation lock is held.
#[derive(Debug)]
struct WardCore {
    pipeline: Pipeline,
    source: Box<dyn ReadingSource>,
    rng: Box<dyn RandomSource>,
}

/// Points of one patient's history at or after an instant.
///
/// Holds the roster it was taken from, so it stays valid (and unchanged)
/// while the ward keeps ticking. Iteration is lazy and can be repeated.
#[derive(Debug, Clone)]
pub struct HistorySlice {
    roster: Arc<Roster>,
    index: usize,
    since: Timestamp,
}

impl HistorySlice {
    pub fn patient_id(&self) -> PatientId {
        self.window_owner().id
    }

    pub fn since(&self) -> Timestamp {
        self.since
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, HistoryPoint> {
        self.window().query(self.since)
    }

    pub fn len(&self) -> usize {
        self.iter().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn window_owner(&self) -> &PatientMonitoringState {
        &self.roster.patients[self.index]
    }

    fn window(&self) -> &HistoryWindow {
        &self.window_owner().history
    }
}

impl<'a> IntoIterator for &'a HistorySlice {
    type Item = &'a HistoryPoint;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Ward {
    pub fn builder() -> WardBuilder {
        WardBuilder::new()
    }

    /// The latest published roster.
    pub fn roster(&self) -> Arc<Roster> {
        self.shared.published.read().clone()
    }

    pub fn config(&self) -> &WardConfig {
        &self.shared.config
    }

    /// Watch published rosters. The receiver always holds the latest one.
    #[cfg(feature = "tokio")]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Arc<Roster>> {
        self.shared.updates.subscribe()
    }

    /// Admit a patient and return its new id.
    ///
    /// The patient starts on the baseline snapshot with stable triage and no
    /// alert. When `seed_history_days` is configured the history is
    /// backfilled, the current vitals continue from its last point and are
    /// classified, and the alert still starts clear.
    pub fn add_patient(&self, fields: NewPatientFields) -> Result<PatientId, WardError> {
        let name = fields.name.trim().to_string();
        if name.is_empty() {
            return Err(WardError::InvalidInput("patient name is empty".to_string()));
        }
        if fields.age == 0 {
            return Err(WardError::InvalidInput(
                "patient age must be positive".to_string(),
            ));
        }

        let mut core = self.shared.core.lock();
        let current = self.roster();
        let now = self.shared.clock.now();
        let id = current
            .next_id()
            .ok_or_else(|| WardError::InvalidInput("no patient ids left".to_string()))?;
        let capacity = self.shared.config.history_capacity;

        let mut patient =
            PatientMonitoringState::admit(id, NewPatientFields { name, ..fields }, now, capacity);

        let days = self.shared.config.seed_history_days;
        if days > 0 {
            let points =
                ReadingGenerator::seeding().seed_history(patient.vitals, days, now, core.rng.as_mut());
            if let Some(last) = points.last() {
                patient.vitals = last.vitals;
                patient.triage = core.pipeline.thresholds.classify(&patient.vitals);
            }
            patient.history = HistoryWindow::from_points(capacity, points)
                .map_err(|e| WardError::InvalidInput(e.to_string()))?;
        }

        info!(patient = %id, name = %patient.name(), "Admitted patient");

        let mut roster = (*current).clone();
        roster.patients.push(patient);
        roster.published_at = now;
        self.publish(roster);
        Ok(id)
    }

    /// Acknowledge a patient's raised alert on behalf of `actor`.
    ///
    /// Returns `false` without publishing when there is nothing to
    /// acknowledge (no alert, or already acknowledged).
    pub fn acknowledge(&self, id: PatientId, actor: &str) -> Result<bool, WardError> {
        self.update_patient(id, |patient, now| {
            let Some(next) = alert::acknowledge(&patient.alert, actor, now) else {
                return false;
            };
            info!(patient = %id, actor, "Alert acknowledged");
            patient.alert = next;
            true
        })
    }

    /// Replace a patient's notes.
    pub fn edit_notes(&self, id: PatientId, text: impl Into<String>) -> Result<(), WardError> {
        let text = text.into();
        self.update_patient(id, move |patient, _| {
            patient.notes = text;
            true
        })
        .map(|_| ())
    }

    /// Change a patient's condition. `Discharged` stops ticking the patient;
    /// any other condition resumes it.
    pub fn set_condition(&self, id: PatientId, condition: Condition) -> Result<(), WardError> {
        self.update_patient(id, |patient, _| {
            if patient.condition == condition {
                return false;
            }
            info!(patient = %id, from = %patient.condition, to = %condition, "Condition changed");
            patient.condition = condition;
            true
        })
        .map(|_| ())
    }

    /// A patient's history points with `timestamp >= since`, oldest first.
    pub fn query_history(&self, id: PatientId, since: Timestamp) -> Result<HistorySlice, WardError> {
        let roster = self.roster();
        let index = roster.position(id).ok_or(WardError::NotFound(id))?;
        Ok(HistorySlice {
            roster,
            index,
            since,
        })
    }

    /// Apply one tick to every active patient and publish the result.
    ///
    /// Patients are processed in roster order. A fault while ticking one
    /// patient is logged and that patient keeps its previous state.
    pub fn tick(&self) -> Arc<Roster> {
        let mut core = self.shared.core.lock();
        let current = self.roster();
        let now = self.shared.clock.now();

        let WardCore {
            pipeline,
            source,
            rng,
        } = &mut *core;

        let mut faults = 0usize;
        let patients = current
            .patients
            .iter()
            .map(|patient| {
                if patient.is_discharged() {
                    return patient.clone();
                }
                match pipeline.tick_patient(patient, now, source.as_mut(), rng.as_mut()) {
                    Ok(outcome) => {
                        match outcome.event {
                            Some(AlertEvent::Raised) => {
                                info!(patient = %patient.id, name = %patient.name(), "Critical alert raised")
                            }
                            Some(AlertEvent::Cleared) => {
                                info!(patient = %patient.id, triage = %outcome.state.triage, "Alert cleared")
                            }
                            None => {}
                        }
                        outcome.state
                    }
                    Err(fault) => {
                        faults += 1;
                        warn!(patient = %patient.id, error = %fault, "Tick failed, keeping previous state");
                        patient.clone()
                    }
                }
            })
            .collect();

        let roster = Roster {
            version: current.version,
            tick: current.tick + 1,
            published_at: now,
            patients,
        };
        debug!(tick = roster.tick, patients = roster.len(), faults, "Tick applied");
        self.publish(roster)
    }

    /// Start the periodic tick driver.
    ///
    /// Returns `Ok(false)` if it is already running. The first tick happens
    /// one `interval` after starting. Must be called from within a tokio
    /// runtime.
    #[cfg(feature = "tokio")]
    pub fn start_ticking(&self, interval: Duration) -> Result<bool, WardError> {
        use tokio::sync::watch;
        use tokio::time::MissedTickBehavior;

        if interval.is_zero() {
            return Err(WardError::InvalidInput(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| WardError::InvalidInput(format!("no tokio runtime: {}", e)))?;

        let mut driver = self.shared.driver.lock();
        if driver.is_some() {
            return Ok(false);
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        runtime.spawn(async move {
            let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = timer.tick() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                        let Some(shared) = weak.upgrade() else {
                            break;
                        };
                        let ward = Ward { shared };
                        let roster = ward.tick();
                        for output in ward.shared.outputs.iter() {
                            if let Err(e) = output.emit(&roster).await {
                                warn!(error = %e, "Failed to emit roster");
                            }
                        }
                    }
                }
            }
            debug!("Tick driver stopped");
        });

        info!(interval_ms = interval.as_millis() as u64, "Tick driver started");
        *driver = Some(TickHandle { stop_tx });
        Ok(true)
    }

    /// Stop the periodic tick driver. Returns `false` if it was not running.
    ///
    /// A tick is applied atomically under the mutation lock, so stopping
    /// never leaves a roster half-updated.
    #[cfg(feature = "tokio")]
    pub fn stop_ticking(&self) -> bool {
        match self.shared.driver.lock().take() {
            Some(handle) => {
                handle.stop();
                info!("Tick driver stopping");
                true
            }
            None => false,
        }
    }

    #[cfg(feature = "tokio")]
    pub fn is_ticking(&self) -> bool {
        self.shared.driver.lock().is_some()
    }

    /// Apply `f` to one patient and publish if it reports a change.
    fn update_patient<F>(&self, id: PatientId, f: F) -> Result<bool, WardError>
    where
        F: FnOnce(&mut PatientMonitoringState, Timestamp) -> bool,
    {
        let _core = self.shared.core.lock();
        let current = self.roster();
        let index = current.position(id).ok_or(WardError::NotFound(id))?;
        let now = self.shared.clock.now();

        let mut patient = current.patients[index].clone();
        if !f(&mut patient, now) {
            return Ok(false);
        }

        let mut roster = (*current).clone();
        roster.patients[index] = patient;
        roster.published_at = now;
        self.publish(roster);
        Ok(true)
    }

    fn publish(&self, roster: Roster) -> Arc<Roster> {
        let roster = Arc::new(roster);
        *self.shared.published.write() = roster.clone();
        #[cfg(feature = "tokio")]
        self.shared.updates.send_replace(roster.clone());
        roster
    }
}

/// Builder for configuring a [`Ward`].
#[derive(Debug, Default)]
pub struct WardBuilder {
    config: WardConfig,
    clock: Option<Arc<dyn Clock>>,
    random: Option<Box<dyn RandomSource>>,
    source: Option<Box<dyn ReadingSource>>,
    thresholds: TriageThresholds,
    outputs: Vec<Output>,
    patients: Vec<PatientMonitoringState>,
    restored: Option<Roster>,
    demo: bool,
}

impl WardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: WardConfig) -> Self {
        self.config = config;
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to a [`SeededRandom`] using `config.seed`, or entropy.
    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Defaults to [`SimulatedSource`].
    pub fn source(mut self, source: impl ReadingSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn thresholds(mut self, thresholds: TriageThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Add an output for the tick driver. Multiple outputs can be added.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Start from an existing set of patients.
    pub fn patients(mut self, patients: Vec<PatientMonitoringState>) -> Self {
        self.patients = patients;
        self
    }

    /// Resume from a previously published roster, keeping its patients and
    /// tick count. Takes precedence over [`patients`](Self::patients) and
    /// [`demo_roster`](Self::demo_roster).
    pub fn resume(mut self, roster: Roster) -> Self {
        self.restored = Some(roster);
        self
    }

    /// Populate the ward with a generated demo roster at build time.
    pub fn demo_roster(mut self) -> Self {
        self.demo = true;
        self
    }

    pub fn build(self) -> Result<Ward, WardError> {
        let config = self.config;
        config.validate()?;

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };
        let mut rng: Box<dyn RandomSource> = match self.random {
            Some(random) => random,
            None => Box::new(match config.seed {
                Some(seed) => SeededRandom::from_seed(seed),
                None => SeededRandom::from_entropy(),
            }),
        };
        let source: Box<dyn ReadingSource> = match self.source {
            Some(source) => source,
            None => Box::new(SimulatedSource::default()),
        };

        let now = clock.now();
        let (patients, tick) = match self.restored {
            Some(roster) => {
                if !roster.version.can_restore() {
                    return Err(WardError::InvalidInput(format!(
                        "roster schema {} cannot be restored",
                        roster.version
                    )));
                }
                (roster.patients, roster.tick)
            }
            None if self.demo => {
                let patients = demo_roster(
                    config.demo_patients,
                    config.demo_history_days,
                    config.history_capacity,
                    now,
                    rng.as_mut(),
                );
                (patients, 0)
            }
            None => (self.patients, 0),
        };

        for patient in &patients {
            patient.history.check().map_err(|e| {
                WardError::InvalidInput(format!("patient {} history: {}", patient.id, e))
            })?;
        }

        let mut ids: Vec<PatientId> = patients.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(WardError::InvalidInput(format!(
                "duplicate patient id {}",
                pair[0]
            )));
        }

        info!(
            patients = patients.len(),
            source = source.description(),
            "Ward ready"
        );

        let roster = Arc::new(Roster {
            tick,
            ..Roster::new(patients, now)
        });
        #[cfg(feature = "tokio")]
        let (updates, _) = tokio::sync::watch::channel(roster.clone());

        Ok(Ward {
            shared: Arc::new(Shared {
                core: Mutex::new(WardCore {
                    pipeline: Pipeline::new(config.connectivity(), self.thresholds),
                    source,
                    rng,
                }),
                published: RwLock::new(roster),
                clock,
                config,
                outputs: self.outputs,
                #[cfg(feature = "tokio")]
                updates,
                #[cfg(feature = "tokio")]
                driver: Mutex::new(None),
            }),
        })
    }
}

/// Handle for stopping the tick driver.
///
/// Dropping it also stops the driver.
#[cfg(feature = "tokio")]
#[derive(Debug)]
struct TickHandle {
    stop_tx: tokio::sync::watch::Sender<bool>,
}

#[cfg(feature = "tokio")]
impl TickHandle {
    fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::clock::ManualClock;
    use crate::random::ScriptedRandom;
    use crate::source::{SensorFeed, SensorFeedHandle};
    use wardwatch_types::{AlertState, Role, TriageLevel, VitalsSnapshot};

    // Connectivity draws: 0.99 is always delivered, 0.0 always missed.
    const DELIVER: f64 = 0.99;
    const MISS: f64 = 0.0;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Timestamp::from_secs(1_700_000_000)))
    }

    fn sensor_ward(clock: &Arc<ManualClock>) -> (Ward, SensorFeedHandle) {
        sensor_ward_with(clock, WardConfig::default())
    }

    fn sensor_ward_with(clock: &Arc<ManualClock>, config: WardConfig) -> (Ward, SensorFeedHandle) {
        let (handle, feed) = SensorFeed::from_config("test", &config, clock.clone());
        let ward = Ward::builder()
            .config(config)
            .clock(clock.clone())
            .random(ScriptedRandom::repeat(DELIVER))
            .source(feed)
            .build()
            .unwrap();
        (ward, handle)
    }

    #[test]
    fn new_patient_defaults() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        let id = ward.add_patient(NewPatientFields::new("  Jane Doe ", 54)).unwrap();

        assert_eq!(id, PatientId(1));
        let roster = ward.roster();
        let patient = roster.get(id).unwrap();
        assert_eq!(patient.name(), "Jane Doe");
        assert_eq!(patient.vitals, VitalsSnapshot::baseline());
        assert_eq!(patient.triage, TriageLevel::Stable);
        assert_eq!(patient.alert, AlertState::Clear);
        assert!(patient.history.is_empty());
    }

    #[test]
    fn ids_follow_highest_existing() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        let a = ward.add_patient(NewPatientFields::new("A", 30)).unwrap();
        let b = ward.add_patient(NewPatientFields::new("B", 31)).unwrap();
        assert_eq!((a, b), (PatientId(1), PatientId(2)));
    }

    #[test]
    fn add_patient_rejects_bad_fields() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        assert!(matches!(
            ward.add_patient(NewPatientFields::new("   ", 40)),
            Err(WardError::InvalidInput(_))
        ));
        assert!(matches!(
            ward.add_patient(NewPatientFields::new("Alex Brown", 0)),
            Err(WardError::InvalidInput(_))
        ));
        assert!(ward.roster().is_empty());
    }

    #[test]
    fn seeded_history_for_new_patients() {
        let ward = Ward::builder()
            .config(WardConfig {
                seed_history_days: 1,
                seed: Some(1),
                ..Default::default()
            })
            .clock(clock())
            .build()
            .unwrap();
        let id = ward.add_patient(NewPatientFields::new("Chris Jones", 70)).unwrap();

        let roster = ward.roster();
        let patient = roster.get(id).unwrap();
        assert_eq!(patient.history.len(), 96);
        assert_eq!(patient.history.latest().map(|p| p.vitals), Some(patient.vitals));
        assert_eq!(patient.triage, classify(&patient.vitals));
        assert_eq!(patient.alert, AlertState::Clear);
    }

    #[test]
    fn add_patient_fails_when_ids_run_out() {
        let last = PatientMonitoringState::admit(
            PatientId(u64::MAX),
            NewPatientFields::new("Last Bed", 40),
            Timestamp::EPOCH,
            4,
        );
        let ward = Ward::builder().clock(clock()).patients(vec![last]).build().unwrap();
        assert!(matches!(
            ward.add_patient(NewPatientFields::new("One More", 41)),
            Err(WardError::InvalidInput(_))
        ));
        assert_eq!(ward.roster().len(), 1);
    }

    #[test]
    fn resume_from_saved_roster() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let id = ward.add_patient(NewPatientFields::new("Laura Smith", 47)).unwrap();
        for hr in [80u16, 82, 84] {
            clock.advance(Duration::from_secs(2));
            feed.push(id, VitalsSnapshot::baseline().with_heart_rate(hr));
            ward.tick();
        }

        let saved = serde_json::to_string(&*ward.roster()).unwrap();
        let roster: Roster = serde_json::from_str(&saved).unwrap();
        let resumed = Ward::builder().clock(clock.clone()).resume(roster).build().unwrap();

        assert_eq!(resumed.roster().tick, 3);
        assert_eq!(resumed.roster().get(id), ward.roster().get(id));
        assert_eq!(
            resumed.add_patient(NewPatientFields::new("Next", 50)).unwrap(),
            PatientId(2)
        );
    }

    #[test]
    fn resume_rejects_other_major_version() {
        let mut roster = Roster::new(Vec::new(), Timestamp::EPOCH);
        roster.version.major += 1;
        let result = Ward::builder().clock(clock()).resume(roster).build();
        assert!(matches!(result, Err(WardError::InvalidInput(_))));
    }

    #[test]
    fn saved_roster_with_unordered_history_is_rejected() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let id = ward.add_patient(NewPatientFields::new("Emily Jones", 63)).unwrap();
        for hr in [70u16, 71] {
            clock.advance(Duration::from_secs(2));
            feed.push(id, VitalsSnapshot::baseline().with_heart_rate(hr));
            ward.tick();
        }

        let mut saved = serde_json::to_value(&*ward.roster()).unwrap();
        saved["patients"][0]["history"]["points"]
            .as_array_mut()
            .unwrap()
            .reverse();
        assert!(serde_json::from_value::<Roster>(saved).is_err());
    }

    #[test]
    fn acknowledged_alert_clears_on_recovery() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let id = ward.add_patient(NewPatientFields::new("Sarah Miller", 67)).unwrap();

        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(130));
        clock.advance(Duration::from_secs(2));
        ward.tick();
        assert!(matches!(
            ward.roster().get(id).unwrap().alert,
            AlertState::Unacknowledged { .. }
        ));

        clock.advance(Duration::from_secs(1));
        let actor = Role::Admin.acknowledger_label();
        assert!(ward.acknowledge(id, actor).unwrap());
        let acknowledged = ward.roster().get(id).unwrap().alert.clone();
        assert_eq!(
            acknowledged.acknowledgement().map(|a| a.acknowledged_by.as_str()),
            Some("Doctor")
        );

        // Repeat acknowledgements change nothing.
        clock.advance(Duration::from_secs(1));
        assert!(!ward.acknowledge(id, "Nurse").unwrap());
        assert_eq!(ward.roster().get(id).unwrap().alert, acknowledged);

        // Still critical: stays acknowledged.
        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(128));
        ward.tick();
        assert_eq!(ward.roster().get(id).unwrap().alert, acknowledged);

        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(105));
        clock.advance(Duration::from_secs(2));
        ward.tick();
        let patient = ward.roster().get(id).unwrap().clone();
        assert_eq!(patient.triage, TriageLevel::Observe);
        assert_eq!(patient.alert, AlertState::Clear);
        assert!(patient.acknowledgement().is_none());
    }

    #[test]
    fn three_missed_ticks_freeze_the_patient() {
        let clock = clock();
        let ward = Ward::builder()
            .clock(clock.clone())
            .random(ScriptedRandom::repeat(MISS))
            .build()
            .unwrap();
        let id = ward.add_patient(NewPatientFields::new("David Davis", 45)).unwrap();
        let before = ward.roster().get(id).unwrap().clone();

        let mut buffers = Vec::new();
        for _ in 0..3 {
            clock.advance(Duration::from_secs(2));
            let roster = ward.tick();
            let patient = roster.get(id).unwrap();
            buffers.push(patient.offline_buffer);
            assert_eq!(patient.vitals, before.vitals);
            assert_eq!(patient.history, before.history);
            assert_eq!(patient.triage, before.triage);
        }
        assert_eq!(buffers, vec![10, 20, 30]);
    }

    #[test]
    fn unknown_patient_is_not_found() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        let missing = PatientId(42);
        assert_eq!(ward.acknowledge(missing, "Nurse"), Err(WardError::NotFound(missing)));
        assert_eq!(ward.edit_notes(missing, "x"), Err(WardError::NotFound(missing)));
        assert_eq!(
            ward.set_condition(missing, Condition::Discharged),
            Err(WardError::NotFound(missing))
        );
        assert!(matches!(
            ward.query_history(missing, Timestamp::EPOCH),
            Err(WardError::NotFound(_))
        ));
    }

    #[test]
    fn acknowledge_without_alert_is_a_no_op() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        let id = ward.add_patient(NewPatientFields::new("Katie Smith", 29)).unwrap();
        let before = ward.roster();
        assert!(!ward.acknowledge(id, "Nurse").unwrap());
        assert!(Arc::ptr_eq(&before, &ward.roster()));
    }

    #[test]
    fn edit_notes_replaces_text() {
        let ward = Ward::builder().clock(clock()).build().unwrap();
        let id = ward
            .add_patient(NewPatientFields::new("Laura Garcia", 38).notes("old"))
            .unwrap();
        ward.edit_notes(id, "").unwrap();
        assert_eq!(ward.roster().get(id).unwrap().notes, "");
        ward.edit_notes(id, "Family visiting at 3pm").unwrap();
        assert_eq!(ward.roster().get(id).unwrap().notes, "Family visiting at 3pm");
    }

    #[test]
    fn discharged_patients_pass_through() {
        let clock = clock();
        let ward = Ward::builder()
            .clock(clock.clone())
            .random(ScriptedRandom::repeat(DELIVER))
            .build()
            .unwrap();
        let id = ward.add_patient(NewPatientFields::new("John Doe", 80)).unwrap();
        ward.set_condition(id, Condition::Discharged).unwrap();
        let before = ward.roster().get(id).unwrap().clone();

        for _ in 0..5 {
            clock.advance(Duration::from_secs(2));
            ward.tick();
        }
        assert_eq!(ward.roster().get(id).unwrap(), &before);
        assert_eq!(ward.roster().tick, 5);

        ward.set_condition(id, Condition::Observe).unwrap();
        clock.advance(Duration::from_secs(2));
        ward.tick();
        assert!(ward.roster().get(id).unwrap().last_updated > before.last_updated);
    }

    #[test]
    fn fault_is_isolated_to_one_patient() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let bad = ward.add_patient(NewPatientFields::new("Emily Brown", 50)).unwrap();
        let good = ward.add_patient(NewPatientFields::new("Michael Jones", 52)).unwrap();
        let bad_before = ward.roster().get(bad).unwrap().clone();

        let mut invalid = VitalsSnapshot::baseline();
        invalid.temperature = f64::INFINITY;
        feed.push(bad, invalid);
        feed.push(good, VitalsSnapshot::baseline().with_heart_rate(88));

        clock.advance(Duration::from_secs(2));
        let roster = ward.tick();

        assert_eq!(roster.get(bad).unwrap(), &bad_before);
        let updated = roster.get(good).unwrap();
        assert_eq!(updated.vitals.heart_rate, 88);
        assert_eq!(updated.history.len(), 1);
    }

    #[test]
    fn stale_sensor_reading_counts_as_missed() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let id = ward.add_patient(NewPatientFields::new("Alex Smith", 33)).unwrap();

        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(90));
        clock.advance(Duration::from_secs(30));
        let roster = ward.tick();
        let patient = roster.get(id).unwrap();
        assert_eq!(patient.offline_buffer, 10);
        assert!(patient.history.is_empty());
    }

    #[test]
    fn configured_stale_timeout_applies_to_ticks() {
        let clock = clock();
        let (ward, feed) = sensor_ward_with(
            &clock,
            WardConfig {
                sensor_stale_after_ms: 1_500,
                ..Default::default()
            },
        );
        let id = ward.add_patient(NewPatientFields::new("Michael Smith", 59)).unwrap();

        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(90));
        clock.advance(Duration::from_secs(1));
        assert_eq!(ward.tick().get(id).unwrap().vitals.heart_rate, 90);

        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(95));
        clock.advance(Duration::from_secs(2));
        let patient = ward.tick().get(id).unwrap().clone();
        assert_eq!(patient.vitals.heart_rate, 90);
        assert_eq!(patient.offline_buffer, 10);
    }

    #[test]
    fn history_query_is_a_stable_view() {
        let clock = clock();
        let (ward, feed) = sensor_ward(&clock);
        let id = ward.add_patient(NewPatientFields::new("Jane Williams", 61)).unwrap();

        let start = clock.now();
        for hr in [70u16, 71, 72, 73] {
            clock.advance(Duration::from_secs(60));
            feed.push(id, VitalsSnapshot::baseline().with_heart_rate(hr));
            ward.tick();
        }

        let since = start + Duration::from_secs(120);
        let slice = ward.query_history(id, since).unwrap();
        let rates: Vec<u16> = slice.iter().map(|p| p.vitals.heart_rate).collect();
        assert_eq!(rates, vec![71, 72, 73]);
        assert_eq!(slice.patient_id(), id);

        // Later ticks don't change a slice already handed out.
        clock.advance(Duration::from_secs(60));
        feed.push(id, VitalsSnapshot::baseline().with_heart_rate(99));
        ward.tick();
        assert_eq!(slice.len(), 3);
        assert_eq!(ward.query_history(id, since).unwrap().len(), 4);

        let future = ward.query_history(id, clock.now() + Duration::from_secs(1)).unwrap();
        assert!(future.is_empty());
    }

    #[test]
    fn demo_roster_builds_and_ticks() {
        let ward = Ward::builder()
            .config(WardConfig {
                demo_patients: 6,
                demo_history_days: 1,
                seed: Some(5),
                ..Default::default()
            })
            .clock(clock())
            .demo_roster()
            .build()
            .unwrap();

        assert_eq!(ward.roster().len(), 6);
        let id = ward.add_patient(NewPatientFields::new("New Arrival", 40)).unwrap();
        assert_eq!(id, PatientId(7));
        ward.tick();
        assert_eq!(ward.roster().tick, 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let now = Timestamp::EPOCH;
        let a = PatientMonitoringState::admit(PatientId(1), NewPatientFields::new("A", 1), now, 4);
        let b = PatientMonitoringState::admit(PatientId(1), NewPatientFields::new("B", 2), now, 4);
        let result = Ward::builder().clock(clock()).patients(vec![a, b]).build();
        assert!(matches!(result, Err(WardError::InvalidInput(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Ward::builder()
            .config(WardConfig {
                history_capacity: 0,
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[cfg(feature = "tokio")]
    mod driver {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn driver_ticks_on_interval() {
            let ward = Ward::builder()
                .config(WardConfig {
                    seed: Some(3),
                    ..Default::default()
                })
                .clock(clock())
                .build()
                .unwrap();
            ward.add_patient(NewPatientFields::new("Jane Doe", 54)).unwrap();

            assert!(ward.start_ticking(Duration::from_secs(2)).unwrap());
            assert!(!ward.start_ticking(Duration::from_secs(2)).unwrap());
            assert!(ward.is_ticking());

            tokio::time::sleep(Duration::from_secs(5)).await;
            assert_eq!(ward.roster().tick, 2);

            assert!(ward.stop_ticking());
            assert!(!ward.stop_ticking());
            assert!(!ward.is_ticking());

            tokio::time::sleep(Duration::from_secs(10)).await;
            assert_eq!(ward.roster().tick, 2);
        }

        #[tokio::test(start_paused = true)]
        async fn no_tick_lands_after_stop() {
            for _ in 0..32 {
                let ward = Ward::builder()
                    .config(WardConfig {
                        seed: Some(3),
                        ..Default::default()
                    })
                    .clock(clock())
                    .build()
                    .unwrap();
                ward.start_ticking(Duration::from_secs(2)).unwrap();

                // The deadline has passed but the driver may not have run yet.
                tokio::time::advance(Duration::from_secs(2)).await;
                let before = ward.roster().tick;
                assert!(ward.stop_ticking());

                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
                assert_eq!(ward.roster().tick, before);
            }
        }

        #[tokio::test(start_paused = true)]
        async fn driver_feeds_outputs_and_subscribers() {
            let (output, mut rx) = Output::channel(8);
            let ward = Ward::builder()
                .config(WardConfig {
                    seed: Some(3),
                    ..Default::default()
                })
                .clock(clock())
                .output(output)
                .build()
                .unwrap();
            let mut updates = ward.subscribe();

            ward.start_ticking(Duration::from_millis(500)).unwrap();

            let first = rx.recv().await.unwrap();
            assert_eq!(first.tick, 1);
            updates.changed().await.unwrap();
            assert!(updates.borrow().tick >= 1);

            ward.stop_ticking();
        }

        #[tokio::test]
        async fn zero_interval_is_rejected() {
            let ward = Ward::builder().clock(clock()).build().unwrap();
            assert!(matches!(
                ward.start_ticking(Duration::ZERO),
                Err(WardError::InvalidInput(_))
            ));
            assert!(!ward.is_ticking());
        }

        #[test]
        fn start_outside_runtime_is_rejected() {
            let ward = Ward::builder().clock(clock()).build().unwrap();
            assert!(ward.start_ticking(Duration::from_secs(1)).is_err());
        }
    }
}
