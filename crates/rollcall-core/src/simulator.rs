//! Attendance simulator
//!
//! Stands in for live face recognition. While running, it periodically picks
//! a registered student at random and marks them present, at most once per
//! session day.
//!
//! ## Architecture
//!
//! `Simulator` is a plain state machine: `start`, `stop` and `tick` are
//! synchronous and take the current time as an argument. `run_session`
//! drives it on tokio, sleeping a fresh random delay before every tick and
//! reporting progress as `SimulatorEvent`s.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;
use crate::error::AttendanceResult;
use crate::models::AttendanceRecord;
use crate::store::Store;

/// Source of the simulator's random choices
pub trait Randomness {
    /// A delay in `[min, max)`; `min` when the range is empty
    fn delay(&mut self, min: Duration, max: Duration) -> Duration;

    /// An index in `0..len`. Only called with `len > 0`.
    fn choose(&mut self, len: usize) -> usize;
}

/// Randomness backed by an entropy-seeded `StdRng`
pub struct ThreadRandomness {
    rng: StdRng,
}

impl ThreadRandomness {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence, for demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandomness {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomness for ThreadRandomness {
    fn delay(&mut self, min: Duration, max: Duration) -> Duration {
        let min_ms = min.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        if max_ms <= min_ms {
            return min;
        }
        Duration::from_millis(self.rng.gen_range(min_ms..max_ms))
    }

    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Idle,
    Running,
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SimulatorState::Idle => "idle",
            SimulatorState::Running => "running",
        })
    }
}

/// Progress reported by `run_session`
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorEvent {
    StatusChanged(SimulatorState),
    Marked(AttendanceRecord),
    /// A tick failed to persist its record; the session keeps going
    Error(String),
}

pub struct Simulator<R = ThreadRandomness> {
    state: SimulatorState,
    /// Student ids marked during this session
    marked: HashSet<String>,
    /// Day the marked set belongs to
    marked_on: Option<NaiveDate>,
    settings: SimulatorConfig,
    rng: R,
}

impl Simulator<ThreadRandomness> {
    pub fn new(settings: SimulatorConfig) -> Self {
        Self::with_randomness(settings, ThreadRandomness::new())
    }
}

impl<R: Randomness> Simulator<R> {
    pub fn with_randomness(settings: SimulatorConfig, rng: R) -> Self {
        Self {
            state: SimulatorState::Idle,
            marked: HashSet::new(),
            marked_on: None,
            settings,
            rng,
        }
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulatorState::Running
    }

    pub fn is_marked(&self, student_id: &str) -> bool {
        self.marked.contains(student_id)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Reset the marked set for a new attendance session.
    ///
    /// The set starts empty unless `skip_already_marked` is configured, in
    /// which case it is seeded from the records already stored for `today`.
    pub fn begin_session(&mut self, store: &Store, today: NaiveDate) {
        self.marked.clear();
        self.marked_on = Some(today);

        if self.settings.skip_already_marked {
            self.marked.extend(
                store
                    .records_on(today)
                    .into_iter()
                    .map(|r| r.student_id.clone()),
            );
        }
        debug!(
            "Session for {} starts with {} students already marked",
            today,
            self.marked.len()
        );
    }

    /// Idle -> Running. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SimulatorState::Running;
        info!("Attendance simulator started");
        true
    }

    /// Running -> Idle. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SimulatorState::Idle;
        info!("Attendance simulator stopped");
        true
    }

    /// Sample the wait before the next tick
    pub fn next_delay(&mut self) -> Duration {
        self.rng
            .delay(self.settings.min_delay(), self.settings.max_delay())
    }

    /// Run one recognition step at `now`.
    ///
    /// Does nothing while idle, when no students are registered, or when the
    /// drawn student is already marked today.
    pub fn tick(
        &mut self,
        store: &mut Store,
        now: NaiveDateTime,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        if !self.is_running() {
            return Ok(None);
        }

        let today = now.date();
        if self.marked_on != Some(today) {
            if self.marked_on.is_some() {
                debug!("Day changed to {}, clearing marked set", today);
            }
            self.marked.clear();
            self.marked_on = Some(today);
        }

        let students = store.students();
        if students.is_empty() {
            return Ok(None);
        }

        let student = &students[self.rng.choose(students.len())];
        if self.marked.contains(&student.student_id) {
            return Ok(None);
        }

        let record = AttendanceRecord::present(student, now);
        store.add_attendance_record(record.clone())?;
        self.marked.insert(record.student_id.clone());
        Ok(Some(record))
    }
}

/// Drive `sim` until `stop` turns true or its sender is dropped.
///
/// Each iteration sleeps a newly sampled delay and then ticks with the local
/// wall-clock time. A stop signal that arrives during the sleep cancels the
/// pending tick.
pub async fn run_session<R: Randomness>(
    sim: &mut Simulator<R>,
    store: &mut Store,
    mut stop: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<SimulatorEvent>,
) {
    if *stop.borrow() {
        return;
    }

    if sim.start() {
        let _ = events.send(SimulatorEvent::StatusChanged(SimulatorState::Running));
    }

    loop {
        let delay = sim.next_delay();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
        }

        if *stop.borrow() || !sim.is_running() {
            break;
        }

        match sim.tick(store, Local::now().naive_local()) {
            Ok(Some(record)) => {
                info!("Recognized {} ({})", record.student_name, record.student_id);
                let _ = events.send(SimulatorEvent::Marked(record));
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to record attendance: {}", e);
                let _ = events.send(SimulatorEvent::Error(e.to_string()));
            }
        }
    }

    if sim.stop() {
        let _ = events.send(SimulatorEvent::StatusChanged(SimulatorState::Idle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Student};

    /// Replays fixed delays and choices, cycling when exhausted
    struct Scripted {
        delays: Vec<Duration>,
        choices: Vec<usize>,
        delay_at: usize,
        choice_at: usize,
    }

    impl Scripted {
        fn new(choices: Vec<usize>) -> Self {
            Self {
                delays: vec![Duration::from_millis(1)],
                choices,
                delay_at: 0,
                choice_at: 0,
            }
        }
    }

    impl Randomness for Scripted {
        fn delay(&mut self, _min: Duration, _max: Duration) -> Duration {
            let d = self.delays[self.delay_at % self.delays.len()];
            self.delay_at += 1;
            d
        }

        fn choose(&mut self, len: usize) -> usize {
            let c = self.choices[self.choice_at % self.choices.len()];
            self.choice_at += 1;
            c % len
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn store_with(ids: &[&str]) -> Store {
        let mut store = Store::in_memory();
        for id in ids {
            store
                .add_student(Student::new(*id, format!("Student {}", id), Department::Cse, date("2025-11-01"), "f"))
                .unwrap();
        }
        store
    }

    fn simulator(choices: Vec<usize>) -> Simulator<Scripted> {
        Simulator::with_randomness(SimulatorConfig::default(), Scripted::new(choices))
    }

    #[test]
    fn test_state_transitions() {
        let mut sim = simulator(vec![0]);
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert!(sim.start());
        assert!(!sim.start());
        assert!(sim.stop());
        assert!(!sim.stop());
        assert_eq!(sim.state(), SimulatorState::Idle);
        assert_eq!(format!("{:<8}|", sim.state()), "idle    |");
    }

    #[test]
    fn test_tick_while_idle_does_nothing() {
        let mut store = store_with(&["STU001"]);
        let mut sim = simulator(vec![0]);
        let now = date("2025-11-03").and_hms_opt(9, 0, 0).unwrap();

        assert_eq!(sim.tick(&mut store, now).unwrap(), None);
        assert_eq!(store.record_count(), 0);
    }

    #[test]
    fn test_each_student_marked_once_per_session() {
        let mut store = store_with(&["STU001", "STU002", "STU003"]);
        let mut sim = simulator(vec![1, 1, 0, 1, 2, 0]);
        let today = date("2025-11-03");
        sim.begin_session(&store, today);
        sim.start();

        let mut marked = Vec::new();
        for minute in 0..6 {
            let now = today.and_hms_opt(9, minute, 0).unwrap();
            if let Some(record) = sim.tick(&mut store, now).unwrap() {
                marked.push(record.student_id);
            }
        }

        assert_eq!(marked, ["STU002", "STU001", "STU003"]);
        assert_eq!(store.record_count(), 3);
        assert_eq!(sim.marked_count(), 3);
    }

    #[test]
    fn test_empty_student_list_never_marks() {
        let mut store = Store::in_memory();
        let mut sim = simulator(vec![0]);
        let today = date("2025-11-03");
        sim.begin_session(&store, today);
        sim.start();

        for minute in 0..10 {
            let now = today.and_hms_opt(9, minute, 0).unwrap();
            assert_eq!(sim.tick(&mut store, now).unwrap(), None);
        }
        assert_eq!(store.record_count(), 0);
    }

    #[test]
    fn test_new_session_forgets_previous_marks() {
        let mut store = store_with(&["STU001"]);
        let mut sim = simulator(vec![0]);
        let today = date("2025-11-03");
        let now = today.and_hms_opt(9, 0, 0).unwrap();

        sim.begin_session(&store, today);
        sim.start();
        assert!(sim.tick(&mut store, now).unwrap().is_some());
        assert!(sim.tick(&mut store, now).unwrap().is_none());

        sim.begin_session(&store, today);
        assert!(!sim.is_marked("STU001"));
        assert!(sim.tick(&mut store, now).unwrap().is_some());
        assert_eq!(store.records_on(today).len(), 2);
    }

    #[test]
    fn test_skip_already_marked_seeds_from_store() {
        let mut store = store_with(&["STU001", "STU002"]);
        let today = date("2025-11-03");
        store
            .mark_present("STU001", today.and_hms_opt(8, 0, 0).unwrap())
            .unwrap();

        let settings = SimulatorConfig {
            skip_already_marked: true,
            ..SimulatorConfig::default()
        };
        let mut sim = Simulator::with_randomness(settings, Scripted::new(vec![0, 1]));
        sim.begin_session(&store, today);
        assert!(sim.is_marked("STU001"));
        sim.start();

        let now = today.and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(sim.tick(&mut store, now).unwrap(), None);
        let record = sim.tick(&mut store, now).unwrap().unwrap();
        assert_eq!(record.student_id, "STU002");
    }

    #[test]
    fn test_marked_set_clears_on_new_day() {
        let mut store = store_with(&["STU001"]);
        let mut sim = simulator(vec![0]);
        let day_one = date("2025-11-03");
        sim.begin_session(&store, day_one);
        sim.start();

        assert!(sim
            .tick(&mut store, day_one.and_hms_opt(23, 59, 0).unwrap())
            .unwrap()
            .is_some());
        let next = sim
            .tick(&mut store, date("2025-11-04").and_hms_opt(0, 1, 0).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(next.date, date("2025-11-04"));
        assert_eq!(next.time, "12:01 AM");
    }

    #[test]
    fn test_thread_randomness_respects_bounds() {
        let mut rng = ThreadRandomness::seeded(7);
        let min = Duration::from_millis(2000);
        let max = Duration::from_millis(5000);
        for _ in 0..200 {
            let d = rng.delay(min, max);
            assert!(d >= min && d < max);
            assert!(rng.choose(3) < 3);
        }
        assert_eq!(rng.delay(min, min), min);
    }

    #[tokio::test]
    async fn test_run_session_marks_until_stopped() {
        let mut store = store_with(&["STU001"]);
        let mut sim = simulator(vec![0]);
        sim.begin_session(&store, Local::now().date_naive());

        let (stop_tx, stop_rx) = watch::channel(false);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        let controller = async {
            let mut seen = Vec::new();
            while let Some(event) = event_rx.recv().await {
                let marked = matches!(event, SimulatorEvent::Marked(_));
                seen.push(event);
                if marked {
                    stop_tx.send(true).unwrap();
                }
                if seen.last() == Some(&SimulatorEvent::StatusChanged(SimulatorState::Idle)) {
                    break;
                }
            }
            seen
        };

        let (_, events) = tokio::join!(
            run_session(&mut sim, &mut store, stop_rx, event_tx),
            controller
        );

        assert_eq!(events.first(), Some(&SimulatorEvent::StatusChanged(SimulatorState::Running)));
        assert_eq!(events.last(), Some(&SimulatorEvent::StatusChanged(SimulatorState::Idle)));
        assert_eq!(
            events.iter().filter(|e| matches!(e, SimulatorEvent::Marked(_))).count(),
            1
        );
        assert_eq!(store.record_count(), 1);
        assert_eq!(sim.state(), SimulatorState::Idle);
    }

    #[tokio::test]
    async fn test_run_session_already_stopped() {
        let mut store = store_with(&["STU001"]);
        let mut sim = simulator(vec![0]);
        let (_stop_tx, stop_rx) = watch::channel(true);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        run_session(&mut sim, &mut store, stop_rx, event_tx).await;

        assert!(event_rx.recv().await.is_none());
        assert_eq!(store.record_count(), 0);
    }
}
