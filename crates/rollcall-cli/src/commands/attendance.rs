//! Attendance command handlers

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use rollcall_core::{
    run_session, AttendanceRecord, Department, Simulator, SimulatorEvent, SimulatorState, Store,
};

use crate::output::Output;

/// Mark one student present now
///
/// Unregistered students can still be marked when a name and department
/// are supplied.
pub fn mark(
    store: &mut Store,
    student_id: String,
    details: Option<(String, Department)>,
    output: &Output,
) -> Result<()> {
    let now = Local::now().naive_local();

    let record = match details {
        Some((name, department)) if store.find_student(&student_id).is_none() => {
            store.mark_present_as(&student_id, &name, department, now)?
        }
        _ => store.mark_present(&student_id, now)?,
    };

    output.print_marked(&record);
    Ok(())
}

/// Show the records made today
pub fn today(store: &Store, output: &Output) -> Result<()> {
    let today = Local::now().date_naive();
    let records: Vec<AttendanceRecord> = store.records_on(today).into_iter().cloned().collect();

    output.message(&format!("Attendance for {}", today.format("%Y-%m-%d")));
    output.print_records(&records, 1);
    Ok(())
}

/// Run the attendance simulator until Ctrl-C or the optional duration ends
pub async fn session(store: &mut Store, duration: Option<u64>, output: &Output) -> Result<()> {
    let mut simulator = Simulator::new(store.config().simulator.clone());
    simulator.begin_session(store, Local::now().date_naive());

    if store.student_count() == 0 {
        output.message("No students registered; nobody will be recognized.");
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let controller = async {
        let stop_after = async {
            match duration {
                Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(stop_after);

        let mut marked = 0usize;
        let mut stopping = false;
        loop {
            tokio::select! {
                event = event_rx.recv() => match event {
                    Some(SimulatorEvent::StatusChanged(SimulatorState::Running)) => {
                        output.message("Recognition started. Press Ctrl-C to stop.");
                    }
                    Some(SimulatorEvent::StatusChanged(SimulatorState::Idle)) => {
                        output.message("Recognition stopped.");
                    }
                    Some(SimulatorEvent::Marked(record)) => {
                        marked += 1;
                        output.print_marked(&record);
                    }
                    Some(SimulatorEvent::Error(message)) => output.warning(&message),
                    None => break,
                },
                _ = tokio::signal::ctrl_c(), if !stopping => {
                    debug!("Ctrl-C received");
                    stopping = true;
                    let _ = stop_tx.send(true);
                }
                _ = &mut stop_after, if !stopping => {
                    debug!("Session duration elapsed");
                    stopping = true;
                    let _ = stop_tx.send(true);
                }
            }
        }
        marked
    };

    let (_, marked) = tokio::join!(
        run_session(&mut simulator, store, stop_rx, event_tx),
        controller
    );

    info!("Session ended with {} new marks", marked);
    output.success(&format!("Session ended: {} student(s) marked present", marked));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use rollcall_core::{AttendanceError, Student};

    fn store_with_student() -> Store {
        let mut store = Store::in_memory();
        let today = Local::now().date_naive();
        store
            .add_student(Student::new("STU001", "Rahul Kumar", Department::Cse, today, "f"))
            .unwrap();
        store
    }

    #[test]
    fn test_mark_registered_student() {
        let mut store = store_with_student();
        let output = Output::new(OutputFormat::Quiet);

        mark(&mut store, "STU001".to_string(), None, &output).unwrap();
        assert_eq!(store.records_on(Local::now().date_naive()).len(), 1);
    }

    #[test]
    fn test_mark_unknown_student_needs_details() {
        let mut store = Store::in_memory();
        let output = Output::new(OutputFormat::Quiet);

        let err = mark(&mut store, "STU404".to_string(), None, &output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AttendanceError>(),
            Some(AttendanceError::UnknownStudent(_))
        ));

        mark(
            &mut store,
            "STU404".to_string(),
            Some(("Guest".to_string(), Department::Me)),
            &output,
        )
        .unwrap();
        assert_eq!(store.records()[0].student_name, "Guest");
    }

    #[test]
    fn test_registered_student_keeps_own_snapshot() {
        let mut store = store_with_student();
        let output = Output::new(OutputFormat::Quiet);

        mark(
            &mut store,
            "STU001".to_string(),
            Some(("Other Name".to_string(), Department::It)),
            &output,
        )
        .unwrap();
        assert_eq!(store.records()[0].student_name, "Rahul Kumar");
        assert_eq!(store.records()[0].department, Department::Cse);
    }

    #[tokio::test]
    async fn test_session_with_zero_duration_stops() {
        let mut store = store_with_student();
        let output = Output::new(OutputFormat::Quiet);

        session(&mut store, Some(0), &output).await.unwrap();
        // the minimum tick delay is far longer than the session
        assert_eq!(store.record_count(), 0);
    }
}
