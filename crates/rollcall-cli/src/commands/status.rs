//! Status command handler

use anyhow::Result;
use chrono::Local;

use rollcall_core::Store;

use crate::output::Output;

/// Show dashboard counts and where data lives
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let stats = store.dashboard(Local::now().date_naive());
    let config = store.config();

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "total_students": stats.total_students,
                "today_attendance": stats.today_attendance,
                "attendance_percentage": stats.attendance_percentage,
                "total_records": store.record_count(),
                "data_dir": config.data_dir,
            })
        );
    } else if output.is_quiet() {
        output.print_stats(&stats);
    } else {
        println!("rollcall Status");
        println!("===============");
        println!();
        output.print_stats(&stats);
        println!("Total records:      {}", store.record_count());
        println!();
        println!("Storage:");
        println!("  Location: {}", config.data_dir.display());
    }

    Ok(())
}
