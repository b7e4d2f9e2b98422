//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use rollcall_core::{AttendanceRecord, DashboardStats, Page, Student};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a list of students
    pub fn print_students(&self, students: &[Student]) {
        match self.format {
            OutputFormat::Human => {
                if students.is_empty() {
                    println!("No students registered.");
                    return;
                }
                println!(
                    "{:<12} {:<28} {:<6} {:<12} {}",
                    "STUDENT ID", "NAME", "DEPT", "REGISTERED", "EMAIL"
                );
                for s in students {
                    println!(
                        "{:<12} {:<28} {:<6} {:<12} {}",
                        truncate(&s.student_id, 12),
                        truncate(&s.name, 28),
                        s.department,
                        s.registered_date.format("%Y-%m-%d"),
                        s.email.as_deref().unwrap_or("-")
                    );
                }
                println!("\n{} student(s)", students.len());
            }
            OutputFormat::Json => print_json(&students),
            OutputFormat::Quiet => {
                for s in students {
                    println!("{}", s.student_id);
                }
            }
        }
    }

    /// Print a single newly registered student
    pub fn print_student(&self, student: &Student) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Registered {} ({})", student.name, student.student_id);
                println!("  Department: {}", student.department);
                println!("  Registered: {}", student.registered_date.format("%Y-%m-%d"));
            }
            OutputFormat::Json => print_json(student),
            OutputFormat::Quiet => println!("{}", student.student_id),
        }
    }

    /// Print a plain list of records, numbered from `first_index`
    pub fn print_records(&self, records: &[AttendanceRecord], first_index: usize) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No attendance records found.");
                    return;
                }
                println!(
                    "{:>4}  {:<12} {:<24} {:<6} {:<10} {:<8} {}",
                    "#", "STUDENT ID", "NAME", "DEPT", "DATE", "TIME", "STATUS"
                );
                for (offset, r) in records.iter().enumerate() {
                    println!(
                        "{:>4}  {:<12} {:<24} {:<6} {:<10} {:<8} {}",
                        first_index + offset,
                        truncate(&r.student_id, 12),
                        truncate(&r.student_name, 24),
                        r.department,
                        r.date.format("%Y-%m-%d"),
                        r.time,
                        r.status
                    );
                }
            }
            OutputFormat::Json => print_json(&records),
            OutputFormat::Quiet => {
                for r in records {
                    println!("{}\t{}\t{}", r.student_id, r.date, r.time);
                }
            }
        }
    }

    /// Print one page of a records listing with navigation info
    pub fn print_page(&self, page: &Page<AttendanceRecord>, page_size: usize) {
        match self.format {
            OutputFormat::Human => {
                self.print_records(&page.items, page.first_index(page_size));
                println!();
                println!(
                    "Page {} of {} ({} record(s)){}{}",
                    page.page_number,
                    page.total_pages,
                    page.total_items,
                    if page.has_previous() { "  [prev]" } else { "" },
                    if page.has_next() { "  [next]" } else { "" }
                );
            }
            OutputFormat::Json => print_json(page),
            OutputFormat::Quiet => self.print_records(&page.items, 1),
        }
    }

    /// Announce a single attendance mark
    pub fn print_marked(&self, record: &AttendanceRecord) {
        match self.format {
            OutputFormat::Human => println!(
                "✓ {} ({}) marked present at {}",
                record.student_name, record.student_id, record.time
            ),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"event": "marked", "record": record})
                );
            }
            OutputFormat::Quiet => println!("{}", record.student_id),
        }
    }

    pub fn print_stats(&self, stats: &DashboardStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Total students:     {}", stats.total_students);
                println!("Today's attendance: {}", stats.today_attendance);
                println!("Attendance rate:    {}%", stats.attendance_percentage);
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!(
                "{}\t{}\t{}",
                stats.total_students, stats.today_attendance, stats.attendance_percentage
            ),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning. Human warnings go to stderr.
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("! {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_mode_queries() {
        let json = Output::new(OutputFormat::from_flags(true, false));
        assert!(json.is_json());
        assert!(!json.is_quiet());

        let quiet = Output::new(OutputFormat::from_flags(true, true));
        assert!(quiet.is_quiet());
        assert!(!quiet.is_json());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("Zoë Müller-Lüdenscheidt", 8), "Zoë M...");
    }
}
