//! rollcall CLI
//!
//! Command-line interface for rollcall - student registration and attendance.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use rollcall_core::{AttendanceError, Config, Department, SortColumn, StorageError, Store};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "rollcall - Face attendance register")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new student with a face photo
    Register {
        /// Student ID (e.g. STU001)
        student_id: String,
        /// Full name
        name: String,
        /// Department (CSE, ECE, EEE, ME, CE, IT)
        #[arg(short, long)]
        department: Department,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Image file used as the face reference
        #[arg(short, long, value_name = "PATH")]
        photo: PathBuf,
    },
    /// List registered students
    #[command(alias = "ls")]
    Students,
    /// Mark a student present now
    Mark {
        /// Student ID
        student_id: String,
        /// Name to record when the student is not registered
        #[arg(short, long, requires = "department")]
        name: Option<String>,
        /// Department to record when the student is not registered
        #[arg(short, long, requires = "name")]
        department: Option<Department>,
    },
    /// Run the attendance simulator until Ctrl-C
    Session {
        /// Stop automatically after this many seconds
        #[arg(long, value_name = "SECS")]
        duration: Option<u64>,
    },
    /// Show today's attendance
    Today,
    /// Browse attendance records
    Records {
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Department
        #[arg(short, long)]
        department: Option<Department>,
        /// Student ID or part of one
        #[arg(short, long)]
        student: Option<String>,
        /// Column to sort by (student-id, name, department, date, time, status)
        #[arg(long)]
        sort: Option<SortColumn>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Export attendance as CSV
    Export {
        /// Earliest date (default: 30 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Department
        #[arg(short, long)]
        department: Option<Department>,
        /// Output file, or - for stdout (default: attendance_<today>.csv)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Show the first rows instead of writing a file
        #[arg(long)]
        preview: bool,
    },
    /// Show dashboard counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, page_size, log_file, simulator.*)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output).await;
    if let Err(ref err) = result {
        if let Some(hint) = storage_hint(err) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init_logging(&config);

    let mut store = Store::open_with_config(config)?;

    match cli.command {
        Commands::Register {
            student_id,
            name,
            department,
            email,
            photo,
        } => commands::student::register(
            &mut store,
            commands::student::RegisterArgs {
                student_id,
                name,
                department,
                email,
                photo,
            },
            output,
        ),
        Commands::Students => commands::student::list(&store, output),
        Commands::Mark {
            student_id,
            name,
            department,
        } => commands::attendance::mark(&mut store, student_id, name.zip(department), output),
        Commands::Session { duration } => {
            commands::attendance::session(&mut store, duration, output).await
        }
        Commands::Today => commands::attendance::today(&store, output),
        Commands::Records {
            from,
            to,
            department,
            student,
            sort,
            desc,
            page,
        } => commands::records::list(
            &store,
            commands::records::RecordsArgs {
                from,
                to,
                department,
                student,
                sort,
                desc,
                page,
            },
            output,
        ),
        Commands::Export {
            from,
            to,
            department,
            output: path,
            preview,
        } => commands::export::run(
            &store,
            commands::export::ExportArgs {
                from,
                to,
                department,
                path,
                preview,
            },
            output,
        ),
        Commands::Status => commands::status::show(&store, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Find a storage failure anywhere in the error chain
fn storage_error(err: &anyhow::Error) -> Option<&StorageError> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<StorageError>()
            .or_else(|| match cause.downcast_ref::<AttendanceError>() {
                Some(AttendanceError::Storage(e)) => Some(e),
                _ => None,
            })
    })
}

/// Recovery advice for storage failures, if there is any
fn storage_hint(err: &anyhow::Error) -> Option<String> {
    let storage = storage_error(err)?;
    let suggestion = storage.recovery_suggestion()?;
    if storage.is_recoverable() {
        Some(format!("{} Then run the command again.", suggestion))
    } else {
        Some(suggestion.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_hint_for_domain_storage_error() {
        let err = anyhow::Error::from(AttendanceError::Storage(StorageError::DiskFull {
            path: PathBuf::from("/data/faceAttendanceRecords.json"),
            source: io::Error::new(io::ErrorKind::Other, "No space left on device"),
        }));

        let hint = storage_hint(&err).unwrap();
        assert!(hint.starts_with("Free up disk space"));
        assert!(hint.ends_with("run the command again."));
    }

    #[test]
    fn test_hint_through_context() {
        let err = anyhow::Error::new(StorageError::InvalidFormat {
            key: "faceAttendanceStudents".to_string(),
            details: "EOF while parsing".to_string(),
        })
        .context("Failed to load records");

        let hint = storage_hint(&err).unwrap();
        assert!(hint.contains("not valid JSON"));
        assert!(!hint.contains("run the command again"));
    }

    #[test]
    fn test_no_hint_for_other_errors() {
        let err = anyhow::Error::from(AttendanceError::UnknownStudent("STU404".to_string()));
        assert!(storage_hint(&err).is_none());

        let err = anyhow::Error::new(StorageError::NotFound {
            path: PathBuf::from("/missing"),
        });
        assert!(storage_hint(&err).is_none());
    }
}
