use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeclock
#[derive(Parser)]
#[command(
    name = "rtimeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reconcile worker clock actions into shifts, meal breaks and attendance status using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the civil timezone (IANA name, e.g. America/Los_Angeles)
    #[arg(global = true, long = "tz")]
    pub tz: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage workers
    Worker {
        #[command(subcommand)]
        action: WorkerCommand,
    },

    /// Manage events (scheduled work days)
    Event {
        #[command(subcommand)]
        action: EventCommand,
    },

    /// Manage check-in codes
    Code {
        #[command(subcommand)]
        action: CodeCommand,
    },

    /// Record a clock action from a device using a check-in code
    Clock {
        #[arg(long, help = "Check-in code")]
        code: String,

        #[arg(
            long,
            help = "Clock action: clock_in, clock_out, meal_start, meal_end"
        )]
        action: String,

        #[arg(long, help = "Worker id (required with a shared code)")]
        worker: Option<i64>,

        #[arg(long, help = "Event id to tag the entry with")]
        event: Option<i64>,

        #[arg(long, help = "Instant of the action (RFC3339), default now")]
        at: Option<String>,
    },

    /// Historical payroll totals for an event
    Totals {
        #[arg(long, help = "Event id")]
        event: i64,

        #[arg(long = "worker", help = "Restrict to these workers (default: event team)")]
        workers: Vec<i64>,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// Live attendance status for an event
    Status {
        #[arg(long, help = "Event id")]
        event: i64,

        #[arg(long = "worker", help = "Restrict to these workers (default: event team)")]
        workers: Vec<i64>,

        #[arg(long, help = "Reference instant (RFC3339), default now")]
        now: Option<String>,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// Manually correct a worker's shift (managers and admins only)
    Edit {
        #[arg(long, help = "Worker id of the person making the correction")]
        actor: i64,

        #[arg(long, help = "Event id")]
        event: i64,

        #[arg(long, help = "Worker id whose shift is corrected")]
        worker: i64,

        #[arg(long = "first-in", help = "Clock-in time (HH:mm)")]
        first_in: Option<String>,

        #[arg(long = "first-meal-start", help = "Meal 1 start (HH:mm)")]
        first_meal_start: Option<String>,

        #[arg(long = "last-meal-end", help = "Meal 1 end (HH:mm)")]
        last_meal_end: Option<String>,

        #[arg(long = "second-meal-start", help = "Meal 2 start (HH:mm)")]
        second_meal_start: Option<String>,

        #[arg(long = "second-meal-end", help = "Meal 2 end (HH:mm)")]
        second_meal_end: Option<String>,

        #[arg(long = "last-out", help = "Clock-out time (HH:mm)")]
        last_out: Option<String>,

        #[arg(long = "expect-version", help = "Fail if the day was changed since this version")]
        expect_version: Option<i64>,
    },

    /// Replay a batch of offline-queued clock actions (JSON file, `-` for stdin)
    Sync {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum WorkerCommand {
    /// Add or update a worker
    Add {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long, help = "Payroll division")]
        division: Option<String>,

        #[arg(long, default_value = "worker", help = "worker, manager or admin")]
        role: String,
    },
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Create an event and assign its team
    Add {
        #[arg(long, default_value = "")]
        name: String,

        /// Date of the event (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        #[arg(long, help = "Scheduled start (HH:mm)")]
        start: String,

        #[arg(long, help = "Scheduled end (HH:mm)")]
        end: String,

        #[arg(long = "crosses-midnight")]
        crosses_midnight: bool,

        #[arg(long, value_delimiter = ',', help = "Comma separated worker ids")]
        team: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum CodeCommand {
    /// Create a check-in code (personal when --worker is given, shared otherwise)
    Add {
        #[arg(long)]
        code: String,

        #[arg(long, help = "Bind the code to one worker")]
        worker: Option<i64>,

        #[arg(long)]
        inactive: bool,
    },
}
