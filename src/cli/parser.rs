use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for faresheet
#[derive(Parser)]
#[command(
    name = "faresheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track part-time shifts and bus fares, hand fares over by QR payload and build XLSX payroll reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the report exports.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportOpts {
    /// Verification code (or its 1-3 position in the prompt); asked on stdin when missing
    #[arg(long = "choice")]
    pub choice: Option<u8>,

    /// Directory receiving the report (default: report_dir from the config)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<String>,

    /// Overwrite an existing report without asking
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Print the report as base64 instead of writing a file
    #[arg(long = "base64")]
    pub base64: bool,

    /// Seed of the verification code generator
    #[arg(long = "seed", hide = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Register, log in or list employees
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List or add store locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Per-user settings
    Settings {
        #[arg(long = "rate", help = "KWD conversion rate used by the dashboard")]
        rate: Option<String>,
    },

    /// Add a work session, or edit one with --edit
    Add {
        /// Date of the shift (YYYY-MM-DD)
        #[arg(required_unless_present = "edit")]
        date: Option<String>,

        #[arg(long = "location", short = 'l', help = "Location code (e.g. 809)")]
        location: Option<String>,

        #[arg(long = "in", help = "Tap-in time (h:mm AM/PM or HH:MM)")]
        tap_in: Option<String>,

        #[arg(long = "out", help = "Tap-out time (h:mm AM/PM or HH:MM)")]
        tap_out: Option<String>,

        #[arg(long = "outbound", help = "Outbound bus fare")]
        outbound: Option<String>,

        #[arg(long = "return", help = "Return bus fare")]
        return_cost: Option<String>,

        #[arg(long = "edit", value_name = "SESSION_ID", help = "Session to edit")]
        edit: Option<String>,
    },

    /// Suggest tap-out times for a tap-in
    Suggest {
        /// Tap-in time (h:mm AM/PM or HH:MM)
        tap_in: String,

        #[arg(long = "date", help = "Date of the shift (default: today)")]
        date: Option<String>,
    },

    /// Hours, earnings and claimable fares of the current pay period
    Dashboard {
        #[arg(long = "today", help = "Reference date (YYYY-MM-DD)")]
        today: Option<String>,
    },

    /// List sessions grouped by pay period
    List {
        #[arg(
            long = "period-offset",
            allow_negative_numbers = true,
            help = "Only this pay period (0 = current, -1 = previous, ...)"
        )]
        period_offset: Option<i32>,

        #[arg(long = "all", help = "Every session of every employee")]
        all: bool,
    },

    /// List own and received fares by month
    Fares,

    /// Fare claim reports
    Fare {
        #[command(subcommand)]
        action: FareAction,
    },

    /// Timesheet reports by location group
    Timesheet {
        #[command(subcommand)]
        action: TimesheetAction,
    },

    /// Build a fare_share payload for the selected sessions
    Share {
        #[arg(required = true, value_name = "SESSION_ID")]
        sessions: Vec<String>,

        #[arg(long = "out", value_name = "FILE", help = "Also write the payload to FILE")]
        out: Option<String>,
    },

    /// Read scanned payloads, one per line
    Scan {
        #[arg(long = "file", value_name = "FILE", help = "Read frames from FILE instead of stdin")]
        file: Option<String>,

        #[arg(long = "out", value_name = "FILE", help = "Write the confirmation payload to FILE")]
        out: Option<String>,
    },

    /// Delete a received fare or an own session
    Del {
        #[arg(long = "shared", value_name = "ID", conflicts_with = "session")]
        shared: Option<i64>,

        #[arg(long = "session", value_name = "SESSION_ID")]
        session: Option<String>,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an employee and log in as them
    Register { emp_id: String, username: String },
    Login { emp_id: String },
    Logout,
    Whoami,
    List,
}

#[derive(Subcommand)]
pub enum LocationAction {
    List,
    Add {
        code: String,
        name: String,
        #[arg(long = "rate", help = "Hourly rate in KWD")]
        rate: Option<f64>,
    },
    /// Change the hourly rate of a location
    Rate { code: String, rate: f64 },
}

#[derive(Subcommand)]
pub enum FareAction {
    /// Export the selected fares and mark them as claimed
    Export {
        #[arg(required = true, value_name = "SESSION_ID")]
        sessions: Vec<String>,

        #[command(flatten)]
        opts: ExportOpts,
    },
}

#[derive(Subcommand)]
pub enum TimesheetAction {
    /// Per-group cards of a pay period
    List {
        #[arg(long = "period-offset", allow_negative_numbers = true, default_value_t = 0)]
        period_offset: i32,
    },
    /// Export one workbook per location group and mark it as submitted
    Export {
        #[arg(long = "period-offset", allow_negative_numbers = true, default_value_t = 0)]
        period_offset: i32,

        #[arg(long = "group", help = "Only this location group")]
        group: Option<String>,

        #[command(flatten)]
        opts: ExportOpts,
    },
}
