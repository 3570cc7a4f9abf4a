mod mail;
mod mock;
mod serve;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "infomark-tools")]
#[command(version)]
#[command(about = "Development utilities for the InfoMark course platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a PostgreSQL seed script with mock course data
    Mock {
        /// Output SQL file (default: stdout). A .gz extension compresses the output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML config file with counts, courses and exams
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for reproducibility (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of student accounts
        #[arg(long)]
        students: Option<usize>,

        /// Number of tutor accounts
        #[arg(long)]
        tutors: Option<usize>,

        /// Number of admin accounts
        #[arg(long)]
        admins: Option<usize>,

        /// Number of exercise sheets
        #[arg(long)]
        sheets: Option<usize>,

        /// Number of tasks on every sheet
        #[arg(long)]
        tasks_per_sheet: Option<usize>,

        /// Number of exercise groups (default: one per tutor)
        #[arg(long)]
        groups: Option<usize>,

        /// Number of course materials
        #[arg(long)]
        materials: Option<usize>,

        /// Course (1-based position in the course list) owning the materials
        #[arg(long)]
        material_course: Option<usize>,

        /// Course (1-based position in the course list) owning the exercise groups
        #[arg(long)]
        group_course: Option<usize>,

        /// Write string literals without escaping embedded quotes, like older fixture files
        #[arg(long)]
        legacy_quoting: bool,

        /// Show progress while writing tables
        #[arg(short, long)]
        progress: bool,

        /// Generate without writing and print per-table row counts
        #[arg(long)]
        dry_run: bool,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the API documentation with a permissive CORS header
    ServeDocs {
        /// Port to listen on
        #[arg(default_value_t = crate::serve::DEFAULT_PORT)]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: std::net::IpAddr,
    },

    /// Send a test mail through the local sendmail binary
    SendMail {
        /// Path of the sendmail binary
        #[arg(long, default_value = crate::mail::DEFAULT_SENDMAIL)]
        sendmail: PathBuf,

        /// Sender address
        #[arg(long, default_value = crate::mail::DEFAULT_FROM)]
        from: String,

        /// Recipient address
        #[arg(long, default_value = crate::mail::DEFAULT_TO)]
        to: String,

        /// Subject line
        #[arg(long, default_value = crate::mail::DEFAULT_SUBJECT)]
        subject: String,

        /// Message body
        #[arg(long, default_value = crate::mail::DEFAULT_BODY)]
        body: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Mock {
            output,
            config,
            seed,
            students,
            tutors,
            admins,
            sheets,
            tasks_per_sheet,
            groups,
            materials,
            material_course,
            group_course,
            legacy_quoting,
            progress,
            dry_run,
            json,
        } => mock::run(mock::MockArgs {
            output,
            config,
            seed,
            students,
            tutors,
            admins,
            sheets,
            tasks_per_sheet,
            groups,
            materials,
            material_course,
            group_course,
            legacy_quoting,
            progress,
            dry_run,
            json,
        }),
        Commands::ServeDocs { port, dir, host } => serve::run(dir, host, port),
        Commands::SendMail {
            sendmail,
            from,
            to,
            subject,
            body,
        } => mail::run(sendmail, from, to, subject, body),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "infomark-tools",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
