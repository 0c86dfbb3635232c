//! nestor - command-line interface for Jenkins.

mod commands;
mod observability;

use anyhow::Result;
use clap::{Parser, Subcommand};
use observability::{LogFormat, TracingConfig, init_tracing};

/// nestor - trigger builds, tail consoles and watch Jenkins from the terminal.
#[derive(Parser)]
#[command(name = "nestor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    server: commands::ServerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a build
    Build {
        /// Job name
        job: String,

        /// Build parameters, e.g. "branch=main&deploy=true"
        params: Option<String>,

        /// Tail the build console once triggered
        #[arg(short, long)]
        console: bool,

        /// Milliseconds to wait for the build to leave the queue before tailing
        #[arg(long, default_value = "5000")]
        pending: u64,
    },

    /// Trigger builds of every job with a given status
    BuildBy {
        /// Status to match (OK, WARN, FAIL, ABORTED); all jobs if omitted
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Tail the console of a job's last build
    Console {
        /// Job name
        job: String,
    },

    /// Stop the last build of a job
    Stop {
        /// Job name
        job: String,
    },

    /// Show the status of every job
    Dashboard {
        /// Only show the jobs of this view
        #[arg(long)]
        view: Option<String>,
    },

    /// Show the status and health of a job
    Job {
        /// Job name
        name: String,
    },

    /// Show queued jobs
    Queue,

    /// Show executors per node
    Executor,

    /// Discover Jenkins instances on the network
    Discover {
        /// Host or broadcast address
        #[arg(default_value = "localhost")]
        host: String,
    },

    /// Periodically show the aggregate status
    Monitor {
        /// Only monitor this job
        #[arg(short, long)]
        job: Option<String>,

        /// Monitor the jobs of this view
        #[arg(long)]
        view: Option<String>,

        /// Cron schedule (sec min hour day month weekday)
        #[arg(short, long)]
        schedule: Option<String>,
    },

    /// Print the RSS feed of builds
    Feed {
        /// Feed of one job
        #[arg(short, long, conflicts_with = "view")]
        job: Option<String>,

        /// Feed of one view
        #[arg(long)]
        view: Option<String>,
    },

    /// Show the Jenkins server version
    Ver,
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let log_format = std::env::var("NESTOR_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse::<LogFormat>().ok())
        .unwrap_or_else(|| {
            if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
                LogFormat::Pretty
            } else {
                LogFormat::Compact
            }
        });

    // RUST_LOG wins over -v
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| filter.to_string());

    let config = TracingConfig::builder()
        .log_format(log_format)
        .log_filter(log_filter)
        .include_location(verbosity >= 3)
        .build();

    init_tracing(&config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let server = cli.server;
    let client = || server.connect();

    match cli.command {
        Commands::Build {
            job,
            params,
            console,
            pending,
        } => commands::build::run(&client()?, &job, params.as_deref(), console, pending).await,
        Commands::BuildBy { status } => {
            commands::build::by_status(&client()?, status.as_deref()).await
        }
        Commands::Console { job } => commands::console::run(&client()?, &job).await,
        Commands::Stop { job } => commands::build::stop(&client()?, &job).await,
        Commands::Dashboard { view } => commands::dashboard::run(&client()?, view.as_deref()).await,
        Commands::Job { name } => commands::dashboard::job(&client()?, &name).await,
        Commands::Queue => commands::queue::run(&client()?).await,
        Commands::Executor => commands::executor::run(&client()?).await,
        Commands::Discover { host } => commands::discover::run(&host).await,
        Commands::Monitor {
            job,
            view,
            schedule,
        } => commands::monitor::run(client()?, job, view, schedule).await,
        Commands::Feed { job, view } => commands::feed::run(&client()?, job, view).await,
        Commands::Ver => commands::version::run(&client()?).await,
    }
}
