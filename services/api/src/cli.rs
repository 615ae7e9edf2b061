use crate::demo::{run_demo, run_queue, DemoArgs, QueueArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use droppoint::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Drop Point Tracker",
    about = "Run and demonstrate the drop point tracking service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the ranked visit queue for a seeded sample fleet
    Queue(QueueArgs),
    /// Run an end-to-end CLI demo of the full tracking workflow
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Queue(args) => run_queue(args),
        Command::Demo(args) => run_demo(args),
    }
}
