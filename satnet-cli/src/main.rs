//! `satnet`: the NetSatBench control-plane CLI (§6 "CLI surface").

mod commands;
mod store;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "satnet", version, about = "NetSatBench control-plane CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs placement & admission (§4.1).
    Init(commands::init::InitArgs),
    /// Reconciles the deployed container set (§4.2).
    Deploy(commands::deploy::DeployArgs),
    /// Drives the epoch scheduler (§4.4).
    Run(commands::run::RunArgs),
    /// Tears down every container and clears `/config/*`.
    Rm(commands::rm::RmArgs),
    /// Runs a command inside a node's container.
    Exec(commands::exec::ExecArgs),
    /// Copies files to/from a node's container.
    Cp(commands::cp::CpArgs),
    /// Clears every published link record.
    Unlink(commands::unlink::UnlinkArgs),
    /// Runs the oracle routing precompiler over a directory of epoch files (§4.5).
    Oracle(commands::oracle::OracleArgs),
    /// Container entrypoint: runs the per-node agent (§4.3).
    Agent(commands::agent::AgentArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("failed to initialize logging: {e:#}");
    }

    // §5 ambient note: the epoch scheduler and node agent each run a single
    // logical thread; every other subcommand may use concurrent remote
    // calls (the deployer) and gets the default multi-thread runtime.
    let current_thread = matches!(cli.command, Command::Run(_) | Command::Agent(_));
    let runtime = match build_runtime(current_thread) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start the tokio runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(dispatch(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

async fn dispatch(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => commands::init::execute(args).await,
        Command::Deploy(args) => commands::deploy::execute(args).await,
        Command::Run(args) => commands::run::execute(args).await,
        Command::Rm(args) => commands::rm::execute(args).await,
        Command::Exec(args) => commands::exec::execute(args).await,
        Command::Cp(args) => commands::cp::execute(args).await,
        Command::Unlink(args) => commands::unlink::execute(args).await,
        Command::Oracle(args) => commands::oracle::execute(args).await,
        Command::Agent(args) => commands::agent::execute(args).await,
    }
}

fn build_runtime(current_thread: bool) -> std::io::Result<tokio::runtime::Runtime> {
    if current_thread {
        tokio::runtime::Builder::new_current_thread().enable_all().build()
    } else {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}

/// Maps the top-level error chain back to the documented exit codes by
/// downcasting to [`satnet_schema::SatNetError`] at the process boundary
/// (§7 ambient note).
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<satnet_schema::SatNetError>()
        .map(|e| e.exit_code() as u8)
        .unwrap_or(1)
}

fn init_logging() -> anyhow::Result<()> {
    proxmox_log::init_logger(
        "SATNET_LOG",
        tracing_subscriber::filter::LevelFilter::INFO,
        "satnet",
    )
}
