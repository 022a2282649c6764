use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "routekey", version, about = "Routing-key templates for log records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Validate {
            template,
            delimiter,
            config,
            output,
        } => cmd::validate::validate_cmd(template.as_deref(), &delimiter, config.as_deref(), output),
        Command::Eval {
            template,
            policy,
            show_record,
            input,
            output,
        } => cmd::eval::eval_cmd(template, policy, show_record, input.as_deref(), output),
        Command::Run {
            config,
            tag,
            amqp,
            input,
            output,
        } => cmd::run::run_cmd(&config, &tag, amqp, input.as_deref(), output).await,
    }
}
