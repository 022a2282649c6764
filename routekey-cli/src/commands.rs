use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a routing-key template (or a config file) without reading any record.
    Validate {
        #[arg(long, short, conflicts_with = "config", required_unless_present = "config")]
        template: Option<String>,
        #[arg(long, short, default_value = ".")]
        delimiter: String,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Evaluate a template against JSON-lines records and print the routing keys.
    Eval {
        #[command(flatten)]
        template: TemplateArgs,
        #[command(flatten)]
        policy: PolicyArgs,
        /// Also print each record after evaluation.
        #[arg(long)]
        show_record: bool,
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a full flush: decode, route and publish records as JSON lines on stdout,
    /// or to the configured broker with `--amqp`.
    Run {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "routekey")]
        tag: String,
        /// Publish to the broker in the config instead of stdout.
        #[arg(long)]
        amqp: bool,
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}
