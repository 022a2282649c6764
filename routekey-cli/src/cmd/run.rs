use std::path::Path;
use std::sync::Arc;

use routekey_exec::{
    AmqpPublisher, FlushStatus, InitError, OutputConfig, OutputPlugin, Publisher, WriterPublisher,
};
use serde::Serialize;

use crate::cmd::config::{load_config, read_input};
use crate::exit_codes;
use crate::output::{print_error, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct RunSummary {
    status: &'static str,
    published: usize,
    skipped: usize,
}

pub async fn run_cmd(
    config: &Path,
    tag: &str,
    amqp: bool,
    input: Option<&Path>,
    output: OutputArgs,
) -> i32 {
    let Some(cfg) = load_config::<OutputConfig>(config, &output) else {
        return exit_codes::VALIDATION_FAILED;
    };

    let publisher: Arc<dyn Publisher> = if amqp {
        match AmqpPublisher::from_broker(&cfg.broker) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                print_error(
                    output.format,
                    output.quiet,
                    &format!("invalid broker address: {e}"),
                );
                return exit_codes::VALIDATION_FAILED;
            }
        }
    } else {
        Arc::new(WriterPublisher::stdout())
    };
    let plugin = match OutputPlugin::init(cfg, publisher).await {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return match e {
                InitError::Config(_) => exit_codes::VALIDATION_FAILED,
                InitError::Connect(_) => exit_codes::RUNTIME_ERROR,
            };
        }
    };

    let Some(content) = read_input(input, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };

    let report = plugin.flush_lines(tag, &content).await;
    plugin.exit().await;

    let (status, code) = match report.status {
        FlushStatus::Ok => ("ok", exit_codes::SUCCESS),
        FlushStatus::Error => ("error", exit_codes::RUN_FAILED),
        FlushStatus::Retry => ("retry", exit_codes::RUNTIME_ERROR),
    };
    let summary = RunSummary {
        status,
        published: report.published,
        skipped: report.skipped,
    };

    // Published messages own stdout, so the summary goes to stderr.
    if !output.quiet {
        match output.format {
            OutputFormat::Text => eprintln!(
                "{}: published {}, skipped {}",
                summary.status, summary.published, summary.skipped
            ),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::to_string(&summary).unwrap_or_default())
            }
        }
    }

    code
}
