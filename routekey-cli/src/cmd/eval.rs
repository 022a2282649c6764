use std::path::Path;

use routekey_core::{Record, RoutingConfig, RoutingDecision};
use routekey_exec::decode_lines;
use serde::Serialize;

use crate::cmd::config::read_input;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, PolicyArgs, TemplateArgs};

#[derive(Serialize)]
struct EvalLine {
    record_no: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<Record>,
}

pub fn eval_cmd(
    template: TemplateArgs,
    policy: PolicyArgs,
    show_record: bool,
    input: Option<&Path>,
    output: OutputArgs,
) -> i32 {
    let cfg = RoutingConfig {
        template: template.template,
        delimiter: template.delimiter,
        default_value: policy.default_value,
        error_on_empty: policy.error_on_empty,
        remove_values: policy.remove,
    };
    let routing = match cfg.compile() {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let Some(content) = read_input(input, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };
    let entries = match decode_lines(&content) {
        Ok(entries) => entries,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    for (idx, entry) in entries.into_iter().enumerate() {
        let mut record = entry.record;
        let mut line = EvalLine {
            record_no: idx + 1,
            routing_key: None,
            skipped: None,
            record: None,
        };

        match routing.route(&mut record) {
            Ok(RoutingDecision::Route(key)) => line.routing_key = Some(key),
            Ok(RoutingDecision::Skip { cause }) => {
                line.skipped = Some(cause.map_or_else(
                    || "empty routing key".to_string(),
                    |e| e.to_string(),
                ));
            }
            Err(e) => {
                print_error(
                    output.format,
                    output.quiet,
                    &format!("record {}: {e}", idx + 1),
                );
                return exit_codes::RUN_FAILED;
            }
        }
        if show_record {
            line.record = Some(record);
        }

        if output.format == OutputFormat::Text && !output.quiet {
            match (&line.routing_key, &line.skipped) {
                (Some(key), _) => println!("{key}"),
                (None, Some(reason)) => eprintln!("skipped record {}: {reason}", line.record_no),
                (None, None) => {}
            }
            if let Some(record) = &line.record {
                println!("{}", serde_json::Value::Object(record.clone()));
            }
        } else {
            print_result(output.format, output.quiet, &line);
        }
    }

    exit_codes::SUCCESS
}
