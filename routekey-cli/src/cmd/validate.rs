use std::path::Path;

use routekey_core::validate;
use routekey_exec::OutputConfig;
use serde::Serialize;

use crate::cmd::config::load_config;
use crate::exit_codes;
use crate::output::{print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    template: String,
    delimiter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn validate_cmd(
    template: Option<&str>,
    delimiter: &str,
    config: Option<&Path>,
    output: OutputArgs,
) -> i32 {
    let (template, delimiter) = match config {
        Some(path) => {
            let Some(cfg) = load_config::<OutputConfig>(path, &output) else {
                return exit_codes::VALIDATION_FAILED;
            };
            let delimiter = cfg.routing.effective_delimiter().to_string();
            (cfg.routing.template, delimiter)
        }
        None => (template.unwrap_or_default().to_string(), delimiter.to_string()),
    };

    let error = validate(&template, &delimiter).err().map(|e| e.to_string());
    let result = ValidateResult {
        valid: error.is_none(),
        template,
        delimiter,
        error,
    };

    if output.format == OutputFormat::Text && !output.quiet {
        match &result.error {
            None => println!("ok: valid routing key template"),
            Some(e) => eprintln!("error: {e}"),
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}
