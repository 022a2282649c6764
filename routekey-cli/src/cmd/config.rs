use std::io::Read;
use std::path::Path;

use routekey_core::{load_config_str, ConfigFormat};
use serde::de::DeserializeOwned;

use crate::output::print_error;
use crate::OutputArgs;

/// Read a JSON or YAML config file, reporting failures on stderr.
pub fn load_config<T: DeserializeOwned>(path: &Path, output: &OutputArgs) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return None;
        }
    };
    match load_config_str::<T>(&content, ConfigFormat::Auto) {
        Ok(loaded) => Some(loaded.config),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            None
        }
    }
}

/// Read the whole input from `path`, or from stdin when it is absent or `-`.
pub fn read_input(path: Option<&Path>, output: &OutputArgs) -> Option<String> {
    let result = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    match result {
        Ok(content) => Some(content),
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read input: {e}"),
            );
            None
        }
    }
}
