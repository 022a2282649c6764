use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TemplateArgs {
    /// Routing-key template, e.g. `app.$["service"].$["level"]`.
    #[arg(long, short)]
    pub template: String,
    #[arg(long, short, default_value = ".")]
    pub delimiter: String,
}

#[derive(Debug, Args, Clone)]
pub struct PolicyArgs {
    /// Remove every resolved value from the record.
    #[arg(long)]
    pub remove: bool,
    /// Routing key used when the template resolves to nothing.
    #[arg(long = "default")]
    pub default_value: Option<String>,
    /// Fail instead of skipping records without a routing key.
    #[arg(long)]
    pub error_on_empty: bool,
}
