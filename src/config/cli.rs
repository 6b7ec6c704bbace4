use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Portfolio site server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the site over HTTP.
    Serve(Box<ServeArgs>),
    /// Render every page to static HTML files.
    Build(BuildArgs),
    /// Load and validate the content document, then report what it contains.
    Check(CheckArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SiteOverrides {
    /// Override the site root directory.
    #[arg(long = "site-root", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub site_root: Option<PathBuf>,

    /// Override the content document location (path under the site root or an http(s) URL).
    #[arg(long = "site-content", value_name = "LOCATION")]
    pub site_content: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub site: SiteOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the contact relay endpoint.
    #[arg(long = "contact-endpoint", value_name = "URL")]
    pub contact_endpoint: Option<String>,

    /// Override the contact relay timeout.
    #[arg(long = "contact-timeout-seconds", value_name = "SECONDS")]
    pub contact_timeout_seconds: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub site: SiteOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Directory the rendered site is written to.
    #[arg(value_name = "OUT_DIR", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub site: SiteOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}
