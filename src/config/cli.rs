use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the bulletin binary.
#[derive(Debug, Parser)]
#[command(
    name = "bulletin",
    version,
    about = "Company site backend: contact inbox and news"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BULLETIN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the public and administrative HTTP services.
    Serve(Box<ServeArgs>),
    /// Write contact messages to an xlsx spreadsheet.
    #[command(name = "export-contacts")]
    ExportContacts(ExportContactsArgs),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the administrative listener host.
    #[arg(long = "server-admin-host", value_name = "HOST")]
    pub server_admin_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-public-port", value_name = "PORT")]
    pub public_port: Option<u16>,

    /// Override the administrative listener port.
    #[arg(long = "server-admin-port", value_name = "PORT")]
    pub admin_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

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

    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the number of contact messages per admin page.
    #[arg(long = "admin-page-size", value_name = "COUNT")]
    pub admin_page_size: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportContactsArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Only export messages with this status (unread|read|deleted).
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Only export messages containing this text.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only export messages created in this month (YYYY-MM).
    #[arg(long, value_name = "MONTH")]
    pub month: Option<String>,

    /// Row order (newest|oldest|name).
    #[arg(long, value_name = "ORDER", default_value = "newest")]
    pub sort: String,

    /// Path of the spreadsheet to write.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}
