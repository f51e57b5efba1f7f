use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "s3check")]
#[command(
    author,
    version,
    about = "Inspect the S3 error catalogue and check conformance harness configuration"
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[clap(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered S3 error codes with their expected status patterns
    Codes {
        /// Only show codes below this dotted path (e.g. client, server)
        #[clap(short, long)]
        prefix: Option<String>,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Classify an observed error response against the catalogue
    Classify {
        /// HTTP status of the response
        #[clap(short, long)]
        status: u16,

        /// S3 error code of the response (e.g. NoSuchKey)
        #[clap(short, long, conflicts_with = "body")]
        code: Option<String>,

        /// File holding the XML error body of the response
        #[clap(short, long)]
        body: Option<String>,

        /// Expected error code path; report why the response does or does not match it
        #[clap(short, long)]
        expect: Option<String>,
    },

    /// Load and validate a harness configuration file
    CheckConfig {
        /// Configuration file path (defaults to s3check.toml)
        #[clap(short, long, default_value = "s3check.toml")]
        config: String,

        /// Generate the configuration file if it doesn't exist
        #[clap(long, default_value_t = false)]
        init: bool,

        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Decode a compute version response document
    ValidateVersion {
        /// File holding the JSON response body
        file: String,

        /// HTTP status the response came with
        #[clap(short, long, default_value_t = 200)]
        status: u16,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human readable table
    Table,

    /// JSON array, one object per code
    Json,
}
