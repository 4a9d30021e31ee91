// Top-level command-line arguments
// (c) 2024 Ross Younger

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::config::SettingsOverrides;

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(crate::VERSION_STRING),
    about,
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    // MODE SELECTION ======================================================================
    /// Outputs the active settings, and where each came from, then exits.
    #[arg(long, action, help_heading("Modes"))]
    pub(crate) show_settings: bool,

    /// Resolves the IPsec configuration, prints the connections found, then exits.
    ///
    /// If a configuration file cannot be read, the connections found before the failure are
    /// still printed, and the exit status is nonzero.
    #[arg(long, action, help_heading("Modes"), conflicts_with("show_settings"))]
    pub(crate) list_connections: bool,

    // SETTINGS ============================================================================
    /// Path to the ipsec config file [default: /etc/ipsec.conf]
    ///
    /// This may be a glob pattern. If it matches several files, they are concatenated
    /// in lexical order and treated as one configuration.
    #[arg(long, value_name("PATH"), help_heading("Configuration"))]
    pub(crate) config_path: Option<String>,

    /// Address on which to expose metrics [default: 0.0.0.0:9536]
    #[arg(
        long("web.listen-address"),
        value_name("ADDRESS:PORT"),
        help_heading("Configuration")
    )]
    pub(crate) listen_address: Option<SocketAddr>,

    /// Reads exporter settings from the given TOML file, which must exist.
    ///
    /// Values in this file override the system settings file; environment variables and
    /// command-line options override this file.
    #[arg(long, value_name("FILE"), help_heading("Configuration"))]
    pub(crate) settings: Option<PathBuf>,

    // DEBUG ===============================================================================
    /// Quiet mode; reports only errors
    #[arg(short, long, action, conflicts_with("debug"), help_heading("Debug"))]
    pub(crate) quiet: bool,

    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=ipsec_exporter=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"))]
    pub(crate) debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, help_heading("Debug"), value_name("FILE"))]
    pub(crate) log_file: Option<String>,
}

impl CliArgs {
    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// The settings the user entered on the command line
    pub(crate) fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_path: self.config_path.clone(),
            listen_address: self.listen_address,
        }
    }
}
