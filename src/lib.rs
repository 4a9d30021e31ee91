//! IPsec configuration exporter library
// (c) 2024 Ross Younger

mod cli;
pub use cli::cli;
/// Exporter settings
pub mod config;
/// Prometheus exporter
pub mod exporter;
/// IPsec configuration resolution
pub mod ipsec;
/// Utilities
pub mod util;

/// Version string, including the git hash where available
pub const VERSION_STRING: &str = env!("IPSEC_EXPORTER_VERSION_STRING");
