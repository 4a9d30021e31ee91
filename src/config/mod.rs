// (c) 2024 Ross Younger
//! # Exporter settings
//!
//! The exporter obtains its run-time settings from the following sources, in order:
//! 1. Command-line options
//! 2. Environment variables prefixed `IPSEC_EXPORTER_`
//! 3. A settings file named with `--settings`
//! 4. The system-wide settings file (`/etc/ipsec_exporter.toml`), if present
//! 5. Hard-wired defaults
//!
//! Each option may appear in multiple places, but only the first match is used.
//!
//! ## File format
//!
//! Settings files are TOML.
//!
//! ### Example
//!
//! ```toml
//! # Read every fragment in ipsec.d; they are merged before loading
//! config_path = "/etc/ipsec.d/*.conf"
//! listen_address = "127.0.0.1:9536"
//! ```
//!
//! The full list of supported fields is defined by [Settings].
//! `ipsec_exporter --show-settings` outputs their current values and where each value came from.
//!
//! These settings control the exporter itself. The IPsec configuration it reports on is
//! handled by [`crate::ipsec`].

mod structure;
pub use structure::{Settings, SettingsOverrides};

mod manager;
pub use manager::Manager;

pub(crate) const BASE_SETTINGS_FILENAME: &str = "ipsec_exporter.toml";
pub(crate) const ENV_PREFIX: &str = "IPSEC_EXPORTER_";
