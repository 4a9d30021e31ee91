//! Settings structure
// (c) 2024 Ross Younger

use std::net::SocketAddr;

use figment::{
    value::{Dict, Map, Value},
    Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};

/// The set of configurable options supported by the exporter.
///
/// **Note:** The implementation of `default()` for this struct returns the hard-wired defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the IPsec configuration file. This may be a glob pattern, in which case
    /// all matching files are concatenated.
    pub config_path: String,
    /// Address on which to expose metrics
    pub listen_address: SocketAddr,
}

impl Settings {
    /// The names of the supported fields
    pub const FIELD_NAMES: &'static [&'static str] = &["config_path", "listen_address"];
}

impl Default for Settings {
    /// **(Unusual!)**
    /// Returns the hard-wired defaults.
    fn default() -> Self {
        Self {
            config_path: "/etc/ipsec.conf".into(),
            listen_address: SocketAddr::from(([0, 0, 0, 0], 9536)),
        }
    }
}

/// Helper function for `figment::Provider` implementation
///
/// If the given `arg` is not None, inserts it into `dict` with key `arg_name`.
fn insert_if_some<T>(dict: &mut Dict, arg_name: &str, arg: Option<T>) -> Result<(), figment::Error>
where
    T: Serialize,
{
    if let Some(a) = arg {
        let _ = dict.insert(arg_name.to_string(), Value::serialize(a)?);
    }
    Ok(())
}

/// Settings given on the command line.
///
/// Everything is optional; only what the user actually entered overrides lower-priority sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// See [`Settings::config_path`]
    pub config_path: Option<String>,
    /// See [`Settings::listen_address`]
    pub listen_address: Option<SocketAddr>,
}

impl SettingsOverrides {
    fn option_for(field: &str) -> String {
        match field {
            "listen_address" => "--web.listen-address".into(),
            other => format!("--{}", other.replace('_', "-")),
        }
    }
}

impl Provider for SettingsOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named("command-line").interpolater(|_profile, path| {
            path.last()
                .map_or_else(|| "<unknown>".to_string(), |k| Self::option_for(k))
        })
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        insert_if_some(&mut dict, "config_path", self.config_path.clone())?;
        insert_if_some(&mut dict, "listen_address", self.listen_address)?;

        let mut profile_map = Map::new();
        let _ = profile_map.insert(Profile::Global, dict);
        Ok(profile_map)
    }
}
