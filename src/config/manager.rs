//! Settings file wrangling
// (c) 2024 Ross Younger

use super::{Settings, BASE_SETTINGS_FILENAME, ENV_PREFIX};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::Value,
    Figment, Metadata, Provider,
};
use serde::de::DeserializeOwned;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use tabled::{settings::style::Style, Table, Tabled};

use tracing::{trace, warn};

// PATHS /////////////////////////////////////////////////////////////////////////////////////////////////////

fn system_settings_path() -> PathBuf {
    // /etc/<filename> for now
    let mut p: PathBuf = PathBuf::new();
    p.push("/etc");
    p.push(BASE_SETTINGS_FILENAME);
    p
}

// SYSTEM DEFAULTS //////////////////////////////////////////////////////////////////////////////////////////////

/// A `[https://docs.rs/figment/latest/figment/trait.Provider.html](figment::Provider)` that holds
/// our set of fixed system default options
#[derive(Debug, Default, Clone, Copy)]
struct SystemDefault {}

impl SystemDefault {
    const META_NAME: &'static str = "default";
}

impl Provider for SystemDefault {
    fn metadata(&self) -> Metadata {
        figment::Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(Settings::default()).data()
    }
}

// SETTINGS MANAGER /////////////////////////////////////////////////////////////////////////////////////////////

/// Processes and merges all possible settings sources.
///
/// In increasing order of priority:
/// 1. Hard-wired defaults
/// 2. The system-wide settings file (`/etc/ipsec_exporter.toml`), if present
/// 3. Any settings file named on the command line
/// 4. Environment variables (`IPSEC_EXPORTER_CONFIG_PATH`, `IPSEC_EXPORTER_LISTEN_ADDRESS`)
/// 5. Command-line options
///
/// The caller is responsible for merging sources 3 to 5, in that order.
#[derive(Debug, Default)]
pub struct Manager {
    /// Configuration data
    data: Figment,
}

impl Manager {
    /// Initialises this structure, reading the system settings file if there is one.
    #[must_use]
    pub fn new() -> Self {
        let mut mgr = Self::without_files();
        let path = system_settings_path();
        if path.exists() {
            mgr.merge_toml_file(path);
        } else {
            trace!("system settings file {path:?} not present");
        }
        mgr
    }

    /// Testing/internal constructor, does not read files from system
    #[must_use]
    pub(crate) fn without_files() -> Self {
        let data = Figment::new().merge(SystemDefault::default());
        Self { data }
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in a data set from a TOML file, which must exist
    pub fn merge_toml_file<T>(&mut self, toml: T)
    where
        T: AsRef<Path>,
    {
        let provider = Toml::file_exact(toml.as_ref());
        self.merge_provider(provider);
    }

    /// Merges in any `IPSEC_EXPORTER_`-prefixed environment variables
    pub fn merge_environment(&mut self) {
        self.merge_provider(Env::prefixed(ENV_PREFIX));
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// Within this crate, `T` is usually [Settings], but it isn't intrinsically required to be.
    pub fn get<T>(&self) -> Result<T, figment::Error>
    where
        T: DeserializeOwned,
    {
        self.data.extract::<T>()
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct PrettyConfig {
    field: String,
    value: String,
    source: String,
}

impl PrettyConfig {
    fn render_source(meta: Option<&Metadata>) -> String {
        if let Some(m) = meta {
            m.source
                .as_ref()
                .map_or_else(|| m.name.to_string(), figment::Source::to_string)
        } else {
            String::new()
        }
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) => s.to_string(),
            Value::Char(_tag, c) => c.to_string(),
            Value::Bool(_tag, b) => b.to_string(),
            Value::Num(_tag, num) => {
                if let Some(i) = num.to_i128() {
                    i.to_string()
                } else if let Some(u) = num.to_u128() {
                    u.to_string()
                } else if let Some(ff) = num.to_f64() {
                    ff.to_string()
                } else {
                    "<number>".into()
                }
            }
            Value::Empty(_tag, _) => "<empty>".into(),
            Value::Dict(_tag, _dict) => "<table>".into(),
            Value::Array(_tag, vec) => {
                format!(
                    "[{}]",
                    vec.iter()
                        .map(PrettyConfig::render_value)
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }

    fn new(field: &str, value: &Value, meta: Option<&Metadata>) -> Self {
        Self {
            field: field.into(),
            value: PrettyConfig::render_value(value),
            source: PrettyConfig::render_source(meta),
        }
    }
}

impl Display for Manager {
    /// Formats the known settings, their values and where each came from.
    ///
    /// Unrecognised fields are reported as warnings, not output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = match self.data.data() {
            Ok(d) => d,
            Err(e) => {
                // This isn't terribly helpful as it doesn't have metadata attached; BUT attempting to get() a struct does.
                return write!(f, "error: {e}");
            }
        };
        let Some(data) = data.get(&figment::Profile::Default) else {
            return Ok(());
        };

        let mut fields = Vec::<PrettyConfig>::new();

        for field in data.keys() {
            let meta = self.data.find_metadata(field);
            if !Settings::FIELD_NAMES.contains(&field.as_str()) {
                warn!(
                    "unrecognised setting `{field}` in {}",
                    PrettyConfig::render_source(meta)
                );
                continue;
            }
            let value = match self.data.find_value(field) {
                Ok(v) => v,
                Err(e) => {
                    writeln!(f, "error on field {field}: {e}")?;
                    continue;
                }
            };
            fields.push(PrettyConfig::new(field, &value, meta));
        }
        write!(f, "{}", Table::new(fields).with(Style::sharp()))
    }
}

#[cfg(test)]
mod test {
    use super::Manager;
    use crate::config::{Settings, SettingsOverrides};
    use crate::util::make_test_tempfile;
    use assertables::assert_contains;
    use figment::Jail;

    #[test]
    fn defaults() {
        let mgr = Manager::without_files();
        let result: Settings = mgr.get().unwrap();
        assert_eq!(Settings::default(), result);
    }

    #[test]
    fn cli_overrides_file() {
        let (path, _tempdir) = make_test_tempfile(
            r#"
            config_path = "/srv/ipsec/*.conf"
            listen_address = "127.0.0.1:9000"
        "#,
            "test.toml",
        );
        let fake_cli = SettingsOverrides {
            listen_address: Some("[::1]:9100".parse().unwrap()),
            ..Default::default()
        };
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        mgr.merge_provider(fake_cli);
        let result: Settings = mgr.get().unwrap();
        assert_eq!(result.config_path, "/srv/ipsec/*.conf");
        assert_eq!(result.listen_address, "[::1]:9100".parse().unwrap());
    }

    #[test]
    fn environment_between_file_and_cli() {
        Jail::expect_with(|jail| {
            jail.set_env("IPSEC_EXPORTER_CONFIG_PATH", "/from/env.conf");
            jail.set_env("IPSEC_EXPORTER_LISTEN_ADDRESS", "10.0.0.1:9536");
            let _ = jail.create_file(
                "settings.toml",
                r#"config_path = "/from/file.conf""#,
            )?;
            let mut mgr = Manager::without_files();
            mgr.merge_toml_file("settings.toml");
            mgr.merge_environment();
            mgr.merge_provider(SettingsOverrides {
                listen_address: Some("127.0.0.1:1".parse().unwrap()),
                ..Default::default()
            });
            let result: Settings = mgr.get()?;
            assert_eq!(result.config_path, "/from/env.conf");
            assert_eq!(result.listen_address.port(), 1);
            Ok(())
        });
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(dir.path().join("nope.toml"));
        assert!(mgr.get::<Settings>().is_err());
    }

    #[test]
    fn invalid_address() {
        let (path, _tempdir) = make_test_tempfile(
            r#"
            listen_address = "not an address"
        "#,
            "test.toml",
        );
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        let err = mgr.get::<Settings>().unwrap_err();
        assert_contains!(err.to_string(), "listen_address");
    }

    #[test]
    fn display_shows_sources() {
        let mut mgr = Manager::without_files();
        mgr.merge_provider(SettingsOverrides {
            config_path: Some("/x.conf".into()),
            ..Default::default()
        });
        let s = mgr.to_string();
        assert_contains!(s, "/x.conf");
        assert_contains!(s, "command-line");
        assert_contains!(s, "0.0.0.0:9536");
        assert_contains!(s, "default");
    }
}
