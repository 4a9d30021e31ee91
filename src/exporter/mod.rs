// (c) 2024 Ross Younger
//! # Prometheus exporter
//!
//! Resolves the IPsec configuration once at startup, then serves metrics describing it over HTTP.
//!
//! * `/` is a landing page.
//! * `/metrics` is the Prometheus text exposition.
//!
//! Live tunnel status is not collected here.

use anyhow::Context as _;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::warn;

use crate::{
    config::Settings,
    ipsec::{resolve_root, Configuration, Loader},
};

mod gauges;
mod server;

/// Resolves and loads the IPsec configuration named by the settings.
///
/// Unlike [`Loader::load`], a read failure here is an error outright; the partial
/// configuration is discarded.
pub fn load(settings: &Settings) -> anyhow::Result<Configuration> {
    let root = resolve_root(&settings.config_path)
        .with_context(|| format!("resolving configuration path {}", settings.config_path))?;
    let configuration = Loader::new(root).load()?;
    if !configuration.has_tunnels() {
        warn!("Found no configured connections in {}", settings.config_path);
    }
    Ok(configuration)
}

/// Publishes the configuration as metrics and serves them until interrupted.
pub async fn serve(settings: &Settings, configuration: &Configuration) -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("installing metrics recorder")?;
    gauges::publish(configuration);
    server::run(settings.listen_address, handle).await
}

#[cfg(test)]
mod test {
    use assertables::assert_contains;

    use super::load;
    use crate::config::Settings;

    #[test]
    fn load_from_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.conf"), "conn a\n").unwrap();
        std::fs::write(dir.path().join("b.conf"), "conn b\n  auto=ignore\n").unwrap();
        let settings = Settings {
            config_path: format!("{}/*.conf", dir.path().display()),
            ..Default::default()
        };
        let configuration = load(&settings).unwrap();
        assert_eq!(configuration.len(), 2);
        assert_eq!(configuration.active().count(), 1);
    }

    #[test]
    fn read_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            config_path: format!("{}/ipsec.conf", dir.path().display()),
            ..Default::default()
        };
        let err = load(&settings).unwrap_err();
        assert_contains!(err.to_string(), "ipsec.conf");
    }

    #[test]
    fn bad_root_pattern_is_fatal() {
        let settings = Settings {
            config_path: "/etc/ipsec[.conf".into(),
            ..Default::default()
        };
        let err = load(&settings).unwrap_err();
        assert_contains!(err.to_string(), "resolving configuration path");
    }
}
