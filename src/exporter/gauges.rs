//! Gauges describing the static configuration
// (c) 2024 Ross Younger

use metrics::{describe_gauge, gauge};

use crate::ipsec::Configuration;

const CONFIGURED: &str = "ipsec_configured_connections";
const IGNORED: &str = "ipsec_ignored_connections";
const CONNECTION: &str = "ipsec_connection_configured";

/// Publishes what we know about the static configuration to the installed metrics recorder.
///
/// Each connection which is not `auto=ignore` gets its own series, labelled with the connection name.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn publish(configuration: &Configuration) {
    describe_gauge!(CONFIGURED, "Number of connections found in the IPsec configuration");
    describe_gauge!(IGNORED, "Number of connections configured with auto=ignore");
    describe_gauge!(
        CONNECTION,
        "Set to 1 for each connection that is configured and not ignored"
    );

    let ignored = configuration.iter().filter(|c| c.ignored()).count();
    gauge!(CONFIGURED).set(configuration.len() as f64);
    gauge!(IGNORED).set(ignored as f64);
    for connection in configuration.active() {
        gauge!(CONNECTION, "tunnel" => connection.name().to_owned()).set(1.0);
    }
}
