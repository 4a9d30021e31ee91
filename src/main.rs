//! ipsec_exporter - main entrypoint
// (c) 2024 Ross Younger

fn main() -> anyhow::Result<std::process::ExitCode> {
    ipsec_exporter::cli()
}
