use colored::Colorize;
use fusionflow_core::Topology;
use std::path::Path;

/// トポロジーファイルを解決して読み込む
pub fn load_topology(explicit: Option<&Path>) -> anyhow::Result<Topology> {
    let path = fusionflow_config::resolve_topology_file(explicit)?;
    println!("トポロジー: {}", path.display().to_string().cyan());

    let topology = fusionflow_core::load_topology(&path)?;
    tracing::debug!(regions = topology.regions.len(), "Loaded topology");
    Ok(topology)
}
