//! トポロジーローダー
//!
//! YAML ファイルを読み込み、型付きのトポロジーモデルへ変換します。
//! 型と構造以外の検証（名前の一意性など）はリモート API に委ねます。

use crate::error::{Result, TopologyError};
use crate::model::Topology;
use std::path::Path;
use tracing::{debug, info, instrument};

/// YAML 文字列をパース
pub fn parse_topology(content: &str) -> Result<Topology> {
    // 空ファイルはリージョン 0 件として扱う
    if content.trim().is_empty() {
        debug!("Topology document is empty");
        return Ok(Topology::default());
    }

    let topology: Topology = serde_yaml::from_str(content)?;
    Ok(topology)
}

/// ファイルからトポロジーをロード
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_topology(path: &Path) -> Result<Topology> {
    debug!("Reading topology file");
    let content = std::fs::read_to_string(path).map_err(|e| TopologyError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let topology = parse_topology(&content).map_err(|e| match e {
        TopologyError::YamlParse(source) => TopologyError::InvalidFile {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let summary = topology.summary();
    info!(
        regions = summary.regions,
        availability_zones = summary.availability_zones,
        arrays = summary.arrays,
        "Topology loaded successfully"
    );

    Ok(topology)
}
