//! トポロジーのルート構造
//!
//! YAML のトップレベルはリージョンのリストです。

use super::{Array, NetworkInterfaceGroup, StorageEndpoint};
use serde::{Deserialize, Serialize};

/// 宣言的トポロジー全体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    pub regions: Vec<Region>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// リソース種別ごとの件数を集計
    pub fn summary(&self) -> TopologySummary {
        let zones = || self.regions.iter().flat_map(|r| r.availability_zones.iter());

        TopologySummary {
            regions: self.regions.len(),
            availability_zones: zones().count(),
            network_interface_groups: zones().map(|z| z.network_interface_groups.len()).sum(),
            storage_endpoints: zones().map(|z| z.storage_endpoints.len()).sum(),
            arrays: zones().map(|z| z.arrays.len()).sum(),
        }
    }
}

/// リージョン（最上位のコンテナ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub availability_zones: Vec<AvailabilityZone>,
}

impl Region {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// アベイラビリティゾーン
///
/// 所属リージョンは名前でのみ参照されます（親への所有関係は持たない）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub network_interface_groups: Vec<NetworkInterfaceGroup>,

    #[serde(default)]
    pub storage_endpoints: Vec<StorageEndpoint>,

    #[serde(default)]
    pub arrays: Vec<Array>,
}

impl AvailabilityZone {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// トポロジーの集計結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopologySummary {
    pub regions: usize,
    pub availability_zones: usize,
    pub network_interface_groups: usize,
    pub storage_endpoints: usize,
    pub arrays: usize,
}
