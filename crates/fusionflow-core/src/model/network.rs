//! ネットワークインターフェースグループ

use serde::{Deserialize, Serialize};

/// ネットワークインターフェースグループ（NIG）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaceGroup {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    pub group_type: GroupType,

    pub eth: EthConfig,
}

impl NetworkInterfaceGroup {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// グループ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Eth,
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupType::Eth => write!(f, "eth"),
        }
    }
}

/// Ethernet 設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthConfig {
    /// サブネット（例: "10.21.200.0/24"）
    pub prefix: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}
