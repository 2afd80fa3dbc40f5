//! ストレージエンドポイントとアレイ

use serde::{Deserialize, Serialize};

/// ストレージエンドポイント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEndpoint {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    pub endpoint_type: EndpointType,

    #[serde(default)]
    pub iscsi: IscsiConfig,
}

impl StorageEndpoint {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// エンドポイント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    Iscsi,
}

impl std::fmt::Display for EndpointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointType::Iscsi => write!(f, "iscsi"),
        }
    }
}

/// iSCSI 設定
///
/// `iscsi: { discovery_interfaces: [...] }` と、既存の設定ファイルで使われている
/// `iscsi: [...]`（ディスカバリーインターフェースのリスト）の両方を受け付けます。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IscsiRepr")]
pub struct IscsiConfig {
    pub discovery_interfaces: Vec<DiscoveryInterface>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IscsiRepr {
    List(Vec<DiscoveryInterface>),
    Map {
        #[serde(default)]
        discovery_interfaces: Vec<DiscoveryInterface>,
    },
}

impl From<IscsiRepr> for IscsiConfig {
    fn from(repr: IscsiRepr) -> Self {
        match repr {
            IscsiRepr::List(discovery_interfaces) | IscsiRepr::Map { discovery_interfaces } => {
                Self {
                    discovery_interfaces,
                }
            }
        }
    }
}

/// iSCSI ディスカバリーインターフェース
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryInterface {
    /// CIDR 表記のアドレス（例: "10.21.200.5/24"）
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interface_groups: Vec<String>,
}

/// アレイ
///
/// ネットワークインターフェースは設定ファイルでは宣言せず、作成後に実機から列挙します。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment_id: Option<String>,

    pub host_name: String,

    pub hardware_type: String,

    pub appliance_id: String,

    /// インターフェースの接続先 NIG を明示する場合に指定
    ///
    /// 省略時はゾーン内で最後に宣言された NIG に接続されます。
    /// API には送信されません。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interface_group: Option<String>,
}

impl Array {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
