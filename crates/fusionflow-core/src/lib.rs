//! FusionFlow Core
//!
//! 宣言的トポロジー（リージョン → アベイラビリティゾーン → NIG / ストレージエンドポイント / アレイ）
//! のデータモデルと YAML ローダーを提供します。

pub mod error;
pub mod loader;
pub mod model;

pub use error::{Result, TopologyError};
pub use loader::{load_topology, parse_topology};
pub use model::*;
