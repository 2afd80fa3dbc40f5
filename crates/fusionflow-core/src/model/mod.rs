//! モデル定義
//!
//! プロビジョニング対象となるトポロジー（リージョン → AZ → NIG / ストレージエンドポイント / アレイ）
//! のデータモデルを定義します。構築後に変更されることはありません。

mod network;
mod storage;
mod topology;

// Re-exports
pub use network::*;
pub use storage::*;
pub use topology::*;
