pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};

/// トポロジーファイルのパスを直接指定する環境変数
pub const TOPOLOGY_PATH_ENV: &str = "FUSION_TOPOLOGY_PATH";

const CANDIDATES: [&str; 3] = [
    "infrastructure.local.yaml",
    "infrastructure.yaml",
    "infrastructure.yml",
];

/// FusionFlowのユーザー設定ディレクトリを取得
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("fusionflow");

    Ok(config_dir)
}

/// トポロジーファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 FUSION_TOPOLOGY_PATH (直接パス指定)
/// 2. カレントディレクトリ: infrastructure.local.yaml, infrastructure.yaml, infrastructure.yml
/// 3. ./config/ ディレクトリ内: 同様の順序
/// 4. ~/.config/fusionflow/infrastructure.yaml (グローバル設定)
pub fn find_topology_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(topology_path) = std::env::var(TOPOLOGY_PATH_ENV) {
        let path = PathBuf::from(topology_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} is set but {} does not exist",
            TOPOLOGY_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリ / 3. ./config/
    for dir in [current_dir.clone(), current_dir.join("config")] {
        if let Some(path) = find_in_dir(&dir) {
            return Ok(path);
        }
    }

    // 4. グローバル設定ファイル
    if let Ok(config_dir) = get_config_dir() {
        let global = config_dir.join("infrastructure.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::TopologyFileNotFound)
}

/// 明示的な指定があればそれを、なければ自動検索の結果を返す
pub fn resolve_topology_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} が見つかりません", path.display()),
        ))),
        None => find_topology_file(),
    }
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    CANDIDATES
        .iter()
        .map(|filename| dir.join(filename))
        .find(|path| path.exists())
}
