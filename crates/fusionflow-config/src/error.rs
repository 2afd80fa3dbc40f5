use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "トポロジーファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: infrastructure.local.yaml, infrastructure.yaml, infrastructure.yml\n\
        - ./config/ ディレクトリ\n\
        - ~/.config/fusionflow/infrastructure.yaml\n\
        または FUSION_TOPOLOGY_PATH 環境変数で直接指定できます"
    )]
    TopologyFileNotFound,

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
