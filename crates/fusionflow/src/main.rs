mod commands;
mod console;
mod utils;

use clap::{Parser, Subcommand};
use commands::apply::PollArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fusion")]
#[command(about = "書いたとおりに、何度でも。ストレージ基盤をYAMLから構築する。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// トポロジーをAPIに適用（既存リソースはそのまま）
    Apply {
        /// トポロジーファイル（省略時は自動検索）
        topology: Option<PathBuf>,
        /// APIホスト（FUSION_API_HOST より優先）
        #[arg(long)]
        api_host: Option<String>,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// 実行される操作を表示（APIには接続しない）
    Plan {
        /// トポロジーファイル（省略時は自動検索）
        topology: Option<PathBuf>,
    },
    /// トポロジーファイルを検証
    Validate {
        /// トポロジーファイル（省略時は自動検索）
        topology: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 進捗は stdout、ログは stderr に分ける
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Apply {
            topology,
            api_host,
            poll,
        } => commands::apply::handle(topology.as_deref(), api_host, &poll).await,
        Commands::Plan { topology } => commands::plan::handle(topology.as_deref()),
        Commands::Validate { topology } => commands::validate::handle(topology.as_deref()),
        Commands::Version => {
            println!("fusionflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
