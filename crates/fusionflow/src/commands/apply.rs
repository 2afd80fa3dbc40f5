use crate::console::ConsoleReporter;
use crate::utils;
use clap::Args;
use colored::Colorize;
use fusionflow_cloud::{ApplyReport, PollConfig, Provisioner, Reporter, validate_topology};
use fusionflow_cloud_http::{ACCESS_TOKEN_ENV, ClientConfig, FusionClient, HttpError};
use std::path::Path;
use std::time::Duration;

/// 操作ポーリングの設定
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// 操作ステータスを確認する最小間隔（秒）
    #[arg(
        long = "poll-interval",
        env = "FUSION_POLL_INTERVAL_SECS",
        default_value_t = 1.0
    )]
    pub interval: f64,

    /// 操作ステータスを確認する最大間隔（秒）
    #[arg(long = "poll-max-interval", default_value_t = 10.0)]
    pub max_interval: f64,

    /// 1つの操作を待つ上限（秒）
    #[arg(
        long = "poll-timeout",
        env = "FUSION_POLL_TIMEOUT_SECS",
        default_value_t = 600
    )]
    pub timeout: u64,
}

impl PollArgs {
    pub fn to_config(&self) -> anyhow::Result<PollConfig> {
        let interval = seconds("--poll-interval", self.interval)?;
        let max_interval = seconds("--poll-max-interval", self.max_interval)?;
        if max_interval < interval {
            anyhow::bail!("--poll-max-interval は --poll-interval 以上にしてください");
        }
        if self.timeout == 0 {
            anyhow::bail!("--poll-timeout は1秒以上にしてください");
        }

        Ok(PollConfig {
            interval,
            max_interval,
            timeout: Duration::from_secs(self.timeout),
            ..PollConfig::default()
        })
    }
}

fn seconds(flag: &str, value: f64) -> anyhow::Result<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => anyhow::bail!("{} には正の秒数を指定してください: {}", flag, value),
    }
}

pub async fn handle(
    topology_path: Option<&Path>,
    api_host: Option<String>,
    poll: &PollArgs,
) -> anyhow::Result<()> {
    println!("{}", "トポロジーを適用します...".blue().bold());
    let topology = utils::load_topology(topology_path)?;
    let poll = poll.to_config()?;

    if topology.is_empty() {
        println!("{}", "適用するリソースがありません".yellow());
        ConsoleReporter.complete(&ApplyReport::new());
        return Ok(());
    }

    // API に触れる前に、全リクエストを組み立てられることを確認
    let invalid = validate_topology(&topology);
    if !invalid.is_empty() {
        for error in &invalid {
            eprintln!("  {} {}", "✗".red(), error);
        }
        anyhow::bail!("トポロジーに不正な値が {}件 あります", invalid.len());
    }

    let mut config = ClientConfig::from_env().map_err(|e| match e {
        HttpError::MissingEnvVar(_) => anyhow::anyhow!(
            "{} が設定されていません。APIのアクセストークンを設定してください",
            ACCESS_TOKEN_ENV
        ),
        other => other.into(),
    })?;
    if let Some(host) = api_host {
        config.base_url = host;
    }

    let client = FusionClient::new(config)?;
    println!("API: {}", client.base_url().as_str().cyan());
    println!();

    let reporter = ConsoleReporter;
    if let Err(e) = Provisioner::new(&client, &poll, &reporter)
        .run(&topology)
        .await
    {
        eprintln!();
        eprintln!("{}", "✗ プロビジョニングを中断しました".red().bold());
        eprintln!("  再実行すると、作成済みのリソースはそのまま引き継がれます");
        return Err(e.into());
    }

    Ok(())
}
