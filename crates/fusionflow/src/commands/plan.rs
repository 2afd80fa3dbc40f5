use crate::utils;
use colored::Colorize;
use fusionflow_cloud::{ActionType, Plan};
use std::path::Path;

pub fn handle(topology_path: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "実行計画を作成中...".blue());
    let topology = utils::load_topology(topology_path)?;

    let plan = Plan::from_topology(&topology);
    if plan.is_empty() {
        println!("{}", "適用するリソースがありません".yellow());
        return Ok(());
    }

    println!();
    for action in &plan.actions {
        let label = match action.action_type {
            ActionType::Create => "+".green(),
            ActionType::Update => "~".yellow(),
            ActionType::Rebind => "↻".cyan(),
        };
        println!("  {} {}", label, action.description);
    }

    println!();
    println!("計画: {}", plan.summary().to_string().bold());
    println!(
        "{}",
        "既存のリソースは作成済みとして扱われます（再実行しても安全です）".dimmed()
    );
    Ok(())
}
