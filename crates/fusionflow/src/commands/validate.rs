use crate::utils;
use colored::Colorize;
use fusionflow_cloud::validate_topology;
use std::path::Path;

pub fn handle(topology_path: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "トポロジーを検証中...".blue());

    let topology = match utils::load_topology(topology_path) {
        Ok(topology) => topology,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 読み込みエラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let invalid = validate_topology(&topology);
    if !invalid.is_empty() {
        eprintln!();
        eprintln!("{}", "✗ 設定エラー".red().bold());
        for error in &invalid {
            eprintln!("  {}", error);
        }
        std::process::exit(1);
    }

    let summary = topology.summary();
    println!("{}", "✓ トポロジーは正常です！".green().bold());
    println!();
    println!("サマリー:");
    println!("  リージョン: {}個", summary.regions);
    println!("  アベイラビリティゾーン: {}個", summary.availability_zones);
    println!("  ネットワークインターフェースグループ: {}個", summary.network_interface_groups);
    println!("  ストレージエンドポイント: {}個", summary.storage_endpoints);
    println!("  アレイ: {}個", summary.arrays);

    for region in &topology.regions {
        println!("    - {} ({})", region.name.cyan(), region.display_name());
        for zone in &region.availability_zones {
            println!(
                "      - {} ({}個のアレイ)",
                zone.name.cyan(),
                zone.arrays.len()
            );
        }
    }

    Ok(())
}
