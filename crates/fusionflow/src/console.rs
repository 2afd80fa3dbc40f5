//! 端末向けの進捗表示

use colored::Colorize;
use fusionflow_cloud::{ApplyOutcome, ApplyReport, ProvisionError, Reporter, Step};

/// 各ステップを開始前に1行ずつ表示する
///
/// 致命的なエラーで中断した場合も、最後の行でどこまで進んだかがわかる。
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn attempt(&self, step: &Step) {
        println!("{} {}", "→".blue(), step);
    }

    fn applied(&self, _step: &Step, outcome: ApplyOutcome) {
        let mark = match outcome {
            ApplyOutcome::Created | ApplyOutcome::Updated => "✓".green(),
            ApplyOutcome::Reserved | ApplyOutcome::Recovered => "•".yellow(),
        };
        println!("  {} {}", mark, outcome);
    }

    fn failed(&self, _step: &Step, error: &ProvisionError) {
        eprintln!("  {} {}", "✗".red(), error);
    }

    fn complete(&self, report: &ApplyReport) {
        println!();
        println!("{}", "✓ Done setting up infrastructure!".green().bold());
        println!("  {} ({}ms)", report.summary(), report.duration_ms);
    }
}
