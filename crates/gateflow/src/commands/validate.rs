use super::{compose, print_header};
use colored::Colorize;
use gateflow_cloud::preflight;
use gateflow_cloud_gcp::Gcloud;
use std::path::Path;

pub async fn handle(stack: &str, source_dir: Option<&Path>, remote: bool) -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    let composition = match compose(stack, source_dir) {
        Ok(composition) => composition,
        Err(e) => {
            // 詳細は main から一度だけ表示される
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            return Err(e);
        }
    };

    print_header(&composition);
    println!("{}", "✓ 設定とデプロイテンプレートは正常です！".green().bold());
    println!();

    let composed = &composition.stack;
    println!("サマリー:");
    println!("  関数: {}個", composed.compute.functions.len());
    for rule in &composed.routing.backends.path_rules {
        println!("    - {} → {}", rule.paths.join(", ").cyan(), rule.service.name());
    }
    println!(
        "  アーカイブ: {}",
        composed.compute.artifact.url().cyan()
    );
    println!("  リソース: {}個", composed.graph.len());
    for (resource_type, count) in composed.graph.type_counts() {
        println!("    - {} ×{}", resource_type, count);
    }

    if remote {
        println!();
        println!("{}", "既存リソースを確認中...".blue());
        let gcloud = Gcloud::new(&composition.settings.project);
        let report = preflight(&composed.graph, &gcloud).await?;
        if let Some(account) = &report.account {
            println!("アカウント: {}", account.cyan());
        }
        for label in &report.verified {
            println!("  {} {}", "✓".green(), label);
        }
    }

    Ok(())
}
