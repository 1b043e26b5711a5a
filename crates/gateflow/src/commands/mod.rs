pub mod preview;
pub mod synth;
pub mod validate;

use colored::Colorize;
use gateflow_cloud::Program;
use gateflow_cloud_gcp::ComposedStack;
use gateflow_config::StackSettings;
use std::path::{Path, PathBuf};

/// デプロイテンプレートと関数アーカイブの既定ディレクトリ
pub const SOURCE_DIR: &str = "source_code";

/// スタック名を決定（未指定ならヒントを表示してエラー）
pub fn determine_stack(stack: Option<String>) -> anyhow::Result<String> {
    match stack {
        Some(stack) if !stack.is_empty() => Ok(stack),
        _ => {
            eprintln!(
                "{} スタックが指定されていません。",
                "Error:".red().bold()
            );
            eprintln!();
            eprintln!(
                "{}",
                "ヒント: 以下のいずれかの方法でスタックを指定してください:".yellow()
            );
            eprintln!("  gateflow <command> <stack>                 例: gateflow preview dev");
            eprintln!("  gateflow <command> -s <stack>              例: gateflow preview -s dev");
            eprintln!("  GATEFLOW_STACK=<stack> gateflow <command>  例: GATEFLOW_STACK=dev gateflow preview");
            anyhow::bail!("スタックが指定されていません")
        }
    }
}

/// 設定とテンプレートから組み立てたスタック
pub struct Composition {
    pub settings: StackSettings,
    pub project_root: PathBuf,
    pub stack: ComposedStack,
    pub program: Program,
}

/// スタック設定を読み込み、全リソースを組み立てる
pub fn compose(stack: &str, source_dir: Option<&Path>) -> anyhow::Result<Composition> {
    let (settings, project_root) = gateflow_config::load_stack(stack)?;
    let source_dir = source_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_root.join(SOURCE_DIR));

    tracing::debug!(
        root = %project_root.display(),
        source_dir = %source_dir.display(),
        "Composing stack"
    );

    let descriptor = gateflow_core::load_descriptor(&source_dir)?;
    let composed = gateflow_cloud_gcp::compose(&settings, &descriptor, &source_dir)?;
    let program = composed.to_program(&settings);

    Ok(Composition {
        settings,
        project_root,
        stack: composed,
        program,
    })
}

/// スタックの概要を表示
pub fn print_header(composition: &Composition) {
    let settings = &composition.settings;
    println!("スタック: {}", settings.stack.cyan());
    println!("プロジェクト: {}", settings.project.cyan());
    println!(
        "ドメイン: {}",
        format!("https://{}", settings.target_domain).cyan()
    );
}
