use super::{Composition, compose, print_header};
use colored::Colorize;
use gateflow_cloud::{ActionType, Plan, ProgramStore};
use std::path::Path;

pub async fn handle(stack: &str, source_dir: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "変更内容を確認中...".blue());

    let composition = compose(stack, source_dir)?;
    print_header(&composition);

    let plan = plan_against_store(&composition).await?;
    println!();
    print_plan(&plan);

    if plan.has_changes {
        println!();
        println!(
            "反映するには {} を実行してください",
            format!("gateflow synth {}", stack).cyan()
        );
    }

    Ok(())
}

/// 前回書き込んだプログラムとの差分
pub async fn plan_against_store(composition: &Composition) -> anyhow::Result<Plan> {
    let store = ProgramStore::new(&composition.project_root, &composition.settings.stack);
    let previous = store.load().await?;
    if previous.is_none() {
        println!("{}", "前回のプログラムはありません（すべて新規作成）".dimmed());
    }
    Ok(Plan::diff(previous.as_ref(), &composition.program))
}

pub fn print_plan(plan: &Plan) {
    println!("{}", "変更予定:".bold());
    for action in &plan.actions {
        let line = format!("{} ({})", action.description, action.resource_type);
        match action.action_type {
            ActionType::Create => println!("  {} {}", "+".green().bold(), line.green()),
            ActionType::Update => println!("  {} {}", "~".yellow().bold(), line.yellow()),
            ActionType::Delete => println!("  {} {}", "-".red().bold(), line.red()),
            ActionType::NoOp => {}
        }
    }
    for key in &plan.program_changes {
        println!(
            "  {} {}",
            "~".yellow().bold(),
            format!("プログラム設定 {} を更新", key).yellow()
        );
    }

    if !plan.has_changes {
        println!("  {}", "変更はありません".green());
    }

    println!();
    println!("サマリー: {}", plan.summary());
}
