use super::preview::{plan_against_store, print_plan};
use super::{compose, print_header};
use colored::Colorize;
use gateflow_cloud::{ActionType, ProgramStore};
use std::path::Path;

pub async fn handle(
    stack: &str,
    source_dir: Option<&Path>,
    stdout: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let composition = compose(stack, source_dir)?;

    // 標準出力にはプログラムのみを出す
    if stdout {
        print!("{}", composition.program.to_yaml()?);
        return Ok(());
    }

    println!("{}", "プログラムを生成中...".blue());
    print_header(&composition);

    let plan = plan_against_store(&composition).await?;
    println!();
    print_plan(&plan);

    if !plan.has_changes {
        return Ok(());
    }

    // 確認（削除を含み --yes が指定されていない場合）
    let deletes = plan.actions_by_type(ActionType::Delete);
    if !deletes.is_empty() && !yes {
        println!();
        println!(
            "{}",
            format!(
                "警告: {}個のリソースがプログラムから削除されます。",
                deletes.len()
            )
            .yellow()
        );
        println!("書き込むには --yes オプションを指定してください");
        return Ok(());
    }

    let store = ProgramStore::new(&composition.project_root, stack);
    let path = store.save(&composition.program).await?;

    println!();
    println!("{}", "✓ プログラムを書き込みました".green().bold());
    println!("  {}", path.display().to_string().cyan());
    println!();
    println!(
        "デプロイするには {} で {} を実行してください",
        store.program_dir().display().to_string().cyan(),
        format!("pulumi up --stack {}", stack).cyan()
    );

    Ok(())
}
