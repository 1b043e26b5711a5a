mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gateflow")]
#[command(about = "関数を書く。ドメインの裏に並ぶ。", long_about = None)]
struct Cli {
    /// デプロイテンプレートと関数アーカイブのディレクトリ
    /// （省略時は <プロジェクトルート>/source_code）
    #[arg(long, global = true, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 前回生成したプログラムとの差分を表示
    Preview {
        /// スタック名 (dev, stg, prod)
        stack: Option<String>,
        /// スタック名 (-s/--stack フラグ、GATEFLOW_STACK 環境変数)
        #[arg(
            short = 's',
            long = "stack",
            env = "GATEFLOW_STACK",
            conflicts_with = "stack",
            hide = true
        )]
        stack_flag: Option<String>,
    },
    /// プロビジョニングエンジン向けのプログラムを生成
    Synth {
        /// スタック名 (dev, stg, prod)
        stack: Option<String>,
        /// スタック名 (-s/--stack フラグ、GATEFLOW_STACK 環境変数)
        #[arg(
            short = 's',
            long = "stack",
            env = "GATEFLOW_STACK",
            conflicts_with = "stack",
            hide = true
        )]
        stack_flag: Option<String>,
        /// ファイルに書き込まず標準出力に表示
        #[arg(long)]
        stdout: bool,
        /// リソースが削除される場合も確認なしで書き込む
        #[arg(short, long)]
        yes: bool,
    },
    /// 設定とデプロイテンプレートを検証
    Validate {
        /// スタック名 (dev, stg, prod)
        stack: Option<String>,
        /// スタック名 (-s/--stack フラグ、GATEFLOW_STACK 環境変数)
        #[arg(
            short = 's',
            long = "stack",
            env = "GATEFLOW_STACK",
            conflicts_with = "stack",
            hide = true
        )]
        stack_flag: Option<String>,
        /// 既存リソース（VPC・DNSゾーン）の存在を gcloud で確認
        #[arg(long)]
        remote: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdoutは synth --stdout の出力に使うので、ログはstderrに出力
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let source_dir = cli.source_dir;

    match cli.command {
        Commands::Version => {
            println!("gateflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Preview { stack, stack_flag } => {
            let stack = commands::determine_stack(stack.or(stack_flag))?;
            commands::preview::handle(&stack, source_dir.as_deref()).await?;
        }
        Commands::Synth {
            stack,
            stack_flag,
            stdout,
            yes,
        } => {
            let stack = commands::determine_stack(stack.or(stack_flag))?;
            commands::synth::handle(&stack, source_dir.as_deref(), stdout, yes).await?;
        }
        Commands::Validate {
            stack,
            stack_flag,
            remote,
        } => {
            let stack = commands::determine_stack(stack.or(stack_flag))?;
            commands::validate::handle(&stack, source_dir.as_deref(), remote).await?;
        }
    }

    Ok(())
}
