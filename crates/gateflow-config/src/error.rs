use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "スタック設定ファイルが見つかりません: Pulumi.{stack}.yaml\n\
        以下の場所を確認してください:\n\
        - カレントディレクトリ\n\
        - ./infra/ ディレクトリ\n\
        - ~/.config/gateflow/\n\
        または GATEFLOW_CONFIG_PATH 環境変数で直接指定できます"
    )]
    StackFileNotFound { stack: String },

    #[error("スタック設定の読み込みに失敗しました: {path}\n理由: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("必須の設定値がありません: {0}")]
    MissingKey(String),

    #[error("設定値 '{key}' が不正です: {message}")]
    InvalidValue { key: String, message: String },

    #[error("設定値 '{0}' は secure 値のためローカルでは復号できません")]
    SecretValue(String),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
