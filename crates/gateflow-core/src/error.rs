use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("YAMLパースエラー: {path}\n理由: {message}")]
    YamlParse { path: PathBuf, message: String },

    #[error("ファイル読み込みエラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("テンプレート {0} にストレージリソースがありません")]
    MissingStorageEntry(String),

    #[error("リソース {index} 番目が見つかりません（アーカイブURLの取得元）")]
    MissingArchiveEntry { index: usize },

    #[error("リソース '{name}' に {property} が指定されていません")]
    MissingProperty { name: String, property: &'static str },

    #[error("バケット名 '{0}' にサフィックス（-xxx）がありません")]
    InvalidBucketName(String),

    #[error("アーカイブURL '{url}' はバケット '{bucket}' を指していません")]
    ArchiveOutsideBucket { url: String, bucket: String },

    #[error("タイムアウト '{0}' は '<整数>s' 形式で指定してください")]
    InvalidTimeout(String),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
