//! デプロイ記述子モデル
//!
//! Serverless Framework（google provider）が生成するデプロイテンプレートの定義

use crate::derive::{archive_object_name, bucket_name, parse_timeout};
use crate::error::{DescriptorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// デプロイテンプレート（configuration-template-*.yml）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub resources: Vec<DescriptorEntry>,
}

/// テンプレート内のリソース1件
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorEntry {
    /// リソース名（関数名またはバケット名）
    pub name: String,

    /// リソースタイプ（storage.v1.bucket, cloudfunctions.v1beta2.function など）
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub properties: EntryProperties,
}

/// リソースのプロパティ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryProperties {
    pub runtime: Option<String>,
    pub available_memory_mb: Option<u32>,
    pub entry_point: Option<String>,
    /// "60s" 形式
    pub timeout: Option<String>,
    #[serde(default, deserialize_with = "scalar_map")]
    pub environment_variables: IndexMap<String, String>,
    pub https_trigger: Option<HttpsTrigger>,
    /// gs://<bucket>/<object>
    pub source_archive_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpsTrigger {
    pub url: Option<String>,
}

/// 環境変数の値はスカラーなら文字列に揃える
fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => String::new(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "environment variable '{}' must be a scalar",
                        key
                    )));
                }
            };
            Ok((key, value))
        })
        .collect()
}

impl DescriptorEntry {
    /// バケットなどのストレージリソースか
    pub fn is_storage(&self) -> bool {
        self.resource_type.contains("storage")
    }

    /// ルーティングに使うパス（httpsTrigger.url）
    pub fn trigger_url(&self) -> Result<&str> {
        self.properties
            .https_trigger
            .as_ref()
            .and_then(|t| t.url.as_deref())
            .ok_or_else(|| self.missing("httpsTrigger.url"))
    }

    /// タイムアウト秒数（未指定なら None）
    pub fn timeout_seconds(&self) -> Result<Option<u32>> {
        self.properties
            .timeout
            .as_deref()
            .map(parse_timeout)
            .transpose()
    }

    pub(crate) fn missing(&self, property: &'static str) -> DescriptorError {
        DescriptorError::MissingProperty {
            name: self.name.clone(),
            property,
        }
    }
}

/// 関数アーカイブの配置先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub object: String,
}

impl ArtifactLocation {
    pub fn url(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object)
    }
}

/// create / update の2つのテンプレートをまとめたデプロイ記述子
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub create: Template,
    pub update: Template,
}

/// アーカイブURLを読むリソースの位置（先頭はバケット）
pub const ARCHIVE_ENTRY_INDEX: usize = 1;

impl Descriptor {
    /// ストレージ以外のリソース（= デプロイする関数）を記述順に返す
    pub fn functions(&self) -> impl Iterator<Item = &DescriptorEntry> {
        self.update.resources.iter().filter(|r| !r.is_storage())
    }

    /// バケット名とアーカイブオブジェクト名を導出する
    pub fn artifact(&self) -> Result<ArtifactLocation> {
        let storage = self
            .create
            .resources
            .iter()
            .find(|r| r.is_storage())
            .ok_or_else(|| DescriptorError::MissingStorageEntry("create".to_string()))?;
        let bucket = bucket_name(&storage.name)?;

        let entry = self
            .update
            .resources
            .get(ARCHIVE_ENTRY_INDEX)
            .ok_or(DescriptorError::MissingArchiveEntry {
                index: ARCHIVE_ENTRY_INDEX + 1,
            })?;
        let url = entry
            .properties
            .source_archive_url
            .as_deref()
            .ok_or_else(|| entry.missing("sourceArchiveUrl"))?;
        let object = archive_object_name(url, &bucket)?;

        Ok(ArtifactLocation { bucket, object })
    }
}
