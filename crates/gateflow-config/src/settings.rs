//! スタック設定
//!
//! `Pulumi.<stack>.yaml` の `config:` マップを読み込み、型付きの設定値として公開します。

use crate::error::{ConfigError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// プロバイダー設定の名前空間
pub const PROVIDER_NAMESPACE: &str = "gcp";

#[derive(Debug, Deserialize)]
struct StackFile {
    #[serde(default)]
    config: IndexMap<String, Value>,
}

/// `namespace:key` 形式の生の設定マップ
#[derive(Debug, Clone, Default)]
pub struct StackConfig {
    values: IndexMap<String, Value>,
}

impl StackConfig {
    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// YAML文字列から読み込む
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: StackFile = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: Default::default(),
            message: e.to_string(),
        })?;
        debug!(keys = file.config.len(), "Loaded stack config");
        Ok(Self {
            values: file.config,
        })
    }

    /// キーに対応する値を探す
    ///
    /// `gcp:region` のように名前空間付きで指定した場合は完全一致、
    /// `targetDomain` のように名前空間なしで指定した場合は
    /// プロバイダー以外の名前空間（通常はプロジェクト名）から探します。
    fn lookup(&self, key: &str) -> Option<&Value> {
        if key.contains(':') {
            return self.values.get(key);
        }
        self.values.iter().find_map(|(name, value)| {
            let matches = match name.rsplit_once(':') {
                Some((ns, k)) => ns != PROVIDER_NAMESPACE && k == key,
                None => name == key,
            };
            matches.then_some(value)
        })
    }

    /// 文字列として取得（未設定なら None）
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self.lookup(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Mapping(m)) if m.contains_key("secure") => {
                Err(ConfigError::SecretValue(key.to_string()))
            }
            Some(_) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "文字列・真偽値・数値のいずれかを指定してください".to_string(),
            }),
        }
    }

    /// 文字列として取得（未設定ならエラー）
    pub fn require(&self, key: &str) -> Result<String> {
        match self.get(key)? {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ConfigError::MissingKey(key.to_string())),
        }
    }

    /// 真偽値として取得
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key)?.as_deref() {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("true / false を指定してください（実際の値: {}）", other),
            }),
        }
    }
}

/// 型付きのスタック設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    /// スタック名（dev, prod など）
    pub stack: String,
    /// GCPプロジェクトID
    pub project: String,
    /// リージョン（us-central1 など）
    pub region: String,
    /// ゾーン
    pub zone: Option<String>,
    /// リソース名とラベルに使うタグ
    pub general_tag_name: String,
    /// ロードバランサーで受けるドメイン
    pub target_domain: String,
    /// 未知のホストのリダイレクト先
    pub target_domain_redirect: String,
    /// 既存のVPCネットワーク名
    pub vpc_network: String,
    /// VPCコネクタのCIDR（/28）
    pub vpc_connector_range: String,
    /// Serverless Framework のサービス名（アーカイブ名になる）
    pub sls_service_name: String,
    /// ポート80のルートを作るか
    pub alb_http_route: bool,
    /// X-Powered-By ヘッダーの値
    pub alb_header_powered_by: String,
}

impl StackSettings {
    /// 生の設定から型付き設定を作る
    pub fn from_config(stack: impl Into<String>, config: &StackConfig) -> Result<Self> {
        let general_tag_name = config.require("generalTagName")?;
        let alb_header_powered_by = config
            .get("albHeaderPoweredBy")?
            .unwrap_or_else(|| general_tag_name.clone());

        Ok(Self {
            stack: stack.into(),
            project: config.require("gcp:project")?,
            region: config.require("gcp:region")?,
            zone: config.get("gcp:zone")?,
            general_tag_name,
            target_domain: config.require("targetDomain")?,
            target_domain_redirect: config.require("targetDomainRedirect")?,
            vpc_network: config.require("vpcNetwork")?,
            vpc_connector_range: config.require("vpcConnectorRange")?,
            sls_service_name: config.require("slsServiceName")?,
            alb_http_route: config.get_bool("albHttpRoute")?.unwrap_or(false),
            alb_header_powered_by,
        })
    }

    /// 生成リソース名のプレフィックス（`<generalTagName>-<stack>`）
    pub fn general_prefix(&self) -> String {
        format!("{}-{}", self.general_tag_name, self.stack)
    }
}
