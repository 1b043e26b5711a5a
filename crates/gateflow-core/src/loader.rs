//! デプロイ記述子の読み込み

use crate::error::{DescriptorError, Result};
use crate::model::{Descriptor, Template};
use std::path::Path;
use tracing::{debug, info, instrument};

/// バケット作成用テンプレート
pub const CREATE_TEMPLATE: &str = "configuration-template-create.yml";
/// 関数デプロイ用テンプレート
pub const UPDATE_TEMPLATE: &str = "configuration-template-update.yml";

/// ソースディレクトリから create / update テンプレートを読み込む
#[instrument(skip(source_dir), fields(source_dir = %source_dir.display()))]
pub fn load_descriptor(source_dir: &Path) -> Result<Descriptor> {
    let create = load_template(&source_dir.join(CREATE_TEMPLATE))?;
    let update = load_template(&source_dir.join(UPDATE_TEMPLATE))?;

    let descriptor = Descriptor { create, update };
    info!(
        resources = descriptor.update.resources.len(),
        functions = descriptor.functions().count(),
        "Deployment descriptor loaded"
    );
    Ok(descriptor)
}

/// テンプレート1件を読み込む
pub fn load_template(path: &Path) -> Result<Template> {
    debug!(path = %path.display(), "Reading template");
    let content = std::fs::read_to_string(path).map_err(|e| DescriptorError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| DescriptorError::YamlParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
