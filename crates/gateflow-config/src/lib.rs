pub mod error;
pub mod settings;

pub use error::*;
pub use settings::{PROVIDER_NAMESPACE, StackConfig, StackSettings};

use std::path::{Path, PathBuf};
use tracing::debug;

/// スタック設定ファイル名（`Pulumi.<stack>.yaml`）
pub fn stack_file_name(stack: &str) -> String {
    format!("Pulumi.{}.yaml", stack)
}

/// スタック設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 GATEFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: Pulumi.<stack>.yaml
/// 3. ./infra/ ディレクトリ内: Pulumi.<stack>.yaml
/// 4. ~/.config/gateflow/Pulumi.<stack>.yaml (グローバル設定)
pub fn find_stack_file(stack: &str) -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("GATEFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        debug!(path = %path.display(), "GATEFLOW_CONFIG_PATH does not exist, falling back");
    }

    let current_dir = std::env::current_dir()?;
    if let Some(path) = find_stack_file_in(&current_dir, stack) {
        return Ok(path);
    }

    // 4. グローバル設定
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("gateflow").join(stack_file_name(stack));
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::StackFileNotFound {
        stack: stack.to_string(),
    })
}

/// 指定ディレクトリとその infra/ からスタック設定ファイルを探す
pub fn find_stack_file_in(dir: &Path, stack: &str) -> Option<PathBuf> {
    let file_name = stack_file_name(stack);
    [dir.join(&file_name), dir.join("infra").join(&file_name)]
        .into_iter()
        .find(|path| path.exists())
}

/// スタック設定ファイルを読み込み、型付き設定とプロジェクトルートを返す
#[tracing::instrument]
pub fn load_stack(stack: &str) -> Result<(StackSettings, PathBuf)> {
    let path = find_stack_file(stack)?;
    debug!(path = %path.display(), "Found stack file");
    let config = StackConfig::load(&path)?;
    let settings = StackSettings::from_config(stack, &config)?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((settings, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_stack_file_name() {
        assert_eq!(stack_file_name("dev"), "Pulumi.dev.yaml");
    }

    #[test]
    fn test_find_in_current_dir_before_infra() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("infra")).unwrap();
        fs::write(temp_dir.path().join("Pulumi.dev.yaml"), "config: {}").unwrap();
        fs::write(temp_dir.path().join("infra/Pulumi.dev.yaml"), "config: {}").unwrap();

        let found = find_stack_file_in(temp_dir.path(), "dev").unwrap();
        assert_eq!(found, temp_dir.path().join("Pulumi.dev.yaml"));
    }

    #[test]
    fn test_find_in_infra_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("infra")).unwrap();
        fs::write(temp_dir.path().join("infra/Pulumi.prod.yaml"), "config: {}").unwrap();

        let found = find_stack_file_in(temp_dir.path(), "prod").unwrap();
        assert!(found.ends_with("infra/Pulumi.prod.yaml"));
        assert!(find_stack_file_in(temp_dir.path(), "dev").is_none());
    }

    #[test]
    #[serial]
    fn test_find_stack_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "config: {}").unwrap();

        temp_env::with_var("GATEFLOW_CONFIG_PATH", Some(&config_path), || {
            assert_eq!(find_stack_file("dev").unwrap(), config_path);
        });
    }

    #[test]
    #[serial]
    fn test_load_stack_from_env_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("Pulumi.dev.yaml");
        fs::write(
            &config_path,
            r#"
config:
  gcp:project: acme-dev
  gcp:region: europe-west1
  backend:generalTagName: acme
  backend:targetDomain: api.acme.dev
  backend:targetDomainRedirect: acme.dev
  backend:vpcNetwork: default
  backend:vpcConnectorRange: 10.8.0.0/28
  backend:slsServiceName: acme-functions
  backend:albHttpRoute: true
"#,
        )
        .unwrap();

        temp_env::with_var("GATEFLOW_CONFIG_PATH", Some(&config_path), || {
            let (settings, root) = load_stack("dev").unwrap();
            assert_eq!(settings.stack, "dev");
            assert!(settings.alb_http_route);
            assert_eq!(root, temp_dir.path());
        });
    }
}
