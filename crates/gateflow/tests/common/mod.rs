#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const STACK_CONFIG: &str = r#"
config:
  gcp:project: acme-dev
  gcp:region: us-central1
  acme:generalTagName: acme
  acme:targetDomain: api.acme.dev
  acme:targetDomainRedirect: acme.dev
  acme:vpcNetwork: acme-vpc
  acme:vpcConnectorRange: 10.8.0.0/28
  acme:slsServiceName: acme-functions
"#;

pub const CREATE_TEMPLATE: &str = r#"
resources:
  - type: storage.v1.bucket
    name: myfuncs-abc123-xyz
"#;

pub const UPDATE_TEMPLATE: &str = r#"
resources:
  - type: storage.v1.bucket
    name: myfuncs-abc123-xyz
  - type: cloudfunctions.v1beta2.function
    name: acme-dev-users
    properties:
      runtime: nodejs18
      entryPoint: users
      availableMemoryMb: 256
      timeout: 60s
      sourceArchiveUrl: gs://myfuncs-abc123/serverless/acme/dev/1700000000/acme.zip
      httpsTrigger:
        url: /users
  - type: cloudfunctions.v1beta2.function
    name: acme-dev-orders
    properties:
      runtime: nodejs18
      entryPoint: orders
      availableMemoryMb: 512
      timeout: 540s
      sourceArchiveUrl: gs://myfuncs-abc123/serverless/acme/dev/1700000000/acme.zip
      httpsTrigger:
        url: /orders
"#;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    /// 設定・テンプレート・アーカイブが揃ったプロジェクト
    pub fn complete() -> Self {
        let project = Self::new();
        project.write_stack_config("dev", STACK_CONFIG);
        project.write_templates(CREATE_TEMPLATE, UPDATE_TEMPLATE);
        project.write_archive("acme-functions");
        project
    }

    pub fn write_stack_config(&self, stack: &str, content: &str) {
        let path = self.root.path().join(format!("Pulumi.{}.yaml", stack));
        fs::write(path, content).unwrap();
    }

    pub fn write_templates(&self, create: &str, update: &str) {
        let dir = self.source_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("configuration-template-create.yml"), create).unwrap();
        fs::write(dir.join("configuration-template-update.yml"), update).unwrap();
    }

    pub fn write_archive(&self, service: &str) {
        let dir = self.source_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.zip", service)), b"PK\x05\x06").unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.path().join("source_code")
    }

    pub fn program_path(&self, stack: &str) -> PathBuf {
        self.root
            .path()
            .join(".gateflow")
            .join(stack)
            .join("Pulumi.yaml")
    }

    /// プロジェクトルートで実行する gateflow コマンド
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("gateflow").unwrap();
        cmd.current_dir(self.root.path())
            .env_remove("GATEFLOW_CONFIG_PATH")
            .env_remove("GATEFLOW_STACK")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
