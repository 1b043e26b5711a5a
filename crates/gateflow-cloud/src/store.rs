//! Program storage
//!
//! Manages `.gateflow/<stack>/Pulumi.yaml`, the program most recently handed
//! to the provisioning engine for a stack.

use crate::error::{CloudError, Result};
use crate::program::Program;
use std::path::{Path, PathBuf};
use tokio::fs;

const STORE_DIR: &str = ".gateflow";
const PROGRAM_FILE: &str = "Pulumi.yaml";
const PROGRAM_BACKUP: &str = "Pulumi.yaml.backup";

/// Reads and writes the engine program for one stack
pub struct ProgramStore {
    project_root: PathBuf,
    stack: String,
}

impl ProgramStore {
    pub fn new(project_root: impl AsRef<Path>, stack: impl Into<String>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            stack: stack.into(),
        }
    }

    /// Directory the engine is run from
    pub fn program_dir(&self) -> PathBuf {
        self.project_root.join(STORE_DIR).join(&self.stack)
    }

    pub fn program_path(&self) -> PathBuf {
        self.program_dir().join(PROGRAM_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.program_dir().join(PROGRAM_BACKUP)
    }

    async fn ensure_program_dir(&self) -> Result<()> {
        let dir = self.program_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created program directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the last written program, if any
    pub async fn load(&self) -> Result<Option<Program>> {
        let path = self.program_path();
        if !path.exists() {
            tracing::debug!("No program written yet for stack {}", self.stack);
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let program = Program::from_yaml(&content).map_err(|e| {
            CloudError::ProgramError(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!("Loaded program with {} resources", program.resources.len());
        Ok(Some(program))
    }

    /// Write the program, keeping the previous one as a backup
    pub async fn save(&self, program: &Program) -> Result<PathBuf> {
        self.ensure_program_dir().await?;

        let path = self.program_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created program backup");
        }

        fs::write(&path, program.to_yaml()?).await?;

        tracing::info!(
            path = %path.display(),
            resources = program.resources.len(),
            "Saved program"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ResourceGraph;
    use crate::resource::Resource;
    use tempfile::tempdir;

    fn program(bucket: &str) -> Program {
        let mut graph = ResourceGraph::new();
        graph
            .declare(Resource::new("gcp:storage:Bucket", bucket).with("name", bucket))
            .unwrap();
        Program::from_graph("acme-backend", &graph)
    }

    #[tokio::test]
    async fn test_save_load() {
        let temp_dir = tempdir().unwrap();
        let store = ProgramStore::new(temp_dir.path(), "dev");

        let path = store.save(&program("bucket-a")).await.unwrap();
        assert!(path.ends_with(".gateflow/dev/Pulumi.yaml"));

        let loaded = store.load().await.unwrap().unwrap();
        assert!(loaded.resources.contains_key("bucket-a"));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = ProgramStore::new(temp_dir.path(), "dev");
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let store = ProgramStore::new(temp_dir.path(), "prod");

        store.save(&program("bucket-a")).await.unwrap();
        store.save(&program("bucket-b")).await.unwrap();

        let backup = std::fs::read_to_string(store.program_dir().join(PROGRAM_BACKUP)).unwrap();
        assert!(backup.contains("bucket-a"));
        let current = store.load().await.unwrap().unwrap();
        assert!(current.resources.contains_key("bucket-b"));
    }

    #[tokio::test]
    async fn test_corrupt_program() {
        let temp_dir = tempdir().unwrap();
        let store = ProgramStore::new(temp_dir.path(), "dev");
        std::fs::create_dir_all(store.program_dir()).unwrap();
        std::fs::write(store.program_path(), "resources: [not, a, map]").unwrap();

        assert!(matches!(
            store.load().await,
            Err(CloudError::ProgramError(_))
        ));
    }
}
