//! Running formatters and package builds declared by the emitters.

use crate::error::ToolError;
use async_trait::async_trait;
use openrpc_codegen::ToolInvocation;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Runs an external command for a generated client.
#[async_trait]
pub trait ExternalToolRunner: Send + Sync {
    /// Run `invocation` with `client_dir` as the base of its working directory
    async fn run(&self, invocation: &ToolInvocation, client_dir: &Path) -> Result<(), ToolError>;
}

/// Spawns the command and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

#[async_trait]
impl ExternalToolRunner for ProcessToolRunner {
    async fn run(&self, invocation: &ToolInvocation, client_dir: &Path) -> Result<(), ToolError> {
        let command = invocation.command_line();
        let dir = client_dir.join(&invocation.working_dir);
        info!(command = %command, dir = %dir.display(), "Running external tool");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&dir)
            .output()
            .await
            .map_err(|source| ToolError::ToolSpawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::ToolFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(command = %command, "External tool finished");
        Ok(())
    }
}

/// Logs the command and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopToolRunner;

#[async_trait]
impl ExternalToolRunner for NoopToolRunner {
    async fn run(&self, invocation: &ToolInvocation, client_dir: &Path) -> Result<(), ToolError> {
        info!(
            command = %invocation.command_line(),
            dir = %client_dir.display(),
            "Skipping external tool"
        );
        Ok(())
    }
}

/// A command seen by a [`RecordingToolRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub client_dir: PathBuf,
}

/// Test double: records every command, optionally failing those run in a matching directory.
#[derive(Debug, Default)]
pub struct RecordingToolRunner {
    calls: Mutex<Vec<RecordedCall>>,
    fail_in: Option<String>,
}

impl RecordingToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any command whose client directory contains `fragment`
    pub fn failing_in(fragment: impl Into<String>) -> Self {
        Self {
            calls: Mutex::default(),
            fail_in: Some(fragment.into()),
        }
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|call| call.command.clone())
            .collect()
    }
}

#[async_trait]
impl ExternalToolRunner for RecordingToolRunner {
    async fn run(&self, invocation: &ToolInvocation, client_dir: &Path) -> Result<(), ToolError> {
        let call = RecordedCall {
            command: invocation.command_line(),
            client_dir: client_dir.to_path_buf(),
        };
        self.calls.lock().await.push(call.clone());

        match &self.fail_in {
            Some(fragment) if client_dir.to_string_lossy().contains(fragment.as_str()) => {
                Err(ToolError::ToolFailed {
                    command: call.command,
                    status: "exit status: 1".to_string(),
                    stderr: "recorded failure".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openrpc_codegen::ToolStage;

    fn invocation(program: &str, args: &[&str]) -> ToolInvocation {
        ToolInvocation::builder()
            .program(program)
            .args(args.iter().map(|arg| arg.to_string()).collect())
            .stage(ToolStage::Format)
            .build()
    }

    #[tokio::test]
    async fn test_recording_runner() {
        let runner = RecordingToolRunner::failing_in("typescript");
        runner
            .run(&invocation("black", &["src"]), Path::new("out/python/x"))
            .await
            .unwrap();
        let error = runner
            .run(&invocation("npm", &["install"]), Path::new("out/typescript/x"))
            .await
            .unwrap_err();

        assert!(matches!(error, ToolError::ToolFailed { .. }));
        assert_eq!(runner.commands().await, vec!["black src", "npm install"]);
    }

    #[tokio::test]
    async fn test_noop_runner() {
        assert!(
            NoopToolRunner
                .run(&invocation("poetry", &["build"]), Path::new("."))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_process_runner_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let error = ProcessToolRunner
            .run(
                &invocation("openrpc-codegen-no-such-program", &[]),
                dir.path(),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, ToolError::ToolSpawn { .. }));
    }
}
