//! One generation run: build the context, then emit, write and post-process
//! each configured language in turn.

use crate::config::Settings;
use crate::error::ToolError;
use crate::runner::ExternalToolRunner;
use openrpc_codegen::{Emitter, GeneratorContext, TargetLanguage, ToolStage, emitter_for};
use openrpc_types::OpenRpc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, warn};

/// What happened to one target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOutcome {
    pub language: TargetLanguage,
    pub client_dir: PathBuf,
    pub files_written: usize,
    /// Set when emitting, writing or an external tool failed
    pub error: Option<String>,
}

impl LanguageOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One summary line per language, as printed by the CLI
impl fmt::Display for LanguageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(
                f,
                "✅ Generated {} client in {} ({} files)",
                self.language,
                self.client_dir.display(),
                self.files_written
            ),
            Some(error) => write!(
                f,
                "❌ {} client in {} failed after writing {} files: {}",
                self.language,
                self.client_dir.display(),
                self.files_written,
                error
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub outcomes: Vec<LanguageOutcome>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(LanguageOutcome::is_success)
    }

    pub fn failed_languages(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .map(|outcome| outcome.language.to_string())
            .collect()
    }

    /// `Err` naming the failed languages if any language failed
    pub fn into_result(self) -> Result<Self, ToolError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ToolError::LanguagesFailed {
                languages: self.failed_languages(),
            })
        }
    }
}

pub struct ClientGenerator {
    settings: Settings,
    runner: Arc<dyn ExternalToolRunner>,
}

impl ClientGenerator {
    pub fn new(settings: Settings, runner: Arc<dyn ExternalToolRunner>) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate every configured language.
    ///
    /// Document-level errors abort the run; a failing language is recorded in
    /// the report and the remaining languages still generate.
    pub async fn generate(&self, document: &OpenRpc) -> Result<GenerationReport, ToolError> {
        let generate = &self.settings.generate;
        let mut ctx =
            GeneratorContext::from_document(document)?.with_transports(generate.transports.clone());
        if let Some(url) = &generate.client_url {
            ctx = ctx.with_client_url(url.clone());
        }

        info!(
            client = %ctx.client_name(),
            methods = ctx.groups.method_count(),
            schemas = ctx.api.registry.len(),
            output = %self.settings.output.dir.display(),
            "Generating clients"
        );

        let mut report = GenerationReport::default();
        for language in &generate.languages {
            let emitter = emitter_for(*language);
            let client_dir = self.settings.output.dir.join(emitter.client_dir(&ctx));

            let (files_written, result) =
                match self.write_language(emitter.as_ref(), &ctx, &client_dir).await {
                    Ok(files_written) => (
                        files_written,
                        self.run_tools(emitter.as_ref(), &ctx, &client_dir).await,
                    ),
                    Err(e) => (0, Err(e)),
                };

            let outcome = LanguageOutcome {
                language: *language,
                client_dir,
                files_written,
                error: result.err().map(|e| e.to_string()),
            };
            match &outcome.error {
                None => info!(
                    language = %language,
                    files = files_written,
                    dir = %outcome.client_dir.display(),
                    "Generated client"
                ),
                Some(e) => error!(
                    language = %language,
                    files = files_written,
                    error = %e,
                    "Client generation failed"
                ),
            }
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Render and write one language, returning the number of files written
    async fn write_language(
        &self,
        emitter: &dyn Emitter,
        ctx: &GeneratorContext,
        client_dir: &Path,
    ) -> Result<usize, ToolError> {
        // Render everything before touching the previous output
        let files = emitter.emit_all(ctx)?;

        if fs::try_exists(client_dir).await.unwrap_or(false) {
            debug!("Removing previous output {}", client_dir.display());
            fs::remove_dir_all(client_dir)
                .await
                .map_err(|e| ToolError::OutputDirRemove {
                    path: client_dir.to_path_buf(),
                    source: e,
                })?;
        }

        for file in &files {
            let path = client_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ToolError::OutputDirCreate {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
            fs::write(&path, &file.contents)
                .await
                .map_err(|e| ToolError::GeneratedFileWrite {
                    path: path.clone(),
                    source: e,
                })?;
            debug!("Wrote {}", path.display());
        }

        Ok(files.len())
    }

    async fn run_tools(
        &self,
        emitter: &dyn Emitter,
        ctx: &GeneratorContext,
        client_dir: &Path,
    ) -> Result<(), ToolError> {
        for stage in self.enabled_stages() {
            for invocation in emitter.tool_invocations(ctx, stage) {
                if let Err(e) = self.runner.run(&invocation, client_dir).await {
                    warn!(
                        command = %invocation.command_line(),
                        "External tool failed, generated sources were kept"
                    );
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn enabled_stages(&self) -> Vec<ToolStage> {
        let tools = &self.settings.tools;
        let mut stages = Vec::new();
        if tools.format {
            stages.push(ToolStage::Format);
        }
        if tools.build {
            stages.push(ToolStage::Build);
        }
        stages
    }
}
