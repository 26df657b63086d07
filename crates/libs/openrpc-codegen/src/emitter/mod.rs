//! Per-language emitters.
//!
//! An [`Emitter`] turns a [`GeneratorContext`] into [`GeneratedFile`]s and
//! describes the external commands (formatters, package builds) that should
//! run over them. Emitters never touch the filesystem or spawn processes; the
//! caller decides where files go and how commands run.

mod python;
mod typescript;

pub use python::PythonEmitter;
pub use typescript::TypeScriptEmitter;

use crate::context::GeneratorContext;
use crate::error::{CodegenError, CodegenResult};
use crate::grouping::MethodGroup;
use crate::naming::shouty_snake_case;
use crate::type_mapper::TargetLanguage;
use bon::Builder;
use indexmap::IndexSet;
use serde_json::Value;
use std::path::PathBuf;

/// A rendered file, relative to the language's client directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// When an external tool runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolStage {
    /// Source formatters, run after files are written
    Format,
    /// Dependency install and package build
    Build,
}

/// An external command, run with the client directory as its base.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ToolInvocation {
    #[builder(into)]
    pub program: String,
    #[builder(default)]
    pub args: Vec<String>,
    /// Working directory relative to the client directory
    #[builder(into, default = PathBuf::from("."))]
    pub working_dir: PathBuf,
    pub stage: ToolStage,
}

impl ToolInvocation {
    /// The command line as it would be typed in a shell
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Renders one target language.
pub trait Emitter {
    fn language(&self) -> TargetLanguage;

    /// Client directory relative to the output root, e.g. `python/math_api_client`
    fn client_dir(&self, ctx: &GeneratorContext) -> PathBuf {
        PathBuf::from(self.language().as_str()).join(ctx.package_name())
    }

    fn emit_client(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>>;

    /// Model sources; empty when the document defines no schemas
    fn emit_models(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>>;

    fn emit_project_files(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>>;

    fn tool_invocations(&self, ctx: &GeneratorContext, stage: ToolStage) -> Vec<ToolInvocation>;

    /// Client, models and project files in one list
    fn emit_all(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        let mut files = self.emit_client(ctx)?;
        files.extend(self.emit_models(ctx)?);
        files.extend(self.emit_project_files(ctx)?);
        Ok(files)
    }
}

pub fn emitter_for(language: TargetLanguage) -> Box<dyn Emitter> {
    match language {
        TargetLanguage::Python => Box::new(PythonEmitter),
        TargetLanguage::TypeScript => Box::new(TypeScriptEmitter),
    }
}

/// A string literal valid in both Python and TypeScript source
pub(crate) fn quote(text: &str) -> String {
    Value::from(text).to_string()
}

/// Make names unique by appending `_2`, `_3`, ... to repeats
pub(crate) fn unique_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = IndexSet::new();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut counter = 2;
            while seen.contains(&candidate) {
                candidate = format!("{name}_{counter}");
                counter += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// `(CONSTANT_NAME, url)` for each server
pub(crate) fn server_constants(ctx: &GeneratorContext) -> Vec<(String, String)> {
    let names = unique_names(
        ctx.api
            .servers
            .iter()
            .map(|server| shouty_snake_case(&server.name)),
    );
    names
        .into_iter()
        .zip(ctx.api.servers.iter().map(|server| server.url.clone()))
        .collect()
}

/// Fail when two members of a group render to the same identifier in the target language,
/// or when one renders to a name the generated class already uses (`reserved`)
pub(crate) fn check_member_names(
    group: &MethodGroup,
    identifier: impl Fn(&str) -> String,
    reserved: &[&str],
) -> CodegenResult<()> {
    let mut seen: IndexSet<String> = IndexSet::new();
    let members = group.child_groups.keys().chain(group.methods.keys());
    for key in members {
        let rendered = identifier(key);
        if reserved.contains(&rendered.as_str()) {
            return Err(CodegenError::name_collision(
                group.display_path(),
                rendered,
                format!("'{key}' renders to a member the generated client class already defines"),
            ));
        }
        if !seen.insert(rendered.clone()) {
            return Err(CodegenError::name_collision(
                group.display_path(),
                rendered,
                format!("'{key}' renders to an identifier that is already in use"),
            ));
        }
    }
    Ok(())
}

/// Class name for a method group, e.g. `MathApiMathMethods`
pub(crate) fn group_class_name(ctx: &GeneratorContext, group: &MethodGroup) -> String {
    group_class_name_with_suffix(ctx, group, "Methods")
}

pub(crate) fn group_class_name_with_suffix(
    ctx: &GeneratorContext,
    group: &MethodGroup,
    suffix: &str,
) -> String {
    let path: String = group
        .path
        .iter()
        .map(|segment| crate::naming::pascal_case(segment))
        .collect();
    format!("{}{path}{suffix}", ctx.client_name())
}
