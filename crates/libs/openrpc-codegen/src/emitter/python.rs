//! Python client package: pydantic models and jsonrpc2pyclient transports.

use super::{
    Emitter, GeneratedFile, ToolInvocation, ToolStage, check_member_names, group_class_name,
    group_class_name_with_suffix, quote, server_constants,
};
use crate::code_writer::CodeWriter;
use crate::context::{GeneratorContext, Transport};
use crate::error::{CodegenError, CodegenResult};
use crate::grouping::MethodGroup;
use crate::ir::{ParamStructure, RpcMethod};
use crate::naming::{enum_member_name, python_identifier};
use crate::registry::{ModelKind, SchemaEntry};
use crate::schema_node::SchemaNode;
use crate::type_mapper::TargetLanguage;
use crate::{cw_write, cw_writeln};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

const INDENT: &str = "    ";
const GENERATED_NOTICE: &str = "Generated by openrpc-codegen. Do not edit by hand.";

/// Attributes and methods the jsonrpc2pyclient base classes define on the transport client
const TRANSPORT_MEMBERS: &[&str] = &["call", "close", "connect", "headers", "url"];

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter;

impl Emitter for PythonEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn emit_client(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        for group in ctx.groups.descendants() {
            // Group classes only hold `_call`, which snake casing never produces
            let reserved: &[&str] = if group.is_root() { TRANSPORT_MEMBERS } else { &[] };
            check_member_names(group, python_identifier, reserved)?;
        }

        let source_dir = source_dir(ctx);
        Ok(vec![
            GeneratedFile::new(source_dir.join("client.py"), render_client(ctx)?),
            GeneratedFile::new(source_dir.join("__init__.py"), render_init(ctx)?),
        ])
    }

    fn emit_models(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        if !ctx.has_models() {
            return Ok(Vec::new());
        }
        Ok(vec![GeneratedFile::new(
            source_dir(ctx).join("models.py"),
            render_models(ctx)?,
        )])
    }

    fn emit_project_files(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        Ok(vec![
            GeneratedFile::new("pyproject.toml", render_pyproject(ctx)?),
            GeneratedFile::new("README.md", render_readme(ctx)?),
        ])
    }

    fn tool_invocations(&self, _ctx: &GeneratorContext, stage: ToolStage) -> Vec<ToolInvocation> {
        match stage {
            ToolStage::Format => vec![
                ToolInvocation::builder()
                    .program("black")
                    .args(vec!["src".to_string()])
                    .stage(stage)
                    .build(),
            ],
            ToolStage::Build => vec![
                ToolInvocation::builder()
                    .program("poetry")
                    .args(vec!["build".to_string()])
                    .stage(stage)
                    .build(),
            ],
        }
    }
}

fn source_dir(ctx: &GeneratorContext) -> PathBuf {
    PathBuf::from("src").join(ctx.package_name())
}

fn py_type(node: &SchemaNode) -> String {
    TargetLanguage::Python.map_type(node)
}

/// Wrap in `Optional[..]` unless the type already is optional
fn optional(type_expr: String) -> String {
    if type_expr.starts_with("Optional[") || type_expr == "None" {
        type_expr
    } else {
        format!("Optional[{type_expr}]")
    }
}

/// Python source for a scalar JSON value, `None` for arrays and objects
fn python_literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("None".to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(quote(text)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_docstring<W: fmt::Write>(w: &mut CodeWriter<W>, text: &str) -> fmt::Result {
    let escaped = text
        .trim()
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"");
    let lines: Vec<&str> = escaped.lines().map(str::trim).collect();

    match lines.as_slice() {
        [] => Ok(()),
        [single] => cw_writeln!(w, "\"\"\"{single}\"\"\""),
        [first, rest @ ..] => {
            cw_writeln!(w, "\"\"\"{first}")?;
            for line in rest {
                w.writeln(line)?;
            }
            w.writeln("\"\"\"")
        }
    }
}

fn write_tuple<W: fmt::Write>(w: &mut CodeWriter<W>, name: &str, items: &[String]) -> fmt::Result {
    cw_writeln!(w, "{name} = (")?;
    {
        let _indent = w.indent();
        for item in items {
            cw_writeln!(w, "{},", quote(item))?;
        }
    }
    w.writeln(")")
}

/// Whether generated methods block on the transport or are awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallStyle {
    Sync,
    Async,
}

impl CallStyle {
    fn def_keyword(self) -> &'static str {
        match self {
            CallStyle::Sync => "def",
            CallStyle::Async => "async def",
        }
    }

    fn await_prefix(self) -> &'static str {
        match self {
            CallStyle::Sync => "",
            CallStyle::Async => "await ",
        }
    }

    fn call_type(self) -> &'static str {
        match self {
            CallStyle::Sync => "Callable[[str, Any], Any]",
            CallStyle::Async => "Callable[[str, Any], Awaitable[Any]]",
        }
    }

    fn group_class(self, ctx: &GeneratorContext, group: &MethodGroup) -> String {
        match self {
            CallStyle::Sync => group_class_name(ctx, group),
            CallStyle::Async => group_class_name_with_suffix(ctx, group, "AsyncMethods"),
        }
    }
}

/// One generated client class and the jsonrpc2pyclient class it extends
struct TransportClass {
    transport: Transport,
    name: String,
    base: &'static str,
    style: CallStyle,
}

/// HTTP gets a blocking and an awaitable client; the websocket client is async only
fn transport_classes(ctx: &GeneratorContext) -> Vec<TransportClass> {
    let client_name = ctx.client_name();
    let mut classes = Vec::new();
    for &transport in &ctx.transports {
        match transport {
            Transport::Http => {
                classes.push(TransportClass {
                    transport,
                    name: format!("{client_name}HTTPClient"),
                    base: "RPCHTTPClient",
                    style: CallStyle::Sync,
                });
                classes.push(TransportClass {
                    transport,
                    name: format!("{client_name}AsyncHTTPClient"),
                    base: "AsyncRPCHTTPClient",
                    style: CallStyle::Async,
                });
            }
            Transport::Ws => classes.push(TransportClass {
                transport,
                name: format!("{client_name}WSClient"),
                base: "RPCWSClient",
                style: CallStyle::Async,
            }),
        }
    }
    classes
}

fn render_client(ctx: &GeneratorContext) -> CodegenResult<String> {
    let groups: Vec<&MethodGroup> = ctx
        .groups
        .descendants()
        .into_iter()
        .filter(|group| !group.is_root())
        .collect();
    let classes = transport_classes(ctx);
    let styles: Vec<CallStyle> = [CallStyle::Sync, CallStyle::Async]
        .into_iter()
        .filter(|style| classes.iter().any(|class| class.style == *style))
        .collect();

    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);

    write_docstring(
        &mut w,
        &format!("{} client.\n\n{GENERATED_NOTICE}", ctx.api.info.title),
    )?;
    w.writeln("from __future__ import annotations")?;
    w.blank_line()?;
    w.writeln("import datetime")?;
    w.writeln("from typing import *")?;
    w.writeln("from uuid import UUID")?;
    w.blank_line()?;
    for transport in &ctx.transports {
        let mut bases: Vec<&str> = classes
            .iter()
            .filter(|class| class.transport == *transport)
            .map(|class| class.base)
            .collect();
        bases.sort_unstable();
        cw_writeln!(
            w,
            "from jsonrpc2pyclient.{}client import {}",
            transport.as_str(),
            bases.join(", ")
        )?;
    }
    w.writeln("from pydantic import UUID1, UUID3, UUID4, UUID5, TypeAdapter")?;
    w.writeln("from pydantic_core import to_jsonable_python")?;
    if ctx.has_models() {
        w.blank_line()?;
        w.writeln("from .models import *")?;
    }
    w.blank_line()?;

    let mut exported = vec!["Servers".to_string()];
    for style in &styles {
        exported.extend(groups.iter().map(|group| style.group_class(ctx, group)));
    }
    exported.extend(classes.iter().map(|class| class.name.clone()));
    write_tuple(&mut w, "__all__", &exported)?;

    let servers = server_constants(ctx);
    w.blank_line()?;
    w.blank_line()?;
    w.block_colon("class Servers", |w| {
        write_docstring(w, "Servers listed in the API description.")?;
        w.blank_line()?;
        for (name, url) in &servers {
            cw_writeln!(w, "{name} = {}", quote(url))?;
        }
        Ok(())
    })?;

    w.blank_line()?;
    w.blank_line()?;
    w.block_colon("def _serialize(value: Any) -> Any", |w| {
        w.writeln("return to_jsonable_python(value, by_alias=True)")
    })?;

    for &style in &styles {
        for group in &groups {
            w.blank_line()?;
            w.blank_line()?;
            cw_writeln!(w, "class {}:", style.group_class(ctx, group))?;
            let _indent = w.indent();
            write_docstring(&mut w, &format!("Methods under ``{}``.", group.path.join(".")))?;
            w.blank_line()?;
            w.block_colon(
                &format!("def __init__(self, call: {}) -> None", style.call_type()),
                |w| {
                    w.writeln("self._call = call")?;
                    write_group_attributes(w, ctx, group, style, "call")
                },
            )?;
            write_methods(&mut w, group, style, "self._call")?;
        }
    }

    let default_url = match (&ctx.client_url, servers.first()) {
        (Some(url), _) => quote(url),
        (None, Some((name, _))) => format!("Servers.{name}"),
        (None, None) => quote("localhost"),
    };

    for class in &classes {
        w.blank_line()?;
        w.blank_line()?;
        cw_writeln!(w, "class {}({}):", class.name, class.base)?;
        let _indent = w.indent();
        let flavor = match class.style {
            CallStyle::Sync => "",
            CallStyle::Async => "Async ",
        };
        write_docstring(
            &mut w,
            &format!(
                "{flavor}{} client over {}.",
                ctx.api.info.title,
                class.transport.class_suffix()
            ),
        )?;
        w.blank_line()?;
        w.writeln("def __init__(")?;
        {
            let _indent = w.indent();
            w.writeln("self,")?;
            cw_writeln!(w, "url: str = {default_url},")?;
            w.writeln("headers: Optional[dict[str, Any]] = None,")?;
        }
        w.block_colon(") -> None", |w| {
            w.writeln("super().__init__(url, headers or {})")?;
            write_group_attributes(w, ctx, &ctx.groups, class.style, "self.call")
        })?;
        write_methods(&mut w, &ctx.groups, class.style, "self.call")?;
    }

    drop(w);
    Ok(out)
}

fn write_group_attributes<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    ctx: &GeneratorContext,
    group: &MethodGroup,
    style: CallStyle,
    call: &str,
) -> fmt::Result {
    for child in group.child_groups.values() {
        cw_writeln!(
            w,
            "self.{} = {}({call})",
            python_identifier(&child.name),
            style.group_class(ctx, child)
        )?;
    }
    Ok(())
}

fn write_methods<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    group: &MethodGroup,
    style: CallStyle,
    call: &str,
) -> fmt::Result {
    for (key, method) in &group.methods {
        w.blank_line()?;
        write_method(w, key, method, style, call)?;
    }
    Ok(())
}

/// `def` for one RPC method, sending params through `call`
fn write_method<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    key: &str,
    method: &RpcMethod,
    style: CallStyle,
    call: &str,
) -> fmt::Result {
    let mut signature = String::from("self");
    for param in method.ordered_params() {
        let name = python_identifier(&param.name);
        let type_expr = py_type(&param.schema);
        if param.required {
            signature.push_str(&format!(", {name}: {type_expr}"));
        } else {
            signature.push_str(&format!(", {name}: {} = None", optional(type_expr)));
        }
    }

    let returns_nothing = method.result.schema.is_null();
    let return_type = if returns_nothing {
        "None".to_string()
    } else {
        py_type(&method.result.schema)
    };

    cw_writeln!(
        w,
        "{} {}({signature}) -> {return_type}:",
        style.def_keyword(),
        python_identifier(key)
    )?;
    let _indent = w.indent();

    let mut doc = method.doc().unwrap_or_default().to_string();
    if method.deprecated {
        doc = format!("{doc}\n\nDeprecated.").trim_start().to_string();
    }
    write_docstring(w, &doc)?;

    let values = method
        .params
        .iter()
        .map(|param| format!("_serialize({})", python_identifier(&param.name)));
    let params = match method.param_structure {
        ParamStructure::ByPosition => format!("[{}]", values.collect::<Vec<_>>().join(", ")),
        ParamStructure::ByName => {
            let pairs: Vec<String> = method
                .params
                .iter()
                .zip(values)
                .map(|(param, value)| format!("{}: {value}", quote(&param.name)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
    };
    cw_writeln!(w, "params = {params}")?;

    let awaited = style.await_prefix();
    if returns_nothing {
        cw_writeln!(w, "{awaited}{call}({}, params)", quote(&method.name))
    } else {
        cw_writeln!(w, "result = {awaited}{call}({}, params)", quote(&method.name))?;
        cw_writeln!(w, "return TypeAdapter({return_type}).validate_python(result)")
    }
}

fn render_init(ctx: &GeneratorContext) -> CodegenResult<String> {
    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);
    write_docstring(&mut w, &format!("{} client.", ctx.api.info.title))?;
    w.writeln("from .client import *")?;
    if ctx.has_models() {
        w.writeln("from .models import *")?;
    }
    drop(w);
    Ok(out)
}

fn render_models(ctx: &GeneratorContext) -> CodegenResult<String> {
    let registry = &ctx.api.registry;
    let by_kind = |kind: ModelKind| -> Vec<&SchemaEntry> {
        registry.iter().filter(|entry| entry.kind() == kind).collect()
    };
    let enums = by_kind(ModelKind::Enum);
    let classes = by_kind(ModelKind::Class);
    let aliases = alias_order(by_kind(ModelKind::Alias));

    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);

    write_docstring(
        &mut w,
        &format!("{} models.\n\n{GENERATED_NOTICE}", ctx.api.info.title),
    )?;
    w.writeln("from __future__ import annotations")?;
    w.blank_line()?;
    w.writeln("import datetime")?;
    w.writeln("from enum import Enum")?;
    w.writeln("from typing import *")?;
    w.writeln("from uuid import UUID")?;
    w.blank_line()?;
    w.writeln("from pydantic import UUID1, UUID3, UUID4, UUID5, BaseModel, ConfigDict, Field")?;
    w.blank_line()?;
    let names: Vec<String> = registry.names().map(str::to_string).collect();
    write_tuple(&mut w, "__all__", &names)?;

    for entry in &enums {
        w.blank_line()?;
        w.blank_line()?;
        write_enum(&mut w, entry)?;
    }
    for entry in &classes {
        w.blank_line()?;
        w.blank_line()?;
        write_class(&mut w, entry)?;
    }
    if !aliases.is_empty() {
        w.blank_line()?;
    }
    for entry in &aliases {
        w.blank_line()?;
        cw_writeln!(w, "{} = {}", entry.name, py_type(&entry.node))?;
    }

    if !classes.is_empty() {
        w.blank_line()?;
        w.blank_line()?;
        for entry in &classes {
            cw_writeln!(w, "{}.model_rebuild()", entry.name)?;
        }
    }

    drop(w);
    Ok(out)
}

fn write_enum<W: fmt::Write>(w: &mut CodeWriter<W>, entry: &SchemaEntry) -> fmt::Result {
    cw_writeln!(w, "class {}(Enum):", entry.name)?;
    let _indent = w.indent();
    let doc = entry
        .description
        .clone()
        .unwrap_or_else(|| format!("{} options.", entry.display_title()));
    write_docstring(w, &doc)?;

    let members: Vec<(&Value, String)> = entry
        .enum_values
        .iter()
        .flatten()
        .filter_map(|value| {
            let literal = python_literal(value);
            if literal.is_none() {
                debug!(schema = %entry.name, "Skipping non-scalar enum value");
            }
            literal.map(|literal| (value, literal))
        })
        .collect();
    let member_names = super::unique_names(members.iter().map(|(value, _)| enum_member_name(value)));

    if !members.is_empty() {
        w.blank_line()?;
    }
    for (name, (_, literal)) in member_names.iter().zip(&members) {
        cw_writeln!(w, "{name} = {literal}")?;
    }
    Ok(())
}

fn write_class<W: fmt::Write>(w: &mut CodeWriter<W>, entry: &SchemaEntry) -> fmt::Result {
    let SchemaNode::Object {
        properties,
        required,
        ..
    } = &entry.node
    else {
        return Ok(());
    };

    let mut fields: Vec<(bool, String)> = Vec::with_capacity(properties.len());
    let mut aliased = false;
    for (property, node) in properties {
        let field = python_identifier(property);
        let is_required = required.contains(property);
        let needs_alias = &field != property;
        aliased |= needs_alias;

        let line = match (is_required, needs_alias) {
            (true, false) => format!("{field}: {}", py_type(node)),
            (true, true) => format!(
                "{field}: {} = Field(alias={})",
                py_type(node),
                quote(property)
            ),
            (false, false) => format!("{field}: {} = None", optional(py_type(node))),
            (false, true) => format!(
                "{field}: {} = Field(None, alias={})",
                optional(py_type(node)),
                quote(property)
            ),
        };
        fields.push((is_required, line));
    }
    // Stable sort keeps document order within each half
    fields.sort_by_key(|(is_required, _)| !is_required);

    cw_writeln!(w, "class {}(BaseModel):", entry.name)?;
    let _indent = w.indent();
    let doc = entry
        .description
        .clone()
        .unwrap_or_else(|| format!("{} object.", entry.display_title()));
    write_docstring(w, &doc)?;

    if aliased {
        w.blank_line()?;
        w.writeln("model_config = ConfigDict(populate_by_name=True)")?;
    }
    if !fields.is_empty() {
        w.blank_line()?;
    }
    for (_, line) in &fields {
        w.writeln(line)?;
    }
    Ok(())
}

/// Aliases ordered so each one is defined after the aliases it mentions
fn alias_order(aliases: Vec<&SchemaEntry>) -> Vec<&SchemaEntry> {
    let alias_names: HashSet<&str> = aliases.iter().map(|entry| entry.name.as_str()).collect();
    let mut defined: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(aliases.len());
    let mut pending = aliases;

    while !pending.is_empty() {
        let (ready, blocked): (Vec<&SchemaEntry>, Vec<&SchemaEntry>) =
            pending.into_iter().partition(|entry| {
                entry.node.referenced_names().iter().all(|name| {
                    *name == entry.name || !alias_names.contains(name) || defined.contains(name)
                })
            });

        if ready.is_empty() {
            // Cycle between aliases; keep document order for the rest
            ordered.extend(blocked);
            break;
        }
        defined.extend(ready.iter().map(|entry| entry.name.as_str()));
        ordered.extend(ready);
        pending = blocked;
    }
    ordered
}

#[derive(Serialize)]
struct PyProject<'a> {
    tool: PyProjectTool<'a>,
    #[serde(rename = "build-system")]
    build_system: BuildSystem,
}

#[derive(Serialize)]
struct PyProjectTool<'a> {
    poetry: Poetry<'a>,
}

#[derive(Serialize)]
struct Poetry<'a> {
    name: String,
    version: &'a str,
    description: String,
    authors: Vec<String>,
    readme: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<&'a str>,
    packages: Vec<PackageInclude>,
    dependencies: IndexMap<&'static str, &'static str>,
}

#[derive(Serialize)]
struct PackageInclude {
    include: String,
    from: &'static str,
}

#[derive(Serialize)]
struct BuildSystem {
    requires: Vec<&'static str>,
    #[serde(rename = "build-backend")]
    build_backend: &'static str,
}

fn render_pyproject(ctx: &GeneratorContext) -> CodegenResult<String> {
    let info = &ctx.api.info;
    let project = PyProject {
        tool: PyProjectTool {
            poetry: Poetry {
                name: ctx.distribution_name(),
                version: &info.version,
                description: format!("{} RPC Client.", info.title),
                authors: vec![format!("{} <{}>", info.contact_name, info.contact_email)],
                readme: "README.md",
                license: info.license.as_deref(),
                packages: vec![PackageInclude {
                    include: ctx.package_name(),
                    from: "src",
                }],
                dependencies: IndexMap::from([
                    ("python", "^3.9"),
                    ("pydantic", "^2.0.3"),
                    ("jsonrpc2-objects", "^3.0.0"),
                    ("jsonrpc2-pyclient", "^2.1.1"),
                ]),
            },
        },
        build_system: BuildSystem {
            requires: vec!["poetry-core"],
            build_backend: "poetry.core.masonry.api",
        },
    };

    toml::to_string(&project).map_err(|e| CodegenError::manifest("pyproject.toml", e))
}

fn render_readme(ctx: &GeneratorContext) -> CodegenResult<String> {
    let info = &ctx.api.info;
    let classes = transport_classes(ctx);
    let client_class = classes
        .first()
        .map_or_else(|| format!("{}HTTPClient", ctx.client_name()), |class| class.name.clone());
    let async_class = classes.iter().find(|class| class.style == CallStyle::Async);

    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);
    cw_writeln!(w, "# {} Python Client", info.title)?;
    w.blank_line()?;
    match &info.description {
        Some(description) => w.writeln(description.trim())?,
        None => cw_writeln!(w, "{} RPC client.", info.title)?,
    }
    w.blank_line()?;
    cw_writeln!(w, "Generated from version {} of the OpenRPC document.", info.version)?;
    w.blank_line()?;
    w.writeln("## Install")?;
    w.blank_line()?;
    w.writeln("```shell")?;
    cw_writeln!(w, "pip install {}", ctx.distribution_name())?;
    w.writeln("```")?;
    w.blank_line()?;
    w.writeln("## Usage")?;
    w.blank_line()?;
    w.writeln("```python")?;
    cw_writeln!(w, "from {} import {client_class}", ctx.package_name())?;
    w.blank_line()?;
    cw_writeln!(w, "client = {client_class}()")?;
    w.writeln("```")?;
    if let Some(async_class) = async_class {
        w.blank_line()?;
        cw_writeln!(
            w,
            "`{}` exposes the same methods as coroutines, to be awaited.",
            async_class.name
        )?;
    }

    if ctx.groups.method_count() > 0 {
        w.blank_line()?;
        w.writeln("## Methods")?;
        w.blank_line()?;
        w.writeln("| RPC method | Python call |")?;
        w.writeln("| --- | --- |")?;
        for group in ctx.groups.descendants() {
            let prefix: String = group
                .path
                .iter()
                .map(|segment| format!("{}.", python_identifier(segment)))
                .collect();
            for (key, method) in &group.methods {
                cw_write!(w, "| `{}` ", method.name)?;
                cw_writeln!(w, "| `client.{prefix}{}(...)` |", python_identifier(key))?;
            }
        }
    }

    drop(w);
    Ok(out)
}
