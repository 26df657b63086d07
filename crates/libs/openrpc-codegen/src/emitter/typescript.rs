//! TypeScript client package: model classes and jsonrpc2-tsclient transports.

use super::{
    Emitter, GeneratedFile, ToolInvocation, ToolStage, check_member_names, group_class_name,
    quote, server_constants, unique_names,
};
use crate::code_writer::CodeWriter;
use crate::context::GeneratorContext;
use crate::error::{CodegenError, CodegenResult};
use crate::grouping::MethodGroup;
use crate::ir::{ParamStructure, RpcMethod};
use crate::naming::{camel_case, enum_member_name, pascal_case, typescript_identifier};
use crate::registry::{ModelKind, SchemaEntry, SchemaRegistry};
use crate::schema_node::SchemaNode;
use crate::type_mapper::TargetLanguage;
use crate::{cw_write, cw_writeln};
use serde_json::{Value, json};
use std::fmt;

const INDENT: &str = "  ";
const GENERATED_NOTICE: &str = "Generated by openrpc-codegen. Do not edit by hand.";

/// Members the jsonrpc2-tsclient base classes define on the transport client
const TRANSPORT_MEMBERS: &[&str] = &["call", "close", "connect", "constructor", "headers", "url"];
const GROUP_MEMBERS: &[&str] = &["constructor", "rpc"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptEmitter;

impl Emitter for TypeScriptEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::TypeScript
    }

    fn emit_client(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        for group in ctx.groups.descendants() {
            let reserved = if group.is_root() { TRANSPORT_MEMBERS } else { GROUP_MEMBERS };
            check_member_names(group, camel_case, reserved)?;
        }

        let mut index = String::from("export * from \"./client.js\";\n");
        if ctx.has_models() {
            index.push_str("export * from \"./models.js\";\n");
        }

        Ok(vec![
            GeneratedFile::new("src/client.ts", render_client(ctx)?),
            GeneratedFile::new("src/index.ts", index),
        ])
    }

    fn emit_models(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        if !ctx.has_models() {
            return Ok(Vec::new());
        }
        Ok(vec![GeneratedFile::new("src/models.ts", render_models(ctx)?)])
    }

    fn emit_project_files(&self, ctx: &GeneratorContext) -> CodegenResult<Vec<GeneratedFile>> {
        Ok(vec![
            GeneratedFile::new("package.json", render_package_json(ctx)?),
            GeneratedFile::new("tsconfig.json", pretty_json("tsconfig.json", &tsconfig())?),
            GeneratedFile::new(".prettierrc", pretty_json(".prettierrc", &prettier_config())?),
            GeneratedFile::new(".prettierignore", "dist\nnode_modules\n"),
            GeneratedFile::new("README.md", render_readme(ctx)?),
        ])
    }

    fn tool_invocations(&self, _ctx: &GeneratorContext, stage: ToolStage) -> Vec<ToolInvocation> {
        let invocation = |program: &str, args: &[&str]| {
            ToolInvocation::builder()
                .program(program)
                .args(args.iter().map(|arg| arg.to_string()).collect())
                .stage(stage)
                .build()
        };
        match stage {
            ToolStage::Format => vec![invocation("npx", &["prettier", "--write", "src"])],
            ToolStage::Build => vec![
                invocation("npm", &["install"]),
                invocation("npm", &["run", "build"]),
            ],
        }
    }
}

fn ts_type(node: &SchemaNode) -> String {
    TargetLanguage::TypeScript.map_type(node)
}

fn write_jsdoc<W: fmt::Write>(w: &mut CodeWriter<W>, text: &str) -> fmt::Result {
    let text = text.trim().replace("*/", "*\\/");
    if text.is_empty() {
        return Ok(());
    }
    if !text.contains('\n') {
        return cw_writeln!(w, "/** {text} */");
    }
    w.writeln("/**")?;
    w.doc_comment(" *", &text)?;
    w.writeln(" */")
}

/// Expression turning the raw JSON in `expr` into `node`'s TypeScript value,
/// or `None` when the raw value can be used as is
fn from_json(registry: &SchemaRegistry, node: &SchemaNode, expr: &str) -> Option<String> {
    if let Some(entry) = registry.model_class(node) {
        return Some(format!("{}.fromJSON({expr})", entry.name));
    }

    match node {
        SchemaNode::TypeList(members) | SchemaNode::Union { branches: members, .. } => {
            let non_null: Vec<&SchemaNode> = members.iter().filter(|m| !m.is_null()).collect();
            let [single] = non_null.as_slice() else {
                return None;
            };
            let inner = from_json(registry, single, expr)?;
            if non_null.len() < members.len() {
                Some(format!("{expr} == null ? null : {inner}"))
            } else {
                Some(inner)
            }
        }
        SchemaNode::Array {
            items,
            prefix_items: None,
            unique_items,
        } => {
            let mapped = items
                .as_deref()
                .and_then(|items| from_json(registry, items, "it"))
                .map(|inner| format!("{expr}.map((it: any) => {inner})"));
            if *unique_items {
                Some(format!("new Set({})", mapped.as_deref().unwrap_or(expr)))
            } else {
                mapped
            }
        }
        _ => None,
    }
}

/// Sets serialize as `{}`, so they are sent as arrays
fn to_json(node: &SchemaNode, expr: &str) -> String {
    match node {
        SchemaNode::Array {
            unique_items: true,
            prefix_items: None,
            ..
        } => format!("{expr} == null ? {expr} : Array.from({expr})"),
        _ => expr.to_string(),
    }
}

fn render_client(ctx: &GeneratorContext) -> CodegenResult<String> {
    let client_name = ctx.client_name();
    let registry = &ctx.api.registry;
    let groups: Vec<&MethodGroup> = ctx
        .groups
        .descendants()
        .into_iter()
        .filter(|group| !group.is_root())
        .collect();

    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);

    write_jsdoc(
        &mut w,
        &format!("{} client.\n\n{GENERATED_NOTICE}", ctx.api.info.title),
    )?;
    let transports: Vec<String> = ctx
        .transports
        .iter()
        .map(|transport| format!("RPC{}Client", transport.class_suffix()))
        .collect();
    cw_writeln!(
        w,
        "import {{ {} }} from \"jsonrpc2-tsclient\";",
        transports.join(", ")
    )?;
    if ctx.has_models() {
        let names: Vec<&str> = registry.names().collect();
        cw_writeln!(w, "import {{ {} }} from \"./models.js\";", names.join(", "))?;
    }
    w.blank_line()?;

    let servers = server_constants(ctx);
    w.block("export enum Servers", |w| {
        for (name, url) in &servers {
            cw_writeln!(w, "{name} = {},", quote(url))?;
        }
        Ok(())
    })?;
    w.blank_line()?;
    w.writeln("type RpcCall = (method: string, params: any) => Promise<any>;")?;

    for group in ctx.groups.descendants() {
        for method in group.methods.values() {
            if method.param_structure == ParamStructure::ByName && !method.params.is_empty() {
                w.blank_line()?;
                write_parameters_interface(&mut w, method)?;
            }
        }
    }

    for group in &groups {
        w.blank_line()?;
        let class_name = group_class_name(ctx, group);
        cw_writeln!(w, "/** Methods under `{}`. */", group.path.join("."))?;
        w.block(&format!("export class {class_name}"), |w| {
            w.writeln("private readonly rpc: RpcCall;")?;
            write_group_fields(w, ctx, group)?;
            w.blank_line()?;
            w.block("constructor(rpc: RpcCall)", |w| {
                w.writeln("this.rpc = rpc;")?;
                write_group_assignments(w, ctx, group, "rpc")
            })?;
            write_methods(w, registry, group, "this.rpc")
        })?;
    }

    let default_url = match (&ctx.client_url, servers.first()) {
        (Some(url), _) => quote(url),
        (None, Some((name, _))) => format!("Servers.{name}"),
        (None, None) => quote("localhost"),
    };

    for (transport, base) in ctx.transports.iter().zip(&transports) {
        w.blank_line()?;
        cw_writeln!(
            w,
            "/** {} client over {}. */",
            ctx.api.info.title,
            transport.class_suffix()
        )?;
        let header = format!(
            "export class {client_name}{}Client extends {base}",
            transport.class_suffix()
        );
        w.block(&header, |w| {
            let has_fields = write_group_fields(w, ctx, &ctx.groups)?;
            if has_fields {
                w.blank_line()?;
            }
            w.block(
                &format!("constructor(url: string = {default_url}, headers?: object)"),
                |w| {
                    w.writeln("super(url, headers);")?;
                    if !ctx.groups.child_groups.is_empty() {
                        w.writeln(
                            "const rpc: RpcCall = (method, params) => this.call(method, params);",
                        )?;
                        write_group_assignments(w, ctx, &ctx.groups, "rpc")?;
                    }
                    Ok(())
                },
            )?;
            write_methods(w, registry, &ctx.groups, "this.call")
        })?;
    }

    w.blank_line()?;
    w.block("function serializeArrayParams(values: any[]): any[]", |w| {
        w.writeln("return values.map((it) => serialize(it));")
    })?;
    w.blank_line()?;
    w.block(
        "function serializeObjectParams(values: { [key: string]: any }): { [key: string]: any }",
        |w| {
            w.writeln("const serialized: { [key: string]: any } = {};")?;
            w.block("for (const [key, value] of Object.entries(values))", |w| {
                w.block("if (value !== undefined)", |w| {
                    w.writeln("serialized[key] = serialize(value);")
                })
            })?;
            w.writeln("return serialized;")
        },
    )?;
    w.blank_line()?;
    w.block("function serialize(value: any): any", |w| {
        w.block("if (value instanceof Set)", |w| {
            w.writeln("return Array.from(value, (it) => serialize(it));")
        })?;
        w.block(
            "if (value !== null && value !== undefined && typeof value.toJSON === \"function\")",
            |w| w.writeln("return value.toJSON();"),
        )?;
        w.writeln("return value;")
    })?;

    drop(w);
    Ok(out)
}

fn parameters_interface_name(method: &RpcMethod) -> String {
    format!("{}Parameters", pascal_case(&method.name))
}

fn write_parameters_interface<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    method: &RpcMethod,
) -> fmt::Result {
    let header = format!("export interface {}", parameters_interface_name(method));
    w.block(&header, |w| {
        for param in &method.params {
            if let Some(description) = &param.description {
                write_jsdoc(w, description)?;
            }
            let marker = if param.required { "" } else { "?" };
            cw_writeln!(
                w,
                "{}{marker}: {};",
                typescript_identifier(&param.name),
                ts_type(&param.schema)
            )?;
        }
        Ok(())
    })
}

/// `readonly` fields for child groups; returns whether any were written
fn write_group_fields<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    ctx: &GeneratorContext,
    group: &MethodGroup,
) -> Result<bool, fmt::Error> {
    for child in group.child_groups.values() {
        cw_writeln!(
            w,
            "readonly {}: {};",
            camel_case(&child.name),
            group_class_name(ctx, child)
        )?;
    }
    Ok(!group.child_groups.is_empty())
}

fn write_group_assignments<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    ctx: &GeneratorContext,
    group: &MethodGroup,
    rpc: &str,
) -> fmt::Result {
    for child in group.child_groups.values() {
        cw_writeln!(
            w,
            "this.{} = new {}({rpc});",
            camel_case(&child.name),
            group_class_name(ctx, child)
        )?;
    }
    Ok(())
}

fn write_methods<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    registry: &SchemaRegistry,
    group: &MethodGroup,
    call: &str,
) -> fmt::Result {
    for (key, method) in &group.methods {
        w.blank_line()?;
        write_method(w, registry, key, method, call)?;
    }
    Ok(())
}

fn write_method<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    registry: &SchemaRegistry,
    key: &str,
    method: &RpcMethod,
    call: &str,
) -> fmt::Result {
    let names: Vec<String> = method
        .params
        .iter()
        .map(|param| typescript_identifier(&param.name))
        .collect();

    let (args, params) = match method.param_structure {
        ParamStructure::ByName if !method.params.is_empty() => {
            let default = if method.params.iter().all(|param| !param.required) {
                " = {}"
            } else {
                ""
            };
            let args = format!(
                "{{ {} }}: {}{default}",
                names.join(", "),
                parameters_interface_name(method)
            );
            let pairs: Vec<String> = method
                .params
                .iter()
                .zip(&names)
                .map(|(param, name)| format!("{}: {name}", quote(&param.name)))
                .collect();
            (args, format!("serializeObjectParams({{ {} }})", pairs.join(", ")))
        }
        ParamStructure::ByName => (String::new(), "{}".to_string()),
        ParamStructure::ByPosition => {
            let args: Vec<String> = method
                .ordered_params()
                .into_iter()
                .map(|param| {
                    let marker = if param.required { "" } else { "?" };
                    format!(
                        "{}{marker}: {}",
                        typescript_identifier(&param.name),
                        ts_type(&param.schema)
                    )
                })
                .collect();
            (
                args.join(", "),
                format!("serializeArrayParams([{}])", names.join(", ")),
            )
        }
    };

    let returns_nothing = method.result.schema.is_null();
    let return_type = if returns_nothing {
        "void".to_string()
    } else {
        ts_type(&method.result.schema)
    };

    let mut doc = method.doc().unwrap_or_default().to_string();
    if method.deprecated {
        doc = format!("{doc}\n\n@deprecated").trim_start().to_string();
    }
    write_jsdoc(w, &doc)?;

    let header = format!(
        "async {}({args}): Promise<{return_type}>",
        camel_case(key)
    );
    w.block(&header, |w| {
        cw_writeln!(w, "const params = {params};")?;
        if returns_nothing {
            return cw_writeln!(w, "await {call}({}, params);", quote(&method.name));
        }
        cw_writeln!(w, "const result = await {call}({}, params);", quote(&method.name))?;
        match from_json(registry, &method.result.schema, "result") {
            Some(value) => cw_writeln!(w, "return {value};"),
            None => cw_writeln!(w, "return result as {return_type};"),
        }
    })
}

fn render_models(ctx: &GeneratorContext) -> CodegenResult<String> {
    let registry = &ctx.api.registry;
    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);

    write_jsdoc(
        &mut w,
        &format!("{} models.\n\n{GENERATED_NOTICE}", ctx.api.info.title),
    )?;

    for entry in registry.iter() {
        w.blank_line()?;
        match entry.kind() {
            ModelKind::Class => write_class(&mut w, registry, entry)?,
            ModelKind::Enum => write_enum(&mut w, entry)?,
            ModelKind::Alias => {
                write_jsdoc(&mut w, entry.description.as_deref().unwrap_or_default())?;
                cw_writeln!(w, "export type {} = {};", entry.name, ts_type(&entry.node))?;
            }
        }
    }

    drop(w);
    Ok(out)
}

fn write_enum<W: fmt::Write>(w: &mut CodeWriter<W>, entry: &SchemaEntry) -> fmt::Result {
    let values: Vec<&Value> = entry.enum_values.iter().flatten().collect();
    write_jsdoc(w, entry.description.as_deref().unwrap_or_default())?;

    // TypeScript enums only hold strings and numbers
    if !values.iter().all(|value| value.is_string() || value.is_number()) {
        return cw_writeln!(w, "export type {} = {};", entry.name, ts_type(&entry.node));
    }

    let names = unique_names(values.iter().map(|value| enum_member_name(value)));
    w.block(&format!("export enum {}", entry.name), |w| {
        for (name, value) in names.iter().zip(&values) {
            cw_writeln!(w, "{name} = {value},")?;
        }
        Ok(())
    })
}

fn write_class<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    registry: &SchemaRegistry,
    entry: &SchemaEntry,
) -> fmt::Result {
    let SchemaNode::Object {
        properties,
        required,
        ..
    } = &entry.node
    else {
        return Ok(());
    };

    struct Field<'a> {
        json_name: &'a str,
        field: String,
        param: String,
        type_expr: String,
        required: bool,
        node: &'a SchemaNode,
    }

    let field_names = unique_names(properties.keys().map(|name| camel_case(name)));
    let param_names = unique_names(properties.keys().map(|name| typescript_identifier(name)));
    let mut fields: Vec<Field> = properties
        .iter()
        .zip(field_names)
        .zip(param_names)
        .map(|(((json_name, node), field), param)| Field {
            json_name,
            field,
            param,
            type_expr: ts_type(node),
            required: required.contains(json_name),
            node,
        })
        .collect();
    fields.sort_by_key(|field| !field.required);

    let doc = entry
        .description
        .clone()
        .unwrap_or_else(|| format!("{} object.", entry.display_title()));
    write_jsdoc(w, &doc)?;

    w.block(&format!("export class {}", entry.name), |w| {
        for field in &fields {
            let marker = if field.required { "" } else { "?" };
            cw_writeln!(w, "{}{marker}: {};", field.field, field.type_expr)?;
        }
        if !fields.is_empty() {
            w.blank_line()?;
        }

        w.write("constructor(")?;
        w.write_separated(&fields, ", ", |w, field| {
            let marker = if field.required { "" } else { "?" };
            cw_write!(w, "{}{marker}: {}", field.param, field.type_expr)
        })?;
        w.block(")", |w| {
            for field in &fields {
                cw_writeln!(w, "this.{} = {};", field.field, field.param)?;
            }
            Ok(())
        })?;
        w.blank_line()?;

        w.block("toJSON(): { [key: string]: any }", |w| {
            w.block("return", |w| {
                for field in &fields {
                    let value = to_json(field.node, &format!("this.{}", field.field));
                    cw_writeln!(w, "{}: {value},", quote(field.json_name))?;
                }
                Ok(())
            })
        })?;
        w.blank_line()?;

        w.block(&format!("static fromJSON(data: any): {}", entry.name), |w| {
            cw_writeln!(w, "return new {}(", entry.name)?;
            {
                let _indent = w.indent();
                for field in &fields {
                    let raw = format!("data[{}]", quote(field.json_name));
                    let value = match from_json(registry, field.node, &raw) {
                        Some(converted) if !field.required => {
                            format!("{raw} == null ? {raw} : {converted}")
                        }
                        Some(converted) => converted,
                        None => raw,
                    };
                    cw_writeln!(w, "{value},")?;
                }
            }
            w.writeln(");")
        })
    })
}

fn pretty_json(file: &str, value: &Value) -> CodegenResult<String> {
    serde_json::to_string_pretty(value)
        .map(|json| json + "\n")
        .map_err(|e| CodegenError::manifest(file, e))
}

fn render_package_json(ctx: &GeneratorContext) -> CodegenResult<String> {
    let info = &ctx.api.info;
    let package = json!({
        "name": ctx.distribution_name(),
        "version": info.version,
        "description": format!("{} RPC Client.", info.title),
        "type": "module",
        "main": "dist/index.js",
        "types": "dist/index.d.ts",
        "files": ["dist"],
        "scripts": { "build": "tsc" },
        "author": format!("{} <{}>", info.contact_name, info.contact_email),
        "license": info.license.as_deref().unwrap_or("UNLICENSED"),
        "dependencies": { "jsonrpc2-tsclient": "^1.3.9" },
        "devDependencies": { "prettier": "^3.0.0", "typescript": "^5.0.0" }
    });
    pretty_json("package.json", &package)
}

fn tsconfig() -> Value {
    json!({
        "compilerOptions": {
            "outDir": "dist",
            "rootDir": "src",
            "target": "es2020",
            "module": "es2020",
            "moduleResolution": "node",
            "declaration": true,
            "esModuleInterop": true,
            "skipLibCheck": true
        },
        "include": ["src"]
    })
}

fn prettier_config() -> Value {
    json!({
        "tabWidth": 2,
        "semi": true,
        "singleQuote": false,
        "trailingComma": "all"
    })
}

fn render_readme(ctx: &GeneratorContext) -> CodegenResult<String> {
    let info = &ctx.api.info;
    let client_class = format!(
        "{}{}Client",
        ctx.client_name(),
        ctx.transports
            .first()
            .map_or("HTTP", |transport| transport.class_suffix())
    );

    let mut out = String::new();
    let mut w = CodeWriter::new(&mut out, INDENT);
    cw_writeln!(w, "# {} TypeScript Client", info.title)?;
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
    cw_writeln!(w, "npm install {}", ctx.distribution_name())?;
    w.writeln("```")?;
    w.blank_line()?;
    w.writeln("## Usage")?;
    w.blank_line()?;
    w.writeln("```typescript")?;
    cw_writeln!(
        w,
        "import {{ {client_class} }} from \"{}\";",
        ctx.distribution_name()
    )?;
    w.blank_line()?;
    cw_writeln!(w, "const client = new {client_class}();")?;
    w.writeln("```")?;

    if ctx.groups.method_count() > 0 {
        w.blank_line()?;
        w.writeln("## Methods")?;
        w.blank_line()?;
        w.writeln("| RPC method | TypeScript call |")?;
        w.writeln("| --- | --- |")?;
        for group in ctx.groups.descendants() {
            let prefix: String = group
                .path
                .iter()
                .map(|segment| format!("{}.", camel_case(segment)))
                .collect();
            for (key, method) in &group.methods {
                cw_writeln!(
                    w,
                    "| `{}` | `client.{prefix}{}(...)` |",
                    method.name,
                    camel_case(key)
                )?;
            }
        }
    }

    drop(w);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openrpc_types::OpenRpc;
    use std::path::PathBuf;

    fn context(value: Value) -> GeneratorContext {
        GeneratorContext::from_document(&OpenRpc::from_value(value).unwrap()).unwrap()
    }

    fn file<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
        files
            .iter()
            .find(|file| file.path.ends_with(name))
            .map(|file| file.contents.as_str())
            .unwrap_or_else(|| panic!("{name} was not generated"))
    }

    fn library() -> Value {
        json!({
            "openrpc": "1.3.2",
            "info": { "title": "Library", "version": "0.3.0", "license": { "name": "MIT" } },
            "methods": [
                {
                    "name": "books.find",
                    "paramStructure": "by-name",
                    "params": [
                        { "name": "title", "required": true, "schema": { "type": "string" } },
                        { "name": "max_results", "schema": { "type": "integer" } }
                    ],
                    "result": {
                        "name": "books",
                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                    }
                },
                {
                    "name": "books.get",
                    "params": [
                        { "name": "isbn", "required": true, "schema": { "type": "string" } }
                    ],
                    "result": {
                        "name": "book",
                        "schema": { "oneOf": [{ "$ref": "#/components/schemas/Book" }, { "type": "null" }] }
                    }
                },
                {
                    "name": "tags",
                    "params": [],
                    "result": {
                        "name": "tags",
                        "schema": { "type": "array", "items": { "type": "string" }, "uniqueItems": true }
                    }
                }
            ],
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "description": "A book on the shelf.",
                        "properties": {
                            "title": { "type": "string" },
                            "page_count": { "type": "integer" },
                            "sequel": { "$ref": "#/components/schemas/Book" },
                            "genre": { "$ref": "#/components/schemas/Genre" }
                        },
                        "required": ["title"]
                    },
                    "Genre": { "type": "string", "enum": ["sci-fi", "poetry"] },
                    "Flag": { "enum": [true, false] }
                }
            }
        })
    }

    #[test]
    fn test_client() {
        let ctx = context(library());
        let files = TypeScriptEmitter.emit_client(&ctx).unwrap();
        let client = file(&files, "client.ts");

        assert!(client.contains("import { RPCHTTPClient } from \"jsonrpc2-tsclient\";"));
        assert!(client.contains("import { Book, Genre, Flag } from \"./models.js\";"));
        assert!(client.contains("export enum Servers {\n  DEFAULT = \"localhost\",\n}"));
        assert!(client.contains("export interface BooksFindParameters {"));
        assert!(client.contains("  maxResults?: number;"));
        assert!(client.contains("export class LibraryBooksMethods {"));
        assert!(client.contains(
            "  async find({ title, maxResults }: BooksFindParameters): Promise<Book[]> {"
        ));
        assert!(client.contains(
            "    const params = serializeObjectParams({ \"title\": title, \"max_results\": maxResults });"
        ));
        assert!(client.contains("    return result.map((it: any) => Book.fromJSON(it));"));
        assert!(client.contains("  async get(isbn: string): Promise<Book | null> {"));
        assert!(client.contains("    return result == null ? null : Book.fromJSON(result);"));
        assert!(client.contains("export class LibraryHTTPClient extends RPCHTTPClient {"));
        assert!(client.contains("  readonly books: LibraryBooksMethods;"));
        assert!(client.contains("    this.books = new LibraryBooksMethods(rpc);"));
        assert!(client.contains("  async tags(): Promise<Set<string>> {"));
        assert!(client.contains("    return new Set(result);"));

        let index = file(&files, "index.ts");
        assert!(index.contains("export * from \"./models.js\";"));
    }

    #[test]
    fn test_members_shadowing_generated_class_members_are_rejected() {
        for (name, group) in [
            ("call", "Library"),
            ("constructor", "Library"),
            ("books.rpc", "books"),
            ("books.constructor", "books"),
        ] {
            let mut value = library();
            value["methods"] = json!([{ "name": name, "params": [] }]);
            let ctx = context(value);
            match TypeScriptEmitter.emit_client(&ctx) {
                Err(CodegenError::NameCollision { group: found, .. }) => assert_eq!(found, group),
                other => panic!("expected a name collision for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_group_method_named_call_is_allowed() {
        let mut value = library();
        value["methods"] = json!([{ "name": "books.call", "params": [] }]);
        let ctx = context(value);
        let files = TypeScriptEmitter.emit_client(&ctx).unwrap();
        assert!(file(&files, "client.ts").contains("  async call(): Promise<void> {"));
    }

    #[test]
    fn test_models() {
        let ctx = context(library());
        let files = TypeScriptEmitter.emit_models(&ctx).unwrap();
        assert_eq!(files[0].path, PathBuf::from("src/models.ts"));
        let models = &files[0].contents;

        assert!(models.contains("/** A book on the shelf. */\nexport class Book {"));
        assert!(models.contains("  title: string;\n  pageCount?: number;"));
        assert!(models.contains("  constructor(title: string, pageCount?: number, sequel?: Book, genre?: Genre) {"));
        assert!(models.contains("      \"page_count\": this.pageCount,"));
        assert!(models.contains(
            "      data[\"sequel\"] == null ? data[\"sequel\"] : Book.fromJSON(data[\"sequel\"]),"
        ));
        assert!(models.contains("export enum Genre {\n  SCI_FI = \"sci-fi\",\n  POETRY = \"poetry\",\n}"));
        assert!(models.contains("export type Flag = any;"));
    }

    #[test]
    fn test_project_files() {
        let ctx = context(library());
        let files = TypeScriptEmitter.emit_project_files(&ctx).unwrap();

        let package: Value = serde_json::from_str(file(&files, "package.json")).unwrap();
        assert_eq!(package["name"], "library-client");
        assert_eq!(package["license"], "MIT");
        assert_eq!(package["author"], "Not Provided <Not Provided>");
        assert_eq!(package["dependencies"]["jsonrpc2-tsclient"], "^1.3.9");

        let tsconfig: Value = serde_json::from_str(file(&files, "tsconfig.json")).unwrap();
        assert_eq!(tsconfig["compilerOptions"]["outDir"], "dist");
        assert_eq!(file(&files, ".prettierignore"), "dist\nnode_modules\n");
        assert!(file(&files, "README.md").contains("| `books.find` | `client.books.find(...)` |"));
    }

    #[test]
    fn test_tool_invocations() {
        let ctx = context(library());
        let commands: Vec<String> = TypeScriptEmitter
            .tool_invocations(&ctx, ToolStage::Build)
            .iter()
            .map(ToolInvocation::command_line)
            .collect();
        assert_eq!(commands, vec!["npm install", "npm run build"]);
        assert_eq!(
            TypeScriptEmitter.tool_invocations(&ctx, ToolStage::Format)[0].command_line(),
            "npx prettier --write src"
        );
    }
}
