use crate::config::Settings;
use crate::error::ToolError;
use crate::generator::{ClientGenerator, GenerationReport};
use crate::loader::load_document;
use crate::runner::ProcessToolRunner;
use clap::{Args, Parser, Subcommand};
use openrpc_codegen::{TargetLanguage, Transport};
use std::path::PathBuf;
use std::sync::Arc;

/// Generate JSON-RPC clients from OpenRPC documents
#[derive(Parser, Debug)]
#[command(name = "openrpc-codegen")]
#[command(about = "Generate Python and TypeScript clients from OpenRPC documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate client packages
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// OpenRPC document (JSON or YAML), or a server URL to call rpc.discover on
    #[arg(short, long, value_name = "FILE|URL")]
    pub input: String,

    /// Output directory; one sub-directory per language
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Target language, repeatable (python, typescript)
    #[arg(short, long = "lang", value_name = "LANG")]
    pub languages: Vec<TargetLanguage>,

    /// Client transport, repeatable (http, ws)
    #[arg(short, long = "transport", value_name = "TRANSPORT")]
    pub transports: Vec<Transport>,

    /// Default server URL baked into the generated clients
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Skip running code formatters on the generated sources
    #[arg(long)]
    pub no_format: bool,

    /// Install dependencies and build the generated packages
    #[arg(long)]
    pub build: bool,

    /// Configuration file (defaults to openrpc-codegen.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Configured settings with the command line flags applied on top
    pub fn settings(&self) -> Result<Settings, ToolError> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(output) = &self.output {
            settings.output.dir = output.clone();
        }
        if !self.languages.is_empty() {
            settings.generate.languages = dedupe(&self.languages);
        }
        if !self.transports.is_empty() {
            settings.generate.transports = dedupe(&self.transports);
        }
        if let Some(url) = &self.url {
            settings.generate.client_url = Some(url.clone());
        }
        if self.no_format {
            settings.tools.format = false;
        }
        if self.build {
            settings.tools.build = true;
        }
        if self.verbose {
            settings.logging.level = "debug".to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load the document and generate every configured language.
    ///
    /// A failing language does not make this an `Err`; check the report.
    pub async fn run(&self, settings: Settings) -> Result<GenerationReport, ToolError> {
        if self.verbose {
            println!("🔍 Input: {}", self.input);
            println!("📁 Output directory: {}", settings.output.dir.display());
        }

        let document = load_document(&self.input).await?;
        let generator = ClientGenerator::new(settings, Arc::new(ProcessToolRunner));
        generator.generate(&document).await
    }
}

fn dedupe<T: PartialEq + Copy>(values: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(value) {
            unique.push(*value);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(args: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(
            ["openrpc-codegen", "generate"].iter().chain(args.iter()),
        )
        .unwrap();
        let Command::Generate(args) = cli.command;
        args
    }

    #[test]
    fn test_parse_flags() {
        let args = generate_args(&[
            "--input",
            "api.json",
            "--lang",
            "python",
            "--lang",
            "ts",
            "--lang",
            "python",
            "--transport",
            "ws",
            "--url",
            "https://api.example.com/rpc",
            "--no-format",
            "--build",
        ]);
        assert_eq!(args.input, "api.json");
        assert!(args.no_format);

        let settings = args.settings().unwrap();
        assert_eq!(
            settings.generate.languages,
            vec![TargetLanguage::Python, TargetLanguage::TypeScript]
        );
        assert_eq!(settings.generate.transports, vec![Transport::Ws]);
        assert_eq!(
            settings.generate.client_url.as_deref(),
            Some("https://api.example.com/rpc")
        );
        assert!(!settings.tools.format);
        assert!(settings.tools.build);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let result = Cli::try_parse_from([
            "openrpc-codegen",
            "generate",
            "--input",
            "api.json",
            "--lang",
            "kotlin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_url_flag() {
        let args = generate_args(&["--input", "api.json", "--url", "not-a-url"]);
        assert!(matches!(args.settings(), Err(ToolError::Config(_))));
    }
}
