//! Command-line interface built on clap.
//!
//! [`Cli`] carries the global flags (`--config`, `--verbose`) and one of the
//! [`Command`] subcommands: the interactive `start` session, the one-shot
//! `build` pipeline, offline `render`, and `templates`.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::export::ExportFormat;
use crate::resume::Tone;
use crate::template::TemplateId;

/// cvgenius: AI-assisted résumé builder.
#[derive(Debug, Parser)]
#[command(name = "cvgenius", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./cvgenius.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive wizard session.
    Start,

    /// Extract, optionally improve, and export a résumé in one go.
    Build(BuildArgs),

    /// Render a saved résumé JSON file to HTML without calling the AI.
    Render {
        /// Résumé data in JSON (camelCase fields).
        #[arg(long)]
        data: PathBuf,

        /// Layout to use; the configured default when omitted.
        #[arg(long, value_enum)]
        template: Option<TemplateId>,

        /// Output file; standard output when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the available templates.
    Templates,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["text", "text_file", "image", "audio"])
))]
pub struct BuildArgs {
    /// Free text describing your background.
    #[arg(long)]
    pub text: Option<String>,

    /// File holding free text describing your background.
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Scan or photo of an existing résumé.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Recording of you describing your background.
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Rewrite the extracted content with AI before exporting.
    #[arg(long, default_value_t = false)]
    pub improve: bool,

    /// Tone used by --improve.
    #[arg(long, value_enum)]
    pub tone: Option<Tone>,

    /// Photo to turn into a professional portrait.
    #[arg(long)]
    pub photo: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub template: Option<TemplateId>,

    /// Output formats; may be repeated.
    #[arg(long = "format", value_enum, default_values_t = [ExportFormat::Doc])]
    pub formats: Vec<ExportFormat>,

    /// Output directory; the configured one when omitted.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_start() {
        let cli = Cli::parse_from(["cvgenius", "start"]);
        assert!(matches!(cli.command, Command::Start));
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["cvgenius", "templates", "--config", "my.toml", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn build_defaults_to_doc() {
        let cli = Cli::parse_from(["cvgenius", "build", "--text", "Ana, engineer"]);
        let Command::Build(args) = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(args.text.as_deref(), Some("Ana, engineer"));
        assert_eq!(args.formats, vec![ExportFormat::Doc]);
        assert!(!args.improve);
    }

    #[test]
    fn build_accepts_repeated_formats_and_options() {
        let cli = Cli::parse_from([
            "cvgenius", "build", "--image", "scan.jpg", "--improve", "--tone", "formal",
            "--template", "tech", "--format", "png", "--format", "doc",
        ]);
        let Command::Build(args) = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(args.image, Some(PathBuf::from("scan.jpg")));
        assert_eq!(args.tone, Some(Tone::Formal));
        assert_eq!(args.template, Some(TemplateId::Tech));
        assert_eq!(args.formats, vec![ExportFormat::Png, ExportFormat::Doc]);
    }

    #[test]
    fn build_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["cvgenius", "build"]).is_err());
        assert!(
            Cli::try_parse_from(["cvgenius", "build", "--text", "a", "--audio", "b.ogg"]).is_err()
        );
    }

    #[test]
    fn cli_parses_render() {
        let cli = Cli::parse_from(["cvgenius", "render", "--data", "cv.json", "--template", "classic"]);
        match cli.command {
            Command::Render { data, template, out } => {
                assert_eq!(data, PathBuf::from("cv.json"));
                assert_eq!(template, Some(TemplateId::Classic));
                assert!(out.is_none());
            }
            _ => panic!("expected Render command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
