mod ai;
mod capture;
mod cli;
mod config;
mod error;
mod export;
mod gemini;
mod media;
mod resume;
mod session;
mod template;
mod ui;
mod wizard;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Instrument, info, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use cli::{BuildArgs, Cli, Command};
use config::CvConfig;
use export::{ChromeRasterizer, ExportFormat};
use resume::ResumeData;
use template::TemplateId;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={level}", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CvConfig::load(cli.config.as_deref())?;
    let span = info_span!("session", id = %Uuid::new_v4());

    match cli.command {
        Command::Start => session::run(&config).instrument(span).await,
        Command::Build(args) => build(&config, args).instrument(span).await,
        Command::Render {
            data,
            template,
            out,
        } => render(&data, template.unwrap_or(config.default_template), out.as_deref()).await,
        Command::Templates => {
            ui::print_templates(Some(config.default_template));
            Ok(())
        }
    }
}

/// Runs the wizard non-interactively: extract, optionally retouch the photo
/// and rewrite, then export every requested format.
async fn build(config: &CvConfig, args: BuildArgs) -> Result<()> {
    let mut wizard = session::wizard_from_config(config)?;
    if let Some(template) = args.template {
        wizard.set_template(template)?;
    }

    if let Some(text) = &args.text {
        wizard.submit_text(text).await?;
    } else if let Some(path) = &args.text_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        wizard.submit_text(&text).await?;
    } else if let Some(path) = &args.image {
        let image = session::load_media(path, "image/").await?;
        wizard.capture_image(image)?;
        wizard.submit_image().await?;
    } else if let Some(path) = &args.audio {
        let clip = session::load_media(path, "audio/").await?;
        wizard.submit_audio(clip).await?;
    }
    ui::print_success("data extracted");

    if let Some(path) = &args.photo {
        let photo = session::load_media(path, "image/").await?;
        wizard.process_photo(photo).await?;
        ui::print_success("photo updated");
    }

    if args.improve {
        if let Some(tone) = args.tone {
            wizard.set_tone(tone)?;
        }
        wizard.improve_text().await?;
        ui::print_success("content improved");
    }

    let out_dir = args.out_dir.as_deref().unwrap_or(config.export.output_dir.as_path());
    let prefix = &config.export.file_prefix;
    let rasterizer =
        ChromeRasterizer::new(config.export.chrome_executable.clone(), config.export.scale);

    let mut exported = Vec::new();
    for format in args.formats {
        if exported.contains(&format) {
            continue;
        }
        exported.push(format);
        let path = match format {
            ExportFormat::Png => wizard.export_image(&rasterizer, out_dir, prefix).await?,
            ExportFormat::Doc => wizard.export_document(out_dir, prefix).await?,
        };
        ui::print_success(&format!("saved {}", path.display()));
    }
    info!("build finished");
    Ok(())
}

/// Renders a saved record to HTML with no AI involved.
async fn render(data: &Path, template: TemplateId, out: Option<&Path>) -> Result<()> {
    let json = tokio::fs::read_to_string(data)
        .await
        .with_context(|| format!("failed to read {}", data.display()))?;
    let resume: ResumeData = serde_json::from_str(&json)
        .with_context(|| format!("{} is not valid résumé JSON", data.display()))?;
    let html = template::render(&resume, template);

    match out {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            ui::print_success(&format!("saved {}", path.display()));
        }
        None => println!("{html}"),
    }
    Ok(())
}
