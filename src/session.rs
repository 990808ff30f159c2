//! The interactive wizard shell behind `cvgenius start`.
//!
//! Each input line is turned into a [`SessionCommand`] by the pure
//! [`parse_command`] and then executed against the [`Wizard`].

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::Style;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::ai::{GeminiResumeAi, ResumeAi};
use crate::capture::{AudioRecorder, FfmpegRecorder};
use crate::config::{CvConfig, ExportConfig};
use crate::error::WizardError;
use crate::export::{ChromeRasterizer, ExportFormat, Rasterizer};
use crate::gemini::GeminiClient;
use crate::media::{DataUri, MediaError};
use crate::resume::{EducationField, ExperienceField, Length, ProfileField, Tone, UnknownField};
use crate::template::{TemplateId, UnknownTemplate};
use crate::ui::{self, Spinner};
use crate::wizard::{Step, UnknownStep, Wizard};

/// The wizard wired to Gemini and the local microphone.
pub type LiveWizard = Wizard<GeminiResumeAi<GeminiClient>, FfmpegRecorder>;

/// Builds a wizard from configuration, with a spinner as busy indicator.
pub fn wizard_from_config(config: &CvConfig) -> Result<LiveWizard> {
    let api_key = config.require_api_key()?.to_string();
    let client = GeminiClient::with_base_url(api_key, config.api_base_url.clone())
        .context("failed to create Gemini client")?;
    let ai = GeminiResumeAi::new(
        client,
        config.text_model.clone(),
        config.image_model.clone(),
        config.language.clone(),
    );
    let recorder = FfmpegRecorder::new(&config.audio);
    Ok(Wizard::new(ai, recorder, config.default_template).with_observer(Spinner::new()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Help,
    Show,
    Text(String),
    Image(PathBuf),
    Scan,
    Record,
    Stop,
    Improve,
    Photo(PathBuf),
    Next,
    Back,
    GoTo(Step),
    Set(ProfileField, String),
    ExperienceAdd,
    ExperienceRemove(usize),
    ExperienceSet(usize, ExperienceField, String),
    EducationAdd,
    EducationRemove(usize),
    EducationSet(usize, EducationField, String),
    SkillAdd(String),
    SkillRemove(usize),
    Tone(Tone),
    Length(Length),
    Template(TemplateId),
    Templates,
    Preview(PathBuf),
    Export(ExportFormat),
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type `help` for the list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not an entry number")]
    BadIndex(String),

    #[error("invalid {what} '{value}'")]
    InvalidValue { what: &'static str, value: String },

    #[error(transparent)]
    Field(#[from] UnknownField),

    #[error(transparent)]
    Step(#[from] UnknownStep),

    #[error(transparent)]
    Template(#[from] UnknownTemplate),
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn required<'a>(value: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(value)
    }
}

fn index(value: &str) -> Result<usize, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::BadIndex(value.to_string()))
}

fn value_enum<T: ValueEnum>(what: &'static str, value: &str) -> Result<T, CommandError> {
    T::from_str(value, true).map_err(|_| CommandError::InvalidValue {
        what,
        value: value.to_string(),
    })
}

/// Parses one line of input. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, CommandError> {
    let (name, rest) = split_word(line);
    if name.is_empty() {
        return Ok(None);
    }

    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => SessionCommand::Help,
        "show" | "status" => SessionCommand::Show,
        "text" => SessionCommand::Text(required(rest, "text <your background>")?.to_string()),
        "image" => SessionCommand::Image(PathBuf::from(required(rest, "image <path>")?)),
        "scan" => SessionCommand::Scan,
        "record" => SessionCommand::Record,
        "stop" => SessionCommand::Stop,
        "improve" => SessionCommand::Improve,
        "photo" => SessionCommand::Photo(PathBuf::from(required(rest, "photo <path>")?)),
        "next" => SessionCommand::Next,
        "back" => SessionCommand::Back,
        "goto" => SessionCommand::GoTo(required(rest, "goto <step>")?.parse()?),
        "set" => {
            let (field, value) = split_word(rest);
            let field = required(field, "set <field> <value>")?.parse()?;
            SessionCommand::Set(field, value.to_string())
        }
        "exp" => parse_entry_command(
            rest,
            "exp add | rm <i> | set <i> <field> <value>",
            SessionCommand::ExperienceAdd,
            SessionCommand::ExperienceRemove,
            |i, field, value| Ok(SessionCommand::ExperienceSet(i, field.parse()?, value)),
        )?,
        "edu" => parse_entry_command(
            rest,
            "edu add | rm <i> | set <i> <field> <value>",
            SessionCommand::EducationAdd,
            SessionCommand::EducationRemove,
            |i, field, value| Ok(SessionCommand::EducationSet(i, field.parse()?, value)),
        )?,
        "skill" => {
            const USAGE: &str = "skill add <name> | rm <i>";
            match split_word(rest) {
                ("add", name) => SessionCommand::SkillAdd(required(name, USAGE)?.to_string()),
                ("rm", i) => SessionCommand::SkillRemove(index(required(i, USAGE)?)?),
                _ => return Err(CommandError::Usage(USAGE)),
            }
        }
        "tone" => SessionCommand::Tone(value_enum("tone", required(rest, "tone formal|modern")?)?),
        "length" => {
            SessionCommand::Length(value_enum("length", required(rest, "length short|full")?)?)
        }
        "template" => SessionCommand::Template(required(rest, "template <id>")?.parse()?),
        "templates" => SessionCommand::Templates,
        "preview" => SessionCommand::Preview(PathBuf::from(required(rest, "preview <file.html>")?)),
        "export" => {
            SessionCommand::Export(value_enum("format", required(rest, "export png|doc")?)?)
        }
        "restart" => SessionCommand::Restart,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_entry_command(
    rest: &str,
    usage: &'static str,
    add: SessionCommand,
    remove: fn(usize) -> SessionCommand,
    set: impl FnOnce(usize, &str, String) -> Result<SessionCommand, CommandError>,
) -> Result<SessionCommand, CommandError> {
    match split_word(rest) {
        ("add", "") => Ok(add),
        ("rm", i) => Ok(remove(index(required(i, usage)?)?)),
        ("set", args) => {
            let (i, args) = split_word(args);
            let (field, value) = split_word(args);
            let i = index(required(i, usage)?)?;
            set(i, required(field, usage)?, value.to_string())
        }
        _ => Err(CommandError::Usage(usage)),
    }
}

#[derive(Debug, Error)]
enum SessionError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Loads a file as a data URI, insisting on the given MIME family.
pub async fn load_media(path: &Path, family: &str) -> Result<DataUri, MediaError> {
    let media = DataUri::from_file(path).await?;
    if !media.mime_type().starts_with(family) {
        return Err(MediaError::UnsupportedType(format!(
            "{} is {}, expected {family}*",
            path.display(),
            media.mime_type()
        )));
    }
    Ok(media)
}

fn show<A: ResumeAi, R: AudioRecorder>(wizard: &Wizard<A, R>) {
    ui::print_state(
        wizard.state(),
        wizard.is_recording(),
        wizard.captured_image().is_some(),
    );
}

async fn execute<A: ResumeAi, R: AudioRecorder>(
    wizard: &mut Wizard<A, R>,
    rasterizer: &impl Rasterizer,
    export: &ExportConfig,
    command: SessionCommand,
) -> Result<Flow, SessionError> {
    debug!(?command, "executing");
    match command {
        SessionCommand::Help => ui::print_help(),
        SessionCommand::Show => show(wizard),
        SessionCommand::Text(text) => {
            wizard.submit_text(&text).await?;
            ui::print_success("data extracted");
            show(wizard);
        }
        SessionCommand::Image(path) => {
            let image = load_media(&path, "image/").await?;
            wizard.capture_image(image)?;
            ui::print_success("image loaded; type `scan` to extract it");
        }
        SessionCommand::Scan => {
            wizard.submit_image().await?;
            ui::print_success("data extracted from the image");
            show(wizard);
        }
        SessionCommand::Record => {
            wizard.start_recording().await?;
            ui::print_info("recording... describe your experience, then type `stop`");
        }
        SessionCommand::Stop => {
            wizard.stop_recording().await?;
            ui::print_success("data extracted from your recording");
            show(wizard);
        }
        SessionCommand::Improve => {
            wizard.improve_text().await?;
            ui::print_success("content improved");
            show(wizard);
        }
        SessionCommand::Photo(path) => {
            let photo = load_media(&path, "image/").await?;
            wizard.process_photo(photo).await?;
            ui::print_success("photo updated");
        }
        SessionCommand::Next => {
            wizard.next()?;
            println!("{}", ui::step_indicator(wizard.step()));
        }
        SessionCommand::Back => {
            wizard.back()?;
            println!("{}", ui::step_indicator(wizard.step()));
        }
        SessionCommand::GoTo(step) => {
            wizard.go_to(step)?;
            println!("{}", ui::step_indicator(wizard.step()));
        }
        SessionCommand::Set(field, value) => wizard.set_field(field, value)?,
        SessionCommand::ExperienceAdd => {
            let i = wizard.add_experience()?;
            ui::print_success(&format!("experience [{i}] added"));
        }
        SessionCommand::ExperienceRemove(i) => {
            let removed = wizard.remove_experience(i)?;
            ui::print_success(&format!("removed {} @ {}", removed.position, removed.company));
        }
        SessionCommand::ExperienceSet(i, field, value) => {
            wizard.update_experience(i, field, value)?
        }
        SessionCommand::EducationAdd => {
            let i = wizard.add_education()?;
            ui::print_success(&format!("education [{i}] added"));
        }
        SessionCommand::EducationRemove(i) => {
            let removed = wizard.remove_education(i)?;
            ui::print_success(&format!("removed {}", removed.degree));
        }
        SessionCommand::EducationSet(i, field, value) => {
            wizard.update_education(i, field, value)?
        }
        SessionCommand::SkillAdd(skill) => wizard.add_skill(skill)?,
        SessionCommand::SkillRemove(i) => {
            let removed = wizard.remove_skill(i)?;
            ui::print_success(&format!("removed {removed}"));
        }
        SessionCommand::Tone(tone) => wizard.set_tone(tone)?,
        SessionCommand::Length(length) => wizard.set_length(length)?,
        SessionCommand::Template(template) => {
            wizard.set_template(template)?;
            ui::print_success(&format!("template set to {template}"));
        }
        SessionCommand::Templates => ui::print_templates(Some(wizard.state().template)),
        SessionCommand::Preview(path) => {
            tokio::fs::write(&path, wizard.render())
                .await
                .map_err(|source| SessionError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
            ui::print_success(&format!("preview written to {}", path.display()));
        }
        SessionCommand::Export(format) => {
            let path = match format {
                ExportFormat::Png => {
                    wizard
                        .export_image(rasterizer, &export.output_dir, &export.file_prefix)
                        .await?
                }
                ExportFormat::Doc => {
                    wizard
                        .export_document(&export.output_dir, &export.file_prefix)
                        .await?
                }
            };
            ui::print_success(&format!("saved {}", path.display()));
        }
        SessionCommand::Restart => {
            wizard.restart()?;
            ui::print_success("started over");
            println!("{}", ui::step_indicator(wizard.step()));
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn report(err: &SessionError) {
    match err {
        SessionError::Wizard(e) => ui::print_error(e),
        other => ui::print_failure(&other.to_string()),
    }
}

fn prompt(step: Step) -> Result<()> {
    print!("{} ", Style::new().cyan().bold().apply_to(format!("[{step}]>")));
    std::io::stdout().flush().context("failed to flush stdout")
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(config: &CvConfig) -> Result<()> {
    let mut wizard = wizard_from_config(config)?;
    let rasterizer = ChromeRasterizer::new(config.export.chrome_executable.clone(), config.export.scale);
    info!(template = %config.default_template, "session started");

    println!("{}", Style::new().bold().apply_to("cvgenius: build your résumé step by step"));
    println!("type `help` for the list of commands");
    println!("{}", ui::step_indicator(wizard.step()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(wizard.step())?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                ui::print_warning(&e.to_string());
                continue;
            }
        };
        match execute(&mut wizard, &rasterizer, &config.export, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => report(&e),
        }
    }

    if wizard.is_recording() {
        ui::print_warning("recording discarded");
    }
    info!("session ended");
    Ok(())
}
