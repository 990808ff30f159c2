//! Terminal output for cvgenius: spinners and coloured status lines.
//!
//! [`Spinner`] is plugged into the wizard as its [`ProcessingObserver`] so the
//! busy message is visible while an AI call or an export is outstanding.

use std::sync::Mutex;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::WizardError;
use crate::resume::{Contact, ResumeData};
use crate::template::TemplateId;
use crate::wizard::{Activity, ProcessingObserver, Step, WizardState};

/// Animated spinner shown while the wizard is processing.
#[derive(Default)]
pub struct Spinner {
    pb: Mutex<Option<ProgressBar>>,
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessingObserver for Spinner {
    fn started(&self, state: &WizardState) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(state.processing_message());
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.pb.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn finished(&self, _activity: Activity) {
        if let Ok(mut slot) = self.pb.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

pub fn print_success(message: &str) {
    println!("  {} {message}", Style::new().green().bold().apply_to("✓"));
}

pub fn print_info(message: &str) {
    println!("  {} {message}", Style::new().cyan().apply_to("•"));
}

/// Failures go to stderr, prefixed with their [`ErrorKind`](crate::error::ErrorKind).
pub fn print_error(err: &WizardError) {
    eprintln!(
        "  {} {}: {err}",
        Style::new().red().bold().apply_to("✗"),
        Style::new().red().apply_to(err.kind())
    );
}

/// Failures that are not wizard errors, such as an unreadable file.
pub fn print_failure(message: &str) {
    eprintln!("  {} {message}", Style::new().red().bold().apply_to("✗"));
}

pub fn print_warning(message: &str) {
    eprintln!("  {} {message}", Style::new().yellow().apply_to("!"));
}

/// `1 Input · 2 Edit · 3 Photo · 4 Export` with the current step highlighted.
pub fn step_indicator(current: Step) -> String {
    let active = Style::new().cyan().bold().underlined();
    let done = Style::new().green();
    let pending = Style::new().dim();
    Step::ALL
        .iter()
        .map(|&step| {
            let label = step.to_string();
            if step == current {
                active.apply_to(label).to_string()
            } else if step < current {
                done.apply_to(label).to_string()
            } else {
                pending.apply_to(label).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

/// Prints the step indicator followed by a summary of the record.
pub fn print_state(state: &WizardState, recording: bool, image_captured: bool) {
    let heading = Style::new().bold();
    println!();
    println!("{}", step_indicator(state.step));
    if state.is_processing() {
        print_info(&state.processing_message());
    }
    if recording {
        println!("  {} recording... type `stop` to finish", Style::new().red().apply_to("●"));
    }
    if image_captured && state.step == Step::Input {
        print_info("image captured; type `scan` to extract it");
    }
    println!();
    print_resume(&state.resume);
    println!();
    println!(
        "{} {}   {} {}   {} {}",
        heading.apply_to("template:"),
        state.template,
        heading.apply_to("tone:"),
        state.resume.tone,
        heading.apply_to("length:"),
        state.resume.length
    );
}

pub fn print_resume(resume: &ResumeData) {
    let heading = Style::new().bold();
    let dim = Style::new().dim();
    println!("{} {}", heading.apply_to("name:   "), or_dash(&resume.full_name));
    println!("{} {}", heading.apply_to("title:  "), or_dash(&resume.job_title));
    print_contact(&resume.contact);
    println!(
        "{} {}",
        heading.apply_to("photo:  "),
        if resume.photo_url.is_some() { "yes" } else { "no" }
    );
    println!("{} {}", heading.apply_to("summary:"), or_dash(&resume.summary));

    println!("{}", heading.apply_to("experience:"));
    if resume.experiences.is_empty() {
        println!("  {}", dim.apply_to("(none)"));
    }
    for (i, exp) in resume.experiences.iter().enumerate() {
        println!(
            "  [{i}] {} @ {} {}",
            or_dash(&exp.position),
            or_dash(&exp.company),
            dim.apply_to(format!("({})", or_dash(&exp.period)))
        );
    }

    println!("{}", heading.apply_to("education:"));
    if resume.education.is_empty() {
        println!("  {}", dim.apply_to("(none)"));
    }
    for (i, edu) in resume.education.iter().enumerate() {
        println!(
            "  [{i}] {}, {} {}",
            or_dash(&edu.degree),
            or_dash(&edu.institution),
            dim.apply_to(format!("({})", or_dash(&edu.year)))
        );
    }

    println!("{}", heading.apply_to("skills:"));
    if resume.skills.is_empty() {
        println!("  {}", dim.apply_to("(none)"));
    } else {
        let skills: Vec<String> = resume
            .skills
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[{i}] {s}"))
            .collect();
        println!("  {}", skills.join("  "));
    }
}

fn print_contact(contact: &Contact) {
    let heading = Style::new().bold();
    println!("{} {}", heading.apply_to("email:  "), or_dash(&contact.email));
    println!("{} {}", heading.apply_to("phone:  "), or_dash(&contact.phone));
    println!("{} {}", heading.apply_to("place:  "), or_dash(&contact.location));
    if let Some(linkedin) = &contact.linkedin {
        println!("{} {linkedin}", heading.apply_to("linkedin:"));
    }
}

pub fn print_templates(current: Option<TemplateId>) {
    for template in TemplateId::ALL {
        let marker = if Some(template) == current { "*" } else { " " };
        println!(
            "{marker} {:<11} {}",
            Style::new().bold().apply_to(template.as_str()),
            Style::new().dim().apply_to(template.description())
        );
    }
}

const HELP: &str = "\
input (step 1)
  text <resume text>          extract data from text
  image <path>                load a scan or photo of a resume
  scan                        extract data from the loaded image
  record / stop               dictate your background by voice
edit (step 2)
  set <field> <value>         name, title, summary, email, phone, location, linkedin
  exp add | rm <i> | set <i> <field> <value>
                              company, position, period, description
  edu add | rm <i> | set <i> <field> <value>
                              institution, degree, year
  skill add <name> | rm <i>
  tone formal|modern          length short|full
  improve                     rewrite the content with AI
photo (step 3)
  photo <path>                turn a photo into a professional portrait
export (step 4)
  template <id>               templates
  preview <file.html>         export png|doc
navigation
  next  back  goto <step>  restart  show  help  quit";

pub fn print_help() {
    println!("{HELP}");
}
