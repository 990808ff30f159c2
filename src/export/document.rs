//! Word-compatible document export.
//!
//! Word, LibreOffice and Google Docs open HTML carrying the Office XML
//! namespaces as a native document when saved with a `.doc` extension.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::resume::ResumeData;
use crate::template::escape;

/// Section headings, in output order.
pub const SECTION_HEADINGS: [&str; 4] = ["Summary", "Experience", "Education", "Skills"];

pub fn render_document(data: &ResumeData, created: DateTime<Utc>) -> String {
    let mut body = String::new();
    // Writing into a String cannot fail.
    let _ = write_body(&mut body, data);

    let title = if data.full_name.trim().is_empty() {
        "Resume".to_string()
    } else {
        escape(&data.full_name)
    };

    format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n\
         <head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"generator\" content=\"cvgenius {version}\">\n\
         <meta name=\"created\" content=\"{created}\">\n\
         <title>{title}</title>\n\
         <!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View></w:WordDocument></xml><![endif]-->\n\
         <style>body{{font-family:Calibri,Arial,sans-serif;font-size:11pt}}h1{{font-size:20pt;margin:0}}\
         h2{{font-size:14pt;border-bottom:1px solid #999;margin-top:18pt}}</style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n",
        version = env!("CARGO_PKG_VERSION"),
        created = created.to_rfc3339(),
    )
}

fn write_body(out: &mut String, d: &ResumeData) -> std::fmt::Result {
    writeln!(out, "<h1>{}</h1>", escape(&d.full_name))?;
    writeln!(out, "<p><b>{}</b></p>", escape(&d.job_title))?;

    let mut contact = vec![d.contact.email.as_str(), d.contact.phone.as_str(), d.contact.location.as_str()];
    if let Some(linkedin) = &d.contact.linkedin {
        contact.push(linkedin);
    }
    let contact: Vec<String> = contact
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(escape)
        .collect();
    if !contact.is_empty() {
        writeln!(out, "<p>{}</p>", contact.join(" | "))?;
    }

    let [summary, experience, education, skills] = SECTION_HEADINGS;

    writeln!(out, "<h2>{summary}</h2>\n<p>{}</p>", escape(&d.summary))?;

    writeln!(out, "<h2>{experience}</h2>")?;
    for exp in &d.experiences {
        writeln!(
            out,
            "<h3>{} - {}</h3>\n<p><i>{}</i></p>\n<p>{}</p>",
            escape(&exp.position),
            escape(&exp.company),
            escape(&exp.period),
            escape(&exp.description),
        )?;
    }

    writeln!(out, "<h2>{education}</h2>")?;
    for edu in &d.education {
        writeln!(
            out,
            "<p><b>{}</b> - {} ({})</p>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }

    writeln!(out, "<h2>{skills}</h2>")?;
    let skills: Vec<String> = d.skills.iter().map(|s| escape(s)).collect();
    writeln!(out, "<p>{}</p>", skills.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::resume::{Education, Experience};

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn sample() -> ResumeData {
        ResumeData {
            full_name: "Ana Souza".into(),
            job_title: "Frontend Developer".into(),
            summary: "Ships interfaces".into(),
            experiences: vec![Experience {
                company: "Acme".into(),
                position: "Engineer".into(),
                period: "2020 - 2024".into(),
                description: "Design system".into(),
            }],
            education: vec![Education {
                institution: "USP".into(),
                degree: "BSc".into(),
                year: "2016".into(),
            }],
            skills: vec!["React".into(), "Rust".into()],
            ..Default::default()
        }
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let doc = render_document(&sample(), created());
        let positions: Vec<usize> = SECTION_HEADINGS
            .iter()
            .map(|h| doc.find(&format!("<h2>{h}</h2>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn carries_word_metadata() {
        let doc = render_document(&sample(), created());
        assert!(doc.starts_with("<html xmlns:o=\"urn:schemas-microsoft-com:office:office\""));
        assert!(doc.contains("xmlns:w=\"urn:schemas-microsoft-com:office:word\""));
        assert!(doc.contains("<meta charset=\"utf-8\">"));
        assert!(doc.contains("content=\"2026-10-19T12:00:00+00:00\""));
        assert!(doc.contains("<title>Ana Souza</title>"));
    }

    #[test]
    fn includes_record_content() {
        let doc = render_document(&sample(), created());
        assert!(doc.contains("<h3>Engineer - Acme</h3>"));
        assert!(doc.contains("<p><b>BSc</b> - USP (2016)</p>"));
        assert!(doc.contains("<p>React, Rust</p>"));
    }

    #[test]
    fn empty_record_still_has_all_headings() {
        let doc = render_document(&ResumeData::default(), created());
        for heading in SECTION_HEADINGS {
            assert!(doc.contains(&format!("<h2>{heading}</h2>")));
        }
        assert!(doc.contains("<title>Resume</title>"));
    }
}
