use std::fmt::{self, Write};

use super::{TemplateId, escape};
use crate::resume::ResumeData;

pub(super) const BASE_CSS: &str = "\
*{box-sizing:border-box;margin:0;padding:0}\
body{background:#e2e8f0;font-family:'Helvetica Neue',Arial,sans-serif}\
.page{width:800px;min-height:1056px;margin:0 auto;background:#fff;overflow:hidden;text-align:left;color:#1e293b}\
p{line-height:1.6}\
.chips span{display:inline-block;margin:0 6px 6px 0}";

pub(super) fn css(template: TemplateId) -> &'static str {
    match template {
        TemplateId::Classic => "\
.classic{padding:48px}\
.classic header{display:flex;justify-content:space-between;border-bottom:2px solid #0f172a;padding-bottom:24px;margin-bottom:32px}\
.classic h1{font-family:Georgia,serif;font-size:36px;text-transform:uppercase}\
.classic .title{font-size:20px;color:#475569;margin-top:4px}\
.classic .contact{margin-top:16px;font-size:13px;color:#64748b}\
.classic .contact span{margin-right:16px}\
.classic header img{width:128px;height:128px;object-fit:cover;border:1px solid #e2e8f0;border-radius:4px}\
.classic h2{font-size:16px;text-transform:uppercase;letter-spacing:.08em;border-bottom:1px solid #e2e8f0;margin-bottom:12px}\
.classic section{margin-bottom:32px}\
.classic .job{margin-bottom:20px}\
.classic .job-head{display:flex;justify-content:space-between;font-weight:bold}\
.classic .company{font-style:italic;color:#475569}\
.classic .columns{display:grid;grid-template-columns:1fr 1fr;gap:32px}\
.classic .chips span{background:#f1f5f9;padding:2px 8px;font-size:12px;border-radius:4px}",
        TemplateId::Modern => "\
.modern{display:flex}\
.modern aside{width:33%;background:#0f172a;color:#f1f5f9;padding:32px}\
.modern aside img,.modern .initial{width:128px;height:128px;border-radius:50%;display:block;margin:0 auto 16px;object-fit:cover}\
.modern .initial{background:#1e293b;font-size:40px;font-weight:bold;text-align:center;line-height:128px}\
.modern aside h1{font-size:24px;text-align:center}\
.modern aside .title{color:#94a3b8;text-align:center;font-size:14px;margin-bottom:32px}\
.modern aside h2{font-size:11px;text-transform:uppercase;letter-spacing:.2em;color:#60a5fa;margin:24px 0 12px}\
.modern aside .contact div{font-size:13px;color:#cbd5e1;margin-bottom:8px}\
.modern aside .chips span{border:1px solid #334155;padding:2px 8px;font-size:12px;border-radius:4px}\
.modern main{flex:1;background:#f8fafc;padding:40px}\
.modern main h2{font-size:13px;text-transform:uppercase;letter-spacing:.2em;color:#94a3b8;border-bottom:1px solid #e2e8f0;margin-bottom:16px}\
.modern main section{margin-bottom:40px}\
.modern .job{border-left:2px solid #dbeafe;padding-left:16px;margin-bottom:24px}\
.modern .period{font-size:10px;font-weight:bold;color:#2563eb;background:#eff6ff;padding:2px 8px;text-transform:uppercase}\
.modern .company{font-size:12px;font-weight:600;color:#64748b;text-transform:uppercase}",
        TemplateId::Creative => "\
.creative{padding:48px;position:relative}\
.creative header{display:flex;align-items:center;gap:32px;margin-bottom:48px}\
.creative header img{width:128px;height:128px;border-radius:16px;transform:rotate(3deg);object-fit:cover}\
.creative h1{font-size:48px;font-weight:900;color:#312e81;line-height:1}\
.creative .title{font-size:20px;color:#6366f1;margin-top:8px}\
.creative .contact{font-size:12px;font-weight:bold;color:#a5b4fc;margin-top:16px}\
.creative .grid{display:grid;grid-template-columns:2fr 1fr;gap:40px}\
.creative h2{font-size:24px;font-weight:900;color:#312e81;border-bottom:4px solid #c7d2fe;display:inline-block;margin-bottom:16px}\
.creative section{margin-bottom:40px}\
.creative .job{margin-bottom:32px}\
.creative .period{font-size:12px;font-weight:bold;background:#eef2ff;color:#6366f1;padding:4px 12px;border-radius:999px}\
.creative .company{font-size:13px;font-weight:bold;color:#94a3b8;text-transform:uppercase}\
.creative .skill{font-size:12px;font-weight:bold;margin-bottom:8px}\
.creative .bar{height:6px;background:#f1f5f9;border-radius:999px;margin-top:4px}\
.creative .bar div{height:100%;background:#6366f1;border-radius:999px}",
        TemplateId::Minimalist => "\
.minimalist{padding:64px;font-weight:300}\
.minimalist header{text-align:center;border-bottom:1px solid #e2e8f0;padding-bottom:40px;margin-bottom:40px}\
.minimalist h1{font-size:36px;letter-spacing:.2em;text-transform:uppercase;font-weight:300;margin-bottom:12px}\
.minimalist .title{font-size:14px;letter-spacing:.15em;text-transform:uppercase;color:#64748b;margin-bottom:24px}\
.minimalist .contact span{font-size:12px;color:#94a3b8;margin:0 12px}\
.minimalist .summary{max-width:512px;margin:0 auto 40px;text-align:center;color:#475569}\
.minimalist h2{font-size:12px;text-transform:uppercase;letter-spacing:.2em;text-align:center;color:#94a3b8;margin-bottom:32px}\
.minimalist .job{display:grid;grid-template-columns:1fr 3fr;gap:16px;margin-bottom:32px}\
.minimalist .period{text-align:right;font-size:12px;font-weight:bold}\
.minimalist .job-body{border-left:1px solid #f1f5f9;padding-left:24px}\
.minimalist .company{font-size:12px;text-transform:uppercase;color:#64748b;margin-bottom:8px}\
.minimalist .chips{text-align:center;margin-bottom:32px}\
.minimalist .chips span{border:1px solid #cbd5e1;border-radius:999px;padding:4px 16px;font-size:12px}\
.minimalist .schools{display:grid;grid-template-columns:1fr 1fr;gap:16px;text-align:center}",
        TemplateId::Executive => "\
.executive header{background:#1e293b;color:#fff;padding:48px;display:flex;justify-content:space-between;align-items:flex-end}\
.executive h1{font-family:Georgia,serif;font-size:36px;margin-bottom:8px}\
.executive .title{color:#bfdbfe;text-transform:uppercase;letter-spacing:.05em;font-size:14px}\
.executive .contact{text-align:right;font-size:14px;color:#cbd5e1;line-height:1.6}\
.executive .body{padding:48px;display:grid;grid-template-columns:2fr 1fr;gap:40px}\
.executive main h2{font-family:Georgia,serif;font-size:20px;border-bottom:2px solid #1e293b;padding-bottom:8px;margin-bottom:16px}\
.executive main section{margin-bottom:32px}\
.executive .job{margin-bottom:24px}\
.executive .job-head{display:flex;justify-content:space-between;align-items:baseline}\
.executive .company{color:#1e40af;font-size:14px;margin-bottom:8px}\
.executive aside{background:#f8fafc;padding:24px;border-radius:8px;align-self:start}\
.executive aside h2{font-size:14px;text-transform:uppercase;letter-spacing:.05em;margin-bottom:16px}\
.executive aside section{margin-bottom:32px}\
.executive aside .skill{display:block;font-size:14px;border-bottom:1px solid #e2e8f0;padding-bottom:4px;margin-bottom:8px}",
        TemplateId::Tech => "\
.tech{background:#0f172a;color:#cbd5e1;font-family:'Fira Code',Menlo,monospace;padding:40px}\
.tech header{display:flex;justify-content:space-between;border-bottom:1px solid rgba(34,197,94,.3);padding-bottom:32px;margin-bottom:32px}\
.tech h1{font-size:36px;color:#4ade80;margin-bottom:8px}\
.tech .title{font-size:20px;color:#fff}\
.tech .contact{text-align:right;font-size:12px;color:rgba(34,197,94,.8)}\
.tech .grid{display:grid;grid-template-columns:2fr 1fr;gap:32px}\
.tech h2{color:#4ade80;font-size:16px;margin-bottom:16px}\
.tech section{margin-bottom:32px}\
.tech .job{border-left:2px solid #334155;padding-left:16px;margin-bottom:32px}\
.tech .job-head{display:flex;justify-content:space-between}\
.tech .job-head h3{color:#fff}\
.tech .period{font-size:12px;color:#22c55e}\
.tech .company{font-size:14px;color:#64748b;margin-bottom:8px}\
.tech .chips span{background:#1e293b;color:#86efac;font-size:12px;padding:2px 8px;border:1px solid #334155;border-radius:4px}",
    }
}

fn photo(out: &mut String, data: &ResumeData) -> fmt::Result {
    if let Some(uri) = &data.photo_url {
        write!(out, "<img src=\"{}\" alt=\"Profile\">", escape(&uri.to_string()))?;
    }
    Ok(())
}

fn contact_items(data: &ResumeData) -> Vec<&str> {
    let c = &data.contact;
    [
        Some(c.email.as_str()),
        Some(c.phone.as_str()),
        Some(c.location.as_str()),
        c.linkedin.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|v| !v.trim().is_empty())
    .collect()
}

fn chips(out: &mut String, skills: &[String]) -> fmt::Result {
    out.push_str("<div class=\"chips\">");
    for skill in skills {
        write!(out, "<span>{}</span>", escape(skill))?;
    }
    out.push_str("</div>");
    Ok(())
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

pub(super) fn classic(out: &mut String, d: &ResumeData) -> fmt::Result {
    out.push_str("<header><div>");
    write!(
        out,
        "<h1>{}</h1><p class=\"title\">{}</p><div class=\"contact\">",
        escape(or_placeholder(&d.full_name, "Your Name")),
        escape(or_placeholder(&d.job_title, "Desired Position")),
    )?;
    for item in contact_items(d) {
        write!(out, "<span>{}</span>", escape(item))?;
    }
    out.push_str("</div></div>");
    photo(out, d)?;
    out.push_str("</header>\n");

    write!(
        out,
        "<section><h2>Professional Summary</h2><p>{}</p></section>\n",
        escape(&d.summary)
    )?;

    out.push_str("<section><h2>Professional Experience</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><div class=\"job-head\"><span>{}</span><span>{}</span></div>\
             <div class=\"company\">{}</div><p>{}</p></div>",
            escape(&exp.position),
            escape(&exp.period),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section>\n<div class=\"columns\"><section><h2>Education</h2>");
    for edu in &d.education {
        write!(
            out,
            "<div class=\"school\"><strong>{}</strong><div>{} | {}</div></div>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }
    out.push_str("</section><section><h2>Skills</h2>");
    chips(out, &d.skills)?;
    out.push_str("</section></div>\n");
    Ok(())
}

pub(super) fn modern(out: &mut String, d: &ResumeData) -> fmt::Result {
    out.push_str("<aside>");
    if d.photo_url.is_some() {
        photo(out, d)?;
    } else {
        let initial: String = d.full_name.trim().chars().take(1).collect();
        write!(out, "<div class=\"initial\">{}</div>", escape(&initial))?;
    }
    write!(
        out,
        "<h1>{}</h1><p class=\"title\">{}</p>",
        escape(&d.full_name),
        escape(&d.job_title)
    )?;
    out.push_str("<h2>Contact</h2><div class=\"contact\">");
    for item in contact_items(d) {
        write!(out, "<div>{}</div>", escape(item))?;
    }
    out.push_str("</div><h2>Skills</h2>");
    chips(out, &d.skills)?;
    out.push_str("</aside>\n<main>");

    write!(out, "<section><h2>Profile</h2><p>{}</p></section>", escape(&d.summary))?;
    out.push_str("<section><h2>Experience</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><h3>{}</h3><span class=\"period\">{}</span>\
             <p class=\"company\">{}</p><p>{}</p></div>",
            escape(&exp.position),
            escape(&exp.period),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section><section><h2>Education</h2>");
    for edu in &d.education {
        write!(
            out,
            "<div class=\"school\"><h3>{}</h3><p>{} | {}</p></div>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }
    out.push_str("</section></main>\n");
    Ok(())
}

pub(super) fn creative(out: &mut String, d: &ResumeData) -> fmt::Result {
    out.push_str("<header>");
    photo(out, d)?;
    write!(
        out,
        "<div><h1>{}</h1><p class=\"title\">{}</p><div class=\"contact\">{}</div></div></header>\n",
        escape(&d.full_name),
        escape(&d.job_title),
        escape(&[d.contact.email.as_str(), d.contact.location.as_str()]
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" • ")),
    )?;

    out.push_str("<div class=\"grid\"><div>");
    write!(out, "<section><h2>About Me</h2><p>{}</p></section>", escape(&d.summary))?;
    out.push_str("<section><h2>Journey</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><h3>{}</h3><span class=\"period\">{}</span>\
             <p class=\"company\">{}</p><p>{}</p></div>",
            escape(&exp.position),
            escape(&exp.period),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section></div><div><section><h2>Skills</h2>");
    for (i, skill) in d.skills.iter().enumerate() {
        let width = 60 + (i * 5) % 40;
        write!(
            out,
            "<div class=\"skill\">{}<div class=\"bar\"><div style=\"width:{width}%\"></div></div></div>",
            escape(skill)
        )?;
    }
    out.push_str("</section><section><h2>Education</h2>");
    for edu in &d.education {
        write!(
            out,
            "<div class=\"school\"><strong>{}</strong><div>{}</div><div>{}</div></div>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }
    out.push_str("</section></div></div>\n");
    Ok(())
}

pub(super) fn minimalist(out: &mut String, d: &ResumeData) -> fmt::Result {
    write!(
        out,
        "<header><h1>{}</h1><p class=\"title\">{}</p><div class=\"contact\">",
        escape(&d.full_name),
        escape(&d.job_title)
    )?;
    for item in contact_items(d) {
        write!(out, "<span>{}</span>", escape(item))?;
    }
    out.push_str("</div></header>\n");
    write!(out, "<p class=\"summary\">{}</p>\n", escape(&d.summary))?;

    out.push_str("<section><h2>Experience</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><div class=\"period\">{}</div><div class=\"job-body\">\
             <h3>{}</h3><div class=\"company\">{}</div><p>{}</p></div></div>",
            escape(&exp.period),
            escape(&exp.position),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section>\n<section><h2>Skills &amp; Education</h2>");
    chips(out, &d.skills)?;
    out.push_str("<div class=\"schools\">");
    for edu in &d.education {
        write!(
            out,
            "<div><div>{}</div><small>{}</small></div>",
            escape(&edu.degree),
            escape(&edu.institution),
        )?;
    }
    out.push_str("</div></section>\n");
    Ok(())
}

pub(super) fn executive(out: &mut String, d: &ResumeData) -> fmt::Result {
    write!(
        out,
        "<header><div><h1>{}</h1><p class=\"title\">{}</p></div><div class=\"contact\">",
        escape(&d.full_name),
        escape(&d.job_title)
    )?;
    for item in contact_items(d) {
        write!(out, "<div>{}</div>", escape(item))?;
    }
    out.push_str("</div></header>\n<div class=\"body\"><main>");

    write!(out, "<section><h2>Profile</h2><p>{}</p></section>", escape(&d.summary))?;
    out.push_str("<section><h2>Experience</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><div class=\"job-head\"><h3>{}</h3><strong>{}</strong></div>\
             <div class=\"company\">{}</div><p>{}</p></div>",
            escape(&exp.position),
            escape(&exp.period),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section></main><aside><section><h2>Education</h2>");
    for edu in &d.education {
        write!(
            out,
            "<div class=\"school\"><strong>{}</strong><div>{}</div><small>{}</small></div>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }
    out.push_str("</section><section><h2>Competencies</h2>");
    for skill in &d.skills {
        write!(out, "<span class=\"skill\">{}</span>", escape(skill))?;
    }
    out.push_str("</section></aside></div>\n");
    Ok(())
}

pub(super) fn tech(out: &mut String, d: &ResumeData) -> fmt::Result {
    write!(
        out,
        "<header><div><h1>{{ {} }}</h1><p class=\"title\">&gt; {}</p></div><div class=\"contact\">",
        escape(&d.full_name),
        escape(&d.job_title)
    )?;
    for item in contact_items(d) {
        write!(out, "<div>{}</div>", escape(item))?;
    }
    out.push_str("</div></header>\n<div class=\"grid\"><div>");

    write!(out, "<section><h2>/* SUMMARY */</h2><p>{}</p></section>", escape(&d.summary))?;
    out.push_str("<section><h2>/* EXPERIENCE */</h2>");
    for exp in &d.experiences {
        write!(
            out,
            "<div class=\"job\"><div class=\"job-head\"><h3>{}</h3><span class=\"period\">{}</span></div>\
             <div class=\"company\">@ {}</div><p>{}</p></div>",
            escape(&exp.position),
            escape(&exp.period),
            escape(&exp.company),
            escape(&exp.description),
        )?;
    }
    out.push_str("</section></div><div><section><h2>/* SKILLS */</h2>");
    chips(out, &d.skills)?;
    out.push_str("</section><section><h2>/* EDUCATION */</h2>");
    for edu in &d.education {
        write!(
            out,
            "<div class=\"school\"><div>{}</div><small>{}</small><small>{}</small></div>",
            escape(&edu.degree),
            escape(&edu.institution),
            escape(&edu.year),
        )?;
    }
    out.push_str("</section></div></div>\n");
    Ok(())
}
