//! Read-only projection of the aggregate record into a printable document.

use serde::Serialize;

use crate::forms::validation::is_blank;
use crate::forms::ListEntry;
use crate::models::portfolio::{
    AchievementEntry, AggregateRecord, CertificationEntry, EducationEntry, ExperienceEntry,
    InternshipEntry, LanguageEntry, ProjectEntry, Skills,
};
use crate::wizard::steps::StepId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    /// Paragraphs, each wrapped independently on export.
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub step: StepId,
    pub title: String,
    pub entries: Vec<PreviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub title: String,
    /// Non-blank contact fields joined with ` | `.
    pub contact_line: String,
    pub sections: Vec<PreviewSection>,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// Projects `record` in canonical section order. Blank entries and empty sections
/// are omitted; the record itself is never modified.
pub fn render(record: &AggregateRecord) -> PreviewDocument {
    let p = &record.personal;
    let contact_line = join_present(
        &[
            &p.email,
            &p.phone,
            &p.address,
            &p.linkedin,
            &p.github,
            &p.portfolio_url,
        ],
        " | ",
    );

    let sections = [
        section(StepId::Education, list(&record.education, education_entry)),
        section(StepId::Internships, list(&record.internships, internship_entry)),
        section(StepId::Experience, list(&record.experience, experience_entry)),
        section(StepId::Projects, list(&record.projects, project_entry)),
        section(StepId::Skills, skills_entries(&record.skills)),
        section(
            StepId::Certifications,
            list(&record.certifications, certification_entry),
        ),
        section(StepId::Languages, list(&record.languages, language_entry)),
        section(
            StepId::Achievements,
            list(&record.achievements, achievement_entry),
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    PreviewDocument {
        title: record.display_name().to_string(),
        contact_line,
        sections,
    }
}

fn section(step: StepId, entries: Vec<PreviewEntry>) -> Option<PreviewSection> {
    if entries.is_empty() {
        return None;
    }
    Some(PreviewSection {
        step,
        title: step.display_name().to_string(),
        entries,
    })
}

fn list<E: ListEntry>(entries: &[E], project: fn(&E) -> PreviewEntry) -> Vec<PreviewEntry> {
    entries
        .iter()
        .filter(|e| !e.is_blank())
        .map(project)
        .collect()
}

fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn optional(parts: &[&str], sep: &str) -> Option<String> {
    let joined = join_present(parts, sep);
    (!joined.is_empty()).then_some(joined)
}

fn paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn heading_or(primary: &str, fallback: &str) -> String {
    if is_blank(primary) {
        fallback.to_string()
    } else {
        primary.trim().to_string()
    }
}

fn education_entry(e: &EducationEntry) -> PreviewEntry {
    let mut body = Vec::new();
    if let Some(major) = e.major.as_deref().filter(|m| !is_blank(m)) {
        body.push(format!("Major: {}", major.trim()));
    }
    if !is_blank(&e.score) {
        body.push(format!("Score: {}", e.score.trim()));
    }
    if let Some(backlogs) = e.backlogs.filter(|b| *b > 0) {
        body.push(format!("Backlogs: {backlogs}"));
    }

    let programme = e
        .course_name
        .as_deref()
        .filter(|c| !is_blank(c))
        .unwrap_or(e.level.label());
    let years = optional(&[&e.start_year, &e.end_year], " - ");
    PreviewEntry {
        heading: heading_or(&e.institution, e.level.label()),
        subheading: optional(
            &[
                programme,
                &e.board_or_university,
                years.as_deref().unwrap_or(""),
            ],
            ", ",
        ),
        body,
    }
}

fn internship_entry(e: &InternshipEntry) -> PreviewEntry {
    PreviewEntry {
        heading: heading_or(&e.company, "Internship"),
        subheading: optional(&[&e.role, &e.duration], ", "),
        body: paragraphs(&e.description),
    }
}

fn experience_entry(e: &ExperienceEntry) -> PreviewEntry {
    let end = if e.currently_working {
        "Present"
    } else {
        e.end_date.as_str()
    };
    let period = optional(&[&e.start_date, end], " - ");
    PreviewEntry {
        heading: heading_or(&e.company, "Experience"),
        subheading: optional(&[&e.designation, period.as_deref().unwrap_or("")], ", "),
        body: paragraphs(&e.description),
    }
}

fn project_entry(e: &ProjectEntry) -> PreviewEntry {
    let mut body = paragraphs(&e.description);
    if !is_blank(&e.tech_stack) {
        body.push(format!("Tech stack: {}", e.tech_stack.trim()));
    }
    PreviewEntry {
        heading: heading_or(&e.title, "Project"),
        subheading: optional(&[&e.link], ""),
        body,
    }
}

fn skills_entries(skills: &Skills) -> Vec<PreviewEntry> {
    [
        ("Technical", &skills.technical),
        ("Soft skills", &skills.soft),
        ("Interests", &skills.interests),
        ("Hobbies", &skills.hobbies),
    ]
    .into_iter()
    .filter_map(|(label, items)| {
        let refs: Vec<&str> = items.iter().map(String::as_str).collect();
        optional(&refs, ", ").map(|joined| PreviewEntry {
            heading: label.to_string(),
            subheading: None,
            body: vec![joined],
        })
    })
    .collect()
}

fn certification_entry(e: &CertificationEntry) -> PreviewEntry {
    PreviewEntry {
        heading: heading_or(&e.name, "Certification"),
        subheading: optional(&[&e.issuer, &e.issue_date], ", "),
        body: optional(&[&e.credential_url], "").into_iter().collect(),
    }
}

fn language_entry(e: &LanguageEntry) -> PreviewEntry {
    PreviewEntry {
        heading: heading_or(&e.language, "Language"),
        subheading: optional(&[&e.proficiency], ""),
        body: Vec::new(),
    }
}

fn achievement_entry(e: &AchievementEntry) -> PreviewEntry {
    PreviewEntry {
        heading: heading_or(&e.title, "Achievement"),
        subheading: None,
        body: paragraphs(&e.description),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Markdown
// ────────────────────────────────────────────────────────────────────────────

/// Plain-text rendering of the preview, one `##` block per section.
pub fn render_markdown(doc: &PreviewDocument) -> String {
    let mut md = format!("# {}\n\n", doc.title);
    if !doc.contact_line.is_empty() {
        md.push_str(&format!("{}\n\n", doc.contact_line));
    }
    for section in &doc.sections {
        md.push_str(&format!("## {}\n\n", section.title));
        for entry in &section.entries {
            md.push_str(&format!("### {}\n", entry.heading));
            if let Some(sub) = &entry.subheading {
                md.push_str(&format!("*{sub}*\n"));
            }
            for line in &entry.body {
                md.push_str(&format!("- {line}\n"));
            }
            md.push('\n');
        }
    }
    md
}
