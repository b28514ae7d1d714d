//! Section forms, one per wizard step. Each form owns its slice's fields, validates
//! required fields, and on submit yields a typed `SectionData` for the controller.

pub mod entries;
pub mod validation;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::feedback::FeedbackDraft;
use crate::models::portfolio::{
    AchievementEntry, AggregateRecord, CertificationEntry, EducationEntry, ExperienceEntry,
    InternshipEntry, LanguageEntry, PersonalInfo, ProjectEntry, Skills,
};
use crate::wizard::steps::StepId;

pub use entries::{EntryListForm, ListEntry};
pub use validation::ValidationReport;

use validation::is_blank;

// ────────────────────────────────────────────────────────────────────────────
// Section data: closed set of typed slice updaters
// ────────────────────────────────────────────────────────────────────────────

/// Submitted data for one step. JSON shape: `{ "step": "<id>", "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum SectionData {
    Personal(PersonalInfo),
    Education(Vec<EducationEntry>),
    Internships(Vec<InternshipEntry>),
    Experience(Vec<ExperienceEntry>),
    Projects(Vec<ProjectEntry>),
    Skills(Skills),
    Certifications(Vec<CertificationEntry>),
    Languages(Vec<LanguageEntry>),
    Achievements(Vec<AchievementEntry>),
    Preview,
    Feedback(FeedbackDraft),
}

impl SectionData {
    pub fn step(&self) -> StepId {
        match self {
            SectionData::Personal(_) => StepId::Personal,
            SectionData::Education(_) => StepId::Education,
            SectionData::Internships(_) => StepId::Internships,
            SectionData::Experience(_) => StepId::Experience,
            SectionData::Projects(_) => StepId::Projects,
            SectionData::Skills(_) => StepId::Skills,
            SectionData::Certifications(_) => StepId::Certifications,
            SectionData::Languages(_) => StepId::Languages,
            SectionData::Achievements(_) => StepId::Achievements,
            SectionData::Preview => StepId::Preview,
            SectionData::Feedback(_) => StepId::Feedback,
        }
    }

    /// Replaces the matching slice of `record`. Preview and feedback carry no slice.
    pub fn apply_to(self, record: &mut AggregateRecord) {
        match self {
            SectionData::Personal(personal) => record.personal = personal,
            SectionData::Education(entries) => record.education = entries,
            SectionData::Internships(entries) => record.internships = entries,
            SectionData::Experience(entries) => record.experience = entries,
            SectionData::Projects(entries) => record.projects = entries,
            SectionData::Skills(skills) => record.skills = skills,
            SectionData::Certifications(entries) => record.certifications = entries,
            SectionData::Languages(entries) => record.languages = entries,
            SectionData::Achievements(entries) => record.achievements = entries,
            SectionData::Preview | SectionData::Feedback(_) => {}
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form contract
// ────────────────────────────────────────────────────────────────────────────

pub trait SectionForm: Sized {
    fn step(&self) -> StepId;

    fn validate(&self) -> ValidationReport;

    fn into_section(self) -> SectionData;

    /// Gated by `validate`; a failing report never reaches the controller.
    fn submit(self) -> Result<SectionData, ValidationReport> {
        let report = self.validate();
        debug!(
            step = %self.step(),
            passed = report.passed,
            gaps = report.missing.len(),
            "Section form validated"
        );
        if report.passed {
            Ok(self.into_section())
        } else {
            Err(report)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalForm {
    pub info: PersonalInfo,
}

impl SectionForm for PersonalForm {
    fn step(&self) -> StepId {
        StepId::Personal
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require("personal.full_name", &self.info.full_name);
        report.require("personal.email", &self.info.email);
        report.require("personal.phone", &self.info.phone);
        if !is_blank(&self.info.email) && !self.info.email.contains('@') {
            report.push("personal.email", "email must contain '@'");
        }
        report
    }

    fn into_section(self) -> SectionData {
        let mut info = self.info;
        info.full_name = info.full_name.trim().to_string();
        info.email = info.email.trim().to_string();
        SectionData::Personal(info)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillsForm {
    pub skills: Skills,
}

impl SectionForm for SkillsForm {
    fn step(&self) -> StepId {
        StepId::Skills
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.skills.technical.iter().all(|s| is_blank(s)) {
            report.push("skills.technical", "at least one technical skill is required");
        }
        report
    }

    /// Drops blank items from every list.
    fn into_section(self) -> SectionData {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        let Skills {
            technical,
            soft,
            interests,
            hobbies,
        } = self.skills;
        SectionData::Skills(Skills {
            technical: clean(technical),
            soft: clean(soft),
            interests: clean(interests),
            hobbies: clean(hobbies),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackForm {
    pub draft: FeedbackDraft,
}

impl SectionForm for FeedbackForm {
    fn step(&self) -> StepId {
        StepId::Feedback
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if !(1..=5).contains(&self.draft.rating) {
            report.push("feedback.rating", "rating must be between 1 and 5");
        }
        report
    }

    fn into_section(self) -> SectionData {
        SectionData::Feedback(self.draft)
    }
}

/// Routes submitted data through the form for its step. The preview step has no fields.
pub fn submit_section(data: SectionData) -> Result<SectionData, ValidationReport> {
    match data {
        SectionData::Personal(info) => PersonalForm { info }.submit(),
        SectionData::Education(entries) => EntryListForm::new(entries).submit(),
        SectionData::Internships(entries) => EntryListForm::new(entries).submit(),
        SectionData::Experience(entries) => EntryListForm::new(entries).submit(),
        SectionData::Projects(entries) => EntryListForm::new(entries).submit(),
        SectionData::Skills(skills) => SkillsForm { skills }.submit(),
        SectionData::Certifications(entries) => EntryListForm::new(entries).submit(),
        SectionData::Languages(entries) => EntryListForm::new(entries).submit(),
        SectionData::Achievements(entries) => EntryListForm::new(entries).submit(),
        SectionData::Preview => Ok(SectionData::Preview),
        SectionData::Feedback(draft) => FeedbackForm { draft }.submit(),
    }
}
