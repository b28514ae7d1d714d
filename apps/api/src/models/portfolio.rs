use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Entry identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Stable identifier of a list entry. Assigned at creation, never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub const SECONDARY: &'static str = "secondary";
    pub const HIGHER_SECONDARY: &'static str = "higher_secondary";
    pub const UNDERGRADUATE: &'static str = "undergraduate";

    pub fn generate() -> Self {
        EntryId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the three education rows that exist before any user edit.
    pub fn is_seeded_education(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::SECONDARY | Self::HIGHER_SECONDARY | Self::UNDERGRADUATE
        )
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section slices
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Secondary,
    HigherSecondary,
    Undergraduate,
    Postgraduate,
}

impl EducationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::Secondary => "Secondary (Class X)",
            EducationLevel::HigherSecondary => "Higher Secondary (Class XII)",
            EducationLevel::Undergraduate => "Undergraduate",
            EducationLevel::Postgraduate => "Postgraduate",
        }
    }

    /// "major" only applies to higher-secondary.
    pub fn has_major(&self) -> bool {
        matches!(self, EducationLevel::HigherSecondary)
    }

    /// "course name" and "backlogs" only apply to degree programmes.
    pub fn has_course(&self) -> bool {
        matches!(
            self,
            EducationLevel::Undergraduate | EducationLevel::Postgraduate
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: EntryId,
    pub level: EducationLevel,
    #[serde(default)]
    pub institution: String,
    /// Examination board (school levels) or university (degree levels).
    #[serde(default)]
    pub board_or_university: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlogs: Option<u32>,
    /// Percentage or CGPA as entered.
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub start_year: String,
    #[serde(default)]
    pub end_year: String,
}

impl EducationEntry {
    pub fn blank(id: EntryId, level: EducationLevel) -> Self {
        EducationEntry {
            id,
            level,
            institution: String::new(),
            board_or_university: String::new(),
            major: None,
            course_name: None,
            backlogs: None,
            score: String::new(),
            start_year: String::new(),
            end_year: String::new(),
        }
    }

    /// The three fixed rows every education list starts with.
    pub fn seeded() -> Vec<EducationEntry> {
        vec![
            EducationEntry::blank(EntryId::from(EntryId::SECONDARY), EducationLevel::Secondary),
            EducationEntry::blank(
                EntryId::from(EntryId::HIGHER_SECONDARY),
                EducationLevel::HigherSecondary,
            ),
            EducationEntry::blank(
                EntryId::from(EntryId::UNDERGRADUATE),
                EducationLevel::Undergraduate,
            ),
        ]
    }

    /// Clears fields that do not apply to this entry's level.
    pub fn normalize(&mut self) {
        if !self.level.has_major() {
            self.major = None;
        }
        if !self.level.has_course() {
            self.course_name = None;
            self.backlogs = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternshipEntry {
    pub id: EntryId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: EntryId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub currently_working: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: EntryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub interests: Vec<String>,
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub credential_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub id: EntryId,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub proficiency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementEntry {
    pub id: EntryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate record
// ────────────────────────────────────────────────────────────────────────────

/// The in-progress portfolio draft, persisted under `portfolio_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateRecord {
    pub personal: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub internships: Vec<InternshipEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub certifications: Vec<CertificationEntry>,
    pub languages: Vec<LanguageEntry>,
    pub achievements: Vec<AchievementEntry>,
}

impl Default for AggregateRecord {
    /// Empty personal object, empty lists, and the three seeded education rows.
    fn default() -> Self {
        AggregateRecord {
            personal: PersonalInfo::default(),
            education: EducationEntry::seeded(),
            internships: Vec::new(),
            experience: Vec::new(),
            projects: Vec::new(),
            skills: Skills::default(),
            certifications: Vec::new(),
            languages: Vec::new(),
            achievements: Vec::new(),
        }
    }
}

impl AggregateRecord {
    /// Name used for the export file and the preview title.
    pub fn display_name(&self) -> &str {
        let name = self.personal.full_name.trim();
        if name.is_empty() {
            "Portfolio"
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_has_three_seeded_education_rows() {
        let record = AggregateRecord::default();
        let ids: Vec<&str> = record.education.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["secondary", "higher_secondary", "undergraduate"]);
        assert!(record.education.iter().all(|e| e.institution.is_empty()));
        assert!(record.internships.is_empty());
        assert!(record.experience.is_empty());
        assert!(record.projects.is_empty());
        assert!(record.certifications.is_empty());
        assert!(record.languages.is_empty());
        assert!(record.achievements.is_empty());
        assert_eq!(record.personal, PersonalInfo::default());
    }

    #[test]
    fn test_generated_ids_are_distinct_and_not_seeded() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        assert!(!a.is_seeded_education());
        assert!(EntryId::from("higher_secondary").is_seeded_education());
    }

    #[test]
    fn test_normalize_clears_level_conditional_fields() {
        let mut entry = EducationEntry::blank(EntryId::from("secondary"), EducationLevel::Secondary);
        entry.major = Some("PCM".to_string());
        entry.course_name = Some("B.Tech".to_string());
        entry.backlogs = Some(1);
        entry.normalize();
        assert!(entry.major.is_none());
        assert!(entry.course_name.is_none());
        assert!(entry.backlogs.is_none());

        let mut entry = EducationEntry::blank(EntryId::generate(), EducationLevel::Postgraduate);
        entry.major = Some("PCM".to_string());
        entry.course_name = Some("M.Tech".to_string());
        entry.normalize();
        assert!(entry.major.is_none());
        assert_eq!(entry.course_name.as_deref(), Some("M.Tech"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let record: AggregateRecord =
            serde_json::from_str(r#"{"personal":{"full_name":"Ravi Kumar"}}"#).unwrap();
        assert_eq!(record.personal.full_name, "Ravi Kumar");
        assert_eq!(record.education.len(), 3);
        assert_eq!(record.display_name(), "Ravi Kumar");
    }

    #[test]
    fn test_display_name_falls_back() {
        assert_eq!(AggregateRecord::default().display_name(), "Portfolio");
    }
}
