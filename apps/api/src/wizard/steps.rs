//! Step registry: canonical step order, the active subset for a classifier, and the
//! single branching rule that decides which step follows a submission.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Step identifiers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Personal,
    Education,
    Internships,
    Experience,
    Projects,
    Skills,
    Certifications,
    Languages,
    Achievements,
    Preview,
    Feedback,
}

/// The fixed wizard order.
pub const CANONICAL_ORDER: [StepId; 11] = [
    StepId::Personal,
    StepId::Education,
    StepId::Internships,
    StepId::Experience,
    StepId::Projects,
    StepId::Skills,
    StepId::Certifications,
    StepId::Languages,
    StepId::Achievements,
    StepId::Preview,
    StepId::Feedback,
];

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Personal => "personal",
            StepId::Education => "education",
            StepId::Internships => "internships",
            StepId::Experience => "experience",
            StepId::Projects => "projects",
            StepId::Skills => "skills",
            StepId::Certifications => "certifications",
            StepId::Languages => "languages",
            StepId::Achievements => "achievements",
            StepId::Preview => "preview",
            StepId::Feedback => "feedback",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StepId::Personal => "Contact Details",
            StepId::Education => "Education",
            StepId::Internships => "Internships",
            StepId::Experience => "Work Experience",
            StepId::Projects => "Projects",
            StepId::Skills => "Skills & Interests",
            StepId::Certifications => "Certifications",
            StepId::Languages => "Languages",
            StepId::Achievements => "Achievements",
            StepId::Preview => "Preview",
            StepId::Feedback => "Feedback",
        }
    }

    pub fn parse(s: &str) -> Option<StepId> {
        CANONICAL_ORDER.iter().copied().find(|step| step.as_str() == s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub id: StepId,
    pub display_name: String,
}

impl From<StepId> for StepDescriptor {
    fn from(id: StepId) -> Self {
        StepDescriptor {
            id,
            display_name: id.display_name().to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classifier
// ────────────────────────────────────────────────────────────────────────────

/// The user-category string (`student-ug`, `fresher-pg`, `experienced-ug`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier(Option<String>);

impl Classifier {
    pub fn new(raw: Option<&str>) -> Self {
        Classifier(
            raw.map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Students and freshers skip the work-experience step (prefix match).
    pub fn is_early_career(&self) -> bool {
        self.0
            .as_deref()
            .map(|s| s.starts_with("student") || s.starts_with("fresher"))
            .unwrap_or(false)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry functions
// ────────────────────────────────────────────────────────────────────────────

/// Active steps for `classifier`, in canonical order. Total: unknown or absent
/// classifiers get the full list.
pub fn derive_active_steps(classifier: &Classifier) -> Vec<StepDescriptor> {
    CANONICAL_ORDER
        .iter()
        .copied()
        .filter(|step| !(classifier.is_early_career() && *step == StepId::Experience))
        .map(StepDescriptor::from)
        .collect()
}

/// Step that follows `current` once it is submitted. `None` means the wizard is finished.
///
/// Fixed branches: internships → projects (early career) or experience; experience →
/// projects; preview → feedback; feedback is terminal. Everything else is the next
/// canonical step present in `active`, found by scanning rather than by offset.
pub fn next_step(current: StepId, classifier: &Classifier, active: &[StepDescriptor]) -> Option<StepId> {
    match current {
        StepId::Internships if classifier.is_early_career() => return Some(StepId::Projects),
        StepId::Internships => return Some(StepId::Experience),
        StepId::Experience => return Some(StepId::Projects),
        StepId::Preview => return Some(StepId::Feedback),
        StepId::Feedback => return None,
        _ => {}
    }

    let position = active.iter().position(|s| s.id == current)?;
    active.get(position + 1).map(|s| s.id)
}

/// Index of `step` within `active`, if it is active.
pub fn index_of(step: StepId, active: &[StepDescriptor]) -> Option<usize> {
    active.iter().position(|s| s.id == step)
}
