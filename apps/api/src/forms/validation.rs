use serde::{Deserialize, Serialize};

/// One missing or malformed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGap {
    /// Dotted field path, e.g. `education[3].course_name`.
    pub field: String,
    pub reason: String,
}

/// Outcome of validating a section form. A form only submits when `passed` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub missing: Vec<FieldGap>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        ValidationReport {
            passed: true,
            missing: Vec::new(),
        }
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.passed = false;
        self.missing.push(FieldGap {
            field: field.into(),
            reason: reason.into(),
        });
    }

    /// Records a gap when `value` is blank.
    pub fn require(&mut self, field: impl Into<String>, value: &str) {
        if is_blank(value) {
            let field = field.into();
            let reason = format!("{} is required", label_of(&field));
            self.push(field, reason);
        }
    }

    /// One-line summary for error messages and logs.
    pub fn summary(&self) -> String {
        self.missing
            .iter()
            .map(|gap| gap.reason.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `education[2].end_year` → `end year`
fn label_of(field: &str) -> String {
    field
        .rsplit('.')
        .next()
        .unwrap_or(field)
        .replace('_', " ")
}

/// Field path for an entry inside a list section.
pub fn entry_field(section: &str, index: usize, field: &str) -> String {
    format!("{section}[{index}].{field}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_passes() {
        let report = ValidationReport::new();
        assert!(report.passed);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_require_blank_value_fails() {
        let mut report = ValidationReport::new();
        report.require("personal.full_name", "   ");
        report.require("personal.phone", "+91 98450 12345");
        assert!(!report.passed);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].field, "personal.full_name");
        assert_eq!(report.missing[0].reason, "full name is required");
    }

    #[test]
    fn test_summary_joins_reasons() {
        let mut report = ValidationReport::new();
        report.push("a", "first");
        report.push("b", "second");
        assert_eq!(report.summary(), "first; second");
    }

    #[test]
    fn test_entry_field_path() {
        assert_eq!(
            entry_field("education", 3, "course_name"),
            "education[3].course_name"
        );
    }
}
