//! List-type section forms: add/remove entries with stable ids, minimum one entry,
//! and non-removable seeded education rows.

use std::collections::HashSet;

use crate::forms::validation::{entry_field, is_blank, ValidationReport};
use crate::forms::{SectionData, SectionForm};
use crate::models::portfolio::{
    AchievementEntry, AggregateRecord, CertificationEntry, EducationEntry, EducationLevel, EntryId,
    ExperienceEntry, InternshipEntry, LanguageEntry, ProjectEntry,
};
use crate::wizard::steps::StepId;

/// One row of a list-type section.
pub trait ListEntry: Clone {
    const STEP: StepId;
    /// Optional sections accept an entirely blank entry.
    const OPTIONAL: bool = false;

    fn id(&self) -> &EntryId;

    /// A fresh entry with a newly generated id and blank fields.
    fn blank() -> Self;

    fn is_blank(&self) -> bool;

    fn is_removable(&self) -> bool {
        true
    }

    /// Records required-field gaps for the entry at `index`.
    fn validate(&self, index: usize, report: &mut ValidationReport);

    /// Restores list invariants on a list handed in from outside (min one entry).
    fn ensure_invariants(entries: &mut Vec<Self>) {
        if entries.is_empty() {
            entries.push(Self::blank());
        }
    }

    /// Last-moment cleanup before the list leaves the form.
    fn prepare(&mut self) {}

    fn into_section(entries: Vec<Self>) -> SectionData;
}

/// Editable list of entries for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryListForm<E> {
    entries: Vec<E>,
}

impl<E: ListEntry> EntryListForm<E> {
    /// Builds the form from stored data; an empty list gets its default entry (or rows).
    pub fn new(initial: Vec<E>) -> Self {
        let mut entries = initial;
        E::ensure_invariants(&mut entries);
        EntryListForm { entries }
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Appends a blank entry and returns its id.
    pub fn add_entry(&mut self) -> EntryId {
        let entry = E::blank();
        let id = entry.id().clone();
        self.entries.push(entry);
        id
    }

    /// Removes the entry with `id`. No-op (returns false) when it is the last entry,
    /// when it is not removable, or when no such entry exists.
    pub fn remove_entry(&mut self, id: &EntryId) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let Some(position) = self.entries.iter().position(|e| e.id() == id) else {
            return false;
        };
        if !self.entries[position].is_removable() {
            return false;
        }
        self.entries.remove(position);
        true
    }

    /// Applies one structural edit and hands back the resulting list as section data.
    pub fn edit(mut self, edit: &EntryEdit) -> EditedList {
        let (changed, entry_id) = match edit {
            EntryEdit::Add => (true, Some(self.add_entry())),
            EntryEdit::Remove(id) => {
                let removed = self.remove_entry(id);
                (removed, removed.then(|| id.clone()))
            }
        };
        EditedList {
            section: E::into_section(self.entries().to_vec()),
            changed,
            entry_id,
        }
    }
}

/// Add or remove one row of a list section.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryEdit {
    Add,
    Remove(EntryId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditedList {
    pub section: SectionData,
    /// False when a removal was refused or matched nothing.
    pub changed: bool,
    /// The added or removed entry.
    pub entry_id: Option<EntryId>,
}

/// Runs `edit` on the list slice of `record` for `step`. `None` when the step has no list.
pub fn edit_list_section(
    record: &AggregateRecord,
    step: StepId,
    edit: &EntryEdit,
) -> Option<EditedList> {
    let edited = match step {
        StepId::Education => EntryListForm::new(record.education.clone()).edit(edit),
        StepId::Internships => EntryListForm::new(record.internships.clone()).edit(edit),
        StepId::Experience => EntryListForm::new(record.experience.clone()).edit(edit),
        StepId::Projects => EntryListForm::new(record.projects.clone()).edit(edit),
        StepId::Certifications => EntryListForm::new(record.certifications.clone()).edit(edit),
        StepId::Languages => EntryListForm::new(record.languages.clone()).edit(edit),
        StepId::Achievements => EntryListForm::new(record.achievements.clone()).edit(edit),
        StepId::Personal | StepId::Skills | StepId::Preview | StepId::Feedback => return None,
    };
    Some(edited)
}

impl<E: ListEntry> SectionForm for EntryListForm<E> {
    fn step(&self) -> StepId {
        E::STEP
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut seen = HashSet::new();

        for (index, entry) in self.entries.iter().enumerate() {
            if !seen.insert(entry.id().clone()) {
                report.push(
                    entry_field(E::STEP.as_str(), index, "id"),
                    format!("duplicate entry id '{}'", entry.id()),
                );
            }
            if E::OPTIONAL && entry.is_blank() {
                continue;
            }
            entry.validate(index, &mut report);
        }

        report
    }

    fn into_section(self) -> SectionData {
        let mut entries = self.entries;
        entries.iter_mut().for_each(ListEntry::prepare);
        E::into_section(entries)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-section entry rules
// ────────────────────────────────────────────────────────────────────────────

impl ListEntry for EducationEntry {
    const STEP: StepId = StepId::Education;

    fn id(&self) -> &EntryId {
        &self.id
    }

    /// Added education rows are always postgraduate.
    fn blank() -> Self {
        EducationEntry::blank(EntryId::generate(), EducationLevel::Postgraduate)
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.institution)
            && is_blank(&self.board_or_university)
            && is_blank(&self.score)
            && is_blank(&self.start_year)
            && is_blank(&self.end_year)
    }

    fn is_removable(&self) -> bool {
        !self.id.is_seeded_education()
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("education", index, "institution"), &self.institution);
        report.require(entry_field("education", index, "end_year"), &self.end_year);
        if self.level == EducationLevel::Postgraduate {
            report.require(
                entry_field("education", index, "course_name"),
                self.course_name.as_deref().unwrap_or(""),
            );
        }
    }

    /// Any seeded row missing from the list is restored in its fixed position.
    fn ensure_invariants(entries: &mut Vec<Self>) {
        for (position, seeded) in EducationEntry::seeded().into_iter().enumerate() {
            if !entries.iter().any(|e| e.id == seeded.id) {
                let at = position.min(entries.len());
                entries.insert(at, seeded);
            }
        }
    }

    fn prepare(&mut self) {
        self.normalize();
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Education(entries)
    }
}

impl ListEntry for InternshipEntry {
    const STEP: StepId = StepId::Internships;
    const OPTIONAL: bool = true;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        InternshipEntry {
            id: EntryId::generate(),
            company: String::new(),
            role: String::new(),
            duration: String::new(),
            description: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.company)
            && is_blank(&self.role)
            && is_blank(&self.duration)
            && is_blank(&self.description)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("internships", index, "company"), &self.company);
        report.require(entry_field("internships", index, "role"), &self.role);
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Internships(entries)
    }
}

impl ListEntry for ExperienceEntry {
    const STEP: StepId = StepId::Experience;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        ExperienceEntry {
            id: EntryId::generate(),
            company: String::new(),
            designation: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            currently_working: false,
            description: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.company)
            && is_blank(&self.designation)
            && is_blank(&self.start_date)
            && is_blank(&self.end_date)
            && is_blank(&self.description)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("experience", index, "company"), &self.company);
        report.require(
            entry_field("experience", index, "designation"),
            &self.designation,
        );
        report.require(
            entry_field("experience", index, "start_date"),
            &self.start_date,
        );
        if !self.currently_working {
            report.require(entry_field("experience", index, "end_date"), &self.end_date);
        }
    }

    fn prepare(&mut self) {
        if self.currently_working {
            self.end_date.clear();
        }
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Experience(entries)
    }
}

impl ListEntry for ProjectEntry {
    const STEP: StepId = StepId::Projects;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        ProjectEntry {
            id: EntryId::generate(),
            title: String::new(),
            tech_stack: String::new(),
            link: String::new(),
            description: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.title)
            && is_blank(&self.tech_stack)
            && is_blank(&self.link)
            && is_blank(&self.description)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("projects", index, "title"), &self.title);
        report.require(
            entry_field("projects", index, "description"),
            &self.description,
        );
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Projects(entries)
    }
}

impl ListEntry for CertificationEntry {
    const STEP: StepId = StepId::Certifications;
    const OPTIONAL: bool = true;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        CertificationEntry {
            id: EntryId::generate(),
            name: String::new(),
            issuer: String::new(),
            issue_date: String::new(),
            credential_url: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.name)
            && is_blank(&self.issuer)
            && is_blank(&self.issue_date)
            && is_blank(&self.credential_url)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("certifications", index, "name"), &self.name);
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Certifications(entries)
    }
}

impl ListEntry for LanguageEntry {
    const STEP: StepId = StepId::Languages;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        LanguageEntry {
            id: EntryId::generate(),
            language: String::new(),
            proficiency: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.language) && is_blank(&self.proficiency)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("languages", index, "language"), &self.language);
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Languages(entries)
    }
}

impl ListEntry for AchievementEntry {
    const STEP: StepId = StepId::Achievements;
    const OPTIONAL: bool = true;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn blank() -> Self {
        AchievementEntry {
            id: EntryId::generate(),
            title: String::new(),
            description: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        is_blank(&self.title) && is_blank(&self.description)
    }

    fn validate(&self, index: usize, report: &mut ValidationReport) {
        report.require(entry_field("achievements", index, "title"), &self.title);
    }

    fn into_section(entries: Vec<Self>) -> SectionData {
        SectionData::Achievements(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<E: ListEntry>(form: &EntryListForm<E>) -> Vec<EntryId> {
        form.entries().iter().map(|e| e.id().clone()).collect()
    }

    #[test]
    fn test_add_then_remove_postgraduate_restores_seeded_list() {
        let mut form = EntryListForm::new(EducationEntry::seeded());
        let original = ids(&form);

        let new_id = form.add_entry();
        assert_eq!(form.entries().len(), 4);
        assert!(!original.contains(&new_id));
        assert_eq!(form.entries()[3].level, EducationLevel::Postgraduate);

        assert!(form.remove_entry(&new_id));
        assert_eq!(ids(&form), original);
    }

    #[test]
    fn test_seeded_education_rows_are_never_removable() {
        let mut form = EntryListForm::new(EducationEntry::seeded());
        form.add_entry();
        form.add_entry();
        for seeded in [
            EntryId::SECONDARY,
            EntryId::HIGHER_SECONDARY,
            EntryId::UNDERGRADUATE,
        ] {
            assert!(!form.remove_entry(&EntryId::from(seeded)));
        }
        assert_eq!(form.entries().len(), 5);
    }

    #[test]
    fn test_remove_last_entry_is_noop() {
        let mut form: EntryListForm<ProjectEntry> = EntryListForm::new(vec![]);
        assert_eq!(form.entries().len(), 1);
        let only = form.entries()[0].id().clone();

        assert!(!form.remove_entry(&only));
        assert!(!form.remove_entry(&only));
        assert_eq!(ids(&form), vec![only]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut form: EntryListForm<LanguageEntry> = EntryListForm::new(vec![]);
        form.add_entry();
        assert!(!form.remove_entry(&EntryId::from("nope")));
        assert_eq!(form.entries().len(), 2);
    }

    #[test]
    fn test_missing_seeded_rows_are_restored() {
        let mut pg = <EducationEntry as ListEntry>::blank();
        pg.institution = "IISc".to_string();
        let form = EntryListForm::new(vec![pg.clone()]);
        let levels: Vec<EducationLevel> = form.entries().iter().map(|e| e.level).collect();
        assert_eq!(
            levels,
            vec![
                EducationLevel::Secondary,
                EducationLevel::HigherSecondary,
                EducationLevel::Undergraduate,
                EducationLevel::Postgraduate,
            ]
        );
        assert_eq!(form.entries()[3].id, pg.id);
    }

    #[test]
    fn test_postgraduate_requires_course_name() {
        let mut seeded = EducationEntry::seeded();
        for entry in &mut seeded {
            entry.institution = "Some School".to_string();
            entry.end_year = "2020".to_string();
        }
        assert!(EntryListForm::new(seeded.clone()).validate().passed);

        let mut pg = <EducationEntry as ListEntry>::blank();
        pg.institution = "IIT Madras".to_string();
        pg.end_year = "2024".to_string();
        seeded.push(pg);
        let report = EntryListForm::new(seeded).validate();
        assert!(!report.passed);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].field, "education[3].course_name");
    }

    #[test]
    fn test_optional_section_accepts_blank_entry() {
        let form: EntryListForm<InternshipEntry> = EntryListForm::new(vec![]);
        assert!(form.validate().passed);
    }

    #[test]
    fn test_optional_section_rejects_partial_entry() {
        let mut entry = <InternshipEntry as ListEntry>::blank();
        entry.company = "Infosys".to_string();
        let report = EntryListForm::new(vec![entry]).validate();
        assert!(!report.passed);
        assert_eq!(report.missing[0].field, "internships[0].role");
    }

    #[test]
    fn test_required_section_rejects_blank_entry() {
        let form: EntryListForm<ExperienceEntry> = EntryListForm::new(vec![]);
        let report = form.validate();
        assert!(!report.passed);
        assert_eq!(report.missing.len(), 4);
    }

    #[test]
    fn test_currently_working_skips_end_date_and_clears_it() {
        let mut entry = <ExperienceEntry as ListEntry>::blank();
        entry.company = "Zoho".to_string();
        entry.designation = "Engineer".to_string();
        entry.start_date = "2022-07".to_string();
        entry.end_date = "stale".to_string();
        entry.currently_working = true;

        let form = EntryListForm::new(vec![entry]);
        assert!(form.validate().passed);
        match form.submit() {
            Ok(SectionData::Experience(entries)) => assert!(entries[0].end_date.is_empty()),
            other => panic!("expected experience section, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_list_section_adds_and_refuses_seeded_removal() {
        let record = AggregateRecord::default();
        let added = edit_list_section(&record, StepId::Education, &EntryEdit::Add).unwrap();
        assert!(added.changed);
        match &added.section {
            SectionData::Education(entries) => {
                assert_eq!(entries.len(), 4);
                assert_eq!(Some(&entries[3].id), added.entry_id.as_ref());
            }
            other => panic!("expected education section, got {other:?}"),
        }

        let refused = edit_list_section(
            &record,
            StepId::Education,
            &EntryEdit::Remove(EntryId::from(EntryId::UNDERGRADUATE)),
        )
        .unwrap();
        assert!(!refused.changed);
        assert_eq!(refused.entry_id, None);
    }

    #[test]
    fn test_edit_list_section_ignores_steps_without_lists() {
        let record = AggregateRecord::default();
        assert!(edit_list_section(&record, StepId::Skills, &EntryEdit::Add).is_none());
        assert!(edit_list_section(&record, StepId::Personal, &EntryEdit::Add).is_none());
    }

    #[test]
    fn test_duplicate_ids_fail_validation() {
        let mut a = <LanguageEntry as ListEntry>::blank();
        a.language = "Hindi".to_string();
        let mut b = a.clone();
        b.language = "Tamil".to_string();
        let report = EntryListForm::new(vec![a, b]).validate();
        assert!(!report.passed);
        assert!(report.missing[0].reason.contains("duplicate"));
    }
}
