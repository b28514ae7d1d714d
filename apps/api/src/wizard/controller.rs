//! Wizard controller: owns the aggregate record and the step pointer for one session,
//! and mirrors both to the session's storage after every change.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::forms::entries::{edit_list_section, EntryEdit};
use crate::forms::SectionData;
use crate::models::portfolio::{AggregateRecord, EntryId};
use crate::storage::{
    Persistence, KEY_CLASSIFIER, KEY_CURRENT_STEP, KEY_FURTHEST_STEP, KEY_PORTFOLIO_DATA,
};
use crate::wizard::steps::{
    derive_active_steps, index_of, next_step, Classifier, StepDescriptor, StepId,
};

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("Step '{0}' is not part of this wizard")]
    InactiveStep(StepId),

    #[error("Submitted data belongs to step '{submitted}', not '{expected}'")]
    StepMismatch { expected: StepId, submitted: StepId },

    #[error("Step '{0}' has not been reached yet")]
    NotYetReached(StepId),

    #[error("Step '{0}' has no entry list")]
    NoEntryList(StepId),
}

/// Outcome of adding or removing a list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryChange {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,
}

/// Where the wizard went after a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Transition {
    Moved { to: StepId },
    /// Feedback was submitted; the session leaves the wizard.
    Completed,
}

/// Data for the progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub current_index: usize,
    pub furthest_index: usize,
    pub total: usize,
    pub percent: u8,
}

/// Full wizard state as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub current_step: StepId,
    pub active_steps: Vec<StepDescriptor>,
    pub progress: Progress,
    pub record: AggregateRecord,
}

pub struct WizardController {
    persistence: Persistence,
    classifier: Classifier,
    active_steps: Vec<StepDescriptor>,
    current: StepId,
    /// Highest index in `active_steps` the session has reached.
    furthest: usize,
    record: AggregateRecord,
}

impl WizardController {
    /// Derives the active steps and restores pointer + record from storage,
    /// defaulting to the first step and an empty record.
    ///
    /// The first non-empty classifier a session starts with is stored and wins over
    /// `requested` on every later load, until `reset`.
    pub async fn initialize(persistence: Persistence, requested: Classifier) -> Self {
        let classifier = fixed_classifier(&persistence, requested).await;
        let active_steps = derive_active_steps(&classifier);
        let first = active_steps
            .first()
            .map(|s| s.id)
            .unwrap_or(StepId::Personal);

        let stored: StepId = persistence.read(KEY_CURRENT_STEP, first).await;
        let current = if index_of(stored, &active_steps).is_some() {
            stored
        } else {
            warn!(
                step = %stored,
                classifier = ?classifier.as_deref(),
                "Stored step is not active for this classifier, restarting at first step"
            );
            first
        };
        let current_index = index_of(current, &active_steps).unwrap_or(0);

        let furthest_step: Option<StepId> = persistence.read(KEY_FURTHEST_STEP, None).await;
        let furthest = furthest_step
            .and_then(|s| index_of(s, &active_steps))
            .unwrap_or(0)
            .max(current_index);

        let record = persistence
            .read_or_else(KEY_PORTFOLIO_DATA, AggregateRecord::default)
            .await;

        WizardController {
            persistence,
            classifier,
            active_steps,
            current,
            furthest,
            record,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn active_steps(&self) -> &[StepDescriptor] {
        &self.active_steps
    }

    pub fn record(&self) -> &AggregateRecord {
        &self.record
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Merges `data` into the record slice for `step`, moves to the next step by the
    /// branching rule, and persists record + pointer together.
    pub async fn advance(
        &mut self,
        step: StepId,
        data: SectionData,
    ) -> Result<Transition, WizardError> {
        if data.step() != step {
            return Err(WizardError::StepMismatch {
                expected: step,
                submitted: data.step(),
            });
        }
        if index_of(step, &self.active_steps).is_none() {
            return Err(WizardError::InactiveStep(step));
        }

        data.apply_to(&mut self.record);

        let transition = match next_step(step, &self.classifier, &self.active_steps) {
            Some(next) => {
                self.current = next;
                if let Some(index) = index_of(next, &self.active_steps) {
                    self.furthest = self.furthest.max(index);
                }
                Transition::Moved { to: next }
            }
            None => Transition::Completed,
        };

        self.persist().await;
        info!(from = %step, transition = ?transition, "Wizard advanced");
        Ok(transition)
    }

    /// Moves the pointer to an already-reached step. Never touches the record.
    pub async fn jump_to(&mut self, step: StepId) -> Result<(), WizardError> {
        let index = index_of(step, &self.active_steps).ok_or(WizardError::InactiveStep(step))?;
        if index > self.furthest {
            return Err(WizardError::NotYetReached(step));
        }

        self.current = step;
        self.persistence.write(KEY_CURRENT_STEP, &self.current).await;
        info!(to = %step, "Wizard jumped");
        Ok(())
    }

    /// Adds or removes a row of a list section's draft without moving the pointer.
    /// A refused removal leaves record and storage untouched.
    pub async fn edit_entries(
        &mut self,
        step: StepId,
        edit: EntryEdit,
    ) -> Result<EntryChange, WizardError> {
        if index_of(step, &self.active_steps).is_none() {
            return Err(WizardError::InactiveStep(step));
        }
        let edited =
            edit_list_section(&self.record, step, &edit).ok_or(WizardError::NoEntryList(step))?;

        if edited.changed {
            edited.section.apply_to(&mut self.record);
            self.persistence
                .write(KEY_PORTFOLIO_DATA, &self.record)
                .await;
            info!(step = %step, edit = ?edit, "Entry list edited");
        } else {
            debug!(step = %step, edit = ?edit, "Entry edit refused");
        }

        Ok(EntryChange {
            changed: edited.changed,
            entry_id: edited.entry_id,
        })
    }

    /// Clears stored pointer, record, and classifier and returns to defaults.
    pub async fn reset(&mut self) {
        self.persistence.remove(KEY_CLASSIFIER).await;
        self.persistence.remove(KEY_CURRENT_STEP).await;
        self.persistence.remove(KEY_FURTHEST_STEP).await;
        self.persistence.remove(KEY_PORTFOLIO_DATA).await;

        self.current = self
            .active_steps
            .first()
            .map(|s| s.id)
            .unwrap_or(StepId::Personal);
        self.furthest = 0;
        self.record = AggregateRecord::default();
        info!("Wizard reset");
    }

    pub fn progress(&self) -> Progress {
        let total = self.active_steps.len();
        let current_index = index_of(self.current, &self.active_steps).unwrap_or(0);
        let percent = if total == 0 {
            0
        } else {
            ((current_index + 1) * 100 / total) as u8
        };
        Progress {
            current_index,
            furthest_index: self.furthest,
            total,
            percent,
        }
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            current_step: self.current,
            active_steps: self.active_steps.clone(),
            progress: self.progress(),
            record: self.record.clone(),
        }
    }

    /// Writes record, pointer, and furthest step. Failures are logged by `Persistence`
    /// and the in-memory state stays authoritative.
    async fn persist(&self) {
        let record_ok = self.persistence.write(KEY_PORTFOLIO_DATA, &self.record).await;
        let step_ok = self.persistence.write(KEY_CURRENT_STEP, &self.current).await;
        let furthest_step = self.active_steps.get(self.furthest).map(|s| s.id);
        let furthest_ok = self
            .persistence
            .write(KEY_FURTHEST_STEP, &furthest_step)
            .await;

        if !(record_ok && step_ok && furthest_ok) {
            warn!(
                record_ok,
                step_ok, furthest_ok, "Wizard state only partially persisted"
            );
        }
    }
}

async fn fixed_classifier(persistence: &Persistence, requested: Classifier) -> Classifier {
    let stored: Option<String> = persistence.read(KEY_CLASSIFIER, None).await;
    match stored {
        Some(raw) => {
            let stored = Classifier::new(Some(&raw));
            if requested.as_deref().is_some_and(|r| Some(r) != stored.as_deref()) {
                debug!(
                    stored = ?stored.as_deref(),
                    requested = ?requested.as_deref(),
                    "Ignoring classifier change for a running wizard"
                );
            }
            stored
        }
        None => {
            if let Some(raw) = requested.as_deref() {
                persistence.write(KEY_CLASSIFIER, raw).await;
            }
            requested
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::portfolio::{
        EntryId, InternshipEntry, PersonalInfo, ProjectEntry, Skills,
    };
    use crate::storage::memory::MemoryStore;
    use crate::storage::KvStore;

    fn personal() -> SectionData {
        SectionData::Personal(PersonalInfo {
            full_name: "Arjun Rao".to_string(),
            phone: "9876543210".to_string(),
            email: "arjun@example.com".to_string(),
            ..PersonalInfo::default()
        })
    }

    fn internships() -> SectionData {
        SectionData::Internships(vec![InternshipEntry {
            id: EntryId::generate(),
            company: "ISRO".to_string(),
            role: "Summer intern".to_string(),
            duration: "2 months".to_string(),
            description: String::new(),
        }])
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    async fn controller(store: &Arc<MemoryStore>, classifier: &str) -> WizardController {
        WizardController::initialize(
            Persistence::new(store.clone()),
            Classifier::new(Some(classifier)),
        )
        .await
    }

    #[tokio::test]
    async fn test_initialize_with_empty_storage() {
        let store = store();
        let wizard = controller(&store, "student-ug").await;
        assert_eq!(wizard.current_step(), StepId::Personal);
        assert_eq!(wizard.record(), &AggregateRecord::default());
        assert!(!wizard
            .active_steps()
            .iter()
            .any(|s| s.id == StepId::Experience));
    }

    #[tokio::test]
    async fn test_fresher_internships_advance_to_projects() {
        let store = store();
        let mut wizard = controller(&store, "fresher-ug").await;
        let transition = wizard
            .advance(StepId::Internships, internships())
            .await
            .unwrap();
        assert_eq!(transition, Transition::Moved { to: StepId::Projects });
        assert_eq!(wizard.current_step(), StepId::Projects);
    }

    #[tokio::test]
    async fn test_experienced_goes_through_experience() {
        let store = store();
        let mut wizard = controller(&store, "experienced-pg").await;
        wizard
            .advance(StepId::Internships, internships())
            .await
            .unwrap();
        assert_eq!(wizard.current_step(), StepId::Experience);
        wizard
            .advance(StepId::Experience, SectionData::Experience(vec![]))
            .await
            .unwrap();
        assert_eq!(wizard.current_step(), StepId::Projects);
    }

    #[tokio::test]
    async fn test_advance_only_touches_own_slice() {
        let store = store();
        let mut wizard = controller(&store, "experienced-ug").await;
        wizard.advance(StepId::Personal, personal()).await.unwrap();
        let before = wizard.record().clone();

        let skills = Skills {
            technical: vec!["Rust".to_string()],
            ..Skills::default()
        };
        wizard
            .advance(StepId::Skills, SectionData::Skills(skills.clone()))
            .await
            .unwrap();

        let after = wizard.record();
        assert_eq!(after.skills, skills);
        assert_eq!(after.personal, before.personal);
        assert_eq!(after.education, before.education);
        assert_eq!(after.projects, before.projects);
        assert_eq!(wizard.current_step(), StepId::Certifications);
    }

    #[tokio::test]
    async fn test_reload_resumes_at_same_step_with_answers() {
        let store = store();
        {
            let mut wizard = controller(&store, "student-pg").await;
            wizard.advance(StepId::Personal, personal()).await.unwrap();
        }
        let wizard = controller(&store, "student-pg").await;
        assert_eq!(wizard.current_step(), StepId::Education);
        assert_eq!(wizard.record().personal.full_name, "Arjun Rao");
        assert_eq!(wizard.progress().furthest_index, 1);
    }

    #[tokio::test]
    async fn test_advance_rejects_mismatched_data() {
        let store = store();
        let mut wizard = controller(&store, "student-ug").await;
        let err = wizard
            .advance(StepId::Education, personal())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::StepMismatch {
                expected: StepId::Education,
                submitted: StepId::Personal
            }
        );
    }

    #[tokio::test]
    async fn test_advance_rejects_inactive_step() {
        let store = store();
        let mut wizard = controller(&store, "student-ug").await;
        let err = wizard
            .advance(StepId::Experience, SectionData::Experience(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, WizardError::InactiveStep(StepId::Experience));
    }

    #[tokio::test]
    async fn test_preview_routes_to_feedback_and_feedback_completes() {
        let store = store();
        let mut wizard = controller(&store, "experienced-ug").await;
        assert_eq!(
            wizard
                .advance(StepId::Preview, SectionData::Preview)
                .await
                .unwrap(),
            Transition::Moved {
                to: StepId::Feedback
            }
        );
        let draft = crate::models::feedback::FeedbackDraft {
            rating: 4,
            suggestion: String::new(),
        };
        assert_eq!(
            wizard
                .advance(StepId::Feedback, SectionData::Feedback(draft))
                .await
                .unwrap(),
            Transition::Completed
        );
    }

    #[tokio::test]
    async fn test_jump_to_reached_step_only() {
        let store = store();
        let mut wizard = controller(&store, "experienced-ug").await;
        wizard.advance(StepId::Personal, personal()).await.unwrap();
        let record = wizard.record().clone();

        assert_eq!(
            wizard.jump_to(StepId::Projects).await.unwrap_err(),
            WizardError::NotYetReached(StepId::Projects)
        );
        wizard.jump_to(StepId::Personal).await.unwrap();
        assert_eq!(wizard.current_step(), StepId::Personal);
        assert_eq!(wizard.record(), &record);

        // Jumping back keeps the furthest reached step available.
        wizard.jump_to(StepId::Education).await.unwrap();
        assert_eq!(wizard.progress().furthest_index, 1);
    }

    #[tokio::test]
    async fn test_reset_clears_storage_and_state() {
        let store = store();
        let mut wizard = controller(&store, "student-ug").await;
        wizard.advance(StepId::Personal, personal()).await.unwrap();
        wizard.reset().await;

        assert_eq!(wizard.current_step(), StepId::Personal);
        assert_eq!(wizard.record(), &AggregateRecord::default());
        assert_eq!(store.get(KEY_CURRENT_STEP).await.unwrap(), None);
        assert_eq!(store.get(KEY_PORTFOLIO_DATA).await.unwrap(), None);

        let reloaded = controller(&store, "student-ug").await;
        assert_eq!(reloaded.current_step(), StepId::Personal);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_in_memory_state() {
        let store = Arc::new(MemoryStore::with_quota(16));
        let mut wizard = controller(&store, "student-ug").await;
        wizard.advance(StepId::Personal, personal()).await.unwrap();
        assert_eq!(wizard.current_step(), StepId::Education);
        assert_eq!(wizard.record().personal.full_name, "Arjun Rao");
    }

    #[tokio::test]
    async fn test_stale_experience_pointer_restarts_for_student() {
        let store = store();
        store
            .set(KEY_CURRENT_STEP, "\"experience\"".to_string())
            .await
            .unwrap();
        let wizard = controller(&store, "student-ug").await;
        assert_eq!(wizard.current_step(), StepId::Personal);
    }

    #[tokio::test]
    async fn test_classifier_is_fixed_until_reset() {
        let store = store();
        {
            let mut wizard = controller(&store, "fresher-ug").await;
            wizard.advance(StepId::Personal, personal()).await.unwrap();
        }
        assert_eq!(
            store.get(KEY_CLASSIFIER).await.unwrap().as_deref(),
            Some("\"fresher-ug\"")
        );

        // A later load with another classifier, or none, keeps the stored one.
        let mut wizard = controller(&store, "experienced-pg").await;
        assert_eq!(wizard.classifier().as_deref(), Some("fresher-ug"));
        let anonymous =
            WizardController::initialize(Persistence::new(store.clone()), Classifier::default())
                .await;
        assert!(anonymous.classifier().is_early_career());
        assert_eq!(anonymous.current_step(), StepId::Education);

        wizard.reset().await;
        assert_eq!(store.get(KEY_CLASSIFIER).await.unwrap(), None);
        let restarted = controller(&store, "experienced-pg").await;
        assert!(restarted
            .active_steps()
            .iter()
            .any(|s| s.id == StepId::Experience));
    }

    #[tokio::test]
    async fn test_missing_classifier_is_not_stored() {
        let store = store();
        let wizard =
            WizardController::initialize(Persistence::new(store.clone()), Classifier::default())
                .await;
        assert_eq!(wizard.classifier().as_deref(), None);
        assert_eq!(store.get(KEY_CLASSIFIER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_edit_entries_persists_record_only() {
        let store = store();
        let mut wizard = controller(&store, "experienced-ug").await;
        let change = wizard
            .edit_entries(StepId::Projects, EntryEdit::Add)
            .await
            .unwrap();
        assert!(change.changed);
        assert_eq!(wizard.record().projects.len(), 2);
        assert_eq!(wizard.current_step(), StepId::Personal);

        let reloaded = controller(&store, "experienced-ug").await;
        assert_eq!(reloaded.record().projects.len(), 2);
        assert_eq!(
            reloaded.record().projects[1].id,
            change.entry_id.unwrap()
        );
    }

    #[tokio::test]
    async fn test_edit_entries_rejects_inactive_and_non_list_steps() {
        let store = store();
        let mut wizard = controller(&store, "student-ug").await;
        assert_eq!(
            wizard
                .edit_entries(StepId::Experience, EntryEdit::Add)
                .await
                .unwrap_err(),
            WizardError::InactiveStep(StepId::Experience)
        );
        assert_eq!(
            wizard
                .edit_entries(StepId::Skills, EntryEdit::Add)
                .await
                .unwrap_err(),
            WizardError::NoEntryList(StepId::Skills)
        );
    }

    #[tokio::test]
    async fn test_progress_percent() {
        let store = store();
        let mut wizard = controller(&store, "experienced-ug").await;
        assert_eq!(wizard.progress().percent, 9); // 1 of 11
        wizard
            .advance(
                StepId::Projects,
                SectionData::Projects(vec![ProjectEntry {
                    id: EntryId::generate(),
                    title: "Chess engine".to_string(),
                    tech_stack: "C++".to_string(),
                    link: String::new(),
                    description: "Alpha-beta search".to_string(),
                }]),
            )
            .await
            .unwrap();
        let progress = wizard.progress();
        assert_eq!(progress.current_index, 5);
        assert_eq!(progress.total, 11);
        assert_eq!(progress.percent, 54);
    }
}
