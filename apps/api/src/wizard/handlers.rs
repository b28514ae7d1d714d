use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::controller::{EntryChange, Transition, WizardController, WizardView};
use super::steps::{Classifier, StepId};
use crate::auth::current_user;
use crate::errors::AppError;
use crate::feedback::{record_feedback, submitter, FeedbackReceipt};
use crate::forms::entries::EntryEdit;
use crate::forms::{submit_section, SectionData};
use crate::models::portfolio::EntryId;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClassifierQuery {
    pub classifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    #[serde(default)]
    pub classifier: Option<String>,
    pub step: StepId,
    pub section: SectionData,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub transition: Transition,
    pub wizard: WizardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackReceipt>,
}

#[derive(Debug, Serialize)]
pub struct EntryChangeResponse {
    #[serde(flatten)]
    pub change: EntryChange,
    pub wizard: WizardView,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    #[serde(default)]
    pub classifier: Option<String>,
    pub step: String,
}

/// The requested classifier, else the logged-in user's type, else none.
async fn resolve_classifier(
    state: &AppState,
    session_id: Uuid,
    requested: Option<String>,
) -> Classifier {
    let raw = match requested.filter(|c| !c.trim().is_empty()) {
        Some(c) => Some(c),
        None => current_user(state, session_id).await.map(|u| u.user_type),
    };
    Classifier::new(raw.as_deref())
}

async fn load_controller(
    state: &AppState,
    session_id: Uuid,
    requested: Option<String>,
) -> WizardController {
    let classifier = resolve_classifier(state, session_id, requested).await;
    let controller = WizardController::initialize(state.session(session_id), classifier).await;
    debug!(
        session = %session_id,
        classifier = ?controller.classifier().as_deref(),
        step = %controller.current_step(),
        "Wizard loaded"
    );
    controller
}

/// POST /api/v1/wizard/:session/init
pub async fn handle_init(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Option<Json<ClassifierQuery>>,
) -> Json<WizardView> {
    let requested = body.and_then(|Json(b)| b.classifier);
    Json(load_controller(&state, session_id, requested).await.view())
}

/// GET /api/v1/wizard/:session
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<ClassifierQuery>,
) -> Json<WizardView> {
    Json(
        load_controller(&state, session_id, params.classifier)
            .await
            .view(),
    )
}

/// POST /api/v1/wizard/:session/advance
///
/// The section is validated before the controller sees it; feedback is stored
/// only after the controller accepted the transition.
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AdvanceRequest>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let section = submit_section(req.section).map_err(AppError::InvalidSection)?;
    let draft = match &section {
        SectionData::Feedback(draft) => Some(draft.clone()),
        _ => None,
    };

    let mut controller = load_controller(&state, session_id, req.classifier).await;
    let transition = controller.advance(req.step, section).await?;

    let feedback = match draft {
        Some(draft) => {
            let by = submitter(&state, session_id).await;
            Some(record_feedback(&state, &draft, &by).await)
        }
        None => None,
    };

    Ok(Json(AdvanceResponse {
        transition,
        wizard: controller.view(),
        feedback,
    }))
}

/// POST /api/v1/wizard/:session/jump
pub async fn handle_jump(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<WizardView>, AppError> {
    let step = parse_step(&req.step)?;
    let mut controller = load_controller(&state, session_id, req.classifier).await;
    controller.jump_to(step).await?;
    Ok(Json(controller.view()))
}

fn parse_step(raw: &str) -> Result<StepId, AppError> {
    StepId::parse(raw.trim()).ok_or_else(|| AppError::Validation(format!("Unknown step '{raw}'")))
}

async fn edit_entries(
    state: &AppState,
    session_id: Uuid,
    step: &str,
    requested: Option<String>,
    edit: EntryEdit,
) -> Result<Json<EntryChangeResponse>, AppError> {
    let step = parse_step(step)?;
    let mut controller = load_controller(state, session_id, requested).await;
    let change = controller.edit_entries(step, edit).await?;
    Ok(Json(EntryChangeResponse {
        change,
        wizard: controller.view(),
    }))
}

/// POST /api/v1/wizard/:session/sections/:step/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((session_id, step)): Path<(Uuid, String)>,
    Query(params): Query<ClassifierQuery>,
) -> Result<Json<EntryChangeResponse>, AppError> {
    edit_entries(&state, session_id, &step, params.classifier, EntryEdit::Add).await
}

/// DELETE /api/v1/wizard/:session/sections/:step/entries/:id
///
/// Removing the last entry or a seeded education row answers `changed: false`.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((session_id, step, entry_id)): Path<(Uuid, String, String)>,
    Query(params): Query<ClassifierQuery>,
) -> Result<Json<EntryChangeResponse>, AppError> {
    let edit = EntryEdit::Remove(EntryId::from(entry_id.as_str()));
    edit_entries(&state, session_id, &step, params.classifier, edit).await
}

/// POST /api/v1/wizard/:session/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<ClassifierQuery>,
) -> Json<WizardView> {
    let mut controller = load_controller(&state, session_id, params.classifier).await;
    controller.reset().await;
    Json(controller.view())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{register, RegisterRequest};
    use crate::models::feedback::FeedbackDraft;
    use crate::models::portfolio::{EntryId, InternshipEntry, PersonalInfo};
    use crate::remote::fake::FakeRemote;
    use crate::remote::RemoteStore;
    use crate::sync::SyncOutcome;

    fn personal(name: &str) -> SectionData {
        SectionData::Personal(PersonalInfo {
            full_name: name.to_string(),
            email: "riya@example.com".to_string(),
            phone: "9876543210".to_string(),
            ..PersonalInfo::default()
        })
    }

    fn advance_req(step: StepId, section: SectionData) -> Json<AdvanceRequest> {
        Json(AdvanceRequest {
            classifier: Some("student-ug".to_string()),
            step,
            section,
        })
    }

    #[tokio::test]
    async fn test_incomplete_section_is_refused_and_nothing_moves() {
        let state = AppState::for_tests(None, &[]);
        let session = Uuid::new_v4();

        let err = handle_advance(
            State(state.clone()),
            Path(session),
            advance_req(StepId::Personal, personal("")),
        )
        .await
        .unwrap_err();
        match err {
            AppError::InvalidSection(report) => {
                assert_eq!(report.missing[0].field, "personal.full_name")
            }
            other => panic!("unexpected {other:?}"),
        }

        let Json(view) =
            handle_get_wizard(State(state), Path(session), Query(ClassifierQuery::default())).await;
        assert_eq!(view.current_step, StepId::Personal);
        assert!(view.record.personal.full_name.is_empty());
    }

    #[tokio::test]
    async fn test_advance_then_reload_from_storage() {
        let state = AppState::for_tests(None, &[]);
        let session = Uuid::new_v4();

        let Json(response) = handle_advance(
            State(state.clone()),
            Path(session),
            advance_req(StepId::Personal, personal("Riya Sen")),
        )
        .await
        .unwrap();
        assert_eq!(
            response.transition,
            Transition::Moved {
                to: StepId::Education
            }
        );

        let Json(view) = handle_init(
            State(state),
            Path(session),
            Some(Json(ClassifierQuery {
                classifier: Some("student-ug".to_string()),
            })),
        )
        .await;
        assert_eq!(view.current_step, StepId::Education);
        assert_eq!(view.record.personal.full_name, "Riya Sen");
        assert!(view
            .active_steps
            .iter()
            .all(|s| s.id != StepId::Experience));
    }

    #[tokio::test]
    async fn test_classifier_falls_back_to_session_user() {
        let state = AppState::for_tests(None, &[]);
        let session = Uuid::new_v4();
        register(
            &state,
            session,
            RegisterRequest {
                name: "Riya Sen".to_string(),
                email: "riya@example.com".to_string(),
                password: "secret1".to_string(),
                user_type: "fresher-pg".to_string(),
            },
        )
        .await
        .unwrap();

        let Json(view) =
            handle_get_wizard(State(state), Path(session), Query(ClassifierQuery::default())).await;
        assert!(view
            .active_steps
            .iter()
            .all(|s| s.id != StepId::Experience));
    }

    #[tokio::test]
    async fn test_classifier_from_init_holds_for_later_requests() {
        let state = AppState::for_tests(None, &[]);
        let session = Uuid::new_v4();
        let Json(view) = handle_init(
            State(state.clone()),
            Path(session),
            Some(Json(ClassifierQuery {
                classifier: Some("fresher-ug".to_string()),
            })),
        )
        .await;
        assert!(view
            .active_steps
            .iter()
            .all(|s| s.id != StepId::Experience));

        let Json(response) = handle_advance(
            State(state),
            Path(session),
            Json(AdvanceRequest {
                classifier: None,
                step: StepId::Internships,
                section: SectionData::Internships(vec![InternshipEntry {
                    id: EntryId::generate(),
                    company: "ISRO".to_string(),
                    role: "Summer intern".to_string(),
                    duration: "2 months".to_string(),
                    description: String::new(),
                }]),
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            response.transition,
            Transition::Moved {
                to: StepId::Projects
            }
        );
    }

    #[tokio::test]
    async fn test_jump_rejects_unknown_and_unreached_steps() {
        let state = AppState::for_tests(None, &[]);
        let session = Uuid::new_v4();

        let unknown = handle_jump(
            State(state.clone()),
            Path(session),
            Json(JumpRequest {
                classifier: None,
                step: "hobbies".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown, AppError::Validation(_)));

        let unreached = handle_jump(
            State(state),
            Path(session),
            Json(JumpRequest {
                classifier: None,
                step: "skills".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(unreached, AppError::Wizard(_)));
    }

    #[tokio::test]
    async fn test_feedback_step_stores_feedback_after_transition() {
        let remote = Arc::new(FakeRemote::failing());
        let state = AppState::for_tests(Some(remote.clone() as Arc<dyn RemoteStore>), &[]);
        let session = Uuid::new_v4();

        // Unrated feedback never reaches the remote store.
        let err = handle_advance(
            State(state.clone()),
            Path(session),
            advance_req(StepId::Feedback, SectionData::Feedback(FeedbackDraft {
                rating: 0,
                suggestion: String::new(),
            })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidSection(_)));
        assert_eq!(remote.call_count(), 0);

        let Json(response) = handle_advance(
            State(state),
            Path(session),
            advance_req(StepId::Feedback, SectionData::Feedback(FeedbackDraft {
                rating: 5,
                suggestion: "Great".to_string(),
            })),
        )
        .await
        .unwrap();
        assert_eq!(response.transition, Transition::Completed);
        let receipt = response.feedback.unwrap();
        assert_eq!(receipt.stored, SyncOutcome::LocalFallback);
        assert_eq!(receipt.feedback.submitted_by, "anonymous");
        assert_eq!(remote.call_count(), 1);
    }
}
