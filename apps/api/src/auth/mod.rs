//! Local-storage-backed accounts with best-effort profile sync to the remote store.
//!
//! Credentials are compared in plain text; there is no security model here.

pub mod handlers;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::validation::is_blank;
use crate::forms::ValidationReport;
use crate::models::user::{PublicUser, UserRecord};
use crate::state::AppState;
use crate::storage::{KEY_USER, KEY_USERS};
use crate::sync::{write_through, SyncOutcome};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Classifier, e.g. `student-ug`.
    pub user_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    /// Present on registration: whether the profile reached the remote store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncOutcome>,
}

/// Why a login was refused. Logged, never shown to the user.
#[derive(Debug, Error, PartialEq)]
pub enum AuthFailure {
    #[error("no account registered for {0}")]
    UnknownEmail(String),

    #[error("wrong password for {0}")]
    WrongPassword(String),
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(req: &RegisterRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.require("name", &req.name);
    report.require("email", &req.email);
    report.require("password", &req.password);
    report.require("user_type", &req.user_type);
    if !is_blank(&req.email) && !req.email.contains('@') {
        report.push("email", "email must contain '@'");
    }
    if !req.password.is_empty() && req.password.chars().count() < MIN_PASSWORD_LEN {
        report.push(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    report
}

/// Finds the account for `email` and compares the password.
pub fn check_credentials<'a>(
    users: &'a [UserRecord],
    email: &str,
    password: &str,
) -> Result<&'a UserRecord, AuthFailure> {
    let email = normalize_email(email);
    let user = users
        .iter()
        .find(|u| u.email == email)
        .ok_or_else(|| AuthFailure::UnknownEmail(email.clone()))?;
    if user.password != password {
        return Err(AuthFailure::WrongPassword(email));
    }
    Ok(user)
}

/// Creates an account, logs the session in, and syncs the profile remotely if possible.
pub async fn register(
    state: &AppState,
    session_id: Uuid,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let report = validate_registration(&req);
    if !report.passed {
        return Err(AppError::InvalidSection(report));
    }

    let shared = state.shared();
    let guard = state.lock_shared().await;
    let mut users: Vec<UserRecord> = shared.read(KEY_USERS, Vec::new()).await;
    let email = normalize_email(&req.email);
    if users.iter().any(|u| u.email == email) {
        info!(email = %email, "Registration refused: email already registered");
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user = UserRecord {
        name: req.name.trim().to_string(),
        is_admin: state.config.is_admin_email(&email),
        email,
        password: req.password,
        user_type: req.user_type.trim().to_lowercase(),
        created_at: Utc::now(),
    };
    let public = PublicUser::from(&user);
    users.push(user);
    shared.write(KEY_USERS, &users).await;
    drop(guard);
    state.session(session_id).write(KEY_USER, &public).await;
    info!(email = %public.email, admin = public.is_admin, "User registered");

    // Login reads only the local users list, so it is written above whatever the
    // remote does; a failed profile sync has nothing left to store.
    let sync = write_through(
        "user profile",
        state.remote().map(|remote| remote.upsert_profile(&public)),
        async {
            debug!(email = %public.email, "Profile kept in local users list only");
        },
    )
    .await;

    Ok(AuthResponse {
        user: public,
        sync: Some(sync),
    })
}

/// Checks credentials against the local users list and stores the session user.
pub async fn login(
    state: &AppState,
    session_id: Uuid,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let users: Vec<UserRecord> = state.shared().read(KEY_USERS, Vec::new()).await;
    let user = match check_credentials(&users, &req.email, &req.password) {
        Ok(user) => user,
        Err(failure) => {
            warn!(reason = %failure, "Login refused");
            return Err(AppError::InvalidCredentials);
        }
    };

    let public = PublicUser::from(user);
    state.session(session_id).write(KEY_USER, &public).await;
    info!(email = %public.email, "User logged in");
    Ok(AuthResponse {
        user: public,
        sync: None,
    })
}

pub async fn logout(state: &AppState, session_id: Uuid) {
    state.session(session_id).remove(KEY_USER).await;
    info!(session = %session_id, "User logged out");
}

pub async fn current_user(state: &AppState, session_id: Uuid) -> Option<PublicUser> {
    state.session(session_id).read(KEY_USER, None).await
}

/// The session's user if it carries the admin flag.
pub async fn require_admin(state: &AppState, session_id: Uuid) -> Result<PublicUser, AppError> {
    match current_user(state, session_id).await {
        Some(user) if user.is_admin => Ok(user),
        Some(user) => {
            warn!(email = %user.email, "Non-admin requested admin data");
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Unauthorized),
    }
}
