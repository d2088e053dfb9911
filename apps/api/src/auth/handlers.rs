//! Axum route handlers for the Accounts API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password_off_executor, verify_password_off_executor};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{UserRow, UserView};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub salary_expectation: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Fields a profile update may touch. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preferred_locations: Option<Vec<String>>,
    pub experience_years: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub salary_expectation: Option<i64>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserView,
}

/// A validated registration, ready to insert.
#[derive(Debug)]
struct NewUser {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: String,
    location: String,
    experience_years: i32,
    skills: Vec<String>,
    current_role: String,
    target_role: String,
    salary_expectation: i64,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

fn validate_registration(req: RegisterRequest) -> Result<NewUser, AppError> {
    // Checked in this order so the first missing field is the one reported.
    let email = normalize_email(&required(req.email, "email")?);
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("password is required".to_string()))?;
    let first_name = required(req.first_name, "first_name")?;
    let last_name = required(req.last_name, "last_name")?;

    if req.experience_years.is_some_and(|y| y < 0) {
        return Err(AppError::Validation(
            "experience_years cannot be negative".to_string(),
        ));
    }

    Ok(NewUser {
        email,
        password,
        first_name,
        last_name,
        phone: req.phone.unwrap_or_default(),
        location: req.location.unwrap_or_default(),
        experience_years: req.experience_years.unwrap_or(0),
        skills: req.skills.unwrap_or_default(),
        current_role: req.current_role.unwrap_or_default(),
        target_role: req.target_role.unwrap_or_default(),
        salary_expectation: req.salary_expectation.unwrap_or(0),
    })
}

/// Applies the supplied fields to `row`. When either name part changes the
/// display name is rebuilt from them, overriding an explicit `name`.
fn apply_update(row: &mut UserRow, req: UpdateProfileRequest) -> Result<(), AppError> {
    if req.experience_years.is_some_and(|y| y < 0) {
        return Err(AppError::Validation(
            "experience_years cannot be negative".to_string(),
        ));
    }

    let names_changed = req.first_name.is_some() || req.last_name.is_some();
    if let Some(v) = req.first_name {
        row.first_name = v;
    }
    if let Some(v) = req.last_name {
        row.last_name = v;
    }
    if let Some(v) = req.name {
        row.name = v;
    }
    if names_changed {
        row.name = full_name(&row.first_name, &row.last_name);
    }

    if let Some(v) = req.phone {
        row.phone = v;
    }
    if let Some(v) = req.location {
        row.location = v;
    }
    if let Some(v) = req.preferred_locations {
        row.preferred_locations = v;
    }
    if let Some(v) = req.experience_years {
        row.experience_years = v;
    }
    if let Some(v) = req.skills {
        row.skills = v;
    }
    if let Some(v) = req.current_role {
        row.current_role = v;
    }
    if let Some(v) = req.target_role {
        row.target_role = v;
    }
    if let Some(v) = req.salary_expectation {
        row.salary_expectation = v;
    }
    if let Some(v) = req.resume_text {
        row.resume_text = Some(v).filter(|t| !t.trim().is_empty());
    }

    row.updated_at = Utc::now();
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let new_user = validate_registration(req)?;
    let pool = state.pool()?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&new_user.email)
        .fetch_one(pool)
        .await?;
    if exists {
        return Err(AppError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let password_hash = hash_password_off_executor(new_user.password.clone()).await?;
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (
            id, email, name, first_name, last_name, password_hash, phone, location,
            experience_years, skills, "current_role", target_role, salary_expectation
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.email)
    .bind(full_name(&new_user.first_name, &new_user.last_name))
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&password_hash)
    .bind(&new_user.phone)
    .bind(&new_user.location)
    .bind(new_user.experience_years)
    .bind(&new_user.skills)
    .bind(&new_user.current_role)
    .bind(&new_user.target_role)
    .bind(new_user.salary_expectation)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("User already exists with this email".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Registered user {}", row.id);
    Ok(Json(AuthResponse {
        message: Some("User registered successfully".to_string()),
        token: state.tokens.issue(row.id)?,
        user: UserView::from(&row),
    }))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    let pool = state.pool()?;

    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let verified = match &row {
        Some(r) => verify_password_off_executor(req.password.clone(), r.password_hash.clone()).await?,
        None => false,
    };
    let (Some(row), true) = (row, verified) else {
        warn!("Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    info!("User {} logged in", row.id);
    Ok(Json(AuthResponse {
        message: None,
        token: state.tokens.issue(row.id)?,
        user: UserView::from(&row),
    }))
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(state.pool()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// GET /api/auth/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = load_user(&state, user_id).await?;
    Ok(Json(ProfileResponse {
        message: None,
        user: UserView::from(&row),
    }))
}

/// PUT /api/auth/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut row = load_user(&state, user_id).await?;
    apply_update(&mut row, req)?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users SET
            first_name = $2, last_name = $3, name = $4, phone = $5, location = $6,
            preferred_locations = $7, experience_years = $8, skills = $9,
            "current_role" = $10, target_role = $11, salary_expectation = $12,
            resume_text = $13, updated_at = $14
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(row.id)
    .bind(&row.first_name)
    .bind(&row.last_name)
    .bind(&row.name)
    .bind(&row.phone)
    .bind(&row.location)
    .bind(&row.preferred_locations)
    .bind(row.experience_years)
    .bind(&row.skills)
    .bind(&row.current_role)
    .bind(&row.target_role)
    .bind(row.salary_expectation)
    .bind(&row.resume_text)
    .bind(row.updated_at)
    .fetch_one(state.pool()?)
    .await?;

    info!("Updated profile for user {}", row.id);
    Ok(Json(ProfileResponse {
        message: Some("Profile updated successfully".to_string()),
        user: UserView::from(&row),
    }))
}

/// GET /api/auth/test-db
pub async fn handle_test_db(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let pool = state.pool()?;
    sqlx::query("SELECT 1").execute(pool).await?;
    let users_count: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "PostgreSQL",
        "users_count": users_count,
        "message": "Database connection successful",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::sample_user_row;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            email: Some("  Asha@Example.com ".to_string()),
            password: Some("s3cret".to_string()),
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            ..Default::default()
        }
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_normalizes_email_and_defaults() {
        let user = validate_registration(registration()).unwrap();
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.experience_years, 0);
        assert!(user.skills.is_empty());
        assert_eq!(user.current_role, "");
    }

    #[test]
    fn test_registration_reports_first_missing_field() {
        let mut req = registration();
        req.first_name = Some("   ".to_string());
        req.last_name = None;
        let msg = validation_message(validate_registration(req).unwrap_err());
        assert_eq!(msg, "first_name is required");

        let mut req = registration();
        req.password = None;
        let msg = validation_message(validate_registration(req).unwrap_err());
        assert_eq!(msg, "password is required");
    }

    #[test]
    fn test_registration_rejects_negative_experience() {
        let mut req = registration();
        req.experience_years = Some(-1);
        assert!(validate_registration(req).is_err());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let mut row = sample_user_row();
        let before = row.updated_at;
        apply_update(
            &mut row,
            UpdateProfileRequest {
                skills: Some(vec!["Go".to_string()]),
                resume_text: Some("Experience ...".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(row.skills, vec!["Go".to_string()]);
        assert_eq!(row.resume_text.as_deref(), Some("Experience ..."));
        assert_eq!(row.name, "Asha Rao");
        assert_eq!(row.location, "Pune");
        assert!(row.updated_at >= before);
    }

    #[test]
    fn test_update_rebuilds_name_from_parts() {
        let mut row = sample_user_row();
        apply_update(
            &mut row,
            UpdateProfileRequest {
                last_name: Some("Iyer".to_string()),
                name: Some("Ignored".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(row.name, "Asha Iyer");
    }

    #[test]
    fn test_update_accepts_explicit_name_alone() {
        let mut row = sample_user_row();
        apply_update(
            &mut row,
            UpdateProfileRequest {
                name: Some("A. Rao".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(row.name, "A. Rao");
    }

    #[test]
    fn test_blank_resume_text_clears_resume() {
        let mut row = sample_user_row();
        row.resume_text = Some("old".to_string());
        apply_update(
            &mut row,
            UpdateProfileRequest {
                resume_text: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(row.resume_text.is_none());
    }
}
