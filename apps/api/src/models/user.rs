use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone: String,
    pub location: String,
    pub preferred_locations: Vec<String>,
    pub experience_years: i32,
    pub skills: Vec<String>,
    pub current_role: String,
    pub target_role: String,
    pub salary_expectation: i64,
    pub resume_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public shape of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub preferred_locations: Vec<String>,
    pub experience_years: i32,
    pub skills: Vec<String>,
    pub current_role: String,
    pub target_role: String,
    pub salary_expectation: i64,
    pub has_resume: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserRow> for UserView {
    fn from(row: &UserRow) -> Self {
        UserView {
            id: row.id,
            email: row.email.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            name: row.name.clone(),
            phone: row.phone.clone(),
            location: row.location.clone(),
            preferred_locations: row.preferred_locations.clone(),
            experience_years: row.experience_years,
            skills: row.skills.clone(),
            current_role: row.current_role.clone(),
            target_role: row.target_role.clone(),
            salary_expectation: row.salary_expectation,
            has_resume: row.resume_text.as_deref().is_some_and(|t| !t.trim().is_empty()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The slice of a user the chat assistant personalises with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub skills: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub experience_years: i32,
    pub current_role: Option<String>,
    pub resume_text: Option<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        let preferred_locations = if row.preferred_locations.is_empty() && !row.location.is_empty()
        {
            vec![row.location]
        } else {
            row.preferred_locations
        };
        UserProfile {
            id: row.id,
            skills: row.skills,
            preferred_locations,
            experience_years: row.experience_years,
            current_role: Some(row.current_role).filter(|r| !r.trim().is_empty()),
            resume_text: row.resume_text.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user_row() -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        email: "asha@example.com".to_string(),
        name: "Asha Rao".to_string(),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        password_hash: "pbkdf2-sha256$1$00$00".to_string(),
        phone: String::new(),
        location: "Pune".to_string(),
        preferred_locations: vec![],
        experience_years: 3,
        skills: vec!["Rust".to_string()],
        current_role: String::new(),
        target_role: String::new(),
        salary_expectation: 0,
        resume_text: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
