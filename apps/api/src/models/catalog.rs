use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRecord {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub experience: Option<String>,
    pub min_experience_years: i32,
    pub skills: Vec<String>,
    pub description: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InterviewQuestion {
    pub id: Uuid,
    pub company: Option<String>,
    pub role: Option<String>,
    pub question: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub question_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyRecord {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub headquarters: Option<String>,
    pub culture: Vec<String>,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CareerPath {
    pub id: Uuid,
    pub current_role: String,
    pub next_roles: Vec<String>,
    pub skills_to_learn: Vec<String>,
    pub timeline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SalaryRecord {
    pub position: String,
    pub location: String,
    pub experience_years: i32,
    pub salary: i64,
}
