//! Read-only catalog lookups: vocabularies, profiles, interview questions,
//! companies and career paths.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::collaborators::{
    CareerPaths, Companies, InterviewQuestions, UserProfiles, Vocabulary, VocabularySource,
};
use crate::errors::AppError;
use crate::models::catalog::{CareerPath, CompanyRecord, InterviewQuestion};
use crate::models::user::{UserProfile, UserRow};
use crate::services::contains_pattern;

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn distinct_query(vocabulary: Vocabulary) -> &'static str {
    match vocabulary {
        Vocabulary::Locations => {
            "SELECT DISTINCT location FROM jobs WHERE location <> '' ORDER BY location"
        }
        Vocabulary::Roles => "SELECT DISTINCT title FROM jobs WHERE title <> '' ORDER BY title",
        Vocabulary::Skills => {
            "SELECT DISTINCT skill FROM jobs, unnest(skills) AS skill WHERE skill <> '' ORDER BY skill"
        }
        Vocabulary::Companies => {
            "SELECT DISTINCT company FROM jobs WHERE company <> '' ORDER BY company"
        }
    }
}

#[async_trait]
impl VocabularySource for PgCatalog {
    async fn distinct(&self, vocabulary: Vocabulary) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(distinct_query(vocabulary))
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl UserProfiles for PgCatalog {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserProfile::from))
    }
}

#[async_trait]
impl InterviewQuestions for PgCatalog {
    async fn find(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        limit: i64,
    ) -> Result<Vec<InterviewQuestion>, AppError> {
        Ok(sqlx::query_as::<_, InterviewQuestion>(
            r#"
            SELECT id, company, role, question, type
            FROM interview_questions
            WHERE ($1::text IS NULL OR company ILIKE $1)
              AND ($2::text IS NULL OR role ILIKE $2)
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(company.map(contains_pattern))
        .bind(role.map(contains_pattern))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Companies for PgCatalog {
    async fn find_by_name(&self, partial_name: &str) -> Result<Option<CompanyRecord>, AppError> {
        Ok(sqlx::query_as::<_, CompanyRecord>(
            "SELECT * FROM companies WHERE name ILIKE $1 ORDER BY name LIMIT 1",
        )
        .bind(contains_pattern(partial_name))
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl CareerPaths for PgCatalog {
    async fn find_by_current_role(
        &self,
        partial_role: &str,
    ) -> Result<Option<CareerPath>, AppError> {
        Ok(sqlx::query_as::<_, CareerPath>(
            r#"SELECT * FROM career_paths WHERE "current_role" ILIKE $1 ORDER BY "current_role" LIMIT 1"#,
        )
        .bind(contains_pattern(partial_role))
        .fetch_optional(&self.pool)
        .await?)
    }
}
