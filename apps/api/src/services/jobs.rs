//! Job matching: context search and profile-based recommendations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::chat::collaborators::JobMatcher;
use crate::errors::AppError;
use crate::models::catalog::JobRecord;
use crate::services::contains_pattern;

const SEARCH_LIMIT: i64 = 50;
const RECOMMEND_CANDIDATES: i64 = 200;

#[derive(Clone)]
pub struct PgJobMatcher {
    pool: PgPool,
}

impl PgJobMatcher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobMatcher for PgJobMatcher {
    /// Jobs in the preferred locations the user is experienced enough for,
    /// ranked by how many of the user's skills they ask for.
    async fn recommend(
        &self,
        skills: &[String],
        locations: &[String],
        experience_years: i32,
    ) -> Result<Vec<JobRecord>, AppError> {
        let locations: Vec<String> = locations.iter().map(|l| l.trim().to_lowercase()).collect();

        let candidates = sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT * FROM jobs
            WHERE (cardinality($1::text[]) = 0 OR lower(location) = ANY($1::text[]))
              AND min_experience_years <= $2
            ORDER BY posted_at DESC
            LIMIT $3
            "#,
        )
        .bind(&locations)
        .bind(experience_years)
        .bind(RECOMMEND_CANDIDATES)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Ranking {} recommendation candidates against {} skills",
            candidates.len(),
            skills.len()
        );
        Ok(rank_by_skill_overlap(candidates, skills))
    }

    async fn search(
        &self,
        skills: &[String],
        location: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<JobRecord>, AppError> {
        Ok(sqlx::query_as::<_, JobRecord>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::text IS NULL OR location ILIKE $1)
              AND ($2::text IS NULL OR title ILIKE $2)
              AND (cardinality($3::text[]) = 0 OR skills && $3::text[])
            ORDER BY posted_at DESC
            LIMIT $4
            "#,
        )
        .bind(location.map(contains_pattern))
        .bind(role.map(contains_pattern))
        .bind(skills)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Orders jobs by the number of `skills` they list (case-insensitive), most
/// first, keeping the incoming order among equals. With a non-empty skill
/// list, jobs sharing no skill are dropped.
pub fn rank_by_skill_overlap(jobs: Vec<JobRecord>, skills: &[String]) -> Vec<JobRecord> {
    if skills.is_empty() {
        return jobs;
    }
    let wanted: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let mut scored: Vec<(usize, JobRecord)> = jobs
        .into_iter()
        .map(|job| {
            let overlap = job
                .skills
                .iter()
                .filter(|s| wanted.contains(&s.to_lowercase()))
                .count();
            (overlap, job)
        })
        .filter(|(overlap, _)| *overlap > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, job)| job).collect()
}
