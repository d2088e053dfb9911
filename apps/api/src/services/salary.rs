//! Salary prediction and market insights from posted salary data.
//!
//! Predictions summarise `salary_data` rows for a role/location pair,
//! preferring rows near the requested experience. Insights compare the local
//! median with the national one and report demand signals from `jobs`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::chat::collaborators::{MarketAnalyzer, MarketInsights, SalaryPrediction, SalaryPredictor};
use crate::errors::AppError;
use crate::models::catalog::SalaryRecord;
use crate::services::contains_pattern;

/// Rows within this many years of the requested experience are preferred.
const EXPERIENCE_WINDOW: i32 = 2;
const TOP_SKILLS: i64 = 5;

#[derive(Clone)]
pub struct PgSalaryService {
    pool: PgPool,
}

impl PgSalaryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn salaries(&self, role: &str, location: Option<&str>) -> Result<Vec<SalaryRecord>, AppError> {
        Ok(sqlx::query_as::<_, SalaryRecord>(
            r#"
            SELECT position, location, experience_years, salary
            FROM salary_data
            WHERE position ILIKE $1
              AND ($2::text IS NULL OR location ILIKE $2)
            "#,
        )
        .bind(contains_pattern(role))
        .bind(location.map(contains_pattern))
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl SalaryPredictor for PgSalaryService {
    async fn predict(
        &self,
        role: &str,
        location: &str,
        experience_years: i32,
    ) -> Result<Option<SalaryPrediction>, AppError> {
        let records = self.salaries(role, Some(location)).await?;
        Ok(summarize_salaries(&records, experience_years))
    }
}

#[async_trait]
impl MarketAnalyzer for PgSalaryService {
    async fn insights(&self, role: &str, location: &str) -> Result<Option<MarketInsights>, AppError> {
        let open_roles: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM jobs WHERE title ILIKE $1 AND location ILIKE $2",
        )
        .bind(contains_pattern(role))
        .bind(contains_pattern(location))
        .fetch_one(&self.pool)
        .await?;

        let local = self.salaries(role, Some(location)).await?;
        let national = self.salaries(role, None).await?;

        let top_skills: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT skill
            FROM jobs, unnest(skills) AS skill
            WHERE title ILIKE $1
            GROUP BY skill
            ORDER BY count(*) DESC, skill
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(role))
        .bind(TOP_SKILLS)
        .fetch_all(&self.pool)
        .await?;

        let trends = build_trends(
            role,
            location,
            open_roles,
            median(&salary_values(&local)),
            median(&salary_values(&national)),
            &top_skills,
        );
        Ok((!trends.is_empty()).then_some(MarketInsights { trends }))
    }
}

fn salary_values(records: &[SalaryRecord]) -> Vec<i64> {
    records.iter().map(|r| r.salary).collect()
}

/// Median of the values; the mean of the two middle values for even counts.
pub fn median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    })
}

pub fn summarize_salaries(records: &[SalaryRecord], experience_years: i32) -> Option<SalaryPrediction> {
    let near: Vec<i64> = records
        .iter()
        .filter(|r| (r.experience_years - experience_years).abs() <= EXPERIENCE_WINDOW)
        .map(|r| r.salary)
        .collect();
    let values = if near.is_empty() {
        salary_values(records)
    } else {
        near
    };

    let min_salary = *values.iter().min()?;
    let max_salary = *values.iter().max()?;
    let median_salary = median(&values)?;
    Some(SalaryPrediction {
        min_salary,
        max_salary,
        median_salary,
        sample_size: values.len(),
    })
}

pub fn build_trends(
    role: &str,
    location: &str,
    open_roles: i64,
    local_median: Option<i64>,
    national_median: Option<i64>,
    top_skills: &[String],
) -> Vec<String> {
    let mut trends = Vec::new();

    if open_roles > 0 {
        trends.push(format!(
            "{open_roles} open {role} positions are currently listed in {location}"
        ));
    }

    if let (Some(local), Some(national)) = (local_median, national_median) {
        if national > 0 {
            let diff_pct = ((local - national) as f64 / national as f64 * 100.0).round() as i64;
            trends.push(match diff_pct {
                d if d > 0 => format!(
                    "{location} pays about {d}% above the national median for {role}"
                ),
                d if d < 0 => format!(
                    "{location} pays about {}% below the national median for {role}",
                    -d
                ),
                _ => format!("{location} pays in line with the national median for {role}"),
            });
        }
    }

    if !top_skills.is_empty() {
        trends.push(format!(
            "Most requested skills for {role}: {}",
            top_skills.join(", ")
        ));
    }

    trends
}
