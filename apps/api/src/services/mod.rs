// Concrete collaborator implementations behind the chat traits.
// Everything here reads from Postgres except the resume analyzer, which is pure.

pub mod catalog;
pub mod jobs;
pub mod resume;
pub mod salary;

use std::sync::Arc;

use sqlx::PgPool;

use crate::chat::collaborators::Collaborators;

/// Wraps `value` as a case-insensitive "contains" pattern for `ILIKE`,
/// escaping LIKE metacharacters so user text matches literally.
pub fn contains_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Wires every collaborator to the shared pool.
pub fn postgres_collaborators(pool: PgPool) -> Collaborators {
    let catalog = Arc::new(catalog::PgCatalog::new(pool.clone()));
    let salaries = Arc::new(salary::PgSalaryService::new(pool.clone()));
    Collaborators {
        vocabulary: catalog.clone(),
        jobs: Arc::new(jobs::PgJobMatcher::new(pool)),
        salaries: salaries.clone(),
        market: salaries,
        resumes: Arc::new(resume::HeuristicResumeAnalyzer),
        users: catalog.clone(),
        interviews: catalog.clone(),
        companies: catalog.clone(),
        career_paths: catalog,
    }
}
