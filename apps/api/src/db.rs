use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id                  UUID PRIMARY KEY,
        email               TEXT NOT NULL,
        name                TEXT NOT NULL DEFAULT '',
        first_name          TEXT NOT NULL DEFAULT '',
        last_name           TEXT NOT NULL DEFAULT '',
        password_hash       TEXT NOT NULL,
        phone               TEXT NOT NULL DEFAULT '',
        location            TEXT NOT NULL DEFAULT '',
        preferred_locations TEXT[] NOT NULL DEFAULT '{}',
        experience_years    INTEGER NOT NULL DEFAULT 0,
        skills              TEXT[] NOT NULL DEFAULT '{}',
        "current_role"      TEXT NOT NULL DEFAULT '',
        target_role         TEXT NOT NULL DEFAULT '',
        salary_expectation  BIGINT NOT NULL DEFAULT 0,
        resume_text         TEXT,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at          TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id                   UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title                TEXT NOT NULL,
        company              TEXT NOT NULL,
        location             TEXT NOT NULL,
        experience           TEXT,
        min_experience_years INTEGER NOT NULL DEFAULT 0,
        skills               TEXT[] NOT NULL DEFAULT '{}',
        description          TEXT,
        salary_min           BIGINT,
        salary_max           BIGINT,
        posted_at            TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS salary_data (
        id               UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        position         TEXT NOT NULL,
        location         TEXT NOT NULL,
        experience_years INTEGER NOT NULL DEFAULT 0,
        salary           BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interview_questions (
        id       UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company  TEXT,
        role     TEXT,
        question TEXT NOT NULL,
        type     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id           UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name         TEXT NOT NULL,
        industry     TEXT,
        size         TEXT,
        headquarters TEXT,
        culture      TEXT[] NOT NULL DEFAULT '{}',
        benefits     TEXT[] NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS career_paths (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        "current_role"  TEXT NOT NULL,
        next_roles      TEXT[] NOT NULL DEFAULT '{}',
        skills_to_learn TEXT[] NOT NULL DEFAULT '{}',
        timeline        TEXT
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users (email)",
    "CREATE INDEX IF NOT EXISTS jobs_title_idx ON jobs (title)",
    "CREATE INDEX IF NOT EXISTS jobs_location_idx ON jobs (location)",
    "CREATE INDEX IF NOT EXISTS jobs_skills_idx ON jobs USING GIN (skills)",
    "CREATE INDEX IF NOT EXISTS salary_position_idx ON salary_data (position)",
    "CREATE INDEX IF NOT EXISTS salary_location_idx ON salary_data (location)",
];

/// Creates tables and indexes if they do not exist yet. Idempotent.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema and indexes ensured");
    Ok(())
}
