//! Collaborator seams: every external lookup the chat pipeline performs.
//!
//! Each trait is carried as `Arc<dyn _>` inside [`Collaborators`], so the
//! Postgres-backed implementations can be swapped for in-memory fakes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::catalog::{CareerPath, CompanyRecord, InterviewQuestion, JobRecord};
use crate::models::user::UserProfile;

/// Reference vocabularies used for slot detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    Locations,
    Roles,
    Skills,
    Companies,
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Vocabulary::Locations => "location",
            Vocabulary::Roles => "role",
            Vocabulary::Skills => "skill",
            Vocabulary::Companies => "company",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPrediction {
    pub min_salary: i64,
    pub max_salary: i64,
    pub median_salary: i64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    pub trends: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub ats_score: u32,
    pub strengths: BTreeSet<String>,
    pub improvements: BTreeSet<String>,
}

#[async_trait]
pub trait VocabularySource: Send + Sync {
    /// Distinct known values, in store order.
    async fn distinct(&self, vocabulary: Vocabulary) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait JobMatcher: Send + Sync {
    async fn recommend(
        &self,
        skills: &[String],
        locations: &[String],
        experience_years: i32,
    ) -> Result<Vec<JobRecord>, AppError>;

    async fn search(
        &self,
        skills: &[String],
        location: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<JobRecord>, AppError>;
}

#[async_trait]
pub trait SalaryPredictor: Send + Sync {
    async fn predict(
        &self,
        role: &str,
        location: &str,
        experience_years: i32,
    ) -> Result<Option<SalaryPrediction>, AppError>;
}

#[async_trait]
pub trait MarketAnalyzer: Send + Sync {
    async fn insights(&self, role: &str, location: &str) -> Result<Option<MarketInsights>, AppError>;
}

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, resume_text: &str) -> Result<ResumeAnalysis, AppError>;
}

#[async_trait]
pub trait UserProfiles: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError>;
}

#[async_trait]
pub trait InterviewQuestions: Send + Sync {
    /// Case-insensitive partial match on whichever filters are given.
    async fn find(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        limit: i64,
    ) -> Result<Vec<InterviewQuestion>, AppError>;
}

#[async_trait]
pub trait Companies: Send + Sync {
    async fn find_by_name(&self, partial_name: &str) -> Result<Option<CompanyRecord>, AppError>;
}

#[async_trait]
pub trait CareerPaths: Send + Sync {
    async fn find_by_current_role(&self, partial_role: &str)
        -> Result<Option<CareerPath>, AppError>;
}

/// Everything the live chat pipeline talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub vocabulary: Arc<dyn VocabularySource>,
    pub jobs: Arc<dyn JobMatcher>,
    pub salaries: Arc<dyn SalaryPredictor>,
    pub market: Arc<dyn MarketAnalyzer>,
    pub resumes: Arc<dyn ResumeAnalyzer>,
    pub users: Arc<dyn UserProfiles>,
    pub interviews: Arc<dyn InterviewQuestions>,
    pub companies: Arc<dyn Companies>,
    pub career_paths: Arc<dyn CareerPaths>,
}
