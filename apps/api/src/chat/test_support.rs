//! In-memory collaborator fakes with call counters, shared by the chat tests.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::chat::collaborators::*;
use crate::errors::AppError;
use crate::models::catalog::{CareerPath, CompanyRecord, InterviewQuestion, JobRecord};
use crate::models::user::UserProfile;

fn unavailable() -> AppError {
    AppError::ServiceUnavailable("fake collaborator offline".to_string())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix} {i}")).collect()
}

pub fn job(title: &str) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Infosys".to_string(),
        location: "Pune".to_string(),
        experience: Some("2-5 years".to_string()),
        min_experience_years: 2,
        skills: strings(&["Python", "SQL"]),
        description: None,
        salary_min: None,
        salary_max: None,
        posted_at: Utc::now(),
    }
}

// ────────────────────────────────────────────────────────────────────────────

pub struct FakeVocabulary {
    values: HashMap<Vocabulary, Vec<String>>,
    failing: HashSet<Vocabulary>,
    calls: AtomicUsize,
}

impl FakeVocabulary {
    pub fn standard() -> Self {
        let mut values = HashMap::new();
        values.insert(
            Vocabulary::Locations,
            strings(&["Bangalore", "Pune", "Hyderabad"]),
        );
        values.insert(
            Vocabulary::Roles,
            strings(&["Data Scientist", "Software Engineer", "Product Manager"]),
        );
        values.insert(Vocabulary::Skills, strings(&["Python", "SQL", "Java", "React"]));
        values.insert(Vocabulary::Companies, strings(&["Infosys", "TCS", "Flipkart"]));
        Self {
            values,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self, vocabulary: Vocabulary) -> Self {
        self.failing.insert(vocabulary);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VocabularySource for FakeVocabulary {
    async fn distinct(&self, vocabulary: Vocabulary) -> Result<Vec<String>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&vocabulary) {
            return Err(unavailable());
        }
        Ok(self.values.get(&vocabulary).cloned().unwrap_or_default())
    }
}

// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeJobs {
    results: Mutex<Vec<JobRecord>>,
    search_calls: AtomicUsize,
    recommend_calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeJobs {
    pub fn set_results(&self, jobs: Vec<JobRecord>) {
        *self.results.lock().unwrap() = jobs;
    }
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
    pub fn recommend_calls(&self) -> usize {
        self.recommend_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobMatcher for FakeJobs {
    async fn recommend(
        &self,
        _skills: &[String],
        _locations: &[String],
        _experience_years: i32,
    ) -> Result<Vec<JobRecord>, AppError> {
        self.recommend_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.results.lock().unwrap().clone())
    }

    async fn search(
        &self,
        _skills: &[String],
        _location: Option<&str>,
        _role: Option<&str>,
    ) -> Result<Vec<JobRecord>, AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.results.lock().unwrap().clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSalaries {
    calls: AtomicUsize,
    last_years: Mutex<Option<i32>>,
    fail: AtomicBool,
}

impl FakeSalaries {
    pub fn predict_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
    pub fn last_years(&self) -> Option<i32> {
        *self.last_years.lock().unwrap()
    }
}

#[async_trait]
impl SalaryPredictor for FakeSalaries {
    async fn predict(
        &self,
        _role: &str,
        _location: &str,
        experience_years: i32,
    ) -> Result<Option<SalaryPrediction>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_years.lock().unwrap() = Some(experience_years);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(Some(SalaryPrediction {
            min_salary: 600_000,
            max_salary: 1_800_000,
            median_salary: 1_100_000,
            sample_size: 12,
        }))
    }
}

#[derive(Default)]
pub struct FakeMarket {
    fail: AtomicBool,
}

impl FakeMarket {
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketAnalyzer for FakeMarket {
    async fn insights(&self, _role: &str, _location: &str) -> Result<Option<MarketInsights>, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(Some(MarketInsights {
            trends: numbered("trend", 5),
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeResumes {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeResumes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeAnalyzer for FakeResumes {
    async fn analyze(&self, _resume_text: &str) -> Result<ResumeAnalysis, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(ResumeAnalysis {
            ats_score: 72,
            strengths: BTreeSet::from(["Quantified achievements".to_string()]),
            improvements: BTreeSet::from(["Add a skills section".to_string()]),
        })
    }
}

#[derive(Default)]
pub struct FakeUsers {
    profiles: Mutex<HashMap<Uuid, UserProfile>>,
    fail: AtomicBool,
}

impl FakeUsers {
    pub fn add_profile(&self, mut profile: UserProfile) -> Uuid {
        let id = Uuid::new_v4();
        profile.id = id;
        self.profiles.lock().unwrap().insert(id, profile);
        id
    }
}

#[async_trait]
impl UserProfiles for FakeUsers {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }
}

// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeInterviews {
    last_limit: Mutex<Option<i64>>,
    fail: AtomicBool,
}

impl FakeInterviews {
    pub fn last_limit(&self) -> Option<i64> {
        *self.last_limit.lock().unwrap()
    }
}

fn contains_ci(haystack: &Option<String>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) => haystack
            .as_deref()
            .is_some_and(|h| h.to_lowercase().contains(&n.to_lowercase())),
    }
}

#[async_trait]
impl InterviewQuestions for FakeInterviews {
    async fn find(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        limit: i64,
    ) -> Result<Vec<InterviewQuestion>, AppError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let all = vec![
            InterviewQuestion {
                id: Uuid::new_v4(),
                company: Some("Infosys".to_string()),
                role: Some("Data Scientist".to_string()),
                question: "Explain bias-variance tradeoff".to_string(),
                question_type: Some("technical".to_string()),
            },
            InterviewQuestion {
                id: Uuid::new_v4(),
                company: Some("TCS".to_string()),
                role: Some("Software Engineer".to_string()),
                question: "Tell me about a conflict you resolved".to_string(),
                question_type: Some("behavioral".to_string()),
            },
        ];
        Ok(all
            .into_iter()
            .filter(|q| contains_ci(&q.company, company) && contains_ci(&q.role, role))
            .take(limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct FakeCompanies {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeCompanies {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Companies for FakeCompanies {
    async fn find_by_name(&self, partial_name: &str) -> Result<Option<CompanyRecord>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        if !"infosys".contains(&partial_name.to_lowercase()) {
            return Ok(None);
        }
        Ok(Some(CompanyRecord {
            id: Uuid::new_v4(),
            name: "Infosys".to_string(),
            industry: Some("IT Services".to_string()),
            size: Some("300000+".to_string()),
            headquarters: Some("Bangalore".to_string()),
            culture: numbered("culture", 5),
            benefits: numbered("benefit", 5),
        }))
    }
}

#[derive(Default)]
pub struct FakeCareerPaths {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl FakeCareerPaths {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CareerPaths for FakeCareerPaths {
    async fn find_by_current_role(
        &self,
        partial_role: &str,
    ) -> Result<Option<CareerPath>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        if !"analyst".contains(&partial_role.to_lowercase()) {
            return Ok(None);
        }
        Ok(Some(CareerPath {
            id: Uuid::new_v4(),
            current_role: "Analyst".to_string(),
            next_roles: numbered("next", 5),
            skills_to_learn: numbered("skill", 7),
            timeline: Some("2-3 years".to_string()),
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────

/// One fake per collaborator, kept around so tests can inspect call counts.
pub struct Fakes {
    pub vocabulary: Arc<FakeVocabulary>,
    pub jobs: Arc<FakeJobs>,
    pub salaries: Arc<FakeSalaries>,
    pub market: Arc<FakeMarket>,
    pub resumes: Arc<FakeResumes>,
    pub users: Arc<FakeUsers>,
    pub interviews: Arc<FakeInterviews>,
    pub companies: Arc<FakeCompanies>,
    pub career_paths: Arc<FakeCareerPaths>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            vocabulary: Arc::new(FakeVocabulary::standard()),
            jobs: Arc::default(),
            salaries: Arc::default(),
            market: Arc::default(),
            resumes: Arc::default(),
            users: Arc::default(),
            interviews: Arc::default(),
            companies: Arc::default(),
            career_paths: Arc::default(),
        }
    }
}

impl Fakes {
    /// Every collaborator except the vocabulary reports itself offline.
    pub fn failing() -> Self {
        let fakes = Self::default();
        fakes.jobs.fail.store(true, Ordering::SeqCst);
        fakes.salaries.fail.store(true, Ordering::SeqCst);
        fakes.market.fail.store(true, Ordering::SeqCst);
        fakes.resumes.fail.store(true, Ordering::SeqCst);
        fakes.users.fail.store(true, Ordering::SeqCst);
        fakes.interviews.fail.store(true, Ordering::SeqCst);
        fakes.companies.fail.store(true, Ordering::SeqCst);
        fakes.career_paths.fail.store(true, Ordering::SeqCst);
        fakes
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            vocabulary: self.vocabulary.clone(),
            jobs: self.jobs.clone(),
            salaries: self.salaries.clone(),
            market: self.market.clone(),
            resumes: self.resumes.clone(),
            users: self.users.clone(),
            interviews: self.interviews.clone(),
            companies: self.companies.clone(),
            career_paths: self.career_paths.clone(),
        }
    }
}
