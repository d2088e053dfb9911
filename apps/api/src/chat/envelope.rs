//! Response Assembler: the single envelope every chat reply is shaped into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::collaborators::{MarketInsights, ResumeAnalysis, SalaryPrediction};
use crate::chat::extract::ExtractedContext;
use crate::chat::intent::Intent;
use crate::models::catalog::{CareerPath, CompanyRecord, InterviewQuestion, JobRecord};

/// Structured data attached to a reply. One variant per kind of lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Clarification prompts, static guidance and degraded replies.
    Empty,
    Jobs {
        jobs: Vec<JobRecord>,
        total_count: usize,
        total_matches: usize,
    },
    Salary {
        salary_prediction: SalaryPrediction,
        market_insights: Option<MarketInsights>,
    },
    Resume {
        can_analyze: bool,
        analysis: Option<ResumeAnalysis>,
    },
    InterviewQuestions {
        questions: Vec<InterviewQuestion>,
        total_questions: usize,
    },
    Company {
        company: CompanyRecord,
    },
    CareerPath {
        career_path: CareerPath,
    },
    /// Store connectivity, reported by the fallback responder.
    Status {
        database_status: String,
    },
}

/// What an intent handler contributes to the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerReply {
    pub message: String,
    pub data: Payload,
    pub error: Option<String>,
}

impl HandlerReply {
    pub fn new(message: impl Into<String>, data: Payload) -> Self {
        Self {
            message: message.into(),
            data,
            error: None,
        }
    }

    /// A reply with no structured data, used for prompts and static text.
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(message, Payload::Empty)
    }

    /// A degraded reply carrying the collaborator's diagnostic.
    pub fn degraded(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            message: message.into(),
            data: Payload::Empty,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub message: String,
    pub intent: Intent,
    pub context: ExtractedContext,
    pub suggestions: Vec<String>,
    pub data: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ResponseEnvelope {
    pub fn assemble(intent: Intent, context: ExtractedContext, reply: HandlerReply) -> Self {
        ResponseEnvelope {
            message: reply.message,
            intent,
            context,
            suggestions: follow_up_suggestions(intent),
            data: reply.data,
            error: reply.error,
            timestamp: Utc::now(),
        }
    }
}

const JOB_SEARCH_SUGGESTIONS: [&str; 4] = [
    "Show me remote job opportunities",
    "Find jobs with specific skills",
    "Help me prepare for applications",
    "Compare companies",
];

const SALARY_SUGGESTIONS: [&str; 4] = [
    "Compare salaries across cities",
    "Negotiation strategies",
    "Benefits to ask for",
    "Industry salary trends",
];

const RESUME_SUGGESTIONS: [&str; 4] = [
    "Review my resume",
    "ATS optimization tips",
    "Resume templates",
    "Key achievements examples",
];

const INTERVIEW_SUGGESTIONS: [&str; 4] = [
    "Technical interview practice",
    "Behavioral questions",
    "Company-specific tips",
    "Interview follow-up",
];

const COMPANY_SUGGESTIONS: [&str; 4] = [
    "Company culture details",
    "Employee benefits",
    "Growth opportunities",
    "Work-life balance",
];

const CAREER_GROWTH_SUGGESTIONS: [&str; 4] = [
    "Skill development plan",
    "Certification recommendations",
    "Networking strategies",
    "Career transition advice",
];

pub const GENERAL_SUGGESTIONS: [&str; 4] = [
    "Find software engineer jobs",
    "Salary negotiation tips",
    "Resume building help",
    "Interview preparation",
];

/// Fixed follow-up table, four entries per intent.
pub fn follow_up_suggestions(intent: Intent) -> Vec<String> {
    let table = match intent {
        Intent::JobSearch => &JOB_SEARCH_SUGGESTIONS,
        Intent::Salary => &SALARY_SUGGESTIONS,
        Intent::Resume => &RESUME_SUGGESTIONS,
        Intent::Interview => &INTERVIEW_SUGGESTIONS,
        Intent::CompanyResearch => &COMPANY_SUGGESTIONS,
        Intent::CareerGrowth => &CAREER_GROWTH_SUGGESTIONS,
        Intent::General => &GENERAL_SUGGESTIONS,
    };
    table.iter().map(|s| s.to_string()).collect()
}
