//! Intent Handlers: one [`IntentHandler`] per [`Intent`] variant.
//!
//! Handlers never fail: any collaborator error is logged and folded into a
//! degraded [`HandlerReply`] that still reads well to the user.

use async_trait::async_trait;
use tracing::{error, warn};
use uuid::Uuid;

use crate::chat::collaborators::Collaborators;
use crate::chat::envelope::{HandlerReply, Payload};
use crate::chat::extract::ExtractedContext;
use crate::chat::intent::Intent;
use crate::errors::AppError;
use crate::models::user::UserProfile;

pub const MAX_JOBS_SHOWN: usize = 5;
pub const MAX_INTERVIEW_QUESTIONS: i64 = 10;
const MAX_TRENDS_SHOWN: usize = 3;
const MAX_CULTURE_NOTES: usize = 3;
const MAX_BENEFITS: usize = 3;
const MAX_NEXT_ROLES: usize = 3;
const MAX_SKILLS_TO_LEARN: usize = 5;

/// Everything a handler may look at for one message.
pub struct HandlerInput<'a> {
    pub message: &'a str,
    pub context: &'a ExtractedContext,
    pub user_id: Option<Uuid>,
    pub collaborators: &'a Collaborators,
}

impl HandlerInput<'_> {
    /// Loads the caller's profile. Lookup failures count as "no profile".
    async fn profile(&self) -> Option<UserProfile> {
        let user_id = self.user_id?;
        match self.collaborators.users.find_by_id(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Could not load profile for user {user_id}: {e}");
                None
            }
        }
    }
}

#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply;
}

/// Dispatch table: the handler responsible for each intent.
pub fn handler_for(intent: Intent) -> &'static dyn IntentHandler {
    match intent {
        Intent::JobSearch => &JobSearchHandler,
        Intent::Salary => &SalaryHandler,
        Intent::Resume => &ResumeHandler,
        Intent::Interview => &InterviewHandler,
        Intent::CompanyResearch => &CompanyResearchHandler,
        Intent::CareerGrowth => &CareerGrowthHandler,
        Intent::General => &GeneralHandler,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job search
// ────────────────────────────────────────────────────────────────────────────

pub struct JobSearchHandler;

const JOB_SEARCH_CLARIFY: &str = "I couldn't find specific job matches based on your query. Let me help you refine your search. Could you tell me more about your skills, preferred location, or target roles?";

#[async_trait]
impl IntentHandler for JobSearchHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        match self.search(input).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Job search error: {e}");
                HandlerReply::degraded("I'm having trouble accessing job data right now.", e)
            }
        }
    }
}

impl JobSearchHandler {
    async fn search(&self, input: &HandlerInput<'_>) -> Result<HandlerReply, AppError> {
        let ctx = input.context;
        let jobs = input.collaborators.jobs.as_ref();

        let mut matches = match input.profile().await {
            Some(profile) => {
                jobs.recommend(
                    &profile.skills,
                    &profile.preferred_locations,
                    profile.experience_years,
                )
                .await?
            }
            None => {
                jobs.search(&ctx.skills, ctx.location.as_deref(), ctx.role.as_deref())
                    .await?
            }
        };

        if matches.is_empty() {
            return Ok(HandlerReply::new(
                JOB_SEARCH_CLARIFY,
                Payload::Jobs {
                    jobs: vec![],
                    total_count: 0,
                    total_matches: 0,
                },
            ));
        }

        let total_matches = matches.len();
        matches.truncate(MAX_JOBS_SHOWN);

        let mut msg = format!("I found {} relevant job opportunities", matches.len());
        if let Some(role) = &ctx.role {
            msg.push_str(&format!(" for {role} roles"));
        }
        if let Some(location) = &ctx.location {
            msg.push_str(&format!(" in {location}"));
        }
        msg.push_str(":\n\n");

        for (i, job) in matches.iter().enumerate() {
            msg.push_str(&format!("{}. **{}** at {}\n", i + 1, job.title, job.company));
            msg.push_str(&format!("   Location: {}\n", job.location));
            msg.push_str(&format!(
                "   Experience: {}\n",
                job.experience.as_deref().unwrap_or("N/A")
            ));
            msg.push_str(&format!("   Skills: {}\n\n", job.skills.join(", ")));
        }
        msg.push_str("Would you like me to provide more details about any of these positions or help you with the application process?");

        Ok(HandlerReply::new(
            msg,
            Payload::Jobs {
                total_count: matches.len(),
                total_matches,
                jobs: matches,
            },
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Salary
// ────────────────────────────────────────────────────────────────────────────

pub struct SalaryHandler;

const SALARY_CLARIFY: &str = "To provide accurate salary information, I need to know the role and location you're interested in. Could you specify what position and city you're asking about?";

#[async_trait]
impl IntentHandler for SalaryHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        let ctx = input.context;
        let (Some(role), Some(location)) = (ctx.role.as_deref(), ctx.location.as_deref()) else {
            return HandlerReply::text(SALARY_CLARIFY);
        };

        let prediction = match input
            .collaborators
            .salaries
            .predict(role, location, ctx.experience_years())
            .await
        {
            Ok(Some(prediction)) => prediction,
            Ok(None) => return HandlerReply::text(SALARY_CLARIFY),
            Err(e) => {
                error!("Salary query error: {e}");
                return HandlerReply::degraded(
                    "I'm having trouble accessing salary data right now.",
                    e,
                );
            }
        };

        let insights = match input.collaborators.market.insights(role, location).await {
            Ok(insights) => insights,
            Err(e) => {
                warn!("Market insights unavailable for {role} in {location}: {e}");
                None
            }
        };

        let mut msg = format!("Based on current market data for {role} in {location}:\n\n");
        msg.push_str(&format!(
            "**Estimated Salary Range:** ₹{} - ₹{} per year\n",
            prediction.min_salary, prediction.max_salary
        ));
        msg.push_str(&format!("**Median Salary:** ₹{} per year\n", prediction.median_salary));
        msg.push_str(&format!(
            "**Experience Level:** {}\n\n",
            ctx.experience.map(|b| b.label()).unwrap_or("Not specified")
        ));

        if let Some(insights) = &insights {
            msg.push_str("**Market Insights:**\n");
            for trend in insights.trends.iter().take(MAX_TRENDS_SHOWN) {
                msg.push_str(&format!("• {trend}\n"));
            }
        }

        HandlerReply::new(
            msg,
            Payload::Salary {
                salary_prediction: prediction,
                market_insights: insights,
            },
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

pub struct ResumeHandler;

const RESUME_UPLOAD_PROMPT: &str = "I can help you review and optimize your resume! Please upload your resume or share your key details like skills, experience, and target roles for personalized feedback.";
const RESUME_GUIDANCE: &str = "I can help you with resume building, ATS optimization, and personalized feedback. Would you like me to review your existing resume or help you create a new one?";

#[async_trait]
impl IntentHandler for ResumeHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        let wants_review = input.message.contains("review") || input.message.contains("feedback");
        if !wants_review {
            return HandlerReply::text(RESUME_GUIDANCE);
        }

        let Some(resume_text) = input.profile().await.and_then(|p| p.resume_text) else {
            return HandlerReply::new(
                RESUME_UPLOAD_PROMPT,
                Payload::Resume {
                    can_analyze: false,
                    analysis: None,
                },
            );
        };

        match input.collaborators.resumes.analyze(&resume_text).await {
            Ok(analysis) => {
                let mut msg = String::from("Based on your resume analysis:\n\n");
                msg.push_str(&format!("**ATS Score:** {}/100\n", analysis.ats_score));
                msg.push_str(&format!("**Key Strengths:** {}\n", join_set(&analysis.strengths)));
                msg.push_str(&format!(
                    "**Areas for Improvement:** {}\n\n",
                    join_set(&analysis.improvements)
                ));
                msg.push_str("Would you like specific suggestions for improvement?");
                HandlerReply::new(
                    msg,
                    Payload::Resume {
                        can_analyze: true,
                        analysis: Some(analysis),
                    },
                )
            }
            Err(e) => {
                error!("Resume query error: {e}");
                HandlerReply::degraded(
                    "I'm having trouble accessing resume analysis tools right now.",
                    e,
                )
            }
        }
    }
}

fn join_set(items: &std::collections::BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Interview
// ────────────────────────────────────────────────────────────────────────────

pub struct InterviewHandler;

const INTERVIEW_PROMPT: &str = "I can help you with interview preparation! Could you specify the company or role you're preparing for? I can provide technical questions, behavioral questions, and company-specific tips.";
const INTERVIEW_FALLBACK: &str = "I can provide general interview preparation tips. For technical roles, focus on data structures and algorithms. For behavioral interviews, prepare STAR method examples.";

#[async_trait]
impl IntentHandler for InterviewHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        let company = input.context.company.as_deref();
        let role = input.context.role.as_deref();

        let questions = match input
            .collaborators
            .interviews
            .find(company, role, MAX_INTERVIEW_QUESTIONS)
            .await
        {
            Ok(questions) => questions,
            Err(e) => {
                error!("Interview query error: {e}");
                return HandlerReply::degraded(INTERVIEW_FALLBACK, e);
            }
        };

        if questions.is_empty() {
            return HandlerReply::text(INTERVIEW_PROMPT);
        }

        let mut msg = String::from("Here are some interview questions");
        if let Some(company) = company {
            msg.push_str(&format!(" for {company}"));
        }
        if let Some(role) = role {
            msg.push_str(&format!(" for {role} roles"));
        }
        msg.push_str(":\n\n");
        for (i, q) in questions.iter().enumerate() {
            msg.push_str(&format!("{}. {}\n", i + 1, q.question));
            if let Some(kind) = &q.question_type {
                msg.push_str(&format!("   Type: {kind}\n"));
            }
            msg.push('\n');
        }

        HandlerReply::new(
            msg,
            Payload::InterviewQuestions {
                total_questions: questions.len(),
                questions,
            },
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Company research
// ────────────────────────────────────────────────────────────────────────────

pub struct CompanyResearchHandler;

const COMPANY_PROMPT: &str = "I can help you research companies! Please specify which company you're interested in, and I'll provide information about their culture, benefits, work environment, and reviews.";

#[async_trait]
impl IntentHandler for CompanyResearchHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        let Some(name) = input.context.company.as_deref() else {
            return HandlerReply::text(COMPANY_PROMPT);
        };

        let company = match input.collaborators.companies.find_by_name(name).await {
            Ok(Some(company)) => company,
            Ok(None) => return HandlerReply::text(COMPANY_PROMPT),
            Err(e) => {
                error!("Company query error: {e}");
                return HandlerReply::degraded(
                    "I'm having trouble accessing company data right now.",
                    e,
                );
            }
        };

        let mut msg = format!("Here's what I found about {}:\n\n", company.name);
        msg.push_str(&format!("**Industry:** {}\n", or_na(&company.industry)));
        msg.push_str(&format!("**Size:** {} employees\n", or_na(&company.size)));
        msg.push_str(&format!("**Location:** {}\n\n", or_na(&company.headquarters)));

        if !company.culture.is_empty() {
            msg.push_str("**Company Culture:**\n");
            for aspect in company.culture.iter().take(MAX_CULTURE_NOTES) {
                msg.push_str(&format!("• {aspect}\n"));
            }
        }
        if !company.benefits.is_empty() {
            msg.push_str("\n**Key Benefits:**\n");
            for benefit in company.benefits.iter().take(MAX_BENEFITS) {
                msg.push_str(&format!("• {benefit}\n"));
            }
        }

        HandlerReply::new(msg, Payload::Company { company })
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

// ────────────────────────────────────────────────────────────────────────────
// Career growth
// ────────────────────────────────────────────────────────────────────────────

pub struct CareerGrowthHandler;

const CAREER_PROMPT: &str = "I can help you plan your career growth! Could you tell me your current role and what kind of career direction you're interested in? I can suggest skills to learn, potential career paths, and growth opportunities.";
const CAREER_FALLBACK: &str = "For career growth, focus on continuous learning, networking, and taking on challenging projects.";

#[async_trait]
impl IntentHandler for CareerGrowthHandler {
    async fn handle(&self, input: &HandlerInput<'_>) -> HandlerReply {
        let current_role = match &input.context.role {
            Some(role) => Some(role.clone()),
            None => input.profile().await.and_then(|p| p.current_role),
        };
        let Some(current_role) = current_role else {
            return HandlerReply::text(CAREER_PROMPT);
        };

        let path = match input
            .collaborators
            .career_paths
            .find_by_current_role(&current_role)
            .await
        {
            Ok(Some(path)) => path,
            Ok(None) => return HandlerReply::text(CAREER_PROMPT),
            Err(e) => {
                error!("Career growth query error: {e}");
                return HandlerReply::degraded(CAREER_FALLBACK, e);
            }
        };

        let mut msg = format!(
            "Based on your current role as {current_role}, here are potential career growth paths:\n\n"
        );
        msg.push_str("**Next Steps:**\n");
        for step in path.next_roles.iter().take(MAX_NEXT_ROLES) {
            msg.push_str(&format!("• {step}\n"));
        }
        msg.push_str("\n**Recommended Skills to Learn:**\n");
        for skill in path.skills_to_learn.iter().take(MAX_SKILLS_TO_LEARN) {
            msg.push_str(&format!("• {skill}\n"));
        }
        if let Some(timeline) = &path.timeline {
            msg.push_str(&format!("\n**Typical Timeline:** {timeline}\n"));
        }

        HandlerReply::new(msg, Payload::CareerPath { career_path: path })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// General
// ────────────────────────────────────────────────────────────────────────────

pub struct GeneralHandler;

pub const CAPABILITY_SUMMARY: &str = "I'm here to help you with your career journey in India! I can assist with:\n\n\
• **Job Search**: Finding opportunities, company research, application strategies\n\
• **Salary Insights**: Market rates, compensation analysis, negotiation tips\n\
• **Resume Help**: ATS optimization, review, and building guidance\n\
• **Interview Prep**: Technical and behavioral question practice\n\
• **Company Research**: Culture, benefits, work environment insights\n\
• **Career Growth**: Skill development, career path planning\n\n\
What specific area would you like help with today?";

#[async_trait]
impl IntentHandler for GeneralHandler {
    async fn handle(&self, _input: &HandlerInput<'_>) -> HandlerReply {
        HandlerReply::text(CAPABILITY_SUMMARY)
    }
}
