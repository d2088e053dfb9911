//! Fallback responder: canned replies for when no store is configured.

use async_trait::async_trait;
use uuid::Uuid;

use crate::chat::envelope::{HandlerReply, Payload, ResponseEnvelope};
use crate::chat::extract::{extract_experience, ExtractedContext};
use crate::chat::intent::Intent;
use crate::chat::service::{normalize_message, ChatResponder};
use crate::errors::AppError;

/// Keyword lists tried in order; the first list with a hit decides.
const KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::JobSearch, &["job", "career", "hiring", "opportunities"]),
    (Intent::Salary, &["salary", "pay", "compensation"]),
    (Intent::Resume, &["resume", "cv"]),
    (Intent::Interview, &["interview"]),
    (Intent::CompanyResearch, &["company", "organization"]),
    (Intent::CareerGrowth, &["growth", "promotion", "career"]),
];

pub fn keyword_intent(message: &str) -> Intent {
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| message.contains(w)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}

pub fn canned_reply(intent: Intent) -> &'static str {
    match intent {
        Intent::JobSearch => "I can help you find job opportunities! While I work on connecting to our job database, here are some general tips: Update your LinkedIn profile, network with professionals in your field, and check job portals like LinkedIn Jobs, Naukri.com, and Indeed for the latest openings in Indian tech companies.",
        Intent::Salary => "I can provide salary insights! For accurate salary information, I need access to our salary database. In the meantime, you can check platforms like Glassdoor, AmbitionBox, and LinkedIn Salary for compensation data specific to your role and location in India.",
        Intent::Resume => "I can help with resume optimization! Focus on quantifying your achievements, using action verbs, and tailoring your resume for each job application. When our database is available, I'll be able to provide more personalized feedback.",
        Intent::Interview => "I can assist with interview preparation! Practice common technical and behavioral questions. For technical roles, focus on data structures and algorithms. For behavioral interviews, use the STAR method (Situation, Task, Action, Result) to structure your answers.",
        Intent::CompanyResearch => "I can help research companies! While I work on connecting to our company database, you can research companies on platforms like Glassdoor, AmbitionBox, and LinkedIn for information about culture, benefits, and work environment.",
        Intent::CareerGrowth => "I can provide career growth advice! Focus on continuous learning, networking, and taking on challenging projects. Consider online courses, certifications, and mentorship opportunities to advance your career in the Indian tech industry.",
        Intent::General => "I'm here to help with your career journey in India! I can assist with job search strategies, resume building, interview preparation, salary research, and career growth planning. What specific area would you like help with today?",
    }
}

/// Store-free responder: keyword intent plus a fixed reply per intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackResponder;

#[async_trait]
impl ChatResponder for FallbackResponder {
    async fn process_message(
        &self,
        message: &str,
        _user_id: Option<Uuid>,
    ) -> Result<ResponseEnvelope, AppError> {
        let message = normalize_message(message)?;
        let intent = keyword_intent(&message);
        let context = ExtractedContext {
            experience: extract_experience(&message),
            ..Default::default()
        };
        let reply = HandlerReply::new(
            canned_reply(intent),
            Payload::Status {
                database_status: "offline".to_string(),
            },
        );
        Ok(ResponseEnvelope::assemble(intent, context, reply))
    }

    fn mode(&self) -> &'static str {
        "demo"
    }
}
