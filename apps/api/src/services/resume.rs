//! Heuristic ATS scoring for stored resume text. Pure, no I/O.
//!
//! Score breakdown (out of 100):
//! - sections: experience 15, skills 15, education 10, projects 5
//! - contact details: 10
//! - quantified bullets: up to 20, proportional
//! - strong action verbs: 15 for three or more, 8 for one or two
//! - length between 200 and 900 words: 10

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::chat::collaborators::{ResumeAnalysis, ResumeAnalyzer};
use crate::errors::AppError;

const SECTIONS: &[(&str, u32, &str)] = &[
    ("experience", 15, "Work experience section"),
    ("skills", 15, "Dedicated skills section"),
    ("education", 10, "Education section"),
    ("project", 5, "Projects section"),
];

const ACTION_VERBS: &[&str] = &[
    "led",
    "built",
    "designed",
    "implemented",
    "launched",
    "reduced",
    "increased",
    "optimized",
    "delivered",
    "automated",
    "migrated",
    "mentored",
];

const VAGUE_VERBS: &[&str] = &[
    "helped",
    "worked on",
    "assisted",
    "participated",
    "involved in",
    "responsible for",
];

const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 900;

pub struct HeuristicResumeAnalyzer;

#[async_trait]
impl ResumeAnalyzer for HeuristicResumeAnalyzer {
    async fn analyze(&self, resume_text: &str) -> Result<ResumeAnalysis, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation("Resume text is empty".to_string()));
        }
        Ok(score_resume(resume_text))
    }
}

pub fn score_resume(text: &str) -> ResumeAnalysis {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let mut score = 0u32;
    let mut strengths = BTreeSet::new();
    let mut improvements = BTreeSet::new();

    for (keyword, points, label) in SECTIONS {
        if lower.contains(keyword) {
            score += points;
            strengths.insert(label.to_string());
        } else {
            improvements.insert(format!("Add a clear {keyword} section"));
        }
    }

    let has_email = words.iter().any(|w| w.contains('@') && w.contains('.'));
    let has_phone = text.chars().filter(|c| c.is_ascii_digit()).count() >= 10;
    if has_email && has_phone {
        score += 10;
        strengths.insert("Complete contact details".to_string());
    } else {
        improvements.insert("Include both an email address and a phone number".to_string());
    }

    let bullets = bullet_lines(text);
    if !bullets.is_empty() {
        let quantified = bullets.iter().filter(|b| is_quantified(b)).count();
        score += (quantified * 20 / bullets.len()) as u32;
        if quantified * 2 >= bullets.len() {
            strengths.insert("Quantified achievements".to_string());
        } else {
            improvements.insert("Quantify more achievements with numbers or percentages".to_string());
        }
    } else {
        improvements.insert("Use bullet points to describe your impact".to_string());
    }

    let verb_hits = ACTION_VERBS
        .iter()
        .filter(|v| words.iter().any(|w| w.trim_matches(|c: char| !c.is_alphanumeric()) == **v))
        .count();
    match verb_hits {
        0 => {
            improvements.insert("Start bullets with strong action verbs".to_string());
        }
        1 | 2 => {
            score += 8;
            improvements.insert("Vary your action verbs".to_string());
        }
        _ => {
            score += 15;
            strengths.insert("Strong action verbs".to_string());
        }
    }

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
        improvements.insert(format!("Replace vague phrasing like '{vague}' with concrete outcomes"));
    }

    if (MIN_WORDS..=MAX_WORDS).contains(&words.len()) {
        score += 10;
        strengths.insert("Appropriate length".to_string());
    } else if words.len() < MIN_WORDS {
        improvements.insert("Expand your resume with more detail".to_string());
    } else {
        improvements.insert("Trim your resume to the most relevant content".to_string());
    }

    ResumeAnalysis {
        ats_score: score.min(100),
        strengths,
        improvements,
    }
}

fn bullet_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.starts_with(['-', '*', '•']))
        .collect()
}

fn is_quantified(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit()) || line.contains('%') || line.contains('₹')
}
