//! Intent Classifier: maps a lowercased message to exactly one [`Intent`].
//!
//! Categories are tried in declaration order and, inside a category, patterns
//! are tried in order. The first pattern that matches anywhere in the message
//! decides. Nothing matching yields [`Intent::General`].
//!
//! | Order | Intent             |
//! |-------|--------------------|
//! | 1     | `job_search`       |
//! | 2     | `salary`           |
//! | 3     | `resume`           |
//! | 4     | `interview`        |
//! | 5     | `company_research` |
//! | 6     | `career_growth`    |

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    JobSearch,
    Salary,
    Resume,
    Interview,
    CompanyResearch,
    CareerGrowth,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::JobSearch => "job_search",
            Intent::Salary => "salary",
            Intent::Resume => "resume",
            Intent::Interview => "interview",
            Intent::CompanyResearch => "company_research",
            Intent::CareerGrowth => "career_growth",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared category order and pattern order. This table is the tie-break.
const PATTERN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::JobSearch,
        &[
            r"(?:find|search|look.*for).*job",
            r"job.*(?:opportunities|openings|vacancies)",
            r"(?:hiring|recruitment).*assistance",
            r"career.*opportunities",
            r"help.*get.*job",
            r"applying.*jobs",
        ],
    ),
    (
        Intent::Salary,
        &[
            r"salary.*(?:range|expectation|negotiation)",
            r"how.*much.*should.*earn",
            r"compensation.*package",
            r"pay.*scale",
            r"ctc.*package",
            r"negotiate.*offer",
        ],
    ),
    (
        Intent::Resume,
        &[
            r"resume.*(?:help|review|build|improve)",
            r"cv.*feedback",
            r"ats.*friendly",
            r"resume.*tips",
            r"how.*write.*resume",
            r"resume.*format",
        ],
    ),
    (
        Intent::Interview,
        &[
            r"interview.*(?:preparation|tips|questions)",
            r"how.*prepare.*interview",
            r"technical.*interview",
            r"hr.*round",
            r"behavioral.*questions",
            r"company.*interview",
        ],
    ),
    (
        Intent::CompanyResearch,
        &[
            r"company.*(?:culture|review|environment)",
            r"work.*life.*balance",
            r"best.*companies",
            r"women.*friendly",
            r"maternity.*policies",
            r"work.*culture",
        ],
    ),
    (
        Intent::CareerGrowth,
        &[
            r"career.*(?:growth|development|advancement)",
            r"skill.*development",
            r"promotion.*opportunities",
            r"upskill.*learn",
            r"career.*change",
            r"next.*career.*step",
        ],
    ),
];

static COMPILED: LazyLock<Vec<(Intent, Vec<Regex>)>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(intent, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .expect("intent patterns are static and valid")
                })
                .collect();
            (*intent, compiled)
        })
        .collect()
});

/// Returns the intent of the first matching pattern in the first matching category.
pub fn classify(message: &str) -> Intent {
    COMPILED
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(message)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_only_message() {
        assert_eq!(classify("what is the salary range for a data analyst"), Intent::Salary);
        assert_eq!(classify("how much should i earn as a fresher"), Intent::Salary);
        assert_eq!(classify("help me negotiate this offer"), Intent::Salary);
    }

    #[test]
    fn test_job_search_wins_over_salary_by_declaration_order() {
        let msg = "find jobs with a good salary range";
        assert_eq!(classify(msg), Intent::JobSearch);
    }

    #[test]
    fn test_resume_patterns() {
        assert_eq!(classify("can you review my resume help"), Intent::Resume);
        assert_eq!(classify("need cv feedback"), Intent::Resume);
        assert_eq!(classify("is my resume ats friendly"), Intent::Resume);
    }

    #[test]
    fn test_interview_patterns() {
        assert_eq!(classify("how do i prepare for an interview"), Intent::Interview);
        assert_eq!(classify("tips for the hr round"), Intent::Interview);
    }

    #[test]
    fn test_company_research_patterns() {
        assert_eq!(classify("which firms have good work life balance"), Intent::CompanyResearch);
        assert_eq!(classify("maternity policies at startups"), Intent::CompanyResearch);
    }

    #[test]
    fn test_career_growth_patterns() {
        assert_eq!(classify("what is my next career step"), Intent::CareerGrowth);
        assert_eq!(classify("i want a career change"), Intent::CareerGrowth);
    }

    #[test]
    fn test_first_category_wins_over_later_category() {
        // Matches interview ("company.*interview") and company_research
        // ("company.*culture"); interview is declared earlier.
        assert_eq!(
            classify("company culture and company interview process"),
            Intent::Interview
        );
    }

    #[test]
    fn test_unmatched_message_is_general() {
        assert_eq!(classify("hello there"), Intent::General);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("SALARY RANGE please"), Intent::Salary);
    }

    #[test]
    fn test_intent_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Intent::CompanyResearch).unwrap();
        assert_eq!(json, "\"company_research\"");
        let back: Intent = serde_json::from_str("\"career_growth\"").unwrap();
        assert_eq!(back, Intent::CareerGrowth);
        assert_eq!(Intent::CareerGrowth.to_string(), "career_growth");
    }
}
