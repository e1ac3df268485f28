//! Query Tier Classifier: decides how much structure a coaching answer needs.
//!
//! The heuristic is deterministic. For ambiguous (tier 3) questions that are still fairly short,
//! [`TierClassifier::classify`] may ask a completion service for a one-token verdict. That call
//! is bounded by a timeout and purely advisory; any failure keeps the heuristic tier.

use crate::completion::CompletionService;
use crate::config::TierConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const FACTUAL_INDICATORS: &[&str] = &[
    "what is",
    "explain",
    "difference between",
    "types of",
    "how does",
    "describe",
];

const COACHING_INDICATORS: &[&str] = &[
    "how do i",
    "what should i",
    "strategy for",
    "tips for",
    "handle",
    "respond to",
];

const FACTUAL_TOPICS: &[&str] = &["insurance", "policy", "annuity", "premium", "coverage", "rider"];

const COACHING_TOPICS: &[&str] = &["client", "objection", "recommend", "approach", "persuade", "rapport"];

const MULTI_PART_MARKERS: &[&str] = &[" and ", " or ", ","];

/// Points per matched indicator phrase.
const INDICATOR_WEIGHT: u32 = 2;
/// Points per matched topic keyword.
const TOPIC_WEIGHT: u32 = 1;
/// A score must exceed this to decide a tier.
const DECISIVE_SCORE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Short expert summary plus a client-friendly explanation.
    Factual = 1,
    /// Situation assessment and strategic coaching.
    Coaching = 2,
    /// Full structured answer.
    Comprehensive = 3,
}

impl Tier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tier::Factual),
            2 => Some(Tier::Coaching),
            3 => Some(Tier::Comprehensive),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Factual => "Factual Info",
            Tier::Coaching => "Coaching Advice",
            Tier::Comprehensive => "Comprehensive",
        }
    }

    /// Markdown skeleton the coaching answer should follow.
    pub fn response_template(self) -> &'static str {
        match self {
            Tier::Factual => {
                "## Expert Summary\n[Concise, accurate answer to the question]\n\n## Client-Friendly Explanation\n[The same information in plain language an advisor can repeat to a client]\n"
            }
            Tier::Coaching => {
                "## Situation Assessment\n[What is happening in the conversation and why it matters]\n\n## Strategic Coaching\n[Specific techniques and wording to use next]\n\n## Sample Questions\n- [Question the advisor can ask]\n- [Question the advisor can ask]\n"
            }
            Tier::Comprehensive => {
                "## Expert Information\n[Accurate technical detail]\n\n## Client-Friendly Explanation\n[Plain-language version for the client]\n\n## Sample Client Dialogue\nAdvisor: [...]\nClient: [...]\n\n## Recommended Next Steps\n1. [Step]\n2. [Step]\n\n## Key Questions to Ask\n- [Question]\n- [Question]\n"
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl From<Tier> for u8 {
    fn from(t: Tier) -> Self {
        t.as_u8()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Tier::from_u8(n).ok_or_else(|| format!("tier must be 1, 2 or 3 (got {})", n))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierClassification {
    pub tier: Tier,
    pub used_fallback: bool,
}

/// Keyword scores of a question, before any length shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierScores {
    pub factual: u32,
    pub coaching: u32,
    pub multi_part: bool,
}

impl TierScores {
    pub fn score(question: &str) -> Self {
        let q = question.trim().to_lowercase();
        let sum = |phrases: &[&str], weight: u32| -> u32 {
            phrases.iter().filter(|p| q.contains(*p)).count() as u32 * weight
        };
        Self {
            factual: sum(FACTUAL_INDICATORS, INDICATOR_WEIGHT) + sum(FACTUAL_TOPICS, TOPIC_WEIGHT),
            coaching: sum(COACHING_INDICATORS, INDICATOR_WEIGHT) + sum(COACHING_TOPICS, TOPIC_WEIGHT),
            multi_part: MULTI_PART_MARKERS.iter().any(|m| q.contains(m)),
        }
    }

    /// Multi-part questions are comprehensive regardless of scores; otherwise a clear,
    /// decisive lead picks the tier and anything else defaults to comprehensive.
    pub fn tier(&self) -> Tier {
        if self.multi_part {
            Tier::Comprehensive
        } else if self.factual > self.coaching && self.factual > DECISIVE_SCORE {
            Tier::Factual
        } else if self.coaching > self.factual && self.coaching > DECISIVE_SCORE {
            Tier::Coaching
        } else {
            Tier::Comprehensive
        }
    }
}

fn heuristic_tier(question: &str, config: &TierConfig) -> Tier {
    if question.trim().chars().count() < config.short_question_chars {
        return Tier::Factual;
    }
    TierScores::score(question).tier()
}

/// Heuristic classification with default thresholds. Never consults a completion service.
pub fn classify_tier(question: &str) -> TierClassification {
    TierClassification {
        tier: heuristic_tier(question, &TierConfig::default()),
        used_fallback: false,
    }
}

/// Prompt sent to the completion service for an ambiguous question.
pub fn fallback_prompt(question: &str) -> String {
    format!(
        "Classify the advisor's question as:\n1 = Factual Info, 2 = Coaching Advice, 3 = Comprehensive\n\nQuestion: \"{}\"\nRespond with only the number.",
        question
    )
}

/// Leading integer of the reply, if it names a tier.
pub fn parse_tier_reply(reply: &str) -> Option<Tier> {
    let digits: String = reply.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u8>().ok().and_then(Tier::from_u8)
}

/// Tier classifier with an optional completion-service fallback.
#[derive(Clone)]
pub struct TierClassifier {
    config: TierConfig,
    fallback: Option<Arc<dyn CompletionService>>,
}

impl TierClassifier {
    pub fn new(config: TierConfig) -> Self {
        Self {
            config,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, service: Arc<dyn CompletionService>) -> Self {
        self.fallback = Some(service);
        self
    }

    pub fn heuristic(&self, question: &str) -> Tier {
        heuristic_tier(question, &self.config)
    }

    fn fallback_eligible(&self, question: &str, tier: Tier) -> bool {
        self.config.fallback_enabled
            && tier == Tier::Comprehensive
            && question.chars().count() < self.config.fallback_max_chars
    }

    /// Classifies `question`, consulting the fallback service when the heuristic lands on
    /// tier 3 for a short-enough question. Lengths are measured after trimming. Timeouts, errors and unusable replies all keep the
    /// heuristic tier.
    pub async fn classify(&self, question: &str) -> TierClassification {
        let question = question.trim();
        let tier = self.heuristic(question);
        let heuristic = TierClassification {
            tier,
            used_fallback: false,
        };

        let Some(service) = self.fallback.as_ref().filter(|_| self.fallback_eligible(question, tier)) else {
            return heuristic;
        };

        let prompt = fallback_prompt(question);
        let call = service.complete(
            &prompt,
            self.config.fallback_max_tokens,
            self.config.fallback_temperature,
        );

        match tokio::time::timeout(self.config.fallback_timeout(), call).await {
            Ok(Ok(reply)) => match parse_tier_reply(&reply) {
                Some(tier) => {
                    tracing::debug!(
                        target: "parley::tier",
                        service = service.name(),
                        tier = tier.as_u8(),
                        "Fallback classification accepted"
                    );
                    TierClassification {
                        tier,
                        used_fallback: true,
                    }
                }
                None => {
                    tracing::warn!(
                        target: "parley::tier",
                        service = service.name(),
                        reply_len = reply.len(),
                        "Fallback reply was not a tier; keeping heuristic"
                    );
                    heuristic
                }
            },
            Ok(Err(e)) => {
                tracing::warn!(
                    target: "parley::tier",
                    service = service.name(),
                    error = %e,
                    "Fallback classification failed; keeping heuristic"
                );
                heuristic
            }
            Err(_) => {
                tracing::warn!(
                    target: "parley::tier",
                    service = service.name(),
                    timeout_ms = self.config.fallback_timeout_ms,
                    "Fallback classification timed out; keeping heuristic"
                );
                heuristic
            }
        }
    }
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new(TierConfig::default())
    }
}
