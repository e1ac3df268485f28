//! Action Classifier: maps one trainee utterance to a set of behavioural action tags.
//!
//! Classification is keyword and pattern matching over a fixed cue table. It is pure and
//! total: unmatched text yields an empty set. Single words match on word boundaries so that
//! e.g. "diet" never reads as "die".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of tags detected in one utterance. Ordered so that history and logs are reproducible.
pub type ActionSet = BTreeSet<ActionTag>;

/// Minimum utterance length (chars) before question-form cues are considered.
pub const MIN_QUESTION_CHARS: usize = 10;

/// Behavioural action observed in a trainee turn.
///
/// Serialized as its snake_case name. Names outside the vocabulary round-trip through
/// `Unknown` and have no effect on affect or objectives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionTag {
    ReflectiveListening,
    EmpatheticResponse,
    PersonalConnection,
    OpenQuestion,
    ClosedQuestion,
    ProbingQuestion,
    ClarifyingQuestion,
    AddressingObjection,
    ClearExplanation,
    Patience,
    JargonUsage,
    Interruption,
    IgnoredConcern,
    ConfusingExplanation,
    DismissingConcern,
    Rushing,
    Pressure,
    InappropriateLanguage,
    Profanity,
    Insult,
    ThreateningLanguage,
    DismissiveTone,
    UnprofessionalComment,
    JudgmentalComment,
    PersonalQuestion,
    OffensiveAssumption,
    Unknown(String),
}

impl ActionTag {
    /// Every known tag, in declaration order.
    pub const KNOWN: &'static [ActionTag] = &[
        ActionTag::ReflectiveListening,
        ActionTag::EmpatheticResponse,
        ActionTag::PersonalConnection,
        ActionTag::OpenQuestion,
        ActionTag::ClosedQuestion,
        ActionTag::ProbingQuestion,
        ActionTag::ClarifyingQuestion,
        ActionTag::AddressingObjection,
        ActionTag::ClearExplanation,
        ActionTag::Patience,
        ActionTag::JargonUsage,
        ActionTag::Interruption,
        ActionTag::IgnoredConcern,
        ActionTag::ConfusingExplanation,
        ActionTag::DismissingConcern,
        ActionTag::Rushing,
        ActionTag::Pressure,
        ActionTag::InappropriateLanguage,
        ActionTag::Profanity,
        ActionTag::Insult,
        ActionTag::ThreateningLanguage,
        ActionTag::DismissiveTone,
        ActionTag::UnprofessionalComment,
        ActionTag::JudgmentalComment,
        ActionTag::PersonalQuestion,
        ActionTag::OffensiveAssumption,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActionTag::ReflectiveListening => "reflective_listening",
            ActionTag::EmpatheticResponse => "empathetic_response",
            ActionTag::PersonalConnection => "personal_connection",
            ActionTag::OpenQuestion => "open_question",
            ActionTag::ClosedQuestion => "closed_question",
            ActionTag::ProbingQuestion => "probing_question",
            ActionTag::ClarifyingQuestion => "clarifying_question",
            ActionTag::AddressingObjection => "addressing_objection",
            ActionTag::ClearExplanation => "clear_explanation",
            ActionTag::Patience => "patience",
            ActionTag::JargonUsage => "jargon_usage",
            ActionTag::Interruption => "interruption",
            ActionTag::IgnoredConcern => "ignored_concern",
            ActionTag::ConfusingExplanation => "confusing_explanation",
            ActionTag::DismissingConcern => "dismissing_concern",
            ActionTag::Rushing => "rushing",
            ActionTag::Pressure => "pressure",
            ActionTag::InappropriateLanguage => "inappropriate_language",
            ActionTag::Profanity => "profanity",
            ActionTag::Insult => "insult",
            ActionTag::ThreateningLanguage => "threatening_language",
            ActionTag::DismissiveTone => "dismissive_tone",
            ActionTag::UnprofessionalComment => "unprofessional_comment",
            ActionTag::JudgmentalComment => "judgmental_comment",
            ActionTag::PersonalQuestion => "personal_question",
            ActionTag::OffensiveAssumption => "offensive_assumption",
            ActionTag::Unknown(s) => s.as_str(),
        }
    }

    /// Parses a tag name. Never fails; unrecognised names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase();
        Self::KNOWN
            .iter()
            .find(|t| t.as_str() == key)
            .cloned()
            .unwrap_or(ActionTag::Unknown(key))
    }

    /// Rapport-building behaviour.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            ActionTag::ReflectiveListening
                | ActionTag::EmpatheticResponse
                | ActionTag::PersonalConnection
                | ActionTag::OpenQuestion
                | ActionTag::ProbingQuestion
                | ActionTag::ClarifyingQuestion
                | ActionTag::AddressingObjection
                | ActionTag::ClearExplanation
                | ActionTag::Patience
        )
    }

    /// Rude or disrespectful conduct. Counts toward repeat-offense escalation.
    pub fn is_disrespect(&self) -> bool {
        matches!(
            self,
            ActionTag::InappropriateLanguage
                | ActionTag::Profanity
                | ActionTag::Insult
                | ActionTag::ThreateningLanguage
                | ActionTag::DismissiveTone
                | ActionTag::UnprofessionalComment
                | ActionTag::JudgmentalComment
                | ActionTag::PersonalQuestion
                | ActionTag::OffensiveAssumption
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ActionTag::Unknown(_))
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ActionTag {
    fn from(s: String) -> Self {
        ActionTag::parse(&s)
    }
}

impl From<ActionTag> for String {
    fn from(t: ActionTag) -> Self {
        t.as_str().to_string()
    }
}

// --- Cue tables ----------------------------------------------------------------------------

const REFLECTIVE_PHRASES: &[&str] = &[
    "i hear you saying",
    "it sounds like",
    "what i'm hearing is",
    "you seem to be feeling",
    "so you're saying",
    "if i'm hearing you right",
];

const ACKNOWLEDGEMENT_STEMS: &[&str] = &[
    "sounds like",
    "seems like",
    "it seems",
    "you mentioned",
    "you said",
    "i hear that",
    "i'm hearing",
];

const FEELING_WORDS: &[&str] = &[
    "feel", "feeling", "feelings", "worried", "worry", "concerned", "anxious", "nervous",
    "frustrated", "overwhelmed", "stressed", "excited", "uncertain", "unsure", "scared",
    "afraid", "upset", "uneasy",
];

const EMPATHY_PHRASES: &[&str] = &[
    "understand your concern",
    "i can see why you",
    "that must be",
    "i appreciate your",
    "thank you for sharing",
    "that sounds difficult",
    "that sounds hard",
];

const PERSONAL_CONNECTION_PHRASES: &[&str] = &[
    "similar experience",
    "i've worked with clients who",
    "i went through",
    "in my own family",
];

const OPEN_STEMS: &[&str] = &["what", "how", "why"];

const OPEN_PHRASES: &[&str] = &["tell me about", "walk me through", "describe", "explain"];

const CLOSED_STEMS: &[&str] = &[
    "do you", "are you", "will you", "have you", "can you", "would you", "did you", "is it",
    "is that", "could you",
];

const PROBING_PHRASES: &[&str] = &[
    "tell me more",
    "can you elaborate",
    "could you elaborate",
    "what else",
    "how long have you",
    "what led you",
    "what's behind",
    "what made you",
    "how did that",
    "what happened next",
];

const CLARIFYING_PHRASES: &[&str] = &[
    "do you mean",
    "just to clarify",
    "to make sure i understand",
    "when you say",
    "did i understand",
    "are you saying",
    "if i understand correctly",
    "correct me if",
];

const CONCERN_WORDS: &[&str] = &[
    "concern", "concerns", "concerned", "worried", "worry", "worries", "objection", "hesitant",
    "hesitation", "expensive", "cost", "costs", "afford", "risk", "risky", "skeptical",
];

const VALIDATING_PHRASES: &[&str] = &[
    "i understand",
    "that's a valid",
    "that's a fair",
    "that's a great question",
    "great question",
    "good point",
    "fair point",
    "i hear you",
    "makes sense",
    "i appreciate",
    "completely understandable",
    "you're right to",
];

const CLEAR_EXPLANATION_PHRASES: &[&str] = &[
    "in other words",
    "simply put",
    "to put it simply",
    "for example",
    "what this means",
    "let me explain",
    "here's how it works",
    "the way it works",
    "think of it like",
];

const PATIENCE_PHRASES: &[&str] = &[
    "take your time",
    "no rush",
    "whenever you're ready",
    "no pressure",
    "there's no hurry",
];

const JARGON_TERMS: &[&str] = &[
    "amortization",
    "annuitization",
    "basis points",
    "beta",
    "capital gains",
    "diversification",
    "fiduciary",
    "liquidity",
    "portfolio",
    "rebalancing",
    "tax-loss harvesting",
    "volatility",
];

const DISMISSING_CONCERN_PHRASES: &[&str] = &[
    "not a big deal",
    "you're overthinking",
    "nothing to worry about",
    "don't worry about it",
    "that doesn't matter",
    "you're overreacting",
];

const RUSHING_PHRASES: &[&str] = &[
    "hurry up",
    "make it quick",
    "short on time",
    "skip ahead",
    "in a hurry",
    "let's speed this up",
];

const PRESSURE_PHRASES: &[&str] = &[
    "sign today",
    "sign here",
    "limited time",
    "act now",
    "you need to decide",
    "before it's too late",
    "only today",
    "don't miss out",
    "offer expires",
];

const INAPPROPRIATE_TERMS: &[&str] = &[
    "stupid", "idiot", "dumb", "moron", "fool", "ridiculous", "waste of time", "shut up",
    "don't care", "whatever",
];

const PROFANITY_TERMS: &[&str] = &["fuck", "fucking", "shit", "damn", "crap", "hell"];

const INSULT_TERMS: &[&str] = &[
    "bitch", "asshole", "bastard", "jerk", "loser", "pathetic", "worthless", "useless",
    "incompetent",
];

const THREAT_TERMS: &[&str] = &[
    "won't make it", "die", "kill", "pay for this", "sorry you", "teach you", "learn your lesson",
];

/// Words an advisor also uses for markets and plans. Threatening only next to a [`THREAT_COCUES`] hit.
const CONDITIONAL_THREAT_TERMS: &[&str] = &["hurt", "suffer", "regret", "lesson"];

const THREAT_COCUES: &[&str] = &[
    "you'll", "you will", "you're going to", "you are going to", "i'll make", "i will make",
    "make you", "or else",
];

const DISMISSIVE_TERMS: &[&str] = &[
    "whatever", "don't care", "not my problem", "figure it out", "not my job", "just do it",
    "get over it", "just move on", "move on already", "you need to move on",
    "you should move on", "so what",
];

const JUDGMENTAL_TERMS: &[&str] = &[
    "crazy", "weird", "strange", "odd", "why would you", "that's a bad idea", "shouldn't have",
    "bad choice", "poor decision",
];

const INTRUSIVE_QUESTION_TERMS: &[&str] = &[
    "why don't you", "why can't you", "why haven't you", "why would you", "can't you just",
    "couldn't you", "shouldn't you",
];

const OFFENSIVE_ASSUMPTION_TERMS: &[&str] = &[
    "you people", "your kind", "all of you", "you must be", "you obviously", "clearly you",
    "of course you would", "how typical", "so typical", "typical of you", "typical of your",
    "you're typical",
];

const MORTALITY_TERMS: &[&str] = &[
    "die", "death", "won't make it", "won't survive", "how long you have left",
    "how long will you live", "live much longer", "live long enough",
];

const ADOPTION_TERMS: &[&str] = &["adopt", "adopted", "adopting", "adoption"];

const ADOPTION_JUDGEMENT_TERMS: &[&str] =
    &["why", "instead", "own kids", "real kids", "your own", "crazy", "weird"];

/// Word-boundary matcher over a term list. Falls back to substring search if the pattern
/// cannot be compiled.
struct Cue {
    pattern: Option<Regex>,
    terms: &'static [&'static str],
}

impl Cue {
    fn new(terms: &'static [&'static str]) -> Self {
        let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        Self {
            pattern: Regex::new(&format!(r"\b(?:{})\b", alternation)).ok(),
            terms,
        }
    }

    fn matches(&self, lower: &str) -> bool {
        match &self.pattern {
            Some(re) => re.is_match(lower),
            None => self.terms.iter().any(|t| lower.contains(t)),
        }
    }
}

struct CueTable {
    reflective: Cue,
    acknowledgement: Cue,
    feeling: Cue,
    empathy: Cue,
    personal_connection: Cue,
    open_phrases: Cue,
    probing: Cue,
    clarifying: Cue,
    concern: Cue,
    validating: Cue,
    clear_explanation: Cue,
    patience: Cue,
    jargon: Cue,
    dismissing_concern: Cue,
    rushing: Cue,
    pressure: Cue,
    inappropriate: Cue,
    profanity: Cue,
    insult: Cue,
    threat: Cue,
    conditional_threat: Cue,
    threat_cocue: Cue,
    dismissive: Cue,
    judgmental: Cue,
    intrusive: Cue,
    offensive: Cue,
    mortality: Cue,
    adoption: Cue,
    adoption_judgement: Cue,
}

static CUES: Lazy<CueTable> = Lazy::new(|| CueTable {
    reflective: Cue::new(REFLECTIVE_PHRASES),
    acknowledgement: Cue::new(ACKNOWLEDGEMENT_STEMS),
    feeling: Cue::new(FEELING_WORDS),
    empathy: Cue::new(EMPATHY_PHRASES),
    personal_connection: Cue::new(PERSONAL_CONNECTION_PHRASES),
    open_phrases: Cue::new(OPEN_PHRASES),
    probing: Cue::new(PROBING_PHRASES),
    clarifying: Cue::new(CLARIFYING_PHRASES),
    concern: Cue::new(CONCERN_WORDS),
    validating: Cue::new(VALIDATING_PHRASES),
    clear_explanation: Cue::new(CLEAR_EXPLANATION_PHRASES),
    patience: Cue::new(PATIENCE_PHRASES),
    jargon: Cue::new(JARGON_TERMS),
    dismissing_concern: Cue::new(DISMISSING_CONCERN_PHRASES),
    rushing: Cue::new(RUSHING_PHRASES),
    pressure: Cue::new(PRESSURE_PHRASES),
    inappropriate: Cue::new(INAPPROPRIATE_TERMS),
    profanity: Cue::new(PROFANITY_TERMS),
    insult: Cue::new(INSULT_TERMS),
    threat: Cue::new(THREAT_TERMS),
    conditional_threat: Cue::new(CONDITIONAL_THREAT_TERMS),
    threat_cocue: Cue::new(THREAT_COCUES),
    dismissive: Cue::new(DISMISSIVE_TERMS),
    judgmental: Cue::new(JUDGMENTAL_TERMS),
    intrusive: Cue::new(INTRUSIVE_QUESTION_TERMS),
    offensive: Cue::new(OFFENSIVE_ASSUMPTION_TERMS),
    mortality: Cue::new(MORTALITY_TERMS),
    adoption: Cue::new(ADOPTION_TERMS),
    adoption_judgement: Cue::new(ADOPTION_JUDGEMENT_TERMS),
});

/// Lowercases and folds typographic apostrophes so cue phrases match pasted text.
fn normalize(utterance: &str) -> String {
    utterance.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Question sentences in the utterance: each segment ending in `?`, trimmed back to the
/// start of its own sentence.
fn question_sentences(lower: &str) -> impl Iterator<Item = &str> {
    lower
        .split_inclusive('?')
        .filter(|seg| seg.ends_with('?'))
        .map(|seg| {
            let start = seg.rfind(['.', '!', '\n']).map(|i| i + 1).unwrap_or(0);
            seg[start..].trim()
        })
}

fn starts_with_stem(sentence: &str, stems: &[&str]) -> bool {
    stems.iter().any(|stem| {
        sentence
            .strip_prefix(stem)
            .map(|rest| rest.chars().next().map_or(true, |c| !c.is_alphanumeric()))
            .unwrap_or(false)
    })
}

/// Classifies a single trainee utterance. Pure and total.
pub fn classify(utterance: &str) -> ActionSet {
    let lower = normalize(utterance);
    let cues = &*CUES;
    let mut tags = ActionSet::new();

    if cues.reflective.matches(&lower)
        || (cues.acknowledgement.matches(&lower) && cues.feeling.matches(&lower))
    {
        tags.insert(ActionTag::ReflectiveListening);
    }

    if lower.chars().count() >= MIN_QUESTION_CHARS {
        for sentence in question_sentences(&lower) {
            if cues.open_phrases.matches(sentence) || starts_with_stem(sentence, OPEN_STEMS) {
                tags.insert(ActionTag::OpenQuestion);
            } else if starts_with_stem(sentence, CLOSED_STEMS) {
                tags.insert(ActionTag::ClosedQuestion);
            }
        }
    }

    if cues.probing.matches(&lower) {
        tags.insert(ActionTag::ProbingQuestion);
    }
    if cues.clarifying.matches(&lower) {
        tags.insert(ActionTag::ClarifyingQuestion);
    }
    if cues.empathy.matches(&lower) {
        tags.insert(ActionTag::EmpatheticResponse);
    }
    if cues.personal_connection.matches(&lower)
        || (lower.contains("like you") && lower.contains("many"))
    {
        tags.insert(ActionTag::PersonalConnection);
    }
    if cues.concern.matches(&lower) && cues.validating.matches(&lower) {
        tags.insert(ActionTag::AddressingObjection);
    }
    if cues.clear_explanation.matches(&lower) {
        tags.insert(ActionTag::ClearExplanation);
    }
    if cues.patience.matches(&lower) {
        tags.insert(ActionTag::Patience);
    }
    if cues.jargon.matches(&lower) {
        tags.insert(ActionTag::JargonUsage);
    }
    if cues.dismissing_concern.matches(&lower) {
        tags.insert(ActionTag::DismissingConcern);
    }
    if cues.rushing.matches(&lower) {
        tags.insert(ActionTag::Rushing);
    }
    if cues.pressure.matches(&lower) {
        tags.insert(ActionTag::Pressure);
    }

    if cues.inappropriate.matches(&lower) {
        tags.insert(ActionTag::InappropriateLanguage);
    }
    if cues.profanity.matches(&lower) {
        tags.insert(ActionTag::Profanity);
    }
    if cues.insult.matches(&lower) {
        tags.insert(ActionTag::Insult);
    }
    if cues.threat.matches(&lower)
        || (cues.conditional_threat.matches(&lower) && cues.threat_cocue.matches(&lower))
    {
        tags.insert(ActionTag::ThreateningLanguage);
    }
    if cues.dismissive.matches(&lower) {
        tags.insert(ActionTag::DismissiveTone);
    }
    if cues.judgmental.matches(&lower) {
        tags.insert(ActionTag::JudgmentalComment);
    }
    if cues.intrusive.matches(&lower) {
        tags.insert(ActionTag::PersonalQuestion);
    }
    if cues.offensive.matches(&lower) {
        tags.insert(ActionTag::OffensiveAssumption);
    }
    if cues.adoption.matches(&lower) && cues.adoption_judgement.matches(&lower) {
        tags.insert(ActionTag::OffensiveAssumption);
        tags.insert(ActionTag::JudgmentalComment);
    }
    if cues.mortality.matches(&lower) {
        tags.insert(ActionTag::UnprofessionalComment);
    }

    if !tags.is_empty() {
        tracing::debug!(
            target: "parley::actions",
            count = tags.len(),
            tags = ?tags.iter().map(ActionTag::as_str).collect::<Vec<_>>(),
            "Classified trainee utterance"
        );
    }
    tags
}
