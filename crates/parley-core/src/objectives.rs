//! Objective Ratchet: training-objective scores that rise freely and fall only with a reason.
//!
//! Each objective keeps a high-water mark. An update at or above it always applies. An update
//! below it applies only when a non-empty reason accompanies it; otherwise it is ignored and
//! progress stays where it was. Completing an objective for the first time emits a single
//! [`RewardEvent`]. Inferred progress goes through [`ObjectiveBoard::raise`] instead, which can
//! only increase a score.

use crate::actions::{ActionSet, ActionTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub high_water_mark: u8,
    #[serde(default)]
    pub decrease_reason: Option<String>,
    pub xp_value: u32,
    #[serde(default)]
    pub completed: bool,
    /// Set once the completion reward has fired; never cleared.
    #[serde(default)]
    pub reward_claimed: bool,
}

/// XP award for completing an objective. The caller owns the XP ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub objective_id: String,
    pub xp: u32,
}

/// What an update did to an objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatchetOutcome {
    /// Score at or above the high-water mark was applied.
    Advanced { previous: u8, progress: u8 },
    /// Score below the high-water mark was applied with a reason.
    JustifiedDecrease { previous: u8, progress: u8, reason: String },
    /// Score below the high-water mark without a reason; progress kept.
    IgnoredDecrease { attempted: u8, progress: u8 },
    /// Score was NaN or infinite.
    InvalidScore,
    UnknownObjective,
}

impl RatchetOutcome {
    pub fn changed_progress(&self) -> bool {
        match self {
            RatchetOutcome::Advanced { previous, progress }
            | RatchetOutcome::JustifiedDecrease {
                previous, progress, ..
            } => previous != progress,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveUpdate {
    pub objective_id: String,
    pub display_name: String,
    pub outcome: RatchetOutcome,
    pub reward: Option<RewardEvent>,
}

/// Clamps a raw score to [0, 100] and rounds it. Non-finite scores are rejected.
pub fn clamp_score(score: f64) -> Option<u8> {
    if !score.is_finite() {
        return None;
    }
    Some(score.clamp(0.0, MAX_SCORE as f64).round() as u8)
}

impl Objective {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, xp_value: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            progress: 0,
            high_water_mark: 0,
            decrease_reason: None,
            xp_value,
            completed: false,
            reward_claimed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Applies one ratchet step.
    pub fn apply(&mut self, score: f64, reason: Option<&str>) -> (RatchetOutcome, Option<RewardEvent>) {
        let Some(score) = clamp_score(score) else {
            return (RatchetOutcome::InvalidScore, None);
        };
        let previous = self.progress;
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());

        let outcome = if score >= self.high_water_mark {
            self.progress = score;
            self.high_water_mark = self.high_water_mark.max(score);
            self.decrease_reason = None;
            RatchetOutcome::Advanced {
                previous,
                progress: score,
            }
        } else if let Some(reason) = reason {
            self.progress = score;
            self.decrease_reason = Some(reason.to_string());
            RatchetOutcome::JustifiedDecrease {
                previous,
                progress: score,
                reason: reason.to_string(),
            }
        } else {
            RatchetOutcome::IgnoredDecrease {
                attempted: score,
                progress: previous,
            }
        };

        (outcome, self.settle_reward())
    }

    /// Raises progress to `score` if that is higher; never lowers it. Used for inferred
    /// progress, which may climb back toward the high-water mark after a justified decrease.
    pub fn raise(&mut self, score: f64) -> (RatchetOutcome, Option<RewardEvent>) {
        let Some(score) = clamp_score(score) else {
            return (RatchetOutcome::InvalidScore, None);
        };
        let previous = self.progress;
        if score > self.progress {
            self.progress = score;
            self.high_water_mark = self.high_water_mark.max(score);
            if self.progress >= self.high_water_mark {
                self.decrease_reason = None;
            }
        }
        let outcome = RatchetOutcome::Advanced {
            previous,
            progress: self.progress,
        };
        (outcome, self.settle_reward())
    }

    fn settle_reward(&mut self) -> Option<RewardEvent> {
        self.completed = self.progress >= MAX_SCORE;
        if self.completed && !self.reward_claimed {
            self.reward_claimed = true;
            Some(RewardEvent {
                objective_id: self.id.clone(),
                xp: self.xp_value,
            })
        } else {
            None
        }
    }
}

// -----------------------------------------------------------------------------
// Progress payload
// -----------------------------------------------------------------------------

/// Structured progress report: `{ <objective>: number, decreaseReason?: { <objective>: string },
/// explanation?: string }`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub scores: BTreeMap<String, f64>,
    pub decrease_reasons: BTreeMap<String, String>,
    pub explanation: Option<String>,
    /// Fields dropped during parsing because they were not numeric.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl ProgressPayload {
    /// Lenient parse. Non-object input yields an empty payload.
    pub fn from_value(value: &Value) -> Self {
        let mut payload = Self::default();
        let Some(fields) = value.as_object() else {
            tracing::warn!(target: "parley::objectives", "Progress payload is not an object; ignoring");
            return payload;
        };

        for (key, field) in fields {
            match key.as_str() {
                "decreaseReason" => {
                    if let Some(reasons) = field.as_object() {
                        for (id, reason) in reasons {
                            if let Some(text) = reason.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                                payload.decrease_reasons.insert(id.clone(), text.to_string());
                            }
                        }
                    }
                }
                "explanation" => {
                    payload.explanation = field
                        .as_str()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                }
                _ => match field.as_f64() {
                    Some(score) => {
                        payload.scores.insert(key.clone(), score);
                    }
                    None => {
                        tracing::warn!(
                            target: "parley::objectives",
                            field = %key,
                            "Skipping non-numeric progress field"
                        );
                        payload.skipped.push(key.clone());
                    }
                },
            }
        }
        payload
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn with_score(mut self, id: impl Into<String>, score: f64) -> Self {
        self.scores.insert(id.into(), score);
        self
    }

    pub fn with_reason(mut self, id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.decrease_reasons.insert(id.into(), reason.into());
        self
    }
}

/// Result of applying a payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub updates: Vec<ObjectiveUpdate>,
    pub explanation: Option<String>,
}

impl BatchOutcome {
    pub fn rewards(&self) -> Vec<RewardEvent> {
        self.updates.iter().filter_map(|u| u.reward.clone()).collect()
    }

    /// Trainee-facing notices: the evaluator's explanation and any justified decreases.
    pub fn feedback_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if let Some(explanation) = &self.explanation {
            messages.push(format!("Advisor progress: {}", explanation));
        }
        let decreases: Vec<String> = self
            .updates
            .iter()
            .filter_map(|u| match &u.outcome {
                RatchetOutcome::JustifiedDecrease { reason, .. } => {
                    Some(format!("{}: {}", u.display_name, reason))
                }
                _ => None,
            })
            .collect();
        if !decreases.is_empty() {
            messages.push(format!("Score decreased: {}", decreases.join("; ")));
        }
        messages
    }
}

// -----------------------------------------------------------------------------
// Board
// -----------------------------------------------------------------------------

/// The objective set of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBoard {
    objectives: Vec<Objective>,
}

impl Default for ObjectiveBoard {
    fn default() -> Self {
        Self::standard()
    }
}

impl ObjectiveBoard {
    pub fn new(objectives: Vec<Objective>) -> Self {
        Self { objectives }
    }

    /// The four advisor-meeting objectives.
    pub fn standard() -> Self {
        Self::new(vec![
            Objective::new("rapport", "Build Rapport", 50)
                .with_description("Establish trust and connection with the client"),
            Objective::new("needs", "Needs Assessment", 75)
                .with_description("Identify the client's financial needs and goals"),
            Objective::new("objections", "Handle Objections", 100)
                .with_description("Address client concerns and objections"),
            Objective::new("recommendations", "Provide Recommendations", 125)
                .with_description("Offer suitable recommendations for the client's situation"),
        ])
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Looks up by id, then case-insensitively by id or display name.
    fn position(&self, key: &str) -> Option<usize> {
        self.objectives.iter().position(|o| o.id == key).or_else(|| {
            self.objectives.iter().position(|o| {
                o.id.eq_ignore_ascii_case(key) || o.display_name.eq_ignore_ascii_case(key)
            })
        })
    }

    pub fn get(&self, key: &str) -> Option<&Objective> {
        self.position(key).map(|i| &self.objectives[i])
    }

    /// Ratchet update of one objective.
    pub fn update(&mut self, key: &str, score: f64, reason: Option<&str>) -> ObjectiveUpdate {
        self.record(key, |objective| objective.apply(score, reason))
    }

    /// Increase-only update of one objective; see [`Objective::raise`].
    pub fn raise(&mut self, key: &str, score: f64) -> ObjectiveUpdate {
        self.record(key, |objective| objective.raise(score))
    }

    fn record(
        &mut self,
        key: &str,
        step: impl FnOnce(&mut Objective) -> (RatchetOutcome, Option<RewardEvent>),
    ) -> ObjectiveUpdate {
        let Some(idx) = self.position(key) else {
            tracing::warn!(target: "parley::objectives", objective = %key, "Unknown objective; update ignored");
            return ObjectiveUpdate {
                objective_id: key.to_string(),
                display_name: key.to_string(),
                outcome: RatchetOutcome::UnknownObjective,
                reward: None,
            };
        };
        let objective = &mut self.objectives[idx];
        let (outcome, reward) = step(objective);

        match &outcome {
            RatchetOutcome::IgnoredDecrease { attempted, progress } => tracing::debug!(
                target: "parley::objectives",
                objective = %objective.id,
                attempted,
                progress,
                high_water_mark = objective.high_water_mark,
                "Unjustified decrease ignored"
            ),
            RatchetOutcome::JustifiedDecrease { previous, progress, .. } => tracing::info!(
                target: "parley::objectives",
                objective = %objective.id,
                previous,
                progress,
                "Justified decrease applied"
            ),
            RatchetOutcome::InvalidScore => tracing::warn!(
                target: "parley::objectives",
                objective = %objective.id,
                "Non-finite score ignored"
            ),
            _ => {}
        }
        if let Some(reward) = &reward {
            tracing::info!(
                target: "parley::objectives",
                objective = %reward.objective_id,
                xp = reward.xp,
                "Objective completed"
            );
        }

        ObjectiveUpdate {
            objective_id: objective.id.clone(),
            display_name: objective.display_name.clone(),
            outcome,
            reward,
        }
    }

    /// Non-destructive form of [`update`](Self::update).
    pub fn updated(&self, key: &str, score: f64, reason: Option<&str>) -> (Self, ObjectiveUpdate) {
        let mut next = self.clone();
        let update = next.update(key, score, reason);
        (next, update)
    }

    /// Applies every score in the payload independently. Objectives absent from the payload
    /// are untouched.
    pub fn apply_payload(&mut self, payload: &ProgressPayload) -> BatchOutcome {
        let updates = payload
            .scores
            .iter()
            .map(|(key, score)| {
                let reason = payload.decrease_reasons.get(key).map(String::as_str);
                self.update(key, *score, reason)
            })
            .collect();
        BatchOutcome {
            updates,
            explanation: payload.explanation.clone(),
        }
    }

    /// Raises each scored objective without touching the ratchet. Reasons in the payload are
    /// ignored.
    pub fn raise_payload(&mut self, payload: &ProgressPayload) -> BatchOutcome {
        let updates = payload
            .scores
            .iter()
            .map(|(key, score)| self.raise(key, *score))
            .collect();
        BatchOutcome {
            updates,
            explanation: payload.explanation.clone(),
        }
    }

    pub fn all_completed(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.completed)
    }

    /// XP from every claimed completion.
    pub fn xp_earned(&self) -> u32 {
        self.objectives
            .iter()
            .filter(|o| o.reward_claimed)
            .map(|o| o.xp_value)
            .sum()
    }

    /// Mean progress across objectives, 0 for an empty board.
    pub fn overall_progress(&self) -> f64 {
        if self.objectives.is_empty() {
            return 0.0;
        }
        let total: u32 = self.objectives.iter().map(|o| o.progress as u32).sum();
        total as f64 / self.objectives.len() as f64
    }
}

// -----------------------------------------------------------------------------
// Heuristic inference
// -----------------------------------------------------------------------------

/// Progress granted by a partial exchange cue.
pub const PARTIAL_PROGRESS: u8 = 50;

/// Keyword cues for one objective over a trainee line and the client's reply.
struct ExchangeCue {
    id: &'static str,
    complete: &'static [&'static str],
    partial: &'static [&'static str],
}

const EXCHANGE_CUES: &[ExchangeCue] = &[
    ExchangeCue {
        id: "rapport",
        complete: &["nice to meet", "pleasure", "how are you"],
        partial: &["hello", "hi there", "good morning", "good afternoon"],
    },
    ExchangeCue {
        id: "needs",
        complete: &[
            "what are your goals",
            "financial situation",
            "tell me about your",
            "what brings you",
        ],
        partial: &["goals", "needs", "priorities", "planning for"],
    },
    ExchangeCue {
        id: "objections",
        complete: &["concern", "worried about", "not sure if", "understand your"],
        partial: &["hesitant", "issue", "problem", "challenge"],
    },
    ExchangeCue {
        id: "recommendations",
        complete: &["recommend", "suggest", "option", "consider"],
        partial: &["might work", "could be", "possibility", "alternative"],
    },
];

/// Infers progress from detected trainee actions when no structured payload is available.
pub struct ProgressHeuristics;

impl ProgressHeuristics {
    const RAPPORT_ACTIONS: &'static [ActionTag] = &[
        ActionTag::ReflectiveListening,
        ActionTag::EmpatheticResponse,
        ActionTag::PersonalConnection,
    ];

    /// Increment per standard objective id for this action set.
    pub fn increments(actions: &ActionSet) -> Vec<(&'static str, u8)> {
        let mut out = Vec::new();
        if Self::RAPPORT_ACTIONS.iter().any(|t| actions.contains(t)) {
            out.push(("rapport", 25));
        }
        if actions.contains(&ActionTag::OpenQuestion) {
            out.push(("needs", 25));
        } else if actions.contains(&ActionTag::ProbingQuestion)
            || actions.contains(&ActionTag::ClarifyingQuestion)
        {
            out.push(("needs", 20));
        }
        if actions.contains(&ActionTag::AddressingObjection) {
            out.push(("objections", 25));
        }
        if actions.contains(&ActionTag::ClearExplanation) {
            out.push(("recommendations", 20));
        }
        out
    }

    /// Payload raising each affected objective on `board` by its increment, capped at 100.
    pub fn from_actions(board: &ObjectiveBoard, actions: &ActionSet) -> ProgressPayload {
        let mut payload = ProgressPayload::default();
        for (id, inc) in Self::increments(actions) {
            if let Some(objective) = board.get(id) {
                let next = objective.progress.saturating_add(inc).min(MAX_SCORE);
                payload.scores.insert(objective.id.clone(), next as f64);
            }
        }
        payload
    }

    /// Keyword completion check over one exchange, for turns without an evaluator payload.
    /// A completion cue scores the objective 100; a partial cue lifts it to
    /// [`PARTIAL_PROGRESS`]. Completed objectives are skipped.
    pub fn from_exchange(board: &ObjectiveBoard, trainee: &str, client_reply: &str) -> ProgressPayload {
        let text = format!("{} {}", trainee, client_reply).to_lowercase();
        let mut payload = ProgressPayload::default();
        for cue in EXCHANGE_CUES {
            let Some(objective) = board.get(cue.id) else {
                continue;
            };
            if objective.completed {
                continue;
            }
            if cue.complete.iter().any(|p| text.contains(p)) {
                payload.scores.insert(objective.id.clone(), MAX_SCORE as f64);
            } else if objective.progress < PARTIAL_PROGRESS && cue.partial.iter().any(|p| text.contains(p)) {
                payload.scores.insert(objective.id.clone(), PARTIAL_PROGRESS as f64);
            }
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_board_shape() {
        let board = ObjectiveBoard::standard();
        let ids: Vec<&str> = board.objectives().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["rapport", "needs", "objections", "recommendations"]);
        assert_eq!(board.get("Handle Objections").map(|o| o.xp_value), Some(100));
        assert!(board.objectives().iter().all(|o| o.progress == 0 && !o.completed));
    }

    #[test]
    fn scores_are_clamped_before_comparison() {
        let mut board = ObjectiveBoard::standard();
        board.update("rapport", 140.0, None);
        assert_eq!(board.get("rapport").unwrap().progress, 100);
        assert_eq!(clamp_score(-4.0), Some(0));
        assert_eq!(clamp_score(f64::NAN), None);
    }

    #[test]
    fn unjustified_decrease_is_ignored() {
        let mut board = ObjectiveBoard::standard();
        board.update("needs", 70.0, None);
        let u = board.update("needs", 40.0, Some("   "));
        assert_eq!(
            u.outcome,
            RatchetOutcome::IgnoredDecrease {
                attempted: 40,
                progress: 70
            }
        );
        let o = board.get("needs").unwrap();
        assert_eq!((o.progress, o.high_water_mark), (70, 70));
    }

    #[test]
    fn justified_decrease_keeps_high_water_mark() {
        let mut board = ObjectiveBoard::standard();
        board.update("recommendations", 80.0, None);
        board.update("recommendations", 60.0, Some("gave incorrect advice"));
        let o = board.get("recommendations").unwrap();
        assert_eq!(o.progress, 60);
        assert_eq!(o.decrease_reason.as_deref(), Some("gave incorrect advice"));
        assert_eq!(o.high_water_mark, 80);

        // Recovering to the mark clears the reason.
        board.update("recommendations", 80.0, None);
        let o = board.get("recommendations").unwrap();
        assert_eq!(o.progress, 80);
        assert!(o.decrease_reason.is_none());
    }

    #[test]
    fn unknown_objective_is_reported_not_fatal() {
        let mut board = ObjectiveBoard::standard();
        let before = board.clone();
        let u = board.update("closing", 50.0, None);
        assert_eq!(u.outcome, RatchetOutcome::UnknownObjective);
        assert_eq!(board, before);
    }

    #[test]
    fn updated_leaves_original_untouched() {
        let board = ObjectiveBoard::standard();
        let (next, u) = board.updated("rapport", 30.0, None);
        assert!(u.outcome.changed_progress());
        assert_eq!(board.get("rapport").unwrap().progress, 0);
        assert_eq!(next.get("rapport").unwrap().progress, 30);
    }

    #[test]
    fn payload_parsing_is_lenient() {
        let payload = ProgressPayload::from_value(&json!({
            "rapport": 40,
            "needs": "lots",
            "objections": 12.6,
            "decreaseReason": { "rapport": "interrupted the client", "needs": 5 },
            "explanation": "  Good open questions.  "
        }));
        assert_eq!(payload.scores.get("rapport"), Some(&40.0));
        assert_eq!(payload.scores.get("objections"), Some(&12.6));
        assert!(!payload.scores.contains_key("needs"));
        assert_eq!(payload.skipped, vec!["needs".to_string()]);
        assert_eq!(payload.decrease_reasons.len(), 1);
        assert_eq!(payload.explanation.as_deref(), Some("Good open questions."));

        assert!(ProgressPayload::from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn feedback_messages_list_decreases() {
        let mut board = ObjectiveBoard::standard();
        board.update("rapport", 50.0, None);
        let batch = board.apply_payload(
            &ProgressPayload::default()
                .with_score("rapport", 30.0)
                .with_reason("rapport", "dismissed a concern")
                .with_score("needs", 20.0),
        );
        let mut with_explanation = batch.clone();
        with_explanation.explanation = Some("Mixed turn.".into());
        assert_eq!(
            with_explanation.feedback_messages(),
            vec![
                "Advisor progress: Mixed turn.".to_string(),
                "Score decreased: Build Rapport: dismissed a concern".to_string()
            ]
        );
        assert!(batch.rewards().is_empty());
    }

    #[test]
    fn raise_recovers_after_justified_decrease() {
        let mut board = ObjectiveBoard::standard();
        board.update("rapport", 80.0, None);
        board.update("rapport", 30.0, Some("talked over the client"));

        let u = board.raise("rapport", 55.0);
        assert_eq!(u.outcome, RatchetOutcome::Advanced { previous: 30, progress: 55 });
        let o = board.get("rapport").unwrap();
        assert_eq!((o.progress, o.high_water_mark), (55, 80));
        assert_eq!(o.decrease_reason.as_deref(), Some("talked over the client"));

        // Never lowers.
        board.raise("rapport", 10.0);
        assert_eq!(board.get("rapport").unwrap().progress, 55);

        board.raise("rapport", 90.0);
        let o = board.get("rapport").unwrap();
        assert_eq!((o.progress, o.high_water_mark), (90, 90));
        assert!(o.decrease_reason.is_none());
    }

    #[test]
    fn exchange_cues_complete_or_lift_objectives() {
        let mut board = ObjectiveBoard::standard();
        let payload = ProgressHeuristics::from_exchange(
            &board,
            "Hello! What brings you in today?",
            "I'm not sure if I'm saving enough.",
        );
        assert_eq!(payload.scores.get("rapport"), Some(&50.0));
        assert_eq!(payload.scores.get("needs"), Some(&100.0));
        assert_eq!(payload.scores.get("objections"), Some(&100.0));
        assert!(!payload.scores.contains_key("recommendations"));

        board.raise_payload(&payload);
        let again = ProgressHeuristics::from_exchange(
            &board,
            "Hello! What brings you in today?",
            "I'm not sure if I'm saving enough.",
        );
        assert!(again.is_empty());
    }

    #[test]
    fn heuristics_map_actions_to_increments() {
        let mut board = ObjectiveBoard::standard();
        board.update("rapport", 90.0, None);
        let actions: ActionSet = [
            ActionTag::EmpatheticResponse,
            ActionTag::ProbingQuestion,
            ActionTag::ClearExplanation,
        ]
        .into_iter()
        .collect();
        let payload = ProgressHeuristics::from_actions(&board, &actions);
        assert_eq!(payload.scores.get("rapport"), Some(&100.0));
        assert_eq!(payload.scores.get("needs"), Some(&20.0));
        assert_eq!(payload.scores.get("recommendations"), Some(&20.0));
        assert!(!payload.scores.contains_key("objections"));

        let open_and_probing: ActionSet = [ActionTag::OpenQuestion, ActionTag::ProbingQuestion]
            .into_iter()
            .collect();
        assert_eq!(ProgressHeuristics::increments(&open_and_probing), vec![("needs", 25)]);
    }
}
