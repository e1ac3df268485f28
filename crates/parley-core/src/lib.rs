//! parley-core: conversation intelligence for advisor role-play training.
//!
//! Action classification, simulated-client affect, prompt guidance, the objective ratchet and
//! coaching-question tiers. Deterministic for a given conversation history; the only
//! suspension point is the optional tier fallback call.

mod actions;
mod affect;
mod completion;
mod config;
mod error;
mod guidance;
mod objectives;
mod session;
mod shared;
mod tier;

// Action Classifier
pub use actions::{classify, ActionSet, ActionTag, MIN_QUESTION_CHARS};

// Affect State Machine
pub use affect::{
    escalation_factor, ActionDelta, AffectEngine, AffectState, ChangeSignals, EmotionalContext,
    FlagSet, OffenseTally, TurnRecord, DEFENSIVE_REACTION_DELTA, FORGIVENESS_STREAK,
    FRUSTRATION_TREND_DELTA, GUARDED_THRESHOLD, HIGH_FRUSTRATION_THRESHOLD,
    INFORMATION_WITHHELD_DELTA, REPEATED_DISRESPECT_OFFENSES, TREND_DELTA,
    TRUST_BREAKTHROUGH_DELTA, TRUST_COLLAPSE_THRESHOLD,
};

// Guidance Synthesizer
pub use guidance::{
    behavior_guidance, describe_state, inject_dynamic_context, insert_before_marker, synthesize,
    Channel, EmotionLevel, ESCALATION_DIRECTIVE, ESCALATION_FLAG_COUNT, STAY_IN_CHARACTER_MARKER,
};

// Objective Ratchet
pub use objectives::{
    clamp_score, BatchOutcome, Objective, ObjectiveBoard, ObjectiveUpdate, ProgressHeuristics,
    ProgressPayload, RatchetOutcome, RewardEvent, MAX_SCORE, PARTIAL_PROGRESS,
};

// Query Tier Classifier
pub use tier::{
    classify_tier, fallback_prompt, parse_tier_reply, Tier, TierClassification, TierClassifier,
    TierScores,
};

// Session pipeline
pub use session::{SessionSnapshot, SessionStore, SimulationSession, TurnReport};

// Shared types, configuration, errors and the completion seam
pub use completion::CompletionService;
pub use config::{
    AffectConfig, EngineConfig, LlmConfig, LlmMode, TierConfig, DEFAULT_API_URL,
    DEFAULT_CONFIG_PATH, DEFAULT_MODEL,
};
pub use error::{CompletionError, ConfigError};
pub use shared::{Difficulty, PersonalityTraits, NEUTRAL_TRAIT};

// Re-export for transports implementing CompletionService.
pub use async_trait::async_trait;
