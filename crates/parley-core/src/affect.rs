//! Affect State Machine: the simulated client's bounded emotional state.
//!
//! Each trainee turn produces an [`ActionSet`]; [`AffectEngine::advance`] folds it into a new
//! [`EmotionalContext`] without touching the old one, so a session can be replayed from its
//! turn history. Channels are always in [0, 100] after an update and flags are always derived,
//! never written by callers.

use crate::actions::{ActionSet, ActionTag};
use crate::config::AffectConfig;
use crate::shared::{Difficulty, PersonalityTraits};
use serde::{Deserialize, Serialize};

/// `trust` strictly below this collapses trust.
pub const TRUST_COLLAPSE_THRESHOLD: f64 = 30.0;
/// `frustration` strictly above this is high frustration.
pub const HIGH_FRUSTRATION_THRESHOLD: f64 = 70.0;
/// `openness` strictly below this means the client is guarded.
pub const GUARDED_THRESHOLD: f64 = 30.0;
/// Active offenses at which disrespect counts as repeated.
pub const REPEATED_DISRESPECT_OFFENSES: u32 = 2;
/// Consecutive positive turns that forgive one offense.
pub const FORGIVENESS_STREAK: u32 = 2;
/// Single-turn trust rise that counts as a breakthrough.
pub const TRUST_BREAKTHROUGH_DELTA: f64 = 10.0;
/// Single-turn frustration rise that counts as a defensive reaction.
pub const DEFENSIVE_REACTION_DELTA: f64 = 15.0;
/// Single-turn openness drop at which the client starts withholding.
pub const INFORMATION_WITHHELD_DELTA: f64 = -10.0;
/// Session-wide trust and openness drift reported as significant.
pub const TREND_DELTA: f64 = 15.0;
/// Session-wide frustration drift reported as significant.
pub const FRUSTRATION_TREND_DELTA: f64 = 20.0;

// -----------------------------------------------------------------------------
// AffectState
// -----------------------------------------------------------------------------

/// Emotional channels of the simulated client, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectState {
    pub trust: f64,
    pub frustration: f64,
    pub openness: f64,
}

impl Default for AffectState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl AffectState {
    /// Baseline before persona adjustments.
    pub const NEUTRAL: AffectState = AffectState {
        trust: 50.0,
        frustration: 20.0,
        openness: 50.0,
    };

    /// Initial state for a persona: neutral baseline shifted by trait and difficulty biases.
    pub fn for_persona(traits: &PersonalityTraits, difficulty: Difficulty) -> Self {
        let t = traits.clamped();
        let guard = difficulty.guard_bias();
        let mut s = Self {
            trust: Self::NEUTRAL.trust
                + (t.agreeableness - 50.0) * 0.3
                + (t.honesty_humility - 50.0) * 0.2
                - guard,
            frustration: Self::NEUTRAL.frustration - (t.agreeableness - 50.0) * 0.2,
            openness: Self::NEUTRAL.openness
                + (t.extraversion - 50.0) * 0.3
                + (t.openness - 50.0) * 0.3
                - guard,
        };
        s.clamp();
        s
    }

    /// Clamps all channels to [0, 100]. A non-finite channel resets to its neutral value.
    pub fn clamp(&mut self) {
        fn bound(v: f64, neutral: f64) -> f64 {
            if v.is_finite() {
                v.clamp(0.0, 100.0)
            } else {
                neutral
            }
        }
        self.trust = bound(self.trust, Self::NEUTRAL.trust);
        self.frustration = bound(self.frustration, Self::NEUTRAL.frustration);
        self.openness = bound(self.openness, Self::NEUTRAL.openness);
    }

    pub fn is_within_bounds(&self) -> bool {
        [self.trust, self.frustration, self.openness]
            .iter()
            .all(|v| (0.0..=100.0).contains(v))
    }

    /// Moves each channel `rate` of the way toward `baseline`.
    fn settle_toward(&mut self, baseline: &AffectState, rate: f64) {
        self.trust += (baseline.trust - self.trust) * rate;
        self.frustration += (baseline.frustration - self.frustration) * rate;
        self.openness += (baseline.openness - self.openness) * rate;
    }
}

// -----------------------------------------------------------------------------
// Per-action deltas
// -----------------------------------------------------------------------------

/// Raw change one action applies to each channel before persona scaling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionDelta {
    pub trust: f64,
    pub frustration: f64,
    pub openness: f64,
}

impl ActionDelta {
    pub const ZERO: ActionDelta = ActionDelta {
        trust: 0.0,
        frustration: 0.0,
        openness: 0.0,
    };

    const fn new(trust: f64, frustration: f64, openness: f64) -> Self {
        Self {
            trust,
            frustration,
            openness,
        }
    }

    /// Delta table. `Unknown` tags have no effect.
    pub fn for_tag(tag: &ActionTag) -> Self {
        match tag {
            ActionTag::ReflectiveListening => Self::new(5.0, -5.0, 3.0),
            ActionTag::EmpatheticResponse => Self::new(5.0, -5.0, 5.0),
            ActionTag::PersonalConnection => Self::new(5.0, 0.0, 5.0),
            ActionTag::OpenQuestion => Self::new(0.0, 0.0, 3.0),
            ActionTag::ClosedQuestion => Self::new(0.0, 0.0, -1.0),
            ActionTag::ProbingQuestion => Self::new(2.0, 0.0, 3.0),
            ActionTag::ClarifyingQuestion => Self::new(2.0, -2.0, 2.0),
            ActionTag::AddressingObjection => Self::new(5.0, -5.0, 0.0),
            ActionTag::ClearExplanation => Self::new(3.0, 0.0, 0.0),
            ActionTag::Patience => Self::new(3.0, -5.0, 3.0),
            ActionTag::JargonUsage => Self::new(-2.0, 5.0, 0.0),
            ActionTag::Interruption => Self::new(-5.0, 10.0, -5.0),
            ActionTag::IgnoredConcern => Self::new(-8.0, 10.0, -5.0),
            ActionTag::ConfusingExplanation => Self::new(-3.0, 5.0, 0.0),
            ActionTag::DismissingConcern => Self::new(-10.0, 15.0, -8.0),
            ActionTag::Rushing => Self::new(-5.0, 8.0, -5.0),
            ActionTag::Pressure => Self::new(-12.0, 15.0, -10.0),
            ActionTag::InappropriateLanguage => Self::new(-15.0, 20.0, -10.0),
            ActionTag::Profanity => Self::new(-15.0, 20.0, -10.0),
            ActionTag::Insult => Self::new(-25.0, 30.0, -20.0),
            ActionTag::ThreateningLanguage => Self::new(-30.0, 35.0, -25.0),
            ActionTag::DismissiveTone => Self::new(-10.0, 15.0, -10.0),
            ActionTag::UnprofessionalComment => Self::new(-15.0, 20.0, -15.0),
            ActionTag::JudgmentalComment => Self::new(-18.0, 25.0, -15.0),
            ActionTag::PersonalQuestion => Self::new(-12.0, 18.0, -15.0),
            ActionTag::OffensiveAssumption => Self::new(-20.0, 25.0, -18.0),
            ActionTag::Unknown(_) => Self::ZERO,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(self.trust * factor, self.frustration * factor, self.openness * factor)
    }

    /// Applies persona sensitivity. Every factor lies in [0.5, 1.5]:
    /// low agreeableness damps trust gains and amplifies trust losses, neuroticism amplifies
    /// frustration rises and slows its decline, reserved personas open up more slowly.
    pub fn for_persona(self, traits: &PersonalityTraits) -> Self {
        let a = traits.agreeableness / 100.0;
        let n = (traits.neuroticism - 50.0) / 100.0;
        let e = (traits.extraversion + traits.openness) / 200.0;
        Self {
            trust: if self.trust >= 0.0 {
                self.trust * (0.5 + a)
            } else {
                self.trust * (1.5 - a)
            },
            frustration: if self.frustration >= 0.0 {
                self.frustration * (1.0 + n)
            } else {
                self.frustration * (1.0 - n)
            },
            openness: if self.openness >= 0.0 {
                self.openness * (0.5 + e)
            } else {
                self.openness * (1.5 - e)
            },
        }
    }
}

impl std::ops::AddAssign for ActionDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.trust += rhs.trust;
        self.frustration += rhs.frustration;
        self.openness += rhs.openness;
    }
}

/// Multiplier on disrespect deltas given the offenses already on record.
pub fn escalation_factor(prior_offenses: u32) -> f64 {
    match prior_offenses {
        0 => 1.0,
        1 => 1.5,
        _ => 2.0,
    }
}

// -----------------------------------------------------------------------------
// Flags
// -----------------------------------------------------------------------------

/// Derived escalation flags. Recomputed on every update from state and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagSet {
    pub rudeness_detected: bool,
    pub repeated_disrespect: bool,
    pub trust_collapsed: bool,
    pub high_frustration: bool,
    pub guarded: bool,
}

impl FlagSet {
    pub fn derive(state: &AffectState, tally: &OffenseTally) -> Self {
        Self {
            rudeness_detected: tally.total > 0,
            repeated_disrespect: tally.active >= REPEATED_DISRESPECT_OFFENSES,
            trust_collapsed: state.trust < TRUST_COLLAPSE_THRESHOLD,
            high_frustration: state.frustration > HIGH_FRUSTRATION_THRESHOLD,
            guarded: state.openness < GUARDED_THRESHOLD,
        }
    }

    fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("rudenessDetected", self.rudeness_detected),
            ("repeatedDisrespect", self.repeated_disrespect),
            ("trustCollapsed", self.trust_collapsed),
            ("highFrustration", self.high_frustration),
            ("guarded", self.guarded),
        ]
    }

    pub fn active_count(&self) -> usize {
        self.entries().iter().filter(|(_, on)| *on).count()
    }

    /// Names of the raised flags, in a fixed order.
    pub fn active_names(&self) -> Vec<&'static str> {
        self.entries()
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Sharp moves between two consecutive states. Informational only; they feed neither
/// guidance nor escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSignals {
    pub trust_breakthrough: bool,
    pub defensive_reaction: bool,
    pub information_withheld: bool,
}

impl ChangeSignals {
    pub fn between(previous: &AffectState, next: &AffectState) -> Self {
        Self {
            trust_breakthrough: next.trust - previous.trust >= TRUST_BREAKTHROUGH_DELTA,
            defensive_reaction: next.frustration - previous.frustration >= DEFENSIVE_REACTION_DELTA,
            information_withheld: next.openness - previous.openness <= INFORMATION_WITHHELD_DELTA,
        }
    }

    pub fn any(&self) -> bool {
        self.trust_breakthrough || self.defensive_reaction || self.information_withheld
    }
}

/// Disrespect bookkeeping folded from turn history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffenseTally {
    /// Turns containing disrespect, ever.
    pub total: u32,
    /// Offenses not yet forgiven.
    pub active: u32,
    positive_streak: u32,
}

impl OffenseTally {
    fn record(&mut self, actions: &ActionSet) {
        if actions.iter().any(ActionTag::is_disrespect) {
            self.total += 1;
            self.active += 1;
            self.positive_streak = 0;
        } else if actions.iter().any(ActionTag::is_positive) {
            self.positive_streak += 1;
            if self.positive_streak >= FORGIVENESS_STREAK && self.active > 0 {
                self.active -= 1;
                self.positive_streak = 0;
            }
        }
    }

    pub fn from_history(history: &[TurnRecord]) -> Self {
        let mut tally = Self::default();
        for turn in history {
            tally.record(&turn.actions);
        }
        tally
    }
}

// -----------------------------------------------------------------------------
// EmotionalContext
// -----------------------------------------------------------------------------

/// One processed turn: the actions observed and the state they produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub actions: ActionSet,
    pub state: AffectState,
}

/// Aggregate emotional state for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalContext {
    pub current_state: AffectState,
    pub flags: FlagSet,
    pub traits: PersonalityTraits,
    /// Persona resting state; decay settles toward it.
    pub baseline: AffectState,
    /// State before the first turn. `restart` and `replay` begin here.
    pub initial_state: AffectState,
    pub turn_history: Vec<TurnRecord>,
}

impl EmotionalContext {
    fn fresh(traits: PersonalityTraits, baseline: AffectState, initial_state: AffectState) -> Self {
        Self {
            current_state: initial_state,
            flags: FlagSet::derive(&initial_state, &OffenseTally::default()),
            traits,
            baseline,
            initial_state,
            turn_history: Vec::new(),
        }
    }

    /// Context starting at a known state with no history. Decay still settles toward the
    /// persona's beginner baseline, while `restart` returns to `state`.
    pub fn with_state(traits: PersonalityTraits, state: AffectState) -> Self {
        let traits = traits.clamped();
        let mut state = state;
        state.clamp();
        let baseline = AffectState::for_persona(&traits, Difficulty::Beginner);
        Self::fresh(traits, baseline, state)
    }

    /// Same persona, baseline and starting state, empty history.
    pub fn restart(&self) -> Self {
        Self::fresh(self.traits, self.baseline, self.initial_state)
    }

    /// State before the most recent turn.
    pub fn previous_state(&self) -> AffectState {
        match self.turn_history.len() {
            0 | 1 => self.initial_state,
            n => self.turn_history[n - 2].state,
        }
    }

    /// Sharp moves in the most recent turn. All false before the first turn.
    pub fn change_signals(&self) -> ChangeSignals {
        if self.turn_history.is_empty() {
            return ChangeSignals::default();
        }
        ChangeSignals::between(&self.previous_state(), &self.current_state)
    }

    /// One-line drift of the current state from the session start.
    pub fn trend_summary(&self) -> String {
        if self.turn_history.is_empty() {
            return "Conversation just started.".to_string();
        }
        let start = &self.initial_state;
        let now = &self.current_state;
        let mut changes = Vec::new();
        for (name, delta, threshold) in [
            ("Trust", now.trust - start.trust, TREND_DELTA),
            ("Frustration", now.frustration - start.frustration, FRUSTRATION_TREND_DELTA),
            ("Openness", now.openness - start.openness, TREND_DELTA),
        ] {
            if delta >= threshold {
                changes.push(format!("{} has increased significantly.", name));
            } else if delta <= -threshold {
                changes.push(format!("{} has decreased significantly.", name));
            }
        }
        if changes.is_empty() {
            "No significant emotional changes detected.".to_string()
        } else {
            changes.join(" ")
        }
    }

    pub fn offense_tally(&self) -> OffenseTally {
        OffenseTally::from_history(&self.turn_history)
    }

    pub fn turn_count(&self) -> usize {
        self.turn_history.len()
    }
}

// -----------------------------------------------------------------------------
// AffectEngine
// -----------------------------------------------------------------------------

/// Applies action sets to emotional contexts.
#[derive(Debug, Clone, Default)]
pub struct AffectEngine {
    config: AffectConfig,
}

impl AffectEngine {
    pub fn new(config: AffectConfig) -> Self {
        Self { config }
    }

    /// Session-start context for a persona.
    pub fn initialize(&self, traits: &PersonalityTraits, difficulty: Difficulty) -> EmotionalContext {
        let traits = traits.clamped();
        let baseline = AffectState::for_persona(&traits, difficulty);
        tracing::debug!(
            target: "parley::affect",
            trust = baseline.trust,
            frustration = baseline.frustration,
            openness = baseline.openness,
            difficulty = difficulty.as_str(),
            "Initialized emotional context"
        );
        EmotionalContext::fresh(traits, baseline, baseline)
    }

    /// Combined persona-scaled delta for one turn.
    pub fn turn_delta(&self, context: &EmotionalContext, actions: &ActionSet) -> ActionDelta {
        let prior = context.offense_tally();
        let escalation = escalation_factor(prior.active);
        let mut total = ActionDelta::ZERO;
        for tag in actions {
            let mut delta = ActionDelta::for_tag(tag);
            if tag.is_disrespect() {
                delta = delta.scaled(escalation);
            }
            total += delta.for_persona(&context.traits);
        }
        total
    }

    /// Returns the context after one turn. `context` is left untouched.
    pub fn advance(&self, context: &EmotionalContext, actions: &ActionSet) -> EmotionalContext {
        let delta = self.turn_delta(context, actions);

        let mut state = context.current_state;
        state.trust += delta.trust;
        state.frustration += delta.frustration;
        state.openness += delta.openness;
        state.settle_toward(&context.baseline, self.config.decay_rate);
        state.clamp();

        let mut turn_history = context.turn_history.clone();
        turn_history.push(TurnRecord {
            actions: actions.clone(),
            state,
        });
        let flags = FlagSet::derive(&state, &OffenseTally::from_history(&turn_history));

        let unknown = actions.iter().filter(|t| t.is_unknown()).count();
        let signals = ChangeSignals::between(&context.current_state, &state);
        if signals.any() {
            tracing::info!(
                target: "parley::affect",
                turn = turn_history.len(),
                trust_breakthrough = signals.trust_breakthrough,
                defensive_reaction = signals.defensive_reaction,
                information_withheld = signals.information_withheld,
                "Sharp emotional shift"
            );
        }

        tracing::debug!(
            target: "parley::affect",
            turn = turn_history.len(),
            trust = state.trust,
            frustration = state.frustration,
            openness = state.openness,
            flags = ?flags.active_names(),
            ignored_unknown_tags = unknown,
            "Advanced emotional context"
        );

        EmotionalContext {
            current_state: state,
            flags,
            traits: context.traits,
            baseline: context.baseline,
            initial_state: context.initial_state,
            turn_history,
        }
    }

    /// Rebuilds a context by replaying recorded action sets from a restart.
    pub fn replay<'a, I>(&self, start: &EmotionalContext, turns: I) -> EmotionalContext
    where
        I: IntoIterator<Item = &'a ActionSet>,
    {
        turns
            .into_iter()
            .fold(start.restart(), |ctx, actions| self.advance(&ctx, actions))
    }
}
