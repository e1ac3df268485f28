//! Guidance Synthesizer: turns affect and flags into persona directives for the next prompt.
//!
//! Everything here is a pure function of an [`EmotionalContext`].

use crate::affect::{
    AffectState, EmotionalContext, GUARDED_THRESHOLD, HIGH_FRUSTRATION_THRESHOLD,
    TRUST_COLLAPSE_THRESHOLD,
};
use serde::{Deserialize, Serialize};

/// Flag count at which the escalation directive fires.
pub const ESCALATION_FLAG_COUNT: usize = 2;

/// Marker in the persona system prompt before which dynamic context is inserted.
pub const STAY_IN_CHARACTER_MARKER: &str = "Remember to stay in character";

pub const ESCALATION_DIRECTIVE: &str = "\n\nMULTIPLE NEGATIVE FLAGS DETECTED: You should strongly consider ending this conversation or expressing that you need to reconsider working with this advisor. Your patience has been tested multiple times.";

/// Directive text for the current context. Empty when no rule fires.
///
/// Rules are checked in a fixed order and appended: collapsed trust, high frustration,
/// guardedness, then escalation when two or more flags are raised.
pub fn synthesize(context: &EmotionalContext) -> String {
    let state = &context.current_state;
    let mut out = String::new();

    if state.trust < TRUST_COLLAPSE_THRESHOLD {
        out.push_str(&format!(
            "\n\nIMPORTANT EMOTIONAL STATE UPDATE: Your trust level is extremely low ({:.1}%). You should respond with clear distrust, consider ending the conversation, or show significant hesitation to continue. Use phrases like \"I don't think this is working out\" or \"I'm not comfortable continuing this conversation.\"",
            state.trust
        ));
    }

    if state.frustration > HIGH_FRUSTRATION_THRESHOLD {
        out.push_str(&format!(
            "\n\nIMPORTANT EMOTIONAL STATE UPDATE: Your frustration level is extremely high ({:.1}%). Show visible irritation, consider cutting the meeting short, or directly address the unprofessional behavior. Use phrases like \"This is completely unprofessional\" or \"I don't appreciate being spoken to this way.\"",
            state.frustration
        ));
    }

    if state.openness < GUARDED_THRESHOLD {
        out.push_str(&format!(
            "\n\nIMPORTANT EMOTIONAL STATE UPDATE: Your openness is very low ({:.1}%). You should withhold information, give short answers, and be reluctant to share any personal or financial details.",
            state.openness
        ));
    }

    if context.flags.active_count() >= ESCALATION_FLAG_COUNT {
        out.push_str(ESCALATION_DIRECTIVE);
    }

    out
}

/// Second-person description of how the client currently feels.
pub fn describe_state(state: &AffectState) -> String {
    let mut parts: Vec<&str> = Vec::new();

    parts.push(if state.trust >= 80.0 {
        "You feel very comfortable with this advisor and are willing to share personal information."
    } else if state.trust >= 60.0 {
        "You generally trust this advisor but still maintain some caution."
    } else if state.trust >= 40.0 {
        "You're somewhat cautious about fully trusting this advisor."
    } else if state.trust >= 20.0 {
        "You're skeptical of this advisor and hesitant to share sensitive information."
    } else {
        "You're very distrustful of this advisor and reluctant to share any personal details."
    });

    if state.frustration >= 70.0 {
        parts.push("You're feeling very frustrated with this conversation.");
    } else if state.frustration >= 50.0 {
        parts.push("You're showing signs of frustration with how this conversation is going.");
    } else if state.frustration <= 20.0 {
        parts.push("You're feeling calm and patient with the advisor.");
    }

    if state.openness >= 70.0 {
        parts.push("You're very willing to discuss your situation openly.");
    } else if state.openness <= 30.0 {
        parts.push("You're being guarded about sharing information.");
    }

    parts.join(" ")
}

/// Coarse bucket of a channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl EmotionLevel {
    pub fn from_value(v: f64) -> Self {
        if v <= 20.0 {
            EmotionLevel::VeryLow
        } else if v <= 40.0 {
            EmotionLevel::Low
        } else if v <= 60.0 {
            EmotionLevel::Medium
        } else if v <= 80.0 {
            EmotionLevel::High
        } else {
            EmotionLevel::VeryHigh
        }
    }

    fn index(self) -> usize {
        match self {
            EmotionLevel::VeryLow => 0,
            EmotionLevel::Low => 1,
            EmotionLevel::Medium => 2,
            EmotionLevel::High => 3,
            EmotionLevel::VeryHigh => 4,
        }
    }
}

/// Affect channel, for per-channel behaviour lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Trust,
    Frustration,
    Openness,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Trust, Channel::Frustration, Channel::Openness];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Trust => "Trust",
            Channel::Frustration => "Frustration",
            Channel::Openness => "Openness",
        }
    }

    pub fn value(self, state: &AffectState) -> f64 {
        match self {
            Channel::Trust => state.trust,
            Channel::Frustration => state.frustration,
            Channel::Openness => state.openness,
        }
    }

    /// One-line behaviour summary for this channel at `level`.
    pub fn summary(self, level: EmotionLevel) -> &'static str {
        const TRUST: [&str; 5] = [
            "Highly skeptical, questions motives, guarded.",
            "Hesitant, cautious, needs strong reassurance.",
            "Open but still evaluating, balanced skepticism.",
            "Trusting, receptive, seeks guidance.",
            "Fully trusts, collaborative tone.",
        ];
        const FRUSTRATION: [&str; 5] = [
            "Calm, relaxed, no signs of frustration.",
            "Mild impatience but cooperative.",
            "Noticeable frustration, clipped tone.",
            "Strong frustration, pushback.",
            "Very frustrated, may consider disengaging.",
        ];
        const OPENNESS: [&str; 5] = [
            "Closed off, unwilling to share information.",
            "Reluctant to share, provides minimal information.",
            "Selectively open, shares when relevant.",
            "Generally open, shares most information.",
            "Completely open, volunteers information freely.",
        ];
        let table = match self {
            Channel::Trust => &TRUST,
            Channel::Frustration => &FRUSTRATION,
            Channel::Openness => &OPENNESS,
        };
        table[level.index()]
    }
}

/// "EMOTIONAL BEHAVIOR GUIDANCE" block: each channel with its value and behaviour summary.
pub fn behavior_guidance(context: &EmotionalContext) -> String {
    let mut out = String::from("EMOTIONAL BEHAVIOR GUIDANCE:\n");
    for channel in Channel::ALL {
        let value = channel.value(&context.current_state);
        out.push_str(&format!(
            "{} ({:.1}/100): {}\n",
            channel.label(),
            value,
            channel.summary(EmotionLevel::from_value(value))
        ));
    }
    out
}

/// Places `block` immediately before the stay-in-character marker, or appends it.
pub fn insert_before_marker(prompt: &str, block: &str) -> String {
    match prompt.find(STAY_IN_CHARACTER_MARKER) {
        Some(idx) => {
            let (head, tail) = prompt.split_at(idx);
            format!("{}{}\n\n{}", head, block, tail)
        }
        None if prompt.is_empty() => block.to_string(),
        None => format!("{}\n\n{}", prompt, block),
    }
}

/// Inserts the dynamic emotional context before the stay-in-character marker (or appends it),
/// then appends the synthesized directives.
pub fn inject_dynamic_context(system_prompt: &str, context: &EmotionalContext) -> String {
    let block = format!(
        "CURRENT EMOTIONAL STATE:\n{}\n\nPERSONALITY PROFILE:\n{}\n\n{}",
        describe_state(&context.current_state),
        context.traits.describe(),
        behavior_guidance(context)
    );

    let mut prompt = insert_before_marker(system_prompt, &block);
    prompt.push_str(&synthesize(context));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PersonalityTraits;

    fn ctx(trust: f64, frustration: f64, openness: f64) -> EmotionalContext {
        EmotionalContext::with_state(
            PersonalityTraits::default(),
            AffectState {
                trust,
                frustration,
                openness,
            },
        )
    }

    #[test]
    fn calm_context_yields_nothing() {
        assert_eq!(synthesize(&ctx(50.0, 20.0, 50.0)), "");
    }

    #[test]
    fn trust_threshold_is_strict() {
        let low = synthesize(&ctx(29.9, 20.0, 50.0));
        assert!(low.contains("trust level is extremely low (29.9%)"));
        assert!(!synthesize(&ctx(30.0, 20.0, 50.0)).contains("trust level"));
    }

    #[test]
    fn frustration_threshold_is_strict() {
        let high = synthesize(&ctx(50.0, 70.1, 50.0));
        assert!(high.contains("frustration level is extremely high (70.1%)"));
        assert!(!synthesize(&ctx(50.0, 70.0, 50.0)).contains("frustration level"));
    }

    #[test]
    fn openness_directive_and_value_format() {
        let text = synthesize(&ctx(50.0, 20.0, 23.44));
        assert!(text.contains("openness is very low (23.4%)"));
        assert!(!text.contains("MULTIPLE NEGATIVE FLAGS"));
    }

    #[test]
    fn two_flags_escalate_one_does_not() {
        let two = ctx(20.0, 80.0, 50.0);
        assert_eq!(two.flags.active_count(), 2);
        assert!(synthesize(&two).ends_with(ESCALATION_DIRECTIVE));

        let one = ctx(20.0, 20.0, 50.0);
        assert_eq!(one.flags.active_count(), 1);
        assert!(!synthesize(&one).contains("MULTIPLE NEGATIVE FLAGS"));
    }

    #[test]
    fn rules_append_in_fixed_order() {
        let text = synthesize(&ctx(10.0, 90.0, 10.0));
        let t = text.find("trust level").unwrap();
        let f = text.find("frustration level").unwrap();
        let o = text.find("openness is very low").unwrap();
        let e = text.find("MULTIPLE NEGATIVE FLAGS").unwrap();
        assert!(t < f && f < o && o < e);
    }

    #[test]
    fn emotion_levels() {
        assert_eq!(EmotionLevel::from_value(20.0), EmotionLevel::VeryLow);
        assert_eq!(EmotionLevel::from_value(40.0), EmotionLevel::Low);
        assert_eq!(EmotionLevel::from_value(60.0), EmotionLevel::Medium);
        assert_eq!(EmotionLevel::from_value(80.0), EmotionLevel::High);
        assert_eq!(EmotionLevel::from_value(80.1), EmotionLevel::VeryHigh);
        assert_eq!(
            Channel::Frustration.summary(EmotionLevel::VeryHigh),
            "Very frustrated, may consider disengaging."
        );
    }

    #[test]
    fn describe_state_tiers() {
        let text = describe_state(&AffectState {
            trust: 85.0,
            frustration: 10.0,
            openness: 75.0,
        });
        assert!(text.starts_with("You feel very comfortable"));
        assert!(text.contains("calm and patient"));
        assert!(text.contains("discuss your situation openly"));
    }

    #[test]
    fn injection_lands_before_marker() {
        let base = "You are Dana, 58, planning retirement.\n\nRemember to stay in character throughout.";
        let prompt = inject_dynamic_context(base, &ctx(50.0, 20.0, 50.0));
        let state = prompt.find("CURRENT EMOTIONAL STATE").unwrap();
        let marker = prompt.find(STAY_IN_CHARACTER_MARKER).unwrap();
        assert!(prompt.starts_with("You are Dana"));
        assert!(state < marker);
    }

    #[test]
    fn injection_appends_without_marker_and_adds_directives() {
        let prompt = inject_dynamic_context("Base prompt.", &ctx(20.0, 80.0, 50.0));
        assert!(prompt.starts_with("Base prompt.\n\nCURRENT EMOTIONAL STATE"));
        assert!(prompt.ends_with(ESCALATION_DIRECTIVE));
    }
}
