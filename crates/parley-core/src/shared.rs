//! Shared persona types supplied by the scenario layer at session start.
//!
//! Traits are immutable for the life of a session; the engine only reads them.

use serde::{Deserialize, Serialize};

/// Neutral value for every personality slider.
pub const NEUTRAL_TRAIT: f64 = 50.0;

/// Personality sliders of the simulated client, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalityTraits {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    pub assertiveness: f64,
    #[serde(alias = "honesty_humility")]
    pub honesty_humility: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            openness: NEUTRAL_TRAIT,
            conscientiousness: NEUTRAL_TRAIT,
            extraversion: NEUTRAL_TRAIT,
            agreeableness: NEUTRAL_TRAIT,
            neuroticism: NEUTRAL_TRAIT,
            assertiveness: NEUTRAL_TRAIT,
            honesty_humility: NEUTRAL_TRAIT,
        }
    }
}

impl PersonalityTraits {
    /// Returns a copy with every slider clamped to [0, 100]. Non-finite values fall back to neutral.
    pub fn clamped(self) -> Self {
        fn c(v: f64) -> f64 {
            if v.is_finite() {
                v.clamp(0.0, 100.0)
            } else {
                NEUTRAL_TRAIT
            }
        }
        Self {
            openness: c(self.openness),
            conscientiousness: c(self.conscientiousness),
            extraversion: c(self.extraversion),
            agreeableness: c(self.agreeableness),
            neuroticism: c(self.neuroticism),
            assertiveness: c(self.assertiveness),
            honesty_humility: c(self.honesty_humility),
        }
    }

    /// Short personality line for prompt context.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.agreeableness >= 70.0 {
            parts.push("warm and accommodating");
        } else if self.agreeableness <= 30.0 {
            parts.push("blunt and slow to forgive");
        }
        if self.neuroticism >= 70.0 {
            parts.push("easily worried");
        } else if self.neuroticism <= 30.0 {
            parts.push("emotionally steady");
        }
        if self.extraversion >= 70.0 {
            parts.push("talkative");
        } else if self.extraversion <= 30.0 {
            parts.push("reserved");
        }
        if self.conscientiousness >= 70.0 {
            parts.push("detail-oriented");
        }
        if self.assertiveness >= 70.0 {
            parts.push("direct about what they want");
        }
        if parts.is_empty() {
            "Balanced personality.".to_string()
        } else {
            format!("You are {}.", parts.join(", "))
        }
    }
}

/// Scenario difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Parses a label case-insensitively. Unknown labels map to `Beginner`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "intermediate" | "medium" | "2" => Difficulty::Intermediate,
            "advanced" | "hard" | "expert" | "3" => Difficulty::Advanced,
            _ => Difficulty::Beginner,
        }
    }

    /// Amount subtracted from initial trust and openness.
    pub fn guard_bias(&self) -> f64 {
        match self {
            Difficulty::Beginner => 0.0,
            Difficulty::Intermediate => 5.0,
            Difficulty::Advanced => 10.0,
        }
    }

    /// Persona instruction line added to the system prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            Difficulty::Beginner => {
                "DIFFICULTY: Beginner. Be cooperative and forthcoming. Share your situation when asked and accept reasonable explanations."
            }
            Difficulty::Intermediate => {
                "DIFFICULTY: Intermediate. Be moderately guarded. Raise one or two realistic objections and make the advisor earn detailed information."
            }
            Difficulty::Advanced => {
                "DIFFICULTY: Advanced. Be skeptical and demanding. Press for specifics, challenge vague answers, and only open up once trust is clearly earned."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_and_nan() {
        let t = PersonalityTraits {
            agreeableness: 140.0,
            neuroticism: -3.0,
            openness: f64::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(t.agreeableness, 100.0);
        assert_eq!(t.neuroticism, 0.0);
        assert_eq!(t.openness, NEUTRAL_TRAIT);
    }

    #[test]
    fn traits_deserialize_camel_case_with_defaults() {
        let t: PersonalityTraits =
            serde_json::from_str(r#"{"agreeableness": 20, "honestyHumility": 80}"#).unwrap();
        assert_eq!(t.agreeableness, 20.0);
        assert_eq!(t.honesty_humility, 80.0);
        assert_eq!(t.extraversion, NEUTRAL_TRAIT);
    }

    #[test]
    fn difficulty_labels() {
        assert_eq!(Difficulty::from_label("Advanced"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_label("medium"), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_label("???"), Difficulty::Beginner);
        assert_eq!(Difficulty::Intermediate.as_str(), "intermediate");
    }
}
