//! Transcript file format.
//!
//! ```json
//! {
//!   "persona": { "name": "Dana", "difficulty": "advanced", "traits": { "agreeableness": 30 } },
//!   "turns": [
//!     { "trainee": "What brings you in?", "progress": { "needs": 20 } },
//!     { "trainee": "Nice to meet you.", "client": "Likewise. I'm worried about taxes." }
//!   ],
//!   "coachingQuestions": ["How do I handle a fee objection?"]
//! }
//! ```

use parley_core::{Difficulty, PersonalityTraits};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("cannot read transcript {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid transcript JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Persona {
    pub name: String,
    pub difficulty: String,
    pub traits: PersonalityTraits,
    pub system_prompt: Option<String>,
}

impl Persona {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_label(&self.difficulty)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptTurn {
    pub trainee: String,
    /// Client reply to this turn. Drives the keyword completion check when `progress` is absent.
    #[serde(default)]
    pub client: Option<String>,
    /// Evaluator payload recorded for this turn, if any.
    #[serde(default)]
    pub progress: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transcript {
    pub persona: Persona,
    pub turns: Vec<TranscriptTurn>,
    pub coaching_questions: Vec<String>,
}

impl Transcript {
    pub fn from_json_str(s: &str) -> Result<Self, TranscriptError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, TranscriptError> {
        let content = fs::read_to_string(path).map_err(|source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_transcript_uses_defaults() {
        let t = Transcript::from_json_str(r#"{"turns":[{"trainee":"Hello there."}]}"#).unwrap();
        assert_eq!(t.turns.len(), 1);
        assert!(t.turns[0].progress.is_none());
        assert!(t.turns[0].client.is_none());
        assert_eq!(t.persona.difficulty(), Difficulty::Beginner);
        assert!(t.coaching_questions.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Transcript::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TranscriptError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(
            &path,
            r#"{"persona":{"name":"Dana","difficulty":"Advanced","traits":{"agreeableness":25}},"coachingQuestions":["What is a rider?"]}"#,
        )
        .unwrap();
        let t = Transcript::load(&path).unwrap();
        assert_eq!(t.persona.name, "Dana");
        assert_eq!(t.persona.difficulty(), Difficulty::Advanced);
        assert_eq!(t.persona.traits.agreeableness, 25.0);
        assert_eq!(t.coaching_questions, vec!["What is a rider?".to_string()]);
    }
}
