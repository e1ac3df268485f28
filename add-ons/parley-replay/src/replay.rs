//! Runs a transcript through a simulation session and collects a report.

use crate::transcript::Transcript;
use parley_core::{
    ActionSet, AffectState, ChangeSignals, EngineConfig, RewardEvent, SimulationSession, Tier,
    TierClassifier,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ObjectiveLine {
    pub id: String,
    pub progress: u8,
    pub high_water_mark: u8,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrease_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TurnSummary {
    pub turn: usize,
    pub trainee: String,
    pub actions: ActionSet,
    pub state: AffectState,
    pub flags: Vec<&'static str>,
    pub signals: ChangeSignals,
    pub trend: String,
    pub guidance: String,
    pub objectives: Vec<ObjectiveLine>,
    pub rewards: Vec<RewardEvent>,
    pub feedback: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub question: String,
    pub tier: Tier,
    pub used_fallback: bool,
    pub template: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub persona: String,
    pub difficulty: &'static str,
    pub turns: Vec<TurnSummary>,
    pub questions: Vec<QuestionSummary>,
    pub xp_earned: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_system_prompt: Option<String>,
}

fn objective_lines(session: &SimulationSession) -> Vec<ObjectiveLine> {
    session
        .objectives()
        .objectives()
        .iter()
        .map(|o| ObjectiveLine {
            id: o.id.clone(),
            progress: o.progress,
            high_water_mark: o.high_water_mark,
            completed: o.completed,
            decrease_reason: o.decrease_reason.clone(),
        })
        .collect()
}

/// Replays every trainee turn, then classifies the coaching questions. A recorded evaluator
/// payload is applied after the heuristics; without one, a recorded client reply feeds the
/// keyword completion check.
pub async fn run(
    transcript: &Transcript,
    config: &EngineConfig,
    classifier: &TierClassifier,
    include_prompt: bool,
) -> ReplayReport {
    let persona = &transcript.persona;
    let mut session = SimulationSession::start(persona.traits, persona.difficulty(), config);

    let mut turns = Vec::with_capacity(transcript.turns.len());
    for turn in &transcript.turns {
        let report = session.process_trainee_turn(&turn.trainee);
        let mut rewards = report.rewards.clone();
        let mut feedback = report.objectives.feedback_messages();

        let batch = match (&turn.progress, &turn.client) {
            (Some(payload), _) => Some(session.apply_progress(payload)),
            (None, Some(reply)) => Some(session.apply_exchange(&turn.trainee, reply)),
            (None, None) => None,
        };
        if let Some(batch) = batch {
            rewards.extend(batch.rewards());
            feedback.extend(batch.feedback_messages());
        }

        turns.push(TurnSummary {
            turn: report.turn,
            trainee: turn.trainee.clone(),
            actions: report.actions,
            state: report.state,
            flags: report.flags.active_names(),
            signals: report.signals,
            trend: report.trend,
            guidance: report.guidance,
            objectives: objective_lines(&session),
            rewards,
            feedback,
        });
    }

    let mut questions = Vec::with_capacity(transcript.coaching_questions.len());
    for question in &transcript.coaching_questions {
        let c = classifier.classify(question).await;
        questions.push(QuestionSummary {
            question: question.clone(),
            tier: c.tier,
            used_fallback: c.used_fallback,
            template: c.tier.response_template(),
        });
    }

    let next_system_prompt = include_prompt.then(|| {
        let base = persona.system_prompt.clone().unwrap_or_else(|| {
            format!(
                "You are {}, a client meeting a financial advisor.\n\nRemember to stay in character throughout the conversation.",
                if persona.name.is_empty() { "the client" } else { persona.name.as_str() }
            )
        });
        session.system_prompt(&base)
    });

    tracing::info!(
        target: "parley::replay",
        turns = turns.len(),
        questions = questions.len(),
        xp = session.objectives().xp_earned(),
        "Replay finished"
    );

    ReplayReport {
        persona: persona.name.clone(),
        difficulty: persona.difficulty().as_str(),
        turns,
        questions,
        xp_earned: session.objectives().xp_earned(),
        next_system_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "persona": { "name": "Dana", "difficulty": "beginner" },
        "turns": [
            { "trainee": "It sounds like you're worried about your savings." },
            { "trainee": "What would a comfortable retirement look like for you?",
              "progress": { "needs": 100, "explanation": "Thorough discovery." } },
            { "trainee": "You're an idiot." },
            { "trainee": "Sorry. Is this a good time?",
              "client": "Fine. I'd like to hear what you recommend." }
        ],
        "coachingQuestions": ["What is a rider?"]
    }"#;

    #[tokio::test]
    async fn replay_reports_each_turn() {
        let transcript = Transcript::from_json_str(SAMPLE).unwrap();
        let config = EngineConfig::default();
        let report = run(&transcript, &config, &TierClassifier::default(), true).await;

        assert_eq!(report.turns.len(), 4);
        assert_eq!(report.turns[0].objectives[0].progress, 25);

        let second = &report.turns[1];
        assert_eq!(second.rewards.len(), 1);
        assert_eq!(second.rewards[0].objective_id, "needs");
        assert!(second.feedback.iter().any(|f| f == "Advisor progress: Thorough discovery."));

        assert!(report.turns[2].flags.contains(&"rudenessDetected"));
        assert!(report.turns[2].signals.defensive_reaction);

        let fourth = &report.turns[3];
        assert_eq!(fourth.rewards.len(), 1);
        assert_eq!(fourth.rewards[0].objective_id, "recommendations");
        assert_eq!(report.xp_earned, 200);
        assert_eq!(report.questions[0].tier, Tier::Factual);
        assert!(!report.questions[0].used_fallback);

        let prompt = report.next_system_prompt.unwrap();
        assert!(prompt.starts_with("You are Dana"));
        assert!(prompt.contains("DIFFICULTY: Beginner"));
    }
}
