//! Per-session pipeline and the session store.
//!
//! A [`SimulationSession`] is single-writer: every mutation goes through `&mut self`.
//! [`SessionStore`] hands out one async mutex per session id, so concurrent callers on the same
//! session are serialized while different sessions proceed independently.

use crate::actions::{classify, ActionSet};
use crate::affect::{AffectEngine, AffectState, ChangeSignals, EmotionalContext, FlagSet};
use crate::config::EngineConfig;
use crate::guidance::{inject_dynamic_context, insert_before_marker, synthesize};
use crate::objectives::{BatchOutcome, ObjectiveBoard, ProgressHeuristics, ProgressPayload, RewardEvent};
use crate::shared::{Difficulty, PersonalityTraits};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Everything the UI and the prompt builder need after one trainee turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub turn: usize,
    pub actions: ActionSet,
    pub state: AffectState,
    pub flags: FlagSet,
    pub signals: ChangeSignals,
    /// Drift from the session start, e.g. "Trust has increased significantly."
    pub trend: String,
    pub guidance: String,
    pub objectives: BatchOutcome,
    pub rewards: Vec<RewardEvent>,
}

/// Serializable session records for an external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub difficulty: Difficulty,
    pub context: EmotionalContext,
    pub objectives: ObjectiveBoard,
}

pub struct SimulationSession {
    id: Uuid,
    difficulty: Difficulty,
    engine: AffectEngine,
    context: EmotionalContext,
    objectives: ObjectiveBoard,
}

impl SimulationSession {
    pub fn start(traits: PersonalityTraits, difficulty: Difficulty, config: &EngineConfig) -> Self {
        let engine = AffectEngine::new(config.affect.clone());
        let context = engine.initialize(&traits, difficulty);
        let id = Uuid::new_v4();
        tracing::info!(
            target: "parley::session",
            session_id = %id,
            difficulty = difficulty.as_str(),
            "Simulation session started"
        );
        Self {
            id,
            difficulty,
            engine,
            context,
            objectives: ObjectiveBoard::standard(),
        }
    }

    pub fn restore(snapshot: SessionSnapshot, config: &EngineConfig) -> Self {
        Self {
            id: snapshot.id,
            difficulty: snapshot.difficulty,
            engine: AffectEngine::new(config.affect.clone()),
            context: snapshot.context,
            objectives: snapshot.objectives,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            difficulty: self.difficulty,
            context: self.context.clone(),
            objectives: self.objectives.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn context(&self) -> &EmotionalContext {
        &self.context
    }

    pub fn objectives(&self) -> &ObjectiveBoard {
        &self.objectives
    }

    /// Classify, advance affect, synthesize guidance, then raise heuristic objective progress.
    pub fn process_trainee_turn(&mut self, utterance: &str) -> TurnReport {
        let actions = classify(utterance);
        self.context = self.engine.advance(&self.context, &actions);
        let guidance = synthesize(&self.context);

        let inferred = ProgressHeuristics::from_actions(&self.objectives, &actions);
        let objectives = self.objectives.raise_payload(&inferred);
        let rewards = objectives.rewards();

        tracing::debug!(
            target: "parley::session",
            session_id = %self.id,
            turn = self.context.turn_count(),
            actions = actions.len(),
            guidance_len = guidance.len(),
            rewards = rewards.len(),
            "Processed trainee turn"
        );

        TurnReport {
            turn: self.context.turn_count(),
            actions,
            state: self.context.current_state,
            flags: self.context.flags,
            signals: self.context.change_signals(),
            trend: self.context.trend_summary(),
            guidance,
            objectives,
            rewards,
        }
    }

    /// Applies a structured progress payload from the evaluator.
    pub fn apply_progress(&mut self, payload: &Value) -> BatchOutcome {
        let payload = ProgressPayload::from_value(payload);
        self.objectives.apply_payload(&payload)
    }

    /// Keyword completion check over the trainee line and the client's reply. Only raises
    /// progress.
    pub fn apply_exchange(&mut self, trainee: &str, client_reply: &str) -> BatchOutcome {
        let inferred = ProgressHeuristics::from_exchange(&self.objectives, trainee, client_reply);
        if !inferred.is_empty() {
            tracing::debug!(
                target: "parley::session",
                session_id = %self.id,
                objectives = inferred.scores.len(),
                "Exchange cues matched"
            );
        }
        self.objectives.raise_payload(&inferred)
    }

    /// Next persona system prompt: base, difficulty line and emotional context, then directives.
    pub fn system_prompt(&self, base: &str) -> String {
        let with_difficulty = insert_before_marker(base, self.difficulty.instruction());
        inject_dynamic_context(&with_difficulty, &self.context)
    }
}

/// Concurrent registry of live sessions keyed by id.
pub struct SessionStore {
    config: Arc<EngineConfig>,
    sessions: DashMap<Uuid, Arc<Mutex<SimulationSession>>>,
}

impl SessionStore {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    pub fn create(&self, traits: PersonalityTraits, difficulty: Difficulty) -> Uuid {
        let session = SimulationSession::start(traits, difficulty, &self.config);
        let id = session.id();
        self.sessions.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<SimulationSession>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub async fn process_turn(&self, id: &Uuid, utterance: &str) -> Option<TurnReport> {
        let session = self.get(id)?;
        let mut guard = session.lock().await;
        Some(guard.process_trainee_turn(utterance))
    }

    pub async fn apply_progress(&self, id: &Uuid, payload: &Value) -> Option<BatchOutcome> {
        let session = self.get(id)?;
        let mut guard = session.lock().await;
        Some(guard.apply_progress(payload))
    }

    /// Drops the session. Returns false if it was not live.
    pub fn end(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::info!(target: "parley::session", session_id = %id, "Simulation session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
