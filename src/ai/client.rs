//! AI client orchestrator
//!
//! Owns the remote-vs-local choice and the displayed metrics. The state
//! machine is platform-neutral: callers drive it with [`AiClient::poll`]
//! on a fixed cadence and feed async results back through
//! [`AiClient::complete_probe`] / [`AiClient::complete_remote`], so the
//! whole decision flow is testable without a browser.

use crate::ai::heuristics::local_decision;
use crate::ai::personality::{Difficulty, Personality};
use crate::ai::remote::{parse_decision, DecisionRequest};
use crate::ai::{AiDecision, DecisionError, DecisionProvider};
use crate::sim::GameSnapshot;

/// Metrics mirrored into the status panel
#[derive(Debug, Clone)]
pub struct AiMetrics {
    pub confidence: u32,
    pub strategy: String,
    pub reasoning: String,
    pub response_time_ms: f64,
    pub enabled: bool,
    pub connected: bool,
}

impl Default for AiMetrics {
    fn default() -> Self {
        Self {
            confidence: 0,
            strategy: "STANDBY".to_string(),
            reasoning: "AI disabled".to_string(),
            response_time_ms: 0.0,
            enabled: false,
            connected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientPhase {
    Disabled,
    /// Connectivity probe outstanding; polls are skipped meanwhile
    Probing,
    Connected,
    /// Remote demoted for this session; local heuristics until re-enable
    Local,
}

/// What the caller should do for one poll cycle
#[derive(Debug)]
pub enum PollAction {
    /// Nothing this cycle (disabled, probing, paused, or request in flight)
    Skip,
    /// Dispatch this request to the remote endpoint
    Remote(DecisionRequest),
    /// Local decision, already recorded in the metrics
    Local(AiDecision),
}

pub struct AiClient {
    endpoint: String,
    pub personality: Personality,
    pub difficulty: Difficulty,
    phase: ClientPhase,
    in_flight: bool,
    metrics: AiMetrics,
}

impl AiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            personality: Personality::default(),
            difficulty: Difficulty::default(),
            phase: ClientPhase::Disabled,
            in_flight: false,
            metrics: AiMetrics::default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn enabled(&self) -> bool {
        self.phase != ClientPhase::Disabled
    }

    pub fn connected(&self) -> bool {
        self.phase == ClientPhase::Connected
    }

    pub fn metrics(&self) -> &AiMetrics {
        &self.metrics
    }

    /// Begin a session: returns the connectivity probe to dispatch
    pub fn enable(&mut self) -> DecisionRequest {
        self.phase = ClientPhase::Probing;
        self.in_flight = false;
        self.metrics = AiMetrics {
            enabled: true,
            reasoning: "Awaiting initialization...".to_string(),
            ..AiMetrics::default()
        };
        log::info!("AI enabled, probing {}", self.endpoint);
        DecisionRequest::probe(self.difficulty)
    }

    /// Resolve the connectivity probe. Failure is not fatal: the session
    /// runs on local heuristics until the next enable.
    pub fn complete_probe(&mut self, result: Result<(), DecisionError>) {
        if self.phase != ClientPhase::Probing {
            return;
        }
        match result {
            Ok(()) => {
                self.phase = ClientPhase::Connected;
                self.metrics.connected = true;
                log::info!("AI endpoint online");
            }
            Err(err) => {
                self.phase = ClientPhase::Local;
                self.metrics.connected = false;
                log::warn!("AI endpoint unreachable ({err}), using local heuristics");
            }
        }
    }

    /// Stop polling and zero the displayed metrics. The paddle keeps its
    /// last position; whatever input comes next takes over.
    pub fn disable(&mut self) {
        self.phase = ClientPhase::Disabled;
        self.in_flight = false;
        self.metrics = AiMetrics::default();
        log::info!("AI disabled");
    }

    /// One poll cycle. Remote cycles are skipped while a request is still
    /// in flight rather than queued behind it.
    pub fn poll(&mut self, snapshot: &GameSnapshot) -> PollAction {
        if !self.enabled() || !snapshot.running {
            return PollAction::Skip;
        }

        match self.phase {
            ClientPhase::Disabled | ClientPhase::Probing => PollAction::Skip,
            ClientPhase::Connected => {
                if self.in_flight {
                    return PollAction::Skip;
                }
                self.in_flight = true;
                PollAction::Remote(DecisionRequest::new(
                    snapshot,
                    self.personality,
                    self.difficulty,
                ))
            }
            ClientPhase::Local => {
                let decision = local_decision(snapshot, self.personality);
                self.record(&decision, 0.0);
                PollAction::Local(decision)
            }
        }
    }

    /// Feed a finished remote request back in. Transport or status errors
    /// demote the session to local mode; a decision is always returned.
    pub fn complete_remote(
        &mut self,
        result: Result<String, DecisionError>,
        snapshot: &GameSnapshot,
        elapsed_ms: f64,
    ) -> Option<AiDecision> {
        self.in_flight = false;
        if !self.enabled() {
            return None;
        }

        let decision = match result {
            Ok(body) => parse_decision(&body, snapshot, self.personality),
            Err(err) => {
                log::warn!("Remote decision failed ({err}), demoting to local heuristics");
                self.phase = ClientPhase::Local;
                self.metrics.connected = false;
                local_decision(snapshot, self.personality)
            }
        };

        self.record(&decision, elapsed_ms);
        Some(decision)
    }

    pub fn cycle_personality(&mut self) -> Personality {
        self.personality = self.personality.cycle_next();
        log::info!("Personality set to {}", self.personality.display_name());
        self.personality
    }

    fn record(&mut self, decision: &AiDecision, elapsed_ms: f64) {
        self.metrics.confidence = decision.confidence;
        self.metrics.strategy = decision.strategy.clone();
        self.metrics.reasoning = decision.reasoning.clone();
        self.metrics.response_time_ms = elapsed_ms;
    }
}

/// Per-frame provider backed by the local heuristics, for sessions that
/// steer the paddle without the polling orchestrator
#[derive(Debug, Default)]
pub struct LocalProvider {
    pub personality: Personality,
}

impl DecisionProvider for LocalProvider {
    fn decide(&mut self, snapshot: &GameSnapshot) -> Result<Option<AiDecision>, DecisionError> {
        Ok(Some(local_decision(snapshot, self.personality)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    fn running_snapshot() -> GameSnapshot {
        let mut snap = GameState::new(1).snapshot();
        snap.running = true;
        snap.started = true;
        snap
    }

    #[test]
    fn probe_failure_demotes_to_local() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Err(DecisionError::Status(500)));
        assert!(client.enabled());
        assert!(!client.connected());

        match client.poll(&running_snapshot()) {
            PollAction::Local(decision) => {
                assert!(decision.paddle_x.is_finite());
                assert_eq!(client.metrics().strategy, decision.strategy);
            }
            other => panic!("expected local decision, got {other:?}"),
        }
    }

    #[test]
    fn connected_polls_skip_while_in_flight() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Ok(()));
        let snap = running_snapshot();

        assert!(matches!(client.poll(&snap), PollAction::Remote(_)));
        assert!(matches!(client.poll(&snap), PollAction::Skip));

        client.complete_remote(Ok("{bad".to_string()), &snap, 12.0);
        assert!(matches!(client.poll(&snap), PollAction::Remote(_)));
    }

    #[test]
    fn remote_error_demotes_permanently_until_reenable() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Ok(()));
        let snap = running_snapshot();

        assert!(matches!(client.poll(&snap), PollAction::Remote(_)));
        let decision = client.complete_remote(
            Err(DecisionError::Transport("timeout".to_string())),
            &snap,
            250.0,
        );
        assert!(decision.is_some());
        assert!(!client.connected());
        assert!(matches!(client.poll(&snap), PollAction::Local(_)));

        // Re-enable probes again
        client.enable();
        client.complete_probe(Ok(()));
        assert!(client.connected());
    }

    #[test]
    fn polls_are_skipped_while_game_is_not_running() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Ok(()));
        let snap = GameState::new(1).snapshot();
        assert!(matches!(client.poll(&snap), PollAction::Skip));
    }

    #[test]
    fn disable_zeroes_metrics() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Err(DecisionError::Unavailable));
        let _ = client.poll(&running_snapshot());
        assert_ne!(client.metrics().strategy, "STANDBY");

        client.disable();
        let metrics = client.metrics();
        assert_eq!(metrics.confidence, 0);
        assert_eq!(metrics.strategy, "STANDBY");
        assert_eq!(metrics.response_time_ms, 0.0);
        assert!(!metrics.enabled);
        assert!(matches!(client.poll(&running_snapshot()), PollAction::Skip));
    }

    #[test]
    fn remote_success_records_latency() {
        let mut client = AiClient::new("/api/paddle-ai");
        client.enable();
        client.complete_probe(Ok(()));
        let snap = running_snapshot();
        assert!(matches!(client.poll(&snap), PollAction::Remote(_)));

        let body = r#"{"success": true, "aiDecision": {
            "paddleX": 150.0, "strategy": "BALANCED_TRACKING",
            "confidence": 80, "reasoning": "[Balanced] ok"}}"#;
        let decision = client.complete_remote(Ok(body.to_string()), &snap, 42.0).unwrap();
        assert_eq!(decision.paddle_x, 150.0);
        assert_eq!(client.metrics().response_time_ms, 42.0);
        assert_eq!(client.metrics().confidence, 80);
    }
}
