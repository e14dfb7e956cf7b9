//! Paddle decision engine
//!
//! Two decision paths produce the same [`AiDecision`] shape: a remote HTTP
//! endpoint ([`remote`]) and the local personality heuristics
//! ([`heuristics`]). The [`client`] orchestrator owns the choice between
//! them; the simulation only ever sees a clamped target x.

pub mod client;
pub mod heuristics;
pub mod personality;
pub mod remote;

pub use client::{AiClient, AiMetrics, LocalProvider, PollAction};
pub use personality::{Difficulty, Personality};

use crate::sim::GameSnapshot;

/// One paddle steering decision, from either decision path
#[derive(Debug, Clone, PartialEq)]
pub struct AiDecision {
    /// Target paddle left edge, already clamped into the playfield
    pub paddle_x: f32,
    /// Strategy label, e.g. `PREDICTIVE_TRAJECTORY`
    pub strategy: String,
    /// Self-reported confidence, 0-100
    pub confidence: u32,
    /// Human-readable explanation shown in the metrics panel
    pub reasoning: String,
    pub personality: Personality,
}

/// Failures along the remote decision path. The orchestrator downgrades
/// all of them to the local heuristics rather than surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// Transport failure (network, CORS, aborted request)
    Transport(String),
    /// Endpoint answered with a non-success HTTP status
    Status(u16),
    /// Body was not valid JSON or missed required fields
    Malformed(String),
    /// No remote path exists on this platform
    Unavailable,
}

impl std::fmt::Display for DecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionError::Transport(msg) => write!(f, "transport error: {msg}"),
            DecisionError::Status(code) => write!(f, "endpoint returned status {code}"),
            DecisionError::Malformed(msg) => write!(f, "malformed response: {msg}"),
            DecisionError::Unavailable => write!(f, "remote endpoint unavailable"),
        }
    }
}

impl std::error::Error for DecisionError {}

/// Source of per-frame steering decisions while AI mode is active
pub trait DecisionProvider {
    /// Return a decision for this frame, or `None` to leave the paddle alone
    fn decide(&mut self, snapshot: &GameSnapshot) -> Result<Option<AiDecision>, DecisionError>;
}

/// Provider for manual play: never steers
#[derive(Debug, Default)]
pub struct NoopProvider;

impl DecisionProvider for NoopProvider {
    fn decide(&mut self, _snapshot: &GameSnapshot) -> Result<Option<AiDecision>, DecisionError> {
        Ok(None)
    }
}
