//! Remote decision endpoint wire format and transport
//!
//! JSON shapes mirror the serverless endpoint exactly (camelCase keys).
//! Parsing never fails outward: anything malformed is substituted with the
//! matching local-personality decision so gameplay keeps moving.

use serde::{Deserialize, Serialize};

use crate::ai::heuristics::local_decision;
use crate::ai::personality::{build_prompt, Difficulty, Personality};
use crate::ai::{AiDecision, DecisionError};
use crate::clamp_paddle_x;
use crate::sim::GameSnapshot;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBall {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePaddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCanvas {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGameState {
    pub ball: WireBall,
    pub paddle: WirePaddle,
    pub canvas: WireCanvas,
    pub score: u32,
    pub lives: u32,
    pub bricks_remaining: u32,
    pub power_ups: Vec<String>,
    pub game_running: bool,
}

impl WireGameState {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            ball: WireBall {
                x: snapshot.ball_pos.x,
                y: snapshot.ball_pos.y,
                dx: snapshot.ball_vel.x,
                dy: snapshot.ball_vel.y,
            },
            paddle: WirePaddle {
                x: snapshot.paddle_x,
                y: snapshot.paddle_y,
                width: snapshot.paddle_width,
            },
            canvas: WireCanvas {
                width: snapshot.canvas_width,
                height: snapshot.canvas_height,
            },
            score: snapshot.score,
            lives: snapshot.lives,
            bricks_remaining: snapshot.bricks_remaining,
            power_ups: snapshot
                .active_power_ups
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            game_running: snapshot.running,
        }
    }

    /// Fixed placeholder payload for the connectivity probe
    pub fn probe() -> Self {
        Self {
            ball: WireBall {
                x: 240.0,
                y: 160.0,
                dx: 2.0,
                dy: -2.0,
            },
            paddle: WirePaddle {
                x: 200.0,
                y: 300.0,
                width: 80.0,
            },
            canvas: WireCanvas {
                width: 480.0,
                height: 320.0,
            },
            score: 0,
            lives: 3,
            bricks_remaining: 20,
            power_ups: Vec::new(),
            game_running: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub game_state: WireGameState,
    pub difficulty: String,
    pub personality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_prompt: Option<String>,
}

impl DecisionRequest {
    pub fn new(snapshot: &GameSnapshot, personality: Personality, difficulty: Difficulty) -> Self {
        Self {
            game_state: WireGameState::from_snapshot(snapshot),
            difficulty: difficulty.as_str().to_string(),
            personality: personality.as_str().to_string(),
            personality_prompt: Some(build_prompt(snapshot, personality, difficulty)),
        }
    }

    pub fn probe(difficulty: Difficulty) -> Self {
        Self {
            game_state: WireGameState::probe(),
            difficulty: difficulty.as_str().to_string(),
            personality: Personality::default().as_str().to_string(),
            personality_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ai_decision: Option<WireDecision>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDecision {
    #[serde(default)]
    pub paddle_x: Option<f64>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Turn a response body into a decision.
///
/// Malformed JSON, a failed `success` flag, or a missing/non-finite
/// `paddleX` all degrade to the personality's local heuristic.
pub fn parse_decision(
    body: &str,
    snapshot: &GameSnapshot,
    personality: Personality,
) -> AiDecision {
    let response: DecisionResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(err) => {
            log::warn!("Unparseable AI response, using local fallback: {err}");
            return local_decision(snapshot, personality);
        }
    };

    let wire = match response.ai_decision {
        Some(d) if response.success => d,
        _ => {
            log::warn!(
                "AI endpoint reported failure: {}",
                response.error.as_deref().unwrap_or("no decision")
            );
            return local_decision(snapshot, personality);
        }
    };

    let paddle_x = match wire.paddle_x {
        Some(x) if x.is_finite() => x as f32,
        _ => {
            log::warn!("AI decision missing a usable paddleX, using local fallback");
            return local_decision(snapshot, personality);
        }
    };

    AiDecision {
        paddle_x: clamp_paddle_x(paddle_x, snapshot.canvas_width, snapshot.paddle_width),
        strategy: wire.strategy.unwrap_or_else(|| "UNKNOWN".to_string()),
        confidence: wire
            .confidence
            .map(|c| c.clamp(0.0, 100.0) as u32)
            .unwrap_or(0),
        reasoning: wire
            .reasoning
            .unwrap_or_else(|| "No reasoning provided".to_string()),
        personality,
    }
}

/// POST a decision request and return the raw response body
#[cfg(target_arch = "wasm32")]
pub async fn fetch_decision(
    endpoint: &str,
    request: &DecisionRequest,
) -> Result<String, DecisionError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let body =
        serde_json::to_string(request).map_err(|e| DecisionError::Malformed(e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));

    let req = Request::new_with_str_and_init(endpoint, &opts)
        .map_err(|e| DecisionError::Transport(format!("{e:?}")))?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(|e| DecisionError::Transport(format!("{e:?}")))?;

    let window =
        web_sys::window().ok_or_else(|| DecisionError::Transport("no window".to_string()))?;
    let resp = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|e| DecisionError::Transport(format!("{e:?}")))?;
    let resp: Response = resp
        .dyn_into()
        .map_err(|_| DecisionError::Transport("unexpected fetch result".to_string()))?;

    if !resp.ok() {
        return Err(DecisionError::Status(resp.status()));
    }

    let text = resp
        .text()
        .map_err(|e| DecisionError::Transport(format!("{e:?}")))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| DecisionError::Transport(format!("{e:?}")))?;
    text.as_string()
        .ok_or_else(|| DecisionError::Malformed("non-text body".to_string()))
}

/// No remote path exists off the web target
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_decision(
    _endpoint: &str,
    _request: &DecisionRequest,
) -> Result<String, DecisionError> {
    Err(DecisionError::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;

    fn snapshot() -> GameSnapshot {
        GameState::new(1).snapshot()
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let snap = snapshot();
        let request = DecisionRequest::new(&snap, Personality::Predictive, Difficulty::Hard);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"gameState\""));
        assert!(json.contains("\"bricksRemaining\":24"));
        assert!(json.contains("\"personality\":\"predictive\""));
        assert!(json.contains("\"personalityPrompt\""));
        assert!(json.contains("\"difficulty\":\"hard\""));
    }

    #[test]
    fn probe_request_omits_prompt() {
        let json = serde_json::to_string(&DecisionRequest::probe(Difficulty::Medium)).unwrap();
        assert!(!json.contains("personalityPrompt"));
        assert!(json.contains("\"gameRunning\":false"));
    }

    #[test]
    fn valid_response_is_parsed_and_clamped() {
        let snap = snapshot();
        let body = r#"{
            "success": true,
            "aiDecision": {
                "paddleX": 9999.0,
                "strategy": "AGGRESSIVE_INTERCEPT",
                "confidence": 85,
                "reasoning": "[Aggressive] test"
            }
        }"#;
        let decision = parse_decision(body, &snap, Personality::Aggressive);
        assert_eq!(decision.paddle_x, snap.canvas_width - snap.paddle_width);
        assert_eq!(decision.strategy, "AGGRESSIVE_INTERCEPT");
        assert_eq!(decision.confidence, 85);
    }

    #[test]
    fn malformed_json_falls_back_to_local_heuristic() {
        let snap = snapshot();
        let decision = parse_decision("not json {", &snap, Personality::Defensive);
        let expected = local_decision(&snap, Personality::Defensive);
        assert_eq!(decision, expected);
    }

    #[test]
    fn missing_paddle_x_falls_back() {
        let snap = snapshot();
        let body = r#"{"success": true, "aiDecision": {"strategy": "X"}}"#;
        let decision = parse_decision(body, &snap, Personality::Balanced);
        assert_eq!(decision, local_decision(&snap, Personality::Balanced));
    }

    #[test]
    fn failed_response_falls_back() {
        let snap = snapshot();
        let body = r#"{"success": false, "error": "AI processing failed"}"#;
        let decision = parse_decision(body, &snap, Personality::Predictive);
        assert_eq!(decision, local_decision(&snap, Personality::Predictive));
    }

    #[test]
    fn confidence_is_clamped_to_percent_range() {
        let snap = snapshot();
        let body = r#"{"success": true, "aiDecision": {"paddleX": 100.0, "confidence": 400}}"#;
        let decision = parse_decision(body, &snap, Personality::Balanced);
        assert_eq!(decision.confidence, 100);
    }
}
