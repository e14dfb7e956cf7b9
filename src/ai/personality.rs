//! AI personalities and the remote prompt builder
//!
//! One canonical table drives both decision paths: the local heuristics
//! read the numeric weights, the remote prompt builder reads the text.
//! Keeping them together means a personality tweak cannot drift between
//! the two implementations.

use crate::sim::GameSnapshot;

/// The five scripted paddle personalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    Aggressive,
    Defensive,
    Predictive,
    Adaptive,
    #[default]
    Balanced,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Aggressive,
        Personality::Defensive,
        Personality::Predictive,
        Personality::Adaptive,
        Personality::Balanced,
    ];

    /// Wire key, lowercase
    pub fn as_str(&self) -> &'static str {
        self.profile().key
    }

    /// Display name used in reasoning strings and the HUD
    pub fn display_name(&self) -> &'static str {
        self.profile().name
    }

    pub fn from_str(s: &str) -> Option<Personality> {
        Personality::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    /// Next personality in the "P" key cycle order
    pub fn cycle_next(&self) -> Personality {
        let idx = Personality::ALL.iter().position(|p| p == self).unwrap_or(0);
        Personality::ALL[(idx + 1) % Personality::ALL.len()]
    }

    pub fn profile(&self) -> &'static PersonalityProfile {
        &PROFILES[Personality::ALL.iter().position(|p| p == self).unwrap_or(4)]
    }
}

/// Canonical per-personality configuration, consumed by both the local
/// heuristics (numeric fields) and the remote prompt builder (text fields)
#[derive(Debug)]
pub struct PersonalityProfile {
    pub key: &'static str,
    pub name: &'static str,
    /// Risk offset added along the ball's travel direction on a predicted
    /// hit, scaled by ball speed
    pub risk_adjustment: f32,
    /// Pull toward the ball's offset from center when no hit is predicted
    pub center_bias: f32,
    /// Fixed confidence when the trajectory predictor found a hit
    pub confidence_hit: u32,
    /// Fixed confidence otherwise
    pub confidence_miss: u32,
    /// Sampling temperature passed through to the remote model
    pub temperature: f32,
    pub system_prompt: &'static str,
    pub strategy_bias: &'static str,
}

static PROFILES: [PersonalityProfile; 5] = [
    PersonalityProfile {
        key: "aggressive",
        name: "Aggressive",
        risk_adjustment: 25.0 * 0.8,
        center_bias: 0.6,
        confidence_hit: 85,
        confidence_miss: 65,
        temperature: 0.9,
        system_prompt: "You are an aggressive AI player who takes high-risk, high-reward positions. Move quickly to intercept balls and prioritize offensive play over safety.",
        strategy_bias: "Take calculated risks to maximize ball control and score opportunities.",
    },
    PersonalityProfile {
        key: "defensive",
        name: "Defensive",
        risk_adjustment: 0.0,
        center_bias: 0.2,
        confidence_hit: 90,
        confidence_miss: 75,
        temperature: 0.3,
        system_prompt: "You are a defensive AI player who focuses on safe positioning and ball control. Minimize risk of missing the ball and prioritize defensive play.",
        strategy_bias: "Maintain safe positioning and avoid risky moves that could result in losing the ball.",
    },
    PersonalityProfile {
        key: "predictive",
        name: "Predictive",
        risk_adjustment: 0.0,
        center_bias: 0.2,
        confidence_hit: 88,
        confidence_miss: 88,
        temperature: 0.5,
        system_prompt: "You are a predictive AI player who uses advanced calculations and perfect trajectory prediction. Anticipate ball movement with mathematical precision.",
        strategy_bias: "Use advanced trajectory calculations and predict future ball positions accurately.",
    },
    PersonalityProfile {
        key: "adaptive",
        name: "Adaptive",
        risk_adjustment: 0.0,
        center_bias: 0.2,
        confidence_hit: 82,
        confidence_miss: 82,
        temperature: 0.7,
        system_prompt: "You are an adaptive AI player who switches strategies based on current game situation. Adapt behavior dynamically to changing game conditions.",
        strategy_bias: "Analyze current game state and adapt strategy accordingly. Switch between aggressive and defensive play based on context.",
    },
    PersonalityProfile {
        key: "balanced",
        name: "Balanced",
        risk_adjustment: 15.0,
        center_bias: 0.4,
        confidence_hit: 85,
        confidence_miss: 60,
        temperature: 0.6,
        system_prompt: "You are a balanced AI player who maintains well-rounded gameplay with moderate risk-taking and strategic positioning.",
        strategy_bias: "Maintain balanced gameplay with moderate risk-taking and strategic positioning.",
    },
];

/// Difficulty level forwarded to the remote endpoint. Only the prompt's
/// descriptive framing changes; local heuristic math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Difficulty> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    fn framing(&self) -> (&'static str, &'static str) {
        match self {
            Difficulty::Easy => (
                "Take more time to decide, don't rush decisions.",
                "Aim for the general area, perfect precision not required.",
            ),
            Difficulty::Medium => (
                "Balance speed and accuracy in decisions.",
                "Aim for good positioning with reasonable precision.",
            ),
            Difficulty::Hard => (
                "Make quick, decisive moves.",
                "Precise positioning and optimal ball control required.",
            ),
            Difficulty::Expert => (
                "Instantaneous optimal decisions required.",
                "Perfect positioning and maximum efficiency.",
            ),
        }
    }
}

/// Situation summary injected into the adaptive personality's prompt.
/// The low-lives boundary matches the local adaptive heuristic.
fn adaptive_context(snapshot: &GameSnapshot) -> &'static str {
    let score_ratio = snapshot.score as f32 / 1000.0;
    let bricks_ratio = snapshot.bricks_remaining as f32 / 50.0;

    if snapshot.lives <= 1 {
        "CRITICAL: Very low lives remaining - prioritize defensive play and safety."
    } else if score_ratio > 2.0 {
        "HIGH SCORE: Excellent performance - can take moderate risks for bonus points."
    } else if bricks_ratio < 0.2 {
        "FINAL STAGE: Few bricks left - focus on precision and completion."
    } else {
        "NORMAL: Balanced gameplay appropriate for current state."
    }
}

/// Build the user prompt for the remote endpoint
pub fn build_prompt(
    snapshot: &GameSnapshot,
    personality: Personality,
    difficulty: Difficulty,
) -> String {
    let profile = personality.profile();
    let (response_speed, accuracy) = difficulty.framing();

    let adaptive_line = if personality == Personality::Adaptive {
        format!("Adaptive Context: {}\n", adaptive_context(snapshot))
    } else {
        String::new()
    };

    let power_ups: Vec<&str> = snapshot
        .active_power_ups
        .iter()
        .map(|k| k.as_str())
        .collect();

    format!(
        "You are {} AI playing Breakout. {}\n\n\
         Personality Instructions: {}\n\n\
         {}Difficulty Level: {}\n\
         - {}\n\
         - {}\n\n\
         Current Game State:\n\
         - Ball position: ({}, {})\n\
         - Ball velocity: ({}, {})\n\
         - Ball speed: {:.2}\n\
         - Paddle position: ({}, {})\n\
         - Paddle width: {}\n\
         - Canvas dimensions: {} x {}\n\
         - Current score: {}\n\
         - Lives remaining: {}\n\
         - Bricks remaining: {}\n\
         - Active power-ups: {:?}\n\n\
         Calculate the optimal paddle position based on your {} personality.\n\n\
         Respond with ONLY valid JSON in this exact format:\n\
         {{\n\
           \"paddleX\": <optimal_x_position_number>,\n\
           \"strategy\": \"<brief_strategy_name>\",\n\
           \"confidence\": <confidence_0_to_100>,\n\
           \"reasoning\": \"[{}] <detailed_explanation>\"\n\
         }}",
        profile.key,
        profile.system_prompt,
        profile.strategy_bias,
        adaptive_line,
        difficulty.as_str(),
        response_speed,
        accuracy,
        snapshot.ball_pos.x,
        snapshot.ball_pos.y,
        snapshot.ball_vel.x,
        snapshot.ball_vel.y,
        snapshot.ball_speed(),
        snapshot.paddle_x,
        snapshot.paddle_y,
        snapshot.paddle_width,
        snapshot.canvas_width,
        snapshot.canvas_height,
        snapshot.score,
        snapshot.lives,
        snapshot.bricks_remaining,
        power_ups,
        profile.key,
        profile.name,
    )
}
