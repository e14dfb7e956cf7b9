//! High score and per-personality statistics
//!
//! Persisted to LocalStorage as one record: a single high-water score and
//! a stats block keyed by personality. Writes are last-write-wins; the
//! loop only saves on round end so there is no contention to manage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ai::Personality;

/// Rolling per-personality performance record
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityStats {
    pub games_played: u32,
    pub wins: u32,
    pub average_score: f64,
    pub average_response_time: f64,
    /// Paddle contacts across all rounds
    pub successful_hits: u32,
    /// Contacts plus misses
    pub total_hits: u32,
}

impl PersonalityStats {
    /// Fold one finished round into the running averages
    pub fn record_round(
        &mut self,
        score: u32,
        won: bool,
        avg_response_ms: f64,
        hits: u32,
        misses: u32,
    ) {
        let n = self.games_played as f64;
        self.average_score = (self.average_score * n + score as f64) / (n + 1.0);
        self.average_response_time =
            (self.average_response_time * n + avg_response_ms) / (n + 1.0);
        self.games_played += 1;
        if won {
            self.wins += 1;
        }
        self.successful_hits += hits;
        self.total_hits += hits + misses;
    }

    pub fn hit_rate(&self) -> f64 {
        if self.total_hits == 0 {
            0.0
        } else {
            self.successful_hits as f64 / self.total_hits as f64
        }
    }
}

/// Persisted score record
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HighScores {
    pub high_score: u32,
    /// Keyed by personality wire key; manual rounds are not tracked here
    pub personality_stats: HashMap<String, PersonalityStats>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neo_breakout_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a round's final score; returns true if it set a new high
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    pub fn stats_for(&mut self, personality: Personality) -> &mut PersonalityStats {
        self.personality_stats
            .entry(personality.as_str().to_string())
            .or_default()
    }

    /// Record an AI-played round under its personality
    pub fn record_ai_round(
        &mut self,
        personality: Personality,
        score: u32,
        won: bool,
        avg_response_ms: f64,
        hits: u32,
        misses: u32,
    ) {
        self.stats_for(personality)
            .record_round(score, won, avg_response_ms, hits, misses);
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded score record (high score {})", scores.high_score);
                    return scores;
                }
            }
        }

        log::info!("No score record found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Score record saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_is_monotonic() {
        let mut scores = HighScores::new();
        assert!(scores.record_score(100));
        assert!(!scores.record_score(50));
        assert!(!scores.record_score(100));
        assert_eq!(scores.high_score, 100);
        assert!(scores.record_score(150));
        assert_eq!(scores.high_score, 150);
    }

    #[test]
    fn round_averages_accumulate() {
        let mut stats = PersonalityStats::default();
        stats.record_round(100, false, 50.0, 8, 2);
        stats.record_round(200, true, 150.0, 6, 4);

        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.wins, 1);
        assert!((stats.average_score - 150.0).abs() < 1e-9);
        assert!((stats.average_response_time - 100.0).abs() < 1e-9);
        assert_eq!(stats.successful_hits, 14);
        assert_eq!(stats.total_hits, 20);
        assert!((stats.hit_rate() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn stats_are_keyed_per_personality() {
        let mut scores = HighScores::new();
        scores.record_ai_round(Personality::Aggressive, 100, false, 10.0, 5, 5);
        scores.record_ai_round(Personality::Defensive, 240, true, 20.0, 9, 1);

        assert_eq!(scores.stats_for(Personality::Aggressive).games_played, 1);
        assert_eq!(scores.stats_for(Personality::Defensive).wins, 1);
        assert_eq!(scores.stats_for(Personality::Balanced).games_played, 0);
    }

    #[test]
    fn persisted_shape_uses_camel_case() {
        let mut scores = HighScores::new();
        scores.record_score(10);
        scores.record_ai_round(Personality::Balanced, 10, false, 5.0, 1, 0);
        let json = serde_json::to_string(&scores).unwrap();
        assert!(json.contains("\"highScore\":10"));
        assert!(json.contains("\"gamesPlayed\":1"));
        assert!(json.contains("\"averageResponseTime\""));
    }
}
