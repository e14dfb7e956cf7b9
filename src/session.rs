//! Game session wrapper
//!
//! Bundles the simulation state, the control source, and an injectable
//! [`DecisionProvider`] into the single object the platform loop drives.
//! Provider errors are logged and dropped, never propagated into the
//! frame step.

use crate::ai::{DecisionProvider, NoopProvider};
use crate::control::{ControlMode, ControlState};
use crate::sim::{tick, GameState};

pub struct GameSession {
    pub state: GameState,
    pub control: ControlState,
    provider: Box<dyn DecisionProvider>,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::with_provider(seed, Box::new(NoopProvider))
    }

    pub fn with_provider(seed: u64, provider: Box<dyn DecisionProvider>) -> Self {
        Self {
            state: GameState::new(seed),
            control: ControlState::default(),
            provider,
        }
    }

    pub fn set_provider(&mut self, provider: Box<dyn DecisionProvider>) {
        self.provider = provider;
    }

    /// Advance the session by one frame.
    ///
    /// While AI mode is active the provider runs first, so the paddle
    /// moves toward the freshest target exactly once per frame.
    pub fn frame(&mut self) {
        if self.control.mode == ControlMode::Ai {
            let snapshot = self.state.snapshot();
            match self.provider.decide(&snapshot) {
                Ok(Some(decision)) => self.control.ai_target = Some(decision.paddle_x),
                Ok(None) => {}
                Err(err) => log::warn!("Decision provider failed: {err}"),
            }
        }

        let input = self.control.frame_input(self.state.paddle.width);
        tick(&mut self.state, &input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiDecision, DecisionError, LocalProvider, Personality};
    use crate::consts::*;
    use crate::sim::{GamePhase, GameSnapshot};
    use glam::Vec2;

    struct FailingProvider;

    impl DecisionProvider for FailingProvider {
        fn decide(
            &mut self,
            _snapshot: &GameSnapshot,
        ) -> Result<Option<AiDecision>, DecisionError> {
            Err(DecisionError::Transport("boom".to_string()))
        }
    }

    struct FixedProvider(f32);

    impl DecisionProvider for FixedProvider {
        fn decide(
            &mut self,
            snapshot: &GameSnapshot,
        ) -> Result<Option<AiDecision>, DecisionError> {
            Ok(Some(AiDecision {
                paddle_x: crate::clamp_paddle_x(self.0, snapshot.canvas_width, snapshot.paddle_width),
                strategy: "FIXED".to_string(),
                confidence: 100,
                reasoning: "pinned target".to_string(),
                personality: Personality::Balanced,
            }))
        }
    }

    fn start_running(session: &mut GameSession) {
        session.control.start_requested = true;
        session.frame();
        assert_eq!(session.state.phase, GamePhase::Running);
        // Keep the ball out of the way for steering tests
        session.state.ball.pos = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
        session.state.ball.vel = Vec2::ZERO;
    }

    #[test]
    fn provider_errors_do_not_halt_the_loop() {
        let mut session = GameSession::with_provider(1, Box::new(FailingProvider));
        session.control.set_ai(true);
        start_running(&mut session);

        let frame_before = session.state.frame;
        for _ in 0..5 {
            session.frame();
        }
        assert_eq!(session.state.frame, frame_before + 5);
    }

    #[test]
    fn paddle_seeks_provider_target_at_fixed_step() {
        let mut session = GameSession::with_provider(2, Box::new(FixedProvider(0.0)));
        session.control.set_ai(true);
        start_running(&mut session);

        let start_x = session.state.paddle.x;
        session.frame();
        assert_eq!(session.state.paddle.x, start_x - PADDLE_SPEED);

        // Eventually parks exactly on the target
        for _ in 0..200 {
            session.frame();
        }
        assert_eq!(session.state.paddle.x, 0.0);
    }

    #[test]
    fn local_provider_chases_the_ball() {
        let mut session =
            GameSession::with_provider(3, Box::new(LocalProvider { personality: Personality::Defensive }));
        session.control.set_ai(true);
        start_running(&mut session);

        // Ball falling on the left side
        session.state.ball.pos = Vec2::new(60.0, 100.0);
        session.state.ball.vel = Vec2::new(0.0, 3.0);
        let start_x = session.state.paddle.x;
        for _ in 0..10 {
            session.frame();
        }
        assert!(session.state.paddle.x < start_x);
        assert!(session.state.paddle.x >= 0.0);
    }

    #[test]
    fn provider_swap_takes_effect_next_frame() {
        let mut session = GameSession::with_provider(5, Box::new(FixedProvider(0.0)));
        session.control.set_ai(true);
        start_running(&mut session);

        session.frame();
        let x_toward_left = session.state.paddle.x;

        session.set_provider(Box::new(FixedProvider(CANVAS_WIDTH)));
        session.frame();
        assert!(session.state.paddle.x > x_toward_left);
    }

    #[test]
    fn manual_session_ignores_stale_ai_target() {
        let mut session = GameSession::new(4);
        start_running(&mut session);
        session.control.ai_target = Some(0.0);

        let start_x = session.state.paddle.x;
        session.frame();
        assert_eq!(session.state.paddle.x, start_x);
    }
}
