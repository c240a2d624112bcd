//! Run lifecycle
//!
//! `Session` owns the current `GameState` and the leaderboard client. The frame
//! driver calls `frame` once per animation frame and stops rescheduling as soon
//! as it gets anything other than `FrameStatus::Continue`.

use std::rc::Rc;

use crate::leaderboard::{LeaderboardApi, LeaderboardClient};
use crate::settings::Tuning;
use crate::sim::{self, GameEvent, GamePhase, GameState, InputState};

/// What the driver should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Still running, schedule the next frame
    Continue,
    /// Not running; nothing was simulated
    Stopped,
    /// The run ended on this frame
    GameOver { score: u64 },
}

pub struct Session<A> {
    state: GameState,
    tuning: Tuning,
    leaderboard: Rc<LeaderboardClient<A>>,
    /// Bumped on every start so late async results can tell which run they belong to
    run: u64,
}

impl<A: LeaderboardApi> Session<A> {
    /// An idle session; nothing simulates until `start`
    pub fn new(tuning: Tuning, api: A) -> Self {
        Self {
            state: GameState::new(0, tuning.clone()),
            tuning,
            leaderboard: Rc::new(LeaderboardClient::new(api)),
            run: 0,
        }
    }

    /// Begin a fresh run, discarding whatever state came before
    pub fn start(&mut self, seed: u64) {
        let mut state = GameState::new(seed, self.tuning.clone());
        state.phase = GamePhase::Running;
        self.state = state;
        self.run += 1;
        log::info!("Run started with seed {seed}");
    }

    /// Simulate one frame of wall-clock `dt` seconds
    pub fn frame(&mut self, input: &InputState, dt: f32) -> FrameStatus {
        if !self.state.is_running() {
            return FrameStatus::Stopped;
        }

        sim::tick(&mut self.state, input, dt);

        match self.state.phase {
            GamePhase::Running => FrameStatus::Continue,
            _ => FrameStatus::GameOver {
                score: self.state.score,
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// Score awaiting submission: set only once run `run` has ended with a positive score
    pub fn submittable_score(&self, run: u64) -> Option<u64> {
        (run == self.run && self.state.phase == GamePhase::Ended && self.state.score > 0)
            .then_some(self.state.score)
    }

    /// Shared handle for futures spawned off the frame loop
    pub fn leaderboard(&self) -> Rc<LeaderboardClient<A>> {
        Rc::clone(&self.leaderboard)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::leaderboard::{LocalApi, MemoryStore};

    const DT: f32 = 1.0 / 60.0;

    fn session() -> Session<LocalApi<MemoryStore>> {
        Session::new(Tuning::default(), LocalApi::new(Arc::new(MemoryStore::new())))
    }

    /// Idle until the camera leaves the player behind
    fn run_to_game_over(session: &mut Session<LocalApi<MemoryStore>>) -> u64 {
        let input = InputState::default();
        for _ in 0..20_000 {
            if let FrameStatus::GameOver { score } = session.frame(&input, DT) {
                return score;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn idle_session_does_not_simulate() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.frame(&InputState::default(), DT), FrameStatus::Stopped);
        assert_eq!(s.state().frame_count, 0);
        assert_eq!(s.state().camera.height, 0.0);
    }

    #[test]
    fn game_over_reported_once_then_stopped() {
        let mut s = session();
        s.start(7);
        let score = run_to_game_over(&mut s);
        assert!(score > 0);
        assert_eq!(s.phase(), GamePhase::Ended);

        let events = s.drain_events();
        let overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![&GameEvent::GameOver { score }]);

        let frames = s.state().frame_count;
        assert_eq!(s.frame(&InputState::default(), DT), FrameStatus::Stopped);
        assert_eq!(s.state().frame_count, frames);
    }

    #[test]
    fn restart_replaces_state() {
        let mut s = session();
        s.start(1);
        run_to_game_over(&mut s);

        s.start(2);
        let state = s.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.seed, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.camera.height, 0.0);
        assert!(state.events.is_empty());
        assert!(state.platforms.iter().any(|p| p.is_start));
    }

    #[test]
    fn restart_mid_run_is_allowed() {
        let mut s = session();
        s.start(3);
        for _ in 0..30 {
            s.frame(&InputState::default(), DT);
        }
        s.start(4);
        assert_eq!(s.state().frame_count, 0);
        assert_eq!(s.frame(&InputState::default(), DT), FrameStatus::Continue);
    }

    #[test]
    fn only_the_ended_run_can_submit() {
        let mut s = session();
        assert_eq!(s.submittable_score(s.run_id()), None);

        s.start(5);
        let run = s.run_id();
        assert_eq!(s.submittable_score(run), None);

        let score = run_to_game_over(&mut s);
        assert_eq!(s.submittable_score(run), Some(score));

        // Restarting before the game-over panel settles invalidates the old run
        s.start(6);
        assert_ne!(s.run_id(), run);
        assert_eq!(s.submittable_score(run), None);
        assert_eq!(s.submittable_score(s.run_id()), None);
    }

    #[tokio::test]
    async fn finished_run_reaches_the_leaderboard() {
        let mut s = session();
        s.start(11);
        let score = run_to_game_over(&mut s);

        let board = s.leaderboard();
        assert_eq!(board.check_qualifies(score).await, Some(1));

        let entry = board.submit("Ann", score).await.unwrap();
        assert_eq!(entry.score, score);

        let top = board.fetch_top(10).await;
        assert_eq!(top, vec![entry]);
        assert_eq!(board.check_qualifies(score).await, Some(2));
    }
}
