//! Per-frame loop driving a `GameSession`
//!
//! The shell calls `pump` once per display frame (from
//! `requestAnimationFrame` on the web) and schedules another frame only while
//! the returned status asks for one. Cancelling the handle stops the loop for
//! good, so callbacks left behind after teardown never touch the session.

use std::cell::Cell;
use std::rc::Rc;

use super::clock::Clock;
use crate::session::GameSession;

/// Result of one pumped frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Game in progress
    Running,
    /// This frame ended the game
    GameOver { score: u64 },
    /// Game over, theme animation still finishing
    Settling,
    /// Nothing left to animate until the session is reset
    Idle,
    /// The loop was cancelled
    Cancelled,
}

impl FrameStatus {
    /// Whether the shell should request another frame
    pub fn wants_next_frame(&self) -> bool {
        matches!(
            self,
            FrameStatus::Running | FrameStatus::GameOver { .. } | FrameStatus::Settling
        )
    }
}

/// Cancellation switch shared between a loop and its owner
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Frame cadence with an injectable clock
pub struct FrameLoop<C: Clock> {
    clock: C,
    handle: LoopHandle,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            handle: LoopHandle::default(),
        }
    }

    /// Handle that cancels this loop
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run one frame at the clock's current time
    pub fn pump(&mut self, session: &mut GameSession) -> FrameStatus {
        if self.handle.is_cancelled() {
            return FrameStatus::Cancelled;
        }

        let now = self.clock.now_ms();
        if session.frame_at(now) {
            return FrameStatus::GameOver {
                score: session.final_score().unwrap_or_else(|| session.score()),
            };
        }

        if !session.is_over() {
            FrameStatus::Running
        } else if session.theme().is_animating() {
            FrameStatus::Settling
        } else {
            FrameStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::settings::Settings;
    use crate::sim::Viewport;
    use glam::Vec2;

    fn session() -> GameSession {
        GameSession::new(11, Viewport::new(400.0, 800.0, 1.0), Settings::default())
    }

    #[test]
    fn test_running_until_game_over_then_idle() {
        let clock = ManualClock::new(0.0);
        let mut frames = FrameLoop::new(clock.clone());
        let mut session = session();

        assert_eq!(frames.pump(&mut session), FrameStatus::Running);

        // Fall off the bottom: knock the rocket off its platform
        session.state_mut().platforms.clear();
        session.state_mut().player.launch(Vec2::new(0.0, 50.0));

        let mut statuses = Vec::new();
        for _ in 0..120 {
            clock.advance(16.0);
            let status = frames.pump(&mut session);
            statuses.push(status);
            if !status.wants_next_frame() {
                break;
            }
        }

        let overs: Vec<u64> = statuses
            .iter()
            .filter_map(|s| match s {
                FrameStatus::GameOver { score } => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(overs.len(), 1);
        assert_eq!(Some(overs[0]), session.final_score());
        assert_eq!(statuses.last(), Some(&FrameStatus::Idle));
    }

    #[test]
    fn test_cancelled_loop_leaves_session_alone() {
        let clock = ManualClock::new(0.0);
        let mut frames = FrameLoop::new(clock.clone());
        let mut session = session();
        frames.pump(&mut session);

        session.drag_begin(Vec2::new(200.0, 600.0));
        session.drag_end(Vec2::new(200.0, 700.0));
        let pos = session.state().player.pos;

        frames.handle().cancel();
        clock.advance(16.0);
        assert_eq!(frames.pump(&mut session), FrameStatus::Cancelled);
        assert!(!FrameStatus::Cancelled.wants_next_frame());
        assert_eq!(session.state().player.pos, pos);
    }

    #[test]
    fn test_first_frame_only_records_time() {
        let clock = ManualClock::new(5000.0);
        let mut frames = FrameLoop::new(clock.clone());
        let mut session = session();
        session.drag_begin(Vec2::new(200.0, 600.0));
        session.drag_end(Vec2::new(200.0, 700.0));
        let pos = session.state().player.pos;

        frames.pump(&mut session);
        assert_eq!(session.state().player.pos, pos);
        assert_eq!(session.state().last_frame_ms, Some(5000.0));

        clock.advance(16.0);
        frames.pump(&mut session);
        assert!(session.state().player.pos.y < pos.y);
    }
}
