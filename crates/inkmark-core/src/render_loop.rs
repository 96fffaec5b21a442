//! Bookkeeping for the self-rescheduling frame loop.
//!
//! The host owns the actual timer (`requestAnimationFrame`, a test harness,
//! a replay script). The annotator hands out a [`TickToken`] when the loop
//! starts; stopping bumps the generation so that any callback the host still
//! has queued ticks with a stale token and is told to stop.

/// Identifies one run of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    /// Generation number of this run.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// What the host should do with its frame ticker after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameRequest {
    /// Leave the ticker as it is.
    #[default]
    None,
    /// Start ticking with this token (replacing any previous run).
    Start(TickToken),
    /// Cancel the ticker.
    Stop,
}

/// Cancellable render loop state.
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    generation: u64,
    running: bool,
}

impl RenderLoop {
    /// Create a stopped loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, invalidating any previous token.
    pub fn start(&mut self) -> FrameRequest {
        self.generation += 1;
        self.running = true;
        FrameRequest::Start(TickToken(self.generation))
    }

    /// Stop the current run, if any.
    pub fn stop(&mut self) -> FrameRequest {
        if !self.running {
            return FrameRequest::None;
        }
        self.generation += 1;
        self.running = false;
        FrameRequest::Stop
    }

    /// Whether `token` belongs to the live run.
    pub fn is_current(&self, token: TickToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Whether a run is live.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_stop() {
        let mut render_loop = RenderLoop::new();
        assert!(!render_loop.is_running());
        assert_eq!(render_loop.stop(), FrameRequest::None);

        let FrameRequest::Start(token) = render_loop.start() else {
            panic!("expected a start request");
        };
        assert!(render_loop.is_current(token));

        assert_eq!(render_loop.stop(), FrameRequest::Stop);
        assert!(!render_loop.is_current(token));
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut render_loop = RenderLoop::new();
        let FrameRequest::Start(first) = render_loop.start() else {
            panic!("expected a start request");
        };
        let FrameRequest::Start(second) = render_loop.start() else {
            panic!("expected a start request");
        };
        assert_ne!(first, second);
        assert!(!render_loop.is_current(first));
        assert!(render_loop.is_current(second));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_stale_token_after_stop_and_restart() {
        let mut render_loop = RenderLoop::new();
        let FrameRequest::Start(old) = render_loop.start() else {
            panic!("expected a start request");
        };
        render_loop.stop();
        render_loop.start();
        assert!(!render_loop.is_current(old));
    }
}
