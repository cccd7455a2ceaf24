//! Frame timing and the idle/running render loop state machine.

use crate::config::RippleConfig;

/// Step used for the first tick after the loop (re)starts.
pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

/// Per-instance simulation clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Simulated seconds, advanced by the clamped step.
    pub elapsed: f32,
    pub last_timestamp_ms: Option<f64>,
    /// Consecutive ticks with nothing left to animate.
    pub settled_frames: u32,
}

impl FrameClock {
    /// Consume a host frame timestamp (milliseconds) and return the raw step in
    /// seconds. Simulation time only advances by the clamped step.
    pub fn advance(&mut self, timestamp_ms: f64, cfg: &RippleConfig) -> f32 {
        let dt = match self.last_timestamp_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => FIRST_FRAME_DT,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        self.elapsed += cfg.clamp_dt(dt);
        dt
    }

    /// Track how long the effect has been calm. Returns the current streak.
    pub fn settle(&mut self, still_active: bool) -> u32 {
        if still_active {
            self.settled_frames = 0;
        } else {
            self.settled_frames += 1;
        }
        self.settled_frames
    }

    /// Forget the previous timestamp so a resumed loop does not see the whole
    /// idle gap as one step.
    pub fn rearm(&mut self) {
        self.last_timestamp_ms = None;
        self.settled_frames = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
}

/// What the host should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopDecision {
    /// Schedule another frame.
    Continue,
    /// Do not schedule; the loop is idle.
    Stop,
}

/// Gate for scheduling frames. Starting requires the page to be visible and
/// the canvas to intersect the viewport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLoop {
    state: LoopState,
    visible: bool,
    in_view: bool,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self {
            state: LoopState::Idle,
            visible: true,
            in_view: true,
        }
    }
}

impl RenderLoop {
    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[inline]
    pub fn can_run(&self) -> bool {
        self.visible && self.in_view
    }

    /// Idle -> running. Returns `true` only on an actual transition, in which
    /// case the caller must schedule the first frame.
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running || !self.can_run() {
            return false;
        }
        self.state = LoopState::Running;
        true
    }

    /// Running -> idle. Returns `true` when a pending frame must be cancelled.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state == LoopState::Running;
        self.state = LoopState::Idle;
        was_running
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_in_view(&mut self, in_view: bool) {
        self.in_view = in_view;
    }
}
