use serde::{Deserialize, Serialize};

use crate::projector::ViewTransform;

pub const SPEED_INCREMENT: f64 = 0.1;
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 2.0;
pub const DEFAULT_SPEED: f64 = 1.0;

pub const ZOOM_INCREMENT: f64 = 0.1;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frames advanced per tick
    pub speed: f64,
    pub show_trail: bool,
    pub ticks_per_second: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            show_trail: true,
            ticks_per_second: 60,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    Playing,
    Paused,
    /// The cursor reached the end. The last frame keeps rendering until a replay.
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    /// Fractional, so speeds below 1 take several ticks per frame
    pub frame: f64,
    pub mode: PlaybackMode,
    pub speed: f64,
    pub show_trail: bool,
    pub view: ViewTransform,
}

/// Owns the playback state and applies ticks and user commands to it.
pub struct Controller {
    state: PlaybackState,
    total_frames: usize,
    dragging: bool,
}

impl Controller {
    pub fn new(total_frames: usize, config: &PlaybackConfig) -> Controller {
        Controller {
            state: PlaybackState {
                frame: 0.0,
                mode: PlaybackMode::Playing,
                speed: config.speed.clamp(MIN_SPEED, MAX_SPEED),
                show_trail: config.show_trail,
                view: ViewTransform::IDENTITY,
            },
            total_frames,
            dragging: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    pub fn cursor(&self) -> f64 {
        self.state.frame
    }

    // Never 0, so an empty timeline still has a well-defined progress and end.
    fn last_frame(&self) -> f64 {
        (self.total_frames.max(1) - 1) as f64
    }

    /// Fraction of the animation played, in `[0, 1)`
    pub fn progress(&self) -> f64 {
        self.state.frame / self.total_frames.max(1) as f64
    }

    /// Advances by `speed` frames while playing. Stepping past the last frame finishes, holding
    /// the cursor on that last frame, so the cursor never leaves `[0, total_frames - 1]`.
    pub fn tick(&mut self) {
        if self.state.mode != PlaybackMode::Playing {
            return;
        }
        self.state.frame += self.state.speed;
        if self.state.frame > self.last_frame() {
            self.state.frame = self.last_frame();
            self.state.mode = PlaybackMode::Finished;
            debug!("Playback finished at frame {}", self.state.frame);
        }
    }

    /// From `Finished`, this pauses on the last frame; resuming immediately finishes again.
    pub fn toggle_pause(&mut self) {
        self.state.mode = match self.state.mode {
            PlaybackMode::Playing | PlaybackMode::Finished => PlaybackMode::Paused,
            PlaybackMode::Paused => PlaybackMode::Playing,
        };
    }

    /// Hold a specific frame, used when something goes wrong mid-playback.
    pub fn freeze_at(&mut self, frame: f64) {
        self.state.frame = frame.clamp(0.0, self.last_frame());
        self.state.mode = PlaybackMode::Paused;
    }

    pub fn replay(&mut self) {
        self.state.frame = 0.0;
        self.state.mode = PlaybackMode::Playing;
    }

    pub fn increase_speed(&mut self) {
        self.state.speed = (self.state.speed + SPEED_INCREMENT).min(MAX_SPEED);
    }

    pub fn decrease_speed(&mut self) {
        self.state.speed = (self.state.speed - SPEED_INCREMENT).max(MIN_SPEED);
    }

    pub fn reset_speed(&mut self) {
        self.state.speed = DEFAULT_SPEED;
    }

    pub fn toggle_trail(&mut self) {
        self.state.show_trail = !self.state.show_trail;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Only moves the view while a drag is active
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.state.view.pan_x += dx;
            self.state.view.pan_y += dy;
        }
    }

    /// One zoom step in or out, by the sign of `delta`
    pub fn zoom(&mut self, delta: f64) {
        let view = &mut self.state.view;
        if delta > 0.0 {
            view.zoom = (view.zoom + ZOOM_INCREMENT).min(MAX_ZOOM);
        } else if delta < 0.0 {
            view.zoom = (view.zoom - ZOOM_INCREMENT).max(MIN_ZOOM);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn controller(total_frames: usize) -> Controller {
        Controller::new(total_frames, &PlaybackConfig::default())
    }

    #[test]
    fn ticks_until_finished() {
        let mut c = controller(10);
        for _ in 0..9 {
            c.tick();
        }
        assert_eq!(c.cursor(), 9.0);
        assert_eq!(c.mode(), PlaybackMode::Playing);

        c.tick();
        assert_eq!(c.cursor(), 9.0);
        assert_eq!(c.mode(), PlaybackMode::Finished);

        for _ in 0..5 {
            c.tick();
        }
        assert_eq!(c.cursor(), 9.0);
        assert_eq!(c.mode(), PlaybackMode::Finished);
    }

    #[test]
    fn paused_holds_the_cursor() {
        let mut c = controller(100);
        c.tick();
        c.tick();
        c.toggle_pause();
        assert_eq!(c.mode(), PlaybackMode::Paused);
        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.cursor(), 2.0);
        c.toggle_pause();
        c.tick();
        assert_eq!(c.cursor(), 3.0);
    }

    #[test]
    fn replay_keeps_settings() {
        let mut c = controller(5);
        c.increase_speed();
        c.toggle_trail();
        c.zoom(1.0);
        for _ in 0..20 {
            c.tick();
        }
        assert_eq!(c.mode(), PlaybackMode::Finished);

        c.replay();
        assert_eq!(c.cursor(), 0.0);
        assert_eq!(c.mode(), PlaybackMode::Playing);
        assert!((c.state().speed - 1.1).abs() < 1e-9);
        assert!(!c.state().show_trail);
        assert!((c.state().view.zoom - 1.1).abs() < 1e-9);

        c.toggle_pause();
        c.replay();
        assert_eq!(c.mode(), PlaybackMode::Playing);
    }

    #[test]
    fn toggle_from_finished_pauses() {
        let mut c = controller(1);
        c.tick();
        assert_eq!(c.mode(), PlaybackMode::Finished);
        c.toggle_pause();
        assert_eq!(c.mode(), PlaybackMode::Paused);
        c.toggle_pause();
        c.tick();
        assert_eq!(c.mode(), PlaybackMode::Finished);
        assert_eq!(c.cursor(), 0.0);
    }

    #[test]
    fn slow_speed_takes_several_ticks_per_frame() {
        let mut c = controller(100);
        for _ in 0..12 {
            c.decrease_speed();
        }
        assert_eq!(c.state().speed, MIN_SPEED);
        for _ in 0..5 {
            c.tick();
        }
        assert!(c.cursor() > 0.4 && c.cursor() < 0.6);
        assert!(c.progress() < 0.01);
    }

    #[test]
    fn empty_timeline_has_a_valid_end() {
        let mut c = controller(0);
        assert_eq!(c.progress(), 0.0);
        c.tick();
        assert_eq!(c.mode(), PlaybackMode::Finished);
        assert_eq!(c.cursor(), 0.0);
        assert_eq!(c.progress(), 0.0);
    }

    #[test]
    fn config_speed_is_clamped() {
        let config = PlaybackConfig {
            speed: 50.0,
            ..Default::default()
        };
        assert_eq!(Controller::new(10, &config).state().speed, MAX_SPEED);
    }

    #[test]
    fn pan_only_while_dragging() {
        let mut c = controller(10);
        c.pan(5.0, 5.0);
        assert_eq!(c.state().view, ViewTransform::IDENTITY);

        c.begin_drag();
        c.pan(5.0, -3.0);
        c.pan(1.0, 1.0);
        c.end_drag();
        c.pan(100.0, 100.0);
        assert_eq!(c.state().view.pan_x, 6.0);
        assert_eq!(c.state().view.pan_y, -2.0);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut c = controller(10);
        for _ in 0..30 {
            c.zoom(3.0);
        }
        assert_eq!(c.state().view.zoom, MAX_ZOOM);
        for _ in 0..30 {
            c.zoom(-0.01);
        }
        assert_eq!(c.state().view.zoom, MIN_ZOOM);
        c.zoom(0.0);
        assert_eq!(c.state().view.zoom, MIN_ZOOM);
    }

    #[test]
    fn freeze_clamps_into_range() {
        let mut c = controller(10);
        c.freeze_at(42.0);
        assert_eq!(c.cursor(), 9.0);
        assert_eq!(c.mode(), PlaybackMode::Paused);
    }

    #[derive(Clone, Copy, Debug)]
    enum Command {
        Tick,
        TogglePause,
        Replay,
        Faster,
        Slower,
        ResetSpeed,
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            6 => Just(Command::Tick),
            1 => Just(Command::TogglePause),
            1 => Just(Command::Replay),
            2 => Just(Command::Faster),
            2 => Just(Command::Slower),
            1 => Just(Command::ResetSpeed),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold(total in 0usize..200, commands in prop::collection::vec(command(), 0..400)) {
            let mut c = controller(total);
            for cmd in commands {
                let before = c.state().clone();
                match cmd {
                    Command::Tick => c.tick(),
                    Command::TogglePause => c.toggle_pause(),
                    Command::Replay => c.replay(),
                    Command::Faster => c.increase_speed(),
                    Command::Slower => c.decrease_speed(),
                    Command::ResetSpeed => c.reset_speed(),
                }
                let state = c.state();
                prop_assert!(state.speed >= MIN_SPEED && state.speed <= MAX_SPEED);
                prop_assert!(state.frame >= 0.0);
                prop_assert!(state.frame <= total.max(1) as f64 - 1.0);
                if before.mode == PlaybackMode::Finished {
                    if let Command::Tick = cmd {
                        prop_assert_eq!(state.frame, before.frame);
                    }
                }
                if let Command::Replay = cmd {
                    prop_assert_eq!(state.frame, 0.0);
                    prop_assert_eq!(state.mode, PlaybackMode::Playing);
                    prop_assert_eq!(state.speed, before.speed);
                }
            }
        }
    }
}
