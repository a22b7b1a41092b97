use anyhow::Result;

use crate::controls::{Button, ControlPanel};
use crate::input::{InputEvent, InputSource, KeyPress, PointerButton};
use crate::playback::{Controller, PlaybackConfig};
use crate::projector::ScreenProjector;
use crate::render::Renderer;
use crate::timeline::Timeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything one animation run needs, created when playback starts and threaded through the
/// render loop. The timeline is never modified after this is built.
pub struct Session {
    timeline: Timeline,
    controller: Controller,
    projector: ScreenProjector,
    controls: ControlPanel,
    // Why playback froze, if it did
    problem: Option<String>,
}

impl Session {
    pub fn new(timeline: Timeline, width: f64, height: f64, config: &PlaybackConfig) -> Session {
        let controller = Controller::new(timeline.total_frames(), config);
        let mut session = Session {
            timeline,
            controller,
            projector: ScreenProjector::new(width, height),
            controls: ControlPanel::new(width),
            problem: None,
        };
        if let Err(err) = session.check_cursor() {
            session.freeze(0.0, err.to_string());
        }
        session
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn projector(&self) -> &ScreenProjector {
        &self.projector
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    /// Follows a window resize. Playback state, including pan and zoom, is kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        debug!("Resized to {}x{}", width, height);
        self.projector = ScreenProjector::new(width, height);
        self.controls = ControlPanel::new(width);
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> Flow {
        match *event {
            InputEvent::Quit => {
                return Flow::Quit;
            }
            InputEvent::PointerDown { button, pos } => match button {
                PointerButton::Primary => match self.controls.hit_test(pos) {
                    Some(btn) => self.press(btn),
                    None => self.controller.begin_drag(),
                },
                PointerButton::Secondary => self.controller.begin_drag(),
                PointerButton::Middle => {}
            },
            InputEvent::PointerUp { button, .. } => {
                if button != PointerButton::Middle {
                    self.controller.end_drag();
                }
            }
            InputEvent::PointerMove { dx, dy, .. } => self.controller.pan(dx, dy),
            InputEvent::Scroll { dy } => self.controller.zoom(dy),
            InputEvent::Key(key) => match key {
                KeyPress::Space => self.press(Button::Pause),
                KeyPress::R => self.press(Button::Replay),
                KeyPress::RightArrow => self.press(Button::Faster),
                KeyPress::LeftArrow => self.press(Button::Slower),
                KeyPress::Num0 => self.press(Button::ResetSpeed),
                KeyPress::T => self.press(Button::ToggleTrail),
                KeyPress::Escape => {
                    return Flow::Quit;
                }
            },
        }
        Flow::Continue
    }

    pub fn press(&mut self, btn: Button) {
        match btn {
            Button::Pause => self.controller.toggle_pause(),
            Button::Replay => {
                self.problem = None;
                self.controller.replay();
            }
            Button::Faster => self.controller.increase_speed(),
            Button::Slower => self.controller.decrease_speed(),
            Button::ResetSpeed => self.controller.reset_speed(),
            Button::ToggleTrail => self.controller.toggle_trail(),
        }
    }

    /// Runs some ticks. A bad frame freezes playback on the last good cursor instead of failing.
    pub fn advance(&mut self, ticks: usize) {
        for _ in 0..ticks {
            let before = self.controller.cursor();
            self.controller.tick();
            if let Err(err) = self.check_cursor() {
                self.freeze(before, err.to_string());
                break;
            }
        }
    }

    fn check_cursor(&self) -> Result<()> {
        let cursor = self.controller.cursor();
        for (track, frame) in self.timeline.frames_at(cursor) {
            if !frame.is_finite() {
                bail!(
                    "Track {} has a malformed frame at {}: {:?}",
                    track.id,
                    cursor.floor(),
                    frame
                );
            }
        }
        Ok(())
    }

    fn freeze(&mut self, frame: f64, problem: String) {
        error!("Playback frozen at frame {}: {}", frame, problem);
        self.controller.freeze_at(frame);
        self.problem = Some(problem);
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R) {
        crate::scene::draw(renderer, self);
    }

    /// One loop iteration: drain input, advance, render.
    pub fn step<R: Renderer>(
        &mut self,
        events: Vec<InputEvent>,
        ticks: usize,
        renderer: &mut R,
    ) -> Flow {
        for event in &events {
            if self.handle_event(event) == Flow::Quit {
                return Flow::Quit;
            }
        }
        self.advance(ticks);
        self.draw(renderer);
        Flow::Continue
    }
}

/// Drives a session without a window, one tick per iteration, until quit or `max_ticks`. Returns
/// the number of ticks rendered.
pub fn run<I: InputSource, R: Renderer>(
    session: &mut Session,
    input: &mut I,
    renderer: &mut R,
    max_ticks: usize,
) -> usize {
    let mut ticks = 0;
    while ticks < max_ticks {
        if session.step(input.poll(), 1, renderer) == Flow::Quit {
            info!("Quit after {} ticks", ticks);
            break;
        }
        ticks += 1;
    }
    ticks
}
