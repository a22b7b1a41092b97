use geom::Pt2D;

use crate::playback::{PlaybackMode, PlaybackState};
use crate::render::{Rgb, ScreenRect};

const BUTTON_WIDTH: f64 = 150.0;
const BUTTON_HEIGHT: f64 = 40.0;
const BUTTON_SPACING: f64 = 50.0;
const MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Pause,
    Replay,
    Faster,
    Slower,
    ResetSpeed,
    ToggleTrail,
}

impl Button {
    /// Top to bottom
    pub const ALL: [Button; 6] = [
        Button::Pause,
        Button::Replay,
        Button::Faster,
        Button::Slower,
        Button::ResetSpeed,
        Button::ToggleTrail,
    ];

    pub fn label(self, state: &PlaybackState) -> &'static str {
        match self {
            Button::Pause => {
                if state.mode == PlaybackMode::Paused {
                    "Resume"
                } else {
                    "Pause"
                }
            }
            Button::Replay => "Replay",
            Button::Faster => "Faster",
            Button::Slower => "Slower",
            Button::ResetSpeed => "Reset Speed",
            Button::ToggleTrail => {
                if state.show_trail {
                    "Hide Trail"
                } else {
                    "Show Trail"
                }
            }
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Button::ToggleTrail => Rgb::new(100, 100, 200),
            _ => Rgb::new(50, 150, 50),
        }
    }
}

/// The column of buttons along the right edge of the viewport
pub struct ControlPanel {
    buttons: Vec<(Button, ScreenRect)>,
}

impl ControlPanel {
    pub fn new(viewport_width: f64) -> ControlPanel {
        let x = viewport_width - BUTTON_WIDTH - MARGIN;
        let buttons = Button::ALL
            .iter()
            .enumerate()
            .map(|(idx, btn)| {
                let y = MARGIN + BUTTON_SPACING * idx as f64;
                (*btn, ScreenRect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT))
            })
            .collect();
        ControlPanel { buttons }
    }

    pub fn buttons(&self) -> &[(Button, ScreenRect)] {
        &self.buttons
    }

    pub fn hit_test(&self, pt: Pt2D) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(pt))
            .map(|(btn, _)| *btn)
    }

    /// Where the speed readout goes, just under the buttons
    pub fn readout_pos(&self) -> Pt2D {
        let last = self.buttons[self.buttons.len() - 1].1;
        Pt2D::new(last.x, last.y + last.height + MARGIN)
    }
}
