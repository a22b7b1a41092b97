use std::collections::VecDeque;

use geom::Pt2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Space,
    LeftArrow,
    RightArrow,
    R,
    T,
    Num0,
    Escape,
}

/// Discrete user input, with positions in screen pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerDown { button: PointerButton, pos: Pt2D },
    PointerUp { button: PointerButton, pos: Pt2D },
    PointerMove { pos: Pt2D, dx: f64, dy: f64 },
    /// Positive scrolls up
    Scroll { dy: f64 },
    Key(KeyPress),
}

/// Something that surfaces the input accumulated since the last tick
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Plays back a fixed batch of events per tick, then nothing. Drives headless runs.
#[derive(Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(batches: Vec<Vec<InputEvent>>) -> ScriptedInput {
        ScriptedInput {
            batches: batches.into(),
        }
    }

    pub fn empty() -> ScriptedInput {
        ScriptedInput::default()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.batches.pop_front().unwrap_or_default()
    }
}
