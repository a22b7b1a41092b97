#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod controls;
mod input;
mod pacer;
mod playback;
mod projector;
mod render;
mod scene;
mod session;
mod steps;
mod timeline;
mod trajectory;

pub use self::controls::{Button, ControlPanel};
pub use self::input::{InputEvent, InputSource, KeyPress, PointerButton, ScriptedInput};
pub use self::pacer::TickPacer;
pub use self::playback::{
    Controller, PlaybackConfig, PlaybackMode, PlaybackState, DEFAULT_SPEED, MAX_SPEED, MAX_ZOOM,
    MIN_SPEED, MIN_ZOOM,
};
pub use self::projector::{ScreenProjector, ViewTransform};
pub use self::render::{DrawCommand, RecordingRenderer, RectStyle, Renderer, Rgb, ScreenRect};
pub use self::session::{run, Flow, Session};
pub use self::steps::{estimate_steps, MAX_STEPS, MIN_STEPS};
pub use self::timeline::{Aggregation, Timeline, TrackPath, AGGREGATION, PALETTE};
pub use self::trajectory::{build_path, interpolate, Frame};

pub const WINDOW_WIDTH: f64 = 1280.0;
pub const WINDOW_HEIGHT: f64 = 720.0;
