#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod args;
mod gfx;
mod viewer;

use std::collections::BTreeMap;

use abstutil::Timer;
use anyhow::Result;
use structopt::StructOpt;
use widgetry::{Color, GfxCtx, Settings, SharedAppState};

use model::{PlaybackConfig, RecordingRenderer, ScriptedInput, Session, Timeline};
use samples::{Track, TrackID};

use self::args::Args;
use self::gfx::MapImage;

pub fn main() -> Result<()> {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    let (columns, playback) = args.resolve()?;
    let (tracks, report) = samples::load(fs_err::File::open(&args.input)?, &columns)?;
    info!("{}: {}", args.input, report.describe());
    if tracks.is_empty() {
        bail!("{} has no usable samples", args.input);
    }

    if args.headless {
        if args.background.is_some() {
            warn!("--background is ignored with --headless");
        }
        return run_headless(&tracks, &playback, args.headless_frames());
    }

    let background = args.background.as_deref().map(MapImage::load).transpose()?;
    run_window(tracks, playback, background);
    Ok(())
}

fn run_window(
    tracks: BTreeMap<TrackID, Track>,
    playback: PlaybackConfig,
    background: Option<MapImage>,
) {
    widgetry::run(Settings::new("Track Replay"), move |ctx| {
        let timeline =
            ctx.loading_screen("build timeline", |_, timer| Timeline::build(&tracks, timer));
        let states = vec![viewer::Viewer::new_state(ctx, timeline, &playback, background)];
        (App {}, states)
    });
}

fn run_headless(
    tracks: &BTreeMap<TrackID, Track>,
    playback: &PlaybackConfig,
    max_ticks: usize,
) -> Result<()> {
    let mut timer = Timer::new("headless playback");
    let timeline = Timeline::build(tracks, &mut timer);
    let mut session = Session::new(timeline, model::WINDOW_WIDTH, model::WINDOW_HEIGHT, playback);
    let mut renderer = RecordingRenderer::new();
    let ticks = model::run(
        &mut session,
        &mut ScriptedInput::empty(),
        &mut renderer,
        max_ticks,
    );

    let state = session.controller().state();
    info!(
        "After {} ticks: {:?} at frame {:.1} of {}, {} frames presented",
        ticks,
        state.mode,
        state.frame,
        session.timeline().total_frames(),
        renderer.frames_presented
    );
    for line in renderer.texts() {
        debug!("{}", line);
    }
    if let Some(problem) = session.problem() {
        bail!("Playback stopped early: {}", problem);
    }
    Ok(())
}

pub struct App {}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        g.clear(Color::BLACK);
    }
}

pub type Transition = widgetry::Transition<App>;
