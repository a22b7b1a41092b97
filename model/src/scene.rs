use geom::Pt2D;
use samples::Position;

use crate::render::{RectStyle, Renderer, Rgb, ScreenRect};
use crate::Session;

const OCEAN: Rgb = Rgb::new(20, 40, 100);
const GRATICULE: Rgb = Rgb::new(30, 60, 130);
const GRATICULE_DEGREES: usize = 30;
const PROGRESS_FILL: Rgb = Rgb::new(100, 200, 100);
const PROBLEM: Rgb = Rgb::new(255, 120, 120);

const PROGRESS_BAR_HEIGHT: f64 = 20.0;
const MARKER_RADIUS: f64 = 5.0;
const TRAIL_WIDTH: f64 = 2.0;
const LABEL_SPACING: f64 = 20.0;
const TEXT_INSET: f64 = 10.0;

/// Issues every draw call for one tick, back to front, then presents.
pub(crate) fn draw<R: Renderer>(r: &mut R, session: &Session) {
    r.clear(OCEAN);
    let screen = ScreenRect::new(
        0.0,
        0.0,
        session.projector().width,
        session.projector().height,
    );
    if !r.draw_background(screen) {
        draw_graticule(r, session);
    }
    if session.controller().state().show_trail {
        draw_trails(r, session);
    }
    draw_markers(r, session);
    draw_progress_bar(r, session);
    draw_controls(r, session);
    if let Some(problem) = session.problem() {
        let y = session.projector().height - PROGRESS_BAR_HEIGHT - LABEL_SPACING - TEXT_INSET;
        r.draw_text(problem, Pt2D::new(TEXT_INSET, y), PROBLEM);
    }
    r.present();
}

fn draw_graticule<R: Renderer>(r: &mut R, session: &Session) {
    let projector = session.projector();
    let view = &session.controller().state().view;
    for lon in (-180..=180).step_by(GRATICULE_DEGREES) {
        let lon = lon as f64;
        r.draw_line(
            projector.project(Position::new(lon, 90.0), view),
            projector.project(Position::new(lon, -90.0), view),
            GRATICULE,
            1.0,
        );
    }
    for lat in (-90..=90).step_by(GRATICULE_DEGREES) {
        let lat = lat as f64;
        r.draw_line(
            projector.project(Position::new(-180.0, lat), view),
            projector.project(Position::new(180.0, lat), view),
            GRATICULE,
            1.0,
        );
    }
}

fn draw_trails<R: Renderer>(r: &mut R, session: &Session) {
    let projector = session.projector();
    let view = &session.controller().state().view;
    let cursor = session.controller().cursor();
    for track in session.timeline().tracks() {
        for (f1, f2) in track.trail(cursor) {
            if !f1.is_finite() || !f2.is_finite() {
                continue;
            }
            r.draw_line(
                projector.project(f1.pos, view),
                projector.project(f2.pos, view),
                track.color,
                TRAIL_WIDTH,
            );
        }
    }
}

fn draw_markers<R: Renderer>(r: &mut R, session: &Session) {
    let projector = session.projector();
    let view = &session.controller().state().view;
    for (idx, (track, frame)) in session
        .timeline()
        .frames_at(session.controller().cursor())
        .enumerate()
    {
        if !frame.is_finite() {
            continue;
        }
        r.draw_circle(projector.project(frame.pos, view), MARKER_RADIUS, track.color);
        r.draw_text(
            &format!(
                "Track {}, Lon: {:.2}, Lat: {:.2}, Time: {}",
                track.id,
                frame.pos.lon,
                frame.pos.lat,
                frame.time.clock_string()
            ),
            Pt2D::new(TEXT_INSET, TEXT_INSET + LABEL_SPACING * idx as f64),
            Rgb::WHITE,
        );
    }
}

fn draw_progress_bar<R: Renderer>(r: &mut R, session: &Session) {
    let projector = session.projector();
    let y = projector.height - PROGRESS_BAR_HEIGHT;
    let progress = session.controller().progress().clamp(0.0, 1.0);
    r.draw_rect(
        ScreenRect::new(0.0, y, projector.width * progress, PROGRESS_BAR_HEIGHT),
        PROGRESS_FILL,
        RectStyle::Fill,
    );
    r.draw_rect(
        ScreenRect::new(0.0, y, projector.width, PROGRESS_BAR_HEIGHT),
        Rgb::WHITE,
        RectStyle::Border(2.0),
    );
}

fn draw_controls<R: Renderer>(r: &mut R, session: &Session) {
    let state = session.controller().state();
    for (btn, rect) in session.controls().buttons() {
        r.draw_rect(*rect, btn.color(), RectStyle::Fill);
        r.draw_text(
            btn.label(state),
            Pt2D::new(rect.x + TEXT_INSET, rect.y + TEXT_INSET),
            Rgb::WHITE,
        );
    }
    r.draw_text(
        &format!("Speed: {:.1}x", state.speed),
        session.controls().readout_pos(),
        Rgb::WHITE,
    );
}
