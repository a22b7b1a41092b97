use geom::Pt2D;
use widgetry::{EventCtx, GfxCtx, Key, ScreenPt, State, UpdateType};

use model::{
    Flow, InputEvent, InputSource, KeyPress, PlaybackConfig, PointerButton, Session, TickPacer,
    Timeline,
};

use crate::gfx::{GfxRenderer, MapImage};
use crate::{App, Transition};

const KEYS: [(Key, KeyPress); 7] = [
    (Key::Space, KeyPress::Space),
    (Key::LeftArrow, KeyPress::LeftArrow),
    (Key::RightArrow, KeyPress::RightArrow),
    (Key::R, KeyPress::R),
    (Key::T, KeyPress::T),
    (Key::Num0, KeyPress::Num0),
    (Key::Escape, KeyPress::Escape),
];

pub struct Viewer {
    session: Session,
    pacer: TickPacer,
    last_cursor: Option<ScreenPt>,
    background: Option<MapImage>,
}

impl Viewer {
    pub fn new_state(
        ctx: &mut EventCtx,
        timeline: Timeline,
        config: &PlaybackConfig,
        background: Option<MapImage>,
    ) -> Box<dyn State<App>> {
        let session = Session::new(
            timeline,
            ctx.canvas.window_width,
            ctx.canvas.window_height,
            config,
        );
        Box::new(Self {
            session,
            pacer: TickPacer::new(config.ticks_per_second),
            last_cursor: None,
            background,
        })
    }
}

impl State<App> for Viewer {
    fn event(&mut self, ctx: &mut EventCtx, _: &mut App) -> Transition {
        if ctx.input.is_window_resized() {
            self.session
                .resize(ctx.canvas.window_width, ctx.canvas.window_height);
        }

        let events = WindowInput {
            ctx,
            last_cursor: &mut self.last_cursor,
        }
        .poll();
        for event in events {
            if self.session.handle_event(&event) == Flow::Quit {
                return Transition::Pop;
            }
        }

        if let Some(real_dt) = ctx.input.nonblocking_is_update_event() {
            ctx.input.use_update_event();
            let ticks = self.pacer.ticks_due(real_dt.inner_seconds());
            self.session.advance(ticks);
        }
        // Redraw even when paused or finished; panning and zooming still apply
        ctx.request_update(UpdateType::Game);

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.session
            .draw(&mut GfxRenderer::new(g, self.background.as_ref()));
    }
}

/// Translates one widgetry event into the playback engine's input
struct WindowInput<'a, 'b> {
    ctx: &'a mut EventCtx<'b>,
    last_cursor: &'a mut Option<ScreenPt>,
}

impl InputSource for WindowInput<'_, '_> {
    fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let cursor = self.ctx.canvas.get_cursor();
        let pos = Pt2D::new(cursor.x, cursor.y);
        if let Some(last) = self.last_cursor.replace(cursor) {
            if last.x != cursor.x || last.y != cursor.y {
                events.push(InputEvent::PointerMove {
                    pos,
                    dx: cursor.x - last.x,
                    dy: cursor.y - last.y,
                });
            }
        }

        if self.ctx.input.left_mouse_button_pressed() {
            events.push(InputEvent::PointerDown {
                button: PointerButton::Primary,
                pos,
            });
        }
        if self.ctx.input.left_mouse_button_released() {
            events.push(InputEvent::PointerUp {
                button: PointerButton::Primary,
                pos,
            });
        }
        if let Some((_, dy)) = self.ctx.input.get_mouse_scroll() {
            if dy != 0.0 {
                events.push(InputEvent::Scroll { dy });
            }
        }
        for (key, press) in KEYS {
            if self.ctx.input.pressed(key) {
                events.push(InputEvent::Key(press));
            }
        }

        events
    }
}
