use geom::Pt2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

/// An axis-aligned rectangle in screen pixels, origin at the top-left
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> ScreenRect {
        ScreenRect {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges count as inside
    pub fn contains(&self, pt: Pt2D) -> bool {
        pt.x() >= self.x
            && pt.x() <= self.x + self.width
            && pt.y() >= self.y
            && pt.y() <= self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RectStyle {
    Fill,
    /// An outline of this thickness, drawn inside the rectangle
    Border(f64),
}

/// Drawing primitives, all in screen pixels. One tick issues a batch of calls ending in
/// `present`.
pub trait Renderer {
    fn clear(&mut self, color: Rgb);
    /// Stretches a map image over `rect`, returning false if there's no image.
    fn draw_background(&mut self, _rect: ScreenRect) -> bool {
        false
    }
    fn draw_line(&mut self, p1: Pt2D, p2: Pt2D, color: Rgb, width: f64);
    fn draw_circle(&mut self, center: Pt2D, radius: f64, color: Rgb);
    /// `pos` is the top-left of the text
    fn draw_text(&mut self, text: &str, pos: Pt2D, color: Rgb);
    fn draw_rect(&mut self, rect: ScreenRect, color: Rgb, style: RectStyle);
    fn present(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Background(ScreenRect),
    Line(Pt2D, Pt2D, Rgb, f64),
    Circle(Pt2D, f64, Rgb),
    Text(String, Pt2D, Rgb),
    Rect(ScreenRect, Rgb, RectStyle),
}

/// Keeps the calls of the most recently presented frame. Used for headless runs.
#[derive(Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
    pub frames_presented: usize,
    has_background: bool,
}

impl RecordingRenderer {
    pub fn new() -> RecordingRenderer {
        RecordingRenderer::default()
    }

    /// Pretends a background image is loaded
    pub fn with_background() -> RecordingRenderer {
        RecordingRenderer {
            has_background: true,
            ..Default::default()
        }
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.presented
    }

    pub fn texts(&self) -> Vec<&str> {
        self.presented
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text(txt, _, _) => Some(txt.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Pt2D, Rgb)> {
        self.presented
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Circle(center, _, color) => Some((*center, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn lines_colored(&self, color: Rgb) -> usize {
        self.presented
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line(_, _, c, _) if *c == color))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Rgb) {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear(color));
    }

    fn draw_background(&mut self, rect: ScreenRect) -> bool {
        if self.has_background {
            self.pending.push(DrawCommand::Background(rect));
        }
        self.has_background
    }

    fn draw_line(&mut self, p1: Pt2D, p2: Pt2D, color: Rgb, width: f64) {
        self.pending.push(DrawCommand::Line(p1, p2, color, width));
    }

    fn draw_circle(&mut self, center: Pt2D, radius: f64, color: Rgb) {
        self.pending.push(DrawCommand::Circle(center, radius, color));
    }

    fn draw_text(&mut self, text: &str, pos: Pt2D, color: Rgb) {
        self.pending
            .push(DrawCommand::Text(text.to_string(), pos, color));
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Rgb, style: RectStyle) {
        self.pending.push(DrawCommand::Rect(rect, color, style));
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
    }
}
