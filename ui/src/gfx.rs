use anyhow::{Context, Result};
use geom::{Circle, Distance, Polygon, Pt2D};
use widgetry::{Color, GeomBatch, GfxCtx, Text};

use model::{RectStyle, Renderer, Rgb, ScreenRect};

/// A vector map, moved so its top-left corner is the origin
pub struct MapImage {
    batch: GeomBatch,
    width: f64,
    height: f64,
}

impl MapImage {
    pub fn load(path: &str) -> Result<MapImage> {
        let bytes = fs_err::read(path)?;
        let (batch, bounds) = GeomBatch::load_svg_bytes_uncached(&bytes)
            .with_context(|| format!("rendering {path}"))?;
        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0.0 || height <= 0.0 {
            bail!("{path} is empty");
        }
        info!("Loaded {path} as the background, {width}x{height}");
        Ok(MapImage {
            batch: batch.translate(-bounds.min_x, -bounds.min_y),
            width,
            height,
        })
    }
}

/// Draws a frame with widgetry. Shapes accumulate in screen space and are uploaded once per
/// frame; text goes on top of everything.
pub struct GfxRenderer<'a, 'b> {
    g: &'a mut GfxCtx<'b>,
    background: Option<&'a MapImage>,
    batch: GeomBatch,
    labels: Vec<(String, Pt2D, Rgb)>,
}

impl<'a, 'b> GfxRenderer<'a, 'b> {
    pub fn new(g: &'a mut GfxCtx<'b>, background: Option<&'a MapImage>) -> Self {
        Self {
            g,
            background,
            batch: GeomBatch::new(),
            labels: Vec::new(),
        }
    }

    fn fill(&mut self, color: Rgb, x: f64, y: f64, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.batch
                .push(to_color(color), Polygon::rectangle(width, height).translate(x, y));
        }
    }
}

fn to_color(color: Rgb) -> Color {
    Color::rgb(color.r as usize, color.g as usize, color.b as usize)
}

impl Renderer for GfxRenderer<'_, '_> {
    fn clear(&mut self, color: Rgb) {
        self.batch = GeomBatch::new();
        self.labels.clear();
        self.g.clear(to_color(color));
    }

    fn draw_background(&mut self, rect: ScreenRect) -> bool {
        let Some(image) = self.background else {
            return false;
        };
        self.batch.append(
            image
                .batch
                .clone()
                .scale_xy(rect.width / image.width, rect.height / image.height)
                .translate(rect.x, rect.y),
        );
        true
    }

    fn draw_line(&mut self, p1: Pt2D, p2: Pt2D, color: Rgb, width: f64) {
        // Zero-length segments have no direction
        if let Ok(line) = geom::Line::new(p1, p2) {
            self.batch
                .push(to_color(color), line.make_polygons(Distance::meters(width)));
        }
    }

    fn draw_circle(&mut self, center: Pt2D, radius: f64, color: Rgb) {
        self.batch.push(
            to_color(color),
            Circle::new(center, Distance::meters(radius)).to_polygon(),
        );
    }

    fn draw_text(&mut self, text: &str, pos: Pt2D, color: Rgb) {
        self.labels.push((text.to_string(), pos, color));
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Rgb, style: RectStyle) {
        match style {
            RectStyle::Fill => self.fill(color, rect.x, rect.y, rect.width, rect.height),
            RectStyle::Border(thickness) => {
                let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0);
                self.fill(color, rect.x, rect.y, rect.width, t);
                self.fill(color, rect.x, rect.y + rect.height - t, rect.width, t);
                self.fill(color, rect.x, rect.y, t, rect.height);
                self.fill(color, rect.x + rect.width - t, rect.y, t, rect.height);
            }
        }
    }

    fn present(&mut self) {
        let mut batch = std::mem::replace(&mut self.batch, GeomBatch::new());
        for (text, pos, color) in self.labels.drain(..) {
            batch.append(
                Text::from(widgetry::Line(text).fg(to_color(color)))
                    .render_autocropped(self.g)
                    .translate(pos.x(), pos.y()),
            );
        }

        self.g.fork_screenspace();
        batch.draw(self.g);
        self.g.unfork();
    }
}
