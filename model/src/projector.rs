use geom::Pt2D;
use samples::Position;

/// The user-controlled pan and zoom
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        pan_x: 0.0,
        pan_y: 0.0,
        zoom: 1.0,
    };
}

/// Maps the whole globe linearly onto a fixed viewport: longitude -180 is the left edge, latitude
/// 90 the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenProjector {
    pub width: f64,
    pub height: f64,
}

impl ScreenProjector {
    pub fn new(width: f64, height: f64) -> ScreenProjector {
        ScreenProjector { width, height }
    }

    /// Before pan and zoom
    pub fn base(&self, pos: Position) -> (f64, f64) {
        (
            (pos.lon + 180.0) * (self.width / 360.0),
            (90.0 - pos.lat) * (self.height / 180.0),
        )
    }

    /// Zoom scales about the viewport center, then the pan offset applies in pixels.
    pub fn project(&self, pos: Position, view: &ViewTransform) -> Pt2D {
        let (x, y) = self.base(pos);
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        Pt2D::new(
            cx + (x - cx) * view.zoom + view.pan_x,
            cy + (y - cy) * view.zoom + view.pan_y,
        )
    }
}
