//! Hand-drawn map plane: projection, drag-to-pan and pin styling.
//!
//! Venues are placed with a fixed linear transform from a bounding box into a
//! 500×600 viewport. Panning translates the whole pin group; the drag origin
//! is stored as `pointer - offset` so the plane follows the pointer exactly.

use passport_types::Venue;
use serde::{Deserialize, Serialize};

use crate::serde_defaults::{default_lat_span, default_lon_span, default_north, default_west};
use crate::venues::VenueStore;

pub const VIEWPORT_WIDTH: f64 = 500.0;
pub const VIEWPORT_HEIGHT: f64 = 600.0;

pub const DEFAULT_WEST: f64 = -122.5;
pub const DEFAULT_NORTH: f64 = 37.85;
pub const DEFAULT_LON_SPAN: f64 = 0.3;
pub const DEFAULT_LAT_SPAN: f64 = 0.15;

pub const PIN_RADIUS: f64 = 12.0;
pub const PIN_GLOW_RADIUS: f64 = 18.0;

const LOCKED_FILL: &str = "#94a3b8";
const UNLOCKED_FILL: &str = "#1e293b";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projection
// ─────────────────────────────────────────────────────────────────────────────

/// Geographic box mapped onto the viewport. `west`/`north` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneBounds {
    #[serde(default = "default_west")]
    pub west: f64,
    #[serde(default = "default_north")]
    pub north: f64,
    #[serde(default = "default_lon_span")]
    pub lon_span: f64,
    #[serde(default = "default_lat_span")]
    pub lat_span: f64,
}

impl Default for PlaneBounds {
    fn default() -> Self {
        Self {
            west: DEFAULT_WEST,
            north: DEFAULT_NORTH,
            lon_span: DEFAULT_LON_SPAN,
            lat_span: DEFAULT_LAT_SPAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneProjection {
    bounds: PlaneBounds,
    width: f64,
    height: f64,
}

impl PlaneProjection {
    pub fn new(bounds: PlaneBounds) -> Self {
        Self {
            bounds,
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }

    /// Viewport dimensions as an SVG `viewBox` value.
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    pub fn project(&self, latitude: f64, longitude: f64) -> Point {
        let b = &self.bounds;
        Point::new(
            (longitude - b.west) / b.lon_span * self.width,
            (b.north - latitude) / b.lat_span * self.height,
        )
    }
}

impl Default for PlaneProjection {
    fn default() -> Self {
        Self::new(PlaneBounds::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panning
// ─────────────────────────────────────────────────────────────────────────────

/// Pan offset plus the in-progress drag, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanState {
    offset: Point,
    drag_origin: Option<Point>,
}

impl PanState {
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag_origin = Some(pointer - self.offset);
    }

    /// Follow the pointer. Returns false when no drag is active.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        match self.drag_origin {
            Some(origin) => {
                self.offset = pointer - origin;
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    /// Touch start. Multi-finger gestures are left to the browser.
    pub fn begin_touch(&mut self, touches: &[Point]) {
        if let [touch] = touches {
            self.begin_drag(*touch);
        }
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        match touches {
            [touch] => self.drag_to(*touch),
            _ => false,
        }
    }

    /// SVG group transform for the current offset.
    pub fn transform(&self) -> String {
        format!("translate({}, {})", self.offset.x, self.offset.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pins
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinStyle {
    pub fill: &'static str,
    pub opacity: f64,
    /// Draw the cloud-and-lock overlay
    pub show_lock: bool,
}

pub fn pin_style(locked: bool) -> PinStyle {
    if locked {
        PinStyle {
            fill: LOCKED_FILL,
            opacity: 0.5,
            show_lock: true,
        }
    } else {
        PinStyle {
            fill: UNLOCKED_FILL,
            opacity: 1.0,
            show_lock: false,
        }
    }
}

/// Emoji shown on a pin or stamp, picked from keywords in the venue name.
pub fn venue_glyph(name: &str) -> &'static str {
    const KEYWORDS: [(&str, &str); 7] = [
        ("Coffee", "☕"),
        ("Record", "🎵"),
        ("Garden", "🌿"),
        ("Book", "📚"),
        ("Art", "🎨"),
        ("Gallery", "🎨"),
        ("Bridge", "🌉"),
    ];
    KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, glyph)| *glyph)
        .unwrap_or("📍")
}

/// Cloud outline drawn over a locked pin centred at `at`.
pub fn cloud_path(at: Point) -> String {
    let Point { x, y } = at;
    format!(
        "M {} {} Q {} {} {} {} Q {} {} {} {} Q {} {} {} {} Z",
        x - 20.0,
        y,
        x - 25.0,
        y - 8.0,
        x - 15.0,
        y - 12.0,
        x - 5.0,
        y - 15.0,
        x + 5.0,
        y - 12.0,
        x + 15.0,
        y - 8.0,
        x + 20.0,
        y,
    )
}

/// A venue placed on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPin<'a> {
    pub venue: &'a Venue,
    pub at: Point,
    pub locked: bool,
    pub style: PinStyle,
    pub glyph: &'static str,
}

/// One pin per venue, styled from the store's visited set.
pub fn place_pins<'a>(store: &'a VenueStore, projection: &PlaneProjection) -> Vec<PlacedPin<'a>> {
    store
        .venues()
        .iter()
        .map(|venue| {
            let locked = store.is_locked(&venue.id);
            PlacedPin {
                venue,
                at: projection.project(venue.latitude, venue.longitude),
                locked,
                style: pin_style(locked),
                glyph: venue_glyph(&venue.name),
            }
        })
        .collect()
}
