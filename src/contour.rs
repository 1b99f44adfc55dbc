//! Crack-code contour: a start point plus a chain-code walk, with lazily
//! computed, cached geometry (point list, bounding box, area, perimeter,
//! spatial moments).
//!
//! Mutation (`add_code`, `extend_codes`, `clear`) goes through `&mut self`
//! and resets every cache; accessors take `&self` and fill the caches on
//! first use. This keeps the "logically pure accessor, physically cached"
//! contract without any locking.

use std::cell::OnceCell;

use crate::chain::{ChainCode, Point};
use crate::geom::{self, Rect};
use crate::moments::{MomentOrder, Moments};

/// Whether a contour bounds a region from outside or rings a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    Outer,
    Hole,
}

#[derive(Debug, Clone)]
struct Geometry {
    points: Vec<Point>,
    bounding_box: Rect,
}

/// A closed boundary walk in Freeman chain code.
///
/// A contour with a start point but no codes is the boundary of a single
/// isolated pixel: geometrically degenerate (area and perimeter 0) but
/// positioned (1x1 bounding box at the start). A default-constructed
/// contour has no start and reports an all-zero bounding box.
#[derive(Debug, Clone)]
pub struct Contour {
    start: Option<Point>,
    kind: ContourKind,
    codes: Vec<ChainCode>,
    geometry: OnceCell<Geometry>,
    area: OnceCell<f64>,
    perimeter: OnceCell<f64>,
    moments: OnceCell<Moments>,
}

impl Default for Contour {
    fn default() -> Self {
        Contour {
            start: None,
            kind: ContourKind::Outer,
            codes: Vec::new(),
            geometry: OnceCell::new(),
            area: OnceCell::new(),
            perimeter: OnceCell::new(),
            moments: OnceCell::new(),
        }
    }
}

impl Contour {
    pub fn new(start: Point, kind: ContourKind) -> Self {
        Contour {
            start: Some(start),
            kind,
            ..Contour::default()
        }
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start
    }

    pub fn kind(&self) -> ContourKind {
        self.kind
    }

    /// The raw chain codes, in walk order.
    pub fn codes(&self) -> &[ChainCode] {
        &self.codes
    }

    /// True when no codes have been traced (isolated pixel or blank).
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Appends one walk step and invalidates all cached geometry.
    pub fn add_code(&mut self, code: ChainCode) {
        self.codes.push(code);
        self.invalidate();
    }

    /// Appends a whole code sequence (used when joining blobs).
    pub fn extend_codes(&mut self, codes: &[ChainCode]) {
        self.codes.extend_from_slice(codes);
        self.invalidate();
    }

    /// Drops all codes and cached geometry. The start point is retained.
    pub fn clear(&mut self) {
        self.codes.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.geometry = OnceCell::new();
        self.area = OnceCell::new();
        self.perimeter = OnceCell::new();
        self.moments = OnceCell::new();
    }

    fn geometry(&self) -> &Geometry {
        self.geometry.get_or_init(|| {
            let Some(start) = self.start else {
                return Geometry {
                    points: Vec::new(),
                    bounding_box: Rect::default(),
                };
            };
            if self.codes.is_empty() {
                // isolated pixel: degenerate two-point list, 1x1 box
                return Geometry {
                    points: vec![start, start],
                    bounding_box: Rect::new(start.x, start.y, 1, 1),
                };
            }

            let mut points = Vec::with_capacity(self.codes.len() + 1);
            points.push(start);
            let (mut min_x, mut max_x) = (start.x, start.x);
            let (mut min_y, mut max_y) = (start.y, start.y);
            let mut current = start;
            for &code in &self.codes {
                current = code.apply(current);
                min_x = min_x.min(current.x);
                max_x = max_x.max(current.x);
                min_y = min_y.min(current.y);
                max_y = max_y.max(current.y);
                points.push(current);
            }

            Geometry {
                points,
                bounding_box: Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
            }
        })
    }

    /// Absolute boundary points: the start point followed by the cumulative
    /// application of each code. For a closed walk the last point equals
    /// the first.
    pub fn points(&self) -> &[Point] {
        &self.geometry().points
    }

    /// Bounding box accumulated while deriving `points`.
    pub fn bounding_box(&self) -> Rect {
        self.geometry().bounding_box
    }

    /// Signed shoelace area of the boundary polygon. Negative for walks
    /// that are counter-clockwise on screen (y down); exposed so callers
    /// can check winding consistency.
    pub fn signed_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        geom::signed_area(self.points())
    }

    /// Enclosed pixel count of the boundary walk.
    ///
    /// The shoelace area of a walk through pixel centers misses the
    /// boundary band, so the lattice-polygon correction is applied: an
    /// outer contour counts pixels on or inside the walk
    /// (`A + steps/2 + 1`), a hole counts pixels strictly inside
    /// (`A - steps/2 + 1`). A solid W x H rectangle therefore measures
    /// exactly `W * H`, and a hole subtracts exactly its pixel count.
    /// Returns 0 when no codes have been traced.
    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| {
            if self.is_empty() {
                return 0.0;
            }
            let shoelace = geom::signed_area(self.points()).abs();
            let boundary = self.codes.len() as f64;
            let corrected = match self.kind {
                ContourKind::Outer => shoelace + boundary / 2.0 + 1.0,
                ContourKind::Hole => shoelace - boundary / 2.0 + 1.0,
            };
            corrected.max(0.0)
        })
    }

    /// Euclidean length of the closed boundary polyline: axis steps
    /// contribute 1, diagonal steps sqrt(2). Returns 0 when empty.
    pub fn perimeter(&self) -> f64 {
        *self.perimeter.get_or_init(|| {
            if self.is_empty() {
                return 0.0;
            }
            geom::arc_length(self.points(), true)
        })
    }

    /// Raw spatial moment of the boundary polygon. All ten orders are
    /// computed together on first access and cached. Returns 0 when empty.
    pub fn moment(&self, order: MomentOrder) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.moments
            .get_or_init(|| Moments::of_contour(self.points()))
            .get(order)
    }
}
