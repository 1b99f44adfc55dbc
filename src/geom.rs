//! Shared polygon geometry over integer grid points: shoelace area, arc
//! length, point-in-polygon classification and convex hulls.
//!
//! Contour point sequences may contain repeated points (crack-code walks
//! revisit pixels on one-pixel-wide necks); every helper here tolerates
//! duplicates and degenerate inputs.

use crate::chain::Point;

/// Axis-aligned integer rectangle. `width`/`height` are inclusive spans
/// (`max - min + 1`), so a single pixel has a 1x1 rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest x covered by the rectangle.
    pub const fn min_x(&self) -> i32 {
        self.x
    }

    /// Largest x covered by the rectangle (inclusive).
    pub const fn max_x(&self) -> i32 {
        self.x + self.width - 1
    }

    pub const fn min_y(&self) -> i32 {
        self.y
    }

    pub const fn max_y(&self) -> i32 {
        self.y + self.height - 1
    }
}

/// Signed area of a closed polygon via the shoelace formula.
///
/// With y growing downward, a walk that is counter-clockwise on screen
/// yields a negative value. Returns 0 for fewer than 3 points.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc: i64 = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    acc as f64 / 2.0
}

/// Euclidean length of a polyline; `closed` adds the segment from the last
/// point back to the first.
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let mut length = 0.0;
    for i in 0..n - 1 {
        length += distance(points[i], points[i + 1]);
    }
    if closed {
        length += distance(points[n - 1], points[0]);
    }
    length
}

fn distance(a: Point, b: Point) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    dx.hypot(dy)
}

/// Classifies a point against a closed polygon: `1` inside, `0` on the
/// boundary, `-1` outside.
///
/// Zero-length edges (repeated points) are skipped; the polygon is closed
/// implicitly from the last point back to the first. A polygon whose
/// points are all identical classifies like that single point.
pub fn point_polygon_test(points: &[Point], px: f64, py: f64) -> i32 {
    let n = points.len();
    if n == 0 {
        return -1;
    }

    const EPS: f64 = 1e-9;
    let mut inside = false;
    let mut has_edge = false;

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if a == b {
            continue;
        }
        has_edge = true;
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);

        // boundary check
        let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
        if cross.abs() < EPS
            && px >= ax.min(bx) - EPS
            && px <= ax.max(bx) + EPS
            && py >= ay.min(by) - EPS
            && py <= ay.max(by) + EPS
        {
            return 0;
        }

        // ray casting toward +x
        if (ay > py) != (by > py) {
            let x_int = ax + (py - ay) / (by - ay) * (bx - ax);
            if px < x_int {
                inside = !inside;
            }
        }
    }

    // every point identical: a degenerate single-point polygon
    if !has_edge {
        let p = points[0];
        return if (p.x as f64 - px).abs() < EPS && (p.y as f64 - py).abs() < EPS {
            0
        } else {
            -1
        };
    }

    if inside {
        1
    } else {
        -1
    }
}

/// Convex hull of a point set via the monotone chain algorithm.
///
/// Returns the hull vertices in a consistent winding with no repeated
/// endpoint. Duplicate input points are ignored; inputs with fewer than 3
/// distinct points return those points as-is.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_unstable_by_key(|p| (p.x, p.y));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: Point, a: Point, b: Point) -> i64 {
        (a.x as i64 - o.x as i64) * (b.y as i64 - o.y as i64)
            - (a.y as i64 - o.y as i64) * (b.x as i64 - o.x as i64)
    }

    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);

    // lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }

    // upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }

    hull.pop();
    hull
}
