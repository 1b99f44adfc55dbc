//! A labeled region: one outer contour, any number of hole contours, and a
//! memoized property cache shared with the evaluator layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::PI;

use image::GrayImage;

use crate::chain::Point;
use crate::contour::Contour;
use crate::geom::{self, Rect};
use crate::moments::MomentOrder;

/// Which image borders count as "outside" for `extern_perimeter` and
/// `is_exterior`. All four by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFlags {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Default for EdgeFlags {
    fn default() -> Self {
        EdgeFlags {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }
}

/// Best-fit ellipse from second-order central moments. `angle` is in
/// degrees, offset by 180 so it is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ellipse {
    pub center_x: f64,
    pub center_y: f64,
    pub major_axis: f64,
    pub minor_axis: f64,
    pub angle: f64,
}

// cache keys shared by `ellipse` and the evaluator layer
pub(crate) const KEY_MAJOR_AXIS: &str = "MajorAxisLength";
pub(crate) const KEY_MINOR_AXIS: &str = "MinorAxisLength";
pub(crate) const KEY_ORIENTATION: &str = "Orientation";
pub(crate) const KEY_ELLIPSE_X: &str = "EllipseXCenter";
pub(crate) const KEY_ELLIPSE_Y: &str = "EllipseYCenter";

/// One 8-connected foreground region.
///
/// Geometry derives from the contours on demand; scalar results computed
/// through the evaluator layer are memoized in an interior property cache,
/// so all accessors take `&self`. Mutators (`join`, `clear`,
/// `add_internal_contour`) reset the cache.
#[derive(Debug, Clone)]
pub struct Blob {
    id: u32,
    external: Contour,
    internals: Vec<Contour>,
    image_size: (u32, u32),
    properties: RefCell<HashMap<&'static str, f64>>,
}

impl Blob {
    pub fn new(id: u32, external: Contour, image_size: (u32, u32)) -> Self {
        Blob {
            id,
            external,
            internals: Vec::new(),
            image_size,
            properties: RefCell::new(HashMap::new()),
        }
    }

    /// The 1-based label assigned during the scan.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn external_contour(&self) -> &Contour {
        &self.external
    }

    pub fn internal_contours(&self) -> &[Contour] {
        &self.internals
    }

    /// Dimensions of the image the blob was extracted from.
    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    pub fn add_internal_contour(&mut self, contour: Contour) {
        self.internals.push(contour);
        self.properties.borrow_mut().clear();
    }

    /// True when no boundary has been traced at all.
    pub fn is_empty(&self) -> bool {
        self.external.is_empty()
    }

    /// Drops all contours and cached results. Start points are retained.
    pub fn clear(&mut self) {
        self.external.clear();
        self.internals.clear();
        self.properties.borrow_mut().clear();
    }

    /// Pixel count of the region: outer contour area minus all holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.internals.iter().map(Contour::area).sum();
        self.external.area() - holes
    }

    /// Total boundary length: outer contour plus all holes.
    pub fn perimeter(&self) -> f64 {
        let holes: f64 = self.internals.iter().map(Contour::perimeter).sum();
        self.external.perimeter() + holes
    }

    /// Raw spatial moment of the region (outer minus holes).
    pub fn moment(&self, order: MomentOrder) -> f64 {
        let holes: f64 = self.internals.iter().map(|c| c.moment(order)).sum();
        self.external.moment(order) - holes
    }

    pub fn bounding_box(&self) -> Rect {
        self.external.bounding_box()
    }

    pub fn min_x(&self) -> i32 {
        self.bounding_box().min_x()
    }

    pub fn max_x(&self) -> i32 {
        self.bounding_box().max_x()
    }

    pub fn min_y(&self) -> i32 {
        self.bounding_box().min_y()
    }

    pub fn max_y(&self) -> i32 {
        self.bounding_box().max_y()
    }

    /// Horizontal center of the bounding box.
    pub fn x_center(&self) -> f64 {
        self.min_x() as f64 + (self.max_x() - self.min_x()) as f64 / 2.0
    }

    /// Vertical center of the bounding box.
    pub fn y_center(&self) -> f64 {
        self.min_y() as f64 + (self.max_y() - self.min_y()) as f64 / 2.0
    }

    /// Whether the point lies in the region: on or inside the outer
    /// contour and not strictly inside any hole.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        if self.external.is_empty() {
            return match self.external.start_point() {
                Some(start) => start.x as f64 == x && start.y as f64 == y,
                None => false,
            };
        }
        if geom::point_polygon_test(self.external.points(), x, y) < 0 {
            return false;
        }
        !self
            .internals
            .iter()
            .any(|hole| !hole.is_empty() && geom::point_polygon_test(hole.points(), x, y) == 1)
    }

    /// Convex hull of the outer boundary points.
    pub fn convex_hull(&self) -> Vec<Point> {
        geom::convex_hull(self.external.points())
    }

    /// Mean and population standard deviation of `image` over the region's
    /// pixels. Returns (0, 0) when the region is degenerate or its bounding
    /// box does not fit the image.
    pub fn mean_and_std_dev(&self, image: &GrayImage) -> (f64, f64) {
        let bbox = self.bounding_box();
        let (width, height) = image.dimensions();
        if bbox.width <= 0
            || bbox.height <= 0
            || width == 0
            || height == 0
            || bbox.width as u32 > width
            || bbox.height as u32 > height
        {
            return (0.0, 0.0);
        }

        let mut count = 0u64;
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        for y in bbox.min_y().max(0)..=bbox.max_y().min(height as i32 - 1) {
            for x in bbox.min_x().max(0)..=bbox.max_x().min(width as i32 - 1) {
                if !self.contains_point(x as f64, y as f64) {
                    continue;
                }
                let value = image.get_pixel(x as u32, y as u32)[0] as f64;
                count += 1;
                sum += value;
                sum_squares += value * value;
            }
        }
        if count == 0 {
            return (0.0, 0.0);
        }

        let mean = sum / count as f64;
        let variance = (sum_squares / count as f64 - mean * mean).max(0.0);
        (mean, variance.sqrt())
    }

    pub fn mean(&self, image: &GrayImage) -> f64 {
        self.mean_and_std_dev(image).0
    }

    pub fn std_dev(&self, image: &GrayImage) -> f64 {
        self.mean_and_std_dev(image).1
    }

    /// Best-fit ellipse from the region's moments, memoized under the
    /// ellipse property keys. A region with non-positive mass yields the
    /// zeroed ellipse.
    pub fn ellipse(&self) -> Ellipse {
        {
            let cache = self.properties.borrow();
            if let (Some(major), Some(minor), Some(angle), Some(cx), Some(cy)) = (
                cache.get(KEY_MAJOR_AXIS),
                cache.get(KEY_MINOR_AXIS),
                cache.get(KEY_ORIENTATION),
                cache.get(KEY_ELLIPSE_X),
                cache.get(KEY_ELLIPSE_Y),
            ) {
                return Ellipse {
                    center_x: *cx,
                    center_y: *cy,
                    major_axis: *major,
                    minor_axis: *minor,
                    angle: *angle,
                };
            }
        }

        let ellipse = self.compute_ellipse();
        let mut cache = self.properties.borrow_mut();
        cache.insert(KEY_MAJOR_AXIS, ellipse.major_axis);
        cache.insert(KEY_MINOR_AXIS, ellipse.minor_axis);
        cache.insert(KEY_ORIENTATION, ellipse.angle);
        cache.insert(KEY_ELLIPSE_X, ellipse.center_x);
        cache.insert(KEY_ELLIPSE_Y, ellipse.center_y);
        ellipse
    }

    fn compute_ellipse(&self) -> Ellipse {
        let mut ellipse = Ellipse::default();

        let m00 = self.moment(MomentOrder::M00);
        if m00 <= 0.0 {
            return ellipse;
        }
        let m10 = self.moment(MomentOrder::M10);
        let m01 = self.moment(MomentOrder::M01);
        ellipse.center_x = m10 / m00;
        ellipse.center_y = m01 / m00;

        // normalized central moments; u11 is negated to measure the angle
        // against the downward raster y axis
        let u11 = -(self.moment(MomentOrder::M11) - m10 * m01 / m00) / m00;
        let u20 = (self.moment(MomentOrder::M20) - m10 * m10 / m00) / m00;
        let u02 = (self.moment(MomentOrder::M02) - m01 * m01 / m00) / m00;
        let spread = (4.0 * u11 * u11 + (u20 - u02) * (u20 - u02)).sqrt();

        let major_sq = u20 + u02 + spread;
        if major_sq <= 0.0 {
            return ellipse;
        }
        ellipse.major_axis = (2.0 * major_sq).sqrt();

        let minor_sq = u20 + u02 - spread;
        if minor_sq <= 0.0 {
            return ellipse;
        }
        ellipse.minor_axis = (2.0 * minor_sq).sqrt();

        let mut angle = (2.0 * u11).atan2(u20 - u02 + spread);
        if angle == 0.0 && u02 > u20 {
            // vertically elongated region with no cross term
            angle = PI / 2.0;
        }
        ellipse.angle = angle.to_degrees() + 180.0;
        ellipse
    }

    /// Paints every pixel bounded by the outer contour (holes included)
    /// with `value`.
    pub fn fill(&self, image: &mut GrayImage, value: u8) {
        let bbox = self.bounding_box();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        for y in bbox.min_y().max(0)..=bbox.max_y().min(height as i32 - 1) {
            for x in bbox.min_x().max(0)..=bbox.max_x().min(width as i32 - 1) {
                let on_region = if self.external.is_empty() {
                    self.external.start_point() == Some(Point::new(x, y))
                } else {
                    geom::point_polygon_test(self.external.points(), x as f64, y as f64) >= 0
                };
                if on_region {
                    image.get_pixel_mut(x as u32, y as u32)[0] = value;
                }
            }
        }
    }

    /// Length of outer boundary lying on the selected image borders, or
    /// next to zero pixels of `mask`.
    ///
    /// Boundary points are collected in walk order and split into runs
    /// wherever consecutive extern points are more than two Manhattan steps
    /// apart; each run contributes its open polyline length, the leftover
    /// run sorted top-to-bottom then left-to-right. The total is halved
    /// because every boundary point has one side inside the region.
    pub fn extern_perimeter(&self, mask: Option<&GrayImage>, flags: EdgeFlags) -> f64 {
        let points = self.external.points();
        if points.is_empty() {
            return 0.0;
        }
        let (width, height) = self.image_size;

        let mut total = 0.0;
        let mut run: Vec<Point> = Vec::new();
        let mut previous: Option<Point> = None;

        for &point in points {
            let mut touching = (flags.left && point.x == 0)
                || (flags.right && point.x == width as i32 - 1)
                || (flags.top && point.y == 0)
                || (flags.bottom && point.y == height as i32 - 1);
            if !touching {
                if let Some(mask) = mask {
                    touching = has_zero_neighbor(mask, point);
                }
            }
            if !touching {
                continue;
            }

            if let Some(prev) = previous {
                let delta = (prev.x - point.x).abs() + (prev.y - point.y).abs();
                if delta > 2 {
                    total += geom::arc_length(&run, false);
                    run.clear();
                }
            }
            run.push(point);
            previous = Some(point);
        }

        run.sort_unstable_by_key(|p| (p.y, p.x));
        total += geom::arc_length(&run, false);
        total / 2.0
    }

    /// True when any selected border (or masked-out area) touches the
    /// region's outer boundary.
    pub fn is_exterior(&self, mask: Option<&GrayImage>, flags: EdgeFlags) -> bool {
        self.extern_perimeter(mask, flags) > 0.0
    }

    /// Concatenates the other blob's outer chain onto this one and drops
    /// every cached result.
    pub fn join(&mut self, other: &Blob) {
        let codes: Vec<_> = other.external_contour().codes().to_vec();
        self.external.extend_codes(&codes);
        self.properties.borrow_mut().clear();
    }

    pub(crate) fn cached_property(&self, name: &str) -> Option<f64> {
        self.properties.borrow().get(name).copied()
    }

    pub(crate) fn set_cached_property(&self, name: &'static str, value: f64) {
        self.properties.borrow_mut().insert(name, value);
    }

    pub fn remove_cached_property(&self, name: &str) {
        self.properties.borrow_mut().remove(name);
    }
}

/// Whether any pixel of the 3x3 neighborhood of `point` (clipped to the
/// mask) is zero.
fn has_zero_neighbor(mask: &GrayImage, point: Point) -> bool {
    let (width, height) = mask.dimensions();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (x, y) = (point.x + dx, point.y + dy);
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                continue;
            }
            if mask.get_pixel(x as u32, y as u32)[0] == 0 {
                return true;
            }
        }
    }
    false
}
