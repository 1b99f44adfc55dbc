//! Blob property evaluators: small named objects that compute one scalar
//! per blob and memoize it in the blob's property cache.
//!
//! `value` consults the cache under the evaluator's name before computing,
//! so repeated queries and the collection filter layer pay for each
//! property once per blob. Parameterized evaluators (masks, reference
//! points) share their name's cache slot; use `compute` directly when the
//! parameters vary over one blob's lifetime.

use image::GrayImage;

use crate::blob::{Blob, EdgeFlags};
use crate::geom;
use crate::moments::MomentOrder;

/// A scalar property of a blob, identified by a stable name.
pub trait BlobOperator {
    /// Cache key and display name of the property.
    fn name(&self) -> &'static str;

    /// Computes the property, ignoring the cache.
    fn compute(&self, blob: &Blob) -> f64;

    /// Cached computation: returns the memoized value when present,
    /// otherwise computes and stores it.
    fn value(&self, blob: &Blob) -> f64 {
        if let Some(cached) = blob.cached_property(self.name()) {
            return cached;
        }
        let result = self.compute(blob);
        blob.set_cached_property(self.name(), result);
        result
    }
}

/// Estimated (length, breadth) of the region from its perimeter and area,
/// treating it as a rounded rectangle. `None` when the estimate collapses.
fn axis_lengths(blob: &Blob) -> Option<(f64, f64)> {
    let perimeter = blob.perimeter();
    let area = blob.area();
    let discriminant = perimeter * perimeter - 16.0 * area;
    let first = if discriminant > 0.0 {
        (perimeter + discriminant.sqrt()) / 4.0
    } else {
        // area and perimeter measurement error pushed the discriminant
        // negative; fall back to the square estimate
        perimeter / 4.0
    };
    if first <= 0.0 {
        return None;
    }
    let second = area / first;
    Some((first.max(second), first.min(second)))
}

fn hull_perimeter(blob: &Blob) -> f64 {
    let hull = blob.convex_hull();
    if hull.is_empty() {
        return 0.0;
    }
    geom::arc_length(&hull, true)
}

/// The blob's label.
pub struct Id;

impl BlobOperator for Id {
    fn name(&self) -> &'static str {
        "Id"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.id() as f64
    }
}

pub struct Area;

impl BlobOperator for Area {
    fn name(&self) -> &'static str {
        "Area"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.area()
    }
}

pub struct Perimeter;

impl BlobOperator for Perimeter {
    fn name(&self) -> &'static str {
        "Perimeter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.perimeter()
    }
}

/// Perimeter squared over 4*pi*area; 1 for a disk, larger for everything
/// else, 0 for an area-less blob.
pub struct Compactness;

impl BlobOperator for Compactness {
    fn name(&self) -> &'static str {
        "Compactness"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let area = blob.area();
        if area == 0.0 {
            return 0.0;
        }
        let perimeter = blob.perimeter();
        perimeter * perimeter / (4.0 * std::f64::consts::PI * area)
    }
}

/// The longer estimated axis of the region.
pub struct Length;

impl BlobOperator for Length {
    fn name(&self) -> &'static str {
        "Length"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        axis_lengths(blob).map_or(0.0, |(length, _)| length)
    }
}

/// The shorter estimated axis of the region.
pub struct Breadth;

impl BlobOperator for Breadth {
    fn name(&self) -> &'static str {
        "Breadth"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        axis_lengths(blob).map_or(0.0, |(_, breadth)| breadth)
    }
}

/// Length over breadth.
pub struct Elongation;

impl BlobOperator for Elongation {
    fn name(&self) -> &'static str {
        "Elongation"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        if blob.area() == 0.0 {
            return 0.0;
        }
        match axis_lengths(blob) {
            Some((length, breadth)) if breadth > 0.0 => length / breadth,
            _ => 0.0,
        }
    }
}

pub struct HullPerimeter;

impl BlobOperator for HullPerimeter {
    fn name(&self) -> &'static str {
        "HullPerimeter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        hull_perimeter(blob)
    }
}

pub struct HullArea;

impl BlobOperator for HullArea {
    fn name(&self) -> &'static str {
        "HullArea"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        geom::signed_area(&blob.convex_hull()).abs()
    }
}

/// Perimeter over convex hull perimeter; 1 for convex regions.
pub struct Roughness;

impl BlobOperator for Roughness {
    fn name(&self) -> &'static str {
        "Roughness"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let hull = hull_perimeter(blob);
        if hull == 0.0 {
            return 0.0;
        }
        blob.perimeter() / hull
    }
}

/// One raw spatial moment; each order caches under its own name.
pub struct Moment {
    order: MomentOrder,
}

impl Moment {
    pub fn new(order: MomentOrder) -> Self {
        Moment { order }
    }
}

impl BlobOperator for Moment {
    fn name(&self) -> &'static str {
        match (self.order.p(), self.order.q()) {
            (0, 0) => "Moment00",
            (1, 0) => "Moment10",
            (0, 1) => "Moment01",
            (2, 0) => "Moment20",
            (1, 1) => "Moment11",
            (0, 2) => "Moment02",
            (3, 0) => "Moment30",
            (2, 1) => "Moment21",
            (1, 2) => "Moment12",
            _ => "Moment03",
        }
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.moment(self.order)
    }
}

pub struct MinX;

impl BlobOperator for MinX {
    fn name(&self) -> &'static str {
        "MinX"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.min_x() as f64
    }
}

pub struct MaxX;

impl BlobOperator for MaxX {
    fn name(&self) -> &'static str {
        "MaxX"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.max_x() as f64
    }
}

pub struct MinY;

impl BlobOperator for MinY {
    fn name(&self) -> &'static str {
        "MinY"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.min_y() as f64
    }
}

pub struct MaxY;

impl BlobOperator for MaxY {
    fn name(&self) -> &'static str {
        "MaxY"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.max_y() as f64
    }
}

/// Bounding box width.
pub struct DiffX;

impl BlobOperator for DiffX {
    fn name(&self) -> &'static str {
        "DiffX"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.bounding_box().width as f64
    }
}

/// Bounding box height.
pub struct DiffY;

impl BlobOperator for DiffY {
    fn name(&self) -> &'static str {
        "DiffY"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.bounding_box().height as f64
    }
}

pub struct XCenter;

impl BlobOperator for XCenter {
    fn name(&self) -> &'static str {
        "XCenter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.x_center()
    }
}

pub struct YCenter;

impl BlobOperator for YCenter {
    fn name(&self) -> &'static str {
        "YCenter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.y_center()
    }
}

/// Smallest x among boundary points on the top row of the bounding box.
pub struct MinXAtMinY;

impl BlobOperator for MinXAtMinY {
    fn name(&self) -> &'static str {
        "MinXAtMinY"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let points = blob.external_contour().points();
        let target = blob.min_y();
        points
            .iter()
            .filter(|p| p.y == target)
            .map(|p| p.x)
            .min()
            .unwrap_or(0) as f64
    }
}

/// Smallest y among boundary points on the right edge of the bounding box.
pub struct MinYAtMaxX;

impl BlobOperator for MinYAtMaxX {
    fn name(&self) -> &'static str {
        "MinYAtMaxX"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let points = blob.external_contour().points();
        let target = blob.max_x();
        points
            .iter()
            .filter(|p| p.x == target)
            .map(|p| p.y)
            .min()
            .unwrap_or(0) as f64
    }
}

/// Largest x among boundary points on the bottom row of the bounding box.
pub struct MaxXAtMaxY;

impl BlobOperator for MaxXAtMaxY {
    fn name(&self) -> &'static str {
        "MaxXAtMaxY"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let points = blob.external_contour().points();
        let target = blob.max_y();
        points
            .iter()
            .filter(|p| p.y == target)
            .map(|p| p.x)
            .max()
            .unwrap_or(0) as f64
    }
}

/// Largest y among boundary points on the left edge of the bounding box.
pub struct MaxYAtMinX;

impl BlobOperator for MaxYAtMinX {
    fn name(&self) -> &'static str {
        "MaxYAtMinX"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let points = blob.external_contour().points();
        let target = blob.min_x();
        points
            .iter()
            .filter(|p| p.x == target)
            .map(|p| p.y)
            .max()
            .unwrap_or(0) as f64
    }
}

pub struct MajorAxisLength;

impl BlobOperator for MajorAxisLength {
    fn name(&self) -> &'static str {
        "MajorAxisLength"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().major_axis
    }
}

pub struct MinorAxisLength;

impl BlobOperator for MinorAxisLength {
    fn name(&self) -> &'static str {
        "MinorAxisLength"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().minor_axis
    }
}

/// Ellipse orientation in degrees (180..=360).
pub struct Orientation;

impl BlobOperator for Orientation {
    fn name(&self) -> &'static str {
        "Orientation"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().angle
    }
}

/// |cos| of the ellipse orientation.
pub struct OrientationCos;

impl BlobOperator for OrientationCos {
    fn name(&self) -> &'static str {
        "OrientationCos"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().angle.to_radians().cos().abs()
    }
}

pub struct EllipseXCenter;

impl BlobOperator for EllipseXCenter {
    fn name(&self) -> &'static str {
        "EllipseXCenter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().center_x
    }
}

pub struct EllipseYCenter;

impl BlobOperator for EllipseYCenter {
    fn name(&self) -> &'static str {
        "EllipseYCenter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.ellipse().center_y
    }
}

/// Fitted ellipse area over blob area.
pub struct AreaElipseRatio;

impl BlobOperator for AreaElipseRatio {
    fn name(&self) -> &'static str {
        "AreaElipseRatio"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let area = blob.area();
        if area == 0.0 {
            return 0.0;
        }
        let ellipse = blob.ellipse();
        (ellipse.major_axis / 2.0) * (ellipse.minor_axis / 2.0) * std::f64::consts::PI / area
    }
}

/// Minor over major ellipse axis, in 0..=1.
pub struct AxisRatio;

impl BlobOperator for AxisRatio {
    fn name(&self) -> &'static str {
        "AxisRatio"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let ellipse = blob.ellipse();
        if ellipse.major_axis == 0.0 {
            return 0.0;
        }
        ellipse.minor_axis / ellipse.major_axis
    }
}

/// 1 when the blob touches a selected border or masked-out area.
pub struct Exterior<'a> {
    mask: Option<&'a GrayImage>,
    flags: EdgeFlags,
}

impl<'a> Exterior<'a> {
    pub fn new(mask: Option<&'a GrayImage>, flags: EdgeFlags) -> Self {
        Exterior { mask, flags }
    }
}

impl BlobOperator for Exterior<'_> {
    fn name(&self) -> &'static str {
        "Exterior"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        if blob.is_exterior(self.mask, self.flags) {
            1.0
        } else {
            0.0
        }
    }
}

pub struct ExternPerimeter<'a> {
    mask: Option<&'a GrayImage>,
    flags: EdgeFlags,
}

impl<'a> ExternPerimeter<'a> {
    pub fn new(mask: Option<&'a GrayImage>, flags: EdgeFlags) -> Self {
        ExternPerimeter { mask, flags }
    }
}

impl BlobOperator for ExternPerimeter<'_> {
    fn name(&self) -> &'static str {
        "ExternPerimeter"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.extern_perimeter(self.mask, self.flags)
    }
}

/// Extern perimeter over total perimeter; the raw extern perimeter when
/// the total is zero.
pub struct ExternPerimeterRatio<'a> {
    mask: Option<&'a GrayImage>,
    flags: EdgeFlags,
}

impl<'a> ExternPerimeterRatio<'a> {
    pub fn new(mask: Option<&'a GrayImage>, flags: EdgeFlags) -> Self {
        ExternPerimeterRatio { mask, flags }
    }
}

impl BlobOperator for ExternPerimeterRatio<'_> {
    fn name(&self) -> &'static str {
        "ExternPerimeterRatio"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let extern_perimeter = blob.extern_perimeter(self.mask, self.flags);
        let perimeter = blob.perimeter();
        if perimeter != 0.0 {
            extern_perimeter / perimeter
        } else {
            extern_perimeter
        }
    }
}

/// Extern perimeter over hull perimeter; the raw extern perimeter when the
/// hull perimeter is zero.
pub struct ExternHullPerimeterRatio<'a> {
    mask: Option<&'a GrayImage>,
    flags: EdgeFlags,
}

impl<'a> ExternHullPerimeterRatio<'a> {
    pub fn new(mask: Option<&'a GrayImage>, flags: EdgeFlags) -> Self {
        ExternHullPerimeterRatio { mask, flags }
    }
}

impl BlobOperator for ExternHullPerimeterRatio<'_> {
    fn name(&self) -> &'static str {
        "ExternHullPerimeterRatio"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let extern_perimeter = blob.extern_perimeter(self.mask, self.flags);
        let hull = hull_perimeter(blob);
        if hull != 0.0 {
            extern_perimeter / hull
        } else {
            extern_perimeter
        }
    }
}

/// Euclidean distance from the bounding box center to a fixed point.
pub struct DistanceFromPoint {
    x: f64,
    y: f64,
}

impl DistanceFromPoint {
    pub fn new(x: f64, y: f64) -> Self {
        DistanceFromPoint { x, y }
    }
}

impl BlobOperator for DistanceFromPoint {
    fn name(&self) -> &'static str {
        "DistanceFromPoint"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let dx = self.x - blob.x_center();
        let dy = self.y - blob.y_center();
        dx.hypot(dy)
    }
}

/// 1 when the fixed point is on or inside the outer contour.
pub struct XYInside {
    x: f64,
    y: f64,
}

impl XYInside {
    pub fn new(x: f64, y: f64) -> Self {
        XYInside { x, y }
    }
}

impl BlobOperator for XYInside {
    fn name(&self) -> &'static str {
        "XYInside"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        let points = blob.external_contour().points();
        if points.is_empty() {
            return 0.0;
        }
        if geom::point_polygon_test(points, self.x, self.y) >= 0 {
            1.0
        } else {
            0.0
        }
    }
}

/// Mean gray level of a source image over the region.
pub struct Mean<'a> {
    image: &'a GrayImage,
}

impl<'a> Mean<'a> {
    pub fn new(image: &'a GrayImage) -> Self {
        Mean { image }
    }
}

impl BlobOperator for Mean<'_> {
    fn name(&self) -> &'static str {
        "Mean"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.mean(self.image)
    }
}

/// Standard deviation of a source image over the region.
pub struct StdDev<'a> {
    image: &'a GrayImage,
}

impl<'a> StdDev<'a> {
    pub fn new(image: &'a GrayImage) -> Self {
        StdDev { image }
    }
}

impl BlobOperator for StdDev<'_> {
    fn name(&self) -> &'static str {
        "StdDev"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        blob.std_dev(self.image)
    }
}

/// Difference between a reference level and the region's mean gray level.
pub struct ReferencedMean<'a> {
    image: &'a GrayImage,
    reference: f64,
}

impl<'a> ReferencedMean<'a> {
    pub fn new(image: &'a GrayImage, reference: f64) -> Self {
        ReferencedMean { image, reference }
    }
}

impl BlobOperator for ReferencedMean<'_> {
    fn name(&self) -> &'static str {
        "ReferencedMean"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        self.reference - blob.mean(self.image)
    }
}

/// Blob area rescaled from a measured total to a theoretical total.
pub struct RelativeArea {
    total_area: f64,
    theoretical_area: f64,
}

impl RelativeArea {
    pub fn new(total_area: f64, theoretical_area: f64) -> Self {
        RelativeArea {
            total_area,
            theoretical_area,
        }
    }
}

impl BlobOperator for RelativeArea {
    fn name(&self) -> &'static str {
        "RelativeArea"
    }

    fn compute(&self, blob: &Blob) -> f64 {
        if self.total_area == 0.0 {
            return 0.0;
        }
        blob.area() / self.total_area * self.theoretical_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::label_components;
    use image::Luma;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    fn raster(rows: &[&str]) -> GrayImage {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        GrayImage::from_fn(width, height, |x, y| {
            if rows[y as usize].as_bytes()[x as usize] == b'#' {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }

    fn single_blob(rows: &[&str]) -> Blob {
        let blobs = label_components(&raster(rows), None, 0).unwrap();
        assert_eq!(blobs.len(), 1);
        blobs.get(0).unwrap().clone()
    }

    #[test]
    fn value_reads_and_writes_the_property_cache() {
        let blob = single_blob(&["###", "###", "###"]);
        assert_close(Area.value(&blob), 9.0);
        // the cached entry wins over recomputation
        blob.set_cached_property("Area", 99.0);
        assert_close(Area.value(&blob), 99.0);
        assert_close(Area.compute(&blob), 9.0);
    }

    #[test]
    fn join_invalidates_memoized_values() {
        let mut blob = single_blob(&["##..", "##..", "...."]);
        let other = single_blob(&["..##", "..##", "...."]);
        let before = Perimeter.value(&blob);
        blob.join(&other);
        assert!(Perimeter.value(&blob) > before);
    }

    #[test]
    fn compact_square_beats_thin_bar() {
        let square = single_blob(&["#####", "#####", "#####", "#####", "#####"]);
        let bar = single_blob(&["########", "........"]);
        assert!(Compactness.value(&square) < Compactness.value(&bar));
        // a square is already close to a disk
        assert!(Compactness.value(&square) < 1.0);
    }

    #[test]
    fn rasterized_disk_is_round() {
        let disk = GrayImage::from_fn(13, 13, |x, y| {
            let (dx, dy) = (x as i32 - 6, y as i32 - 6);
            if dx * dx + dy * dy <= 25 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        let blobs = label_components(&disk, None, 0).unwrap();
        assert_eq!(blobs.len(), 1);
        let blob = blobs.get(0).unwrap();

        assert!((AxisRatio.value(blob) - 1.0).abs() < 0.05);

        let bar = single_blob(&["############", "############", "............"]);
        assert!(Compactness.value(blob) < Compactness.value(&bar));
    }

    #[test]
    fn length_breadth_and_elongation_of_a_bar() {
        let bar = single_blob(&["########", "........"]);
        let length = Length.value(&bar);
        let breadth = Breadth.value(&bar);
        assert!(length > breadth);
        assert!(breadth > 0.0);
        assert_close(Elongation.value(&bar), length / breadth);
    }

    #[test]
    fn convex_square_has_unit_roughness() {
        let square = single_blob(&["#####", "#####", "#####", "#####", "#####"]);
        assert_close(HullPerimeter.value(&square), 16.0);
        assert_close(HullArea.value(&square), 16.0);
        assert_close(Roughness.value(&square), 1.0);
    }

    #[test]
    fn moments_cache_per_order() {
        let blob = single_blob(&["####", "####", "####"]);
        let m00 = Moment::new(MomentOrder::M00);
        let m10 = Moment::new(MomentOrder::M10);
        assert_close(m00.value(&blob), blob.moment(MomentOrder::M00));
        assert_close(m10.value(&blob), blob.moment(MomentOrder::M10));
        assert!(blob.cached_property("Moment00").is_some());
        assert!(blob.cached_property("Moment10").is_some());
    }

    #[test]
    fn bounding_box_operators() {
        let blob = single_blob(&["......", ".###..", ".###.."]);
        assert_close(MinX.value(&blob), 1.0);
        assert_close(MaxX.value(&blob), 3.0);
        assert_close(MinY.value(&blob), 1.0);
        assert_close(MaxY.value(&blob), 2.0);
        assert_close(DiffX.value(&blob), 3.0);
        assert_close(DiffY.value(&blob), 2.0);
        assert_close(XCenter.value(&blob), 2.0);
        assert_close(YCenter.value(&blob), 1.5);
    }

    #[test]
    fn boundary_extrema_of_an_l_shape() {
        let blob = single_blob(&["#..", "#..", "###"]);
        assert_close(MinXAtMinY.value(&blob), 0.0);
        assert_close(MaxXAtMaxY.value(&blob), 2.0);
        assert_close(MinYAtMaxX.value(&blob), 2.0);
        assert_close(MaxYAtMinX.value(&blob), 2.0);
    }

    #[test]
    fn ellipse_operators_agree_with_the_ellipse() {
        let blob = single_blob(&["........", ".######.", ".######.", ".######.", "........"]);
        let ellipse = blob.ellipse();
        assert_close(MajorAxisLength.value(&blob), ellipse.major_axis);
        assert_close(MinorAxisLength.value(&blob), ellipse.minor_axis);
        assert_close(Orientation.value(&blob), ellipse.angle);
        assert_close(EllipseXCenter.value(&blob), ellipse.center_x);
        assert_close(EllipseYCenter.value(&blob), ellipse.center_y);
        // a flat bar lies along the x axis
        assert_close(OrientationCos.value(&blob), 1.0);
        let ratio = AxisRatio.value(&blob);
        assert!(ratio > 0.0 && ratio < 1.0);
        assert!(AreaElipseRatio.value(&blob) > 0.0);
    }

    #[test]
    fn exterior_and_extern_perimeter_operators() {
        let touching = single_blob(&["###..", "###..", "###..", ".....", "....."]);
        let flags = EdgeFlags::default();
        assert_close(Exterior::new(None, flags).value(&touching), 1.0);
        assert!(ExternPerimeter::new(None, flags).value(&touching) > 0.0);
        let ratio = ExternPerimeterRatio::new(None, flags).value(&touching);
        assert!(ratio > 0.0 && ratio < 1.0);

        let interior = single_blob(&[".....", ".###.", ".###.", ".###.", "....."]);
        assert_close(Exterior::new(None, flags).value(&interior), 0.0);
        assert_close(ExternPerimeter::new(None, flags).value(&interior), 0.0);
    }

    #[test]
    fn point_operators() {
        let blob = single_blob(&["####", "####", "####", "####"]);
        assert_close(DistanceFromPoint::new(4.5, 1.5).value(&blob), 3.0);
        assert_close(XYInside::new(1.0, 1.0).value(&blob), 1.0);
        // a second query point shares the "XYInside" cache slot, so it
        // must go through compute
        assert_close(XYInside::new(9.0, 9.0).compute(&blob), 0.0);
    }

    #[test]
    fn xy_inside_matches_membership_on_an_isolated_pixel() {
        let blob = single_blob(&["...", ".#.", "..."]);
        assert!(blob.contains_point(1.0, 1.0));
        assert_close(XYInside::new(1.0, 1.0).value(&blob), 1.0);
        assert_close(XYInside::new(2.0, 1.0).compute(&blob), 0.0);
    }

    #[test]
    fn gray_level_operators() {
        let mask = raster(&["##..", "##..", "...."]);
        let blobs = label_components(&mask, None, 0).unwrap();
        let blob = blobs.get(0).unwrap();
        let values = GrayImage::from_fn(4, 3, |x, y| Luma([(10 * (1 + x + 2 * y)) as u8]));

        assert_close(Mean::new(&values).value(blob), 25.0);
        assert_close(StdDev::new(&values).value(blob), 125.0_f64.sqrt());
        assert_close(ReferencedMean::new(&values, 100.0).compute(blob), 75.0);
    }

    #[test]
    fn relative_area_guards_a_zero_total() {
        let blob = single_blob(&["###", "###", "###"]);
        assert_close(RelativeArea::new(0.0, 50.0).value(&blob), 0.0);
        assert_close(RelativeArea::new(18.0, 50.0).compute(&blob), 25.0);
    }
}
