//! Single-pass connected-component labeling with contour tracing, after
//! Chang, Chen and Lu's linear-time algorithm.
//!
//! One row-major scan finds every region and traces its outer boundary and
//! all hole boundaries as crack-code walks. Labels propagate along traced
//! contours and, for interior pixels, from the left neighbor, so each pixel
//! is touched a bounded number of times. The label and visited buffers are
//! local to the call; nothing is retained between runs.

use image::GrayImage;

use crate::blob::Blob;
use crate::chain::{ChainCode, Point};
use crate::collection::BlobCollection;
use crate::contour::{Contour, ContourKind};
use crate::error::BlobError;

// Initial probe directions for the first step of a walk. Outer boundaries
// are entered from above during the scan, hole boundaries from below, so
// the probes start on opposite sides.
const OUTER_FIRST_PROBE: u8 = 3;
const HOLE_FIRST_PROBE: u8 = 7;

/// Labels all 8-connected foreground regions of `image` and returns them as
/// blobs, in scan order (ids start at 1).
///
/// A pixel is foreground when its value differs from `background` and, if a
/// mask is given, its mask value is non-zero. The mask must match the image
/// dimensions.
pub fn label_components(
    image: &GrayImage,
    mask: Option<&GrayImage>,
    background: u8,
) -> Result<BlobCollection, BlobError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BlobError::EmptyImage);
    }
    if let Some(mask) = mask {
        if mask.dimensions() != (width, height) {
            return Err(BlobError::MaskSizeMismatch {
                width,
                height,
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
    }

    let mut tracer = Tracer::new(image, mask, background);
    let mut blobs: Vec<Blob> = Vec::new();

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let point = Point::new(x, y);
            if !tracer.is_foreground(point) {
                continue;
            }
            let index = tracer.index(point);

            // a foreground pixel starts an outer contour when it is still
            // unlabeled and nothing stands above it
            let above_foreground = y > 0 && tracer.is_foreground(Point::new(x, y - 1));
            if tracer.labels[index] == 0 && !above_foreground {
                let label = blobs.len() as u32 + 1;
                let external = tracer.trace(point, label, ContourKind::Outer);
                blobs.push(Blob::new(label, external, (width, height)));
                continue;
            }

            // it starts a hole contour when the pixel below is background
            // and that background has not been swept by an earlier walk
            let below = Point::new(x, y + 1);
            let hole_below = y < height as i32 - 1
                && !tracer.is_foreground(below)
                && !tracer.visited[tracer.index(below)];
            if hole_below {
                let label = if tracer.labels[index] != 0 {
                    tracer.labels[index]
                } else if x > 0 {
                    tracer.labels[index - 1]
                } else {
                    0
                };
                if label > 0 {
                    let hole = tracer.trace(point, label, ContourKind::Hole);
                    blobs[label as usize - 1].add_internal_contour(hole);
                }
                continue;
            }

            // plain interior pixel: inherit the label from the left
            if x > 0 && tracer.labels[index] == 0 {
                tracer.labels[index] = tracer.labels[index - 1];
            }
        }
    }

    Ok(BlobCollection::from_blobs(blobs))
}

struct Tracer<'a> {
    image: &'a GrayImage,
    mask: Option<&'a GrayImage>,
    background: u8,
    width: i32,
    height: i32,
    labels: Vec<u32>,
    visited: Vec<bool>,
}

impl<'a> Tracer<'a> {
    fn new(image: &'a GrayImage, mask: Option<&'a GrayImage>, background: u8) -> Self {
        let (width, height) = image.dimensions();
        let pixels = (width * height) as usize;
        Tracer {
            image,
            mask,
            background,
            width: width as i32,
            height: height as i32,
            labels: vec![0; pixels],
            visited: vec![false; pixels],
        }
    }

    fn index(&self, point: Point) -> usize {
        (point.y * self.width + point.x) as usize
    }

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    /// Foreground test for an in-bounds point: not the background value and
    /// not excluded by the mask.
    fn is_foreground(&self, point: Point) -> bool {
        let (x, y) = (point.x as u32, point.y as u32);
        self.image.get_pixel(x, y)[0] != self.background
            && self.mask.map_or(true, |mask| mask.get_pixel(x, y)[0] != 0)
    }

    /// Probes the 8 neighbors of `from`, starting at Freeman index
    /// `first_probe` and turning through the cyclic order, for the next
    /// foreground point. Rejected background neighbors are marked visited;
    /// out-of-image probes are skipped. `None` means the pixel is isolated.
    fn step(&mut self, from: Point, first_probe: u8) -> Option<(Point, ChainCode)> {
        for turn in 0..8 {
            let code = ChainCode::from_index(first_probe + turn);
            let candidate = code.apply(from);
            if !self.in_bounds(candidate) {
                continue;
            }
            if self.is_foreground(candidate) {
                return Some((candidate, code));
            }
            let index = self.index(candidate);
            self.visited[index] = true;
        }
        None
    }

    /// Traces one closed contour from `start`, labeling every boundary
    /// pixel with `label`. The walk ends back at its start; for an isolated
    /// pixel the returned contour has no codes.
    fn trace(&mut self, start: Point, label: u32, kind: ContourKind) -> Contour {
        let mut contour = Contour::new(start, kind);
        let start_index = self.index(start);
        self.labels[start_index] = label;

        let first_probe = match kind {
            ContourKind::Outer => OUTER_FIRST_PROBE,
            ContourKind::Hole => HOLE_FIRST_PROBE,
        };
        let Some((second, first_code)) = self.step(start, first_probe) else {
            return contour;
        };
        contour.add_code(first_code);
        let second_index = self.index(second);
        self.labels[second_index] = label;

        let mut movement = first_code;
        let mut current = second;
        loop {
            let probe = (movement.index() + 5) % 8;
            let Some((next, code)) = self.step(current, probe) else {
                break;
            };
            movement = code;
            // closure needs the two-point check: the walk may pass through
            // its start again on a one-pixel-wide neck without being done
            if current == start && next == second {
                break;
            }
            let next_index = self.index(next);
            self.labels[next_index] = label;
            contour.add_code(code);
            current = next;
        }
        contour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    /// Builds a grayscale raster from rows of `#` (255) and `.` (0).
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

    #[test]
    fn empty_image_is_rejected() {
        let image = GrayImage::new(0, 0);
        let error = label_components(&image, None, 0).unwrap_err();
        assert_eq!(error, BlobError::EmptyImage);
    }

    #[test]
    fn mask_dimension_mismatch_is_rejected() {
        let image = GrayImage::new(4, 4);
        let mask = GrayImage::new(4, 3);
        let error = label_components(&image, Some(&mask), 0).unwrap_err();
        assert_eq!(
            error,
            BlobError::MaskSizeMismatch {
                width: 4,
                height: 4,
                mask_width: 4,
                mask_height: 3,
            }
        );
    }

    #[test]
    fn solid_block_measures_its_exact_pixel_count() {
        let image = raster(&["#####", "#####", "#####", "#####", "#####"]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 1);

        let blob = blobs.get(0).unwrap();
        assert_eq!(blob.id(), 1);
        assert_close(blob.area(), 25.0);
        assert_close(blob.perimeter(), 16.0);
        assert_eq!(blob.min_x(), 0);
        assert_eq!(blob.max_x(), 4);
        assert_eq!(blob.min_y(), 0);
        assert_eq!(blob.max_y(), 4);
    }

    #[test]
    fn diagonal_pair_is_one_region() {
        let image = raster(&["#..", ".#.", "..."]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_close(blobs.get(0).unwrap().area(), 2.0);
    }

    #[test]
    fn ring_region_reports_one_hole() {
        let image = raster(&["######", "#....#", "######"]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 1);

        let blob = blobs.get(0).unwrap();
        assert_eq!(blob.internal_contours().len(), 1);
        let hole = &blob.internal_contours()[0];
        assert_eq!(hole.kind(), ContourKind::Hole);
        assert_close(hole.area(), 4.0);
        // 6x3 ring minus the 4-pixel hole
        assert_close(blob.area(), 14.0);
    }

    #[test]
    fn outer_and_hole_walks_wind_oppositely() {
        let image = raster(&["#####", "#...#", "#...#", "#####"]);
        let blobs = label_components(&image, None, 0).unwrap();
        let blob = blobs.get(0).unwrap();
        let outer_sign = blob.external_contour().signed_area();
        let hole_sign = blob.internal_contours()[0].signed_area();
        assert!(outer_sign * hole_sign < 0.0);
    }

    #[test]
    fn isolated_pixels_become_degenerate_blobs() {
        let image = raster(&["#.#", "...", ".#."]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 3);
        for blob in blobs.iter() {
            assert!(blob.external_contour().is_empty());
            assert_close(blob.area(), 0.0);
        }
        // positioned by their 1x1 bounding boxes, in scan order
        assert_eq!(blobs.get(0).unwrap().min_x(), 0);
        assert_eq!(blobs.get(1).unwrap().min_x(), 2);
        assert_eq!(blobs.get(2).unwrap().min_y(), 2);
    }

    #[test]
    fn regions_are_numbered_in_scan_order() {
        let image = raster(&["##...", ".....", "...##"]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs.get(0).unwrap().id(), 1);
        assert_eq!(blobs.get(1).unwrap().id(), 2);
        assert_eq!(blobs.get(0).unwrap().min_y(), 0);
        assert_eq!(blobs.get(1).unwrap().min_y(), 2);
    }

    #[test]
    fn mask_excludes_regions() {
        let image = raster(&["##.##", ".....", "....."]);
        // zero out the right block
        let mask = GrayImage::from_fn(5, 3, |x, _| if x < 3 { Luma([255u8]) } else { Luma([0u8]) });
        let blobs = label_components(&image, Some(&mask), 0).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs.get(0).unwrap().max_x(), 1);
    }

    #[test]
    fn concave_region_stays_one_blob() {
        // U shape: the right arm is reached through left-label inheritance
        let image = raster(&["#.#", "#.#", "###"]);
        let blobs = label_components(&image, None, 0).unwrap();
        assert_eq!(blobs.len(), 1);
        assert_close(blobs.get(0).unwrap().area(), 7.0);
    }
}
