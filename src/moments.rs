//! Raw spatial moments of a closed contour, up to third order.
//!
//! The accumulation walks the boundary once and integrates with Green's
//! theorem, the same recurrence image-moment libraries use for polygon
//! input, so no rasterization is needed.

use crate::chain::Point;
use crate::error::BlobError;

/// Highest supported moment order (`p + q`).
pub const MAX_MOMENT_ORDER: u32 = 3;

/// A validated moment order pair with `p + q <= MAX_MOMENT_ORDER`.
///
/// Out-of-range orders are rejected here, at construction, which keeps
/// every `moment(order)` accessor in the crate infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentOrder {
    p: u32,
    q: u32,
}

impl MomentOrder {
    pub const M00: MomentOrder = MomentOrder { p: 0, q: 0 };
    pub const M10: MomentOrder = MomentOrder { p: 1, q: 0 };
    pub const M01: MomentOrder = MomentOrder { p: 0, q: 1 };
    pub const M20: MomentOrder = MomentOrder { p: 2, q: 0 };
    pub const M11: MomentOrder = MomentOrder { p: 1, q: 1 };
    pub const M02: MomentOrder = MomentOrder { p: 0, q: 2 };
    pub const M30: MomentOrder = MomentOrder { p: 3, q: 0 };
    pub const M21: MomentOrder = MomentOrder { p: 2, q: 1 };
    pub const M12: MomentOrder = MomentOrder { p: 1, q: 2 };
    pub const M03: MomentOrder = MomentOrder { p: 0, q: 3 };

    pub fn new(p: u32, q: u32) -> Result<Self, BlobError> {
        if p + q > MAX_MOMENT_ORDER {
            return Err(BlobError::MomentOrder {
                p,
                q,
                max: MAX_MOMENT_ORDER,
            });
        }
        Ok(MomentOrder { p, q })
    }

    pub const fn p(&self) -> u32 {
        self.p
    }

    pub const fn q(&self) -> u32 {
        self.q
    }
}

/// Raw moments m00..m03 of one closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
}

impl Moments {
    /// Integrates all orders over the polygon bounded by `points`, treated
    /// as closed. Orientation is normalized so m00 is non-negative.
    pub fn of_contour(points: &[Point]) -> Self {
        let n = points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        let mut a20 = 0.0;
        let mut a11 = 0.0;
        let mut a02 = 0.0;
        let mut a30 = 0.0;
        let mut a21 = 0.0;
        let mut a12 = 0.0;
        let mut a03 = 0.0;

        let mut xi_1 = points[n - 1].x as f64;
        let mut yi_1 = points[n - 1].y as f64;

        for point in points {
            let xi = point.x as f64;
            let yi = point.y as f64;
            let xi2 = xi * xi;
            let yi2 = yi * yi;
            let xi_12 = xi_1 * xi_1;
            let yi_12 = yi_1 * yi_1;
            let dxy = xi_1 * yi - xi * yi_1;
            let xii_1 = xi_1 + xi;
            let yii_1 = yi_1 + yi;

            a00 += dxy;
            a10 += dxy * xii_1;
            a01 += dxy * yii_1;
            a20 += dxy * (xi_1 * xii_1 + xi2);
            a11 += dxy * (xi_1 * (yii_1 + yi_1) + xi * (yii_1 + yi));
            a02 += dxy * (yi_1 * yii_1 + yi2);
            a30 += dxy * xii_1 * (xi_12 + xi2);
            a03 += dxy * yii_1 * (yi_12 + yi2);
            a21 += dxy * (xi_12 * (3.0 * yi_1 + yi) + 2.0 * xi * xi_1 * yii_1 + xi2 * (yi_1 + 3.0 * yi));
            a12 += dxy * (yi_12 * (3.0 * xi_1 + xi) + 2.0 * yi * yi_1 * xii_1 + yi2 * (xi_1 + 3.0 * xi));

            xi_1 = xi;
            yi_1 = yi;
        }

        if a00.abs() < f64::EPSILON {
            return Moments::default();
        }

        // normalize orientation so areas come out positive
        let sign = if a00 > 0.0 { 1.0 } else { -1.0 };

        Moments {
            m00: a00 * sign / 2.0,
            m10: a10 * sign / 6.0,
            m01: a01 * sign / 6.0,
            m20: a20 * sign / 12.0,
            m11: a11 * sign / 24.0,
            m02: a02 * sign / 12.0,
            m30: a30 * sign / 20.0,
            m21: a21 * sign / 60.0,
            m12: a12 * sign / 60.0,
            m03: a03 * sign / 20.0,
        }
    }

    /// The raw moment for a validated order pair.
    pub fn get(&self, order: MomentOrder) -> f64 {
        match (order.p(), order.q()) {
            (0, 0) => self.m00,
            (1, 0) => self.m10,
            (0, 1) => self.m01,
            (2, 0) => self.m20,
            (1, 1) => self.m11,
            (0, 2) => self.m02,
            (3, 0) => self.m30,
            (2, 1) => self.m21,
            (1, 2) => self.m12,
            (0, 3) => self.m03,
            // unreachable by MomentOrder construction
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    fn square(x0: i32, y0: i32, side: i32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ]
    }

    #[test]
    fn order_validation_rejects_above_third_order() {
        assert!(MomentOrder::new(0, 0).is_ok());
        assert!(MomentOrder::new(2, 1).is_ok());
        assert!(MomentOrder::new(3, 1).is_err());
        assert!(MomentOrder::new(4, 0).is_err());
    }

    #[test]
    fn square_area_and_centroid() {
        let m = Moments::of_contour(&square(0, 0, 4));
        assert_close(m.m00, 16.0);
        assert_close(m.m10 / m.m00, 2.0);
        assert_close(m.m01 / m.m00, 2.0);
    }

    #[test]
    fn translated_square_centroid() {
        let m = Moments::of_contour(&square(10, 20, 6));
        assert_close(m.m00, 36.0);
        assert_close(m.m10 / m.m00, 13.0);
        assert_close(m.m01 / m.m00, 23.0);
    }

    #[test]
    fn orientation_is_normalized() {
        let cw = square(0, 0, 4);
        let mut ccw = cw.clone();
        ccw.reverse();
        let m_cw = Moments::of_contour(&cw);
        let m_ccw = Moments::of_contour(&ccw);
        assert_close(m_cw.m00, m_ccw.m00);
        assert_close(m_cw.m10, m_ccw.m10);
        assert!(m_cw.m00 > 0.0);
    }

    #[test]
    fn second_central_moments_of_square() {
        // central u20 of an axis-aligned square of side s is s^4/12
        let side = 4.0_f64;
        let m = Moments::of_contour(&square(3, 5, side as i32));
        let u20 = m.m20 - m.m10 * m.m10 / m.m00;
        let u02 = m.m02 - m.m01 * m.m01 / m.m00;
        assert_close(u20, side.powi(4) / 12.0);
        assert_close(u02, side.powi(4) / 12.0);
    }

    #[test]
    fn degenerate_contours_have_zero_moments() {
        assert_eq!(Moments::of_contour(&[]), Moments::default());
        let line = vec![Point::new(0, 0), Point::new(5, 0), Point::new(0, 0)];
        assert_close(Moments::of_contour(&line).m00, 0.0);
    }

    #[test]
    fn get_returns_matching_field() {
        let m = Moments::of_contour(&square(0, 0, 4));
        assert_close(m.get(MomentOrder::M00), m.m00);
        assert_close(m.get(MomentOrder::M11), m.m11);
        assert_close(m.get(MomentOrder::M03), m.m03);
    }
}
