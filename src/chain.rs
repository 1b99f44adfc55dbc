//! Freeman chain codes: the 8-direction crack-code alphabet contours are
//! stored in, plus the integer grid point they move.

/// An integer pixel coordinate. The y axis grows downward, as in the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// One step of a crack-code contour walk.
///
/// Codes follow the Freeman numbering, counter-clockwise from east:
///
/// ```text
///   3  2  1
///   4  P  0
///   5  6  7
/// ```
///
/// so `E = 0` moves by (1, 0) and `Se = 7` by (1, 1). Non-adjacent moves
/// have no code; `ChainCode::diff` returns `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChainCode {
    E = 0,
    Ne = 1,
    N = 2,
    Nw = 3,
    W = 4,
    Sw = 5,
    S = 6,
    Se = 7,
}

/// All codes in Freeman order, for cyclic neighbor scans.
pub const CHAIN_CODES: [ChainCode; 8] = [
    ChainCode::E,
    ChainCode::Ne,
    ChainCode::N,
    ChainCode::Nw,
    ChainCode::W,
    ChainCode::Sw,
    ChainCode::S,
    ChainCode::Se,
];

impl ChainCode {
    /// The (dx, dy) offset of this code.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            ChainCode::E => (1, 0),
            ChainCode::Ne => (1, -1),
            ChainCode::N => (0, -1),
            ChainCode::Nw => (-1, -1),
            ChainCode::W => (-1, 0),
            ChainCode::Sw => (-1, 1),
            ChainCode::S => (0, 1),
            ChainCode::Se => (1, 1),
        }
    }

    /// Freeman index of this code (0..=7).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Code for a Freeman index, reduced modulo 8.
    pub const fn from_index(index: u8) -> Self {
        CHAIN_CODES[(index % 8) as usize]
    }

    /// Moves `origin` one step in this code's direction.
    pub fn apply(self, origin: Point) -> Point {
        let (dx, dy) = self.delta();
        Point::new(origin.x + dx, origin.y + dy)
    }

    /// The code that moves `from` to `to`, or `None` if the points are
    /// equal or not 8-adjacent.
    pub fn diff(from: Point, to: Point) -> Option<Self> {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        match (dx, dy) {
            (1, 0) => Some(ChainCode::E),
            (1, -1) => Some(ChainCode::Ne),
            (0, -1) => Some(ChainCode::N),
            (-1, -1) => Some(ChainCode::Nw),
            (-1, 0) => Some(ChainCode::W),
            (-1, 1) => Some(ChainCode::Sw),
            (0, 1) => Some(ChainCode::S),
            (1, 1) => Some(ChainCode::Se),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_and_diff_are_inverse() {
        let origin = Point::new(10, -3);
        for code in CHAIN_CODES {
            let moved = code.apply(origin);
            assert_ne!(moved, origin);
            assert_eq!(ChainCode::diff(origin, moved), Some(code));
        }
    }

    #[test]
    fn diff_of_equal_points_is_none() {
        let p = Point::new(4, 4);
        assert_eq!(ChainCode::diff(p, p), None);
    }

    #[test]
    fn diff_of_non_adjacent_points_is_none() {
        assert_eq!(ChainCode::diff(Point::new(0, 0), Point::new(2, 0)), None);
        assert_eq!(ChainCode::diff(Point::new(0, 0), Point::new(-2, 1)), None);
        assert_eq!(ChainCode::diff(Point::new(5, 5), Point::new(7, 7)), None);
    }

    #[test]
    fn from_index_wraps_modulo_8() {
        assert_eq!(ChainCode::from_index(0), ChainCode::E);
        assert_eq!(ChainCode::from_index(7), ChainCode::Se);
        assert_eq!(ChainCode::from_index(8), ChainCode::E);
        assert_eq!(ChainCode::from_index(12), ChainCode::W);
    }

    #[test]
    fn deltas_are_the_eight_unit_and_diagonal_offsets() {
        let mut seen: Vec<(i32, i32)> = CHAIN_CODES.iter().map(|c| c.delta()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 8);
        for (dx, dy) in seen {
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
        }
    }
}
