//! Hand-drawn stroke effect.

use kurbo::{BezPath, PathEl, Point};

/// Simple seeded random number generator (xorshift32).
/// Used for deterministic hand-drawn effects.
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [-1, 1]
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }

    fn jitter(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.offset(amount), p.y + self.offset(amount))
    }
}

/// Number of jittered passes drawn per stroke.
pub const ROUGH_PASSES: u32 = 2;

/// Wobble a path so it looks drawn by hand.
///
/// Endpoints are offset by up to `2 * roughness` pixels and straight segments
/// bow sideways in proportion to their length. The same `seed` and `pass`
/// always give the same path, so a preview does not shimmer while dragging;
/// different passes give unrelated wobble.
///
/// roughness: 0 = clean, 10 = very sketchy
pub fn hand_drawn(path: &BezPath, roughness: f64, seed: u32, pass: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }

    let max_offset = roughness * 2.0;
    let bowing = roughness;

    // Large prime for very different sequences
    let mut rng = SimpleRng::new(seed.wrapping_add(pass.wrapping_mul(99991)));

    let mut result = BezPath::new();
    let mut last_point = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(rng.jitter(p, max_offset));
                last_point = p;
            }
            PathEl::LineTo(p) => {
                let d = p - last_point;
                let len = d.hypot();

                let bow = rng.offset(bowing * roughness * len / 200.0);
                let perp = if len > 0.001 {
                    kurbo::Vec2::new(-d.y / len, d.x / len)
                } else {
                    kurbo::Vec2::ZERO
                };
                let ctrl = last_point.midpoint(p) + perp * bow;

                result.quad_to(ctrl, rng.jitter(p, max_offset));
                last_point = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(
                    rng.jitter(p1, max_offset * 0.7),
                    rng.jitter(p2, max_offset),
                );
                last_point = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    rng.jitter(p1, max_offset * 0.5),
                    rng.jitter(p2, max_offset * 0.5),
                    rng.jitter(p3, max_offset),
                );
                last_point = p3;
            }
            PathEl::ClosePath => result.close_path(),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path.line_to((100.0, 100.0));
        path.line_to((0.0, 100.0));
        path.close_path();
        path
    }

    #[test]
    fn test_zero_roughness_is_identity() {
        let path = square();
        assert_eq!(hand_drawn(&path, 0.0, 42, 0), path);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let path = square();
        assert_eq!(hand_drawn(&path, 3.0, 7, 0), hand_drawn(&path, 3.0, 7, 0));
    }

    #[test]
    fn test_passes_differ() {
        let path = square();
        assert_ne!(hand_drawn(&path, 3.0, 7, 0), hand_drawn(&path, 3.0, 7, 1));
    }

    #[test]
    fn test_offsets_are_bounded() {
        let path = square();
        let rough = hand_drawn(&path, 2.0, 1234, 0);
        let original: Vec<_> = path.elements().iter().filter_map(|el| el.end_point()).collect();
        let wobbled: Vec<_> = rough.elements().iter().filter_map(|el| el.end_point()).collect();

        assert_eq!(original.len(), wobbled.len());
        for (a, b) in original.iter().zip(&wobbled) {
            assert!((a.x - b.x).abs() <= 4.0 + 1e-9);
            assert!((a.y - b.y).abs() <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn test_zero_seed_still_jitters() {
        let path = square();
        assert_ne!(hand_drawn(&path, 1.0, 0, 0), path);
    }
}
