use rand::Rng;

/// Size of the play field in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner of a target on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Two items overlap when they are too close on both axes at once.
    pub fn overlaps(&self, other: &Position, min_separation: f64) -> bool {
        (self.x - other.x).abs() < min_separation && (self.y - other.y).abs() < min_separation
    }
}

/// Everything the placement needs to know about the field and the items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub canvas: Canvas,
    pub item_size: f64,
    pub margin: f64,
    pub padding: f64,
    pub max_attempts: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 740.0,
                height: 540.0,
            },
            item_size: 60.0,
            margin: 15.0,
            padding: 30.0,
            max_attempts: 100,
        }
    }
}

impl LayoutParams {
    pub fn min_separation(&self) -> f64 {
        self.item_size + self.margin
    }

    /// Inclusive range a coordinate may take along an axis of length `dim`
    fn axis_range(&self, dim: f64) -> (f64, f64) {
        let lo = self.padding;
        let hi = dim - self.item_size - self.padding;
        (lo, hi.max(lo))
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let (x_lo, x_hi) = self.axis_range(self.canvas.width);
        let (y_lo, y_hi) = self.axis_range(self.canvas.height);
        Position::new(rng.gen_range(x_lo..=x_hi), rng.gen_range(y_lo..=y_hi))
    }
}

/// Place `count` items on the canvas by rejection sampling.
///
/// Each item gets up to `max_attempts` candidates; if none of them clears
/// every previously placed item, the last candidate is kept anyway, so
/// crowded layouts degrade into overlaps instead of failing. The returned
/// vector is indexed by rank - 1.
pub fn generate<R: Rng + ?Sized>(count: usize, params: &LayoutParams, rng: &mut R) -> Vec<Position> {
    let min_separation = params.min_separation();
    let attempts = params.max_attempts.max(1);
    let mut positions: Vec<Position> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut candidate = params.sample(rng);
        for _ in 1..attempts {
            if !positions.iter().any(|p| p.overlaps(&candidate, min_separation)) {
                break;
            }
            candidate = params.sample(rng);
        }
        positions.push(candidate);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_bounds(p: &Position, params: &LayoutParams) -> bool {
        p.x >= params.padding
            && p.y >= params.padding
            && p.x + params.item_size + params.padding <= params.canvas.width
            && p.y + params.item_size + params.padding <= params.canvas.height
    }

    #[test]
    fn test_generate_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(0, &LayoutParams::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_generate_returns_exact_count_in_bounds() {
        let params = LayoutParams::default();
        let mut rng = StdRng::seed_from_u64(7);

        for count in [1, 2, 5, 17, 50, 120] {
            let positions = generate(count, &params, &mut rng);
            assert_eq!(positions.len(), count);
            for p in &positions {
                assert!(in_bounds(p, &params), "{p:?} out of bounds");
            }
        }
    }

    #[test]
    fn test_small_layouts_are_separated() {
        let params = LayoutParams::default();
        let min_sep = params.min_separation();

        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let positions = generate(8, &params, &mut rng);
            for (i, a) in positions.iter().enumerate() {
                for b in &positions[i + 1..] {
                    assert!(!a.overlaps(b, min_sep), "seed {seed}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_crowded_layout_still_places_everything() {
        let params = LayoutParams {
            canvas: Canvas {
                width: 200.0,
                height: 200.0,
            },
            ..LayoutParams::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let positions = generate(30, &params, &mut rng);
        assert_eq!(positions.len(), 30);
        assert!(positions.iter().all(|p| in_bounds(p, &params)));
    }

    #[test]
    fn test_canvas_smaller_than_item_pins_to_padding() {
        let params = LayoutParams {
            canvas: Canvas {
                width: 50.0,
                height: 50.0,
            },
            ..LayoutParams::default()
        };
        let mut rng = StdRng::seed_from_u64(11);

        let positions = generate(3, &params, &mut rng);
        assert!(positions
            .iter()
            .all(|p| *p == Position::new(params.padding, params.padding)));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let params = LayoutParams::default();
        let a = generate(10, &params, &mut StdRng::seed_from_u64(42));
        let b = generate(10, &params, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_overlap_needs_both_axes() {
        let a = Position::new(100.0, 100.0);
        assert!(a.overlaps(&Position::new(150.0, 150.0), 75.0));
        assert!(!a.overlaps(&Position::new(175.0, 100.0), 75.0));
        assert!(!a.overlaps(&Position::new(100.0, 20.0), 75.0));
    }
}
