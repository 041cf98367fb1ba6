use rayon::prelude::*;

use crate::pitch::{PITCH_LENGTH, PITCH_WIDTH};

/// Shading resolution of the overlay. Band 0 is never painted, so areas
/// the kernel barely reaches show the pitch instead of the gradient's
/// zero color.
pub const SHADE_LEVELS: u32 = 100;

// Scott's rule degenerates to a zero bandwidth for a single point or a
// zero-variance axis; the floor keeps the kernel finite.
const MIN_BANDWIDTH: f32 = 1.5;

/// Kernel density estimate of event coordinates, evaluated on a
/// `width x height` grid spanning the full pitch. Cell (0, 0) is the
/// pitch origin corner; rows advance along pitch width.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub width: usize,
    pub height: usize,
    values: Vec<f32>,
    max: f32,
}

impl DensityGrid {
    /// Gaussian product kernel with per-axis Scott's-rule bandwidth.
    /// Zero points produce an all-zero grid.
    pub fn estimate(points: &[(f32, f32)], width: usize, height: usize) -> Self {
        let mut grid = Self {
            width,
            height,
            values: vec![0.0; width * height],
            max: 0.0,
        };
        if points.is_empty() || width == 0 || height == 0 {
            return grid;
        }

        let (bw_x, bw_y) = scott_bandwidths(points);
        let cell_w = PITCH_LENGTH / width as f32;
        let cell_h = PITCH_WIDTH / height as f32;

        grid.values
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, cells)| {
                let cy = (row as f32 + 0.5) * cell_h;
                for (col, cell) in cells.iter_mut().enumerate() {
                    let cx = (col as f32 + 0.5) * cell_w;
                    let mut sum = 0.0f32;
                    for &(px, py) in points {
                        let dx = (cx - px) / bw_x;
                        let dy = (cy - py) / bw_y;
                        sum += (-0.5 * (dx * dx + dy * dy)).exp();
                    }
                    *cell = sum;
                }
            });

        grid.max = grid.values.iter().copied().fold(0.0f32, f32::max);
        grid
    }

    pub fn value(&self, col: usize, row: usize) -> f32 {
        self.values[row * self.width + col]
    }

    /// Normalized density of a cell in [0, 1], against the grid maximum.
    pub fn normalized(&self, col: usize, row: usize) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.value(col, row) / self.max
    }

    /// Quantized shade band for a cell: `None` for the suppressed lowest
    /// band, `Some(1..=levels)` otherwise.
    pub fn shade_band(&self, col: usize, row: usize, levels: u32) -> Option<u32> {
        let band = (self.normalized(col, row) * levels as f32).floor() as u32;
        if band == 0 {
            None
        } else {
            Some(band.min(levels))
        }
    }
}

fn scott_bandwidths(points: &[(f32, f32)]) -> (f32, f32) {
    let n = points.len() as f32;
    let factor = n.powf(-1.0 / 6.0);
    let sigma_x = std_dev(points.iter().map(|p| p.0));
    let sigma_y = std_dev(points.iter().map(|p| p.1));
    (
        (sigma_x * factor).max(MIN_BANDWIDTH),
        (sigma_y * factor).max(MIN_BANDWIDTH),
    )
}

fn std_dev(values: impl Iterator<Item = f32> + Clone) -> f32 {
    let n = values.clone().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f32>() / n;
    let var = values.map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_all_zero_grid() {
        let grid = DensityGrid::estimate(&[], 24, 16);
        for row in 0..16 {
            for col in 0..24 {
                assert_eq!(grid.value(col, row), 0.0);
                assert_eq!(grid.shade_band(col, row, SHADE_LEVELS), None);
            }
        }
    }

    #[test]
    fn single_point_peaks_at_its_cell() {
        let grid = DensityGrid::estimate(&[(32.0, 21.0)], 24, 16);
        // 120/24 = 5 pitch units per column, 80/16 = 5 per row.
        let expect_col = (32.0 / 5.0) as usize;
        let expect_row = (21.0 / 5.0) as usize;

        let mut best = (0, 0);
        let mut best_val = f32::MIN;
        for row in 0..16 {
            for col in 0..24 {
                if grid.value(col, row) > best_val {
                    best_val = grid.value(col, row);
                    best = (col, row);
                }
            }
        }
        assert_eq!(best, (expect_col, expect_row));
        assert_eq!(grid.normalized(best.0, best.1), 1.0);
    }

    #[test]
    fn far_corner_falls_in_suppressed_band() {
        let grid = DensityGrid::estimate(&[(10.0, 10.0), (12.0, 11.0), (9.0, 12.0)], 48, 32);
        // Opposite corner of the pitch is many bandwidths away.
        assert_eq!(grid.shade_band(47, 31, SHADE_LEVELS), None);
    }

    #[test]
    fn shade_band_never_exceeds_levels() {
        let points = vec![(60.0, 40.0); 20];
        let grid = DensityGrid::estimate(&points, 24, 16);
        for row in 0..16 {
            for col in 0..24 {
                if let Some(band) = grid.shade_band(col, row, SHADE_LEVELS) {
                    assert!(band >= 1 && band <= SHADE_LEVELS);
                }
            }
        }
    }

    #[test]
    fn identical_points_do_not_produce_nan() {
        let grid = DensityGrid::estimate(&[(55.5, 33.0), (55.5, 33.0)], 24, 16);
        assert!(grid.value(11, 6).is_finite());
        assert!(grid.normalized(11, 6) <= 1.0);
    }
}
