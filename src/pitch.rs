//! StatsBomb pitch geometry, rasterized to a boolean line mask that the
//! renderer paints over the density overlay.
//!
//! Coordinates follow the event data: x runs 0..120 goal to goal, y runs
//! 0..80 across the pitch with the origin in the top-left corner.

pub const PITCH_LENGTH: f32 = 120.0;
pub const PITCH_WIDTH: f32 = 80.0;

const HALFWAY_X: f32 = 60.0;
const CENTER_Y: f32 = 40.0;
const CIRCLE_RADIUS: f32 = 10.0;
const PENALTY_AREA_DEPTH: f32 = 18.0;
const PENALTY_AREA_TOP: f32 = 18.0;
const PENALTY_AREA_BOTTOM: f32 = 62.0;
const SIX_YARD_DEPTH: f32 = 6.0;
const SIX_YARD_TOP: f32 = 30.0;
const SIX_YARD_BOTTOM: f32 = 50.0;
const PENALTY_SPOT_X: f32 = 12.0;
const GOAL_TOP: f32 = 36.0;
const GOAL_BOTTOM: f32 = 44.0;

/// Line mask over a pixel grid spanning the full pitch. Cell (0, 0) maps
/// to the pitch origin corner.
#[derive(Debug, Clone)]
pub struct PitchMask {
    pub width: usize,
    pub height: usize,
    cells: Vec<bool>,
}

impl PitchMask {
    pub fn rasterize(width: usize, height: usize) -> Self {
        let mut cells = vec![false; width * height];
        if width == 0 || height == 0 {
            return Self {
                width,
                height,
                cells,
            };
        }

        let cell_w = PITCH_LENGTH / width as f32;
        let cell_h = PITCH_WIDTH / height as f32;
        let line_w = 0.75 * cell_w.max(cell_h);

        for row in 0..height {
            let y = (row as f32 + 0.5) * cell_h;
            for col in 0..width {
                let x = (col as f32 + 0.5) * cell_w;
                cells[row * width + col] = on_pitch_line(x, y, line_w);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn is_line(&self, col: usize, row: usize) -> bool {
        self.cells[row * self.width + col]
    }
}

fn on_pitch_line(x: f32, y: f32, w: f32) -> bool {
    outline(x, y, w)
        || halfway(x, y, w)
        || center_circle(x, y, w)
        || penalty_area(x, y, w)
        || six_yard_box(x, y, w)
        || penalty_spot(x, y, w)
        || penalty_arc(x, y, w)
        || goal_mouth(x, y, w)
}

fn outline(x: f32, y: f32, w: f32) -> bool {
    let on_side = near(y, 0.0, w) || near(y, PITCH_WIDTH, w);
    let on_end = near(x, 0.0, w) || near(x, PITCH_LENGTH, w);
    (on_side && (0.0..=PITCH_LENGTH).contains(&x)) || (on_end && (0.0..=PITCH_WIDTH).contains(&y))
}

fn halfway(x: f32, y: f32, w: f32) -> bool {
    near(x, HALFWAY_X, w) && (0.0..=PITCH_WIDTH).contains(&y)
}

fn center_circle(x: f32, y: f32, w: f32) -> bool {
    let dist = ((x - HALFWAY_X).powi(2) + (y - CENTER_Y).powi(2)).sqrt();
    (dist - CIRCLE_RADIUS).abs() <= w || dist <= w * 1.5
}

fn penalty_area(x: f32, y: f32, w: f32) -> bool {
    box_edges(
        x,
        y,
        w,
        PENALTY_AREA_DEPTH,
        PENALTY_AREA_TOP,
        PENALTY_AREA_BOTTOM,
    )
}

fn six_yard_box(x: f32, y: f32, w: f32) -> bool {
    box_edges(x, y, w, SIX_YARD_DEPTH, SIX_YARD_TOP, SIX_YARD_BOTTOM)
}

// Both halves share box geometry mirrored around the halfway line.
fn box_edges(x: f32, y: f32, w: f32, depth: f32, top: f32, bottom: f32) -> bool {
    let x_near = x.min(PITCH_LENGTH - x);
    let front = near(x_near, depth, w) && (top..=bottom).contains(&y);
    let sides = x_near <= depth + w && (near(y, top, w) || near(y, bottom, w));
    front || sides
}

fn penalty_spot(x: f32, y: f32, w: f32) -> bool {
    let spot_x = if x < HALFWAY_X {
        PENALTY_SPOT_X
    } else {
        PITCH_LENGTH - PENALTY_SPOT_X
    };
    ((x - spot_x).powi(2) + (y - CENTER_Y).powi(2)).sqrt() <= w * 1.5
}

fn penalty_arc(x: f32, y: f32, w: f32) -> bool {
    let spot_x = if x < HALFWAY_X {
        PENALTY_SPOT_X
    } else {
        PITCH_LENGTH - PENALTY_SPOT_X
    };
    let outside_area = x.min(PITCH_LENGTH - x) > PENALTY_AREA_DEPTH;
    let dist = ((x - spot_x).powi(2) + (y - CENTER_Y).powi(2)).sqrt();
    outside_area && (dist - CIRCLE_RADIUS).abs() <= w
}

// The goal mouth renders as a heavier stretch of the goal line.
fn goal_mouth(x: f32, y: f32, w: f32) -> bool {
    let on_end = x <= 2.0 * w || x >= PITCH_LENGTH - 2.0 * w;
    on_end && (GOAL_TOP..=GOAL_BOTTOM).contains(&y)
}

fn near(value: f32, target: f32, w: f32) -> bool {
    (value - target).abs() <= w
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 120;
    const H: usize = 80;

    #[test]
    fn corners_sit_on_the_outline() {
        let mask = PitchMask::rasterize(W, H);
        assert!(mask.is_line(0, 0));
        assert!(mask.is_line(W - 1, 0));
        assert!(mask.is_line(0, H - 1));
        assert!(mask.is_line(W - 1, H - 1));
    }

    #[test]
    fn halfway_line_and_center_spot_are_set() {
        let mask = PitchMask::rasterize(W, H);
        // x = 60 falls between columns 59 and 60 on a 120-wide grid.
        assert!(mask.is_line(59, 10) || mask.is_line(60, 10));
        assert!(mask.is_line(59, 39) || mask.is_line(60, 40));
    }

    #[test]
    fn penalty_spots_are_set() {
        let mask = PitchMask::rasterize(W, H);
        assert!(mask.is_line(11, 39) || mask.is_line(12, 40));
        assert!(mask.is_line(107, 39) || mask.is_line(108, 40));
    }

    #[test]
    fn open_play_interior_is_clear() {
        let mask = PitchMask::rasterize(W, H);
        // Between the penalty area and the center circle, nothing is drawn.
        assert!(!mask.is_line(35, 10));
        assert!(!mask.is_line(85, 70));
    }

    #[test]
    fn degenerate_grid_does_not_panic() {
        let mask = PitchMask::rasterize(0, 0);
        assert_eq!(mask.width, 0);
        assert_eq!(mask.height, 0);
    }
}
