// render.rs - Grid to pixels, one pixel per cell

use egui::{Color32, ColorImage};
use life_engine::Grid;

/// Paints `grid` with `live` for alive cells and `dead` for the rest.
/// Cell (x, y) becomes pixel (x, y).
pub fn grid_image(grid: &Grid, live: Color32, dead: Color32) -> ColorImage {
    let pixels = grid
        .cells()
        .iter()
        .map(|&alive| if alive { live } else { dead })
        .collect();
    ColorImage {
        size: [grid.width(), grid.height()],
        pixels,
    }
}
