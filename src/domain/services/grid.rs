#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;

use serde_derive::Serialize;

use crate::domain::models::Widget;

pub const GRID_COLUMNS: f64 = 12.0;
pub const ROW_HEIGHT: f64 = 20.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct GridUnits {
    pub w: f64,
    pub h: f64,
}

/// Layout entry in the shape grid layout engines expect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutItem {
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: f64,
    pub h: f64,
}

/// Converts pixel dimensions into grid columns and rows. Inputs are not
/// checked, so NaN or negative values come straight back out.
pub fn pixels_to_grid_units(pixel_width: f64, pixel_height: f64, grid_width: f64) -> GridUnits {
    let column_width = grid_width / GRID_COLUMNS;
    return GridUnits {
        w: pixel_width / column_width,
        h: pixel_height / ROW_HEIGHT,
    };
}

/// Same as [`pixels_to_grid_units`] but snapped to whole cells.
pub fn pixels_to_grid_units_rounded(
    pixel_width: f64,
    pixel_height: f64,
    grid_width: f64,
) -> GridUnits {
    let units = pixels_to_grid_units(pixel_width, pixel_height, grid_width);
    return GridUnits {
        w: units.w.round(),
        h: units.h.round(),
    };
}

impl Widget {
    pub fn layout(&self, grid_width: f64) -> LayoutItem {
        let (width, height) = self.size.dimensions();
        let units = pixels_to_grid_units_rounded(width, height, grid_width);

        return LayoutItem {
            i: self.id.clone(),
            x: self.x,
            y: self.y,
            w: units.w,
            h: units.h,
        };
    }
}
