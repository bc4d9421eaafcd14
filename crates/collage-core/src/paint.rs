//! Paint helpers.

use crate::model::Pixmap;
use image::Rgba;

/// Edge length of one checkerboard square, in pixels.
pub const CHECKER_SQUARE: u32 = 8;

const CHECKER_LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CHECKER_DARK: Rgba<u8> = Rgba([204, 204, 204, 255]);

/// Create one tile of the checkerboard shown behind transparent scenes.
pub fn create_checker_pattern() -> Pixmap {
    let size = CHECKER_SQUARE * 2;
    Pixmap::from_fn(size, size, |x, y| {
        if (x / CHECKER_SQUARE + y / CHECKER_SQUARE) % 2 == 0 {
            CHECKER_LIGHT
        } else {
            CHECKER_DARK
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_pattern() {
        let tile = create_checker_pattern();
        assert_eq!(tile.dimensions(), (16, 16));
        assert_eq!(*tile.get_pixel(0, 0), CHECKER_LIGHT);
        assert_eq!(*tile.get_pixel(8, 0), CHECKER_DARK);
        assert_eq!(*tile.get_pixel(0, 8), CHECKER_DARK);
        assert_eq!(*tile.get_pixel(15, 15), CHECKER_LIGHT);
    }
}
