use crate::renderer::fonts::FontConfig;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;

pub fn horizonal_line(image: &mut RgbaImage, x: u32, y: u32, width: u32) {
    draw_line_segment_mut(
        image,
        (x as f32, y as f32),
        (width as f32, y as f32),
        Rgba([60, 60, 60, 255]),
    );
}

pub fn vertical_line(image: &mut RgbaImage, x: u32, y1: u32, y2: u32) {
    draw_line_segment_mut(
        image,
        (x as f32, y1 as f32),
        (x as f32, y2 as f32),
        Rgba([60, 60, 60, 255]),
    );
}

pub(crate) fn text(
    image: &mut RgbaImage,
    colour: Rgba<u8>,
    x: i32,
    y: i32,
    font_config: &FontConfig,
    text: &str,
) {
    draw_text_mut(
        image,
        colour,
        x,
        y,
        font_config.scale,
        &font_config.font,
        text,
    );
}

/// Filled rectangle with a grey border, used for colour readings.
pub fn swatch(image: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32, colour: Rgba<u8>) {
    if width == 0 || height == 0 {
        return;
    }

    draw_filled_rect_mut(image, Rect::at(x, y).of_size(width, height), colour);

    draw_hollow_rect_mut(
        image,
        Rect::at(x, y).of_size(width, height),
        Rgba([100, 100, 100, 255]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_fills_inside_border() {
        let mut image = RgbaImage::new(20, 10);
        let red = Rgba([255, 0, 0, 255]);
        swatch(&mut image, 2, 2, 10, 5, red);

        assert_eq!(*image.get_pixel(5, 4), red);
        assert_eq!(*image.get_pixel(2, 2), Rgba([100, 100, 100, 255]));
        assert_eq!(*image.get_pixel(15, 8), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_swatch_is_skipped() {
        let mut image = RgbaImage::new(4, 4);
        swatch(&mut image, 0, 0, 0, 3, Rgba([1, 2, 3, 255]));
        assert!(image.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }
}
