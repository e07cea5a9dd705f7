use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use std::io::Cursor;

use crate::error::{StatusError, StatusResult};

use super::fonts::{FontSet, Typeface};
use super::theme::Palette;

pub const FONT_HEADER: f32 = 30.0;
pub const FONT_TITLE: f32 = 18.0;
pub const FONT_MAIN: f32 = 15.0;
pub const FONT_SMALL: f32 = 12.0;
pub const FONT_VALUE: f32 = 15.0;

const VALUE_OFFSET: i32 = 85;

const BAR_LABEL_WIDTH: i32 = 50;
const BAR_HEIGHT: i32 = 18;
const BAR_RADIUS: i32 = 4;
const BAR_MIN_FILL: i32 = 6;

const MINI_LABEL_WIDTH: i32 = 30;
const MINI_TRAILING_SPACE: i32 = 110;
const MINI_TOP: i32 = 2;
const MINI_BOTTOM: i32 = 14;
const MINI_RADIUS: i32 = 3;
const MINI_MIN_FILL: i32 = 4;

#[derive(Debug, Clone, Copy)]
pub enum Weight {
    Regular,
    Bold,
}

/// Drawing surface with the dashboard's text and shape primitives.
pub struct Painter<'a> {
    image: RgbaImage,
    fonts: &'a FontSet,
    palette: Palette,
}

impl<'a> Painter<'a> {
    pub fn new(
        width: u32,
        height: u32,
        fonts: &'a FontSet,
        palette: Palette,
    ) -> StatusResult<Self> {
        if width == 0 || height == 0 {
            return Err(StatusError::Render(format!(
                "invalid canvas size {}x{}",
                width, height
            )));
        }

        Ok(Self {
            image: RgbaImage::from_pixel(width, height, palette.background),
            fonts,
            palette,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn text(&mut self, x: i32, y: i32, size: f32, weight: Weight, color: Rgba<u8>, text: &str) {
        let face: &Typeface = match weight {
            Weight::Regular => &self.fonts.regular,
            Weight::Bold => &self.fonts.bold,
        };
        face.draw(&mut self.image, x, y, size, color, text);
    }

    pub fn rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        radius: i32,
        color: Rgba<u8>,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let r = radius.min(width / 2).min(height / 2).max(0);

        fill_rect(&mut self.image, x + r, y, width - 2 * r, height, color);
        fill_rect(&mut self.image, x, y + r, width, height - 2 * r, color);

        if r > 0 {
            let right = x + width - r - 1;
            let bottom = y + height - r - 1;
            for (cx, cy) in [(x + r, y + r), (right, y + r), (x + r, bottom), (right, bottom)] {
                draw_filled_circle_mut(&mut self.image, (cx, cy), r, color);
            }
        }
    }

    /// Draws the card panel and its title. Returns the y just below the card.
    pub fn card(&mut self, title: &str, x: i32, y: i32, width: i32, height: i32) -> i32 {
        let palette = self.palette;
        self.rounded_rect(x, y, width, height, 10, palette.card);
        self.text(x + 18, y + 12, FONT_TITLE, Weight::Regular, palette.title, title);
        y + height
    }

    pub fn info_row(
        &mut self,
        label: &str,
        value: &str,
        x: i32,
        y: i32,
        value_color: Option<Rgba<u8>>,
    ) {
        let palette = self.palette;
        self.text(x, y, FONT_MAIN, Weight::Regular, palette.text, label);
        self.text(
            x + VALUE_OFFSET,
            y,
            FONT_VALUE,
            Weight::Bold,
            value_color.unwrap_or(palette.value),
            value,
        );
    }

    /// Label, rounded track with a proportional fill, the percentage after
    /// the track and an optional detail line underneath.
    pub fn progress_bar(
        &mut self,
        label: &str,
        percent: f64,
        x: i32,
        y: i32,
        width: i32,
        detail: Option<&str>,
    ) {
        let palette = self.palette;
        let track = (width - 80).max(1);
        let bar_x = x + BAR_LABEL_WIDTH;

        self.text(x, y, FONT_MAIN, Weight::Regular, palette.text, label);
        self.rounded_rect(bar_x, y, track, BAR_HEIGHT, BAR_RADIUS, palette.bar_track);

        let fill = fill_width(track, percent, BAR_MIN_FILL);
        self.rounded_rect(bar_x, y, fill, BAR_HEIGHT, BAR_RADIUS, palette.usage_color(percent));

        self.text(
            bar_x + track + 8,
            y,
            FONT_SMALL,
            Weight::Regular,
            palette.value,
            &format!("{:.0}%", percent),
        );

        if let Some(detail) = detail {
            self.text(x, y + 22, FONT_SMALL, Weight::Regular, palette.text, detail);
        }
    }

    pub fn mini_progress_bar(
        &mut self,
        label: &str,
        percent: f64,
        x: i32,
        y: i32,
        width: i32,
        detail: &str,
    ) {
        let palette = self.palette;
        let track = (width - MINI_LABEL_WIDTH - MINI_TRAILING_SPACE).max(1);
        let bar_x = x + MINI_LABEL_WIDTH;
        let height = MINI_BOTTOM - MINI_TOP;

        self.text(x, y, FONT_MAIN, Weight::Regular, palette.value, label);
        self.rounded_rect(bar_x, y + MINI_TOP, track, height, MINI_RADIUS, palette.bar_track);

        let fill = fill_width(track, percent, MINI_MIN_FILL);
        self.rounded_rect(
            bar_x,
            y + MINI_TOP,
            fill,
            height,
            MINI_RADIUS,
            palette.usage_color(percent),
        );

        self.text(
            bar_x + track + 6,
            y,
            FONT_SMALL,
            Weight::Regular,
            palette.text,
            &format!("{:.0}% {}", percent, detail),
        );
    }
}

/// Proportional fill, never below `min_fill` and never wider than the track.
pub fn fill_width(track: i32, percent: f64, min_fill: i32) -> i32 {
    let proportional = (track as f64 * (percent / 100.0)) as i32;
    proportional.max(min_fill).min(track)
}

fn fill_rect(image: &mut RgbaImage, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>) {
    if width <= 0 || height <= 0 {
        return;
    }
    draw_filled_rect_mut(image, Rect::at(x, y).of_size(width as u32, height as u32), color);
}

pub fn encode_png(image: &RgbaImage) -> StatusResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_width_bounds() {
        assert_eq!(fill_width(200, 0.0, 6), 6);
        assert_eq!(fill_width(200, 50.0, 6), 100);
        assert_eq!(fill_width(200, 100.0, 6), 200);
        assert_eq!(fill_width(200, 150.0, 6), 200);
        assert_eq!(fill_width(3, 0.0, 6), 3);
    }

    #[test]
    fn test_zero_canvas_is_render_error() {
        let fonts = FontSet::bitmap();
        let err = Painter::new(0, 10, &fonts, Palette::dark()).err().unwrap();
        assert!(err.is_render_error());
    }

    #[test]
    fn test_rounded_rect_fills_center_not_corner() {
        let fonts = FontSet::bitmap();
        let palette = Palette::dark();
        let mut painter = Painter::new(100, 100, &fonts, palette).unwrap();
        painter.rounded_rect(10, 10, 60, 40, 10, palette.card);

        let image = painter.into_image();
        assert_eq!(*image.get_pixel(40, 30), palette.card);
        assert_eq!(*image.get_pixel(10, 10), palette.background);
        assert_eq!(*image.get_pixel(5, 5), palette.background);
    }

    #[test]
    fn test_degenerate_shapes_are_ignored() {
        let fonts = FontSet::bitmap();
        let palette = Palette::dark();
        let mut painter = Painter::new(50, 50, &fonts, palette).unwrap();
        painter.rounded_rect(10, 10, 0, 20, 4, palette.card);
        painter.rounded_rect(10, 10, 20, -5, 4, palette.card);
        painter.mini_progress_bar("/", 10.0, 0, 0, 20, "1G / 2G");
    }

    #[test]
    fn test_encode_png_signature() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
