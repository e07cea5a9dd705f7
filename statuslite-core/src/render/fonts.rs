use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::{StatusError, StatusResult};

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/System/Library/Fonts/PingFang.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "C:\\Windows\\Fonts\\msyhbd.ttc",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const BITMAP_GLYPH_SIZE: i32 = 8;

/// A face that can draw text onto the canvas.
#[derive(Clone)]
pub enum Typeface {
    Outline(Arc<FontVec>),
    /// Built-in 8x8 bitmap glyphs, scaled to the requested size.
    Bitmap,
}

impl Typeface {
    pub fn from_path(path: &Path) -> StatusResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| StatusError::FontLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let font = FontVec::try_from_vec_and_index(bytes, 0).map_err(|e| {
            StatusError::FontLoad {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Typeface::Outline(Arc::new(font)))
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Typeface::Bitmap)
    }

    pub fn draw(
        &self,
        image: &mut RgbaImage,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
        text: &str,
    ) {
        match self {
            Typeface::Outline(font) => {
                draw_text_mut(image, color, x, y, PxScale::from(size), font.as_ref(), text);
            }
            Typeface::Bitmap => draw_bitmap_text(image, x, y, size, color, text),
        }
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Typeface::Outline(_) => write!(f, "Typeface::Outline"),
            Typeface::Bitmap => write!(f, "Typeface::Bitmap"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl FontSet {
    /// Loads the configured faces, then the first usable system candidate.
    /// Never fails: missing fonts fall back to the bitmap face.
    pub fn load(config: &RenderConfig) -> Self {
        let regular = load_first(config.font_path.as_deref(), REGULAR_CANDIDATES);
        let bold = load_first(config.bold_font_path.as_deref(), BOLD_CANDIDATES)
            .or_else(|| regular.clone());

        Self {
            regular: regular.unwrap_or(Typeface::Bitmap),
            bold: bold.unwrap_or(Typeface::Bitmap),
        }
    }

    pub fn bitmap() -> Self {
        Self {
            regular: Typeface::Bitmap,
            bold: Typeface::Bitmap,
        }
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::load(&RenderConfig::default())
    }
}

fn load_first(configured: Option<&Path>, candidates: &[&str]) -> Option<Typeface> {
    let paths = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(candidates.iter().map(PathBuf::from));

    for path in paths {
        if !path.exists() {
            continue;
        }
        match Typeface::from_path(&path) {
            Ok(face) => {
                debug!(path = %path.display(), "Loaded dashboard font");
                return Some(face);
            }
            Err(e) => debug!(error = %e, "Skipping unusable font"),
        }
    }

    None
}

fn bitmap_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(image: &mut RgbaImage, x: i32, y: i32, size: f32, color: Rgba<u8>, text: &str) {
    let dot = ((size / BITMAP_GLYPH_SIZE as f32).round() as i32).max(1);
    let advance = BITMAP_GLYPH_SIZE * dot;
    let mut cursor_x = x;

    for ch in text.chars() {
        if ch != ' ' {
            let glyph = bitmap_glyph(ch);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..BITMAP_GLYPH_SIZE {
                    // bit 0 is the leftmost pixel
                    if (bits >> col) & 1 == 1 {
                        let px = cursor_x + col * dot;
                        let py = y + row as i32 * dot;
                        draw_filled_rect_mut(
                            image,
                            Rect::at(px, py).of_size(dot as u32, dot as u32),
                            color,
                        );
                    }
                }
            }
        }
        cursor_x += advance;
    }
}
