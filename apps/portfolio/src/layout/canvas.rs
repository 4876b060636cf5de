//! The drawing surface the layout engine writes to.
//!
//! Coordinates are millimetres from the top-left corner of the current page,
//! y growing downwards; backends convert to their own coordinate system.
//! Pages are 1-indexed.

use image::DynamicImage;

use crate::errors::AppError;
use crate::layout::font_metrics::FontStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectMode {
    Stroke,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    /// `x` is the horizontal centre of the text.
    Center,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions<'a> {
    pub align: TextAlign,
    /// URI the text links to.
    pub link: Option<&'a str>,
}

impl<'a> TextOptions<'a> {
    pub fn centered() -> Self {
        TextOptions {
            align: TextAlign::Center,
            link: None,
        }
    }

    pub fn linked(uri: &'a str) -> Self {
        TextOptions {
            align: TextAlign::Left,
            link: Some(uri),
        }
    }
}

/// Stateful document builder: colours, line width and font persist until changed,
/// and drawing always targets the current page.
pub trait Canvas {
    /// `(width, height)` of a page in millimetres.
    fn page_size(&self) -> (f32, f32);

    fn set_draw_color(&mut self, color: RgbColor);
    fn set_line_width(&mut self, width_mm: f32);
    fn set_fill_color(&mut self, color: RgbColor);
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, mode: RectMode);

    fn set_font(&mut self, style: FontStyle, size_pt: f32);
    fn set_text_color(&mut self, color: RgbColor);
    /// Places `text` with its baseline at `y`.
    fn text(&mut self, text: &str, x: f32, y: f32, options: TextOptions<'_>);

    /// Embeds a raster image stretched to the `w` × `h` box whose top-left corner is `(x, y)`.
    fn add_image(&mut self, image: &DynamicImage, x: f32, y: f32, w: f32, h: f32) -> Result<(), AppError>;

    /// Appends a page and makes it current.
    fn add_page(&mut self);
    fn set_page(&mut self, page: usize);
    fn current_page(&self) -> usize;
    fn page_count(&self) -> usize;
}

// ────────────────────────────────────────────────────────────────────────────
// Recording canvas (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use recording::{DrawOp, RecordingCanvas};
