//! `Canvas` backend producing a PDF with the built-in Helvetica faces.
//!
//! The layout works top-down in millimetres; PDF user space grows upwards
//! from the bottom-left corner, so every y is flipped against the page height.

use image::DynamicImage;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Actions, BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, LinkAnnotation, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Px, Rect, Rgb,
};

use crate::errors::AppError;
use crate::layout::canvas::{Canvas, RectMode, RgbColor, TextAlign, TextOptions};
use crate::layout::font_metrics::{get_metrics, FontStyle, PageConfig, PT_TO_MM};

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.oblique,
        }
    }
}

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layers: Vec<PdfLayerReference>,
    current: usize,
    fonts: Fonts,
    width: f32,
    height: f32,
    draw_color: RgbColor,
    fill_color: RgbColor,
    text_color: RgbColor,
    line_width: f32,
    style: FontStyle,
    size_pt: f32,
}

impl PdfCanvas {
    /// Creates a one-page document sized by `config`.
    pub fn new(title: &str, config: &PageConfig) -> Result<Self, AppError> {
        let (width, height) = (config.page_width_mm, config.page_height_mm);
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");
        let first_layer = doc.get_page(page).get_layer(layer);

        let builtin = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| AppError::Pdf(e.to_string()))
        };
        let fonts = Fonts {
            regular: builtin(BuiltinFont::Helvetica)?,
            bold: builtin(BuiltinFont::HelveticaBold)?,
            oblique: builtin(BuiltinFont::HelveticaOblique)?,
        };

        Ok(PdfCanvas {
            doc,
            layers: vec![first_layer],
            current: 0,
            fonts,
            width,
            height,
            draw_color: RgbColor(0, 0, 0),
            fill_color: RgbColor(0, 0, 0),
            text_color: RgbColor(0, 0, 0),
            line_width: 0.2,
            style: FontStyle::Normal,
            size_pt: 16.0,
        })
    }

    /// Serialises the finished document.
    pub fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| AppError::Pdf(e.to_string()))
    }

    fn layer(&self) -> &PdfLayerReference {
        &self.layers[self.current]
    }

    /// Converts a top-down y to PDF user space.
    fn flip(&self, y: f32) -> f32 {
        self.height - y
    }
}

fn pdf_color(color: RgbColor) -> Color {
    let RgbColor(r, g, b) = color;
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_draw_color(&mut self, color: RgbColor) {
        self.draw_color = color;
    }

    fn set_line_width(&mut self, width_mm: f32) {
        self.line_width = width_mm;
    }

    fn set_fill_color(&mut self, color: RgbColor) {
        self.fill_color = color;
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, mode: RectMode) {
        let top = self.flip(y);
        let bottom = self.flip(y + h);
        let corners = vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(top)), false),
            (Point::new(Mm(x), Mm(top)), false),
        ];

        let layer = self.layer();
        match mode {
            RectMode::Stroke => {
                layer.set_outline_color(pdf_color(self.draw_color));
                // Thickness is given in points.
                layer.set_outline_thickness(self.line_width / PT_TO_MM);
                layer.add_line(Line {
                    points: corners,
                    is_closed: true,
                });
            }
            RectMode::Fill => {
                layer.set_fill_color(pdf_color(self.fill_color));
                layer.add_polygon(Polygon {
                    rings: vec![corners],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
        }
    }

    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.style = style;
        self.size_pt = size_pt;
    }

    fn set_text_color(&mut self, color: RgbColor) {
        self.text_color = color;
    }

    fn text(&mut self, text: &str, x: f32, y: f32, options: TextOptions<'_>) {
        let width = get_metrics(&self.style).width_mm(text, self.size_pt);
        let left = match options.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
        };
        let baseline = self.flip(y);

        let layer = self.layer();
        layer.set_fill_color(pdf_color(self.text_color));
        layer.use_text(
            text,
            self.size_pt,
            Mm(left),
            Mm(baseline),
            self.fonts.get(self.style),
        );

        if let Some(uri) = options.link {
            let size_mm = self.size_pt * PT_TO_MM;
            let area = Rect::new(
                Mm(left),
                Mm(baseline - 0.25 * size_mm),
                Mm(left + width),
                Mm(baseline + 0.8 * size_mm),
            );
            layer.add_link_annotation(LinkAnnotation::new(
                area,
                None,
                None,
                Actions::uri(uri.to_string()),
                None,
            ));
        }
    }

    fn add_image(
        &mut self,
        image: &DynamicImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<(), AppError> {
        let rgb = image.to_rgb8();
        let (width_px, height_px) = rgb.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(AppError::RenderAsset("photo has no pixels".to_string()));
        }

        // dpi fixes the width at `w`; scale_y stretches the height to `h`.
        let dpi = width_px as f32 / (w / 25.4);
        let natural_h = height_px as f32 / dpi * 25.4;

        let xobject = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        xobject.add_to_layer(
            self.layer().clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(self.flip(y + h))),
                dpi: Some(dpi),
                scale_y: Some(h / natural_h),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.layers.push(self.doc.get_page(page).get_layer(layer));
        self.current = self.layers.len() - 1;
    }

    fn set_page(&mut self, page: usize) {
        self.current = page.clamp(1, self.layers.len()) - 1;
    }

    fn current_page(&self) -> usize {
        self.current + 1
    }

    fn page_count(&self) -> usize {
        self.layers.len()
    }
}
