//! Document Layout Engine: renders a `PortfolioRecord` onto a `Canvas`.
//!
//! # Layout model
//! A single vertical cursor `y` walks down the page. Content is emitted in a
//! fixed order: title block, About, Skills, Education, Work Experience, Projects.
//! Before each *entry* (never before a heading) the engine estimates the entry's
//! height and, if it does not fit above the border's bottom edge, starts a new
//! page. Work and project entries re-emit a "(cont.)" heading on the new page.
//!
//! The total page count is only known once all content is laid out, so footers
//! ("Page i of n") are stamped in a second pass over every page.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::layout::canvas::{Canvas, RectMode, RgbColor, TextOptions};
use crate::layout::font_metrics::{FontStyle, PageConfig, PT_TO_MM};
use crate::layout::wrap::{flow_tokens, parse_skill_tokens, split_text_to_size, TokenFlow};
use crate::models::portfolio::{EducationEntry, PortfolioRecord, ProjectEntry, WorkEntry};
use crate::render::photo::decode_data_uri;

// ────────────────────────────────────────────────────────────────────────────
// Geometry and palette
// ────────────────────────────────────────────────────────────────────────────

/// Cursor position on the first page.
pub const TOP_OFFSET: f32 = 20.0;
/// Cursor position after a page break.
pub const CONTINUATION_OFFSET: f32 = 25.0;

pub const EDUCATION_ENTRY_HEIGHT: f32 = 25.0;
const WORK_ENTRY_BASE_HEIGHT: f32 = 25.0;
const PROJECT_ENTRY_BASE_HEIGHT: f32 = 20.0;
const PROJECT_LINK_HEIGHT: f32 = 10.0;
const WRAPPED_LINE_HEIGHT: f32 = 5.0;

const HEADING_INSET: f32 = 20.0;
const HEADING_BAR_HEIGHT: f32 = 10.0;
const SKILL_ROW_HEIGHT: f32 = 8.0;
const SKILL_GAP: f32 = 8.0;
const BULLET_TEXT_INDENT: f32 = 5.0;
const PHOTO_SIZE: f32 = 30.0;
/// Line pitch of multi-line text runs, as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;

const BORDER_COLOR: RgbColor = RgbColor(41, 128, 185);
const ACCENT: RgbColor = RgbColor(52, 152, 219);
const HEADING_TEXT: RgbColor = RgbColor(44, 62, 80);
const SUBHEADING_TEXT: RgbColor = RgbColor(52, 73, 94);
const BODY_TEXT: RgbColor = RgbColor(51, 51, 51);
const MUTED_TEXT: RgbColor = RgbColor(102, 102, 102);
const FOOTER_TEXT: RgbColor = RgbColor(100, 100, 100);
const BLACK: RgbColor = RgbColor(0, 0, 0);
const WHITE: RgbColor = RgbColor(255, 255, 255);

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Date printed in every footer.
    pub generated_on: NaiveDate,
    pub max_photo_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub page_count: usize,
    pub file_name: String,
    pub photo_embedded: bool,
}

/// Height reserved for a work entry with `lines` wrapped responsibility lines.
pub fn work_entry_height(lines: usize) -> f32 {
    WORK_ENTRY_BASE_HEIGHT + WRAPPED_LINE_HEIGHT * lines as f32
}

/// Height reserved for a project entry with `lines` wrapped description lines.
pub fn project_entry_height(lines: usize, has_link: bool) -> f32 {
    let link = if has_link { PROJECT_LINK_HEIGHT } else { 0.0 };
    PROJECT_ENTRY_BASE_HEIGHT + WRAPPED_LINE_HEIGHT * lines as f32 + link
}

/// File name of the exported document: whitespace runs in the full name become
/// `_`, suffixed `_Portfolio.pdf`. A blank name yields `Portfolio.pdf`.
///
/// The result is always a single path component: separators, control
/// characters and `..` are replaced with `_`.
pub fn portfolio_file_name(full_name: &str) -> String {
    if full_name.trim().is_empty() {
        return "Portfolio.pdf".to_string();
    }
    let mut stem = String::with_capacity(full_name.len());
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            let unsafe_char = matches!(c, '/' | '\\' | ':') || c.is_control();
            stem.push(if unsafe_char { '_' } else { c });
            in_space = false;
        }
    }
    let stem = stem.replace("..", "_");
    format!("{stem}_Portfolio.pdf")
}

/// Lays out the whole portfolio and stamps footers on every page.
pub fn render_portfolio<C: Canvas>(
    record: &PortfolioRecord,
    canvas: &mut C,
    config: &PageConfig,
    options: &RenderOptions,
) -> RenderSummary {
    let mut engine = LayoutEngine {
        canvas,
        config,
        y: TOP_OFFSET,
    };

    engine.draw_border();
    engine.title_block(record);
    let photo_embedded = engine.photo(&record.personal.photo, options.max_photo_bytes);
    engine.about(&record.personal.bio);
    engine.skills(&record.skills.soft, &record.skills.technical);
    engine.education(&record.education);
    engine.work_experience(&record.work_experience);
    engine.projects(&record.projects);

    let page_count = engine.stamp_footers(options.generated_on);
    let file_name = portfolio_file_name(&record.personal.full_name);

    info!(pages = page_count, file = %file_name, photo = photo_embedded, "Portfolio laid out");

    RenderSummary {
        page_count,
        file_name,
        photo_embedded,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

struct LayoutEngine<'a, C: Canvas> {
    canvas: &'a mut C,
    config: &'a PageConfig,
    y: f32,
}

impl<C: Canvas> LayoutEngine<'_, C> {
    fn left(&self) -> f32 {
        self.config.content_inset_mm
    }

    fn draw_border(&mut self) {
        let margin = self.config.border_margin_mm;
        self.canvas.set_draw_color(BORDER_COLOR);
        self.canvas.set_line_width(0.5);
        self.canvas.rect(
            margin,
            margin,
            self.config.border_width(),
            self.config.border_height(),
            RectMode::Stroke,
        );
    }

    /// Starts a new page if `required` does not fit below the cursor.
    /// Returns `true` when a break happened.
    fn check_page_break(&mut self, required: f32) -> bool {
        let remaining = self.config.content_bottom() - self.y;
        if required > remaining {
            self.canvas.add_page();
            self.draw_border();
            self.y = CONTINUATION_OFFSET;
            debug!(
                page = self.canvas.current_page(),
                required, remaining, "Page break"
            );
            return true;
        }
        false
    }

    fn font(&mut self, style: FontStyle, size_pt: f32, color: RgbColor) {
        self.canvas.set_font(style, size_pt);
        self.canvas.set_text_color(color);
    }

    /// Filled title bar with the uppercased title; advances the cursor past it.
    fn section_heading(&mut self, title: &str) {
        let width = self.config.page_width_mm - 2.0 * HEADING_INSET;
        self.canvas.set_fill_color(ACCENT);
        self.canvas
            .rect(HEADING_INSET, self.y, width, HEADING_BAR_HEIGHT, RectMode::Fill);
        let left = self.left();
        self.font(FontStyle::Bold, 12.0, WHITE);
        self.canvas
            .text(&title.to_uppercase(), left, self.y + 7.0, TextOptions::default());
        self.y += 15.0;
    }

    fn title_block(&mut self, record: &PortfolioRecord) {
        let (page_width, _) = self.canvas.page_size();
        let center = page_width / 2.0;
        let personal = &record.personal;

        self.font(FontStyle::Bold, 26.0, HEADING_TEXT);
        self.canvas
            .text(&personal.full_name, center, self.y + 5.0, TextOptions::centered());
        self.y += 10.0;

        self.font(FontStyle::Italic, 14.0, SUBHEADING_TEXT);
        self.canvas
            .text("Professional Portfolio", center, self.y + 5.0, TextOptions::centered());
        self.y += 15.0;

        self.font(FontStyle::Normal, 10.0, ACCENT);
        self.canvas
            .text(&personal.email, center, self.y + 5.0, TextOptions::centered());
        self.y += 5.0;
        self.canvas
            .text(&personal.contact, center, self.y + 5.0, TextOptions::centered());
        self.y += 10.0;
    }

    /// Embeds the photo in the top-right corner of the first page. Failures are
    /// logged and the layout continues without it.
    fn photo(&mut self, data_uri: &str, max_bytes: usize) -> bool {
        if data_uri.trim().is_empty() {
            return false;
        }
        let (page_width, _) = self.canvas.page_size();
        let x = page_width - 50.0;
        let result = decode_data_uri(data_uri, max_bytes).and_then(|image| {
            self.canvas
                .add_image(&image, x, CONTINUATION_OFFSET, PHOTO_SIZE, PHOTO_SIZE)
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Photo skipped");
                false
            }
        }
    }

    /// The bio is a single unwrapped run; long text runs past the border.
    fn about(&mut self, bio: &str) {
        if bio.trim().is_empty() {
            return;
        }
        self.section_heading("About Me");
        let left = self.left();
        self.font(FontStyle::Normal, 10.0, BODY_TEXT);
        self.canvas.text(bio, left, self.y, TextOptions::default());
        self.y += 15.0;
    }

    fn skills(&mut self, soft: &str, technical: &str) {
        let soft = parse_skill_tokens(soft);
        let technical = parse_skill_tokens(technical);
        if soft.is_empty() && technical.is_empty() {
            return;
        }
        self.section_heading("Skills");
        let left = self.left();

        self.font(FontStyle::Bold, 11.0, HEADING_TEXT);
        self.canvas
            .text("Soft Skills", left, self.y, TextOptions::default());
        self.y += 5.0;
        self.skill_flow(&soft);
        self.y += 15.0;

        self.font(FontStyle::Bold, 11.0, HEADING_TEXT);
        self.canvas
            .text("Technical Skills", left, self.y, TextOptions::default());
        self.y += 10.0;
        self.skill_flow(&technical);
        self.y += 20.0;
    }

    fn skill_flow(&mut self, tokens: &[String]) {
        let flow = TokenFlow {
            left: self.left(),
            right: self.config.page_width_mm - self.config.content_inset_mm,
            gap: SKILL_GAP,
            row_height: SKILL_ROW_HEIGHT,
            style: FontStyle::Normal,
            size_pt: 10.0,
        };
        let placed = flow_tokens(tokens, &flow);

        self.font(FontStyle::Normal, 10.0, BLACK);
        for token in &placed {
            self.canvas.text(
                &token.text,
                token.x,
                self.y + token.y_offset + 2.0,
                TextOptions::default(),
            );
        }
        if let Some(last) = placed.last() {
            self.y += last.y_offset;
        }
    }

    fn education(&mut self, entries: &[EducationEntry]) {
        if entries.is_empty() {
            return;
        }
        self.section_heading("Education");

        for edu in entries {
            self.check_page_break(EDUCATION_ENTRY_HEIGHT);
            let left = self.left();

            self.font(FontStyle::Bold, 11.0, HEADING_TEXT);
            self.canvas
                .text(&edu.institution, left, self.y, TextOptions::default());

            self.font(FontStyle::Italic, 10.0, SUBHEADING_TEXT);
            self.canvas.text(
                &format!("{} ({})", edu.degree, edu.year),
                left,
                self.y + 5.0,
                TextOptions::default(),
            );

            self.font(FontStyle::Normal, 9.0, MUTED_TEXT);
            self.canvas.text(
                &format!("GPA/Grade: {}", edu.grade),
                left,
                self.y + 10.0,
                TextOptions::default(),
            );
            self.y += 20.0;
        }
    }

    fn work_experience(&mut self, entries: &[WorkEntry]) {
        if entries.is_empty() {
            return;
        }
        self.section_heading("Work Experience");
        let wrap_width = self.config.text_width();

        for work in entries {
            let lines = split_text_to_size(&work.responsibilities, wrap_width, FontStyle::Italic, 10.0);
            if self.check_page_break(work_entry_height(lines.len())) {
                self.section_heading("Work Experience (cont.)");
            }
            let left = self.left();

            self.font(FontStyle::Bold, 11.0, HEADING_TEXT);
            self.canvas
                .text(&work.company, left, self.y, TextOptions::default());

            self.font(FontStyle::Italic, 10.0, SUBHEADING_TEXT);
            self.canvas.text(
                &format!("Duration: {}", work.duration),
                left,
                self.y + 5.0,
                TextOptions::default(),
            );

            let mut bullet_y = self.y + 12.0;
            for line in &lines {
                self.canvas.text("\u{2022}", left, bullet_y, TextOptions::default());
                self.canvas
                    .text(line, left + BULLET_TEXT_INDENT, bullet_y, TextOptions::default());
                bullet_y += WRAPPED_LINE_HEIGHT;
            }
            self.y = bullet_y + 5.0;
        }
    }

    fn projects(&mut self, entries: &[ProjectEntry]) {
        if entries.is_empty() {
            return;
        }
        self.section_heading("Projects");
        let wrap_width = self.config.text_width();
        let pitch = 9.0 * LINE_HEIGHT_FACTOR * PT_TO_MM;

        for project in entries {
            let lines = split_text_to_size(&project.description, wrap_width, FontStyle::Normal, 9.0);
            let link = project.link.as_deref().filter(|l| !l.is_empty());
            if self.check_page_break(project_entry_height(lines.len(), link.is_some())) {
                self.section_heading("Projects (cont.)");
            }
            let left = self.left();

            self.font(FontStyle::Bold, 11.0, HEADING_TEXT);
            self.canvas
                .text(&project.name, left, self.y, TextOptions::default());

            self.font(FontStyle::Normal, 9.0, BODY_TEXT);
            for (i, line) in lines.iter().enumerate() {
                self.canvas.text(
                    line,
                    left,
                    self.y + 5.0 + pitch * i as f32,
                    TextOptions::default(),
                );
            }
            self.y += WRAPPED_LINE_HEIGHT * lines.len() as f32 + 5.0;

            if let Some(uri) = link {
                self.canvas.set_text_color(ACCENT);
                self.canvas
                    .text("Project Link", left, self.y, TextOptions::linked(uri));
                self.y += PROJECT_LINK_HEIGHT;
            }
        }
    }

    /// Second pass: revisits every page and stamps "Page i of n" and the date.
    fn stamp_footers(&mut self, generated_on: NaiveDate) -> usize {
        let total = self.canvas.page_count();
        let footer_y = self.config.content_bottom() + 5.0;
        let date = generated_on.format("%-m/%-d/%Y").to_string();

        for page in 1..=total {
            self.canvas.set_page(page);
            self.font(FontStyle::Normal, 9.0, FOOTER_TEXT);
            self.canvas.text(
                &format!("Page {page} of {total}"),
                self.config.page_width_mm - 25.0,
                footer_y,
                TextOptions::default(),
            );
            self.canvas.text(
                &format!("Generated: {date}"),
                20.0,
                footer_y,
                TextOptions::default(),
            );
        }
        total
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
