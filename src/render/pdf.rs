use super::model::{Block, Document, HeadingLevel, Table};
use super::segment::BULLET_GLYPH;
use super::text::{encode_win_ansi, estimate_width, wrap};
use crate::utils::error::Result;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use std::path::Path;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN_X: f32 = 56.7;
const CONTENT_TOP: f32 = PAGE_HEIGHT - 72.0;
const CONTENT_BOTTOM: f32 = 78.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const MM_TO_PT: f32 = 72.0 / 25.4;

const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 15.0;
const TABLE_SIZE: f32 = 10.0;
const TABLE_ROW_HEIGHT: f32 = 18.0;
const BULLET_INDENT: f32 = 14.0;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

type Rgb = (f32, f32, f32);
const BRAND: Rgb = (0.11, 0.34, 0.58);
const TEXT: Rgb = (0.15, 0.15, 0.15);
const MUTED: Rgb = (0.45, 0.45, 0.45);
const RULE: Rgb = (0.78, 0.80, 0.84);
const HEADER_FILL: Rgb = (0.91, 0.94, 0.97);
const WHITE: Rgb = (1.0, 1.0, 1.0);

/// Page decoration drawn on every page after layout.
#[derive(Debug, Clone)]
pub struct Decoration {
    pub brand: String,
    pub contact: String,
    pub running_title: String,
}

struct LoadedImage {
    name: String,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

/// 讀取 logo；失敗時回傳 None，由呼叫端改用文字標題
fn load_image(path: &Path, name: String) -> Option<LoadedImage> {
    match image::open(path) {
        Ok(decoded) => {
            let rgb = decoded.to_rgb8();
            let (width, height) = rgb.dimensions();
            Some(LoadedImage {
                name,
                pixels: rgb.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            tracing::warn!("Cannot decode logo {}: {}; using text title", path.display(), e);
            None
        }
    }
}

struct Layout<'a> {
    decoration: &'a Decoration,
    pages: Vec<Content>,
    y: f32,
    page_has_content: bool,
}

impl<'a> Layout<'a> {
    fn new(decoration: &'a Decoration) -> Self {
        Self {
            decoration,
            pages: vec![Content::new()],
            y: CONTENT_TOP,
            page_has_content: false,
        }
    }

    fn content(&mut self) -> &mut Content {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(Content::new());
        self.y = CONTENT_TOP;
        self.page_has_content = false;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < CONTENT_BOTTOM && self.page_has_content {
            self.new_page();
        }
    }

    fn text(&mut self, font: Name<'static>, size: f32, x: f32, y: f32, color: Rgb, text: &str) {
        let encoded = encode_win_ansi(text);
        let content = self.content();
        content.set_fill_rgb(color.0, color.1, color.2);
        content.begin_text();
        content.set_font(font, size);
        content.next_line(x, y);
        content.show(Str(&encoded));
        content.end_text();
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, color: Rgb, width: f32) {
        let content = self.content();
        content.set_stroke_rgb(color.0, color.1, color.2);
        content.set_line_width(width);
        content.move_to(x1, y);
        content.line_to(x2, y);
        content.stroke();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let content = self.content();
        content.set_fill_rgb(color.0, color.1, color.2);
        content.rect(x, y, width, height);
        content.fill_nonzero();
    }

    fn title(&mut self, text: &str) {
        let band = 44.0;
        self.ensure_space(band + 12.0);
        self.fill_rect(MARGIN_X, self.y - band, CONTENT_WIDTH, band, BRAND);
        self.text(BOLD, 22.0, MARGIN_X + 14.0, self.y - 29.0, WHITE, text);
        self.y -= band + 14.0;
        self.page_has_content = true;
    }

    fn image(&mut self, image: &LoadedImage, width_mm: f32) {
        let width = (width_mm * MM_TO_PT).min(CONTENT_WIDTH);
        let height = width * image.height as f32 / image.width.max(1) as f32;
        self.ensure_space(height + 12.0);

        let y = self.y - height;
        let content = self.content();
        content.save_state();
        content.transform([width, 0.0, 0.0, height, MARGIN_X, y]);
        content.x_object(Name(image.name.as_bytes()));
        content.restore_state();

        self.y = y - 12.0;
        self.page_has_content = true;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, BODY_SIZE, CONTENT_WIDTH) {
            self.ensure_space(BODY_LEADING);
            self.y -= BODY_LEADING;
            self.text(REGULAR, BODY_SIZE, MARGIN_X, self.y, TEXT, &line);
            self.page_has_content = true;
        }
        self.y -= 6.0;
    }

    fn heading(&mut self, level: HeadingLevel, text: &str) {
        let size = level.font_size();
        let line_height = size * 1.2;
        let lines = wrap(text, size, CONTENT_WIDTH);

        // 標題 (含換行後的每一行) 不可單獨留在頁尾
        let height = size * 0.6 + line_height * lines.len().max(1) as f32 + 13.0;
        self.ensure_space(height + BODY_LEADING * 2.0);
        if self.page_has_content {
            self.y -= size * 0.6;
        }
        self.y -= line_height;

        let color = match level {
            HeadingLevel::H1 | HeadingLevel::H2 => BRAND,
            HeadingLevel::H3 => TEXT,
        };
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                if self.y - line_height < CONTENT_BOTTOM {
                    self.new_page();
                }
                self.y -= line_height;
            }
            self.text(BOLD, size, MARGIN_X, self.y, color, line);
        }

        if level == HeadingLevel::H1 {
            self.y -= 5.0;
            self.rule(MARGIN_X, MARGIN_X + CONTENT_WIDTH, self.y, BRAND, 1.0);
        }
        self.y -= 8.0;
        self.page_has_content = true;
    }

    fn bullet(&mut self, text: &str) {
        let glyph = BULLET_GLYPH.to_string();
        let lines = wrap(text, BODY_SIZE, CONTENT_WIDTH - BULLET_INDENT);
        for (index, line) in lines.iter().enumerate() {
            self.ensure_space(BODY_LEADING);
            self.y -= BODY_LEADING;
            if index == 0 {
                self.text(REGULAR, BODY_SIZE, MARGIN_X + 2.0, self.y, BRAND, &glyph);
            }
            self.text(REGULAR, BODY_SIZE, MARGIN_X + BULLET_INDENT, self.y, TEXT, line);
            self.page_has_content = true;
        }
        self.y -= 2.0;
    }

    fn table(&mut self, table: &Table) {
        let widths = column_widths(table.columns());
        self.ensure_space(TABLE_ROW_HEIGHT * 2.0);
        self.table_row(&table.headers, &widths, true);

        for row in &table.rows {
            if self.y - TABLE_ROW_HEIGHT < CONTENT_BOTTOM {
                self.new_page();
                self.table_row(&table.headers, &widths, true);
            }
            self.table_row(row, &widths, false);
        }
        self.y -= 8.0;
    }

    fn table_row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        let top = self.y;
        let bottom = top - TABLE_ROW_HEIGHT;
        if header {
            self.fill_rect(MARGIN_X, bottom, CONTENT_WIDTH, TABLE_ROW_HEIGHT, HEADER_FILL);
        }

        let mut x = MARGIN_X;
        for (cell, width) in cells.iter().zip(widths) {
            let text = fit_cell(cell, TABLE_SIZE, width - 8.0);
            let font = if header { BOLD } else { REGULAR };
            self.text(font, TABLE_SIZE, x + 4.0, bottom + 5.5, TEXT, &text);
            x += width;
        }

        self.rule(MARGIN_X, MARGIN_X + CONTENT_WIDTH, bottom, RULE, 0.5);
        self.y = bottom;
        self.page_has_content = true;
    }

    fn spacer(&mut self, height_mm: f32) {
        self.y = (self.y - height_mm * MM_TO_PT).max(CONTENT_BOTTOM);
    }

    fn page_break(&mut self) {
        if self.page_has_content {
            self.new_page();
        }
    }

    /// 頁首頁尾需要總頁數，因此在版面完成後才繪製
    fn decorate(&mut self) {
        let total = self.pages.len();
        let decoration = self.decoration;
        for index in 0..total {
            let page_number = format!("Page {} of {}", index + 1, total);
            let content = &mut self.pages[index];
            decorate_page(content, decoration, &page_number);
        }
    }
}

fn decorate_page(content: &mut Content, decoration: &Decoration, page_number: &str) {
    let right = MARGIN_X + CONTENT_WIDTH;
    let mut text = |font: Name<'static>, size: f32, x: f32, y: f32, color: Rgb, value: &str| {
        let encoded = encode_win_ansi(value);
        content.set_fill_rgb(color.0, color.1, color.2);
        content.begin_text();
        content.set_font(font, size);
        content.next_line(x, y);
        content.show(Str(&encoded));
        content.end_text();
    };

    // 頁首
    text(BOLD, 9.0, MARGIN_X, PAGE_HEIGHT - 44.0, BRAND, &decoration.brand);
    let title_x = right - estimate_width(&decoration.running_title, 9.0);
    text(REGULAR, 9.0, title_x, PAGE_HEIGHT - 44.0, MUTED, &decoration.running_title);

    // 頁尾
    text(BOLD, 9.0, MARGIN_X, 46.0, BRAND, &decoration.brand);
    text(REGULAR, 8.0, MARGIN_X, 34.0, MUTED, &decoration.contact);
    let number_x = right - estimate_width(page_number, 8.0);
    text(REGULAR, 8.0, number_x, 34.0, MUTED, page_number);

    content.set_stroke_rgb(RULE.0, RULE.1, RULE.2);
    content.set_line_width(0.5);
    content.move_to(MARGIN_X, PAGE_HEIGHT - 50.0);
    content.line_to(right, PAGE_HEIGHT - 50.0);
    content.move_to(MARGIN_X, 58.0);
    content.line_to(right, 58.0);
    content.stroke();
}

fn column_widths(columns: usize) -> Vec<f32> {
    match columns {
        0 => Vec::new(),
        1 => vec![CONTENT_WIDTH],
        n => {
            // 第一欄 (名稱) 較寬
            let first = CONTENT_WIDTH * 0.4;
            let rest = (CONTENT_WIDTH - first) / (n - 1) as f32;
            std::iter::once(first)
                .chain(std::iter::repeat(rest).take(n - 1))
                .collect()
        }
    }
}

fn fit_cell(text: &str, size: f32, width: f32) -> String {
    if estimate_width(text, size) <= width {
        return text.to_string();
    }
    let mut fitted = String::new();
    for c in text.chars() {
        if estimate_width(&fitted, size) + estimate_width("...", size) > width {
            break;
        }
        fitted.push(c);
    }
    fitted.pop();
    format!("{}...", fitted.trim_end())
}

/// Lays out a [`Document`] on A4 pages and serializes it to PDF bytes.
pub struct PdfWriter {
    decoration: Decoration,
}

impl PdfWriter {
    pub fn new(decoration: Decoration) -> Self {
        Self { decoration }
    }

    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let mut images: Vec<(usize, LoadedImage)> = Vec::new();
        for (index, block) in document.blocks.iter().enumerate() {
            if let Block::Image { path, .. } = block {
                if let Some(image) = load_image(path, format!("Im{}", images.len() + 1)) {
                    images.push((index, image));
                }
            }
        }

        let mut layout = Layout::new(&self.decoration);
        for (index, block) in document.blocks.iter().enumerate() {
            match block {
                Block::Title(text) => layout.title(text),
                Block::Image { width_mm, .. } => {
                    match images.iter().find(|(at, _)| *at == index) {
                        Some((_, image)) => layout.image(image, *width_mm),
                        None => layout.title(&self.decoration.brand),
                    }
                }
                Block::Paragraph(text) => layout.paragraph(text),
                Block::Heading { level, text } => layout.heading(*level, text),
                Block::Bullet(text) => layout.bullet(text),
                Block::Table(table) => layout.table(table),
                Block::Spacer(height_mm) => layout.spacer(*height_mm),
                Block::PageBreak => layout.page_break(),
            }
        }
        layout.decorate();

        let pages = layout.pages;
        tracing::debug!("Laid out {} blocks on {} pages", document.blocks.len(), pages.len());

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let regular_id = alloc.bump();
        let bold_id = alloc.bump();
        let info_id = alloc.bump();
        let image_ids: Vec<Ref> = images.iter().map(|_| alloc.bump()).collect();
        let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&document.title))
            .producer(TextStr("travel-planner"));

        for ((page_id, content_id), content) in page_ids.iter().zip(pages) {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(page_tree_id);
            page.contents(*content_id);
            {
                let mut resources = page.resources();
                resources.fonts().pair(REGULAR, regular_id).pair(BOLD, bold_id);
                if !images.is_empty() {
                    let mut x_objects = resources.x_objects();
                    for ((_, image), image_id) in images.iter().zip(&image_ids) {
                        x_objects.pair(Name(image.name.as_bytes()), *image_id);
                    }
                }
            }
            page.finish();
            pdf.stream(*content_id, &content.finish());
        }

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for ((_, image), image_id) in images.iter().zip(&image_ids) {
            let mut x_object = pdf.image_xobject(*image_id, &image.pixels);
            x_object.width(image.width as i32);
            x_object.height(image.height as i32);
            x_object.color_space().device_rgb();
            x_object.bits_per_component(8);
            x_object.finish();
        }

        Ok(pdf.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoration() -> Decoration {
        Decoration {
            brand: "Test Travel".to_string(),
            contact: "test@example.com".to_string(),
            running_title: "Trip to Rome".to_string(),
        }
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_write_produces_pdf() {
        let mut document = Document::new("Trip to Rome");
        document.push(Block::Title("Test Travel".to_string()));
        document.push(Block::heading(HeadingLevel::H1, "Day 1"));
        document.push(Block::Paragraph("Colosseum in the morning.".to_string()));
        document.push(Block::Bullet("Gelato".to_string()));

        let bytes = PdfWriter::new(decoration()).write(&document).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"(Page 1 of 1)"), 1);
        assert_eq!(count(&bytes, b"(Colosseum in the morning.)"), 1);
    }

    #[test]
    fn test_page_break_adds_page_with_footer() {
        let mut document = Document::new("Trip");
        document.push(Block::Paragraph("first".to_string()));
        document.push(Block::PageBreak);
        document.push(Block::Paragraph("second".to_string()));

        let bytes = PdfWriter::new(decoration()).write(&document).unwrap();

        assert_eq!(count(&bytes, b"(Page 1 of 2)"), 1);
        assert_eq!(count(&bytes, b"(Page 2 of 2)"), 1);
        assert_eq!(count(&bytes, b"(test@example.com)"), 2);
    }

    #[test]
    fn test_long_content_paginates() {
        let mut document = Document::new("Long");
        for i in 0..120 {
            document.push(Block::Bullet(format!("Item number {}", i)));
        }

        let bytes = PdfWriter::new(decoration()).write(&document).unwrap();
        assert_eq!(count(&bytes, b"(Page 1 of 1)"), 0);
        assert!(count(&bytes, b"(Page 1 of ") == 1);
    }

    #[test]
    fn test_unreadable_logo_falls_back_to_title() {
        let dir = tempfile::TempDir::new().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"not an image").unwrap();

        let mut document = Document::new("Trip");
        document.push(Block::Image {
            path: logo,
            width_mm: 40.0,
        });

        let bytes = PdfWriter::new(decoration()).write(&document).unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 0);
        // 標題列與頁首頁尾各輸出一次品牌名稱
        assert_eq!(count(&bytes, b"(Test Travel)"), 3);
    }

    #[test]
    fn test_png_logo_is_embedded() {
        let dir = tempfile::TempDir::new().unwrap();
        let logo = dir.path().join("logo.png");
        image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]))
            .save(&logo)
            .unwrap();

        let mut document = Document::new("Trip");
        document.push(Block::Image {
            path: logo,
            width_mm: 40.0,
        });

        let bytes = PdfWriter::new(decoration()).write(&document).unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
        assert_eq!(count(&bytes, b"/Im1 Do"), 1);
    }

    #[test]
    fn test_wrapped_heading_near_page_bottom_moves_to_next_page() {
        let decoration = decoration();
        let title = "Exploring the hidden courtyards and covered passages ".repeat(4);
        assert!(wrap(&title, HeadingLevel::H1.font_size(), CONTENT_WIDTH).len() >= 3);

        let mut layout = Layout::new(&decoration);
        layout.paragraph("filler");
        layout.y = CONTENT_BOTTOM + 70.0;
        layout.heading(HeadingLevel::H1, &title);

        assert_eq!(layout.pages.len(), 2);
        assert!(layout.y > CONTENT_BOTTOM);
    }

    #[test]
    fn test_fit_cell_truncates() {
        assert_eq!(fit_cell("short", 10.0, 100.0), "short");
        let fitted = fit_cell("a very long hotel name that will not fit", 10.0, 60.0);
        assert!(fitted.ends_with("..."));
        assert!(estimate_width(&fitted, 10.0) <= 60.0);
    }
}
