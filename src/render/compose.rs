use super::model::{Block, Document, HeadingLevel, Table};
use super::pdf::{Decoration, PdfWriter};
use super::segment::PlanSegmenter;
use crate::config::toml_config::DocumentConfig;
use crate::domain::model::{format_amount, Activity, Flight, Hotel, TravelRequest};
use crate::utils::error::Result;
use std::path::PathBuf;

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub const FLIGHT_HEADING: &str = "Flight Options";
pub const HOTEL_HEADING: &str = "Accommodation Options";
pub const ACTIVITY_HEADING: &str = "Recommended Activities";

pub const MAX_FLIGHT_ROWS: usize = 3;
pub const MAX_HOTEL_ROWS: usize = 3;
pub const MAX_ACTIVITY_ROWS: usize = 5;

const LOGO_WIDTH_MM: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub logo_path: Option<PathBuf>,
    pub brand: String,
    pub contact: String,
    pub closing_note: String,
}

impl From<&DocumentConfig> for RenderOptions {
    fn from(config: &DocumentConfig) -> Self {
        Self {
            logo_path: config.logo_path.as_ref().map(PathBuf::from),
            brand: config.brand.clone(),
            contact: config.contact.clone(),
            closing_note: config.closing_note.clone(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&DocumentConfig::default())
    }
}

pub fn price_label(price: f64) -> String {
    format!("${:.2}", price)
}

/// `travel_plan_<destination>.pdf`, keeping only ASCII letters and digits.
pub fn document_filename(destination: &str) -> String {
    let mut slug = String::new();
    for c in destination.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');

    if slug.is_empty() {
        "travel_plan.pdf".to_string()
    } else {
        format!("travel_plan_{}.pdf", slug)
    }
}

/// 將行程文字與推薦清單組成文件；每次呼叫都建立全新的區塊列表
pub struct DocumentRenderer {
    options: RenderOptions,
}

impl DocumentRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn compose(
        &self,
        plan_text: &str,
        request: &TravelRequest,
        flights: &[Flight],
        hotels: &[Hotel],
        activities: &[Activity],
    ) -> Document {
        let mut document = Document::new(format!("Travel Plan: {}", request.destination()));

        // logo 於輸出時才檢查是否存在
        match &self.options.logo_path {
            Some(path) if path.is_file() => document.push(Block::Image {
                path: path.clone(),
                width_mm: LOGO_WIDTH_MM,
            }),
            Some(path) => {
                tracing::debug!("Logo {} not found, using text title", path.display());
                document.push(Block::Title(self.options.brand.clone()));
            }
            None => document.push(Block::Title(self.options.brand.clone())),
        }

        document.push(Block::heading(
            HeadingLevel::H3,
            format!("Your trip to {}", request.destination()),
        ));
        document.push(Block::Paragraph(format!(
            "Dates: {}\nBudget: ${}",
            request.dates(),
            format_amount(request.budget())
        )));
        document.push(Block::Spacer(4.0));

        for block in PlanSegmenter::new(plan_text).blocks() {
            document.push(block);
        }

        document.push(Block::PageBreak);

        document.push(Block::heading(HeadingLevel::H1, FLIGHT_HEADING));
        let mut table = Table::new(["Airline", "Price", "Departure", "Arrival"]);
        for flight in flights.iter().take(MAX_FLIGHT_ROWS) {
            table.push_row(vec![
                flight.airline.clone(),
                price_label(flight.price),
                flight.departure.clone(),
                flight.arrival.clone(),
            ]);
        }
        document.push(Block::Table(table));

        document.push(Block::heading(HeadingLevel::H1, HOTEL_HEADING));
        let mut table = Table::new(["Hotel", "Price/Night", "Rating"]);
        for hotel in hotels.iter().take(MAX_HOTEL_ROWS) {
            table.push_row(vec![
                hotel.name.clone(),
                price_label(hotel.price),
                format!("{:.1}", hotel.rating),
            ]);
        }
        document.push(Block::Table(table));

        document.push(Block::heading(HeadingLevel::H1, ACTIVITY_HEADING));
        let mut table = Table::new(["Activity", "Price", "Duration"]);
        for activity in activities.iter().take(MAX_ACTIVITY_ROWS) {
            table.push_row(vec![
                activity.name.clone(),
                price_label(activity.price),
                activity.duration.clone(),
            ]);
        }
        document.push(Block::Table(table));

        document.push(Block::Spacer(8.0));
        document.push(Block::Paragraph(self.options.closing_note.clone()));
        document.push(Block::Paragraph(format!("Contact: {}", self.options.contact)));

        document
    }

    pub fn render(
        &self,
        plan_text: &str,
        request: &TravelRequest,
        flights: &[Flight],
        hotels: &[Hotel],
        activities: &[Activity],
    ) -> Result<Vec<u8>> {
        let document = self.compose(plan_text, request, flights, hotels, activities);
        let writer = PdfWriter::new(Decoration {
            brand: self.options.brand.clone(),
            contact: self.options.contact.clone(),
            running_title: format!("{} | {}", request.destination(), request.dates()),
        });

        let bytes = writer.write(&document)?;
        tracing::debug!(
            "Rendered {} blocks into {} bytes ({})",
            document.blocks.len(),
            bytes.len(),
            PDF_MIME_TYPE
        );
        Ok(bytes)
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recommend::Catalog;

    fn renderer_without_logo() -> DocumentRenderer {
        DocumentRenderer::new(RenderOptions {
            logo_path: None,
            ..RenderOptions::default()
        })
    }

    fn request() -> TravelRequest {
        TravelRequest::new("Paris", "May 5-9, 2025", 1000.0)
    }

    /// Blocks produced from the plan text: between the cover spacer and the page break.
    fn plan_blocks(document: &Document) -> &[Block] {
        let start = document
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Spacer(_)))
            .unwrap()
            + 1;
        let end = document
            .blocks
            .iter()
            .position(|b| matches!(b, Block::PageBreak))
            .unwrap();
        &document.blocks[start..end]
    }

    #[test]
    fn test_section_headings_plus_fixed_sections() {
        let catalog = Catalog::demo();
        let plan = "# Best time\n## Spring\n* mild\n# Transport\n* Metro\n* RER\n# Food\n## Bistros";
        let document = renderer_without_logo().compose(
            plan,
            &request(),
            &catalog.flights,
            &catalog.hotels,
            &catalog.activities,
        );

        assert_eq!(
            document.headings(HeadingLevel::H1),
            vec![
                "Best time",
                "Transport",
                "Food",
                FLIGHT_HEADING,
                HOTEL_HEADING,
                ACTIVITY_HEADING
            ]
        );
    }

    #[test]
    fn test_plain_text_is_single_paragraph() {
        let document = renderer_without_logo().compose(
            "Just enjoy Paris.\nWalk a lot.",
            &request(),
            &[],
            &[],
            &[],
        );

        assert_eq!(
            plan_blocks(&document),
            &[Block::Paragraph("Just enjoy Paris.\nWalk a lot.".to_string())]
        );
        assert_eq!(document.headings(HeadingLevel::H1).len(), 3);
    }

    #[test]
    fn test_empty_plan_text() {
        let document = renderer_without_logo().compose("", &request(), &[], &[], &[]);
        assert_eq!(plan_blocks(&document), &[Block::Paragraph(String::new())]);
    }

    #[test]
    fn test_tables_cap_rows_without_padding() {
        let flight = |n: u32| Flight {
            airline: format!("Air {}", n),
            departure: "08:00".to_string(),
            arrival: "10:00".to_string(),
            price: 100.0 + n as f64,
        };
        let activity = |n: u32| Activity {
            name: format!("Tour {}", n),
            duration: "1 hour".to_string(),
            price: 10.0,
        };
        let flights: Vec<Flight> = (1..=2).map(flight).collect();
        let activities: Vec<Activity> = (1..=7).map(activity).collect();

        let document =
            renderer_without_logo().compose("", &request(), &flights, &[], &activities);

        let flight_table = document.table_after(FLIGHT_HEADING).unwrap();
        assert_eq!(flight_table.rows.len(), 2);
        assert_eq!(flight_table.total_rows(), 3);
        assert_eq!(
            flight_table.rows[0],
            vec!["Air 1", "$101.00", "08:00", "10:00"]
        );

        let hotel_table = document.table_after(HOTEL_HEADING).unwrap();
        assert!(hotel_table.rows.is_empty());
        assert_eq!(hotel_table.headers, vec!["Hotel", "Price/Night", "Rating"]);

        let activity_table = document.table_after(ACTIVITY_HEADING).unwrap();
        assert_eq!(activity_table.rows.len(), MAX_ACTIVITY_ROWS);
        assert_eq!(activity_table.rows[4][0], "Tour 5");
    }

    #[test]
    fn test_missing_logo_uses_title_block() {
        let renderer = DocumentRenderer::new(RenderOptions {
            logo_path: Some(PathBuf::from("/definitely/not/here/logo.png")),
            ..RenderOptions::default()
        });
        let document = renderer.compose("text", &request(), &[], &[], &[]);

        assert_eq!(
            document.blocks[0],
            Block::Title(renderer.options().brand.clone())
        );
        assert!(!document
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Image { .. })));

        let bytes = renderer
            .render("text", &request(), &[], &[], &[])
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_existing_logo_uses_image_block() {
        let dir = tempfile::TempDir::new().unwrap();
        let logo = dir.path().join("logo.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([200, 100, 0]))
            .save(&logo)
            .unwrap();

        let renderer = DocumentRenderer::new(RenderOptions {
            logo_path: Some(logo.clone()),
            ..RenderOptions::default()
        });
        let document = renderer.compose("text", &request(), &[], &[], &[]);

        assert_eq!(
            document.blocks[0],
            Block::Image {
                path: logo,
                width_mm: LOGO_WIDTH_MM
            }
        );
    }

    #[test]
    fn test_compose_is_idempotent() {
        let catalog = Catalog::demo();
        let renderer = renderer_without_logo();
        let plan = "Intro\n# Day 1\n* Louvre\n# Day 2\n## Evening\nSeine cruise";

        let first = renderer.compose(plan, &request(), &catalog.flights, &catalog.hotels, &catalog.activities);
        let second = renderer.compose(plan, &request(), &catalog.flights, &catalog.hotels, &catalog.activities);
        assert_eq!(first, second);
    }

    #[test]
    fn test_document_filename() {
        assert_eq!(document_filename("Paris"), "travel_plan_paris.pdf");
        assert_eq!(document_filename(" New York City "), "travel_plan_new_york_city.pdf");
        assert_eq!(document_filename("São Paulo!"), "travel_plan_s_o_paulo.pdf");
        assert_eq!(document_filename("東京"), "travel_plan.pdf");
    }
}
