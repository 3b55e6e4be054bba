// Document rendering: plan text segmentation, block composition and PDF output.

pub mod compose;
pub mod model;
pub mod pdf;
pub mod segment;
pub mod text;

pub use compose::{document_filename, DocumentRenderer, RenderOptions, PDF_MIME_TYPE};
pub use model::{Block, Document, HeadingLevel, Table};
pub use segment::{segment_plan, PlanSegmenter};
