use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn font_size(self) -> f32 {
        match self {
            HeadingLevel::H1 => 18.0,
            HeadingLevel::H2 => 14.0,
            HeadingLevel::H3 => 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> usize {
        self.headers.len()
    }

    /// Header row plus data rows.
    pub fn total_rows(&self) -> usize {
        1 + self.rows.len()
    }
}

/// 版面配置的最小單位
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Styled text stand-in for the logo.
    Title(String),
    Image { path: PathBuf, width_mm: f32 },
    Paragraph(String),
    Heading { level: HeadingLevel, text: String },
    Bullet(String),
    Table(Table),
    Spacer(f32),
    PageBreak,
}

impl Block {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn is_heading(&self, wanted: HeadingLevel) -> bool {
        matches!(self, Block::Heading { level, .. } if *level == wanted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn headings(&self, level: HeadingLevel) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level: l, text } if *l == level => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The table that directly follows the heading-1 block with this text.
    pub fn table_after(&self, heading: &str) -> Option<&Table> {
        let position = self.blocks.iter().position(|block| {
            matches!(block, Block::Heading { level: HeadingLevel::H1, text } if text == heading)
        })?;

        match self.blocks.get(position + 1) {
            Some(Block::Table(table)) => Some(table),
            _ => None,
        }
    }
}
