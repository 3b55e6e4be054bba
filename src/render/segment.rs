//! Splits loosely structured plan text into layout blocks.
//!
//! The language model is asked for an itinerary but nothing guarantees the
//! shape of its answer. Markers are recognised heuristically:
//!
//! * `# ` starts a section (heading level 1)
//! * `## ` starts a subsection (heading level 2); deeper headings fold into it
//! * `* ` starts a bullet
//!
//! Markers found in the middle of a line are moved onto a line of their own
//! before tokenizing, so `"Intro # Day 1 * Louvre"` still yields a heading and
//! a bullet. Text without any section heading is kept as a single paragraph.

use super::model::{Block, HeadingLevel};
use regex::Regex;
use std::collections::VecDeque;
use std::str::Lines;
use std::sync::LazyLock;

pub const BULLET_GLYPH: char = '•';

// 強調標記只在字詞邊界生效，`2*3*4` 之類的算式保持原樣
static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^\w*])\*\*(\S(?:[^*\n]*\S)?)\*\*").expect("valid bold pattern")
});
static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^\w*])\*(\S(?:[^*\n]*\S)?)\*").expect("valid italic pattern")
});
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#+ |\* ").expect("valid marker pattern"));
static SECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# ").expect("valid section pattern"));

/// 讓每個標記都從新的一行開始
pub fn normalize(plan_text: &str) -> String {
    let text = unwrap_emphasis(plan_text, &BOLD);
    let text = unwrap_emphasis(&text, &ITALIC);

    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for marker in MARKER.find_iter(&text) {
        out.push_str(&text[last..marker.start()]);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(match marker.as_str() {
            "# " => "# ",
            "* " => "* ",
            _ => "## ",
        });
        last = marker.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Drops the emphasis markers of every match not directly followed by a word
/// character. The regex crate has no lookahead, so the trailing side is
/// checked here.
fn unwrap_emphasis(text: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let glued = text[whole.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');

        out.push_str(&text[last..whole.start()]);
        if glued {
            out.push_str(whole.as_str());
        } else {
            out.push_str(&caps[1]);
            out.push_str(&caps[2]);
        }
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Preamble,
    InSection,
    InSubsection,
}

#[derive(Debug)]
enum Fragment {
    Paragraph(String),
    Bullet(String),
}

/// Normalized plan text; every call to [`PlanSegmenter::blocks`] restarts
/// the block stream from the beginning.
#[derive(Debug, Clone)]
pub struct PlanSegmenter {
    normalized: String,
    has_sections: bool,
}

impl PlanSegmenter {
    pub fn new(plan_text: &str) -> Self {
        let normalized = normalize(plan_text);
        let has_sections = SECTION_LINE.is_match(&normalized);
        Self {
            normalized,
            has_sections,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn has_sections(&self) -> bool {
        self.has_sections
    }

    pub fn blocks(&self) -> Blocks<'_> {
        if !self.has_sections {
            // 沒有任何章節標題：整段文字視為單一段落
            return Blocks {
                lines: "".lines(),
                state: State::Preamble,
                fragment: None,
                pending: VecDeque::from([Block::Paragraph(self.normalized.trim().to_string())]),
                finished: true,
            };
        }

        Blocks {
            lines: self.normalized.lines(),
            state: State::Preamble,
            fragment: None,
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

pub fn segment_plan(plan_text: &str) -> Vec<Block> {
    PlanSegmenter::new(plan_text).blocks().collect()
}

pub struct Blocks<'a> {
    lines: Lines<'a>,
    state: State,
    fragment: Option<Fragment>,
    pending: VecDeque<Block>,
    finished: bool,
}

impl Blocks<'_> {
    fn consume(&mut self, line: &str) {
        if let Some(title) = line.strip_prefix("# ") {
            self.flush();
            self.pending
                .push_back(Block::heading(HeadingLevel::H1, title.trim()));
            self.state = State::InSection;
            return;
        }

        // 第一個章節之前的文字只當作前言段落，不再細分
        if self.state == State::Preamble {
            self.append(line);
            return;
        }

        if let Some(title) = line.strip_prefix("## ") {
            self.flush();
            self.pending
                .push_back(Block::heading(HeadingLevel::H2, title.trim()));
            self.state = State::InSubsection;
        } else if let Some(item) = line.strip_prefix("* ") {
            self.flush();
            self.fragment = Some(Fragment::Bullet(item.to_string()));
        } else {
            self.append(line);
        }
    }

    fn append(&mut self, line: &str) {
        match &mut self.fragment {
            Some(Fragment::Paragraph(text)) | Some(Fragment::Bullet(text)) => {
                text.push('\n');
                text.push_str(line);
            }
            None => self.fragment = Some(Fragment::Paragraph(line.to_string())),
        }
    }

    fn flush(&mut self) {
        match self.fragment.take() {
            Some(Fragment::Paragraph(text)) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.pending.push_back(Block::Paragraph(text.to_string()));
                }
            }
            Some(Fragment::Bullet(text)) => {
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    self.pending.push_back(Block::Bullet(text));
                } else {
                    tracing::trace!("Dropping empty bullet in {:?}", self.state);
                }
            }
            None => {}
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        loop {
            if let Some(block) = self.pending.pop_front() {
                return Some(block);
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.consume(line),
                None => {
                    self.flush();
                    self.finished = true;
                }
            }
        }
    }
}
