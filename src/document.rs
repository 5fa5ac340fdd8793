use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One table cell as delivered by the document extractor. `None` marks a cell
/// covered by a merged neighbor, `Some("")` a genuinely empty slot.
pub type Cell = Option<String>;

/// A page dump: rendered text lines plus the table grid, one row per weekday
/// with a leading day-label cell and a trailing sentinel cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    text: Vec<String>,
    table: Vec<Vec<Cell>>,
}

impl Page {
    pub fn new(text: Vec<String>, table: Vec<Vec<Cell>>) -> Self {
        Page { text, table }
    }

    pub fn text_lines(&self) -> &[String] {
        &self.text
    }

    pub fn table_rows(&self) -> &[Vec<Cell>] {
        &self.table
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub source: Option<String>,
    pub pages: Vec<Page>,
}

pub fn load(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page dump {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse page dump {}", path.display()))
}
