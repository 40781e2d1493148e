//! Per-request items and outcomes.

use std::fmt;

/// One uploaded file or archive entry.
#[derive(Clone)]
pub struct InputItem {
    /// Original filename (may include a directory part for archive entries)
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for InputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputItem")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One encoded JPEG ready to be archived.
#[derive(Clone)]
pub struct ConvertedImage {
    /// Entry name inside the result archive
    pub name: String,
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for ConvertedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertedImage")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.jpeg.len())
            .finish()
    }
}

/// A per-item failure that excluded the item from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

/// Result of processing a single item.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Converted(ConvertedImage),
    Failed(ItemFailure),
}

/// Summary of one batch conversion.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Filename advertised for the archive
    pub archive_name: &'static str,
    /// Serialized result archive
    pub archive: Vec<u8>,
    /// Entry names in archive order
    pub entries: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.entries.len()
    }
}
