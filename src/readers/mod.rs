//! Readers turn a file on disk into a [`crate::model::RawGrid`], a
//! rectangular matrix of strings with no header interpretation and no type
//! coercion. `spreadsheet` handles workbooks and delimited text;
//! `pdf` handles PDFs, which need a layered extraction strategy.

pub mod pdf;
pub mod spreadsheet;

/// File kinds this crate knows how to read, dispatched by extension.
/// Mirrors the shape of the teacher's `importers::file_detector::FileType`,
/// generalized from CEI/Movimentacao/OfertasPublicas to the three input
/// kinds this crate actually ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Workbook,
    DelimitedText,
    Pdf,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xls" => Some(FileKind::Workbook),
            "csv" => Some(FileKind::DelimitedText),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }
}
