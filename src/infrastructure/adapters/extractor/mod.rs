//! Extractor Adapter - 文档文本提取

mod pdf_extractor;

pub use pdf_extractor::PdfTextExtractor;
