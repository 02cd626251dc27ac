//! One module per supported format. Each extractor is synchronous and is
//! driven from the blocking pool by the processor.

pub mod excel;
pub mod pdf;
pub mod powerpoint;
pub mod text;
pub mod word;
