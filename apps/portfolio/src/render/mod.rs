// Output backends: the PDF canvas and profile photo decoding.

pub mod pdf;
pub mod photo;

pub use pdf::PdfCanvas;
