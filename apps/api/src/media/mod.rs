//! Image and document vendors: synthesis (ClipDrop), hosting and transformation
//! (Cloudinary) and PDF text extraction.

pub mod clipdrop;
pub mod cloudinary;
pub mod pdf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Re-encodes raw bytes as a `data:` URL, the form the image host accepts for inline uploads.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
