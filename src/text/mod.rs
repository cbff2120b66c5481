//! Text cleanup shared by the layout and OCR paths.

pub mod hyphenation;
pub mod normalize;

pub use hyphenation::HyphenationHandler;
pub use normalize::{is_page_number, normalize_text, repeat_key};
