//! Internal analysis pipeline stages.
//!
//! Each stage is a small module with a single entry point:
//!
//! 1. [`fetch`] — classify the URL by extension and retrieve document bytes
//! 2. [`office`] — `.docx` → PDF via a headless LibreOffice subprocess
//! 3. [`gemini`] — one generateContent call: binary part + prompt text
//! 4. [`normalize`] — strip code fences from the model text, parse as JSON

pub mod fetch;
pub mod gemini;
pub mod normalize;
pub mod office;
