//! PPTX (PowerPoint) package access.
//!
//! This module resolves the parts of a Microsoft PowerPoint presentation in
//! the Office Open XML (.pptx) format that matter for size reporting: the
//! presentation's slide list, each slide part, and the images and media the
//! slides reference.

mod package;
mod slide;

pub use package::{PresentationPackage, SlideId};
pub use slide::{extract_title, DataReference, MediaPart, SlidePart, UNTITLED_SLIDE};
