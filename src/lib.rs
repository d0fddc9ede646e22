//! # pptsize
//!
//! Storage breakdown of PowerPoint (.pptx) presentations.
//!
//! The library opens an Office Open XML presentation package and reports how
//! many bytes each slide part takes, with the images and embedded videos each
//! slide references, alongside the size of the whole file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::io;
//!
//! // Write the report for a presentation to stdout
//! pptsize::analyze("deck.pptx", io::stdout().lock())?;
//! # Ok::<(), pptsize::Error>(())
//! ```
//!
//! ## Package Access
//!
//! ```no_run
//! use pptsize::pptx::PresentationPackage;
//! use pptsize::size::readable_size;
//!
//! let package = PresentationPackage::open("deck.pptx")?;
//! for slide_id in package.slide_ids().unwrap_or_default() {
//!     let slide = package.resolve_slide(slide_id)?;
//!     println!("{}: {}", slide.title()?, readable_size(slide.size()? as i64));
//! }
//! # Ok::<(), pptsize::Error>(())
//! ```

pub mod container;
pub mod content_types;
pub mod error;
pub mod pptx;
pub mod report;
pub mod size;

pub use error::{Error, Result};
pub use report::{analyze, MediaEntry, MediaKind, Outcome, ReportOptions, ReportWalker, SlideRecord};
pub use size::{format_size, readable_size};
