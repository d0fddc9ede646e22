//! Per-slide storage report.
//!
//! [`ReportWalker`] opens a presentation, prints the file summary, then walks
//! the slide list in declared order. Each slide line carries the slide part's
//! own size and the running total of slide part sizes; images and embedded
//! videos follow as indented lines.
//!
//! Media sizes are listed but do not contribute to the running total.

use crate::error::Result;
use crate::pptx::{PresentationPackage, SlideId};
use crate::size::{format_size, megabytes, DEFAULT_DECIMAL_PLACES};
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// Options for report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Fractional digits for slide and media sizes
    pub decimal_places: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl ReportOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of fractional digits for formatted sizes.
    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = places;
        self
    }
}

/// How a walk ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every slide was reported.
    Reported {
        /// Number of slides reported
        slides: usize,
    },
    /// The path does not name an existing file.
    FileNotFound,
    /// The presentation has no slides.
    NoSlides,
}

/// Kind of media attached to a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image part
    Image,
    /// Embedded video
    Video,
}

/// A media line under a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    /// Image or video
    pub kind: MediaKind,
    /// Declared content type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

/// Everything reported for one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRecord {
    /// 1-based position in the slide list
    pub number: usize,
    /// Title text or the untitled sentinel
    pub title: String,
    /// Size of the slide part in bytes
    pub size: u64,
    /// Sum of slide part sizes up to and including this slide
    pub total: u64,
    /// Images, then embedded videos
    pub media: Vec<MediaEntry>,
}

/// Walks a presentation and writes its storage report.
pub struct ReportWalker<W: Write> {
    out: W,
    options: ReportOptions,
}

impl<W: Write> ReportWalker<W> {
    /// Create a walker writing to `out` with default options.
    pub fn new(out: W) -> Self {
        Self::with_options(out, ReportOptions::default())
    }

    /// Create a walker writing to `out`.
    pub fn with_options(out: W, options: ReportOptions) -> Self {
        Self { out, options }
    }

    /// Consume the walker and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report on the presentation at `path`.
    ///
    /// A missing file or a presentation without slides is reported and
    /// returned as an [`Outcome`]. A file that is not a presentation
    /// package, or a slide list entry that does not resolve to a slide part,
    /// is an error; slides before the faulty entry have already been written.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pptsize::ReportWalker;
    ///
    /// let stdout = std::io::stdout();
    /// let mut walker = ReportWalker::new(stdout.lock());
    /// walker.analyze("deck.pptx")?;
    /// # Ok::<(), pptsize::Error>(())
    /// ```
    pub fn analyze(&mut self, path: impl AsRef<Path>) -> Result<Outcome> {
        let path = path.as_ref();
        if !path.is_file() {
            writeln!(self.out, "File not found: {}", path.display())?;
            return Ok(Outcome::FileNotFound);
        }

        let package = PresentationPackage::open(path)?;
        let file_size = std::fs::metadata(path)?.len();
        writeln!(self.out, "File: {}", path.display())?;
        writeln!(
            self.out,
            "Size: {} bytes ({} MB)",
            file_size,
            megabytes(file_size)
        )?;

        let slide_ids = match package.slide_ids() {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                writeln!(self.out, "No slides found in the presentation.")?;
                return Ok(Outcome::NoSlides);
            }
        };

        let mut total = 0u64;
        for (idx, slide_id) in slide_ids.iter().enumerate() {
            let record = slide_record(&package, idx + 1, slide_id, total)?;
            total = record.total;
            self.write_slide(&record)?;
        }

        info!(
            "{}: {} slides, {} bytes of slide parts",
            path.display(),
            slide_ids.len(),
            total
        );
        Ok(Outcome::Reported {
            slides: slide_ids.len(),
        })
    }

    fn write_slide(&mut self, record: &SlideRecord) -> Result<()> {
        let size = self.format(record.size);
        let total = self.format(record.total);
        writeln!(
            self.out,
            "Slide: {}({}) => {} (total: {})",
            record.number, record.title, size, total
        )?;

        for media in &record.media {
            let size = self.format(media.size);
            match media.kind {
                MediaKind::Image => writeln!(self.out, "\t - Image: {}", size)?,
                MediaKind::Video => {
                    writeln!(self.out, "\t - Video ({}): {}", media.content_type, size)?
                }
            }
        }
        Ok(())
    }

    fn format(&self, bytes: u64) -> String {
        format_size(
            i64::try_from(bytes).unwrap_or(i64::MAX),
            self.options.decimal_places,
        )
    }
}

/// Report on the presentation at `path`, writing to `out` with default options.
pub fn analyze(path: impl AsRef<Path>, out: impl Write) -> Result<Outcome> {
    ReportWalker::new(out).analyze(path)
}

/// Resolve and measure one slide. Nothing is written, so a fault here leaves
/// no partial output for the slide.
fn slide_record(
    package: &PresentationPackage,
    number: usize,
    slide_id: &SlideId,
    previous_total: u64,
) -> Result<SlideRecord> {
    let slide = package.resolve_slide(slide_id)?;
    let size = slide.size()?;
    let title = slide.title()?;
    debug!("slide {} ({}): {} bytes", number, slide.path(), size);

    let mut media: Vec<MediaEntry> = slide
        .images()?
        .into_iter()
        .map(|part| MediaEntry {
            kind: MediaKind::Image,
            content_type: part.content_type,
            size: part.size,
        })
        .collect();
    media.extend(slide.videos()?.into_iter().map(|part| MediaEntry {
        kind: MediaKind::Video,
        content_type: part.content_type,
        size: part.size,
    }));

    Ok(SlideRecord {
        number,
        title,
        size,
        total: previous_total + size,
        media,
    })
}
