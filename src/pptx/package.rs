//! Presentation package: main part lookup and slide list.

use super::slide::SlidePart;
use crate::container::{OoxmlContainer, RelationshipKind, Relationships};
use crate::content_types::ContentTypes;
use crate::error::{Error, Result};
use log::debug;
use std::path::Path;

/// Content types accepted for the main part of a presentation package.
const PRESENTATION_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml",
    "application/vnd.ms-powerpoint.slideshow.macroEnabled.main+xml",
    "application/vnd.ms-powerpoint.template.macroEnabled.main+xml",
];

/// An entry of the presentation's slide id list (`p:sldId`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    /// Slide identifier (`id` attribute), if present
    pub id: Option<String>,
    /// Relationship ID pointing at the slide part (`r:id`), if present
    pub rel_id: Option<String>,
}

/// An opened, read-only presentation package.
pub struct PresentationPackage {
    container: OoxmlContainer,
    content_types: ContentTypes,
    presentation_path: String,
    relationships: Relationships,
    slide_ids: Option<Vec<SlideId>>,
}

impl PresentationPackage {
    /// Open a PPTX file.
    ///
    /// Fails if the file is not a zip package, has no main document part,
    /// or its main part is not a presentation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pptsize::pptx::PresentationPackage;
    ///
    /// let package = PresentationPackage::open("deck.pptx")?;
    /// println!("{} slides", package.slide_count());
    /// # Ok::<(), pptsize::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Open a presentation package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let content_types = ContentTypes::read(&container)?;

        let package_rels = container.read_package_relationships()?;
        let main = package_rels
            .of_kind(RelationshipKind::OfficeDocument)
            .find(|r| !r.external)
            .ok_or_else(|| Error::MissingComponent("main document part".to_string()))?;

        let presentation_path = OoxmlContainer::resolve_path("", &main.target);
        if !container.exists(&presentation_path) {
            return Err(Error::MissingComponent(presentation_path));
        }

        match content_types.get(&presentation_path) {
            Some(ct) if PRESENTATION_CONTENT_TYPES.contains(&ct) => {}
            Some(ct) => {
                return Err(Error::UnsupportedFormat(format!(
                    "main part {} has content type {}",
                    presentation_path, ct
                )))
            }
            None => {
                return Err(Error::UnsupportedFormat(format!(
                    "main part {} has no content type",
                    presentation_path
                )))
            }
        }

        let relationships = container.read_relationships(&presentation_path)?;
        let slide_ids = parse_slide_list(&container.read_xml(&presentation_path)?)?;
        debug!(
            "presentation part {} lists {} slides",
            presentation_path,
            slide_ids.as_ref().map_or(0, Vec::len)
        );

        Ok(Self {
            container,
            content_types,
            presentation_path,
            relationships,
            slide_ids,
        })
    }

    /// Slide id list in declared order, or `None` if the presentation has
    /// no slide list at all.
    pub fn slide_ids(&self) -> Option<&[SlideId]> {
        self.slide_ids.as_deref()
    }

    /// Number of entries in the slide list.
    pub fn slide_count(&self) -> usize {
        self.slide_ids.as_ref().map_or(0, Vec::len)
    }

    /// Resolve a slide list entry to its slide part.
    ///
    /// An entry without a relationship id, or whose id does not lead to a
    /// slide part present in the package, is reported as
    /// [`Error::CorruptPackage`].
    pub fn resolve_slide(&self, slide: &SlideId) -> Result<SlidePart<'_>> {
        let rel_id = slide.rel_id.as_deref().ok_or_else(|| {
            Error::CorruptPackage(format!(
                "slide {} has no relationship id",
                slide.id.as_deref().unwrap_or("?")
            ))
        })?;

        let rel = self.relationships.get(rel_id).ok_or_else(|| {
            Error::CorruptPackage(format!("relationship {} does not exist", rel_id))
        })?;

        if rel.kind != RelationshipKind::Slide || rel.external {
            return Err(Error::CorruptPackage(format!(
                "relationship {} does not point at a slide part",
                rel_id
            )));
        }

        let path = OoxmlContainer::resolve_path(&self.presentation_path, &rel.target);
        if !self.container.exists(&path) {
            return Err(Error::CorruptPackage(format!(
                "slide part {} for relationship {} is missing",
                path, rel_id
            )));
        }

        let relationships = self.container.read_relationships(&path)?;
        debug!("{} -> {}", rel_id, path);
        Ok(SlidePart::new(
            &self.container,
            &self.content_types,
            path,
            relationships,
        ))
    }
}

impl std::fmt::Debug for PresentationPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationPackage")
            .field("presentation_path", &self.presentation_path)
            .field("slides", &self.slide_count())
            .finish()
    }
}

/// Parse `p:sldIdLst` from presentation.xml.
///
/// Only the list directly under the `p:presentation` root is read. Section
/// lists in `p:extLst` reuse the `sldIdLst`/`sldId` names at deeper levels.
/// Returns `None` when the list element is absent.
fn parse_slide_list(xml: &str) -> Result<Option<Vec<SlideId>>> {
    let mut slides: Option<Vec<SlideId>> = None;
    let mut in_list = false;
    // depth of the innermost open element; the root is 1
    let mut depth = 0usize;

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"sldIdLst" if depth == 2 => {
                        in_list = true;
                        slides.get_or_insert_with(Vec::new);
                    }
                    b"sldId" if in_list && depth == 3 => {
                        slides.get_or_insert_with(Vec::new).push(slide_id(&e));
                    }
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Empty(e)) => match e.local_name().as_ref() {
                b"sldIdLst" if depth == 1 => {
                    slides.get_or_insert_with(Vec::new);
                }
                b"sldId" if in_list && depth == 2 => {
                    slides.get_or_insert_with(Vec::new).push(slide_id(&e));
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::End(e)) => {
                if depth == 2 && e.local_name().as_ref() == b"sldIdLst" {
                    in_list = false;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(slides)
}

fn slide_id(e: &quick_xml::events::BytesStart<'_>) -> SlideId {
    let mut id = None;
    let mut rel_id = None;

    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() != b"id" {
            continue;
        }
        let value = String::from_utf8_lossy(&attr.value).to_string();
        // r:id carries a namespace prefix, the slide id does not
        if attr.key.prefix().is_some() {
            rel_id = Some(value);
        } else {
            id = Some(value);
        }
    }

    SlideId { id, rel_id }
}
