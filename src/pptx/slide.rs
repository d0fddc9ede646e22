//! Slide parts: size, title and attached media.

use crate::container::{OoxmlContainer, Relationship, RelationshipKind, Relationships};
use crate::content_types::{is_xml_content_type, ContentTypes};
use crate::error::{Error, Result};
use log::{debug, warn};

/// Title reported for slides without a title placeholder.
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// Placeholder type that marks a slide title shape.
const TITLE_PLACEHOLDER: &[u8] = b"title";

/// A binary part attached to a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    /// Part path inside the package
    pub path: String,
    /// Declared content type
    pub content_type: String,
    /// Uncompressed size in bytes
    pub size: u64,
}

/// A slide relationship that references a data part (audio, video, media).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataReference {
    /// Relationship ID
    pub id: String,
    /// Relationship kind
    pub kind: RelationshipKind,
    /// Resolved target path (empty for external targets)
    pub path: String,
    /// Declared content type of the target, if any
    pub content_type: Option<String>,
    /// Whether the target is binary media data stored in the package
    pub is_media_data: bool,
}

impl DataReference {
    /// A video relationship backed by media data.
    pub fn is_embedded_video(&self) -> bool {
        self.kind == RelationshipKind::Video && self.is_media_data
    }
}

/// A resolved slide part.
pub struct SlidePart<'a> {
    container: &'a OoxmlContainer,
    content_types: &'a ContentTypes,
    path: String,
    relationships: Relationships,
}

impl<'a> SlidePart<'a> {
    pub(crate) fn new(
        container: &'a OoxmlContainer,
        content_types: &'a ContentTypes,
        path: String,
        relationships: Relationships,
    ) -> Self {
        Self {
            container,
            content_types,
            path,
            relationships,
        }
    }

    /// Part path inside the package (e.g. `ppt/slides/slide1.xml`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Size of the slide XML part in bytes.
    pub fn size(&self) -> Result<u64> {
        self.container.part_size(&self.path)
    }

    /// Slide title, or [`UNTITLED_SLIDE`].
    pub fn title(&self) -> Result<String> {
        let xml = self.container.read_xml(&self.path)?;
        Ok(extract_title(&xml)?.unwrap_or_else(|| UNTITLED_SLIDE.to_string()))
    }

    /// Image parts referenced by the slide, in relationship order.
    ///
    /// External images are not part of the package and are skipped, as are
    /// relationships whose target part is missing.
    pub fn images(&self) -> Result<Vec<MediaPart>> {
        let mut images = Vec::new();
        for rel in self.relationships.of_kind(RelationshipKind::Image) {
            if rel.external {
                continue;
            }
            let path = OoxmlContainer::resolve_path(&self.path, &rel.target);
            if !self.container.exists(&path) {
                warn!("{}: image {} points at missing part {}", self.path, rel.id, path);
                continue;
            }
            let size = self.container.part_size(&path)?;
            let content_type = self.content_types.get(&path).unwrap_or_default().to_string();
            images.push(MediaPart {
                path,
                content_type,
                size,
            });
        }
        Ok(images)
    }

    /// Data relationships (audio, video, media) of the slide, in
    /// relationship order.
    pub fn data_references(&self) -> Vec<DataReference> {
        self.relationships
            .iter()
            .filter(|rel| rel.kind.is_data_reference())
            .map(|rel| self.data_reference(rel))
            .collect()
    }

    /// Embedded videos: video relationships whose target is media data.
    pub fn videos(&self) -> Result<Vec<MediaPart>> {
        let mut videos = Vec::new();
        for data in self.data_references() {
            if !data.is_embedded_video() {
                debug!(
                    "{}: ignoring {:?} relationship {}",
                    self.path, data.kind, data.id
                );
                continue;
            }
            let size = self.container.part_size(&data.path)?;
            videos.push(MediaPart {
                path: data.path,
                content_type: data.content_type.unwrap_or_default(),
                size,
            });
        }
        Ok(videos)
    }

    fn data_reference(&self, rel: &Relationship) -> DataReference {
        if rel.external {
            return DataReference {
                id: rel.id.clone(),
                kind: rel.kind,
                path: String::new(),
                content_type: None,
                is_media_data: false,
            };
        }

        let path = OoxmlContainer::resolve_path(&self.path, &rel.target);
        let content_type = self.content_types.get(&path).map(str::to_string);
        let is_media_data = self.container.exists(&path)
            && content_type
                .as_deref()
                .is_some_and(|ct| !is_xml_content_type(ct));

        DataReference {
            id: rel.id.clone(),
            kind: rel.kind,
            path,
            content_type,
            is_media_data,
        }
    }
}

impl std::fmt::Debug for SlidePart<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidePart")
            .field("path", &self.path)
            .field("relationships", &self.relationships.len())
            .finish()
    }
}

/// Title text of the first shape whose placeholder type is `title`.
///
/// The text is every `a:t` run inside the shape's `p:txBody`, concatenated in
/// document order and left untrimmed. Returns `None` when no title shape
/// exists, or when the first title shape has no text body. Shapes nested in
/// group shapes are considered.
pub fn extract_title(xml: &str) -> Result<Option<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut in_shape = false;
    let mut is_title = false;
    let mut in_tx_body = false;
    let mut has_tx_body = false;
    let mut in_run_text = false;
    let mut text = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => {
                    in_shape = true;
                    is_title = false;
                    in_tx_body = false;
                    has_tx_body = false;
                    text.clear();
                }
                b"ph" if in_shape => is_title = is_title_placeholder(&e),
                b"txBody" if in_shape => {
                    in_tx_body = true;
                    has_tx_body = true;
                }
                b"t" if in_tx_body => in_run_text = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Empty(e)) => match e.local_name().as_ref() {
                b"ph" if in_shape => is_title = is_title_placeholder(&e),
                b"txBody" if in_shape => has_tx_body = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(e)) if in_run_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| Error::XmlParse(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(quick_xml::events::Event::CData(e)) if in_run_text => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"txBody" => in_tx_body = false,
                b"sp" if in_shape => {
                    if is_title {
                        return Ok(has_tx_body.then_some(text));
                    }
                    in_shape = false;
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn is_title_placeholder(e: &quick_xml::events::BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"type" && attr.value.as_ref() == TITLE_PLACEHOLDER)
}
