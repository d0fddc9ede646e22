//! ZIP container abstraction for OOXML packages.

use crate::error::{Error, Result};
use log::debug;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

const TRANSITIONAL_RELS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/";
const STRICT_RELS: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships/";
const MS_MEDIA_REL: &str = "http://schemas.microsoft.com/office/2007/relationships/media";

/// What a relationship points at, classified from its type URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// Main document part of the package
    OfficeDocument,
    /// A presentation slide
    Slide,
    /// An image part
    Image,
    /// Video data
    Video,
    /// Audio data
    Audio,
    /// Generic media data (PowerPoint 2010+ embedded media)
    Media,
    /// Anything else
    Other,
}

impl RelationshipKind {
    /// Classify a relationship type URI.
    pub fn from_type_uri(uri: &str) -> Self {
        if uri == MS_MEDIA_REL {
            return RelationshipKind::Media;
        }

        let suffix = uri
            .strip_prefix(TRANSITIONAL_RELS)
            .or_else(|| uri.strip_prefix(STRICT_RELS));

        match suffix {
            Some("officeDocument") => RelationshipKind::OfficeDocument,
            Some("slide") => RelationshipKind::Slide,
            Some("image") => RelationshipKind::Image,
            Some("video") => RelationshipKind::Video,
            Some("audio") => RelationshipKind::Audio,
            _ => RelationshipKind::Other,
        }
    }

    /// Whether this kind references a data part (audio, video or media)
    /// rather than owning a child part.
    pub fn is_data_reference(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Video | RelationshipKind::Audio | RelationshipKind::Media
        )
    }
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Classified relationship type
    pub kind: RelationshipKind,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Relationships parsed from a .rels file, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Iterate relationships of the given kind, in document order.
    pub fn of_kind(&self, kind: RelationshipKind) -> impl Iterator<Item = &Relationship> {
        self.entries.iter().filter(move |r| r.kind == kind)
    }

    /// Iterate all relationships in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a relationship. A later duplicate id replaces the index entry.
    pub fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), self.entries.len());
        self.entries.push(rel);
    }
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Parts are normally UTF-8, but some producers write UTF-16 with a BOM.
/// The declaration of a transcoded UTF-16 document is rewritten so quick-xml
/// does not try to decode the already-decoded text a second time.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| fix_encoding_declaration(&s));
    }
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| fix_encoding_declaration(&s));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn fix_encoding_declaration(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    match content.find("?>") {
        Some(end) => {
            let decl = content[..end + 2]
                .replace("\"UTF-16\"", "\"UTF-8\"")
                .replace("'UTF-16'", "'UTF-8'")
                .replace("\"utf-16\"", "\"UTF-8\"")
                .replace("'utf-16'", "'UTF-8'");
            format!("{}{}", decl, &content[end + 2..])
        }
        None => content.to_string(),
    }
}

/// OOXML container abstraction over a ZIP archive.
///
/// Opened read-only. Part names are zip entry names without a leading slash
/// (e.g. `ppt/slides/slide1.xml`) and compare case-insensitively.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    /// Lowercased entry name -> entry index
    folded_names: HashMap<String, usize>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pptsize::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("deck.pptx")?;
    /// println!("{} bytes", container.part_size("ppt/presentation.xml")?);
    /// # Ok::<(), pptsize::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        debug!("opened package with {} entries", archive.len());

        let mut folded_names = HashMap::with_capacity(archive.len());
        for idx in 0..archive.len() {
            if let Some(name) = archive.name_for_index(idx) {
                folded_names.entry(name.to_lowercase()).or_insert(idx);
            }
        }

        Ok(Self {
            archive: RefCell::new(archive),
            folded_names,
        })
    }

    /// Archive index of a part, matching the exact name first and the
    /// case-folded name otherwise.
    fn index_of(&self, path: &str) -> Option<usize> {
        self.archive
            .borrow()
            .index_for_name(path)
            .or_else(|| self.folded_names.get(&path.to_lowercase()).copied())
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let idx = self
            .index_of(path)
            .ok_or_else(|| Error::MissingComponent(path.to_string()))?;
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_index(idx)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Uncompressed size of a part in bytes.
    ///
    /// The entry is opened only long enough to read its length.
    pub fn part_size(&self, path: &str) -> Result<u64> {
        let idx = self
            .index_of(path)
            .ok_or_else(|| Error::MissingComponent(path.to_string()))?;
        let mut archive = self.archive.borrow_mut();
        let file = archive.by_index(idx)?;
        Ok(file.size())
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.index_of(path).is_some()
    }

    /// Read and parse the relationships of a part.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        self.parse_relationships(&Self::rels_path(part_path))
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.parse_relationships("_rels/.rels")
    }

    /// Path of the .rels part belonging to `part_path`.
    ///
    /// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
    pub fn rels_path(part_path: &str) -> String {
        if part_path.is_empty() || part_path == "/" {
            return "_rels/.rels".to_string();
        }
        match part_path.rfind('/') {
            Some(idx) => format!("{}/_rels/{}.rels", &part_path[..idx], &part_path[idx + 1..]),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Parse a relationships part. A missing .rels part means no relationships.
    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(Error::MissingComponent(_)) => return Ok(Relationships::new()),
            Err(e) => return Err(e),
        };

        if content.trim().is_empty() {
            return Ok(Relationships::new());
        }

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            b"TargetMode" => {
                                external = String::from_utf8_lossy(&attr.value)
                                    .eq_ignore_ascii_case("external")
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            kind: RelationshipKind::from_type_uri(&rel_type),
                            target,
                            external,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(format!("{}: {}", rels_path, e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relationship target against the part that owns the relationship.
    ///
    /// Targets are URIs, so `%xx` escapes are decoded first. A target that is
    /// not valid UTF-8 once decoded is used as written.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        let relative = urlencoding::decode(relative).unwrap_or(Cow::Borrowed(relative));
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative.as_ref()).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}
