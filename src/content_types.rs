//! `[Content_Types].xml` lookup.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use std::collections::HashMap;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Declared content types of a package's parts.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Extension (lowercase, no dot) to content type
    defaults: HashMap<String, String>,
    /// Part name (lowercase, no leading slash) to content type
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Read the content types part of a container.
    pub fn read(container: &OoxmlContainer) -> Result<Self> {
        let xml = container.read_xml(CONTENT_TYPES_PART)?;
        Self::parse(&xml)
    }

    /// Parse `[Content_Types].xml` content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e))
                | Ok(quick_xml::events::Event::Start(e)) => {
                    let name = e.name();
                    let local_name = name.local_name();
                    let is_default = local_name.as_ref() == b"Default";
                    let is_override = local_name.as_ref() == b"Override";

                    if is_default || is_override {
                        let mut key = String::new();
                        let mut content_type = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"Extension" | b"PartName" => {
                                    key = String::from_utf8_lossy(&attr.value).to_lowercase();
                                }
                                b"ContentType" => {
                                    content_type =
                                        String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !key.is_empty() && !content_type.is_empty() {
                            if is_default {
                                types.defaults.insert(key, content_type);
                            } else {
                                let part = key.trim_start_matches('/').to_string();
                                types.overrides.insert(part, content_type);
                            }
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlParse(format!("{}: {}", CONTENT_TYPES_PART, e)))
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type of a part: an `Override` for the part name wins over the
    /// `Default` for its extension. Matching is case-insensitive.
    pub fn get(&self, part: &str) -> Option<&str> {
        let part = part.trim_start_matches('/').to_lowercase();
        if let Some(ct) = self.overrides.get(&part) {
            return Some(ct.as_str());
        }

        let file_name = part.rsplit('/').next().unwrap_or(&part);
        let (_, ext) = file_name.rsplit_once('.')?;
        self.defaults.get(ext).map(String::as_str)
    }
}

/// Whether a content type denotes an XML part rather than binary data.
pub fn is_xml_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.ends_with("+xml") || ct.ends_with("/xml")
}
