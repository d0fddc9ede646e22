//! Synthetic PPTX packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const MS_MEDIA_REL: &str = "http://schemas.microsoft.com/office/2007/relationships/media";

/// A data relationship attached to a slide.
#[derive(Debug, Clone)]
pub enum DataRel {
    /// Video relationship to an embedded media part
    Video { content_type: String, size: usize },
    /// Audio relationship to an embedded media part
    Audio { size: usize },
    /// PowerPoint 2010 media relationship to an embedded media part
    Media { size: usize },
    /// Video relationship to an external URL
    ExternalVideo,
    /// Video relationship whose target is an XML part
    VideoToXml,
}

/// One slide of a synthetic presentation.
#[derive(Debug, Clone, Default)]
pub struct SlideSpec {
    pub title: Option<String>,
    pub body: String,
    pub images: Vec<usize>,
    pub data: Vec<DataRel>,
    /// Wrap the title shape in `mc:AlternateContent`, as PowerPoint does for
    /// shapes using 2010+ features.
    pub alternate_content: bool,
}

impl SlideSpec {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn body(mut self, text: &str) -> Self {
        self.body = text.to_string();
        self
    }

    pub fn image(mut self, size: usize) -> Self {
        self.images.push(size);
        self
    }

    pub fn data(mut self, rel: DataRel) -> Self {
        self.data.push(rel);
        self
    }

    /// Put the title in the `mc:Choice` branch, with a differently worded
    /// copy in `mc:Fallback`.
    pub fn title_in_alternate_content(mut self) -> Self {
        self.alternate_content = true;
        self
    }

    /// Slide part XML; its length is the slide size the report shows.
    pub fn xml(&self) -> String {
        let title_shape = |text: &str| {
            format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
                text
            )
        };
        let title = match &self.title {
            Some(t) if self.alternate_content => format!(
                r#"<mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main" Requires="p14">{}</mc:Choice><mc:Fallback>{}</mc:Fallback></mc:AlternateContent>"#,
                title_shape(t),
                title_shape(&format!("{} (fallback)", t))
            ),
            Some(t) => title_shape(t),
            None => String::new(),
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{}" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            REL_NS, title, self.body
        )
    }
}

/// Builder for a presentation package.
#[derive(Debug, Clone, Default)]
pub struct PptxBuilder {
    slides: Vec<SlideSpec>,
    omit_slide_list: bool,
    reverse_slide_list: bool,
    dangling_after: Option<usize>,
    missing_rel_id_after: Option<usize>,
    sections: bool,
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide(mut self, slide: SlideSpec) -> Self {
        self.slides.push(slide);
        self
    }

    /// Leave `p:sldIdLst` out of presentation.xml.
    pub fn without_slide_list(mut self) -> Self {
        self.omit_slide_list = true;
        self
    }

    /// Declare slides in the reverse of their part numbering.
    pub fn reverse_slide_list(mut self) -> Self {
        self.reverse_slide_list = true;
        self
    }

    /// Insert a slide id whose relationship does not exist after `count` slides.
    pub fn dangling_slide_after(mut self, count: usize) -> Self {
        self.dangling_after = Some(count);
        self
    }

    /// Insert a slide id without `r:id` after `count` slides.
    pub fn slide_without_rel_id_after(mut self, count: usize) -> Self {
        self.missing_rel_id_after = Some(count);
        self
    }

    /// Add a PowerPoint 2010 section list (`p14:sectionLst`) in `p:extLst`
    /// that splits the slides over two sections.
    pub fn with_sections(mut self) -> Self {
        self.sections = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
        let mut overrides = vec![(
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"
                .to_string(),
        )];

        parts.push((
            "_rels/.rels".to_string(),
            rels(&[(
                "rId1".to_string(),
                format!("{}/officeDocument", REL_NS),
                "ppt/presentation.xml".to_string(),
                false,
            )])
            .into_bytes(),
        ));

        let mut pres_rels = vec![(
            "rId1".to_string(),
            format!("{}/slideMaster", REL_NS),
            "slideMasters/slideMaster1.xml".to_string(),
            false,
        )];
        let mut slide_entries = Vec::new();
        let mut slide_numbers = Vec::new();

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            let rel_id = format!("rId{}", n + 1);
            pres_rels.push((
                rel_id.clone(),
                format!("{}/slide", REL_NS),
                format!("slides/slide{}.xml", n),
                false,
            ));
            slide_entries.push(format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 255 + n, rel_id));
            slide_numbers.push(255 + n);

            let slide_path = format!("ppt/slides/slide{}.xml", n);
            overrides.push((
                format!("/{}", slide_path),
                "application/vnd.openxmlformats-officedocument.presentationml.slide+xml"
                    .to_string(),
            ));
            parts.push((slide_path, slide.xml().into_bytes()));

            let mut slide_rels = vec![(
                "rId1".to_string(),
                format!("{}/slideLayout", REL_NS),
                "../slideLayouts/slideLayout1.xml".to_string(),
                false,
            )];

            for (k, size) in slide.images.iter().enumerate() {
                let name = format!("image{}_{}.png", n, k + 1);
                slide_rels.push((
                    format!("rId{}", slide_rels.len() + 1),
                    format!("{}/image", REL_NS),
                    format!("../media/{}", name),
                    false,
                ));
                parts.push((format!("ppt/media/{}", name), vec![0x89; *size]));
            }

            for (k, data) in slide.data.iter().enumerate() {
                let id = format!("rId{}", slide_rels.len() + 1);
                match data {
                    DataRel::Video { content_type, size } => {
                        let name = format!("media{}_{}.bin", n, k + 1);
                        overrides.push((format!("/ppt/media/{}", name), content_type.clone()));
                        parts.push((format!("ppt/media/{}", name), vec![0; *size]));
                        slide_rels.push((
                            id,
                            format!("{}/video", REL_NS),
                            format!("../media/{}", name),
                            false,
                        ));
                    }
                    DataRel::Audio { size } => {
                        let name = format!("media{}_{}.mp3", n, k + 1);
                        parts.push((format!("ppt/media/{}", name), vec![0; *size]));
                        slide_rels.push((
                            id,
                            format!("{}/audio", REL_NS),
                            format!("../media/{}", name),
                            false,
                        ));
                    }
                    DataRel::Media { size } => {
                        let name = format!("media{}_{}.mp4", n, k + 1);
                        parts.push((format!("ppt/media/{}", name), vec![0; *size]));
                        slide_rels.push((
                            id,
                            MS_MEDIA_REL.to_string(),
                            format!("../media/{}", name),
                            false,
                        ));
                    }
                    DataRel::ExternalVideo => {
                        slide_rels.push((
                            id,
                            format!("{}/video", REL_NS),
                            "https://example.com/watch?v=clip".to_string(),
                            true,
                        ));
                    }
                    DataRel::VideoToXml => {
                        let name = format!("data{}_{}.xml", n, k + 1);
                        parts.push((format!("ppt/media/{}", name), b"<data/>".to_vec()));
                        slide_rels.push((
                            id,
                            format!("{}/video", REL_NS),
                            format!("../media/{}", name),
                            false,
                        ));
                    }
                }
            }

            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                rels(&slide_rels).into_bytes(),
            ));
        }

        if self.reverse_slide_list {
            slide_entries.reverse();
        }
        if let Some(after) = self.dangling_after {
            slide_entries.insert(after, r#"<p:sldId id="999" r:id="rId99"/>"#.to_string());
        }
        if let Some(after) = self.missing_rel_id_after {
            slide_entries.insert(after, r#"<p:sldId id="998"/>"#.to_string());
        }

        let slide_list = if self.omit_slide_list {
            String::new()
        } else {
            format!("<p:sldIdLst>{}</p:sldIdLst>", slide_entries.concat())
        };
        let ext_list = if self.sections {
            let (first, rest) = slide_numbers.split_at(slide_numbers.len().min(1));
            let section = |name: &str, guid: &str, ids: &[usize]| {
                let ids: String = ids
                    .iter()
                    .map(|id| format!(r#"<p14:sldId id="{}"/>"#, id))
                    .collect();
                format!(
                    r#"<p14:section name="{}" id="{}"><p14:sldIdLst>{}</p14:sldIdLst></p14:section>"#,
                    name, guid, ids
                )
            };
            format!(
                r#"<p:extLst><p:ext uri="{{521415D9-36F7-43E2-AB2F-B90AF26B5E84}}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main">{}{}</p14:sectionLst></p:ext></p:extLst>"#,
                section("Default Section", "{8D1D3F3A-6A11-4C0B-9E63-0C2A1B7E5D01}", first),
                section("Appendix", "{2B7C9E14-3F5D-4E8A-A1C6-7D9E0F1A2B3C}", rest)
            )
        } else {
            String::new()
        };
        parts.push((
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="{}" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{}<p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/>{}</p:presentation>"#,
                REL_NS, slide_list, ext_list
            )
            .into_bytes(),
        ));
        parts.push((
            "ppt/_rels/presentation.xml.rels".to_string(),
            rels(&pres_rels).into_bytes(),
        ));

        let overrides: String = overrides
            .iter()
            .map(|(part, ct)| format!(r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct))
            .collect();
        parts.push((
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="mp3" ContentType="audio/mpeg"/><Default Extension="mp4" ContentType="video/mp4"/>{}</Types>"#,
                overrides
            )
            .into_bytes(),
        ));

        zip_parts(&parts)
    }

    /// Build the package and write it into `dir`.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Zip the given parts in order.
pub fn zip_parts(parts: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, data) in parts {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

fn rels(entries: &[(String, String, String, bool)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, rel_type, target, external)| {
            let mode = if *external {
                r#" TargetMode="External""#
            } else {
                ""
            };
            format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                id, rel_type, target, mode
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        body
    )
}
