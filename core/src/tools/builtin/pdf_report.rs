//! Structured view of the extractor's Markdown report
//!
//! The reference extractor prints one Markdown document per PDF:
//!
//! ~~~text
//! # PDF Extraction
//!
//! ## Source
//! - Path: paper.pdf
//! - Engine: pymupdf
//! - Pages: 2
//!
//! ## Metadata
//! - title: A Paper
//!
//! ## Text
//! ```text
//! ...
//! ```
//!
//! ## Images
//! ### Image 1 (page 1, png)
//! ```text
//! data:image/png;base64,...
//! ```
//!
//! ## Notes
//! - PyMuPDF unavailable: ...
//! ~~~
//!
//! Parsing is best effort. Anything that does not look like this report
//! yields `None` and the caller keeps only the plain text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TITLE: &str = "# PDF Extraction";
const TEXT_OPEN: &str = "\n## Text\n```text\n";
const IMAGES_HEADING: &str = "\n## Images\n";
const NOTES_HEADING: &str = "\n## Notes\n";
const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub path: String,
    pub engine: String,
    pub pages: usize,
    pub metadata: BTreeMap<String, String>,
    pub text: String,
    pub images: Vec<ReportImage>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportImage {
    /// 1-based position in the report
    pub index: usize,
    /// Page the image was found on, when the extractor knew it
    pub page: Option<usize>,
    pub ext: String,
    pub data_uri: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Source,
    Metadata,
    Other,
}

impl ExtractionReport {
    /// Parse extractor output; `None` when it is not a report
    pub fn parse(output: &str) -> Option<Self> {
        let output = output.trim();
        if !output.starts_with(TITLE) {
            return None;
        }

        let text_heading = output.find(TEXT_OPEN)?;
        let text_start = text_heading + TEXT_OPEN.len();
        let images_heading = output.rfind(IMAGES_HEADING)?;
        if images_heading < text_start {
            return None;
        }

        let text = parse_fenced(&output[text_start..images_heading])?;

        let mut report = ExtractionReport {
            path: String::new(),
            engine: String::new(),
            pages: 0,
            metadata: BTreeMap::new(),
            text: text.to_string(),
            images: Vec::new(),
            notes: Vec::new(),
        };
        report.parse_header(&output[..text_heading])?;

        let tail = &output[images_heading + IMAGES_HEADING.len()..];
        let (images, notes) = match tail.rfind(NOTES_HEADING) {
            Some(pos) => (&tail[..pos], Some(&tail[pos + NOTES_HEADING.len()..])),
            None => (tail, None),
        };
        report.images = parse_images(images);
        if let Some(notes) = notes {
            report.notes = list_items(notes);
        }

        Some(report)
    }

    fn parse_header(&mut self, header: &str) -> Option<()> {
        let mut section = Section::Preamble;
        // Metadata values may span lines; later lines extend the last key
        let mut last_key: Option<String> = None;
        let mut blank_lines = 0;

        for line in header.lines() {
            match line.trim_end() {
                "## Source" => section = Section::Source,
                "## Metadata" => section = Section::Metadata,
                l if l.starts_with("## ") => section = Section::Other,
                l => {
                    let Some(item) = l.strip_prefix("- ") else {
                        if section != Section::Metadata {
                            continue;
                        }
                        if l.is_empty() {
                            blank_lines += 1;
                        } else if let Some(value) =
                            last_key.as_ref().and_then(|key| self.metadata.get_mut(key))
                        {
                            push_continuation(value, blank_lines, l);
                            blank_lines = 0;
                        }
                        continue;
                    };
                    blank_lines = 0;
                    last_key = None;

                    let Some((key, value)) = item.split_once(':') else {
                        continue;
                    };
                    let value = value.trim().to_string();

                    match (section, key.trim()) {
                        (Section::Source, "Path") => self.path = value,
                        (Section::Source, "Engine") => self.engine = value,
                        (Section::Source, "Pages") => self.pages = value.parse().unwrap_or(0),
                        (Section::Metadata, key) => {
                            self.metadata.insert(key.to_string(), value);
                            last_key = Some(key.to_string());
                        }
                        _ => {}
                    }
                    continue;
                }
            }
            last_key = None;
            blank_lines = 0;
        }

        if self.engine.is_empty() {
            None
        } else {
            Some(())
        }
    }
}

/// Body of a fenced block whose opening fence was already consumed
fn parse_fenced(region: &str) -> Option<&str> {
    let body = region.trim_end_matches('\n').strip_suffix(FENCE)?;
    Some(body.strip_suffix('\n').unwrap_or(body))
}

fn parse_images(section: &str) -> Vec<ReportImage> {
    let mut images = Vec::new();
    let mut current: Option<ReportImage> = None;

    for line in section.lines() {
        let line = line.trim();
        if let Some(heading) = line.strip_prefix("### Image ") {
            if let Some(image) = current.take() {
                images.push(image);
            }
            current = Some(parse_image_heading(heading, images.len() + 1));
        } else if line.starts_with("data:") {
            if let Some(image) = current.as_mut() {
                image.data_uri = line.to_string();
            }
        }
    }

    if let Some(image) = current {
        images.push(image);
    }

    images
}

/// `"3 (page 2, png)"`
fn parse_image_heading(heading: &str, fallback_index: usize) -> ReportImage {
    let (index, details) = match heading.split_once(' ') {
        Some((index, rest)) => (index.parse().unwrap_or(fallback_index), rest),
        None => (heading.parse().unwrap_or(fallback_index), ""),
    };

    let details = details.trim().trim_start_matches('(').trim_end_matches(')');
    let (page, ext) = match details.split_once(',') {
        Some((page, ext)) => (page, ext.trim()),
        None => (details, "bin"),
    };
    let page = page.trim().strip_prefix("page ").and_then(|p| p.parse().ok());

    ReportImage {
        index,
        page,
        ext: ext.to_string(),
        data_uri: String::new(),
    }
}

/// `- ` items of a list section; unprefixed lines continue the previous item
fn list_items(section: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut blank_lines = 0;

    for line in section.lines() {
        let line = line.trim_end();
        if let Some(item) = line.trim_start().strip_prefix("- ") {
            items.push(item.to_string());
            blank_lines = 0;
        } else if line.is_empty() {
            blank_lines += 1;
        } else if let Some(last) = items.last_mut() {
            push_continuation(last, blank_lines, line);
            blank_lines = 0;
        }
    }

    items.retain(|item| item != "None");
    items
}

fn push_continuation(value: &mut String, blank_lines: usize, line: &str) {
    for _ in 0..=blank_lines {
        value.push('\n');
    }
    value.push_str(line);
}
