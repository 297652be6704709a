//! Pull-style cursor over a POM's XML events
//!
//! Wraps a quick-xml reader and keeps track of byte offsets into the source,
//! so callers can either descend into an element, skip it as an opaque
//! subtree, or capture the exact span of a text-only element.

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::pom::error::DocumentError;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Content of a text-only element such as `<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Leaf {
    /// Byte span of the value text in the source
    pub(crate) span: Range<usize>,
    /// Trimmed value with entities unescaped
    pub(crate) value: String,
}

pub(crate) struct XmlCursor<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    /// Byte offset just past the last event read
    position: usize,
}

impl<'a> XmlCursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            reader: Reader::from_str(source),
            position: 0,
        }
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    /// Read the next event
    pub(crate) fn next(&mut self) -> Result<Event<'a>, DocumentError> {
        let event = self.reader.read_event().map_err(|source| DocumentError::Xml {
            position: self.reader.error_position() as usize,
            source,
        })?;
        self.position = self.reader.buffer_position() as usize;
        Ok(event)
    }

    /// Skip the rest of the element whose start tag was just read.
    ///
    /// On exit the cursor is positioned after the matching end tag.
    pub(crate) fn skip_element(&mut self, name: &str) -> Result<(), DocumentError> {
        let mut depth = 1usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => return Err(DocumentError::UnexpectedEof(name.to_string())),
                _ => {}
            }
        }
    }

    /// Read the content of the text-only element whose start tag was just read.
    ///
    /// The value is the first run of non-blank text (or CDATA content).
    /// Comments and any text after them stay outside the span, so they
    /// survive a rewrite and never leak into the value.
    pub(crate) fn leaf(&mut self, name: &str) -> Result<Leaf, DocumentError> {
        let start = self.position;
        let mut first_text: Option<Range<usize>> = None;
        let mut value: Option<(Range<usize>, String)> = None;
        loop {
            let before = self.position;
            match self.next()? {
                Event::Text(_) => {
                    let end = self.source[before..]
                        .find('<')
                        .map_or(self.source.len(), |offset| before + offset);
                    let raw = &self.source[before..end];
                    first_text.get_or_insert(before..end);
                    if value.is_none() && !raw.trim().is_empty() {
                        let text = unescape(raw).map_err(|source| DocumentError::Escape {
                            position: before,
                            source,
                        })?;
                        value = Some((before..end, text.trim().to_string()));
                    }
                }
                Event::CData(content) => {
                    let inner = before + CDATA_OPEN.len()..self.position - CDATA_CLOSE.len();
                    let text = String::from_utf8_lossy(&content).into_owned();
                    if value.is_none() && !text.trim().is_empty() {
                        value = Some((inner, text.trim().to_string()));
                    }
                }
                Event::End(_) => {
                    return Ok(match value {
                        Some((span, value)) => Leaf { span, value },
                        None => Leaf {
                            span: first_text.unwrap_or(start..start),
                            value: String::new(),
                        },
                    });
                }
                Event::Start(_) | Event::Empty(_) => {
                    return Err(DocumentError::NotALeaf(name.to_string()));
                }
                Event::Eof => return Err(DocumentError::UnexpectedEof(name.to_string())),
                _ => {}
            }
        }
    }

    /// Read the trimmed, unescaped text of the element whose start tag was just read
    pub(crate) fn leaf_text(&mut self, name: &str) -> Result<String, DocumentError> {
        Ok(self.leaf(name)?.value)
    }
}

/// Local name of an element, without any namespace prefix
pub(crate) fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}
