//! Streaming reader for Phenix index files using quick-xml
//!
//! The document is pulled event by event and fed to an
//! [`ElementTreeBuilder`]; the raw document is never buffered as a whole.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::builder::ElementTreeBuilder;
use super::element::ElementTree;
use super::PhenixError;

/// Default input buffer size for index parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Default index file name written by the Phenix/Opera software
pub const DEFAULT_INDEX_FILE_NAME: &str = "Index.idx.xml";

/// Streaming parser for Phenix index files
pub struct IndexStreamer<R: BufRead> {
    reader: Reader<R>,
    builder: ElementTreeBuilder,
    events: usize,
}

impl<R: BufRead> IndexStreamer<R> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        Self {
            reader: xml_reader,
            builder: ElementTreeBuilder::new(),
            events: 0,
        }
    }

    /// Consume the whole document and return the element tree
    ///
    /// Errors raised while handling an event carry the byte offset where
    /// that event started.
    pub fn parse(mut self) -> Result<ElementTree, PhenixError> {
        let mut buf = Vec::new();
        loop {
            let position = self.reader.buffer_position() as u64;
            match self.next_event(&mut buf) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    return Err(PhenixError::AtPosition {
                        position,
                        source: Box::new(source),
                    })
                }
            }
            buf.clear();
        }

        log::debug!("Index parsed: {} XML events", self.events);
        self.builder.finish()
    }

    /// Read one event into the builder; `false` once the document ends
    fn next_event(&mut self, buf: &mut Vec<u8>) -> Result<bool, PhenixError> {
        let event = self.reader.read_event_into(buf)?;
        self.events += 1;
        match event {
            Event::Start(ref e) => {
                let tag = element_name(e)?;
                self.builder.start_element(&tag, read_attributes(e)?)?;
            }
            Event::Empty(ref e) => {
                let tag = element_name(e)?;
                self.builder.start_element(&tag, read_attributes(e)?)?;
                self.builder.end_element(&tag)?;
            }
            Event::Text(ref t) => {
                self.builder.characters(&t.unescape()?);
            }
            Event::CData(ref c) => {
                self.builder.characters(std::str::from_utf8(c)?);
            }
            Event::End(ref e) => {
                let name = e.name();
                self.builder.end_element(std::str::from_utf8(name.as_ref())?)?;
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
        Ok(true)
    }
}

impl IndexStreamer<BufReader<File>> {
    /// Open an index file for streaming with default buffer size (64KB)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PhenixError> {
        Self::open_with_buffer_size(path, DEFAULT_INPUT_BUFFER_SIZE)
    }

    /// Open an index file for streaming with custom buffer size
    pub fn open_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> Result<Self, PhenixError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::with_capacity(buffer_size, file);
        Ok(Self::new(reader))
    }
}

/// Parse an index document from any buffered reader
pub fn parse_index<R: BufRead>(reader: R) -> Result<ElementTree, PhenixError> {
    IndexStreamer::new(reader).parse()
}

/// Parse an index file from disk
pub fn parse_index_file<P: AsRef<Path>>(path: P) -> Result<ElementTree, PhenixError> {
    IndexStreamer::open(path)?.parse()
}

fn element_name(e: &BytesStart) -> Result<String, PhenixError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

/// Collect all attributes of an open tag as unescaped strings
fn read_attributes(e: &BytesStart) -> Result<Vec<(String, String)>, PhenixError> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(raw).map_err(quick_xml::Error::from)?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}
