/// Errors that can occur while reading a Phenix index file
///
/// All variants are structural: the document could not be parsed, or it
/// parsed but does not have the shape of a Phenix index.
#[derive(Debug, thiserror::Error)]
pub enum PhenixError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// An error raised while handling the event starting at `position`
    #[error("at byte {position}: {source}")]
    AtPosition {
        /// Byte offset of the offending event
        position: u64,
        /// Underlying error
        #[source]
        source: Box<PhenixError>,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in an attribute or text run
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// A closing tag did not match the element currently open
    #[error("Unbalanced element: expected </{expected}>, found </{found}>")]
    UnbalancedElement {
        /// Tag of the element on top of the stack
        expected: String,
        /// Tag of the closing event
        found: String,
    },

    /// A closing tag arrived with no element open
    #[error("Unexpected closing tag </{0}> with no open element")]
    UnexpectedClose(String),

    /// The document ended with elements still open
    #[error("Document ended inside <{0}>")]
    UnclosedElement(String),

    /// A second top-level element was found after the root closed
    #[error("Unexpected second root element <{0}>")]
    MultipleRoots(String),

    /// The document contained no elements at all
    #[error("Index document is empty")]
    EmptyDocument,

    /// One of the Images, Plates or Wells sections is absent
    #[error("Index document has no <{0}> section")]
    MissingSection(&'static str),

    /// An indexed element lacks the key it is indexed by
    #[error("<{element}> element is missing required key '{key}'")]
    MissingKey {
        /// Tag of the offending element
        element: String,
        /// Metadata key that was expected
        key: &'static str,
    },
}

impl PhenixError {
    /// The error with any position wrapper removed
    pub fn root_cause(&self) -> &PhenixError {
        match self {
            PhenixError::AtPosition { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
