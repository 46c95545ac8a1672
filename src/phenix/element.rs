//! Element records reconstructed from the index document
//!
//! Elements live in a flat arena ([`ElementTree`]) and refer to their parent
//! by [`ElementId`]. Each element carries an [`ElementKind`] chosen from its
//! tag when it is opened; the kind decides how closed children are folded
//! into it.

use std::collections::HashMap;

use super::PhenixError;

/// Index of an element inside an [`ElementTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Position of the element in document (open-tag) order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed set of element variants, selected by tag name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ElementKind {
    /// Any element without special folding rules
    #[default]
    Generic,
    /// The document element; keeps the three top-level sections
    Root {
        /// The `<Images>` section, once closed
        images: Option<ElementId>,
        /// The `<Plates>` section, once closed
        plates: Option<ElementId>,
        /// The `<Wells>` section, once closed
        wells: Option<ElementId>,
    },
    /// `<Images>`: image id -> element
    Images {
        /// Images keyed by their `id`
        images: HashMap<String, ElementId>,
    },
    /// `<Plates>`: plate name -> element
    Plates {
        /// Plates keyed by their `Name`
        plates: HashMap<String, ElementId>,
    },
    /// `<Wells>`: well id -> element
    Wells {
        /// Wells keyed by their `id`
        wells: HashMap<String, ElementId>,
    },
    /// `<Image>`, either a full record or a reference inside a well
    Image,
    /// `<Well>`, owning the ids of its images in document order
    Well {
        /// Referenced image ids
        image_ids: Vec<String>,
    },
    /// `<Plate>`, owning the ids of its wells in document order
    Plate {
        /// Referenced well ids
        well_ids: Vec<String>,
    },
}

impl ElementKind {
    /// Pick the variant for a non-root element from its tag name
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "Images" => ElementKind::Images {
                images: HashMap::new(),
            },
            "Plates" => ElementKind::Plates {
                plates: HashMap::new(),
            },
            "Wells" => ElementKind::Wells {
                wells: HashMap::new(),
            },
            "Image" => ElementKind::Image,
            "Well" => ElementKind::Well {
                image_ids: Vec::new(),
            },
            "Plate" => ElementKind::Plate {
                well_ids: Vec::new(),
            },
            _ => ElementKind::Generic,
        }
    }

    /// Variant used for the document element, whatever its tag
    pub fn root() -> Self {
        ElementKind::Root {
            images: None,
            plates: None,
            wells: None,
        }
    }
}

/// A node reconstructed from one XML element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    kind: ElementKind,
    parent: Option<ElementId>,
    content: String,
    metadata: HashMap<String, String>,
}

impl Element {
    /// Create an element from its open tag; attributes seed the metadata
    pub fn new<I>(tag: &str, kind: ElementKind, parent: Option<ElementId>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            tag: tag.to_string(),
            kind,
            parent,
            content: String::new(),
            metadata: attributes.into_iter().collect(),
        }
    }

    /// Tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Variant and its collected indices
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Parent element, `None` for the root
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Concatenated, trimmed text content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Attributes plus text-only children folded in on close
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Look up one metadata value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The `id` metadata value, if any
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.content.push_str(text.trim());
    }

    fn require(&self, key: &'static str) -> Result<&str, PhenixError> {
        self.get(key).ok_or_else(|| PhenixError::MissingKey {
            element: self.tag.clone(),
            key,
        })
    }

    /// Fold a closed child into this element
    ///
    /// Section and container variants record the child in their index;
    /// everything else stores the child's text under its tag.
    pub(crate) fn fold(&mut self, child_id: ElementId, child: &Element) -> Result<(), PhenixError> {
        match (&mut self.kind, child.tag.as_str()) {
            (ElementKind::Root { images, .. }, "Images") => *images = Some(child_id),
            (ElementKind::Root { plates, .. }, "Plates") => *plates = Some(child_id),
            (ElementKind::Root { wells, .. }, "Wells") => *wells = Some(child_id),
            (ElementKind::Images { images }, "Image") => {
                images.insert(child.require("id")?.to_string(), child_id);
            }
            (ElementKind::Plates { plates }, "Plate") => {
                plates.insert(child.require("Name")?.to_string(), child_id);
            }
            (ElementKind::Wells { wells }, "Well") => {
                wells.insert(child.require("id")?.to_string(), child_id);
            }
            (ElementKind::Well { image_ids }, "Image") => {
                image_ids.push(child.require("id")?.to_string());
            }
            (ElementKind::Plate { well_ids }, "Well") => {
                well_ids.push(child.require("id")?.to_string());
            }
            _ => {
                self.metadata
                    .insert(child.tag.clone(), child.content.clone());
            }
        }
        Ok(())
    }
}

/// Arena holding every element of one parsed document
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    elements: Vec<Element>,
}

impl ElementTree {
    pub(crate) fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// The document element
    pub fn root(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Element by id
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tree has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in document order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId(index), element))
    }
}
