//! Plates, wells and images extracted from a parsed index
//!
//! [`Hierarchy::from_tree`] looks up the three top-level sections of the
//! root element and copies them into id-keyed lookup tables. Nothing is
//! recomputed; derived values such as well names are computed on demand by
//! the record accessors.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::element::{Element, ElementId, ElementKind, ElementTree};
use super::PhenixError;

/// Error reading a typed value out of an element's metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// The key is not present
    #[error("missing attribute '{0}'")]
    Missing(String),

    /// The value could not be interpreted
    #[error("invalid value '{value}' for attribute '{key}'")]
    Invalid {
        /// Metadata key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Identifies one imaged field: the `(FieldID, PlaneID)` pair
///
/// Ordering is numeric on field then plane. Displayed as two zero-padded
/// integers joined by a hyphen, e.g. `03-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// `FieldID` attribute
    pub field: u32,
    /// `PlaneID` attribute, 1 when absent
    pub plane: u32,
}

impl FieldKey {
    /// Create a field key
    pub fn new(field: u32, plane: u32) -> Self {
        Self { field, plane }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.field, self.plane)
    }
}

/// Well name from 1-based row and column, e.g. row 2 col 3 -> `B03`
pub fn well_name(row: u32, col: u32) -> Result<String, AttributeError> {
    if !(1..=26).contains(&row) {
        return Err(AttributeError::Invalid {
            key: "Row".to_string(),
            value: row.to_string(),
        });
    }
    let letter = char::from(b'A' + (row - 1) as u8);
    Ok(format!("{letter}{col:02}"))
}

fn require<'a>(metadata: &'a HashMap<String, String>, key: &str) -> Result<&'a str, AttributeError> {
    metadata
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| AttributeError::Missing(key.to_string()))
}

fn parse_number(metadata: &HashMap<String, String>, key: &str) -> Result<u32, AttributeError> {
    let value = require(metadata, key)?;
    value.trim().parse().map_err(|_| AttributeError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn well_name_of(metadata: &HashMap<String, String>) -> Result<String, AttributeError> {
    well_name(parse_number(metadata, "Row")?, parse_number(metadata, "Col")?)
}

/// One acquired image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    id: String,
    metadata: HashMap<String, String>,
}

impl Image {
    /// Create an image record from its metadata
    pub fn new(id: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            id: id.into(),
            metadata,
        }
    }

    /// Unique image id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All metadata values
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Look up one metadata value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Image file name (`URL`)
    pub fn url(&self) -> Option<&str> {
        self.get("URL")
    }

    /// `ChannelName` with all spaces removed
    pub fn channel_name(&self) -> Result<String, AttributeError> {
        Ok(require(&self.metadata, "ChannelName")?.replace(' ', ""))
    }

    /// Well name computed from `Row` and `Col`
    pub fn well_name(&self) -> Result<String, AttributeError> {
        well_name_of(&self.metadata)
    }

    /// Field key from `FieldID` and `PlaneID` (default 1)
    pub fn field_key(&self) -> Result<FieldKey, AttributeError> {
        let field = parse_number(&self.metadata, "FieldID")?;
        let plane = if self.metadata.contains_key("PlaneID") {
            parse_number(&self.metadata, "PlaneID")?
        } else {
            1
        };
        Ok(FieldKey::new(field, plane))
    }
}

/// One well with its images in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Well {
    id: String,
    metadata: HashMap<String, String>,
    image_ids: Vec<String>,
}

impl Well {
    /// Create a well record
    pub fn new(
        id: impl Into<String>,
        metadata: HashMap<String, String>,
        image_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            metadata,
            image_ids,
        }
    }

    /// Unique well id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All metadata values
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Ids of the images acquired in this well
    pub fn image_ids(&self) -> &[String] {
        &self.image_ids
    }

    /// Well name computed from `Row` and `Col`
    pub fn well_name(&self) -> Result<String, AttributeError> {
        well_name_of(&self.metadata)
    }
}

/// One plate with its wells in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plate {
    name: String,
    metadata: HashMap<String, String>,
    well_ids: Vec<String>,
}

impl Plate {
    /// Create a plate record
    pub fn new(
        name: impl Into<String>,
        metadata: HashMap<String, String>,
        well_ids: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            well_ids,
        }
    }

    /// Plate name, used as its identity
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All metadata values
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Ids of the wells on this plate
    pub fn well_ids(&self) -> &[String] {
        &self.well_ids
    }
}

/// Lookup tables for the three top-level sections of an index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    images: HashMap<String, Image>,
    plates: BTreeMap<String, Plate>,
    wells: HashMap<String, Well>,
}

impl Hierarchy {
    /// Assemble a hierarchy from already built records
    pub fn new(
        images: impl IntoIterator<Item = Image>,
        plates: impl IntoIterator<Item = Plate>,
        wells: impl IntoIterator<Item = Well>,
    ) -> Self {
        Self {
            images: images.into_iter().map(|i| (i.id.clone(), i)).collect(),
            plates: plates.into_iter().map(|p| (p.name.clone(), p)).collect(),
            wells: wells.into_iter().map(|w| (w.id.clone(), w)).collect(),
        }
    }

    /// Extract the Images, Plates and Wells sections of a parsed index
    pub fn from_tree(tree: &ElementTree) -> Result<Self, PhenixError> {
        let root = tree.root().ok_or(PhenixError::EmptyDocument)?;
        let ElementKind::Root {
            images,
            plates,
            wells,
        } = root.kind()
        else {
            return Err(PhenixError::MissingSection("Images"));
        };

        let images_section = section(tree, *images, "Images")?;
        let plates_section = section(tree, *plates, "Plates")?;
        let wells_section = section(tree, *wells, "Wells")?;

        let mut hierarchy = Hierarchy::default();

        if let ElementKind::Images { images } = images_section.kind() {
            for (id, element) in resolve(tree, images) {
                hierarchy
                    .images
                    .insert(id.clone(), Image::new(id.clone(), element.metadata().clone()));
            }
        }

        if let ElementKind::Plates { plates } = plates_section.kind() {
            for (name, element) in resolve(tree, plates) {
                let well_ids = match element.kind() {
                    ElementKind::Plate { well_ids } => well_ids.clone(),
                    _ => Vec::new(),
                };
                hierarchy.plates.insert(
                    name.clone(),
                    Plate::new(name.clone(), element.metadata().clone(), well_ids),
                );
            }
        }

        if let ElementKind::Wells { wells } = wells_section.kind() {
            for (id, element) in resolve(tree, wells) {
                let image_ids = match element.kind() {
                    ElementKind::Well { image_ids } => image_ids.clone(),
                    _ => Vec::new(),
                };
                hierarchy.wells.insert(
                    id.clone(),
                    Well::new(id.clone(), element.metadata().clone(), image_ids),
                );
            }
        }

        log::info!(
            "Index contains {} plates, {} wells, {} images",
            hierarchy.plates.len(),
            hierarchy.wells.len(),
            hierarchy.images.len()
        );
        Ok(hierarchy)
    }

    /// Images keyed by id
    pub fn images(&self) -> &HashMap<String, Image> {
        &self.images
    }

    /// Plates keyed by name, in sorted name order
    pub fn plates(&self) -> &BTreeMap<String, Plate> {
        &self.plates
    }

    /// Wells keyed by id
    pub fn wells(&self) -> &HashMap<String, Well> {
        &self.wells
    }

    /// Image by id
    pub fn image(&self, id: &str) -> Option<&Image> {
        self.images.get(id)
    }

    /// Well by id
    pub fn well(&self, id: &str) -> Option<&Well> {
        self.wells.get(id)
    }

    /// Plate by name
    pub fn plate(&self, name: &str) -> Option<&Plate> {
        self.plates.get(name)
    }
}

fn section<'a>(
    tree: &'a ElementTree,
    id: Option<ElementId>,
    name: &'static str,
) -> Result<&'a Element, PhenixError> {
    id.and_then(|id| tree.get(id))
        .ok_or(PhenixError::MissingSection(name))
}

fn resolve<'a>(
    tree: &'a ElementTree,
    index: &'a HashMap<String, ElementId>,
) -> impl Iterator<Item = (&'a String, &'a Element)> {
    index
        .iter()
        .filter_map(move |(key, id)| tree.get(*id).map(|element| (key, element)))
}
