//! Row joiner: plate x well x field x channel

use std::collections::BTreeMap;

use super::error::{IncompleteField, LoadDataError, SkippedField};
use super::table::LoadData;
use crate::config::ChannelConfig;
use crate::paths::PathMap;
use crate::phenix::{FieldKey, Hierarchy, Image, Plate, Well};

/// Images of one well grouped by field, then by channel key
type FieldImages<'a> = BTreeMap<FieldKey, BTreeMap<String, &'a Image>>;

/// Header of a LoadData table for a channel configuration
///
/// `FileName_<label>, PathName_<label>` per channel in channel-key order,
/// then plate/well/site, then `Metadata_<suffix>` per metadata key.
pub fn load_data_header(config: &ChannelConfig) -> Vec<String> {
    let mut header = Vec::with_capacity(2 * config.channels().len() + 3 + config.metadata().len());
    for label in config.channels().values() {
        header.push(format!("FileName_{label}"));
        header.push(format!("PathName_{label}"));
    }
    header.extend(
        ["Metadata_Plate", "Metadata_Well", "Metadata_Site"]
            .into_iter()
            .map(String::from),
    );
    header.extend(
        config
            .metadata()
            .values()
            .map(|suffix| format!("Metadata_{suffix}")),
    );
    header
}

/// Joins a parsed hierarchy with a channel configuration and path map
pub struct LoadDataBuilder<'a> {
    hierarchy: &'a Hierarchy,
    config: &'a ChannelConfig,
    paths: &'a PathMap,
}

impl<'a> LoadDataBuilder<'a> {
    /// Create a joiner over read-only inputs
    pub fn new(hierarchy: &'a Hierarchy, config: &'a ChannelConfig, paths: &'a PathMap) -> Self {
        Self {
            hierarchy,
            config,
            paths,
        }
    }

    /// Produce the full table
    ///
    /// Plates are visited in name order, wells in plate order, fields in
    /// key order. Fields lacking a channel or a path are skipped and
    /// recorded; an image whose channel is not configured aborts the join.
    pub fn build(&self) -> Result<LoadData, LoadDataError> {
        let mut table = LoadData::new(load_data_header(self.config));
        for plate in self.hierarchy.plates().values() {
            self.join_plate(plate, &mut table)?;
        }

        if !table.skipped().is_empty() {
            log::warn!(
                "Skipped {} incomplete fields; {} rows produced",
                table.skipped().len(),
                table.len()
            );
        }
        Ok(table)
    }

    fn join_plate(&self, plate: &Plate, table: &mut LoadData) -> Result<(), LoadDataError> {
        for well_id in plate.well_ids() {
            let well = self
                .hierarchy
                .well(well_id)
                .ok_or_else(|| LoadDataError::DanglingWell {
                    well_id: well_id.clone(),
                    plate: plate.name().to_string(),
                })?;
            let well_name = well
                .well_name()
                .map_err(|source| LoadDataError::InvalidWell {
                    well_id: well_id.clone(),
                    source,
                })?;

            for (field, images) in self.group_fields(plate, well, &well_name)? {
                match self.resolve_channels(&images) {
                    Ok((mut row, source)) => {
                        row.push(plate.name().to_string());
                        row.push(well_name.clone());
                        row.push(field.field.to_string());
                        self.push_metadata(&mut row, source)?;
                        table.push_row(row);
                    }
                    Err(reason) => {
                        let skipped = SkippedField {
                            plate: plate.name().to_string(),
                            well: well_name.clone(),
                            well_id: well_id.clone(),
                            field,
                            reason,
                        };
                        log::debug!("Skipping {skipped}");
                        table.push_skipped(skipped);
                    }
                }
            }
        }
        Ok(())
    }

    /// Group a well's images by field and channel, last image wins
    fn group_fields(
        &self,
        plate: &Plate,
        well: &Well,
        well_name: &str,
    ) -> Result<FieldImages<'a>, LoadDataError> {
        let mut fields = FieldImages::new();
        for image_id in well.image_ids() {
            let image =
                self.hierarchy
                    .image(image_id)
                    .ok_or_else(|| LoadDataError::DanglingImage {
                        image_id: image_id.clone(),
                        well_id: well.id().to_string(),
                        plate: plate.name().to_string(),
                    })?;
            let invalid = |source| LoadDataError::InvalidImage {
                image_id: image_id.clone(),
                source,
            };
            let field = image.field_key().map_err(invalid)?;
            let channel = image.channel_name().map_err(invalid)?;

            if !self.config.contains_channel(&channel) {
                return Err(LoadDataError::UnknownChannel {
                    channel,
                    field,
                    well: well_name.to_string(),
                    well_id: well.id().to_string(),
                    plate: plate.name().to_string(),
                    configured: self
                        .config
                        .channels()
                        .keys()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }

            fields.entry(field).or_default().insert(channel, image);
        }
        Ok(fields)
    }

    /// File/path pairs in channel-key order, plus the last channel's image
    fn resolve_channels(
        &self,
        images: &BTreeMap<String, &'a Image>,
    ) -> Result<(Vec<String>, Option<&'a Image>), IncompleteField> {
        let mut row = Vec::with_capacity(2 * self.config.channels().len());
        let mut source = None;
        for channel in self.config.channels().keys() {
            let image = images
                .get(channel)
                .copied()
                .ok_or_else(|| IncompleteField::MissingChannel(channel.clone()))?;
            let file_name = image.url().ok_or_else(|| IncompleteField::MissingFileName {
                channel: channel.clone(),
                image_id: image.id().to_string(),
            })?;
            let directory =
                self.paths
                    .get(file_name)
                    .ok_or_else(|| IncompleteField::MissingPath {
                        channel: channel.clone(),
                        file_name: file_name.to_string(),
                    })?;
            row.push(file_name.to_string());
            row.push(directory.to_string());
            source = Some(image);
        }
        Ok((row, source))
    }

    fn push_metadata(&self, row: &mut Vec<String>, source: Option<&Image>) -> Result<(), LoadDataError> {
        for key in self.config.metadata().keys() {
            let value = source.and_then(|image| image.get(key)).ok_or_else(|| {
                LoadDataError::MissingMetadata {
                    key: key.clone(),
                    image_id: source.map(|image| image.id().to_string()).unwrap_or_default(),
                }
            })?;
            row.push(value.to_string());
        }
        Ok(())
    }
}
