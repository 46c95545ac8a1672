use super::*;

const SAMPLE_INDEX: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EvaluationInputData xmlns="http://www.perkinelmer.com/PEHH/HarmonyV5" Version="2">
  <User>Harmony</User>
  <Plates>
    <Plate>
      <PlateID>8b3b</PlateID>
      <Name>BR00117035</Name>
      <PlateRows>16</PlateRows>
      <Well id="0302" />
    </Plate>
  </Plates>
  <Wells>
    <Well>
      <id>0302</id>
      <Row>3</Row>
      <Col>2</Col>
      <Image id="0302K1F1P1R1" />
      <Image id="0302K1F1P1R2" />
    </Well>
  </Wells>
  <Maps>
    <Map>
      <Entry ChannelID="1">
        <ChannelName>HOECHST 33342</ChannelName>
      </Entry>
    </Map>
  </Maps>
  <Images Version="1">
    <Image Version="1">
      <id>0302K1F1P1R1</id>
      <URL>r03c02f01p01-ch1sk1fk1fl1.tiff</URL>
      <Row>3</Row>
      <Col>2</Col>
      <FieldID>1</FieldID>
      <PlaneID>1</PlaneID>
      <ChannelName>HOECHST 33342</ChannelName>
      <AbsPositionZ>0.0001</AbsPositionZ>
    </Image>
    <Image Version="1">
      <id>0302K1F1P1R2</id>
      <URL>r03c02f01p01-ch2sk1fk1fl1.tiff</URL>
      <Row>3</Row>
      <Col>2</Col>
      <FieldID>1</FieldID>
      <PlaneID>1</PlaneID>
      <ChannelName>Alexa 488</ChannelName>
      <AbsPositionZ>0.0002</AbsPositionZ>
    </Image>
  </Images>
</EvaluationInputData>
"#;

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn no_attrs() -> Vec<(String, String)> {
    Vec::new()
}

#[test]
fn test_builder_first_element_is_root() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Anything", no_attrs()).unwrap();
    builder.end_element("Anything").unwrap();
    let tree = builder.finish().unwrap();

    let root = tree.root().unwrap();
    assert_eq!(root.tag(), "Anything");
    assert_eq!(root.parent(), None);
    assert!(matches!(root.kind(), ElementKind::Root { .. }));
}

#[test]
fn test_builder_folds_text_children_into_metadata() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    builder.start_element("Record", attrs(&[("id", "r1")])).unwrap();
    builder.start_element("URL", no_attrs()).unwrap();
    builder.characters("  a.tiff ");
    builder.end_element("URL").unwrap();
    assert_eq!(builder.depth(), 2);
    builder.end_element("Record").unwrap();
    builder.end_element("Root").unwrap();
    let tree = builder.finish().unwrap();

    let record = tree.get(ElementId(1)).unwrap();
    assert_eq!(record.id(), Some("r1"));
    assert_eq!(record.get("URL"), Some("a.tiff"));
    assert_eq!(record.parent(), Some(ElementId(0)));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_builder_later_text_child_overwrites_attribute() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    builder.start_element("Record", attrs(&[("Row", "1")])).unwrap();
    builder.start_element("Row", no_attrs()).unwrap();
    builder.characters("4");
    builder.end_element("Row").unwrap();
    builder.end_element("Record").unwrap();
    builder.end_element("Root").unwrap();
    let tree = builder.finish().unwrap();

    assert_eq!(tree.get(ElementId(1)).unwrap().get("Row"), Some("4"));
}

#[test]
fn test_builder_indexes_sections() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    let images = builder.start_element("Images", no_attrs()).unwrap();
    let image = builder.start_element("Image", attrs(&[("id", "i1")])).unwrap();
    builder.end_element("Image").unwrap();
    builder.end_element("Images").unwrap();
    builder.end_element("Root").unwrap();
    let tree = builder.finish().unwrap();

    match tree.root().unwrap().kind() {
        ElementKind::Root { images: found, plates, wells } => {
            assert_eq!(*found, Some(images));
            assert_eq!(*plates, None);
            assert_eq!(*wells, None);
        }
        other => panic!("unexpected root kind {other:?}"),
    }
    match tree.get(images).unwrap().kind() {
        ElementKind::Images { images } => assert_eq!(images.get("i1"), Some(&image)),
        other => panic!("unexpected section kind {other:?}"),
    }
}

#[test]
fn test_builder_well_keeps_image_order() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    let well = builder.start_element("Well", attrs(&[("id", "w")])).unwrap();
    for id in ["c", "a", "b"] {
        builder.start_element("Image", attrs(&[("id", id)])).unwrap();
        builder.end_element("Image").unwrap();
    }
    builder.end_element("Well").unwrap();
    builder.end_element("Root").unwrap();
    let tree = builder.finish().unwrap();

    match tree.get(well).unwrap().kind() {
        ElementKind::Well { image_ids } => assert_eq!(image_ids, &["c", "a", "b"]),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_builder_unbalanced_close() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    builder.start_element("Images", no_attrs()).unwrap();
    let err = builder.end_element("Root").unwrap_err();
    assert!(matches!(
        err,
        PhenixError::UnbalancedElement { ref expected, ref found }
            if expected == "Images" && found == "Root"
    ));
}

#[test]
fn test_builder_close_without_open() {
    let mut builder = ElementTreeBuilder::new();
    let err = builder.end_element("Root").unwrap_err();
    assert!(matches!(err, PhenixError::UnexpectedClose(tag) if tag == "Root"));
}

#[test]
fn test_builder_unclosed_and_empty() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    let err = builder.finish().unwrap_err();
    assert!(matches!(err, PhenixError::UnclosedElement(tag) if tag == "Root"));

    let err = ElementTreeBuilder::new().finish().unwrap_err();
    assert!(matches!(err, PhenixError::EmptyDocument));
}

#[test]
fn test_builder_rejects_second_root() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    builder.end_element("Root").unwrap();
    let err = builder.start_element("Other", no_attrs()).unwrap_err();
    assert!(matches!(err, PhenixError::MultipleRoots(tag) if tag == "Other"));
}

#[test]
fn test_indexed_element_without_key() {
    let mut builder = ElementTreeBuilder::new();
    builder.start_element("Root", no_attrs()).unwrap();
    builder.start_element("Plates", no_attrs()).unwrap();
    builder.start_element("Plate", no_attrs()).unwrap();
    let err = builder.end_element("Plate").unwrap_err();
    assert!(matches!(
        err,
        PhenixError::MissingKey { ref element, key: "Name" } if element == "Plate"
    ));
}

#[test]
fn test_parse_sample_index() {
    let tree = parse_index(SAMPLE_INDEX.as_bytes()).unwrap();
    let root = tree.root().unwrap();
    assert_eq!(root.tag(), "EvaluationInputData");
    assert_eq!(root.get("Version"), Some("2"));
    assert_eq!(root.get("User"), Some("Harmony"));

    let hierarchy = Hierarchy::from_tree(&tree).unwrap();
    assert_eq!(hierarchy.plates().len(), 1);
    assert_eq!(hierarchy.wells().len(), 1);
    assert_eq!(hierarchy.images().len(), 2);

    let plate = hierarchy.plate("BR00117035").unwrap();
    assert_eq!(plate.well_ids(), &["0302"]);
    assert_eq!(plate.metadata().get("PlateRows").map(String::as_str), Some("16"));

    let well = hierarchy.well("0302").unwrap();
    assert_eq!(well.image_ids(), &["0302K1F1P1R1", "0302K1F1P1R2"]);
    assert_eq!(well.well_name().unwrap(), "C02");

    let image = hierarchy.image("0302K1F1P1R2").unwrap();
    assert_eq!(image.url(), Some("r03c02f01p01-ch2sk1fk1fl1.tiff"));
    assert_eq!(image.channel_name().unwrap(), "Alexa488");
    assert_eq!(image.field_key().unwrap(), FieldKey::new(1, 1));
    assert_eq!(image.get("AbsPositionZ"), Some("0.0002"));
}

#[test]
fn test_parse_attribute_style_index() {
    let xml = r#"<Root>
        <Images>
            <Image id="i1" URL="a&amp;b.tiff" Row="2" Col="11" FieldID="4" ChannelName="DNA"/>
        </Images>
        <Plates><Plate Name="P"><Well id="w1"/></Plate></Plates>
        <Wells><Well id="w1" Row="2" Col="11"><Image id="i1"/></Well></Wells>
    </Root>"#;

    let tree = parse_index(xml.as_bytes()).unwrap();
    let hierarchy = Hierarchy::from_tree(&tree).unwrap();
    let image = hierarchy.image("i1").unwrap();
    assert_eq!(image.url(), Some("a&b.tiff"));
    assert_eq!(image.well_name().unwrap(), "B11");
    assert_eq!(image.field_key().unwrap(), FieldKey::new(4, 1));
}

#[test]
fn test_parse_cdata_text() {
    let xml = "<Root><Note><![CDATA[ raw <text> ]]></Note></Root>";
    let tree = parse_index(xml.as_bytes()).unwrap();
    assert_eq!(tree.root().unwrap().get("Note"), Some("raw <text>"));
}

#[test]
fn test_parse_mismatched_close_is_error() {
    let xml = "<Root><Images></Root></Images>";
    let err = parse_index(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, PhenixError::AtPosition { .. }));
}

#[test]
fn test_parse_truncated_document() {
    let xml = "<Root><Images>";
    assert!(parse_index(xml.as_bytes()).is_err());
}

#[test]
fn test_parse_empty_document() {
    let err = parse_index("".as_bytes()).unwrap_err();
    assert!(matches!(err.root_cause(), PhenixError::EmptyDocument));
}

#[test]
fn test_missing_section() {
    let xml = "<Root><Images/><Plates/></Root>";
    let tree = parse_index(xml.as_bytes()).unwrap();
    let err = Hierarchy::from_tree(&tree).unwrap_err();
    assert!(matches!(err, PhenixError::MissingSection("Wells")));
}

#[test]
fn test_parse_index_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_INDEX_FILE_NAME);
    std::fs::write(&path, SAMPLE_INDEX).unwrap();

    let tree = parse_index_file(&path).unwrap();
    assert!(!tree.is_empty());

    let missing = parse_index_file(dir.path().join("missing.xml")).unwrap_err();
    assert!(matches!(missing, PhenixError::IoError(_)));
}

#[test]
fn test_well_name() {
    assert_eq!(well_name(2, 2).unwrap(), "B02");
    assert_eq!(well_name(1, 10).unwrap(), "A10");
    assert_eq!(well_name(26, 1).unwrap(), "Z01");
    assert!(matches!(
        well_name(0, 1),
        Err(AttributeError::Invalid { key, .. }) if key == "Row"
    ));
    assert!(well_name(27, 1).is_err());
}

#[test]
fn test_field_key_order_and_display() {
    let mut keys = vec![FieldKey::new(10, 1), FieldKey::new(2, 3), FieldKey::new(2, 1)];
    keys.sort();
    assert_eq!(
        keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["02-01", "02-03", "10-01"]
    );
}

#[test]
fn test_field_key_three_digits() {
    assert!(FieldKey::new(1, 99) < FieldKey::new(1, 100));
    assert!(FieldKey::new(99, 100) < FieldKey::new(100, 1));
    assert_eq!(FieldKey::new(100, 1).to_string(), "100-01");
    assert_eq!(FieldKey::new(3, 120).to_string(), "03-120");
}

#[test]
fn test_image_attribute_errors() {
    let image = Image::new(
        "i",
        [("FieldID".to_string(), "x".to_string())].into_iter().collect(),
    );
    assert!(matches!(
        image.field_key(),
        Err(AttributeError::Invalid { key, value }) if key == "FieldID" && value == "x"
    ));
    assert_eq!(
        image.channel_name(),
        Err(AttributeError::Missing("ChannelName".to_string()))
    );
    assert_eq!(image.url(), None);
}
