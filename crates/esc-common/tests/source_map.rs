use super::*;

#[test]
fn test_vlq_encode() {
    assert_eq!(vlq::encode(0), "A");
    assert_eq!(vlq::encode(1), "C");
    assert_eq!(vlq::encode(-1), "D");
    assert_eq!(vlq::encode(15), "e");
    assert_eq!(vlq::encode(16), "gB");
    assert_eq!(vlq::encode(-16), "hB");
    assert_eq!(vlq::encode(17), "iB");
    assert_eq!(vlq::encode(-17), "jB");
}

#[test]
fn test_vlq_round_trip() {
    for value in [-1000, -33, -1, 0, 1, 16, 17, 31, 32, 1024, 123456] {
        assert_eq!(vlq::decode(&vlq::encode(value)), vec![value]);
    }
}

#[test]
fn test_encode_segments_reference_fixture() {
    // Two generated lines mapping back to
    //   let foo=5; let bar='hello'; let baz=true
    // in the source. Generated columns reset per group; source fields
    // carry across groups.
    let groups = vec![
        vec![
            Segment::new(0, 0, 0, 0),
            Segment::new(4, 0, 0, 4),
            Segment::new(8, 0, 0, 10),
            Segment::new(10, 0, 1, 0),
            Segment::new(14, 0, 1, 4),
        ],
        vec![
            Segment::new(0, 0, 1, 10),
            Segment::new(8, 0, 2, 0),
            Segment::new(12, 0, 2, 4),
            Segment::new(16, 0, 2, 10),
        ],
    ];
    assert_eq!(
        encode_segments(&groups),
        "AAAA,IAAI,IAAM,EACV,IAAI;AAAM,QACV,IAAI,IAAM"
    );
}

#[test]
fn test_segments_round_trip() {
    let groups = vec![
        vec![
            Segment::new(0, 0, 0, 0),
            Segment::new(7, 0, 0, 12).with_name(0),
        ],
        vec![],
        vec![Segment::new(2, 1, 5, 3)],
    ];
    assert_eq!(decode_segments(&encode_segments(&groups)), groups);
}

#[test]
fn test_simple_source_map() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.esc".to_string());

    generator.add_simple_mapping(0, 0, 0, 0, 0);
    generator.add_simple_mapping(0, 4, 0, 0, 4);
    generator.add_simple_mapping(1, 0, 0, 1, 0);

    let map = generator.generate();

    assert_eq!(map.version, 3);
    assert_eq!(map.file, "output.js");
    assert_eq!(map.sources, vec!["input.esc"]);
    assert!(!map.mappings.is_empty());
}

#[test]
fn test_inline_source_map() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.esc".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let inline = generator.generate_inline();

    assert!(inline.starts_with("//# sourceMappingURL=data:application/json;base64,"));
}

#[test]
fn test_with_names() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ = generator.add_source("input.esc".to_string());

    let name_idx = generator.add_name("myFunction".to_string());
    generator.add_mapping(0, 0, 0, 0, 0, Some(name_idx));

    let map = generator.generate();

    assert_eq!(map.names, vec!["myFunction"]);
}

#[test]
fn test_with_source_content() {
    let mut generator = SourceMapGenerator::new("output.js".to_string());
    let _ =
        generator.add_source_with_content("input.esc".to_string(), "val x = 1".to_string());

    let map = generator.generate();

    assert!(map.sources_content.is_some());
    assert_eq!(map.sources_content.unwrap()[0], "val x = 1");
}
