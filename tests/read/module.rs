use std::ops::Range;

use modsect::read::{self, ErrorKind, ModuleFile, NameError, SectionKind};
use modsect::write::leb128;

const HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

fn section(id: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![id];
    leb128::write_u32(&mut data, payload.len() as u32);
    data.extend_from_slice(payload);
    data
}

fn custom(name: &str, data: &[u8]) -> Vec<u8> {
    let mut payload: Vec<u8> = Vec::new();
    leb128::write_u32(&mut payload, name.len() as u32);
    payload.extend_from_slice(name.as_bytes());
    payload.extend_from_slice(data);
    section(0, &payload)
}

fn module(sections: &[&[u8]]) -> Vec<u8> {
    let mut data = HEADER.to_vec();
    for section in sections {
        data.extend_from_slice(section);
    }
    data
}

#[test]
fn matches_wasmparser() {
    let data = module(&[
        &section(1, &[0x00]),
        &custom("name", &[0x00, 0x01, 0x00]),
        &custom("producers", &vec![0x00; 200]),
        &section(7, &[0x00]),
        &custom("target_features", &[0x00]),
    ]);
    let file = ModuleFile::parse(&data).unwrap();
    let sections = file.sections().collect::<read::Result<Vec<_>>>().unwrap();
    assert_eq!(sections.len(), 5);

    let mut names = Vec::new();
    let mut ranges: Vec<(u8, Range<usize>)> = Vec::new();
    for payload in wasmparser::Parser::new(0).parse_all(&data) {
        match payload.unwrap() {
            wasmparser::Payload::CustomSection(reader) => {
                names.push(reader.name().to_string());
            }
            wasmparser::Payload::TypeSection(reader) => ranges.push((1, reader.range())),
            wasmparser::Payload::ExportSection(reader) => ranges.push((7, reader.range())),
            _ => {}
        }
    }

    let our_names: Vec<&str> = sections.iter().filter_map(|s| s.name()).collect();
    assert_eq!(our_names, names);

    let our_ranges: Vec<_> = sections
        .iter()
        .filter(|s| !s.is_custom())
        .map(|s| {
            let end = s.range().end;
            (s.id(), end - s.payload().len()..end)
        })
        .collect();
    assert_eq!(our_ranges, ranges);
}

#[test]
fn section_layout() {
    let data = module(&[&section(1, &[0x00]), &custom("a", &[0x01, 0x02])]);
    let file = ModuleFile::parse(&data).unwrap();
    assert_eq!(file.header().version(), 1);
    assert_eq!(file.header().data(), &HEADER[..]);

    let mut sections = file.sections();
    let types = sections.next().unwrap().unwrap();
    assert_eq!(types.kind(), SectionKind::Type);
    assert_eq!(types.range(), 8..11);
    assert_eq!(types.name(), None);
    assert_eq!(types.name_error(), None);

    let a = sections.next().unwrap().unwrap();
    assert_eq!(a.kind(), SectionKind::Custom);
    assert_eq!(a.range(), 11..17);
    assert_eq!(a.data(), &data[11..]);
    assert_eq!(a.payload(), &[0x01, b'a', 0x01, 0x02]);
    assert_eq!(a.name(), Some("a"));
    assert!(sections.next().is_none());
    assert_eq!(sections.offset(), data.len());
}

#[test]
fn version_is_not_checked() {
    let mut data = module(&[&custom("a", &[])]);
    data[4..8].copy_from_slice(&2u32.to_le_bytes());
    let file = ModuleFile::parse(&data).unwrap();
    assert_eq!(file.header().version(), 2);
    assert_eq!(file.section_count(), 1);
}

#[test]
fn unknown_section_ids() {
    let data = module(&[&section(0x2a, &[0x01, 0x02, 0x03])]);
    let file = ModuleFile::parse(&data).unwrap();
    let section = file.sections().next().unwrap().unwrap();
    assert_eq!(section.kind(), SectionKind::Unknown(0x2a));
    assert_eq!(section.kind().to_string(), "unknown(42)");
}

#[test]
fn name_errors() {
    let data = module(&[
        &section(0, &[]),
        &section(0, &[0x05, b'a']),
        &section(0, &[0x01, 0xff]),
        &section(0, &[0x80]),
    ]);
    let file = ModuleFile::parse(&data).unwrap();
    let errors: Vec<_> = file
        .sections()
        .map(|section| section.unwrap().name_error())
        .collect();
    assert_eq!(
        errors,
        [
            Some(NameError::Length),
            Some(NameError::Bounds),
            Some(NameError::Utf8),
            Some(NameError::Length),
        ]
    );
}

#[test]
fn errors() {
    let cases: &[(&[u8], ErrorKind, usize)] = &[
        (b"", ErrorKind::InvalidFormat, 0),
        (b"\0as", ErrorKind::InvalidFormat, 0),
        (b"\0asn\x01\0\0\0", ErrorKind::InvalidFormat, 0),
        (b"\0asm\x01\0", ErrorKind::InvalidFormat, 0),
        (b"\0asm\x01\0\0\0\x01", ErrorKind::TruncatedModule, 9),
        (b"\0asm\x01\0\0\0\x01\x80", ErrorKind::MalformedEncoding, 9),
        (b"\0asm\x01\0\0\0\x01\x02\x00", ErrorKind::TruncatedModule, 8),
        (
            b"\0asm\x01\0\0\0\x01\xff\xff\xff\xff\x7f",
            ErrorKind::MalformedEncoding,
            9,
        ),
    ];
    for (data, kind, offset) in cases {
        let error = ModuleFile::parse(data).unwrap_err();
        assert_eq!(error.kind(), *kind, "{:?}", data);
        assert_eq!(error.offset(), *offset, "{:?}", data);
    }
}

#[test]
fn iterator_stops_after_error() {
    let mut data = module(&[&custom("a", &[])]);
    data.extend_from_slice(&[0x00, 0x10]);
    let mut sections = modsect::read::SectionIterator::new(&data, 8);
    assert!(sections.next().unwrap().is_ok());
    let error = sections.next().unwrap().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TruncatedModule);
    assert!(sections.next().is_none());
}
