use modsect::read::{self, ModuleFile};
use modsect::write::{self, leb128};

const HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

fn section(id: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![id];
    leb128::write_u32(&mut data, payload.len() as u32);
    data.extend_from_slice(payload);
    data
}

fn module(sections: &[&[u8]]) -> Vec<u8> {
    let mut data = HEADER.to_vec();
    for section in sections {
        data.extend_from_slice(section);
    }
    data
}

#[test]
fn leb128_boundaries() {
    for value in [0, 0x7f, 0x80, 0x3fff, 0x4000, 0x0fff_ffff, 0x1000_0000, u32::MAX] {
        let mut data: Vec<u8> = Vec::new();
        let len = leb128::write_u32(&mut data, value);
        assert_eq!(len, data.len());
        assert_eq!(len, leb128::u32_len(value));
        assert_eq!(read::leb128::read_u32(&data, 0).unwrap(), (value, len));
    }
}

#[test]
fn copy_all_sections() {
    let large = vec![0x5a; 0x4000];
    let data = module(&[
        &section(1, &[0x00]),
        &section(0, b"\x04name\x00"),
        &section(11, &large),
        &[0x00, 0x84, 0x80, 0x80, 0x80, 0x00, 0x03, b'a', b'b', b'c'],
    ]);
    let file = ModuleFile::parse(&data).unwrap();
    assert_eq!(file.section_count(), 4);

    let sections = file.sections().collect::<read::Result<Vec<_>>>().unwrap();
    let mut out: Vec<u8> = Vec::new();
    let len = write::write_module(&mut out, file.header(), sections);
    assert_eq!(len, data.len());
    assert_eq!(out, data);
}

#[cfg(feature = "std")]
#[test]
fn copy_some_sections() {
    let types = section(1, &[0x00]);
    let custom = section(0, b"\x01a\xff\xff");
    let exports = section(7, &[0x00]);
    let data = module(&[&types, &custom, &exports, &custom]);
    let file = ModuleFile::parse(&data).unwrap();

    let kept = file
        .sections()
        .map(Result::unwrap)
        .filter(|section| section.name() != Some("a"));
    let mut buffer = write::StreamingBuffer::new(Vec::<u8>::new());
    let len = write::write_module(&mut buffer, file.header(), kept);
    buffer.result().unwrap();
    let out = buffer.into_inner();
    assert_eq!(len, out.len());
    assert_eq!(out, module(&[&types, &exports]));

    let file = ModuleFile::parse(&out).unwrap();
    assert_eq!(file.section_count(), 2);
    assert!(file.section_by_name("a").is_none());
}
