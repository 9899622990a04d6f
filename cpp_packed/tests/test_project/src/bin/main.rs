use std::io::Read;

use flate2::read::GzDecoder;

const HEADER: &str = include_str!(concat!(env!("OUT_DIR"), "/blobs.hpp"));
const SOURCE: &str = include_str!(concat!(env!("OUT_DIR"), "/blobs.cpp"));
const FILE_TXT: &[u8] = include_bytes!("../../blobs/file.txt");

/// Reads the byte literal of the array named `ident` out of the source.
fn array_bytes(ident: &str) -> Vec<u8> {
    let decl = format!("> {ident} = {{ ");
    let start = SOURCE.find(&decl).expect("array not declared") + decl.len();
    let end = start + SOURCE[start..].find(" };").expect("array not terminated");
    SOURCE[start..end]
        .split(',')
        .map(|b| u8::from_str_radix(b.trim_start_matches("0x"), 16).expect("bad byte literal"))
        .collect()
}

fn main() {
    assert!(HEADER.contains("namespace test { namespace res {"));
    assert!(HEADER.contains("extern const std::map<std::string, std::span<const std::byte>> blobs;"));
    println!("Header declares blobs.");

    // "file.txt" is matched by two patterns but packed once.
    for key in ["file.txt", "shaders/main.frag"] {
        let ident = cpp_packed::encode_path(key);
        assert_eq!(SOURCE.matches(&format!("> {ident} = ")).count(), 1, "{key}");
        assert!(SOURCE.contains(&format!("{{\"{key}\", std::as_bytes(std::span({ident}))}}")));
    }
    assert!(!SOURCE.contains("notes.md"));
    assert_eq!(SOURCE.matches("std::array<uint8_t").count(), 2);
    println!("Source defines 2 packed assets.");

    let packed = array_bytes(&cpp_packed::encode_path("file.txt"));
    let mut data = Vec::new();
    GzDecoder::new(&packed[..])
        .read_to_end(&mut data)
        .expect("packed data is not valid gzip");
    assert_eq!(data, FILE_TXT);

    let s = std::str::from_utf8(&data).expect("data is not valid UTF-8");
    print!("{s}");
    println!("Decompressed data matches original.");
}
