//! Mapping of asset paths to C++ identifiers.

/// The base32 alphabet used for encoded identifiers.
///
/// Standard RFC 4648 upper-case letters and the digits `2`-`7`, padded so the
/// encoding stays a bijection on byte strings; padding is rewritten below.
const BASE32: base32::Alphabet = base32::Alphabet::Rfc4648 { padding: true };

/// Leading character that keeps identifiers from starting with a digit.
const PREFIX: char = 'd';

/// Encodes a relative asset path as a C++ identifier.
///
/// The result is `d` followed by the base32 form of the path's UTF-8 bytes,
/// with every `=` pad replaced by `_`. Distinct paths always yield distinct
/// identifiers.
#[must_use]
pub fn encode_path(path: &str) -> String {
    let encoded = base32::encode(BASE32, path.as_bytes());
    let mut ident = String::with_capacity(encoded.len() + 1);
    ident.push(PREFIX);
    ident.extend(encoded.chars().map(|c| if c == '=' { '_' } else { c }));
    ident
}

/// Returns whether `s` is a plain identifier: a letter or `_` followed by
/// ASCII letters, digits and underscores.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_encoding() {
        // "a.txt" -> MEXHI6DU
        assert_eq!(encode_path("a.txt"), "dMEXHI6DU");
        // One byte pads to a full 8-character block.
        assert_eq!(encode_path("f"), "dMY______");
        assert_eq!(encode_path(""), "d");
    }

    #[test]
    fn identifiers_are_valid_for_awkward_paths() {
        for path in [
            "shaders/main.frag",
            "dir with space/x.png",
            "0starts-with-digit",
            "ünïcödé/文件.bin",
            r"windows\style\path",
            "",
        ] {
            let ident = encode_path(path);
            assert!(is_identifier(&ident), "{path:?} -> {ident:?}");
        }
    }

    #[test]
    fn distinct_paths_never_collide() {
        let paths = [
            "a", "a/", "a/b", "a_b", "ab", "a b", "b/a", "a.txt", "a.txt ", "A.txt", "aa", "",
        ];
        let idents: HashSet<_> = paths.iter().map(|p| encode_path(p)).collect();
        assert_eq!(idents.len(), paths.len());
    }

    #[test]
    fn identifier_grammar() {
        assert!(is_identifier("assets"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a::b"));
        assert!(!is_identifier(""));
    }
}
