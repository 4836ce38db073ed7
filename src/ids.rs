use std::fmt;

pub type ChunkID = [u8; 4];

pub const RIFF: &ChunkID = b"RIFF";
pub const LIST: &ChunkID = b"LIST";

// form types
pub const WAVE: &ChunkID = b"WAVE";
pub const AVI: &ChunkID = b"AVI ";
pub const RMID: &ChunkID = b"RMID";
pub const WEBP: &ChunkID = b"WEBP";

// list types
pub const INFO: &ChunkID = b"INFO";
pub const ADTL: &ChunkID = b"adtl";
pub const HDRL: &ChunkID = b"hdrl";
pub const MOVI: &ChunkID = b"movi";

pub const FORMAT: &ChunkID = b"fmt ";
pub const DATA: &ChunkID = b"data";
pub const FACT: &ChunkID = b"fact";
pub const CUE: &ChunkID = b"cue ";
pub const JUNK: &ChunkID = b"JUNK";

/// Converts text into a four character code.
///
/// Only the first four bytes are used. Shorter text is padded with spaces,
/// so `"fmt"` and `"fmt "` produce the same code. Case is preserved.
pub fn fourcc(text: impl AsRef<[u8]>) -> ChunkID {
    let mut id = *b"    ";
    for (slot, b) in id.iter_mut().zip(text.as_ref()) {
        *slot = *b;
    }
    id
}

/// Returns true for the two chunk kinds that carry a form type and
/// nested chunks.
pub fn is_container(id: &ChunkID) -> bool {
    id == RIFF || id == LIST
}

/// Display wrapper used for logs and error messages.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub ChunkID);

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}'", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pads_short_codes() {
        assert_eq!(&fourcc("fmt"), FORMAT);
        assert_eq!(&fourcc("AVI"), AVI);
        assert_eq!(fourcc(""), *b"    ");
    }

    #[test]
    fn truncates_long_codes() {
        assert_eq!(&fourcc("WAVEFORM"), WAVE);
    }

    #[test]
    fn keeps_case() {
        assert_ne!(fourcc("data"), fourcc("DATA"));
        assert_eq!(&fourcc(b"data"), DATA);
    }

    #[test]
    fn display_escapes_binary() {
        assert_eq!(FourCC(*b"fmt ").to_string(), "fmt ");
        assert_eq!(FourCC([0, b'a', b'b', 0xff]).to_string(), "\\x00ab\\xff");
    }

    #[test]
    fn containers() {
        assert!(is_container(RIFF));
        assert!(is_container(LIST));
        assert!(!is_container(DATA));
    }
}
