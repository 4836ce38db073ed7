use super::{
    error::Error,
    ids::{self, ChunkID, FourCC},
};
use bytes::buf::Buf;

// id + little endian size
pub const HEADER_LEN: u64 = 8;
pub const FORM_TYPE_LEN: u64 = 4;

/// One entry of the descent path.
///
/// `data_offset` is the absolute offset right after the 8 byte header. For
/// RIFF and LIST chunks the payload starts with the form type, which is
/// counted in `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    pub id: ChunkID,
    pub form_type: Option<ChunkID>,
    pub data_offset: u64,
    pub size: u32,
}

impl ChunkInfo {
    /// Offset one past the last payload byte.
    pub fn end(&self) -> u64 {
        self.data_offset + u64::from(self.size)
    }

    /// Offset of the next sibling, counting the pad byte of odd sized chunks.
    pub fn padded_end(&self) -> u64 {
        self.end() + u64::from(self.size & 1)
    }

    pub fn header_offset(&self) -> u64 {
        self.data_offset - HEADER_LEN
    }

    pub fn is_container(&self) -> bool {
        self.form_type.is_some()
    }
}

/// The raw `{id, size}` pair in front of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkID,
    pub size: u32,
}

impl ChunkHeader {
    pub fn parse(raw: &[u8; HEADER_LEN as usize]) -> ChunkHeader {
        let mut buf = &raw[..];
        let mut id = [0; 4];
        buf.copy_to_slice(&mut id);
        ChunkHeader {
            id,
            size: buf.get_u32_le(),
        }
    }
}

/// What a descent is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// RIFF chunk with the given form type
    Riff(ChunkID),
    /// LIST chunk with the given list type
    List(ChunkID),
    /// any chunk with the given id
    Chunk(ChunkID),
    /// whatever chunk comes next
    Any,
}

impl Search {
    pub fn matches(&self, info: &ChunkInfo) -> bool {
        match self {
            Search::Riff(ty) => {
                &info.id == ids::RIFF && info.form_type.as_ref() == Some(ty)
            }
            Search::List(ty) => {
                &info.id == ids::LIST && info.form_type.as_ref() == Some(ty)
            }
            Search::Chunk(id) => &info.id == id,
            Search::Any => true,
        }
    }

    /// The error reported when the scope ends without a match.
    pub fn not_found(&self, offset: u64) -> Error {
        match *self {
            Search::Riff(ty) => Error::FormNotFound {
                form_type: FourCC(ty),
            },
            Search::List(ty) | Search::Chunk(ty) => {
                Error::NotFound { id: FourCC(ty) }
            }
            Search::Any => Error::Exhausted { offset },
        }
    }
}
