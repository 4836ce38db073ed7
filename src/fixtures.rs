// In-memory RIFF images for tests.
use crate::ids::{self, ChunkID};
use bytes::BufMut;

/// A leaf chunk, padded to an even length.
pub fn chunk(id: &ChunkID, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.put_slice(id);
    out.put_u32_le(payload.len() as u32);
    out.put_slice(payload);
    if payload.len() % 2 > 0 {
        out.put_u8(0);
    }
    out
}

fn container(kind: &ChunkID, form_type: &ChunkID, children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = form_type.to_vec();
    for child in children {
        payload.extend_from_slice(child);
    }
    chunk(kind, &payload)
}

pub fn list(list_type: &ChunkID, children: &[Vec<u8>]) -> Vec<u8> {
    container(ids::LIST, list_type, children)
}

pub fn form(form_type: &ChunkID, children: &[Vec<u8>]) -> Vec<u8> {
    container(ids::RIFF, form_type, children)
}

/// 16 byte PCM format block: mono, 8 kHz, 16 bit.
pub fn pcm_format() -> Vec<u8> {
    let mut out = vec![];
    out.put_u16_le(1);
    out.put_u16_le(1);
    out.put_u32_le(8000);
    out.put_u32_le(16000);
    out.put_u16_le(2);
    out.put_u16_le(16);
    out
}

/// The layout most tests walk:
///
/// ```text
///  0  RIFF WAVE            size 66
/// 12    fmt                size 16, payload 20..36
/// 36    LIST INFO          size 16, payload 44..60
/// 48      INAM             size 3, payload 56..59, pad 59
/// 60    data               size 5, payload 68..73, pad 73
/// 74  end
/// ```
pub fn wave() -> Vec<u8> {
    form(
        ids::WAVE,
        &[
            chunk(ids::FORMAT, &pcm_format()),
            list(ids::INFO, &[chunk(b"INAM", b"hi\0")]),
            chunk(ids::DATA, &[1, 2, 3, 4, 5]),
        ],
    )
}
