use super::{
    chunks::{ChunkHeader, ChunkInfo, Search, FORM_TYPE_LEN, HEADER_LEN},
    error::{Error, Result},
    ids::{self, FourCC},
};
use log::trace;
use seek_bufread::BufReader;
use std::io::{self, Read, Seek, SeekFrom};

/// Buffered random access over a RIFF image.
///
/// This is the only place that touches the underlying source. It knows how
/// chunks are laid out on disk but keeps no navigation state of its own.
pub struct ChunkStream<S: Read + Seek> {
    buf: BufReader<S>,
}

impl<S: Read + Seek> ChunkStream<S> {
    pub fn new(source: S) -> io::Result<ChunkStream<S>> {
        ChunkStream::wrap(source, BufReader::new)
    }

    pub fn with_capacity(
        capacity: usize,
        source: S,
    ) -> io::Result<ChunkStream<S>> {
        ChunkStream::wrap(source, |s| BufReader::with_capacity(capacity, s))
    }

    // The buffer counts from 0, so line it up with where the source already
    // is; offsets stay absolute.
    fn wrap<F>(mut source: S, buffered: F) -> io::Result<ChunkStream<S>>
    where
        F: FnOnce(S) -> BufReader<S>,
    {
        let start = source.seek(SeekFrom::Current(0))?;
        let mut buf = buffered(source);
        buf.seek(SeekFrom::Start(start))?;
        Ok(ChunkStream { buf })
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.buf.seek(SeekFrom::Current(0))
    }

    pub fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.buf.seek(SeekFrom::Start(offset))
    }

    pub fn seek_by(&mut self, delta: i64) -> io::Result<u64> {
        self.buf.seek(SeekFrom::Current(delta))
    }

    /// The buffered reader keeps going until `buf` is full or the source
    /// runs dry.
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buf.read(buf)
    }

    /// Walks forward from the current position, inside `parent` when given,
    /// until a chunk satisfies `search`. On success the stream sits right
    /// after the header (after the form type for RIFF and LIST chunks).
    ///
    /// The position is unspecified on failure; callers restore it.
    pub fn descend(
        &mut self,
        parent: Option<&ChunkInfo>,
        search: &Search,
    ) -> Result<ChunkInfo> {
        let limit = parent.map(ChunkInfo::end);

        loop {
            let offset = self.position()?;
            if let Some(limit) = limit {
                if offset + HEADER_LEN > limit {
                    return Err(search.not_found(offset));
                }
            }

            let mut raw = [0; HEADER_LEN as usize];
            let got = self.read(&mut raw)?;
            if got < raw.len() {
                if limit.is_some() {
                    return Err(unexpected_eof(offset));
                }
                // end of stream, or trailing bytes too short to be a chunk
                return Err(search.not_found(offset));
            }

            let header = ChunkHeader::parse(&raw);
            let info = self.complete(offset, header, limit)?;

            if search.matches(&info) {
                return Ok(info);
            }

            trace!(
                "skipping {:?} ({} bytes) at {:#x} looking for {:?}",
                FourCC(info.id),
                info.size,
                offset,
                search
            );
            self.seek_to(info.padded_end())?;
        }
    }

    // Validates the header against its parent and picks up the form type.
    fn complete(
        &mut self,
        offset: u64,
        header: ChunkHeader,
        limit: Option<u64>,
    ) -> Result<ChunkInfo> {
        let mut info = ChunkInfo {
            id: header.id,
            form_type: None,
            data_offset: offset + HEADER_LEN,
            size: header.size,
        };

        if let Some(limit) = limit {
            if info.end() > limit {
                return Err(Error::Malformed {
                    offset,
                    reason: "chunk extends past the end of its parent",
                });
            }
        }

        if ids::is_container(&info.id) {
            if u64::from(info.size) < FORM_TYPE_LEN {
                return Err(Error::Malformed {
                    offset,
                    reason: "container chunk too small for a form type",
                });
            }
            let mut form_type = [0; FORM_TYPE_LEN as usize];
            if self.read(&mut form_type)? < form_type.len() {
                return Err(unexpected_eof(offset));
            }
            info.form_type = Some(form_type);
        }

        Ok(info)
    }

    /// Leaves `info`, positioning the stream at its next sibling.
    pub fn ascend(&mut self, info: &ChunkInfo) -> io::Result<u64> {
        self.seek_to(info.padded_end())
    }
}

fn unexpected_eof(offset: u64) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("chunk at {:#x} is truncated", offset),
    ))
}
