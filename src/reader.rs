use super::{
    chunks::{ChunkInfo, Search},
    error::{Error, Result},
    ids::{self, FourCC},
    stream::ChunkStream,
};
use log::{debug, trace, warn};
use std::{
    cmp,
    fs::File,
    io::{self, Read, Seek},
    path::Path,
};

/// Stack based cursor over a RIFF container.
///
/// The bottom of the stack is the outermost RIFF chunk, the top is the chunk
/// reads and skips are bounded to. Every search records the stream position
/// first and puts it back when nothing is pushed, so a failed call never
/// moves the cursor.
///
/// A `RiffReader` only exists once its RIFF form has been found. After
/// [`close`](RiffReader::close) every operation reports [`Error::Closed`].
pub struct RiffReader<S: Read + Seek> {
    stream: Option<ChunkStream<S>>,
    stack: Vec<ChunkInfo>,
}

impl RiffReader<File> {
    /// Opens `path` and descends into its first RIFF chunk of `form_type`.
    pub fn open<P: AsRef<Path>>(
        path: P,
        form_type: impl AsRef<[u8]>,
    ) -> Result<RiffReader<File>> {
        let path = path.as_ref();
        RiffReader::from_stream(
            File::open(path).and_then(ChunkStream::new),
            form_type,
            open_failure(path),
        )
    }

    /// Like [`open`](RiffReader::open) with a read buffer of `capacity`
    /// bytes.
    pub fn open_with_capacity<P: AsRef<Path>>(
        path: P,
        form_type: impl AsRef<[u8]>,
        capacity: usize,
    ) -> Result<RiffReader<File>> {
        let path = path.as_ref();
        RiffReader::from_stream(
            File::open(path)
                .and_then(|file| ChunkStream::with_capacity(capacity, file)),
            form_type,
            open_failure(path),
        )
    }
}

fn open_failure(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |source| Error::Open {
        path: path.to_path_buf(),
        source,
    }
}

impl<S: Read + Seek> RiffReader<S> {
    /// Descends into the first RIFF chunk of `form_type` found from the
    /// current position of `source`. Offsets stay relative to the start of
    /// `source`, not to where it was positioned.
    pub fn new(source: S, form_type: impl AsRef<[u8]>) -> Result<RiffReader<S>> {
        RiffReader::from_stream(
            ChunkStream::new(source),
            form_type,
            Error::Unreadable,
        )
    }

    // I/O failures before the form is found count as failing to open.
    fn from_stream<F>(
        stream: io::Result<ChunkStream<S>>,
        form_type: impl AsRef<[u8]>,
        open_failure: F,
    ) -> Result<RiffReader<S>>
    where
        F: Fn(io::Error) -> Error,
    {
        let mut reader = RiffReader {
            stream: Some(stream.map_err(&open_failure)?),
            stack: vec![],
        };

        if let Err(e) = reader.find_riff(form_type) {
            reader.close();
            return Err(match e {
                Error::Io(source) => open_failure(source),
                e => e,
            });
        }

        Ok(reader)
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Releases the source and unwinds the stack. Does nothing when already
    /// closed.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("closed with {} chunk(s) open", self.stack.len());
        }
        self.stack.clear();
    }

    /// Number of chunks on the stack, the RIFF chunk included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The chunk reads are currently bounded to.
    pub fn current(&self) -> Option<&ChunkInfo> {
        self.stack.last()
    }

    /// Descent path, outermost chunk first.
    pub fn path(&self) -> &[ChunkInfo] {
        &self.stack
    }

    /// Declared payload size of the current chunk, 0 when closed or when no
    /// chunk is open.
    pub fn chunk_size(&self) -> u32 {
        match (&self.stream, self.stack.last()) {
            (Some(_), Some(top)) => top.size,
            _ => 0,
        }
    }

    pub fn position(&mut self) -> Result<u64> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        Ok(stream.position()?)
    }

    /// Bytes left before the end of the current chunk.
    pub fn remaining(&mut self) -> Result<u64> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        let top = self.stack.last().ok_or(Error::NoChunk)?;
        Ok(top.end().saturating_sub(stream.position()?))
    }

    /// Finds a RIFF chunk of `form_type`. With an empty stack the whole
    /// stream is searched, otherwise what is left of the current chunk.
    pub fn find_riff(&mut self, form_type: impl AsRef<[u8]>) -> Result<()> {
        self.search(Search::Riff(ids::fourcc(form_type)), false)
    }

    /// Finds the next LIST chunk of `list_type` inside the current chunk.
    pub fn find_list(&mut self, list_type: impl AsRef<[u8]>) -> Result<()> {
        self.search(Search::List(ids::fourcc(list_type)), true)
    }

    /// Finds the next chunk with `id` inside the current chunk.
    pub fn find_chunk(&mut self, id: impl AsRef<[u8]>) -> Result<()> {
        self.search(Search::Chunk(ids::fourcc(id)), true)
    }

    /// Enters whatever chunk starts at the current position.
    pub fn descend(&mut self) -> Result<()> {
        self.search(Search::Any, true)
    }

    fn search(&mut self, search: Search, needs_parent: bool) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        let parent = self.stack.last();
        if needs_parent && parent.is_none() {
            return Err(Error::NoChunk);
        }

        let saved = stream.position()?;

        match stream.descend(parent, &search) {
            Ok(info) => {
                debug!(
                    "entered {:?}{} at {:#x} ({} bytes), depth {}",
                    FourCC(info.id),
                    info.form_type
                        .map(|ty| format!(" {:?}", FourCC(ty)))
                        .unwrap_or_default(),
                    info.header_offset(),
                    info.size,
                    self.stack.len() + 1
                );
                self.stack.push(info);
                Ok(())
            }
            Err(e) => {
                restore(stream, saved);
                Err(e)
            }
        }
    }

    /// Leaves the current chunk, skipping whatever was not read along with
    /// its pad byte.
    pub fn ascend(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        let top = *self.stack.last().ok_or(Error::NoChunk)?;
        let saved = stream.position()?;

        if let Err(e) = stream.ascend(&top) {
            restore(stream, saved);
            return Err(e.into());
        }

        self.stack.pop();
        debug!("left {:?}, depth {}", FourCC(top.id), self.stack.len());
        Ok(())
    }

    /// Reads at most `buf.len()` bytes, never past the end of the current
    /// chunk. Returns 0 once the chunk is exhausted.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.stream.is_none() {
            return Err(Error::Closed);
        }
        if buf.is_empty() {
            return Err(Error::ZeroLengthRead);
        }
        self.read_bounded(buf)
    }

    fn read_bounded(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        let top = self.stack.last().ok_or(Error::NoChunk)?;

        let left = top.end().saturating_sub(stream.position()?);
        let n = cmp::min(buf.len() as u64, left) as usize;
        if n < buf.len() {
            trace!("read of {} clamped to {}", buf.len(), n);
        }
        if n == 0 {
            return Ok(0);
        }

        Ok(stream.read(&mut buf[..n])?)
    }

    /// Moves forward at most `n` bytes, never past the end of the current
    /// chunk. Returns how far the position actually moved.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        let top = self.stack.last().ok_or(Error::NoChunk)?;

        let saved = stream.position()?;
        let n = cmp::min(n, top.end().saturating_sub(saved));
        let moved = stream.seek_by(n as i64)?;

        Ok(moved - saved)
    }

    /// Reads what is left of the current chunk. The buffer grows with the
    /// bytes actually read, not with the declared size.
    pub fn read_payload(&mut self) -> Result<Vec<u8>> {
        let remaining = self.remaining()?;
        let mut data = vec![];
        Read::take(&mut *self, remaining)
            .read_to_end(&mut data)
            .map_err(Error::from_io)?;
        Ok(data)
    }

    /// Finds the next chunk with `id`, reads its payload and leaves it again.
    pub fn read_chunk(&mut self, id: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.find_chunk(id)?;
        let data = self.read_payload();
        self.ascend()?;
        data
    }
}

fn restore<S: Read + Seek>(stream: &mut ChunkStream<S>, saved: u64) {
    if let Err(e) = stream.seek_to(saved) {
        warn!("unable to restore position {:#x}: {}", saved, e);
    }
}

/// Reads are bounded to the current chunk, as with
/// [`RiffReader::read`].
impl<S: Read + Seek> Read for RiffReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(self.read_bounded(buf)?)
    }
}

impl<S: Read + Seek> Drop for RiffReader<S> {
    fn drop(&mut self) {
        self.close();
    }
}
