use std::io::{self, Read, Seek, SeekFrom};

use crate::{
    chunk::{ChunkId, HEADER_SIZE},
    error::{P3dError, Result},
};

/// Deepest chunk nesting [`ChunkFile::begin_chunk`] accepts.
pub const MAX_DEPTH: usize = 128;

/// One open chunk on the cursor's stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub id: ChunkId,
    /// Offset of the first payload byte.
    pub start: u64,
    /// Offset one past the last payload byte.
    pub end: u64,
}

/// Cursor over a chunked byte stream.
///
/// `ChunkFile` knows nothing about what chunks mean. It provides little-endian
/// scalar reads, seeking, and chunk bracketing: [`begin_chunk`](Self::begin_chunk)
/// pushes a frame for the chunk under the cursor and [`end_chunk`](Self::end_chunk)
/// pops it and moves the cursor to exactly the chunk's declared end, no matter how
/// much of the payload was consumed in between.
///
/// Every read, including the [`Read`] impl, is bounded by the innermost open chunk.
/// A decoder that runs past its declared length fails on that read instead of
/// consuming its siblings.
pub struct ChunkFile<R> {
    reader: R,
    len: u64,
    position: u64,
    frames: Vec<Frame>,
}

impl<R: Read + Seek> ChunkFile<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            len,
            position: 0,
            frames: Vec::new(),
        })
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the underlying stream.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of open chunks.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_chunk(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Bytes left before the end of the innermost open chunk (or the stream).
    pub fn remaining(&self) -> u64 {
        self.limit().saturating_sub(self.position)
    }

    fn limit(&self) -> u64 {
        self.frames.last().map_or(self.len, |frame| frame.end)
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.check_bounds(buf.len() as u64)?;
        self.reader.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Fails unless `count` more bytes fit in the innermost open chunk.
    fn check_bounds(&self, count: u64) -> Result<()> {
        let end = self.position + count;
        if end > self.limit() {
            return Err(self.boundary_error(None, end));
        }
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_bytes(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32s<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut out = [0.0; N];
        for value in out.iter_mut() {
            *value = self.read_f32()?;
        }
        Ok(out)
    }

    pub fn read_vec3(&mut self) -> Result<cgmath::Vector3<f32>> {
        let [x, y, z] = self.read_f32s::<3>()?;
        Ok(cgmath::Vector3::new(x, y, z))
    }

    /// Reads 16 floats stored column by column.
    pub fn read_matrix(&mut self) -> Result<cgmath::Matrix4<f32>> {
        let m = self.read_f32s::<16>()?;
        Ok(cgmath::Matrix4::new(
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12],
            m[13], m[14], m[15],
        ))
    }

    /// Reads a `u8` length-prefixed string. Trailing NUL padding is dropped.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let mut buf = vec![0u8; len];
        self.read_bytes(&mut buf)?;
        while buf.last() == Some(&0) {
            buf.pop();
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Reads a format version and fails unless it equals `expected`.
    pub fn expect_version(&mut self, kind: &'static str, expected: u32) -> Result<u32> {
        let found = self.read_u32()?;
        if found != expected {
            return Err(P3dError::VersionMismatch {
                kind,
                expected,
                found,
            });
        }
        Ok(found)
    }

    /// Reads a `u32` element count, rejecting counts that can't fit in the current chunk.
    pub fn read_count(&mut self, elem_size: u64) -> Result<usize> {
        let count = self.read_u32()?;
        let needed = count as u64 * elem_size;
        let remaining = self.remaining();
        if needed > remaining {
            return Err(P3dError::Malformed(format!(
                "{count} elements of {elem_size} bytes exceed the {remaining} bytes left"
            )));
        }
        Ok(count as usize)
    }

    /// Reads a counted list, `elem_size` being the encoded size of one element.
    pub fn read_list<T>(
        &mut self,
        elem_size: u64,
        mut read: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_count(elem_size)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target: i128 = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.position as i128 + delta as i128,
            SeekFrom::End(delta) => self.len as i128 + delta as i128,
        };
        if target < 0 || target > self.len as i128 {
            return Err(P3dError::InvalidSeek {
                target,
                len: self.len,
            });
        }
        let target = target as u64;
        if target != self.position {
            self.reader.seek(SeekFrom::Start(target))?;
            self.position = target;
        }
        Ok(target)
    }

    /// Skips `count` bytes of fields that aren't needed.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.check_bounds(count)?;
        self.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    /// True if another chunk header fits before the end of the enclosing chunk.
    pub fn chunks_remaining(&self) -> bool {
        self.position + HEADER_SIZE <= self.limit()
    }

    /// Reads a chunk header under the cursor and opens a frame for it.
    ///
    /// Nesting deeper than [`MAX_DEPTH`] is [`P3dError::Malformed`].
    pub fn begin_chunk(&mut self) -> Result<ChunkId> {
        if self.frames.len() >= MAX_DEPTH {
            return Err(P3dError::Malformed(format!(
                "chunks nested deeper than {MAX_DEPTH} at {}",
                self.position
            )));
        }
        let limit = self.limit();
        if self.position + HEADER_SIZE > limit {
            return Err(self.boundary_error(None, self.position + HEADER_SIZE));
        }
        let id = ChunkId(self.read_u32()?);
        let length = self.read_u32()? as u64;
        let start = self.position;
        let end = start + length;
        if end > limit {
            return Err(self.boundary_error(Some(id), end));
        }
        self.frames.push(Frame { id, start, end });
        Ok(id)
    }

    fn boundary_error(&self, id: Option<ChunkId>, end: u64) -> P3dError {
        match self.frames.last() {
            Some(parent) => P3dError::ChunkOverrun {
                id: id.unwrap_or(parent.id),
                end: parent.end,
                position: end,
            },
            None => P3dError::TruncatedInput {
                offset: self.position,
                needed: end - self.position,
                available: self.len.saturating_sub(self.position),
            },
        }
    }

    /// Closes the innermost chunk and moves the cursor to its declared end.
    ///
    /// Under-reads are skipped. A cursor seeked past the end still realigns but is
    /// reported as [`P3dError::ChunkOverrun`].
    pub fn end_chunk(&mut self) -> Result<()> {
        let frame = self.frames.pop().ok_or(P3dError::UnbalancedChunk)?;
        let position = self.position;
        self.seek(SeekFrom::Start(frame.end))?;
        if position > frame.end {
            return Err(P3dError::ChunkOverrun {
                id: frame.id,
                end: frame.end,
                position,
            });
        }
        Ok(())
    }

    /// Runs `f`, discarding any frames it left open if it fails.
    ///
    /// The cursor itself is not moved; the enclosing `end_chunk` realigns it.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let depth = self.frames.len();
        let result = f(self);
        if result.is_err() {
            self.frames.truncate(depth);
        }
        result
    }

    /// Visits every sub-chunk of the current chunk, bracketing each with
    /// `begin_chunk`/`end_chunk`. Stops at the first error.
    pub fn children(&mut self, mut f: impl FnMut(&mut Self, ChunkId) -> Result<()>) -> Result<()> {
        while self.chunks_remaining() {
            let id = self.begin_chunk()?;
            self.scoped(|file| f(file, id))?;
            self.end_chunk()?;
        }
        Ok(())
    }
}

impl<R: Read + Seek> Read for ChunkFile<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = (buf.len() as u64).min(self.remaining()) as usize;
        if n == 0 {
            return Ok(0);
        }
        let read = self.reader.read(&mut buf[..n])?;
        self.position += read as u64;
        Ok(read)
    }
}
