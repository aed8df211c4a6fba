// TuskTsk - Configuration Language Toolkit
//
// Copyright (c) 2025 TuskTsk authors and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte sources for the two decode paths.
//!
//! [`StreamReader`] reads sequentially from any [`Read`] and counts bytes as
//! it goes. [`MappedReader`] addresses a borrowed slice (usually a memory
//! map) by absolute offset and hands out sub-slices without copying. The
//! decoder is generic over [`ByteSource`], so field offsets are computed by
//! one piece of code for both paths and cannot drift apart.

use std::borrow::Cow;
use std::io::{self, Read};

use crate::error::{LoadError, PntResult};

/// Little-endian primitive reads with position tracking.
pub trait ByteSource {
    /// Offset of the next byte to be read.
    fn position(&self) -> usize;

    /// Fill `buf` completely or fail.
    fn read_into(&mut self, buf: &mut [u8]) -> PntResult<()>;

    /// Read `len` bytes, borrowing from the source when possible.
    fn read_bytes(&mut self, len: usize) -> PntResult<Cow<'_, [u8]>>;

    fn read_array<const N: usize>(&mut self) -> PntResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> PntResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_bool(&mut self) -> PntResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u16(&mut self) -> PntResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> PntResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> PntResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    fn read_i64(&mut self) -> PntResult<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    fn read_f64(&mut self) -> PntResult<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Read `len` bytes of UTF-8.
    fn read_string(&mut self, len: usize) -> PntResult<String> {
        let start = self.position();
        let bytes = self.read_bytes(len)?;
        match bytes {
            Cow::Borrowed(b) => std::str::from_utf8(b).map(str::to_owned).map_err(|e| invalid_utf8(start, e)),
            Cow::Owned(b) => String::from_utf8(b).map_err(|e| invalid_utf8(start, e.utf8_error())),
        }
    }

    /// Skip `len` bytes.
    fn skip(&mut self, len: usize) -> PntResult<()> {
        self.read_bytes(len).map(|_| ())
    }
}

fn invalid_utf8(offset: usize, err: std::str::Utf8Error) -> LoadError {
    LoadError::corrupt(offset, format!("invalid UTF-8: {}", err))
}

fn truncated(offset: usize, wanted: usize) -> LoadError {
    LoadError::corrupt(offset, format!("unexpected end of data reading {} bytes", wanted))
}

// ==================== Sequential path ====================

/// Sequential cursor over a reader.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for StreamReader<R> {
    fn position(&self) -> usize {
        self.pos
    }

    fn read_into(&mut self, buf: &mut [u8]) -> PntResult<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len();
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(truncated(self.pos, buf.len())),
            Err(e) => Err(LoadError::Io(e)),
        }
    }

    fn read_bytes(&mut self, len: usize) -> PntResult<Cow<'_, [u8]>> {
        // Grow as data arrives instead of trusting `len` up front.
        let mut buf = Vec::with_capacity(len.min(64 * 1024));
        let read = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(LoadError::Io)?;
        if read < len {
            return Err(truncated(self.pos, len));
        }
        self.pos += len;
        Ok(Cow::Owned(buf))
    }
}

// ==================== Mapped path ====================

/// Random-access reader over a byte slice.
#[derive(Debug, Clone)]
pub struct MappedReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MappedReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total length of the underlying slice.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes at an absolute offset, independent of the cursor.
    pub fn slice_at(&self, offset: usize, len: usize) -> PntResult<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| truncated(offset, len))
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: usize) -> PntResult<()> {
        if offset > self.data.len() {
            return Err(truncated(offset, 0));
        }
        self.pos = offset;
        Ok(())
    }

    /// Everything from the cursor to the end.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for MappedReader<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn read_into(&mut self, buf: &mut [u8]) -> PntResult<()> {
        let src = self.slice_at(self.pos, buf.len())?;
        buf.copy_from_slice(src);
        self.pos += buf.len();
        Ok(())
    }

    fn read_bytes(&mut self, len: usize) -> PntResult<Cow<'_, [u8]>> {
        let src = self.slice_at(self.pos, len)?;
        self.pos += len;
        Ok(Cow::Borrowed(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 15] = [
        0x20, 0x50, 0x4E, 0x54, // u32
        0x01, 0x00, // u16
        0xFF, 0xFF, 0xFF, 0xFF, // i32 -1
        b'h', b'i', b'!', // string
        0x01, // bool
        0x07, // trailing
    ];

    fn read_sample<S: ByteSource>(src: &mut S) -> (u32, u16, i32, String, bool, usize) {
        let sig = src.read_u32().unwrap();
        let version = src.read_u16().unwrap();
        let n = src.read_i32().unwrap();
        let text = src.read_string(3).unwrap();
        let flag = src.read_bool().unwrap();
        (sig, version, n, text, flag, src.position())
    }

    #[test]
    fn test_both_readers_agree() {
        let mut stream = StreamReader::new(&SAMPLE[..]);
        let mut mapped = MappedReader::new(&SAMPLE);
        let a = read_sample(&mut stream);
        let b = read_sample(&mut mapped);
        assert_eq!(a, b);
        assert_eq!(a, (0x544E5020, 1, -1, "hi!".to_string(), true, 14));
    }

    #[test]
    fn test_truncation_reports_offset() {
        let mut stream = StreamReader::new(&SAMPLE[..4]);
        stream.read_u16().unwrap();
        let err = stream.read_i32().unwrap_err();
        assert!(matches!(err, LoadError::CorruptData { offset: 2, .. }));

        let mut mapped = MappedReader::new(&SAMPLE[..4]);
        mapped.read_u16().unwrap();
        let err = mapped.read_i32().unwrap_err();
        assert!(matches!(err, LoadError::CorruptData { offset: 2, .. }));
    }

    #[test]
    fn test_huge_length_does_not_allocate_up_front() {
        let mut stream = StreamReader::new(&SAMPLE[..]);
        assert!(stream.read_bytes(usize::MAX / 2).is_err());

        let mut mapped = MappedReader::new(&SAMPLE);
        assert!(mapped.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_mapped_borrows() {
        let mut mapped = MappedReader::new(&SAMPLE);
        mapped.seek(10).unwrap();
        match mapped.read_bytes(3).unwrap() {
            Cow::Borrowed(b) => assert_eq!(b, b"hi!"),
            Cow::Owned(_) => panic!("mapped reader copied"),
        }
        assert_eq!(mapped.remaining(), &[0x01, 0x07]);
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [0xC3, 0x28];
        let err = MappedReader::new(&bytes).read_string(2).unwrap_err();
        assert!(matches!(err, LoadError::CorruptData { offset: 0, .. }));
    }
}
