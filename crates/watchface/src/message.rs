//! Companion-app message dictionary and its wire codec
//!
//! A message is a small dictionary of integer keys to typed values:
//!
//! ```text
//! u8  count
//! count x {
//!     u32 key      (LE)
//!     u8  type     0 = bytes, 1 = C string, 2 = uint, 3 = int
//!     u16 length   (LE)
//!     [u8; length] data
//! }
//! ```
//!
//! C strings carry their trailing NUL. Integers are 1, 2 or 4 bytes,
//! little endian. Decoding borrows from the input; nothing is copied.

use heapless::Vec;
use thiserror::Error;

/// Most tuples one dictionary holds.
pub const MAX_TUPLES: usize = 8;

const TUPLE_HEADER_LEN: usize = 7;

/// Wire codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// The message does not fit the inbox.
    #[error("message of {len} bytes exceeds {capacity} byte inbox")]
    TooLarge {
        /// Message length.
        len: usize,
        /// Inbox capacity.
        capacity: usize,
    },
    /// The input ended in the middle of a field.
    #[error("message truncated at byte {offset}")]
    Truncated {
        /// Offset of the incomplete field.
        offset: usize,
    },
    /// More tuples than a dictionary can hold.
    #[error("{0} tuples exceed the dictionary capacity")]
    TooManyTuples(usize),
    /// Type tag outside 0..=3.
    #[error("key {key}: unknown tuple type {tag}")]
    UnknownType {
        /// Tuple key.
        key: u32,
        /// Type tag found.
        tag: u8,
    },
    /// Bytes left over after the last tuple.
    #[error("{0} trailing bytes after last tuple")]
    TrailingData(usize),
    /// Output buffer too small for [`Dictionary::encode`].
    #[error("encoding needs {needed} bytes, buffer has {capacity}")]
    BufferTooSmall {
        /// Encoded length.
        needed: usize,
        /// Buffer length.
        capacity: usize,
    },
    /// A value longer than the 16-bit length field allows.
    #[error("key {key}: value too long")]
    ValueTooLong {
        /// Tuple key.
        key: u32,
    },
}

/// A typed tuple value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleValue<'a> {
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// C string, without the terminator.
    CString(&'a str),
    /// Unsigned integer.
    UInt(u32),
    /// Signed integer.
    Int(i32),
}

impl TupleValue<'_> {
    const fn tag(&self) -> u8 {
        match self {
            Self::Bytes(_) => 0,
            Self::CString(_) => 1,
            Self::UInt(_) => 2,
            Self::Int(_) => 3,
        }
    }

    fn data_len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            Self::CString(s) => s.len() + 1,
            Self::UInt(_) | Self::Int(_) => 4,
        }
    }
}

/// One key/value entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    /// Integer key.
    pub key: u32,
    /// Typed value.
    pub value: TupleValue<'a>,
}

impl<'a> Tuple<'a> {
    /// C-string tuple.
    pub const fn cstring(key: u32, value: &'a str) -> Self {
        Self {
            key,
            value: TupleValue::CString(value),
        }
    }

    /// Unsigned integer tuple.
    pub const fn uint(key: u32, value: u32) -> Self {
        Self {
            key,
            value: TupleValue::UInt(value),
        }
    }

    /// Returns `true` only for the C string `"true"`.
    ///
    /// Every other string, integer or byte value reads as false.
    pub fn is_true(&self) -> bool {
        matches!(self.value, TupleValue::CString("true"))
    }

    fn encoded_len(&self) -> usize {
        TUPLE_HEADER_LEN + self.value.data_len()
    }
}

/// Up to [`MAX_TUPLES`] tuples, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary<'a> {
    tuples: Vec<Tuple<'a>, MAX_TUPLES>,
}

impl<'a> Dictionary<'a> {
    /// Empty dictionary.
    pub const fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    /// Append a tuple. Returns it back when the dictionary is full.
    pub fn push(&mut self, tuple: Tuple<'a>) -> Result<(), Tuple<'a>> {
        self.tuples.push(tuple)
    }

    /// First tuple stored under `key`.
    pub fn find(&self, key: u32) -> Option<&Tuple<'a>> {
        self.tuples.iter().find(|t| t.key == key)
    }

    /// Tuples in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Tuple<'a>> {
        self.tuples.iter()
    }

    /// Number of tuples.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns `true` if there are no tuples.
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Length of the wire encoding.
    pub fn encoded_len(&self) -> usize {
        1 + self.tuples.iter().map(Tuple::encoded_len).sum::<usize>()
    }

    /// Decode a message received into an inbox of `inbox_capacity` bytes.
    pub fn decode(bytes: &'a [u8], inbox_capacity: usize) -> Result<Self, MessageError> {
        if bytes.len() > inbox_capacity {
            return Err(MessageError::TooLarge {
                len: bytes.len(),
                capacity: inbox_capacity,
            });
        }
        let mut reader = Reader { bytes, pos: 0 };
        let count = usize::from(reader.u8()?);
        if count > MAX_TUPLES {
            return Err(MessageError::TooManyTuples(count));
        }
        let mut dict = Self::new();
        for _ in 0..count {
            let tuple = reader.tuple()?;
            dict.push(tuple)
                .map_err(|_| MessageError::TooManyTuples(count))?;
        }
        match bytes.len() - reader.pos {
            0 => Ok(dict),
            n => Err(MessageError::TrailingData(n)),
        }
    }

    /// Encode into `out`, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, MessageError> {
        let needed = self.encoded_len();
        if out.len() < needed {
            return Err(MessageError::BufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }
        let mut writer = Writer { out, pos: 0 };
        // At most MAX_TUPLES.
        #[allow(clippy::cast_possible_truncation)]
        writer.put(&[self.tuples.len() as u8]);
        for tuple in &self.tuples {
            let len = u16::try_from(tuple.value.data_len())
                .map_err(|_| MessageError::ValueTooLong { key: tuple.key })?;
            writer.put(&tuple.key.to_le_bytes());
            writer.put(&[tuple.value.tag()]);
            writer.put(&len.to_le_bytes());
            match tuple.value {
                TupleValue::Bytes(b) => writer.put(b),
                TupleValue::CString(s) => {
                    writer.put(s.as_bytes());
                    writer.put(&[0]);
                }
                TupleValue::UInt(v) => writer.put(&v.to_le_bytes()),
                TupleValue::Int(v) => writer.put(&v.to_le_bytes()),
            }
        }
        Ok(writer.pos)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], MessageError> {
        let out = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or(MessageError::Truncated { offset: self.pos })?;
        self.pos += n;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, MessageError> {
        let [b] = self.array::<1>()?;
        Ok(b)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], MessageError> {
        let offset = self.pos;
        self.take(N)?
            .try_into()
            .map_err(|_| MessageError::Truncated { offset })
    }

    fn tuple(&mut self) -> Result<Tuple<'a>, MessageError> {
        let key = u32::from_le_bytes(self.array()?);
        let tag = self.u8()?;
        let len = u16::from_le_bytes(self.array()?);
        let data = self.take(usize::from(len))?;
        let value = match tag {
            0 => TupleValue::Bytes(data),
            1 => cstring(data).map_or(TupleValue::Bytes(data), TupleValue::CString),
            2 => match *data {
                [a] => TupleValue::UInt(u32::from(a)),
                [a, b] => TupleValue::UInt(u32::from(u16::from_le_bytes([a, b]))),
                [a, b, c, d] => TupleValue::UInt(u32::from_le_bytes([a, b, c, d])),
                _ => TupleValue::Bytes(data),
            },
            3 => match *data {
                [a] => TupleValue::Int(i32::from(i8::from_le_bytes([a]))),
                [a, b] => TupleValue::Int(i32::from(i16::from_le_bytes([a, b]))),
                [a, b, c, d] => TupleValue::Int(i32::from_le_bytes([a, b, c, d])),
                _ => TupleValue::Bytes(data),
            },
            tag => return Err(MessageError::UnknownType { key, tag }),
        };
        if tag != 0 && matches!(value, TupleValue::Bytes(_)) {
            tracing::debug!(key, tag, len, "malformed value kept as raw bytes");
        }
        Ok(Tuple { key, value })
    }
}

/// Text of a NUL-terminated UTF-8 string, up to its first NUL.
fn cstring(data: &[u8]) -> Option<&str> {
    let (last, text) = data.split_last()?;
    if *last != 0 {
        return None;
    }
    let text = text.split(|b| *b == 0).next().unwrap_or(text);
    core::str::from_utf8(text).ok()
}

struct Writer<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    // Callers check the total length up front.
    fn put(&mut self, bytes: &[u8]) {
        if let Some(dst) = self.out.get_mut(self.pos..self.pos + bytes.len()) {
            dst.copy_from_slice(bytes);
        }
        self.pos += bytes.len();
    }
}
