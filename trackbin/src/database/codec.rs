//! Endianness-parameterized 32-bit integer codec for the bin index file.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

/// Size of one integer in the bin index file.
pub const WORD_BYTES: usize = 4;

/// Byte order of the bin index file.
///
/// Every integer is read and written through this value, so a file written
/// on one architecture can be read on another by naming its byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the running machine.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    /// The opposite byte order.
    pub fn swapped(self) -> Self {
        match self {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        }
    }

    pub(crate) fn read_i32<R: Read>(self, reader: &mut R) -> io::Result<i32> {
        match self {
            Endianness::Little => reader.read_i32::<LittleEndian>(),
            Endianness::Big => reader.read_i32::<BigEndian>(),
        }
    }

    pub(crate) fn write_i32<W: Write>(self, writer: &mut W, value: i32) -> io::Result<()> {
        match self {
            Endianness::Little => writer.write_i32::<LittleEndian>(value),
            Endianness::Big => writer.write_i32::<BigEndian>(value),
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little"),
            Endianness::Big => write!(f, "big"),
        }
    }
}

impl FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::native()),
            "little" | "le" => Ok(Endianness::Little),
            "big" | "be" => Ok(Endianness::Big),
            other => Err(format!("unknown byte order '{}'", other)),
        }
    }
}
