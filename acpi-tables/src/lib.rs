pub mod apic;
pub mod dmar;
pub mod error;

pub use self::error::Error;

use bytes::Bytes;

pub(crate) trait StructureSet: Sized {
    const HEADER_LEN: usize;

    fn read_header(header: &mut Bytes) -> (u16, usize);

    fn decode(ty: u16, record: &Bytes) -> Result<Self, Error>;
}

pub(crate) fn walk_structures<S: StructureSet>(buf: &Bytes, start: usize) -> Result<Vec<S>, Error> {
    let mut structures = vec![];

    let len = buf.len();
    let mut cursor = start;
    while cursor + 1 < len {
        if len - cursor < S::HEADER_LEN {
            return Err(Error::MalformedRecord {
                need: S::HEADER_LEN,
                have: len - cursor,
            });
        }

        let mut header = buf.slice(cursor..cursor + S::HEADER_LEN);
        let (ty, length) = S::read_header(&mut header);
        if length == 0 {
            break;
        }

        if cursor + length > len {
            return Err(Error::MalformedRecord {
                need: length,
                have: len - cursor,
            });
        }

        let record = buf.slice(cursor..cursor + length);
        structures.push(S::decode(ty, &record)?);

        cursor += length;
    }

    Ok(structures)
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x} ", byte)).collect()
}
