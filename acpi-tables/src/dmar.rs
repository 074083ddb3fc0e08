use crate::error::Error;
use crate::{hex_string, walk_structures, StructureSet};
use acpi_tables_derive::ACPI;
use bytes::{Buf, Bytes};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

pub const DMAR_STRUCTURE_DRHD: u16 = 0x00;
pub const DMAR_STRUCTURE_RMRR: u16 = 0x01;
pub const DMAR_STRUCTURE_ATSR: u16 = 0x02;
pub const DMAR_STRUCTURE_RHSA: u16 = 0x03;
pub const DMAR_STRUCTURE_ANDD: u16 = 0x04;

pub const DMAR_DS_TYPE_PCI_ENDPOINT: u8 = 0x01;
pub const DMAR_DS_TYPE_PCIPCI_BRIDGE: u8 = 0x02;
pub const DMAR_DS_TYPE_IOAPIC: u8 = 0x03;
pub const DMAR_DS_TYPE_MSI_CAPABLE_HPET: u8 = 0x04;
pub const DMAR_DS_TYPE_ACPI_NAMESPACE: u8 = 0x05;

static SCOPE_TYPE_NAMES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    let mut names = HashMap::new();
    names.insert(DMAR_DS_TYPE_PCI_ENDPOINT, "PCI Endpoint Device");
    names.insert(DMAR_DS_TYPE_PCIPCI_BRIDGE, "PCI-PCI Bridge");
    names.insert(DMAR_DS_TYPE_IOAPIC, "I/O APIC Device");
    names.insert(DMAR_DS_TYPE_MSI_CAPABLE_HPET, "MSI Capable HPET");
    names.insert(DMAR_DS_TYPE_ACPI_NAMESPACE, "ACPI Namespace Device");
    names
});

pub fn get_scope_type_name(ty: u8) -> Option<&'static str> {
    SCOPE_TYPE_NAMES.get(&ty).cloned()
}

type Decoder = fn(&Bytes) -> Result<DmarStructure, Error>;

static STRUCTURE_DECODERS: Lazy<HashMap<u16, Decoder>> = Lazy::new(|| {
    let mut decoders: HashMap<u16, Decoder> = HashMap::new();
    decoders.insert(DMAR_STRUCTURE_DRHD, decode_drhd);
    decoders.insert(DMAR_STRUCTURE_RMRR, decode_rmrr);
    decoders.insert(DMAR_STRUCTURE_ATSR, decode_atsr);
    decoders.insert(DMAR_STRUCTURE_RHSA, decode_rhsa);
    decoders.insert(DMAR_STRUCTURE_ANDD, decode_andd);
    decoders
});

fn decode_drhd(record: &Bytes) -> Result<DmarStructure, Error> {
    Ok(DmarStructure::Drhd(Drhd::from_record(record)?))
}

fn decode_rmrr(record: &Bytes) -> Result<DmarStructure, Error> {
    Ok(DmarStructure::Rmrr(Rmrr::from_record(record)?))
}

fn decode_atsr(record: &Bytes) -> Result<DmarStructure, Error> {
    Ok(DmarStructure::Atsr(Atsr::from_record(record)?))
}

fn decode_rhsa(record: &Bytes) -> Result<DmarStructure, Error> {
    Ok(DmarStructure::Rhsa(Rhsa::from_record(record)?))
}

fn decode_andd(record: &Bytes) -> Result<DmarStructure, Error> {
    Ok(DmarStructure::Andd(Andd::from_record(record)?))
}

#[derive(Debug, PartialEq, Eq)]
pub struct Dmar {
    pub host_addr_width: u8,
    pub flags: u8,
    pub reserved: [u8; 10],
    pub structures: Vec<DmarStructure>,
}

impl Dmar {
    pub const HEADER_LEN: usize = 12;

    pub fn parse(buf: &Bytes) -> Result<Dmar, Error> {
        if buf.len() < Self::HEADER_LEN {
            return Err(Error::InsufficientData {
                need: Self::HEADER_LEN,
                have: buf.len(),
            });
        }

        let mut header = buf.slice(0..Self::HEADER_LEN);
        let host_addr_width = header.get_u8();
        let flags = header.get_u8();
        let mut reserved = [0u8; 10];
        header.copy_to_slice(&mut reserved);

        let structures = walk_structures::<DmarStructure>(buf, Self::HEADER_LEN)?;

        Ok(Dmar {
            host_addr_width,
            flags,
            reserved,
            structures,
        })
    }
}

impl fmt::Display for Dmar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "------------------------------------------------------------------"
        )?;
        writeln!(f, "  DMAR Table Contents")?;
        writeln!(
            f,
            "------------------------------------------------------------------"
        )?;
        writeln!(f, "  Host Address Width  : {}", self.host_addr_width)?;
        writeln!(f, "  Flags               : 0x{:02X}", self.flags)?;
        writeln!(f, "  Reserved            : {}", hex_string(&self.reserved))?;
        writeln!(f)?;
        writeln!(f, "  Remapping Structures:")?;
        for st in &self.structures {
            write!(f, "{}", st)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DmarStructure {
    Drhd(Drhd),
    Rmrr(Rmrr),
    Atsr(Atsr),
    Rhsa(Rhsa),
    Andd(Andd),
    Unknown(UnknownStructure),
}

impl StructureSet for DmarStructure {
    const HEADER_LEN: usize = 4;

    fn read_header(header: &mut Bytes) -> (u16, usize) {
        let ty = header.get_u16_le();
        let length = header.get_u16_le() as usize;
        (ty, length)
    }

    fn decode(ty: u16, record: &Bytes) -> Result<Self, Error> {
        match STRUCTURE_DECODERS.get(&ty) {
            Some(decode) => decode(record),
            None => Ok(DmarStructure::Unknown(UnknownStructure {
                ty,
                data: record.clone(),
            })),
        }
    }
}

impl fmt::Display for DmarStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmarStructure::Drhd(st) => st.fmt(f),
            DmarStructure::Rmrr(st) => st.fmt(f),
            DmarStructure::Atsr(st) => st.fmt(f),
            DmarStructure::Rhsa(st) => st.fmt(f),
            DmarStructure::Andd(st) => st.fmt(f),
            DmarStructure::Unknown(st) => st.fmt(f),
        }
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct DeviceScope {
    ty: u8,
    length: u8,
    reserved: u16,
    enumeration_id: u8,
    start_bus_num: u8,
    #[acpi(trailer)]
    path: Vec<u8>,
}

impl DeviceScope {
    pub(crate) fn parse_all(buf: &Bytes) -> Result<Vec<DeviceScope>, Error> {
        walk_structures::<DeviceScope>(buf, 0)
    }
}

impl StructureSet for DeviceScope {
    const HEADER_LEN: usize = 2;

    fn read_header(header: &mut Bytes) -> (u16, usize) {
        let ty = header.get_u8() as u16;
        let length = header.get_u8() as usize;
        (ty, length)
    }

    fn decode(_ty: u16, record: &Bytes) -> Result<Self, Error> {
        DeviceScope::from_record(record)
    }
}

impl fmt::Display for DeviceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "      {} ({:02X}): Len: 0x{:02X}, Rsvd: 0x{:04X}, Enum ID: 0x{:02X}, Start Bus#: 0x{:02X}, Path: {}",
            get_scope_type_name(self.ty).unwrap_or("Unknown"),
            self.ty,
            self.length,
            self.reserved,
            self.enumeration_id,
            self.start_bus_num,
            hex_string(&self.path)
        )
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Drhd {
    ty: u16,
    length: u16,
    flags: u8,
    reserved: u8,
    segment_number: u16,
    register_base_addr: u64,
    #[acpi(scopes)]
    device_scope: Vec<DeviceScope>,
}

impl fmt::Display for Drhd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "  DMA Remapping Hardware Unit Definition (0x{:04X}):",
            self.ty
        )?;
        writeln!(f, "    Length                : 0x{:04X}", self.length)?;
        writeln!(f, "    Flags                 : 0x{:02X}", self.flags)?;
        writeln!(f, "    Reserved              : 0x{:02X}", self.reserved)?;
        writeln!(f, "    Segment Number        : 0x{:04X}", self.segment_number)?;
        writeln!(
            f,
            "    Register Base Address : 0x{:016X}",
            self.register_base_addr
        )?;
        writeln!(f, "    Device Scope          :")?;
        for ds in &self.device_scope {
            write!(f, "{}", ds)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Rmrr {
    ty: u16,
    length: u16,
    reserved: u16,
    segment_number: u16,
    rmr_base_addr: u64,
    rmr_limit_addr: u64,
    #[acpi(scopes)]
    device_scope: Vec<DeviceScope>,
}

impl fmt::Display for Rmrr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Reserved Memory Range (0x{:04X}):", self.ty)?;
        writeln!(f, "    Length                : 0x{:04X}", self.length)?;
        writeln!(f, "    Reserved              : 0x{:04X}", self.reserved)?;
        writeln!(f, "    Segment Number        : 0x{:04X}", self.segment_number)?;
        writeln!(
            f,
            "    Reserved Memory Base  : 0x{:016X}",
            self.rmr_base_addr
        )?;
        writeln!(
            f,
            "    Reserved Memory Limit : 0x{:016X}",
            self.rmr_limit_addr
        )?;
        writeln!(f, "    Device Scope          :")?;
        for ds in &self.device_scope {
            write!(f, "{}", ds)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Atsr {
    ty: u16,
    length: u16,
    flags: u8,
    reserved: u8,
    segment_number: u16,
    #[acpi(scopes)]
    device_scope: Vec<DeviceScope>,
}

impl fmt::Display for Atsr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Root Port ATS Capability (0x{:04X}):", self.ty)?;
        writeln!(f, "    Length                : 0x{:04X}", self.length)?;
        writeln!(f, "    Flags                 : 0x{:02X}", self.flags)?;
        writeln!(f, "    Reserved (0)          : 0x{:02X}", self.reserved)?;
        writeln!(f, "    Segment Number        : 0x{:04X}", self.segment_number)?;
        writeln!(f, "    Device Scope          :")?;
        for ds in &self.device_scope {
            write!(f, "{}", ds)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Rhsa {
    ty: u16,
    length: u16,
    reserved: u32,
    register_base_addr: u64,
    proximity_domain: u32,
}

impl fmt::Display for Rhsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Remapping Hardware Status Affinity (0x{:04X}):", self.ty)?;
        writeln!(f, "    Length                : 0x{:04X}", self.length)?;
        writeln!(f, "    Reserved (0)          : 0x{:08X}", self.reserved)?;
        writeln!(
            f,
            "    Register Base Address : 0x{:016X}",
            self.register_base_addr
        )?;
        writeln!(
            f,
            "    Proximity Domain      : 0x{:08X}",
            self.proximity_domain
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Andd {
    ty: u16,
    length: u16,
    reserved: [u8; 3],
    acpi_dev_num: u8,
    #[acpi(trailer)]
    acpi_object_name: Vec<u8>,
}

impl Andd {
    pub fn acpi_object_name_str(&self) -> String {
        String::from_utf8_lossy(&self.acpi_object_name)
            .trim_end_matches('\0')
            .to_string()
    }
}

impl fmt::Display for Andd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "  ACPI Name-space Device Declaration (0x{:04X}):",
            self.ty
        )?;
        writeln!(f, "    Length                : 0x{:04X}", self.length)?;
        writeln!(f, "    Reserved (0)          : {}", hex_string(&self.reserved))?;
        writeln!(f, "    ACPI Device Number    : 0x{:02X}", self.acpi_dev_num)?;
        writeln!(
            f,
            "    ACPI Object Name      : {}",
            self.acpi_object_name_str()
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStructure {
    pub ty: u16,
    pub data: Bytes,
}

impl fmt::Display for UnknownStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Unknown Remapping Structure (0x{:04X}):", self.ty)?;
        writeln!(f, "    Data                  : {}", hex_string(&self.data))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_header(host_addr_width: u8, flags: u8) -> Vec<u8> {
        let mut buf = vec![host_addr_width, flags];
        buf.extend_from_slice(&[0u8; 10]);
        buf
    }

    fn drhd_record() -> Vec<u8> {
        vec![
            0x00, 0x00, // type
            0x10, 0x00, // length
            0x01, // flags
            0x00, // reserved
            0x00, 0x00, // segment number
            0x00, 0x00, 0xD9, 0xFE, 0x00, 0x00, 0x00, 0x00, // register base address
        ]
    }

    fn rhsa_record() -> Vec<u8> {
        vec![
            0x03, 0x00, // type
            0x14, 0x00, // length
            0x00, 0x00, 0x00, 0x00, // reserved
            0x00, 0x10, 0xD9, 0xFE, 0x00, 0x00, 0x00, 0x00, // register base address
            0x01, 0x00, 0x00, 0x00, // proximity domain
        ]
    }

    #[test]
    fn parse_drhd() {
        let mut table = table_header(0x26, 0x01);
        table.extend_from_slice(&drhd_record());

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        assert_eq!(0x26, dmar.host_addr_width);
        assert_eq!(0x01, dmar.flags);
        assert_eq!([0u8; 10], dmar.reserved);
        assert_eq!(1, dmar.structures.len());
        match &dmar.structures[0] {
            DmarStructure::Drhd(drhd) => {
                assert_eq!(0x0000, drhd.ty());
                assert_eq!(0x0010, drhd.length());
                assert_eq!(0x01, drhd.flags());
                assert_eq!(0x0000, drhd.segment_number());
                assert_eq!(0xFED9_0000, drhd.register_base_addr());
                assert!(drhd.device_scope().is_empty());
            }
            other => panic!("unexpected structure {:?}", other),
        }
    }

    #[test]
    fn parse_drhd_device_scopes() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[
            0x00, 0x00, // type
            0x22, 0x00, // length (16 + 8 + 10)
            0x00, // flags
            0x00, // reserved
            0x00, 0x00, // segment number
            0x00, 0x00, 0xD9, 0xFE, 0x00, 0x00, 0x00, 0x00, // register base address
            // scope: PCI endpoint, 2-byte path
            0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x1F, 0x07,
            // scope: I/O APIC, 4-byte path
            0x03, 0x0A, 0x00, 0x00, 0x05, 0x0F, 0x02, 0x00, 0x1C, 0x01,
        ]);

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        assert_eq!(1, dmar.structures.len());
        let drhd = match &dmar.structures[0] {
            DmarStructure::Drhd(drhd) => drhd,
            other => panic!("unexpected structure {:?}", other),
        };

        let scopes = drhd.device_scope();
        assert_eq!(2, scopes.len());

        assert_eq!(DMAR_DS_TYPE_PCI_ENDPOINT, scopes[0].ty());
        assert_eq!(0x08, scopes[0].length());
        assert_eq!(&[0x1F, 0x07], scopes[0].path());

        assert_eq!(DMAR_DS_TYPE_IOAPIC, scopes[1].ty());
        assert_eq!(0x05, scopes[1].enumeration_id());
        assert_eq!(0x0F, scopes[1].start_bus_num());
        assert_eq!(&[0x02, 0x00, 0x1C, 0x01], scopes[1].path());
    }

    #[test]
    fn scope_type_names() {
        assert_eq!(
            Some("PCI Endpoint Device"),
            get_scope_type_name(DMAR_DS_TYPE_PCI_ENDPOINT)
        );
        assert_eq!(
            Some("ACPI Namespace Device"),
            get_scope_type_name(DMAR_DS_TYPE_ACPI_NAMESPACE)
        );
        assert_eq!(None, get_scope_type_name(0x06));
    }

    #[test]
    fn zero_length_structure_stops_walk() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        assert!(dmar.structures.is_empty());
    }

    #[test]
    fn unknown_structure_keeps_raw_bytes() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[0x07, 0x00, 0x06, 0x00, 0xAA, 0xBB]);
        table.extend_from_slice(&rhsa_record());

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        assert_eq!(2, dmar.structures.len());
        match &dmar.structures[0] {
            DmarStructure::Unknown(unknown) => {
                assert_eq!(0x0007, unknown.ty);
                assert_eq!(&[0x07, 0x00, 0x06, 0x00, 0xAA, 0xBB], unknown.data.as_ref());
            }
            other => panic!("unexpected structure {:?}", other),
        }
        match &dmar.structures[1] {
            DmarStructure::Rhsa(rhsa) => {
                assert_eq!(0xFED9_1000, rhsa.register_base_addr());
                assert_eq!(0x0000_0001, rhsa.proximity_domain());
            }
            other => panic!("unexpected structure {:?}", other),
        }
    }

    #[test]
    fn andd_object_name() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[0x04, 0x00, 0x0E, 0x00, 0x00, 0x00, 0x00, 0x01]);
        table.extend_from_slice(b"ECDV\0\0");

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        match &dmar.structures[0] {
            DmarStructure::Andd(andd) => {
                assert_eq!(0x000E, andd.length());
                assert_eq!(0x01, andd.acpi_dev_num());
                assert_eq!(b"ECDV\0\0", andd.acpi_object_name());
                assert_eq!("ECDV", andd.acpi_object_name_str());
            }
            other => panic!("unexpected structure {:?}", other),
        }
    }

    #[test]
    fn declared_length_below_fixed_portion() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[0x00, 0x00, 0x06, 0x00, 0x01, 0x00]);

        let result = Dmar::parse(&Bytes::from(table));

        assert!(matches!(result, Err(Error::MalformedRecord { .. })));
    }

    #[test]
    fn table_shorter_than_header() {
        let result = Dmar::parse(&Bytes::from(vec![0x26, 0x00, 0x00, 0x00, 0x00]));

        assert_eq!(
            Err(Error::InsufficientData { need: 12, have: 5 }),
            result
        );
    }

    #[test]
    fn truncation_at_every_offset() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&drhd_record());
        table.extend_from_slice(&rhsa_record());
        assert_eq!(48, table.len());

        for cut in 0..=table.len() {
            let result = Dmar::parse(&Bytes::from(table[..cut].to_vec()));
            match cut {
                0..=11 => assert!(
                    matches!(result, Err(Error::InsufficientData { .. })),
                    "cut at {}",
                    cut
                ),
                // record boundaries, with or without a single trailing byte
                12 | 13 => assert_eq!(0, result.unwrap().structures.len(), "cut at {}", cut),
                28 | 29 => assert_eq!(1, result.unwrap().structures.len(), "cut at {}", cut),
                48 => assert_eq!(2, result.unwrap().structures.len()),
                _ => assert!(
                    matches!(result, Err(Error::MalformedRecord { .. })),
                    "cut at {}",
                    cut
                ),
            }
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let mut table = table_header(0x26, 0x01);
        table.extend_from_slice(&drhd_record());
        table.extend_from_slice(&rhsa_record());
        let buf = Bytes::from(table);

        let first = Dmar::parse(&buf).unwrap();
        let second = Dmar::parse(&buf).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn render_drhd_report() {
        let mut table = table_header(38, 0x01);
        table.extend_from_slice(&[
            0x00, 0x00, // type
            0x18, 0x00, // length (16 + 8)
            0x01, // flags
            0x00, // reserved
            0x00, 0x00, // segment number
            0x00, 0x00, 0xD9, 0xFE, 0x00, 0x00, 0x00, 0x00, // register base address
            0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x1F, 0x07, // scope
        ]);

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        let expected = concat!(
            "------------------------------------------------------------------\n",
            "  DMAR Table Contents\n",
            "------------------------------------------------------------------\n",
            "  Host Address Width  : 38\n",
            "  Flags               : 0x01\n",
            "  Reserved            : 00 00 00 00 00 00 00 00 00 00 \n",
            "\n",
            "  Remapping Structures:\n",
            "\n",
            "  DMA Remapping Hardware Unit Definition (0x0000):\n",
            "    Length                : 0x0018\n",
            "    Flags                 : 0x01\n",
            "    Reserved              : 0x00\n",
            "    Segment Number        : 0x0000\n",
            "    Register Base Address : 0x00000000FED90000\n",
            "    Device Scope          :\n",
            "      PCI Endpoint Device (01): Len: 0x08, Rsvd: 0x0000, Enum ID: 0x00, ",
            "Start Bus#: 0x00, Path: 1f 07 \n",
        );
        assert_eq!(expected, dmar.to_string());
    }

    #[test]
    fn render_unknown_structure() {
        let mut table = table_header(0x26, 0x00);
        table.extend_from_slice(&[0x07, 0x00, 0x06, 0x00, 0xAA, 0xBB]);

        let dmar = Dmar::parse(&Bytes::from(table)).unwrap();

        let rendered = dmar.to_string();
        assert!(rendered.contains("  Unknown Remapping Structure (0x0007):\n"));
        assert!(rendered.contains("    Data                  : 07 00 06 00 aa bb \n"));
    }
}
