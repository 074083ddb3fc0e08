use crate::error::Error;
use crate::{hex_string, walk_structures, StructureSet};
use acpi_tables_derive::ACPI;
use bytes::{Buf, Bytes};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

pub const APIC_STRUCTURE_PROCESSOR_LAPIC: u8 = 0x00;
pub const APIC_STRUCTURE_IOAPIC: u8 = 0x01;
pub const APIC_STRUCTURE_INTERRUPT_SOURCE_OVERRIDE: u8 = 0x02;
pub const APIC_STRUCTURE_NMI_SOURCE: u8 = 0x03;
pub const APIC_STRUCTURE_LAPIC_NMI: u8 = 0x04;
pub const APIC_STRUCTURE_LAPIC_ADDRESS_OVERRIDE: u8 = 0x05;
pub const APIC_STRUCTURE_IOSAPIC: u8 = 0x06;
pub const APIC_STRUCTURE_PROCESSOR_LSAPIC: u8 = 0x07;
pub const APIC_STRUCTURE_PLATFORM_INTERRUPT_SOURCES: u8 = 0x08;
pub const APIC_STRUCTURE_PROCESSOR_LX2APIC: u8 = 0x09;
pub const APIC_STRUCTURE_LX2APIC_NMI: u8 = 0x0A;
pub const APIC_STRUCTURE_GICC_CPU: u8 = 0x0B;
pub const APIC_STRUCTURE_GIC_DISTRIBUTOR: u8 = 0x0C;
pub const APIC_STRUCTURE_GIC_MSI: u8 = 0x0D;
pub const APIC_STRUCTURE_GIC_REDISTRIBUTOR: u8 = 0x0E;

type Decoder = fn(&Bytes) -> Result<ApicStructure, Error>;

static STRUCTURE_DECODERS: Lazy<HashMap<u8, Decoder>> = Lazy::new(|| {
    let mut decoders: HashMap<u8, Decoder> = HashMap::new();
    decoders.insert(APIC_STRUCTURE_PROCESSOR_LAPIC, decode_processor_lapic);
    decoders.insert(APIC_STRUCTURE_IOAPIC, decode_ioapic);
    decoders.insert(
        APIC_STRUCTURE_INTERRUPT_SOURCE_OVERRIDE,
        decode_interrupt_source_override,
    );
    decoders.insert(APIC_STRUCTURE_NMI_SOURCE, decode_nmi_source);
    decoders.insert(APIC_STRUCTURE_LAPIC_NMI, decode_lapic_nmi);
    decoders.insert(
        APIC_STRUCTURE_LAPIC_ADDRESS_OVERRIDE,
        decode_lapic_address_override,
    );
    decoders.insert(APIC_STRUCTURE_IOSAPIC, decode_iosapic);
    decoders.insert(APIC_STRUCTURE_PROCESSOR_LSAPIC, decode_local_sapic);
    decoders.insert(
        APIC_STRUCTURE_PLATFORM_INTERRUPT_SOURCES,
        decode_platform_interrupt_sources,
    );
    decoders.insert(APIC_STRUCTURE_PROCESSOR_LX2APIC, decode_processor_lx2apic);
    decoders.insert(APIC_STRUCTURE_LX2APIC_NMI, decode_lx2apic_nmi);
    decoders.insert(APIC_STRUCTURE_GICC_CPU, decode_gicc_cpu_interface);
    decoders.insert(APIC_STRUCTURE_GIC_DISTRIBUTOR, decode_gic_distributor);
    decoders.insert(APIC_STRUCTURE_GIC_MSI, decode_gic_msi_frame);
    decoders.insert(APIC_STRUCTURE_GIC_REDISTRIBUTOR, decode_gic_redistributor);
    decoders
});

fn decode_processor_lapic(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::ProcessorLapic(ProcessorLapic::from_record(
        record,
    )?))
}

fn decode_ioapic(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::IoApic(IoApic::from_record(record)?))
}

fn decode_interrupt_source_override(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::InterruptSourceOverride(
        InterruptSourceOverride::from_record(record)?,
    ))
}

fn decode_nmi_source(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::NmiSource(NmiSource::from_record(record)?))
}

fn decode_lapic_nmi(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::LapicNmi(LapicNmi::from_record(record)?))
}

fn decode_lapic_address_override(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::LapicAddressOverride(
        LapicAddressOverride::from_record(record)?,
    ))
}

fn decode_iosapic(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::IoSapic(IoSapic::from_record(record)?))
}

fn decode_local_sapic(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::LocalSapic(LocalSapic::from_record(record)?))
}

fn decode_platform_interrupt_sources(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::PlatformInterruptSources(
        PlatformInterruptSources::from_record(record)?,
    ))
}

fn decode_processor_lx2apic(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::ProcessorLx2apic(
        ProcessorLx2apic::from_record(record)?,
    ))
}

fn decode_lx2apic_nmi(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::Lx2apicNmi(Lx2apicNmi::from_record(record)?))
}

fn decode_gicc_cpu_interface(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::GiccCpuInterface(
        GiccCpuInterface::from_record(record)?,
    ))
}

fn decode_gic_distributor(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::GicDistributor(GicDistributor::from_record(
        record,
    )?))
}

fn decode_gic_msi_frame(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::GicMsiFrame(GicMsiFrame::from_record(
        record,
    )?))
}

fn decode_gic_redistributor(record: &Bytes) -> Result<ApicStructure, Error> {
    Ok(ApicStructure::GicRedistributor(
        GicRedistributor::from_record(record)?,
    ))
}

#[derive(Debug, PartialEq, Eq)]
pub struct Apic {
    pub lapic_base: u32,
    pub flags: u32,
    pub structures: Vec<ApicStructure>,
}

impl Apic {
    pub const HEADER_LEN: usize = 8;

    pub fn parse(buf: &Bytes) -> Result<Apic, Error> {
        if buf.len() < Self::HEADER_LEN {
            return Err(Error::InsufficientData {
                need: Self::HEADER_LEN,
                have: buf.len(),
            });
        }

        let mut header = buf.slice(0..Self::HEADER_LEN);
        let lapic_base = header.get_u32_le();
        let flags = header.get_u32_le();

        let structures = walk_structures::<ApicStructure>(buf, Self::HEADER_LEN)?;

        Ok(Apic {
            lapic_base,
            flags,
            structures,
        })
    }
}

impl fmt::Display for Apic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "------------------------------------------------------------------"
        )?;
        writeln!(f, "  APIC Table Contents")?;
        writeln!(
            f,
            "------------------------------------------------------------------"
        )?;
        writeln!(f, "  Local APIC Base  : 0x{:08X}", self.lapic_base)?;
        writeln!(f, "  Flags            : 0x{:08X}", self.flags)?;
        writeln!(f)?;
        writeln!(f, "  Interrupt Controller Structures:")?;
        for st in &self.structures {
            write!(f, "{}", st)?;
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApicStructure {
    ProcessorLapic(ProcessorLapic),
    IoApic(IoApic),
    InterruptSourceOverride(InterruptSourceOverride),
    NmiSource(NmiSource),
    LapicNmi(LapicNmi),
    LapicAddressOverride(LapicAddressOverride),
    IoSapic(IoSapic),
    LocalSapic(LocalSapic),
    PlatformInterruptSources(PlatformInterruptSources),
    ProcessorLx2apic(ProcessorLx2apic),
    Lx2apicNmi(Lx2apicNmi),
    GiccCpuInterface(GiccCpuInterface),
    GicDistributor(GicDistributor),
    GicMsiFrame(GicMsiFrame),
    GicRedistributor(GicRedistributor),
    Unknown(UnknownStructure),
}

impl StructureSet for ApicStructure {
    const HEADER_LEN: usize = 2;

    fn read_header(header: &mut Bytes) -> (u16, usize) {
        let ty = header.get_u8() as u16;
        let length = header.get_u8() as usize;
        (ty, length)
    }

    fn decode(ty: u16, record: &Bytes) -> Result<Self, Error> {
        match STRUCTURE_DECODERS.get(&(ty as u8)) {
            Some(decode) => decode(record),
            None => Ok(ApicStructure::Unknown(UnknownStructure {
                ty: ty as u8,
                data: record.clone(),
            })),
        }
    }
}

impl fmt::Display for ApicStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApicStructure::ProcessorLapic(st) => st.fmt(f),
            ApicStructure::IoApic(st) => st.fmt(f),
            ApicStructure::InterruptSourceOverride(st) => st.fmt(f),
            ApicStructure::NmiSource(st) => st.fmt(f),
            ApicStructure::LapicNmi(st) => st.fmt(f),
            ApicStructure::LapicAddressOverride(st) => st.fmt(f),
            ApicStructure::IoSapic(st) => st.fmt(f),
            ApicStructure::LocalSapic(st) => st.fmt(f),
            ApicStructure::PlatformInterruptSources(st) => st.fmt(f),
            ApicStructure::ProcessorLx2apic(st) => st.fmt(f),
            ApicStructure::Lx2apicNmi(st) => st.fmt(f),
            ApicStructure::GiccCpuInterface(st) => st.fmt(f),
            ApicStructure::GicDistributor(st) => st.fmt(f),
            ApicStructure::GicMsiFrame(st) => st.fmt(f),
            ApicStructure::GicRedistributor(st) => st.fmt(f),
            ApicStructure::Unknown(st) => st.fmt(f),
        }
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct ProcessorLapic {
    ty: u8,
    length: u8,
    acpi_proc_id: u8,
    apic_id: u8,
    flags: u32,
}

impl fmt::Display for ProcessorLapic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Processor Local APIC (0x00)")?;
        writeln!(f, "    Type         : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length       : 0x{:02X}", self.length)?;
        writeln!(f, "    ACPI Proc ID : 0x{:02X}", self.acpi_proc_id)?;
        writeln!(f, "    APIC ID      : 0x{:02X}", self.apic_id)?;
        writeln!(f, "    Flags        : 0x{:08X}", self.flags)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct IoApic {
    ty: u8,
    length: u8,
    io_apic_id: u8,
    reserved: u8,
    io_apic_addr: u32,
    global_sys_int_base: u32,
}

impl fmt::Display for IoApic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  I/O APIC (0x01)")?;
        writeln!(f, "    Type                : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length              : 0x{:02X}", self.length)?;
        writeln!(f, "    I/O APIC ID         : 0x{:02X}", self.io_apic_id)?;
        writeln!(f, "    Reserved            : 0x{:02X}", self.reserved)?;
        writeln!(f, "    I/O APIC Base       : 0x{:08X}", self.io_apic_addr)?;
        writeln!(
            f,
            "    Global Sys Int Base : 0x{:08X}",
            self.global_sys_int_base
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct InterruptSourceOverride {
    ty: u8,
    length: u8,
    bus: u8,
    source: u8,
    global_sys_int_base: u32,
    flags: u16,
}

impl fmt::Display for InterruptSourceOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Interrupt Source Override (0x02)")?;
        writeln!(f, "    Type                : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length              : 0x{:02X}", self.length)?;
        writeln!(f, "    Bus                 : 0x{:02X}", self.bus)?;
        writeln!(f, "    Source              : 0x{:02X}", self.source)?;
        writeln!(
            f,
            "    Global Sys Int Base : 0x{:08X}",
            self.global_sys_int_base
        )?;
        writeln!(f, "    Flags               : 0x{:04X}", self.flags)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct NmiSource {
    ty: u8,
    length: u8,
    flags: u16,
    global_sys_int_base: u32,
}

impl fmt::Display for NmiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Non-maskable Interrupt (NMI) Source (0x03)")?;
        writeln!(f, "    Type                : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length              : 0x{:02X}", self.length)?;
        writeln!(f, "    Flags               : 0x{:04X}", self.flags)?;
        writeln!(
            f,
            "    Global Sys Int Base : 0x{:08X}",
            self.global_sys_int_base
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct LapicNmi {
    ty: u8,
    length: u8,
    acpi_processor_id: u8,
    flags: u16,
    local_apic_lint: u8,
}

impl fmt::Display for LapicNmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Local APIC NMI (0x04)")?;
        writeln!(f, "    Type              : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length            : 0x{:02X}", self.length)?;
        writeln!(f, "    ACPI Processor ID : 0x{:02X}", self.acpi_processor_id)?;
        writeln!(f, "    Flags             : 0x{:04X}", self.flags)?;
        writeln!(f, "    Local APIC LINT   : 0x{:02X}", self.local_apic_lint)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct LapicAddressOverride {
    ty: u8,
    length: u8,
    reserved: u16,
    local_apic_address: u64,
}

impl fmt::Display for LapicAddressOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Local APIC Address Override (0x05)")?;
        writeln!(f, "    Type               : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length             : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved           : 0x{:04X}", self.reserved)?;
        writeln!(
            f,
            "    Local APIC Address : 0x{:016X}",
            self.local_apic_address
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct IoSapic {
    ty: u8,
    length: u8,
    io_apic_id: u8,
    reserved: u8,
    global_sys_int_base: u32,
    io_sapic_address: u64,
}

impl fmt::Display for IoSapic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  I/O SAPIC (0x06)")?;
        writeln!(f, "    Type                : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length              : 0x{:02X}", self.length)?;
        writeln!(f, "    IO APIC ID          : 0x{:02X}", self.io_apic_id)?;
        writeln!(f, "    Reserved            : 0x{:02X}", self.reserved)?;
        writeln!(
            f,
            "    Global Sys Int Base : 0x{:08X}",
            self.global_sys_int_base
        )?;
        writeln!(f, "    IO SAPIC Address    : 0x{:016X}", self.io_sapic_address)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct LocalSapic {
    ty: u8,
    length: u8,
    acpi_proc_id: u8,
    local_sapic_id: u8,
    local_sapic_eid: u8,
    reserved: [u8; 3],
    flags: u32,
    acpi_proc_uid_value: u32,
    #[acpi(trailer)]
    acpi_proc_uid_string: Vec<u8>,
}

impl LocalSapic {
    pub fn acpi_proc_uid_string_str(&self) -> String {
        String::from_utf8_lossy(&self.acpi_proc_uid_string)
            .trim_end_matches('\0')
            .to_string()
    }
}

impl fmt::Display for LocalSapic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Local SAPIC (0x07)")?;
        writeln!(f, "    Type                 : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length               : 0x{:02X}", self.length)?;
        writeln!(f, "    ACPI Proc ID         : 0x{:02X}", self.acpi_proc_id)?;
        writeln!(f, "    Local SAPIC ID       : 0x{:02X}", self.local_sapic_id)?;
        writeln!(f, "    Local SAPIC EID      : 0x{:02X}", self.local_sapic_eid)?;
        writeln!(f, "    Reserved             : {}", hex_string(&self.reserved))?;
        writeln!(f, "    Flags                : 0x{:08X}", self.flags)?;
        writeln!(
            f,
            "    ACPI Proc UID Value  : 0x{:08X}",
            self.acpi_proc_uid_value
        )?;
        writeln!(
            f,
            "    ACPI Proc UID String : {}",
            self.acpi_proc_uid_string_str()
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct PlatformInterruptSources {
    ty: u8,
    length: u8,
    flags: u16,
    interrupt_type: u8,
    proc_id: u8,
    proc_eid: u8,
    io_sapic_vector: u8,
    global_system_interrupt: u32,
    plat_int_source_flags: u32,
}

impl fmt::Display for PlatformInterruptSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Platform Interrupt Sources (0x08)")?;
        writeln!(f, "    Type                    : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length                  : 0x{:02X}", self.length)?;
        writeln!(f, "    Flags                   : 0x{:04X}", self.flags)?;
        writeln!(f, "    Interrupt Type          : 0x{:02X}", self.interrupt_type)?;
        writeln!(f, "    Proc ID                 : 0x{:02X}", self.proc_id)?;
        writeln!(f, "    Proc EID                : 0x{:02X}", self.proc_eid)?;
        writeln!(f, "    I/O SAPIC Vector        : 0x{:02X}", self.io_sapic_vector)?;
        writeln!(
            f,
            "    Global System Interrupt : 0x{:08X}",
            self.global_system_interrupt
        )?;
        writeln!(
            f,
            "    Plat Int Source Flags   : 0x{:08X}",
            self.plat_int_source_flags
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct ProcessorLx2apic {
    ty: u8,
    length: u8,
    reserved: u16,
    x2apic_id: u32,
    flags: u32,
    acpi_proc_uid: u32,
}

impl fmt::Display for ProcessorLx2apic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Processor Local x2APIC (0x09)")?;
        writeln!(f, "    Type          : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length        : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved      : 0x{:04X}", self.reserved)?;
        writeln!(f, "    x2APIC ID     : 0x{:08X}", self.x2apic_id)?;
        writeln!(f, "    Flags         : 0x{:08X}", self.flags)?;
        writeln!(f, "    ACPI Proc UID : 0x{:08X}", self.acpi_proc_uid)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct Lx2apicNmi {
    ty: u8,
    length: u8,
    flags: u16,
    acpi_proc_uid: u32,
    local_x2apic_lint: u8,
    reserved: [u8; 3],
}

impl fmt::Display for Lx2apicNmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Local x2APIC NMI (0x0A)")?;
        writeln!(f, "    Type              : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length            : 0x{:02X}", self.length)?;
        writeln!(f, "    Flags             : 0x{:04X}", self.flags)?;
        writeln!(f, "    ACPI Proc UID     : 0x{:08X}", self.acpi_proc_uid)?;
        writeln!(f, "    Local x2APIC LINT : 0x{:02X}", self.local_x2apic_lint)?;
        writeln!(f, "    Reserved          : {}", hex_string(&self.reserved))?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct GiccCpuInterface {
    ty: u8,
    length: u8,
    reserved: u16,
    cpu_int_number: u32,
    acpi_proc_uid: u32,
    flags: u32,
    parking_protocol_version: u32,
    performance_interrupt_gsiv: u32,
    parked_address: u64,
    physical_address: u64,
    gicv: u64,
    gich: u64,
    vgic_maintenance_interrupt: u32,
    gicr_base_address: u64,
    mpidr: u64,
}

impl fmt::Display for GiccCpuInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  GICC CPU Interface Structure (0x0B)")?;
        writeln!(f, "    Type                       : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length                     : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved                   : 0x{:04X}", self.reserved)?;
        writeln!(
            f,
            "    CPU Int Number             : 0x{:08X}",
            self.cpu_int_number
        )?;
        writeln!(
            f,
            "    ACPI Proc UID              : 0x{:08X}",
            self.acpi_proc_uid
        )?;
        writeln!(f, "    Flags                      : 0x{:08X}", self.flags)?;
        writeln!(
            f,
            "    Parking Protocol Version   : 0x{:08X}",
            self.parking_protocol_version
        )?;
        writeln!(
            f,
            "    Performance Interrupt GSIV : 0x{:08X}",
            self.performance_interrupt_gsiv
        )?;
        writeln!(
            f,
            "    Parked Address             : 0x{:016X}",
            self.parked_address
        )?;
        writeln!(
            f,
            "    Physical Address           : 0x{:016X}",
            self.physical_address
        )?;
        writeln!(f, "    GICV                       : 0x{:016X}", self.gicv)?;
        writeln!(f, "    GICH                       : 0x{:016X}", self.gich)?;
        writeln!(
            f,
            "    VGIC Maintenance Interrupt : 0x{:08X}",
            self.vgic_maintenance_interrupt
        )?;
        writeln!(
            f,
            "    GICR Base Address          : 0x{:016X}",
            self.gicr_base_address
        )?;
        writeln!(f, "    MPIDR                      : 0x{:016X}", self.mpidr)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct GicDistributor {
    ty: u8,
    length: u8,
    reserved: u16,
    gic_id: u32,
    physical_base_address: u64,
    system_vector_base: u32,
    reserved2: u32,
}

impl fmt::Display for GicDistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  GICD GIC Distributor Structure (0x0C)")?;
        writeln!(f, "    Type                  : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length                : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved              : 0x{:04X}", self.reserved)?;
        writeln!(f, "    GICID                 : 0x{:08X}", self.gic_id)?;
        writeln!(
            f,
            "    Physical Base Address : 0x{:016X}",
            self.physical_base_address
        )?;
        writeln!(
            f,
            "    System Vector Base    : 0x{:08X}",
            self.system_vector_base
        )?;
        writeln!(f, "    Reserved              : 0x{:08X}", self.reserved2)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct GicMsiFrame {
    ty: u8,
    length: u8,
    reserved: u16,
    gic_msi_frame_id: u32,
    physical_base_address: u64,
    flags: u32,
    spi_count: u16,
    spi_base: u16,
}

impl fmt::Display for GicMsiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  GICv2m MSI Frame (0x0D)")?;
        writeln!(f, "    Type                  : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length                : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved              : 0x{:04X}", self.reserved)?;
        writeln!(f, "    GIC MSI Frame ID      : 0x{:08X}", self.gic_msi_frame_id)?;
        writeln!(
            f,
            "    Physical Base Address : 0x{:016X}",
            self.physical_base_address
        )?;
        writeln!(f, "    Flags                 : 0x{:08X}", self.flags)?;
        writeln!(f, "    SPI Count             : 0x{:04X}", self.spi_count)?;
        writeln!(f, "    SPI Base              : 0x{:04X}", self.spi_base)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, ACPI)]
pub struct GicRedistributor {
    ty: u8,
    length: u8,
    reserved: u16,
    discovery_range_base_addr: u64,
    discovery_range_length: u32,
}

impl fmt::Display for GicRedistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  GICR Redistributor Structure (0x0E)")?;
        writeln!(f, "    Type                  : 0x{:02X}", self.ty)?;
        writeln!(f, "    Length                : 0x{:02X}", self.length)?;
        writeln!(f, "    Reserved              : 0x{:04X}", self.reserved)?;
        writeln!(
            f,
            "    Discover Range Base   : 0x{:016X}",
            self.discovery_range_base_addr
        )?;
        writeln!(
            f,
            "    Discover Range Length : 0x{:08X}",
            self.discovery_range_length
        )?;

        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStructure {
    pub ty: u8,
    pub data: Bytes,
}

impl fmt::Display for UnknownStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "  Unknown Interrupt Controller Structure (0x{:02X}):", self.ty)?;
        writeln!(f, "    Data                  : {}", hex_string(&self.data))?;

        Ok(())
    }
}
