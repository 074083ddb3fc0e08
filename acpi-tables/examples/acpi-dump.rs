use acpi_tables::apic::Apic;
use acpi_tables::dmar::Dmar;
use bytes::Bytes;
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let family = args.next().ok_or("usage: acpi-dump <dmar|apic> <file>")?;
    let path = args.next().ok_or("usage: acpi-dump <dmar|apic> <file>")?;

    let content = Bytes::from(fs::read(path)?);
    match family.as_str() {
        "dmar" => print!("{}", Dmar::parse(&content)?),
        "apic" => print!("{}", Apic::parse(&content)?),
        _ => return Err("usage: acpi-dump <dmar|apic> <file>".into()),
    }

    Ok(())
}
