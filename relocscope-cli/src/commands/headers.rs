use std::path::Path;

use chrono::{DateTime, Local};
use relocscope::pe::optional::{subsystem_name, OptionalHeader};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{flag_names, load_file},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct HeadersInfo {
    coff_header_offset: u32,
    machine: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    machine_name: Option<&'static str>,
    section_count: u16,
    timestamp: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    characteristics: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional_header: Option<OptionalInfo>,
}

#[derive(Debug, Serialize)]
struct OptionalInfo {
    format: &'static str,
    linker_version: String,
    code_size: u32,
    init_data_size: u32,
    uninit_data_size: u32,
    entry_point_rva: u32,
    code_base: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_base: Option<u32>,
    image_base: u64,
    section_alignment: u32,
    file_alignment: u32,
    os_version: String,
    image_version: String,
    subsystem_version: String,
    image_size: u32,
    headers_size: u32,
    checksum: u32,
    subsystem: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    subsystem_name: Option<&'static str>,
    dll_characteristics: u16,
    data_directory_count: u32,
}

fn version((major, minor): (u16, u16)) -> String {
    format!("{major}.{minor}")
}

impl From<&OptionalHeader> for OptionalInfo {
    fn from(header: &OptionalHeader) -> Self {
        match header {
            OptionalHeader::Pe32(h) => OptionalInfo {
                format: "PE32",
                linker_version: format!("{}.{}", h.linker_version.0, h.linker_version.1),
                code_size: h.code_size,
                init_data_size: h.init_data_size,
                uninit_data_size: h.uninit_data_size,
                entry_point_rva: h.entry_point_rva,
                code_base: h.code_base,
                data_base: Some(h.data_base),
                image_base: u64::from(h.image_base),
                section_alignment: h.section_alignment,
                file_alignment: h.file_alignment,
                os_version: version(h.os_version),
                image_version: version(h.image_version),
                subsystem_version: version(h.subsystem_version),
                image_size: h.image_size,
                headers_size: h.headers_size,
                checksum: h.checksum,
                subsystem: h.subsystem,
                subsystem_name: subsystem_name(h.subsystem),
                dll_characteristics: h.dll_characteristics,
                data_directory_count: h.data_directory_count,
            },
            OptionalHeader::Pe32Plus(h) => OptionalInfo {
                format: "PE32+",
                linker_version: format!("{}.{}", h.linker_version.0, h.linker_version.1),
                code_size: h.code_size,
                init_data_size: h.init_data_size,
                uninit_data_size: h.uninit_data_size,
                entry_point_rva: h.entry_point_rva,
                code_base: h.code_base,
                data_base: None,
                image_base: h.image_base,
                section_alignment: h.section_alignment,
                file_alignment: h.file_alignment,
                os_version: version(h.os_version),
                image_version: version(h.image_version),
                subsystem_version: version(h.subsystem_version),
                image_size: h.image_size,
                headers_size: h.headers_size,
                checksum: h.checksum,
                subsystem: h.subsystem,
                subsystem_name: subsystem_name(h.subsystem),
                dll_characteristics: h.dll_characteristics,
                data_directory_count: h.data_directory_count,
            },
        }
    }
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;
    let image = file.image();
    let coff = image.coff();

    let info = HeadersInfo {
        coff_header_offset: image.dos().coff_header_offset,
        machine: coff.machine,
        machine_name: coff.machine_name(),
        section_count: coff.section_count,
        timestamp: coff.timestamp,
        created: DateTime::from_timestamp(i64::from(coff.timestamp), 0)
            .map(|time| time.with_timezone(&Local).to_rfc3339()),
        characteristics: flag_names(coff.flags().iter_names().map(|(name, _)| name)),
        optional_header: image.optional_header().map(OptionalInfo::from),
    };

    print_output(&info, opts, |info| {
        match info.machine_name {
            Some(name) => println!("machine type: {:04x} ({name})", info.machine),
            None => println!("machine type: {:04x}", info.machine),
        }
        println!("sections: {}", info.section_count);
        if let Some(created) = &info.created {
            println!("created: {created}");
        }
        println!("characteristics: {}", info.characteristics);

        let Some(oh) = &info.optional_header else {
            return;
        };
        println!("{}", oh.format);
        println!("linker version {}", oh.linker_version);
        println!("sizes:        code: {}", oh.code_size);
        println!("         init data: {}", oh.init_data_size);
        println!("       uninit data: {}", oh.uninit_data_size);
        println!("entry point: 0x{:08x}", oh.entry_point_rva);
        println!("bases:  code: 0x{:08x}", oh.code_base);
        if let Some(data_base) = oh.data_base {
            println!("        data: 0x{data_base:08x}");
        }
        println!("       image: 0x{:08x}", oh.image_base);
        println!(
            "section align {}, file align {}",
            oh.section_alignment, oh.file_alignment
        );
        println!("requires OS version {}", oh.os_version);
        println!("image version {}", oh.image_version);
        println!("subsystem version {}", oh.subsystem_version);
        println!("  image size: {}", oh.image_size);
        println!("headers size: {}", oh.headers_size);
        match oh.subsystem_name {
            Some(name) => println!("subsystem: {} ({name})", oh.subsystem),
            None => println!("subsystem: {}", oh.subsystem),
        }
        println!("data directories: {}", oh.data_directory_count);
    })
}
