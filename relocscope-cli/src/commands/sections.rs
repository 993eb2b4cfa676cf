use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{flag_names, load_file},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct SectionInfo {
    name: String,
    virtual_address: u32,
    virtual_size: u32,
    file_offset: u32,
    file_size: u32,
    characteristics: String,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;

    let sections: Vec<SectionInfo> = file
        .image()
        .sections()
        .iter()
        .map(|section| SectionInfo {
            name: section.name(),
            virtual_address: section.virtual_address,
            virtual_size: section.virtual_size,
            file_offset: section.file_offset,
            file_size: section.file_size,
            characteristics: flag_names(section.flags().iter_names().map(|(name, _)| name)),
        })
        .collect();

    print_output(&sections, opts, |sections| {
        println!("Sections ({} entries):", sections.len());
        let mut tw = TabWriter::new(vec![
            ("Name", Align::Left),
            ("Virt addr", Align::Right),
            ("Virt size", Align::Right),
            ("File offset", Align::Right),
            ("File size", Align::Right),
            ("Flags", Align::Left),
        ]);
        for section in sections {
            tw.row(vec![
                section.name.clone(),
                format!("0x{:08x}", section.virtual_address),
                format!("{:08x}", section.virtual_size),
                format!("0x{:08x}", section.file_offset),
                format!("{:08x}", section.file_size),
                section.characteristics.clone(),
            ]);
        }
        tw.print();
    })
}
