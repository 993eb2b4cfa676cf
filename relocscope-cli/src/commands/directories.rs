use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_file,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct DirectoryInfo {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    virtual_address: u32,
    size: u32,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;

    let directories: Vec<DirectoryInfo> = file
        .image()
        .directories()
        .iter()
        .enumerate()
        .map(|(index, (kind, directory))| DirectoryInfo {
            index,
            name: kind.map(|kind| format!("{kind:?}")),
            virtual_address: directory.virtual_address,
            size: directory.size,
        })
        .collect();

    print_output(&directories, opts, |directories| {
        println!("Data directories ({} entries):", directories.len());
        let mut tw = TabWriter::new(vec![
            ("#", Align::Right),
            ("Name", Align::Left),
            ("RVA", Align::Right),
            ("Size", Align::Right),
        ]);
        for directory in directories {
            tw.row(vec![
                directory.index.to_string(),
                directory.name.clone().unwrap_or_else(|| "-".to_string()),
                format!("0x{:08x}", directory.virtual_address),
                directory.size.to_string(),
            ]);
        }
        tw.print();
    })
}
