use std::path::Path;

use anyhow::Context;
use relocscope::{
    reloc::{RelocationBlock, RelocationFilter},
    File,
};
use serde::Serialize;

use crate::{app::RelocOptions, output::print_wrapped};

/// Load and parse a PE file.
pub fn load_file(path: &Path) -> anyhow::Result<File> {
    File::from_file(path).with_context(|| format!("failed to load PE file: {}", path.display()))
}

/// Names of the set bits of a `bitflags` value, `|` separated.
pub fn flag_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(" | ")
    }
}

#[derive(Debug, Serialize)]
pub struct RelocationTarget {
    pub rva: u32,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct BlockInfo {
    pub page_rva: u32,
    pub block_size: u32,
    pub relocations: Vec<RelocationTarget>,
}

/// The entries of `blocks` that pass `filter`, resolved to absolute RVAs.
pub fn block_infos(blocks: &[RelocationBlock], filter: &RelocationFilter) -> Vec<BlockInfo> {
    blocks
        .iter()
        .map(|block| BlockInfo {
            page_rva: block.page_rva,
            block_size: block.block_size,
            relocations: block
                .entries
                .iter()
                .filter(|entry| filter.matches(entry.kind))
                .map(|entry| RelocationTarget {
                    rva: entry.target(block.page_rva),
                    kind: entry.kind.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Print blocks the way `objdump`-based tooling lists them: page, count, wrapped targets.
pub fn print_blocks(blocks: &[BlockInfo], options: &RelocOptions) {
    for block in blocks {
        println!("Page RVA: 0x{:x}", block.page_rva);
        println!("{} relocations:", block.relocations.len());

        let targets: Vec<String> = block
            .relocations
            .iter()
            .map(|target| format!("0x{:04x}", target.rva))
            .collect();
        print_wrapped(&targets, usize::from(options.per_line), "  ");
    }
}
