use std::{fs, io, path::Path};

use anyhow::Context;
use relocscope::{decode_relocations, file::hexdump::parse_reloc_dump};

use crate::{
    app::{GlobalOptions, RelocOptions},
    commands::common::{block_infos, print_blocks},
    output::print_output,
};

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read objdump output: {}", path.display())),
        _ => io::read_to_string(io::stdin()).context("failed to read objdump output from stdin"),
    }
}

pub fn run(path: Option<&Path>, options: &RelocOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let text = read_input(path)?;

    let data = parse_reloc_dump(&text).context("failed to extract .reloc contents")?;
    let blocks = decode_relocations(&data).context("failed to decode base relocations")?;

    let infos = block_infos(&blocks, &options.filter());
    print_output(&infos, opts, |infos| print_blocks(infos, options))
}
