use std::path::Path;

use anyhow::Context;

use crate::{
    app::{GlobalOptions, RelocOptions},
    commands::common::{block_infos, load_file, print_blocks, BlockInfo},
    output::print_output,
};

pub fn run(path: &Path, options: &RelocOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;

    let Some(blocks) = file
        .image()
        .relocation_blocks()
        .with_context(|| format!("failed to locate base relocations: {}", path.display()))?
    else {
        log::info!("{} has no base relocation directory", path.display());
        return print_output(&Vec::<BlockInfo>::new(), opts, |_| {});
    };

    let blocks = blocks
        .collect::<relocscope::Result<Vec<_>>>()
        .with_context(|| format!("failed to decode base relocations: {}", path.display()))?;

    let infos = block_infos(&blocks, &options.filter());
    print_output(&infos, opts, |infos| print_blocks(infos, options))
}
