#![no_main]

use libfuzzer_sys::fuzz_target;
use relocscope::reloc::RelocationBlocks;

fuzz_target!(|data: &[u8]| {
    for block in RelocationBlocks::new(data) {
        if block.is_err() {
            break;
        }
    }
});
