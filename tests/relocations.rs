use relocscope::{
    file::hexdump::parse_reloc_dump, prelude::*, reloc::RelocationBlocks,
};

/// `objdump -s` output of an EFI application, `.reloc` section at 0xd000
const OBJDUMP_SAMPLE: &str = "\
Contents of something:
 cfe0 aaaaaaaa bbbbbbbb dddddddd eeeeeeee  ................
Contents of section .reloc:
 d000 00a00000 40000000 a8acb8ac c8acd8ac  ....@...........
 d010 e8acf8ac 08ad18ad 28ad38ad 48ad58ad  ........(.8.H.X.
 d020 68ad78ad c8add8ad 10ae40ae 90aeb0ae  h.x.......@.....
 d030 f8ae00af 08af10af 48af88af b8afe0af  ........H.......
 d040 00b00000 74000000 10a040a0 70a0c0a0  ....t.....@.p...
 d050 00a160a1 88a1a0a1 10a240a2 70a2a0a2  ..`.......@.p...
 d060 d0a200a3 28a370a3 b0a3f8a3 50a4a0a4  ....(.p.....P...
 d070 b0a4c8a4 28a578a5 c0a510a6 80a6d0a6  ....(.x.........
 d080 20a778a7 c8a7e0a7 48a898a8 e8a838a9   .x.....H.....8.
 d090 c8a918aa 68aab8aa 08ab58ab a8abd8ab  ....h.....X.....
 d0a0 08ac40ac d0ac20ad 70adc0ad 18ae68ae  ..@... .p.....h.
 d0b0 a8ae0000                             ....

 Disassembly blah:
";

/// A PE32+ image with a single `.reloc` section at RVA 0x2000 / file offset 0x400 holding
/// `relocations`, referenced by data directory 5.
fn image_with_relocations(relocations: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 0x400 + relocations.len()];
    let mut put = |offset: usize, bytes: &[u8]| {
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
    };

    put(0, b"MZ");
    put(0x3C, &0x40u32.to_le_bytes());
    put(0x40, b"PE\0\0");

    // COFF header: AMD64, one section, 160 byte optional header
    put(0x44, &0x8664u16.to_le_bytes());
    put(0x46, &1u16.to_le_bytes());
    put(0x54, &160u16.to_le_bytes());

    // optional header: PE32+, 6 data directories, base relocations in slot 5
    put(0x58, &0x20Bu16.to_le_bytes());
    put(0x58 + 108, &6u32.to_le_bytes());
    put(0x58 + 112 + 40, &0x2000u32.to_le_bytes());
    put(0x58 + 112 + 44, &(relocations.len() as u32).to_le_bytes());

    // section table
    let section = 0x58 + 160;
    put(section, b".reloc\0\0");
    put(section + 8, &0x1000u32.to_le_bytes());
    put(section + 12, &0x2000u32.to_le_bytes());
    put(section + 16, &(relocations.len() as u32).to_le_bytes());
    put(section + 20, &0x400u32.to_le_bytes());

    put(0x400, relocations);
    data
}

#[test]
fn synthetic_image_end_to_end() {
    #[rustfmt::skip]
    let relocations = [
        0x00, 0x10, 0x00, 0x00, // page_rva = 0x1000
        0x10, 0x00, 0x00, 0x00, // block_size = 16
        0x10, 0xA0, 0x20, 0xA0, // Dir64 @ 0x10, Dir64 @ 0x20
        0x30, 0x00, 0x40, 0xA0, // Absolute @ 0x30, Dir64 @ 0x40
    ];

    let file = File::from_mem(image_with_relocations(&relocations)).unwrap();
    let image = file.image();

    assert_eq!(image.dos().coff_header_offset, 0x40);
    assert_eq!(image.coff().section_count, 1);
    assert!(image.optional_header().unwrap().is_pe32_plus());
    assert_eq!(image.directories().len(), 6);
    assert_eq!(
        image.directories().base_relocation(),
        Some(DataDirectory {
            virtual_address: 0x2000,
            size: 16
        })
    );
    assert_eq!(image.sections().by_name(".reloc").unwrap().file_offset, 0x400);

    let blocks = file.relocations().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].page_rva, 0x1000);

    let entries: Vec<_> = blocks[0]
        .entries
        .iter()
        .map(|entry| (entry.kind, entry.offset))
        .collect();
    assert_eq!(
        entries,
        [
            (RelocationKind::Dir64, 0x10),
            (RelocationKind::Dir64, 0x20),
            (RelocationKind::Absolute, 0x30),
            (RelocationKind::Dir64, 0x40),
        ]
    );

    let targets: Vec<u32> = blocks[0].targets(&RelocationFilter::default()).collect();
    assert_eq!(targets, [0x1010, 0x1020, 0x1040]);
}

#[test]
fn objdump_sample() {
    let data = parse_reloc_dump(OBJDUMP_SAMPLE).unwrap();
    assert_eq!(data.len(), 180);

    let blocks = decode_relocations(&data).unwrap();
    assert_eq!(blocks.len(), 2);

    let entries: usize = blocks.iter().map(RelocationBlock::len).sum();
    assert_eq!(entries * 2 + blocks.len() * 8, data.len());

    let filter = RelocationFilter::default();

    assert_eq!(blocks[0].page_rva, 0xa000);
    assert_eq!(blocks[0].block_size, 0x40);
    assert_eq!(blocks[0].len(), 28);
    let targets: Vec<u32> = blocks[0].targets(&filter).collect();
    assert_eq!(targets.len(), 28);
    assert_eq!(
        targets[..8],
        [0xaca8, 0xacb8, 0xacc8, 0xacd8, 0xace8, 0xacf8, 0xad08, 0xad18]
    );
    assert_eq!(targets.last(), Some(&0xafe0));

    assert_eq!(blocks[1].page_rva, 0xb000);
    assert_eq!(blocks[1].block_size, 0x74);
    assert_eq!(blocks[1].len(), 54);
    let targets: Vec<u32> = blocks[1].targets(&filter).collect();
    assert_eq!(targets.len(), 53);
    assert_eq!(targets[0], 0xb010);
    assert_eq!(targets.last(), Some(&0xbea8));
    assert_eq!(
        blocks[1].entries.last().unwrap().kind,
        RelocationKind::Absolute
    );
}

#[test]
fn objdump_sample_inside_image() {
    let relocations = parse_reloc_dump(OBJDUMP_SAMPLE).unwrap();
    let file = File::from_mem(image_with_relocations(&relocations)).unwrap();

    let streamed: Vec<_> = file
        .image()
        .relocation_blocks()
        .unwrap()
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(streamed, file.relocations().unwrap());
    assert_eq!(streamed.len(), 2);
}

#[test]
fn entry_encoding_round_trips_through_blocks() {
    let data = parse_reloc_dump(OBJDUMP_SAMPLE).unwrap();

    for block in RelocationBlocks::new(&data) {
        let block = block.unwrap();
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&block.page_rva.to_le_bytes());
        encoded.extend_from_slice(&block.block_size.to_le_bytes());
        for entry in &block.entries {
            encoded.extend_from_slice(&entry.encode().to_le_bytes());
        }

        assert_eq!(decode_relocations(&encoded).unwrap(), [block]);
    }
}

#[test]
fn corrupt_relocation_directory() {
    let mut relocations = parse_reloc_dump(OBJDUMP_SAMPLE).unwrap();
    // second entry of the first block becomes type 12
    relocations[11] = 0xCC;

    let file = File::from_mem(image_with_relocations(&relocations)).unwrap();
    assert!(matches!(
        file.relocations(),
        Err(Error::UnknownRelocationType(12))
    ));

    let relocations = parse_reloc_dump(OBJDUMP_SAMPLE).unwrap();
    let file = File::from_mem(image_with_relocations(&relocations[..170])).unwrap();
    assert!(matches!(
        file.relocations(),
        Err(Error::TruncatedRelocationBlock)
    ));
}
