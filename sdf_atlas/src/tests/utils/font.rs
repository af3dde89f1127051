// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny TrueType font assembled in memory.
//!
//! Glyph 1 is a 512x768 unit box mapped from `A`, glyph 2 is an empty space.
//! A power of two em keeps the pixel scale exact: at 48 pixels the box spans
//! x 6..30 and y -36..0 in pixels.

pub(crate) const UNITS_PER_EM: u16 = 1024;

/// `OS/2` typographic ascent, descent and line gap.
pub(crate) const TYPO_METRICS: (i16, i16, i16) = (800, -224, 96);
/// `hhea` ascent, descent and line gap.
pub(crate) const HHEA_METRICS: (i16, i16, i16) = (900, -300, 0);
/// `post` underline position and thickness.
pub(crate) const UNDERLINE: (i16, i16) = (-150, 60);

/// Advance and left side bearing of the box glyph.
pub(crate) const BOX_METRICS: (u16, i16) = (768, 128);

const BOX: [(i16, i16); 4] = [(128, 0), (128, 768), (640, 768), (640, 0)];

/// Name ids of the `name` table entries.
pub(crate) const FAMILY_NAME: u16 = 1;
pub(crate) const TYPOGRAPHIC_FAMILY_NAME: u16 = 16;

/// Builds a font with the given `name` table entries, with or without an `OS/2` table.
pub(crate) fn build_font(names: &[(u16, &str)], with_os2: bool) -> Vec<u8> {
    let mut tables = vec![
        (*b"cmap", cmap()),
        (*b"glyf", glyf()),
        (*b"head", head()),
        (*b"hhea", hhea()),
        (*b"hmtx", hmtx()),
        (*b"loca", loca()),
        (*b"maxp", maxp()),
        (*b"name", name(names)),
        (*b"post", post()),
    ];
    if with_os2 {
        tables.push((*b"OS/2", os2()));
    }
    tables.sort_by_key(|(tag, _)| *tag);
    assemble(&tables)
}

#[derive(Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn u16(&mut self, value: u16) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn i16(&mut self, value: i16) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.0.extend_from_slice(value);
        self
    }

    fn finish(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.0)
    }
}

fn assemble(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let count = u16::try_from(tables.len()).unwrap();
    let entry_selector = u16::try_from(count.ilog2()).unwrap();
    let search_range = (1 << entry_selector) * 16;
    let mut font = Writer::default();
    font.u32(0x0001_0000)
        .u16(count)
        .u16(search_range)
        .u16(entry_selector)
        .u16(count * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    let mut data = Vec::new();
    for (tag, table) in tables {
        font.bytes(tag)
            .u32(checksum(table))
            .u32(u32::try_from(offset).unwrap())
            .u32(u32::try_from(table.len()).unwrap());
        let padded = table.len().next_multiple_of(4);
        data.extend_from_slice(table);
        data.resize(data.len() + padded - table.len(), 0);
        offset += padded;
    }
    font.bytes(&data);
    font.finish()
}

fn checksum(table: &[u8]) -> u32 {
    table.chunks(4).fold(0_u32, |sum, chunk| {
        let mut word = [0; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn head() -> Vec<u8> {
    Writer::default()
        .u16(1)
        .u16(0)
        .u32(0x0001_0000)
        .u32(0)
        .u32(0x5F0F_3CF5)
        .u16(0)
        .u16(UNITS_PER_EM)
        .bytes(&[0; 16])
        .i16(BOX[0].0)
        .i16(BOX[0].1)
        .i16(BOX[2].0)
        .i16(BOX[2].1)
        .u16(0)
        .u16(8)
        .i16(2)
        // Long loca offsets.
        .i16(1)
        .i16(0)
        .finish()
}

fn hhea() -> Vec<u8> {
    let (ascent, descent, line_gap) = HHEA_METRICS;
    Writer::default()
        .u32(0x0001_0000)
        .i16(ascent)
        .i16(descent)
        .i16(line_gap)
        .u16(BOX_METRICS.0)
        .i16(0)
        .i16(0)
        .i16(BOX[2].0)
        .i16(1)
        .i16(0)
        .i16(0)
        .bytes(&[0; 8])
        .i16(0)
        .u16(3)
        .finish()
}

fn maxp() -> Vec<u8> {
    Writer::default().u32(0x0000_5000).u16(3).finish()
}

fn os2() -> Vec<u8> {
    let (ascent, descent, line_gap) = TYPO_METRICS;
    Writer::default()
        .u16(0)
        .i16(512)
        .u16(400)
        .u16(5)
        .u16(0)
        // Sub- and superscript, strikeout and family class.
        .bytes(&[0; 22])
        // Panose and unicode ranges.
        .bytes(&[0; 26])
        .bytes(b"NONE")
        .u16(0x40)
        .u16(0x20)
        .u16(0x41)
        .i16(ascent)
        .i16(descent)
        .i16(line_gap)
        .u16(900)
        .u16(300)
        .finish()
}

fn hmtx() -> Vec<u8> {
    let (advance, lsb) = BOX_METRICS;
    Writer::default()
        .u16(512)
        .i16(0)
        .u16(advance)
        .i16(lsb)
        .u16(256)
        .i16(0)
        .finish()
}

fn glyf() -> Vec<u8> {
    let mut glyph = Writer::default();
    glyph
        .i16(1)
        .i16(BOX[0].0)
        .i16(BOX[0].1)
        .i16(BOX[2].0)
        .i16(BOX[2].1)
        .u16(3)
        .u16(0)
        // On-curve points with 16-bit deltas.
        .bytes(&[1; 4]);
    let mut previous = (0, 0);
    let deltas: Vec<(i16, i16)> = BOX
        .iter()
        .map(|&(x, y)| {
            let delta = (x - previous.0, y - previous.1);
            previous = (x, y);
            delta
        })
        .collect();
    for &(dx, _) in &deltas {
        glyph.i16(dx);
    }
    for &(_, dy) in &deltas {
        glyph.i16(dy);
    }
    let mut glyph = glyph.finish();
    glyph.resize(glyph.len().next_multiple_of(4), 0);
    glyph
}

fn loca() -> Vec<u8> {
    let box_len = u32::try_from(glyf().len()).unwrap();
    Writer::default()
        .u32(0)
        .u32(0)
        .u32(box_len)
        .u32(box_len)
        .finish()
}

fn cmap() -> Vec<u8> {
    let groups = [(0x20, 2), (0x41, 1)];
    let group_count = u32::try_from(groups.len()).unwrap();
    let mut cmap = Writer::default();
    cmap.u16(0)
        .u16(1)
        // Windows, full unicode.
        .u16(3)
        .u16(10)
        .u32(12)
        .u16(12)
        .u16(0)
        .u32(16 + 12 * group_count)
        .u32(0)
        .u32(group_count);
    for (codepoint, glyph) in groups {
        cmap.u32(codepoint).u32(codepoint).u32(glyph);
    }
    cmap.finish()
}

fn post() -> Vec<u8> {
    let (position, thickness) = UNDERLINE;
    Writer::default()
        .u32(0x0003_0000)
        .u32(0)
        .i16(position)
        .i16(thickness)
        .bytes(&[0; 20])
        .finish()
}

fn name(names: &[(u16, &str)]) -> Vec<u8> {
    let count = u16::try_from(names.len()).unwrap();
    let mut table = Writer::default();
    table.u16(0).u16(count).u16(6 + 12 * count);
    let mut storage = Vec::new();
    for &(id, value) in names {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        table
            .u16(3)
            .u16(1)
            .u16(0x0409)
            .u16(id)
            .u16(u16::try_from(encoded.len()).unwrap())
            .u16(u16::try_from(storage.len()).unwrap());
        storage.extend_from_slice(&encoded);
    }
    table.bytes(&storage);
    table.finish()
}
