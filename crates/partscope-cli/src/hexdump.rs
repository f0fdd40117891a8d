//! Hex + ASCII dumps

const BYTES_PER_ROW: usize = 16;

/// Boot sector regions, as `(end offset, tag)`
const REGIONS: &[(usize, &str)] = &[(440, "BOOT"), (446, "DSIG"), (510, "PART"), (512, "SIG")];

/// MBR region tag for a byte offset within sector 0
pub fn region(offset: usize) -> &'static str {
    REGIONS
        .iter()
        .find(|(end, _)| offset < *end)
        .map_or("DATA", |(_, tag)| *tag)
}

/// Dump sector 0 with every row tagged by MBR region
///
/// Rows break at region boundaries so a row never straddles two regions.
pub fn dump_boot_sector(data: &[u8]) -> String {
    let mut out = String::new();
    let mut offset = 0;

    while offset < data.len() {
        let boundary = REGIONS
            .iter()
            .map(|(end, _)| *end)
            .find(|end| offset < *end)
            .unwrap_or(usize::MAX);
        let end = (offset + BYTES_PER_ROW).min(boundary).min(data.len());

        out.push_str(&format!(
            "{:<4} {}\n",
            region(offset),
            format_row(offset as u64, &data[offset..end])
        ));
        offset = end;
    }

    out
}

/// Plain dump, offsets starting at `base`
pub fn dump(data: &[u8], base: u64) -> String {
    data.chunks(BYTES_PER_ROW)
        .enumerate()
        .map(|(i, chunk)| format_row(base + (i * BYTES_PER_ROW) as u64, chunk) + "\n")
        .collect()
}

fn format_row(offset: u64, chunk: &[u8]) -> String {
    let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
    let ascii: String = chunk
        .iter()
        .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
        .collect();

    format!(
        "0x{:04X}: {:<width$}  |{}|",
        offset,
        hex.join(" "),
        ascii,
        width = BYTES_PER_ROW * 3 - 1
    )
}
