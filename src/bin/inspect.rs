use anyhow::{Context, Result};
use launcher_icon_gen::png::{read_chunks, ImageHeader};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "app/src/main/res/mipmap-mdpi/ic_launcher.png".to_string());

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
    let chunks = read_chunks(&bytes).with_context(|| format!("{path} is not a valid PNG"))?;

    println!("Checking PNG: {}", path);
    println!("File size: {} bytes", bytes.len());

    for chunk in &chunks {
        println!(
            "  {} length={} crc={:08x}",
            chunk.tag_str(),
            chunk.data.len(),
            chunk.crc
        );
    }

    let header = chunks
        .first()
        .filter(|c| &c.tag == b"IHDR")
        .context("First chunk is not IHDR")?;
    let header = ImageHeader::parse(&header.data)?;
    println!(
        "\nImage: {}x{}, bit depth {}, color type {}, interlace {}",
        header.width, header.height, header.bit_depth, header.color_type, header.interlace
    );

    anyhow::ensure!(
        chunks.last().map(|c| &c.tag) == Some(b"IEND"),
        "Missing IEND chunk"
    );
    println!("✓ All chunk CRCs verified");
    Ok(())
}
