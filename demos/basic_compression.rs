use huffpack::{HuffmanCodec, DEFAULT_ALPHABET};
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Keep only what the default alphabet can encode
    let raw = "Hello, world! This is a sample text for Huffman compression. \
               The quick brown fox jumps over the lazy dog. \
               Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
    let sample: Vec<u8> = raw
        .to_lowercase()
        .bytes()
        .filter(|b| DEFAULT_ALPHABET.as_bytes().contains(b))
        .collect();

    println!("📝 Filtered sample: {} of {} bytes kept", sample.len(), raw.len());

    let codec = HuffmanCodec::default();

    // Compress the sample
    let output = BufWriter::new(File::create("sample.huff")?);
    codec.compress_to_writer(&sample, output)?;

    let compressed_size = std::fs::metadata("sample.huff")?.len();
    let compression_ratio = compressed_size as f64 / sample.len() as f64;

    println!(
        "🗜️  Compressed to: {} bytes ({:.1}% of original)",
        compressed_size,
        compression_ratio * 100.0
    );

    let header = codec.inspect(&std::fs::read("sample.huff")?)?;
    print!("{}", header.tree);
    print!("{}", header.code_table());

    // Decompress the file
    let input = BufReader::new(File::open("sample.huff")?);
    let decompressed = codec.decompress_from_reader(input)?;

    if sample == decompressed {
        println!("✅ Decompression successful! Data matches exactly.");
    } else {
        println!("❌ Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }

    std::fs::remove_file("sample.huff")?;
    println!("🧹 Cleaned up temporary files");

    Ok(())
}
