use std::path::PathBuf;
use std::time::Instant;

use huffpix::entropy_coding::{pack, unpack, CodeTable, FrequencyTable, HuffmanTree};
use huffpix::grayscale::load_matrix;
use huffpix::{GrayscaleRule, Result};

const PREVIEW_BITS: usize = 64;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: huffpix-stats <image> [exact|luma]");
        std::process::exit(2);
    }
    let rule = match args.get(2).map(|s| s.parse::<GrayscaleRule>()) {
        Some(Ok(rule)) => rule,
        Some(Err(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        None => GrayscaleRule::default(),
    };

    let matrix = load_matrix(&PathBuf::from(&args[1]), rule)?;
    let timer = Instant::now();
    let frequencies = FrequencyTable::from_matrix(&matrix);
    let tree = HuffmanTree::from_frequencies(&frequencies);
    let codes = tree.as_ref().map(CodeTable::from_tree).unwrap_or_default();
    let artifact = pack(&matrix, &codes)?;
    let ctime = timer.elapsed();

    let timer = Instant::now();
    let restored = unpack(&artifact)?;
    let dtime = timer.elapsed();
    assert_eq!(restored, matrix, "round trip mismatch");

    let total = frequencies.total() as f64;
    println!("value    count   share  code");
    for (value, count) in frequencies.iter() {
        let code = codes.get(value).map(|code| code.to_string()).unwrap_or_default();
        println!("{value:5} {count:8} {:6.2}%  {code}", count as f64 * 100.0 / total);
    }

    let entropy: f64 = frequencies
        .iter()
        .map(|(_, count)| count as f64 / total)
        .map(|p| -p * p.log2())
        .sum();
    let depth = tree.as_ref().map_or(0, HuffmanTree::depth);
    let stats = artifact.stats();
    let bits = artifact.bit_string();
    let ellipsis = if bits.len() > PREVIEW_BITS { "..." } else { "" };

    println!();
    println!("{}x{}, {} distinct values, tree depth {depth}", matrix.width(), matrix.height(), codes.len());
    println!(
        "entropy: {entropy:.4} bits/sample, huffman: {:.4} bits/sample",
        codes.average_code_length(&frequencies)
    );
    println!(
        "raw: {} bytes, packed: {} bytes, artifact: {} bytes (ratio: {:.3})",
        stats.raw_bytes, stats.packed_bytes, stats.artifact_bytes, stats.ratio
    );
    println!("bits: {}{ellipsis}", &bits[..bits.len().min(PREVIEW_BITS)]);
    println!("ctime: {ctime:?}, dtime: {dtime:?}");

    Ok(())
}
