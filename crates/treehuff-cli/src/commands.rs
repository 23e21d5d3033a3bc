//! File-level compress, decompress and inspect commands.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{info, warn};
use treehuff_core::{BitReader, BitWriter, CompressionRatio, Result, StreamConfig};
use treehuff_huffman::{
    compress, decompress, read_header, CodeTable, CompressionReport, DecompressionReport,
    Symbol, HUFF_TREE, PSEUDO_EOF,
};

/// Load a JSON stream configuration, falling back to defaults for missing fields.
pub fn load_config(path: &Path) -> std::result::Result<StreamConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn open_reader(path: &Path, config: &StreamConfig) -> Result<BitReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(BitReader::new(BufReader::with_capacity(
        config.input_buffer_size,
        file,
    )))
}

fn create_writer(path: &Path, config: &StreamConfig) -> Result<BitWriter<BufWriter<File>>> {
    let file = File::create(path)?;
    Ok(BitWriter::new(BufWriter::with_capacity(
        config.output_buffer_size,
        file,
    )))
}

fn remove_partial(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        warn!("could not remove partial output {}: {}", output.display(), e);
    }
}

/// Compress `input` into a new file at `output`.
///
/// The output file is removed again if compression fails.
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &StreamConfig,
) -> Result<CompressionReport> {
    let size = fs::metadata(input)?.len();
    config.check_input_size(size)?;

    let mut reader = open_reader(input, config)?;
    let mut writer = create_writer(output, config)?;
    let report = match compress(&mut reader, &mut writer) {
        Ok(report) => report,
        Err(e) => {
            drop(writer);
            remove_partial(output);
            return Err(e);
        }
    };

    let ratio = CompressionRatio::new(report.input_bytes as usize, report.output_bytes as usize);
    info!(
        "Compressed {} -> {} ({} -> {} bytes, {:.1}% saved)",
        input.display(),
        output.display(),
        report.input_bytes,
        report.output_bytes,
        ratio.savings_percent()
    );
    Ok(report)
}

/// Decompress `input` into a new file at `output`.
///
/// The output file is removed again if the stream turns out to be malformed.
pub fn decompress_file(
    input: &Path,
    output: &Path,
    config: &StreamConfig,
) -> Result<DecompressionReport> {
    let mut reader = open_reader(input, config)?;
    let mut writer = create_writer(output, config)?;

    match decompress(&mut reader, &mut writer) {
        Ok(report) => {
            info!(
                "Decompressed {} -> {} ({} bytes)",
                input.display(),
                output.display(),
                report.output_bytes
            );
            Ok(report)
        }
        Err(e) => {
            drop(writer);
            remove_partial(output);
            Err(e)
        }
    }
}

fn symbol_label(symbol: Symbol) -> String {
    match symbol {
        PSEUDO_EOF => "EOF".to_string(),
        0x21..=0x7e => format!("'{}'", symbol as u8 as char),
        _ => format!("0x{:02x}", symbol),
    }
}

/// Describe the header of a compressed file: magic, tree shape and codes.
pub fn inspect_file(input: &Path, config: &StreamConfig) -> Result<String> {
    let mut reader = open_reader(input, config)?;
    let (tree, header_bits) = read_header(&mut reader)?;
    let table = CodeTable::from_tree(&tree);

    let mut lines = vec![
        format!("magic:       0x{:08x}", HUFF_TREE),
        format!("header bits: {}", header_bits),
        format!("leaves:      {}", tree.leaf_count()),
        format!("depth:       {}", tree.depth()),
    ];
    lines.extend(
        table
            .iter()
            .map(|(symbol, code)| format!("{:>6}  {}", symbol_label(symbol), code)),
    );

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treehuff_core::Error;

    #[test]
    fn test_compress_decompress_files() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("input.txt");
        let packed = dir.path().join("input.hf");
        let restored = dir.path().join("restored.txt");
        let text = "a file on disk, compressed and restored ".repeat(64);
        fs::write(&original, &text).unwrap();

        let config = StreamConfig::default();
        let report = compress_file(&original, &packed, &config).unwrap();
        assert_eq!(report.input_bytes, text.len() as u64);
        assert_eq!(fs::metadata(&packed).unwrap().len(), report.output_bytes);

        let report = decompress_file(&packed, &restored, &config).unwrap();
        assert_eq!(report.output_bytes, text.len() as u64);
        assert_eq!(fs::read_to_string(&restored).unwrap(), text);
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("big.bin");
        fs::write(&original, vec![7u8; 100]).unwrap();

        let config = StreamConfig {
            max_input_size: 99,
            ..Default::default()
        };
        let err = compress_file(&original, &dir.path().join("big.hf"), &config).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { size: 100, limit: 99 }));
    }

    #[test]
    fn test_failed_compress_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_file = dir.path().join("subdir");
        fs::create_dir(&not_a_file).unwrap();
        let packed = dir.path().join("subdir.hf");

        let err = compress_file(&not_a_file, &packed, &StreamConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!packed.exists());
    }

    #[test]
    fn test_failed_decompress_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.hf");
        let restored = dir.path().join("restored.txt");
        fs::write(&bogus, b"not a compressed file").unwrap();

        let err = decompress_file(&bogus, &restored, &StreamConfig::default()).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
        assert!(!restored.exists());
    }

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("aab.txt");
        let packed = dir.path().join("aab.hf");
        fs::write(&original, b"AAB").unwrap();

        let config = StreamConfig::default();
        compress_file(&original, &packed, &config).unwrap();
        let summary = inspect_file(&packed, &config).unwrap();

        assert!(summary.contains("0xface8201"));
        assert!(summary.contains("leaves:      3"));
        assert!(summary.contains("'A'  0"));
        assert!(summary.contains("'B'  10"));
        assert!(summary.contains("EOF  11"));
        assert!(summary.ends_with('\n'));
        assert_eq!(summary.lines().count(), 4 + 3);
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treehuff.json");
        fs::write(&path, r#"{ "input_buffer_size": 4096, "log_level": "debug" }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.input_buffer_size, 4096);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_input_size, StreamConfig::default().max_input_size);

        fs::write(&path, "not json").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_symbol_labels() {
        assert_eq!(symbol_label(b'z' as Symbol), "'z'");
        assert_eq!(symbol_label(b' ' as Symbol), "0x20");
        assert_eq!(symbol_label(0), "0x00");
        assert_eq!(symbol_label(PSEUDO_EOF), "EOF");
    }
}
