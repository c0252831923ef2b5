use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::Result;

/// Reads a .keg file into lines, line terminators removed. Files ending in
/// `.gz` are decompressed on the fly.
pub fn read_keg_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    log::debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE: &str = "+B\tName\r\nA root\r\nB leaf\r\n";

    #[test]
    fn reads_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.keg");
        std::fs::write(&path, SAMPLE).unwrap();

        let lines = read_keg_lines(&path).unwrap();
        assert_eq!(lines, vec!["+B\tName", "A root", "B leaf"]);
    }

    #[test]
    fn reads_gzipped_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.keg.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let lines = read_keg_lines(&path).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "B leaf");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_keg_lines(dir.path().join("absent.keg")),
            Err(crate::error::KegError::Io(_))
        ));
    }
}
