use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::SampleRegion;
use crate::{Error, Result};

/// Read a BED-style restriction list from disk. Only the first three
/// columns are used; `#`, `track` and `browser` lines are skipped.
/// Reference names are left in the file's own convention; the sampler
/// reconciles `chr` prefixes at match time.
pub fn read_restriction_bed(path: &Path) -> Result<Vec<SampleRegion>> {
    let file = File::open(path)?;
    parse_restriction_bed(BufReader::new(file))
}

fn parse_restriction_bed<R: BufRead>(reader: R) -> Result<Vec<SampleRegion>> {
    let mut regions = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        let mut fields = line.split('\t');
        let name = fields
            .next()
            .ok_or_else(|| malformed(&line))?
            .to_string();
        let start: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed(&line))?;
        let end: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| malformed(&line))?;

        regions.push(SampleRegion::new(name, start, end));
    }

    Ok(regions)
}

fn malformed(line: &str) -> Error {
    Error::InvalidInput(format!("malformed BED line: {}", line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_skips_headers_and_blank_lines() {
        let bed = "browser position chr1:1-1000\n\
                   track name=test\n\
                   # comment\n\
                   \n\
                   chr1\t100\t200\tfeature-a\n\
                   chr2\t0\t50\n";
        let regions = parse_restriction_bed(Cursor::new(bed)).unwrap();
        assert_eq!(
            regions,
            vec![
                SampleRegion::new("chr1", 100, 200),
                SampleRegion::new("chr2", 0, 50),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let bed = "chr1\tnot-a-number\t200\n";
        assert!(parse_restriction_bed(Cursor::new(bed)).is_err());

        let bed = "chr1\t100\n";
        assert!(parse_restriction_bed(Cursor::new(bed)).is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        let regions = parse_restriction_bed(Cursor::new("")).unwrap();
        assert!(regions.is_empty());
    }
}
