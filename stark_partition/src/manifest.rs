// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition manifest sidecar I/O (`spec.md` §6).
//!
//! One line per partition: `<wkt-envelope>;<startMillis>;<endMillis>;<partFileName>`,
//! `;`-delimited, with an empty temporal field meaning unbounded on that
//! side. A dataset directory with no manifest file means "read everything".

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use stark_types::NRectRange;

/// One line of a partition manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestEntry {
    /// The partition's spatial envelope.
    pub envelope: NRectRange,
    /// Inclusive lower temporal bound in epoch millis, if any.
    pub start_millis: Option<i64>,
    /// Exclusive upper temporal bound in epoch millis, if any.
    pub end_millis: Option<i64>,
    /// The payload file name for this partition, relative to the dataset directory.
    pub part_file_name: String,
}

/// Write `entries` to `w` in manifest line format.
pub fn write_manifest<W: Write>(w: &mut W, entries: &[ManifestEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(
            w,
            "{};{};{};{}",
            wkt_envelope(&entry.envelope),
            format_opt_millis(entry.start_millis),
            format_opt_millis(entry.end_millis),
            entry.part_file_name,
        )?;
    }
    Ok(())
}

/// Write `entries` to the manifest file at `path`, creating or truncating it.
pub fn write_manifest_file(path: impl AsRef<Path>, entries: &[ManifestEntry]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_manifest(&mut w, entries)
}

/// Parse manifest lines from `r`. Blank lines are skipped.
pub fn read_manifest<R: Read>(r: R) -> io::Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    for line in BufReader::new(r).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(
            parse_manifest_line(&line).map_err(|message| io::Error::new(io::ErrorKind::InvalidData, message))?,
        );
    }
    Ok(entries)
}

/// Read the manifest file at `path`. Returns `Ok(None)` if the file does not
/// exist, per "its absence means read everything".
pub fn read_manifest_file(path: impl AsRef<Path>) -> io::Result<Option<Vec<ManifestEntry>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(read_manifest(file)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn wkt_envelope(r: &NRectRange) -> String {
    let (x0, y0) = (r.ll().x(), r.ll().y());
    let (x1, y1) = (r.ur().x(), r.ur().y());
    format!("POLYGON (({x0} {y0}, {x1} {y0}, {x1} {y1}, {x0} {y1}, {x0} {y0}))")
}

fn parse_wkt_envelope(s: &str) -> Result<NRectRange, String> {
    let inner = s
        .trim()
        .strip_prefix("POLYGON ((")
        .and_then(|rest| rest.strip_suffix("))"))
        .ok_or_else(|| format!("malformed WKT envelope: {s}"))?;

    let points = inner
        .split(',')
        .map(|pair| {
            let mut coords = pair.trim().split_whitespace();
            let x: f64 = coords
                .next()
                .ok_or("missing x coordinate")?
                .parse()
                .map_err(|e: std::num::ParseFloatError| e.to_string())?;
            let y: f64 = coords
                .next()
                .ok_or("missing y coordinate")?
                .parse()
                .map_err(|e: std::num::ParseFloatError| e.to_string())?;
            Ok::<(f64, f64), String>((x, y))
        })
        .collect::<Result<Vec<_>, String>>()?;

    if points.len() < 3 {
        return Err(format!("WKT envelope needs at least 3 points: {s}"));
    }
    let (x0, y0) = points[0];
    let (x1, y1) = points[2];
    Ok(NRectRange::xyxy(x0, y0, x1, y1))
}

fn parse_manifest_line(line: &str) -> Result<ManifestEntry, String> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 4 {
        return Err(format!(
            "expected 4 `;`-delimited fields, got {}: {line}",
            fields.len()
        ));
    }
    Ok(ManifestEntry {
        envelope: parse_wkt_envelope(fields[0])?,
        start_millis: parse_opt_millis(fields[1])?,
        end_millis: parse_opt_millis(fields[2])?,
        part_file_name: fields[3].to_string(),
    })
}

fn parse_opt_millis(s: &str) -> Result<Option<i64>, String> {
    if s.is_empty() {
        Ok(None)
    } else {
        s.parse().map(Some).map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

fn format_opt_millis(v: Option<i64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_text() {
        let entries = vec![
            ManifestEntry {
                envelope: NRectRange::xyxy(-73.0, 40.0, -70.0, 41.0),
                start_millis: Some(1_000),
                end_millis: Some(2_000),
                part_file_name: "part-00000.bin".to_string(),
            },
            ManifestEntry {
                envelope: NRectRange::xyxy(0.0, 0.0, 10.0, 10.0),
                start_millis: None,
                end_millis: None,
                part_file_name: "part-00001.bin".to_string(),
            },
        ];

        let mut buf = Vec::new();
        write_manifest(&mut buf, &entries).unwrap();
        let parsed = read_manifest(buf.as_slice()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn unbounded_temporal_field_is_empty_string() {
        let mut buf = Vec::new();
        write_manifest(
            &mut buf,
            &[ManifestEntry {
                envelope: NRectRange::xyxy(0.0, 0.0, 1.0, 1.0),
                start_millis: None,
                end_millis: Some(5),
                part_file_name: "p.bin".to_string(),
            }],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches(';').count(), 3);
        assert!(text.contains(";;5;") || text.contains("));;5;"));
    }

    #[test]
    fn missing_manifest_file_means_read_everything() {
        let result = read_manifest_file("/nonexistent/partition_info").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_line_is_rejected() {
        let err = read_manifest("not-a-valid-line\n".as_bytes());
        assert!(err.is_err());
    }
}
