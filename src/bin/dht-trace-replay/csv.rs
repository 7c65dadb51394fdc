use std::io::Read;

use anyhow::{Context as _, Result, bail};
use csv::Reader;
use dht_sitewise::dht::{Level, LineTrace, Segment};

const LEVEL_INDEX: usize = 0;
const DURATION_US_INDEX: usize = 1;

/// Reads a captured line trace: a header row, then one `level,duration_us`
/// row per stretch the sensor held the line, starting when the host released it.
pub fn read_line_trace<R: Read>(reader: R) -> Result<LineTrace> {
    let mut reader = Reader::from_reader(reader);
    let mut segments = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("failed to read CSV row {}", i + 1))?;
        if row.len() <= DURATION_US_INDEX {
            bail!(
                "CSV row {} too short: expected 2 columns, got {}",
                i + 1,
                row.len()
            );
        }

        let level = match row[LEVEL_INDEX].trim() {
            "0" => Level::Low,
            "1" => Level::High,
            other => bail!("invalid level in CSV row {}: {other}", i + 1),
        };
        let duration_us = row[DURATION_US_INDEX].trim().parse().with_context(|| {
            format!(
                "failed to parse duration in CSV row {}: {}",
                i + 1,
                &row[DURATION_US_INDEX]
            )
        })?;

        segments.push(Segment::new(level, duration_us));
    }

    Ok(LineTrace::new(segments))
}
