//src/rmsk.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::{HubError, Result};
use crate::types::RepeatRecord;

/// The RepeatMasker `.out` report opens with two column-label lines and a
/// blank line before the first record.
const HEADER_LINES: usize = 3;

/// Columns 0..14 of a RepeatMasker record. A trailing ID column may follow;
/// it is not part of the browser output and is ignored.
const MIN_FIELDS: usize = 14;

/// Strip enclosing parentheses from a positional field. RepeatMasker writes
/// "bases left" values as `(1234)`; fields without parentheses pass through
/// unchanged, so the operation is idempotent.
pub fn strip_parens(field: &str) -> &str {
    field.trim_matches(|c| c == '(' || c == ')')
}

/// Read every record from a RepeatMasker report, plain or gzip-compressed.
///
/// The three header lines are skipped, and any remaining line with fewer
/// than 14 whitespace-separated fields aborts the whole run. No partial
/// record set is ever returned. Whitespace-only lines are the one
/// tolerance: RepeatMasker pads the record section with them and they
/// carry no fields, so they are skipped rather than rejected.
pub fn read_rmsk_records<P: AsRef<Path>>(path: P) -> Result<Vec<RepeatRecord>> {
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

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if idx < HEADER_LINES || line.trim().is_empty() {
            continue;
        }
        records.push(parse_record_line(&line, path, idx as u64 + 1)?);
    }

    debug!("parsed {} repeat records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse one record line at the given 1-based line number.
fn parse_record_line(line: &str, path: &Path, line_no: u64) -> Result<RepeatRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(malformed(
            path,
            line_no,
            format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
        ));
    }

    let sw_score = fields[0]
        .parse::<u32>()
        .map_err(|e| malformed(path, line_no, format!("SW score '{}': {}", fields[0], e)))?;
    let perc_div = parse_pct(fields[1], "divergence", path, line_no)?;
    let perc_del = parse_pct(fields[2], "deletion", path, line_no)?;
    let perc_ins = parse_pct(fields[3], "insertion", path, line_no)?;
    let chrom = fields[4].to_string();
    let begin = fields[5]
        .parse::<u64>()
        .map_err(|e| malformed(path, line_no, format!("begin offset '{}': {}", fields[5], e)))?;
    let end = fields[6]
        .parse::<u64>()
        .map_err(|e| malformed(path, line_no, format!("end offset '{}': {}", fields[6], e)))?;
    if begin >= end {
        return Err(malformed(
            path,
            line_no,
            format!("begin offset {} is not below end offset {}", begin, end),
        ));
    }

    // RepeatMasker encodes the reverse strand as 'C'; everything else is
    // passed through as-is.
    let strand = if fields[8] == "C" {
        "-".to_string()
    } else {
        fields[8].to_string()
    };

    // The class/family column is either `Class/Family` or a bare class, in
    // which case both take the raw value.
    let (class, family) = match fields[10].split_once('/') {
        Some((class, family)) => (class.to_string(), family.to_string()),
        None => (fields[10].to_string(), fields[10].to_string()),
    };

    Ok(RepeatRecord {
        sw_score,
        perc_div,
        perc_del,
        perc_ins,
        chrom,
        begin,
        end,
        geno_left: strip_parens(fields[7]).to_string(),
        strand,
        name: fields[9].to_string(),
        class,
        family,
        rep_begin: strip_parens(fields[11]).to_string(),
        rep_end: strip_parens(fields[12]).to_string(),
        rep_left: strip_parens(fields[13]).to_string(),
    })
}

fn malformed(path: &Path, line: u64, reason: String) -> HubError {
    HubError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

fn parse_pct(field: &str, what: &str, path: &Path, line_no: u64) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|e| malformed(path, line_no, format!("percent {} '{}': {}", what, field, e)))
}
