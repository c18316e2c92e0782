//src/classify_repeats.rs

use std::fmt::Write as FmtWrite;
use std::fs;

use ahash::AHashMap;
use log::info;

use crate::error::Result;
use crate::types::{Genome, RepeatCategory, RepeatRecord, REPEAT_CATEGORIES};

/// Classified records, keyed by category, each bucket in first-seen order.
pub type CategoryBuckets = AHashMap<RepeatCategory, Vec<RepeatRecord>>;

/// Assign a repeat class string to a category. The first entry of
/// [`REPEAT_CATEGORIES`] whose label is a substring of the class wins;
/// anything unmatched falls through to `Other`.
pub fn classify_repeat(class: &str) -> RepeatCategory {
    for &category in &REPEAT_CATEGORIES {
        if category != RepeatCategory::Other && class.contains(category.label()) {
            return category;
        }
    }
    RepeatCategory::Other
}

/// Route records into per-category buckets in one pass, preserving input
/// order within each bucket.
pub fn bucket_records(records: Vec<RepeatRecord>) -> CategoryBuckets {
    let mut buckets: CategoryBuckets = AHashMap::new();
    for record in records {
        buckets
            .entry(classify_repeat(&record.class))
            .or_default()
            .push(record);
    }
    buckets
}

/// The categories that actually received records, in fixed priority order
/// (`Other` last). This set, not a directory listing, drives which child
/// tracks the descriptor generator emits.
pub fn present_categories(buckets: &CategoryBuckets) -> Vec<RepeatCategory> {
    REPEAT_CATEGORIES
        .iter()
        .copied()
        .filter(|category| buckets.contains_key(category))
        .collect()
}

/// Scale a one-decimal percentage for bigBed storage: `12.3` becomes `123`.
pub fn pct_times_ten(pct: f64) -> u32 {
    (pct * 10.0).round() as u32
}

/// Format one record as the 16-field rmsk interval line. Field 5 is a fixed
/// score placeholder of 0; the real Smith-Waterman score rides in field 7.
pub fn bed_line(record: &RepeatRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t0\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.chrom,
        record.begin,
        record.end,
        record.name,
        record.strand,
        record.sw_score,
        pct_times_ten(record.perc_div),
        pct_times_ten(record.perc_del),
        pct_times_ten(record.perc_ins),
        record.geno_left,
        record.class,
        record.family,
        record.rep_begin,
        record.rep_end,
        record.rep_left,
    )
}

/// Render a bucket in its current order as tab-file text.
pub fn category_text(records: &[RepeatRecord]) -> String {
    let mut text = String::new();
    for record in records {
        writeln!(text, "{}", bed_line(record)).unwrap();
    }
    text
}

/// Render a bucket re-sorted by (chromosome, begin offset), the order
/// bedToBigBed requires.
pub fn sorted_category_text(records: &[RepeatRecord]) -> String {
    let mut sorted: Vec<&RepeatRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.begin.cmp(&b.begin)));

    let mut text = String::new();
    for record in sorted {
        writeln!(text, "{}", bed_line(record)).unwrap();
    }
    text
}

/// Write the pre-sort `.tab` and sorted `.bed` file for every category with
/// records, returning the categories written in priority order.
pub fn write_category_files(
    genome: &Genome,
    buckets: &CategoryBuckets,
) -> Result<Vec<RepeatCategory>> {
    let categories = present_categories(buckets);
    for &category in &categories {
        let records = &buckets[&category];
        fs::write(genome.category_tab_path(category), category_text(records))?;
        fs::write(genome.category_bed_path(category), sorted_category_text(records))?;
        info!("{}: {} records", genome.category_file_name(category, "tab"), records.len());
    }
    Ok(categories)
}

/// Move the text copies of each category file into `intermediate_files/`,
/// keeping the pre-sort `.tab` alongside the sorted `.bed` for audit. Only
/// the `.bb` files stay in the genome directory.
pub fn archive_category_files(genome: &Genome, categories: &[RepeatCategory]) -> Result<()> {
    let int_dir = genome.intermediate_dir();
    fs::create_dir_all(&int_dir)?;
    for &category in categories {
        for ext in ["tab", "bed"] {
            let name = genome.category_file_name(category, ext);
            fs::rename(genome.dir().join(&name), int_dir.join(&name))?;
        }
    }
    Ok(())
}
