// src/lib.rs
pub mod types;
pub mod error;
pub mod rmsk;
pub mod classify_repeats;
pub mod track_db;
pub mod genomes;
pub mod fetch;
pub mod tools;

use log::info;

pub use crate::error::{HubError, Result};
pub use crate::types::{AssemblyMetadata, ChromSize, Genome, RepeatCategory, RepeatRecord};

use crate::classify_repeats::CategoryBuckets;

/// The outcome of the repeat classification stage. Structured buckets are
/// kept and text is generated on demand, so the same result can feed the
/// file writer, the trackDb generator, and tests without re-parsing.
pub struct RepeatTrackResults {
    /// Categories that received at least one record, in fixed priority
    /// order with `Other` last.
    pub categories: Vec<RepeatCategory>,

    /// Classified records per category, input order preserved.
    pub buckets: CategoryBuckets,
}

impl RepeatTrackResults {
    /// Pre-sort tab-file text for one category, if it has records.
    pub fn get_category_tab_text(&self, category: RepeatCategory) -> Option<String> {
        self.buckets
            .get(&category)
            .map(|records| classify_repeats::category_text(records))
    }

    /// Position-sorted bed text for one category, if it has records.
    pub fn get_category_bed_text(&self, category: RepeatCategory) -> Option<String> {
        self.buckets
            .get(&category)
            .map(|records| classify_repeats::sorted_category_text(records))
    }

    /// The full trackDb document for this result set.
    pub fn get_track_db_text(&self, genome: &Genome) -> String {
        track_db::track_db_text(genome, &self.categories)
    }
}

/// Parse the RepeatMasker report and route every record into its category
/// bucket. Pure with respect to the filesystem apart from reading the
/// report; rerunning on identical input yields identical buckets.
pub fn build_repeat_tracks(genome: &Genome) -> Result<RepeatTrackResults> {
    let records = rmsk::read_rmsk_records(genome.rm_out_path())?;
    info!("classifying {} repeat records for {}", records.len(), genome.name);

    let buckets = classify_repeats::bucket_records(records);
    let categories = classify_repeats::present_categories(&buckets);
    Ok(RepeatTrackResults { categories, buckets })
}

/// Write the per-category files, index them with bedToBigBed, and archive
/// the text copies under `intermediate_files/`.
pub fn make_repeat_files(genome: &Genome, results: &RepeatTrackResults) -> Result<()> {
    let categories = classify_repeats::write_category_files(genome, &results.buckets)?;
    for &category in &categories {
        tools::bed_to_big_bed(
            "bed6+10",
            &genome.rmsk_as_path(),
            &genome.category_bed_path(category),
            &genome.chrom_sizes_path(),
            &genome.category_bb_path(category),
        )?;
    }
    classify_repeats::archive_category_files(genome, &categories)
}

/// Run the whole pipeline for one genome: download (unless skipped),
/// convert to browser formats, classify repeats, write trackDb, register.
pub fn run(genome: &Genome, skip_download: bool) -> Result<()> {
    if !skip_download {
        fetch::download_genome(genome)?;
    }
    tools::format_genome(genome)?;

    let results = build_repeat_tracks(genome)?;
    make_repeat_files(genome, &results)?;
    track_db::write_track_db(genome, &results.categories)?;

    genomes::register_genome(genome)
}
