//src/types.rs

use std::path::{Path, PathBuf};

/// One record from a RepeatMasker annotation report (`*_rm.out`).
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatRecord {
    pub sw_score: u32,
    pub perc_div: f64,
    pub perc_del: f64,
    pub perc_ins: f64,
    pub chrom: String,
    pub begin: u64,
    pub end: u64,
    /// Bases left in the query sequence, parentheses stripped.
    pub geno_left: String,
    /// `-` for reverse strand (normalized from the report's `C`); any other
    /// token is kept as the report wrote it.
    pub strand: String,
    pub name: String,
    /// Class part of the `class/family` field; equals `family` when the
    /// report gives no `/`.
    pub class: String,
    pub family: String,
    pub rep_begin: String,
    pub rep_end: String,
    pub rep_left: String,
}

/// The fixed taxonomy of repeat classes used to group annotations into
/// browser tracks. Assignment scans [`REPEAT_CATEGORIES`] in order and the
/// first label that is a substring of the record's class wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepeatCategory {
    Sine,
    Line,
    Ltr,
    Dna,
    SimpleRepeat,
    LowComplexity,
    Satellite,
    Rna,
    Other,
}

/// Priority order for classification and for child-track ordering in the
/// generated trackDb. `Other` is the fallback and always sorts last.
pub const REPEAT_CATEGORIES: [RepeatCategory; 9] = [
    RepeatCategory::Sine,
    RepeatCategory::Line,
    RepeatCategory::Ltr,
    RepeatCategory::Dna,
    RepeatCategory::SimpleRepeat,
    RepeatCategory::LowComplexity,
    RepeatCategory::Satellite,
    RepeatCategory::Rna,
    RepeatCategory::Other,
];

impl RepeatCategory {
    /// The label used in file names and track names, e.g. `Simple_repeat`.
    pub fn label(&self) -> &'static str {
        match self {
            RepeatCategory::Sine => "SINE",
            RepeatCategory::Line => "LINE",
            RepeatCategory::Ltr => "LTR",
            RepeatCategory::Dna => "DNA",
            RepeatCategory::SimpleRepeat => "Simple_repeat",
            RepeatCategory::LowComplexity => "Low_complexity",
            RepeatCategory::Satellite => "Satellite",
            RepeatCategory::Rna => "RNA",
            RepeatCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for RepeatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry from a `chrom.sizes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromSize {
    pub name: String,
    pub length: u64,
}

/// Metadata pulled from the NCBI assembly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyMetadata {
    pub common_name: String,
    pub scientific_name: String,
    pub date: String,
}

/// Path conventions for one genome inside the hub directory. File names
/// follow the NCBI download naming scheme for the accession, so every stage
/// of the pipeline can locate its inputs without passing paths around.
#[derive(Debug, Clone)]
pub struct Genome {
    pub name: String,
    pub hub_dir: PathBuf,
}

impl Genome {
    pub fn new<P: AsRef<Path>>(accession: &str, hub_dir: P) -> Genome {
        Genome {
            name: accession.to_string(),
            hub_dir: hub_dir.as_ref().to_path_buf(),
        }
    }

    /// The genome's working directory, `{hub_dir}/{accession}`.
    pub fn dir(&self) -> PathBuf {
        self.hub_dir.join(&self.name)
    }

    pub fn fasta_name(&self) -> String {
        format!("{}_genomic.fna", self.name)
    }

    pub fn gff_name(&self) -> String {
        format!("{}_genomic.gff", self.name)
    }

    pub fn rm_out_name(&self) -> String {
        format!("{}_rm.out", self.name)
    }

    pub fn rm_out_path(&self) -> PathBuf {
        self.dir().join(self.rm_out_name())
    }

    pub fn two_bit_path(&self) -> PathBuf {
        self.dir().join(format!("{}.2bit", self.name))
    }

    pub fn chrom_sizes_path(&self) -> PathBuf {
        self.dir().join("chrom.sizes")
    }

    pub fn assembly_report_path(&self) -> PathBuf {
        self.dir().join("assembly_report.txt")
    }

    pub fn track_db_path(&self) -> PathBuf {
        self.dir().join("trackDb.txt")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.hub_dir.join("genomes.txt")
    }

    /// Archive area for the pre-sort and sorted text copies of each
    /// category file.
    pub fn intermediate_dir(&self) -> PathBuf {
        self.dir().join("intermediate_files")
    }

    pub fn gene_pred_bb_name(&self) -> String {
        format!("{}_genePred.bb", self.name)
    }

    pub fn category_file_name(&self, category: RepeatCategory, ext: &str) -> String {
        format!("{}.rmsk.{}.{}", self.name, category.label(), ext)
    }

    pub fn category_tab_path(&self, category: RepeatCategory) -> PathBuf {
        self.dir().join(self.category_file_name(category, "tab"))
    }

    pub fn category_bed_path(&self, category: RepeatCategory) -> PathBuf {
        self.dir().join(self.category_file_name(category, "bed"))
    }

    pub fn category_bb_path(&self, category: RepeatCategory) -> PathBuf {
        self.dir().join(self.category_file_name(category, "bb"))
    }

    /// AutoSql schemas live next to genomes.txt so all genomes share them.
    pub fn big_gene_pred_as_path(&self) -> PathBuf {
        self.hub_dir.join("bigGenePred.as")
    }

    pub fn rmsk_as_path(&self) -> PathBuf {
        self.hub_dir.join("rmskBed6+10.as")
    }
}
