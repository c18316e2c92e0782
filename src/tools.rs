//src/tools.rs
//
// Thin wrappers around the UCSC command-line converters. The pipeline only
// needs the files these produce; their binary formats are opaque here.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{HubError, Result};
use crate::types::Genome;

fn run_tool<I, S>(tool: &'static str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(tool);
    command.args(args);
    debug!("running {:?}", command);

    let status = command.status()?;
    if !status.success() {
        return Err(HubError::Tool { tool, status });
    }
    Ok(())
}

pub fn fa_to_two_bit(fasta: &Path, two_bit: &Path) -> Result<()> {
    run_tool("faToTwoBit", [fasta, two_bit])
}

pub fn two_bit_info(two_bit: &Path, chrom_sizes: &Path) -> Result<()> {
    run_tool("twoBitInfo", [two_bit, chrom_sizes])
}

pub fn gff3_to_gene_pred(gff: &Path, gene_pred: &Path) -> Result<()> {
    run_tool("gff3ToGenePred", [gff, gene_pred])
}

pub fn gene_pred_to_big_gene_pred(gene_pred: &Path, out: &Path) -> Result<()> {
    run_tool("genePredToBigGenePred", [gene_pred, out])
}

pub fn bed_sort(bed_in: &Path, bed_out: &Path) -> Result<()> {
    run_tool("bedSort", [bed_in, bed_out])
}

pub fn bed_clip(bed_in: &Path, chrom_sizes: &Path, bed_out: &Path) -> Result<()> {
    run_tool("bedClip", [bed_in, chrom_sizes, bed_out])
}

pub fn bed_to_big_bed(
    bed_type: &str,
    autosql: &Path,
    bed: &Path,
    chrom_sizes: &Path,
    out: &Path,
) -> Result<()> {
    let args: Vec<OsString> = vec![
        OsString::from("-tab"),
        OsString::from(format!("-type={}", bed_type)),
        OsString::from(format!("-as={}", autosql.display())),
        bed.as_os_str().to_os_string(),
        chrom_sizes.as_os_str().to_os_string(),
        out.as_os_str().to_os_string(),
    ];
    run_tool("bedToBigBed", args)
}

/// Convert the raw NCBI downloads into browser-native indexes: the 2bit
/// sequence, the chrom.sizes table, and the bigGenePred gene track.
pub fn format_genome(genome: &Genome) -> Result<()> {
    let dir = genome.dir();

    fa_to_two_bit(&dir.join(genome.fasta_name()), &genome.two_bit_path())?;
    two_bit_info(&genome.two_bit_path(), &genome.chrom_sizes_path())?;

    let gene_pred = dir.join(format!("{}.genePred", genome.name));
    let big_gene_pred = dir.join("bigGenePred.txt");
    let big_gene_bed = dir.join("bigGenePred.bed");
    let clipped = dir.join("clippedBigGenePred.bed");

    gff3_to_gene_pred(&dir.join(genome.gff_name()), &gene_pred)?;
    gene_pred_to_big_gene_pred(&gene_pred, &big_gene_pred)?;
    bed_sort(&big_gene_pred, &big_gene_bed)?;
    bed_clip(&big_gene_bed, &genome.chrom_sizes_path(), &clipped)?;
    bed_to_big_bed(
        "bed12+8",
        &genome.big_gene_pred_as_path(),
        &clipped,
        &genome.chrom_sizes_path(),
        &dir.join(genome.gene_pred_bb_name()),
    )
}
