//src/fetch.rs

use std::fs::{self, File};
use std::io;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::info;
use reqwest::blocking::Client;

use crate::error::{HubError, Result};
use crate::types::Genome;

const NCBI_BASE: &str = "https://ftp.ncbi.nlm.nih.gov/genomes/all";

/// Build the NCBI directory URL for an assembly accession. The digit block
/// is split into triples, e.g. `GCF_000188715.1` lives under
/// `genomes/all/GCF/000/188/715/GCF_000188715.1`.
pub fn accession_url(accession: &str) -> Result<String> {
    let bad = || HubError::BadAccession(accession.to_string());

    let mut parts = accession.splitn(3, '_');
    let letters = parts.next().ok_or_else(bad)?;
    let numbers = parts.next().ok_or_else(bad)?;
    if letters.is_empty()
        || numbers.len() < 9
        || !numbers.as_bytes()[..9].iter().all(u8::is_ascii_digit)
    {
        return Err(bad());
    }

    Ok(format!(
        "{}/{}/{}/{}/{}/{}",
        NCBI_BASE,
        letters,
        &numbers[0..3],
        &numbers[3..6],
        &numbers[6..9],
        accession
    ))
}

/// Create the genome's working directory and pull the sequence, annotation,
/// repeat report, and assembly report from NCBI. Compressed files are
/// decompressed on the way to disk. A pre-existing directory is an error so
/// a rerun never tramples a previous download.
pub fn download_genome(genome: &Genome) -> Result<()> {
    let dir = genome.dir();
    if dir.exists() {
        return Err(HubError::GenomeExists(dir));
    }
    fs::create_dir_all(&dir)?;

    let base = accession_url(&genome.name)?;
    let client = Client::new();

    fetch_gz(&client, &format!("{}/{}.gz", base, genome.fasta_name()), &dir.join(genome.fasta_name()))?;
    fetch_gz(&client, &format!("{}/{}.gz", base, genome.gff_name()), &dir.join(genome.gff_name()))?;
    fetch_gz(&client, &format!("{}/{}.gz", base, genome.rm_out_name()), &dir.join(genome.rm_out_name()))?;
    fetch(
        &client,
        &format!("{}/{}_assembly_report.txt", base, genome.name),
        &genome.assembly_report_path(),
    )?;

    Ok(())
}

fn fetch(client: &Client, url: &str, dest: &Path) -> Result<()> {
    info!("fetching {}", url);
    let mut resp = client.get(url).send()?.error_for_status()?;
    let mut out = File::create(dest)?;
    io::copy(&mut resp, &mut out)?;
    Ok(())
}

fn fetch_gz(client: &Client, url: &str, dest: &Path) -> Result<()> {
    info!("fetching {}", url);
    let resp = client.get(url).send()?.error_for_status()?;
    let mut decoder = MultiGzDecoder::new(resp);
    let mut out = File::create(dest)?;
    io::copy(&mut decoder, &mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accession_url_splits_digit_triples() {
        assert_eq!(
            accession_url("GCF_000188715.1").unwrap(),
            "https://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/188/715/GCF_000188715.1"
        );
        assert_eq!(
            accession_url("GCA_000001405.28").unwrap(),
            "https://ftp.ncbi.nlm.nih.gov/genomes/all/GCA/000/001/405/GCA_000001405.28"
        );
    }

    #[test]
    fn malformed_accessions_are_rejected() {
        assert!(matches!(accession_url("GCF"), Err(HubError::BadAccession(_))));
        assert!(matches!(accession_url("GCF_123"), Err(HubError::BadAccession(_))));
    }

    #[test]
    fn non_digit_accession_block_is_rejected_not_sliced() {
        // multibyte characters make the digit block long enough in bytes
        // but must still come back as BadAccession, never a panic
        assert!(matches!(
            accession_url("GCF_ééééé"),
            Err(HubError::BadAccession(_))
        ));
        assert!(matches!(
            accession_url("GCF_abcdefghi.1"),
            Err(HubError::BadAccession(_))
        ));
    }

    #[test]
    fn existing_genome_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let genome = Genome::new("GCF_000188715.1", dir.path());
        fs::create_dir_all(genome.dir()).unwrap();
        assert!(matches!(
            download_genome(&genome),
            Err(HubError::GenomeExists(_))
        ));
    }
}
