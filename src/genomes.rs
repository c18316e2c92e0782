//src/genomes.rs

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::info;

use crate::error::{HubError, Result};
use crate::types::{AssemblyMetadata, ChromSize, Genome};

/// Width of the default browsing window shown when the genome is first
/// opened in the browser.
const DEFAULT_WINDOW: u64 = 100_000;

/// Parse a `chrom.sizes` table (`name\tlength` per line) and return the
/// entries sorted descending by length. An empty table is fatal since no
/// default position could be derived from it.
pub fn read_chrom_sizes<P: AsRef<Path>>(path: P) -> Result<Vec<ChromSize>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut sizes = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(name), Some(length)) = (fields.next(), fields.next()) else {
            return Err(HubError::MalformedRecord {
                path: path.to_path_buf(),
                line: idx as u64 + 1,
                reason: "expected a name and a length".to_string(),
            });
        };
        let length = length.parse::<u64>().map_err(|e| HubError::MalformedRecord {
            path: path.to_path_buf(),
            line: idx as u64 + 1,
            reason: format!("chromosome length '{}': {}", length, e),
        })?;
        sizes.push(ChromSize {
            name: name.to_string(),
            length,
        });
    }

    if sizes.is_empty() {
        return Err(HubError::EmptyChromSizes(path.to_path_buf()));
    }
    sizes.sort_by(|a, b| b.length.cmp(&a.length));
    Ok(sizes)
}

/// The terminal 100 kb window of the given chromosome, `name:start-length`.
/// For chromosomes shorter than the window the start clamps to 0 rather
/// than going negative.
pub fn default_position(chrom: &ChromSize) -> String {
    let start = chrom.length.saturating_sub(DEFAULT_WINDOW);
    format!("{}:{}-{}", chrom.name, start, chrom.length)
}

/// Pull organism and submission-date metadata out of the `#`-prefixed
/// comment lines of an NCBI assembly report. Either field missing is fatal.
pub fn parse_assembly_report<P: AsRef<Path>>(path: P) -> Result<AssemblyMetadata> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut common_name = None;
    let mut scientific_name = None;
    let mut date = None;

    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('#') {
            continue;
        }
        if line.contains("Organism") {
            // "# Organism name:  Tupaia chinensis (Chinese tree shrew)"
            if let (Some(open), Some(close)) = (line.find('('), line.rfind(')')) {
                if open < close {
                    common_name = Some(line[open + 1..close].to_string());
                }
            }
            if let Some(rest) = line.split_once(':').map(|(_, rest)| rest) {
                let name = rest.split('(').next().unwrap_or(rest).trim();
                if !name.is_empty() {
                    scientific_name = Some(name.to_string());
                }
            }
        }
        if line.contains("Date:") {
            // the token after "Date:" is the submission date
            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                if token.ends_with("Date:") {
                    date = tokens.next().map(|t| t.to_string());
                    break;
                }
            }
        }
    }

    let missing = |field| HubError::MissingMetadata {
        path: path.to_path_buf(),
        field,
    };
    Ok(AssemblyMetadata {
        common_name: common_name.ok_or_else(|| missing("Organism"))?,
        scientific_name: scientific_name.ok_or_else(|| missing("Organism"))?,
        date: date.ok_or_else(|| missing("Date"))?,
    })
}

/// The registration stanza appended to the shared genomes.txt. Field order
/// is fixed; the leading newline separates it from prior genomes' entries.
pub fn registry_stanza(genome: &Genome, meta: &AssemblyMetadata, default_pos: &str) -> String {
    format!(
        "\ngenome {g}\n\
         trackDb {g}/trackDb.txt\n\
         groups groups.txt\n\
         description {date} {common}\n\
         twoBitPath {g}/{g}.2bit\n\
         organism {scientific}\n\
         defaultPos {pos}\n",
        g = genome.name,
        date = meta.date,
        common = meta.common_name,
        scientific = meta.scientific_name,
        pos = default_pos,
    )
}

/// Append this genome's stanza to the shared registry. A genome already
/// present in genomes.txt is rejected; existing entries are never rewritten.
pub fn append_registry_stanza(genome: &Genome, stanza: &str) -> Result<()> {
    let registry = genome.registry_path();

    if registry.exists() {
        let existing = fs::read_to_string(&registry)?;
        let marker = format!("genome {}", genome.name);
        if existing.lines().any(|l| l.trim() == marker) {
            return Err(HubError::DuplicateRegistration(genome.name.clone()));
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&registry)?;
    file.write_all(stanza.as_bytes())?;
    Ok(())
}

/// Full registration step: derive the default position from the largest
/// chromosome, parse the assembly report, and append the stanza.
pub fn register_genome(genome: &Genome) -> Result<()> {
    let sizes = read_chrom_sizes(genome.chrom_sizes_path())?;
    let default_pos = default_position(&sizes[0]);
    let meta = parse_assembly_report(genome.assembly_report_path())?;

    append_registry_stanza(genome, &registry_stanza(genome, &meta, &default_pos))?;
    info!(
        "registered {} ({}) with defaultPos {}",
        genome.name, meta.scientific_name, default_pos
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
# Assembly name:  TupChi_1.0\n\
# Organism name:  Tupaia chinensis (Chinese tree shrew)\n\
# Taxid:          246437\n\
# Date:           2013-02-22\n\
sequence data follows\n";

    #[test]
    fn chrom_sizes_sort_descending_by_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chrom.sizes");
        fs::write(&path, "chrS\t5000\nchrL\t248956422\nchrM\t16569\n").unwrap();

        let sizes = read_chrom_sizes(&path).unwrap();
        assert_eq!(sizes[0].name, "chrL");
        assert_eq!(sizes[0].length, 248956422);
        assert_eq!(sizes[2].name, "chrS");
    }

    #[test]
    fn truncated_chrom_sizes_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chrom.sizes");
        fs::write(&path, "chr1\t1000\nchr2\n").unwrap();
        match read_chrom_sizes(&path) {
            Err(HubError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn empty_chrom_sizes_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chrom.sizes");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            read_chrom_sizes(&path),
            Err(HubError::EmptyChromSizes(_))
        ));
    }

    #[test]
    fn default_position_is_terminal_window() {
        let chrom = ChromSize {
            name: "NC_000001.11".to_string(),
            length: 248_956_422,
        };
        assert_eq!(default_position(&chrom), "NC_000001.11:248856422-248956422");
    }

    #[test]
    fn default_position_clamps_short_chromosomes() {
        let chrom = ChromSize {
            name: "chrM".to_string(),
            length: 16_569,
        };
        assert_eq!(default_position(&chrom), "chrM:0-16569");
    }

    #[test]
    fn assembly_report_metadata_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assembly_report.txt");
        fs::write(&path, REPORT).unwrap();

        let meta = parse_assembly_report(&path).unwrap();
        assert_eq!(meta.common_name, "Chinese tree shrew");
        assert_eq!(meta.scientific_name, "Tupaia chinensis");
        assert_eq!(meta.date, "2013-02-22");
    }

    #[test]
    fn missing_organism_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assembly_report.txt");
        fs::write(&path, "# Date: 2013-02-22\n").unwrap();
        assert!(matches!(
            parse_assembly_report(&path),
            Err(HubError::MissingMetadata { field: "Organism", .. })
        ));
    }

    #[test]
    fn registry_stanza_field_order() {
        let genome = Genome::new("GCF_000334495.1", "/hub");
        let meta = AssemblyMetadata {
            common_name: "Chinese tree shrew".to_string(),
            scientific_name: "Tupaia chinensis".to_string(),
            date: "2013-02-22".to_string(),
        };
        let stanza = registry_stanza(&genome, &meta, "chr1:0-100000");
        let keys: Vec<&str> = stanza
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec!["genome", "trackDb", "groups", "description", "twoBitPath", "organism", "defaultPos"]
        );
        assert!(stanza.contains("description 2013-02-22 Chinese tree shrew\n"));
        assert!(stanza.contains("twoBitPath GCF_000334495.1/GCF_000334495.1.2bit\n"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let genome = Genome::new("GCF_000334495.1", dir.path());

        append_registry_stanza(&genome, "\ngenome GCF_000334495.1\n").unwrap();
        let err = append_registry_stanza(&genome, "\ngenome GCF_000334495.1\n");
        assert!(matches!(err, Err(HubError::DuplicateRegistration(_))));

        // a different genome still appends
        let other = Genome::new("GCF_000001405.39", dir.path());
        append_registry_stanza(&other, "\ngenome GCF_000001405.39\n").unwrap();
        let text = fs::read_to_string(genome.registry_path()).unwrap();
        assert_eq!(text.matches("genome GCF_").count(), 2);
    }
}
