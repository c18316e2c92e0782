//src/track_db.rs

use std::fmt::Write as FmtWrite;
use std::fs;

use log::info;

use crate::error::Result;
use crate::types::{Genome, RepeatCategory};

/// The ncbiGene stanza describing the gene-prediction bigBed delivered with
/// the assembly.
pub fn gene_track_stanza(genome_name: &str) -> String {
    format!(
        "track ncbiGene\n\
         longLabel ncbiGene - gene predictions delivered with assembly from NCBI\n\
         shortLabel ncbiGene\n\
         priority 12\n\
         visibility pack\n\
         color 0,80,150\n\
         altColor 150,80,0\n\
         colorByStrand 0,80,150 150,80,0\n\
         bigDataUrl {}_genePred.bb\n\
         type bigGenePred\n\
         group genes\n",
        genome_name
    )
}

/// The RepeatMasker composite parent stanza. Child tracks hang off this via
/// `parent RepeatMasker`.
pub fn repeat_composite_stanza() -> &'static str {
    "\ntrack RepeatMasker\n\
     compositeTrack on\n\
     shortLabel RepeatMasker\n\
     longLabel Repeating Elements by RepeatMasker\n\
     group varRep\n\
     priority 149.1\n\
     visibility dense\n\
     type bed 3 .\n\
     noInherit on\n"
}

/// One tab-indented child stanza nested under the composite.
pub fn repeat_child_stanza(genome: &Genome, category: RepeatCategory) -> String {
    format!(
        "\n\ttrack RepeatMasker{label}\n\
         \tparent RepeatMasker\n\
         \tshortLabel {label}\n\
         \tlongLabel {label} Repeating Elements by RepeatMasker\n\
         \tpriority 1\n\
         \tspectrum on\n\
         \tmaxWindowToDraw 10000000\n\
         \tcolorByStrand 50,50,150 150,50,50\n\
         \ttype bigBed 6 +\n\
         \tbigDataUrl {url}\n",
        label = category.label(),
        url = genome.category_file_name(category, "bb"),
    )
}

/// Build the full trackDb document: the gene-prediction track, the
/// RepeatMasker composite, then one child per present category. Callers pass
/// the explicit category set returned by the routing stage; categories
/// without records are simply absent.
pub fn track_db_text(genome: &Genome, categories: &[RepeatCategory]) -> String {
    let mut text = gene_track_stanza(&genome.name);
    text.push_str(repeat_composite_stanza());
    for &category in categories {
        write!(text, "{}", repeat_child_stanza(genome, category)).unwrap();
    }
    text
}

/// Write `trackDb.txt` for this genome. The document is rebuilt from
/// scratch every run so a rerun never duplicates stanzas.
pub fn write_track_db(genome: &Genome, categories: &[RepeatCategory]) -> Result<()> {
    let path = genome.track_db_path();
    fs::write(&path, track_db_text(genome, categories))?;
    info!("wrote {} with {} repeat tracks", path.display(), categories.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_match_present_categories_exactly() {
        let genome = Genome::new("GCF_000188715.1", "/hub");
        let text = track_db_text(&genome, &[RepeatCategory::Sine, RepeatCategory::Other]);

        let children: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("\ttrack "))
            .collect();
        assert_eq!(
            children,
            vec!["\ttrack RepeatMaskerSINE", "\ttrack RepeatMaskerOther"]
        );
        assert!(!text.contains("RepeatMaskerLINE"));
    }

    #[test]
    fn stanza_sections_appear_in_fixed_order() {
        let genome = Genome::new("GCF_000188715.1", "/hub");
        let text = track_db_text(&genome, &[RepeatCategory::Line]);

        let gene = text.find("track ncbiGene").unwrap();
        let composite = text.find("track RepeatMasker\n").unwrap();
        let child = text.find("\ttrack RepeatMaskerLINE").unwrap();
        assert!(gene < composite && composite < child);

        assert!(text.contains("bigDataUrl GCF_000188715.1_genePred.bb"));
        assert!(text.contains("compositeTrack on"));
        assert!(text.contains("priority 149.1"));
        assert!(text.contains("\tbigDataUrl GCF_000188715.1.rmsk.LINE.bb"));
    }

    #[test]
    fn child_stanzas_carry_fixed_display_attributes() {
        let genome = Genome::new("GCF_000001405.39", "/hub");
        let stanza = repeat_child_stanza(&genome, RepeatCategory::SimpleRepeat);
        assert!(stanza.contains("\tparent RepeatMasker\n"));
        assert!(stanza.contains("\tmaxWindowToDraw 10000000\n"));
        assert!(stanza.contains("\tcolorByStrand 50,50,150 150,50,50\n"));
        assert!(stanza.contains("\ttype bigBed 6 +\n"));
        assert!(stanza.contains("\tshortLabel Simple_repeat\n"));
    }
}
