use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use assembly_hub_rs::{
    build_repeat_tracks, fetch, genomes, make_repeat_files, tools, track_db, Genome,
};

/// Creates an assembly hub with NCBI gene predictions and RepeatMasker
/// tracks for one genome accession.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// RefSeq accession of the genome, e.g. GCF_000188715.1
    #[arg(short = 'g', long)]
    accession: String,

    /// Directory where genomes.txt lives; the genome gets a subdirectory here
    #[arg(short, long)]
    path: PathBuf,

    /// Skip the download step (raw files already on disk)
    #[arg(short, long)]
    skip_download: bool,
}

fn phase_spinner(color: &str, msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{}}} {{msg}}", color))
            .expect("Invalid spinner template"),
    );
    spinner.set_message(msg.to_string());
    spinner
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();
    let genome = Genome::new(&args.accession, &args.path);

    if !args.skip_download {
        let spinner = phase_spinner("blue", "Downloading genome files from NCBI...");
        fetch::download_genome(&genome)?;
        spinner.finish_with_message(format!("Downloaded {} from NCBI.", genome.name));
    }

    let spinner = phase_spinner("green", "Converting to browser formats...");
    tools::format_genome(&genome)?;
    spinner.finish_with_message("2bit, chrom.sizes and gene bigBed ready.");

    let spinner = phase_spinner("yellow", "Classifying repeat records...");
    let results = build_repeat_tracks(&genome)?;
    let total: usize = results.buckets.values().map(|b| b.len()).sum();
    spinner.finish_with_message(format!(
        "Classified {} records into {} categories.",
        total,
        results.categories.len()
    ));

    let spinner = phase_spinner("yellow", "Writing repeat category files...");
    make_repeat_files(&genome, &results)?;
    let names: Vec<&str> = results.categories.iter().map(|c| c.label()).collect();
    spinner.finish_with_message(format!("Category files written: {}.", names.join(", ")));

    let spinner = phase_spinner("cyan", "Writing trackDb.txt and registering genome...");
    track_db::write_track_db(&genome, &results.categories)?;
    genomes::register_genome(&genome)?;
    spinner.finish_with_message(format!("{} registered in genomes.txt.", genome.name));

    Ok(())
}
