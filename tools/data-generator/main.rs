use clap::Parser;
use kyoki::data::TransactionFile;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// A CLI tool to generate synthetic reader transactions for the Kyoki miner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_transactions.json")]
    output: String,

    /// Number of readers (transactions) to generate
    #[arg(long, default_value_t = 1000)]
    users: usize,

    /// Number of book series; readers of a series tend to read its books together
    #[arg(long, default_value_t = 8)]
    series: usize,

    /// Number of books per series
    #[arg(long, default_value_t = 4)]
    series_len: usize,

    /// Number of unrelated standalone titles sprinkled in as noise
    #[arg(long, default_value_t = 200)]
    standalone: usize,

    /// The maximum number of standalone titles per reader
    #[arg(long, default_value_t = 3)]
    max_noise: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if cli.series == 0 || cli.series_len == 0 {
        eprintln!("Error: --series and --series-len must both be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating {} readers over {} series of {} books (+{} standalone titles)...",
        cli.users, cli.series, cli.series_len, cli.standalone
    );

    let transactions = (0..cli.users)
        .map(|_| generate_reader(&mut rng, &cli))
        .filter(|books| !books.is_empty())
        .collect();

    let file = TransactionFile { transactions };
    file.save(&cli.output)?;

    println!(
        "Successfully generated {} transactions and saved them to '{}'",
        file.len(),
        cli.output
    );

    Ok(())
}

fn series_title(series: usize, volume: usize) -> String {
    format!("Series {} - Book {}", series + 1, volume + 1)
}

fn standalone_title(index: usize) -> String {
    format!("Standalone {}", index + 1)
}

/// One reader picks one or two favourite series and reads an unbroken run of
/// each from the first book, then a few random standalone titles.
fn generate_reader(rng: &mut StdRng, cli: &Cli) -> Vec<String> {
    let mut books = BTreeSet::new();

    let favourites = rng.random_range(1..=2);
    for _ in 0..favourites {
        let series = rng.random_range(0..cli.series);
        for volume in 0..cli.series_len {
            // Each further volume is read with decreasing likelihood.
            if volume > 0 && !rng.random_bool(0.75) {
                break;
            }
            books.insert(series_title(series, volume));
        }
    }

    if cli.standalone > 0 {
        let noise = rng.random_range(0..=cli.max_noise);
        for _ in 0..noise {
            books.insert(standalone_title(rng.random_range(0..cli.standalone)));
        }
    }

    books.into_iter().collect()
}
