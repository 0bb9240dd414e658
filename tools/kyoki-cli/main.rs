use ahash::AHashMap;
use clap::{Parser, ValueEnum};
use kyoki::prelude::*;
use serde::Deserialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_TRANSACTIONS_PATH: &str = "data/transactions.json";

// --- CSV Deserialization Structs (Input Format Specific) ---
// These match the Book-Crossing style `Ratings.csv` / `Books.csv` exports and
// are only used here for conversion.

#[derive(Deserialize)]
struct RawRating {
    #[serde(rename = "User-ID")]
    user_id: String,
    #[serde(rename = "ISBN")]
    isbn: String,
    #[serde(rename = "Book-Rating")]
    rating: f64,
}

#[derive(Deserialize)]
struct RawBook {
    #[serde(rename = "ISBN")]
    isbn: String,
    #[serde(rename = "Book-Title")]
    title: String,
}

/// A ratings export, optionally joined with a books export to turn ISBNs into titles.
struct RatingsExport {
    ratings: Vec<RawRating>,
    titles: Option<AHashMap<String, String>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// `{"transactions": [[...], ...]}` as written by `data-gen`
    Json,
    /// A `User-ID,ISBN,Book-Rating` CSV
    RatingsCsv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConsequentsCli {
    Single,
    Any,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatCli {
    Compact,
    Pretty,
    Json,
}

// --- Converter Implementation ---

impl IntoTransactions for RatingsExport {
    fn into_transactions(self) -> std::result::Result<TransactionSet, IngestError> {
        let titles = self.titles;
        let interactions: Vec<Interaction> = self
            .ratings
            .into_iter()
            .filter_map(|raw| {
                // Ratings for books missing from the books export are dropped,
                // like an inner join on ISBN.
                let item = match &titles {
                    Some(titles) => titles.get(&raw.isbn)?.clone(),
                    None => raw.isbn,
                };
                Some(Interaction::new(raw.user_id, item, raw.rating))
            })
            .collect();
        interactions.into_transactions()
    }
}

/// Mines co-occurrence rules from transaction data and serves recommendations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the transactions file
    input_path: Option<String>,

    /// Format of the input file
    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    format: InputFormat,

    /// Books CSV (`ISBN,Book-Title,...`) used to map ISBNs to titles
    #[arg(long)]
    books: Option<String>,

    /// Path to a JSON mining config; flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Minimum number of transactions an itemset must appear in
    #[arg(long)]
    min_support: Option<u64>,

    /// Minimum confidence for a rule, in (0, 1]
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Maximum number of recommendations to show
    #[arg(long)]
    top_k: Option<usize>,

    /// Consequent shapes to consider when generating rules
    #[arg(long, value_enum)]
    consequents: Option<ConsequentsCli>,

    /// Mine on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Abort mining after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Number of rules to print
    #[arg(long, default_value_t = 10)]
    rules: usize,

    /// Item (book title) to recommend for
    #[arg(short, long)]
    seed: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormatCli::Compact)]
    log_format: LogFormatCli,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    if cli.human {
        run_interactive(&cli);
    } else {
        run_non_interactive(&cli);
    }
}

fn init_logging(level: &str, format: LogFormatCli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(filter);

    match format {
        LogFormatCli::Compact => builder.compact().init(),
        LogFormatCli::Pretty => builder.pretty().init(),
        LogFormatCli::Json => builder.json().init(),
    }
}

/// Layers CLI flags over the config file over the defaults.
fn resolve_config(cli: &Cli) -> MiningConfig {
    let mut config = match &cli.config {
        Some(path) => MiningConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => MiningConfig::default(),
    };
    if let Some(min_support) = cli.min_support {
        config.min_support = min_support;
    }
    if let Some(min_confidence) = cli.min_confidence {
        config.min_confidence = min_confidence;
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = Some(top_k);
    }
    if let Some(consequents) = cli.consequents {
        config.consequents = match consequents {
            ConsequentsCli::Single => ConsequentSize::Single,
            ConsequentsCli::Any => ConsequentSize::Any,
        };
    }
    if cli.sequential {
        config.parallel = false;
    }
    if let Some(ms) = cli.deadline_ms {
        config.deadline_ms = Some(ms);
    }
    config
}

fn load_transactions(
    input_path: &str,
    format: InputFormat,
    books_path: Option<&str>,
) -> TransactionSet {
    let result = match format {
        InputFormat::Json => {
            TransactionFile::from_file(input_path).and_then(IntoTransactions::into_transactions)
        }
        InputFormat::RatingsCsv => {
            let ratings: Vec<RawRating> = read_csv(input_path);
            let titles = books_path.map(|path| {
                read_csv::<RawBook>(path)
                    .into_iter()
                    .map(|book| (book.isbn, book.title))
                    .collect()
            });
            RatingsExport { ratings, titles }.into_transactions()
        }
    };
    result.unwrap_or_else(|e| exit_with_error(&format!("Failed to load transactions: {}", e)))
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &str) -> Vec<T> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open '{}': {}", path, e)));
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn mine(set: &TransactionSet, config: MiningConfig) -> (MinedModel, Duration) {
    let engine = EngineBuilder::from_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid configuration: {}", e)));

    let start = Instant::now();
    let model = engine
        .run(set.transactions())
        .unwrap_or_else(|e| exit_with_error(&format!("Mining failed: {}", e)));
    (model, start.elapsed())
}

fn print_rules(model: &MinedModel, catalog: &ItemCatalog, limit: usize) {
    println!("\n--- Association Rules (top {} of {}) ---", limit, model.rules().len());
    for rule in model.rules().sorted().into_iter().take(limit) {
        println!("  {}", RuleFormatter::format_scored(rule, catalog));
    }
}

fn print_recommendations(model: &MinedModel, catalog: &ItemCatalog, seed: &str) {
    let Some(id) = catalog.id(seed) else {
        println!("  -> '{}' does not appear in the transactions", seed);
        return;
    };
    for line in recommendation_lines(model.recommend(id), catalog, seed) {
        println!("{}", line);
    }
}

/// Renders a ranked query result. A seed whose rules only lead back to itself
/// is reported apart from a seed that matched no rule at all.
fn recommendation_lines(
    ranked: Option<Vec<ScoredItem>>,
    catalog: &ItemCatalog,
    seed: &str,
) -> Vec<String> {
    match ranked {
        None => vec![format!("  -> No recommendations found for '{}'", seed)],
        Some(ranked) if ranked.is_empty() => vec![format!(
            "  -> '{}' matched rules, but they recommend nothing besides itself",
            seed
        )],
        Some(ranked) => std::iter::once(format!("Recommended for '{}':", seed))
            .chain(ranked.into_iter().map(|scored| {
                let name = catalog.name(scored.item).unwrap_or("<unknown>");
                format!(
                    "  -> {} (confidence {:.2}, support {})",
                    name, scored.confidence, scored.support
                )
            }))
            .collect(),
    }
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: &Cli) {
    let total_start = Instant::now();
    let input_path = cli.input_path.as_deref().unwrap_or_else(|| {
        exit_with_error("Input path is required in non-interactive mode.");
    });
    let config = resolve_config(cli);

    let load_start = Instant::now();
    let set = load_transactions(input_path, cli.format, cli.books.as_deref());
    let load_duration = load_start.elapsed();

    println!("\nStarting Kyoki mining run...");
    let (model, mine_duration) = mine(&set, config.clone());
    println!(
        "Mining Successful! {} itemsets and {} rules generated in {:?}",
        model.itemsets().len(),
        model.rules().len(),
        mine_duration
    );

    print_rules(&model, set.catalog(), cli.rules);

    if let Some(seed) = &cli.seed {
        println!();
        print_recommendations(&model, set.catalog(), seed);
    }

    let stats = model.stats();
    println!("\n--- Dataset Summary ---");
    println!("Transactions:         {}", stats.transactions);
    println!("Distinct Items:       {}", set.catalog().len());
    println!("Frequent Items:       {}", stats.frequent_items);
    println!("Prefix Tree Nodes:    {}", stats.tree_nodes);
    println!("Pickable Seed Items:  {}", model.all_antecedent_items().len());

    println!("\n--- Performance Summary ---");
    println!("File Loading:         {:?}", load_duration);
    println!("Mining:               {:?}", mine_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!(
        "Thresholds Used:      support >= {}, confidence >= {}",
        config.min_support, config.min_confidence
    );
    println!();
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(cli: &Cli) {
    println!("--- Kyoki Interactive Mode ---");

    let input_path = prompt_for_input("Enter transactions path", Some(default_input_path(cli)));
    let mut config = resolve_config(cli);
    let default_support = config.min_support.to_string();
    config.min_support = loop {
        let input = prompt_for_input("Enter minimum support", Some(&default_support));
        match input.parse::<u64>() {
            Ok(value) if value >= 1 => break value,
            _ => println!("Invalid support. Please enter a whole number of at least 1."),
        }
    };

    let set = load_transactions(&input_path, cli.format, cli.books.as_deref());
    let (model, mine_duration) = mine(&set, config);
    println!(
        "\nMined {} rules from {} transactions in {:?}",
        model.rules().len(),
        set.len(),
        mine_duration
    );

    let pickable: Vec<String> = set.catalog().resolve(&model.all_antecedent_items());
    if pickable.is_empty() {
        println!("No item yields recommendations at these thresholds.");
        return;
    }
    println!("\nItems with recommendations ({}):", pickable.len());
    for name in pickable.iter().take(20) {
        println!("  - {}", name);
    }
    if pickable.len() > 20 {
        println!("  ... and {} more", pickable.len() - 20);
    }

    loop {
        let seed = prompt_for_input("\nEnter a title (empty to quit)", None);
        if seed.is_empty() {
            break;
        }
        print_recommendations(&model, set.catalog(), &seed);
    }
}

/// The transactions path offered at the prompt: the positional argument if one was given.
fn default_input_path(cli: &Cli) -> &str {
    cli.input_path.as_deref().unwrap_or(DEFAULT_TRANSACTIONS_PATH)
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_names(["Dune", "Emma"])
    }

    #[test]
    fn test_unmatched_and_self_only_seeds_print_differently() {
        let catalog = catalog();
        let unmatched = recommendation_lines(None, &catalog, "Dune");
        let self_only = recommendation_lines(Some(Vec::new()), &catalog, "Dune");

        assert_eq!(unmatched.len(), 1);
        assert_eq!(self_only.len(), 1);
        assert_ne!(unmatched, self_only);
        assert!(unmatched[0].contains("No recommendations found"));
        assert!(self_only[0].contains("matched rules"));
    }

    #[test]
    fn test_ranked_seed_lists_each_item() {
        let catalog = catalog();
        let emma = catalog.id("Emma").unwrap();
        let lines = recommendation_lines(
            Some(vec![ScoredItem {
                item: emma,
                confidence: 0.75,
                support: 3,
            }]),
            &catalog,
            "Dune",
        );
        assert_eq!(
            lines,
            vec![
                "Recommended for 'Dune':".to_string(),
                "  -> Emma (confidence 0.75, support 3)".to_string(),
            ]
        );
    }

    #[test]
    fn test_interactive_prompt_defaults_to_positional_path() {
        let cli = Cli::parse_from(["kyoki-cli", "-i", "club.json"]);
        assert_eq!(default_input_path(&cli), "club.json");

        let cli = Cli::parse_from(["kyoki-cli", "-i"]);
        assert_eq!(default_input_path(&cli), DEFAULT_TRANSACTIONS_PATH);
    }
}
