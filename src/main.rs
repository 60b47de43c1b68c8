use anyhow::Result;
use clap::{Parser, ValueEnum};
use mention_graph_analyzer::config::{
    Config, ConvergencePolicy, ReciprocalPolicy, SelfLoopPolicy, VisitOrder,
};
use mention_graph_analyzer::data::loader;
use mention_graph_analyzer::rank::RankingEntry;
use mention_graph_analyzer::{analyze, storage, viz, MentionNetwork};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Reciprocal {
    Sum,
    Max,
}

#[derive(Parser, Debug)]
#[clap(
    name = "mention-graph-analyzer",
    about = "Community and influence analysis of tweet mention networks"
)]
struct Cli {
    /// Path to input CSV or Parquet file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "mention_results")]
    output_dir: String,

    /// Column holding the author's user id
    #[clap(long, default_value = "username")]
    user_column: String,

    /// Column holding the tweet text
    #[clap(long, default_value = "tweets")]
    text_column: String,

    /// Number of entries in the top authority/hub lists
    #[clap(long, default_value = "10")]
    top_n: usize,

    /// Remove self-mentions from both graph views
    #[clap(long)]
    drop_self_loops: bool,

    /// Undirected weight for users who mentioned each other
    #[clap(long, value_enum, default_value = "sum")]
    reciprocal: Reciprocal,

    /// Seed for a shuffled Louvain visitation order (ascending order if unset)
    #[clap(long)]
    seed: Option<u64>,

    /// HITS iteration cap
    #[clap(long, default_value = "100")]
    hits_max_iter: usize,

    /// HITS convergence tolerance
    #[clap(long, default_value = "1e-8")]
    hits_tolerance: f64,

    /// Keep unconverged HITS scores instead of failing
    #[clap(long)]
    accept_unconverged: bool,

    /// Skip visualization data files
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        let mut config = Config::new(&self.user_column, &self.text_column);
        config.top_n = self.top_n;
        config.threads = self.threads;
        config.self_loops = if self.drop_self_loops {
            SelfLoopPolicy::Drop
        } else {
            SelfLoopPolicy::Keep
        };
        config.reciprocal = match self.reciprocal {
            Reciprocal::Sum => ReciprocalPolicy::Sum,
            Reciprocal::Max => ReciprocalPolicy::Max,
        };
        config.louvain.order = self.seed.map_or(VisitOrder::Ascending, VisitOrder::Seeded);
        config.hits.max_iterations = self.hits_max_iter;
        config.hits.tolerance = self.hits_tolerance;
        config.hits.policy = if self.accept_unconverged {
            ConvergencePolicy::BestEffort
        } else {
            ConvergencePolicy::Strict
        };
        config
    }
}

fn print_ranking(title: &str, entries: &[RankingEntry]) {
    println!("\n{}:", title);
    for (rank, entry) in entries.iter().enumerate() {
        println!("{:>3}. {:<24} {}", rank + 1, entry.user, entry.score);
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = args.to_config();
    let num_threads = config.worker_threads();

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting mention graph analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load records
    let records = loader::load_records(&args.input, &config.author_column, &config.text_column)?;

    // 2. Build the mention network
    let network = MentionNetwork::from_records(&records, &config);

    // 3. Communities and rankings
    let report = analyze(&network, &config)?;

    println!(
        "Number of communities: {}",
        report.communities.num_communities()
    );
    println!("Modularity: {:.4}", report.communities.modularity);
    print_ranking("Top Authorities", report.degree.authorities.top(config.top_n));
    print_ranking("Top Hubs", report.degree.hubs.top(config.top_n));

    // 4. Save results
    storage::save_results(&network, &report, config.top_n, &args.output_dir)?;

    // 5. Generate visualization data if requested
    if !args.skip_viz {
        viz::generate_visualizations(&network, &report, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
