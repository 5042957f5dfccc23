use std::error::Error;
use std::time::Instant;

use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::catalog::MemoryCatalog;
use crate::config::{RecommenderConfig, Weighting};
use crate::constants::{collaborative, evaluation, profile};
use crate::data::ItemScore;
use crate::evaluation::CrossValidation;
use crate::index::MemoryIndex;
use crate::metrics::Metric;
use crate::profile::UserProfile;
use crate::recommender::Recommender;
use crate::strategy::StrategyKind;

/// In-memory corpus a demo binary runs against.
pub struct DemoCorpus {
    /// Catalog backing profile construction and reduction.
    pub catalog: MemoryCatalog,
    /// Item index queried by the content-based strategy.
    pub items: MemoryIndex,
    /// User index queried by the collaborative strategy.
    pub users: MemoryIndex,
}

#[derive(Debug, Parser)]
#[command(
    name = "recommend",
    disable_help_subcommand = true,
    about = "Recommend packages for a synthetic user",
    long_about = "Build a user profile from the demo catalog, reduce it to manually \
                  installed maximal selections, and print one ranked recommendation."
)]
struct RecommendCli {
    #[arg(
        long,
        default_value = "cb",
        value_parser = parse_strategy_arg,
        help = "Strategy option: cb, cbt, cbd, col, colu"
    )]
    strategy: StrategyKind,
    #[arg(
        long,
        default_value = "bm25",
        value_parser = parse_weighting_arg,
        help = "Ranked retrieval weighting scheme: bm25 or trad"
    )]
    weighting: Weighting,
    #[arg(
        long = "profile-size",
        default_value_t = profile::DEFAULT_PROFILE_SIZE,
        value_parser = parse_positive_usize,
        help = "Number of expansion terms in the user term profile"
    )]
    profile_size: usize,
    #[arg(
        long,
        default_value_t = collaborative::DEFAULT_NEIGHBOURS,
        value_parser = parse_positive_usize,
        help = "Neighborhood size for collaborative retrieval"
    )]
    neighbours: usize,
    #[arg(
        long,
        default_value_t = profile::DEFAULT_RESULT_SIZE,
        value_parser = parse_positive_usize,
        help = "Number of recommended items"
    )]
    size: usize,
    #[arg(
        long = "installed-item",
        value_name = "NAME",
        help = "Simulate this installed item instead of the demo catalog set, repeat as needed"
    )]
    installed_items: Vec<String>,
}

#[derive(Debug, Parser)]
#[command(
    name = "crossvalidate",
    disable_help_subcommand = true,
    about = "Cross-validate the recommender against the demo corpus",
    long_about = "Hide part of a synthetic user's profile over repeated rounds and report \
                  how much of it the configured strategy rediscovers."
)]
struct CrossValidateCli {
    #[arg(
        long,
        default_value = "cb",
        value_parser = parse_strategy_arg,
        help = "Strategy option: cb, cbt, cbd, col, colu"
    )]
    strategy: StrategyKind,
    #[arg(
        long,
        default_value = "bm25",
        value_parser = parse_weighting_arg,
        help = "Ranked retrieval weighting scheme: bm25 or trad"
    )]
    weighting: Weighting,
    #[arg(
        long = "profile-size",
        default_value_t = profile::DEFAULT_PROFILE_SIZE,
        value_parser = parse_positive_usize,
        help = "Number of expansion terms in the user term profile"
    )]
    profile_size: usize,
    #[arg(
        long,
        default_value_t = collaborative::DEFAULT_NEIGHBOURS,
        value_parser = parse_positive_usize,
        help = "Neighborhood size for collaborative retrieval"
    )]
    neighbours: usize,
    #[arg(
        long,
        default_value_t = evaluation::DEFAULT_HOLDOUT_RATIO,
        value_parser = parse_ratio_arg,
        help = "Train share of the profile per round, strictly between 0 and 1"
    )]
    ratio: f64,
    #[arg(
        long,
        default_value_t = evaluation::DEFAULT_ROUNDS,
        value_parser = parse_positive_usize,
        help = "Number of holdout rounds"
    )]
    rounds: usize,
    #[arg(long, help = "Optional fixed shuffle seed for reproducible runs")]
    seed: Option<u64>,
    #[arg(long, help = "Log per-round confusion counts at info instead of debug")]
    verbose: bool,
}

/// Run one live recommendation against a demo corpus and print it.
pub fn run_recommend<I, Build>(args_iter: I, build_corpus: Build) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    Build: FnOnce() -> DemoCorpus,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<RecommendCli, _>(std::iter::once("recommend".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let corpus = build_corpus();
    let config = RecommenderConfig {
        strategy: cli.strategy,
        weighting: cli.weighting,
        profile_size: cli.profile_size,
        neighbours: cli.neighbours,
        result_size: cli.size,
    };

    let mut user = if cli.installed_items.is_empty() {
        UserProfile::from_catalog(&corpus.catalog)
    } else {
        UserProfile::new(ItemScore::uniform(
            cli.installed_items,
            profile::INSTALLED_ITEM_WEIGHT,
        ))
    };
    user.reduce_to_manually_installed(&corpus.catalog);
    user.reduce_to_maximal_set(&corpus.catalog);

    let recommender = Recommender::new(Box::new(corpus.items), Box::new(corpus.users), &config)?;

    let started = Instant::now();
    let recommendation = recommender.get_recommendation(&user, cli.size, None)?;
    info!(
        "[apprec:demo] recommendation computed in {:?}",
        started.elapsed()
    );

    println!(
        "Recommending applications for user {:032x}",
        user.user_id()
    );
    println!("strategy: {}", recommender.strategy().description());
    if recommendation.is_empty() {
        println!("(no recommendation)");
    } else {
        print!("{recommendation}");
    }
    Ok(())
}

/// Run a cross-validation sweep against a demo corpus and print the report.
pub fn run_cross_validation<I, Build>(
    args_iter: I,
    build_corpus: Build,
) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    Build: FnOnce() -> DemoCorpus,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<CrossValidateCli, _>(
        std::iter::once("crossvalidate".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let corpus = build_corpus();
    let config = RecommenderConfig {
        strategy: cli.strategy,
        weighting: cli.weighting,
        profile_size: cli.profile_size,
        neighbours: cli.neighbours,
        result_size: profile::DEFAULT_RESULT_SIZE,
    };

    let mut user = UserProfile::from_catalog(&corpus.catalog);
    user.reduce_to_manually_installed(&corpus.catalog);
    user.reduce_to_maximal_set(&corpus.catalog);

    let recommender = Recommender::new(Box::new(corpus.items), Box::new(corpus.users), &config)?;

    let mut harness = CrossValidation::new(
        cli.ratio,
        cli.rounds,
        &recommender,
        Metric::standard_set(),
        cli.verbose,
    )?;
    if let Some(seed) = cli.seed {
        harness = harness.with_seed(seed);
    }

    let started = Instant::now();
    let report = harness.run(&user)?;
    info!(
        "[apprec:demo] cross-validation finished in {:?}",
        started.elapsed()
    );

    print!("{report}");
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("'{raw}' is not a positive integer"))?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_ratio_arg(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !(parsed > 0.0 && parsed < 1.0) {
        return Err("ratio must lie strictly between 0 and 1".to_string());
    }
    Ok(parsed)
}

fn parse_strategy_arg(raw: &str) -> Result<StrategyKind, String> {
    raw.parse::<StrategyKind>().map_err(|err| err.to_string())
}

fn parse_weighting_arg(raw: &str) -> Result<Weighting, String> {
    raw.parse::<Weighting>().map_err(|err| err.to_string())
}
