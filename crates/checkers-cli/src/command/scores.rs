use std::path::PathBuf;

use checkers_engine::{Side, wins};

use crate::{command::play::DEFAULT_SCORES_PATH, store::JsonScoreStore};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// File the win counters are kept in
    #[clap(long, default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg { scores } = arg;

    let store = JsonScoreStore::open(scores)?;
    println!("Scores: {}", store.path().display());
    for side in Side::ALL {
        println!("  {:<8} {:>4}", side.to_string(), wins(&store, side));
    }
    match store.file().updated_at {
        Some(updated_at) => println!("Last win: {}", updated_at.to_rfc3339()),
        None => println!("No game recorded yet"),
    }
    Ok(())
}
