use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use warnet_model::{
    SimulationConfig, SimulationRun, Strategy, compare_doctrines_concurrent, run_simulation,
};

/// Which bombing doctrines a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DoctrineChoice {
    /// Infrastructure strikes only
    Precision,
    /// Infrastructure strikes plus worker casualties
    Area,
    /// Both doctrines side by side, run concurrently
    Both,
}

impl DoctrineChoice {
    #[must_use]
    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Self::Precision => &[Strategy::Precision],
            Self::Area => &[Strategy::Area],
            Self::Both => &Strategy::ALL,
        }
    }
}

/// All doctrine runs for one seed.
#[derive(Debug, Clone, Serialize)]
pub struct SeedRuns {
    pub seed: u64,
    pub runs: Vec<SimulationRun>,
}

impl SeedRuns {
    #[must_use]
    pub fn get(&self, strategy: Strategy) -> Option<&SimulationRun> {
        self.runs.iter().find(|run| run.strategy == strategy)
    }
}

/// Run the selected doctrines for `seed` on top of `base`.
pub async fn run_seed(
    base: &SimulationConfig,
    seed: u64,
    choice: DoctrineChoice,
) -> Result<SeedRuns> {
    let config = base.clone().with_seed(seed);
    let runs = match choice {
        DoctrineChoice::Both => {
            let comparison = compare_doctrines_concurrent(config)
                .await
                .with_context(|| format!("doctrine comparison failed for seed {seed}"))?;
            vec![comparison.precision, comparison.area]
        }
        DoctrineChoice::Precision | DoctrineChoice::Area => {
            let strategy = choice.strategies()[0];
            let run = run_simulation(config.with_strategy(strategy))
                .with_context(|| format!("{strategy} run failed for seed {seed}"))?;
            vec![run]
        }
    };
    for run in &runs {
        info!(
            "Seed {seed}: {} doctrine ran {} turns",
            run.strategy,
            run.turns_run()
        );
    }
    Ok(SeedRuns { seed, runs })
}

/// Run every seed in order.
pub async fn run_all(
    base: &SimulationConfig,
    seeds: &[u64],
    choice: DoctrineChoice,
) -> Result<Vec<SeedRuns>> {
    let mut results = Vec::with_capacity(seeds.len());
    for &seed in seeds {
        results.push(run_seed(base, seed, choice).await?);
    }
    Ok(results)
}
