//! Evaluates rule-based policies over a grid of CSI noise levels.
//!
//! ```bash
//! cargo run --example noise_sweep -- \
//!     --data data/beam_dataset_speed60_snr20.csv \
//!     --noise 0.0 --noise 0.5 --noise 1.0 \
//!     --output noise_sweep.csv
//! ```
use anyhow::Result;
use beamsel::{
    beamsel_core::Evaluator,
    beamsel_env::{
        discover_user_streams, BeamDataset, BeamEvaluator, BeamSelectionEnv,
        BeamSelectionEnvConfig, RewardType,
    },
    ArgmaxPolicy, RandomPolicy,
};
use clap::Parser;
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};

/// Sweep CSI noise levels over beam selection datasets
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV datasets
    #[arg(short, long = "data", required = true)]
    data: Vec<PathBuf>,

    /// Standard deviations of CSI noise
    #[arg(short, long = "noise", default_values_t = [0.0, 0.2, 0.5, 1.0])]
    noise: Vec<f32>,

    /// CSI reporting delay in steps
    #[arg(long, default_value_t = 0)]
    delay: usize,

    /// Number of stacked steps in an observation
    #[arg(long, default_value_t = 1)]
    history: usize,

    /// Reward: accuracy, sinr, sum-rate or relative
    #[arg(short, long, default_value_t = RewardType::Accuracy)]
    reward: RewardType,

    /// Episodes per evaluation
    #[arg(short, long, default_value_t = 10)]
    episodes: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Output CSV
    #[arg(short, long, default_value = "noise_sweep.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SweepRecord {
    dataset: String,
    user: Option<u32>,
    stream: Option<u32>,
    num_beams: usize,
    noise_std: f32,
    delay_steps: usize,
    history_steps: usize,
    policy: &'static str,
    episode_return: f32,
    accuracy: f32,
    mean_selected_sinr: f32,
}

fn evaluate(
    dataset: &Arc<BeamDataset>,
    config: &BeamSelectionEnvConfig,
    args: &Args,
) -> Result<Vec<(&'static str, f32, f32, f32)>> {
    let num_beams = dataset.num_beams();
    let mut results = vec![];

    let env = BeamSelectionEnv::from_dataset(dataset.clone(), config, args.seed)?;
    let mut policy = ArgmaxPolicy::new(num_beams);
    let record = BeamEvaluator::new(env, args.episodes).evaluate(&mut policy)?;
    results.push((
        "argmax",
        record.get_scalar("Episode return")?,
        record.get_scalar("Accuracy")?,
        record.get_scalar("Mean selected SINR")?,
    ));

    let env = BeamSelectionEnv::from_dataset(dataset.clone(), config, args.seed)?;
    let mut policy = RandomPolicy::new(num_beams, args.seed);
    let record = BeamEvaluator::new(env, args.episodes).evaluate(&mut policy)?;
    results.push((
        "random",
        record.get_scalar("Episode return")?,
        record.get_scalar("Accuracy")?,
        record.get_scalar("Mean selected SINR")?,
    ));

    Ok(results)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut wtr = csv::Writer::from_path(&args.output)?;

    for path in args.data.iter() {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (pairs, _) = discover_user_streams(path)?;
        let targets: Vec<Option<(u32, u32)>> = if pairs.is_empty() {
            vec![None]
        } else {
            pairs.into_iter().map(Some).collect()
        };

        for user_stream in targets {
            let dataset = Arc::new(BeamDataset::load(path, user_stream)?);
            log::info!("{}, {:?}: {}", name, user_stream, dataset.summary());

            for &noise_std in args.noise.iter() {
                let config = BeamSelectionEnvConfig::default()
                    .reward_type(args.reward)
                    .csi_noise_std(noise_std)
                    .delay_steps(args.delay)
                    .history_steps(args.history);

                for (policy, episode_return, accuracy, mean_selected_sinr) in
                    evaluate(&dataset, &config, &args)?
                {
                    log::info!(
                        "noise {:.2}, {}: accuracy {:.3}, return {:.2}",
                        noise_std,
                        policy,
                        accuracy,
                        episode_return
                    );
                    wtr.serialize(SweepRecord {
                        dataset: name.clone(),
                        user: user_stream.map(|(u, _)| u),
                        stream: user_stream.map(|(_, s)| s),
                        num_beams: dataset.num_beams(),
                        noise_std,
                        delay_steps: args.delay,
                        history_steps: args.history,
                        policy,
                        episode_return,
                        accuracy,
                        mean_selected_sinr,
                    })?;
                }
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
