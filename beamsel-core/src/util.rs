//! Utilities for interaction of policies and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;

/// Run episodes with a policy and a recorder.
///
/// Every step, including the terminal one, is written to `recorder` with its
/// `reward`, `episode` and `step` index merged into the record emitted by the
/// environment. Returns the undiscounted return of each episode.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<f32>>
where
    E: Env,
    P: Policy<E>,
    R: Recorder,
{
    let mut rs = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        let (mut prev_obs, _) = env.reset(None)?;
        let mut count_step = 0;
        let mut r_total = 0.0;

        loop {
            let act = policy.sample(&prev_obs);
            let (step, mut record) = env.step(&act)?;
            r_total += step.reward;

            record.insert("reward", RecordValue::Scalar(step.reward));
            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);
            count_step += 1;

            let done = step.is_done();
            match step.obs {
                Some(obs) if !done => prev_obs = obs,
                _ => break,
            }
        }
        log::debug!("Episode {}: {} steps, return = {}", episode, count_step, r_total);
        rs.push(r_total);
    }

    Ok(rs)
}
