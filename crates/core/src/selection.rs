//! Weighted-random prize selection.
//!
//! One uniform sample in `[0, 1)` is compared against the running sum of the
//! table's probabilities, in table order. The first prize whose cumulative
//! probability reaches the sample wins. When the walk runs off the end (the
//! probabilities sum to less than the sample, or rounding at the tail) the
//! last prize wins.

use rand::Rng;

use crate::prize::PrizeDefinition;

/// Boxed sample source handed to long-lived owners such as the orchestrator.
pub type Sampler = Box<dyn FnMut() -> f64 + Send>;

/// Pick a prize using one sample from `rng`.
///
/// Returns `None` only for an empty slice.
pub fn select_prize<F>(prizes: &[PrizeDefinition], mut rng: F) -> Option<&PrizeDefinition>
where
    F: FnMut() -> f64,
{
    let sample = rng();
    let mut cumulative = 0.0;

    for prize in prizes {
        cumulative += prize.probability;
        if sample <= cumulative {
            return Some(prize);
        }
    }

    prizes.last()
}

/// Sampler backed by the thread-local RNG.
pub fn thread_rng_sampler() -> Sampler {
    Box::new(|| rand::rng().random::<f64>())
}

/// Sampler that replays `samples` in order, then repeats the last one.
///
/// Intended for deterministic tests and simulations.
pub fn scripted_sampler(samples: Vec<f64>) -> Sampler {
    let mut iter = samples.into_iter();
    let mut last = 0.0;
    Box::new(move || {
        if let Some(next) = iter.next() {
            last = next;
        }
        last
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(probabilities: &[f64]) -> Vec<PrizeDefinition> {
        probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| PrizeDefinition::new(format!("p{i}"), format!("Prize {i}"), i as u32, *p))
            .collect()
    }

    #[test]
    fn walks_cumulative_probabilities_in_order() {
        let prizes = table(&[0.1, 0.2, 0.7]);
        let mut sampler = scripted_sampler(vec![0.05, 0.15, 0.95]);

        let picks: Vec<_> = (0..3)
            .map(|_| select_prize(&prizes, &mut sampler).unwrap().id.clone())
            .collect();

        assert_eq!(picks, ["p0", "p1", "p2"]);
    }

    #[test]
    fn sample_equal_to_cumulative_boundary_selects_that_entry() {
        let prizes = table(&[0.25, 0.75]);
        assert_eq!(select_prize(&prizes, || 0.25).unwrap().id, "p0");
    }

    #[test]
    fn residual_mass_falls_to_last_entry() {
        let prizes = table(&[0.2, 0.2, 0.1]);
        assert_eq!(select_prize(&prizes, || 0.9).unwrap().id, "p2");
    }

    #[test]
    fn zero_probability_entries_are_skipped() {
        let prizes = table(&[0.0, 1.0]);
        assert_eq!(select_prize(&prizes, || 0.0).unwrap().id, "p0");
        assert_eq!(select_prize(&prizes, || 0.01).unwrap().id, "p1");
    }

    #[test]
    fn empty_table_selects_nothing() {
        assert!(select_prize(&[], || 0.5).is_none());
    }

    #[test]
    fn scripted_sampler_repeats_last_sample() {
        let mut sampler = scripted_sampler(vec![0.3]);
        assert_eq!(sampler(), 0.3);
        assert_eq!(sampler(), 0.3);
    }

    #[test]
    fn thread_rng_sampler_stays_in_unit_interval() {
        let mut sampler = thread_rng_sampler();
        for _ in 0..1_000 {
            let s = sampler();
            assert!((0.0..1.0).contains(&s));
        }
    }

    /// Seeded draw frequencies track the declared odds.
    #[test]
    fn frequencies_follow_probabilities() {
        let prizes = table(&[0.1, 0.2, 0.7]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 3];
        let draws = 20_000;

        for _ in 0..draws {
            let pick = select_prize(&prizes, || rng.random::<f64>()).unwrap();
            counts[pick.value as usize] += 1;
        }

        for (count, expected) in counts.iter().zip([0.1, 0.2, 0.7]) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "observed {observed} expected {expected}"
            );
        }
    }
}
