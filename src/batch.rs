//! Parallel solving of independent covering instances.
//!
//! A binding pass usually issues one cover per resource type; the instances
//! share nothing, so each runs on its own rayon worker with its own check.

use crate::covering::CliqueCovering;
use crate::error::Result;
use crate::filter::{CheckClique, FilterClique};
use log::info;
use rayon::prelude::*;

/// Runs [`CliqueCovering::exec`] on every solver in parallel.
///
/// `filter` is shared; `make_check` builds a fresh check per instance. Results
/// come back in input order and carry the check that observed the solution.
pub fn exec_all<V, F, C, M>(
    solvers: &mut [CliqueCovering<V>],
    filter: &F,
    make_check: M,
) -> Vec<Result<C>>
where
    V: Clone + Ord + Send,
    F: FilterClique<V> + Sync,
    C: CheckClique<V> + Send,
    M: Fn() -> C + Sync,
{
    info!("solving {} covering instances", solvers.len());
    solvers
        .par_iter_mut()
        .map(|cc| {
            let mut check = make_check();
            cc.exec(filter, &mut check)?;
            Ok(check)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covering::Algorithm;
    use crate::error::CoverError;
    use crate::filter::{NoCheck, NoFilter};
    use crate::validate::validate_cover;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn instance(rng: &mut XorShiftRng, algorithm: Algorithm) -> CliqueCovering<usize> {
        let n = rng.random_range(2..20);
        let mut cc = CliqueCovering::new(algorithm, n);
        for v in 0..n {
            cc.add_vertex(v, format!("v{v}")).unwrap();
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.random_bool(0.5) {
                    cc.add_edge(&a, &b, rng.random_range(1..=31)).unwrap();
                }
            }
        }
        cc
    }

    #[test]
    fn parallel_results_match_sequential_ones() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut solvers: Vec<CliqueCovering<usize>> = Algorithm::ALL
            .iter()
            .cycle()
            .take(20)
            .map(|&a| instance(&mut rng, a))
            .collect();
        let mut sequential = solvers.clone();

        let results = exec_all(&mut solvers, &NoFilter, || NoCheck);
        assert_eq!(results.len(), 20);
        for (cc, seq) in solvers.iter().zip(sequential.iter_mut()) {
            seq.exec(&NoFilter, &mut NoCheck).unwrap();
            validate_cover(cc.graph(), cc.cliques(), None).unwrap();
            assert_eq!(cc.cliques(), seq.cliques());
        }
        assert!(results.iter().all(Result::is_ok));
    }

    #[test]
    fn failures_stay_with_their_instance() {
        let mut rng = XorShiftRng::seed_from_u64(8);
        let mut ok = instance(&mut rng, Algorithm::Ts);
        ok.max_resources(ok.graph().vertex_count());
        let mut infeasible = CliqueCovering::new(Algorithm::Bipartite, 2);
        infeasible.add_vertex(0, "a").unwrap();
        infeasible.add_vertex(1, "b").unwrap();
        infeasible.max_resources(1);

        let mut solvers = vec![ok, infeasible];
        let results = exec_all(&mut solvers, &NoFilter, || NoCheck);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().err(),
            Some(&CoverError::ResourceBindingInfeasible { required: 2, max: 1 })
        );
    }
}
