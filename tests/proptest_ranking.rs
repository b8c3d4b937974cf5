//! Property tests for configurations, distributions and rank conversion.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rankwise::prob_to_rank::{assign_ranks, convert, is_congruent};
use rankwise::{
    Configuration, Distribution, NodeId, ProbToRankTransformer, ProbabilitySemiring, Rank, Spn,
    SpnBuilder, PROBABILITY,
};

const VARS: [&str; 4] = ["a", "b", "c", "d"];

fn arb_configuration() -> impl Strategy<Value = Configuration> {
    prop::collection::vec(any::<Option<bool>>(), VARS.len()).prop_map(|slots| {
        VARS.iter()
            .zip(slots)
            .filter_map(|(var, value)| value.map(|v| (*var, v)))
            .collect()
    })
}

/// Positive weights normalized to sum to one.
fn arb_probabilities(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..1000, n).prop_map(|raw| {
        let total: f64 = raw.iter().map(|&r| f64::from(r)).sum();
        raw.into_iter().map(|r| f64::from(r) / total).collect()
    })
}

fn arb_distribution() -> impl Strategy<Value = Distribution<ProbabilitySemiring>> {
    (1usize..=2).prop_flat_map(|n| {
        let vars: BTreeSet<String> = VARS[..n].iter().map(|v| (*v).to_string()).collect();
        arb_probabilities(1 << n).prop_map(move |ps| {
            let mut dist = Distribution::new(PROBABILITY, vars.iter().cloned());
            for (world, p) in Configuration::worlds(&vars).zip(ps) {
                dist.set(world, p).expect("world over vars");
            }
            dist
        })
    })
}

/// Distributions over 1-3 variables with probabilities in steps of 0.05, so
/// tied and impossible worlds are common.
fn arb_coarse_distribution() -> impl Strategy<Value = Distribution<ProbabilitySemiring>> {
    (1usize..=3).prop_flat_map(|n| {
        let vars: BTreeSet<String> = VARS[..n].iter().map(|v| (*v).to_string()).collect();
        let worlds = 1usize << n;
        prop::collection::vec(0..worlds, 20).prop_map(move |units| {
            let mut counts = vec![0u32; worlds];
            for u in units {
                counts[u] += 1;
            }
            let mut dist = Distribution::new(PROBABILITY, vars.iter().cloned());
            for (world, count) in Configuration::worlds(&vars).zip(counts) {
                dist.set(world, f64::from(count) / 20.0).expect("world over vars");
            }
            dist
        })
    })
}

/// One sum node over a product of indicators per world of `dist`.
fn mixture_of_worlds(dist: &Distribution<ProbabilitySemiring>) -> Spn<ProbabilitySemiring> {
    let mut sb = SpnBuilder::new(PROBABILITY);
    let mut leaves = BTreeMap::new();
    for var in dist.vars() {
        for value in [true, false] {
            leaves.insert((var.clone(), value), sb.indicator(var.clone(), value));
        }
    }
    let mut children = Vec::new();
    for (world, p) in dist.iter() {
        let factors: Vec<NodeId> = world
            .iter()
            .map(|(var, value)| leaves[&(var.clone(), value)])
            .collect();
        children.push((sb.product_of(factors).expect("fresh product"), p));
    }
    let root = sb.sum_of(children).expect("fresh sum");
    sb.build(root).expect("root from this builder")
}

proptest! {
    #[test]
    fn restrict_to_own_variables_is_identity(cfg in arb_configuration()) {
        let vars = cfg.variable_set();
        prop_assert_eq!(cfg.restrict(&vars).unwrap(), cfg.clone());
        prop_assert!(cfg.is_consistent(&cfg).unwrap());
    }

    #[test]
    fn restriction_is_consistent_with_original(cfg in arb_configuration(), keep in any::<u8>()) {
        let vars: BTreeSet<String> = cfg
            .variables()
            .enumerate()
            .filter(|(i, _)| (keep >> *i) & 1 == 1)
            .map(|(_, v)| v.clone())
            .collect();
        let restricted = cfg.restrict(&vars).unwrap();
        prop_assert_eq!(restricted.len(), vars.len());
        prop_assert!(cfg.is_consistent(&restricted).unwrap());
    }

    #[test]
    fn merged_contains_both_sides(a in arb_configuration(), b in arb_configuration()) {
        let m = a.merged(&b);
        prop_assert!(m.is_consistent(&b).unwrap());
        for (var, value) in a.iter() {
            if !b.has_variable(var) {
                prop_assert_eq!(m.value(var), Some(value));
            }
        }
    }

    #[test]
    fn marginal_weights_match_partial_lookup(dist in arb_distribution(), value in any::<bool>()) {
        let first: BTreeSet<String> = dist.vars().iter().take(1).cloned().collect();
        let marginal = dist.restrict(&first).unwrap();
        let var = first.iter().next().unwrap().clone();
        let query = Configuration::singleton(var, value);
        let direct = dist.weight(&query).unwrap();
        let via_marginal = marginal.weight(&query).unwrap();
        prop_assert!((direct - via_marginal).abs() < 1e-12);
        prop_assert!(marginal.is_normalized());
    }

    #[test]
    fn more_probable_never_ranks_worse(ps in prop::collection::vec(0.0f64..1.0, 1..12)) {
        let ranked = assign_ranks(ps.iter().copied().enumerate().collect());
        for (i, ri) in &ranked {
            for (j, rj) in &ranked {
                if ps[*i] > ps[*j] {
                    prop_assert!(ri <= rj);
                }
            }
        }
        if ps.iter().any(|&p| p > 1e-6) {
            prop_assert_eq!(ranked[0].1, Rank::new(0));
        }
    }

    #[test]
    fn converted_distribution_is_normalized(dist in arb_distribution()) {
        let ranks = convert(&dist).unwrap();
        prop_assert!(ranks.is_normalized());
        prop_assert_eq!(ranks.vars(), dist.vars());
        let (best, _) = dist
            .iter()
            .max_by(|(_, p), (_, q)| p.total_cmp(q))
            .unwrap();
        prop_assert_eq!(ranks.weight(best).unwrap(), Rank::new(0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn converted_distribution_is_congruent(dist in arb_coarse_distribution()) {
        let ranks = convert(&dist).unwrap();
        let report = is_congruent(&dist, &ranks).unwrap();
        prop_assert!(report.is_congruent(), "{:?}", report.violation());
        for (cfg, p) in dist.iter() {
            prop_assert_eq!(ranks.weight(cfg).unwrap().is_infinite(), p < 0.01);
        }
    }

    #[test]
    fn converted_mixture_of_worlds_is_congruent(dist in arb_coarse_distribution()) {
        let spn = mixture_of_worlds(&dist);
        let ranks = spn.convert(&ProbToRankTransformer).unwrap();
        let report = is_congruent(&spn, &ranks).unwrap();
        prop_assert!(report.is_congruent(), "{:?}", report.violation());
        prop_assert!(is_congruent(&dist, &ranks).unwrap().is_congruent());
    }
}
