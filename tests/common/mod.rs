//! Shared model fixtures for the integration tests.

#![allow(dead_code)]

use rankwise::{
    Configuration, Cwt, Network, ProbabilitySemiring, Rank, RankSemiring, Rational,
    RationalProbabilitySemiring, Spn, SpnBuilder, PROBABILITY, RANK, RATIONAL_PROBABILITY,
};

pub fn cfg<const N: usize>(pairs: [(&str, bool); N]) -> Configuration {
    Configuration::from(pairs)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn alarm_table() -> Cwt<ProbabilitySemiring> {
    Cwt::new(PROBABILITY, "a", ["b", "e"])
        .with_entry(cfg([("b", true), ("e", true)]), 0.95, 0.05)
        .and_then(|t| t.with_entry(cfg([("b", true), ("e", false)]), 0.94, 0.06))
        .and_then(|t| t.with_entry(cfg([("b", false), ("e", true)]), 0.29, 0.71))
        .and_then(|t| t.with_entry(cfg([("b", false), ("e", false)]), 0.001, 0.999))
        .expect("alarm table entries are over its parents")
}

/// Burglary (b), earthquake (e), alarm (a), John calls (j), Mary calls (m).
pub fn burglary() -> Network<ProbabilitySemiring> {
    let b = Cwt::root(PROBABILITY, "b")
        .with_entry(Configuration::new(), 0.001, 0.999)
        .expect("root entry");
    let e = Cwt::root(PROBABILITY, "e")
        .with_entry(Configuration::new(), 0.002, 0.998)
        .expect("root entry");
    let j = Cwt::new(PROBABILITY, "j", ["a"])
        .with_entry(cfg([("a", true)]), 0.9, 0.1)
        .and_then(|t| t.with_entry(cfg([("a", false)]), 0.05, 0.95))
        .expect("j entries");
    let m = Cwt::new(PROBABILITY, "m", ["a"])
        .with_entry(cfg([("a", true)]), 0.7, 0.3)
        .and_then(|t| t.with_entry(cfg([("a", false)]), 0.01, 0.99))
        .expect("m entries");
    Network::new(PROBABILITY, vec![b, e, alarm_table(), j, m]).expect("burglary network is a DAG")
}

fn ratio(num: i128, den: i128) -> Rational {
    Rational::new(num, den).expect("non-zero denominator")
}

/// The b, e, a part of the burglary network with exact weights.
pub fn burglary_exact() -> Network<RationalProbabilitySemiring> {
    let q = RATIONAL_PROBABILITY;
    let b = Cwt::root(q, "b")
        .with_entry(Configuration::new(), ratio(1, 1000), ratio(999, 1000))
        .expect("root entry");
    let e = Cwt::root(q, "e")
        .with_entry(Configuration::new(), ratio(2, 1000), ratio(998, 1000))
        .expect("root entry");
    let a = Cwt::new(q, "a", ["b", "e"])
        .with_entry(cfg([("b", true), ("e", true)]), ratio(95, 100), ratio(5, 100))
        .and_then(|t| t.with_entry(cfg([("b", true), ("e", false)]), ratio(94, 100), ratio(6, 100)))
        .and_then(|t| t.with_entry(cfg([("b", false), ("e", true)]), ratio(29, 100), ratio(71, 100)))
        .and_then(|t| {
            t.with_entry(cfg([("b", false), ("e", false)]), ratio(1, 1000), ratio(999, 1000))
        })
        .expect("alarm entries");
    Network::new(q, vec![b, e, a]).expect("exact burglary network is a DAG")
}

fn ranks(t: i64, f: i64) -> (Rank, Rank) {
    (Rank::new(t), Rank::new(f))
}

/// Car diagnosis ranking network: headlights (h), fuel (f), battery (b),
/// starts (s).
pub fn car_diagnosis() -> Network<RankSemiring> {
    let entry = |t: Cwt<RankSemiring>, parents: Configuration, (kt, kf): (Rank, Rank)| {
        t.with_entry(parents, kt, kf)
    };
    let h = entry(Cwt::root(RANK, "h"), Configuration::new(), ranks(15, 0)).expect("h");
    let f = entry(Cwt::root(RANK, "f"), Configuration::new(), ranks(0, 10)).expect("f");
    let b = entry(Cwt::new(RANK, "b", ["h"]), cfg([("h", true)]), ranks(4, 0))
        .and_then(|t| entry(t, cfg([("h", false)]), ranks(0, 8)))
        .expect("b");
    let s = entry(Cwt::new(RANK, "s", ["b", "f"]), cfg([("b", true), ("f", true)]), ranks(0, 3))
        .and_then(|t| entry(t, cfg([("b", true), ("f", false)]), ranks(13, 0)))
        .and_then(|t| entry(t, cfg([("b", false), ("f", true)]), ranks(11, 0)))
        .and_then(|t| entry(t, cfg([("b", false), ("f", false)]), ranks(27, 0)))
        .expect("s");
    Network::new(RANK, vec![h, f, b, s]).expect("car network is a DAG")
}

/// Two variables, two levels of sums, shared indicator leaves.
pub fn spn_example_1() -> Spn<ProbabilitySemiring> {
    let mut sb = SpnBuilder::new(PROBABILITY);
    let x1t = sb.indicator("x1", true);
    let x1f = sb.indicator("x1", false);
    let x2t = sb.indicator("x2", true);
    let x2f = sb.indicator("x2", false);

    let build = |sb: &mut SpnBuilder<ProbabilitySemiring>| -> rankwise::InferenceResult<_> {
        let a3 = sb.sum_of([(x1t, 0.6), (x1f, 0.4)])?;
        let b3 = sb.sum_of([(x1t, 0.9), (x1f, 0.1)])?;
        let c3 = sb.sum_of([(x2t, 0.3), (x2f, 0.7)])?;
        let d3 = sb.sum_of([(x2t, 0.2), (x2f, 0.8)])?;
        let a2 = sb.product_of([a3, c3])?;
        let b2 = sb.product_of([b3, d3])?;
        sb.sum_of([(a2, 0.7), (b2, 0.3)])
    };
    let root = build(&mut sb).expect("example 1 wiring");
    sb.build(root).expect("root belongs to the builder")
}

/// Three variables; x1 selects between two product branches.
pub fn spn_example_2() -> Spn<ProbabilitySemiring> {
    let mut sb = SpnBuilder::new(PROBABILITY);
    let x1t = sb.indicator("x1", true);
    let x1f = sb.indicator("x1", false);
    let x2t = sb.indicator("x2", true);
    let x2f = sb.indicator("x2", false);
    let x3t = sb.indicator("x3", true);
    let x3f = sb.indicator("x3", false);

    let build = |sb: &mut SpnBuilder<ProbabilitySemiring>| -> rankwise::InferenceResult<_> {
        let b3 = sb.sum_of([(x2t, 0.3), (x2f, 0.7)])?;
        let c3 = sb.sum_of([(x2t, 0.5), (x2f, 0.5)])?;
        let d3 = sb.sum_of([(x3t, 0.6), (x3f, 0.4)])?;
        let e3 = sb.sum_of([(x3t, 0.9), (x3f, 0.1)])?;
        let a2 = sb.product_of([x1t, b3, d3])?;
        let b2 = sb.product_of([c3, e3, x1f])?;
        sb.sum_of([(a2, 0.8), (b2, 0.2)])
    };
    let root = build(&mut sb).expect("example 2 wiring");
    sb.build(root).expect("root belongs to the builder")
}
