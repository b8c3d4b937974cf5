mod common;

use common::{assert_close, cfg, spn_example_1, spn_example_2};
use rankwise::{
    Configuration, ProbToRankTransformer, Rank, SpnBuilder, SpnNode, WeightedModel, PROBABILITY,
};

fn total_weight(spn: &rankwise::Spn<rankwise::ProbabilitySemiring>) -> f64 {
    let vars = WeightedModel::variables(spn);
    Configuration::worlds(&vars)
        .map(|world| spn.weight(&world).expect("total configuration"))
        .sum()
}

#[test]
fn example_spns_are_normalized_over_their_worlds() {
    assert_close(total_weight(&spn_example_1()), 1.0);
    assert_close(total_weight(&spn_example_2()), 1.0);
}

#[test]
fn example_spns_are_complete_and_consistent() {
    for spn in [spn_example_1(), spn_example_2()] {
        assert!(spn.is_complete());
        assert!(spn.is_consistent());
        assert!(spn.is_normalized());
    }
}

#[test]
fn example_1_weights() {
    let spn = spn_example_1();
    assert_close(spn.weight(&cfg([("x1", false), ("x2", false)])).unwrap(), 0.22);
    assert_close(spn.weight(&cfg([("x1", false), ("x2", true)])).unwrap(), 0.09);
    assert_close(spn.weight(&cfg([("x1", true), ("x2", false)])).unwrap(), 0.51);
    assert_close(spn.weight(&cfg([("x1", true), ("x2", true)])).unwrap(), 0.18);
}

#[test]
fn example_2_weights() {
    let spn = spn_example_2();
    assert_close(
        spn.weight(&cfg([("x1", true), ("x2", false), ("x3", true)])).unwrap(),
        0.336,
    );
    assert_close(
        spn.weight(&cfg([("x1", false), ("x2", true), ("x3", false)])).unwrap(),
        0.01,
    );
    let scope = WeightedModel::variables(&spn);
    assert_eq!(scope.into_iter().collect::<Vec<_>>(), vec!["x1", "x2", "x3"]);
}

#[test]
fn example_1_rank_conversion() {
    let spn = spn_example_1();
    let ranks = spn.convert(&ProbToRankTransformer).expect("conversion");
    assert_eq!(ranks.len(), spn.len());
    assert!(ranks.is_complete());
    assert!(ranks.is_consistent());
    assert!(ranks.is_normalized());

    let expect = [
        ((false, false), 1),
        ((false, true), 2),
        ((true, false), 0),
        ((true, true), 1),
    ];
    for ((x1, x2), k) in expect {
        let w = ranks.weight(&cfg([("x1", x1), ("x2", x2)])).unwrap();
        assert_eq!(w, Rank::new(k), "x1={x1} x2={x2}");
    }
}

#[test]
fn example_2_rank_conversion_keeps_shape() {
    let spn = spn_example_2();
    let ranks = spn.convert(&ProbToRankTransformer).unwrap();
    assert_eq!(ranks.len(), 13);
    assert_eq!(
        ranks.weight(&cfg([("x1", true), ("x2", false), ("x3", true)])).unwrap(),
        Rank::new(0)
    );
    // the equal 0.5/0.5 split stays a tie
    let root_children = ranks.node(ranks.root()).unwrap().child_ids();
    let second = ranks.node(root_children[1]).unwrap().child_ids();
    let SpnNode::Sum { children } = ranks.node(second[0]).unwrap() else {
        panic!("first factor of the x1=F branch is the x2 sum");
    };
    assert!(children.iter().all(|(_, w)| *w == Rank::new(0)));
}

#[test]
fn display_renders_the_expression() {
    let text = spn_example_1().to_string();
    assert!(text.starts_with("(((I[x1=T]*0.6+I[x1=F]*0.4)*(I[x2=T]*0.3+I[x2=F]*0.7))*0.7+"));
    assert!(text.ends_with(")*0.3)"));
}

#[test]
fn incomplete_sum_is_reported() {
    let mut b = SpnBuilder::new(PROBABILITY);
    let x1 = b.indicator("x1", true);
    let x2 = b.indicator("x2", true);
    let root = b.sum_of([(x1, 0.5), (x2, 0.5)]).unwrap();
    let spn = b.build(root).unwrap();
    assert!(!spn.is_complete());
}

#[test]
fn contradictory_product_is_reported() {
    let mut b = SpnBuilder::new(PROBABILITY);
    let t = b.indicator("x1", true);
    let f = b.indicator("x1", false);
    let root = b.product_of([t, f]).unwrap();
    let spn = b.build(root).unwrap();
    assert!(!spn.is_consistent());
    assert_eq!(spn.weight(&cfg([("x1", true)])).unwrap(), 0.0);
}

#[test]
fn unnormalized_sum_still_evaluates() {
    let mut b = SpnBuilder::new(PROBABILITY);
    let t = b.indicator("x", true);
    let f = b.indicator("x", false);
    let root = b.sum_of([(t, 0.6), (f, 0.6)]).unwrap();
    let spn = b.build(root).unwrap();
    let eval = spn.evaluate(&cfg([("x", true)])).unwrap();
    assert_close(eval.value, 0.6);
    assert_eq!(eval.diagnostics.len(), 1);
    assert!(!spn.is_normalized());
}
