use ironrank::testing::*;
use ironrank::{
    Candidate, GlobalMerger, LocalAggregator, RankError, RankResult, TieBreak, aggregate_partition,
    funnel, merge_candidates,
};

#[test]
fn local_stage_worked_example() -> RankResult<()> {
    let mut agg = LocalAggregator::new(0, 3)?;
    agg.consume(single_partition_example())?;
    assert_eq!(agg.retained().distinct_scores(), 3);

    let (cands, stats) = agg.finish();
    let got: Vec<(String, i64)> = cands
        .into_iter()
        .map(|c| c.into_scored().into_parts())
        .collect();
    assert_eq!(
        got,
        vec![
            ("c".to_string(), 8),
            ("e".to_string(), 8),
            ("a".to_string(), 5),
            ("b".to_string(), 3),
        ]
    );
    assert_eq!(stats.evicted_groups, 1);
    Ok(())
}

#[test]
fn merger_emits_exactly_k_items_from_example() -> RankResult<()> {
    let (tx, rx) = funnel();
    aggregate_partition(0, 3, single_partition_example(), &tx)?;
    drop(tx);

    let mut merger = GlobalMerger::new(3, TieBreak::InsertionOrder)?;
    merger.consume_funnel(rx)?;
    let (ranked, stats) = merger.finish();

    assert_ranked_equal(
        &ranked,
        &[("c".into(), 8), ("e".into(), 8), ("a".into(), 5)],
    );
    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.retained_items, 4);
    assert_eq!(stats.emitted, 3);
    Ok(())
}

#[test]
fn truncation_length_is_min_of_k_and_held_items() -> RankResult<()> {
    for k in 1..=12 {
        for seed in 0..5u64 {
            let cands: Vec<Candidate<String>> = seeded_records(seed, 40, 6)
                .into_iter()
                .map(Candidate::from)
                .collect();
            let mut merger = GlobalMerger::new(k, TieBreak::InsertionOrder)?;
            merger.consume(cands)?;
            let held = merger.retained().item_count();
            let (ranked, _) = merger.finish();

            assert!(ranked.len() <= k);
            assert_eq!(ranked.len(), k.min(held));
            assert_descending(&ranked);
        }
    }
    Ok(())
}

#[test]
fn arrival_order_does_not_change_output_scores() -> RankResult<()> {
    let cands: Vec<Candidate<String>> = seeded_records(11, 200, 30)
        .into_iter()
        .map(Candidate::from)
        .collect();
    let mut reversed = cands.clone();
    reversed.reverse();

    let (fwd, _) = merge_candidates(5, TieBreak::InsertionOrder, cands.clone())?;
    let (rev, _) = merge_candidates(5, TieBreak::InsertionOrder, reversed.clone())?;
    let scores = |v: &[ironrank::ScoredItem<String>]| v.iter().map(|s| s.score()).collect::<Vec<_>>();
    assert_eq!(scores(&fwd), scores(&rev));

    // Lexicographic tie-break makes the items agree too.
    let (fwd, _) = merge_candidates(5, TieBreak::Lexicographic, cands)?;
    let (rev, _) = merge_candidates(5, TieBreak::Lexicographic, reversed)?;
    assert_eq!(fwd, rev);
    Ok(())
}

#[test]
fn boundary_group_is_cut_in_arrival_order() -> RankResult<()> {
    let cands = vec![
        Candidate::new("top", 10),
        Candidate::new("m2", 4),
        Candidate::new("m1", 4),
        Candidate::new("m3", 4),
    ];
    let (ranked, _) = merge_candidates(3, TieBreak::InsertionOrder, cands.clone())?;
    assert_ranked_equal(&ranked, &[("top", 10), ("m2", 4), ("m1", 4)]);

    let (ranked, _) = merge_candidates(3, TieBreak::Lexicographic, cands)?;
    assert_ranked_equal(&ranked, &[("top", 10), ("m1", 4), ("m2", 4)]);
    Ok(())
}

#[test]
fn duplicate_identifiers_are_not_reaggregated() -> RankResult<()> {
    let cands = vec![
        Candidate::new("x", 6),
        Candidate::new("y", 9),
        Candidate::new("x", 4),
    ];
    let (ranked, _) = merge_candidates(3, TieBreak::InsertionOrder, cands)?;
    assert_ranked_equal(&ranked, &[("y", 9), ("x", 6), ("x", 4)]);
    Ok(())
}

#[test]
fn merger_rejects_negative_candidate_and_zero_k() {
    assert!(matches!(
        GlobalMerger::<&str>::new(0, TieBreak::default()),
        Err(RankError::Capacity(0))
    ));
    let res = merge_candidates(2, TieBreak::default(), vec![Candidate::new("bad", -1)]);
    assert!(matches!(res, Err(RankError::InvalidScore { .. })));
}

#[test]
fn empty_candidate_stream_is_not_an_error() -> RankResult<()> {
    let (tx, rx) = funnel::<String>();
    drop(tx);
    let mut merger = GlobalMerger::new(4, TieBreak::default())?;
    merger.consume_funnel(rx)?;
    let (ranked, stats) = merger.finish();
    assert!(ranked.is_empty());
    assert_eq!(stats.candidates, 0);
    Ok(())
}
