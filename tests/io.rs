use anyhow::Result;
use ironrank::io::glob::{expand_glob, read_partition};
use ironrank::io::text::{read_scored, read_scored_text_partitioned, write_scored};
use ironrank::testing::*;
use ironrank::*;
use std::fs;
use std::io::Cursor;

#[test]
fn text_file_round_trip_through_runner() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("counts.txt");
    fs::write(&input, "a\t5\nb\t3\n\nc\t8\nd\t1\ne 8\n")?;

    let records = read_scored_text(&input)?;
    assert_eq!(records, single_partition_example());

    let outcome = Runner::new(RankConfig::new(3).sequential())?.run(vec![records])?;
    let out = tmp.path().join("out/top.txt");
    assert_eq!(write_scored_text(&out, &outcome.ranked)?, 3);
    assert_eq!(fs::read_to_string(&out)?, "c\t8\ne\t8\na\t5\n");
    Ok(())
}

#[test]
fn bad_line_reports_source_and_line() {
    let err = read_scored(Cursor::new("a\t1\nb\tlots\n"), "mem").unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("line 2 in mem"), "{msg}");
    assert!(matches!(
        err.downcast_ref::<RankError>(),
        Some(RankError::InvalidScore { .. })
    ));
}

#[test]
fn text_partitions_by_line_count() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("words.txt");
    let mut buf = Vec::new();
    write_scored(&mut buf, &word_count_records())?;
    fs::write(&input, buf)?;

    let parts = read_scored_text_partitioned(&input, 3)?;
    let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 2]);
    Ok(())
}

#[test]
fn glob_partitions_mix_text_and_jsonl() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path();
    let [p1, p2] = split_item_partitions()
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected two partitions"))?;

    let mut text = Vec::new();
    write_scored(&mut text, &p1)?;
    fs::write(dir.join("part-00000"), text)?;
    write_jsonl_vec(dir.join("part-00001.jsonl"), &p2)?;
    fs::create_dir(dir.join("part-dir"))?;

    let pattern = format!("{}/part-*", dir.display());
    assert_eq!(expand_glob(&pattern)?.len(), 2);

    let parts = read_partitions(&pattern)?;
    assert_eq!(parts, vec![p1, p2]);

    let outcome = Runner::new(RankConfig::new(3).sequential())?.run(parts)?;
    assert_ranked_equal(
        &outcome.ranked,
        &[("a".into(), 10), ("d".into(), 10), ("b".into(), 9)],
    );
    Ok(())
}

#[test]
fn no_matching_partitions_is_an_error() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let pattern = format!("{}/part-*", tmp.path().display());
    assert!(expand_glob(&pattern)?.is_empty());
    assert!(read_partitions(&pattern).is_err());
    Ok(())
}

#[test]
fn spilled_candidates_merge_like_live_ones() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let spill = tmp.path().join("spill/cands.jsonl");

    let (tx, rx) = funnel();
    aggregate_partition(0, 3, single_partition_example(), &tx)?;
    drop(tx);
    let live: Vec<Candidate<String>> = rx.into_iter().collect();
    write_jsonl_vec(&spill, &live)?;

    let back = read_candidates_jsonl::<String>(&spill)?;
    assert_eq!(back, live);
    let (ranked, _) = merge_candidates(3, TieBreak::default(), back)?;
    assert_ranked_equal(
        &ranked,
        &[("c".into(), 8), ("e".into(), 8), ("a".into(), 5)],
    );
    Ok(())
}

#[test]
fn jsonl_partition_with_negative_score_fails_in_stage() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let file = tmp.path().join("part-0.jsonl");
    fs::write(&file, "{\"item\":\"a\",\"score\":2}\n{\"item\":\"b\",\"score\":-4}\n")?;

    let part = read_partition(&file)?;
    assert_eq!(read_scored_jsonl::<String>(&file)?, part);
    let err = Runner::new(RankConfig::new(2).sequential())?
        .run(vec![part])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RankError>(),
        Some(RankError::InvalidScore { .. })
    ));
    Ok(())
}

#[test]
fn config_loads_from_file() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rank.json");
    fs::write(
        &path,
        r#"{ "k": 4, "mode": { "type": "parallel", "partitions": 3 } }"#,
    )?;
    let cfg = RankConfig::from_json_file(&path)?;
    assert_eq!(
        cfg.mode,
        ExecMode::Parallel {
            threads: None,
            partitions: Some(3)
        }
    );
    assert_eq!(cfg.tie_break, TieBreak::InsertionOrder);

    fs::write(&path, r#"{ "k": 0 }"#)?;
    let err = RankConfig::from_json_file(&path).unwrap_err();
    assert_eq!(err.downcast_ref::<RankError>(), Some(&RankError::Capacity(0)));
    Ok(())
}

#[test]
fn metrics_saved_as_json() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let outcome = Runner::new(RankConfig::new(3).sequential())?.run(split_item_partitions())?;
    let path = tmp.path().join("metrics.json");
    outcome.metrics.save_to_file(&path)?;

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(v["k"], 3);
    assert_eq!(v["merge"]["emitted"], 3);
    Ok(())
}
