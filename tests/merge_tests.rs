use pretty_assertions::assert_eq;
use stackprof_studio::aggregator::{
    decode, encode, merge_frame_tables, merge_profiles, Canonicalizer, EdgePolicy, FrameIdentity,
    MergeOptions,
};
use stackprof_studio::parser::{load_dump_bytes, Frame, LineWeight, Mode, Profile, RawStack};
use stackprof_studio::utils::MergeError;
use std::collections::HashSet;

fn foo_dump(count: u64) -> Profile {
    let json = format!(
        r#"{{"version": 1.0, "mode": "wall", "interval": 1000, "samples": {count},
            "frames": {{"1": {{"name": "foo", "file": "a.rb", "line": 1, "samples": 5, "total_samples": 5}}}},
            "raw": [1, 1, {count}]}}"#
    );
    load_dump_bytes(json.as_bytes()).unwrap()
}

/// Two workers that assigned the same ids to different methods
fn worker(first: &str, second: &str, counts: (u64, u64)) -> Profile {
    let mut profile = Profile::new(1.2, Mode::Cpu, 1000);
    profile.samples = counts.0 + counts.1;
    profile.gc_samples = 1;
    profile.missed_samples = 2;
    profile.frames.insert(
        Frame::new(100, "main", "app.rb", Some(1))
            .with_samples(0, counts.0 + counts.1)
            .with_edge(101, counts.0)
            .with_edge(102, counts.1),
    );
    profile.frames.insert(
        Frame::new(101, first, "lib.rb", Some(10))
            .with_samples(counts.0, counts.0)
            .with_line(11, LineWeight::Pair(counts.0, counts.0)),
    );
    profile.frames.insert(
        Frame::new(102, second, "lib.rb", Some(20))
            .with_samples(counts.1, counts.1)
            .with_line(21, LineWeight::Pair(counts.1, counts.1)),
    );
    profile.raw = Some(vec![
        RawStack::new(vec![100, 101], counts.0),
        RawStack::new(vec![100, 102], counts.1),
    ]);
    profile.raw_timestamp_deltas = Some(vec![1; (counts.0 + counts.1) as usize]);
    profile
}

#[test]
fn test_two_dump_scenario() {
    let merged = merge_profiles(&[foo_dump(10), foo_dump(20)], &MergeOptions::new()).unwrap();

    assert_eq!(merged.frames.len(), 1);
    let foo = merged.frames.iter().next().unwrap();
    assert_eq!((foo.name.as_str(), foo.self_samples, foo.total_samples), ("foo", 10, 10));
    assert_eq!(merged.raw, Some(vec![RawStack::new(vec![foo.id], 30)]));
    assert_eq!(merged.samples, 30);
}

#[test]
fn test_corpus_dedup_scenario() {
    let mut left = foo_dump(1);
    left.frames.insert(Frame::new(2, "bar", "a.rb", Some(2)));
    left.raw = Some(decode(&[2, 1, 2, 5]).unwrap());
    let mut right = left.clone();
    right.raw = Some(decode(&[2, 1, 2, 3]).unwrap());

    let merged = merge_profiles(&[left, right], &MergeOptions::new()).unwrap();
    assert_eq!(encode(merged.raw.as_deref().unwrap()), vec![2, 1, 2, 8]);
}

#[test]
fn test_colliding_ids_are_separated() {
    let a = worker("Foo#bar", "Foo#baz", (3, 4));
    let b = worker("Qux#one", "Qux#two", (5, 6));
    let merged = merge_profiles(&[a, b], &MergeOptions::new()).unwrap();

    // main is shared, the other four identities stay distinct
    assert_eq!(merged.frames.len(), 5);
    let ids: HashSet<u64> = merged.frames.iter().map(|f| f.id).collect();
    assert_eq!(ids.len(), 5);

    let identities: HashSet<FrameIdentity> = merged.frames.iter().map(FrameIdentity::of).collect();
    assert_eq!(identities.len(), 5);

    // every raw stack resolves to the frame it named in its own dump
    let names: Vec<Vec<&str>> = merged
        .raw
        .as_ref()
        .unwrap()
        .iter()
        .map(|s| s.frames.iter().map(|&id| merged.frames.get(id).unwrap().name.as_str()).collect())
        .collect();
    assert_eq!(
        names,
        vec![
            vec!["main", "Foo#bar"],
            vec!["main", "Foo#baz"],
            vec!["main", "Qux#one"],
            vec!["main", "Qux#two"],
        ]
    );
}

#[test]
fn test_weight_conservation() {
    let inputs = vec![
        worker("a", "b", (3, 4)),
        worker("a", "c", (5, 6)),
        worker("d", "b", (7, 1)),
    ];
    let merged = merge_profiles(&inputs, &MergeOptions::new()).unwrap();

    let input_weight: u64 = inputs.iter().map(Profile::raw_weight).sum();
    assert_eq!(merged.raw_weight(), input_weight);
    assert_eq!(merged.samples, inputs.iter().map(|p| p.samples).sum::<u64>());
    assert_eq!(merged.gc_samples, 3);
    assert_eq!(merged.missed_samples, 6);
    assert_eq!(
        merged.raw_timestamp_deltas.as_ref().map(Vec::len),
        Some(input_weight as usize)
    );

    let input_self: u64 = inputs.iter().flat_map(|p| p.frames.iter()).map(|f| f.self_samples).sum();
    let merged_self: u64 = merged.frames.iter().map(|f| f.self_samples).sum();
    assert_eq!(merged_self, input_self);
}

#[test]
fn test_rename_policy_sums_edges_and_lines() {
    let a = worker("shared", "left", (3, 4));
    let b = worker("shared", "right", (5, 6));
    let options = MergeOptions::new().with_edge_policy(EdgePolicy::Rename);
    let merged = merge_profiles(&[a, b], &options).unwrap();

    let main = merged.frames.iter().find(|f| f.name == "main").unwrap();
    let edges = main.edges.as_ref().unwrap();
    let edge_names: Vec<(&str, u64)> = edges
        .iter()
        .map(|(&id, &w)| (merged.frames.get(id).unwrap().name.as_str(), w))
        .collect();
    assert!(edge_names.contains(&("shared", 8)));
    assert!(edge_names.contains(&("left", 4)));
    assert!(edge_names.contains(&("right", 6)));

    let shared = merged.frames.iter().find(|f| f.name == "shared").unwrap();
    assert_eq!(shared.lines.as_ref().unwrap()[&11], LineWeight::Pair(8, 8));
}

#[test]
fn test_canonicalizer_idempotence() {
    let profile = worker("a", "b", (3, 4));
    let mut canonicalizer = Canonicalizer::new(EdgePolicy::Preserve);
    canonicalizer.absorb(&profile.frames);
    let renames = canonicalizer.absorb(&profile.frames);
    let table = canonicalizer.finish();

    assert!(renames.is_empty());
    assert_eq!(table.len(), profile.frames.len());
    for (merged, original) in table.iter().zip(profile.frames.iter()) {
        assert_eq!(FrameIdentity::of(merged), FrameIdentity::of(original));
        assert_eq!(merged.self_samples, original.self_samples * 2);
        assert_eq!(merged.total_samples, original.total_samples * 2);
    }
}

#[test]
fn test_raw_optional_per_input() {
    let with_raw = foo_dump(10);
    let mut without_raw = foo_dump(20);
    without_raw.raw = None;

    let merged = merge_profiles(&[without_raw.clone(), with_raw], &MergeOptions::new()).unwrap();
    assert_eq!(merged.raw_weight(), 10);

    let merged = merge_profiles(&[without_raw.clone(), without_raw], &MergeOptions::new()).unwrap();
    assert!(merged.raw.is_none());
}

#[test]
fn test_incompatible_profiles() {
    let wall = foo_dump(1);
    let mut cpu = foo_dump(1);
    cpu.mode = Mode::Cpu;
    assert!(matches!(
        merge_profiles(&[wall.clone(), cpu], &MergeOptions::new()),
        Err(MergeError::IncompatibleProfiles(_))
    ));

    let mut newer = foo_dump(1);
    newer.version = 1.2;
    assert!(matches!(
        merge_profiles(&[wall, newer], &MergeOptions::new()),
        Err(MergeError::IncompatibleProfiles(_))
    ));

    assert!(matches!(
        merge_profiles(&[], &MergeOptions::new()),
        Err(MergeError::NoProfiles)
    ));
}

#[test]
fn test_merge_frame_tables_drops_raw() {
    let merged = merge_frame_tables(&foo_dump(10), &foo_dump(20)).unwrap();

    assert!(merged.raw.is_none());
    assert_eq!(merged.frames.len(), 1);
    assert_eq!(merged.frames.iter().next().unwrap().self_samples, 10);
}

#[test]
fn test_no_dedup_keeps_records() {
    let options = MergeOptions::new().with_dedup(false);
    let merged = merge_profiles(&[foo_dump(10), foo_dump(20)], &options).unwrap();
    assert_eq!(merged.raw.as_ref().map(Vec::len), Some(2));
}
