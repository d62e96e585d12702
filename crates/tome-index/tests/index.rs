//! Integration tests for the record index.

use proptest::prelude::*;
use tome_index::{Catalog, RecordIndex, TreeNode, directory_id};
use tome_model::{Placement, Record, RecordSet, ResolveRecord};

fn sample_records() -> Vec<Record> {
    vec![
        Record::new("ch1/overview.htm", "第一章", ["Ch1"]).with_overview(true),
        Record::new("ch1/combat.htm", "Combat", ["Ch1"]),
        Record::new("ch1/combat/a.htm", "A", ["Ch1", "Combat"]),
        Record::new("ch1/combat/b.htm", "B", ["Ch1", "Combat"]),
        Record::new("ch2/x.htm", "X", ["Ch2", "Sub"]),
    ]
}

#[test]
fn outline_snapshot() {
    let index = RecordIndex::build(&sample_records());
    insta::assert_snapshot!(index.outline().trim_end(), @r"
    Ch1 (2 files) -> ch1/overview.htm
      Combat (2 files) -> ch1/combat.htm
    Ch2 (0 files)
      Sub (1 files)
    ");
}

#[test]
fn rebuild_from_json_matches() {
    let json = serde_json::to_string(&sample_records()).unwrap();
    let set = RecordSet::from_json("documents", &json, Placement::AsIs).unwrap();
    let from_json = RecordIndex::build(set.records());
    assert_eq!(from_json, RecordIndex::build(&sample_records()));
}

#[test]
fn catalog_resolves_tree_nodes_by_directory_id() {
    let documents = RecordSet::new("documents", sample_records(), Placement::AsIs);
    let catalog = Catalog::new(documents, Vec::new());
    for node in catalog.index().nodes() {
        let resolved = catalog.resolve(directory_id(node.path()).as_str()).unwrap();
        assert_eq!(resolved.path_parts, node.path());
        assert!(resolved.is_category());
    }
}

fn check_prefix_invariant(node: &TreeNode) {
    for (segment, child) in node.children() {
        assert_eq!(child.path().len(), node.path().len() + 1);
        assert_eq!(&child.path()[..node.path().len()], node.path());
        assert_eq!(child.path().last(), Some(segment));
        check_prefix_invariant(child);
    }
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    let segment = prop::sample::select(vec!["Ch1", "Ch2", "Sec", "附录", "Spells"]);
    let path = prop::collection::vec(segment, 1..4);
    let entry = (path, any::<bool>(), prop::sample::select(vec!["Sec", "spells", "Other"]));
    prop::collection::vec(entry, 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (path, overview, title))| {
                Record::new(format!("r{i}.htm"), title, path).with_overview(overview)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn build_is_deterministic(records in arb_records()) {
        prop_assert_eq!(RecordIndex::build(&records), RecordIndex::build(&records));
    }

    #[test]
    fn child_paths_extend_parent_by_one_segment(records in arb_records()) {
        let index = RecordIndex::build(&records);
        check_prefix_invariant(index.root());
        prop_assert_eq!(index.record_count(), records.len());
    }

    #[test]
    fn every_record_is_attached_at_its_path(records in arb_records()) {
        let index = RecordIndex::build(&records);
        for record in &records {
            let node = index.node(&record.path_parts).unwrap();
            prop_assert!(node.files().iter().any(|file| file.id == record.id));
        }
    }

    #[test]
    fn flagged_overview_is_always_preferred(records in arb_records()) {
        let index = RecordIndex::build(&records);
        for node in index.nodes() {
            if let Some(flagged) = node.files().iter().find(|file| file.is_overview) {
                prop_assert_eq!(node.overview().map(|o| &o.id), Some(&flagged.id));
            }
        }
    }
}
