use sccpath_core::{GraphDocument, find_sccs, kahn_sort};
use sccpath_datasets::{DatasetError, standard_catalog, write_catalog};

#[test]
fn write_catalog_creates_nine_parseable_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");

    let written = write_catalog(&out, 42).unwrap();
    assert_eq!(written.len(), 9);

    for entry in &written {
        let text = std::fs::read_to_string(&entry.path).unwrap();
        let doc = GraphDocument::from_json(&text).unwrap();
        assert_eq!(doc.n, entry.vertices);
        assert_eq!(doc.edges.len(), entry.edges);
        assert_eq!(doc.source_vertex(), 0);
        assert!(text.contains("\"weight_model\": \"edge\""));
    }
}

#[test]
fn same_seed_writes_identical_files() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_catalog(a.path(), 9).unwrap();
    write_catalog(b.path(), 9).unwrap();

    for spec in standard_catalog() {
        let file = format!("{}.json", spec.name);
        let left = std::fs::read_to_string(a.path().join(&file)).unwrap();
        let right = std::fs::read_to_string(b.path().join(&file)).unwrap();
        assert_eq!(left, right, "{file}");
    }
}

#[test]
fn dag_entries_sort_and_scc_entries_collapse() {
    for spec in standard_catalog() {
        let graph = spec.generate(42).unwrap().to_graph().unwrap();
        if spec.name.contains("_dag_") {
            assert!(kahn_sort(&graph).is_acyclic(), "{}", spec.name);
        }
        if spec.name == "large_scc_1" {
            assert_eq!(find_sccs(&graph).partition.scc_count(), 5);
        }
    }
}

#[test]
fn unwritable_directory_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let err = write_catalog(&blocker, 1).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
    assert!(err.to_string().contains("not-a-dir"));
}
