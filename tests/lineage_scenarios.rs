use lineage_engine::lineage::sink::Tee;
use lineage_engine::{
    DirectedLineageGraph, FileSink, GraphSettings, LineageBuilder, LineageError, LineageManifest,
    OutputSettings, PathCollector,
};
use std::fs;
use tempfile::TempDir;

fn s(value: &str) -> String {
    value.to_string()
}

/// A -> [m1, m2, m3], then B takes over m1 and m2.
fn build_scenario_graph() -> DirectedLineageGraph<String> {
    let mut graph = DirectedLineageGraph::new();
    for child in ["m1", "m2", "m3"] {
        graph.add_edge(s("A"), s(child)).unwrap();
    }
    graph.add_edge(s("B"), s("m1")).unwrap();
    graph.add_edge(s("B"), s("m2")).unwrap();

    let intervention = graph.intervene(s("B"), &[s("m1"), s("m2")]).unwrap();
    assert_eq!(intervention.ancestor, "A");
    graph
}

#[test]
fn test_end_to_end_rewiring_and_paths() {
    let graph = build_scenario_graph();

    assert_eq!(graph.children(&s("A")).unwrap(), &[s("m3"), s("B")]);
    assert_eq!(graph.children(&s("B")).unwrap(), &[s("m1"), s("m2")]);
    graph.verify().unwrap();

    let mut collector = PathCollector::new();
    let paths = graph.enumerate_paths(&s("A"), &mut collector).unwrap();

    assert_eq!(
        paths,
        vec![
            vec![s("A"), s("m3")],
            vec![s("A"), s("B"), s("m1")],
            vec![s("A"), s("B"), s("m2")],
        ]
    );
}

#[test]
fn test_file_output_matches_dfs_order() {
    let graph = build_scenario_graph();
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("lineage_paths.txt");

    {
        let mut sink = Tee::new(PathCollector::new(), FileSink::open(&log_path).unwrap());
        graph.enumerate_paths(&s("A"), &mut sink).unwrap();
    }

    let content = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["A→m3", "A→B→m1", "A→B→m2"]);
}

#[test]
fn test_configured_sink_appends_across_runs() {
    let graph = build_scenario_graph();
    let temp_dir = TempDir::new().unwrap();
    let settings = OutputSettings {
        path_log: Some(temp_dir.path().join("paths.log")),
        echo_to_console: false,
        ..OutputSettings::default()
    };

    for _ in 0..2 {
        let mut sink = settings.open_sink::<String>().unwrap();
        graph.enumerate_paths(&s("B"), &mut sink).unwrap();
    }

    let content = fs::read_to_string(temp_dir.path().join("paths.log")).unwrap();
    assert_eq!(content, "B→m1\nB→m2\nB→m1\nB→m2\n");
}

#[test]
fn test_single_parent_holds_after_observations() {
    let manifest: LineageManifest = serde_yaml::from_str(
        r#"
seed:
  - parent: root
    children: [a, b, c, d, e]
observations:
  - parent: X
    children: [a, b, c]
  - parent: Y
    children: [a, b]
  - parent: Z
    children: [d, e]
"#,
    )
    .unwrap();

    let (graph, summary) =
        LineageBuilder::<String>::from_manifest(manifest, &GraphSettings::default()).unwrap();

    assert_eq!(summary.interventions.len(), 3);
    assert!(summary.unmatched.is_empty());
    graph.verify().unwrap();

    for node in graph.nodes() {
        let owners = graph
            .iter()
            .filter(|(_, children)| children.contains(node))
            .count();
        assert!(owners <= 1, "{} has {} parents", node, owners);
    }
    for (parent, children) in graph.iter() {
        for child in children {
            assert!(!graph.reaches(child, parent), "{} reaches its parent {}", child, parent);
        }
    }

    let paths = graph
        .enumerate_paths(&s("root"), &mut PathCollector::new())
        .unwrap();
    let rendered: Vec<String> = paths.iter().map(|p| p.join("→")).collect();
    assert_eq!(
        rendered,
        vec![
            "root→X→c",
            "root→X→Y→a",
            "root→X→Y→b",
            "root→Z→d",
            "root→Z→e",
        ]
    );
}

#[test]
fn test_errors_are_typed() {
    let mut graph = build_scenario_graph();

    assert!(matches!(
        graph.add_edge(s("m1"), s("A")),
        Err(LineageError::Cycle { .. })
    ));
    assert!(matches!(
        graph.remove_edge(&s("A"), &s("m1")),
        Err(LineageError::EdgeNotFound { .. })
    ));
    assert!(matches!(
        graph.enumerate_paths(&s("ghost"), &mut PathCollector::new()),
        Err(LineageError::NodeNotFound(_))
    ));
}
