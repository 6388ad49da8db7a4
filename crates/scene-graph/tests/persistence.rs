use scene_graph::{
    GraphError, Node, NodeGraph, NodeId, NodeKind, Orientation, Session, SessionConfig,
};

fn sample_graph() -> (NodeGraph, NodeId) {
    let mut graph = NodeGraph::new();
    let game = graph.add(NodeKind::Game).unwrap();
    let tree = graph.add_named(NodeKind::behavior_tree(), "Main").unwrap();
    let seq = graph.add(NodeKind::Sequence).unwrap();
    let key = graph.add(NodeKind::KeyDown { key_code: 49 }).unwrap();
    let finished = graph.add(NodeKind::SceneFinished).unwrap();
    graph
        .add(NodeKind::PlatformOsx {
            width: 1200,
            height: 900,
        })
        .unwrap();
    graph
        .add(NodeKind::PlatformIpad {
            model: 1,
            orientation: Orientation::Horizontal,
        })
        .unwrap();
    graph.attach(game, tree).unwrap();
    graph.connect(tree, seq).unwrap();
    graph.connect(seq, key).unwrap();
    graph.connect(seq, finished).unwrap();
    (graph, game)
}

#[test]
fn game_node_round_trips_with_type_tag() {
    let node = Node::new(NodeId(4), NodeKind::Game)
        .with_name("My Game")
        .with_position(120.0, -30.5);

    let json = serde_json::to_string(&node).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "Game");

    let decoded: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.type_name(), "Game");
    assert_eq!(decoded.id, node.id);
    assert_eq!(decoded.name, node.name);
    assert_eq!(decoded.position, node.position);
    assert_eq!(decoded.minimum_size, node.minimum_size);
    assert_eq!(decoded.subset, node.subset);
    assert_eq!(decoded, node);
}

#[test]
fn graph_round_trips_through_json() {
    let (graph, game) = sample_graph();

    let json = graph.encode_json().unwrap();
    let decoded = NodeGraph::decode_json(&json).unwrap();

    assert_eq!(decoded.len(), graph.len());
    assert_eq!(decoded.connections(), graph.connections());
    for node in graph.nodes() {
        assert_eq!(decoded.node(node.id), Some(node));
    }
    assert_eq!(decoded.behavior_trees_for(game), graph.behavior_trees_for(game));
}

#[test]
fn decoded_graph_keeps_allocating_fresh_ids() {
    let (graph, _) = sample_graph();
    let mut decoded = NodeGraph::decode_json(&graph.encode_json().unwrap()).unwrap();

    let fresh = decoded.add(NodeKind::Restart).unwrap();
    assert!(graph.node(fresh).is_none());
}

#[test]
fn save_and_load_file() {
    let (graph, _) = sample_graph();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    graph.save(&path).unwrap();
    let loaded = NodeGraph::load(&path).unwrap();

    let mut session = Session::start(&loaded, SessionConfig::default()).unwrap();
    session.step([49].into_iter().collect());
    assert!(session.is_finished());
}

#[test]
fn load_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = NodeGraph::load(dir.path().join("missing.json"));

    assert!(matches!(result, Err(GraphError::Io(_))));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        NodeGraph::decode_json("{ \"nodes\": [ { \"id\": 1 } ] }"),
        Err(GraphError::Json(_))
    ));
    assert!(matches!(
        NodeGraph::decode_json("not json"),
        Err(GraphError::Json(_))
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let json = r#"{
        "nodes": [
            { "id": 1, "name": "Game", "type": "Game", "subset": [] },
            { "id": 1, "name": "Scene", "type": "Scene", "subset": [] }
        ]
    }"#;

    assert!(matches!(
        NodeGraph::decode_json(json),
        Err(GraphError::DuplicateId(NodeId(1)))
    ));
}

#[test]
fn dangling_references_are_rejected() {
    let subset = r#"{
        "nodes": [ { "id": 1, "name": "Game", "type": "Game", "subset": [8] } ]
    }"#;
    assert!(matches!(
        NodeGraph::decode_json(subset),
        Err(GraphError::DanglingReference {
            from: NodeId(1),
            missing: NodeId(8)
        })
    ));

    let connection = r#"{
        "nodes": [ { "id": 1, "name": "Main", "type": "Behavior Tree" } ],
        "connections": [ { "from": 1, "to": 2 } ]
    }"#;
    assert!(matches!(
        NodeGraph::decode_json(connection),
        Err(GraphError::DanglingReference {
            from: NodeId(1),
            missing: NodeId(2)
        })
    ));
}
