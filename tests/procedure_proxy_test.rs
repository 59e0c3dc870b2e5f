use graphdatascience::{
    AllowedKeys, GdsError, Graph, GraphDataScience, ModelKind, ProcConfig, RecordingQueryRunner,
};
use serde_json::json;
use std::sync::Arc;

fn setup() -> (Arc<RecordingQueryRunner>, GraphDataScience) {
    let runner = Arc::new(RecordingQueryRunner::new());
    let gds = GraphDataScience::new(runner.clone());
    (runner, gds)
}

#[tokio::test]
async fn test_standard_mode_binds_graph_and_config() {
    let (runner, gds) = setup();
    runner
        .push_json(json!([
            {"nodeId": 0, "score": 0.2},
            {"nodeId": 1, "score": 0.3},
        ]))
        .unwrap();

    let graph = Graph::new("g", runner.clone());
    let config = ProcConfig::new()
        .with("dampingFactor", 0.2)
        .with("tolerance", 0.3);

    let result = gds
        .algo("pageRank.stream")
        .unwrap()
        .call(&graph, config)
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[1]["score"], json!(0.3));
    assert_eq!(result.columns, vec!["nodeId", "score"]);

    assert_eq!(runner.query_count(), 1);
    let recorded = runner.last_query().unwrap();
    assert_eq!(recorded.query, "CALL gds.pageRank.stream($graph_name, $config)");
    assert_eq!(recorded.param("graph_name"), Some(&json!("g")));
    assert_eq!(
        recorded.param("config"),
        Some(&json!({"dampingFactor": 0.2, "tolerance": 0.3}))
    );
}

#[tokio::test]
async fn test_estimate_returns_rows_from_estimate_procedure() {
    let (runner, gds) = setup();
    runner
        .push_json(json!([{"requiredMemory": "[824 Bytes ... 1024 Bytes]", "nodeCount": 3}]))
        .unwrap();

    let graph = Graph::new("g", runner.clone());
    let result = gds
        .algo("fastRP.write")
        .unwrap()
        .estimate(&graph, ProcConfig::new().with("embeddingDimension", 4))
        .await
        .unwrap();

    assert!(result[0]["requiredMemory"].is_string());
    let recorded = runner.last_query().unwrap();
    assert!(recorded.query.starts_with("CALL gds.fastRP.write.estimate("));
}

#[tokio::test]
async fn test_reused_proxy_does_not_accumulate_suffixes() {
    let (runner, gds) = setup();
    let graph = Graph::new("g", runner.clone());
    let lp = gds.link_prediction();
    let wcc = gds.algo("wcc.stats").unwrap();

    for _ in 0..2 {
        let _ = lp.adamic_adar(1, 2, ProcConfig::new()).await;
        wcc.estimate(&graph, ProcConfig::new()).await.unwrap();
    }

    let queries = runner.queries();
    assert_eq!(queries.len(), 4);
    assert_eq!(queries[0].query, queries[2].query);
    assert_eq!(queries[1].query, queries[3].query);
    assert!(queries[2].query.contains("gds.alpha.linkprediction.adamicAdar(n1, n2, $config)"));
    assert_eq!(queries[3].query, "CALL gds.wcc.stats.estimate($graph_name, $config)");
}

#[tokio::test]
async fn test_adamic_adar_returns_score() {
    let (runner, gds) = setup();
    runner.push_json(json!([{"score": 0.42}])).unwrap();

    let score = gds
        .link_prediction()
        .adamic_adar(1, 2, ProcConfig::new())
        .await
        .unwrap();

    assert_eq!(score, 0.42);
    let query = runner.last_query().unwrap().query;
    assert!(query.contains("MATCH (n1) WHERE id(n1) = 1"));
    assert!(query.contains("MATCH (n2) WHERE id(n2) = 2"));
    assert!(query.ends_with("AS score"));
}

#[tokio::test]
async fn test_same_community_inlines_property() {
    let (runner, gds) = setup();
    runner.push_json(json!([{"score": 1.0}])).unwrap();
    runner.push_json(json!([{"score": 1.0}])).unwrap();
    let lp = gds.link_prediction();

    lp.same_community(4, 5, None).await.unwrap();
    lp.same_community(4, 5, Some("louvain")).await.unwrap();

    let queries = runner.queries();
    assert!(queries[0].query.contains("sameCommunity(n1, n2) AS score"));
    assert!(queries[1].query.contains("sameCommunity(n1, n2, 'louvain') AS score"));
    assert!(queries.iter().all(|q| q.params.is_none()));
}

#[tokio::test]
async fn test_graph_sage_train_returns_model_handle() {
    let (runner, gds) = setup();
    runner
        .push_json(json!([{"modelInfo": {"modelName": "m1", "modelType": "graphSage"}}]))
        .unwrap();

    let graph = Graph::new("g", runner.clone());
    let model = gds
        .graph_sage()
        .train(
            &graph,
            ProcConfig::new()
                .with("modelName", "m1")
                .with("featureProperties", json!(["age"])),
        )
        .await
        .unwrap();

    assert_eq!(model.name(), "m1");
    assert_eq!(model.kind(), ModelKind::GraphSage);
    assert_eq!(
        runner.last_query().unwrap().query,
        "CALL gds.beta.graphSage.train($graph_name, $config)"
    );
}

#[tokio::test]
async fn test_pipeline_create_binds_name() {
    let (runner, gds) = setup();

    let pipeline = gds.lp_pipeline().create("myPipeline").await.unwrap();

    assert_eq!(pipeline.name(), "myPipeline");
    let recorded = runner.last_query().unwrap();
    assert_eq!(recorded.query, "CALL gds.alpha.ml.pipeline.linkPrediction.create($name)");
    assert_eq!(recorded.param("name"), Some(&json!("myPipeline")));
}

#[tokio::test]
async fn test_server_errors_propagate_unmodified() {
    let (runner, gds) = setup();
    runner.push_error("Neo.ClientError.Procedure.ProcedureCallFailed: Graph with name `g` does not exist");

    let graph = Graph::new("g", runner.clone());
    let err = gds
        .algo("wcc.stream")
        .unwrap()
        .call(&graph, ProcConfig::new())
        .await
        .unwrap_err();

    match err {
        GdsError::QueryError(msg) => assert!(msg.contains("does not exist")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_names_and_keys_never_reach_the_server() {
    let (runner, gds) = setup();
    let graph = Graph::new("g", runner.clone());

    assert!(matches!(
        gds.algo("pageRank.stream(); MATCH (n) DETACH DELETE n //"),
        Err(GdsError::InvalidProcedureName(_))
    ));

    let louvain = gds
        .algo_with_keys("louvain.stream", AllowedKeys::Only(&["maxLevels", "seedProperty"]))
        .unwrap();
    let err = louvain
        .call(&graph, ProcConfig::new().with("maxIterations", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, GdsError::IllegalConfigKey { .. }));

    assert_eq!(runner.query_count(), 0);
}

#[tokio::test]
async fn test_end_to_end_workflow() {
    let (runner, gds) = setup();
    runner.push_json(json!([{"graphName": "g", "nodeCount": 3}])).unwrap();
    runner.push_json(json!([{"componentCount": 1}])).unwrap();
    runner.push_json(json!([{"graphName": "g"}])).unwrap();

    let graph = gds
        .graph()
        .project("g", "Node", "REL", ProcConfig::new())
        .await
        .unwrap();
    let stats = gds
        .algo("wcc.stats")
        .unwrap()
        .call(&graph, ProcConfig::new())
        .await
        .unwrap();
    assert_eq!(stats.first_u64(&["componentCount"]).unwrap(), 1);
    graph.drop().await.unwrap();

    let queries: Vec<String> = runner.queries().into_iter().map(|q| q.query).collect();
    assert_eq!(
        queries,
        vec![
            "CALL gds.graph.project($graph_name, $node_spec, $relationship_spec, $config)",
            "CALL gds.wcc.stats($graph_name, $config)",
            "CALL gds.graph.drop($graph_name)",
        ]
    );
}
