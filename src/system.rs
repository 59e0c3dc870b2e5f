//! Library-level procedures: version, procedure listing, diagnostics, and
//! small `gds.util.*` helpers

use serde_json::{json, Value};

use crate::error::GdsResult;
use crate::graph::{Graph, NodeId};
use crate::query_runner::{Params, QueryResult, SharedQueryRunner};

pub struct SystemEndpoints {
    runner: SharedQueryRunner,
}

impl SystemEndpoints {
    pub fn new(runner: SharedQueryRunner) -> Self {
        Self { runner }
    }

    /// Version string of the server-side library
    pub async fn version(&self) -> GdsResult<String> {
        let result = self.runner.run_query("RETURN gds.version() AS version", None).await?;
        Ok(result.first_str(&["version"])?.to_string())
    }

    /// Every procedure and function the library exposes
    pub async fn list(&self) -> GdsResult<QueryResult> {
        self.runner.run_query("CALL gds.list()", None).await
    }

    pub async fn sys_info(&self) -> GdsResult<QueryResult> {
        self.runner.run_query("CALL gds.debug.sysInfo()", None).await
    }
}

pub struct UtilEndpoints {
    runner: SharedQueryRunner,
}

impl UtilEndpoints {
    pub fn new(runner: SharedQueryRunner) -> Self {
        Self { runner }
    }

    /// The database node behind an id, as returned by the server
    pub async fn as_node(&self, node_id: NodeId) -> GdsResult<Value> {
        let mut params = Params::new();
        params.insert("node_id".to_string(), json!(node_id));

        let result = self
            .runner
            .run_query("RETURN gds.util.asNode($node_id) AS node", Some(params))
            .await?;
        Ok(result.first_value(&["node"])?.clone())
    }

    /// A node property stored in a projected graph (not in the database)
    pub async fn node_property(
        &self,
        graph: &Graph,
        node_id: NodeId,
        property: &str,
    ) -> GdsResult<Value> {
        let mut params = Params::new();
        params.insert("graph_name".to_string(), json!(graph.name()));
        params.insert("node_id".to_string(), json!(node_id));
        params.insert("property".to_string(), json!(property));

        let result = self
            .runner
            .run_query(
                "RETURN gds.util.nodeProperty($graph_name, $node_id, $property) AS value",
                Some(params),
            )
            .await?;
        Ok(result.first_value(&["value"])?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_runner::RecordingQueryRunner;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_version() {
        let runner = Arc::new(RecordingQueryRunner::new());
        runner.push_json(json!([{"version": "2.0.0"}])).unwrap();

        let version = SystemEndpoints::new(runner.clone()).version().await.unwrap();
        assert_eq!(version, "2.0.0");
    }

    #[tokio::test]
    async fn test_node_property() {
        let runner = Arc::new(RecordingQueryRunner::new());
        runner.push_json(json!([{"value": 0.15}])).unwrap();

        let graph = Graph::new("g", runner.clone());
        let value = UtilEndpoints::new(runner.clone())
            .node_property(&graph, 3, "rank")
            .await
            .unwrap();

        assert_eq!(value, json!(0.15));
        let recorded = runner.last_query().unwrap();
        assert_eq!(recorded.param("node_id"), Some(&json!(3)));
        assert_eq!(recorded.param("property"), Some(&json!("rank")));
    }
}
