//! Graph handles and the `gds.graph.*` procedures

use serde_json::{json, Value};
use std::fmt;
use tracing::info;

use crate::error::{GdsError, GdsResult};
use crate::proc_config::ProcConfig;
use crate::procedure::ProcedureName;
use crate::query_runner::{Params, QueryResult, SharedQueryRunner};

/// Node id as returned by `id(n)`
pub type NodeId = u64;

/// Client-side reference to a projected graph held by the server.
///
/// Proxies only read the name; dropping the handle does not drop the graph.
#[derive(Clone)]
pub struct Graph {
    name: String,
    runner: SharedQueryRunner,
}

impl Graph {
    pub fn new(name: impl Into<String>, runner: SharedQueryRunner) -> Self {
        Self {
            name: name.into(),
            runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog entry for this graph (`gds.graph.list($graph_name)`)
    pub async fn info(&self) -> GdsResult<QueryResult> {
        let mut params = Params::new();
        params.insert("graph_name".to_string(), json!(self.name));
        self.runner
            .run_query("CALL gds.graph.list($graph_name)", Some(params))
            .await
    }

    pub async fn node_count(&self) -> GdsResult<u64> {
        self.info().await?.first_u64(&["nodeCount"])
    }

    pub async fn relationship_count(&self) -> GdsResult<u64> {
        self.info().await?.first_u64(&["relationshipCount"])
    }

    pub async fn exists(&self) -> GdsResult<bool> {
        graph_exists(&self.runner, &self.name).await
    }

    /// Remove the graph from the server catalog
    pub async fn drop(&self) -> GdsResult<QueryResult> {
        let mut params = Params::new();
        params.insert("graph_name".to_string(), json!(self.name));
        self.runner
            .run_query("CALL gds.graph.drop($graph_name)", Some(params))
            .await
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("name", &self.name).finish()
    }
}

async fn graph_exists(runner: &SharedQueryRunner, name: &str) -> GdsResult<bool> {
    let mut params = Params::new();
    params.insert("graph_name".to_string(), json!(name));
    runner
        .run_query("CALL gds.graph.exists($graph_name)", Some(params))
        .await?
        .first_bool(&["exists"])
}

/// Graph catalog operations
pub struct GraphEndpoints {
    runner: SharedQueryRunner,
    namespace: ProcedureName,
}

impl GraphEndpoints {
    pub fn new(runner: SharedQueryRunner, namespace: ProcedureName) -> Self {
        Self { runner, namespace }
    }

    /// Project a named graph into the catalog.
    ///
    /// `node_spec` and `relationship_spec` are passed through as given:
    /// a label string, `"*"`, a list, or a map projection.
    pub async fn project(
        &self,
        graph_name: &str,
        node_spec: impl Into<Value>,
        relationship_spec: impl Into<Value>,
        config: ProcConfig,
    ) -> GdsResult<Graph> {
        let procedure = self.namespace.child("project")?;
        let query = format!(
            "CALL {}($graph_name, $node_spec, $relationship_spec, $config)",
            procedure
        );

        let mut params = Params::new();
        params.insert("graph_name".to_string(), json!(graph_name));
        params.insert("node_spec".to_string(), node_spec.into());
        params.insert("relationship_spec".to_string(), relationship_spec.into());
        params.insert("config".to_string(), config.into_value());

        let result = self.runner.run_query(&query, Some(params)).await?;
        let name = result.first_str(&["graphName"])?;
        info!(graph = name, "projected graph");

        Ok(Graph::new(name, self.runner.clone()))
    }

    /// Memory estimate for a projection; returns the raw rows.
    pub async fn project_estimate(
        &self,
        node_spec: impl Into<Value>,
        relationship_spec: impl Into<Value>,
        config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        let procedure = self.namespace.child("project.estimate")?;
        let query = format!("CALL {}($node_spec, $relationship_spec, $config)", procedure);

        let mut params = Params::new();
        params.insert("node_spec".to_string(), node_spec.into());
        params.insert("relationship_spec".to_string(), relationship_spec.into());
        params.insert("config".to_string(), config.into_value());

        self.runner.run_query(&query, Some(params)).await
    }

    /// Handle for a graph that already exists in the catalog
    pub async fn get(&self, graph_name: &str) -> GdsResult<Graph> {
        if !self.exists(graph_name).await? {
            return Err(GdsError::QueryError(format!(
                "No projected graph named '{}' exists",
                graph_name
            )));
        }
        Ok(Graph::new(graph_name, self.runner.clone()))
    }

    pub async fn exists(&self, graph_name: &str) -> GdsResult<bool> {
        graph_exists(&self.runner, graph_name).await
    }

    pub async fn drop(&self, graph: &Graph) -> GdsResult<QueryResult> {
        graph.drop().await
    }

    /// All graphs in the catalog
    pub async fn list(&self) -> GdsResult<QueryResult> {
        let query = format!("CALL {}()", self.namespace.child("list")?);
        self.runner.run_query(&query, None).await
    }
}
