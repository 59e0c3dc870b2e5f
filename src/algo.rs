//! Algorithm procedure proxies
//!
//! An algorithm procedure takes a projected graph and a configuration map:
//! `CALL <procedure>($graph_name, $config)`.
//!
//! - **`AlgoProcRunner`**: standard mode, returns the rows
//!   (e.g. `gds.pageRank.mutate`, `gds.wcc.stats`)
//! - **`GraphSageRunner`**: model mode, trains and returns a `Model` handle
//!
//! Both expose `estimate`, which targets `<procedure>.estimate` and always
//! returns the raw rows.

use serde_json::json;
use tracing::{debug, info};

use crate::error::GdsResult;
use crate::graph::Graph;
use crate::model::{Model, ModelKind};
use crate::proc_config::{AllowedKeys, ProcConfig};
use crate::procedure::ProcedureName;
use crate::query_runner::{Params, QueryResult, SharedQueryRunner};

/// `CALL <procedure>($graph_name, $config)`
pub(crate) async fn call_on_graph(
    runner: &SharedQueryRunner,
    procedure: &ProcedureName,
    graph: &Graph,
    config: ProcConfig,
) -> GdsResult<QueryResult> {
    let query = format!("CALL {}($graph_name, $config)", procedure);

    let mut params = Params::new();
    params.insert("graph_name".to_string(), json!(graph.name()));
    params.insert("config".to_string(), config.into_value());

    debug!(procedure = %procedure, graph = graph.name(), "calling procedure");
    runner.run_query(&query, Some(params)).await
}

/// Proxy for an algorithm procedure in standard mode.
pub struct AlgoProcRunner {
    runner: SharedQueryRunner,
    procedure: ProcedureName,
    allowed: AllowedKeys,
}

impl AlgoProcRunner {
    pub fn new(runner: SharedQueryRunner, procedure: ProcedureName) -> Self {
        Self {
            runner,
            procedure,
            allowed: AllowedKeys::Any,
        }
    }

    /// Restrict the configuration keys accepted by `call` and `estimate`
    pub fn with_allowed_keys(mut self, allowed: AllowedKeys) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn procedure(&self) -> &ProcedureName {
        &self.procedure
    }

    /// Run the procedure and return its rows unmodified
    pub async fn call(&self, graph: &Graph, config: ProcConfig) -> GdsResult<QueryResult> {
        config.validate(&self.procedure, self.allowed)?;
        call_on_graph(&self.runner, &self.procedure, graph, config).await
    }

    /// Memory and cost estimate via `<procedure>.estimate`
    pub async fn estimate(&self, graph: &Graph, config: ProcConfig) -> GdsResult<QueryResult> {
        let procedure = self.procedure.child("estimate")?;
        config.validate(&procedure, self.allowed)?;
        call_on_graph(&self.runner, &procedure, graph, config).await
    }
}

/// Proxy for GraphSAGE training, which yields a model instead of rows.
pub struct GraphSageRunner {
    inner: AlgoProcRunner,
}

impl GraphSageRunner {
    pub fn new(runner: SharedQueryRunner, procedure: ProcedureName) -> Self {
        Self {
            inner: AlgoProcRunner::new(runner, procedure),
        }
    }

    pub fn procedure(&self) -> &ProcedureName {
        self.inner.procedure()
    }

    /// Train and return a handle named after `modelInfo.modelName`
    pub async fn train(&self, graph: &Graph, config: ProcConfig) -> GdsResult<Model> {
        let result = self.inner.call(graph, config).await?;
        let model_name = result.first_str(&["modelInfo", "modelName"])?;
        info!(model = model_name, "trained GraphSAGE model");

        Ok(Model::new(model_name, ModelKind::GraphSage, self.inner.runner.clone()))
    }

    pub async fn estimate(&self, graph: &Graph, config: ProcConfig) -> GdsResult<QueryResult> {
        self.inner.estimate(graph, config).await
    }
}
