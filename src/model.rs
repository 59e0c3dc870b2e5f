//! Trained-model handles and the `gds.beta.model.*` catalog procedures

use serde_json::json;
use std::fmt;
use tracing::debug;

use crate::algo::call_on_graph;
use crate::error::{GdsError, GdsResult};
use crate::graph::Graph;
use crate::proc_config::ProcConfig;
use crate::procedure::ProcedureName;
use crate::query_runner::{Params, QueryResult, SharedQueryRunner};

const MODEL_CATALOG: &str = "gds.beta.model";

/// What produced a model, which decides where its predictions run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    GraphSage,
    LinkPrediction,
}

impl ModelKind {
    /// Parse the catalog's `modelInfo.modelType`
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        match model_type {
            "graphSage" => Some(ModelKind::GraphSage),
            "LinkPrediction" | "Link prediction pipeline" => Some(ModelKind::LinkPrediction),
            _ => None,
        }
    }

    fn supports_predict_mode(&self, mode: &str) -> bool {
        match self {
            ModelKind::GraphSage => matches!(mode, "stream" | "mutate" | "write"),
            ModelKind::LinkPrediction => matches!(mode, "stream" | "mutate"),
        }
    }

    fn predict_namespace(&self) -> &'static str {
        match self {
            ModelKind::GraphSage => "gds.beta.graphSage",
            ModelKind::LinkPrediction => "gds.alpha.ml.pipeline.linkPrediction.predict",
        }
    }
}

/// Client-side reference to a model stored in the server's model catalog.
#[derive(Clone)]
pub struct Model {
    name: String,
    kind: ModelKind,
    runner: SharedQueryRunner,
}

impl Model {
    pub fn new(name: impl Into<String>, kind: ModelKind, runner: SharedQueryRunner) -> Self {
        Self {
            name: name.into(),
            kind,
            runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub async fn exists(&self) -> GdsResult<bool> {
        model_exists(&self.runner, &self.name).await
    }

    pub async fn drop(&self) -> GdsResult<QueryResult> {
        drop_model(&self.runner, &self.name).await
    }

    pub async fn predict_stream(
        &self,
        graph: &Graph,
        config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        self.predict("stream", graph, config).await
    }

    pub async fn predict_mutate(
        &self,
        graph: &Graph,
        config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        self.predict("mutate", graph, config).await
    }

    /// GraphSAGE only; link-prediction pipelines predict in `stream` and `mutate` mode.
    pub async fn predict_write(&self, graph: &Graph, config: ProcConfig) -> GdsResult<QueryResult> {
        self.predict("write", graph, config).await
    }

    async fn predict(
        &self,
        mode: &str,
        graph: &Graph,
        mut config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        if !self.kind.supports_predict_mode(mode) {
            return Err(GdsError::ConfigError(format!(
                "model '{}' of kind {:?} has no {} prediction mode",
                self.name, self.kind, mode
            )));
        }
        let procedure = ProcedureName::new(self.kind.predict_namespace())?.child(mode)?;
        config.insert("modelName", self.name.clone());
        debug!(model = %self.name, procedure = %procedure, "predicting");
        call_on_graph(&self.runner, &procedure, graph, config).await
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn model_params(name: &str) -> Params {
    let mut params = Params::new();
    params.insert("model_name".to_string(), json!(name));
    params
}

async fn model_exists(runner: &SharedQueryRunner, name: &str) -> GdsResult<bool> {
    let query = format!("CALL {}.exists($model_name)", MODEL_CATALOG);
    runner
        .run_query(&query, Some(model_params(name)))
        .await?
        .first_bool(&["exists"])
}

pub(crate) async fn drop_model(runner: &SharedQueryRunner, name: &str) -> GdsResult<QueryResult> {
    let query = format!("CALL {}.drop($model_name)", MODEL_CATALOG);
    runner.run_query(&query, Some(model_params(name))).await
}

/// Model catalog operations
pub struct ModelEndpoints {
    runner: SharedQueryRunner,
}

impl ModelEndpoints {
    pub fn new(runner: SharedQueryRunner) -> Self {
        Self { runner }
    }

    pub async fn list(&self) -> GdsResult<QueryResult> {
        let query = format!("CALL {}.list()", MODEL_CATALOG);
        self.runner.run_query(&query, None).await
    }

    pub async fn exists(&self, model_name: &str) -> GdsResult<bool> {
        model_exists(&self.runner, model_name).await
    }

    pub async fn drop(&self, model_name: &str) -> GdsResult<QueryResult> {
        drop_model(&self.runner, model_name).await
    }

    /// Handle for a stored model, typed from its catalog entry
    pub async fn get(&self, model_name: &str) -> GdsResult<Model> {
        let query = format!("CALL {}.list($model_name)", MODEL_CATALOG);
        let result = self.runner.run_query(&query, Some(model_params(model_name))).await?;
        if result.is_empty() {
            return Err(GdsError::QueryError(format!(
                "No model named '{}' exists",
                model_name
            )));
        }

        let model_type = result.first_str(&["modelInfo", "modelType"])?;
        let kind = ModelKind::from_model_type(model_type).ok_or_else(|| GdsError::UnexpectedType {
            field: "modelInfo.modelType".to_string(),
            expected: "a known model type",
        })?;

        Ok(Model::new(model_name, kind, self.runner.clone()))
    }
}
