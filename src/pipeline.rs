//! Link-prediction training pipelines
//!
//! `LPPipelineCreateRunner::create` registers an empty pipeline on the server
//! and hands back an `LPTrainingPipeline`, whose methods add steps to it and
//! finally train a model.

use serde_json::{json, Value};
use std::fmt;
use tracing::info;

use crate::error::GdsResult;
use crate::graph::Graph;
use crate::model::{drop_model, Model, ModelKind};
use crate::proc_config::{AllowedKeys, ProcConfig};
use crate::procedure::ProcedureName;
use crate::query_runner::{Params, QueryResult, SharedQueryRunner};

/// Keys accepted by `configureSplit`
pub const SPLIT_CONFIG_KEYS: AllowedKeys = AllowedKeys::Only(&[
    "validationFolds",
    "testFraction",
    "trainFraction",
    "negativeSamplingRatio",
]);

/// Proxy that creates pipelines under `<namespace>.create`
pub struct LPPipelineCreateRunner {
    runner: SharedQueryRunner,
    namespace: ProcedureName,
}

impl LPPipelineCreateRunner {
    pub fn new(runner: SharedQueryRunner, namespace: ProcedureName) -> Self {
        Self { runner, namespace }
    }

    /// `CALL <namespace>.create($name)`; the result rows are not used.
    pub async fn create(&self, name: &str) -> GdsResult<LPTrainingPipeline> {
        let procedure = self.namespace.child("create")?;
        let query = format!("CALL {}($name)", procedure);

        let mut params = Params::new();
        params.insert("name".to_string(), json!(name));
        self.runner.run_query(&query, Some(params)).await?;

        info!(pipeline = name, "created link prediction pipeline");
        Ok(LPTrainingPipeline::new(
            name,
            self.namespace.clone(),
            self.runner.clone(),
        ))
    }
}

/// Client-side reference to a link-prediction training pipeline.
#[derive(Clone)]
pub struct LPTrainingPipeline {
    name: String,
    namespace: ProcedureName,
    runner: SharedQueryRunner,
}

impl LPTrainingPipeline {
    pub fn new(
        name: impl Into<String>,
        namespace: ProcedureName,
        runner: SharedQueryRunner,
    ) -> Self {
        Self {
            name: name.into(),
            namespace,
            runner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `CALL <namespace>.<step>($pipeline_name, <extra params>)`
    async fn run_step(&self, step: &str, extra: Vec<(&str, Value)>) -> GdsResult<QueryResult> {
        let procedure = self.namespace.child(step)?;

        let mut placeholders = vec!["$pipeline_name".to_string()];
        let mut params = Params::new();
        params.insert("pipeline_name".to_string(), json!(self.name));
        for (key, value) in extra {
            placeholders.push(format!("${}", key));
            params.insert(key.to_string(), value);
        }

        let query = format!("CALL {}({})", procedure, placeholders.join(", "));
        self.runner.run_query(&query, Some(params)).await
    }

    /// Add a node property step backed by an algorithm procedure, e.g. `fastRP`
    pub async fn add_node_property(
        &self,
        procedure_name: &str,
        config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        self.run_step(
            "addNodeProperty",
            vec![
                ("procedure_name", json!(procedure_name)),
                ("config", config.into_value()),
            ],
        )
        .await
    }

    /// Add a link feature, e.g. `hadamard` over `nodeProperties`
    pub async fn add_feature(
        &self,
        feature_type: &str,
        config: ProcConfig,
    ) -> GdsResult<QueryResult> {
        self.run_step(
            "addFeature",
            vec![
                ("feature_type", json!(feature_type)),
                ("config", config.into_value()),
            ],
        )
        .await
    }

    pub async fn configure_split(&self, config: ProcConfig) -> GdsResult<QueryResult> {
        let procedure = self.namespace.child("configureSplit")?;
        config.validate(&procedure, SPLIT_CONFIG_KEYS)?;
        self.run_step("configureSplit", vec![("config", config.into_value())])
            .await
    }

    /// Candidate parameter maps for model selection
    pub async fn configure_params(
        &self,
        parameter_space: Vec<ProcConfig>,
    ) -> GdsResult<QueryResult> {
        let space: Vec<Value> = parameter_space.into_iter().map(ProcConfig::into_value).collect();
        self.run_step("configureParams", vec![("parameter_space", Value::Array(space))])
            .await
    }

    /// Train on `graph`; `config` must carry `modelName`.
    pub async fn train(&self, graph: &Graph, mut config: ProcConfig) -> GdsResult<Model> {
        let procedure = self.namespace.child("train")?;
        config.insert("pipeline", self.name.clone());
        let query = format!("CALL {}($graph_name, $config)", procedure);

        let mut params = Params::new();
        params.insert("graph_name".to_string(), json!(graph.name()));
        params.insert("config".to_string(), config.into_value());

        let result = self.runner.run_query(&query, Some(params)).await?;
        let model_name = result.first_str(&["modelInfo", "modelName"])?;
        info!(pipeline = %self.name, model = model_name, "trained link prediction model");

        Ok(Model::new(model_name, ModelKind::LinkPrediction, self.runner.clone()))
    }

    /// Pipelines live in the model catalog and are dropped from there
    pub async fn drop(&self) -> GdsResult<QueryResult> {
        drop_model(&self.runner, &self.name).await
    }
}

impl fmt::Debug for LPTrainingPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LPTrainingPipeline")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GdsError;
    use crate::query_runner::RecordingQueryRunner;
    use std::sync::Arc;

    fn creator(runner: &Arc<RecordingQueryRunner>) -> LPPipelineCreateRunner {
        LPPipelineCreateRunner::new(
            runner.clone(),
            ProcedureName::new("gds.alpha.ml.pipeline.linkPrediction").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create() {
        let runner = Arc::new(RecordingQueryRunner::new());
        let pipeline = creator(&runner).create("myPipeline").await.unwrap();

        assert_eq!(pipeline.name(), "myPipeline");
        let recorded = runner.last_query().unwrap();
        assert_eq!(recorded.query, "CALL gds.alpha.ml.pipeline.linkPrediction.create($name)");
        assert_eq!(recorded.param("name"), Some(&json!("myPipeline")));
    }

    #[tokio::test]
    async fn test_steps_and_train() {
        let runner = Arc::new(RecordingQueryRunner::new());
        let pipeline = creator(&runner).create("pipe").await.unwrap();

        pipeline
            .add_node_property("fastRP", ProcConfig::new().with("embeddingDimension", 4))
            .await
            .unwrap();
        pipeline
            .add_feature("hadamard", ProcConfig::new().with("nodeProperties", json!(["embedding"])))
            .await
            .unwrap();
        pipeline
            .configure_params(vec![ProcConfig::new().with("penalty", 0.5)])
            .await
            .unwrap();

        let queries = runner.queries();
        assert_eq!(
            queries[1].query,
            "CALL gds.alpha.ml.pipeline.linkPrediction.addNodeProperty($pipeline_name, $procedure_name, $config)"
        );
        assert_eq!(queries[1].param("procedure_name"), Some(&json!("fastRP")));
        assert_eq!(
            queries[2].query,
            "CALL gds.alpha.ml.pipeline.linkPrediction.addFeature($pipeline_name, $feature_type, $config)"
        );
        assert_eq!(queries[3].param("parameter_space"), Some(&json!([{"penalty": 0.5}])));

        runner
            .push_json(json!([{"modelInfo": {"modelName": "lp-model"}}]))
            .unwrap();
        let graph = Graph::new("g", runner.clone());
        let model = pipeline
            .train(&graph, ProcConfig::new().with("modelName", "lp-model"))
            .await
            .unwrap();

        assert_eq!(model.name(), "lp-model");
        assert_eq!(model.kind(), ModelKind::LinkPrediction);
        let recorded = runner.last_query().unwrap();
        assert_eq!(
            recorded.param("config"),
            Some(&json!({"modelName": "lp-model", "pipeline": "pipe"}))
        );
    }

    #[tokio::test]
    async fn test_configure_split_allow_list() {
        let runner = Arc::new(RecordingQueryRunner::new());
        let pipeline = creator(&runner).create("pipe").await.unwrap();

        let err = pipeline
            .configure_split(ProcConfig::new().with("testFraction", 0.3).with("seed", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, GdsError::IllegalConfigKey { key, .. } if key == "seed"));
        assert_eq!(runner.query_count(), 1);
    }
}
