//! GraphDataScience: entry point that hands out procedure proxies

use std::sync::Arc;

use crate::algo::{AlgoProcRunner, GraphSageRunner};
use crate::config::ClientConfig;
use crate::error::GdsResult;
use crate::graph::GraphEndpoints;
use crate::model::ModelEndpoints;
use crate::pipeline::LPPipelineCreateRunner;
use crate::proc_config::AllowedKeys;
use crate::procedure::ProcedureName;
use crate::query_runner::{HttpQueryRunner, Params, QueryResult, SharedQueryRunner};
use crate::system::{SystemEndpoints, UtilEndpoints};
use crate::topological_lp::TopologicalLpRunner;

/// Root namespace of the server-side library
pub const GDS_NAMESPACE: &str = "gds";
pub const GRAPH_NAMESPACE: &str = "gds.graph";
pub const GRAPH_SAGE_TRAIN: &str = "gds.beta.graphSage.train";
pub const TOPOLOGICAL_LP_NAMESPACE: &str = "gds.alpha.linkprediction";
pub const LP_PIPELINE_NAMESPACE: &str = "gds.alpha.ml.pipeline.linkPrediction";

/// Client for the Graph Data Science library.
///
/// Every proxy it returns shares the same query runner.
///
/// # Example
/// ```no_run
/// use graphdatascience::{GraphDataScience, ProcConfig};
///
/// # async fn run() -> graphdatascience::GdsResult<()> {
/// let gds = GraphDataScience::connect(&Default::default())?;
/// let g = gds.graph().project("g", "*", "*", ProcConfig::new()).await?;
///
/// let stats = gds.algo("wcc.stats")?.call(&g, ProcConfig::new()).await?;
/// println!("{:?}", stats.first());
///
/// let score = gds.link_prediction().adamic_adar(0, 1, ProcConfig::new()).await?;
/// println!("adamic-adar: {score}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GraphDataScience {
    runner: SharedQueryRunner,
}

impl GraphDataScience {
    pub fn new(runner: SharedQueryRunner) -> Self {
        Self { runner }
    }

    /// Connect over HTTP with the given configuration
    pub fn connect(config: &ClientConfig) -> GdsResult<Self> {
        let runner = HttpQueryRunner::new(config)?;
        Ok(Self::new(Arc::new(runner)))
    }

    pub fn runner(&self) -> &SharedQueryRunner {
        &self.runner
    }

    /// Run arbitrary Cypher through the shared runner
    pub async fn run_query(&self, query: &str, params: Option<Params>) -> GdsResult<QueryResult> {
        self.runner.run_query(query, params).await
    }

    pub fn graph(&self) -> GraphEndpoints {
        GraphEndpoints::new(self.runner.clone(), ProcedureName::from_static(GRAPH_NAMESPACE))
    }

    /// Standard-mode proxy for `gds.<name>`, e.g. `algo("pageRank.mutate")`
    pub fn algo(&self, name: &str) -> GdsResult<AlgoProcRunner> {
        let procedure = ProcedureName::from_static(GDS_NAMESPACE).child(name)?;
        Ok(AlgoProcRunner::new(self.runner.clone(), procedure))
    }

    /// Like `algo`, rejecting configuration keys outside `allowed`
    pub fn algo_with_keys(&self, name: &str, allowed: AllowedKeys) -> GdsResult<AlgoProcRunner> {
        Ok(self.algo(name)?.with_allowed_keys(allowed))
    }

    pub fn graph_sage(&self) -> GraphSageRunner {
        GraphSageRunner::new(self.runner.clone(), ProcedureName::from_static(GRAPH_SAGE_TRAIN))
    }

    pub fn link_prediction(&self) -> TopologicalLpRunner {
        TopologicalLpRunner::new(
            self.runner.clone(),
            ProcedureName::from_static(TOPOLOGICAL_LP_NAMESPACE),
        )
    }

    pub fn lp_pipeline(&self) -> LPPipelineCreateRunner {
        LPPipelineCreateRunner::new(
            self.runner.clone(),
            ProcedureName::from_static(LP_PIPELINE_NAMESPACE),
        )
    }

    pub fn model(&self) -> ModelEndpoints {
        ModelEndpoints::new(self.runner.clone())
    }

    pub fn system(&self) -> SystemEndpoints {
        SystemEndpoints::new(self.runner.clone())
    }

    pub fn util(&self) -> UtilEndpoints {
        UtilEndpoints::new(self.runner.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_runner::RecordingQueryRunner;

    #[test]
    fn test_builtin_namespaces_are_valid() {
        for name in [
            GDS_NAMESPACE,
            GRAPH_NAMESPACE,
            GRAPH_SAGE_TRAIN,
            TOPOLOGICAL_LP_NAMESPACE,
            LP_PIPELINE_NAMESPACE,
        ] {
            assert!(ProcedureName::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_accessors_use_builtin_namespaces() {
        let gds = GraphDataScience::new(Arc::new(RecordingQueryRunner::new()));
        assert_eq!(gds.graph_sage().procedure().as_str(), GRAPH_SAGE_TRAIN);
        assert_eq!(
            gds.algo("pageRank.stream").unwrap().procedure().as_str(),
            "gds.pageRank.stream"
        );
        assert!(gds.algo("pageRank; DROP").is_err());
    }
}
