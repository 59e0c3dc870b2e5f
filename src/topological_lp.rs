//! Topological link-prediction functions
//!
//! Each function scores a pair of nodes:
//!
//! ```text
//! MATCH (n1) WHERE id(n1) = <id1>
//! MATCH (n2) WHERE id(n2) = <id2>
//! RETURN <namespace>.<function>(n1, n2, $config) AS score
//! ```
//!
//! `sameCommunity` takes a community property instead of a config map,
//! inlined as a string literal.

use tracing::debug;

use crate::error::GdsResult;
use crate::graph::NodeId;
use crate::proc_config::{AllowedKeys, ProcConfig};
use crate::procedure::ProcedureName;
use crate::query_runner::{Params, SharedQueryRunner};

/// Keys accepted by the neighbourhood-based scoring functions
pub const SCORE_CONFIG_KEYS: AllowedKeys = AllowedKeys::Only(&["relationshipQuery", "direction"]);

fn match_pair(node1: NodeId, node2: NodeId) -> String {
    format!(
        "MATCH (n1) WHERE id(n1) = {}\nMATCH (n2) WHERE id(n2) = {}",
        node1, node2
    )
}

/// Single-quoted Cypher string literal
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Proxy for the `gds.alpha.linkprediction.*` function family
pub struct TopologicalLpRunner {
    runner: SharedQueryRunner,
    namespace: ProcedureName,
}

impl TopologicalLpRunner {
    pub fn new(runner: SharedQueryRunner, namespace: ProcedureName) -> Self {
        Self { runner, namespace }
    }

    pub fn namespace(&self) -> &ProcedureName {
        &self.namespace
    }

    async fn run_score_function(
        &self,
        function: &str,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        let function = self.namespace.child(function)?;
        config.validate(&function, SCORE_CONFIG_KEYS)?;

        let query = format!(
            "{}\nRETURN {}(n1, n2, $config) AS score",
            match_pair(node1, node2),
            function
        );
        let mut params = Params::new();
        params.insert("config".to_string(), config.into_value());

        debug!(function = %function, node1, node2, "scoring node pair");
        self.runner
            .run_query(&query, Some(params))
            .await?
            .first_f64(&["score"])
    }

    pub async fn adamic_adar(
        &self,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        self.run_score_function("adamicAdar", node1, node2, config).await
    }

    pub async fn common_neighbors(
        &self,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        self.run_score_function("commonNeighbors", node1, node2, config).await
    }

    pub async fn preferential_attachment(
        &self,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        self.run_score_function("preferentialAttachment", node1, node2, config).await
    }

    pub async fn resource_allocation(
        &self,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        self.run_score_function("resourceAllocation", node1, node2, config).await
    }

    pub async fn total_neighbors(
        &self,
        node1: NodeId,
        node2: NodeId,
        config: ProcConfig,
    ) -> GdsResult<f64> {
        self.run_score_function("totalNeighbors", node1, node2, config).await
    }

    /// 1.0 if both nodes share a community value, else 0.0.
    ///
    /// Without `community_property` the server uses its default (`community`).
    pub async fn same_community(
        &self,
        node1: NodeId,
        node2: NodeId,
        community_property: Option<&str>,
    ) -> GdsResult<f64> {
        let function = self.namespace.child("sameCommunity")?;
        let property = match community_property {
            Some(property) if !property.is_empty() => format!(", {}", string_literal(property)),
            _ => String::new(),
        };

        let query = format!(
            "{}\nRETURN {}(n1, n2{}) AS score",
            match_pair(node1, node2),
            function,
            property
        );

        debug!(function = %function, node1, node2, "scoring node pair");
        self.runner.run_query(&query, None).await?.first_f64(&["score"])
    }
}
