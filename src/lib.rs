//! graphdatascience: client for the Graph Data Science library
//!
//! Server-side procedures are exposed as method calls. Each proxy builds a
//! parameterized Cypher query, hands it to a `QueryRunner`, and shapes the
//! rows into the return type the caller expects:
//!
//! - **raw rows**: algorithm procedures and every `estimate`
//! - **a score**: topological link-prediction functions
//! - **a handle**: `Graph`, `Model`, `LPTrainingPipeline`
//!
//! Runners:
//! - **`HttpQueryRunner`**: Neo4j HTTP transactional API
//! - **`RecordingQueryRunner`**: in-process, canned results
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use graphdatascience::{GraphDataScience, ProcConfig, RecordingQueryRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = Arc::new(RecordingQueryRunner::new());
//!     runner.push_json(serde_json::json!([{"score": 0.42}])).unwrap();
//!
//!     let gds = GraphDataScience::new(runner.clone());
//!     let score = gds.link_prediction()
//!         .adamic_adar(1, 2, ProcConfig::new())
//!         .await.unwrap();
//!     assert_eq!(score, 0.42);
//! }
//! ```

pub mod algo;
pub mod config;
pub mod error;
pub mod gds;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod proc_config;
pub mod procedure;
pub mod query_runner;
pub mod system;
pub mod topological_lp;

pub use algo::{AlgoProcRunner, GraphSageRunner};
pub use config::ClientConfig;
pub use error::{GdsError, GdsResult};
pub use gds::GraphDataScience;
pub use graph::{Graph, GraphEndpoints, NodeId};
pub use model::{Model, ModelEndpoints, ModelKind};
pub use pipeline::{LPPipelineCreateRunner, LPTrainingPipeline};
pub use proc_config::{AllowedKeys, ProcConfig};
pub use procedure::ProcedureName;
pub use query_runner::{
    HttpQueryRunner, Params, QueryResult, QueryRunner, RecordedQuery, RecordingQueryRunner, Row,
    SharedQueryRunner,
};
pub use system::{SystemEndpoints, UtilEndpoints};
pub use topological_lp::TopologicalLpRunner;

/// Client version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
