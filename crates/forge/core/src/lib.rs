//! # tokenforge-core
//!
//! Feature-composable ERC-20 source generation. A `TokenSpec` enables any
//! subset of five feature modules; the engine emits one consistent
//! contract in which every module is wired into shared hook points in a
//! fixed, deterministic order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         TokenForge                           │
//! │                                                              │
//! │  TokenSpec ──→ ValidationLayer ──→ Vec<ValidationError>      │
//! │                     │ ok                                     │
//! │                     ▼                                        │
//! │  FeatureCatalog ──→ CompositionPlanner                       │
//! │                     │  hooks, capabilities, transfer         │
//! │                     │  dataflow, timelock scope              │
//! │                     ▼                                        │
//! │               FragmentRenderer (per feature)                 │
//! │                     │                                        │
//! │                     ▼                                        │
//! │                  Emitter ──→ GeneratedArtifact               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Design Decisions
//!
//! - **Catalog order** is the tie-break for every hook except the
//!   transfer override, which follows the fixed priority table
//! - **Transfer dataflow**: stages declare the shared values they produce
//!   and consume; the planner declares them once and rejects bad orders
//! - **Shared capabilities** (router, swap helpers) are emitted once
//! - **Two error kinds**: validation errors are user-facing and complete,
//!   composition errors are defects and never reach end users

#![deny(unsafe_code)]

pub mod address;
pub mod catalog;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod generator;
pub mod planner;
pub mod render;
pub mod types;
pub mod validation;

// ── Re-exports ───────────────────────────────────────────────────────

pub use catalog::{
    AdminFunctionDecl, FeatureCatalog, FeatureDefinition, FeatureKind, ParameterDefinition,
    ParameterType, ResolvedParameters, TransferStage,
};
pub use emitter::{emit, GeneratedArtifact};
pub use engine::{ForgeSummary, GenerationRecord, TokenForge};
pub use error::{CompositionError, ForgeError, ForgeResult, ValidationError};
pub use generator::generate;
pub use planner::{
    plan, AdminBinding, CompositionPlan, Contributor, PlannedFeature, PlannedStage, TimelockScope,
    TransferPlan,
};
pub use render::{
    render, ContractHeader, FeatureOutput, FeatureRenderer, Fragment, RenderContext,
    RenderedContract, TransferFrame,
};
pub use types::{
    Capability, FeatureConfig, FeatureId, GeneratorConfig, HookPoint, ParameterValue, SharedValue,
    TokenSpec,
};
pub use validation::validate;
