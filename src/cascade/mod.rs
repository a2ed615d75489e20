//! 캐스케이드 시스템 구성 탐색과 제안 선정.

pub mod optimizer;
pub mod proposal;

pub use optimizer::{optimize, CascadeConfiguration, CascadeFailure, CascadeInput, OptimizationResult, OptimizerSettings};
pub use proposal::{rank_proposals, Proposal, ProposalKind, Ranking};
