//! Deliberation orchestration domain
//!
//! Result and aggregate types shared by every phase of a deliberation:
//!
//! ```text
//! Collection ──▶ Analysis ──▶ Debate ──▶ Consensus
//!     │              │           │            │
//! ResponderOutput  Analysis   Debate     Consensus
//! ResponderFailure  Report    Result      Result
//!                         ▼
//!                      Session (aggregate root, owned by the store)
//! ```

pub mod entities;
pub mod value_objects;
