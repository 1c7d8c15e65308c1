//! Request sanitization subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → view.rs (project headers/cookies/query/params/body)
//!     → gate.rs (ordered per-source checks)
//!         → sources.rs (shape handling per source)
//!         → policy.rs (character blacklist classification)
//!         → walker.rs (nested body traversal, Strict policy)
//!     → Verdict: pass request through, or reject with 400
//! ```
//!
//! # Design Decisions
//! - Reject only on a confirmed forbidden character; absent or oddly
//!   shaped data passes through to downstream handlers
//! - Fail fast within a source, never across sources
//! - Body recursion is depth-capped and fails closed
//! - Diagnostics go through an injected sink, never to process streams

pub mod diagnostics;
pub mod gate;
pub mod policy;
pub mod sources;
pub mod view;
pub mod walker;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use gate::RequestGate;
pub use policy::{CharacterPolicy, Verdict};
pub use sources::Source;
pub use view::RequestView;
