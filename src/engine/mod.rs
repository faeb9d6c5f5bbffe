pub mod matcher;
pub mod minutes_gate;
pub mod odds;
pub mod projection;
pub mod ranker;
pub mod splits;
pub mod types;

pub use minutes_gate::MinutesGate;
pub use types::{Edge, EdgeKind, Projection, PropAnalysis, ScoreBreakdown};
