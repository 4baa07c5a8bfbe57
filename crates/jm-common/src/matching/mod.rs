pub mod experience;
pub mod industry;
pub mod location;
pub mod pipeline;
pub mod ranking;
pub mod salary;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use pipeline::{MatchError, MatchingEngine, ProfileInput};
pub use ranking::{DEFAULT_TOP_N, InvalidTopNError, TopN, rank};
pub use scoring::{ComponentScore, MatchStatus, ScoreBreakdown, ScoredMatch, Scorer, ScoringConfig, score};
