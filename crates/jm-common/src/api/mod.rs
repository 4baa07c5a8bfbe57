pub mod job_summary;
pub mod match_request;
pub mod match_response;

pub use job_summary::JobSummary;
pub use match_request::{MatchRequest, ScoreRequest};
pub use match_response::{MatchListResponse, MatchResponse};
