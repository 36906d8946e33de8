// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Breakdown, ExpressEntryStatus, ExpressEntryStream, GraduateStream, Impact, JobOfferStream,
    MaritalStatus, Profile, ScoreResult, Stream, StreamCategory, Suggestion,
};
pub use requests::{AdviceRequest, EvaluateRequest};
pub use responses::{
    AdviceResponse, CrsResponse, ErrorResponse, HealthResponse, StatusResponse, StreamInfo,
    StreamsResponse, SuggestionsResponse, TablesResponse,
};
