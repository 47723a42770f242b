//! Remote reunion analysis: request formatting, transport, response decoding and
//! the closed error taxonomy surfaced to users.

mod client;
mod error;
mod notice;
mod response;
mod transport;

pub use client::{
    decode_backend_response, decode_relay_response, AnalysisClient, BackendAnalysisClient,
    RelayAnalysisClient,
};
pub use error::{AnalyzeError, AnalyzeErrorCode};
pub use notice::{ErrorNotice, NoticeTone};
pub use response::{
    FactorAnalysis, FactorScore, FinalAdvice, MaintenanceTip, PartnerPsychology,
    RelationshipMaintenance, ReunionAnalysis, ReunionRequirements,
};
pub use transport::{
    AnalysisTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
    API_KEY_HEADER,
};
