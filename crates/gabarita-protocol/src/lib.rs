//! Wire protocol for the Gabarita backend REST API.
//!
//! This crate defines the "language" the client and the backend speak:
//!
//! - **Types** ([`User`], [`ApiResponse`], [`AuthPayload`], etc.): the
//!   JSON documents that travel over HTTP.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those documents
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the client
//! (typed calls). It doesn't know about tokens, retries or storage.
//! It only knows how to serialize and deserialize documents.
//!
//! ```text
//! Transport (bytes) → Protocol (ApiResponse<T>) → Client (Result<T, ClientError>)
//! ```
//!
//! The backend keeps Portuguese field names on the wire (`nome`, `cargo`,
//! `plano`, ...). The Rust side uses English names and maps them with
//! `#[serde(rename)]`, so the mapping lives in exactly one place.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ApiResponse, AuthPayload, CreatePaymentRequest, DashboardData,
    Difficulty, GameQuestionsRequest, GenerateQuestionsParams, Group,
    LoginRequest, News, PaymentData, PaymentStatus, Plan, Position,
    Question, RankingEntry, RefreshPayload, RefreshRequest, SignupRequest,
    SimulationAnswer, SimulationSubmission, Syllabus, User, UserPatch,
    WeeklyPerformance,
};
