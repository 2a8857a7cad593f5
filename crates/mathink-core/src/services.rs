//! Seams for the external collaborators: OCR, the math solver and the
//! text-to-markup converter.
//!
//! Hosts back these with HTTP clients, WASM bindings or test doubles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Collaborator errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Service error: {0}")]
    Other(String),
}

/// Result type for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Variables assigned by earlier solver answers, sent back with each request.
pub type Variables = BTreeMap<String, String>;

/// Body of a solver request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The flattened surface as a `data:image/png;base64,...` URI.
    pub image: String,
    pub dict_of_vars: Variables,
}

/// One solved expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverEntry {
    pub expr: String,
    pub result: String,
    /// Whether the entry assigns `result` to the variable `expr`.
    #[serde(default)]
    pub assign: bool,
}

/// Solver reply as sent over the wire: `{"data": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResponse {
    pub data: Vec<SolverEntry>,
}

impl SolverResponse {
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        serde_json::from_str(json).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

/// Body of a text-to-markup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupRequest {
    pub text: String,
}

/// Text-to-markup reply: `{"latex": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupResponse {
    pub latex: String,
}

impl MarkupResponse {
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        serde_json::from_str(json).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

/// Handwriting recognition.
pub trait OcrEngine {
    /// Recognize text in a PNG image.
    fn recognize(&self, png: Vec<u8>, language: &str) -> BoxFuture<'_, ServiceResult<String>>;
}

/// Remote math solver.
pub trait Solver {
    fn solve(&self, request: SolveRequest) -> BoxFuture<'_, ServiceResult<Vec<SolverEntry>>>;
}

/// Converts recognized text into typesettable markup.
pub trait MarkupConverter {
    fn to_markup(&self, text: &str) -> BoxFuture<'_, ServiceResult<String>>;
}
