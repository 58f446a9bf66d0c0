//! Liability-form documents.
//!
//! Validated form data is mapped to one of three fixed layouts
//! ([`liability`]) and then serialized by a [`DocumentRenderer`]
//! ([`renderer`]).

pub mod liability;
pub mod renderer;

pub use liability::{
    build_document, validate, DocumentField, DocumentPage, DocumentSection, FormDocument,
    FormLayout, LiabilityFormData,
};
pub use renderer::{
    render_document, DocumentRenderer, JsonRenderer, RenderFormat, RenderedDocument, TextRenderer,
};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown document format: {0}")]
    UnknownFormat(String),

    #[error("Failed to render document: {0}")]
    Render(String),
}
