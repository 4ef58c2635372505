//! picsys-core: form state, request building, and result analysis (sans-IO).
//!
//! Models everything the picsys front end knows about the remote
//! image-processing service:
//!
//! - the closed [`Operation`] catalog and its parameter schema,
//! - the user's [`Selection`] of operations and parameter values,
//! - the multipart [`RequestPayload`] sent to the service,
//! - the RGB [`Histogram`] derived from the returned image.
//!
//! This crate has **no I/O dependencies**. The browser transport lives in
//! `picsys-io` and the native one in `picsys-cli`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod histogram;
pub mod params;
pub mod request;
pub mod selection;

pub use catalog::{Category, Operation, resolve_wire_key};
pub use config::ServiceConfig;
pub use error::PicsysError;
pub use histogram::{Channel, Histogram};
pub use params::{ParamSet, ParamSpec};
pub use request::{FieldValue, FormField, RequestPayload, SourceImage, SourceImages};
pub use selection::Selection;
