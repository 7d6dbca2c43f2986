//! Deployment-cell amenities workflow for `omnistrate-ctl`.
//!
//! ```text
//! TemplateTarget ── resolve_template ──► DeploymentCellTemplate
//!
//! check_drift ──► DriftStatus
//!     │
//!     ▼
//! sync_cell   ──► pending changes staged on the platform
//!     │
//!     ▼
//! apply_pending_changes ──► live configuration
//! ```
//!
//! All platform access goes through [`api::PlatformApi`]; [`http::HttpPlatform`]
//! is the REST implementation.

pub mod amenity;
pub mod api;
pub mod apply;
pub mod auth;
pub mod cell;
pub mod config;
pub mod confirm;
mod de;
pub mod drift;
pub mod error;
pub mod http;
pub mod io;
pub mod paths;
pub mod status;
pub mod sync;
pub mod template;
pub mod types;

pub use error::{CtlError, Result};
