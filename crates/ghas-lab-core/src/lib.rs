pub mod config;
pub mod error;
pub mod lab;
pub mod participants;
pub mod templates;

pub use error::{LabError, Result};
pub use lab::{org_login, LabSpec};
pub use templates::TemplateRepo;
