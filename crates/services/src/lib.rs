#![forbid(unsafe_code)]

pub mod activity_service;
pub mod app_services;
pub mod declaration_service;
pub mod error;
pub mod provider;
pub mod reconciler;
pub mod reporter;

pub use study_core::Clock;

pub use activity_service::{ActivityService, ActivityTracking, StartedActivity};
pub use app_services::{AppServices, AppServicesError};
pub use declaration_service::DeclarationService;
pub use error::{ActivityError, ReconcileError};
pub use provider::RegistryContextProvider;
pub use reconciler::Reconciler;
pub use reporter::{ErrorReporter, TracingReporter};
