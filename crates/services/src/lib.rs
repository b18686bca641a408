#![forbid(unsafe_code)]

pub mod app_services;
pub mod confirmation;
pub mod error;
pub mod image_source;
pub mod progress_service;

pub use workbook_core::Clock;

pub use app_services::AppServices;
pub use confirmation::ResetConfirmation;
pub use error::{AppServicesError, ProgressServiceError};
pub use image_source::{FileImageSource, ImageSource};
pub use progress_service::ProgressService;
