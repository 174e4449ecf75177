pub mod auth_service;
pub mod donation_service;
pub mod matching_service;
pub mod public_service;
pub mod request_service;
pub mod validation;
