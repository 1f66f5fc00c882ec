//! Concrete image analysis adapters

pub mod google;

pub use google::GoogleVisionClient;
