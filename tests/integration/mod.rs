//! Integration tests module
//!
//! This module organizes all integration tests for the r-playdeck application.

// Import individual test modules
pub mod config_test;
pub mod library_test;
pub mod playback_flow_test;
