//! Integration test suite for the record repository.
//!
//! 1. CRUD scenarios against a CSV file
//! 2. File-level persistence behavior
//! 3. Concurrent sessions sharing one repository

pub mod concurrency_tests;
pub mod crud_tests;
pub mod persistence_tests;
