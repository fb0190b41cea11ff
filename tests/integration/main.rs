//! Integration tests for Job-Sieve
//!
//! These tests use wiremock to stand in for the job board and the
//! classification endpoint and run the whole pipeline end-to-end.

mod pipeline_tests;
