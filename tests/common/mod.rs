//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fake_solr;
pub mod fixtures;
pub mod harness;
