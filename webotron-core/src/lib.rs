#![doc = "webotron-core: core logic library for webotron."]

//! This crate holds the parts of webotron that do not depend on any cloud SDK:
//! mapping a local directory onto object keys, uploading it through an
//! injected [`contract::ObjectStore`], and preparing a bucket for static
//! website hosting through a [`contract::BucketAdmin`].
//!
//! # Usage
//! The CLI crate implements the contract traits for S3 and calls
//! [`synchronise::DirectorySyncer`] and [`setup::setup_bucket`].

pub mod content_type;
pub mod contract;
pub mod error;
pub mod setup;
pub mod synchronise;
pub mod tree;
