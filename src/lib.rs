//! Mail classifier — pipeline stage that tags mail with a classification guess.

pub mod builder;
pub mod config;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod mail;
pub mod model;
pub mod stage;
