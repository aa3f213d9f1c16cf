//! venuesync - Ingest open-data food venues into a bookmarkable store list

pub mod api;
pub mod bookmark;
pub mod config;
pub mod db;
pub mod domain;
pub mod ingest;
pub mod logging;
