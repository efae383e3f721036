//! Orbit Server Library
//!
//! Entrez E-utilities and ClinicalTrials.gov v2 compatible endpoints in front
//! of a boolean-query literature index. The main server binary is in main.rs.
//!
//! # Modules
//!
//! - `paging`: offset/limit windows shared by every endpoint family
//! - `render`: result records and their JSON, XML and TREC encodings
//! - `search`: the search backend boundary and the in-memory reference index
//! - `entrez`, `ctgov`: endpoint logic per API family
//! - `routes`: axum routers

pub mod config;
pub mod ctgov;
pub mod entrez;
pub mod error;
pub mod paging;
pub mod render;
pub mod routes;
pub mod search;
pub mod state;
