//! Docconv Server Library
//!
//! Converts uploaded RTF and DOCX documents to plain text over HTTP.
//! The server binary is in main.rs; everything it wires together lives
//! here so tests and benchmarks can reach it.
//!
//! # Modules
//!
//! - `document`: Format-agnostic types, errors and the extractor trait
//! - `formats`: RTF pipeline and DOCX extractor
//! - `convert`: Format routing for uploads
//! - `routes`: HTTP endpoints

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod formats;
pub mod routes;
pub mod state;
