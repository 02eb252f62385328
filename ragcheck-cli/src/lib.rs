//! ragcheck CLI: terminal front end for the ragcheck pipelines.
//!
//! Two zero-argument binaries share this library:
//! - `rag-debug` runs the read-only inspect pipeline
//! - `rag-test` runs the ingest pipeline, which triggers content processing

pub mod console;
pub mod logging;
pub mod run;
