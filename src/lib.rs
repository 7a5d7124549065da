#![forbid(unsafe_code)]

pub mod error;
pub mod harness;

pub use self::{
    error::{Error, Result},
    harness::{run, Builder, Harness, HarnessReport, WorkerDescriptor, WorkerResult},
};
