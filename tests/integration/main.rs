//! End-to-end tests over the assembled security pipeline.

mod helpers;

mod gate_test;
mod pipeline_test;
mod ratelimit_test;
mod session_test;
