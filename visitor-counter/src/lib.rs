// you don't want a counter invocation to crash the function
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod store;

pub use {
    handler::CounterHandler,
    store::{CounterStore, BoxedCounterStore},
};
