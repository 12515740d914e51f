//! The polled operation and its gate.
//!
//! - [`Factory`] — trait for the asynchronous operation a poll invokes
//! - [`FactoryFn`] — closure adapter
//! - [`Gate`] — optional asynchronous predicate delaying the first tick

#[allow(clippy::module_inception)]
mod factory;
mod factory_fn;

pub use factory::{BoxFactoryFuture, Factory, FactoryRef, Gate};
pub use factory_fn::FactoryFn;
