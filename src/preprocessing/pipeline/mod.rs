//! Post-processing steps chained after a generator.
//!
//! A generator owns a [`PostChain`] of [`TableStep`] trait objects and runs it
//! on every table it produces, during fitting and on later transforms.
//!
//! # Example
//! ```ignore
//! let mut chain = PostChain::new();
//! chain.push(Arc::new(MyStep));
//! chain.prepend(Arc::new(CategoryMemoryMinimize::new())); // runs first
//! let out = chain.run(table)?;
//! ```

mod memory_minimize;
mod step;

pub use memory_minimize::CategoryMemoryMinimize;
pub use step::{PostChain, TableStep};
