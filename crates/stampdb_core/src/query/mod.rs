//! Multi-predicate search.
//!
//! A [`Criteria`] set names fields and the predicate each must satisfy. The
//! store compiles it with [`Filter::compile_with`] into a `WHERE` clause built
//! only from registry column names and `?` placeholders.

mod criteria;
mod filter;

pub use criteria::{Criteria, Predicate, Scalar};
pub use filter::Filter;
