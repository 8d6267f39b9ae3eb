//! # Repositories
//!
//! One repository per aggregate. Each holds a clone of the pool, so they are
//! cheap to create on demand through [`crate::Database`].
//!
//! - [`order`] - Orders and their line items

pub mod order;
