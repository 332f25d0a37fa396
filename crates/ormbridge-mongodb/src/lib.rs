//! # ormbridge-mongodb
//!
//! Schema grammar and processor for document stores.
//!
//! Document databases create collections lazily and carry no relational
//! schema, so [`MongoGrammar`] compiles every blueprint to nothing and
//! [`MongoProcessor`] reports no columns, indexes or foreign keys. They
//! let a migration engine written against `ormbridge-contracts` run
//! unchanged against such a store.
//!
//! ```rust
//! use ormbridge_contracts::{Blueprint, Grammar};
//! use ormbridge_mongodb::MongoGrammar;
//!
//! let blueprint = Blueprint::new("users").create();
//! assert!(MongoGrammar::new().compile_blueprint(&blueprint, &[]).is_empty());
//! ```

mod grammar;
mod processor;

pub use grammar::MongoGrammar;
pub use processor::MongoProcessor;
