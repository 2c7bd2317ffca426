//! Generic binding resolution.
//!
//! Answers "what is `E` of `java.lang.Iterable<E>` for a variable declared
//! as `MyList<Order>`" by walking from the supertype down to the declared
//! type and collecting the finest bounds seen on the way.

mod bound_set;
mod hierarchy;
mod resolver;

pub use bound_set::BoundSet;
pub use hierarchy::SupertypeHierarchy;
pub use resolver::TypeParameterResolver;

use naviscope_api::semantic::LookupError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The target is not a supertype, or declares fewer type parameters than requested.
    #[error("{supertype} has no type parameter #{index} reachable from the declared type")]
    OutOfBounds { supertype: String, index: usize },
    #[error("{subtype} does not declare {supertype} as a supertype")]
    IllegalHierarchy { subtype: String, supertype: String },
}
