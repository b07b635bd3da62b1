use thiserror::Error;

use crate::object::Key;
use crate::value::Value;

pub type PResult<T> = Result<T, PropErr>;

#[derive(Error, Debug)]
pub enum PropErr {
    #[error(transparent)]
    Any(#[from] anyhow::Error),

    /// a getter or setter failed with a plain value
    #[error("Uncaught {0}")]
    Thrown(Value),

    #[error("Cannot assign to read only property '{0}'")]
    ReadOnly(Key),

    #[error("Cannot redefine property: {0}")]
    NonConfigurable(Key),

    #[error("Member '{0}' has no getter to make lazy")]
    NoGetter(Key),
}
