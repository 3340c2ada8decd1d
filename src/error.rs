//! Error types for building and cloning flatview buffers.
//!
//! Reading is deliberately unchecked: element access trusts the counts stored in the buffer,
//! and an out-of-range index faults the same way slice indexing does. The errors in this
//! module cover the operations that *can* fail in a recoverable way.
//!
//! ## Error Categories
//!
//! - **Builder misuse**: opening a vector or table while another one is open, closing one
//!   that was never opened, or writing after [`Builder::finish`](crate::Builder::finish)
//! - **Resource limits**: clone recursion deeper than the configured limit, or a buffer
//!   that would exceed [`MAX_BUFFER_SIZE`](crate::format::MAX_BUFFER_SIZE)
//! - **Checked reads**: the opt-in union resolution that validates the discriminant
//! - **Adapter misuse**: copying a list into a slice that is too short
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{Builder, Error};
//!
//! let mut builder = Builder::new();
//! let result = builder.end_vector();
//! assert!(matches!(result, Err(Error::NotNested { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all errors that can occur while building or cloning a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A clone descended past the configured depth limit
    #[error("Clone recursion exceeded the depth limit of {limit}")]
    RecursionLimit { limit: usize },

    /// A vector, table or string was started while another vector or table was open
    #[error("Cannot {operation} while a vector or table is under construction")]
    NestedConstruction { operation: &'static str },

    /// An operation that needs an open vector or table found none
    #[error("Cannot {operation}: no vector or table is under construction")]
    NotNested { operation: &'static str },

    /// The builder was used after it produced its finished buffer
    #[error("Builder already finished; call reset() before building again")]
    AlreadyFinished,

    /// The finished buffer was requested before [`Builder::finish`](crate::Builder::finish)
    #[error("Builder has not been finished")]
    NotFinished,

    /// Growing the buffer would exceed the format's size limit
    #[error("Buffer of {requested} bytes exceeds the maximum buffer size")]
    BufferTooLarge { requested: usize },

    /// A checked union resolution found a different discriminant than expected
    #[error("Union type mismatch: expected {expected}, found {found}")]
    UnionTypeMismatch { expected: String, found: String },

    /// A copy target cannot hold all elements
    #[error("Destination too small: need {needed} slots, {available} available")]
    DestinationTooSmall { needed: usize, available: usize },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a nesting error for an operation attempted while another object is open.
    pub fn nested(operation: &'static str) -> Self {
        Error::NestedConstruction { operation }
    }

    /// Creates an error for an operation that requires an open vector or table.
    pub fn not_nested(operation: &'static str) -> Self {
        Error::NotNested { operation }
    }

    /// Creates a union mismatch error from the two discriminants.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatview::Error;
    ///
    /// let err = Error::union_mismatch(1u8, 2u8);
    /// assert_eq!(err.to_string(), "Union type mismatch: expected 1, found 2");
    /// ```
    pub fn union_mismatch<E: fmt::Debug>(expected: E, found: E) -> Self {
        Error::UnionTypeMismatch {
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatview::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
