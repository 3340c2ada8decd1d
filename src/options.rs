//! Configuration options for the [`Builder`](crate::Builder).
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{Builder, BuilderOptions};
//!
//! // Start larger and refuse to clone deeper than 16 levels
//! let options = BuilderOptions::new()
//!     .with_initial_capacity(64 * 1024)
//!     .with_max_depth(16);
//! let builder = Builder::with_options(options);
//! assert_eq!(builder.options().max_depth, 16);
//! ```

/// Default starting size of the builder's buffer, in bytes.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Default clone recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for a [`Builder`](crate::Builder).
///
/// # Examples
///
/// ```rust
/// use flatview::BuilderOptions;
///
/// let options = BuilderOptions::default();
/// assert_eq!(options.initial_capacity, 1024);
/// assert_eq!(options.max_depth, 64);
/// assert!(!options.force_defaults);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Starting buffer size in bytes. The buffer doubles whenever it runs out of room.
    pub initial_capacity: usize,
    /// How many vector and table levels a single clone may descend before it fails with
    /// [`Error::RecursionLimit`](crate::Error::RecursionLimit).
    pub max_depth: usize,
    /// Write scalar table fields even when they equal their default value.
    pub force_defaults: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            force_defaults: false,
        }
    }
}

impl BuilderOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting buffer size in bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatview::BuilderOptions;
    ///
    /// let options = BuilderOptions::new().with_initial_capacity(16);
    /// assert_eq!(options.initial_capacity, 16);
    /// ```
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the clone recursion limit.
    ///
    /// Schemas nest only as deep as their definitions, so the default is generous. Lower it
    /// when cloning buffers from untrusted sources.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Controls whether scalar fields equal to their default are still written.
    #[must_use]
    pub fn with_force_defaults(mut self, force: bool) -> Self {
        self.force_defaults = force;
        self
    }
}
