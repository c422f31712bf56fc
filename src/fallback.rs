//! Default values as literals or lazily-invoked suppliers.

/// Zero-argument deferred computation producing a `T`.
pub type Supplier<T> = Box<dyn FnOnce() -> T + Send>;

/// Box a closure as a [`Supplier`].
pub fn supply<T, F>(f: F) -> Supplier<T>
where
    F: FnOnce() -> T + Send + 'static,
{
    Box::new(f)
}

/// A default value handed to a read operation: either a literal, or a
/// supplier that is invoked only when the fallback is actually needed.
pub enum Fallback<T> {
    /// A value returned as-is.
    Literal(T),
    /// A deferred computation, run at most once.
    Supplier(Supplier<T>),
}

impl<T> Fallback<T> {
    /// Wrap a closure as a lazy fallback.
    pub fn supplier<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Fallback::Supplier(Box::new(f))
    }

    /// Produce the fallback value, invoking the supplier if there is one.
    pub fn resolve(self) -> T {
        match self {
            Fallback::Literal(value) => value,
            Fallback::Supplier(f) => f(),
        }
    }
}

impl<T> From<T> for Fallback<T> {
    fn from(value: T) -> Self {
        Fallback::Literal(value)
    }
}

impl From<&str> for Fallback<String> {
    fn from(value: &str) -> Self {
        Fallback::Literal(value.to_string())
    }
}
