//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// The same type usually implements [`Handler`] many times, once per each
/// kind of `Args` it understands.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
