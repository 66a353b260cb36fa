//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    fmt,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// Resolves once all the spawned [`Task`]s complete, or the first of them
/// fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set driving the spawned [`Task`]s.
    set: task::LocalSet,

    /// Names and handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new [`Task`] with the provided `name` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle =
            self.set.spawn_local(task.map_err(|e| BoxError::from(Box::new(e))));
        self.handles.push((name, handle));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(name, handle)| {
            handle.map(move |joined| {
                joined
                    .map_err(|e| BoxError::from(Box::new(e)))
                    .and_then(|res| res)
                    .map_err(|source| Failure { name, source })
            })
        });
        future::try_join(set.map(Ok), future::try_join_all(tasks))
            .map_ok(drop)
            .boxed_local()
    }
}

/// Failure of a [`Task`] running in the [`Background`].
#[derive(Debug)]
pub struct Failure {
    /// Name of the failed [`Task`].
    pub name: &'static str,

    /// Error the [`Task`] failed with.
    source: BoxError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` task failed: {}", self.name, self.source)
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

#[cfg(test)]
mod spec {
    use std::{fmt, future::IntoFuture as _};

    use super::Background;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[test]
    fn completes_when_all_tasks_do() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Boom>(()) });
        bg.spawn("second", async { Ok::<_, Boom>(()) });

        assert!(block_on(bg.into_future()).is_ok());
    }

    #[test]
    fn names_failed_task() {
        let mut bg = Background::default();
        bg.spawn("fine", async { Ok::<_, Boom>(()) });
        bg.spawn("broken", async { Err(Boom) });

        let err = block_on(bg.into_future()).unwrap_err();

        assert_eq!(err.name, "broken");
        assert_eq!(err.to_string(), "`broken` task failed: boom");
    }
}
