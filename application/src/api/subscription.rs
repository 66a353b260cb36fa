//! GraphQL [`Subscription`]s definitions.

use common::DateTime;
use futures::{
    future,
    stream::{self, BoxStream},
    FutureExt as _, StreamExt as _,
};
use juniper::graphql_subscription;

use crate::{context, Context, Error};

/// Root of all GraphQL subscriptions.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Watches the expiration of the current `UserSession`.
    ///
    /// Emits the `DateTime` the `UserSession` expires at right away, and
    /// fails once it expires.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the current `UserSession` is not
    ///                              authenticated or has expired.
    pub async fn wait_session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<DateTime, Error>>, Error> {
        let expires_at = ctx.current_session().await?.expires_at;
        let expired = tokio::time::sleep(
            expires_at.saturating_duration_since(DateTime::now()),
        )
        .map(|()| Err(context::AuthError::AuthorizationRequired.into()));

        Ok(stream::once(future::ready(Ok(expires_at)))
            .chain(stream::once(expired))
            .boxed())
    }
}
