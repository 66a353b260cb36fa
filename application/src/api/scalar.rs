//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attribute, representing a GraphQL
/// scalar as a string via the [`FromStr`] and [`Display`] impls of the `As`
/// domain type it wraps.
///
/// The scalar type must implement [`AsRef`] and [`TryFrom`] for `As`.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Outputs the scalar as a string [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the scalar out of a string [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the `input` is not a string, or it doesn't represent a valid `As`
    /// value, or the scalar can't be made of it.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let invalid = |reason: &dyn fmt::Display| {
            let name = T::name(&()).unwrap_or("scalar");
            format!("Invalid `{name}` input: {reason}")
        };

        let s = input.as_string_value().ok_or_else(|| {
            invalid(&format_args!("expected string, found: {input}"))
        })?;
        let value = s
            .parse::<As>()
            .map_err(|e| invalid(&format_args!("\"{s}\": {e}")))?;
        T::try_from(value).map_err(|e| invalid(&e))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain;

    use crate::api::user::Email;

    use super::Via;

    type EmailVia = Via<domain::user::Email>;

    #[test]
    fn parses_valid_string() {
        let email: Email = EmailVia::from_input::<_, DefaultScalarValue>(
            &InputValue::scalar("jane@example.com"),
        )
        .unwrap();

        assert_eq!(
            EmailVia::to_output::<_, DefaultScalarValue>(&email),
            Value::scalar("jane@example.com".to_owned()),
        );
    }

    #[test]
    fn rejects_non_string() {
        let err = EmailVia::from_input::<Email, DefaultScalarValue>(
            &InputValue::scalar(42),
        )
        .unwrap_err();

        assert!(err.starts_with("Invalid `UserEmail` input"), "{err}");
    }

    #[test]
    fn rejects_malformed_string() {
        assert!(EmailVia::from_input::<Email, DefaultScalarValue>(
            &InputValue::scalar("not an email"),
        )
        .is_err());
    }
}
