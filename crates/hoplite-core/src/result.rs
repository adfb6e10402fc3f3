//! Accumulating results.
//!
//! [`ConfigResult`] is a plain `Result` so `?` keeps working for dependent
//! steps. Independent steps (record fields, collection elements, batches of
//! sources) are combined with [`zip`] and [`sequence`], which keep going after
//! a failure and concatenate every failure in left-to-right order.

use crate::failure::{ConfigFailure, Failures};

pub type ConfigResult<T> = Result<T, Failures>;

/// Shorthand for a result holding exactly one failure.
pub fn fail<T>(failure: ConfigFailure) -> ConfigResult<T> {
    Err(Failures::one(failure))
}

/// Combine two independent results.
///
/// Succeeds only if both succeed; otherwise the failures of `a` are followed
/// by the failures of `b`.
pub fn zip<A, B>(a: ConfigResult<A>, b: ConfigResult<B>) -> ConfigResult<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(a), Ok(_)) => Err(a),
        (Ok(_), Err(b)) => Err(b),
        (Err(mut a), Err(b)) => {
            a.append(b);
            Err(a)
        }
    }
}

/// Combine any number of independent results, in order.
pub fn sequence<T, I>(results: I) -> ConfigResult<Vec<T>>
where
    I: IntoIterator<Item = ConfigResult<T>>,
{
    let mut values = Vec::new();
    let mut failures: Option<Failures> = None;

    for result in results {
        match (result, failures.as_mut()) {
            (Ok(value), None) => values.push(value),
            (Ok(_), Some(_)) => {}
            (Err(err), Some(acc)) => acc.append(err),
            (Err(err), None) => failures = Some(err),
        }
    }

    match failures {
        Some(failures) => Err(failures),
        None => Ok(values),
    }
}

/// Helpers for attributing failures to the place they occurred.
pub trait ConfigResultExt<T> {
    /// Wrap all failures of this result into a single attribution failure.
    fn wrap_failures<F>(self, wrap: F) -> ConfigResult<T>
    where
        F: FnOnce(Failures) -> ConfigFailure;
}

impl<T> ConfigResultExt<T> for ConfigResult<T> {
    fn wrap_failures<F>(self, wrap: F) -> ConfigResult<T>
    where
        F: FnOnce(Failures) -> ConfigFailure,
    {
        self.map_err(|failures| Failures::one(wrap(failures)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(field: &str) -> ConfigResult<i64> {
        fail(ConfigFailure::FieldFailure {
            field: field.to_string(),
            failures: Failures::one(ConfigFailure::MissingValue),
        })
    }

    fn field_names(failures: &Failures) -> Vec<String> {
        failures
            .iter()
            .filter_map(|f| match f {
                ConfigFailure::FieldFailure { field, .. } => Some(field.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_zip_success() {
        assert_eq!(zip(Ok::<_, Failures>(1), Ok::<_, Failures>("a")), Ok((1, "a")));
    }

    #[test]
    fn test_zip_concatenates_left_to_right() {
        let err = zip(missing("left"), missing("right")).unwrap_err();
        assert_eq!(field_names(&err), vec!["left", "right"]);

        let err = zip(Ok(1), missing("right")).unwrap_err();
        assert_eq!(field_names(&err), vec!["right"]);
    }

    #[test]
    fn test_sequence_collects_values() {
        let values = sequence(vec![Ok(1), Ok(2), Ok(3)]).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_sequence_keeps_every_failure() {
        let err = sequence(vec![missing("a"), Ok(2), missing("c"), missing("d")]).unwrap_err();
        assert_eq!(field_names(&err), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_sequence_of_nothing_is_empty_success() {
        let values: Vec<i64> = sequence(Vec::<ConfigResult<i64>>::new()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_wrap_failures() {
        let err = sequence(vec![missing("a"), missing("b")])
            .wrap_failures(|failures| ConfigFailure::MultipleFailures { failures })
            .unwrap_err();
        assert_eq!(err.len(), 1);
        match err.first() {
            ConfigFailure::MultipleFailures { failures } => assert_eq!(failures.len(), 2),
            other => panic!("unexpected failure {:?}", other),
        }
    }
}
