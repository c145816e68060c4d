//! Filter validation

use tracing::debug;

use crate::domain::Domain;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::query::Predicate;

/// Checks every predicate field against the resource's allowed filters.
///
/// Fails on the first disallowed field.
pub fn validate_filters(
    predicates: &[Predicate],
    resource: &str,
    domain: &Domain,
) -> ProjectionResult<()> {
    let descriptor = domain.descriptor(resource)?;
    match predicates.iter().find(|p| !descriptor.allows_filter(&p.field)) {
        Some(predicate) => {
            debug!(resource, field = %predicate.field, "filter rejected");
            Err(ProjectionError::FilterNotAllowed {
                field: predicate.field.clone(),
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceDescriptor;
    use serde_json::json;

    fn domain() -> Domain {
        Domain::default()
            .with_resource(ResourceDescriptor::new("books"))
            .unwrap()
            .with_resource(
                ResourceDescriptor::new("people").with_allowed_filters(["name", "age"]),
            )
            .unwrap()
            .with_resource(
                ResourceDescriptor::new("vault").with_allowed_filters(Vec::<String>::new()),
            )
            .unwrap()
    }

    #[test]
    fn test_wildcard_allows_everything() {
        let predicates = vec![Predicate::eq("anything", json!(1))];
        assert!(validate_filters(&predicates, "books", &domain()).is_ok());
    }

    #[test]
    fn test_disallowed_field() {
        let predicates = vec![
            Predicate::eq("name", json!("Ann")),
            Predicate::eq("password", json!("x")),
        ];
        let err = validate_filters(&predicates, "people", &domain()).unwrap_err();
        assert_eq!(err.to_string(), "filter on 'password' not allowed");
    }

    #[test]
    fn test_empty_allowed_list_rejects() {
        let predicates = vec![Predicate::is_null("secret")];
        assert!(validate_filters(&predicates, "vault", &domain()).is_err());
        assert!(validate_filters(&[], "vault", &domain()).is_ok());
    }

    #[test]
    fn test_unknown_resource() {
        let err = validate_filters(&[], "ghosts", &domain()).unwrap_err();
        assert_eq!(err, ProjectionError::UnknownResource("ghosts".into()));
    }
}
