//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Error;

/// Validate and normalize a note title
///
/// ```rust
/// let title = "  Groceries ";
/// assert_eq!(parse_title(title).unwrap(), "Groceries".to_string())
/// ```
pub fn parse_title(title: &str) -> Result<String, Error> {
    let title = title.trim();

    if title.is_empty() {
        return Err(Error::bad_request("Title can not be empty"));
    }

    Ok(title.to_string())
}

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request("Data error").with_description(err))
            }
            JsonRejection::JsonSyntaxError(err) => {
                let description = std::error::Error::source(&err)
                    .map_or_else(|| err.body_text(), ToString::to_string);

                Err(Error::bad_request("JSON syntax error").with_description(description))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(err) => {
                Err(Error::bad_request("Invalid path parameter").with_description(err))
            }
            PathRejection::MissingPathParams(err) => {
                Err(Error::bad_request("Missing path parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown path error").with_description(err)),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = Path::<P>::from_request_parts(parts, state).await;

        parse_path(path).map(PathParameters)
    }
}

fn parse_query<Q>(query: Result<Query<Q>, QueryRejection>) -> Result<Q, Error> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(err) => match err {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                Err(Error::bad_request("Invalid query parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown query error").with_description(err)),
        },
    }
}

/// Wrapper for the query string extractor
pub struct QueryParameters<Q>(pub Q);

impl<S, Q> FromRequestParts<S> for QueryParameters<Q>
where
    S: Send + Sync,
    Q: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<Q>::from_request_parts(parts, state).await;

        parse_query(query).map(QueryParameters)
    }
}

/// Serde default for flags that are on unless turned off
pub fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        assert_eq!(parse_title("Groceries").unwrap(), "Groceries".to_string());
        assert_eq!(parse_title("  Groceries\n").unwrap(), "Groceries".to_string());
    }

    #[test]
    fn test_parse_title_empty() {
        assert!(parse_title("").is_err());
        assert!(parse_title(" \t\n").is_err());
    }
}
