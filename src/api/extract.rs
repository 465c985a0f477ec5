use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::{web, FromRequest, HttpRequest};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body where an absent body, or one not sent as JSON, reads
/// as `{}`. Only a JSON body that fails to parse is rejected.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

fn is_missing_body(err: &JsonPayloadError) -> bool {
    match err {
        JsonPayloadError::ContentType => true,
        JsonPayloadError::Deserialize(err) => err.is_eof() && err.line() == 1 && err.column() == 0,
        _ => false,
    }
}

impl<T: DeserializeOwned + Default + 'static> FromRequest for JsonBody<T> {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            match json.await {
                Ok(body) => Ok(JsonBody(body.into_inner())),
                Err(err) => match err.as_error::<JsonPayloadError>() {
                    Some(payload_err) if is_missing_body(payload_err) => Ok(JsonBody(T::default())),
                    _ => {
                        tracing::debug!(error = %err, "rejected request body");
                        Err(ApiError::InvalidBody)
                    }
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Default, Debug, PartialEq)]
    struct Body {
        title: Option<String>,
    }

    async fn extract(req: actix_web::test::TestRequest) -> Result<Body, ApiError> {
        let (req, mut payload) = req.to_http_parts();
        JsonBody::<Body>::from_request(&req, &mut payload)
            .await
            .map(JsonBody::into_inner)
    }

    #[actix_web::test]
    async fn test_missing_body_reads_as_empty_object() {
        let body = extract(actix_web::test::TestRequest::post()).await.unwrap();
        assert_eq!(body, Body::default());

        let req = actix_web::test::TestRequest::post()
            .insert_header(("content-type", "application/json"));
        assert_eq!(extract(req).await.unwrap(), Body::default());

        let req = actix_web::test::TestRequest::post()
            .insert_header(("content-type", "text/plain"))
            .set_payload("title=ignored");
        assert_eq!(extract(req).await.unwrap(), Body::default());
    }

    #[actix_web::test]
    async fn test_unparsable_json_is_rejected() {
        for payload in ["{not json", "{\"title\":", "[1, 2]"] {
            let req = actix_web::test::TestRequest::post()
                .insert_header(("content-type", "application/json"))
                .set_payload(payload);
            assert!(matches!(extract(req).await, Err(ApiError::InvalidBody)));
        }
    }

    #[actix_web::test]
    async fn test_json_body_is_parsed() {
        let req = actix_web::test::TestRequest::post().set_json(serde_json::json!({ "title": "t" }));
        let body = extract(req).await.unwrap();
        assert_eq!(body.title.as_deref(), Some("t"));
    }
}
