use crate::{Error, ErrorType};
use axum_core::response::{IntoResponse, Response};
use http::StatusCode;

#[inline]
fn to_response<B>(status_code: StatusCode, maybe_body: Option<B>) -> Response
where
    B: IntoResponse,
{
    maybe_body.map_or_else(
        || status_code.into_response(),
        |body| (status_code, body).into_response(),
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        debug!(error = ?self.inner);

        match self.ty {
            ErrorType::InvalidArgument(maybe_body) => {
                to_response(StatusCode::BAD_REQUEST, maybe_body)
            }
            ErrorType::InvalidInputKind | ErrorType::EmptyInput => {
                StatusCode::BAD_REQUEST.into_response()
            }
            ErrorType::NotAnImage => StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response(),
            ErrorType::FeatureDisabled => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            ErrorType::Forbidden(maybe_body) => to_response(StatusCode::FORBIDDEN, maybe_body),
            ErrorType::Conflict => StatusCode::CONFLICT.into_response(),
            ErrorType::NotFound => StatusCode::NOT_FOUND.into_response(),
            ErrorType::Other(maybe_body) => {
                to_response(StatusCode::INTERNAL_SERVER_ERROR, maybe_body)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{emoji_error, ErrorType};
    use axum_core::response::IntoResponse;
    use http::StatusCode;
    use http_body_util::BodyExt;

    #[test]
    fn status_codes() {
        let cases = [
            (ErrorType::InvalidArgument(None), StatusCode::BAD_REQUEST),
            (ErrorType::NotAnImage, StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ErrorType::FeatureDisabled, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorType::Forbidden(None), StatusCode::FORBIDDEN),
            (ErrorType::Conflict, StatusCode::CONFLICT),
            (ErrorType::NotFound, StatusCode::NOT_FOUND),
        ];

        for (ty, status) in cases {
            let response = emoji_error!(type = ty, "boom").into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[tokio::test]
    async fn body_is_forwarded() {
        let response = emoji_error!(
            type = ErrorType::InvalidArgument(Some("bad shortcode".into())),
            "invalid shortcode"
        )
        .into_response();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "bad shortcode");
    }
}
