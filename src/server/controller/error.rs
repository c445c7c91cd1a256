use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{error, HttpResponse};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub(crate) enum CustomError {
    #[display("server is busy")]
    ServerIsBusy,
    #[display("invalid request")]
    BadRequest,
    #[display("menu item {_0} does not exist")]
    MenuItemNotFound(#[error(not(source))] i64),
    #[display("resource not found")]
    ResourceNotFound,
    #[display("database error")]
    DbError,
    #[display("timeout occurred")]
    Timeout,
}

impl error::ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ServerIsBusy => StatusCode::TOO_MANY_REQUESTS,
            CustomError::BadRequest => StatusCode::BAD_REQUEST,
            CustomError::MenuItemNotFound(_) | CustomError::ResourceNotFound => {
                StatusCode::NOT_FOUND
            }
            CustomError::DbError => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn not_found_identifies_the_missing_item() {
        let e = CustomError::MenuItemNotFound(999);
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(e.to_string(), "menu item 999 does not exist");
    }
}
