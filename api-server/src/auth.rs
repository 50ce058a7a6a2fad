use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use ecocity_snake_core::Identity;

pub(crate) const USER_ID_HEADER: &str = "x-user-id";
pub(crate) const USER_NAME_HEADER: &str = "x-user-name";
pub(crate) const USER_PHOTO_HEADER: &str = "x-user-photo";

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = authorization.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}

pub(crate) fn is_request_authorized(headers: &HeaderMap, expected_api_key: Option<&str>) -> bool {
    let Some(expected_api_key) = expected_api_key else {
        return true;
    };

    let x_api_key = header_str(headers, "x-api-key");
    if x_api_key == Some(expected_api_key) {
        return true;
    }

    bearer_token(headers).is_some_and(|token| token == expected_api_key)
}

/// The player forwarded by the identity provider in front of this service.
/// A missing or blank user id means the caller is anonymous.
pub(crate) fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let id = header_str(headers, USER_ID_HEADER)?;
    Some(Identity {
        id: id.to_string(),
        display_name: header_str(headers, USER_NAME_HEADER).map(str::to_string),
        photo_url: header_str(headers, USER_PHOTO_HEADER).map(str::to_string),
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
