//! The self-service profile view.
//!
//! The user-management guard normally requires management capability. It
//! makes exactly one exception: a user may view their own profile through
//! the named `users.show` route. Every other method, route or subject id
//! still goes through the guard.

use axum::http::Method;
use storehub_models::UserId;

/// Route name of `GET /users/{user}`.
pub const SELF_SERVICE_ROUTE: &str = "users.show";

/// Whether a request is a user viewing their own profile.
///
/// `route` is the name of the matched route and `subject` the raw `{user}`
/// path parameter.
pub fn is_self_profile_view(
    method: &Method,
    route: Option<&str>,
    subject: Option<&str>,
    requester: Option<UserId>,
) -> bool {
    if *method != Method::GET || route != Some(SELF_SERVICE_ROUTE) {
        return false;
    }

    match (subject.and_then(|raw| raw.parse::<UserId>().ok()), requester) {
        (Some(subject), Some(requester)) => subject == requester,
        _ => false,
    }
}
