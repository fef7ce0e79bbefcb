//! Where users land after signing in.

use crate::facade::Authorization;

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const HOME_PATH: &str = "/";

/// A same-origin absolute path. Rejects scheme-relative (`//host`) and
/// backslash tricks so a stored intended URL cannot redirect off-site.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

/// The landing page for an identity with no intended URL.
///
/// Anyone who can reach the dashboard, administer or manage users goes to
/// `/dashboard`; clients go to `/`; everyone else to `/dashboard`.
pub fn home_for(auth: &Authorization) -> &'static str {
    if auth.can_access_dashboard() || auth.is_admin() || auth.can_manage_users() {
        DASHBOARD_PATH
    } else if auth.is_client() {
        HOME_PATH
    } else {
        DASHBOARD_PATH
    }
}

/// The stored intended URL when it is a local path, else [`home_for`].
pub fn post_login_redirect(auth: &Authorization, intended: Option<String>) -> String {
    intended
        .filter(|url| is_local_path(url))
        .unwrap_or_else(|| home_for(auth).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use storehub_core::Role;
    use storehub_models::UserId;

    fn auth_with(role: Role, active: bool) -> Authorization {
        Authorization::new(
            Identity::new(UserId::new(5), "Test", "test@example.com", active)
                .with_roles([role])
                .with_permissions(role.default_permissions()),
        )
    }

    #[test]
    fn test_intended_url_wins() {
        let auth = auth_with(Role::Client, true);
        assert_eq!(
            post_login_redirect(&auth, Some("/users/5".to_string())),
            "/users/5"
        );
    }

    #[test]
    fn test_foreign_intended_url_is_ignored() {
        let auth = auth_with(Role::Client, true);
        assert_eq!(
            post_login_redirect(&auth, Some("//evil.example.com".to_string())),
            "/"
        );
        assert_eq!(
            post_login_redirect(&auth, Some("https://evil.example.com".to_string())),
            "/"
        );
    }

    #[test]
    fn test_role_based_landing() {
        assert_eq!(home_for(&auth_with(Role::Admin, true)), "/dashboard");
        assert_eq!(home_for(&auth_with(Role::Employee, true)), "/dashboard");
        assert_eq!(home_for(&auth_with(Role::Client, true)), "/");
    }

    #[test]
    fn test_inactive_admin_still_lands_on_dashboard() {
        assert_eq!(home_for(&auth_with(Role::Admin, false)), "/dashboard");
    }

    #[test]
    fn test_identity_without_roles_falls_back_to_dashboard() {
        let auth = Authorization::new(Identity::new(UserId::new(9), "N", "n@example.com", true));
        assert_eq!(home_for(&auth), "/dashboard");
    }
}
