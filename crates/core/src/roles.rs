//! Role names carried in access-token claims.

/// Full access: edit sections, publish, create and restore versions.
pub const ROLE_ADMIN: &str = "admin";
