/// Router Module Index
///
/// Organizes the routing logic into security-segregated modules so access
/// control is applied explicitly at the module level (via Axum layers and
/// per-handler role checks), preventing accidental exposure of protected
/// endpoints.
///
/// The three modules map directly to the defined access tiers.

/// Routes accessible to all clients (anonymous, read-only).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated user identity, any role.
pub mod authenticated;

/// Routes whose handlers additionally require the 'admin' or 'super_admin'
/// role. Authorization is enforced inside the handlers, before any data
/// access.
pub mod admin;
