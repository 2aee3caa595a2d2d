//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the live [`Principal`](reelhub_core::principal::Principal) from a Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but never rejects.
//! - [`rbac::RequireStaff`] -- Requires `moderator` or `admin`.
//! - [`rbac::RequireAdmin`] -- Requires `admin`.
//! - [`rbac::RequireVerified`] -- Requires a verified account.
//! - [`request_meta::ClientMeta`] -- Client ip and user agent for activity logs.

pub mod auth;
pub mod rbac;
pub mod request_meta;
