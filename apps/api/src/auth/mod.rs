// Admin authentication.
// ID tokens are verified once at login; after that the signed session cookie
// is the only credential the API looks at.

pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod session;
