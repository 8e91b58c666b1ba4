//! Auth Adapter - Google Cloud 访问令牌

mod google_credentials;

pub use google_credentials::*;
