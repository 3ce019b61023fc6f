//! Bearer token management.

mod pool;
mod source;
mod token;

pub use pool::{CredentialPool, TokenSnapshot};
pub use source::{HttpTokenSource, TokenSource};
pub use token::Token;
