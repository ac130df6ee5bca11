//! Signed token encoding and decoding.

pub mod claims;
pub mod codec;

pub use claims::{Claims, TokenKind};
pub use codec::{IssuedPair, IssuedToken, TokenCodec, TokenPair};
