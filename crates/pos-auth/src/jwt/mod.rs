//! Signed bearer tokens.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod service;

pub use claims::{Claims, TokenKind};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use service::{TokenPair, TokenService};
