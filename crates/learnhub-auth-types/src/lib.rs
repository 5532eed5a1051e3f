//! Auth types shared across LearnHub services.
//!
//! Provides the `IdentityHeaders` extractor for gateway-injected identity.

pub mod identity;
