//! Identity resolution.
//!
//! Maps a caller credential to a stable voter address. The engine never
//! reads an ambient "current account"; every write receives an explicit,
//! already-resolved identity.

use crate::error::GovernanceError;
use kalina_types::Address;

/// A caller credential as supplied by the outer layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Encoded address string: Bech32m ("kln1...") or hex ("0x...")
    Encoded(String),
    /// Raw ed25519 public key
    PublicKey([u8; 32]),
}

/// Resolves caller credentials to voter addresses.
///
/// Authentication (proving possession of the credential) is the outer
/// layer's concern; resolution only has to be stable and injective so that
/// one-ballot-per-identity holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a credential to a voter address.
    ///
    /// The zero address is reserved and never a valid identity.
    pub fn resolve(&self, credential: &Credential) -> Result<Address, GovernanceError> {
        let address = match credential {
            Credential::Encoded(s) => s
                .parse::<Address>()
                .map_err(|e| GovernanceError::InvalidCredential(e.to_string()))?,
            Credential::PublicKey(pubkey) => Address::from_public_key(pubkey),
        };

        if address.is_zero() {
            return Err(GovernanceError::InvalidCredential(
                "the zero address is not a valid identity".to_string(),
            ));
        }

        Ok(address)
    }
}
