//! Decentralized identifiers.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A `did:key` identifier for an ed25519 node key.
///
/// The pubkey is the multibase (base58-btc) encoding of the multicodec
/// ed25519 public key, which always starts with `z6Mk`.
static DID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(did:key:)?(z6Mk[1-9A-HJ-NP-Za-km-z]{44})$").expect("DID regex is valid")
});

/// A parsed, syntactically valid DID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Did {
    /// Always `did:key:`; kept so the canonical form can be reassembled.
    pub prefix: String,
    /// The multibase-encoded public key, including the leading `z`.
    pub pubkey: String,
}

impl Did {
    /// Parses a DID, with or without the `did:key:` prefix.
    ///
    /// Returns `None` when the input is not a well-formed ed25519 `did:key`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let caps = DID_RE.captures(input)?;
        Some(Self {
            prefix: "did:key:".to_string(),
            pubkey: caps.get(2)?.as_str().to_string(),
        })
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY: &str = "z6MkmzRwg47UWQxczLLLFfkEwpBGitjzJ1vKPE8U9ymd6fz6";

    #[test]
    fn test_parse_accepts_bare_and_prefixed() {
        let bare = Did::parse(PUBKEY).unwrap();
        let prefixed = Did::parse(&format!("did:key:{PUBKEY}")).unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.pubkey, PUBKEY);
        assert_eq!(bare.to_string(), format!("did:key:{PUBKEY}"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "zlatan",
            "did:key:z6Mkmz…md6fz6",
            "rad:z6MkmzRwg47UWQxczLLLFfkEwpBGitjzJ1vKPE8U9ymd6fz6",
            // base58 forbids `0`, `O`, `I` and `l`
            "z6Mk0zRwg47UWQxczLLLFfkEwpBGitjzJ1vKPE8U9ymd6fz6",
            // one character short
            "z6MkmzRwg47UWQxczLLLFfkEwpBGitjzJ1vKPE8U9ymd6fz",
        ] {
            assert!(Did::parse(input).is_none(), "{input} should not parse");
        }
    }
}
