//! Generation strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How single bits are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Linear-algebra emulation of a qubit measurement.
    PseudoRandom,
    /// Coin-flip circuit on the local simulator.
    Simulate,
    /// Coin-flip circuit on IBM Quantum hardware.
    Real,
}

impl Method {
    /// Every method, in presentation order.
    pub const ALL: [Method; 3] = [Method::PseudoRandom, Method::Simulate, Method::Real];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::PseudoRandom => "pseudo-random",
            Method::Simulate => "simulate",
            Method::Real => "real",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Method::PseudoRandom => "Pseudo Random (Matrix Ops)",
            Method::Simulate => "Statevector Simulator",
            Method::Real => "Real IBM Hardware",
        }
    }

    /// File-name stem for written summaries.
    pub fn slug(&self) -> &'static str {
        match self {
            Method::PseudoRandom => "pseudo_random",
            Method::Simulate => "simulate",
            Method::Real => "real",
        }
    }

    /// Whether the method needs network access.
    pub fn is_remote(&self) -> bool {
        matches!(self, Method::Real)
    }

    /// Derives this method's RNG seed from a shared user seed.
    ///
    /// The emulator and the simulator compare their draw against opposite
    /// outcome probabilities, so feeding both the same stream yields
    /// bitwise complements. Each method gets its own salt instead.
    pub fn stream_seed(&self, seed: u64) -> u64 {
        let salt = match self {
            Method::PseudoRandom => 0x9E37_79B9_7F4A_7C15,
            Method::Simulate => 0xBF58_476D_1CE4_E5B9,
            Method::Real => 0x94D0_49BB_1331_11EB,
        };
        seed ^ salt
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown method '{0}' (expected pseudo-random, simulate or real)")]
pub struct ParseMethodError(pub String);

/// Accepts the canonical names plus the aliases `pseudo`, `pseudo_random`,
/// `sim`, `simulator`, `ibm` and `hardware`, case-insensitively.
impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pseudo-random" | "pseudo_random" | "pseudo" => Ok(Method::PseudoRandom),
            "simulate" | "sim" | "simulator" => Ok(Method::Simulate),
            "real" | "hardware" | "ibm" => Ok(Method::Real),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
        assert_eq!("SIM".parse::<Method>().unwrap(), Method::Simulate);
        assert_eq!(Method::PseudoRandom.to_string(), "pseudo-random");
    }

    #[test]
    fn test_aliases() {
        for (alias, method) in [
            ("pseudo", Method::PseudoRandom),
            ("pseudo_random", Method::PseudoRandom),
            ("simulator", Method::Simulate),
            ("ibm", Method::Real),
            ("Hardware", Method::Real),
        ] {
            assert_eq!(alias.parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_stream_seeds_differ_per_method() {
        for seed in [0, 7, u64::MAX] {
            let seeds: Vec<u64> = Method::ALL.iter().map(|m| m.stream_seed(seed)).collect();
            assert_ne!(seeds[0], seeds[1]);
            assert_ne!(seeds[0], seeds[2]);
            assert_ne!(seeds[1], seeds[2]);
        }
        assert_eq!(Method::Simulate.stream_seed(7), Method::Simulate.stream_seed(7));
    }

    #[test]
    fn test_unknown_method() {
        let err = "quantum-ish".parse::<Method>().unwrap_err();
        assert_eq!(err, ParseMethodError("quantum-ish".into()));
        assert!(err.to_string().contains("quantum-ish"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Method::PseudoRandom).unwrap();
        assert_eq!(json, "\"pseudo-random\"");
        let back: Method = serde_json::from_str("\"real\"").unwrap();
        assert_eq!(back, Method::Real);
        assert!(back.is_remote());
    }
}
