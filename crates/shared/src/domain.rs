use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::HexValueError;

/// Number of decimal places the contract scales prices by.
pub const PRICE_DECIMALS: u32 = 8;
pub const PRICE_SCALE: i128 = 10i128.pow(PRICE_DECIMALS);

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xa795BFbDD4d47873C45929F03A74d3659ff634dB";
pub const DEFAULT_PAIR_LABEL: &str = "AVAX/USD";

macro_rules! hex_newtype {
    ($name:ident, $len:expr, $kind:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = HexValueError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let trimmed = raw.trim();
                let digits = trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                    .ok_or_else(|| HexValueError::MissingPrefix {
                        kind: $kind,
                        value: trimmed.to_string(),
                    })?;
                if digits.len() != $len * 2 {
                    return Err(HexValueError::WrongLength {
                        kind: $kind,
                        expected: $len * 2,
                        actual: digits.len(),
                    });
                }
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(digits, &mut bytes).map_err(|err| {
                    HexValueError::InvalidDigits {
                        kind: $kind,
                        reason: err.to_string(),
                    }
                })?;
                Ok(Self(bytes))
            }
        }

        impl TryFrom<String> for $name {
            type Error = HexValueError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }
    };
}

hex_newtype!(Address, 20, "address");
hex_newtype!(TxHash, 32, "transaction hash");

/// Raw integer price as held by the contract, scaled by [`PRICE_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredPrice {
    pub raw: i128,
}

impl StoredPrice {
    pub fn from_raw(raw: i128) -> Self {
        Self { raw }
    }

    pub fn as_decimal(&self) -> f64 {
        self.raw as f64 / PRICE_SCALE as f64
    }
}

impl fmt::Display for StoredPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_scaled(self.raw, PRICE_DECIMALS))
    }
}

/// Exact decimal rendering of `raw / 10^decimals` with trailing zeros trimmed.
pub fn format_scaled(raw: i128, decimals: u32) -> String {
    let sign = if raw < 0 { "-" } else { "" };
    let decimals = decimals as usize;
    let digits = format!("{:0width$}", raw.unsigned_abs(), width = decimals + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    }
}

/// Remaining read accessors of the price consumer contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDetails {
    pub decimals: u8,
    pub latest_price: i128,
    pub stored_price: StoredPrice,
    pub price_feed: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_price_renders_exact_decimal() {
        assert_eq!(StoredPrice::from_raw(1_234_500_000_000).to_string(), "12345");
        assert_eq!(StoredPrice::from_raw(1_234_567_890).to_string(), "12.3456789");
        assert_eq!(StoredPrice::from_raw(5).to_string(), "0.00000005");
        assert_eq!(StoredPrice::from_raw(-250_000_000).to_string(), "-2.5");
        assert_eq!(StoredPrice::from_raw(0).to_string(), "0");
    }

    #[test]
    fn format_scaled_is_exact_for_any_decimals() {
        assert_eq!(format_scaled(2_150, 2), "21.5");
        assert_eq!(format_scaled(123_456_789_012_345_678, 18), "0.123456789012345678");
        assert_eq!(format_scaled(-7, 0), "-7");
        assert_eq!(format_scaled(1, 40), format!("0.{}1", "0".repeat(39)));
    }

    #[test]
    fn stored_price_decimal_divides_by_scale() {
        let price = StoredPrice::from_raw(3_512_340_000);
        assert_eq!(price.as_decimal(), 3_512_340_000f64 / 1e8);
    }

    #[test]
    fn contract_address_parses_mixed_case_and_renders_lowercase() {
        let address: Address = DEFAULT_CONTRACT_ADDRESS.parse().expect("address");
        assert_eq!(
            address.to_string(),
            "0xa795bfbdd4d47873c45929f03a74d3659ff634db"
        );
    }

    #[test]
    fn contract_address_rejects_missing_prefix_and_bad_length() {
        assert!(matches!(
            "a795BFbDD4d47873C45929F03A74d3659ff634dB".parse::<Address>(),
            Err(HexValueError::MissingPrefix { .. })
        ));
        assert!(matches!(
            "0xa795".parse::<Address>(),
            Err(HexValueError::WrongLength {
                expected: 40,
                actual: 4,
                ..
            })
        ));
        assert!(matches!(
            "0xzz95BFbDD4d47873C45929F03A74d3659ff634dB".parse::<Address>(),
            Err(HexValueError::InvalidDigits { .. })
        ));
    }

    #[test]
    fn tx_hash_serializes_as_hex_string() {
        let hash = TxHash([0xab; 32]);
        let json = serde_json::to_string(&hash).expect("serialize");
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(32)));
        let back: TxHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, hash);
    }
}
