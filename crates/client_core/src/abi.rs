//! Minimal Ethereum ABI codec for the zero-argument accessors of the price consumer contract.

use sha3::{Digest, Keccak256};
use shared::{domain::Address, protocol::PriceConsumerFunction};

use crate::error::EndpointError;

const WORD_LEN: usize = 32;

/// First 4 bytes of keccak256 over the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

pub fn encode_call(function: PriceConsumerFunction) -> String {
    format!("0x{}", hex::encode(selector(&function.signature())))
}

fn first_word(data: &str) -> Result<[u8; WORD_LEN], EndpointError> {
    let digits = data
        .strip_prefix("0x")
        .ok_or_else(|| EndpointError::decode(format!("return data missing 0x prefix: {data}")))?;
    let bytes = hex::decode(digits)
        .map_err(|err| EndpointError::decode(format!("return data is not hex: {err}")))?;
    if bytes.len() < WORD_LEN {
        return Err(EndpointError::decode(format!(
            "return data too short: expected at least {WORD_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(&bytes[..WORD_LEN]);
    Ok(word)
}

/// Decodes a two's complement `int256`. Values outside `i128` are rejected.
pub fn decode_int256(data: &str) -> Result<i128, EndpointError> {
    let word = first_word(data)?;
    let (high, low) = word.split_at(16);
    let mut low_bytes = [0u8; 16];
    low_bytes.copy_from_slice(low);
    let value = i128::from_be_bytes(low_bytes);

    let extension = if value < 0 { 0xff } else { 0x00 };
    if high.iter().any(|byte| *byte != extension) {
        return Err(EndpointError::decode("int256 value does not fit in i128"));
    }
    Ok(value)
}

pub fn decode_uint8(data: &str) -> Result<u8, EndpointError> {
    let word = first_word(data)?;
    if word[..WORD_LEN - 1].iter().any(|byte| *byte != 0) {
        return Err(EndpointError::decode("uint8 value has non-zero high bytes"));
    }
    Ok(word[WORD_LEN - 1])
}

pub fn decode_address(data: &str) -> Result<Address, EndpointError> {
    let word = first_word(data)?;
    let padding = WORD_LEN - Address::LEN;
    if word[..padding].iter().any(|byte| *byte != 0) {
        return Err(EndpointError::decode("address value has non-zero padding"));
    }
    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&word[padding..]);
    Ok(Address(bytes))
}
