use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, B256, U256};

use super::errors::CallError;

/// First 32-byte word of return data.
fn first_word(data: &[u8]) -> Result<B256, CallError> {
    if data.len() < 32 {
        return Err(CallError::Decode(format!(
            "expected at least 32 bytes of return data, got {}",
            data.len()
        )));
    }
    Ok(B256::from_slice(&data[..32]))
}

/// Decode an address from return data (left-padded word).
pub fn decode_address(data: &[u8]) -> Result<Address, CallError> {
    first_word(data).map(|w| Address::from_slice(&w[12..32]))
}

/// Decode a uint256 from return data.
pub fn decode_u256(data: &[u8]) -> Result<U256, CallError> {
    first_word(data).map(|w| U256::from_be_bytes(w.0))
}

/// Decode a bool from return data.
pub fn decode_bool(data: &[u8]) -> Result<bool, CallError> {
    first_word(data).map(|w| w[31] != 0)
}

/// Encode an address as a single return word (left-padded).
pub fn encode_address(addr: Address) -> Bytes {
    let mut bytes = [0u8; 32];
    bytes[12..32].copy_from_slice(addr.as_slice());
    Bytes::copy_from_slice(&bytes)
}

/// Encode a uint256 as a single return word.
pub fn encode_u256(value: U256) -> Bytes {
    Bytes::copy_from_slice(&value.to_be_bytes::<32>())
}

/// Encode a bool as a single return word.
pub fn encode_bool(value: bool) -> Bytes {
    encode_u256(U256::from(value as u8))
}

/// Address argument at `index`
pub fn arg_address(args: &[DynSolValue], index: usize) -> Result<Address, CallError> {
    args.get(index)
        .and_then(DynSolValue::as_address)
        .ok_or_else(|| CallError::Decode(format!("argument {index} is not an address")))
}

/// uint argument at `index`
pub fn arg_u256(args: &[DynSolValue], index: usize) -> Result<U256, CallError> {
    args.get(index)
        .and_then(DynSolValue::as_uint)
        .map(|(value, _)| value)
        .ok_or_else(|| CallError::Decode(format!("argument {index} is not a uint")))
}

/// bytes32 argument at `index`
pub fn arg_b256(args: &[DynSolValue], index: usize) -> Result<B256, CallError> {
    match args.get(index) {
        Some(DynSolValue::FixedBytes(word, 32)) => Ok(*word),
        _ => Err(CallError::Decode(format!("argument {index} is not a bytes32"))),
    }
}

/// Human-readable rendering of a call argument.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(a) => format!("{a}"),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", alloy_primitives::hex::encode(&word[..*size]))
        }
        DynSolValue::Bytes(bytes) => format!("0x{}", alloy_primitives::hex::encode(bytes)),
        DynSolValue::String(s) => format!("{s:?}"),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", items.iter().map(format_value).collect::<Vec<_>>().join(", "))
        }
        DynSolValue::Tuple(items) => {
            format!("({})", items.iter().map(format_value).collect::<Vec<_>>().join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_address_word() {
        let addr = crate::registry::DEV_TIMELOCK_ADDRESS;
        let encoded = encode_address(addr);
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(decode_address(&encoded).unwrap(), addr);
    }

    #[test]
    fn test_encode_decode_u256_and_bool() {
        let value = U256::from(30_000_000u64);
        assert_eq!(decode_u256(&encode_u256(value)).unwrap(), value);
        assert!(decode_bool(&encode_bool(true)).unwrap());
        assert!(!decode_bool(&encode_bool(false)).unwrap());
    }

    #[test]
    fn test_decode_short_return_data() {
        assert!(matches!(decode_u256(&[0u8; 4]), Err(CallError::Decode(_))));
        assert!(matches!(decode_bool(&[]), Err(CallError::Decode(_))));
    }

    #[test]
    fn test_argument_accessors() {
        let args = vec![
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Uint(U256::from(7), 256),
            DynSolValue::FixedBytes(B256::ZERO, 32),
        ];
        assert_eq!(arg_address(&args, 0).unwrap(), Address::ZERO);
        assert_eq!(arg_u256(&args, 1).unwrap(), U256::from(7));
        assert_eq!(arg_b256(&args, 2).unwrap(), B256::ZERO);
        assert!(arg_address(&args, 1).is_err());
        assert!(arg_u256(&args, 5).is_err());
    }

    #[test]
    fn test_format_value_nested() {
        let value = DynSolValue::Array(vec![
            DynSolValue::Uint(U256::from(1), 256),
            DynSolValue::Bool(true),
        ]);
        assert_eq!(format_value(&value), "[1, true]");
    }
}
