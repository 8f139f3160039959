use alloy_dyn_abi::DynSolType;
use alloy_primitives::keccak256;
use std::fmt;

use super::errors::ProposalError;

/// Compute the Solidity function selector (first 4 bytes of keccak256(signature)).
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// A parsed `name(type1,type2)` method signature.
///
/// Parameter types are normalized, so `transfer(address,uint)` and
/// `transfer(address, uint256)` share the canonical form
/// `transfer(address,uint256)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    name: String,
    params: Vec<DynSolType>,
    canonical: String,
}

impl MethodSignature {
    /// Parse and normalize a signature.
    pub fn parse(signature: &str) -> Result<Self, ProposalError> {
        let invalid = |reason: &str| ProposalError::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = signature.trim();
        let open = trimmed.find('(').ok_or_else(|| invalid("missing '('"))?;
        if !trimmed.ends_with(')') {
            return Err(invalid("missing closing ')'"));
        }

        let name = &trimmed[..open];
        let valid_name = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid_name {
            return Err(invalid("method name is not an identifier"));
        }

        let inner: String =
            trimmed[open + 1..trimmed.len() - 1].chars().filter(|c| !c.is_whitespace()).collect();
        let params = if inner.is_empty() {
            Vec::new()
        } else {
            match DynSolType::parse(&format!("({inner})")) {
                Ok(DynSolType::Tuple(types)) => types,
                Ok(_) => return Err(invalid("parameter list is not a tuple")),
                Err(e) => return Err(invalid(&e.to_string())),
            }
        };

        let canonical = format!(
            "{name}({})",
            params.iter().map(|t| t.sol_type_name().into_owned()).collect::<Vec<_>>().join(",")
        );

        Ok(Self {
            name: name.to_string(),
            params,
            canonical,
        })
    }

    /// Method name without the parameter list
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in order
    pub fn params(&self) -> &[DynSolType] {
        &self.params
    }

    /// Canonical `name(type,...)` form
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// 4-byte selector of the canonical form
    pub fn selector(&self) -> [u8; 4] {
        function_selector(&self.canonical)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_selector_known_values() {
        // transfer(address,uint256) = 0xa9059cbb
        assert_eq!(function_selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        // balanceOf(address) = 0x70a08231
        assert_eq!(function_selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_parse_no_params() {
        let sig = MethodSignature::parse("acceptAdmin()").unwrap();
        assert_eq!(sig.name(), "acceptAdmin");
        assert!(sig.params().is_empty());
        assert_eq!(sig.canonical(), "acceptAdmin()");
    }

    #[test]
    fn test_parse_normalizes_types_and_whitespace() {
        let sig = MethodSignature::parse("transfer(address, uint)").unwrap();
        assert_eq!(sig.canonical(), "transfer(address,uint256)");
        assert_eq!(sig.params(), &[DynSolType::Address, DynSolType::Uint(256)]);
        assert_eq!(sig.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_parse_array_and_tuple_params() {
        let sig = MethodSignature::parse("multicall(address[],(uint256,bool))").unwrap();
        assert_eq!(sig.params().len(), 2);
        assert_eq!(sig.canonical(), "multicall(address[],(uint256,bool))");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["acceptAdmin", "acceptAdmin(", "(address)", "1abc()", "set(notatype)"] {
            let err = MethodSignature::parse(bad).unwrap_err();
            assert!(
                matches!(err, ProposalError::InvalidSignature { .. }),
                "expected InvalidSignature for {bad}"
            );
        }
    }
}
