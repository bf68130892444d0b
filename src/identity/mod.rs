//! # Meter Identity
//!
//! The address group (`ADCO` in historic mode, `ADSC` in standard mode) carries
//! the 12 character EURIDIS address of the meter:
//!
//! ```text
//! CC YY TT NNNNNN
//! |  |  |  +------ registration number
//! |  |  +--------- device type code
//! |  +------------ construction year (20YY)
//! +--------------- constructor code
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use linky_tic::identity::decode_address;
//!
//! let identity = decode_address("041876098765").unwrap();
//! assert_eq!(identity.construction_year(), Some(2018));
//! assert_eq!(identity.type_code.as_deref(), Some("76"));
//! assert_eq!(identity.registration_number.as_deref(), Some("098765"));
//! ```

pub mod tables;

use crate::constants::{EURIDIS_ADDRESS_LEN, EXPERIMENTAL_DEVICE_TYPES};
use crate::error::TicError;
use log::{debug, warn};
use nom::{bytes::complete::take, combinator::rest, sequence::tuple, IResult};
use serde::Serialize;

pub use tables::{constructor_name, device_type_name};

/// Decoded EURIDIS address. Every field is empty until an address is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    pub constructor_code: Option<String>,
    /// `None` when the code is unassigned.
    pub constructor: Option<&'static str>,
    /// Two digit year, as transmitted.
    pub year: Option<String>,
    pub type_code: Option<String>,
    /// `None` when the code is unassigned.
    pub device_type: Option<&'static str>,
    pub registration_number: Option<String>,
}

impl DeviceIdentity {
    /// Construction year, in the 2000s.
    pub fn construction_year(&self) -> Option<u16> {
        self.year
            .as_deref()
            .and_then(|yy| yy.parse::<u16>().ok())
            .map(|yy| 2000 + yy)
    }

    /// Pilot meters, which emit a few tags differently in standard mode.
    pub fn is_experimental(&self) -> bool {
        self.type_code
            .as_deref()
            .is_some_and(|code| EXPERIMENTAL_DEVICE_TYPES.contains(&code))
    }
}

fn address_fields(input: &str) -> IResult<&str, (&str, &str, &str, &str)> {
    tuple((take(2usize), take(2usize), take(2usize), rest))(input)
}

/// Decodes a meter address into its identity.
///
/// Unknown constructor or device type codes are kept with no name.
pub fn decode_address(address: &str) -> Result<DeviceIdentity, TicError> {
    let len = address.chars().count();
    if len != EURIDIS_ADDRESS_LEN || !address.is_ascii() {
        return Err(TicError::InvalidAddressLength {
            len,
            address: address.to_string(),
        });
    }

    let (_, (constructor_code, year, type_code, registration_number)) = address_fields(address)
        .map_err(|_| TicError::InvalidAddressLength {
            len,
            address: address.to_string(),
        })?;

    let constructor = constructor_name(constructor_code);
    if constructor.is_none() {
        warn!("Constructor code is unknown: {constructor_code}");
    }
    let device_type = device_type_name(type_code);
    if device_type.is_none() {
        warn!("Device type is unknown: {type_code}");
    }

    let identity = DeviceIdentity {
        constructor_code: Some(constructor_code.to_string()),
        constructor,
        year: Some(year.to_string()),
        type_code: Some(type_code.to_string()),
        device_type,
        registration_number: Some(registration_number.to_string()),
    };
    debug!("Parsed address {address}: {identity:?}");
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_address() {
        let id = decode_address("041876098765").unwrap();
        assert_eq!(id.constructor_code.as_deref(), Some("04"));
        assert_eq!(
            id.constructor,
            Some("LANDIS ET GYR / SIEMENS METERING / LANDIS+GYR")
        );
        assert_eq!(id.year.as_deref(), Some("18"));
        assert_eq!(id.type_code.as_deref(), Some("76"));
        assert!(id.device_type.is_some());
        assert!(!id.is_experimental());
    }

    #[test]
    fn test_unknown_codes_keep_the_code() {
        let id = decode_address("991899000001").unwrap();
        assert_eq!(id.constructor_code.as_deref(), Some("99"));
        assert_eq!(id.constructor, None);
        assert_eq!(id.type_code.as_deref(), Some("99"));
        assert_eq!(id.device_type, None);
        assert_eq!(id.registration_number.as_deref(), Some("000001"));
    }

    #[test]
    fn test_experimental_device() {
        let id = decode_address("022067000042").unwrap();
        assert!(id.is_experimental());
        assert_eq!(id.construction_year(), Some(2020));
    }

    #[test]
    fn test_wrong_length() {
        for address in ["", "0418760987", "0418760987651"] {
            match decode_address(address) {
                Err(TicError::InvalidAddressLength { len, .. }) => assert_eq!(len, address.len()),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_default_identity_is_empty() {
        let id = DeviceIdentity::default();
        assert_eq!(id.construction_year(), None);
        assert!(!id.is_experimental());
    }
}
