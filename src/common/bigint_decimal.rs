// serde helper encoding a BigInt as a decimal string, for use with
// `#[serde(with = "bigint_decimal")]` on any field that needs a BigInt
// round-tripped through JSON. Decimal strings, never native JSON numbers.

use num_bigint_dig::BigInt;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    let s = String::deserialize(deserializer)?;
    BigInt::from_str(&s).map_err(|e| DeError::custom(format!("invalid decimal BigInt: {e}")))
}
