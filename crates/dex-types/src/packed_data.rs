/// Implements the compact event encoding.
use near_sdk::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::*;

/// Maker value, taker value and pair alias packed into one 256-bit word.
///
/// [ unused | Pair alias | Taker value | Maker value ]
///  32 bits    32 bits      96 bits       96 bits
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct PackedData(pub U256);

impl PackedData {
    pub fn into_parts(self) -> (u128, u128, PairAlias) {
        unpack_order_data(self)
    }
}

impl Serialize for PackedData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for PackedData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        U256::from_dec_str(&s)
            .map(PackedData)
            .map_err(|_| de::Error::custom("invalid packed data"))
    }
}

const TAKER_VALUE_OFFSET: usize = 96;
const PAIR_ALIAS_OFFSET: usize = 192;

fn value_mask() -> U256 {
    U256::from(MAX_U96)
}

/// Pack order data. Bits above the 96/96/32 field widths are discarded.
pub fn pack_order_data(maker_value: u128, taker_value: u128, pair_alias: PairAlias) -> PackedData {
    let maker_part = U256::from(maker_value) & value_mask();
    let taker_part = (U256::from(taker_value) & value_mask()) << TAKER_VALUE_OFFSET;
    let alias_part = U256::from(pair_alias) << PAIR_ALIAS_OFFSET;

    PackedData(maker_part | taker_part | alias_part)
}

pub fn unpack_order_data(packed: PackedData) -> (u128, u128, PairAlias) {
    let maker_value = (packed.0 & value_mask()).low_u128();
    let taker_value = ((packed.0 >> TAKER_VALUE_OFFSET) & value_mask()).low_u128();
    let pair_alias = ((packed.0 >> PAIR_ALIAS_OFFSET) & U256::from(u32::MAX)).low_u32();

    (maker_value, taker_value, pair_alias)
}

#[cfg(test)]
mod test {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_packed_data(
            maker_value in 0..=MAX_U96,
            taker_value in 0..=MAX_U96,
            pair_alias: u32,
        ) {
            let packed = pack_order_data(maker_value, taker_value, pair_alias);
            let (m, t, a) = unpack_order_data(packed);

            prop_assert_eq!(maker_value, m, "Wrong maker value");
            prop_assert_eq!(taker_value, t, "Wrong taker value");
            prop_assert_eq!(pair_alias, a, "Wrong pair alias");
        }
    }

    #[test]
    fn test_packed_data_layout() {
        let packed = pack_order_data(1, 2, 3);
        let expected = U256::one() | (U256::from(2u8) << 96) | (U256::from(3u8) << 192);
        assert_eq!(packed.0, expected);
    }

    #[test]
    fn test_packed_data_extremes() {
        let packed = pack_order_data(MAX_U96, MAX_U96, u32::MAX);
        assert_eq!(packed.into_parts(), (MAX_U96, MAX_U96, u32::MAX));
        // nothing spills into the unused top bits
        assert_eq!(packed.0 >> 224, U256::zero());
    }

    #[test]
    fn test_packed_data_json() {
        let packed = pack_order_data(100, 50, 1);
        let json = near_sdk::serde_json::to_string(&packed).unwrap();
        let back: PackedData = near_sdk::serde_json::from_str(&json).unwrap();
        assert_eq!(packed, back);
    }
}
