use sea_orm::entity::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Network scope of an address resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum NetFlag {
    #[sea_orm(num_value = 0)]
    Inner,
    #[sea_orm(num_value = 1)]
    Public,
}

/// Shape of the raw address a resource was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Category {
    #[sea_orm(num_value = 0)]
    Host,
    #[sea_orm(num_value = 1)]
    Network,
    #[sea_orm(num_value = 2)]
    Range,
}

impl Default for NetFlag {
    fn default() -> Self {
        NetFlag::Inner
    }
}

impl Category {
    /// Whether resources of this category own expanded host entries.
    pub fn expands(self) -> bool {
        !matches!(self, Category::Host)
    }
}

// Both enums travel over the wire as their integer codes.
macro_rules! serde_as_code {
    ($ty:ident, $what:literal) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_i32(self.to_value())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<$ty, D::Error>
            where
                D: Deserializer<'de>,
            {
                let code = i32::deserialize(deserializer)?;
                $ty::try_from_value(&code)
                    .map_err(|_| de::Error::custom(format!(concat!("invalid ", $what, ": {}"), code)))
            }
        }
    };
}

serde_as_code!(NetFlag, "network flag");
serde_as_code!(Category, "address category");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_travel_as_integer_codes() {
        assert_eq!(serde_json::to_string(&NetFlag::Public).unwrap(), "1");
        assert_eq!(serde_json::from_str::<NetFlag>("0").unwrap(), NetFlag::Inner);
        assert!(serde_json::from_str::<NetFlag>("7").is_err());
        assert_eq!(serde_json::to_string(&Category::Range).unwrap(), "2");
    }

    #[test]
    fn only_networks_and_ranges_expand() {
        assert!(!Category::Host.expands());
        assert!(Category::Network.expands());
        assert!(Category::Range.expands());
    }
}
