use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UnknownVariant;

macro_rules! id_newtype {
    ($name:ident) => {
        /// Backend-assigned identifier. Opaque to this crate; only compared and echoed back.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(#[serde(deserialize_with = "opaque_id")] pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(CoffeeId);
id_newtype!(OrderId);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(value) => value.to_string(),
        RawId::Uint(value) => value.to_string(),
    })
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownVariant::new($kind, wanted))
            }
        }
    };
}

labelled_enum! {
    /// Whether a catalog entry is an atomic coffee or built from components.
    CoffeeKind, "coffee kind" {
        SingleOrigin => "single",
        Blend => "blend",
    }
}

labelled_enum! {
    DeliveryMethod, "delivery method" {
        Deliver => "Deliver",
        Shipped => "Shipped",
        Pickup => "Pickup",
    }
}

labelled_enum! {
    BagSize, "bag size" {
        FiveLb => "5lb",
        TwoLb => "2lb",
        TenOz => "10oz",
    }
}

labelled_enum! {
    GrindSize, "grind size" {
        WholeBean => "Whole Bean",
        Drip => "Drip",
        ColdBrew => "Cold Brew",
        FrenchPress => "French Press",
    }
}

impl Default for GrindSize {
    fn default() -> Self {
        GrindSize::WholeBean
    }
}
