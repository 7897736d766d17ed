use crate::db::DatabaseError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde goes through the same string form, so wire and column values match.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

str_enum!(CaseStatus {
    Suspected => "Suspected",
    Confirmed => "Confirmed",
});

str_enum!(Role {
    Officer => "officer",
    Superuser => "superuser",
});

str_enum!(SopCategory {
    Equipment => "equipment",
    Procedures => "procedures",
    Policies => "policies",
    Administrative => "administrative",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn case_status_round_trip() {
        assert_eq!(CaseStatus::from_str("Confirmed").unwrap(), CaseStatus::Confirmed);
        assert_eq!(CaseStatus::Suspected.as_str(), "Suspected");
    }

    #[test]
    fn unknown_value_rejected() {
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_value(Role::Superuser).unwrap(), "superuser");
        let role: Role = serde_json::from_value("officer".into()).unwrap();
        assert_eq!(role, Role::Officer);
    }
}
