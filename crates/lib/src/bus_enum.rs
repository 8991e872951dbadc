//! Enumerations that travel over the bus by name.
//!
//! Bus peers spell enum values either short (`Integer`) or fully qualified
//! (`xyz.openbmc_project.BIOSConfig.Manager.AttributeType.Integer`). Both are
//! accepted on input; the short form is written out.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
  pub kind: &'static str,
  pub value: String,
}

macro_rules! bus_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident in $prefix:literal {
      $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
    #[serde(try_from = "String", into = "&'static str")]
    $vis enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// Interface-qualified prefix of the bus spelling.
      pub const BUS_PREFIX: &'static str = $prefix;

      /// Every variant, in declaration order.
      pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $( Self::$variant => stringify!($variant) ),+
        }
      }

      /// Fully qualified spelling used on the bus.
      pub fn bus_name(self) -> String {
        format!("{}.{}", Self::BUS_PREFIX, self.as_str())
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl std::str::FromStr for $name {
      type Err = $crate::bus_enum::UnknownVariant;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix(concat!($prefix, ".")).unwrap_or(s);
        Self::ALL
          .iter()
          .copied()
          .find(|variant| variant.as_str() == short)
          .ok_or_else(|| $crate::bus_enum::UnknownVariant {
            kind: stringify!($name),
            value: s.to_string(),
          })
      }
    }

    impl TryFrom<String> for $name {
      type Error = $crate::bus_enum::UnknownVariant;

      fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
      }
    }

    impl From<$name> for &'static str {
      fn from(value: $name) -> Self {
        value.as_str()
      }
    }
  };
}

pub(crate) use bus_enum;
