//! Capability flags advertised by the write plugins.
//!
//! A host asks each plugin which actions it implements and only routes those
//! calls to it. Values match the host's backend action constants.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

macro_rules! action_flags {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$flag_meta:meta])* $flag:ident = $value:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$flag_meta])*
                pub const $flag: Self = Self($value);
            )+

            /// No action supported.
            pub const NONE: Self = Self(0);

            /// Raw bit value.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Whether every flag in `other` is set.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Whether no flag is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Names of the flags that are set.
            #[must_use]
            pub fn names(self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(
                    if self.contains(Self::$flag) {
                        names.push(stringify!($flag));
                    }
                )+
                names
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_empty() {
                    return f.write_str("NONE");
                }
                f.write_str(&self.names().join(" | "))
            }
        }
    };
}

action_flags!(
    /// Actions a user plugin can perform.
    UserActions {
        SET_PASSWORD = 0x0000_0010,
        SET_DISPLAYNAME = 0x0010_0000,
        PROVIDE_AVATAR = 0x0100_0000,
    }
);

action_flags!(
    /// Actions a group plugin can perform.
    GroupActions {
        CREATE_GROUP = 0x0000_0001,
        DELETE_GROUP = 0x0000_0010,
        ADD_TO_GROUP = 0x0000_0100,
        REMOVE_FROM_GROUP = 0x0000_1000,
    }
);
