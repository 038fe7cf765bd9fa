// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fixed color palettes for nodes and connections.
//!
//! Colors are persisted as lowercase `#rrggbb` strings. Decoding is case-insensitive but rejects
//! anything outside the palette.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! palette {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $hex:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn hex(self) -> &'static str {
                match self {
                    $($name::$variant => $hex),+
                }
            }

            pub fn from_hex(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|color| color.hex().eq_ignore_ascii_case(value))
            }

            pub fn rgb(self) -> (u8, u8, u8) {
                parse_hex_rgb(self.hex())
            }

            pub fn index(self) -> usize {
                Self::ALL.iter().position(|color| *color == self).unwrap_or(0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::from_hex(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        concat!("color {:?} is not in the ", stringify!($name), " palette"),
                        raw
                    ))
                })
            }
        }
    };
}

// The first variant of each palette is its default.
palette! {
    /// The 8-color accent palette offered by a node's color picker.
    NodeColor {
        Slate => "#64748b",
        Red => "#ef4444",
        Orange => "#f97316",
        Yellow => "#eab308",
        Green => "#22c55e",
        Blue => "#3b82f6",
        Purple => "#a855f7",
        Pink => "#ec4899",
    }
}

palette! {
    /// The 7-color palette offered by a connection's popup.
    ConnectionColor {
        White => "#ffffff",
        Gray => "#9ca3af",
        Red => "#f87171",
        Amber => "#fbbf24",
        Green => "#4ade80",
        Blue => "#60a5fa",
        Violet => "#c084fc",
    }
}

fn parse_hex_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::{ConnectionColor, NodeColor};

    #[test]
    fn palettes_have_fixed_sizes() {
        assert_eq!(NodeColor::ALL.len(), 8);
        assert_eq!(ConnectionColor::ALL.len(), 7);
    }

    #[test]
    fn palettes_are_distinct() {
        for node in NodeColor::ALL {
            assert!(ConnectionColor::from_hex(node.hex()).is_none(), "{node} shared");
        }
    }

    #[test]
    fn colors_decode_case_insensitively_and_reject_unknown() {
        let color: NodeColor = serde_json::from_str("\"#3B82F6\"").expect("blue");
        assert_eq!(color, NodeColor::Blue);
        assert!(serde_json::from_str::<NodeColor>("\"#000000\"").is_err());
        assert_eq!(serde_json::to_string(&ConnectionColor::Red).expect("ser"), "\"#f87171\"");
    }

    #[test]
    fn rgb_parses_hex() {
        assert_eq!(ConnectionColor::White.rgb(), (255, 255, 255));
        assert_eq!(NodeColor::Blue.rgb(), (0x3b, 0x82, 0xf6));
    }
}
