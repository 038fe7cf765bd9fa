// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};

use crate::model::{ConnectionColor, NodeColor};

/// How many colors the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorDepth {
    TrueColor,
    Ansi16,
    Monochrome,
}

#[derive(Debug, Clone)]
pub(crate) struct TuiTheme {
    depth: ColorDepth,
}

impl TuiTheme {
    pub(crate) fn new(depth: ColorDepth) -> Self {
        Self { depth }
    }

    /// `NO_COLOR` wins; `COLORTERM=truecolor|24bit` enables RGB palette colors.
    pub(crate) fn from_env() -> Self {
        let depth = if env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            ColorDepth::Monochrome
        } else if env::var("COLORTERM")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "truecolor" | "24bit"))
            .unwrap_or(false)
        {
            ColorDepth::TrueColor
        } else {
            ColorDepth::Ansi16
        };
        Self::new(depth)
    }

    fn rgb(&self, (r, g, b): (u8, u8, u8)) -> Color {
        match self.depth {
            ColorDepth::TrueColor => Color::Rgb(r, g, b),
            ColorDepth::Ansi16 => Ansi16::nearest(r, g, b).into(),
            ColorDepth::Monochrome => Color::Reset,
        }
    }

    pub(crate) fn node_fill(&self, color: NodeColor) -> Color {
        self.rgb(color.rgb())
    }

    /// Readable text on top of [`TuiTheme::node_fill`].
    pub(crate) fn node_text(&self, color: NodeColor) -> Color {
        if self.depth == ColorDepth::Monochrome {
            return Color::Reset;
        }
        let (r, g, b) = color.rgb();
        let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        if luma > 150.0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub(crate) fn node_style(&self, color: NodeColor, editing: bool) -> Style {
        let style = Style::default()
            .bg(self.node_fill(color))
            .fg(self.node_text(color));
        if editing {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub(crate) fn connection(&self, color: ConnectionColor) -> Color {
        match self.depth {
            ColorDepth::Monochrome => Color::Reset,
            _ => self.rgb(color.rgb()),
        }
    }

    pub(crate) fn anchor_style(&self, pending: bool) -> Style {
        if pending {
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    pub(crate) fn tab_style(&self, active: bool) -> Style {
        if active {
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    pub(crate) fn toast_style(&self, error: bool) -> Style {
        if error {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default().fg(Color::LightGreen)
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ansi16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Ansi16 {
    const ALL: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::BrightBlack,
        Self::BrightRed,
        Self::BrightGreen,
        Self::BrightYellow,
        Self::BrightBlue,
        Self::BrightMagenta,
        Self::BrightCyan,
        Self::BrightWhite,
    ];

    /// Typical xterm rendering of each slot.
    const fn approx_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Black => (0, 0, 0),
            Self::Red => (205, 0, 0),
            Self::Green => (0, 205, 0),
            Self::Yellow => (205, 205, 0),
            Self::Blue => (0, 0, 238),
            Self::Magenta => (205, 0, 205),
            Self::Cyan => (0, 205, 205),
            Self::White => (229, 229, 229),
            Self::BrightBlack => (127, 127, 127),
            Self::BrightRed => (255, 0, 0),
            Self::BrightGreen => (0, 255, 0),
            Self::BrightYellow => (255, 255, 0),
            Self::BrightBlue => (92, 92, 255),
            Self::BrightMagenta => (255, 0, 255),
            Self::BrightCyan => (0, 255, 255),
            Self::BrightWhite => (255, 255, 255),
        }
    }

    fn nearest(r: u8, g: u8, b: u8) -> Self {
        let distance = |slot: Self| {
            let (sr, sg, sb) = slot.approx_rgb();
            let dr = i32::from(sr) - i32::from(r);
            let dg = i32::from(sg) - i32::from(g);
            let db = i32::from(sb) - i32::from(b);
            dr * dr + dg * dg + db * db
        };
        Self::ALL
            .into_iter()
            .min_by_key(|slot| distance(*slot))
            .unwrap_or(Self::White)
    }
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Black => Color::Black,
            Ansi16::Red => Color::Red,
            Ansi16::Green => Color::Green,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Blue => Color::Blue,
            Ansi16::Magenta => Color::Magenta,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::White => Color::Gray,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightRed => Color::LightRed,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightYellow => Color::LightYellow,
            Ansi16::BrightBlue => Color::LightBlue,
            Ansi16::BrightMagenta => Color::LightMagenta,
            Ansi16::BrightCyan => Color::LightCyan,
            Ansi16::BrightWhite => Color::White,
        }
    }
}
