use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color; transparency is a property of what is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` or `rrggbb`
    pub fn hex(s: &str) -> anyhow::Result<Self> {
        let h = s.strip_prefix('#').unwrap_or(s);
        if h.len() != 6 || !h.is_ascii() {
            return Err(anyhow::anyhow!("invalid hex color: {}", s));
        }
        let channel = |k: usize| {
            u8::from_str_radix(&h[k..(k + 2)], 16)
                .map_err(|_| anyhow::anyhow!("invalid hex color: {}", s))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);

/// Default color cycle, addressed as `C0` ... `C9`
pub const TAB10: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

fn named_color(name: &str) -> Option<Color> {
    let c = match name {
        "b" | "blue" => Color::rgb(0, 0, 255),
        "g" => Color::rgb(0, 128, 0),
        "green" => Color::rgb(0, 128, 0),
        "r" | "red" => Color::rgb(255, 0, 0),
        "c" => Color::rgb(0, 191, 191),
        "cyan" => Color::rgb(0, 255, 255),
        "m" => Color::rgb(191, 0, 191),
        "magenta" => Color::rgb(255, 0, 255),
        "y" => Color::rgb(191, 191, 0),
        "yellow" => Color::rgb(255, 255, 0),
        "k" | "black" => BLACK,
        "w" | "white" => WHITE,
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "brown" => Color::rgb(165, 42, 42),
        "pink" => Color::rgb(255, 192, 203),
        "olive" => Color::rgb(128, 128, 0),
        "navy" => Color::rgb(0, 0, 128),
        "teal" => Color::rgb(0, 128, 128),
        _ => return None,
    };
    Some(c)
}

impl FromStr for Color {
    type Err = anyhow::Error;

    /// Hex codes, `C<n>` cycle entries, or a handful of color names
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::hex(s);
        }
        if let Some(n) = s.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
            return Ok(TAB10[n % TAB10.len()]);
        }
        named_color(&s.to_ascii_lowercase())
            .or_else(|| Self::hex(s).ok())
            .ok_or(anyhow::anyhow!("unknown color: {}", s))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// How datasets get their colors
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorSpec {
    /// successive palette entries, cycling
    #[default]
    Cycle,
    /// the same color for every dataset
    Single(Color),
    /// one color per dataset
    List(Vec<Color>),
}

impl ColorSpec {
    ///
    /// One color per dataset
    ///
    /// * `n_data` - number of datasets
    /// * `palette` - cycle used by [`ColorSpec::Cycle`]
    ///
    pub fn resolve(&self, n_data: usize, palette: &[Color]) -> anyhow::Result<Vec<Color>> {
        match self {
            ColorSpec::Cycle => {
                if palette.is_empty() {
                    return Err(anyhow::anyhow!("empty color palette"));
                }
                Ok((0..n_data).map(|i| palette[i % palette.len()]).collect())
            }
            ColorSpec::Single(c) => Ok(vec![*c; n_data]),
            ColorSpec::List(colors) => {
                if colors.len() != n_data {
                    return Err(anyhow::anyhow!(
                        "The number of colors ({}) does not match the number of models ({})",
                        colors.len(),
                        n_data
                    ));
                }
                Ok(colors.clone())
            }
        }
    }
}

impl FromStr for ColorSpec {
    type Err = anyhow::Error;

    /// `cycle`, a single color, or a comma-separated list
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("cycle") {
            Ok(ColorSpec::Cycle)
        } else if s.contains(',') {
            let colors = s
                .split(',')
                .map(|x| x.parse::<Color>())
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(ColorSpec::List(colors))
        } else {
            Ok(ColorSpec::Single(s.parse()?))
        }
    }
}
