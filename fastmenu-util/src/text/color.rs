use colored::{ColoredString, Colorize};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IntoDeserializer},
};

/// Text color, either one of the sixteen chat colors or a hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Named(NamedColor),
    Rgb(RGBColor),
}

impl Color {
    pub fn console_color(&self, text: &str) -> ColoredString {
        match self {
            Self::Named(named) => named.console_color(text),
            Self::Rgb(rgb) => text.truecolor(rgb.red, rgb.green, rgb.blue),
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Named(named) => named.serialize(serializer),
            Self::Rgb(rgb) => serializer.serialize_str(&format!(
                "#{:02X}{:02X}{:02X}",
                rgb.red, rgb.green, rgb.blue
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Some(hex) = raw.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16).map_err(de::Error::custom)?;
            if hex.len() != 6 {
                return Err(de::Error::custom(format!("invalid hex color {raw}")));
            }
            Ok(Self::Rgb(RGBColor::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )))
        } else {
            let named: de::value::StrDeserializer<'_, D::Error> = raw.as_str().into_deserializer();
            NamedColor::deserialize(named).map(Self::Named)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGBColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    pub fn console_color(self, text: &str) -> ColoredString {
        match self {
            Self::Black => text.black(),
            Self::DarkBlue => text.blue(),
            Self::DarkGreen => text.green(),
            Self::DarkAqua => text.cyan(),
            Self::DarkRed => text.red(),
            Self::DarkPurple => text.purple(),
            Self::Gold => text.yellow(),
            Self::Gray => text.white(),
            Self::DarkGray => text.bright_black(),
            Self::Blue => text.bright_blue(),
            Self::Green => text.bright_green(),
            Self::Aqua => text.bright_cyan(),
            Self::Red => text.bright_red(),
            Self::LightPurple => text.bright_purple(),
            Self::Yellow => text.bright_yellow(),
            Self::White => text.bright_white(),
        }
    }
}
