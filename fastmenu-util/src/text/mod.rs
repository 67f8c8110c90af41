use std::{borrow::Cow, fmt::Display};

use color::{Color, NamedColor, RGBColor};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use style::Style;

pub mod color;
pub mod style;

/// Represents a Text component, used for menu titles, item names and lore.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TextComponent(pub TextComponentBase);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TextComponentBase {
    #[serde(flatten)]
    pub content: TextContent,
    #[serde(flatten)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponentBase>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum TextContent {
    /// Raw Text
    Text { text: Cow<'static, str> },
    /// Translated on the client. Without a translation table the key itself is shown.
    Translate {
        translate: Cow<'static, str>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        with: Vec<TextComponentBase>,
    },
}

impl TextComponentBase {
    fn plain(&self) -> String {
        let mut text = match &self.content {
            TextContent::Text { text } => text.to_string(),
            TextContent::Translate { translate, .. } => translate.to_string(),
        };
        for child in &self.extra {
            text += &child.plain();
        }
        text
    }

    pub fn to_pretty_console(self) -> String {
        let mut text = match self.content {
            TextContent::Text { text } => text.into_owned(),
            TextContent::Translate { translate, .. } => translate.into_owned(),
        };
        let style = self.style;
        if let Some(color) = style.color {
            text = color.console_color(&text).to_string();
        }
        if style.bold.is_some() {
            text = text.bold().to_string();
        }
        if style.italic.is_some() {
            text = text.italic().to_string();
        }
        if style.underlined.is_some() {
            text = text.underline().to_string();
        }
        if style.strikethrough.is_some() {
            text = text.strikethrough().to_string();
        }
        for child in self.extra {
            text += &*child.to_pretty_console();
        }
        text
    }
}

impl TextComponent {
    pub fn text<P>(plain: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self(TextComponentBase {
            content: TextContent::Text { text: plain.into() },
            style: Style::default(),
            extra: vec![],
        })
    }

    pub fn translate<K, W>(key: K, with: W) -> Self
    where
        K: Into<Cow<'static, str>>,
        W: Into<Vec<TextComponent>>,
    {
        Self(TextComponentBase {
            content: TextContent::Translate {
                translate: key.into(),
                with: with.into().into_iter().map(|x| x.0).collect(),
            },
            style: Style::default(),
            extra: vec![],
        })
    }

    pub fn add_child(mut self, child: TextComponent) -> Self {
        self.0.extra.push(child.0);
        self
    }

    pub fn add_text<P>(self, text: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        self.add_child(Self::text(text))
    }

    /// The unstyled text of this component and all of its children.
    pub fn get_text(&self) -> String {
        self.0.plain()
    }

    pub fn to_pretty_console(self) -> String {
        self.0.to_pretty_console()
    }

    pub fn color(mut self, color: Color) -> Self {
        self.0.style.color = Some(color);
        self
    }

    pub fn color_named(self, color: NamedColor) -> Self {
        self.color(Color::Named(color))
    }

    pub fn color_rgb(self, color: RGBColor) -> Self {
        self.color(Color::Rgb(color))
    }

    /// Makes the text bold
    pub fn bold(mut self) -> Self {
        self.0.style.bold = Some(true);
        self
    }

    /// Makes the text italic
    pub fn italic(mut self) -> Self {
        self.0.style.italic = Some(true);
        self
    }

    pub fn underlined(mut self) -> Self {
        self.0.style.underlined = Some(true);
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.0.style.strikethrough = Some(true);
        self
    }

    pub fn obfuscated(mut self) -> Self {
        self.0.style.obfuscated = Some(true);
        self
    }
}

impl Display for TextComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.get_text())
    }
}

impl From<&'static str> for TextComponent {
    fn from(value: &'static str) -> Self {
        Self::text(value)
    }
}

impl From<String> for TextComponent {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}
