//! Embed replies sent by the bot.
//!
//! Replies are kept as plain data so commands and announcements can be asserted on in
//! tests; they are turned into Serenity embeds only when sent.

use serenity::all::{CreateEmbed, Timestamp};

/// Colour for neutral informational embeds.
pub const NEUTRAL_COLOUR: u32 = 0x2b2d31;
pub const ERROR_COLOUR: u32 = 0xff0000;
pub const SUCCESS_COLOUR: u32 = 0x00ff00;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A single-embed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub fields: Vec<ReplyField>,
}

impl Reply {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            colour: NEUTRAL_COLOUR,
            fields: Vec::new(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            colour: ERROR_COLOUR,
            ..Self::new("Error", description)
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self {
            colour: SUCCESS_COLOUR,
            ..Self::new("Success", description)
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Builds the Serenity embed, stamped with the current time.
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .colour(self.colour)
            .timestamp(Timestamp::now());

        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        embed
    }
}
