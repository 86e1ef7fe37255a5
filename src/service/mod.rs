//! Business logic of the bot.

pub mod antinuke;
