//! Domain models shared between the bot handlers, the antinuke services and the
//! Discord platform layer.

pub mod antinuke;
pub mod reply;
