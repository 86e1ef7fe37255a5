pub mod client;
pub mod platform;

pub use client::SerenityGuildPlatform;
pub use platform::GuildPlatform;
