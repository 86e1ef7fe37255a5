//! Test factories for creating Serenity API objects.
//!
//! This module provides factory functions for creating mock Serenity structs for testing
//! purposes. These factories create valid Serenity objects by deserializing JSON,
//! simulating what Discord's API would return.
//!
//! # Available Factories
//!
//! - `channel::create_test_channel` - Create Serenity GuildChannel objects of any kind

pub mod channel;

pub use channel::create_test_channel;
