//! Guild Sentinel Test Utils
//!
//! Provides shared testing utilities for building unit tests for the antinuke bot. The
//! crate offers factories for Serenity model objects that cannot be constructed directly
//! outside of Serenity itself, so tests build them the way Discord would deliver them:
//! by deserializing JSON payloads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use serenity::all::ChannelType;
//! use test_utils::serenity::create_test_channel;
//!
//! #[test]
//! fn test_channels() {
//!     let channel = create_test_channel(10, 1000, "general", ChannelType::Text, 0);
//!     // Use in your tests...
//! }
//! ```

pub mod serenity;
