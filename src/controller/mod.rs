//! Prefix command handling.
//!
//! Controllers validate the invoker's access, parse arguments, call into the services
//! and turn the result (or the error) into a reply for the channel the command came from.

pub mod antinuke;
