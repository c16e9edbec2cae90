//! Port adapters: live implementations and cassette-backed replay.

pub mod live;
pub mod replaying;
