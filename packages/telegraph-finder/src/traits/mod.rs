//! Trait seams between the finder core and the outside world.
//!
//! Applications implement these to plug in the network transport and the
//! chat surface that receives progress and results.

pub mod chat;
pub mod fetcher;
