//! Wire types for the provider protocol.
//!
//! Only the Responses API is spoken here: a typed request body and a
//! defensively decoded view over its loosely typed reply.

pub mod responses;
