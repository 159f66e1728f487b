//! Shared utility modules used across binvec components.

pub mod varint;
