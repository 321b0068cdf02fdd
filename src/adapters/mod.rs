//! Adapters exposing the relay over external interfaces.

pub mod http;
