//! VC Tracker - Voice Presence Relay
//!
//! This crate relays live voice-channel presence from a single tracker bot to
//! many observers: the bot POSTs a full snapshot per guild on every membership
//! change, the relay keeps the latest snapshot per guild in memory, and every
//! connected SSE subscriber receives each change in acceptance order.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod relay;
