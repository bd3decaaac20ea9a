//! Application core — the control cycle and the override path.
//!
//! This module contains the domain rules for the valve controller:
//! cycle orchestration and failure containment ([`service`]), override
//! handling ([`gateway`]) and the async tasks that run both
//! ([`runtime`]).  All interaction with hardware and the message bus
//! happens through **port traits** defined in [`ports`].

pub mod commands;
pub mod events;
pub mod gateway;
pub mod ports;
pub mod runtime;
pub mod service;
