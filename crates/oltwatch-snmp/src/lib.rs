//! Async SNMP transport client for oltwatch.
//!
//! Speaks community-authenticated SNMP v1/v2c over UDP with configurable
//! timeout and retry, one session per device:
//!
//! - **[`SnmpClient`]** — GET / batched GET / GET-NEXT walk / SET against a
//!   single agent. Exchanges on one session are serialized; separate
//!   sessions poll concurrently.
//! - **[`Oid`]** — dotted-numeric object identifier with subtree and
//!   table-index helpers.
//! - **[`Value`]** — typed variable-binding values, including the v2c
//!   exception markers.
//! - **[`Error`]** — transport vs. protocol failure taxonomy; callers map
//!   absence-like failures into `None` at the adapter boundary.
//!
//! The wire codec lives in a private `ber` module and covers exactly the
//! SNMP subset: no MIB compiler, no v3 USM processing.

mod ber;

pub mod client;
pub mod error;
pub mod oid;
pub mod pdu;

pub use client::{SnmpClient, SnmpCredentials, SnmpTarget, SnmpVersion};
pub use error::Error;
pub use oid::Oid;
pub use pdu::{ErrorStatus, Pdu, PduType, Value};
