// ── SNMP transport client ──
//
// One client per device session: a connected UDP socket, a request-id
// counter, and a mutex serializing in-flight exchanges. Concurrent calls
// against the same device queue behind the mutex; different devices get
// different clients and poll fully in parallel.

use std::collections::HashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::Error;
use crate::oid::Oid;
use crate::pdu::{self, ErrorStatus, Pdu, PduType, Value};

/// Largest datagram we accept from an agent.
const MAX_DATAGRAM: usize = 65_507;

// ── Target description ──────────────────────────────────────────────

/// Protocol version spoken on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

impl SnmpVersion {
    fn wire(self) -> i64 {
        match self {
            Self::V1 => 0,
            Self::V2c => 1,
            Self::V3 => 3,
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "1"),
            Self::V2c => write!(f, "2c"),
            Self::V3 => write!(f, "3"),
        }
    }
}

impl FromStr for SnmpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "v1" => Ok(Self::V1),
            "2c" | "v2c" | "2" => Ok(Self::V2c),
            "3" | "v3" => Ok(Self::V3),
            other => Err(Error::Malformed {
                reason: format!("unknown SNMP version '{other}'"),
            }),
        }
    }
}

/// How to authenticate with an agent.
#[derive(Debug, Clone)]
pub enum SnmpCredentials {
    /// v1/v2c community string.
    Community(SecretString),
    /// v3 USM credentials. Carried in the model, but the transport
    /// rejects v3 targets at session setup.
    Usm {
        user: String,
        auth_key: SecretString,
        priv_key: SecretString,
    },
}

impl SnmpCredentials {
    pub fn community(community: impl Into<String>) -> Self {
        Self::Community(SecretString::from(community.into()))
    }
}

/// Everything needed to reach one agent.
#[derive(Debug, Clone)]
pub struct SnmpTarget {
    pub host: String,
    pub port: u16,
    pub version: SnmpVersion,
    pub credentials: SnmpCredentials,
    pub timeout: Duration,
    pub retries: u32,
}

impl SnmpTarget {
    /// Conventional defaults: port 161, v2c, community "public",
    /// 5 s timeout, 3 retries.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 161,
            version: SnmpVersion::V2c,
            credentials: SnmpCredentials::community("public"),
            timeout: Duration::from_secs(5),
            retries: 3,
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Async SNMP client bound to a single agent.
pub struct SnmpClient {
    target: SnmpTarget,
    community: SecretString,
    socket: UdpSocket,
    next_request_id: AtomicI32,
    /// Serializes request/response exchanges on the shared socket.
    exchange_lock: Mutex<()>,
}

impl SnmpClient {
    /// Bind an ephemeral local port and connect it to the target agent.
    ///
    /// Fails fast for v3 targets -- USM message processing is not
    /// implemented, and silently downgrading would be worse than refusing.
    pub async fn connect(target: SnmpTarget) -> Result<Self, Error> {
        let community = match (&target.version, &target.credentials) {
            (SnmpVersion::V3, _) | (_, SnmpCredentials::Usm { .. }) => {
                return Err(Error::UnsupportedVersion(SnmpVersion::V3));
            }
            (_, SnmpCredentials::Community(community)) => community.clone(),
        };

        let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
        socket.connect((target.host.as_str(), target.port)).await?;
        debug!(host = %target.host, port = target.port, version = %target.version, "snmp session ready");

        Ok(Self {
            target,
            community,
            socket,
            next_request_id: AtomicI32::new(1),
            exchange_lock: Mutex::new(()),
        })
    }

    pub fn target(&self) -> &SnmpTarget {
        &self.target
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Read a single object. `Ok(None)` when the agent reports the object
    /// absent (noSuchName / noSuchObject / noSuchInstance); `Err` for
    /// transport failure or any other error status.
    pub async fn get(&self, oid: &Oid) -> Result<Option<Value>, Error> {
        let request = self.request(PduType::GetRequest, vec![(oid.clone(), Value::Null)]);
        let response = self.log_outcome("get", oid, self.exchange(&request).await)?;

        if response.error_status == ErrorStatus::NoSuchName {
            debug!(host = %self.target.host, %oid, "get: no such object");
            return Ok(None);
        }
        self.check_status(&response)?;

        Ok(response
            .bindings
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .filter(|value| !value.is_exception()))
    }

    /// Batch read: one GET round trip carrying every OID.
    ///
    /// All-or-nothing: a non-zero error status fails the entire batch.
    /// v2c per-binding exceptions are treated as absence for that OID only.
    pub async fn get_many(&self, oids: &[Oid]) -> Result<HashMap<Oid, Value>, Error> {
        if oids.is_empty() {
            return Ok(HashMap::new());
        }

        let bindings = oids.iter().map(|oid| (oid.clone(), Value::Null)).collect();
        let request = self.request(PduType::GetRequest, bindings);
        let first = &oids[0];
        let response = self.log_outcome("get_many", first, self.exchange(&request).await)?;
        self.check_status(&response)?;

        Ok(response
            .bindings
            .into_iter()
            .filter(|(_, value)| !value.is_exception() && *value != Value::Null)
            .collect())
    }

    /// Enumerate a subtree with repeated GET-NEXT requests.
    ///
    /// Best-effort: a mid-walk error or timeout returns whatever has been
    /// collected so far. Only a failure on the very first step surfaces as
    /// `Err`, so an unreachable agent is distinguishable from an empty table.
    pub async fn walk(&self, root: &Oid) -> Result<BTreeMap<Oid, Value>, Error> {
        let mut results = BTreeMap::new();
        let mut current = root.clone();

        loop {
            let request =
                self.request(PduType::GetNextRequest, vec![(current.clone(), Value::Null)]);
            let response = match self.exchange(&request).await {
                Ok(response) => response,
                Err(err) if results.is_empty() => {
                    warn!(host = %self.target.host, %root, error = %err, "walk failed");
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        host = %self.target.host,
                        %root,
                        collected = results.len(),
                        error = %err,
                        "walk aborted, returning partial results"
                    );
                    break;
                }
            };

            // v1 agents end a table with noSuchName.
            if response.error_status == ErrorStatus::NoSuchName {
                break;
            }
            if !response.error_status.is_ok() {
                warn!(
                    host = %self.target.host,
                    %root,
                    status = %response.error_status,
                    "walk stopped on error status"
                );
                break;
            }

            let Some((oid, value)) = response.bindings.into_iter().next() else {
                break;
            };
            if value == Value::EndOfMibView || !oid.starts_with(root) {
                break;
            }
            // Non-increasing OIDs would loop forever on a buggy agent.
            if oid <= current {
                warn!(host = %self.target.host, %oid, "walk: agent returned non-increasing OID");
                break;
            }

            results.insert(oid.clone(), value);
            current = oid;
        }

        debug!(host = %self.target.host, %root, entries = results.len(), "walk complete");
        Ok(results)
    }

    /// Write a typed value. `Err` on error status or transport failure.
    pub async fn set(&self, oid: &Oid, value: Value) -> Result<(), Error> {
        let request = self.request(PduType::SetRequest, vec![(oid.clone(), value)]);
        let response = self.log_outcome("set", oid, self.exchange(&request).await)?;
        self.check_status(&response)?;
        debug!(host = %self.target.host, %oid, "set ok");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn request(&self, pdu_type: PduType, bindings: Vec<(Oid, Value)>) -> Pdu {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        Pdu::request(pdu_type, request_id, bindings)
    }

    fn check_status(&self, response: &Pdu) -> Result<(), Error> {
        if response.error_status.is_ok() {
            return Ok(());
        }
        Err(Error::ErrorStatus {
            status: response.error_status,
            index: response.error_index,
        })
    }

    fn log_outcome(
        &self,
        op: &str,
        oid: &Oid,
        result: Result<Pdu, Error>,
    ) -> Result<Pdu, Error> {
        match &result {
            Ok(_) => debug!(host = %self.target.host, %oid, op, "snmp exchange ok"),
            Err(err) => warn!(host = %self.target.host, %oid, op, error = %err, "snmp exchange failed"),
        }
        result
    }

    /// Send a request and wait for the matching response, retrying the
    /// full send on timeout. Datagrams with a stale request id (leftovers
    /// from a timed-out attempt) are discarded.
    async fn exchange(&self, request: &Pdu) -> Result<Pdu, Error> {
        let _guard = self.exchange_lock.lock().await;

        let bytes = pdu::encode_message(
            self.target.version.wire(),
            self.community.expose_secret().as_bytes(),
            request,
        );
        let attempts = self.target.retries + 1;

        for attempt in 1..=attempts {
            self.socket.send(&bytes).await?;
            let deadline = Instant::now() + self.target.timeout;

            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }

                let mut buf = vec![0u8; MAX_DATAGRAM];
                match tokio::time::timeout(remaining, self.socket.recv(&mut buf)).await {
                    Ok(Ok(n)) => {
                        let (_, _, response) = pdu::decode_message(buf.get(..n).unwrap_or(&[]))?;
                        if response.pdu_type == PduType::Response
                            && response.request_id == request.request_id
                        {
                            return Ok(response);
                        }
                        debug!(
                            host = %self.target.host,
                            got = response.request_id,
                            want = request.request_id,
                            "discarding stale datagram"
                        );
                    }
                    Ok(Err(err)) => return Err(err.into()),
                    Err(_) => break,
                }
            }

            if attempt < attempts {
                debug!(host = %self.target.host, attempt, "no response, retrying");
            }
        }

        Err(Error::Timeout { attempts })
    }
}

impl fmt::Debug for SnmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnmpClient")
            .field("host", &self.target.host)
            .field("port", &self.target.port)
            .field("version", &self.target.version)
            .finish_non_exhaustive()
    }
}
