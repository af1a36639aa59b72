#![allow(dead_code, clippy::unwrap_used)]
// Shared test support: an in-process UDP agent scripted to look like a
// C320 shelf, plus builders for devices pointing at it.

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::net::UdpSocket;

use oltwatch_core::model::DeviceRecord;
use oltwatch_snmp::pdu::{ErrorStatus, Pdu, PduType, Value};
use oltwatch_snmp::Oid;

pub fn oid(s: &str) -> Oid {
    s.parse().unwrap()
}

fn col(base: &str, index: &[u32]) -> Oid {
    oid(base).extend(index)
}

// Column bases mirroring the adapter's C320 catalog.
const SYSTEM_NAME: &str = "1.3.6.1.2.1.1.5.0";
const SYSTEM_DESCR: &str = "1.3.6.1.2.1.1.1.0";
const SYSTEM_UPTIME: &str = "1.3.6.1.2.1.1.3.0";
const FIRMWARE: &str = "1.3.6.1.4.1.3902.1012.3.1.1.1.1.2";
const HARDWARE: &str = "1.3.6.1.4.1.3902.1012.3.1.1.1.1.3";
const SERIAL: &str = "1.3.6.1.4.1.3902.1012.3.1.1.1.1.4";
const MAC: &str = "1.3.6.1.4.1.3902.1012.3.1.1.1.1.5";
const CPU: &str = "1.3.6.1.4.1.3902.1012.3.1.2.1.1.2";
const MEMORY: &str = "1.3.6.1.4.1.3902.1012.3.1.2.1.1.3";
const TEMPERATURE: &str = "1.3.6.1.4.1.3902.1012.3.1.2.1.1.4";
const FAN: &str = "1.3.6.1.4.1.3902.1012.3.1.2.1.1.5";
const POWER: &str = "1.3.6.1.4.1.3902.1012.3.1.2.1.1.6";
const PORT_ADMIN: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.3";
const PORT_OPER: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.4";
const PORT_ONT_COUNT: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.5";
const PORT_MAX_ONT: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.6";
const PORT_OPT_TX: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.7";
const PORT_OPT_RX: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.8";
const PORT_TEMP: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.9";
const PORT_VOLT: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.10";
const PORT_BIAS: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.11";
pub const PORT_ENABLE: &str = "1.3.6.1.4.1.3902.1012.3.28.1.1.20";
const PORT_RX_BYTES: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.2";
const PORT_TX_BYTES: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.3";
const PORT_RX_PKTS: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.4";
const PORT_TX_PKTS: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.5";
const PORT_RX_ERRS: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.6";
const PORT_TX_ERRS: &str = "1.3.6.1.4.1.3902.1012.3.28.2.1.7";
pub const ONT_SERIAL: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.3";
pub const ONT_STATUS: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.10";
const ONT_DISTANCE: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.11";
const ONT_RX_POWER: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.12";
const ONT_TX_POWER: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.13";
const ONT_VOLT: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.14";
const ONT_TEMP: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.15";
const ONT_FW: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.16";
const ONT_HW: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.17";
const ONT_MAC: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.18";
const ONT_UPTIME: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.19";
const ONT_RX_BYTES: &str = "1.3.6.1.4.1.3902.1012.3.50.13.1.1.2";
const ONT_TX_BYTES: &str = "1.3.6.1.4.1.3902.1012.3.50.13.1.1.3";
const ONT_RX_PKTS: &str = "1.3.6.1.4.1.3902.1012.3.50.13.1.1.4";
const ONT_TX_PKTS: &str = "1.3.6.1.4.1.3902.1012.3.50.13.1.1.5";
pub const ONT_PROVISION: &str = "1.3.6.1.4.1.3902.1012.3.50.11.2.1.1";
pub const ONT_REBOOT: &str = "1.3.6.1.4.1.3902.1012.3.50.11.3.1.1";

fn int(v: i64) -> Value {
    Value::Integer(v)
}

fn text(s: &str) -> Value {
    Value::OctetString(s.as_bytes().to_vec())
}

/// Builds the OID table for a scripted shelf.
#[derive(Default)]
pub struct AgentBuilder {
    objects: BTreeMap<Oid, Value>,
    fail: HashSet<Oid>,
    drop_first: usize,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shelf identity: sysName, sysDescr, firmware, serial.
    pub fn system(mut self, name: &str, descr: &str, firmware: &str, serial: &str) -> Self {
        self.objects.insert(oid(SYSTEM_NAME), text(name));
        self.objects.insert(oid(SYSTEM_DESCR), text(descr));
        self.objects.insert(oid(SYSTEM_UPTIME), Value::TimeTicks(8_640_000));
        self.objects.insert(oid(FIRMWARE), text(firmware));
        self.objects.insert(oid(HARDWARE), text("V1.0"));
        self.objects.insert(oid(SERIAL), text(serial));
        self.objects.insert(oid(MAC), text("00:1a:2b:3c:4d:5e"));
        self
    }

    /// Shelf performance readings (plain integers, no scaling).
    pub fn performance(mut self, cpu: i64, memory: i64, temperature: i64) -> Self {
        self.objects.insert(oid(CPU), int(cpu));
        self.objects.insert(oid(MEMORY), int(memory));
        self.objects.insert(oid(TEMPERATURE), int(temperature));
        self.objects.insert(oid(FAN), int(4200));
        self.objects.insert(oid(POWER), int(120));
        self
    }

    /// One PON port with raw fixed-point optical readings (× 100 / × 1000).
    pub fn port(mut self, slot: u32, port: u32, raw_rx_power: i64) -> Self {
        let index = [slot, port];
        self.objects.insert(col(PORT_ADMIN, &index), int(1));
        self.objects.insert(col(PORT_OPER, &index), int(1));
        self.objects.insert(col(PORT_ONT_COUNT, &index), int(2));
        self.objects.insert(col(PORT_MAX_ONT, &index), int(128));
        self.objects.insert(col(PORT_OPT_TX, &index), int(250));
        self.objects.insert(col(PORT_OPT_RX, &index), int(raw_rx_power));
        self.objects.insert(col(PORT_TEMP, &index), int(4150));
        self.objects.insert(col(PORT_VOLT, &index), int(3300));
        self.objects.insert(col(PORT_BIAS, &index), int(12_500));
        self.objects.insert(col(PORT_RX_BYTES, &index), Value::Counter64(1_000_000));
        self.objects.insert(col(PORT_TX_BYTES, &index), Value::Counter64(2_000_000));
        self.objects.insert(col(PORT_RX_PKTS, &index), Value::Counter64(10_000));
        self.objects.insert(col(PORT_TX_PKTS, &index), Value::Counter64(20_000));
        self.objects.insert(col(PORT_RX_ERRS, &index), Value::Counter32(3));
        self.objects.insert(col(PORT_TX_ERRS, &index), Value::Counter32(1));
        self
    }

    /// One ONT under (slot, port) with the given status code.
    pub fn ont(mut self, slot: u32, port: u32, ont: u32, status_code: i64, serial: &str) -> Self {
        let index = [slot, port, ont];
        self.objects.insert(col(ONT_STATUS, &index), int(status_code));
        self.objects.insert(col(ONT_SERIAL, &index), text(serial));
        self.objects.insert(col(ONT_DISTANCE, &index), int(1250));
        self.objects.insert(col(ONT_RX_POWER, &index), int(-2210));
        self.objects.insert(col(ONT_TX_POWER, &index), int(180));
        self.objects.insert(col(ONT_VOLT, &index), int(3280));
        self.objects.insert(col(ONT_TEMP, &index), int(3900));
        self.objects.insert(col(ONT_FW, &index), text("V6.0.1"));
        self.objects.insert(col(ONT_HW, &index), text("F601"));
        self.objects.insert(col(ONT_MAC, &index), text("00:aa:bb:cc:dd:ee"));
        self.objects.insert(col(ONT_UPTIME, &index), Value::TimeTicks(123_000));
        self.objects.insert(col(ONT_RX_BYTES, &index), Value::Counter64(500_000));
        self.objects.insert(col(ONT_TX_BYTES, &index), Value::Counter64(700_000));
        self.objects.insert(col(ONT_RX_PKTS, &index), Value::Counter64(5_000));
        self.objects.insert(col(ONT_TX_PKTS, &index), Value::Counter64(7_000));
        self
    }

    /// GETs touching this OID answer with genErr.
    pub fn poison(mut self, poisoned: Oid) -> Self {
        self.fail.insert(poisoned);
        self
    }

    /// Drop every incoming datagram (silent agent).
    pub fn silent(mut self) -> Self {
        self.drop_first = usize::MAX;
        self
    }

    pub async fn spawn(self) -> MockAgent {
        MockAgent::spawn(self.objects, self.fail, self.drop_first).await
    }
}

/// Scripted UDP agent; answers GET/GET-NEXT/SET from the OID table.
pub struct MockAgent {
    pub addr: SocketAddr,
}

impl MockAgent {
    async fn spawn(
        objects: BTreeMap<Oid, Value>,
        fail: HashSet<Oid>,
        drop_first: usize,
    ) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let dropped = Arc::new(AtomicUsize::new(0));

        tokio::spawn(async move {
            let mut objects = objects;
            let mut buf = vec![0u8; 65_507];
            loop {
                let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                if dropped.fetch_add(1, Ordering::SeqCst) < drop_first {
                    continue;
                }
                let Ok((version, community, request)) =
                    oltwatch_snmp::pdu::decode_message(&buf[..n])
                else {
                    continue;
                };
                let response = respond(&mut objects, &fail, &request);
                let bytes = oltwatch_snmp::pdu::encode_message(version, &community, &response);
                let _ = socket.send_to(&bytes, peer).await;
            }
        });

        Self { addr }
    }

    /// Device record pointing at this agent with test-friendly timeouts.
    pub fn device(&self, id: &str) -> DeviceRecord {
        let mut device = DeviceRecord::new(id, id, self.addr.ip().to_string());
        device.snmp.port = self.addr.port();
        device.snmp.timeout = Duration::from_millis(250);
        device.snmp.retries = 0;
        device
    }
}

fn respond(objects: &mut BTreeMap<Oid, Value>, fail: &HashSet<Oid>, request: &Pdu) -> Pdu {
    let mut response = Pdu {
        pdu_type: PduType::Response,
        request_id: request.request_id,
        error_status: ErrorStatus::NoError,
        error_index: 0,
        bindings: Vec::new(),
    };

    match request.pdu_type {
        PduType::GetRequest => {
            for (i, (requested, _)) in request.bindings.iter().enumerate() {
                if fail.contains(requested) {
                    response.error_status = ErrorStatus::GenErr;
                    response.error_index = u32::try_from(i + 1).unwrap();
                    response.bindings = request.bindings.clone();
                    return response;
                }
                let value = objects.get(requested).cloned().unwrap_or(Value::NoSuchObject);
                response.bindings.push((requested.clone(), value));
            }
        }
        PduType::GetNextRequest => {
            let (requested, _) = &request.bindings[0];
            let next = objects
                .iter()
                .find(|(candidate, _)| *candidate > requested)
                .map(|(k, v)| (k.clone(), v.clone()));
            response.bindings = vec![match next {
                Some(binding) => binding,
                None => (requested.clone(), Value::EndOfMibView),
            }];
        }
        PduType::SetRequest => {
            let (requested, value) = &request.bindings[0];
            if fail.contains(requested) {
                response.error_status = ErrorStatus::NotWritable;
                response.error_index = 1;
            } else {
                objects.insert(requested.clone(), value.clone());
            }
            response.bindings = request.bindings.clone();
        }
        PduType::Response => {}
    }

    response
}
