// ── SNMP message and PDU types ──
//
// Community-based message framing (v1/v2c) around the four PDU kinds the
// client issues: GET, GET-NEXT, SET, and the agent's RESPONSE. The "bulk"
// read the adapter performs is a single GET carrying many bindings, so no
// GetBulkRequest PDU is needed here.

use std::fmt;

use crate::ber;
use crate::error::Error;
use crate::oid::Oid;

// ── Values ──────────────────────────────────────────────────────────

/// A decoded SNMP variable-binding value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    OctetString(Vec<u8>),
    Null,
    Oid(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
    /// v2c exception: the object does not exist on this agent.
    NoSuchObject,
    /// v2c exception: the instance does not exist.
    NoSuchInstance,
    /// v2c exception: walk ran past the end of the MIB view.
    EndOfMibView,
}

impl Value {
    /// Signed integer view (Integer only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Unsigned view covering the counter family.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => u64::try_from(*v).ok(),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => Some(u64::from(*v)),
            Self::Counter64(v) => Some(*v),
            _ => None,
        }
    }

    /// Lossy UTF-8 view of an OCTET STRING.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::OctetString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Whether this is one of the v2c per-binding exception markers.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::OctetString(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Self::Null => write!(f, "null"),
            Self::Oid(oid) => write!(f, "{oid}"),
            Self::IpAddress([a, b, c, d]) => write!(f, "{a}.{b}.{c}.{d}"),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => write!(f, "{v}"),
            Self::Counter64(v) => write!(f, "{v}"),
            Self::NoSuchObject => write!(f, "noSuchObject"),
            Self::NoSuchInstance => write!(f, "noSuchInstance"),
            Self::EndOfMibView => write!(f, "endOfMibView"),
        }
    }
}

// ── Error status (RFC 1905 §3) ──────────────────────────────────────

/// Agent-reported error status from a RESPONSE PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongValue,
    NotWritable,
    Other(i64),
}

impl ErrorStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            10 => Self::WrongValue,
            17 => Self::NotWritable,
            other => Self::Other(other),
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::NoError)
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::Other(code) => write!(f, "errorStatus({code})"),
        }
    }
}

// ── PDU ─────────────────────────────────────────────────────────────

/// The PDU kinds this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduType {
    GetRequest,
    GetNextRequest,
    Response,
    SetRequest,
}

impl PduType {
    fn tag(self) -> u8 {
        match self {
            Self::GetRequest => 0xA0,
            Self::GetNextRequest => 0xA1,
            Self::Response => 0xA2,
            Self::SetRequest => 0xA3,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            _ => None,
        }
    }
}

/// One SNMP PDU: request id, error fields, and the variable bindings.
#[derive(Debug, Clone)]
pub struct Pdu {
    pub pdu_type: PduType,
    pub request_id: i32,
    pub error_status: ErrorStatus,
    pub error_index: u32,
    pub bindings: Vec<(Oid, Value)>,
}

impl Pdu {
    /// Build a request PDU with clean error fields.
    pub fn request(pdu_type: PduType, request_id: i32, bindings: Vec<(Oid, Value)>) -> Self {
        Self {
            pdu_type,
            request_id,
            error_status: ErrorStatus::NoError,
            error_index: 0,
            bindings,
        }
    }
}

// ── Message encode ──────────────────────────────────────────────────

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(v) => ber::write_i64(out, ber::TAG_INTEGER, *v),
        Value::OctetString(bytes) => ber::write_tlv(out, ber::TAG_OCTET_STRING, bytes),
        Value::Null => ber::write_tlv(out, ber::TAG_NULL, &[]),
        Value::Oid(oid) => ber::write_oid(out, oid),
        Value::IpAddress(octets) => ber::write_tlv(out, ber::TAG_IP_ADDRESS, octets),
        Value::Counter32(v) => ber::write_u64(out, ber::TAG_COUNTER32, u64::from(*v)),
        Value::Gauge32(v) => ber::write_u64(out, ber::TAG_GAUGE32, u64::from(*v)),
        Value::TimeTicks(v) => ber::write_u64(out, ber::TAG_TIMETICKS, u64::from(*v)),
        Value::Counter64(v) => ber::write_u64(out, ber::TAG_COUNTER64, *v),
        Value::NoSuchObject => ber::write_tlv(out, ber::TAG_NO_SUCH_OBJECT, &[]),
        Value::NoSuchInstance => ber::write_tlv(out, ber::TAG_NO_SUCH_INSTANCE, &[]),
        Value::EndOfMibView => ber::write_tlv(out, ber::TAG_END_OF_MIB_VIEW, &[]),
    }
}

/// Encode a complete community-authenticated message.
pub fn encode_message(version: i64, community: &[u8], pdu: &Pdu) -> Vec<u8> {
    let mut bindings = Vec::new();
    for (oid, value) in &pdu.bindings {
        let mut binding = Vec::new();
        ber::write_oid(&mut binding, oid);
        write_value(&mut binding, value);
        ber::write_tlv(&mut bindings, ber::TAG_SEQUENCE, &binding);
    }

    let mut body = Vec::new();
    ber::write_i64(&mut body, ber::TAG_INTEGER, i64::from(pdu.request_id));
    let status_code = match pdu.error_status {
        ErrorStatus::NoError => 0,
        ErrorStatus::TooBig => 1,
        ErrorStatus::NoSuchName => 2,
        ErrorStatus::BadValue => 3,
        ErrorStatus::ReadOnly => 4,
        ErrorStatus::GenErr => 5,
        ErrorStatus::NoAccess => 6,
        ErrorStatus::WrongType => 7,
        ErrorStatus::WrongLength => 8,
        ErrorStatus::WrongValue => 10,
        ErrorStatus::NotWritable => 17,
        ErrorStatus::Other(code) => code,
    };
    ber::write_i64(&mut body, ber::TAG_INTEGER, status_code);
    ber::write_i64(&mut body, ber::TAG_INTEGER, i64::from(pdu.error_index));
    ber::write_tlv(&mut body, ber::TAG_SEQUENCE, &bindings);

    let mut message = Vec::new();
    ber::write_i64(&mut message, ber::TAG_INTEGER, version);
    ber::write_tlv(&mut message, ber::TAG_OCTET_STRING, community);
    ber::write_tlv(&mut message, pdu.pdu_type.tag(), &body);

    let mut out = Vec::with_capacity(message.len() + 4);
    ber::write_tlv(&mut out, ber::TAG_SEQUENCE, &message);
    out
}

// ── Message decode ──────────────────────────────────────────────────

fn read_value(reader: &mut ber::Reader<'_>) -> Result<Value, Error> {
    let (tag, content) = reader.read_tlv()?;
    let value = match tag {
        ber::TAG_INTEGER => Value::Integer(ber::parse_i64(content)?),
        ber::TAG_OCTET_STRING => Value::OctetString(content.to_vec()),
        ber::TAG_NULL => Value::Null,
        ber::TAG_OID => Value::Oid(ber::parse_oid(content)?),
        ber::TAG_IP_ADDRESS => {
            let octets: [u8; 4] = content.try_into().map_err(|_| Error::Malformed {
                reason: "IpAddress must be 4 octets".into(),
            })?;
            Value::IpAddress(octets)
        }
        ber::TAG_COUNTER32 => Value::Counter32(narrow_u32(content)?),
        ber::TAG_GAUGE32 => Value::Gauge32(narrow_u32(content)?),
        ber::TAG_TIMETICKS => Value::TimeTicks(narrow_u32(content)?),
        ber::TAG_COUNTER64 => Value::Counter64(ber::parse_u64(content)?),
        ber::TAG_NO_SUCH_OBJECT => Value::NoSuchObject,
        ber::TAG_NO_SUCH_INSTANCE => Value::NoSuchInstance,
        ber::TAG_END_OF_MIB_VIEW => Value::EndOfMibView,
        other => {
            return Err(Error::Malformed {
                reason: format!("unknown value tag {other:#04x}"),
            });
        }
    };
    Ok(value)
}

fn narrow_u32(content: &[u8]) -> Result<u32, Error> {
    let wide = ber::parse_u64(content)?;
    u32::try_from(wide).map_err(|_| Error::Malformed {
        reason: "32-bit value out of range".into(),
    })
}

/// Decode a complete message, returning `(version, community, pdu)`.
pub fn decode_message(buf: &[u8]) -> Result<(i64, Vec<u8>, Pdu), Error> {
    let mut outer = ber::Reader::new(buf);
    let message = outer.expect(ber::TAG_SEQUENCE)?;

    let mut reader = ber::Reader::new(message);
    let version = ber::parse_i64(reader.expect(ber::TAG_INTEGER)?)?;
    let community = reader.expect(ber::TAG_OCTET_STRING)?.to_vec();

    let (pdu_tag, body) = reader.read_tlv()?;
    let pdu_type = PduType::from_tag(pdu_tag).ok_or_else(|| Error::Malformed {
        reason: format!("unknown PDU tag {pdu_tag:#04x}"),
    })?;

    let mut body_reader = ber::Reader::new(body);
    let request_id = ber::parse_i64(body_reader.expect(ber::TAG_INTEGER)?)?;
    let request_id = i32::try_from(request_id).map_err(|_| Error::Malformed {
        reason: "request id out of range".into(),
    })?;
    let error_status = ErrorStatus::from_code(ber::parse_i64(body_reader.expect(ber::TAG_INTEGER)?)?);
    let error_index = ber::parse_i64(body_reader.expect(ber::TAG_INTEGER)?)?;
    let error_index = u32::try_from(error_index).unwrap_or(0);

    let bindings_buf = body_reader.expect(ber::TAG_SEQUENCE)?;
    let mut bindings_reader = ber::Reader::new(bindings_buf);
    let mut bindings = Vec::new();
    while !bindings_reader.is_empty() {
        let binding = bindings_reader.expect(ber::TAG_SEQUENCE)?;
        let mut binding_reader = ber::Reader::new(binding);
        let oid = ber::parse_oid(binding_reader.expect(ber::TAG_OID)?)?;
        let value = read_value(&mut binding_reader)?;
        bindings.push((oid, value));
    }

    Ok((
        version,
        community,
        Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            bindings,
        },
    ))
}
