// ── BER subset for SNMP ──
//
// Encode/decode for exactly the types SNMP messages use: definite-length
// TLVs, two's-complement INTEGERs, OCTET STRINGs, OBJECT IDENTIFIERs with
// base-128 arcs, and the application/context tags layered on top.
// Indefinite lengths and constructed strings are rejected.

use crate::error::Error;
use crate::oid::Oid;

// Universal tags.
pub(crate) const TAG_INTEGER: u8 = 0x02;
pub(crate) const TAG_OCTET_STRING: u8 = 0x04;
pub(crate) const TAG_NULL: u8 = 0x05;
pub(crate) const TAG_OID: u8 = 0x06;
pub(crate) const TAG_SEQUENCE: u8 = 0x30;

// SNMP application tags (RFC 2578).
pub(crate) const TAG_IP_ADDRESS: u8 = 0x40;
pub(crate) const TAG_COUNTER32: u8 = 0x41;
pub(crate) const TAG_GAUGE32: u8 = 0x42;
pub(crate) const TAG_TIMETICKS: u8 = 0x43;
pub(crate) const TAG_COUNTER64: u8 = 0x46;

// v2c exception markers (RFC 1905), context-class primitives.
pub(crate) const TAG_NO_SUCH_OBJECT: u8 = 0x80;
pub(crate) const TAG_NO_SUCH_INSTANCE: u8 = 0x81;
pub(crate) const TAG_END_OF_MIB_VIEW: u8 = 0x82;

fn malformed(reason: impl Into<String>) -> Error {
    Error::Malformed {
        reason: reason.into(),
    }
}

// ── Encoding ────────────────────────────────────────────────────────

pub(crate) fn write_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(u8::try_from(len).unwrap_or(0x7F));
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let tail = &bytes[skip..];
        out.push(0x80 | u8::try_from(tail.len()).unwrap_or(0x7F));
        out.extend_from_slice(tail);
    }
}

pub(crate) fn write_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    write_len(out, content.len());
    out.extend_from_slice(content);
}

/// Signed INTEGER in minimal two's-complement form.
pub(crate) fn write_i64(out: &mut Vec<u8>, tag: u8, value: i64) {
    let raw = value.to_be_bytes();
    let mut start = 0;
    while start < raw.len() - 1 {
        let redundant = (raw[start] == 0x00 && raw[start + 1] & 0x80 == 0)
            || (raw[start] == 0xFF && raw[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    write_tlv(out, tag, &raw[start..]);
}

/// Unsigned value (Counter/Gauge/TimeTicks) in minimal form, with a
/// leading zero octet when the top bit would read as a sign.
pub(crate) fn write_u64(out: &mut Vec<u8>, tag: u8, value: u64) {
    let raw = value.to_be_bytes();
    let skip = raw
        .iter()
        .take_while(|&&b| b == 0)
        .count()
        .min(raw.len() - 1);
    let tail = &raw[skip..];
    if tail[0] & 0x80 != 0 {
        let mut content = Vec::with_capacity(tail.len() + 1);
        content.push(0x00);
        content.extend_from_slice(tail);
        write_tlv(out, tag, &content);
    } else {
        write_tlv(out, tag, tail);
    }
}

pub(crate) fn write_oid(out: &mut Vec<u8>, oid: &Oid) {
    let arcs = oid.arcs();
    let mut content = Vec::with_capacity(arcs.len() + 1);
    match arcs {
        [] => content.push(0),
        [first] => write_base128(&mut content, u64::from(*first) * 40),
        [first, second, rest @ ..] => {
            write_base128(&mut content, u64::from(*first) * 40 + u64::from(*second));
            for arc in rest {
                write_base128(&mut content, u64::from(*arc));
            }
        }
    }
    write_tlv(out, TAG_OID, &content);
}

fn write_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut chunks = [0u8; 10];
    let mut n = 0;
    loop {
        chunks[n] = u8::try_from(value & 0x7F).unwrap_or(0);
        value >>= 7;
        n += 1;
        if value == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(chunks[i] | continuation);
    }
}

// ── Decoding ────────────────────────────────────────────────────────

/// Cursor over a BER-encoded buffer.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&e| e <= self.buf.len())
            .ok_or_else(|| malformed("truncated content"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read one TLV, returning the tag and the content bytes.
    pub(crate) fn read_tlv(&mut self) -> Result<(u8, &'a [u8]), Error> {
        let tag = self.take(1)?[0];
        let first = self.take(1)?[0];
        let len = if first < 0x80 {
            usize::from(first)
        } else {
            let count = usize::from(first & 0x7F);
            if count == 0 || count > 4 {
                return Err(malformed("unsupported length form"));
            }
            let mut len = 0usize;
            for &b in self.take(count)? {
                len = (len << 8) | usize::from(b);
            }
            len
        };
        let content = self.take(len)?;
        Ok((tag, content))
    }

    /// Read one TLV and require a specific tag.
    pub(crate) fn expect(&mut self, tag: u8) -> Result<&'a [u8], Error> {
        let (got, content) = self.read_tlv()?;
        if got != tag {
            return Err(malformed(format!("expected tag {tag:#04x}, got {got:#04x}")));
        }
        Ok(content)
    }
}

pub(crate) fn parse_i64(content: &[u8]) -> Result<i64, Error> {
    if content.is_empty() || content.len() > 8 {
        return Err(malformed("INTEGER with invalid length"));
    }
    let mut value: i64 = if content[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in content {
        value = (value << 8) | i64::from(b);
    }
    Ok(value)
}

pub(crate) fn parse_u64(content: &[u8]) -> Result<u64, Error> {
    let trimmed = if content.first() == Some(&0) && content.len() > 1 {
        &content[1..]
    } else {
        content
    };
    if trimmed.is_empty() || trimmed.len() > 8 {
        return Err(malformed("unsigned value with invalid length"));
    }
    let mut value = 0u64;
    for &b in trimmed {
        value = (value << 8) | u64::from(b);
    }
    Ok(value)
}

pub(crate) fn parse_oid(content: &[u8]) -> Result<Oid, Error> {
    if content.is_empty() {
        return Err(malformed("empty OID"));
    }
    let mut arcs = Vec::with_capacity(content.len() + 1);
    let mut cursor = content;
    let first = read_base128(&mut cursor)?;
    // First sub-identifier packs the two leading arcs.
    if first < 80 {
        arcs.push(u32::try_from(first / 40).unwrap_or(0));
        arcs.push(u32::try_from(first % 40).unwrap_or(0));
    } else {
        arcs.push(2);
        arcs.push(u32::try_from(first - 80).map_err(|_| malformed("oversized OID arc"))?);
    }
    while !cursor.is_empty() {
        let arc = read_base128(&mut cursor)?;
        arcs.push(u32::try_from(arc).map_err(|_| malformed("oversized OID arc"))?);
    }
    Ok(Oid::new(arcs))
}

fn read_base128(cursor: &mut &[u8]) -> Result<u64, Error> {
    let mut value = 0u64;
    for _ in 0..10 {
        let Some((&b, rest)) = cursor.split_first() else {
            return Err(malformed("truncated OID arc"));
        };
        *cursor = rest;
        value = (value << 7) | u64::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(malformed("oversized OID arc"))
}
