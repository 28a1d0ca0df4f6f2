//! GELF 1.1 publisher over UDP.
//!
//! # Responsibilities
//! - Encode a record as a GELF JSON document
//! - Optionally zlib-compress the payload
//! - Split payloads larger than one datagram into GELF chunks
//!
//! # Design Decisions
//! - Fire and forget: no acknowledgement is read, loss is tolerated
//! - Context keys become `_ctxt_<key>` additional fields; when two keys
//!   sanitize to the same field the first in key order is kept
//! - A record that would need more than 128 chunks is dropped with an error

use std::io::Write;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::{Map, Value};

use crate::config::GelfConfig;
use crate::logger::LogRecord;
use crate::sink::{Sink, SinkError};

/// GELF chunk magic bytes.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

/// Magic, message id, sequence number, sequence count.
pub const CHUNK_HEADER_LEN: usize = 12;

/// Upper bound on chunks per message imposed by the GELF format.
pub const MAX_CHUNKS: usize = 128;

const CONTEXT_PREFIX: &str = "_ctxt_";

/// Sends records to a GELF collector.
#[derive(Debug)]
pub struct GelfSink {
    socket: UdpSocket,
    target: SocketAddr,
    host: String,
    chunk_size: usize,
    compress: bool,
}

impl GelfSink {
    /// Resolve the collector and bind an ephemeral local socket.
    pub fn new(config: &GelfConfig, host: impl Into<String>) -> Result<Self, SinkError> {
        let target = config
            .address
            .to_socket_addrs()
            .map_err(|_| SinkError::Resolve(config.address.clone()))?
            .next()
            .ok_or_else(|| SinkError::Resolve(config.address.clone()))?;

        let bind: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind)?;

        tracing::debug!(
            collector = %target,
            chunk_size = config.chunk_size,
            compress = config.compress,
            "GELF publisher bound"
        );

        Ok(Self {
            socket,
            target,
            host: host.into(),
            chunk_size: config.chunk_size,
            compress: config.compress,
        })
    }

    /// Serialize (and compress) a record into one payload.
    pub fn encode(&self, record: &LogRecord) -> Result<Vec<u8>, SinkError> {
        let json = serde_json::to_vec(&message(record, &self.host))?;
        if !self.compress {
            return Ok(json);
        }

        let buffer = Vec::with_capacity(json.len() / 2);
        let mut encoder = ZlibEncoder::new(buffer, Compression::default());
        encoder.write_all(&json)?;
        Ok(encoder.finish()?)
    }
}

impl Sink for GelfSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let payload = self.encode(record)?;

        if payload.len() <= self.chunk_size {
            self.socket.send_to(&payload, self.target)?;
            return Ok(());
        }

        for datagram in chunk(&payload, self.chunk_size, rand::random())? {
            self.socket.send_to(&datagram, self.target)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "gelf"
    }
}

/// Build the GELF document for a record.
pub fn message(record: &LogRecord, host: &str) -> Value {
    let mut doc = Map::new();
    doc.insert("version".into(), Value::from("1.1"));
    doc.insert("host".into(), Value::from(host));
    doc.insert("short_message".into(), Value::from(record.message.as_str()));
    doc.insert(
        "timestamp".into(),
        Value::from(record.datetime.timestamp_micros() as f64 / 1_000_000.0),
    );
    doc.insert("level".into(), Value::from(record.level.syslog()));
    doc.insert("_facility".into(), Value::from(record.channel.as_str()));

    for (key, value) in &record.context {
        let value = match value {
            Value::Null => continue,
            Value::String(_) | Value::Number(_) => value.clone(),
            Value::Bool(b) => Value::from(b.to_string()),
            other => Value::from(other.to_string()),
        };
        // Keys that sanitize to the same field keep the first in key order.
        doc.entry(format!("{CONTEXT_PREFIX}{}", sanitize_key(key)))
            .or_insert(value);
    }

    Value::Object(doc)
}

// Additional field names must match ^[\w.-]*$.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split a payload into GELF chunks of at most `chunk_size` data bytes.
pub fn chunk(
    payload: &[u8],
    chunk_size: usize,
    message_id: [u8; 8],
) -> Result<Vec<Vec<u8>>, SinkError> {
    let count = payload.len().div_ceil(chunk_size);
    if count > MAX_CHUNKS {
        return Err(SinkError::TooManyChunks {
            chunks: count,
            max: MAX_CHUNKS,
        });
    }

    Ok(payload
        .chunks(chunk_size)
        .enumerate()
        .map(|(seq, data)| {
            let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + data.len());
            datagram.extend_from_slice(&CHUNK_MAGIC);
            datagram.extend_from_slice(&message_id);
            datagram.push(seq as u8);
            datagram.push(count as u8);
            datagram.extend_from_slice(data);
            datagram
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{Context, Level};
    use flate2::read::ZlibDecoder;
    use serde_json::json;
    use std::io::Read;
    use std::time::Duration;

    fn record() -> LogRecord {
        let mut context = Context::new();
        context.insert("file".into(), json!("src/app.rs"));
        context.insert("line".into(), json!(42));
        context.insert("cached".into(), json!(true));
        context.insert("weird key!".into(), json!("v"));
        context.insert("gone".into(), Value::Null);
        LogRecord::new(Level::Warning, "svc", "disk almost full").with_context(context)
    }

    fn collector() -> (UdpSocket, GelfConfig) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let config = GelfConfig {
            address: socket.local_addr().unwrap().to_string(),
            ..GelfConfig::default()
        };
        (socket, config)
    }

    #[test]
    fn test_message_fields() {
        let doc = message(&record(), "web-1");

        assert_eq!(doc["version"], "1.1");
        assert_eq!(doc["host"], "web-1");
        assert_eq!(doc["short_message"], "disk almost full");
        assert_eq!(doc["level"], 4);
        assert_eq!(doc["_facility"], "svc");
        assert_eq!(doc["_ctxt_file"], "src/app.rs");
        assert_eq!(doc["_ctxt_line"], 42);
        assert_eq!(doc["_ctxt_cached"], "true");
        assert_eq!(doc["_ctxt_weird_key_"], "v");
        assert!(doc.get("_ctxt_gone").is_none());
        assert!(doc["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
    }

    #[test]
    fn test_colliding_keys_keep_first_value() {
        let mut context = Context::new();
        context.insert("a b".into(), json!("spaced"));
        context.insert("a_b".into(), json!("underscored"));
        let record = LogRecord::new(Level::Info, "svc", "collide").with_context(context);

        let doc = message(&record, "web-1");
        assert_eq!(doc["_ctxt_a_b"], "spaced");
    }

    #[test]
    fn test_chunk_headers() {
        let payload: Vec<u8> = (0..25u8).collect();
        let chunks = chunk(&payload, 10, [7; 8]).unwrap();

        assert_eq!(chunks.len(), 3);
        for (seq, datagram) in chunks.iter().enumerate() {
            assert_eq!(&datagram[..2], &CHUNK_MAGIC);
            assert_eq!(&datagram[2..10], &[7; 8]);
            assert_eq!(datagram[10] as usize, seq);
            assert_eq!(datagram[11], 3);
        }
        assert_eq!(chunks[2].len(), CHUNK_HEADER_LEN + 5);
    }

    #[test]
    fn test_too_many_chunks() {
        let payload = vec![0u8; MAX_CHUNKS + 1];
        let err = chunk(&payload, 1, [0; 8]).unwrap_err();
        assert!(matches!(err, SinkError::TooManyChunks { chunks: 129, max: 128 }));
    }

    #[test]
    fn test_sends_compressed_datagram() {
        let (collector, config) = collector();
        let sink = GelfSink::new(&config, "web-1").unwrap();

        sink.write(&record()).unwrap();

        let mut buf = [0u8; 65_535];
        let n = collector.recv(&mut buf).unwrap();
        let mut json = String::new();
        ZlibDecoder::new(&buf[..n]).read_to_string(&mut json).unwrap();

        let doc: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["short_message"], "disk almost full");
        assert_eq!(doc["host"], "web-1");
    }

    #[test]
    fn test_large_record_is_chunked() {
        let (collector, mut config) = collector();
        config.compress = false;
        config.chunk_size = 512;
        let sink = GelfSink::new(&config, "web-1").unwrap();

        let big = LogRecord::new(Level::Info, "svc", "x".repeat(2_000));
        sink.write(&big).unwrap();

        let mut buf = [0u8; 2_048];
        let n = collector.recv(&mut buf).unwrap();
        assert_eq!(&buf[..2], &CHUNK_MAGIC);
        assert!(n <= CHUNK_HEADER_LEN + 512);
        assert!(buf[11] >= 4);
    }

    #[test]
    fn test_unresolvable_collector() {
        let config = GelfConfig {
            address: "not an address".into(),
            ..GelfConfig::default()
        };
        let err = GelfSink::new(&config, "web-1").unwrap_err();
        assert!(matches!(err, SinkError::Resolve(_)));
    }
}
