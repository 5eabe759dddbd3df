//! MySQL driver backed by the synchronous `mysql` crate

use std::time::Duration;

use ::mysql::prelude::Queryable;
use ::mysql::{Conn, Opts, OptsBuilder, Row};

use crate::driver::{Driver, DriverSession, Endpoint};
use crate::error::{PoolError, Result};
use crate::types::{QueryResult, Value};

/// Driver for single-host MySQL servers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDriver;

impl MySqlDriver {
    /// Create a new MySQL driver instance
    pub fn new() -> Self {
        Self
    }
}

impl Driver for MySqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn DriverSession>> {
        tracing::debug!(
            host = %endpoint.host,
            port = endpoint.port,
            database = %endpoint.database,
            "opening MySQL connection"
        );
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(endpoint.host.clone()))
            .tcp_port(endpoint.port)
            .user(Some(endpoint.username.clone()))
            .pass(Some(endpoint.password.clone()))
            .db_name(Some(endpoint.database.clone()));
        let conn = Conn::new(Opts::from(opts)).map_err(|e| PoolError::Driver(e.to_string()))?;
        Ok(Box::new(MySqlSession { conn }))
    }
}

/// One live connection to the server.
pub struct MySqlSession {
    conn: Conn,
}

impl DriverSession for MySqlSession {
    fn ping(&mut self, _timeout_hint: Duration) -> bool {
        // COM_PING round trip; the protocol has no per-ping deadline
        self.conn.ping().is_ok()
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        self.conn
            .query_drop(sql)
            .map_err(|e| PoolError::Driver(e.to_string()))?;
        Ok(self.conn.affected_rows())
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let rows: Vec<Row> = self
            .conn
            .query(sql)
            .map_err(|e| PoolError::Driver(e.to_string()))?;
        let columns = rows
            .first()
            .map(|row| {
                row.columns_ref()
                    .iter()
                    .map(|c| c.name_str().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .into_iter()
            .map(|row| row.unwrap().into_iter().map(value_from_wire).collect())
            .collect();
        Ok(QueryResult { columns, rows })
    }
}

fn value_from_wire(value: ::mysql::Value) -> Value {
    use ::mysql::Value as Wire;
    match value {
        Wire::NULL => Value::Null,
        Wire::Int(v) => Value::Int(v),
        Wire::UInt(v) => Value::UInt(v),
        Wire::Float(v) => Value::Float(f64::from(v)),
        Wire::Double(v) => Value::Float(v),
        Wire::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::Text(text),
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        // date/time variants arrive as their SQL literal text
        temporal => Value::Text(temporal.as_sql(true).trim_matches('\'').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::value_from_wire;
    use crate::types::Value;

    #[test]
    fn wire_scalars_map_to_pool_values() {
        assert_eq!(value_from_wire(::mysql::Value::NULL), Value::Null);
        assert_eq!(value_from_wire(::mysql::Value::Int(-7)), Value::Int(-7));
        assert_eq!(value_from_wire(::mysql::Value::UInt(7)), Value::UInt(7));
        assert_eq!(
            value_from_wire(::mysql::Value::Bytes(b"abc".to_vec())),
            Value::Text("abc".into())
        );
    }

    #[test]
    fn non_utf8_bytes_stay_binary() {
        let raw = vec![0xff, 0xfe, 0x00];
        assert_eq!(
            value_from_wire(::mysql::Value::Bytes(raw.clone())),
            Value::Bytes(raw)
        );
    }
}
