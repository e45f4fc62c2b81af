use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::{options::ClientOptions, Client};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{DocumentSink, SinkReceipt};
use crate::{config::DatabaseTarget, endpoint::Endpoint, error::SinkError};

/// The document inserted for every collected endpoint.
#[derive(Debug, Serialize)]
pub struct PersistenceRecord<'a> {
    pub endpoint: &'a str,
    pub data: &'a Value,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub collection_date: DateTime<Utc>,
    pub source: &'a str,
    pub simulation_mode: bool,
}

impl<'a> PersistenceRecord<'a> {
    /// `collection_date` is the moment the record is built, not the fetch time.
    pub fn new(
        endpoint: &'a Endpoint,
        data: &'a Value,
        source: &'a str,
        simulation_mode: bool,
    ) -> Self {
        PersistenceRecord {
            endpoint: endpoint.path(),
            data,
            collection_date: Utc::now(),
            source,
            simulation_mode,
        }
    }

    pub fn to_document(&self) -> Result<Document, SinkError> {
        Ok(bson::to_document(self)?)
    }
}

/// A MongoDB client that lives for exactly one write.
///
/// `open` verifies the server answers a `ping` before handing the session out and
/// shuts the client down itself when it does not. Callers must finish with
/// [`MongoSession::close`] whatever the outcome of their work.
pub struct MongoSession {
    client: Client,
}

impl MongoSession {
    pub async fn open(uri: &str, timeout: Duration) -> Result<Self, SinkError> {
        let mut options = ClientOptions::parse(uri).await.map_err(SinkError::Connect)?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(SinkError::Connect)?;
        let session = MongoSession { client };
        if let Err(err) = session
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
        {
            session.close().await;
            return Err(SinkError::Connect(err));
        }
        Ok(session)
    }

    pub async fn insert(
        &self,
        database: &str,
        collection: &str,
        record: Document,
    ) -> Result<String, SinkError> {
        let result = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .insert_one(record, None)
            .await
            .map_err(SinkError::Insert)?;

        Ok(match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        })
    }

    pub async fn close(self) {
        self.client.shutdown().await;
    }
}

/// Inserts one [`PersistenceRecord`] per collected document.
#[derive(Debug, Clone)]
pub struct MongoRecordSink {
    target: DatabaseTarget,
    source: String,
    simulation_mode: bool,
}

impl MongoRecordSink {
    pub fn new(target: DatabaseTarget, source: &str, simulation_mode: bool) -> Self {
        MongoRecordSink {
            target,
            source: source.to_string(),
            simulation_mode,
        }
    }
}

#[async_trait]
impl DocumentSink for MongoRecordSink {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn write(&self, endpoint: &Endpoint, document: &Value) -> Result<SinkReceipt, SinkError> {
        let (uri, database, collection) = self.target.resolve()?;
        let session = MongoSession::open(uri, self.target.timeout).await?;

        let record = PersistenceRecord::new(endpoint, document, &self.source, self.simulation_mode);
        let inserted = match record.to_document() {
            Ok(record) => session.insert(database, collection, record).await,
            Err(err) => Err(err),
        };
        session.close().await;

        let id = inserted?;
        debug!(%endpoint, %id, database, collection, "record inserted");
        Ok(SinkReceipt::Record(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn record_wraps_the_document() {
        let endpoint = Endpoint::new("/redfish/v1/Chassis/1");
        let data = json!({ "Id": "1", "PowerState": "On", "Sensors": [1, 2.5, null] });
        let before = Utc::now();
        let record = PersistenceRecord::new(&endpoint, &data, "https://ilo.example.com", false);

        let doc = record.to_document().unwrap();
        assert_eq!(doc.get_str("endpoint").unwrap(), "/redfish/v1/Chassis/1");
        assert_eq!(doc.get_str("source").unwrap(), "https://ilo.example.com");
        assert!(!doc.get_bool("simulation_mode").unwrap());

        let embedded = doc.get_document("data").unwrap();
        assert_eq!(embedded.get_str("PowerState").unwrap(), "On");
        assert_eq!(embedded.get_array("Sensors").unwrap().len(), 3);

        match doc.get("collection_date") {
            Some(Bson::DateTime(date)) => {
                assert!(date.timestamp_millis() >= before.timestamp_millis())
            }
            other => panic!("collection_date should be a BSON datetime, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfigured_target_fails_at_write_time() {
        let sink = MongoRecordSink::new(
            DatabaseTarget::new(None, Some("ilo"), Some("redfish")),
            "https://ilo.example.com",
            true,
        );
        let err = sink
            .write(&Endpoint::new("/redfish/v1"), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::NotConfigured("MONGO_URI")));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_failure() {
        let target =
            DatabaseTarget::new(Some("mongodb://127.0.0.1:1"), Some("ilo"), Some("redfish"))
                .with_timeout(Duration::from_millis(300));
        let sink = MongoRecordSink::new(target, "https://ilo.example.com", true);

        let err = sink
            .write(&Endpoint::new("/redfish/v1"), &json!({ "ok": true }))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Connect(_)));
    }

    #[tokio::test]
    async fn malformed_uri_is_a_connection_failure() {
        let err = MongoSession::open("not-a-mongo-uri", Duration::from_millis(300))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SinkError::Connect(_)));
    }
}
