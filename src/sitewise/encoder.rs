use anyhow::{Context as _, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::sitewise::{Batch, Channel};

/// Serializes a batch into a request body.
pub trait Encoder {
    fn encode(&self, batch: &Batch) -> Result<Vec<u8>>;
}

// Ref: https://docs.aws.amazon.com/iot-sitewise/latest/APIReference/API_BatchPutAssetPropertyValue.html
#[derive(Debug, Serialize)]
struct BatchPutAssetPropertyValue<'a> {
    entries: Vec<PutAssetPropertyValueEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PutAssetPropertyValueEntry<'a> {
    entry_id: String,
    asset_id: &'a str,
    property_id: &'a str,
    property_values: Vec<AssetPropertyValue>,
}

#[derive(Debug, Serialize)]
struct AssetPropertyValue {
    value: Variant,
    timestamp: TimeInNanos,
    quality: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variant {
    double_value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeInNanos {
    time_in_seconds: i64,
    offset_in_nanos: u32,
}

/// Encodes batches as `BatchPutAssetPropertyValue` JSON, one entry per
/// channel with a fresh entry id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteWiseJsonEncoder;

impl Encoder for SiteWiseJsonEncoder {
    fn encode(&self, batch: &Batch) -> Result<Vec<u8>> {
        let body = BatchPutAssetPropertyValue {
            entries: batch.channels().into_iter().map(entry).collect(),
        };

        serde_json::to_vec(&body).context("failed to serialize SiteWise entries")
    }
}

fn entry(channel: &Channel) -> PutAssetPropertyValueEntry<'_> {
    PutAssetPropertyValueEntry {
        entry_id: Uuid::new_v4().simple().to_string(),
        asset_id: channel.asset_id(),
        property_id: channel.property_id(),
        property_values: channel
            .readings()
            .iter()
            .map(|r| AssetPropertyValue {
                value: Variant {
                    double_value: r.value,
                },
                timestamp: TimeInNanos {
                    time_in_seconds: r.timestamp_seconds,
                    offset_in_nanos: 0,
                },
                quality: "GOOD",
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::sitewise::Reading;

    #[test]
    fn encodes_one_entry_per_channel() {
        let mut temperature = Channel::new("asset-1", "prop-t", 10);
        let mut humidity = Channel::new("asset-1", "prop-h", 10);
        for (i, (t, h)) in [(21.5, 40.0), (22.0, 41.2)].into_iter().enumerate() {
            let timestamp_seconds = 1_760_000_000 + i as i64 * 5;
            temperature
                .push(Reading {
                    value: t,
                    timestamp_seconds,
                })
                .unwrap();
            humidity
                .push(Reading {
                    value: h,
                    timestamp_seconds,
                })
                .unwrap();
        }
        let batch = Batch::drain(&mut temperature, &mut humidity).unwrap();

        let payload = SiteWiseJsonEncoder.encode(&batch).unwrap();
        let mut value: Value = serde_json::from_slice(&payload).unwrap();

        let entries = value["entries"].as_array_mut().unwrap();
        assert_eq!(entries.len(), 2);
        for entry in entries.iter_mut() {
            let entry_id = entry
                .as_object_mut()
                .unwrap()
                .remove("entryId")
                .unwrap();
            let entry_id = entry_id.as_str().unwrap();
            assert_eq!(entry_id.len(), 32);
            assert!(entry_id.chars().all(|c| c.is_ascii_hexdigit()));
        }

        assert_eq!(
            value,
            json!({
                "entries": [
                    {
                        "assetId": "asset-1",
                        "propertyId": "prop-t",
                        "propertyValues": [
                            {
                                "value": { "doubleValue": 21.5 },
                                "timestamp": { "timeInSeconds": 1_760_000_000, "offsetInNanos": 0 },
                                "quality": "GOOD"
                            },
                            {
                                "value": { "doubleValue": 22.0 },
                                "timestamp": { "timeInSeconds": 1_760_000_005, "offsetInNanos": 0 },
                                "quality": "GOOD"
                            }
                        ]
                    },
                    {
                        "assetId": "asset-1",
                        "propertyId": "prop-h",
                        "propertyValues": [
                            {
                                "value": { "doubleValue": 40.0 },
                                "timestamp": { "timeInSeconds": 1_760_000_000, "offsetInNanos": 0 },
                                "quality": "GOOD"
                            },
                            {
                                "value": { "doubleValue": 41.2 },
                                "timestamp": { "timeInSeconds": 1_760_000_005, "offsetInNanos": 0 },
                                "quality": "GOOD"
                            }
                        ]
                    }
                ]
            })
        );
    }
}
