// Analytics records returned by the data source
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_number: u64,
    pub block_hash: String,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
    pub weight: u64,
    pub transaction_count: u64,
    pub miner: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub protocol_features: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_hash: String,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
    pub weight: u64,
    pub virtual_size: u64,
    pub fee: u64,
    pub fee_rate: f64,
    pub input_count: u32,
    pub output_count: u32,
    pub total_input_value: u64,
    pub total_output_value: u64,
    #[serde(deserialize_with = "flag_from_int_or_bool", default)]
    pub is_coinbase: bool,
    #[serde(default)]
    pub transaction_type: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MempoolSnapshot {
    pub timestamp: DateTime<Utc>,
    pub transaction_count: u64,
    pub total_fee: u64,
    pub median_fee_rate: f64,
    pub high_priority_fee_rate: f64,
    pub medium_priority_fee_rate: f64,
    pub low_priority_fee_rate: f64,
    pub total_mempool_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Send,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressActivity {
    pub transaction_hash: String,
    pub timestamp: DateTime<Utc>,
    pub value: u64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub address: String,
    pub balance: u64,
    pub transaction_count: u64,
    pub first_seen: DateTime<Utc>,
    #[serde(default)]
    pub utxo_count: u64,
    #[serde(default)]
    pub recent_activity: Vec<AddressActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub latest_block: u64,
    pub transaction_count_24h: u64,
    pub average_fee: f64,
    pub segwit_adoption: f64,
}

/// Single-series chart payload: `{labels, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn is_consistent(&self) -> bool {
        self.labels.len() == self.data.len()
    }
}

/// Fee-rate tiers: `{labels, high, medium, low}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSeries {
    pub labels: Vec<String>,
    pub high: Vec<f64>,
    pub medium: Vec<f64>,
    pub low: Vec<f64>,
}

impl TierSeries {
    pub fn is_consistent(&self) -> bool {
        let n = self.labels.len();
        self.high.len() == n && self.medium.len() == n && self.low.len() == n
    }
}

/// Envelope used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Blocks(Vec<Block>),
    Block(Block),
    Transactions(Vec<Transaction>),
    Transaction(Transaction),
    Address(AddressInfo),
    Mempool(MempoolSnapshot),
    Summary(SummaryStats),
    Series(TimeSeries),
    Tiers(TierSeries),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Blocks(_) => "blocks",
            Record::Block(_) => "block",
            Record::Transactions(_) => "transactions",
            Record::Transaction(_) => "transaction",
            Record::Address(_) => "address",
            Record::Mempool(_) => "mempool",
            Record::Summary(_) => "summary",
            Record::Series(_) => "series",
            Record::Tiers(_) => "tiers",
        }
    }

    /// Number of category labels on series-shaped records.
    pub fn label_count(&self) -> Option<usize> {
        match self {
            Record::Series(series) => Some(series.labels.len()),
            Record::Tiers(tiers) => Some(tiers.labels.len()),
            _ => None,
        }
    }

    /// Series arrays must line up with their labels; everything else is
    /// well-formed once it deserialized.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Record::Series(series) => series.is_consistent(),
            Record::Tiers(tiers) => tiers.is_consistent(),
            _ => true,
        }
    }
}

fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}
