// Query catalog understood by the analytics backend
use super::records::{
    AddressInfo, Block, Listing, MempoolSnapshot, Record, SummaryStats, TierSeries, TimeSeries,
    Transaction,
};

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_HOURS: u32 = 24;

/// Unit of a series window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Days(u32),
    Hours(u32),
}

impl Window {
    pub fn points(&self) -> usize {
        match *self {
            Window::Days(n) | Window::Hours(n) => n as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    RecentBlocks { limit: u32 },
    BlockByNumber(u64),
    RecentTransactions { limit: u32 },
    TransactionByHash(String),
    AddressInfo(String),
    MempoolStats,
    Summary,
    BlockSizeHistory { days: u32 },
    TxFeeHistory { days: u32 },
    TxVolumeHistory { days: u32 },
    AddressActivityHistory { days: u32 },
    BalanceDistribution,
    MempoolSizeHistory { hours: u32 },
    FeeRatesHistory { hours: u32 },
    ProtocolFeatureAdoption { days: u32 },
}

impl Query {
    /// Stable name used for logging and fallback lookup.
    pub fn name(&self) -> &'static str {
        match self {
            Query::RecentBlocks { .. } => "recent_blocks",
            Query::BlockByNumber(_) => "block_by_number",
            Query::RecentTransactions { .. } => "recent_transactions",
            Query::TransactionByHash(_) => "transaction_by_hash",
            Query::AddressInfo(_) => "address_info",
            Query::MempoolStats => "mempool_stats",
            Query::Summary => "summary",
            Query::BlockSizeHistory { .. } => "block_size_history",
            Query::TxFeeHistory { .. } => "tx_fee_history",
            Query::TxVolumeHistory { .. } => "tx_volume_history",
            Query::AddressActivityHistory { .. } => "address_activity_history",
            Query::BalanceDistribution => "balance_distribution",
            Query::MempoolSizeHistory { .. } => "mempool_size_history",
            Query::FeeRatesHistory { .. } => "fee_rates_history",
            Query::ProtocolFeatureAdoption { .. } => "protocol_feature_adoption",
        }
    }

    /// REST path relative to the API base, with path segments URL-encoded.
    pub fn endpoint(&self) -> String {
        match self {
            Query::RecentBlocks { .. } => "blocks".to_string(),
            Query::BlockByNumber(n) => format!("blocks/{}", n),
            Query::RecentTransactions { .. } => "transactions".to_string(),
            Query::TransactionByHash(hash) => {
                format!("transactions/{}", urlencoding::encode(hash))
            }
            Query::AddressInfo(address) => format!("addresses/{}", urlencoding::encode(address)),
            Query::MempoolStats => "mempool".to_string(),
            Query::Summary => "summary".to_string(),
            Query::BlockSizeHistory { .. } => "charts/block-size".to_string(),
            Query::TxFeeHistory { .. } => "charts/tx-fees".to_string(),
            Query::TxVolumeHistory { .. } => "charts/tx-volume".to_string(),
            Query::AddressActivityHistory { .. } => "charts/address-activity".to_string(),
            Query::BalanceDistribution => "charts/balance-distribution".to_string(),
            Query::MempoolSizeHistory { .. } => "charts/mempool-size".to_string(),
            Query::FeeRatesHistory { .. } => "charts/fee-rates".to_string(),
            Query::ProtocolFeatureAdoption { .. } => "charts/protocol-features".to_string(),
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::RecentBlocks { limit } | Query::RecentTransactions { limit } => {
                vec![("limit", limit.to_string())]
            }
            Query::BlockSizeHistory { days }
            | Query::TxFeeHistory { days }
            | Query::TxVolumeHistory { days }
            | Query::AddressActivityHistory { days }
            | Query::ProtocolFeatureAdoption { days } => vec![("days", days.to_string())],
            Query::MempoolSizeHistory { hours } | Query::FeeRatesHistory { hours } => {
                vec![("hours", hours.to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Window for series whose label count follows the requested range.
    /// Categorical charts (balance buckets, protocol features) have none.
    pub fn window(&self) -> Option<Window> {
        match *self {
            Query::BlockSizeHistory { days }
            | Query::TxFeeHistory { days }
            | Query::TxVolumeHistory { days }
            | Query::AddressActivityHistory { days } => Some(Window::Days(days)),
            Query::MempoolSizeHistory { hours } | Query::FeeRatesHistory { hours } => {
                Some(Window::Hours(hours))
            }
            _ => None,
        }
    }

    /// Decode a backend payload into the record shape this query returns.
    pub fn decode(&self, payload: &[u8]) -> Result<Record, serde_json::Error> {
        Ok(match self {
            Query::RecentBlocks { .. } => {
                Record::Blocks(serde_json::from_slice::<Listing<Block>>(payload)?.data)
            }
            Query::BlockByNumber(_) => Record::Block(serde_json::from_slice(payload)?),
            Query::RecentTransactions { .. } => Record::Transactions(
                serde_json::from_slice::<Listing<Transaction>>(payload)?.data,
            ),
            Query::TransactionByHash(_) => Record::Transaction(serde_json::from_slice(payload)?),
            Query::AddressInfo(_) => {
                Record::Address(serde_json::from_slice::<AddressInfo>(payload)?)
            }
            Query::MempoolStats => {
                Record::Mempool(serde_json::from_slice::<MempoolSnapshot>(payload)?)
            }
            Query::Summary => Record::Summary(serde_json::from_slice::<SummaryStats>(payload)?),
            Query::FeeRatesHistory { .. } => {
                Record::Tiers(serde_json::from_slice::<TierSeries>(payload)?)
            }
            _ => Record::Series(serde_json::from_slice::<TimeSeries>(payload)?),
        })
    }

    /// Every query kind with typical parameters.
    #[cfg(test)]
    pub fn catalog() -> Vec<Query> {
        vec![
            Query::RecentBlocks { limit: 10 },
            Query::BlockByNumber(800_000),
            Query::RecentTransactions { limit: 10 },
            Query::TransactionByHash("4a5e1e4baab89f3a32518a88c31bc87f".to_string()),
            Query::AddressInfo("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".to_string()),
            Query::MempoolStats,
            Query::Summary,
            Query::BlockSizeHistory { days: DEFAULT_DAYS },
            Query::TxFeeHistory { days: DEFAULT_DAYS },
            Query::TxVolumeHistory { days: DEFAULT_DAYS },
            Query::AddressActivityHistory { days: DEFAULT_DAYS },
            Query::BalanceDistribution,
            Query::MempoolSizeHistory { hours: DEFAULT_HOURS },
            Query::FeeRatesHistory { hours: DEFAULT_HOURS },
            Query::ProtocolFeatureAdoption { days: DEFAULT_DAYS },
        ]
    }
}
