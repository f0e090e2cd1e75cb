// Dashboard panel views: record shape in, sink frame out
use crate::application::panel::PanelView;
use crate::domain::error::{ConfigError, RenderInputError};
use crate::domain::format::{
    Formatter, format_btc, format_bytes, format_compact, format_count, format_fee_rate,
    format_percent, format_size, format_thousands, time_ago, transaction_type_label,
    truncate_middle,
};
use crate::domain::panel::{
    ChartKind, ChartOptions, FrameBody, ListRow, PanelConfig, SeriesStyle, StatCard,
};
use crate::domain::query::Query;
use crate::domain::records::Record;
use crate::infrastructure::config::PanelSettings;
use chrono::Utc;

const PRIMARY: &str = "#f7931a";
const SECONDARY: &str = "#3490dc";
const TERTIARY: &str = "#38c172";
const DANGER: &str = "#e3342f";
const CHART_HEIGHT: u32 = 300;

fn unexpected(expected: &'static str, record: &Record) -> RenderInputError {
    RenderInputError::UnexpectedRecord {
        expected,
        found: record.kind(),
    }
}

/// Single-series chart fed by a `{labels, data}` record.
pub struct SeriesChartView {
    options: ChartOptions,
    config: PanelConfig,
    query: Query,
}

impl SeriesChartView {
    #[allow(clippy::too_many_arguments)]
    fn build(
        element: &str,
        title: &str,
        query: Query,
        kind: ChartKind,
        series: SeriesStyle,
        tooltip: Formatter,
        axis: Formatter,
        subtitle: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut options =
            ChartOptions::new(title, kind, CHART_HEIGHT, vec![series], axis, tooltip)?;
        if let Some(subtitle) = subtitle {
            options = options.with_subtitle(subtitle);
        }
        Ok(Self {
            config: PanelConfig::chart(element, title, options.clone()),
            options,
            query,
        })
    }

    pub fn block_size(days: u32) -> Result<Self, ConfigError> {
        Self::build(
            "block-size-chart",
            &format!("Block Size (Last {} Days)", days),
            Query::BlockSizeHistory { days },
            ChartKind::Area,
            SeriesStyle::new("Block Size", PRIMARY),
            format_size,
            format_compact,
            Some("Average size in bytes"),
        )
    }

    pub fn fee(days: u32) -> Result<Self, ConfigError> {
        Self::build(
            "tx-fee-chart",
            &format!("Transaction Fees (Last {} Days)", days),
            Query::TxFeeHistory { days },
            ChartKind::Line,
            SeriesStyle::new("Average Fee Rate", SECONDARY),
            format_fee_rate,
            format_compact,
            Some("Average fee rate in sat/vB"),
        )
    }

    pub fn volume(days: u32) -> Result<Self, ConfigError> {
        Self::build(
            "tx-volume-chart",
            &format!("Transaction Volume (Last {} Days)", days),
            Query::TxVolumeHistory { days },
            ChartKind::Bar,
            SeriesStyle::new("Transaction Count", TERTIARY),
            format_count,
            format_compact,
            None,
        )
    }

    pub fn address_activity(days: u32) -> Result<Self, ConfigError> {
        Self::build(
            "address-activity-chart",
            &format!("Address Activity (Last {} Days)", days),
            Query::AddressActivityHistory { days },
            ChartKind::Area,
            SeriesStyle::new("Active Addresses", SECONDARY),
            format_count,
            format_compact,
            None,
        )
    }

    pub fn balance_distribution() -> Result<Self, ConfigError> {
        Self::build(
            "balance-distribution-chart",
            "Balance Distribution",
            Query::BalanceDistribution,
            ChartKind::Pie,
            SeriesStyle::new("Addresses", PRIMARY),
            format_percent,
            format_percent,
            Some("Share of addresses by balance"),
        )
    }

    pub fn mempool_size(hours: u32) -> Result<Self, ConfigError> {
        Self::build(
            "mempool-size-chart",
            &format!("Mempool Size (Last {} Hours)", hours),
            Query::MempoolSizeHistory { hours },
            ChartKind::Area,
            SeriesStyle::new("Mempool Size", DANGER),
            format_size,
            format_compact,
            None,
        )
    }

    pub fn protocol_features(days: u32) -> Result<Self, ConfigError> {
        Self::build(
            "protocol-features-chart",
            "Protocol Feature Adoption",
            Query::ProtocolFeatureAdoption { days },
            ChartKind::Bar,
            SeriesStyle::new("Adoption", PRIMARY),
            format_percent,
            format_percent,
            Some("Share of transactions using each feature"),
        )
    }
}

impl PanelView for SeriesChartView {
    fn query(&self) -> Query {
        self.query.clone()
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        match record {
            Record::Series(series) => self
                .options
                .frame(series.labels, vec![series.data])
                .map(FrameBody::Chart),
            other => Err(unexpected("series", &other)),
        }
    }
}

/// High/medium/low fee-rate tiers on one chart.
pub struct TierChartView {
    options: ChartOptions,
    config: PanelConfig,
    hours: u32,
}

impl TierChartView {
    pub fn fee_rates(hours: u32) -> Result<Self, ConfigError> {
        let title = format!("Fee Rates (Last {} Hours)", hours);
        let options = ChartOptions::new(
            &title,
            ChartKind::Line,
            CHART_HEIGHT,
            vec![
                SeriesStyle::new("High Priority", DANGER),
                SeriesStyle::new("Medium Priority", PRIMARY),
                SeriesStyle::new("Low Priority", TERTIARY),
            ],
            format_compact,
            format_fee_rate,
        )?
        .with_subtitle("Fee rate in sat/vB by confirmation priority");

        Ok(Self {
            config: PanelConfig::chart("fee-rates-chart", &title, options.clone()),
            options,
            hours,
        })
    }
}

impl PanelView for TierChartView {
    fn query(&self) -> Query {
        Query::FeeRatesHistory { hours: self.hours }
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        match record {
            Record::Tiers(tiers) => self
                .options
                .frame(tiers.labels, vec![tiers.high, tiers.medium, tiers.low])
                .map(FrameBody::Chart),
            other => Err(unexpected("tiers", &other)),
        }
    }
}

pub struct SummaryCardsView {
    config: PanelConfig,
}

impl SummaryCardsView {
    pub fn new() -> Self {
        Self {
            config: PanelConfig::cards("summary-stats", "Summary Statistics"),
        }
    }
}

impl PanelView for SummaryCardsView {
    fn query(&self) -> Query {
        Query::Summary
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        match record {
            Record::Summary(stats) => Ok(FrameBody::Cards(vec![
                StatCard::new("Latest Block", format_thousands(stats.latest_block)),
                StatCard::new(
                    "Transactions (24h)",
                    format_thousands(stats.transaction_count_24h),
                ),
                StatCard::new("Average Fee", format!("{:.2}", stats.average_fee)),
                StatCard::new("SegWit Adoption", format_percent(stats.segwit_adoption)),
            ])),
            other => Err(unexpected("summary", &other)),
        }
    }
}

pub struct MempoolCardsView {
    config: PanelConfig,
}

impl MempoolCardsView {
    pub fn new() -> Self {
        Self {
            config: PanelConfig::cards("mempool-stats", "Mempool Statistics"),
        }
    }
}

impl PanelView for MempoolCardsView {
    fn query(&self) -> Query {
        Query::MempoolStats
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        match record {
            Record::Mempool(mempool) => Ok(FrameBody::Cards(vec![
                StatCard::new(
                    "High Priority",
                    format!("{:.2}", mempool.high_priority_fee_rate),
                ),
                StatCard::new(
                    "Medium Priority",
                    format!("{:.2}", mempool.medium_priority_fee_rate),
                ),
                StatCard::new("Low Priority", format!("{:.2}", mempool.low_priority_fee_rate)),
                StatCard::new(
                    "Pending Transactions",
                    format_thousands(mempool.transaction_count),
                ),
                StatCard::new("Mempool Size", format_bytes(mempool.total_mempool_size)),
            ])),
            other => Err(unexpected("mempool", &other)),
        }
    }
}

pub struct BlockListView {
    config: PanelConfig,
    limit: u32,
}

impl BlockListView {
    pub fn new(limit: u32) -> Self {
        Self {
            config: PanelConfig::list("recent-blocks", "Recent Blocks"),
            limit,
        }
    }
}

impl PanelView for BlockListView {
    fn query(&self) -> Query {
        Query::RecentBlocks { limit: self.limit }
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        let blocks = match record {
            Record::Blocks(blocks) => blocks,
            other => return Err(unexpected("blocks", &other)),
        };
        if blocks.is_empty() {
            return Ok(FrameBody::Empty("No recent blocks found.".to_string()));
        }

        let now = Utc::now();
        Ok(FrameBody::Rows(
            blocks
                .into_iter()
                .map(|block| ListRow {
                    key: block.block_number.to_string(),
                    cells: vec![
                        format_thousands(block.block_number),
                        time_ago(block.timestamp, now),
                        truncate_middle(&block.block_hash, 20),
                        format!("{} txs", block.transaction_count),
                        format_bytes(block.size),
                        block.miner,
                    ],
                    highlight: false,
                })
                .collect(),
        ))
    }
}

pub struct TransactionListView {
    config: PanelConfig,
    limit: u32,
}

impl TransactionListView {
    pub fn new(limit: u32) -> Self {
        Self {
            config: PanelConfig::list("recent-transactions", "Recent Transactions"),
            limit,
        }
    }
}

impl PanelView for TransactionListView {
    fn query(&self) -> Query {
        Query::RecentTransactions { limit: self.limit }
    }

    fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError> {
        let transactions = match record {
            Record::Transactions(transactions) => transactions,
            other => return Err(unexpected("transactions", &other)),
        };
        if transactions.is_empty() {
            return Ok(FrameBody::Empty("No recent transactions found.".to_string()));
        }

        Ok(FrameBody::Rows(
            transactions
                .into_iter()
                .map(|tx| ListRow {
                    cells: vec![
                        truncate_middle(&tx.transaction_hash, 14),
                        format_thousands(tx.virtual_size),
                        format!("{:.2}", tx.fee_rate),
                        format_btc(tx.total_output_value),
                        transaction_type_label(tx.transaction_type).to_string(),
                    ],
                    highlight: tx.is_coinbase,
                    key: tx.transaction_hash,
                })
                .collect(),
        ))
    }
}

/// Every panel on the dashboard, in display order.
pub fn dashboard_views(settings: &PanelSettings) -> Result<Vec<Box<dyn PanelView>>, ConfigError> {
    Ok(vec![
        Box::new(SummaryCardsView::new()),
        Box::new(BlockListView::new(settings.recent_limit)),
        Box::new(TransactionListView::new(settings.recent_limit)),
        Box::new(MempoolCardsView::new()),
        Box::new(SeriesChartView::block_size(settings.history_days)?),
        Box::new(SeriesChartView::fee(settings.history_days)?),
        Box::new(SeriesChartView::volume(settings.history_days)?),
        Box::new(SeriesChartView::address_activity(settings.history_days)?),
        Box::new(SeriesChartView::balance_distribution()?),
        Box::new(SeriesChartView::mempool_size(settings.history_hours)?),
        Box::new(TierChartView::fee_rates(settings.history_hours)?),
        Box::new(SeriesChartView::protocol_features(settings.history_days)?),
    ])
}
