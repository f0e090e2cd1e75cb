// Synthetic analytics data used in mock mode and when the backend is unavailable
use crate::application::query_service::FallbackGenerator;
use crate::domain::query::{Query, Window};
use crate::domain::records::{
    ActivityKind, AddressActivity, AddressInfo, Block, MempoolSnapshot, Record, SummaryStats,
    TierSeries, TimeSeries, Transaction,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

const CHAIN_TIP: u64 = 800_000;
const MINERS: [&str; 5] = ["Antpool", "F2Pool", "Foundry USA", "Binance Pool", "ViaBTC"];
const BALANCE_BUCKETS: [(&str, f64); 7] = [
    ("0-0.01 BTC", 65.0),
    ("0.01-0.1 BTC", 25.0),
    ("0.1-1 BTC", 7.0),
    ("1-10 BTC", 2.0),
    ("10-100 BTC", 0.7),
    ("100-1000 BTC", 0.25),
    ("1000+ BTC", 0.05),
];

#[derive(Debug, Clone, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl FallbackGenerator for MockGenerator {
    fn generate(&self, query: &Query) -> Record {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        match query {
            Query::RecentBlocks { limit } => Record::Blocks(
                (0..u64::from(*limit))
                    .map(|i| {
                        let timestamp = now - Duration::minutes(10 * i as i64);
                        block(&mut rng, CHAIN_TIP.saturating_sub(i), timestamp)
                    })
                    .collect(),
            ),
            Query::BlockByNumber(number) => {
                let age = CHAIN_TIP.saturating_sub(*number).min(1_000) as i64;
                Record::Block(block(&mut rng, *number, now - Duration::minutes(10 * age)))
            }
            Query::RecentTransactions { limit } => Record::Transactions(
                (0..u64::from(*limit))
                    .map(|i| {
                        let hash = random_hex(&mut rng, 64);
                        let mut tx = transaction(
                            &mut rng,
                            hash,
                            CHAIN_TIP.saturating_sub(i / 3),
                            now - Duration::minutes(2 * i as i64),
                        );
                        tx.is_coinbase = i == 0;
                        tx
                    })
                    .collect(),
            ),
            Query::TransactionByHash(hash) => {
                Record::Transaction(transaction(&mut rng, hash.clone(), CHAIN_TIP, now))
            }
            Query::AddressInfo(address) => Record::Address(address_info(&mut rng, address, now)),
            Query::MempoolStats => Record::Mempool(MempoolSnapshot {
                timestamp: now,
                transaction_count: rng.gen_range(10_000..15_000),
                total_fee: rng.gen_range(50_000_000..150_000_000),
                median_fee_rate: rng.gen_range(10.0..60.0),
                high_priority_fee_rate: rng.gen_range(50.0..150.0),
                medium_priority_fee_rate: rng.gen_range(10.0..60.0),
                low_priority_fee_rate: rng.gen_range(1.0..11.0),
                total_mempool_size: rng.gen_range(50_000_000..150_000_000),
            }),
            Query::Summary => Record::Summary(SummaryStats {
                latest_block: CHAIN_TIP,
                transaction_count_24h: rng.gen_range(200_000..500_000),
                average_fee: rng.gen_range(10.0..60.0),
                segwit_adoption: rng.gen_range(70.0..100.0),
            }),
            Query::BlockSizeHistory { days } | Query::AddressActivityHistory { days } => {
                windowed(&mut rng, Window::Days(*days), now, 500_000.0..1_500_000.0)
            }
            Query::TxFeeHistory { days } => {
                windowed(&mut rng, Window::Days(*days), now, 5.0..105.0)
            }
            Query::TxVolumeHistory { days } => {
                windowed(&mut rng, Window::Days(*days), now, 200_000.0..500_000.0)
            }
            Query::MempoolSizeHistory { hours } => {
                windowed(&mut rng, Window::Hours(*hours), now, 10_000_000.0..60_000_000.0)
            }
            Query::FeeRatesHistory { hours } => {
                let labels = window_labels(Window::Hours(*hours), now);
                let n = labels.len();
                Record::Tiers(TierSeries {
                    labels,
                    high: (0..n).map(|_| rng.gen_range(50.0..150.0)).collect(),
                    medium: (0..n).map(|_| rng.gen_range(10.0..60.0)).collect(),
                    low: (0..n).map(|_| rng.gen_range(1.0..11.0)).collect(),
                })
            }
            Query::BalanceDistribution => Record::Series(TimeSeries {
                labels: BALANCE_BUCKETS.iter().map(|(l, _)| l.to_string()).collect(),
                data: BALANCE_BUCKETS.iter().map(|(_, v)| *v).collect(),
            }),
            Query::ProtocolFeatureAdoption { .. } => Record::Series(TimeSeries {
                labels: vec!["SegWit".to_string(), "Taproot".to_string()],
                data: vec![rng.gen_range(70.0..100.0), rng.gen_range(10.0..30.0)],
            }),
        }
    }
}

/// Labels oldest first: dates for day windows, `HH:00` for hour windows.
pub fn window_labels(window: Window, now: DateTime<Utc>) -> Vec<String> {
    let n = window.points() as i64;
    (0..n)
        .map(|i| match window {
            Window::Days(_) => (now - Duration::days(n - 1 - i))
                .format("%Y-%m-%d")
                .to_string(),
            Window::Hours(_) => (now - Duration::hours(n - 1 - i))
                .format("%H:00")
                .to_string(),
        })
        .collect()
}

fn windowed(
    rng: &mut impl Rng,
    window: Window,
    now: DateTime<Utc>,
    range: std::ops::Range<f64>,
) -> Record {
    let labels = window_labels(window, now);
    let data = labels
        .iter()
        .map(|_| rng.gen_range(range.clone()).round())
        .collect();
    Record::Series(TimeSeries { labels, data })
}

fn block(rng: &mut impl Rng, number: u64, timestamp: DateTime<Utc>) -> Block {
    Block {
        block_number: number,
        block_hash: format!("000000000000000000{}", random_hex(rng, 46)),
        timestamp,
        size: rng.gen_range(500_000..1_500_000),
        weight: rng.gen_range(2_000_000..4_000_000),
        transaction_count: rng.gen_range(1_000..3_000),
        miner: MINERS[rng.gen_range(0..MINERS.len())].to_string(),
        version: 536_870_912,
        difficulty: "49.11 T".to_string(),
        protocol_features: Some(format!(
            r#"[{{"name":"SegWit","count":{}}},{{"name":"Taproot","count":{}}}]"#,
            rng.gen_range(500..2_000),
            rng.gen_range(100..600)
        )),
    }
}

fn transaction(
    rng: &mut impl Rng,
    hash: String,
    block_number: u64,
    timestamp: DateTime<Utc>,
) -> Transaction {
    let virtual_size: u64 = rng.gen_range(200..1_200);
    let fee_rate: f64 = rng.gen_range(5.0..105.0);
    let output_value: u64 = rng.gen_range(10_000..10_000_000_000);
    let fee = (fee_rate * virtual_size as f64) as u64;

    Transaction {
        transaction_hash: hash,
        block_number,
        timestamp,
        size: virtual_size + rng.gen_range(0..200),
        weight: virtual_size * 4,
        virtual_size,
        fee,
        fee_rate,
        input_count: rng.gen_range(1..11),
        output_count: rng.gen_range(1..6),
        total_input_value: output_value + fee,
        total_output_value: output_value,
        is_coinbase: false,
        transaction_type: rng.gen_range(1..4),
    }
}

fn address_info(rng: &mut impl Rng, address: &str, now: DateTime<Utc>) -> AddressInfo {
    AddressInfo {
        address: address.to_string(),
        balance: rng.gen_range(0..10_000_000_000),
        transaction_count: rng.gen_range(10..110),
        first_seen: now - Duration::days(rng.gen_range(1..365)),
        utxo_count: rng.gen_range(1..21),
        recent_activity: (0..5)
            .map(|i| AddressActivity {
                transaction_hash: random_hex(rng, 64),
                timestamp: now - Duration::days(i),
                value: rng.gen_range(1_000..100_000_000),
                kind: if rng.gen_bool(0.5) {
                    ActivityKind::Send
                } else {
                    ActivityKind::Receive
                },
            })
            .collect(),
    }
}

fn random_hex(rng: &mut impl Rng, len: usize) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    (0..len)
        .map(|_| DIGITS[rng.gen_range(0..16)] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windowed_series_have_window_length() {
        let generator = MockGenerator::new();
        for query in Query::catalog() {
            let Some(window) = query.window() else {
                continue;
            };
            match generator.generate(&query) {
                Record::Series(series) => {
                    assert_eq!(series.labels.len(), window.points(), "{}", query.name());
                    assert_eq!(series.data.len(), window.points(), "{}", query.name());
                }
                Record::Tiers(tiers) => {
                    assert_eq!(tiers.labels.len(), window.points());
                    assert!(tiers.is_consistent());
                }
                other => panic!("{} produced {}", query.name(), other.kind()),
            }
        }
    }

    #[test]
    fn test_requested_window_is_honored() {
        let generator = MockGenerator::new();
        match generator.generate(&Query::TxVolumeHistory { days: 30 }) {
            Record::Series(series) => assert_eq!(series.labels.len(), 30),
            other => panic!("unexpected {}", other.kind()),
        }
        match generator.generate(&Query::FeeRatesHistory { hours: 24 }) {
            Record::Tiers(tiers) => assert_eq!(tiers.low.len(), 24),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_window_labels_end_today() {
        let now = "2024-03-10T15:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let days = window_labels(Window::Days(7), now);
        assert_eq!(days.first().unwrap(), "2024-03-04");
        assert_eq!(days.last().unwrap(), "2024-03-10");

        let hours = window_labels(Window::Hours(24), now);
        assert_eq!(hours.first().unwrap(), "16:00");
        assert_eq!(hours.last().unwrap(), "15:00");
    }

    #[test]
    fn test_lookups_echo_their_key() {
        let generator = MockGenerator::new();
        match generator.generate(&Query::AddressInfo("bc1qtest".to_string())) {
            Record::Address(info) => {
                assert_eq!(info.address, "bc1qtest");
                assert_eq!(info.recent_activity.len(), 5);
            }
            other => panic!("unexpected {}", other.kind()),
        }
        match generator.generate(&Query::BlockByNumber(123)) {
            Record::Block(block) => {
                assert_eq!(block.block_number, 123);
                assert_eq!(block.block_hash.len(), 64);
            }
            other => panic!("unexpected {}", other.kind()),
        }
        match generator.generate(&Query::RecentTransactions { limit: 4 }) {
            Record::Transactions(txs) => {
                assert_eq!(txs.len(), 4);
                assert!(txs[0].is_coinbase);
                assert!(!txs[1].is_coinbase);
            }
            other => panic!("unexpected {}", other.kind()),
        }
    }
}
