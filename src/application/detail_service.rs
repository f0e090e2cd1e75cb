// Detail lookups behind clickable block and transaction rows
use crate::application::data_source::DataSource;
use crate::domain::error::RenderInputError;
use crate::domain::panel::Origin;
use crate::domain::query::Query;
use crate::domain::records::{Block, Record, Transaction};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Detail<T> {
    pub record: T,
    pub origin: Origin,
}

#[derive(Clone)]
pub struct DetailService {
    source: Arc<dyn DataSource>,
}

impl DetailService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub async fn block_details(&self, number: u64) -> Result<Detail<Block>, RenderInputError> {
        let sourced = self.source.fetch(&Query::BlockByNumber(number)).await;
        match sourced.record {
            Record::Block(block) => Ok(Detail {
                record: block,
                origin: sourced.origin,
            }),
            other => Err(RenderInputError::UnexpectedRecord {
                expected: "block",
                found: other.kind(),
            }),
        }
    }

    pub async fn transaction_details(
        &self,
        hash: &str,
    ) -> Result<Detail<Transaction>, RenderInputError> {
        let sourced = self
            .source
            .fetch(&Query::TransactionByHash(hash.to_string()))
            .await;
        match sourced.record {
            Record::Transaction(tx) => Ok(Detail {
                record: tx,
                origin: sourced.origin,
            }),
            other => Err(RenderInputError::UnexpectedRecord {
                expected: "transaction",
                found: other.kind(),
            }),
        }
    }
}
