//! `school_stats` repository

use crate::db::{tables, DynDataStore, Filter, Select};
use crate::error::BackendError;
use crate::models::{StatsInput, StatsRecord, STATS_ROW_ID};

use super::{decode_single, encode_row};

#[derive(Clone)]
pub struct StatsRepository {
    store: DynDataStore,
}

impl StatsRepository {
    pub fn new(store: DynDataStore) -> Self {
        Self { store }
    }

    /// Fetch the singleton row
    pub async fn get(&self) -> Result<StatsRecord, BackendError> {
        let rows = self
            .store
            .select(&Select::from(tables::SCHOOL_STATS).eq("id", STATS_ROW_ID).single())
            .await?;
        decode_single(rows)
    }

    /// Overwrite all three fields of the singleton row
    pub async fn update(&self, input: &StatsInput) -> Result<(), BackendError> {
        self.store
            .update(
                tables::SCHOOL_STATS,
                encode_row(input)?,
                &Filter::eq("id", STATS_ROW_ID),
            )
            .await
    }
}
