// Read-only view: progress per SJ dan history bundle
use crate::domain::progress::{Milestone, MilestoneState, ProgressRecord};
use crate::domain::{DateRange, ShipmentDocument};
use crate::error::AppResult;
use crate::repositories::ShipmentApi;

/// Satu baris tabel progress yang sudah diproyeksikan
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRow {
    pub record: ProgressRecord,
    pub states: [MilestoneState; 10],
    pub current: Option<Milestone>,
}

impl ProgressRow {
    pub fn from_record(record: ProgressRecord) -> Self {
        let states = record.milestone_states();
        let current = record.current();
        Self {
            record,
            states,
            current,
        }
    }

    // DONE untuk flag 1, selain itu PENDING
    pub fn labels(&self) -> [&'static str; 10] {
        self.states.map(|state| match state {
            MilestoneState::Done => MilestoneState::Done.as_str(),
            _ => MilestoneState::Pending.as_str(),
        })
    }

    pub fn current_label(&self) -> &'static str {
        self.current.map(|m| m.label()).unwrap_or("Selesai")
    }
}

pub async fn progress<A: ShipmentApi + ?Sized>(
    api: &A,
    range: DateRange,
) -> AppResult<Vec<ProgressRow>> {
    let records = match api.list_progress(range).await {
        Ok(records) => records,
        Err(err) if err.is_unauthorized() => return Err(err.into()),
        Err(err) => {
            tracing::warn!("⚠️ Gagal memuat progress: {}", err);
            Vec::new()
        }
    };

    Ok(records.into_iter().map(ProgressRow::from_record).collect())
}

pub async fn history<A: ShipmentApi + ?Sized>(
    api: &A,
    range: DateRange,
) -> AppResult<Vec<ShipmentDocument>> {
    match api.list_history(range).await {
        Ok(docs) => Ok(docs),
        Err(err) if err.is_unauthorized() => Err(err.into()),
        Err(err) => {
            tracing::warn!("⚠️ Gagal memuat history: {}", err);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockShipmentApi;
    use chrono::NaiveDate;
    use shared::HttpClientError;

    fn range() -> DateRange {
        DateRange::current_month(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn record(flags: [u8; 10]) -> ProgressRecord {
        ProgressRecord {
            document_no: "SJ-1".to_string(),
            customer: None,
            movement_date: None,
            driver: None,
            tnkb: None,
            delivery: flags[0],
            ondpk: flags[1],
            ondriver: flags[2],
            oncustomer: flags[3],
            outcustomer: flags[4],
            comebackdpk: flags[5],
            comebackdel: flags[6],
            comebackmkt: flags[7],
            comebackfat: flags[8],
            finishfat: flags[9],
        }
    }

    #[test]
    fn test_row_labels_and_current() {
        let row = ProgressRow::from_record(record([1, 1, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(row.labels()[1], "DONE");
        assert_eq!(row.labels()[2], "PENDING");
        assert_eq!(row.current, Some(Milestone::OnDriver));
        assert_eq!(row.current_label(), "On Driver");
    }

    #[test]
    fn test_finished_row_has_no_current() {
        let row = ProgressRow::from_record(record([1; 10]));
        assert_eq!(row.current, None);
        assert_eq!(row.current_label(), "Selesai");
    }

    #[tokio::test]
    async fn test_progress_read_failure_is_empty() {
        let mut api = MockShipmentApi::new();
        api.expect_list_progress()
            .times(1)
            .returning(|_| Err(HttpClientError::ServiceUnavailable("down".to_string())));

        assert!(progress(&api, range()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_unauthorized_propagates() {
        let mut api = MockShipmentApi::new();
        api.expect_list_history()
            .times(1)
            .returning(|_| Err(HttpClientError::Unauthorized("expired".to_string())));

        assert!(history(&api, range()).await.unwrap_err().is_unauthorized());
    }
}
