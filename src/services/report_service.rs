// src/services/report_service.rs

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::report::{SalesReport, SalesReportQuery},
};

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    pub async fn sales_report(&self, query: &SalesReportQuery) -> Result<SalesReport, AppError> {
        check_range(query)?;
        self.repo.sales_report(query.from, query.to).await
    }
}

fn check_range(query: &SalesReportQuery) -> Result<(), AppError> {
    match (query.from, query.to) {
        (Some(from), Some(to)) if from > to => Err(AppError::BadRequest(format!(
            "Intervalo inválido: {} é depois de {}.",
            from, to
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 6, d)
    }

    #[test]
    fn inverted_range_is_rejected() {
        let query = SalesReportQuery { from: day(10), to: day(2) };
        assert!(matches!(check_range(&query), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn open_or_single_day_ranges_are_accepted() {
        assert!(check_range(&SalesReportQuery::default()).is_ok());
        assert!(check_range(&SalesReportQuery { from: day(2), to: None }).is_ok());
        assert!(check_range(&SalesReportQuery { from: day(5), to: day(5) }).is_ok());
    }
}
