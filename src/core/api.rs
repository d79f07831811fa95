//! Persistence seam: the REST surface a backend would implement

use crate::core::ratios::{FinancialRatios, FinancialStatement};
use crate::core::record::{Investment, InvestmentId};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

/// Endpoints of the investments REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListInvestments,
    CreateInvestment,
    GetInvestment(InvestmentId),
    UpdateInvestment(InvestmentId),
    DeleteInvestment(InvestmentId),
    DueDiligence,
    AnalyzeFinancials,
}

impl Route {
    pub fn method(&self) -> &'static str {
        match self {
            Route::ListInvestments | Route::GetInvestment(_) => "GET",
            Route::CreateInvestment | Route::DueDiligence | Route::AnalyzeFinancials => "POST",
            Route::UpdateInvestment(_) => "PUT",
            Route::DeleteInvestment(_) => "DELETE",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::ListInvestments | Route::CreateInvestment => "/api/investments".to_string(),
            Route::GetInvestment(id) | Route::UpdateInvestment(id) | Route::DeleteInvestment(id) => {
                format!("/api/investments/{id}")
            }
            Route::DueDiligence => "/api/documents/due-diligence".to_string(),
            Route::AnalyzeFinancials => "/api/analyze".to_string(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[async_trait]
pub trait InvestmentApi: Send + Sync {
    async fn list(&self) -> Result<Option<Vec<Investment>>>;
    async fn get(&self, id: InvestmentId) -> Result<Option<Investment>>;
    async fn create(&self, investment: &Investment) -> Result<()>;
    async fn update(&self, investment: &Investment) -> Result<()>;
    async fn delete(&self, id: InvestmentId) -> Result<()>;
    async fn request_due_diligence(&self, investment: &Investment) -> Result<()>;
    /// Ratios computed by the backend, or `None` when it has no answer.
    async fn analyze_financials(
        &self,
        statement: &FinancialStatement,
    ) -> Result<Option<FinancialRatios>>;
}

/// An API that is not attached to any backend.
///
/// Every call is logged with its route and JSON body and then reports success.
/// Reads return `None` so callers keep using their in-memory state.
#[derive(Debug, Default, Clone)]
pub struct DetachedApi;

impl DetachedApi {
    fn skip(route: Route) {
        debug!(%route, "API call skipped, no backend attached");
    }

    fn trace<T: Serialize>(route: Route, body: &T) -> Result<()> {
        let payload = serde_json::to_string(body)?;
        debug!(%route, %payload, "API call skipped, no backend attached");
        Ok(())
    }
}

#[async_trait]
impl InvestmentApi for DetachedApi {
    async fn list(&self) -> Result<Option<Vec<Investment>>> {
        Self::skip(Route::ListInvestments);
        Ok(None)
    }

    async fn get(&self, id: InvestmentId) -> Result<Option<Investment>> {
        Self::skip(Route::GetInvestment(id));
        Ok(None)
    }

    async fn create(&self, investment: &Investment) -> Result<()> {
        Self::trace(Route::CreateInvestment, investment)
    }

    async fn update(&self, investment: &Investment) -> Result<()> {
        Self::trace(Route::UpdateInvestment(investment.id), investment)
    }

    async fn delete(&self, id: InvestmentId) -> Result<()> {
        Self::skip(Route::DeleteInvestment(id));
        Ok(())
    }

    async fn request_due_diligence(&self, investment: &Investment) -> Result<()> {
        Self::trace(Route::DueDiligence, investment)
    }

    async fn analyze_financials(
        &self,
        statement: &FinancialStatement,
    ) -> Result<Option<FinancialRatios>> {
        Self::trace(Route::AnalyzeFinancials, statement)?;
        Ok(None)
    }
}
