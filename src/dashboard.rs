//! Event handling for the investment dashboard.
//!
//! Every user action arrives as an [`Event`] and goes through
//! [`Dashboard::dispatch`], which mutates the store, moves the form between
//! its states and forwards successful mutations to the [`InvestmentApi`] seam.
use crate::cli::modal::{Modal, ModalState};
use crate::cli::view;
use crate::core::api::{InvestmentApi, Route};
use crate::core::record::{Investment, InvestmentFields, InvestmentId};
use crate::core::store::{RecordStore, SortColumn};
use anyhow::Result;
use tracing::{debug, warn};

pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this investment? This action cannot be undone.";

/// A blocking yes/no question put to the user.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    OpenAdd,
    OpenEdit(InvestmentId),
    Cancel,
    OutsideClick,
    Save(InvestmentFields),
    Delete(InvestmentId),
    Sort(SortColumn),
    Search(String),
    RequestDueDiligence(InvestmentId),
}

/// Whether the table needs to be drawn again after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rerender,
    Unchanged,
}

pub struct Dashboard<A: InvestmentApi> {
    store: RecordStore,
    modal: Modal,
    query: String,
    api: A,
}

fn log_seam_failure(route: Route, result: Result<()>) {
    if let Err(e) = result {
        warn!(%route, error = %e, "API call failed, keeping in-memory change");
    }
}

impl<A: InvestmentApi> Dashboard<A> {
    pub fn new(store: RecordStore, api: A) -> Self {
        Self {
            store,
            modal: Modal::default(),
            query: String::new(),
            api,
        }
    }

    /// Builds a dashboard from the API's records, or from `seed` when the API has none.
    pub async fn load(api: A, seed: Vec<Investment>, date_format: &str) -> Self {
        let records = match api.list().await {
            Ok(Some(records)) => {
                debug!(count = records.len(), "Loaded investments from API");
                records
            }
            Ok(None) => seed,
            Err(e) => {
                warn!(error = %e, "Failed to list investments, using configured records");
                seed
            }
        };
        let store = RecordStore::new(records).with_date_format(date_format);
        Self::new(store, api)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Records matching the current search, in store order.
    pub fn visible(&self) -> Vec<&Investment> {
        view::filter(self.store.list(), &self.query)
    }

    pub fn render(&self) -> String {
        view::render(self.visible(), self.store.sort_state()).to_string()
    }

    pub async fn dispatch(&mut self, event: Event, gate: &mut dyn ConfirmGate) -> Result<Outcome> {
        debug!(?event, "Dispatching event");
        let outcome = match event {
            Event::OpenAdd => {
                self.modal.open_add();
                Outcome::Unchanged
            }
            Event::OpenEdit(id) => self.open_edit(id).await,
            Event::Cancel | Event::OutsideClick => {
                self.modal.close();
                Outcome::Unchanged
            }
            Event::Save(fields) => self.save(fields).await,
            Event::Delete(id) => self.delete(id, gate).await?,
            Event::Sort(column) => {
                self.store.toggle_sort(column);
                Outcome::Rerender
            }
            Event::Search(query) => {
                self.query = query;
                Outcome::Rerender
            }
            Event::RequestDueDiligence(id) => {
                match self.store.get(id) {
                    Some(investment) => log_seam_failure(
                        Route::DueDiligence,
                        self.api.request_due_diligence(investment).await,
                    ),
                    None => warn!(%id, "No investment to request due diligence for"),
                }
                Outcome::Unchanged
            }
        };
        Ok(outcome)
    }

    async fn open_edit(&mut self, id: InvestmentId) -> Outcome {
        let remote = match self.api.get(id).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(%id, error = %e, "Failed to fetch investment, using local copy");
                None
            }
        };
        let current = remote
            .as_ref()
            .or_else(|| self.store.get(id))
            .map(InvestmentFields::from);

        match current {
            Some(fields) => self.modal.open_edit(id, fields),
            None => warn!(%id, "Cannot edit, no such investment"),
        }
        Outcome::Unchanged
    }

    async fn save(&mut self, fields: InvestmentFields) -> Outcome {
        match self.modal.state().clone() {
            ModalState::Closed => {
                warn!("Save ignored, the investment form is not open");
                return Outcome::Unchanged;
            }
            ModalState::Adding => match self.store.add(fields) {
                Ok(created) => {
                    let created = created.clone();
                    log_seam_failure(Route::CreateInvestment, self.api.create(&created).await);
                }
                Err(e) => {
                    warn!(error = %e, "Cannot add investment, keeping the form open");
                    return Outcome::Unchanged;
                }
            },
            ModalState::Editing(id) => match self.store.update(id, fields).cloned() {
                Some(updated) => {
                    log_seam_failure(Route::UpdateInvestment(id), self.api.update(&updated).await)
                }
                None => warn!(%id, "Investment disappeared while editing, nothing saved"),
            },
        }
        self.modal.close();
        Outcome::Rerender
    }

    async fn delete(&mut self, id: InvestmentId, gate: &mut dyn ConfirmGate) -> Result<Outcome> {
        if !gate.confirm(DELETE_PROMPT)? {
            debug!(%id, "Delete cancelled");
            return Ok(Outcome::Unchanged);
        }
        match self.store.remove(id) {
            Some(_) => {
                log_seam_failure(Route::DeleteInvestment(id), self.api.delete(id).await);
                Ok(Outcome::Rerender)
            }
            None => {
                warn!(%id, "Cannot delete, no such investment");
                Ok(Outcome::Unchanged)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::tests::{record, sample_records, test_store};
    use crate::core::ratios::{FinancialRatios, FinancialStatement};
    use crate::core::record::Status;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<Route>>,
        remote: Option<Investment>,
        fail: bool,
    }

    impl RecordingApi {
        fn record(&self, route: Route) -> Result<()> {
            self.calls.lock().unwrap().push(route);
            if self.fail {
                anyhow::bail!("backend unavailable");
            }
            Ok(())
        }

        fn calls(&self) -> Vec<Route> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InvestmentApi for RecordingApi {
        async fn list(&self) -> Result<Option<Vec<Investment>>> {
            self.record(Route::ListInvestments)?;
            Ok(self.remote.clone().map(|inv| vec![inv]))
        }

        async fn get(&self, id: InvestmentId) -> Result<Option<Investment>> {
            self.record(Route::GetInvestment(id))?;
            Ok(self.remote.clone().filter(|inv| inv.id == id))
        }

        async fn create(&self, _investment: &Investment) -> Result<()> {
            self.record(Route::CreateInvestment)
        }

        async fn update(&self, investment: &Investment) -> Result<()> {
            self.record(Route::UpdateInvestment(investment.id))
        }

        async fn delete(&self, id: InvestmentId) -> Result<()> {
            self.record(Route::DeleteInvestment(id))
        }

        async fn request_due_diligence(&self, _investment: &Investment) -> Result<()> {
            self.record(Route::DueDiligence)
        }

        async fn analyze_financials(
            &self,
            _statement: &FinancialStatement,
        ) -> Result<Option<FinancialRatios>> {
            self.record(Route::AnalyzeFinancials)?;
            Ok(None)
        }
    }

    struct Answer {
        yes: bool,
        asked: usize,
    }

    impl Answer {
        fn yes() -> Self {
            Answer { yes: true, asked: 0 }
        }

        fn no() -> Self {
            Answer { yes: false, asked: 0 }
        }
    }

    impl ConfirmGate for Answer {
        fn confirm(&mut self, prompt: &str) -> Result<bool> {
            assert_eq!(prompt, DELETE_PROMPT);
            self.asked += 1;
            Ok(self.yes)
        }
    }

    fn dashboard() -> Dashboard<RecordingApi> {
        Dashboard::new(test_store(sample_records()), RecordingApi::default())
    }

    fn acme() -> InvestmentFields {
        InvestmentFields {
            company: "Acme".to_string(),
            industry: "Tools".to_string(),
            funding_round: "Seed".to_string(),
            amount: "$100,000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_flow() {
        let mut dash = dashboard();
        let gate = &mut Answer::yes();

        assert_eq!(dash.dispatch(Event::OpenAdd, gate).await.unwrap(), Outcome::Unchanged);
        assert_eq!(dash.modal().state(), &ModalState::Adding);

        let outcome = dash.dispatch(Event::Save(acme()), gate).await.unwrap();

        assert_eq!(outcome, Outcome::Rerender);
        assert_eq!(dash.modal().state(), &ModalState::Closed);
        let added = dash.store().get(InvestmentId(4)).expect("new record");
        assert_eq!(added.company, "Acme");
        assert_eq!(added.status, Status::PendingAnalysis);
        assert_eq!(dash.api().calls(), vec![Route::CreateInvestment]);
    }

    #[tokio::test]
    async fn test_add_with_exhausted_ids_keeps_form_open() {
        let store = test_store(vec![record(u32::MAX, "Last", "$1", 50)]);
        let mut dash = Dashboard::new(store, RecordingApi::default());
        let gate = &mut Answer::yes();

        dash.dispatch(Event::OpenAdd, gate).await.unwrap();
        let outcome = dash.dispatch(Event::Save(acme()), gate).await.unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(dash.modal().state(), &ModalState::Adding);
        assert_eq!(dash.store().len(), 1);
        assert!(dash.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_flow_prefills_and_updates() {
        let mut dash = dashboard();
        let gate = &mut Answer::yes();

        dash.dispatch(Event::OpenEdit(InvestmentId(3)), gate).await.unwrap();

        assert_eq!(dash.modal().state(), &ModalState::Editing(InvestmentId(3)));
        assert_eq!(dash.modal().form().company, "GreenEnergy Corp");
        assert_eq!(dash.modal().form().amount, "$750,000");

        dash.dispatch(Event::Save(acme()), gate).await.unwrap();

        assert_eq!(dash.store().len(), 3);
        assert_eq!(dash.store().get(InvestmentId(3)).unwrap().company, "Acme");
        assert_eq!(
            dash.api().calls(),
            vec![
                Route::GetInvestment(InvestmentId(3)),
                Route::UpdateInvestment(InvestmentId(3))
            ]
        );
    }

    #[tokio::test]
    async fn test_edit_prefers_remote_copy() {
        let mut remote = sample_records()[0].clone();
        remote.company = "TechVision AI (remote)".to_string();
        let api = RecordingApi {
            remote: Some(remote),
            ..Default::default()
        };
        let mut dash = Dashboard::new(test_store(sample_records()), api);

        dash.dispatch(Event::OpenEdit(InvestmentId(1)), &mut Answer::yes())
            .await
            .unwrap();

        assert_eq!(dash.modal().form().company, "TechVision AI (remote)");
    }

    #[tokio::test]
    async fn test_edit_unknown_id_keeps_modal_closed() {
        let mut dash = dashboard();

        dash.dispatch(Event::OpenEdit(InvestmentId(99)), &mut Answer::yes())
            .await
            .unwrap();

        assert!(!dash.modal().is_open());
    }

    #[tokio::test]
    async fn test_cancel_and_outside_click_close_without_saving() {
        let mut dash = dashboard();
        let gate = &mut Answer::yes();

        dash.dispatch(Event::OpenAdd, gate).await.unwrap();
        dash.dispatch(Event::Cancel, gate).await.unwrap();
        assert!(!dash.modal().is_open());

        dash.dispatch(Event::OpenEdit(InvestmentId(1)), gate).await.unwrap();
        dash.dispatch(Event::OutsideClick, gate).await.unwrap();
        assert!(!dash.modal().is_open());
        assert_eq!(dash.modal().form(), &InvestmentFields::default());

        assert_eq!(dash.store().len(), 3);
    }

    #[tokio::test]
    async fn test_save_with_closed_modal_is_ignored() {
        let mut dash = dashboard();

        let outcome = dash.dispatch(Event::Save(acme()), &mut Answer::yes()).await.unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(dash.store().len(), 3);
        assert!(dash.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut dash = dashboard();
        let mut declined = Answer::no();

        let outcome = dash
            .dispatch(Event::Delete(InvestmentId(2)), &mut declined)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(declined.asked, 1);
        assert_eq!(dash.store().len(), 3);
        assert!(dash.api().calls().is_empty());

        let mut accepted = Answer::yes();
        let outcome = dash
            .dispatch(Event::Delete(InvestmentId(2)), &mut accepted)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Rerender);
        assert!(dash.store().get(InvestmentId(2)).is_none());
        assert_eq!(dash.api().calls(), vec![Route::DeleteInvestment(InvestmentId(2))]);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let mut dash = dashboard();

        let outcome = dash
            .dispatch(Event::Delete(InvestmentId(9)), &mut Answer::yes())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(dash.store().len(), 3);
        assert!(dash.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_seam_failure_keeps_local_change() {
        let api = RecordingApi {
            fail: true,
            ..Default::default()
        };
        let mut dash = Dashboard::new(test_store(sample_records()), api);
        let gate = &mut Answer::yes();

        dash.dispatch(Event::OpenAdd, gate).await.unwrap();
        dash.dispatch(Event::Save(acme()), gate).await.unwrap();

        assert_eq!(dash.store().len(), 4);
    }

    #[tokio::test]
    async fn test_sort_and_search_shape_visible_rows() {
        let mut dash = dashboard();
        let gate = &mut Answer::yes();

        dash.dispatch(Event::Sort(SortColumn::IaiScore), gate).await.unwrap();
        dash.dispatch(Event::Sort(SortColumn::IaiScore), gate).await.unwrap();
        let order: Vec<_> = dash.visible().iter().map(|inv| inv.id.0).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert!(!dash.store().sort_state().ascending);

        dash.dispatch(Event::Search("ENERGY".to_string()), gate).await.unwrap();
        let order: Vec<_> = dash.visible().iter().map(|inv| inv.id.0).collect();
        assert_eq!(order, vec![3]);
        assert_eq!(dash.query(), "ENERGY");

        // Search stays applied across mutations.
        dash.dispatch(Event::OpenAdd, gate).await.unwrap();
        dash.dispatch(Event::Save(acme()), gate).await.unwrap();
        assert_eq!(dash.visible().len(), 1);

        dash.dispatch(Event::Search(String::new()), gate).await.unwrap();
        assert_eq!(dash.visible().len(), 4);
    }

    #[tokio::test]
    async fn test_due_diligence_request() {
        let mut dash = dashboard();
        let gate = &mut Answer::yes();

        dash.dispatch(Event::RequestDueDiligence(InvestmentId(1)), gate)
            .await
            .unwrap();
        dash.dispatch(Event::RequestDueDiligence(InvestmentId(50)), gate)
            .await
            .unwrap();

        assert_eq!(dash.api().calls(), vec![Route::DueDiligence]);
    }

    #[tokio::test]
    async fn test_load_prefers_api_records() {
        let mut remote = sample_records()[1].clone();
        remote.id = InvestmentId(20);
        let api = RecordingApi {
            remote: Some(remote),
            ..Default::default()
        };

        let dash = Dashboard::load(api, sample_records(), "%b %-d, %Y").await;

        assert_eq!(dash.store().len(), 1);
        assert!(dash.store().get(InvestmentId(20)).is_some());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_seed() {
        let dash = Dashboard::load(RecordingApi::default(), sample_records(), "%b %-d, %Y").await;
        assert_eq!(dash.store().len(), 3);
        assert_eq!(dash.api().calls(), vec![Route::ListInvestments]);
    }
}
