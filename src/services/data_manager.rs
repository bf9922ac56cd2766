//! Data manager
//!
//! Owns the fetched year collection and the navigation cursor, and forwards
//! mutations to the store. One manager is built per user session and handed
//! to whoever needs it; it can be shared across threads behind an `Arc`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Entry, IncomeEntry, IncomeId, MonthBucket, Record, RecordId, UserId, YearAggregate,
};
use crate::storage::{ExpenseStore, YearEvents};

use super::aggregator::PeriodAggregator;
use super::navigation::{NavigationCursor, Step};

/// What happened to the result of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched years replaced the collection
    Applied { years: usize },
    /// A newer fetch was started before this one finished; its result was dropped
    Superseded,
}

#[derive(Debug)]
struct ManagerState {
    years: Vec<YearAggregate>,
    cursor: NavigationCursor,
}

/// Year collection, cursor and store access for one user
pub struct DataManager {
    store: Arc<dyn ExpenseStore>,
    user: UserId,
    aggregator: PeriodAggregator,
    state: RwLock<ManagerState>,
    /// Ticket of the most recently started fetch
    generation: AtomicU64,
}

impl DataManager {
    /// Create a manager whose cursor starts on the current calendar month
    pub fn new(store: Arc<dyn ExpenseStore>, user: UserId) -> Self {
        Self::with_cursor(store, user, NavigationCursor::starting_today())
    }

    /// Create a manager with an explicit starting cursor
    pub fn with_cursor(
        store: Arc<dyn ExpenseStore>,
        user: UserId,
        cursor: NavigationCursor,
    ) -> Self {
        Self {
            store,
            user,
            aggregator: PeriodAggregator::new(),
            state: RwLock::new(ManagerState {
                years: Vec::new(),
                cursor,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    // State is only ever replaced wholesale; a poisoned lock is still usable.
    fn read_state(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ----- Fetching -----

    /// Fetch everything stored for the user and rebuild the year collection
    ///
    /// On success the years are sorted by label and the cursor lands on the
    /// latest one. On failure the collection is emptied. Either way, if a
    /// newer fetch was started in the meantime this result is discarded.
    pub fn fetch_data(&self) -> TrackerResult<RefreshOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(user = %self.user, ticket, "fetching data");

        let fetched = self
            .store
            .fetch_years(&self.user)
            .map(|events| self.build_years(events));

        let mut state = self.write_state();
        if self.generation.load(Ordering::SeqCst) != ticket {
            warn!(user = %self.user, ticket, "discarding superseded fetch");
            return Ok(RefreshOutcome::Superseded);
        }

        match fetched {
            Ok(years) => {
                let count = years.len();
                state.years = years;
                state.cursor.land_on_latest(count);
                debug!(user = %self.user, years = count, "applied fetch");
                Ok(RefreshOutcome::Applied { years: count })
            }
            Err(err) => {
                warn!(user = %self.user, error = %err, "fetch failed, clearing years");
                state.years.clear();
                state.cursor.land_on_latest(0);
                Err(TrackerError::FetchRecordFailed(Box::new(err)))
            }
        }
    }

    fn build_years(&self, events: Vec<YearEvents>) -> Vec<YearAggregate> {
        let mut years: Vec<YearAggregate> = events
            .into_iter()
            .map(|year| self.aggregator.aggregate(year.records, year.incomes, year.label))
            .collect();
        years.sort_by(|a, b| a.label.cmp(&b.label));
        years
    }

    // ----- Saving and removing -----

    /// Validate and store a spending record
    pub fn save_record(&self, record: &Record) -> TrackerResult<()> {
        record
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.store.save_record(&self.user, record).map_err(|err| {
            warn!(user = %self.user, id = %record.id, error = %err, "saving record failed");
            TrackerError::SaveRecordFailed(Box::new(err))
        })
    }

    /// Validate and store an income entry
    pub fn save_income(&self, income: &IncomeEntry) -> TrackerResult<()> {
        income
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        self.store.save_income(&self.user, income).map_err(|err| {
            warn!(user = %self.user, id = %income.id, error = %err, "saving income failed");
            TrackerError::SaveIncomeFailed(Box::new(err))
        })
    }

    /// Remove a record, then re-fetch and return the month now selected
    ///
    /// Nothing is re-fetched if the removal fails.
    pub fn remove_record(&self, id: RecordId) -> TrackerResult<Option<MonthBucket>> {
        self.store.remove_record(&self.user, id).map_err(|err| {
            warn!(user = %self.user, id = %id, error = %err, "removing record failed");
            TrackerError::RemoveRecordFailed(Box::new(err))
        })?;

        info!(user = %self.user, id = %id, "record removed, refreshing");
        self.refresh_after_removal();
        Ok(self.current_month())
    }

    /// Remove an income entry, then re-fetch and return the month now selected
    pub fn remove_income(&self, id: IncomeId) -> TrackerResult<Option<MonthBucket>> {
        self.store.remove_income(&self.user, id).map_err(|err| {
            warn!(user = %self.user, id = %id, error = %err, "removing income failed");
            TrackerError::RemoveIncomeFailed(Box::new(err))
        })?;

        info!(user = %self.user, id = %id, "income removed, refreshing");
        self.refresh_after_removal();
        Ok(self.current_month())
    }

    /// The removal itself succeeded, so a failed refresh only empties the view
    fn refresh_after_removal(&self) {
        if let Err(err) = self.fetch_data() {
            warn!(user = %self.user, error = %err, "refresh after removal failed");
        }
    }

    // ----- Selection -----

    /// The selected month of the selected year
    pub fn current_month(&self) -> Option<MonthBucket> {
        let state = self.read_state();
        state.cursor.current_month(&state.years).cloned()
    }

    /// The selected year
    pub fn current_year(&self) -> Option<YearAggregate> {
        let state = self.read_state();
        state.cursor.current_year(&state.years).cloned()
    }

    pub fn cursor(&self) -> NavigationCursor {
        self.read_state().cursor
    }

    pub fn year_count(&self) -> usize {
        self.read_state().years.len()
    }

    /// Labels of all fetched years, oldest first
    pub fn year_labels(&self) -> Vec<String> {
        self.read_state()
            .years
            .iter()
            .map(|year| year.label.clone())
            .collect()
    }

    // ----- Navigation -----

    /// Step one month forward; `None` if already on December or nothing is loaded
    pub fn go_to_next_month(&self) -> Option<MonthBucket> {
        self.step_month(Step::Forward)
    }

    /// Step one month back; `None` if already on January or nothing is loaded
    pub fn go_to_previous_month(&self) -> Option<MonthBucket> {
        self.step_month(Step::Backward)
    }

    /// Step one year forward; `None` if already on the latest year
    pub fn go_to_next_year(&self) -> Option<YearAggregate> {
        self.step_year(Step::Forward)
    }

    /// Step one year back; `None` if already on the earliest year
    pub fn go_to_previous_year(&self) -> Option<YearAggregate> {
        self.step_year(Step::Backward)
    }

    fn step_month(&self, step: Step) -> Option<MonthBucket> {
        let mut state = self.write_state();
        if !state.cursor.step_month(step) {
            return None;
        }
        state.cursor.current_month(&state.years).cloned()
    }

    fn step_year(&self, step: Step) -> Option<YearAggregate> {
        let mut state = self.write_state();
        let count = state.years.len();
        if !state.cursor.step_year(step, count) {
            return None;
        }
        state.cursor.current_year(&state.years).cloned()
    }

    pub fn can_go_to_next_month(&self) -> bool {
        self.read_state().cursor.can_step_month_forward()
    }

    pub fn can_go_to_previous_month(&self) -> bool {
        self.read_state().cursor.can_step_month_backward()
    }

    pub fn can_go_to_next_year(&self) -> bool {
        let state = self.read_state();
        state.cursor.can_step_year_forward(state.years.len())
    }

    pub fn can_go_to_previous_year(&self) -> bool {
        let state = self.read_state();
        state.cursor.can_step_year_backward(state.years.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MonthOfYear};
    use crate::storage::EventDocument;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::sync::{mpsc, Mutex};
    use std::thread;

    /// In-memory store with switchable failures
    #[derive(Default)]
    struct MemoryStore {
        document: Mutex<EventDocument>,
        fail_fetch: AtomicBool,
        fail_mutations: AtomicBool,
        fetches: AtomicUsize,
    }

    impl MemoryStore {
        fn check_mutation(&self) -> TrackerResult<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(TrackerError::Storage("offline".into()));
            }
            Ok(())
        }
    }

    impl ExpenseStore for MemoryStore {
        fn fetch_years(&self, user: &UserId) -> TrackerResult<Vec<YearEvents>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(TrackerError::Storage("offline".into()));
            }
            self.document
                .lock()
                .unwrap()
                .user_years(user)?
                .ok_or_else(|| TrackerError::Storage("no data".into()))
        }

        fn save_record(&self, user: &UserId, record: &Record) -> TrackerResult<()> {
            self.check_mutation()?;
            self.document.lock().unwrap().insert_record(user, record)
        }

        fn save_income(&self, user: &UserId, income: &IncomeEntry) -> TrackerResult<()> {
            self.check_mutation()?;
            self.document.lock().unwrap().insert_income(user, income)
        }

        fn remove_record(&self, user: &UserId, id: RecordId) -> TrackerResult<()> {
            self.check_mutation()?;
            self.document.lock().unwrap().remove_record(user, id)
        }

        fn remove_income(&self, user: &UserId, id: IncomeId) -> TrackerResult<()> {
            self.check_mutation()?;
            self.document.lock().unwrap().remove_income(user, id)
        }
    }

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manager_on(store: &Arc<MemoryStore>, month: MonthOfYear) -> DataManager {
        DataManager::with_cursor(store.clone(), alice(), NavigationCursor::new(month))
    }

    fn spend_in(manager: &DataManager, year: i32, month: u32, cents: i64) -> Record {
        let record = Record::on_day(Money::from_cents(cents), day(year, month, 10), "Food");
        manager.save_record(&record).unwrap();
        record
    }

    #[test]
    fn test_fetch_sorts_years_and_lands_on_latest() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::January);
        spend_in(&manager, 2021, 1, 100);
        spend_in(&manager, 2019, 1, 200);
        spend_in(&manager, 2020, 1, 300);

        let outcome = manager.fetch_data().unwrap();

        assert_eq!(outcome, RefreshOutcome::Applied { years: 3 });
        assert_eq!(manager.year_labels(), vec!["2019", "2020", "2021"]);
        assert_eq!(manager.cursor().year_index(), 2);
        assert_eq!(manager.current_year().unwrap().label, "2021");
        assert_eq!(manager.current_month().unwrap().total_spending().cents(), 100);
    }

    #[test]
    fn test_refresh_from_three_to_five_years_lands_on_last() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::June);
        for year in 2015..2018 {
            spend_in(&manager, year, 6, 100);
        }
        manager.fetch_data().unwrap();
        manager.go_to_previous_year();
        assert_eq!(manager.cursor().year_index(), 1);

        for year in 2018..2020 {
            spend_in(&manager, year, 6, 100);
        }
        manager.fetch_data().unwrap();

        assert_eq!(manager.year_count(), 5);
        assert_eq!(manager.cursor().year_index(), 4);
        assert_eq!(manager.cursor().month(), MonthOfYear::June);
    }

    #[test]
    fn test_failed_fetch_clears_collection() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);
        spend_in(&manager, 2019, 3, 100);
        spend_in(&manager, 2020, 3, 100);
        manager.fetch_data().unwrap();
        assert!(manager.current_year().is_some());

        store.fail_fetch.store(true, Ordering::SeqCst);
        let err = manager.fetch_data().unwrap_err();

        assert!(matches!(err, TrackerError::FetchRecordFailed(_)));
        assert_eq!(manager.year_count(), 0);
        assert_eq!(manager.cursor().year_index(), 0);
        assert!(manager.current_year().is_none());
        assert!(manager.current_month().is_none());
        assert!(!manager.can_go_to_next_year());
    }

    #[test]
    fn test_fetch_for_user_without_data_fails() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);

        assert!(manager.fetch_data().is_err());
        assert!(manager.current_month().is_none());
    }

    #[test]
    fn test_save_rejects_invalid_entries_before_store() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);
        store.fail_mutations.store(true, Ordering::SeqCst);

        let record = Record::on_day(Money::zero(), day(2019, 3, 1), "Food");
        assert!(manager.save_record(&record).unwrap_err().is_validation());

        let income = IncomeEntry::on_day(Money::from_cents(-5), day(2019, 3, 1), "Gift");
        assert!(manager.save_income(&income).unwrap_err().is_validation());
    }

    #[test]
    fn test_save_leaves_fetched_collection_alone() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);
        spend_in(&manager, 2019, 3, 100);
        manager.fetch_data().unwrap();
        let fetches = store.fetches.load(Ordering::SeqCst);
        let before = manager.current_year().unwrap();

        spend_in(&manager, 2019, 3, 250);
        spend_in(&manager, 2020, 3, 400);
        let income = IncomeEntry::on_day(Money::from_cents(900), day(2019, 3, 5), "Salary");
        manager.save_income(&income).unwrap();

        assert_eq!(store.fetches.load(Ordering::SeqCst), fetches);
        assert_eq!(manager.year_count(), 1);
        assert_eq!(manager.current_year().unwrap(), before);
        assert_eq!(manager.current_month().unwrap().total_spending().cents(), 100);
    }

    #[test]
    fn test_oversized_stored_amounts_fail_the_fetch() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);
        let huge = [
            Record::on_day(Money::from_cents(i64::MAX), day(2019, 3, 1), "Yacht"),
            Record::on_day(Money::from_cents(i64::MAX), day(2019, 3, 2), "Yacht"),
        ];
        for record in &huge {
            store
                .document
                .lock()
                .unwrap()
                .insert_record(&alice(), record)
                .unwrap();
        }

        let err = manager.fetch_data().unwrap_err();

        assert!(matches!(err.cause(), Some(TrackerError::Parse { .. })));
        assert!(manager.current_month().is_none());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::March);
        store.fail_mutations.store(true, Ordering::SeqCst);

        let record = Record::on_day(Money::from_cents(100), day(2019, 3, 1), "Food");
        assert!(matches!(
            manager.save_record(&record),
            Err(TrackerError::SaveRecordFailed(_))
        ));
        let income = IncomeEntry::on_day(Money::from_cents(100), day(2019, 3, 1), "Gift");
        assert!(matches!(
            manager.save_income(&income),
            Err(TrackerError::SaveIncomeFailed(_))
        ));
    }

    #[test]
    fn test_remove_record_refetches_and_returns_month() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::May);
        let keep = spend_in(&manager, 2019, 5, 100);
        let removed = spend_in(&manager, 2019, 5, 250);
        manager.fetch_data().unwrap();
        let fetches_before = store.fetches.load(Ordering::SeqCst);

        let month = manager.remove_record(removed.id).unwrap().unwrap();

        assert_eq!(store.fetches.load(Ordering::SeqCst), fetches_before + 1);
        assert_eq!(month.records, vec![keep]);
        assert_eq!(month.total_spending().cents(), 100);
    }

    #[test]
    fn test_remove_income_refetches() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::May);
        let income = IncomeEntry::on_day(Money::from_cents(900), day(2019, 5, 1), "Salary");
        manager.save_income(&income).unwrap();
        spend_in(&manager, 2019, 5, 100);
        manager.fetch_data().unwrap();

        let month = manager.remove_income(income.id).unwrap().unwrap();

        assert!(month.incomes.is_empty());
        assert_eq!(month.total_balance().cents(), -100);
    }

    #[test]
    fn test_failed_remove_does_not_refetch() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::May);
        let record = spend_in(&manager, 2019, 5, 100);
        manager.fetch_data().unwrap();
        let fetches_before = store.fetches.load(Ordering::SeqCst);

        store.fail_mutations.store(true, Ordering::SeqCst);
        let err = manager.remove_record(record.id).unwrap_err();

        assert!(matches!(err, TrackerError::RemoveRecordFailed(_)));
        assert_eq!(store.fetches.load(Ordering::SeqCst), fetches_before);
        assert_eq!(manager.year_count(), 1);

        store.fail_mutations.store(false, Ordering::SeqCst);
        let err = manager.remove_income(IncomeId::new()).unwrap_err();
        assert!(matches!(err, TrackerError::RemoveIncomeFailed(_)));
        assert!(err.cause().unwrap().is_not_found());
    }

    #[test]
    fn test_removing_last_entry_leaves_empty_collection() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::May);
        let record = spend_in(&manager, 2019, 5, 100);
        manager.fetch_data().unwrap();

        assert!(manager.remove_record(record.id).unwrap().is_none());
        assert_eq!(manager.year_count(), 0);
    }

    #[test]
    fn test_month_navigation() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::November);
        spend_in(&manager, 2019, 12, 4200);
        manager.fetch_data().unwrap();

        let december = manager.go_to_next_month().unwrap();
        assert_eq!(december.month, MonthOfYear::December);
        assert_eq!(december.total_spending().cents(), 4200);
        assert!(!manager.can_go_to_next_month());
        assert!(manager.go_to_next_month().is_none());

        let november = manager.go_to_previous_month().unwrap();
        assert_eq!(november.month, MonthOfYear::November);
        assert!(november.is_empty());
        assert!(manager.can_go_to_previous_month());
    }

    #[test]
    fn test_month_navigation_without_data_moves_but_returns_none() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::January);

        assert!(manager.go_to_next_month().is_none());
        assert_eq!(manager.cursor().month(), MonthOfYear::February);
    }

    #[test]
    fn test_year_navigation() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::January);
        spend_in(&manager, 2019, 1, 100);
        spend_in(&manager, 2020, 1, 100);
        manager.fetch_data().unwrap();

        assert!(!manager.can_go_to_next_year());
        assert!(manager.go_to_next_year().is_none());
        assert!(manager.can_go_to_previous_year());

        assert_eq!(manager.go_to_previous_year().unwrap().label, "2019");
        assert!(manager.go_to_previous_year().is_none());
        assert!(manager.can_go_to_next_year());
    }

    #[test]
    fn test_single_year_disables_year_navigation() {
        let store = Arc::new(MemoryStore::default());
        let manager = manager_on(&store, MonthOfYear::January);
        spend_in(&manager, 2019, 1, 100);
        manager.fetch_data().unwrap();

        assert!(!manager.can_go_to_next_year());
        assert!(!manager.can_go_to_previous_year());
    }

    /// Store whose first fetch blocks until released
    struct GatedStore {
        calls: AtomicUsize,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
        slow: Vec<YearEvents>,
        fast: Vec<YearEvents>,
    }

    impl ExpenseStore for GatedStore {
        fn fetch_years(&self, _user: &UserId) -> TrackerResult<Vec<YearEvents>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                let release = self.release.lock().unwrap().take().unwrap();
                self.entered.lock().unwrap().send(()).unwrap();
                release.recv().unwrap();
                return Ok(self.slow.clone());
            }
            Ok(self.fast.clone())
        }

        fn save_record(&self, _user: &UserId, _record: &Record) -> TrackerResult<()> {
            Ok(())
        }

        fn save_income(&self, _user: &UserId, _income: &IncomeEntry) -> TrackerResult<()> {
            Ok(())
        }

        fn remove_record(&self, _user: &UserId, _id: RecordId) -> TrackerResult<()> {
            Ok(())
        }

        fn remove_income(&self, _user: &UserId, _id: IncomeId) -> TrackerResult<()> {
            Ok(())
        }
    }

    fn labels(from: i32, count: i32) -> Vec<YearEvents> {
        (from..from + count)
            .map(|year| YearEvents {
                label: year.to_string(),
                ..YearEvents::default()
            })
            .collect()
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Arc::new(GatedStore {
            calls: AtomicUsize::new(0),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(Some(release_rx)),
            slow: labels(2010, 3),
            fast: labels(2015, 5),
        });
        let manager = Arc::new(DataManager::with_cursor(
            store,
            alice(),
            NavigationCursor::new(MonthOfYear::January),
        ));

        let background = {
            let manager = Arc::clone(&manager);
            thread::spawn(move || manager.fetch_data())
        };
        entered_rx.recv().unwrap();

        assert_eq!(
            manager.fetch_data().unwrap(),
            RefreshOutcome::Applied { years: 5 }
        );
        release_tx.send(()).unwrap();

        assert_eq!(
            background.join().unwrap().unwrap(),
            RefreshOutcome::Superseded
        );
        assert_eq!(manager.year_count(), 5);
        assert_eq!(manager.current_year().unwrap().label, "2019");
    }
}
