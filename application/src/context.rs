//! [`Context`]-related definitions.

use std::{fmt, hash::Hash};

use common::{
    operations::By,
    pagination::{Direction, Limit, Order, Ordering, Page, Search, Selector},
    query::Encode,
    DateTime,
};
use service::{
    command::{
        self, cancel_appointment, create_patient, create_record, create_user,
        delete_patient, delete_record, refresh_session, schedule_appointment,
        sign_in, update_patient, update_user_role, Command as _,
    },
    domain::{appointment, patient, user},
    infra::{self, Auth, Authed},
    query::{self, Query as _},
    read,
};
use tracerr::Traced;

use crate::{
    define_error,
    error::{ApiError, AsError},
    notice::{self, Notice},
    provider::Provider,
    selection::Selection,
    session::Session,
    Error, Service,
};

/// Views of the application a user moves between.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum View {
    /// Dashboard totals.
    #[default]
    Dashboard,

    /// Paginated list of [`Patient`](service::domain::Patient)s.
    Patients,

    /// Paginated list of [`Record`](service::domain::Record)s.
    Records,

    /// Paginated list of [`Appointment`](service::domain::Appointment)s.
    Appointments,

    /// Paginated list of [`User`](service::domain::User)s.
    Users,
}

impl View {
    /// Returns the logical path of this [`View`], used as the return target
    /// of an expired session.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Patients => "/patients",
            Self::Records => "/records",
            Self::Appointments => "/appointments",
            Self::Users => "/users",
        }
    }

    /// Resolves a [`View`] back from its logical path.
    #[must_use]
    pub fn of_path(path: &str) -> Option<Self> {
        Some(match path {
            "/" => Self::Dashboard,
            "/patients" => Self::Patients,
            "/records" => Self::Records,
            "/appointments" => Self::Appointments,
            "/users" => Self::Users,
            _ => return None,
        })
    }
}

/// One paginated list a [`View`] displays: its [`Provider`] plus the
/// [`Selection`] made on it.
#[derive(Debug)]
struct Listing<S, F, N, I> {
    /// [`Provider`] of the list.
    provider: Provider<S, F, N>,

    /// [`Selection`] made on the list.
    selection: Selection<I>,
}

impl<S, F, N, I> Listing<S, F, N, I>
where
    S: AsRef<str>,
    F: Default + Encode,
    I: Copy + Eq + Hash,
{
    /// Creates a new [`Listing`] starting from the default [`Selector`].
    fn new() -> Self {
        Self {
            provider: Provider::new(Selector::default()),
            selection: Selection::new(),
        }
    }
}

/// Runs the body once with `l` bound to the [`Listing`] of the active
/// [`View`], or evaluates the fallback on the [`View::Dashboard`].
macro_rules! with_listing {
    ($ctx:ident, |$l:ident| $body:expr, $dashboard:expr) => {
        match $ctx.view {
            View::Dashboard => $dashboard,
            View::Patients => {
                let $l = &mut $ctx.patients;
                $body
            }
            View::Records => {
                let $l = &mut $ctx.records;
                $body
            }
            View::Appointments => {
                let $l = &mut $ctx.appointments;
                $body
            }
            View::Users => {
                let $l = &mut $ctx.users;
                $body
            }
        }
    };
}

/// Application context: the [`Session`], the active [`View`] and the state
/// of every list, driven by its consumer one operation at a time.
///
/// All the effects happen here at the boundary: the [`Provider`]s and the
/// [`Selection`]s stay pure state, while [`Context`] methods execute the
/// [`Service`] operations they plan and feed the outcomes back.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] executing the operations.
    service: Service,

    /// Current [`Session`].
    session: Session,

    /// Active [`View`].
    view: View,

    /// [`Notice`]s accumulated since the last [`Context::take_notices`].
    notices: Vec<Notice>,

    /// Last fetched dashboard totals.
    dashboard: Option<read::Dashboard>,

    /// [`Listing`] of the [`View::Patients`].
    patients: Listing<
        read::patient::list::Sort,
        read::patient::list::Filter,
        read::patient::list::Node,
        patient::Id,
    >,

    /// [`Listing`] of the [`View::Records`].
    records: Listing<
        read::record::list::Sort,
        read::record::list::Filter,
        read::record::list::Node,
        service::domain::record::Id,
    >,

    /// [`Listing`] of the [`View::Appointments`].
    appointments: Listing<
        read::appointment::list::Sort,
        read::appointment::list::Filter,
        read::appointment::list::Node,
        appointment::Id,
    >,

    /// [`Listing`] of the [`View::Users`].
    users: Listing<
        read::user::list::Sort,
        read::user::list::Filter,
        read::user::list::Node,
        user::Id,
    >,
}

impl Context {
    /// Creates a new [`Context`] on top of the provided [`Service`].
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self {
            service,
            session: Session::default(),
            view: View::default(),
            notices: Vec::new(),
            dashboard: None,
            patients: Listing::new(),
            records: Listing::new(),
            appointments: Listing::new(),
            users: Listing::new(),
        }
    }

    /// Returns the current [`Session`].
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the active [`View`].
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Takes the [`Notice`]s accumulated since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Signs a user in with the provided [`session::Credentials`], returning
    /// whether the sign-in succeeded.
    ///
    /// When the previous session expired mid-operation, the interrupted
    /// [`View`] is restored.
    ///
    /// [`session::Credentials`]: service::domain::user::session::Credentials
    pub async fn sign_in(
        &mut self,
        credentials: service::domain::user::session::Credentials,
    ) -> bool {
        let return_to = self.session.return_to().map(str::to_owned);

        match self
            .service
            .execute(command::SignIn { credentials })
            .await
        {
            Ok(out) => {
                self.session.signed_in(out);
                if let Some(view) = return_to.as_deref().and_then(View::of_path)
                {
                    self.view = view;
                }
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Signs the current user out, dropping all the credentials.
    pub fn sign_out(&mut self) {
        self.session.signed_out();
    }

    /// Refreshes the access token if it expires soon, so the next operation
    /// doesn't run into a rejection mid-flight.
    pub async fn refresh_if_due(&mut self) {
        let margin = self.service.config().session_refresh_margin;
        if !self.session.needs_refresh(DateTime::now(), margin) {
            return;
        }

        let Some(refresh_token) = self.session.refresh_token().cloned()
        else {
            self.session.expire(self.view.path().to_owned());
            return;
        };

        match self
            .service
            .execute(command::RefreshSession { refresh_token })
            .await
        {
            Ok(out) => self.session.refreshed(out),
            Err(e) => self.report(&e),
        }
    }

    /// Switches to the provided [`View`] and brings it up to date.
    pub async fn open(&mut self, view: View) {
        self.view = view;
        self.sync().await;
    }

    /// Brings the active [`View`] up to date, fetching whatever its state
    /// requires.
    pub async fn sync(&mut self) {
        self.refresh_if_due().await;
        let credentials = self.session.credentials();

        let res = match self.view {
            View::Dashboard => self.sync_dashboard(credentials).await,
            View::Patients => {
                sync_listing(
                    &self.service,
                    credentials,
                    &mut self.patients,
                    |n| n.id,
                )
                .await
            }
            View::Records => {
                sync_listing(
                    &self.service,
                    credentials,
                    &mut self.records,
                    |n| n.id,
                )
                .await
            }
            View::Appointments => {
                sync_listing(
                    &self.service,
                    credentials,
                    &mut self.appointments,
                    |n| n.id,
                )
                .await
            }
            View::Users => {
                sync_listing(
                    &self.service,
                    credentials,
                    &mut self.users,
                    |n| n.id,
                )
                .await
            }
        };

        if let Err(e) = res {
            self.report(&e);
        }
    }

    /// Fetches the dashboard totals.
    async fn sync_dashboard(
        &mut self,
        credentials: Auth,
    ) -> Result<(), Traced<infra::Error>> {
        let op = query::stats::Dashboard::by(());
        self.dashboard =
            Some(self.service.execute(Authed::new(op, credentials)).await?);
        Ok(())
    }

    /// Moves the active list one page in the provided [`Direction`],
    /// returning whether it moved.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        with_listing!(self, |l| l.provider.navigate(direction), false)
    }

    /// Changes the page size of the active list.
    pub fn set_limit(&mut self, limit: Limit) {
        with_listing!(self, |l| l.provider.set_limit(limit), ());
    }

    /// Changes the search term of the active list. Blank input clears the
    /// term.
    pub fn set_search(&mut self, input: &str) {
        with_listing!(self, |l| l.provider.set_search(Search::new(input)), ());
    }

    /// Sorts the active list by the provided field, returning `false` if
    /// the field is not sortable.
    pub fn set_ordering(&mut self, field: &str, order: Order) -> bool {
        with_listing!(
            self,
            |l| match field.parse() {
                Ok(by) => {
                    l.provider.set_ordering(Some(Ordering { by, order }));
                    true
                }
                Err(_) => false,
            },
            false
        )
    }

    /// Drops the sorting of the active list.
    pub fn clear_ordering(&mut self) {
        with_listing!(self, |l| l.provider.set_ordering(None), ());
    }

    /// Changes one filter field of the active list, returning `false` if the
    /// field doesn't apply to it or the value doesn't parse.
    ///
    /// Blank `value` clears the field.
    pub fn set_filter(&mut self, field: &str, value: &str) -> bool {
        match self.view {
            View::Dashboard => false,
            View::Patients => {
                let mut filter = self.patients.provider.selector().filter;
                match field {
                    "gender" => match kind_of(value) {
                        Some(gender) => filter.gender = gender,
                        None => return false,
                    },
                    _ => return false,
                }
                self.patients.provider.set_filter(filter);
                true
            }
            View::Records => {
                let mut filter = self.records.provider.selector().filter;
                match field {
                    "patient" => match cleared_or(value, |s| s.parse().ok())
                    {
                        Some(patient) => filter.patient = patient,
                        None => return false,
                    },
                    "kind" => match kind_of(value) {
                        Some(kind) => filter.kind = kind,
                        None => return false,
                    },
                    _ => return false,
                }
                self.records.provider.set_filter(filter);
                true
            }
            View::Appointments => {
                let mut filter =
                    self.appointments.provider.selector().filter;
                match field {
                    "patient" => match cleared_or(value, |s| s.parse().ok())
                    {
                        Some(patient) => filter.patient = patient,
                        None => return false,
                    },
                    "status" => match kind_of(value) {
                        Some(status) => filter.status = status,
                        None => return false,
                    },
                    "after" => match date_of(value) {
                        Some(date) => filter.scheduled_after = date,
                        None => return false,
                    },
                    "before" => match date_of(value) {
                        Some(date) => filter.scheduled_before = date,
                        None => return false,
                    },
                    _ => return false,
                }
                self.appointments.provider.set_filter(filter);
                true
            }
            View::Users => {
                let mut filter = self.users.provider.selector().filter;
                match field {
                    "role" => match kind_of(value) {
                        Some(role) => filter.role = role,
                        None => return false,
                    },
                    _ => return false,
                }
                self.users.provider.set_filter(filter);
                true
            }
        }
    }

    /// Evicts the displayed page of the active list, so the next
    /// [`Context::sync`] fetches it anew.
    pub fn refetch(&mut self) {
        with_listing!(self, |l| l.provider.refetch(), self.dashboard = None);
    }

    /// Toggles the selection of the entry with the provided raw ID,
    /// returning `false` if the ID doesn't parse.
    pub fn toggle(&mut self, raw_id: &str) -> bool {
        with_listing!(
            self,
            |l| match raw_id.parse() {
                Ok(id) => {
                    l.selection.toggle(id);
                    true
                }
                Err(_) => false,
            },
            false
        )
    }

    /// Toggles the selection of every visible entry of the active list at
    /// once.
    pub fn toggle_all(&mut self) {
        with_listing!(
            self,
            |l| {
                let visible: Vec<_> = l
                    .provider
                    .page()
                    .map(|p| p.results.iter().map(|n| n.id).collect())
                    .unwrap_or_default();
                l.selection.toggle_all(visible);
            },
            ()
        );
    }

    /// Clears the selection of the active list.
    pub fn clear_selection(&mut self) {
        with_listing!(self, |l| l.selection.clear(), ());
    }

    /// Queues the entry with the provided raw ID of the active list for
    /// editing.
    pub fn begin_edit(&mut self, raw_id: &str) -> bool {
        with_listing!(
            self,
            |l| match raw_id.parse() {
                Ok(id) => {
                    l.selection.begin_edit(id);
                    true
                }
                Err(_) => false,
            },
            false
        )
    }

    /// Registers a new [`Patient`](service::domain::Patient).
    pub async fn add_patient(&mut self, draft: patient::Draft) -> bool {
        let cmd = command::CreatePatient { draft };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.patients.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Updates the queued-for-editing
    /// [`Patient`](service::domain::Patient) with the provided draft.
    pub async fn update_patient(&mut self, draft: patient::Draft) -> bool {
        let Some(id) = self.patients.selection.finish_edit() else {
            return false;
        };

        let cmd = command::UpdatePatient { id, draft };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.patients.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Adds a new [`Record`](service::domain::Record) to a patient's
    /// history.
    pub async fn add_record(
        &mut self,
        draft: service::domain::record::Draft,
    ) -> bool {
        let cmd = command::CreateRecord { draft };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.records.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Schedules a new [`Appointment`](service::domain::Appointment).
    pub async fn schedule(&mut self, draft: appointment::Draft) -> bool {
        let cmd = command::ScheduleAppointment { draft };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.appointments.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Creates a new staff [`User`](service::domain::User).
    pub async fn add_user(&mut self, draft: user::Draft) -> bool {
        let cmd = command::CreateUser { draft };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.users.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Changes the [`Role`](user::Role) of the
    /// [`User`](service::domain::User) with the provided ID.
    pub async fn change_role(
        &mut self,
        id: user::Id,
        role: user::Role,
    ) -> bool {
        let cmd = command::UpdateUserRole { id, role };
        match self
            .service
            .execute(Authed::new(cmd, self.session.credentials()))
            .await
        {
            Ok(_) => {
                self.users.provider.refetch();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Deletes every selected entry of the active [`View`].
    ///
    /// Only [`View::Patients`] and [`View::Records`] support deletion.
    pub async fn delete_selected(&mut self) {
        match self.view {
            View::Patients => {
                let ids: Vec<_> = self.patients.selection.iter().collect();
                for id in ids {
                    let cmd = command::DeletePatient { id };
                    if let Err(e) = self
                        .service
                        .execute(Authed::new(cmd, self.session.credentials()))
                        .await
                    {
                        self.report(&e);
                    }
                }
                self.patients.selection.clear();
                self.patients.provider.refetch();
            }
            View::Records => {
                let ids: Vec<_> = self.records.selection.iter().collect();
                for id in ids {
                    let cmd = command::DeleteRecord { id };
                    if let Err(e) = self
                        .service
                        .execute(Authed::new(cmd, self.session.credentials()))
                        .await
                    {
                        self.report(&e);
                    }
                }
                self.records.selection.clear();
                self.records.provider.refetch();
            }
            View::Dashboard | View::Appointments | View::Users => {}
        }
    }

    /// Cancels every selected [`Appointment`](service::domain::Appointment)
    /// of the [`View::Appointments`].
    pub async fn cancel_selected(&mut self) {
        if self.view != View::Appointments {
            return;
        }

        let ids: Vec<_> = self.appointments.selection.iter().collect();
        for id in ids {
            let cmd = command::CancelAppointment { id };
            if let Err(e) = self
                .service
                .execute(Authed::new(cmd, self.session.credentials()))
                .await
            {
                self.report(&e);
            }
        }
        self.appointments.selection.clear();
        self.appointments.provider.refetch();
    }

    /// Renders the active [`View`] into display lines.
    #[must_use]
    pub fn screen(&self) -> Vec<String> {
        match self.view {
            View::Dashboard => match &self.dashboard {
                Some(d) => vec![
                    format!("patients:     {}", d.patients),
                    format!("records:      {}", d.records),
                    format!("appointments: {}", d.appointments),
                    format!("users:        {}", d.users),
                ],
                None => vec!["loading...".to_owned()],
            },
            View::Patients => screen_of(&self.patients, |n| {
                format!(
                    "{}  {}  {}  {}",
                    n.id,
                    n.name,
                    n.birth_date.to_iso8601(),
                    n.gender,
                )
            }),
            View::Records => screen_of(&self.records, |n| {
                format!("{}  {}  {}", n.id, n.kind, n.title)
            }),
            View::Appointments => screen_of(&self.appointments, |n| {
                format!(
                    "{}  {}  {}",
                    n.id,
                    n.scheduled_at.to_rfc3339(),
                    n.status,
                )
            }),
            View::Users => screen_of(&self.users, |n| {
                format!("{}  {}  {}  {}", n.id, n.name, n.login, n.role)
            }),
        }
    }

    /// Reports a failed operation: raises its [`Notice`]s and, when the
    /// failure means the credentials were rejected, runs the session-expiry
    /// transition preserving the active [`View`] as the return target.
    fn report<E>(&mut self, err: &Traced<E>)
    where
        E: AsError + fmt::Display,
    {
        let expired = Error::from(ApiError::SessionExpired);
        if err
            .as_ref()
            .try_as_error()
            .is_some_and(|e| e.code == expired.code)
        {
            self.session.expire(self.view.path().to_owned());
        }
        self.notices.extend(notice::of_failure(err));
    }
}

/// Performs the fetch the provided [`Listing`] plans, if any, and feeds the
/// outcome back, pruning the [`Selection`] of entries that left the page.
async fn sync_listing<Svc, S, F, N, I>(
    service: &Svc,
    credentials: Auth,
    listing: &mut Listing<S, F, N, I>,
    id_of: impl Fn(&N) -> I,
) -> Result<(), Traced<infra::Error>>
where
    S: AsRef<str> + Clone,
    F: Encode + Clone,
    I: Copy + Eq + Hash,
    Svc: query::Query<
        Authed<query::ApiQuery<By<Page<N>, Selector<S, F>>>>,
        Ok = Page<N>,
        Err = Traced<infra::Error>,
    >,
{
    if let Some(plan) = listing.provider.plan() {
        let op: query::ApiQuery<By<Page<N>, Selector<S, F>>> =
            query::ApiQuery::by(plan.selector);
        match service.execute(Authed::new(op, credentials)).await {
            Ok(page) => listing.provider.resolve(plan.key, page),
            Err(e) => {
                listing.provider.fail(&plan.key);
                return Err(e);
            }
        }
    }

    // The displayed page may as well come out of the cache without any
    // fetch, so the pruning happens on every sync.
    let visible: Vec<_> = listing
        .provider
        .page()
        .map(|p| p.results.iter().map(id_of).collect())
        .unwrap_or_default();
    listing.selection.retain(visible);
    Ok(())
}

/// Renders a [`Listing`] into display lines.
fn screen_of<S, F, N, I>(
    listing: &Listing<S, F, N, I>,
    describe: impl Fn(&N) -> String,
) -> Vec<String>
where
    S: AsRef<str>,
    F: Encode,
    I: Copy + Eq + Hash,
    N: HasId<Id = I>,
{
    let mut lines = Vec::new();

    match listing.provider.window() {
        Some(w) => {
            lines.push(format!("showing {} to {} of {}", w.from, w.to, w.of));
        }
        None => lines.push("nothing to show".to_owned()),
    }
    if listing.provider.is_loading() {
        lines.push("loading...".to_owned());
    }

    if let Some(page) = listing.provider.page() {
        for node in &page.results {
            let mark = if listing.selection.contains(node.id()) {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(format!("{mark} {}", describe(node)));
        }
    }

    lines
}

/// Parses an optional filter value: blank input clears the field, while an
/// unparsable one is rejected.
fn cleared_or<T>(
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<Option<T>> {
    if value.is_empty() {
        Some(None)
    } else {
        parse(value).map(Some)
    }
}

/// Parses an optional kind-enum filter value, accepting it
/// case-insensitively.
fn kind_of<T: std::str::FromStr>(value: &str) -> Option<Option<T>> {
    cleared_or(value, |s| s.to_uppercase().parse().ok())
}

/// Parses an optional [`Date`](common::Date) filter value.
fn date_of(value: &str) -> Option<Option<common::Date>> {
    cleared_or(value, |s| common::Date::from_iso8601(s).ok())
}

/// Listed entry exposing its ID, for rendering selection marks.
trait HasId {
    /// ID type of the entry.
    type Id;

    /// Returns the ID of this entry.
    fn id(&self) -> Self::Id;
}

impl HasId for service::domain::Patient {
    type Id = patient::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl HasId for service::domain::Record {
    type Id = service::domain::record::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl HasId for service::domain::Appointment {
    type Id = appointment::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl HasId for service::domain::User {
    type Id = user::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl AsError for sign_in::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::MalformedToken => None,
            Self::WrongCredentials => {
                Some(CommandError::WrongCredentials.into())
            }
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
            Self::MalformedToken | Self::WrongCredentials => None,
        }
    }
}

impl AsError for refresh_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Expired => Some(ApiError::SessionExpired.into()),
            Self::MalformedToken => None,
        }
    }
}

impl AsError for create_patient::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::BornInFuture => Some(field_error(
                CommandError::BirthDateInFuture,
                "birth_date",
            )),
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
            Self::BornInFuture => None,
        }
    }
}

impl AsError for update_patient::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::BornInFuture => Some(field_error(
                CommandError::BirthDateInFuture,
                "birth_date",
            )),
            Self::NotExists(_) => Some(ApiError::NotFound.into()),
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
            Self::BornInFuture | Self::NotExists(_) => None,
        }
    }
}

impl AsError for delete_patient::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ApiError::NotFound.into()),
        }
    }
}

impl AsError for create_record::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::RecordedInFuture => Some(field_error(
                CommandError::RecordedInFuture,
                "recorded_at",
            )),
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
            Self::RecordedInFuture => None,
        }
    }
}

impl AsError for delete_record::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ApiError::NotFound.into()),
        }
    }
}

impl AsError for schedule_appointment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::ScheduledInPast => Some(field_error(
                CommandError::ScheduledInPast,
                "scheduled_at",
            )),
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
            Self::ScheduledInPast => None,
        }
    }
}

impl AsError for cancel_appointment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ApiError::NotFound.into()),
        }
    }
}

impl AsError for create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
        }
    }

    fn violations(&self) -> Option<&[infra::Violation]> {
        match self {
            Self::Api(e) => e.violations(),
        }
    }
}

impl AsError for update_user_role::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ApiError::NotFound.into()),
        }
    }
}

/// Returns the [`Error`] of the provided [`CommandError`] bound to the
/// provided input `field`.
fn field_error(err: CommandError, field: &str) -> Error {
    let mut error = Error::from(err);
    error.field = Some(field.to_owned());
    error
}

define_error! {
    enum CommandError {
        #[code = "WRONG_CREDENTIALS"]
        #[severity = Error]
        #[message = "Wrong login or password"]
        WrongCredentials,

        #[code = "INVALID_INPUT"]
        #[severity = Error]
        #[message = "Birth date cannot lie in the future"]
        BirthDateInFuture,

        #[code = "INVALID_INPUT"]
        #[severity = Error]
        #[message = "Record cannot be taken in the future"]
        RecordedInFuture,

        #[code = "INVALID_INPUT"]
        #[severity = Error]
        #[message = "Appointment cannot be scheduled in the past"]
        ScheduledInPast,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::By,
        pagination::{Cursor, Direction, Page},
        DateTime, Handler,
    };
    use service::{
        command::sign_in,
        domain::{
            patient,
            user::{self, Session as Claims},
        },
        infra::{self, rest, Authed},
        query::ApiQuery,
        read::patient::list,
    };
    use tracerr::Traced;

    use super::{sync_listing, Context, Listing, View};

    fn context() -> Context {
        let rest = rest::Rest::new(&rest::Config {
            base_url: "http://127.0.0.1:9/".parse().unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        Context::new(crate::Service::new(
            service::Config::default(),
            rest,
        ))
    }

    fn signed_in(ctx: &mut Context) {
        let mut session = crate::Session::default();
        session.signed_in(sign_in::Output {
            token: "access".parse().unwrap(),
            refresh_token: None,
            session: Claims {
                user_id: user::Id::new(),
                expires_at: (DateTime::now() + Duration::from_secs(30 * 60))
                    .coerce(),
            },
        });
        ctx.session = session;
    }

    /// Stub rejecting every list fetch as unauthorized.
    struct Deny;

    impl Handler<Authed<ApiQuery<By<list::Page, list::Selector>>>> for Deny {
        type Ok = list::Page;
        type Err = Traced<infra::Error>;

        async fn execute(
            &self,
            _: Authed<ApiQuery<By<list::Page, list::Selector>>>,
        ) -> Result<Self::Ok, Self::Err> {
            Err(tracerr::new!(infra::Error::from(
                rest::Error::Unauthorized
            )))
        }
    }

    /// Stub answering list fetches page by page, in call order.
    struct Paged {
        calls: std::cell::Cell<usize>,
        first: Vec<patient::Id>,
        second: Vec<patient::Id>,
    }

    impl Handler<Authed<ApiQuery<By<list::Page, list::Selector>>>> for Paged {
        type Ok = list::Page;
        type Err = Traced<infra::Error>;

        async fn execute(
            &self,
            _: Authed<ApiQuery<By<list::Page, list::Selector>>>,
        ) -> Result<Self::Ok, Self::Err> {
            let call = self.calls.get();
            self.calls.set(call + 1);

            let count = (self.first.len() + self.second.len()) as u64;
            Ok(if call == 0 {
                Page {
                    count,
                    next: Some(Cursor::new("next")),
                    previous: None,
                    results: self.first.iter().map(|id| patient(*id)).collect(),
                }
            } else {
                Page {
                    count,
                    next: None,
                    previous: Some(Cursor::new("previous")),
                    results: self
                        .second
                        .iter()
                        .map(|id| patient(*id))
                        .collect(),
                }
            })
        }
    }

    /// Stub answering every list fetch with a fixed page.
    struct Fixed(Vec<patient::Id>);

    impl Handler<Authed<ApiQuery<By<list::Page, list::Selector>>>> for Fixed {
        type Ok = list::Page;
        type Err = Traced<infra::Error>;

        async fn execute(
            &self,
            _: Authed<ApiQuery<By<list::Page, list::Selector>>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(Page {
                count: self.0.len() as u64,
                next: None,
                previous: None,
                results: self.0.iter().map(|id| patient(*id)).collect(),
            })
        }
    }

    fn patient(id: patient::Id) -> service::domain::Patient {
        service::domain::Patient {
            id,
            name: patient::Name::new("Jane Roe").unwrap(),
            birth_date: common::Date::from_iso8601("1984-03-12").unwrap(),
            gender: patient::Gender::Female,
            phone: None,
            email: None,
            created_at: common::datetime::DateTimeOf::from_rfc3339(
                "2024-11-02T09:30:00Z",
            )
            .unwrap(),
        }
    }

    #[tokio::test]
    async fn unauthorized_fetch_expires_session_with_return_target() {
        let mut ctx = context();
        signed_in(&mut ctx);
        ctx.view = View::Patients;

        let credentials = ctx.session.credentials();
        let res =
            sync_listing(&Deny, credentials, &mut ctx.patients, |n| n.id)
                .await;
        ctx.report(&res.unwrap_err());

        assert_eq!(ctx.session.return_to(), Some("/patients"));
        let notices = ctx.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].code, "SESSION_EXPIRED");
    }

    #[tokio::test]
    async fn selection_is_pruned_after_page_change() {
        let kept = patient::Id::new();
        let gone = patient::Id::new();

        let mut listing = Listing::new();
        listing.selection.select(kept);
        listing.selection.select(gone);

        sync_listing(&Fixed(vec![kept]), None, &mut listing, |n| n.id)
            .await
            .unwrap();

        assert!(listing.selection.contains(kept));
        assert!(!listing.selection.contains(gone));
    }

    #[tokio::test]
    async fn selection_is_pruned_when_page_is_served_from_cache() {
        let on_second_page = patient::Id::new();
        let svc = Paged {
            calls: std::cell::Cell::new(0),
            first: vec![patient::Id::new(), patient::Id::new()],
            second: vec![on_second_page],
        };

        let mut listing = Listing::new();
        sync_listing(&svc, None, &mut listing, |n| n.id).await.unwrap();
        assert!(listing.provider.navigate(Direction::Forward));
        sync_listing(&svc, None, &mut listing, |n| n.id).await.unwrap();

        listing.selection.select(on_second_page);

        // No fetch happens here: the first page answers out of the cache,
        // yet the selection must not keep an entry the user cannot see.
        assert!(listing.provider.navigate(Direction::Backward));
        sync_listing(&svc, None, &mut listing, |n| n.id).await.unwrap();

        assert_eq!(svc.calls.get(), 2);
        assert!(!listing.selection.contains(on_second_page));
    }

    #[test]
    fn filter_applies_to_the_active_view_only() {
        let mut ctx = context();
        ctx.view = View::Patients;

        assert!(ctx.set_filter("gender", "female"));
        assert_eq!(
            ctx.patients.provider.selector().filter.gender,
            Some(patient::Gender::Female),
        );

        assert!(!ctx.set_filter("status", "SCHEDULED"), "wrong view");
        assert!(!ctx.set_filter("gender", "unknown"), "unparsable value");

        assert!(ctx.set_filter("gender", ""), "blank clears the field");
        assert_eq!(ctx.patients.provider.selector().filter.gender, None);
    }

    #[test]
    fn view_paths_round_trip() {
        for view in [
            View::Dashboard,
            View::Patients,
            View::Records,
            View::Appointments,
            View::Users,
        ] {
            assert_eq!(View::of_path(view.path()), Some(view));
        }
        assert_eq!(View::of_path("/nowhere"), None);
    }
}
