//! In-memory implementation of the organization store.
//!
//! # Purpose
//! Implements [`OrganizationStore`] entirely in memory. It backs local
//! development, the test suites and deployments where durability is not
//! required.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - All state lives behind one `tokio::sync::RwLock`, so multi-entity writes
//!   (organization creation with its admins, batch metadata deletes) are atomic
//!   and reads observe either all or none of a write.
//! - Reads are immediately consistent with preceding writes.
//!
//! # Sequences and change feed
//! Every write draws the next value from a single instance-wide sequence.
//! Writes that touch an organization also append an [`OrganizationChange`] to a
//! bounded change log (`StoreConfig::change_window`). Consumers that fall
//! behind the window must re-bootstrap via [`OrganizationStore::organization_snapshot`].
//!
//! # Metrics
//! Keeps `orgservice_organizations_total` and `orgservice_store_writes_total`
//! current.
use super::search::{ensure_valid_filter, paginate};
use super::{
    AddedUser, ChangeSet, CreateOrganization, CreatedOrganization, DomainFilter, DomainSearch,
    MetadataSearch, OrganizationFilter, OrganizationSearch, OrganizationSortingColumn,
    OrganizationStore, SearchResult, Snapshot, StoreConfig, StoreError, StoreResult,
};
use crate::model::{
    CreatedAdmin, DomainPolicy, DomainValidation, EmailVerification, HumanAdmin,
    IdentityProvider, IdpLink, Metadata, MetadataEntry, ORG_OWNER_ROLE, OrgAdmin, OrgDomain,
    OrgDomainValidationType, Organization, OrganizationChange, OrganizationChangeOp,
    OrganizationState, User, challenge_url, generate_validation_token,
    generate_verification_code, generated_domain, normalize_domain, normalize_metadata_key,
    normalize_org_name,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgplane_object::{ObjectDetails, list_query_to_query};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Upper bound on the change log's initial allocation; it grows on demand.
const PREALLOCATED_CHANGES: usize = 1024;

/// Bounded, in-memory append-only log of organization changes.
///
/// `next_seq` doubles as the instance-wide sequence: writes that do not
/// belong to an organization consume a value through [`ChangeLog::advance`]
/// without appending an entry.
#[derive(Debug)]
struct ChangeLog<T> {
    next_seq: u64,
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> ChangeLog<T> {
    fn new(capacity: usize) -> Self {
        Self {
            next_seq: 1,
            capacity,
            items: VecDeque::with_capacity(capacity.min(PREALLOCATED_CHANGES)),
        }
    }

    fn record(&mut self, item: impl FnOnce(u64) -> T) -> u64 {
        let seq = self.advance();
        self.items.push_back(item(seq));
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
        seq
    }

    fn advance(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Last sequence handed out, zero before the first write.
    fn processed(&self) -> u64 {
        self.next_seq - 1
    }
}

#[derive(Debug, Clone)]
struct OrgRecord {
    organization: Organization,
    /// Sequence of the creating write; orders unsorted listings.
    created_seq: u64,
    admins: Vec<OrgAdmin>,
    /// Insertion order.
    domains: Vec<OrgDomain>,
    metadata: BTreeMap<String, Metadata>,
}

impl OrgRecord {
    fn domain_index(&self, domain: &str) -> Option<usize> {
        self.domains.iter().position(|d| d.domain == domain)
    }
}

/// A new account that will be created once every admin entry resolved.
#[derive(Debug, Clone)]
struct PendingHuman {
    user: User,
    email_code: Option<String>,
    phone_code: Option<String>,
}

enum HumanResolution {
    /// Collapsed onto the account already holding one of the IdP links.
    Linked(String),
    New(PendingHuman),
}

struct PlannedAdmin {
    user_id: String,
    roles: Vec<String>,
    /// Inline definitions are reported back, references are not.
    inline: bool,
}

#[derive(Debug)]
struct Inner {
    organizations: HashMap<String, OrgRecord>,
    users: HashMap<String, User>,
    identity_providers: HashMap<String, IdentityProvider>,
    domain_policy: DomainPolicy,
    changes: ChangeLog<OrganizationChange>,
}

impl Inner {
    fn organization(&self, org_id: &str) -> StoreResult<&OrgRecord> {
        self.organizations
            .get(org_id)
            .ok_or(StoreError::OrganizationNotFound)
    }

    fn organization_mut(&mut self, org_id: &str) -> StoreResult<&mut OrgRecord> {
        self.organizations
            .get_mut(org_id)
            .ok_or(StoreError::OrganizationNotFound)
    }

    fn name_taken(&self, name: &str, except: Option<&str>) -> bool {
        let name = name.to_lowercase();
        self.organizations.values().any(|record| {
            Some(record.organization.id.as_str()) != except
                && record.organization.name.to_lowercase() == name
        })
    }

    fn verified_elsewhere(&self, domain: &str, org_id: &str) -> bool {
        self.organizations
            .values()
            .filter(|record| record.organization.id != org_id)
            .flat_map(|record| record.domains.iter())
            .any(|d| d.is_verified && d.domain == domain)
    }

    fn linked_user(&self, links: &[IdpLink], pending: &[PendingHuman]) -> Option<String> {
        let same = |a: &IdpLink, b: &IdpLink| a.idp_id == b.idp_id && a.user_id == b.user_id;
        links.iter().find_map(|link| {
            self.users
                .values()
                .map(|user| (&user.user_id, &user.idp_links))
                .chain(
                    pending
                        .iter()
                        .map(|p| (&p.user.user_id, &p.user.idp_links)),
                )
                .find(|(_, existing)| existing.iter().any(|other| same(link, other)))
                .map(|(user_id, _)| user_id.clone())
        })
    }

    /// Validate an inline human definition without changing any state.
    fn resolve_human(
        &self,
        human: &HumanAdmin,
        resource_owner: &str,
        pending: &[PendingHuman],
    ) -> StoreResult<HumanResolution> {
        let email = human.validate()?;
        for link in &human.idp_links {
            if !self.identity_providers.contains_key(&link.idp_id) {
                return Err(StoreError::NotFound(format!(
                    "identity provider {}",
                    link.idp_id
                )));
            }
        }
        if let Some(user_id) = self.linked_user(&human.idp_links, pending) {
            return Ok(HumanResolution::Linked(user_id));
        }
        let email_taken = self.users.values().any(|u| u.email == email)
            || pending.iter().any(|p| p.user.email == email);
        if email_taken {
            return Err(StoreError::AlreadyExists(
                "email address is already in use".into(),
            ));
        }

        let email_code = (human.email_verification == EmailVerification::ReturnCode)
            .then(generate_verification_code);
        let phone_code = human
            .phone
            .as_ref()
            .filter(|phone| phone.return_code && !phone.is_verified)
            .map(|_| generate_verification_code());
        let username = human
            .username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());
        let user = User {
            user_id: new_id(),
            username,
            given_name: human.given_name.trim().to_string(),
            family_name: human.family_name.trim().to_string(),
            email,
            email_verified: human.email_verification == EmailVerification::IsVerified,
            phone: human.phone.as_ref().map(|p| p.phone.trim().to_string()),
            idp_links: human.idp_links.clone(),
            resource_owner: resource_owner.to_string(),
        };
        Ok(HumanResolution::New(PendingHuman {
            user,
            email_code,
            phone_code,
        }))
    }

    /// Record a write against an organization and stamp it with the new
    /// sequence.
    fn commit(
        &mut self,
        org_id: &str,
        op: OrganizationChangeOp,
        now: DateTime<Utc>,
    ) -> ObjectDetails {
        let organizations = &mut self.organizations;
        let mut creation_date = DateTime::<Utc>::UNIX_EPOCH;
        let sequence = self.changes.record(|seq| {
            let organization = organizations.get_mut(org_id).map(|record| {
                record.organization.sequence = seq;
                record.organization.change_date = now;
                creation_date = record.organization.creation_date;
                record.organization.clone()
            });
            OrganizationChange {
                seq,
                op,
                org_id: org_id.to_string(),
                organization,
            }
        });
        metrics::counter!("orgservice_store_writes_total").increment(1);
        ObjectDetails {
            sequence,
            event_date: now,
            creation_date,
            resource_owner: org_id.to_string(),
        }
    }

    /// Consume a sequence for a write outside any organization.
    fn commit_instance(&mut self, resource_owner: &str, now: DateTime<Utc>) -> ObjectDetails {
        let sequence = self.changes.advance();
        metrics::counter!("orgservice_store_writes_total").increment(1);
        ObjectDetails {
            sequence,
            event_date: now,
            creation_date: DateTime::<Utc>::UNIX_EPOCH,
            resource_owner: resource_owner.to_string(),
        }
    }

    fn search_result<T>(&self, items: Vec<T>, total: u64) -> SearchResult<T> {
        SearchResult {
            items,
            total,
            sequence: self.changes.processed(),
            timestamp: Utc::now(),
        }
    }

    fn publish_gauges(&self) {
        metrics::gauge!("orgservice_organizations_total").set(self.organizations.len() as f64);
    }
}

/// In-memory organization store.
pub struct InMemoryStore {
    config: StoreConfig,
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        let inner = Inner {
            organizations: HashMap::new(),
            users: HashMap::new(),
            identity_providers: HashMap::new(),
            domain_policy: config.domain_policy,
            changes: ChangeLog::new(config.change_window()),
        };
        Self {
            config,
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    fn limit(&self) -> usize {
        usize::try_from(self.config.changes_limit).unwrap_or(usize::MAX)
    }

    fn new_domain(
        &self,
        org_id: &str,
        domain: String,
        verified: bool,
        sequence: u64,
        now: DateTime<Utc>,
    ) -> OrgDomain {
        OrgDomain {
            org_id: org_id.to_string(),
            domain,
            is_verified: verified,
            is_primary: false,
            is_generated: false,
            validation_type: OrgDomainValidationType::Unspecified,
            validation_token: None,
            sequence,
            creation_date: now,
            change_date: now,
        }
    }

    async fn transition(
        &self,
        org_id: &str,
        from: OrganizationState,
        to: OrganizationState,
    ) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        let record = inner.organization_mut(org_id)?;
        if record.organization.state != from {
            if self.config.idempotent_state_transitions {
                let org = &record.organization;
                return Ok(ObjectDetails {
                    sequence: org.sequence,
                    event_date: org.change_date,
                    creation_date: org.creation_date,
                    resource_owner: org.id.clone(),
                });
            }
            let message = match to {
                OrganizationState::Inactive => "organization is already deactivated",
                OrganizationState::Active => "organization is already active",
            };
            return Err(StoreError::Conflict(message.into()));
        }
        record.organization.state = to;
        let op = match to {
            OrganizationState::Inactive => OrganizationChangeOp::Deactivated,
            OrganizationState::Active => OrganizationChangeOp::Reactivated,
        };
        Ok(inner.commit(org_id, op, Utc::now()))
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Key used to look up an existing domain; malformed input simply misses.
fn domain_key(domain: &str) -> String {
    domain.trim().to_lowercase()
}

fn organization_matches(org: &Organization, filter: &OrganizationFilter) -> bool {
    match filter {
        OrganizationFilter::Id(id) => org.id == *id,
        OrganizationFilter::Name(text) => text.matches(&org.name),
        OrganizationFilter::Domain(text) => text.matches(&org.primary_domain),
        OrganizationFilter::State(state) => org.state == *state,
    }
}

fn domain_matches(domain: &OrgDomain, filter: &DomainFilter) -> bool {
    match filter {
        DomainFilter::Domain(text) => text.matches(&domain.domain),
        DomainFilter::Primary(primary) => domain.is_primary == *primary,
        DomainFilter::Verified(verified) => domain.is_verified == *verified,
    }
}

fn default_roles(roles: &[String]) -> Vec<String> {
    if roles.is_empty() {
        vec![ORG_OWNER_ROLE.to_string()]
    } else {
        roles.to_vec()
    }
}

#[async_trait]
impl OrganizationStore for InMemoryStore {
    async fn create_organization(
        &self,
        request: CreateOrganization,
    ) -> StoreResult<CreatedOrganization> {
        let name = normalize_org_name(&request.name)?;
        let mut inner = self.inner.write().await;
        if inner.name_taken(&name, None) {
            return Err(StoreError::AlreadyExists(
                "organization name is already taken".into(),
            ));
        }
        let org_id = request
            .org_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_id);
        if inner.organizations.contains_key(&org_id) {
            return Err(StoreError::AlreadyExists("organization id is taken".into()));
        }
        let primary_domain = generated_domain(&name, &org_id, &self.config.instance_domain);
        if inner.verified_elsewhere(&primary_domain, &org_id) {
            return Err(StoreError::AlreadyExists(format!(
                "domain {primary_domain} is already taken"
            )));
        }

        // Resolve every admin before touching any state.
        let mut pending: Vec<PendingHuman> = Vec::new();
        let mut planned: Vec<PlannedAdmin> = Vec::with_capacity(request.admins.len());
        for admin in &request.admins {
            let roles = default_roles(&admin.roles);
            match (&admin.user_id, &admin.human) {
                (Some(user_id), None) => {
                    if !inner.users.contains_key(user_id) {
                        return Err(StoreError::NotFound(format!("user {user_id}")));
                    }
                    planned.push(PlannedAdmin {
                        user_id: user_id.clone(),
                        roles,
                        inline: false,
                    });
                }
                (None, Some(human)) => {
                    let user_id = match inner.resolve_human(human, &org_id, &pending)? {
                        HumanResolution::Linked(user_id) => user_id,
                        HumanResolution::New(human) => {
                            let user_id = human.user.user_id.clone();
                            pending.push(human);
                            user_id
                        }
                    };
                    planned.push(PlannedAdmin {
                        user_id,
                        roles,
                        inline: true,
                    });
                }
                _ => return Err(StoreError::Validation("invalid admin type".into())),
            }
        }

        let now = Utc::now();
        let sequence = inner.changes.next_seq;
        let mut admins: Vec<OrgAdmin> = Vec::new();
        for admin in &planned {
            match admins.iter_mut().find(|a| a.user_id == admin.user_id) {
                Some(existing) => {
                    for role in &admin.roles {
                        if !existing.roles.contains(role) {
                            existing.roles.push(role.clone());
                        }
                    }
                }
                None => admins.push(OrgAdmin {
                    user_id: admin.user_id.clone(),
                    roles: admin.roles.clone(),
                }),
            }
        }

        let mut reported = HashSet::new();
        let created_admins = planned
            .iter()
            .filter(|admin| admin.inline && reported.insert(admin.user_id.clone()))
            .map(|admin| {
                let new_human = pending.iter().find(|p| p.user.user_id == admin.user_id);
                CreatedAdmin {
                    user_id: admin.user_id.clone(),
                    email_code: new_human.and_then(|p| p.email_code.clone()),
                    phone_code: new_human.and_then(|p| p.phone_code.clone()),
                }
            })
            .collect();

        let mut generated = self.new_domain(&org_id, primary_domain.clone(), true, sequence, now);
        generated.is_primary = true;
        generated.is_generated = true;
        let record = OrgRecord {
            organization: Organization {
                id: org_id.clone(),
                name,
                state: OrganizationState::Active,
                primary_domain,
                sequence,
                creation_date: now,
                change_date: now,
            },
            created_seq: sequence,
            admins,
            domains: vec![generated],
            metadata: BTreeMap::new(),
        };
        inner.organizations.insert(org_id.clone(), record);
        for human in pending {
            inner.users.insert(human.user.user_id.clone(), human.user);
        }
        let details = inner.commit(&org_id, OrganizationChangeOp::Created, now);
        inner.publish_gauges();
        Ok(CreatedOrganization {
            id: org_id,
            details,
            created_admins,
        })
    }

    async fn update_organization(&self, org_id: &str, name: &str) -> StoreResult<ObjectDetails> {
        let name = normalize_org_name(name)?;
        let mut inner = self.inner.write().await;
        if inner.organization(org_id)?.organization.name == name {
            // Same name keeps the generated domain but still records the write.
            return Ok(inner.commit(org_id, OrganizationChangeOp::Updated, Utc::now()));
        }
        if inner.name_taken(&name, Some(org_id)) {
            return Err(StoreError::AlreadyExists(
                "organization name is already taken".into(),
            ));
        }
        let new_domain = generated_domain(&name, org_id, &self.config.instance_domain);
        if inner.verified_elsewhere(&new_domain, org_id) {
            return Err(StoreError::AlreadyExists(format!(
                "domain {new_domain} is already taken"
            )));
        }

        let now = Utc::now();
        let sequence = inner.changes.next_seq;
        let replacement = self.new_domain(org_id, new_domain.clone(), true, sequence, now);
        let record = inner.organization_mut(org_id)?;
        record.organization.name = name;
        let was_primary = match record.domains.iter().position(|d| d.is_generated) {
            Some(idx) => record.domains.remove(idx).is_primary,
            None => false,
        };
        match record.domain_index(&new_domain) {
            Some(idx) => {
                let existing = &mut record.domains[idx];
                existing.is_generated = true;
                existing.is_verified = true;
                existing.is_primary |= was_primary;
                existing.sequence = sequence;
                existing.change_date = now;
            }
            None => {
                let mut replacement = replacement;
                replacement.is_generated = true;
                replacement.is_primary = was_primary;
                record.domains.push(replacement);
            }
        }
        if was_primary {
            record.organization.primary_domain = new_domain;
        }
        Ok(inner.commit(org_id, OrganizationChangeOp::Updated, now))
    }

    async fn get_organization(&self, org_id: &str) -> StoreResult<Organization> {
        let inner = self.inner.read().await;
        Ok(inner.organization(org_id)?.organization.clone())
    }

    async fn list_organizations(
        &self,
        search: OrganizationSearch,
    ) -> StoreResult<SearchResult<Organization>> {
        for filter in &search.filters {
            match filter {
                OrganizationFilter::Name(text) => ensure_valid_filter(text, "name")?,
                OrganizationFilter::Domain(text) => ensure_valid_filter(text, "domain")?,
                OrganizationFilter::Id(_) | OrganizationFilter::State(_) => {}
            }
        }
        let (_, _, asc) = list_query_to_query(search.query.as_ref());
        let inner = self.inner.read().await;
        let mut records: Vec<&OrgRecord> = inner
            .organizations
            .values()
            .filter(|record| {
                search
                    .filters
                    .iter()
                    .all(|filter| organization_matches(&record.organization, filter))
            })
            .collect();
        records.sort_by_key(|record| record.created_seq);
        match search.sorting_column {
            OrganizationSortingColumn::Unspecified => {}
            OrganizationSortingColumn::Name => {
                records.sort_by_cached_key(|record| record.organization.name.to_lowercase());
            }
            OrganizationSortingColumn::CreationDate => {
                records.sort_by_key(|record| record.organization.creation_date);
            }
        }
        if search.sorting_column != OrganizationSortingColumn::Unspecified && !asc {
            records.reverse();
        }
        let organizations: Vec<Organization> = records
            .into_iter()
            .map(|record| record.organization.clone())
            .collect();
        let (items, total) = paginate(organizations, search.query.as_ref());
        Ok(inner.search_result(items, total))
    }

    async fn delete_organization(&self, org_id: &str) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        if inner.organizations.remove(org_id).is_none() {
            return Err(StoreError::OrganizationNotFound);
        }
        let details = inner.commit(org_id, OrganizationChangeOp::Deleted, Utc::now());
        inner.publish_gauges();
        Ok(details)
    }

    async fn deactivate_organization(&self, org_id: &str) -> StoreResult<ObjectDetails> {
        self.transition(org_id, OrganizationState::Active, OrganizationState::Inactive)
            .await
    }

    async fn reactivate_organization(&self, org_id: &str) -> StoreResult<ObjectDetails> {
        self.transition(org_id, OrganizationState::Inactive, OrganizationState::Active)
            .await
    }

    async fn list_organization_admins(&self, org_id: &str) -> StoreResult<Vec<OrgAdmin>> {
        let inner = self.inner.read().await;
        Ok(inner.organization(org_id)?.admins.clone())
    }

    async fn organization_snapshot(&self) -> StoreResult<Snapshot<Organization>> {
        let inner = self.inner.read().await;
        let mut records: Vec<&OrgRecord> = inner.organizations.values().collect();
        records.sort_by_key(|record| record.created_seq);
        let items = records
            .into_iter()
            .map(|record| record.organization.clone())
            .collect();
        Ok(Snapshot {
            items,
            next_seq: inner.changes.next_seq,
        })
    }

    async fn organization_changes(
        &self,
        since: u64,
    ) -> StoreResult<ChangeSet<OrganizationChange>> {
        let inner = self.inner.read().await;
        let items = inner
            .changes
            .items
            .iter()
            .filter(|item| item.seq >= since)
            .take(self.limit())
            .cloned()
            .collect();
        Ok(ChangeSet {
            items,
            next_seq: inner.changes.next_seq,
        })
    }

    async fn add_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        inner.organization(org_id)?;
        let domain = normalize_domain(domain)?;
        if inner.organization(org_id)?.domain_index(&domain).is_some() {
            return Err(StoreError::AlreadyExists(format!(
                "domain {domain} already exists on organization"
            )));
        }
        if inner.verified_elsewhere(&domain, org_id) {
            return Err(StoreError::AlreadyExists(format!(
                "domain {domain} is already taken"
            )));
        }
        let now = Utc::now();
        let verified = !inner.domain_policy.validate_org_domains;
        let entry = self.new_domain(org_id, domain, verified, inner.changes.next_seq, now);
        inner.organization_mut(org_id)?.domains.push(entry);
        Ok(inner.commit(org_id, OrganizationChangeOp::DomainAdded, now))
    }

    async fn delete_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        let record = inner.organization_mut(org_id)?;
        let idx = record
            .domain_index(&domain_key(domain))
            .ok_or(StoreError::DomainNotFound)?;
        if record.domains[idx].is_primary {
            return Err(StoreError::Conflict(
                "primary domain cannot be removed".into(),
            ));
        }
        record.domains.remove(idx);
        Ok(inner.commit(org_id, OrganizationChangeOp::DomainRemoved, Utc::now()))
    }

    async fn list_domains(
        &self,
        org_id: &str,
        search: DomainSearch,
    ) -> StoreResult<SearchResult<OrgDomain>> {
        for filter in &search.filters {
            if let DomainFilter::Domain(text) = filter {
                ensure_valid_filter(text, "domain")?;
            }
        }
        let inner = self.inner.read().await;
        let domains: Vec<OrgDomain> = inner
            .organizations
            .get(org_id)
            .map(|record| {
                record
                    .domains
                    .iter()
                    .filter(|d| search.filters.iter().all(|f| domain_matches(d, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let (items, total) = paginate(domains, search.query.as_ref());
        Ok(inner.search_result(items, total))
    }

    async fn generate_domain_validation(
        &self,
        org_id: &str,
        domain: &str,
        validation_type: OrgDomainValidationType,
    ) -> StoreResult<DomainValidation> {
        if validation_type == OrgDomainValidationType::Unspecified {
            return Err(StoreError::Validation(
                "validation type must be specified".into(),
            ));
        }
        let mut inner = self.inner.write().await;
        let sequence = inner.changes.next_seq;
        let record = inner.organization_mut(org_id)?;
        let idx = record
            .domain_index(&domain_key(domain))
            .ok_or(StoreError::DomainNotFound)?;
        let entry = &mut record.domains[idx];
        if entry.is_verified {
            return Err(StoreError::Conflict("domain is already verified".into()));
        }
        let token = generate_validation_token();
        let url = challenge_url(&entry.domain, &token, validation_type).ok_or_else(|| {
            StoreError::Validation("validation type must be specified".into())
        })?;
        let now = Utc::now();
        entry.validation_type = validation_type;
        entry.validation_token = Some(token.clone());
        entry.sequence = sequence;
        entry.change_date = now;
        inner.commit(
            org_id,
            OrganizationChangeOp::DomainValidationGenerated,
            now,
        );
        Ok(DomainValidation { token, url })
    }

    async fn set_primary_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        let sequence = inner.changes.next_seq;
        let now = Utc::now();
        let record = inner.organization_mut(org_id)?;
        let idx = record
            .domain_index(&domain_key(domain))
            .ok_or(StoreError::DomainNotFound)?;
        if !record.domains[idx].is_verified {
            return Err(StoreError::Conflict("domain is not verified".into()));
        }
        for (pos, entry) in record.domains.iter_mut().enumerate() {
            let primary = pos == idx;
            if entry.is_primary != primary {
                entry.is_primary = primary;
                entry.sequence = sequence;
                entry.change_date = now;
            }
        }
        record.organization.primary_domain = record.domains[idx].domain.clone();
        Ok(inner.commit(org_id, OrganizationChangeOp::PrimaryDomainSet, now))
    }

    async fn set_metadata(
        &self,
        org_id: &str,
        entries: Vec<MetadataEntry>,
    ) -> StoreResult<ObjectDetails> {
        if entries.is_empty() {
            return Err(StoreError::Validation("metadata list is empty".into()));
        }
        let entries = entries
            .into_iter()
            .map(|entry| Ok((normalize_metadata_key(&entry.key)?, entry.value)))
            .collect::<StoreResult<Vec<_>>>()?;
        let mut inner = self.inner.write().await;
        let sequence = inner.changes.next_seq;
        let now = Utc::now();
        let record = inner.organization_mut(org_id)?;
        for (key, value) in entries {
            record
                .metadata
                .entry(key.clone())
                .and_modify(|existing| {
                    existing.value = value.clone();
                    existing.sequence = sequence;
                    existing.change_date = now;
                })
                .or_insert_with(|| Metadata {
                    key,
                    value,
                    sequence,
                    creation_date: now,
                    change_date: now,
                });
        }
        Ok(inner.commit(org_id, OrganizationChangeOp::MetadataSet, now))
    }

    async fn list_metadata(
        &self,
        org_id: &str,
        search: MetadataSearch,
    ) -> StoreResult<SearchResult<Metadata>> {
        if let Some(key) = &search.key {
            ensure_valid_filter(key, "key")?;
        }
        let inner = self.inner.read().await;
        let entries: Vec<Metadata> = inner
            .organizations
            .get(org_id)
            .map(|record| {
                record
                    .metadata
                    .values()
                    .filter(|m| search.key.as_ref().is_none_or(|key| key.matches(&m.key)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let (items, total) = paginate(entries, search.query.as_ref());
        Ok(inner.search_result(items, total))
    }

    async fn delete_metadata(
        &self,
        org_id: &str,
        keys: Vec<String>,
    ) -> StoreResult<ObjectDetails> {
        if keys.is_empty() {
            return Err(StoreError::Validation("metadata list is empty".into()));
        }
        let keys = keys
            .iter()
            .map(|key| normalize_metadata_key(key))
            .collect::<Result<Vec<_>, _>>()?;
        let mut inner = self.inner.write().await;
        let record = inner.organization_mut(org_id)?;
        if let Some(missing) = keys.iter().find(|key| !record.metadata.contains_key(*key)) {
            return Err(StoreError::NotFound(format!("metadata key {missing}")));
        }
        for key in &keys {
            record.metadata.remove(key);
        }
        Ok(inner.commit(org_id, OrganizationChangeOp::MetadataRemoved, Utc::now()))
    }

    async fn domain_policy(&self) -> StoreResult<DomainPolicy> {
        Ok(self.inner.read().await.domain_policy)
    }

    async fn update_domain_policy(&self, policy: DomainPolicy) -> StoreResult<ObjectDetails> {
        let mut inner = self.inner.write().await;
        if inner.domain_policy == policy {
            return Err(StoreError::Conflict("domain policy not changed".into()));
        }
        inner.domain_policy = policy;
        Ok(inner.commit_instance(&self.config.instance_id, Utc::now()))
    }

    async fn add_human_user(
        &self,
        org_id: Option<&str>,
        human: HumanAdmin,
    ) -> StoreResult<AddedUser> {
        let mut inner = self.inner.write().await;
        let resource_owner = match org_id {
            Some(org_id) => inner.organization(org_id)?.organization.id.clone(),
            None => self.config.instance_id.clone(),
        };
        let pending = match inner.resolve_human(&human, &resource_owner, &[])? {
            HumanResolution::New(pending) => pending,
            HumanResolution::Linked(_) => {
                return Err(StoreError::AlreadyExists(
                    "identity provider link is already in use".into(),
                ));
            }
        };
        let user_id = pending.user.user_id.clone();
        inner.users.insert(user_id.clone(), pending.user);
        let details = inner.commit_instance(&resource_owner, Utc::now());
        Ok(AddedUser {
            user_id,
            details,
            email_code: pending.email_code,
            phone_code: pending.phone_code,
        })
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.inner
            .read()
            .await
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    async fn add_identity_provider(&self, name: &str) -> StoreResult<IdentityProvider> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(
                "identity provider name must not be empty".into(),
            ));
        }
        let provider = IdentityProvider {
            id: new_id(),
            name: name.to_string(),
        };
        let mut inner = self.inner.write().await;
        inner
            .identity_providers
            .insert(provider.id.clone(), provider.clone());
        inner.commit_instance(&self.config.instance_id, Utc::now());
        Ok(provider)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
