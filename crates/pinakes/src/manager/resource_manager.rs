/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! The generic resource manager.
//!
//! Implements the full lifecycle for one resource kind:
//!
//! ```text
//! {none} --add--> pending --verify(approve)--> approved
//!                    |                            ^  |
//!                    +-----verify(reject)---> rejected
//! ```
//!
//! with the orthogonal `active` flag gating visibility and `suspended`
//! overriding it at any state. Every committed write appends its
//! audit-trail entry and publishes one event; managers never perform
//! cross-cutting side effects inline.

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::auth::Caller;
use crate::config::CatalogueConfig;
use crate::error::CatalogueError;
use crate::manager::map_store_error;
use crate::manager::provider_manager::ProviderManager;
use crate::models::bundle::{Bundle, Payload};
use crate::models::logging_info::{
    determine_audit_state, ActionType, AuditState, LoggingInfo, LoggingInfoType,
};
use crate::models::metadata::Metadata;
use crate::models::status::{ResourceKind, ResourceStatus, TemplateStatus};
use crate::store::{Document, DocumentStore, FacetFilter, Paging};
use crate::sync::bus::EventBus;
use crate::sync::events::{EventAction, RegistryEvent};
use crate::vocabulary::{VocabularyRegistry, TYPE_PROVIDER_STATE, TYPE_RESOURCE_STATE};

/// A bundle together with its derived display state.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RichResource<P> {
    /// The underlying bundle
    pub bundle: Bundle<P>,
    /// Derived compliance state
    pub audit_state: AuditState,
}

/// Generic CRUD + lifecycle manager for one resource kind.
pub struct ResourceManager<P: Payload, S: DocumentStore> {
    pub(crate) store: Arc<S>,
    pub(crate) vocabulary: Arc<VocabularyRegistry>,
    /// Provider directory, for payloads that belong to a provider. `None`
    /// only for the provider manager itself.
    pub(crate) providers: Option<Arc<ProviderManager<S>>>,
    pub(crate) bus: EventBus,
    pub(crate) config: Arc<CatalogueConfig>,
    _payload: PhantomData<fn() -> P>,
}

impl<P: Payload, S: DocumentStore> ResourceManager<P, S> {
    /// Creates a manager for `P`'s resource kind.
    pub fn new(
        store: Arc<S>,
        vocabulary: Arc<VocabularyRegistry>,
        providers: Option<Arc<ProviderManager<S>>>,
        bus: EventBus,
        config: Arc<CatalogueConfig>,
    ) -> Self {
        ResourceManager {
            store,
            vocabulary,
            providers,
            bus,
            config,
            _payload: PhantomData,
        }
    }

    /// The document-store resource type this manager writes.
    pub fn resource_type(&self) -> &'static str {
        P::kind().resource_type()
    }

    fn kind(&self) -> ResourceKind {
        P::kind()
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Registers a new bundle: assigns an id, moves it into `pending`,
    /// records the onboarding entry, and persists it.
    pub async fn add(
        &self,
        mut bundle: Bundle<P>,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        // 1. Fill defaults the client may omit
        if bundle.payload.id().is_empty() {
            bundle.payload.set_id(Uuid::new_v4().to_string());
        }
        if bundle.payload.catalogue_id().is_empty() {
            bundle
                .payload
                .set_catalogue_id(self.config.catalogue_id.clone());
        }

        // 2. Validate references before touching the store
        self.validate(&bundle).await?;
        if self
            .store
            .exists(self.resource_type(), bundle.id())
            .await
            .map_err(map_store_error)?
        {
            return Err(CatalogueError::AlreadyExists {
                resource_type: self.resource_type().to_string(),
                id: bundle.id().to_string(),
            });
        }

        // 3. Every new registration starts pending and inactive
        bundle.set_status(ResourceStatus::Pending);
        bundle.active = false;
        bundle.suspended = false;
        bundle.draft = false;
        bundle.metadata = Some(Metadata::create(caller));
        bundle.logging_info.clear();
        bundle.append_log(LoggingInfo::entry(
            caller,
            LoggingInfoType::Onboard,
            ActionType::Registered,
        )?);

        // 4. Persist and announce
        self.store
            .add(self.to_document(&bundle)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id = bundle.id(),
            "registered new bundle"
        );
        self.emit_event(EventAction::Registered, &bundle, None);
        Ok(bundle)
    }

    /// Updates a bundle's payload, appending an update entry. Updating a
    /// rejected bundle resubmits it: the status resets to pending and the
    /// owning provider's template goes back into review.
    pub async fn update(
        &self,
        mut bundle: Bundle<P>,
        comment: Option<String>,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        let existing = self.get_internal(bundle.id()).await?;

        // Public copies are maintained exclusively by the mirror
        // synchronizer; clients can never write them directly.
        if existing.is_published() {
            return Err(CatalogueError::access_denied(
                "public copies are read-only; update the original instead",
            ));
        }
        if existing.suspended && !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "suspended entries can only be modified by moderators",
            ));
        }
        self.check_write_access(&existing, caller)?;

        if bundle.payload.catalogue_id().is_empty() {
            bundle
                .payload
                .set_catalogue_id(existing.payload.catalogue_id().to_string());
        } else if bundle.payload.catalogue_id() != existing.payload.catalogue_id() {
            return Err(CatalogueError::validation(
                "the catalogue of an entry cannot change on update",
            ));
        }
        self.validate(&bundle).await?;

        // Carry the lifecycle state forward; only the payload is
        // client-controlled.
        let mut updated = existing.clone();
        updated.payload = bundle.payload;
        updated.metadata = Some(Metadata::update(
            existing.metadata.as_ref().ok_or_else(|| {
                CatalogueError::Internal("stored bundle without metadata".to_string())
            })?,
            caller,
        ));
        updated.append_log(LoggingInfo::entry_with_comment(
            caller,
            LoggingInfoType::Update,
            ActionType::Updated,
            comment,
        )?);

        // A rejected entry that gets edited goes back into review, and so
        // does its provider's template.
        if existing.status() == Some(ResourceStatus::Rejected) {
            updated.set_status(ResourceStatus::Pending);
            self.sync_provider_template(&updated, TemplateStatus::Pending)
                .await?;
        }

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id = updated.id(),
            "updated bundle"
        );
        self.emit_event(EventAction::Updated, &updated, Some(&existing));
        Ok(updated)
    }

    /// The moderation decision: sets status and active together. This is
    /// the single legal way out of `pending`.
    pub async fn verify(
        &self,
        id: &str,
        status_label: &str,
        active: bool,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "only moderators may verify entries",
            ));
        }
        let state_type = if self.kind() == ResourceKind::Provider {
            TYPE_PROVIDER_STATE
        } else {
            TYPE_RESOURCE_STATE
        };
        self.vocabulary.expect_type(status_label, state_type)?;
        let target = ResourceStatus::parse(status_label, self.kind()).ok_or_else(|| {
            CatalogueError::validation(format!(
                "'{}' is not a {} state",
                status_label,
                self.kind()
            ))
        })?;

        let existing = self.get_internal(id).await?;
        if existing.draft {
            return Err(CatalogueError::validation(
                "draft entries must be onboarded before they can be verified",
            ));
        }
        let current = existing.status().ok_or_else(|| {
            CatalogueError::validation("entry has no recognizable status; it cannot be verified")
        })?;
        if !current.allows_transition_to(target) {
            return Err(CatalogueError::conflict(format!(
                "illegal transition from '{}' to '{}'",
                current.label(self.kind()),
                target.label(self.kind())
            )));
        }

        tracing::debug!(
            resource_type = self.resource_type(),
            id,
            status = status_label,
            active,
            "verifying bundle"
        );

        let mut updated = existing.clone();
        updated.set_status(target);
        match target {
            ResourceStatus::Pending => {
                // forced re-review; no onboarding entry is recorded
            }
            ResourceStatus::Approved => {
                updated.active = active;
                updated.append_log(LoggingInfo::entry(
                    caller,
                    LoggingInfoType::Onboard,
                    ActionType::Approved,
                )?);
            }
            ResourceStatus::Rejected => {
                updated.active = false;
                updated.append_log(LoggingInfo::entry(
                    caller,
                    LoggingInfoType::Onboard,
                    ActionType::Rejected,
                )?);
            }
        }
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, caller));

        // the owning provider's template aggregate follows the decision
        let template = match target {
            ResourceStatus::Pending => TemplateStatus::Pending,
            ResourceStatus::Approved => TemplateStatus::Approved,
            ResourceStatus::Rejected => TemplateStatus::Rejected,
        };
        self.sync_provider_template(&updated, template).await?;

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id,
            status = status_label,
            "verified bundle"
        );
        self.emit_event(EventAction::Verified, &updated, Some(&existing));
        Ok(updated)
    }

    /// Toggles the active flag of an already-moderated bundle.
    pub async fn publish(
        &self,
        id: &str,
        active: bool,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "only moderators may change activation",
            ));
        }
        let existing = self.get_internal(id).await?;

        if active && existing.status() != Some(ResourceStatus::Approved) {
            return Err(CatalogueError::validation(format!(
                "cannot activate an entry with status '{}'",
                existing.status.as_deref().unwrap_or("none")
            )));
        }
        if active {
            if let (Some(providers), Some(provider_id)) =
                (&self.providers, existing.payload.provider_id())
            {
                let provider = providers.get_bundle(provider_id).await?;
                if provider.status() != Some(ResourceStatus::Approved) || !provider.active {
                    return Err(CatalogueError::conflict(
                        "the entry does not have an active, approved provider",
                    ));
                }
            }
        }

        let mut updated = existing.clone();
        updated.active = active;
        let action = if active {
            ActionType::Activated
        } else {
            ActionType::Deactivated
        };
        updated.append_log(LoggingInfo::entry(caller, LoggingInfoType::Update, action)?);
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, caller));

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        self.emit_event(EventAction::Updated, &updated, Some(&existing));
        Ok(updated)
    }

    /// Records a compliance audit without touching status or activation.
    pub async fn audit(
        &self,
        id: &str,
        comment: Option<String>,
        action: ActionType,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "only moderators may audit entries",
            ));
        }
        if !matches!(action, ActionType::Valid | ActionType::Invalid) {
            return Err(CatalogueError::validation(
                "audit action must be 'valid' or 'invalid'",
            ));
        }

        let existing = self.get_internal(id).await?;
        let mut updated = existing.clone();
        updated.append_log(LoggingInfo::entry_with_comment(
            caller,
            LoggingInfoType::Audit,
            action,
            comment,
        )?);

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id,
            action = action.as_str(),
            "audited bundle"
        );
        self.emit_event(EventAction::Audited, &updated, Some(&existing));
        Ok(updated)
    }

    /// Imposes or lifts a suspension. Suspension forces non-visibility
    /// regardless of moderation state.
    pub async fn suspend(
        &self,
        id: &str,
        suspended: bool,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "only moderators may suspend entries",
            ));
        }
        let existing = self.get_internal(id).await?;
        if existing.suspended == suspended {
            return Err(CatalogueError::validation(if suspended {
                "entry is already suspended"
            } else {
                "entry is not suspended"
            }));
        }

        let mut updated = existing.clone();
        updated.suspended = suspended;
        let action = if suspended {
            ActionType::Suspended
        } else {
            ActionType::Unsuspended
        };
        updated.append_log(LoggingInfo::entry(caller, LoggingInfoType::Update, action)?);
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, caller));

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        self.emit_event(EventAction::Updated, &updated, Some(&existing));
        Ok(updated)
    }

    /// Suspends or unsuspends every entry owned by `provider_id`. Used by
    /// the suspension cascade; entries already in the target state are
    /// left untouched.
    pub async fn suspend_by_provider(
        &self,
        provider_id: &str,
        suspended: bool,
    ) -> Result<usize, CatalogueError> {
        let filter = FacetFilter::new().with_paging(0, crate::store::facet::MAX_QUANTITY);
        let page = self
            .store
            .search(self.resource_type(), &filter)
            .await
            .map_err(map_store_error)?;

        let mut changed = 0;
        for document in page.results {
            let Ok(bundle) = self.from_document(document) else {
                continue;
            };
            if bundle.payload.provider_id() != Some(provider_id)
                || bundle.suspended == suspended
            {
                continue;
            }
            let previous = bundle.clone();
            let mut updated = bundle;
            updated.suspended = suspended;
            updated.append_log(LoggingInfo::system_update(if suspended {
                ActionType::Suspended
            } else {
                ActionType::Unsuspended
            })?);
            self.store
                .update(self.to_document(&updated)?)
                .await
                .map_err(map_store_error)?;
            self.emit_event(EventAction::Updated, &updated, Some(&previous));
            changed += 1;
        }
        Ok(changed)
    }

    /// Reassigns a resource to another provider. Downstream synchronizers
    /// see a plain update, so the mirror and template bookkeeping follow.
    pub async fn change_provider(
        &self,
        id: &str,
        new_provider_id: &str,
        comment: Option<String>,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if !caller.is_moderator() {
            return Err(CatalogueError::access_denied(
                "only moderators may move entries between providers",
            ));
        }
        let existing = self.get_internal(id).await?;
        if existing.payload.provider_id().is_none() {
            return Err(CatalogueError::validation(
                "this entry does not belong to a provider",
            ));
        }
        let providers = self.providers.as_ref().ok_or_else(|| {
            CatalogueError::Internal("no provider directory configured".to_string())
        })?;
        let new_provider = providers.get_bundle(new_provider_id).await.map_err(|_| {
            CatalogueError::validation(format!("provider '{}' does not exist", new_provider_id))
        })?;
        if new_provider.status() != Some(ResourceStatus::Approved) {
            return Err(CatalogueError::conflict(format!(
                "provider '{}' is not approved",
                new_provider_id
            )));
        }

        let mut updated = existing.clone();
        updated.payload.set_provider_id(new_provider_id.to_string());
        updated.append_log(LoggingInfo::entry_with_comment(
            caller,
            LoggingInfoType::Move,
            ActionType::Moved,
            comment,
        )?);
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, caller));

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id,
            new_provider_id,
            "moved bundle to new provider"
        );
        self.emit_event(EventAction::Updated, &updated, Some(&existing));
        Ok(updated)
    }

    /// Deletes a bundle. The mirror synchronizer removes any public copy.
    pub async fn delete(&self, id: &str, caller: &Caller) -> Result<Bundle<P>, CatalogueError> {
        let existing = self.get_internal(id).await?;
        self.check_write_access(&existing, caller)?;

        self.store
            .delete(self.resource_type(), id)
            .await
            .map_err(map_store_error)?;
        tracing::info!(resource_type = self.resource_type(), id, "deleted bundle");
        self.emit_event(EventAction::Deleted, &existing, None);
        Ok(existing)
    }

    // ========================================================================
    // Draft workspace
    // ========================================================================

    /// Creates a draft: a private workspace entry with no moderation
    /// status. Drafts are only visible to their owner and moderators and
    /// never reach the public mirror.
    pub async fn add_draft(
        &self,
        mut bundle: Bundle<P>,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        if bundle.payload.id().is_empty() {
            bundle.payload.set_id(Uuid::new_v4().to_string());
        }
        if bundle.payload.catalogue_id().is_empty() {
            bundle
                .payload
                .set_catalogue_id(self.config.catalogue_id.clone());
        }

        bundle.draft = true;
        bundle.status = None;
        bundle.active = false;
        bundle.suspended = false;
        bundle.metadata = Some(Metadata::create(caller));
        bundle.logging_info.clear();
        bundle.append_log(LoggingInfo::entry(
            caller,
            LoggingInfoType::Draft,
            ActionType::Drafted,
        )?);

        self.store
            .add(self.to_document(&bundle)?)
            .await
            .map_err(map_store_error)?;
        tracing::debug!(
            resource_type = self.resource_type(),
            id = bundle.id(),
            "created draft"
        );
        Ok(bundle)
    }

    /// Promotes a draft into the moderation pipeline: full validation,
    /// `pending` status, and the registration entry, exactly as a direct
    /// `add` would have produced.
    pub async fn transform_to_non_draft(
        &self,
        id: &str,
        caller: &Caller,
    ) -> Result<Bundle<P>, CatalogueError> {
        let existing = self.get_internal(id).await?;
        if !existing.draft {
            return Err(CatalogueError::validation("entry is not a draft"));
        }
        self.check_write_access(&existing, caller)?;
        self.validate(&existing).await?;

        let mut updated = existing.clone();
        updated.draft = false;
        updated.set_status(ResourceStatus::Pending);
        updated.active = false;
        updated.metadata = existing
            .metadata
            .as_ref()
            .map(|metadata| Metadata::update(metadata, caller));
        updated.append_log(LoggingInfo::entry(
            caller,
            LoggingInfoType::Onboard,
            ActionType::Registered,
        )?);

        self.store
            .update(self.to_document(&updated)?)
            .await
            .map_err(map_store_error)?;
        tracing::info!(
            resource_type = self.resource_type(),
            id,
            "promoted draft into moderation"
        );
        self.emit_event(EventAction::Registered, &updated, Some(&existing));
        Ok(updated)
    }

    // ========================================================================
    // Read path
    // ========================================================================

    /// Fetches a bundle. Anonymous callers only see publicly visible
    /// entries; owners and moderators see everything.
    pub async fn get(&self, id: &str, caller: Option<&Caller>) -> Result<Bundle<P>, CatalogueError> {
        let bundle = self.get_internal(id).await?;
        if bundle.is_publicly_visible() {
            return Ok(bundle);
        }
        match caller {
            // hide the existence of non-public entries from anonymous reads
            None => Err(CatalogueError::not_found(self.resource_type(), id)),
            Some(caller) if caller.is_moderator() || self.is_owner(&bundle, caller) => Ok(bundle),
            Some(_) => Err(CatalogueError::access_denied(
                "entry is not publicly visible",
            )),
        }
    }

    /// Fetches a bundle together with its derived display state.
    pub async fn get_rich(
        &self,
        id: &str,
        caller: Option<&Caller>,
    ) -> Result<RichResource<P>, CatalogueError> {
        let bundle = self.get(id, caller).await?;
        let audit_state = determine_audit_state(&bundle.logging_info);
        Ok(RichResource {
            bundle,
            audit_state,
        })
    }

    /// Searches bundles. Non-moderator callers are restricted to the
    /// approved, active, unsuspended, non-draft view.
    pub async fn get_all(
        &self,
        filter: &FacetFilter,
        caller: Option<&Caller>,
    ) -> Result<Paging<Bundle<P>>, CatalogueError> {
        let mut filter = filter.clone();
        let moderator = caller.is_some_and(|caller| caller.is_moderator());
        if !moderator {
            filter = filter
                .with_filter("status", ResourceStatus::Approved.label(self.kind()))
                .with_filter("active", "true")
                .with_filter("suspended", "false")
                .with_filter("draft", "false");
        }
        let page = self
            .store
            .search(self.resource_type(), &filter)
            .await
            .map_err(map_store_error)?;
        Ok(page.filter_map_results(|document| self.from_document(document).ok()))
    }

    /// Searches bundles by one exact field value, unrestricted. Internal
    /// plumbing for hooks and sibling managers.
    pub async fn get_by(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<Bundle<P>>, CatalogueError> {
        let filter = FacetFilter::new()
            .with_filter(field, value)
            .with_paging(0, crate::store::facet::MAX_QUANTITY);
        let page = self
            .store
            .search(self.resource_type(), &filter)
            .await
            .map_err(map_store_error)?;
        Ok(page
            .results
            .into_iter()
            .filter_map(|document| self.from_document(document).ok())
            .collect())
    }

    /// Whether a bundle exists, regardless of visibility.
    pub async fn exists(&self, id: &str) -> Result<bool, CatalogueError> {
        self.store
            .exists(self.resource_type(), id)
            .await
            .map_err(map_store_error)
    }

    /// Unrestricted fetch, for internal use by hooks and the write path.
    pub(crate) async fn get_internal(&self, id: &str) -> Result<Bundle<P>, CatalogueError> {
        let document = self
            .store
            .get(self.resource_type(), id)
            .await
            .map_err(map_store_error)?;
        self.from_document(document)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn validate(&self, bundle: &Bundle<P>) -> Result<(), CatalogueError> {
        if bundle.payload.name().trim().is_empty() {
            return Err(CatalogueError::validation("name must not be empty"));
        }
        if bundle.payload.catalogue_id().trim().is_empty() {
            return Err(CatalogueError::validation("catalogue_id must not be empty"));
        }
        for (vocabulary_type, id) in bundle.payload.vocabulary_refs() {
            self.vocabulary.expect_type(&id, vocabulary_type)?;
        }
        if let (Some(providers), Some(provider_id)) =
            (&self.providers, bundle.payload.provider_id())
        {
            let provider = providers.get_bundle(provider_id).await.map_err(|_| {
                CatalogueError::validation(format!("provider '{}' does not exist", provider_id))
            })?;
            if provider.draft {
                return Err(CatalogueError::validation(format!(
                    "provider '{}' has not been onboarded",
                    provider_id
                )));
            }
        }
        Ok(())
    }

    /// Propagates a template-status change to the owning provider, when
    /// this kind has one.
    async fn sync_provider_template(
        &self,
        bundle: &Bundle<P>,
        template: TemplateStatus,
    ) -> Result<(), CatalogueError> {
        if let (Some(providers), Some(provider_id)) =
            (&self.providers, bundle.payload.provider_id())
        {
            providers
                .update_template_status(provider_id, template)
                .await?;
        }
        Ok(())
    }

    fn is_owner(&self, bundle: &Bundle<P>, caller: &Caller) -> bool {
        bundle
            .metadata
            .as_ref()
            .is_some_and(|metadata| metadata.terms.contains(&caller.email))
    }

    fn check_write_access(
        &self,
        bundle: &Bundle<P>,
        caller: &Caller,
    ) -> Result<(), CatalogueError> {
        if caller.is_moderator() || self.is_owner(bundle, caller) {
            Ok(())
        } else {
            Err(CatalogueError::access_denied(
                "only moderators or the registering users may modify this entry",
            ))
        }
    }

    fn to_document(&self, bundle: &Bundle<P>) -> Result<Document, CatalogueError> {
        Ok(Document::new(
            self.resource_type(),
            bundle.id(),
            serde_json::to_value(bundle)?,
        ))
    }

    fn from_document(&self, document: Document) -> Result<Bundle<P>, CatalogueError> {
        Ok(serde_json::from_value(document.payload)?)
    }

    pub(crate) fn emit_event(
        &self,
        action: EventAction,
        bundle: &Bundle<P>,
        previous: Option<&Bundle<P>>,
    ) {
        match RegistryEvent::new(action, bundle, previous) {
            Ok(event) => {
                self.bus.publish(event);
            }
            Err(error) => {
                tracing::error!(
                    resource_type = self.resource_type(),
                    id = bundle.id(),
                    error = %error,
                    "failed to serialize registry event"
                );
            }
        }
    }
}
