//! Client mutation logic.
//!
//! Create and update combine three steps that must happen in a fixed order:
//! required-field validation, the uniqueness check, then birth date parsing
//! and age derivation. Nothing is written unless all of them pass.

use std::sync::Arc;

use tracing::instrument;

use gym_roster_core::{
    Client, ClientFilter, ClientId, ClientInput, ClientPatch, UniquenessPolicy,
};

use super::{Clock, ServiceError};
use crate::db::RecordStore;

/// Client operations over a shared record store.
#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    policy: UniquenessPolicy,
}

impl ClientService {
    /// Create a client service.
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        policy: UniquenessPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// All clients.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DataAccess` if the store fails.
    pub async fn list(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(self.store.list_clients().await?)
    }

    /// A client by id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DataAccess` if the store fails.
    pub async fn get(&self, id: ClientId) -> Result<Option<Client>, ServiceError> {
        Ok(self.store.find_client(id).await?)
    }

    /// Fail with `DuplicateClient` if any stored client matches `filter`.
    ///
    /// An empty filter never consults the store.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::DuplicateClient` on a match and
    /// `ServiceError::DataAccess` if the store fails.
    pub async fn ensure_unique(&self, filter: &ClientFilter) -> Result<(), ServiceError> {
        if filter.is_empty() {
            return Ok(());
        }

        match self.store.find_client_by(filter).await? {
            Some(existing) => {
                let field = filter.shared_field(&existing).unwrap_or("identity");
                tracing::debug!(existing = %existing.id, field, "Uniqueness conflict");
                Err(ServiceError::DuplicateClient {
                    existing: existing.id,
                    field,
                })
            }
            None => Ok(()),
        }
    }

    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking: `InvalidInput` for empty text,
    /// `DuplicateClient` for a uniqueness conflict, `InvalidDate` or
    /// `NegativeAge` for a bad birth date, and `DataAccess` on store failure.
    #[instrument(skip(self, input), fields(client_id = tracing::field::Empty))]
    pub async fn create(&self, input: ClientInput) -> Result<Client, ServiceError> {
        let input = input.validate()?;

        self.ensure_unique(&input.conflict_filter(self.policy))
            .await?;

        let client = input.into_client(ClientId::generate(), self.clock.today())?;
        self.store.insert_client(&client).await?;

        tracing::Span::current().record("client_id", tracing::field::display(client.id));
        tracing::info!(status = %client.membership_status, "Client created");
        Ok(client)
    }

    /// Apply a sparse update to a client.
    ///
    /// # Errors
    ///
    /// Returns, in order of checking: `InvalidInput` for empty text,
    /// `DuplicateClient` if another client holds a supplied identifying field,
    /// `NotFound` if `id` is absent, `InvalidDate` or `NegativeAge` for a bad
    /// birth date, and `DataAccess` on store failure.
    #[instrument(skip(self, patch), fields(client_id = %id))]
    pub async fn update(&self, id: ClientId, patch: ClientPatch) -> Result<Client, ServiceError> {
        let patch = patch.validate()?;

        if patch.touches_identity() {
            self.ensure_unique(&patch.conflict_filter(id, self.policy))
                .await?;
        }

        let existing = self
            .store
            .find_client(id)
            .await?
            .ok_or_else(|| ServiceError::client_not_found(id))?;

        if let Some(requested) = patch.membership_status {
            tracing::debug!(%requested, "Ignoring supplied membership status");
        }

        let updated = existing.merge(patch, self.clock.today())?;
        let stored = self
            .store
            .update_client(&updated)
            .await?
            .ok_or_else(|| ServiceError::client_not_found(id))?;

        tracing::info!(status = %stored.membership_status, "Client updated");
        Ok(stored)
    }

    /// Delete a client, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is absent and `DataAccess` on store failure.
    #[instrument(skip(self), fields(client_id = %id))]
    pub async fn delete(&self, id: ClientId) -> Result<Client, ServiceError> {
        let removed = self
            .store
            .delete_client(id)
            .await?
            .ok_or_else(|| ServiceError::client_not_found(id))?;

        tracing::info!("Client deleted");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use gym_roster_core::{MembershipStatus, ProductId, ProductUpdate};

    use super::*;
    use crate::db::MemoryRecordStore;
    use crate::services::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn service_with(policy: UniquenessPolicy) -> ClientService {
        ClientService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(FixedClock(today())),
            policy,
        )
    }

    fn service() -> ClientService {
        service_with(UniquenessPolicy::Any)
    }

    fn ana() -> ClientInput {
        ClientInput {
            name: "Ana".to_owned(),
            email: "ana@x.com".to_owned(),
            phone: "555-1111".to_owned(),
            birthday: "2000-05-10".to_owned(),
            waiver: true,
            product_id: None,
        }
    }

    fn bob() -> ClientInput {
        ClientInput {
            name: "Bob".to_owned(),
            email: "bob@x.com".to_owned(),
            phone: "555-2222".to_owned(),
            birthday: "1985-12-01".to_owned(),
            waiver: false,
            product_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_derives_age_and_status() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        assert_eq!(client.age, 26);
        assert_eq!(client.membership_status, MembershipStatus::Inactive);
        assert_eq!(service.get(client.id).await.unwrap(), Some(client));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_create_logs_id_not_email() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = service().create(ana()).await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Client created"), "{output}");
        assert!(output.contains(&format!("client_id={}", client.id)), "{output}");
        assert!(!output.contains("ana@x.com"), "{output}");
    }

    #[tokio::test]
    async fn test_create_with_product_is_active() {
        let service = service();
        let client = service
            .create(ClientInput {
                product_id: Some(ProductId::generate()),
                ..ana()
            })
            .await
            .unwrap();

        assert_eq!(client.membership_status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_writes_nothing() {
        let service = service();
        let first = service.create(ana()).await.unwrap();

        let err = service
            .create(ClientInput {
                email: "ana@x.com".to_owned(),
                ..bob()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::DuplicateClient { existing, field: "email" } if existing == first.id
        ));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_all_policy_allows_partial_match() {
        let service = service_with(UniquenessPolicy::All);
        service.create(ana()).await.unwrap();

        service
            .create(ClientInput {
                email: "ana@x.com".to_owned(),
                ..bob()
            })
            .await
            .unwrap();

        let err = service.create(ana()).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateClient { .. }));
    }

    #[tokio::test]
    async fn test_create_checks_uniqueness_before_date() {
        let service = service();
        service.create(ana()).await.unwrap();

        let err = service
            .create(ClientInput {
                birthday: "not a date".to_owned(),
                ..ana()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateClient { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_dates() {
        let service = service();

        let err = service
            .create(ClientInput {
                birthday: "2001-02-30".to_owned(),
                ..ana()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDate(_)));

        let err = service
            .create(ClientInput {
                birthday: "2026-10-19".to_owned(),
                ..ana()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NegativeAge));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let err = service()
            .create(ClientInput {
                name: "   ".to_owned(),
                ..ana()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_waiver_only_has_no_self_conflict() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        let updated = service
            .update(
                client.id,
                ClientPatch {
                    waiver: Some(false),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.waiver);
        assert_eq!(updated.name, "Ana");
    }

    #[tokio::test]
    async fn test_update_own_identity_is_not_a_conflict() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        let updated = service
            .update(
                client.id,
                ClientPatch {
                    email: Some("ana@x.com".to_owned()),
                    phone: Some("555-9999".to_owned()),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "555-9999");
    }

    #[tokio::test]
    async fn test_update_conflicting_with_other_client() {
        let service = service();
        service.create(ana()).await.unwrap();
        let bob = service.create(bob()).await.unwrap();

        let err = service
            .update(
                bob.id,
                ClientPatch {
                    phone: Some("555-1111".to_owned()),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateClient { field: "phone", .. }));
        assert_eq!(service.get(bob.id).await.unwrap().unwrap().phone, "555-2222");
    }

    #[tokio::test]
    async fn test_update_product_drives_status() {
        let service = service();
        let client = service.create(ana()).await.unwrap();
        let product = ProductId::generate();

        let linked = service
            .update(
                client.id,
                ClientPatch {
                    product: ProductUpdate::Linked(product),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(linked.membership_status, MembershipStatus::Active);
        assert_eq!(linked.product_id, Some(product));
        assert_eq!(linked.age, client.age);
        assert_eq!(linked.email, client.email);

        let cleared = service
            .update(
                client.id,
                ClientPatch {
                    product: ProductUpdate::Cleared,
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.membership_status, MembershipStatus::Inactive);
        assert_eq!(cleared.product_id, None);
    }

    #[tokio::test]
    async fn test_update_ignores_supplied_status() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        let updated = service
            .update(
                client.id,
                ClientPatch {
                    membership_status: Some(MembershipStatus::Active),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.membership_status, MembershipStatus::Inactive);
    }

    #[tokio::test]
    async fn test_update_recomputes_age_from_new_birthday() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        let updated = service
            .update(
                client.id,
                ClientPatch {
                    birthday: Some("October 19, 2000".to_owned()),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.age, 25);
    }

    #[tokio::test]
    async fn test_update_missing_client() {
        let err = service()
            .update(
                ClientId::generate(),
                ClientPatch {
                    waiver: Some(true),
                    ..ClientPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "client", .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let client = service.create(ana()).await.unwrap();

        assert_eq!(service.delete(client.id).await.unwrap().id, client.id);
        assert!(matches!(
            service.delete(client.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
