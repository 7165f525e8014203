// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Criteria, Entity, Order, Patch, Repository, StorageError};

/// Entities kept in creation order, keyed by id
pub struct InMemoryRepository<E> {
    entities: RwLock<IndexMap<String, E>>,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            entities: RwLock::new(IndexMap::new()),
        }
    }
}

fn check_unique<E: Entity>(
    entities: &IndexMap<String, E>,
    candidate: &E,
) -> Result<(), StorageError> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };

    let taken = entities.values().any(|existing| {
        existing.id() != candidate.id() && existing.unique_key().as_ref() == Some(&key)
    });

    if taken {
        Err(StorageError::Conflict { kind: E::KIND, key })
    } else {
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StorageError> {
        Ok(self.entities.read().await.get(id).cloned())
    }

    async fn find_matching(&self, criteria: &Criteria<E>) -> Result<Vec<E>, StorageError> {
        let entities = self.entities.read().await;
        let matching = entities.values().filter(|entity| criteria.matches(entity));

        let page = match criteria.order() {
            Order::Creation => criteria.page(matching),
            Order::NewestFirst => criteria.page(matching.rev()),
        };

        Ok(page.into_iter().cloned().collect())
    }

    async fn count_matching(&self, criteria: &Criteria<E>) -> Result<usize, StorageError> {
        Ok(self
            .entities
            .read()
            .await
            .values()
            .filter(|entity| criteria.matches(entity))
            .count())
    }

    async fn create(&self, mut entity: E) -> Result<E, StorageError> {
        let mut entities = self.entities.write().await;

        entity.set_id(Uuid::new_v4().to_string());
        check_unique(&entities, &entity)?;

        entities.insert(entity.id().to_string(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &str, patch: Patch<E>) -> Result<E, StorageError> {
        let mut entities = self.entities.write().await;

        let mut updated = entities
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            })?;
        patch(&mut updated);
        // The id is not for the patch to change
        updated.set_id(id.to_string());
        check_unique(&entities, &updated)?;

        entities.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.entities.write().await.shift_remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        id: String,
        email: String,
        age: u32,
    }

    impl Account {
        fn new(email: &str, age: u32) -> Self {
            Self {
                id: String::new(),
                email: email.to_string(),
                age,
            }
        }
    }

    impl Entity for Account {
        const KIND: &'static str = "Account";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.email.clone())
        }
    }

    async fn repository() -> InMemoryRepository<Account> {
        let repository = InMemoryRepository::new();
        for (email, age) in [("a@x.com", 20), ("b@x.com", 30), ("c@x.com", 40)] {
            repository.create(Account::new(email, age)).await.unwrap();
        }
        repository
    }

    fn emails(accounts: &[Account]) -> Vec<&str> {
        accounts.iter().map(|account| account.email.as_str()).collect()
    }

    #[tokio::test]
    async fn create_assigns_ids() {
        let repository = InMemoryRepository::new();
        let created = repository.create(Account::new("a@x.com", 1)).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(
            repository.find_by_id(&created.id).await.unwrap(),
            Some(created)
        );
        assert_eq!(repository.find_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unique_keys() {
        let repository = repository().await;

        assert_eq!(
            repository.create(Account::new("a@x.com", 50)).await,
            Err(StorageError::Conflict {
                kind: "Account",
                key: "a@x.com".to_string()
            })
        );

        let accounts = repository.find_matching(&Criteria::all()).await.unwrap();
        let result = repository
            .update(
                &accounts[1].id,
                Box::new(|account: &mut Account| account.email = "a@x.com".to_string()),
            )
            .await;
        assert!(matches!(result, Err(StorageError::Conflict { .. })));
        assert_eq!(repository.count_matching(&Criteria::all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn matching_and_paging() {
        let repository = repository().await;

        let older = Criteria::matching(|account: &Account| account.age >= 30);
        assert_eq!(
            emails(&repository.find_matching(&older).await.unwrap()),
            vec!["b@x.com", "c@x.com"]
        );
        assert_eq!(repository.count_matching(&older).await.unwrap(), 2);

        let newest = Criteria::all().newest_first().skip(1).limit(1);
        assert_eq!(
            emails(&repository.find_matching(&newest).await.unwrap()),
            vec!["b@x.com"]
        );
        assert_eq!(repository.count_matching(&newest).await.unwrap(), 3);

        let beyond = Criteria::all().skip(3).limit(2);
        assert!(repository.find_matching(&beyond).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete() {
        let repository = repository().await;
        let first = repository.find_matching(&Criteria::all()).await.unwrap()[0].clone();

        let updated = repository
            .update(&first.id, Box::new(|account: &mut Account| account.age = 21))
            .await
            .unwrap();
        assert_eq!(updated.age, 21);
        assert_eq!(updated.id, first.id);

        assert!(matches!(
            repository.update("missing", Box::new(|_: &mut Account| {})).await,
            Err(StorageError::NotFound { .. })
        ));

        assert!(repository.delete(&first.id).await.unwrap());
        assert!(!repository.delete(&first.id).await.unwrap());
        assert_eq!(
            emails(&repository.find_matching(&Criteria::all()).await.unwrap()),
            vec!["b@x.com", "c@x.com"]
        );
    }
}
