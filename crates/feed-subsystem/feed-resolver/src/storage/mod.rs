// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Storage seen by the resolvers. Only an in-memory implementation exists.

mod memory;

use async_trait::async_trait;
use core_resolver::FieldError;
use thiserror::Error;

pub use memory::InMemoryRepository;

pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Called once by the repository when the entity is created
    fn set_id(&mut self, id: String);

    /// A value no two stored entities may share
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// A change applied to a stored entity
pub type Patch<E> = Box<dyn FnOnce(&mut E) + Send>;

pub type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// The order entities were created in
    #[default]
    Creation,
    NewestFirst,
}

/// Which entities to return and how to page through them
pub struct Criteria<E> {
    predicate: Option<Predicate<E>>,
    order: Order,
    skip: usize,
    limit: Option<usize>,
}

impl<E> Criteria<E> {
    pub fn all() -> Self {
        Self {
            predicate: None,
            order: Order::default(),
            skip: 0,
            limit: None,
        }
    }

    pub fn matching(predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Box::new(predicate)),
            ..Self::all()
        }
    }

    pub fn newest_first(self) -> Self {
        Self {
            order: Order::NewestFirst,
            ..self
        }
    }

    pub fn skip(self, skip: usize) -> Self {
        Self { skip, ..self }
    }

    pub fn limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn matches(&self, entity: &E) -> bool {
        self.predicate
            .as_ref()
            .map(|predicate| predicate(entity))
            .unwrap_or(true)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Apply skip and limit to already filtered and ordered entities
    pub fn page<T>(&self, entities: impl Iterator<Item = T>) -> Vec<T> {
        let entities = entities.skip(self.skip);

        match self.limit {
            Some(limit) => entities.take(limit).collect(),
            None => entities.collect(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} with key '{key}' exists already")]
    Conflict { kind: &'static str, key: String },
}

impl From<StorageError> for FieldError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Conflict { .. } => FieldError::Conflict(error.to_string()),
            StorageError::NotFound { .. } => FieldError::internal(error.to_string()),
        }
    }
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StorageError>;

    async fn find_matching(&self, criteria: &Criteria<E>) -> Result<Vec<E>, StorageError>;

    /// The number of entities matching the criteria, ignoring skip and limit
    async fn count_matching(&self, criteria: &Criteria<E>) -> Result<usize, StorageError>;

    /// Store a new entity, assigning its id
    async fn create(&self, entity: E) -> Result<E, StorageError>;

    async fn update(&self, id: &str, patch: Patch<E>) -> Result<E, StorageError>;

    /// `false` if there was nothing to delete
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;
}
