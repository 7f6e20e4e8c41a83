// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory person and system phone number directories.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use threadline_core::{
    Collaborator, Person, PersonDirectory, PersonId, SystemPhoneNumber, SystemPhoneNumberDirectory,
    SystemPhoneNumberId, ThreadlineError, WorkflowTypeId, normalize_number,
};

#[derive(Default)]
struct People {
    by_id: HashMap<PersonId, Person>,
    by_number: HashMap<String, PersonId>,
}

/// A mock person directory.
///
/// Unknown numbers get an anonymous placeholder that is remembered, so a
/// second message from the same number resolves to the same person.
#[derive(Default)]
pub struct MockPersonDirectory {
    people: Mutex<People>,
    failing: AtomicBool,
}

impl MockPersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a person reachable at `numbers`.
    pub async fn add_person(&self, person: Person, numbers: &[&str]) {
        let mut people = self.people.lock().await;
        for number in numbers {
            people
                .by_number
                .insert(normalize_number(number), person.id.clone());
        }
        people.by_id.insert(person.id.clone(), person);
    }

    pub async fn len(&self) -> usize {
        self.people.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ThreadlineError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ThreadlineError::collaborator(
                "mock-people",
                "directory unavailable",
            ));
        }
        Ok(())
    }
}

impl Collaborator for MockPersonDirectory {
    fn name(&self) -> &str {
        "mock-people"
    }
}

#[async_trait]
impl PersonDirectory for MockPersonDirectory {
    async fn resolve_by_sms_number(&self, number: &str) -> Result<Person, ThreadlineError> {
        self.check()?;
        let number = normalize_number(number);
        let mut people = self.people.lock().await;
        if let Some(person) = people
            .by_number
            .get(&number)
            .and_then(|id| people.by_id.get(id))
        {
            return Ok(person.clone());
        }

        let person = Person::anonymous(format!("anon-{number}"));
        people.by_number.insert(number, person.id.clone());
        people.by_id.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, ThreadlineError> {
        self.check()?;
        Ok(self.people.lock().await.by_id.get(id).cloned())
    }
}

/// A mock system phone number directory keyed by normalized number.
#[derive(Default)]
pub struct MockSystemPhoneNumberDirectory {
    numbers: Mutex<HashMap<String, SystemPhoneNumber>>,
}

impl MockSystemPhoneNumberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, mut number: SystemPhoneNumber) {
        number.e164_number = normalize_number(&number.e164_number);
        self.numbers
            .lock()
            .await
            .insert(number.e164_number.clone(), number);
    }

    /// Register `number` owned by `owner`, without hooks.
    pub async fn register(&self, number: &str, owner: Option<&str>) -> SystemPhoneNumber {
        let normalized = normalize_number(number);
        let system = SystemPhoneNumber {
            id: SystemPhoneNumberId(format!("sys-{normalized}")),
            e164_number: normalized,
            assigned_owner_person_id: owner.map(PersonId::from),
            is_forwarding_enabled: false,
            received_workflow_type_id: None,
        };
        self.add(system.clone()).await;
        system
    }

    /// Register `number` with forwarding and a received-workflow type.
    pub async fn register_with_hooks(
        &self,
        number: &str,
        owner: Option<&str>,
        workflow_type: &str,
    ) -> SystemPhoneNumber {
        let mut system = self.register(number, owner).await;
        system.is_forwarding_enabled = true;
        system.received_workflow_type_id = Some(WorkflowTypeId::from(workflow_type));
        self.add(system.clone()).await;
        system
    }
}

impl Collaborator for MockSystemPhoneNumberDirectory {
    fn name(&self) -> &str {
        "mock-system-numbers"
    }
}

#[async_trait]
impl SystemPhoneNumberDirectory for MockSystemPhoneNumberDirectory {
    async fn find_by_number(
        &self,
        number: &str,
    ) -> Result<Option<SystemPhoneNumber>, ThreadlineError> {
        Ok(self
            .numbers
            .lock()
            .await
            .get(&normalize_number(number))
            .cloned())
    }
}
