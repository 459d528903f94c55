use crate::storage::{InMemoryStorage, OnDiskStorage};
use async_trait::async_trait;
use session_processors::{Credential, CredentialStore, CredentialStoreError};

const AUTH_PREFIX: &str = "auth";
const AUTH_CODE_KEY: &str = "auth_code";

fn to_credential(value: Option<String>) -> Option<Credential> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(Credential::new)
}

#[async_trait]
impl CredentialStore for OnDiskStorage {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        OnDiskStorage::save(self, AUTH_PREFIX, AUTH_CODE_KEY, credential.expose())
            .await
            .map_err(|error| CredentialStoreError(Box::new(error)))
    }

    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let value = self
            .get(AUTH_PREFIX, AUTH_CODE_KEY)
            .await
            .map_err(|error| CredentialStoreError(Box::new(error)))?;

        Ok(to_credential(value))
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.delete(AUTH_PREFIX, AUTH_CODE_KEY)
            .await
            .map_err(|error| CredentialStoreError(Box::new(error)))
    }
}

#[async_trait]
impl CredentialStore for InMemoryStorage {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        InMemoryStorage::save(self, AUTH_PREFIX, AUTH_CODE_KEY, credential.expose());

        Ok(())
    }

    async fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(to_credential(self.get(AUTH_PREFIX, AUTH_CODE_KEY)))
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.delete(AUTH_PREFIX, AUTH_CODE_KEY);

        Ok(())
    }
}
