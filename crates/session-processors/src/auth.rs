use crate::traits::{AuthBackend, CredentialStore};
use crate::types::{AuthState, Credential};
use async_lock::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid access code")]
    InvalidCredential,
}

#[derive(Clone, Copy, Debug)]
struct VerifyOutcome {
    ticket: u64,
    state: AuthState,
}

struct AuthSession {
    state: AuthState,
    credential: Option<Credential>,
}

/// Owns the authenticated/unauthenticated state of the client.
///
/// Every verification takes a ticket. Only the outcome of the most recent
/// ticket is applied to the state and the credential store; older
/// verifications resolve to whatever the most recent one produced.
pub struct AuthGate {
    credential_store: Arc<dyn CredentialStore>,
    auth_backend: Arc<dyn AuthBackend>,
    session: Mutex<AuthSession>,
    latest_ticket: AtomicU64,
    outcomes: watch::Sender<VerifyOutcome>,
}

impl AuthGate {
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        auth_backend: Arc<dyn AuthBackend>,
    ) -> Self {
        let (outcomes, _) = watch::channel(VerifyOutcome {
            ticket: 0,
            state: AuthState::Unauthenticated,
        });

        Self {
            credential_store,
            auth_backend,
            session: Mutex::new(AuthSession {
                state: AuthState::Unauthenticated,
                credential: None,
            }),
            latest_ticket: AtomicU64::new(0),
            outcomes,
        }
    }

    pub async fn state(&self) -> AuthState {
        self.session.lock().await.state
    }

    /// Credential of the current session, present only while authenticated.
    pub async fn credential(&self) -> Option<Credential> {
        let session = self.session.lock().await;

        match session.state {
            AuthState::Authenticated => session.credential.clone(),
            _ => None,
        }
    }

    /// Verifies a previously stored credential, if any.
    ///
    /// Missing or unreadable storage leaves the gate unauthenticated without
    /// touching the network.
    pub async fn restore(&self) -> Result<AuthState, AuthError> {
        let stored = match self.credential_store.load().await {
            Ok(stored) => stored,
            Err(error) => {
                warn!(%error, "Unable to load stored credential, treating it as absent");
                None
            }
        };

        match stored {
            Some(credential) => {
                info!("Found stored credential, verifying it");
                self.verify(credential).await
            }
            None => {
                debug!("No stored credential");
                Ok(AuthState::Unauthenticated)
            }
        }
    }

    pub async fn verify(&self, credential: Credential) -> Result<AuthState, AuthError> {
        // Tickets are handed out under the session lock, so a newer ticket
        // always writes `Verifying` after an older one.
        let ticket = {
            let mut session = self.session.lock().await;
            let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
            session.state = AuthState::Verifying;
            ticket
        };

        debug!(ticket, "Verifying credential");

        let accepted = match self.auth_backend.check_credential(&credential).await {
            Ok(()) => true,
            Err(error) => {
                // Rejection and unreachable backend look the same from the outside.
                debug!(ticket, %error, "Credential check failed");
                false
            }
        };

        let mut session = self.session.lock().await;

        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            drop(session);
            debug!(ticket, "Verification superseded by a newer one");
            return self.wait_for_newer_outcome(ticket).await;
        }

        if accepted {
            if let Err(error) = self.credential_store.save(&credential).await {
                warn!(%error, "Unable to persist credential");
            }
            session.state = AuthState::Authenticated;
            session.credential = Some(credential);
            info!("Credential accepted");
        } else {
            if let Err(error) = self.credential_store.clear().await {
                warn!(%error, "Unable to clear stored credential");
            }
            session.state = AuthState::Unauthenticated;
            session.credential = None;
            warn!("Credential rejected");
        }

        let state = session.state;
        self.outcomes.send_replace(VerifyOutcome { ticket, state });

        outcome_to_result(state)
    }

    /// Explicit sign-out by the user.
    pub async fn sign_out(&self) {
        info!("Signing out");
        self.revoke().await;
    }

    /// Drops the session after the backend refused `rejected` on a protected
    /// call.
    ///
    /// Ignored unless `rejected` is still the credential of the current
    /// session: a login that started or finished since the call was issued
    /// wins.
    pub async fn invalidate(&self, rejected: &Credential) {
        let mut session = self.session.lock().await;

        let current = session.state == AuthState::Authenticated
            && session
                .credential
                .as_ref()
                .map_or(false, |credential| credential.expose() == rejected.expose());

        if !current {
            debug!("Rejected credential is no longer in use, keeping the session");
            return;
        }

        warn!("Credential is no longer accepted by the backend, signing out");
        self.revoke_locked(&mut session).await;
    }

    async fn revoke(&self) {
        let mut session = self.session.lock().await;
        self.revoke_locked(&mut session).await;
    }

    async fn revoke_locked(&self, session: &mut AuthSession) {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(error) = self.credential_store.clear().await {
            warn!(%error, "Unable to clear stored credential");
        }

        session.state = AuthState::Unauthenticated;
        session.credential = None;

        self.outcomes.send_replace(VerifyOutcome {
            ticket,
            state: AuthState::Unauthenticated,
        });
    }

    async fn wait_for_newer_outcome(&self, ticket: u64) -> Result<AuthState, AuthError> {
        let mut outcomes = self.outcomes.subscribe();

        let state = match outcomes.wait_for(|outcome| outcome.ticket > ticket).await {
            Ok(outcome) => outcome.state,
            Err(_) => AuthState::Unauthenticated,
        };

        outcome_to_result(state)
    }
}

fn outcome_to_result(state: AuthState) -> Result<AuthState, AuthError> {
    match state {
        AuthState::Authenticated => Ok(state),
        _ => Err(AuthError::InvalidCredential),
    }
}
