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

//! Registration mail seam.
//!
//! Mail delivery is an external collaborator. The catalogue only ever
//! fires these calls from detached synchronization workers, so a failing
//! mail backend can never fail a write. [`LoggingMailService`] is the
//! default implementation and simply records what would have been sent.

use async_trait::async_trait;

use crate::error::CatalogueError;
use crate::models::bundle::Bundle;
use crate::models::payloads::Provider;

/// Sends role-appropriate onboarding and moderation mails.
#[async_trait]
pub trait MailService: Send + Sync + 'static {
    /// Notifies a provider's admins (and the registry team) about an
    /// onboarding transition. `origin` names the manager that triggered
    /// the mail.
    async fn send_provider_mails(
        &self,
        provider: &Bundle<Provider>,
        origin: &str,
    ) -> Result<(), CatalogueError>;
}

/// Default mail implementation: logs instead of sending.
pub struct LoggingMailService;

#[async_trait]
impl MailService for LoggingMailService {
    async fn send_provider_mails(
        &self,
        provider: &Bundle<Provider>,
        origin: &str,
    ) -> Result<(), CatalogueError> {
        let recipients: Vec<&str> = provider
            .payload
            .users
            .iter()
            .map(|user| user.email.as_str())
            .collect();
        tracing::info!(
            provider_id = %provider.id(),
            status = provider.status.as_deref().unwrap_or("none"),
            origin,
            ?recipients,
            "registration mail"
        );
        Ok(())
    }
}
